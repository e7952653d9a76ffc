#![no_std]

pub mod bit_math;
pub mod full_math;
pub mod liquidity_math;
pub mod mileage;
pub mod tick_math;

pub use bit_math::*;
pub use full_math::*;
pub use liquidity_math::*;
pub use mileage::*;
pub use tick_math::*;
