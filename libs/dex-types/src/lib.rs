#![no_std]

mod bitmap;
mod config;
mod knockout;
mod position;

pub use bitmap::*;
pub use config::*;
pub use knockout::*;
pub use position::*;

/// Q96 constant (2^96) for fixed-point math
pub const Q96: u128 = 1 << 96;

/// Minimum tick index with a representable sqrt price
/// Limited by u128 representation (originally -887272 for uint160)
pub const MIN_TICK: i32 = -443636;

/// Maximum tick index with a representable sqrt price
/// Limited by u128 representation (originally 887272 for uint160)
pub const MAX_TICK: i32 = 443636;

/// Minimum sqrt price (at MIN_TICK)
/// sqrt(1.0001^-443636) * 2^96
pub const MIN_SQRT_RATIO: u128 = 18446743374134;

/// Maximum sqrt price (at MAX_TICK)
/// sqrt(1.0001^443636) * 2^96, bounded by u128::MAX
pub const MAX_SQRT_RATIO: u128 = 340275971719517849884101479065584693834;

/// Lowest tick the bitmap index can address (signed 24-bit)
pub const CENSUS_MIN_TICK: i32 = -(1 << 23);

/// Highest tick the bitmap index can address (signed 24-bit)
pub const CENSUS_MAX_TICK: i32 = (1 << 23) - 1;

/// Fee mileage is Q16.48 fixed point: reward = delta_mileage * liquidity >> 48
pub const MILEAGE_PRECISION_BITS: u32 = 48;

/// Liquidity per knockout lot is 2^10
pub const LOT_SIZE_BITS: u32 = 10;

/// Knockout lots are packed into 96 bits
pub const MAX_LOTS: u128 = (1 << 96) - 1;

/// Widest knockout range a pool may be configured for
pub const MAX_KNOCKOUT_WIDTH: u32 = 1 << 15;

/// Convert knockout lots into curve liquidity
pub fn lots_to_liquidity(lots: u128) -> u128 {
    lots << LOT_SIZE_BITS
}

/// True if the tick can be addressed by the bitmap index
pub fn in_census_range(tick: i32) -> bool {
    (CENSUS_MIN_TICK..=CENSUS_MAX_TICK).contains(&tick)
}
