use crate::full_math::{checked_mul_shr, mul_div};
use dex_types::MILEAGE_PRECISION_BITS;
use soroban_sdk::Env;

/// Liquidity-weighted mileage baseline after adding `new_liq` at `new_mileage`
/// to a position holding `stored_liq` at `stored_mileage`.
///
/// Rounds toward the lower of the two mileages, so the result always lies in
/// `[min, max]` and never overstates the baseline rewards are measured from.
pub fn blend_mileage(
    env: &Env,
    stored_mileage: u64,
    stored_liq: u128,
    new_mileage: u64,
    new_liq: u128,
) -> u64 {
    if stored_liq == 0 {
        return new_mileage;
    }
    if new_liq == 0 || stored_mileage == new_mileage {
        return stored_mileage;
    }

    let (low, high, high_weight) = if stored_mileage < new_mileage {
        (stored_mileage, new_mileage, new_liq)
    } else {
        (new_mileage, stored_mileage, stored_liq)
    };

    // Total weight may exceed u128 only when both weights are near u128::MAX;
    // halving both keeps the ratio within one part in 2^127.
    let (high_weight, total) = match stored_liq.checked_add(new_liq) {
        Some(total) => (high_weight, total),
        None => (high_weight >> 1, (stored_liq >> 1) + (new_liq >> 1)),
    };

    let spread = (high - low) as u128;
    let offset = mul_div(env, spread, high_weight, total);
    // offset <= spread, so this stays within u64
    low + offset as u64
}

/// Reward accrued by `liquidity` over `mileage_delta` (Q16.48), rounded down.
/// `None` if the reward does not fit in u128.
pub fn accrued_reward(env: &Env, liquidity: u128, mileage_delta: u64) -> Option<u128> {
    checked_mul_shr(env, mileage_delta as u128, liquidity, MILEAGE_PRECISION_BITS)
}
