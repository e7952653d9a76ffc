use crate::full_math::checked_mul_div;
use crate::tick_math::get_sqrt_ratio_at_tick;
use dex_types::{Side, Q96};
use soroban_sdk::Env;

fn sort(sqrt_ratio_a_x96: u128, sqrt_ratio_b_x96: u128) -> (u128, u128) {
    if sqrt_ratio_a_x96 > sqrt_ratio_b_x96 {
        (sqrt_ratio_b_x96, sqrt_ratio_a_x96)
    } else {
        (sqrt_ratio_a_x96, sqrt_ratio_b_x96)
    }
}

/// Token0 held by `liquidity` across a range with the price at or below it.
/// amount0 = L * (sqrt_pb - sqrt_pa) / (sqrt_pa * sqrt_pb), rounded down.
pub fn get_amount0_for_liquidity(
    env: &Env,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    liquidity: u128,
) -> Option<u128> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sort(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    if sqrt_ratio_lower == 0 {
        return None;
    }

    // L * (sqrt_pb - sqrt_pa) / sqrt_pb <= L, so the Q96 scale is applied last
    let scaled = checked_mul_div(
        env,
        liquidity,
        sqrt_ratio_upper - sqrt_ratio_lower,
        sqrt_ratio_upper,
    )?;
    checked_mul_div(env, scaled, Q96, sqrt_ratio_lower)
}

/// Token1 held by `liquidity` across a range with the price at or above it.
/// amount1 = L * (sqrt_pb - sqrt_pa), rounded down.
pub fn get_amount1_for_liquidity(
    env: &Env,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    liquidity: u128,
) -> Option<u128> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sort(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    checked_mul_div(env, liquidity, sqrt_ratio_upper - sqrt_ratio_lower, Q96)
}

/// Tokens owed to a knocked out range of `liquidity` over `[lower, upper]`.
///
/// A bid is knocked out below its range and converts entirely into base
/// (token0); an ask is knocked out above its range and converts entirely
/// into quote (token1). Returns `(base, quote)`, or `None` if the payout
/// does not fit in u128.
pub fn knockout_payout(
    env: &Env,
    side: Side,
    lower: i32,
    upper: i32,
    liquidity: u128,
) -> Option<(u128, u128)> {
    if liquidity == 0 {
        return Some((0, 0));
    }

    let sqrt_lower = get_sqrt_ratio_at_tick(env, lower);
    let sqrt_upper = get_sqrt_ratio_at_tick(env, upper);

    match side {
        Side::Bid => {
            get_amount0_for_liquidity(env, sqrt_lower, sqrt_upper, liquidity).map(|a| (a, 0))
        }
        Side::Ask => {
            get_amount1_for_liquidity(env, sqrt_lower, sqrt_upper, liquidity).map(|a| (0, a))
        }
    }
}
