use soroban_sdk::{Env, U256};

/// Multiply and divide with 256-bit intermediate precision (rounds down)
/// Returns (a * b) / denominator
pub fn mul_div(env: &Env, a: u128, b: u128, denominator: u128) -> u128 {
    if denominator == 0 {
        panic!("Division by zero");
    }

    let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
    let result = product.div(&U256::from_u128(env, denominator));

    u128_from_u256(env, &result)
}

/// Like `mul_div`, but returns `None` when the quotient does not fit in u128
pub fn checked_mul_div(env: &Env, a: u128, b: u128, denominator: u128) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
    product.div(&U256::from_u128(env, denominator)).to_u128()
}

/// Multiply by a Q-format factor and drop the fractional bits (rounds down)
/// Returns (a * b) >> shift, or `None` if that does not fit in u128
pub fn checked_mul_shr(env: &Env, a: u128, b: u128, shift: u32) -> Option<u128> {
    let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
    product.shr(shift).to_u128()
}

/// Convert U256 to u128, panics if overflow
fn u128_from_u256(env: &Env, value: &U256) -> u128 {
    let max_u128 = U256::from_u128(env, u128::MAX);
    if value.gt(&max_u128) {
        panic!("U256 overflow when converting to u128");
    }
    value.to_u128().unwrap_or(u128::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::Env;

    #[test]
    fn test_mul_div_basic() {
        let env = Env::default();
        assert_eq!(mul_div(&env, 10, 20, 5), 40);
    }

    #[test]
    fn test_mul_div_weighted_share() {
        let env = Env::default();
        // 5000 mileage spread * 175000 / 425000 liquidity = 2058.82 -> 2058
        assert_eq!(mul_div(&env, 5000, 175_000, 425_000), 2058);
    }

    #[test]
    fn test_mul_div_phantom_overflow() {
        let env = Env::default();
        // Product exceeds u128 but the quotient fits
        let mileage = u64::MAX as u128;
        let liquidity = 1u128 << 100;
        assert_eq!(mul_div(&env, mileage, liquidity, liquidity), mileage);
    }

    #[test]
    fn test_mul_div_rounds_down() {
        let env = Env::default();
        assert_eq!(mul_div(&env, 1, 1, 2), 0);
        assert_eq!(mul_div(&env, 5, 1, 3), 1);
    }

    #[test]
    #[should_panic(expected = "Division by zero")]
    fn test_mul_div_zero_denominator() {
        let env = Env::default();
        mul_div(&env, 10, 20, 0);
    }

    #[test]
    #[should_panic(expected = "U256 overflow when converting to u128")]
    fn test_mul_div_result_overflow() {
        let env = Env::default();
        mul_div(&env, u128::MAX, 2, 1);
    }

    #[test]
    fn test_checked_mul_div() {
        let env = Env::default();
        assert_eq!(checked_mul_div(&env, 10, 20, 5), Some(40));
        assert_eq!(checked_mul_div(&env, 10, 20, 0), None);
        assert_eq!(checked_mul_div(&env, u128::MAX, 2, 1), None);
        assert_eq!(checked_mul_div(&env, u128::MAX, 2, 2), Some(u128::MAX));
    }

    #[test]
    fn test_mul_shr_q48() {
        let env = Env::default();
        let one = 1u128 << 48;
        // One full unit of mileage on 1000 liquidity earns 1000
        assert_eq!(checked_mul_shr(&env, one, 1000, 48), Some(1000));
        // Half a unit rounds down
        assert_eq!(checked_mul_shr(&env, one / 2, 3, 48), Some(1));
        assert_eq!(checked_mul_shr(&env, 0, u128::MAX, 48), Some(0));
    }

    #[test]
    fn test_mul_shr_large_liquidity() {
        let env = Env::default();
        // Max u64 mileage on 2^100 liquidity stays within u128 after the shift
        let reward = checked_mul_shr(&env, u64::MAX as u128, 1u128 << 100, 48);
        assert_eq!(reward, Some((u64::MAX as u128) << 52));
    }

    #[test]
    fn test_mul_shr_overflow() {
        let env = Env::default();
        assert_eq!(checked_mul_shr(&env, 1 << 60, 1 << 120, 48), None);
        assert_eq!(checked_mul_shr(&env, u128::MAX, 1 << 48, 48), Some(u128::MAX));
    }
}
