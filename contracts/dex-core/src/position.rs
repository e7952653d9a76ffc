use crate::error::CoreError;
use crate::invariants::{blend_in_bounds, mileage_not_ahead};
use crate::storage::{get_ambient, get_position, remove_position, set_ambient, set_position};
use dex_math::{accrued_reward, blend_mileage};
use dex_types::{in_census_range, AmbientPosition, CoreConfig, PositionKey, RangePosition};
use soroban_sdk::{Address, Env};

/// Build a position key, rejecting inverted or unaddressable ranges
pub fn position_key(
    owner: &Address,
    tick_lower: i32,
    tick_upper: i32,
) -> Result<PositionKey, CoreError> {
    if tick_lower >= tick_upper || !in_census_range(tick_lower) || !in_census_range(tick_upper) {
        return Err(CoreError::InvalidRange);
    }
    Ok(PositionKey {
        owner: owner.clone(),
        tick_lower,
        tick_upper,
    })
}

/// Fail with `JitLocked` until `jit_threshold` seconds have passed since `timestamp`
pub fn check_jit(env: &Env, config: &CoreConfig, timestamp: u64) -> Result<(), CoreError> {
    if env.ledger().timestamp() < timestamp.saturating_add(config.jit_threshold) {
        return Err(CoreError::JitLocked);
    }
    Ok(())
}

/// Add liquidity to a ranged position, blending its mileage baseline
pub fn add(
    env: &Env,
    key: &PositionKey,
    liquidity: u128,
    mileage_now: u64,
) -> Result<RangePosition, CoreError> {
    if liquidity == 0 {
        return Err(CoreError::InvalidAmount);
    }

    let mut position = get_position(env, key);
    if !position.is_empty() && !mileage_not_ahead(position.fee_mileage, mileage_now) {
        return Err(CoreError::StaleMileage);
    }

    let blended = blend_mileage(
        env,
        position.fee_mileage,
        position.liquidity,
        mileage_now,
        liquidity,
    );
    debug_assert!(
        position.is_empty() || blend_in_bounds(blended, position.fee_mileage, mileage_now)
    );

    position.liquidity = position
        .liquidity
        .checked_add(liquidity)
        .ok_or(CoreError::LiquidityOverflow)?;
    position.fee_mileage = blended;
    position.timestamp = env.ledger().timestamp();

    set_position(env, key, &position);
    Ok(position)
}

/// Remove liquidity from a ranged position. Returns the reward accrued by the
/// removed liquidity since the baseline, in liquidity units.
pub fn burn(
    env: &Env,
    config: &CoreConfig,
    key: &PositionKey,
    liquidity: u128,
    mileage_now: u64,
) -> Result<u128, CoreError> {
    let mut position = get_position(env, key);
    if liquidity > position.liquidity {
        return Err(CoreError::InsufficientLiquidity);
    }
    if position.is_empty() {
        return Ok(0);
    }

    check_jit(env, config, position.timestamp)?;
    if !mileage_not_ahead(position.fee_mileage, mileage_now) {
        return Err(CoreError::StaleMileage);
    }

    let reward = accrued_reward(env, liquidity, mileage_now - position.fee_mileage)
        .ok_or(CoreError::LiquidityOverflow)?;

    // Baseline is left as is; the remainder keeps accruing from it
    position.liquidity -= liquidity;
    set_position(env, key, &position);

    Ok(reward)
}

/// Pay out the reward on the full position and reset its baseline
pub fn harvest(env: &Env, key: &PositionKey, mileage_now: u64) -> Result<u128, CoreError> {
    let mut position = get_position(env, key);
    if position.is_empty() {
        return Ok(0);
    }
    if !mileage_not_ahead(position.fee_mileage, mileage_now) {
        return Err(CoreError::StaleMileage);
    }

    let reward = accrued_reward(env, position.liquidity, mileage_now - position.fee_mileage)
        .ok_or(CoreError::LiquidityOverflow)?;
    position.fee_mileage = mileage_now;
    set_position(env, key, &position);

    Ok(reward)
}

/// Move a position wholesale to a new owner. Returns false if there was
/// nothing to move.
pub fn transfer(env: &Env, from: &PositionKey, to: &Address) -> Result<bool, CoreError> {
    if from.owner == *to {
        return Ok(false);
    }

    let position = get_position(env, from);
    if position.is_empty() {
        return Ok(false);
    }

    let to_key = PositionKey {
        owner: to.clone(),
        tick_lower: from.tick_lower,
        tick_upper: from.tick_upper,
    };
    if !get_position(env, &to_key).is_empty() {
        return Err(CoreError::PositionCollision);
    }

    set_position(env, &to_key, &position);
    remove_position(env, from);
    Ok(true)
}

// === Ambient ===

pub fn add_ambient(env: &Env, owner: &Address, seeds: u128) -> Result<AmbientPosition, CoreError> {
    if seeds == 0 {
        return Err(CoreError::InvalidAmount);
    }

    let mut position = get_ambient(env, owner);
    position.seeds = position
        .seeds
        .checked_add(seeds)
        .ok_or(CoreError::LiquidityOverflow)?;
    position.timestamp = env.ledger().timestamp();

    set_ambient(env, owner, &position);
    Ok(position)
}

/// Remove ambient seeds. Returns the seeds left in the position.
pub fn burn_ambient(
    env: &Env,
    config: &CoreConfig,
    owner: &Address,
    seeds: u128,
) -> Result<u128, CoreError> {
    let mut position = get_ambient(env, owner);
    if seeds > position.seeds {
        return Err(CoreError::InsufficientLiquidity);
    }
    if seeds == 0 {
        return Ok(position.seeds);
    }

    check_jit(env, config, position.timestamp)?;

    position.seeds -= seeds;
    set_ambient(env, owner, &position);
    Ok(position.seeds)
}
