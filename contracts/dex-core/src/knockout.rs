use crate::bitmap::{bookmark, census_for, forget};
use crate::error::CoreError;
use crate::invariants::{
    epoch_after_knockout, lots_in_bounds, mileage_not_ahead, on_knockout_grid,
    position_within_pivot,
};
use crate::merkle::{fold_leaf, fold_proof};
use crate::position::check_jit;
use crate::storage::{
    get_knockout_position, get_merkle, get_pivot, set_knockout_position, set_merkle, set_pivot,
};
use dex_math::{accrued_reward, blend_mileage, knockout_payout};
use dex_types::{
    lots_to_liquidity, CoreConfig, KnockoutBurn, KnockoutLeaf, KnockoutLoc, KnockoutMerkle,
    KnockoutMint, KnockoutPivot, KnockoutPosKey, KnockoutPosition, Side, MAX_LOTS, MAX_TICK,
    MIN_TICK,
};
use soroban_sdk::{log, Address, BytesN, Env, Vec};

fn position_key(owner: &Address, loc: &KnockoutLoc, pivot_time: u64) -> KnockoutPosKey {
    KnockoutPosKey {
        owner: owner.clone(),
        tick: loc.tick,
        side: loc.side,
        pivot_time,
    }
}

/// Width must be a power of two no wider than configured, with the pivot on
/// its grid, and the whole range must be priceable.
fn validate_loc(config: &CoreConfig, loc: &KnockoutLoc) -> Result<(), CoreError> {
    if loc.width == 0 || loc.width > config.max_knockout_width {
        return Err(CoreError::InvalidGrid);
    }
    if !on_knockout_grid(loc.tick, loc.width) {
        return Err(CoreError::InvalidGrid);
    }
    if loc.tick < MIN_TICK || loc.tick > MAX_TICK {
        return Err(CoreError::TickOutOfRange);
    }
    if loc.lower() < MIN_TICK || loc.upper() > MAX_TICK {
        return Err(CoreError::TickOutOfRange);
    }
    Ok(())
}

/// The range is on the curve when the price tick lies in `[lower, upper)`.
/// A bid below the price or an ask above it rests off the curve; anything
/// already past its knockout boundary is rejected.
fn check_price(loc: &KnockoutLoc, price_tick: i32, on_curve: bool) -> Result<(), CoreError> {
    let inside = loc.lower() <= price_tick && price_tick < loc.upper();
    if inside != on_curve {
        return Err(CoreError::CurveFlagMismatch);
    }

    let past = match loc.side {
        Side::Bid => price_tick < loc.lower(),
        Side::Ask => price_tick >= loc.upper(),
    };
    if past {
        return Err(CoreError::WrongSideOfPrice);
    }
    Ok(())
}

/// Add lots to the active epoch at `loc`, opening a fresh epoch if none is active
#[allow(clippy::too_many_arguments)]
pub fn mint(
    env: &Env,
    config: &CoreConfig,
    owner: &Address,
    loc: &KnockoutLoc,
    lots: u128,
    price_tick: i32,
    on_curve: bool,
    mileage_now: u64,
) -> Result<KnockoutMint, CoreError> {
    validate_loc(config, loc)?;
    if lots == 0 {
        return Err(CoreError::InvalidAmount);
    }
    if lots > MAX_LOTS {
        return Err(CoreError::LotsOverflow);
    }
    check_price(loc, price_tick, on_curve)?;

    let pivot_key = loc.pivot_key();
    let mut pivot = get_pivot(env, &pivot_key);
    let fresh_pivot = !pivot.is_active();

    if fresh_pivot {
        let last_knockout = get_merkle(env, &pivot_key).pivot_time;
        let pivot_time = env.ledger().timestamp().max(last_knockout + 1);
        debug_assert!(epoch_after_knockout(pivot_time, last_knockout));

        pivot = KnockoutPivot {
            lots: 0,
            pivot_time,
            range: loc.width,
        };
        bookmark(env, census_for(loc.side), loc.tick)?;
    } else if pivot.range != loc.width {
        return Err(CoreError::InvalidGrid);
    }

    pivot.lots = pivot
        .lots
        .checked_add(lots)
        .filter(|total| lots_in_bounds(*total))
        .ok_or(CoreError::LotsOverflow)?;

    let key = position_key(owner, loc, pivot.pivot_time);
    let mut position = get_knockout_position(env, &key);
    if position.lots > 0 && !mileage_not_ahead(position.fee_mileage, mileage_now) {
        return Err(CoreError::StaleMileage);
    }

    position.fee_mileage = blend_mileage(
        env,
        position.fee_mileage,
        position.lots,
        mileage_now,
        lots,
    );
    position.lots += lots;
    position.range = loc.width;
    position.timestamp = env.ledger().timestamp();
    debug_assert!(position_within_pivot(position.lots, pivot.lots));

    set_pivot(env, &pivot_key, &pivot);
    set_knockout_position(env, &key, &position);

    log!(env, "knockout mint", loc.tick, loc.width, lots, pivot.pivot_time);

    Ok(KnockoutMint {
        pivot_time: pivot.pivot_time,
        liquidity: lots_to_liquidity(lots),
        fresh_pivot,
    })
}

/// Remove lots from the owner's stake in the active epoch at `loc`
pub fn burn(
    env: &Env,
    config: &CoreConfig,
    owner: &Address,
    loc: &KnockoutLoc,
    lots: u128,
    mileage_now: u64,
) -> Result<KnockoutBurn, CoreError> {
    validate_loc(config, loc)?;
    if lots == 0 {
        return Err(CoreError::InvalidAmount);
    }

    let pivot_key = loc.pivot_key();
    let mut pivot = get_pivot(env, &pivot_key);
    if !pivot.is_active() {
        return Err(CoreError::AlreadyKnockedOut);
    }
    if pivot.range != loc.width {
        return Err(CoreError::InvalidGrid);
    }

    let key = position_key(owner, loc, pivot.pivot_time);
    let mut position = get_knockout_position(env, &key);
    if lots > position.lots {
        return Err(CoreError::OverBurn);
    }
    check_jit(env, config, position.timestamp)?;
    if !mileage_not_ahead(position.fee_mileage, mileage_now) {
        return Err(CoreError::StaleMileage);
    }

    let liquidity = lots_to_liquidity(lots);
    let reward = accrued_reward(env, liquidity, mileage_now - position.fee_mileage)
        .ok_or(CoreError::LiquidityOverflow)?;

    position.lots -= lots;
    pivot.lots = pivot.lots.checked_sub(lots).ok_or(CoreError::OverBurn)?;
    let pivot_emptied = !pivot.is_active();

    set_knockout_position(env, &key, &position);
    set_pivot(env, &pivot_key, &pivot);
    if pivot_emptied {
        forget(env, census_for(loc.side), loc.tick)?;
    }

    log!(env, "knockout burn", loc.tick, lots, reward, pivot_emptied);

    Ok(KnockoutBurn {
        lots,
        liquidity,
        reward,
        pivot_emptied,
    })
}

/// Burn everything the owner holds in the active epoch at `loc`
pub fn burn_all(
    env: &Env,
    config: &CoreConfig,
    owner: &Address,
    loc: &KnockoutLoc,
    mileage_now: u64,
) -> Result<KnockoutBurn, CoreError> {
    validate_loc(config, loc)?;
    let pivot = get_pivot(env, &loc.pivot_key());
    if !pivot.is_active() {
        return Err(CoreError::AlreadyKnockedOut);
    }

    let position = get_knockout_position(env, &position_key(owner, loc, pivot.pivot_time));
    if position.lots == 0 {
        return Ok(KnockoutBurn {
            lots: 0,
            liquidity: 0,
            reward: 0,
            pivot_emptied: false,
        });
    }

    burn(env, config, owner, loc, position.lots, mileage_now)
}

/// Knock out the active epoch at `loc`. Returns the folded leaf, or `None`
/// if the pivot had no active epoch.
pub fn cross(
    env: &Env,
    loc: &KnockoutLoc,
    mileage_now: u64,
) -> Result<Option<(KnockoutLeaf, BytesN<32>)>, CoreError> {
    let pivot_key = loc.pivot_key();
    let pivot = get_pivot(env, &pivot_key);
    if !pivot.is_active() {
        return Ok(None);
    }
    if pivot.range != loc.width {
        return Err(CoreError::InvalidGrid);
    }

    let merkle = get_merkle(env, &pivot_key);
    let leaf = KnockoutLeaf {
        entropy: env.prng().gen::<u64>(),
        pivot_time: pivot.pivot_time,
        fee_mileage: mileage_now,
    };
    let root = fold_leaf(env, &merkle.root, &leaf);

    set_merkle(
        env,
        &pivot_key,
        &KnockoutMerkle {
            root: root.clone(),
            pivot_time: leaf.pivot_time,
            fee_mileage: leaf.fee_mileage,
            entropy: leaf.entropy,
        },
    );
    set_pivot(env, &pivot_key, &KnockoutPivot::default());
    forget(env, census_for(loc.side), loc.tick)?;

    log!(env, "knockout cross", loc.tick, pivot.lots, pivot.pivot_time, mileage_now);

    Ok(Some((leaf, root)))
}

/// Claim a knocked out position with a proof running from `root` to the
/// stored commitment. `proof[0]` is the owner's epoch. Returns `(base, quote)`.
pub fn claim(
    env: &Env,
    owner: &Address,
    loc: &KnockoutLoc,
    root: &BytesN<32>,
    proof: &Vec<KnockoutLeaf>,
) -> Result<(u128, u128), CoreError> {
    let merkle = get_merkle(env, &loc.pivot_key());
    if fold_proof(env, root, proof) != merkle.root {
        return Err(CoreError::InvalidProof);
    }

    let Some(leaf) = proof.first() else {
        return Ok((0, 0));
    };

    let key = position_key(owner, loc, leaf.pivot_time);
    let position = get_knockout_position(env, &key);
    if position.lots == 0 {
        return Ok((0, 0));
    }
    if position.range != loc.width {
        return Err(CoreError::InvalidGrid);
    }

    let liquidity = lots_to_liquidity(position.lots);
    let reward = accrued_reward(
        env,
        liquidity,
        leaf.fee_mileage.saturating_sub(position.fee_mileage),
    )
    .ok_or(CoreError::LiquidityOverflow)?;
    let total = liquidity
        .checked_add(reward)
        .ok_or(CoreError::LiquidityOverflow)?;
    let payout = settle(env, loc, total)?;

    set_knockout_position(env, &key, &KnockoutPosition::default());

    log!(env, "knockout claim", loc.tick, leaf.pivot_time, payout.0, payout.1);
    Ok(payout)
}

/// Return the principal of a knocked out epoch without a proof, forfeiting
/// its reward. Returns `(base, quote)`.
pub fn recover(
    env: &Env,
    owner: &Address,
    loc: &KnockoutLoc,
    pivot_time: u64,
) -> Result<(u128, u128), CoreError> {
    let key = position_key(owner, loc, pivot_time);
    let position = get_knockout_position(env, &key);
    if position.lots == 0 {
        return Ok((0, 0));
    }

    let pivot = get_pivot(env, &loc.pivot_key());
    if pivot.is_active() && pivot.pivot_time == pivot_time {
        return Err(CoreError::NotKnockedOut);
    }
    if position.range != loc.width {
        return Err(CoreError::InvalidGrid);
    }

    let payout = settle(env, loc, lots_to_liquidity(position.lots))?;
    set_knockout_position(env, &key, &KnockoutPosition::default());

    log!(env, "knockout recover", loc.tick, pivot_time, payout.0, payout.1);
    Ok(payout)
}

fn settle(env: &Env, loc: &KnockoutLoc, liquidity: u128) -> Result<(u128, u128), CoreError> {
    knockout_payout(env, loc.side, loc.lower(), loc.upper(), liquidity)
        .ok_or(CoreError::LiquidityOverflow)
}
