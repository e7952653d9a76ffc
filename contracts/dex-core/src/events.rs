use dex_types::{Census, KnockoutBurn, KnockoutLeaf, KnockoutLoc, PositionKey};
use soroban_sdk::{Address, BytesN, Env, Symbol};

pub fn bookmark(env: &Env, census: Census, tick: i32) {
    env.events()
        .publish((Symbol::new(env, "bookmark"),), (census, tick));
}

pub fn forget(env: &Env, census: Census, tick: i32) {
    env.events()
        .publish((Symbol::new(env, "forget"),), (census, tick));
}

pub fn position_added(env: &Env, key: &PositionKey, liquidity: u128, fee_mileage: u64) {
    env.events().publish(
        (Symbol::new(env, "pos_add"), key.owner.clone()),
        (key.tick_lower, key.tick_upper, liquidity, fee_mileage),
    );
}

pub fn position_burned(env: &Env, key: &PositionKey, liquidity: u128, reward: u128) {
    env.events().publish(
        (Symbol::new(env, "pos_burn"), key.owner.clone()),
        (key.tick_lower, key.tick_upper, liquidity, reward),
    );
}

pub fn position_harvested(env: &Env, key: &PositionKey, reward: u128) {
    env.events().publish(
        (Symbol::new(env, "pos_harvest"), key.owner.clone()),
        (key.tick_lower, key.tick_upper, reward),
    );
}

pub fn position_moved(env: &Env, from: &Address, to: &Address, tick_lower: i32, tick_upper: i32) {
    env.events().publish(
        (Symbol::new(env, "pos_move"),),
        (from.clone(), to.clone(), tick_lower, tick_upper),
    );
}

pub fn ambient_changed(env: &Env, owner: &Address, delta: i128, seeds: u128) {
    env.events().publish(
        (Symbol::new(env, "ambient"), owner.clone()),
        (delta, seeds),
    );
}

pub fn knockout_minted(env: &Env, owner: &Address, loc: &KnockoutLoc, lots: u128, pivot_time: u64) {
    env.events().publish(
        (Symbol::new(env, "ko_mint"), owner.clone()),
        (loc.clone(), lots, pivot_time),
    );
}

pub fn knockout_burned(env: &Env, owner: &Address, loc: &KnockoutLoc, burn: &KnockoutBurn) {
    env.events().publish(
        (Symbol::new(env, "ko_burn"), owner.clone()),
        (loc.clone(), burn.lots, burn.reward),
    );
}

/// Every folded leaf is published so proofs can be rebuilt off-chain
pub fn knockout_crossed(env: &Env, loc: &KnockoutLoc, leaf: &KnockoutLeaf, root: &BytesN<32>) {
    env.events().publish(
        (Symbol::new(env, "ko_cross"),),
        (loc.clone(), leaf.clone(), root.clone()),
    );
}

pub fn knockout_claimed(env: &Env, owner: &Address, loc: &KnockoutLoc, base: u128, quote: u128) {
    env.events().publish(
        (Symbol::new(env, "ko_claim"), owner.clone()),
        (loc.clone(), base, quote),
    );
}

pub fn knockout_recovered(
    env: &Env,
    owner: &Address,
    loc: &KnockoutLoc,
    pivot_time: u64,
    base: u128,
    quote: u128,
) {
    env.events().publish(
        (Symbol::new(env, "ko_recover"), owner.clone()),
        (loc.clone(), pivot_time, base, quote),
    );
}
