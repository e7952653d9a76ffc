use crate::error::CoreError;
use dex_types::{
    AmbientPosition, BitWord, Census, CoreConfig, KnockoutMerkle, KnockoutPivot, KnockoutPosKey,
    KnockoutPosition, PivotKey, PositionKey, RangePosition,
};
use soroban_sdk::{contracttype, Address, Env};

// ============================================================================
// SOROBAN RESOURCE LIMITS
// ============================================================================
// - Read entries per tx: 100 / Write entries per tx: 50
//
// Every bitmap word, position, pivot and commitment is its own persistent
// entry; nothing grows with the number of ticks or owners.
// - seek_buy / seek_sell: at most 7 word reads, no writes
// - bookmark / forget: at most 3 word writes
// - knockout mint / burn: pivot + position + up to 3 census words
// - knockout cross: pivot + commitment + up to 3 census words
// Empty entries are removed rather than stored as zero.
// ============================================================================

/// Storage keys for the ledger core
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Core configuration (Instance storage)
    Config,
    /// Global lobby word of a census (Persistent storage)
    Lobby(Census),
    /// Mezzanine word: (census, lobby key) -> BitWord (Persistent storage)
    Mezzanine(Census, i32),
    /// Terminal word: (census, tick >> 8) -> BitWord (Persistent storage)
    Terminal(Census, i32),
    /// Ranged position (Persistent storage)
    Position(PositionKey),
    /// Ambient position by owner (Persistent storage)
    Ambient(Address),
    /// Active knockout epoch at a pivot (Persistent storage)
    Pivot(PivotKey),
    /// Knockout commitment at a pivot (Persistent storage)
    Merkle(PivotKey),
    /// Knockout position per epoch (Persistent storage)
    KnockoutPos(KnockoutPosKey),
}

// TTL constants
const INSTANCE_TTL_THRESHOLD: u32 = 17280; // ~1 day
const INSTANCE_TTL_EXTEND: u32 = 518400; // ~30 days
const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
const PERSISTENT_TTL_EXTEND: u32 = 518400;

/// Extend instance storage TTL
pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

/// Extend persistent storage TTL for a key
pub fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

// === Config ===

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> Result<CoreConfig, CoreError> {
    let config = env
        .storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(CoreError::NotInitialized)?;
    extend_instance_ttl(env);
    Ok(config)
}

pub fn set_config(env: &Env, config: &CoreConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    extend_instance_ttl(env);
}

// === Bitmap words ===

pub fn get_word(env: &Env, key: &DataKey) -> BitWord {
    env.storage().persistent().get(key).unwrap_or_default()
}

pub fn set_word(env: &Env, key: &DataKey, word: BitWord) {
    if word.is_empty() {
        env.storage().persistent().remove(key);
    } else {
        env.storage().persistent().set(key, &word);
        extend_persistent_ttl(env, key);
    }
}

// === Ranged positions ===

pub fn get_position(env: &Env, key: &PositionKey) -> RangePosition {
    let data_key = DataKey::Position(key.clone());
    env.storage()
        .persistent()
        .get(&data_key)
        .unwrap_or_default()
}

pub fn set_position(env: &Env, key: &PositionKey, position: &RangePosition) {
    let data_key = DataKey::Position(key.clone());
    if position.is_empty() {
        env.storage().persistent().remove(&data_key);
    } else {
        env.storage().persistent().set(&data_key, position);
        extend_persistent_ttl(env, &data_key);
    }
}

pub fn remove_position(env: &Env, key: &PositionKey) {
    env.storage()
        .persistent()
        .remove(&DataKey::Position(key.clone()));
}

// === Ambient positions ===

pub fn get_ambient(env: &Env, owner: &Address) -> AmbientPosition {
    let data_key = DataKey::Ambient(owner.clone());
    env.storage()
        .persistent()
        .get(&data_key)
        .unwrap_or_default()
}

pub fn set_ambient(env: &Env, owner: &Address, position: &AmbientPosition) {
    let data_key = DataKey::Ambient(owner.clone());
    if position.seeds == 0 {
        env.storage().persistent().remove(&data_key);
    } else {
        env.storage().persistent().set(&data_key, position);
        extend_persistent_ttl(env, &data_key);
    }
}

// === Knockout pivots ===

pub fn get_pivot(env: &Env, key: &PivotKey) -> KnockoutPivot {
    let data_key = DataKey::Pivot(key.clone());
    env.storage()
        .persistent()
        .get(&data_key)
        .unwrap_or_default()
}

/// Store a pivot; an emptied pivot is removed so the next mint opens a new epoch
pub fn set_pivot(env: &Env, key: &PivotKey, pivot: &KnockoutPivot) {
    let data_key = DataKey::Pivot(key.clone());
    if pivot.is_active() {
        env.storage().persistent().set(&data_key, pivot);
        extend_persistent_ttl(env, &data_key);
    } else {
        env.storage().persistent().remove(&data_key);
    }
}

// === Knockout commitments ===

pub fn get_merkle(env: &Env, key: &PivotKey) -> KnockoutMerkle {
    let data_key = DataKey::Merkle(key.clone());
    env.storage()
        .persistent()
        .get(&data_key)
        .unwrap_or_else(|| KnockoutMerkle::empty(env))
}

pub fn set_merkle(env: &Env, key: &PivotKey, merkle: &KnockoutMerkle) {
    let data_key = DataKey::Merkle(key.clone());
    env.storage().persistent().set(&data_key, merkle);
    extend_persistent_ttl(env, &data_key);
}

// === Knockout positions ===

pub fn get_knockout_position(env: &Env, key: &KnockoutPosKey) -> KnockoutPosition {
    let data_key = DataKey::KnockoutPos(key.clone());
    env.storage()
        .persistent()
        .get(&data_key)
        .unwrap_or_default()
}

pub fn set_knockout_position(env: &Env, key: &KnockoutPosKey, position: &KnockoutPosition) {
    let data_key = DataKey::KnockoutPos(key.clone());
    if position.lots == 0 {
        env.storage().persistent().remove(&data_key);
    } else {
        env.storage().persistent().set(&data_key, position);
        extend_persistent_ttl(env, &data_key);
    }
}
