// ============================================================================
// INVARIANTS MODULE
// ============================================================================
//
// Pure predicates over ledger state. The hot paths check them with
// `debug_assert!`, so they run under tests and the release-with-logs profile.
//
// INVARIANT CATEGORIES:
//
// 1. BITMAP INVARIANTS
//    - A parent-tier bit is set iff its child word is non-empty
//
// 2. MILEAGE INVARIANTS
//    - Stored baselines never run ahead of the pool-wide counter
//    - Blended baselines stay between the blended inputs
//
// 3. KNOCKOUT INVARIANTS
//    - Lots fit in 96 bits
//    - A position never holds more lots than its pivot
//    - A fresh epoch starts after the last knockout at the pivot
//    - Knockout ranges sit on their width grid
//
// ============================================================================

use dex_types::{BitWord, MAX_LOTS};

// ============================================================================
// BITMAP INVARIANTS
// ============================================================================

/// Invariant: a parent bit tracks whether its child word is populated
///
/// Property:
///   parent.is_set(bit) <=> !child.is_empty()
pub fn parent_bit_tracks_child(child: &BitWord, parent: &BitWord, bit: u8) -> bool {
    parent.is_set(bit) == !child.is_empty()
}

// ============================================================================
// MILEAGE INVARIANTS
// ============================================================================

/// Invariant: a baseline never exceeds the mileage it is measured against
///
/// Property:
///   stored_mileage <= mileage_now
pub fn mileage_not_ahead(stored_mileage: u64, mileage_now: u64) -> bool {
    stored_mileage <= mileage_now
}

/// Invariant: a blended baseline lies between its inputs
///
/// Property:
///   min(a, b) <= blended <= max(a, b)
pub fn blend_in_bounds(blended: u64, a: u64, b: u64) -> bool {
    blended >= a.min(b) && blended <= a.max(b)
}

// ============================================================================
// KNOCKOUT INVARIANTS
// ============================================================================

/// Invariant: lots are packed into 96 bits
pub fn lots_in_bounds(lots: u128) -> bool {
    lots <= MAX_LOTS
}

/// Invariant: a position's lots are part of its pivot's lots
pub fn position_within_pivot(position_lots: u128, pivot_lots: u128) -> bool {
    position_lots <= pivot_lots
}

/// Invariant: a fresh epoch is stamped strictly after the last knockout,
/// so positions from a knocked out epoch never share a key with new ones
pub fn epoch_after_knockout(pivot_time: u64, last_knockout_time: u64) -> bool {
    pivot_time > last_knockout_time
}

/// Invariant: a knockout width is a power of two and the pivot sits on its grid
pub fn on_knockout_grid(tick: i32, width: u32) -> bool {
    width.is_power_of_two() && tick.rem_euclid(width as i32) == 0
}

// ============================================================================
// TESTS
// ============================================================================
