use crate::error::CoreError;
use crate::invariants::parent_bit_tracks_child;
use crate::storage::{get_word, set_word, DataKey};
use dex_math::{
    lobby_bit, lobby_key, lobby_key_from_bit, mezz_bit, mezz_key, term_bit, weld_lobby, weld_mezz,
};
use dex_types::{in_census_range, Census, Side, CENSUS_MAX_TICK, CENSUS_MIN_TICK};
use soroban_sdk::Env;

/// Pivot census for a knockout side
pub fn census_for(side: Side) -> Census {
    match side {
        Side::Bid => Census::Bids,
        Side::Ask => Census::Asks,
    }
}

/// Set `tick` in all three tiers. Returns true if the tick was not already set.
pub fn bookmark(env: &Env, census: Census, tick: i32) -> Result<bool, CoreError> {
    if !in_census_range(tick) {
        return Err(CoreError::TickOutOfRange);
    }

    let term_key = DataKey::Terminal(census, mezz_key(tick));
    let term = get_word(env, &term_key);
    if term.is_set(term_bit(tick)) {
        return Ok(false);
    }
    let term = term.with(term_bit(tick));
    set_word(env, &term_key, term);

    let mezz_slot = DataKey::Mezzanine(census, lobby_key(tick));
    let mezz = get_word(env, &mezz_slot);
    if !mezz.is_set(mezz_bit(tick)) {
        let mezz = mezz.with(mezz_bit(tick));
        set_word(env, &mezz_slot, mezz);

        let lobby_slot = DataKey::Lobby(census);
        let lobby = get_word(env, &lobby_slot);
        if !lobby.is_set(lobby_bit(tick)) {
            set_word(env, &lobby_slot, lobby.with(lobby_bit(tick)));
        }

        debug_assert!(parent_bit_tracks_child(
            &mezz,
            &get_word(env, &lobby_slot),
            lobby_bit(tick)
        ));
    }

    debug_assert!(parent_bit_tracks_child(&term, &get_word(env, &mezz_slot), mezz_bit(tick)));
    Ok(true)
}

/// Clear `tick`. Parent bits are cleared only once their child word is empty.
/// Returns true if the tick was set.
pub fn forget(env: &Env, census: Census, tick: i32) -> Result<bool, CoreError> {
    if !in_census_range(tick) {
        return Err(CoreError::TickOutOfRange);
    }

    let term_key = DataKey::Terminal(census, mezz_key(tick));
    let term = get_word(env, &term_key);
    if !term.is_set(term_bit(tick)) {
        return Ok(false);
    }
    let term = term.without(term_bit(tick));
    set_word(env, &term_key, term);

    if term.is_empty() {
        let mezz_slot = DataKey::Mezzanine(census, lobby_key(tick));
        let mezz = get_word(env, &mezz_slot).without(mezz_bit(tick));
        set_word(env, &mezz_slot, mezz);

        if mezz.is_empty() {
            let lobby_slot = DataKey::Lobby(census);
            let lobby = get_word(env, &lobby_slot).without(lobby_bit(tick));
            set_word(env, &lobby_slot, lobby);
        }
    }

    Ok(true)
}

/// Lowest bookmarked tick at or above `tick`, and whether the search left the
/// local terminal word. Returns `(CENSUS_MAX_TICK, true)` if nothing is above.
pub fn seek_buy(env: &Env, census: Census, tick: i32) -> (i32, bool) {
    let tick = tick.clamp(CENSUS_MIN_TICK, CENSUS_MAX_TICK);

    let term = get_word(env, &DataKey::Terminal(census, mezz_key(tick)));
    if let Some(bit) = term.lowest_at_or_above(term_bit(tick)) {
        return (weld_mezz(mezz_key(tick), bit), false);
    }

    let lobby = lobby_key(tick);
    let mezz = get_word(env, &DataKey::Mezzanine(census, lobby));
    if let Some(bit) = mezz.lowest_above(mezz_bit(tick)) {
        return descend_up(env, census, weld_lobby(lobby, bit));
    }

    let lobby_word = get_word(env, &DataKey::Lobby(census));
    if let Some(bit) = lobby_word.lowest_above(lobby_bit(tick)) {
        let lobby = lobby_key_from_bit(bit);
        let mezz = get_word(env, &DataKey::Mezzanine(census, lobby));
        if let Some(bit) = mezz.lowest() {
            return descend_up(env, census, weld_lobby(lobby, bit));
        }
    }

    (CENSUS_MAX_TICK, true)
}

/// Highest bookmarked tick at or below `tick`, and whether the search left the
/// local terminal word. Returns `(CENSUS_MIN_TICK, true)` if nothing is below.
pub fn seek_sell(env: &Env, census: Census, tick: i32) -> (i32, bool) {
    let tick = tick.clamp(CENSUS_MIN_TICK, CENSUS_MAX_TICK);

    let term = get_word(env, &DataKey::Terminal(census, mezz_key(tick)));
    if let Some(bit) = term.highest_at_or_below(term_bit(tick)) {
        return (weld_mezz(mezz_key(tick), bit), false);
    }

    let lobby = lobby_key(tick);
    let mezz = get_word(env, &DataKey::Mezzanine(census, lobby));
    if let Some(bit) = mezz.highest_below(mezz_bit(tick)) {
        return descend_down(env, census, weld_lobby(lobby, bit));
    }

    let lobby_word = get_word(env, &DataKey::Lobby(census));
    if let Some(bit) = lobby_word.highest_below(lobby_bit(tick)) {
        let lobby = lobby_key_from_bit(bit);
        let mezz = get_word(env, &DataKey::Mezzanine(census, lobby));
        if let Some(bit) = mezz.highest() {
            return descend_down(env, census, weld_lobby(lobby, bit));
        }
    }

    (CENSUS_MIN_TICK, true)
}

fn descend_up(env: &Env, census: Census, mezz: i32) -> (i32, bool) {
    match get_word(env, &DataKey::Terminal(census, mezz)).lowest() {
        Some(bit) => (weld_mezz(mezz, bit), true),
        None => (CENSUS_MAX_TICK, true),
    }
}

fn descend_down(env: &Env, census: Census, mezz: i32) -> (i32, bool) {
    match get_word(env, &DataKey::Terminal(census, mezz)).highest() {
        Some(bit) => (weld_mezz(mezz, bit), true),
        None => (CENSUS_MIN_TICK, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dex_types::BitWord;
    use soroban_sdk::Env;

    /// Helper to run test code within a contract context
    fn with_contract<F, R>(env: &Env, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let contract_id = env.register(crate::DexCore, ());
        env.as_contract(&contract_id, f)
    }

    const TICKS: Census = Census::Ticks;

    #[test]
    fn test_bookmark_sets_all_three_tiers() {
        let env = Env::default();
        with_contract(&env, || {
            let tick = -120 * 65536 + 12 * 256 + 4;
            assert!(bookmark(&env, TICKS, tick).unwrap());

            let mezz = get_word(&env, &DataKey::Mezzanine(TICKS, -120));
            assert_eq!(mezz, BitWord { lo: 4096, hi: 0 });

            let term = get_word(&env, &DataKey::Terminal(TICKS, tick >> 8));
            assert_eq!(term, BitWord { lo: 16, hi: 0 });

            let lobby = get_word(&env, &DataKey::Lobby(TICKS));
            assert_eq!(lobby, BitWord { lo: 1 << 8, hi: 0 });
        });
    }

    #[test]
    fn test_bookmark_is_idempotent() {
        let env = Env::default();
        with_contract(&env, || {
            assert!(bookmark(&env, TICKS, 500).unwrap());
            assert!(!bookmark(&env, TICKS, 500).unwrap());
            assert_eq!(seek_buy(&env, TICKS, 0), (500, true));
        });
    }

    #[test]
    fn test_bookmark_then_seek_returns_tick() {
        let env = Env::default();
        with_contract(&env, || {
            for tick in [CENSUS_MIN_TICK, -7_861_244, -1, 0, 1, 443_636, CENSUS_MAX_TICK] {
                bookmark(&env, TICKS, tick).unwrap();
                assert_eq!(seek_buy(&env, TICKS, tick), (tick, false));
                assert_eq!(seek_sell(&env, TICKS, tick), (tick, false));
                forget(&env, TICKS, tick).unwrap();
            }
        });
    }

    #[test]
    fn test_forget_restores_sentinels() {
        let env = Env::default();
        with_contract(&env, || {
            bookmark(&env, TICKS, 1234).unwrap();
            assert!(forget(&env, TICKS, 1234).unwrap());
            assert!(!forget(&env, TICKS, 1234).unwrap());

            assert_eq!(seek_buy(&env, TICKS, 1234), (CENSUS_MAX_TICK, true));
            assert_eq!(seek_sell(&env, TICKS, 1234), (CENSUS_MIN_TICK, true));

            // Every word was removed
            assert!(!env.storage().persistent().has(&DataKey::Lobby(TICKS)));
            assert!(!env
                .storage()
                .persistent()
                .has(&DataKey::Mezzanine(TICKS, 0)));
            assert!(!env
                .storage()
                .persistent()
                .has(&DataKey::Terminal(TICKS, 1234 >> 8)));
        });
    }

    #[test]
    fn test_forget_keeps_parent_bits_for_siblings() {
        let env = Env::default();
        with_contract(&env, || {
            // Same terminal word
            bookmark(&env, TICKS, 256).unwrap();
            bookmark(&env, TICKS, 300).unwrap();
            // Same mezzanine word, different terminal word
            bookmark(&env, TICKS, 1024).unwrap();

            forget(&env, TICKS, 256).unwrap();
            assert!(get_word(&env, &DataKey::Mezzanine(TICKS, 0)).is_set(1));
            assert_eq!(seek_sell(&env, TICKS, 1000), (300, true));

            forget(&env, TICKS, 300).unwrap();
            let mezz = get_word(&env, &DataKey::Mezzanine(TICKS, 0));
            assert!(!mezz.is_set(1));
            assert!(mezz.is_set(4));
            assert!(get_word(&env, &DataKey::Lobby(TICKS)).is_set(128));
        });
    }

    #[test]
    fn test_seek_within_terminal_word_does_not_spill() {
        let env = Env::default();
        with_contract(&env, || {
            bookmark(&env, TICKS, 10).unwrap();
            bookmark(&env, TICKS, 200).unwrap();
            assert_eq!(seek_buy(&env, TICKS, 11), (200, false));
            assert_eq!(seek_sell(&env, TICKS, 199), (10, false));
        });
    }

    #[test]
    fn test_seek_spills_to_mezzanine() {
        let env = Env::default();
        with_contract(&env, || {
            bookmark(&env, TICKS, 5 * 256 + 7).unwrap();
            bookmark(&env, TICKS, -3 * 256 + 250).unwrap();
            assert_eq!(seek_buy(&env, TICKS, 0), (5 * 256 + 7, true));
            assert_eq!(seek_sell(&env, TICKS, 0), (-3 * 256 + 250, true));
        });
    }

    #[test]
    fn test_seek_spills_to_lobby_across_zero() {
        let env = Env::default();
        with_contract(&env, || {
            let far_up = 3 * 65536 + 17;
            let far_down = -5 * 65536 + 2;
            bookmark(&env, TICKS, far_up).unwrap();
            bookmark(&env, TICKS, far_down).unwrap();

            assert_eq!(seek_buy(&env, TICKS, far_down + 1), (far_up, true));
            assert_eq!(seek_sell(&env, TICKS, far_up - 1), (far_down, true));
            assert_eq!(seek_buy(&env, TICKS, -1), (far_up, true));
            assert_eq!(seek_sell(&env, TICKS, 0), (far_down, true));
        });
    }

    #[test]
    fn test_seek_empty_returns_sentinels() {
        let env = Env::default();
        with_contract(&env, || {
            assert_eq!(seek_buy(&env, TICKS, 0), (CENSUS_MAX_TICK, true));
            assert_eq!(seek_sell(&env, TICKS, 0), (CENSUS_MIN_TICK, true));
        });
    }

    #[test]
    fn test_seek_clamps_out_of_range_start() {
        let env = Env::default();
        with_contract(&env, || {
            bookmark(&env, TICKS, 0).unwrap();
            assert_eq!(seek_buy(&env, TICKS, i32::MIN), (0, true));
            assert_eq!(seek_sell(&env, TICKS, i32::MAX), (0, true));
        });
    }

    #[test]
    fn test_bookmark_out_of_range_fails() {
        let env = Env::default();
        with_contract(&env, || {
            assert_eq!(
                bookmark(&env, TICKS, CENSUS_MAX_TICK + 1),
                Err(CoreError::TickOutOfRange)
            );
            assert_eq!(
                forget(&env, TICKS, CENSUS_MIN_TICK - 1),
                Err(CoreError::TickOutOfRange)
            );
        });
    }

    #[test]
    fn test_census_namespaces_are_independent() {
        let env = Env::default();
        with_contract(&env, || {
            bookmark(&env, census_for(Side::Bid), 64).unwrap();
            assert_eq!(seek_sell(&env, Census::Bids, 100), (64, false));
            assert_eq!(seek_sell(&env, Census::Asks, 100), (CENSUS_MIN_TICK, true));
            assert_eq!(seek_sell(&env, TICKS, 100), (CENSUS_MIN_TICK, true));
        });
    }
}
