#![no_std]

mod bitmap;
mod error;
mod events;
mod invariants;
mod knockout;
mod merkle;
mod position;
mod storage;

pub use error::CoreError;

use dex_types::{
    AmbientPosition, Census, CoreConfig, KnockoutBurn, KnockoutLeaf, KnockoutLoc, KnockoutMerkle,
    KnockoutMint, KnockoutPivot, KnockoutPosKey, KnockoutPosition, PivotKey, RangePosition, Side,
    MAX_KNOCKOUT_WIDTH,
};
use soroban_sdk::{contract, contractimpl, Address, BytesN, Env, Vec};
use storage::{get_config, has_config, set_config};

#[contract]
pub struct DexCore;

/// Load the config and require the orchestration layer's authorization
fn authorize(env: &Env) -> Result<CoreConfig, CoreError> {
    let config = get_config(env)?;
    config.admin.require_auth();
    Ok(config)
}

#[contractimpl]
impl DexCore {
    /// Initialize the ledger core
    ///
    /// # Arguments
    /// * `admin` - Orchestration contract that drives every mutation
    /// * `jit_threshold` - Seconds a position must rest before it can be burned
    /// * `max_knockout_width` - Widest knockout range, a power of two
    pub fn initialize(
        env: Env,
        admin: Address,
        jit_threshold: u64,
        max_knockout_width: u32,
    ) -> Result<(), CoreError> {
        if has_config(&env) {
            return Err(CoreError::AlreadyInitialized);
        }
        if !max_knockout_width.is_power_of_two() || max_knockout_width > MAX_KNOCKOUT_WIDTH {
            return Err(CoreError::InvalidGrid);
        }

        set_config(
            &env,
            &CoreConfig {
                admin,
                jit_threshold,
                max_knockout_width,
            },
        );
        Ok(())
    }

    /// Current configuration
    pub fn get_config(env: Env) -> Result<CoreConfig, CoreError> {
        get_config(&env)
    }

    // === Bitmap index ===

    /// Mark `tick` as an active boundary
    pub fn bookmark(env: Env, tick: i32) -> Result<(), CoreError> {
        authorize(&env)?;
        if bitmap::bookmark(&env, Census::Ticks, tick)? {
            events::bookmark(&env, Census::Ticks, tick);
        }
        Ok(())
    }

    /// Clear `tick` as an active boundary
    pub fn forget(env: Env, tick: i32) -> Result<(), CoreError> {
        authorize(&env)?;
        if bitmap::forget(&env, Census::Ticks, tick)? {
            events::forget(&env, Census::Ticks, tick);
        }
        Ok(())
    }

    /// Lowest active boundary at or above `tick`
    ///
    /// # Returns
    /// (tick, spilled) - `spilled` is true if the result is outside `tick`'s
    /// terminal word; `(8388607, true)` if there is none
    pub fn seek_buy(env: Env, tick: i32) -> (i32, bool) {
        bitmap::seek_buy(&env, Census::Ticks, tick)
    }

    /// Highest active boundary at or below `tick`
    ///
    /// # Returns
    /// (tick, spilled) - `(-8388608, true)` if there is none
    pub fn seek_sell(env: Env, tick: i32) -> (i32, bool) {
        bitmap::seek_sell(&env, Census::Ticks, tick)
    }

    /// Nearest active knockout pivot on `side` in the trade direction
    pub fn seek_knockout(env: Env, side: Side, tick: i32, is_buy: bool) -> (i32, bool) {
        let census = bitmap::census_for(side);
        if is_buy {
            bitmap::seek_buy(&env, census, tick)
        } else {
            bitmap::seek_sell(&env, census, tick)
        }
    }

    // === Position ledger ===

    /// Add liquidity to a ranged position at the current fee mileage
    pub fn add_position(
        env: Env,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
        fee_mileage: u64,
    ) -> Result<RangePosition, CoreError> {
        authorize(&env)?;
        let key = position::position_key(&owner, tick_lower, tick_upper)?;
        let updated = position::add(&env, &key, liquidity, fee_mileage)?;
        events::position_added(&env, &key, liquidity, updated.fee_mileage);
        Ok(updated)
    }

    /// Remove liquidity from a ranged position
    ///
    /// # Returns
    /// Reward accrued by the removed liquidity, in liquidity units
    pub fn burn_position(
        env: Env,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
        fee_mileage: u64,
    ) -> Result<u128, CoreError> {
        let config = authorize(&env)?;
        let key = position::position_key(&owner, tick_lower, tick_upper)?;
        let reward = position::burn(&env, &config, &key, liquidity, fee_mileage)?;
        events::position_burned(&env, &key, liquidity, reward);
        Ok(reward)
    }

    /// Collect the reward on a whole ranged position without removing it
    pub fn harvest_position(
        env: Env,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        fee_mileage: u64,
    ) -> Result<u128, CoreError> {
        authorize(&env)?;
        let key = position::position_key(&owner, tick_lower, tick_upper)?;
        let reward = position::harvest(&env, &key, fee_mileage)?;
        events::position_harvested(&env, &key, reward);
        Ok(reward)
    }

    /// Move a ranged position to a new owner
    pub fn transfer_position(
        env: Env,
        from: Address,
        to: Address,
        tick_lower: i32,
        tick_upper: i32,
    ) -> Result<(), CoreError> {
        authorize(&env)?;
        let key = position::position_key(&from, tick_lower, tick_upper)?;
        if position::transfer(&env, &key, &to)? {
            events::position_moved(&env, &from, &to, tick_lower, tick_upper);
        }
        Ok(())
    }

    /// Ranged position of `owner`, empty if none
    pub fn get_position(
        env: Env,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
    ) -> Result<RangePosition, CoreError> {
        let key = position::position_key(&owner, tick_lower, tick_upper)?;
        Ok(storage::get_position(&env, &key))
    }

    /// Add full-range seeds for `owner`
    pub fn add_ambient(
        env: Env,
        owner: Address,
        seeds: u128,
    ) -> Result<AmbientPosition, CoreError> {
        authorize(&env)?;
        let updated = position::add_ambient(&env, &owner, seeds)?;
        events::ambient_changed(&env, &owner, seeds as i128, updated.seeds);
        Ok(updated)
    }

    /// Remove ambient seeds
    ///
    /// # Returns
    /// Seeds remaining in the position
    pub fn burn_ambient(env: Env, owner: Address, seeds: u128) -> Result<u128, CoreError> {
        let config = authorize(&env)?;
        let remaining = position::burn_ambient(&env, &config, &owner, seeds)?;
        events::ambient_changed(&env, &owner, -(seeds as i128), remaining);
        Ok(remaining)
    }

    /// Ambient position of `owner`, empty if none
    pub fn get_ambient(env: Env, owner: Address) -> AmbientPosition {
        storage::get_ambient(&env, &owner)
    }

    // === Knockout liquidity ===

    /// Mint knockout lots at `loc`
    ///
    /// # Arguments
    /// * `price_tick` - Current pool tick
    /// * `on_curve` - True if the caller is adding the liquidity to the live curve
    /// * `fee_mileage` - Current fee mileage for the range
    pub fn mint_knockout(
        env: Env,
        owner: Address,
        loc: KnockoutLoc,
        lots: u128,
        price_tick: i32,
        on_curve: bool,
        fee_mileage: u64,
    ) -> Result<KnockoutMint, CoreError> {
        let config = authorize(&env)?;
        let minted = knockout::mint(
            &env,
            &config,
            &owner,
            &loc,
            lots,
            price_tick,
            on_curve,
            fee_mileage,
        )?;
        events::knockout_minted(&env, &owner, &loc, lots, minted.pivot_time);
        Ok(minted)
    }

    /// Burn lots from the owner's stake in the active epoch at `loc`
    pub fn burn_knockout(
        env: Env,
        owner: Address,
        loc: KnockoutLoc,
        lots: u128,
        fee_mileage: u64,
    ) -> Result<KnockoutBurn, CoreError> {
        let config = authorize(&env)?;
        let burned = knockout::burn(&env, &config, &owner, &loc, lots, fee_mileage)?;
        events::knockout_burned(&env, &owner, &loc, &burned);
        Ok(burned)
    }

    /// Burn all of the owner's lots in the active epoch at `loc`
    pub fn burn_all_knockout(
        env: Env,
        owner: Address,
        loc: KnockoutLoc,
        fee_mileage: u64,
    ) -> Result<KnockoutBurn, CoreError> {
        let config = authorize(&env)?;
        let burned = knockout::burn_all(&env, &config, &owner, &loc, fee_mileage)?;
        if burned.lots > 0 {
            events::knockout_burned(&env, &owner, &loc, &burned);
        }
        Ok(burned)
    }

    /// Knock out the active epoch at `loc` once price has fully crossed it
    ///
    /// # Returns
    /// False if there was no active epoch
    pub fn cross_knockout(env: Env, loc: KnockoutLoc, fee_mileage: u64) -> Result<bool, CoreError> {
        authorize(&env)?;
        match knockout::cross(&env, &loc, fee_mileage)? {
            Some((leaf, root)) => {
                events::knockout_crossed(&env, &loc, &leaf, &root);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Claim a knocked out position with its proof
    ///
    /// # Arguments
    /// * `root` - Commitment before the owner's knockout
    /// * `proof` - Knockout leaves from the owner's epoch up to the latest
    ///
    /// # Returns
    /// (base, quote) - Principal plus reward, converted at the crossed range
    pub fn claim_knockout(
        env: Env,
        owner: Address,
        loc: KnockoutLoc,
        root: BytesN<32>,
        proof: Vec<KnockoutLeaf>,
    ) -> Result<(u128, u128), CoreError> {
        authorize(&env)?;
        let (base, quote) = knockout::claim(&env, &owner, &loc, &root, &proof)?;
        if base > 0 || quote > 0 {
            events::knockout_claimed(&env, &owner, &loc, base, quote);
        }
        Ok((base, quote))
    }

    /// Recover the principal of a knocked out epoch without a proof
    ///
    /// # Returns
    /// (base, quote) - Principal only; the reward is forfeited
    pub fn recover_knockout(
        env: Env,
        owner: Address,
        loc: KnockoutLoc,
        pivot_time: u64,
    ) -> Result<(u128, u128), CoreError> {
        authorize(&env)?;
        let (base, quote) = knockout::recover(&env, &owner, &loc, pivot_time)?;
        if base > 0 || quote > 0 {
            events::knockout_recovered(&env, &owner, &loc, pivot_time, base, quote);
        }
        Ok((base, quote))
    }

    /// Active pivot record at (`side`, `tick`), empty if inactive
    pub fn get_pivot(env: Env, side: Side, tick: i32) -> KnockoutPivot {
        storage::get_pivot(&env, &PivotKey { tick, side })
    }

    /// Knockout commitment and latest leaf at (`side`, `tick`)
    pub fn get_knockout_merkle(env: Env, side: Side, tick: i32) -> KnockoutMerkle {
        storage::get_merkle(&env, &PivotKey { tick, side })
    }

    /// Owner's stake in the epoch opened at `pivot_time`
    pub fn get_knockout_position(
        env: Env,
        owner: Address,
        side: Side,
        tick: i32,
        pivot_time: u64,
    ) -> KnockoutPosition {
        let key = KnockoutPosKey {
            owner,
            tick,
            side,
            pivot_time,
        };
        storage::get_knockout_position(&env, &key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::testutils::{Address as _, Ledger};
    use soroban_sdk::{vec, Address, Env};

    fn setup(env: &Env, jit_threshold: u64) -> (DexCoreClient<'_>, Address) {
        env.mock_all_auths();
        let contract_id = env.register(DexCore, ());
        let client = DexCoreClient::new(env, &contract_id);
        let admin = Address::generate(env);
        client.initialize(&admin, &jit_threshold, &1024u32);
        (client, admin)
    }

    fn zero_root(env: &Env) -> BytesN<32> {
        KnockoutMerkle::empty(env).root
    }

    // === Initialization Tests ===

    #[test]
    fn test_initialize() {
        let env = Env::default();
        let (client, admin) = setup(&env, 30);
        assert_eq!(
            client.get_config(),
            CoreConfig {
                admin,
                jit_threshold: 30,
                max_knockout_width: 1024,
            }
        );
    }

    #[test]
    fn test_initialize_twice_fails() {
        let env = Env::default();
        let (client, admin) = setup(&env, 0);
        assert_eq!(
            client.try_initialize(&admin, &0u64, &1024u32),
            Err(Ok(CoreError::AlreadyInitialized))
        );
    }

    #[test]
    fn test_initialize_rejects_bad_width() {
        let env = Env::default();
        let contract_id = env.register(DexCore, ());
        let client = DexCoreClient::new(&env, &contract_id);
        let admin = Address::generate(&env);
        assert_eq!(
            client.try_initialize(&admin, &0u64, &1000u32),
            Err(Ok(CoreError::InvalidGrid))
        );
        assert_eq!(
            client.try_initialize(&admin, &0u64, &(MAX_KNOCKOUT_WIDTH * 2)),
            Err(Ok(CoreError::InvalidGrid))
        );
        assert_eq!(
            client.try_initialize(&admin, &0u64, &0u32),
            Err(Ok(CoreError::InvalidGrid))
        );
    }

    #[test]
    fn test_calls_before_initialize_fail() {
        let env = Env::default();
        env.mock_all_auths();
        let contract_id = env.register(DexCore, ());
        let client = DexCoreClient::new(&env, &contract_id);
        assert_eq!(client.try_get_config(), Err(Ok(CoreError::NotInitialized)));
        assert_eq!(client.try_bookmark(&5), Err(Ok(CoreError::NotInitialized)));
    }

    #[test]
    fn test_mutations_require_admin_auth() {
        let env = Env::default();
        let (client, admin) = setup(&env, 0);
        client.bookmark(&5);
        let auths = env.auths();
        assert_eq!(auths.len(), 1);
        assert_eq!(auths[0].0, admin);
    }

    #[test]
    #[should_panic]
    fn test_mutations_fail_without_auth() {
        let env = Env::default();
        let contract_id = env.register(DexCore, ());
        let client = DexCoreClient::new(&env, &contract_id);
        client.initialize(&Address::generate(&env), &0u64, &1024u32);
        client.bookmark(&5);
    }

    // === Bitmap Tests ===

    #[test]
    fn test_bookmark_and_seek() {
        let env = Env::default();
        let (client, _) = setup(&env, 0);

        let tick = -120 * 65536 + 12 * 256 + 4;
        client.bookmark(&tick);
        assert_eq!(client.seek_buy(&tick), (tick, false));
        assert_eq!(client.seek_sell(&tick), (tick, false));
        assert_eq!(client.seek_buy(&(tick + 1)), (8_388_607, true));
        assert_eq!(client.seek_sell(&(tick - 1)), (-8_388_608, true));

        client.forget(&tick);
        assert_eq!(client.seek_buy(&tick), (8_388_607, true));
        assert_eq!(client.seek_sell(&tick), (-8_388_608, true));
    }

    #[test]
    fn test_bookmark_is_idempotent() {
        let env = Env::default();
        let (client, _) = setup(&env, 0);
        client.bookmark(&77);
        client.bookmark(&77);
        client.forget(&77);
        assert_eq!(client.seek_buy(&0), (8_388_607, true));
        client.forget(&77);
        assert_eq!(client.seek_sell(&100), (-8_388_608, true));
    }

    #[test]
    fn test_bookmark_out_of_range() {
        let env = Env::default();
        let (client, _) = setup(&env, 0);
        assert_eq!(
            client.try_bookmark(&8_388_608),
            Err(Ok(CoreError::TickOutOfRange))
        );
    }

    // === Position Ledger Tests ===

    #[test]
    fn test_position_lifecycle() {
        let env = Env::default();
        let (client, _) = setup(&env, 0);
        let owner = Address::generate(&env);

        client.add_position(&owner, &-100, &100, &250_000u128, &12_500u64);
        let position = client.add_position(&owner, &-100, &100, &175_000u128, &17_500u64);
        assert_eq!(position.liquidity, 425_000);
        // Weighted mean is 14558.82
        assert_eq!(position.fee_mileage, 14_558);
        assert_eq!(client.get_position(&owner, &-100, &100), position);

        let reward = client.burn_position(&owner, &-100, &100, &425_000u128, &14_558u64);
        assert_eq!(reward, 0);
        assert_eq!(client.get_position(&owner, &-100, &100), RangePosition::new());
    }

    #[test]
    fn test_burn_reward_is_monotonic() {
        let env = Env::default();
        let (client, _) = setup(&env, 0);
        let owner = Address::generate(&env);
        client.add_position(&owner, &0, &10, &1_000_000u128, &0u64);

        let mut last = 0;
        for step in 1..5u64 {
            let reward = client.burn_position(&owner, &0, &10, &1000u128, &(step << 40));
            assert!(reward >= last);
            last = reward;
        }
    }

    #[test]
    fn test_burn_position_errors() {
        let env = Env::default();
        env.ledger().set_timestamp(100);
        let (client, _) = setup(&env, 60);
        let owner = Address::generate(&env);
        client.add_position(&owner, &-100, &100, &500u128, &10u64);

        assert_eq!(
            client.try_burn_position(&owner, &-100, &100, &600u128, &10u64),
            Err(Ok(CoreError::InsufficientLiquidity))
        );
        assert_eq!(
            client.try_burn_position(&owner, &-100, &100, &100u128, &10u64),
            Err(Ok(CoreError::JitLocked))
        );
        env.ledger().set_timestamp(160);
        assert_eq!(
            client.try_burn_position(&owner, &-100, &100, &100u128, &5u64),
            Err(Ok(CoreError::StaleMileage))
        );
        assert_eq!(
            client.try_add_position(&owner, &100, &-100, &1u128, &10u64),
            Err(Ok(CoreError::InvalidRange))
        );
        assert_eq!(
            client.try_add_position(&owner, &-100, &100, &0u128, &10u64),
            Err(Ok(CoreError::InvalidAmount))
        );
    }

    #[test]
    fn test_reward_overflow_returns_error() {
        let env = Env::default();
        let (client, _) = setup(&env, 0);
        let owner = Address::generate(&env);
        client.add_position(&owner, &-100, &100, &(1u128 << 120), &0u64);

        assert_eq!(
            client.try_burn_position(&owner, &-100, &100, &(1u128 << 120), &(1u64 << 60)),
            Err(Ok(CoreError::LiquidityOverflow))
        );
        assert_eq!(
            client.try_harvest_position(&owner, &-100, &100, &(1u64 << 60)),
            Err(Ok(CoreError::LiquidityOverflow))
        );
        assert_eq!(client.get_position(&owner, &-100, &100).liquidity, 1u128 << 120);
    }

    #[test]
    fn test_harvest_position() {
        let env = Env::default();
        let (client, _) = setup(&env, 0);
        let owner = Address::generate(&env);
        client.add_position(&owner, &-10, &10, &2000u128, &0u64);

        assert_eq!(client.harvest_position(&owner, &-10, &10, &(1u64 << 47)), 1000);
        assert_eq!(client.harvest_position(&owner, &-10, &10, &(1u64 << 47)), 0);
    }

    #[test]
    fn test_transfer_position() {
        let env = Env::default();
        let (client, _) = setup(&env, 0);
        let alice = Address::generate(&env);
        let bob = Address::generate(&env);
        let moved = client.add_position(&alice, &-60, &60, &900u128, &4u64);

        client.transfer_position(&alice, &bob, &-60, &60);
        assert_eq!(client.get_position(&bob, &-60, &60), moved);
        assert!(client.get_position(&alice, &-60, &60).is_empty());

        client.add_position(&alice, &-60, &60, &1u128, &4u64);
        assert_eq!(
            client.try_transfer_position(&bob, &alice, &-60, &60),
            Err(Ok(CoreError::PositionCollision))
        );
    }

    #[test]
    fn test_ambient_positions() {
        let env = Env::default();
        let (client, _) = setup(&env, 0);
        let owner = Address::generate(&env);

        client.add_ambient(&owner, &1000u128);
        assert_eq!(client.burn_ambient(&owner, &250u128), 750);
        assert_eq!(client.get_ambient(&owner).seeds, 750);
        assert_eq!(
            client.try_burn_ambient(&owner, &751u128),
            Err(Ok(CoreError::InsufficientLiquidity))
        );
    }

    // === Knockout Tests ===

    #[test]
    fn test_knockout_mint_burn_round_trip() {
        let env = Env::default();
        let (client, _) = setup(&env, 0);
        let owner = Address::generate(&env);
        let loc = KnockoutLoc::new(128, 64, Side::Bid);

        let minted = client.mint_knockout(&owner, &loc, &10u128, &300, &false, &55u64);
        assert!(minted.fresh_pivot);
        assert_eq!(client.seek_knockout(&Side::Bid, &300, &false), (128, true));
        assert_eq!(client.get_pivot(&Side::Bid, &128).lots, 10);

        let burned = client.burn_knockout(&owner, &loc, &10u128, &55u64);
        assert_eq!(burned.lots, 10);
        assert_eq!(burned.reward, 0);
        assert!(burned.pivot_emptied);
        assert_eq!(
            client.seek_knockout(&Side::Bid, &300, &false),
            (-8_388_608, true)
        );
    }

    #[test]
    fn test_knockout_mint_validation() {
        let env = Env::default();
        let (client, _) = setup(&env, 0);
        let owner = Address::generate(&env);

        let off_grid = KnockoutLoc::new(96, 64, Side::Bid);
        assert_eq!(
            client.try_mint_knockout(&owner, &off_grid, &1u128, &300, &false, &0u64),
            Err(Ok(CoreError::InvalidGrid))
        );

        let loc = KnockoutLoc::new(128, 64, Side::Bid);
        assert_eq!(
            client.try_mint_knockout(&owner, &loc, &1u128, &150, &false, &0u64),
            Err(Ok(CoreError::CurveFlagMismatch))
        );
        assert_eq!(
            client.try_mint_knockout(&owner, &loc, &1u128, &150, &true, &0u64),
            Ok(Ok(KnockoutMint {
                pivot_time: 1,
                liquidity: 1 << 10,
                fresh_pivot: true,
            }))
        );
        assert_eq!(
            client.try_mint_knockout(&owner, &loc, &1u128, &100, &false, &0u64),
            Err(Ok(CoreError::WrongSideOfPrice))
        );
    }

    #[test]
    fn test_knockout_jit_lock() {
        let env = Env::default();
        env.ledger().set_timestamp(1_000);
        let (client, _) = setup(&env, 120);
        let owner = Address::generate(&env);
        let loc = KnockoutLoc::new(0, 64, Side::Ask);
        client.mint_knockout(&owner, &loc, &3u128, &-200, &false, &0u64);

        assert_eq!(
            client.try_burn_knockout(&owner, &loc, &3u128, &0u64),
            Err(Ok(CoreError::JitLocked))
        );
        env.ledger().set_timestamp(1_120);
        assert_eq!(client.burn_all_knockout(&owner, &loc, &0u64).lots, 3);
    }

    #[test]
    fn test_knockout_cross_and_claim() {
        let env = Env::default();
        env.ledger().set_timestamp(10);
        let (client, _) = setup(&env, 0);
        let owner = Address::generate(&env);
        let loc = KnockoutLoc::new(0, 64, Side::Bid);
        client.mint_knockout(&owner, &loc, &8u128, &100, &false, &0u64);

        assert!(client.cross_knockout(&loc, &(1u64 << 48)));
        assert!(!client.cross_knockout(&loc, &(1u64 << 48)));
        assert_eq!(
            client.try_burn_knockout(&owner, &loc, &1u128, &0u64),
            Err(Ok(CoreError::AlreadyKnockedOut))
        );

        let leaf = client.get_knockout_merkle(&Side::Bid, &0).last_leaf();
        assert_eq!(leaf.pivot_time, 10);

        let proof = vec![&env, leaf.clone()];
        let (base, quote) = client.claim_knockout(&owner, &loc, &zero_root(&env), &proof);
        assert!(base > 0);
        assert_eq!(quote, 0);

        assert_eq!(
            client.claim_knockout(&owner, &loc, &zero_root(&env), &vec![&env, leaf]),
            (0, 0)
        );
        assert_eq!(client.recover_knockout(&owner, &loc, &10u64), (0, 0));
    }

    #[test]
    fn test_knockout_claim_rejects_bad_proof() {
        let env = Env::default();
        let (client, _) = setup(&env, 0);
        let owner = Address::generate(&env);
        let loc = KnockoutLoc::new(0, 64, Side::Bid);
        client.mint_knockout(&owner, &loc, &8u128, &100, &false, &0u64);
        client.cross_knockout(&loc, &500u64);

        let mut leaf = client.get_knockout_merkle(&Side::Bid, &0).last_leaf();
        leaf.fee_mileage += 1;
        assert_eq!(
            client.try_claim_knockout(&owner, &loc, &zero_root(&env), &vec![&env, leaf]),
            Err(Ok(CoreError::InvalidProof))
        );
    }

    #[test]
    fn test_knockout_claim_empty_proof_is_noop() {
        let env = Env::default();
        let (client, _) = setup(&env, 0);
        let owner = Address::generate(&env);
        let loc = KnockoutLoc::new(0, 64, Side::Ask);
        assert_eq!(
            client.claim_knockout(&owner, &loc, &zero_root(&env), &Vec::new(&env)),
            (0, 0)
        );
    }

    #[test]
    fn test_knockout_recover() {
        let env = Env::default();
        env.ledger().set_timestamp(10);
        let (client, _) = setup(&env, 0);
        let owner = Address::generate(&env);
        let loc = KnockoutLoc::new(64, 64, Side::Ask);
        let minted = client.mint_knockout(&owner, &loc, &8u128, &-100, &false, &0u64);

        assert_eq!(
            client.try_recover_knockout(&owner, &loc, &minted.pivot_time),
            Err(Ok(CoreError::NotKnockedOut))
        );

        client.cross_knockout(&loc, &(1u64 << 48));
        let (base, quote) = client.recover_knockout(&owner, &loc, &minted.pivot_time);
        assert_eq!(base, 0);
        assert!(quote > 0);
        assert_eq!(client.recover_knockout(&owner, &loc, &minted.pivot_time), (0, 0));
        assert_eq!(
            client.get_knockout_position(&owner, &Side::Ask, &64, &minted.pivot_time),
            KnockoutPosition::default()
        );
    }
}
