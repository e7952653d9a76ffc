use soroban_sdk::{contracttype, Address, BytesN, Env};

/// Which side of the book a knockout order rests on
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    /// Range below the price, knocked out when price falls through its lower tick
    Bid,
    /// Range above the price, knocked out when price rises through its upper tick
    Ask,
}

/// Location of a knockout range. `tick` is the knockout boundary.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KnockoutLoc {
    pub tick: i32,
    pub width: u32,
    pub side: Side,
}

impl KnockoutLoc {
    pub fn new(tick: i32, width: u32, side: Side) -> Self {
        Self { tick, width, side }
    }

    /// Lower tick of the range
    pub fn lower(&self) -> i32 {
        match self.side {
            Side::Bid => self.tick,
            Side::Ask => self.tick - self.width as i32,
        }
    }

    /// Upper tick of the range
    pub fn upper(&self) -> i32 {
        match self.side {
            Side::Bid => self.tick + self.width as i32,
            Side::Ask => self.tick,
        }
    }

    pub fn pivot_key(&self) -> PivotKey {
        PivotKey {
            tick: self.tick,
            side: self.side,
        }
    }
}

/// Storage key of a pivot and its commitment
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PivotKey {
    pub tick: i32,
    pub side: Side,
}

/// Active knockout cohort at a tick/side. Removed when its epoch ends.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct KnockoutPivot {
    /// Outstanding lots in the active epoch
    pub lots: u128,
    /// Epoch timestamp; zero when inactive
    pub pivot_time: u64,
    /// Tick width of the range
    pub range: u32,
}

impl KnockoutPivot {
    pub fn is_active(&self) -> bool {
        self.lots > 0
    }
}

/// Cumulative commitment over every knockout at a pivot, plus the latest leaf.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KnockoutMerkle {
    pub root: BytesN<32>,
    /// Pivot time of the latest knocked out epoch
    pub pivot_time: u64,
    /// Fee mileage at the latest knockout
    pub fee_mileage: u64,
    /// Entropy folded into the latest leaf
    pub entropy: u64,
}

impl KnockoutMerkle {
    /// Commitment of a pivot that was never crossed
    pub fn empty(env: &Env) -> Self {
        Self {
            root: BytesN::from_array(env, &[0u8; 32]),
            pivot_time: 0,
            fee_mileage: 0,
            entropy: 0,
        }
    }

    /// The latest knockout as a proof leaf
    pub fn last_leaf(&self) -> KnockoutLeaf {
        KnockoutLeaf {
            entropy: self.entropy,
            pivot_time: self.pivot_time,
            fee_mileage: self.fee_mileage,
        }
    }
}

/// One knockout event as folded into the commitment
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KnockoutLeaf {
    pub entropy: u64,
    pub pivot_time: u64,
    pub fee_mileage: u64,
}

/// Knockout position key. Positions are per epoch.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KnockoutPosKey {
    pub owner: Address,
    pub tick: i32,
    pub side: Side,
    pub pivot_time: u64,
}

/// An owner's stake in one knockout epoch
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct KnockoutPosition {
    pub lots: u128,
    /// Fee mileage baseline (Q16.48)
    pub fee_mileage: u64,
    /// Tick width the position was minted with
    pub range: u32,
    /// Ledger timestamp of the last mint
    pub timestamp: u64,
}

/// Result of a knockout mint
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KnockoutMint {
    /// Epoch the lots were added to
    pub pivot_time: u64,
    /// Curve liquidity added (lots scaled by the lot size)
    pub liquidity: u128,
    /// True if this mint opened the epoch
    pub fresh_pivot: bool,
}

/// Result of a knockout burn
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KnockoutBurn {
    pub lots: u128,
    /// Curve liquidity removed
    pub liquidity: u128,
    /// Reward in liquidity units
    pub reward: u128,
    /// True if the burn closed the epoch
    pub pivot_emptied: bool,
}
