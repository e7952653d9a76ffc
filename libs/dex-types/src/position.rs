use soroban_sdk::{contracttype, Address};

/// Ranged position key
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionKey {
    pub owner: Address,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

/// Concentrated liquidity position in the ledger
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RangePosition {
    /// Liquidity in this position
    pub liquidity: u128,
    /// Fee mileage baseline (Q16.48) rewards are measured against
    pub fee_mileage: u64,
    /// Ledger timestamp of the last add
    pub timestamp: u64,
}

impl RangePosition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.liquidity == 0
    }
}

/// Full-range position. Rewards compound into the seeds, so no mileage is kept.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AmbientPosition {
    pub seeds: u128,
    /// Ledger timestamp of the last add
    pub timestamp: u64,
}
