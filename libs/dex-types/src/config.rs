use soroban_sdk::{contracttype, Address};

/// Core configuration - immutable after initialization
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CoreConfig {
    /// Orchestration contract allowed to drive the ledger
    pub admin: Address,
    /// Seconds a position must rest before it can be burned
    pub jit_threshold: u64,
    /// Widest knockout range accepted (power of two)
    pub max_knockout_width: u32,
}
