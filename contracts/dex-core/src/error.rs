use soroban_sdk::contracterror;

/// Errors returned by the ledger core. Codes are stable.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum CoreError {
    /// `initialize` has not been called
    NotInitialized = 1,
    AlreadyInitialized = 2,
    /// Lower tick is not below the upper tick, or a tick is unaddressable
    InvalidRange = 3,
    /// Tick outside the range the operation can address
    TickOutOfRange = 4,
    /// Zero liquidity or lots where a positive amount is required
    InvalidAmount = 5,
    /// Burn exceeds the position's liquidity
    InsufficientLiquidity = 6,
    /// Transfer destination already holds a position
    PositionCollision = 7,
    LiquidityOverflow = 8,
    /// Mileage argument is behind the position's baseline
    StaleMileage = 9,
    /// Position is still inside its just-in-time lock window
    JitLocked = 10,
    /// Knockout width or tick is off the configured grid
    InvalidGrid = 11,
    /// On-curve flag disagrees with the range and the current price
    CurveFlagMismatch = 12,
    /// Knockout range is already past the price
    WrongSideOfPrice = 13,
    /// Burn exceeds the owner's knockout lots
    OverBurn = 14,
    /// Pivot has no active epoch
    AlreadyKnockedOut = 15,
    /// Epoch is still active and cannot be recovered
    NotKnockedOut = 16,
    /// Proof does not fold to the stored commitment
    InvalidProof = 17,
    /// Pivot lots would exceed 96 bits
    LotsOverflow = 18,
}
