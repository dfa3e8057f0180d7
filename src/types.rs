use soroban_sdk::{contracttype, Address, Symbol};

/// Identity of a token: issuing contract, symbol and decimal precision.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenDescriptor {
    pub contract: Address,
    pub symbol: Symbol,
    pub precision: u32,
}

/// Fixed-point quantity of a token. `amount` is scaled by `10^precision`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenQuantity {
    pub token: TokenDescriptor,
    pub amount: i128,
}

/// Auction configuration, written once by `init`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settings {
    /// Registry contract consulted before crediting a contribution.
    /// Pointing it at the auction contract itself disables the check.
    pub whitelist: Address,
    pub total_cycles: u64,
    /// Length of one cycle in seconds.
    pub cycle_duration: u64,
    /// Ledger timestamp at which cycle 0 opens.
    pub start_time: u64,
    /// Reward pool minted per closed cycle.
    pub distribution_quantity: TokenQuantity,
    pub accepted_token: TokenDescriptor,
}

/// Running totals for one cycle that received at least one contribution.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CycleAggregate {
    pub cycle_index: u64,
    pub total_contributed: i128,
    /// Distinct contributing accounts; also the length of the participant index.
    pub participants: u32,
    /// Participants not yet settled. The record is pruned when this reaches zero.
    pub unpaid: u32,
}

/// Position of the permissionless payout crank.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DistributionCursor {
    /// Position in the funded-cycle index.
    pub slot: u32,
    /// Next participant of that cycle.
    pub position: u32,
}

#[contracttype]
pub enum DataKey {
    /// Singleton configuration (instance storage).
    Settings,
    /// Aggregate for a cycle index.
    Cycle(u64),
    /// Amount credited to (account, cycle_index).
    Contribution(Address, u64),
    /// Maps (cycle_index, sequential_index) -> account, for crank enumeration.
    CycleParticipant(u64, u32),
    /// Next cycle index to scan when settling an account.
    ClaimCursor(Address),
    /// Maps (account, sequential_index) -> cycle_index, in contribution order.
    AccountCycle(Address, u32),
    /// Number of entries ever appended to an account's cycle index.
    AccountCycleCount(Address),
    /// First unsettled entry of an account's cycle index.
    ClaimIndex(Address),
    /// Maps sequential_index -> cycle_index for every cycle that received funds.
    FundedCycle(u32),
    /// Number of entries in the funded-cycle index.
    FundedCycleCount,
    /// Crank progress (instance storage).
    DistributionCursor,
}
