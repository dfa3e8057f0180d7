#![no_std]
#![deny(unsafe_code)]
#![deny(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

//! Time-cycled token auction.
//!
//! Participants pay the accepted token into fixed-length cycles. When a
//! cycle closes its distribution pool is split pro rata over that cycle's
//! contributions and minted to participants as they claim. Cycle boundaries
//! are derived from the ledger timestamp on every call; nothing is scheduled.

use soroban_sdk::{
    contract, contracterror, contractimpl, symbol_short, token, Address, Env, Symbol,
};

mod accumulator;
mod claims;
mod cycle;
mod distribution;
mod storage;
mod types;
mod whitelist;

pub use cycle::{CycleClock, Phase};
pub use distribution::pro_rata_share;
pub use types::{
    CycleAggregate, DataKey, DistributionCursor, Settings, TokenDescriptor, TokenQuantity,
};
pub use whitelist::{WhitelistClient, WhitelistRegistry};

/// Contract error codes. Auth failures are signaled by host panic (require_auth).
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[repr(u32)]
pub enum AuctionError {
    /// `init` was already called.
    AlreadyInitialized = 1,
    /// Settings have not been written yet.
    NotInitialized = 2,
    /// Credited account is not on the whitelist.
    Unauthorized = 3,
    /// Deposited token does not match the accepted token (contract, symbol or precision).
    InvalidToken = 4,
    /// Deposit amount is zero or negative.
    ZeroQuantity = 5,
    /// All cycles have closed.
    AuctionEnded = 6,
    /// Ledger time is before `start_time`.
    AuctionNotStarted = 7,
    /// Zero cycles, zero cycle duration or a negative distribution pool.
    InvalidSettings = 8,
    /// A contribution points at a cycle with no aggregate.
    CycleNotFound = 9,
    /// A share, payout or running total does not fit in i128.
    ArithmeticOverflow = 10,
}

// ── Event symbols ────────────────────────────────────────────
const EVENT_INIT: Symbol = symbol_short!("init");
const EVENT_CONTRIBUTE: Symbol = symbol_short!("contrib");
pub(crate) const EVENT_RECEIPT: Symbol = symbol_short!("receipt");
pub(crate) const EVENT_CRANK: Symbol = symbol_short!("crank");

/// Bumped when storage layout or semantics change.
pub const CONTRACT_VERSION: u32 = 1;

/// Maximum number of contributed cycles paid by one `claim` call.
const MAX_CLAIM_CYCLES: u32 = 50;

/// Maximum number of accounts settled by one `distribute` call.
const MAX_DISTRIBUTE_BATCH: u32 = 25;

/// Maximum number of index entries one `distribute` call visits.
const MAX_DISTRIBUTE_STEPS: u32 = 100;

// ── Contract ─────────────────────────────────────────────────
#[contract]
pub struct CycleAuction;

#[contractimpl]
impl CycleAuction {
    fn validate_settings(settings: &Settings) -> Result<(), AuctionError> {
        if settings.total_cycles == 0
            || settings.cycle_duration == 0
            || settings.distribution_quantity.amount < 0
        {
            return Err(AuctionError::InvalidSettings);
        }
        Ok(())
    }

    /// Credit an admitted deposit and emit the contribution event.
    fn credit(
        env: &Env,
        account: Address,
        cycle: u64,
        amount: i128,
    ) -> Result<u64, AuctionError> {
        let aggregate = accumulator::record(env, &account, cycle, amount)?;
        env.events().publish(
            (EVENT_CONTRIBUTE, account),
            (cycle, amount, aggregate.total_contributed),
        );
        Ok(cycle)
    }

    /// Write the auction settings. Can only be called once.
    pub fn init(env: Env, settings: Settings) -> Result<(), AuctionError> {
        if storage::has_settings(&env) {
            return Err(AuctionError::AlreadyInitialized);
        }
        Self::validate_settings(&settings)?;

        storage::save_settings(&env, &settings);
        storage::extend_instance(&env);
        env.events().publish(
            (EVENT_INIT,),
            (
                settings.total_cycles,
                settings.cycle_duration,
                settings.start_time,
            ),
        );
        Ok(())
    }

    /// Pay `amount` of the accepted token into the current cycle.
    ///
    /// The tokens are pulled from `from`; the contribution is credited to
    /// `beneficiary` when given, otherwise to `from`. Returns the cycle index
    /// credited.
    pub fn contribute(
        env: Env,
        from: Address,
        token: TokenDescriptor,
        amount: i128,
        beneficiary: Option<Address>,
    ) -> Result<u64, AuctionError> {
        let settings = storage::load_settings(&env)?;
        from.require_auth();
        storage::extend_instance(&env);

        let account = beneficiary.unwrap_or_else(|| from.clone());
        let now = env.ledger().timestamp();
        let cycle = accumulator::admit(&env, &settings, &account, &token, amount, now)?;

        token::Client::new(&env, &token.contract).transfer(
            &from,
            &env.current_contract_address(),
            &amount,
        );
        Self::credit(&env, account, cycle, amount)
    }

    /// Deposit notification from a token ledger that has already moved
    /// `amount` from `from` to this contract.
    ///
    /// Only the token contract named in `token` can authorize this call.
    pub fn on_deposit(
        env: Env,
        from: Address,
        token: TokenDescriptor,
        amount: i128,
        beneficiary: Option<Address>,
    ) -> Result<u64, AuctionError> {
        let settings = storage::load_settings(&env)?;
        token.contract.require_auth();
        storage::extend_instance(&env);

        let account = beneficiary.unwrap_or(from);
        let now = env.ledger().timestamp();
        let cycle = accumulator::admit(&env, &settings, &account, &token, amount, now)?;
        Self::credit(&env, account, cycle, amount)
    }

    /// Claim the pro-rata share of closed cycles not yet paid to `account`,
    /// oldest first, up to `max_cycles` contributed cycles (0 = MAX_CLAIM_CYCLES).
    ///
    /// Returns the amount minted. Returns 0 without a token call when nothing
    /// is owed; a second claim before another cycle closes always returns 0.
    /// Cycles left over by the cap are paid by the next claim.
    pub fn claim(env: Env, account: Address, max_cycles: u32) -> Result<i128, AuctionError> {
        let settings = storage::load_settings(&env)?;
        account.require_auth();
        storage::extend_instance(&env);

        let effective = if max_cycles == 0 || max_cycles > MAX_CLAIM_CYCLES {
            MAX_CLAIM_CYCLES
        } else {
            max_cycles
        };
        let now = env.ledger().timestamp();
        claims::settle(&env, &settings, &account, now, effective)
    }

    /// Push payouts for up to `count` accounts (0 = MAX_DISTRIBUTE_BATCH).
    /// Anyone may call this; funds only ever go to the contributing account.
    pub fn distribute(env: Env, count: u32) -> Result<u32, AuctionError> {
        let settings = storage::load_settings(&env)?;
        storage::extend_instance(&env);

        let effective = if count == 0 || count > MAX_DISTRIBUTE_BATCH {
            MAX_DISTRIBUTE_BATCH
        } else {
            count
        };
        let now = env.ledger().timestamp();
        claims::distribute(&env, &settings, effective, MAX_DISTRIBUTE_STEPS, now)
    }

    // ── Views ────────────────────────────────────────────────

    pub fn get_settings(env: Env) -> Option<Settings> {
        storage::load_settings(&env).ok()
    }

    /// Active cycle index, clamped to the last cycle once the auction ends.
    pub fn current_cycle(env: Env) -> Result<u64, AuctionError> {
        let settings = storage::load_settings(&env)?;
        Ok(CycleClock::from_settings(&settings).active_index(env.ledger().timestamp()))
    }

    /// Timestamp at which the active cycle closes. Once the auction has
    /// ended this is the close of the last cycle.
    pub fn current_cycle_end(env: Env) -> Result<u64, AuctionError> {
        let settings = storage::load_settings(&env)?;
        let clock = CycleClock::from_settings(&settings);
        Ok(clock.cycle_end(clock.active_index(env.ledger().timestamp())))
    }

    pub fn is_ended(env: Env) -> Result<bool, AuctionError> {
        let settings = storage::load_settings(&env)?;
        let phase = CycleClock::from_settings(&settings).phase(env.ledger().timestamp());
        Ok(phase == Phase::Ended)
    }

    /// Aggregate for `cycle`. `None` if nobody contributed or it was fully paid out.
    pub fn get_cycle(env: Env, cycle: u64) -> Option<CycleAggregate> {
        storage::get_cycle(&env, cycle)
    }

    /// Unpaid contribution of `account` in `cycle` (0 once paid).
    pub fn get_contribution(env: Env, account: Address, cycle: u64) -> i128 {
        storage::get_contribution(&env, &account, cycle).unwrap_or(0)
    }

    /// Highest cycle index already settled for `account`.
    pub fn get_last_claimed(env: Env, account: Address) -> Option<u64> {
        storage::get_claim_cursor(&env, &account).checked_sub(1)
    }

    /// Preview what `claim` with the default cap would pay right now.
    pub fn get_claimable(env: Env, account: Address) -> Result<i128, AuctionError> {
        let settings = storage::load_settings(&env)?;
        let now = env.ledger().timestamp();
        let owed = claims::pending(&env, &settings, &account, now, MAX_CLAIM_CYCLES)?;
        Ok(owed.payout)
    }

    pub fn get_distribution_cursor(env: Env) -> DistributionCursor {
        storage::get_distribution_cursor(&env)
    }

    pub fn get_version(env: Env) -> u32 {
        let _ = env;
        CONTRACT_VERSION
    }
}

mod test_auth;
