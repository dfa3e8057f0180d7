//! Per-cycle contribution accounting.

use soroban_sdk::{Address, Env};

use crate::cycle::{CycleClock, Phase};
use crate::storage;
use crate::types::{CycleAggregate, Settings, TokenDescriptor};
use crate::whitelist;
use crate::AuctionError;

/// Check a deposit against the settings and return the cycle it is credited to.
///
/// Performs no writes.
pub fn admit(
    env: &Env,
    settings: &Settings,
    account: &Address,
    token: &TokenDescriptor,
    amount: i128,
    now: u64,
) -> Result<u64, AuctionError> {
    if *token != settings.accepted_token {
        return Err(AuctionError::InvalidToken);
    }
    if amount <= 0 {
        return Err(AuctionError::ZeroQuantity);
    }
    let cycle = match CycleClock::from_settings(settings).phase(now) {
        Phase::NotStarted => return Err(AuctionError::AuctionNotStarted),
        Phase::Ended => return Err(AuctionError::AuctionEnded),
        Phase::Open(cycle) => cycle,
    };
    if !whitelist::is_whitelisted(env, settings, account) {
        return Err(AuctionError::Unauthorized);
    }
    Ok(cycle)
}

/// Add `amount` to the account's contribution and to the cycle total.
///
/// Repeated deposits in the same cycle accumulate. Both new values are
/// computed before anything is written.
pub fn record(
    env: &Env,
    account: &Address,
    cycle: u64,
    amount: i128,
) -> Result<CycleAggregate, AuctionError> {
    let previous = storage::get_contribution(env, account, cycle);
    let contribution = previous
        .unwrap_or(0)
        .checked_add(amount)
        .ok_or(AuctionError::ArithmeticOverflow)?;

    let existing = storage::get_cycle(env, cycle);
    let first_in_cycle = existing.is_none();
    let mut aggregate = existing.unwrap_or(CycleAggregate {
        cycle_index: cycle,
        total_contributed: 0,
        participants: 0,
        unpaid: 0,
    });
    aggregate.total_contributed = aggregate
        .total_contributed
        .checked_add(amount)
        .ok_or(AuctionError::ArithmeticOverflow)?;

    if first_in_cycle {
        storage::push_funded_cycle(env, cycle);
    }
    if previous.is_none() {
        storage::set_participant(env, cycle, aggregate.participants, account);
        storage::push_account_cycle(env, account, cycle);
        aggregate.participants += 1;
        aggregate.unpaid += 1;
    }

    storage::set_contribution(env, account, cycle, contribution);
    storage::set_cycle(env, &aggregate);
    Ok(aggregate)
}
