//! Claim ledger: incremental payout of closed cycles.
//!
//! Every account keeps an index of the cycles it contributed to, in order,
//! and a position in that index. Settling walks the index from that
//! position, pays at most `limit` closed cycles, prunes the paid records and
//! moves the account's cursor past them. Closed cycles the account never
//! funded are never read. A paid contribution is removed, so an
//! (account, cycle) pair can only ever be summed into one payout.

use soroban_sdk::{token, Address, Env, Vec};

use crate::cycle::CycleClock;
use crate::distribution::pro_rata_share;
use crate::storage;
use crate::types::{CycleAggregate, DistributionCursor, Settings};
use crate::{AuctionError, EVENT_CRANK, EVENT_RECEIPT};

/// Cycles owed to one account, computed without writing storage.
pub struct Pending {
    pub payout: i128,
    pub cycles: Vec<CycleAggregate>,
    /// First and one-past-last entries of the account's cycle index consumed.
    pub first_index: u32,
    pub next_index: u32,
    /// Cursor value once these cycles are paid.
    pub next_cycle: u64,
}

/// Work out what settling `account` would pay, covering at most `limit`
/// contributed cycles.
///
/// When the limit stops the walk early, `next_cycle` is the first cycle left
/// unpaid, so the cursor never skips a contribution.
pub fn pending(
    env: &Env,
    settings: &Settings,
    account: &Address,
    now: u64,
    limit: u32,
) -> Result<Pending, AuctionError> {
    let closed = CycleClock::from_settings(settings).closed_cycles(now);
    let cursor = storage::get_claim_cursor(env, account);
    let first_index = storage::get_claim_index(env, account);
    let count = storage::get_account_cycle_count(env, account);
    let pool = settings.distribution_quantity.amount;

    let mut payout: i128 = 0;
    let mut cycles = Vec::new(env);
    let mut index = first_index;
    let mut next_cycle = core::cmp::max(cursor, closed);

    while index < count {
        let cycle =
            storage::get_account_cycle(env, account, index).ok_or(AuctionError::CycleNotFound)?;
        if cycle >= closed {
            break;
        }
        if cycles.len() >= limit {
            next_cycle = core::cmp::max(cursor, cycle);
            break;
        }
        index += 1;
        let Some(contributed) = storage::get_contribution(env, account, cycle) else {
            continue;
        };
        let aggregate = storage::get_cycle(env, cycle).ok_or(AuctionError::CycleNotFound)?;
        let share = pro_rata_share(pool, contributed, aggregate.total_contributed)?;
        payout = payout
            .checked_add(share)
            .ok_or(AuctionError::ArithmeticOverflow)?;
        cycles.push_back(aggregate);
    }

    Ok(Pending {
        payout,
        cycles,
        first_index,
        next_index: index,
        next_cycle,
    })
}

/// Pay `account` what is owed for up to `limit` closed cycles. Returns the
/// amount issued.
///
/// A zero payout is not an error: the cursor still advances and no token
/// call is made.
pub fn settle(
    env: &Env,
    settings: &Settings,
    account: &Address,
    now: u64,
    limit: u32,
) -> Result<i128, AuctionError> {
    let owed = pending(env, settings, account, now, limit)?;

    let mut paid_cycles = Vec::new(env);
    for mut aggregate in owed.cycles.iter() {
        storage::remove_contribution(env, account, aggregate.cycle_index);
        aggregate.unpaid = aggregate.unpaid.saturating_sub(1);
        if aggregate.unpaid == 0 {
            storage::remove_cycle(env, &aggregate);
        } else {
            storage::set_cycle(env, &aggregate);
        }
        paid_cycles.push_back(aggregate.cycle_index);
    }
    for index in owed.first_index..owed.next_index {
        storage::remove_account_cycle(env, account, index);
    }
    if owed.next_index != owed.first_index {
        storage::set_claim_index(env, account, owed.next_index);
    }
    storage::set_claim_cursor(env, account, owed.next_cycle);

    if owed.payout > 0 {
        token::StellarAssetClient::new(env, &settings.distribution_quantity.token.contract)
            .mint(account, &owed.payout);
    }

    if !paid_cycles.is_empty() {
        env.events().publish(
            (EVENT_RECEIPT, account.clone()),
            (owed.payout, paid_cycles),
        );
    }
    Ok(owed.payout)
}

/// Settle up to `count` accounts that still hold unpaid contributions in
/// closed cycles, oldest funded cycle first. Returns the number settled.
///
/// Each account is settled for its oldest unpaid cycle only. At most
/// `max_steps` index entries are visited per call and the cursor
/// reached is always saved, so repeated calls walk past runs with nothing
/// left to pay.
pub fn distribute(
    env: &Env,
    settings: &Settings,
    count: u32,
    max_steps: u32,
    now: u64,
) -> Result<u32, AuctionError> {
    let closed = CycleClock::from_settings(settings).closed_cycles(now);
    let funded = storage::get_funded_count(env);
    let mut cursor = storage::get_distribution_cursor(env);
    let mut settled: u32 = 0;
    let mut steps: u32 = 0;

    while settled < count && steps < max_steps && cursor.slot < funded {
        steps += 1;
        let Some(cycle) = storage::get_funded_cycle(env, cursor.slot) else {
            cursor = next_slot(&cursor);
            continue;
        };
        if cycle >= closed {
            break;
        }
        let Some(aggregate) = storage::get_cycle(env, cycle) else {
            // Fully paid and pruned.
            storage::remove_funded_cycle(env, cursor.slot);
            cursor = next_slot(&cursor);
            continue;
        };
        if cursor.position >= aggregate.participants {
            storage::remove_funded_cycle(env, cursor.slot);
            cursor = next_slot(&cursor);
            continue;
        }
        let participant = storage::get_participant(env, cycle, cursor.position);
        storage::remove_participant(env, cycle, cursor.position);
        cursor.position += 1;
        if let Some(account) = participant {
            if storage::get_contribution(env, &account, cycle).is_some() {
                // Earlier cycles are already settled, so this pays `cycle`.
                settle(env, settings, &account, now, 1)?;
                settled += 1;
            }
        }
    }

    storage::set_distribution_cursor(env, &cursor);
    env.events()
        .publish((EVENT_CRANK,), (settled, cursor.slot, cursor.position));
    Ok(settled)
}

fn next_slot(cursor: &DistributionCursor) -> DistributionCursor {
    DistributionCursor {
        slot: cursor.slot + 1,
        position: 0,
    }
}
