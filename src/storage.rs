//! Keyed storage access for the auction.
//!
//! Settings, the crank cursor and the funded-cycle count live in instance
//! storage. Per-cycle and
//! per-account records live in persistent storage and are removed once paid.

use soroban_sdk::{Address, Env};

use crate::types::{CycleAggregate, DataKey, DistributionCursor, Settings};
use crate::AuctionError;

const DAY_IN_LEDGERS: u32 = 17_280;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;
const INSTANCE_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;

pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn extend_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

// ── Settings ─────────────────────────────────────────────────

pub fn has_settings(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Settings)
}

pub fn load_settings(env: &Env) -> Result<Settings, AuctionError> {
    env.storage()
        .instance()
        .get(&DataKey::Settings)
        .ok_or(AuctionError::NotInitialized)
}

pub fn save_settings(env: &Env, settings: &Settings) {
    env.storage().instance().set(&DataKey::Settings, settings);
}

// ── Cycle aggregates ─────────────────────────────────────────

pub fn get_cycle(env: &Env, cycle: u64) -> Option<CycleAggregate> {
    env.storage().persistent().get(&DataKey::Cycle(cycle))
}

pub fn set_cycle(env: &Env, aggregate: &CycleAggregate) {
    let key = DataKey::Cycle(aggregate.cycle_index);
    env.storage().persistent().set(&key, aggregate);
    extend_persistent(env, &key);
}

/// Drop a fully paid cycle. Participant entries are removed one at a time
/// by the crank.
pub fn remove_cycle(env: &Env, aggregate: &CycleAggregate) {
    env.storage()
        .persistent()
        .remove(&DataKey::Cycle(aggregate.cycle_index));
}

pub fn get_participant(env: &Env, cycle: u64, position: u32) -> Option<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::CycleParticipant(cycle, position))
}

pub fn remove_participant(env: &Env, cycle: u64, position: u32) {
    env.storage()
        .persistent()
        .remove(&DataKey::CycleParticipant(cycle, position));
}

pub fn set_participant(env: &Env, cycle: u64, position: u32, account: &Address) {
    let key = DataKey::CycleParticipant(cycle, position);
    env.storage().persistent().set(&key, account);
    extend_persistent(env, &key);
}

// ── Contributions ────────────────────────────────────────────

pub fn get_contribution(env: &Env, account: &Address, cycle: u64) -> Option<i128> {
    env.storage()
        .persistent()
        .get(&DataKey::Contribution(account.clone(), cycle))
}

pub fn set_contribution(env: &Env, account: &Address, cycle: u64, amount: i128) {
    let key = DataKey::Contribution(account.clone(), cycle);
    env.storage().persistent().set(&key, &amount);
    extend_persistent(env, &key);
}

pub fn remove_contribution(env: &Env, account: &Address, cycle: u64) {
    env.storage()
        .persistent()
        .remove(&DataKey::Contribution(account.clone(), cycle));
}

// ── Claim cursors ────────────────────────────────────────────

/// Next cycle index to scan for `account` (0 if it never claimed).
pub fn get_claim_cursor(env: &Env, account: &Address) -> u64 {
    env.storage()
        .persistent()
        .get(&DataKey::ClaimCursor(account.clone()))
        .unwrap_or(0)
}

pub fn set_claim_cursor(env: &Env, account: &Address, next_cycle: u64) {
    let key = DataKey::ClaimCursor(account.clone());
    env.storage().persistent().set(&key, &next_cycle);
    extend_persistent(env, &key);
}

// ── Account cycle index ──────────────────────────────────────

pub fn get_account_cycle(env: &Env, account: &Address, index: u32) -> Option<u64> {
    env.storage()
        .persistent()
        .get(&DataKey::AccountCycle(account.clone(), index))
}

pub fn get_account_cycle_count(env: &Env, account: &Address) -> u32 {
    env.storage()
        .persistent()
        .get(&DataKey::AccountCycleCount(account.clone()))
        .unwrap_or(0)
}

/// Append `cycle` to the account's index. Cycles arrive in non-decreasing order.
pub fn push_account_cycle(env: &Env, account: &Address, cycle: u64) {
    let count = get_account_cycle_count(env, account);
    let key = DataKey::AccountCycle(account.clone(), count);
    env.storage().persistent().set(&key, &cycle);
    extend_persistent(env, &key);

    let count_key = DataKey::AccountCycleCount(account.clone());
    env.storage().persistent().set(&count_key, &(count + 1));
    extend_persistent(env, &count_key);
}

pub fn remove_account_cycle(env: &Env, account: &Address, index: u32) {
    env.storage()
        .persistent()
        .remove(&DataKey::AccountCycle(account.clone(), index));
}

pub fn get_claim_index(env: &Env, account: &Address) -> u32 {
    env.storage()
        .persistent()
        .get(&DataKey::ClaimIndex(account.clone()))
        .unwrap_or(0)
}

pub fn set_claim_index(env: &Env, account: &Address, index: u32) {
    let key = DataKey::ClaimIndex(account.clone());
    env.storage().persistent().set(&key, &index);
    extend_persistent(env, &key);
}

// ── Funded cycle index ───────────────────────────────────────

pub fn get_funded_cycle(env: &Env, slot: u32) -> Option<u64> {
    env.storage().persistent().get(&DataKey::FundedCycle(slot))
}

pub fn get_funded_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::FundedCycleCount)
        .unwrap_or(0)
}

pub fn push_funded_cycle(env: &Env, cycle: u64) {
    let count = get_funded_count(env);
    let key = DataKey::FundedCycle(count);
    env.storage().persistent().set(&key, &cycle);
    extend_persistent(env, &key);
    env.storage()
        .instance()
        .set(&DataKey::FundedCycleCount, &(count + 1));
}

pub fn remove_funded_cycle(env: &Env, slot: u32) {
    env.storage().persistent().remove(&DataKey::FundedCycle(slot));
}

// ── Crank cursor ─────────────────────────────────────────────

pub fn get_distribution_cursor(env: &Env) -> DistributionCursor {
    env.storage()
        .instance()
        .get(&DataKey::DistributionCursor)
        .unwrap_or_default()
}

pub fn set_distribution_cursor(env: &Env, cursor: &DistributionCursor) {
    env.storage()
        .instance()
        .set(&DataKey::DistributionCursor, cursor);
}
