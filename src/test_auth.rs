#![cfg(test)]
use soroban_sdk::{
    contract, contractimpl, symbol_short,
    testutils::{Address as _, Ledger as _},
    token, Address, Env, Symbol,
};

use crate::{
    AuctionError, CycleAuction, CycleAuctionClient, Settings, TokenDescriptor, TokenQuantity,
    WhitelistClient, WhitelistRegistry,
};

const START: u64 = 1_000;
const CYCLE: u64 = 25;
const POOL: i128 = 1_000_000;

/// Minimal account registry standing in for the external whitelist.
#[contract]
pub struct MockWhitelist;

#[contractimpl]
impl MockWhitelist {
    pub fn add(env: Env, account: Address) {
        env.storage().persistent().set(&account, &true);
    }
}

#[contractimpl]
impl WhitelistRegistry for MockWhitelist {
    fn is_whitelisted(env: Env, account: Address) -> bool {
        env.storage().persistent().get(&account).unwrap_or(false)
    }
}

fn create_token(env: &Env, admin: &Address, symbol: Symbol) -> TokenDescriptor {
    let sac = env.register_stellar_asset_contract_v2(admin.clone());
    TokenDescriptor {
        contract: sac.address(),
        symbol,
        precision: 4,
    }
}

fn balance(env: &Env, token: &TokenDescriptor, who: &Address) -> i128 {
    token::Client::new(env, &token.contract).balance(who)
}

/// Register and initialize an auction without mocking any auth.
/// `whitelist` defaults to the auction itself (open auction).
fn init_auction(
    env: &Env,
    whitelist: Option<Address>,
) -> (CycleAuctionClient<'static>, Address, TokenDescriptor, TokenDescriptor) {
    env.ledger().set_timestamp(START);
    let contract_id = env.register_contract(None, CycleAuction);
    let client = CycleAuctionClient::new(env, &contract_id);
    let accepted = create_token(env, &Address::generate(env), symbol_short!("SYS"));
    let reward = create_token(env, &contract_id, symbol_short!("NEW"));
    client.init(&Settings {
        whitelist: whitelist.unwrap_or_else(|| contract_id.clone()),
        total_cycles: 10,
        cycle_duration: CYCLE,
        start_time: START,
        distribution_quantity: TokenQuantity {
            token: reward.clone(),
            amount: POOL,
        },
        accepted_token: accepted.clone(),
    });
    (client, contract_id, accepted, reward)
}

fn setup_whitelisted() -> (
    Env,
    CycleAuctionClient<'static>,
    MockWhitelistClient<'static>,
    TokenDescriptor,
) {
    let env = Env::default();
    env.mock_all_auths();
    let registry_id = env.register_contract(None, MockWhitelist);
    let registry = MockWhitelistClient::new(&env, &registry_id);
    let (client, _contract_id, accepted, _reward) = init_auction(&env, Some(registry_id));
    (env, client, registry, accepted)
}

fn funded_user(env: &Env, accepted: &TokenDescriptor) -> Address {
    let user = Address::generate(env);
    token::StellarAssetClient::new(env, &accepted.contract).mint(&user, &1_000_000);
    user
}

// ── require_auth ─────────────────────────────────────────────

#[test]
#[should_panic]
fn contribute_requires_payer_auth() {
    let env = Env::default(); // no mock_all_auths
    let (client, _id, accepted, _reward) = init_auction(&env, None);
    let user = Address::generate(&env);

    client.contribute(&user, &accepted, &100_000, &None);
}

#[test]
#[should_panic]
fn claim_requires_account_auth() {
    let env = Env::default(); // no mock_all_auths
    let (client, _id, _accepted, _reward) = init_auction(&env, None);
    let user = Address::generate(&env);

    client.claim(&user, &0);
}

#[test]
#[should_panic]
fn on_deposit_requires_token_contract_auth() {
    let env = Env::default(); // no mock_all_auths
    let (client, _id, accepted, _reward) = init_auction(&env, None);
    let user = Address::generate(&env);

    client.on_deposit(&user, &accepted, &100_000, &None);
}

#[test]
fn claim_is_authorized_by_the_claimant() {
    let env = Env::default();
    env.mock_all_auths();
    let (client, _id, accepted, _reward) = init_auction(&env, None);
    let user = funded_user(&env, &accepted);
    client.contribute(&user, &accepted, &100_000, &None);
    env.ledger().set_timestamp(START + CYCLE);

    client.claim(&user, &0);
    assert!(env.auths().iter().any(|(address, _)| *address == user));
}

#[test]
fn distribute_pays_without_a_claim() {
    let env = Env::default();
    env.mock_all_auths();
    let (client, _id, accepted, reward) = init_auction(&env, None);
    let user = funded_user(&env, &accepted);
    client.contribute(&user, &accepted, &100_000, &None);
    env.ledger().set_timestamp(START + CYCLE);

    assert_eq!(client.distribute(&0), 1);
    assert_eq!(balance(&env, &reward, &user), POOL);
}

// ── deposit notification hook ────────────────────────────────

#[test]
fn on_deposit_credits_without_pulling_tokens() {
    let env = Env::default();
    env.mock_all_auths();
    let (client, contract_id, accepted, _reward) = init_auction(&env, None);
    let user = Address::generate(&env);

    let cycle = client.on_deposit(&user, &accepted, &100_000, &None);

    assert_eq!(cycle, 0);
    assert_eq!(client.get_contribution(&user, &0), 100_000);
    assert_eq!(balance(&env, &accepted, &contract_id), 0);
}

#[test]
fn on_deposit_and_contribute_share_the_cycle_total() {
    let env = Env::default();
    env.mock_all_auths();
    let (client, _id, accepted, _reward) = init_auction(&env, None);
    let user1 = funded_user(&env, &accepted);
    let user2 = Address::generate(&env);

    client.contribute(&user1, &accepted, &100_000, &None);
    client.on_deposit(&user2, &accepted, &300_000, &None);
    env.ledger().set_timestamp(START + CYCLE);

    assert_eq!(client.claim(&user1, &0), 250_000);
    assert_eq!(client.claim(&user2, &0), 750_000);
}

#[test]
fn on_deposit_rejects_foreign_token() {
    let env = Env::default();
    env.mock_all_auths();
    let (client, _id, accepted, _reward) = init_auction(&env, None);
    let user = Address::generate(&env);
    let foreign = create_token(&env, &Address::generate(&env), accepted.symbol.clone());

    assert_eq!(
        client.try_on_deposit(&user, &foreign, &100_000, &None),
        Err(Ok(AuctionError::InvalidToken))
    );
    assert!(client.get_cycle(&0).is_none());
}

#[test]
fn on_deposit_after_end_fails() {
    let env = Env::default();
    env.mock_all_auths();
    let (client, _id, accepted, _reward) = init_auction(&env, None);
    let user = Address::generate(&env);
    env.ledger().set_timestamp(START + 10 * CYCLE);

    assert_eq!(
        client.try_on_deposit(&user, &accepted, &100_000, &None),
        Err(Ok(AuctionError::AuctionEnded))
    );
}

// ── whitelist ────────────────────────────────────────────────

#[test]
fn unlisted_account_cannot_contribute() {
    let (env, client, _registry, accepted) = setup_whitelisted();
    let user = funded_user(&env, &accepted);

    assert_eq!(
        client.try_contribute(&user, &accepted, &100_000, &None),
        Err(Ok(AuctionError::Unauthorized))
    );
    assert_eq!(balance(&env, &accepted, &user), 1_000_000);
    assert!(client.get_cycle(&0).is_none());
}

#[test]
fn listed_account_can_contribute() {
    let (env, client, registry, accepted) = setup_whitelisted();
    let user = funded_user(&env, &accepted);
    registry.add(&user);

    client.contribute(&user, &accepted, &100_000, &None);
    assert_eq!(client.get_contribution(&user, &0), 100_000);
}

#[test]
fn whitelist_applies_to_beneficiary() {
    let (env, client, registry, accepted) = setup_whitelisted();
    let payer = funded_user(&env, &accepted);
    let beneficiary = Address::generate(&env);
    registry.add(&payer);

    assert_eq!(
        client.try_contribute(&payer, &accepted, &100_000, &Some(beneficiary.clone())),
        Err(Ok(AuctionError::Unauthorized))
    );

    registry.add(&beneficiary);
    client.contribute(&payer, &accepted, &100_000, &Some(beneficiary.clone()));
    assert_eq!(client.get_contribution(&beneficiary, &0), 100_000);
}

#[test]
fn registry_answers_through_the_whitelist_client() {
    let (env, _client, registry, _accepted) = setup_whitelisted();
    let user = Address::generate(&env);
    let whitelist = WhitelistClient::new(&env, &registry.address);

    assert!(!whitelist.is_whitelisted(&user));
    registry.add(&user);
    assert!(whitelist.is_whitelisted(&user));
}

#[test]
fn whitelist_checked_on_deposit_hook() {
    let (env, client, registry, accepted) = setup_whitelisted();
    let user = Address::generate(&env);

    assert_eq!(
        client.try_on_deposit(&user, &accepted, &100_000, &None),
        Err(Ok(AuctionError::Unauthorized))
    );
    registry.add(&user);
    assert_eq!(client.on_deposit(&user, &accepted, &100_000, &None), 0);
}
