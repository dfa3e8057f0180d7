use soroban_sdk::{contractclient, Address, Env};

use crate::types::Settings;

/// Interface of the external account registry.
#[contractclient(name = "WhitelistClient")]
pub trait WhitelistRegistry {
    fn is_whitelisted(env: Env, account: Address) -> bool;
}

/// An auction whose whitelist is its own address accepts every account.
pub fn is_whitelisted(env: &Env, settings: &Settings, account: &Address) -> bool {
    if settings.whitelist == env.current_contract_address() {
        return true;
    }
    WhitelistClient::new(env, &settings.whitelist).is_whitelisted(account)
}
