//! # Storage
//!
//! Typed helpers over Soroban's two storage tiers.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key                   | Type      | Description                          |
//! |-----------------------|-----------|--------------------------------------|
//! | `Token`               | `Address` | Payment token (single asset)         |
//! | `NftContract`         | `Address` | Collectible minting ledger           |
//! | `FundraisingCount`    | `u64`     | Auto-increment campaign id counter   |
//! | `WindowDuration(t)`   | `u64`     | Registry window length per tier      |
//! | `MaxStartAhead`       | `u64`     | Creation bound: latest allowed start |
//! | `MaxDuration`         | `u64`     | Creation bound: longest campaign     |
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                   | Type                | Description                |
//! |-----------------------|---------------------|----------------------------|
//! | `Config(id)`          | `FundraisingConfig` | Immutable campaign config  |
//! | `Prices(id)`          | `TierPrices`        | Prices, mutable in Creation|
//! | `State(id)`           | `FundraisingState`  | Hot mutable campaign state |
//! | `User(id, addr)`      | `UserState`         | Per-contributor ledger     |
//! | `Whitelist(id, addr)` | `bool`              | Legendary purchase gate    |
//!
//! Contributions rewrite only `State` and one `User` entry, never the config
//! or the price table, which keeps the hot write path small.

use soroban_sdk::{contracttype, panic_with_error, Address, Env};

use crate::types::{FundraisingConfig, FundraisingState, Tier, TierPrices, UserState};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Creation bounds (seconds) ────────────────────────────────────────

/// Default for how far in the future a campaign may start: 30 days.
const DEFAULT_MAX_START_AHEAD: u64 = 30 * 86_400;

/// Default upper bound on campaign duration: 90 days.
const DEFAULT_MAX_DURATION: u64 = 90 * 86_400;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All contract storage keys except role entries, which live in
/// `RbacKey` inside `rbac.rs`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Payment token address (Instance).
    Token,
    /// Collectible minting ledger address (Instance).
    NftContract,
    /// Global auto-increment counter for campaign ids (Instance).
    FundraisingCount,
    /// Registry-level tier window duration (Instance).
    WindowDuration(Tier),
    /// Latest allowed `start_time - now` at creation (Instance).
    MaxStartAhead,
    /// Longest allowed campaign duration (Instance).
    MaxDuration,
    /// Immutable campaign configuration keyed by id (Persistent).
    Config(u64),
    /// Per-tier base prices keyed by id (Persistent).
    Prices(u64),
    /// Mutable campaign state keyed by id (Persistent).
    State(u64),
    /// Per-contributor ledger (Persistent).
    User(u64, Address),
    /// Legendary whitelist membership (Persistent).
    Whitelist(u64, Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
pub(crate) fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn set_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::Token, token);
    bump_instance(env);
}

/// Payment token address. Panics if the contract has not been initialised.
pub fn get_token(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .expect("token not set")
}

pub fn set_nft_contract(env: &Env, contract: &Address) {
    env.storage().instance().set(&DataKey::NftContract, contract);
    bump_instance(env);
}

/// Minting ledger address. Panics if the contract has not been initialised.
pub fn get_nft_contract(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::NftContract)
        .expect("nft contract not set")
}

/// Atomically reads, increments, and stores the campaign counter.
/// Returns the id to use for the *current* campaign (pre-increment value).
pub fn get_and_increment_fundraising_id(env: &Env) -> u64 {
    bump_instance(env);
    let current: u64 = env
        .storage()
        .instance()
        .get(&DataKey::FundraisingCount)
        .unwrap_or(0);
    env.storage()
        .instance()
        .set(&DataKey::FundraisingCount, &(current + 1));
    current
}

/// Number of campaigns created so far (also the next id).
pub fn fundraising_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::FundraisingCount)
        .unwrap_or(0)
}

/// Registry window duration for `tier`. `Common` has no configured window
/// (it is the residual phase) and `None` never opens; both read as 0.
pub fn window_duration(env: &Env, tier: Tier) -> u64 {
    match tier {
        Tier::Legendary | Tier::Epic => env
            .storage()
            .instance()
            .get(&DataKey::WindowDuration(tier))
            .unwrap_or(0),
        Tier::Common | Tier::None => 0,
    }
}

pub fn set_window_duration(env: &Env, tier: Tier, duration: u64) {
    env.storage()
        .instance()
        .set(&DataKey::WindowDuration(tier), &duration);
    bump_instance(env);
}

pub fn max_start_ahead(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::MaxStartAhead)
        .unwrap_or(DEFAULT_MAX_START_AHEAD)
}

pub fn set_max_start_ahead(env: &Env, value: u64) {
    env.storage().instance().set(&DataKey::MaxStartAhead, &value);
    bump_instance(env);
}

pub fn max_duration(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::MaxDuration)
        .unwrap_or(DEFAULT_MAX_DURATION)
}

pub fn set_max_duration(env: &Env, value: u64) {
    env.storage().instance().set(&DataKey::MaxDuration, &value);
    bump_instance(env);
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Save the config, prices, and initial state for a new campaign.
pub fn save_new_fundraising(
    env: &Env,
    config: &FundraisingConfig,
    prices: &TierPrices,
    state: &FundraisingState,
) {
    let config_key = DataKey::Config(config.id);
    let prices_key = DataKey::Prices(config.id);
    let state_key = DataKey::State(config.id);

    env.storage().persistent().set(&config_key, config);
    env.storage().persistent().set(&prices_key, prices);
    env.storage().persistent().set(&state_key, state);
    bump_persistent(env, &config_key);
    bump_persistent(env, &prices_key);
    bump_persistent(env, &state_key);
}

/// Load the immutable campaign configuration.
pub fn load_config(env: &Env, id: u64) -> FundraisingConfig {
    let key = DataKey::Config(id);
    let config: FundraisingConfig = match env.storage().persistent().get(&key) {
        Some(config) => config,
        None => panic_with_error!(env, Error::FundraisingNotFound),
    };
    bump_persistent(env, &key);
    config
}

pub fn load_prices(env: &Env, id: u64) -> TierPrices {
    let key = DataKey::Prices(id);
    let prices: TierPrices = match env.storage().persistent().get(&key) {
        Some(prices) => prices,
        None => panic_with_error!(env, Error::FundraisingNotFound),
    };
    bump_persistent(env, &key);
    prices
}

pub fn save_prices(env: &Env, id: u64, prices: &TierPrices) {
    let key = DataKey::Prices(id);
    env.storage().persistent().set(&key, prices);
    bump_persistent(env, &key);
}

pub fn load_state(env: &Env, id: u64) -> FundraisingState {
    let key = DataKey::State(id);
    let state: FundraisingState = match env.storage().persistent().get(&key) {
        Some(state) => state,
        None => panic_with_error!(env, Error::FundraisingNotFound),
    };
    bump_persistent(env, &key);
    state
}

/// Save only the mutable campaign state (the contribution hot path).
pub fn save_state(env: &Env, id: u64, state: &FundraisingState) {
    let key = DataKey::State(id);
    env.storage().persistent().set(&key, state);
    bump_persistent(env, &key);
}

/// Load a contributor's ledger entry, creating an empty one lazily.
pub fn load_user(env: &Env, id: u64, account: &Address) -> UserState {
    let key = DataKey::User(id, account.clone());
    match env.storage().persistent().get(&key) {
        Some(user) => {
            bump_persistent(env, &key);
            user
        }
        None => UserState::empty(),
    }
}

pub fn save_user(env: &Env, id: u64, account: &Address, user: &UserState) {
    let key = DataKey::User(id, account.clone());
    env.storage().persistent().set(&key, user);
    bump_persistent(env, &key);
}

pub fn is_whitelisted(env: &Env, id: u64, account: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::Whitelist(id, account.clone()))
        .unwrap_or(false)
}

pub fn add_to_whitelist(env: &Env, id: u64, account: &Address) {
    let key = DataKey::Whitelist(id, account.clone());
    env.storage().persistent().set(&key, &true);
    bump_persistent(env, &key);
}

pub fn remove_from_whitelist(env: &Env, id: u64, account: &Address) {
    env.storage()
        .persistent()
        .remove(&DataKey::Whitelist(id, account.clone()));
}
