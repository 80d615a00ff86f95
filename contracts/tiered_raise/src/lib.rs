//! # Tiered Raise Contract
//!
//! Phased, time-gated crowdfunding of tiered collectible mint rights. The
//! single contract `TieredRaise` owns the campaign registry and exposes the
//! full lifecycle:
//!
//! | Phase        | Entry Point(s)                                        |
//! |--------------|-------------------------------------------------------|
//! | Bootstrap    | [`TieredRaise::init`]                                 |
//! | Role admin   | `grant_role`, `revoke_role`, `transfer_admin`         |
//! | Registry     | `set_window_duration`, `set_max_start_ahead`, `set_max_duration` |
//! | Creation     | [`TieredRaise::create_fundraising`], `set_base_price`, `cancel`, whitelist ops |
//! | Open         | [`TieredRaise::contribute`], [`TieredRaise::quote`]   |
//! | Settlement   | `claim_fund`, `refund`, `claim_nft`, `claim_all_nft`  |
//! | Queries      | `get_fundraising`, `get_status`, `get_user_state`, …  |
//!
//! ## Architecture
//!
//! Authorization is delegated to [`rbac`], storage access to [`storage`],
//! and the purchase-splitting algorithm to [`alloc`]. This file contains the
//! entry points, the lazy status derivation, and event emissions.
//!
//! Every operation is atomic: each guard either passes or panics, reverting
//! the whole invocation. Outbound token transfers and cross-contract mint
//! calls happen only after all internal state has been written.

#![no_std]

use soroban_sdk::{
    contract, contractclient, contracterror, contractimpl, panic_with_error, symbol_short, token,
    Address, Env, Vec,
};

mod alloc;
mod events;
pub mod rbac;
mod storage;
mod types;

#[cfg(test)]
mod test_claims;
#[cfg(test)]
mod test_events;

pub use rbac::Role;
pub use types::{
    Fundraising, FundraisingConfig, FundraisingState, PurchaseQuote, Status, Tier, TierPrices,
    TierQuote, UserState,
};

/// Sentinel for "claim everything remaining".
const CLAIM_ALL: u32 = u32::MAX;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized       = 1,
    Unauthorized             = 2,
    RoleNotFound             = 3,
    FundraisingNotFound      = 4,
    StartTimeTooLate         = 5,
    DurationTooLong          = 6,
    InvalidMaxBuyAmount      = 7,
    NotInCreation            = 8,
    NotOpen                  = 9,
    InvalidQuantity          = 10,
    InsufficientValue        = 11,
    NotWhitelisted           = 12,
    FundraisingNotSuccessful = 13,
    FundraisingNotFailed     = 14,
    AlreadyClaimed           = 15,
    AlreadyRefunded          = 16,
    NoRefundAvailable        = 17,
    InvalidTier              = 18,
}

/// Client interface of the collectible minting ledger.
///
/// `mint` assigns `count` sequentially-indexed items of `tier` to `to` and
/// returns their ids; the tier is recoverable from each id alone.
#[contractclient(name = "MintClient")]
pub trait MintContract {
    fn mint(env: Env, to: Address, tier: Tier, count: u32) -> Vec<u64>;
}

#[contract]
pub struct TieredRaise;

#[contractimpl]
impl TieredRaise {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Initialise the registry: set the first admin, the payment token, and
    /// the collectible minting ledger address.
    ///
    /// Must be called exactly once after deployment. Subsequent calls panic
    /// with `Error::AlreadyInitialized`.
    pub fn init(env: Env, admin: Address, token: Address, nft_contract: Address) {
        admin.require_auth();
        rbac::init_admin(&env, &admin);
        storage::set_token(&env, &token);
        storage::set_nft_contract(&env, &nft_contract);
    }

    // ─────────────────────────────────────────────────────────
    // Role management
    // ─────────────────────────────────────────────────────────

    /// Grant `role` to `target`. `caller` must be the admin.
    pub fn grant_role(env: Env, caller: Address, target: Address, role: Role) {
        rbac::grant_role(&env, &caller, &target, role);
    }

    /// Revoke `target`'s role. Cannot revoke an admin; use `transfer_admin`.
    pub fn revoke_role(env: Env, caller: Address, target: Address) {
        rbac::revoke_role(&env, &caller, &target);
    }

    /// Transfer the admin role. The previous admin loses it immediately.
    pub fn transfer_admin(env: Env, current: Address, new_admin: Address) {
        rbac::transfer_admin(&env, &current, &new_admin);
    }

    /// Return the role held by `address`, or `None`.
    pub fn role_of(env: Env, address: Address) -> Option<Role> {
        rbac::role_of(&env, &address)
    }

    /// Return `true` if `address` holds `role`.
    pub fn has_role(env: Env, address: Address, role: Role) -> bool {
        rbac::has_role(&env, &address, role)
    }

    // ─────────────────────────────────────────────────────────
    // Tier registry
    // ─────────────────────────────────────────────────────────

    /// Set the registry window duration for `tier` (Legendary or Epic only).
    ///
    /// Takes effect for campaigns created afterwards; existing campaigns keep
    /// the durations snapshotted into their config at creation.
    pub fn set_window_duration(env: Env, caller: Address, tier: Tier, duration: u64) {
        caller.require_auth();
        rbac::require_admin(&env, &caller);
        if !matches!(tier, Tier::Legendary | Tier::Epic) {
            panic_with_error!(&env, Error::InvalidTier);
        }
        storage::set_window_duration(&env, tier, duration);
        events::config_updated(
            &env,
            events::ConfigUpdated {
                name: symbol_short!("window"),
                value: duration,
            },
        );
    }

    /// Registry window duration for `tier`. Common and None read as 0.
    pub fn window_duration(env: Env, tier: Tier) -> u64 {
        storage::window_duration(&env, tier)
    }

    /// Set how far in the future a campaign may start.
    pub fn set_max_start_ahead(env: Env, caller: Address, value: u64) {
        caller.require_auth();
        rbac::require_admin(&env, &caller);
        storage::set_max_start_ahead(&env, value);
        events::config_updated(
            &env,
            events::ConfigUpdated {
                name: symbol_short!("maxstart"),
                value,
            },
        );
    }

    /// Set the longest allowed campaign duration.
    pub fn set_max_duration(env: Env, caller: Address, value: u64) {
        caller.require_auth();
        rbac::require_admin(&env, &caller);
        storage::set_max_duration(&env, value);
        events::config_updated(
            &env,
            events::ConfigUpdated {
                name: symbol_short!("maxdur"),
                value,
            },
        );
    }

    // ─────────────────────────────────────────────────────────
    // Campaign creation and configuration
    // ─────────────────────────────────────────────────────────

    /// Create a new fundraising campaign.
    ///
    /// `moderator` must hold the `Moderator` (or `Admin`) role and becomes
    /// this campaign's moderator. The legendary and epic window durations are
    /// snapshotted from the registry. Common has no cap; both scarce-tier
    /// caps must be positive.
    pub fn create_fundraising(
        env: Env,
        moderator: Address,
        start_time: u64,
        duration: u64,
        target_amount: i128,
        prices: TierPrices,
        legendary_cap: u32,
        epic_cap: u32,
    ) -> Fundraising {
        moderator.require_auth();
        rbac::require_moderator(&env, &moderator);

        let now = env.ledger().timestamp();
        if start_time > now + storage::max_start_ahead(&env) {
            panic_with_error!(&env, Error::StartTimeTooLate);
        }
        if duration > storage::max_duration(&env) {
            panic_with_error!(&env, Error::DurationTooLong);
        }
        if legendary_cap == 0 || epic_cap == 0 {
            panic_with_error!(&env, Error::InvalidMaxBuyAmount);
        }

        let id = storage::get_and_increment_fundraising_id(&env);

        let config = FundraisingConfig {
            id,
            moderator: moderator.clone(),
            start_time,
            target_time: start_time + duration,
            target_amount,
            legendary_duration: storage::window_duration(&env, Tier::Legendary),
            epic_duration: storage::window_duration(&env, Tier::Epic),
            legendary_cap,
            epic_cap,
        };
        let state = FundraisingState {
            status: Status::Creation,
            total_contribution: 0,
            fund_claimed: false,
            legendary_bought: 0,
            epic_bought: 0,
            common_bought: 0,
        };
        storage::save_new_fundraising(&env, &config, &prices, &state);

        events::fundraising_created(
            &env,
            events::FundraisingCreated {
                fundraising_id: id,
                moderator,
                start_time,
                target_time: config.target_time,
                target_amount,
            },
        );
        compose(config, prices, state)
    }

    /// Update the base price of one tier. Only this campaign's moderator,
    /// only while the campaign is still in `Creation`.
    pub fn set_base_price(env: Env, caller: Address, fundraising_id: u64, tier: Tier, price: i128) {
        caller.require_auth();
        let config = storage::load_config(&env, fundraising_id);
        if caller != config.moderator {
            panic_with_error!(&env, Error::Unauthorized);
        }
        let mut state = storage::load_state(&env, fundraising_id);
        if resolve_status(&env, &config, &mut state) != Status::Creation {
            panic_with_error!(&env, Error::NotInCreation);
        }

        let mut prices = storage::load_prices(&env, fundraising_id);
        if !prices.set_price(tier, price) {
            panic_with_error!(&env, Error::InvalidTier);
        }
        storage::save_prices(&env, fundraising_id, &prices);

        events::base_price_updated(
            &env,
            events::BasePriceUpdated {
                fundraising_id,
                tier,
                price,
            },
        );
    }

    /// Cancel a campaign that has not yet opened. Terminal.
    pub fn cancel(env: Env, caller: Address, fundraising_id: u64) {
        caller.require_auth();
        let config = storage::load_config(&env, fundraising_id);
        if caller != config.moderator {
            panic_with_error!(&env, Error::Unauthorized);
        }
        let mut state = storage::load_state(&env, fundraising_id);
        if resolve_status(&env, &config, &mut state) != Status::Creation {
            panic_with_error!(&env, Error::NotInCreation);
        }

        state.status = Status::Cancelled;
        storage::save_state(&env, fundraising_id, &state);

        events::fundraising_cancelled(&env, events::FundraisingCancelled { fundraising_id });
    }

    /// Whitelist `account` for this campaign's legendary purchases.
    /// Only the moderator; callable in any phase.
    pub fn add_to_whitelist(env: Env, caller: Address, fundraising_id: u64, account: Address) {
        caller.require_auth();
        let config = storage::load_config(&env, fundraising_id);
        if caller != config.moderator {
            panic_with_error!(&env, Error::Unauthorized);
        }
        storage::add_to_whitelist(&env, fundraising_id, &account);
        events::whitelist_updated(
            &env,
            events::WhitelistUpdated {
                fundraising_id,
                account,
                added: true,
            },
        );
    }

    /// Remove `account` from this campaign's whitelist.
    pub fn remove_from_whitelist(env: Env, caller: Address, fundraising_id: u64, account: Address) {
        caller.require_auth();
        let config = storage::load_config(&env, fundraising_id);
        if caller != config.moderator {
            panic_with_error!(&env, Error::Unauthorized);
        }
        storage::remove_from_whitelist(&env, fundraising_id, &account);
        events::whitelist_updated(
            &env,
            events::WhitelistUpdated {
                fundraising_id,
                account,
                added: false,
            },
        );
    }

    pub fn is_whitelisted(env: Env, fundraising_id: u64, account: Address) -> bool {
        storage::is_whitelisted(&env, fundraising_id, &account)
    }

    // ─────────────────────────────────────────────────────────
    // Contribution
    // ─────────────────────────────────────────────────────────

    /// Preview the allocation a purchase of `number` items would get right
    /// now, without buying. Safe to call in any phase; the `Open` gate
    /// applies only to `contribute`.
    pub fn quote(env: Env, fundraising_id: u64, number: u32) -> PurchaseQuote {
        let config = storage::load_config(&env, fundraising_id);
        let prices = storage::load_prices(&env, fundraising_id);
        let state = storage::load_state(&env, fundraising_id);
        let (allocations, total_value) = alloc::determine_buy_amounts(
            &env,
            &config,
            &prices,
            &state,
            number,
            env.ledger().timestamp(),
        );
        PurchaseQuote {
            allocations,
            total_value,
        }
    }

    /// Buy `number` mint rights, paying `paid_value` of the payment token.
    ///
    /// The campaign must be `Open`. The allocation engine decides which tiers
    /// the purchase lands on; any legendary allocation requires the
    /// contributor to be whitelisted. `paid_value` must cover the computed
    /// total; the excess is returned to the contributor after all state is
    /// committed. Returns the allocation charged.
    pub fn contribute(
        env: Env,
        fundraising_id: u64,
        contributor: Address,
        number: u32,
        paid_value: i128,
    ) -> Vec<TierQuote> {
        contributor.require_auth();

        let config = storage::load_config(&env, fundraising_id);
        let mut state = storage::load_state(&env, fundraising_id);
        if resolve_status(&env, &config, &mut state) != Status::Open {
            panic_with_error!(&env, Error::NotOpen);
        }

        let prices = storage::load_prices(&env, fundraising_id);
        let (allocations, total_value) = alloc::determine_buy_amounts(
            &env,
            &config,
            &prices,
            &state,
            number,
            env.ledger().timestamp(),
        );
        if paid_value < total_value {
            panic_with_error!(&env, Error::InsufficientValue);
        }
        for quote in allocations.iter() {
            if quote.tier == Tier::Legendary
                && !storage::is_whitelisted(&env, fundraising_id, &contributor)
            {
                panic_with_error!(&env, Error::NotWhitelisted);
            }
        }

        // Pull the full payment in before touching the ledger entries.
        let token_client = token::Client::new(&env, &storage::get_token(&env));
        token_client.transfer(&contributor, &env.current_contract_address(), &paid_value);

        let mut user = storage::load_user(&env, fundraising_id, &contributor);
        for quote in allocations.iter() {
            user.add_contribution(quote.tier, quote.amount);
            state.add_bought(quote.tier, quote.amount);
        }
        user.total_value += total_value;
        state.total_contribution += total_value;
        storage::save_user(&env, fundraising_id, &contributor, &user);
        storage::save_state(&env, fundraising_id, &state);

        // Return the change last, once all state is committed.
        let change = paid_value - total_value;
        if change > 0 {
            token_client.transfer(&env.current_contract_address(), &contributor, &change);
        }

        events::contribution_made(
            &env,
            events::ContributionMade {
                fundraising_id,
                contributor,
                allocations: allocations.clone(),
                total_value,
            },
        );
        allocations
    }

    // ─────────────────────────────────────────────────────────
    // Settlement
    // ─────────────────────────────────────────────────────────

    /// Transfer the raised funds to the moderator. Requires `Success`;
    /// claimable once.
    pub fn claim_fund(env: Env, fundraising_id: u64) {
        let config = storage::load_config(&env, fundraising_id);
        config.moderator.require_auth();

        let mut state = storage::load_state(&env, fundraising_id);
        if resolve_status(&env, &config, &mut state) != Status::Success {
            panic_with_error!(&env, Error::FundraisingNotSuccessful);
        }
        if state.fund_claimed {
            panic_with_error!(&env, Error::AlreadyClaimed);
        }

        state.fund_claimed = true;
        storage::save_state(&env, fundraising_id, &state);

        let token_client = token::Client::new(&env, &storage::get_token(&env));
        token_client.transfer(
            &env.current_contract_address(),
            &config.moderator,
            &state.total_contribution,
        );

        events::fund_claimed(
            &env,
            events::FundClaimed {
                fundraising_id,
                moderator: config.moderator,
                amount: state.total_contribution,
            },
        );
    }

    /// Return a contributor's payment after a failed campaign. The refund is
    /// `sum(contribution[tier] * base_price[tier])`; claimable once.
    pub fn refund(env: Env, fundraising_id: u64, contributor: Address) {
        contributor.require_auth();

        let config = storage::load_config(&env, fundraising_id);
        let mut state = storage::load_state(&env, fundraising_id);
        if resolve_status(&env, &config, &mut state) != Status::Failed {
            panic_with_error!(&env, Error::FundraisingNotFailed);
        }

        let mut user = storage::load_user(&env, fundraising_id, &contributor);
        if user.refunded {
            panic_with_error!(&env, Error::AlreadyRefunded);
        }

        let prices = storage::load_prices(&env, fundraising_id);
        let mut amount: i128 = 0;
        for tier in Tier::DESCENDING {
            amount += user.contribution(tier) as i128 * prices.price(tier);
        }
        if amount == 0 {
            panic_with_error!(&env, Error::NoRefundAvailable);
        }

        user.refunded = true;
        storage::save_user(&env, fundraising_id, &contributor, &user);

        let token_client = token::Client::new(&env, &storage::get_token(&env));
        token_client.transfer(&env.current_contract_address(), &contributor, &amount);

        events::refund_claimed(
            &env,
            events::RefundClaimed {
                fundraising_id,
                contributor,
                amount,
            },
        );
    }

    /// Claim up to `amount` of the caller's purchased items as minted
    /// collectibles. Requires `Success`.
    ///
    /// Claims walk the owner's contributions in ascending scarcity order
    /// (Common first) with `claimed_count` as a resumable cursor, so partial
    /// claims across multiple calls mint exactly the same items as a single
    /// [`TieredRaise::claim_all_nft`]. Returns the `(tier, quantity)` batch
    /// minted by this call.
    pub fn claim_nft(env: Env, fundraising_id: u64, owner: Address, amount: u32) -> Vec<TierQuote> {
        claim_items(&env, fundraising_id, owner, amount)
    }

    /// Claim every remaining purchased item in one call.
    pub fn claim_all_nft(env: Env, fundraising_id: u64, owner: Address) -> Vec<TierQuote> {
        claim_items(&env, fundraising_id, owner, CLAIM_ALL)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    /// Full view of a campaign. Derives (and, when terminal, commits) the
    /// current status.
    pub fn get_fundraising(env: Env, fundraising_id: u64) -> Fundraising {
        let config = storage::load_config(&env, fundraising_id);
        let prices = storage::load_prices(&env, fundraising_id);
        let mut state = storage::load_state(&env, fundraising_id);
        state.status = resolve_status(&env, &config, &mut state);
        compose(config, prices, state)
    }

    /// Current campaign status, derived lazily; terminal values are sticky.
    pub fn get_status(env: Env, fundraising_id: u64) -> Status {
        let config = storage::load_config(&env, fundraising_id);
        let mut state = storage::load_state(&env, fundraising_id);
        resolve_status(&env, &config, &mut state)
    }

    /// A contributor's per-campaign ledger entry (empty if they never
    /// contributed).
    pub fn get_user_state(env: Env, fundraising_id: u64, account: Address) -> UserState {
        // Touch the config first so unknown campaigns fail loudly.
        storage::load_config(&env, fundraising_id);
        storage::load_user(&env, fundraising_id, &account)
    }

    /// Number of campaigns created so far.
    pub fn fundraising_count(env: Env) -> u64 {
        storage::fundraising_count(&env)
    }
}

/// Derive the campaign's current status and write it back when it has just
/// turned terminal. Cached terminal values are returned as-is and never
/// recomputed; `Open` and `Creation` are recomputed on every call.
fn resolve_status(env: &Env, config: &FundraisingConfig, state: &mut FundraisingState) -> Status {
    if state.status.is_terminal() {
        return state.status;
    }
    let now = env.ledger().timestamp();
    if now >= config.target_time {
        let status = if state.total_contribution >= config.target_amount {
            Status::Success
        } else {
            Status::Failed
        };
        state.status = status;
        storage::save_state(env, config.id, state);
        status
    } else if now >= config.start_time {
        Status::Open
    } else {
        Status::Creation
    }
}

/// The claim cursor walk shared by `claim_nft` and `claim_all_nft`.
fn claim_items(env: &Env, fundraising_id: u64, owner: Address, amount: u32) -> Vec<TierQuote> {
    owner.require_auth();

    let config = storage::load_config(env, fundraising_id);
    let mut state = storage::load_state(env, fundraising_id);
    if resolve_status(env, &config, &mut state) != Status::Success {
        panic_with_error!(env, Error::FundraisingNotSuccessful);
    }
    if amount == 0 {
        panic_with_error!(env, Error::InvalidQuantity);
    }

    let mut user = storage::load_user(env, fundraising_id, &owner);
    if user.refunded {
        panic_with_error!(env, Error::AlreadyRefunded);
    }
    if user.full_claimed {
        panic_with_error!(env, Error::AlreadyClaimed);
    }

    // Walk ascending scarcity with `claimed_count` as a cursor into the
    // flattened per-tier sequence [common..., epic..., legendary...].
    let mut remaining = amount;
    let mut cumulative = 0u32;
    let mut claims = Vec::new(env);
    for tier in Tier::ASCENDING {
        cumulative += user.contribution(tier);
        if remaining == 0 {
            break;
        }
        if user.claimed_count < cumulative {
            let available = cumulative - user.claimed_count;
            let take = remaining.min(available);
            claims.push_back(TierQuote { tier, amount: take });
            user.claimed_count += take;
            remaining -= take;
        }
    }

    if user.claimed_count == user.total_contribution {
        user.full_claimed = true;
    }
    storage::save_user(env, fundraising_id, &owner, &user);

    // Mint only after the cursor is committed.
    let mint = MintClient::new(env, &storage::get_nft_contract(env));
    for claim in claims.iter() {
        mint.mint(&owner, &claim.tier, &claim.amount);
    }

    events::items_claimed(
        env,
        events::ItemsClaimed {
            fundraising_id,
            owner,
            claims: claims.clone(),
            claimed_count: user.claimed_count,
        },
    );
    claims
}

/// Reconstruct the public [`Fundraising`] view from its storage entries.
fn compose(config: FundraisingConfig, prices: TierPrices, state: FundraisingState) -> Fundraising {
    Fundraising {
        id: config.id,
        moderator: config.moderator,
        start_time: config.start_time,
        target_time: config.target_time,
        target_amount: config.target_amount,
        legendary_duration: config.legendary_duration,
        epic_duration: config.epic_duration,
        legendary_cap: config.legendary_cap,
        epic_cap: config.epic_cap,
        prices,
        status: state.status,
        total_contribution: state.total_contribution,
        fund_claimed: state.fund_claimed,
        legendary_bought: state.legendary_bought,
        epic_bought: state.epic_bought,
        common_bought: state.common_bought,
    }
}
