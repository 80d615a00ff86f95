//! # Events
//!
//! One `#[contracttype]` struct per observable event, published under a short
//! symbol topic together with the campaign id so subscribers can filter by
//! campaign without decoding the payload.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::types::{Tier, TierQuote};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundraisingCreated {
    pub fundraising_id: u64,
    pub moderator: Address,
    pub start_time: u64,
    pub target_time: u64,
    pub target_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundraisingCancelled {
    pub fundraising_id: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContributionMade {
    pub fundraising_id: u64,
    pub contributor: Address,
    /// The exact allocation charged, in descending scarcity order.
    pub allocations: Vec<TierQuote>,
    pub total_value: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RefundClaimed {
    pub fundraising_id: u64,
    pub contributor: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundClaimed {
    pub fundraising_id: u64,
    pub moderator: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ItemsClaimed {
    pub fundraising_id: u64,
    pub owner: Address,
    /// Items minted by this call, in ascending scarcity order.
    pub claims: Vec<TierQuote>,
    /// The owner's claim cursor after this call.
    pub claimed_count: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WhitelistUpdated {
    pub fundraising_id: u64,
    pub account: Address,
    pub added: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BasePriceUpdated {
    pub fundraising_id: u64,
    pub tier: Tier,
    pub price: i128,
}

/// Registry-level configuration change (window durations, creation bounds).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigUpdated {
    pub name: Symbol,
    pub value: u64,
}

pub fn fundraising_created(env: &Env, event: FundraisingCreated) {
    env.events()
        .publish((symbol_short!("created"), event.fundraising_id), event);
}

pub fn fundraising_cancelled(env: &Env, event: FundraisingCancelled) {
    env.events()
        .publish((symbol_short!("cancelled"), event.fundraising_id), event);
}

pub fn contribution_made(env: &Env, event: ContributionMade) {
    env.events()
        .publish((symbol_short!("contrib"), event.fundraising_id), event);
}

pub fn refund_claimed(env: &Env, event: RefundClaimed) {
    env.events()
        .publish((symbol_short!("refunded"), event.fundraising_id), event);
}

pub fn fund_claimed(env: &Env, event: FundClaimed) {
    env.events()
        .publish((symbol_short!("fundclaim"), event.fundraising_id), event);
}

pub fn items_claimed(env: &Env, event: ItemsClaimed) {
    env.events()
        .publish((symbol_short!("claimed"), event.fundraising_id), event);
}

pub fn whitelist_updated(env: &Env, event: WhitelistUpdated) {
    env.events()
        .publish((symbol_short!("whitelist"), event.fundraising_id), event);
}

pub fn base_price_updated(env: &Env, event: BasePriceUpdated) {
    env.events()
        .publish((symbol_short!("price"), event.fundraising_id), event);
}

pub fn config_updated(env: &Env, event: ConfigUpdated) {
    env.events()
        .publish((symbol_short!("config"), event.name.clone()), event);
}
