//! # Collectible Minting Ledger
//!
//! Ownership ledger for tiered collectible items. The contract assigns
//! sequentially-indexed item ids per tier; an item id encodes its tier in the
//! high 32 bits so the tier is recoverable from the id alone:
//!
//! ```text
//! id = (tier as u64) << 32 | per_tier_index
//! ```
//!
//! Minting is restricted to a single minter address granted by the admin —
//! in production that is the deployed fundraising contract, which invokes
//! [`Collectible::mint`] cross-contract when contributors claim their items.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, panic_with_error, symbol_short, Address,
    Env, Vec,
};


const TIER_SHIFT: u64 = 32;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotAuthorized      = 2,
    ItemNotFound       = 3,
    InvalidQuantity    = 4,
    InvalidTier        = 5,
}

/// Scarcity class of an item. Discriminant order is scarcity order.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Tier {
    None      = 0,
    Common    = 1,
    Epic      = 2,
    Legendary = 3,
}

/// Contract storage keys.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Admin address, set once at init (Instance).
    Admin,
    /// Address allowed to mint (Instance).
    Minter,
    /// Next sequential index per tier (Instance).
    Supply(Tier),
    /// Item owner keyed by item id (Persistent).
    Owner(u64),
}

fn encode_id(tier: Tier, index: u32) -> u64 {
    ((tier as u64) << TIER_SHIFT) | index as u64
}

#[contract]
pub struct Collectible;

#[contractimpl]
impl Collectible {
    /// Initialise the ledger and set the admin.
    ///
    /// Must be called exactly once after deployment.
    pub fn init(env: Env, admin: Address) {
        if env.storage().instance().has(&DataKey::Admin) {
            panic_with_error!(&env, Error::AlreadyInitialized);
        }
        admin.require_auth();
        env.storage().instance().set(&DataKey::Admin, &admin);
    }

    /// Grant the minter capability to `minter`, replacing any previous one.
    pub fn set_minter(env: Env, minter: Address) {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .expect("not initialized");
        admin.require_auth();
        env.storage().instance().set(&DataKey::Minter, &minter);
    }

    /// Mint `count` new items of `tier` to `to`.
    ///
    /// Item ids are assigned from the tier's sequential index counter. Only
    /// the registered minter may call this; a contract invoking it directly
    /// authorizes as itself.
    pub fn mint(env: Env, to: Address, tier: Tier, count: u32) -> Vec<u64> {
        let minter: Address = env
            .storage()
            .instance()
            .get(&DataKey::Minter)
            .expect("minter not set");
        minter.require_auth();

        if tier == Tier::None {
            panic_with_error!(&env, Error::InvalidTier);
        }
        if count == 0 {
            panic_with_error!(&env, Error::InvalidQuantity);
        }

        let supply_key = DataKey::Supply(tier);
        let mut index: u32 = env.storage().instance().get(&supply_key).unwrap_or(0);

        let mut ids = Vec::new(&env);
        for _ in 0..count {
            let id = encode_id(tier, index);
            env.storage().persistent().set(&DataKey::Owner(id), &to);
            ids.push_back(id);
            index += 1;
        }
        env.storage().instance().set(&supply_key, &index);

        env.events()
            .publish((symbol_short!("minted"), tier), (to, ids.clone()));
        ids
    }

    /// Return the owner of item `id`. Panics if the item was never minted.
    pub fn owner_of(env: Env, id: u64) -> Address {
        match env.storage().persistent().get(&DataKey::Owner(id)) {
            Some(owner) => owner,
            None => panic_with_error!(&env, Error::ItemNotFound),
        }
    }

    /// Return `true` if item `id` has been minted.
    pub fn exists(env: Env, id: u64) -> bool {
        env.storage().persistent().has(&DataKey::Owner(id))
    }

    /// Recover the tier encoded in an item id.
    pub fn id_to_tier(env: Env, id: u64) -> Tier {
        match id >> TIER_SHIFT {
            1 => Tier::Common,
            2 => Tier::Epic,
            3 => Tier::Legendary,
            _ => panic_with_error!(&env, Error::ItemNotFound),
        }
    }

    /// Number of items minted so far for `tier`.
    pub fn total_minted(env: Env, tier: Tier) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::Supply(tier))
            .unwrap_or(0)
    }
}
