//! # Role-Based Access Control
//!
//! Two roles exist at the registry level:
//!
//! - `Admin` — configures the tier registry (window durations, creation
//!   bounds) and grants/revokes roles. The first admin is set by `init`.
//! - `Moderator` — may create fundraising campaigns. Campaign-scoped
//!   moderation (cancel, prices, whitelist, fund claim) is keyed off the
//!   `moderator` address stored on the campaign itself, not a role.
//!
//! Role entries live under their own `RbacKey` in instance storage, separate
//! from `DataKey` in `storage.rs`.

use soroban_sdk::{contracttype, panic_with_error, Address, Env};

use crate::storage::bump_instance;
use crate::Error;

/// Registry-level roles.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Role {
    Admin,
    Moderator,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
enum RbacKey {
    Initialized,
    Role(Address),
}

/// Set the first admin. Must be called exactly once, from `init`.
pub fn init_admin(env: &Env, admin: &Address) {
    if env.storage().instance().has(&RbacKey::Initialized) {
        panic_with_error!(env, Error::AlreadyInitialized);
    }
    env.storage().instance().set(&RbacKey::Initialized, &true);
    env.storage()
        .instance()
        .set(&RbacKey::Role(admin.clone()), &Role::Admin);
    bump_instance(env);
}

/// Grant `role` to `target`. Only an admin may grant roles.
pub fn grant_role(env: &Env, caller: &Address, target: &Address, role: Role) {
    caller.require_auth();
    require_admin(env, caller);
    env.storage()
        .instance()
        .set(&RbacKey::Role(target.clone()), &role);
    bump_instance(env);
}

/// Revoke `target`'s role. Admins cannot be revoked this way; use
/// [`transfer_admin`] instead.
pub fn revoke_role(env: &Env, caller: &Address, target: &Address) {
    caller.require_auth();
    require_admin(env, caller);
    match role_of(env, target) {
        Some(Role::Admin) => panic_with_error!(env, Error::Unauthorized),
        Some(Role::Moderator) => {
            env.storage()
                .instance()
                .remove(&RbacKey::Role(target.clone()));
        }
        None => panic_with_error!(env, Error::RoleNotFound),
    }
}

/// Move the admin role from `current` to `new_admin`. `current` loses the
/// role immediately.
pub fn transfer_admin(env: &Env, current: &Address, new_admin: &Address) {
    current.require_auth();
    require_admin(env, current);
    env.storage()
        .instance()
        .remove(&RbacKey::Role(current.clone()));
    env.storage()
        .instance()
        .set(&RbacKey::Role(new_admin.clone()), &Role::Admin);
    bump_instance(env);
}

/// Return the role held by `address`, or `None`.
pub fn role_of(env: &Env, address: &Address) -> Option<Role> {
    env.storage().instance().get(&RbacKey::Role(address.clone()))
}

/// Return `true` if `address` holds exactly `role`.
pub fn has_role(env: &Env, address: &Address, role: Role) -> bool {
    role_of(env, address) == Some(role)
}

/// Panics with `Unauthorized` unless `address` is an admin.
pub fn require_admin(env: &Env, address: &Address) {
    if !has_role(env, address, Role::Admin) {
        panic_with_error!(env, Error::Unauthorized);
    }
}

/// Panics with `Unauthorized` unless `address` may create campaigns
/// (admin or moderator).
pub fn require_moderator(env: &Env, address: &Address) {
    match role_of(env, address) {
        Some(Role::Admin) | Some(Role::Moderator) => {}
        None => panic_with_error!(env, Error::Unauthorized),
    }
}
