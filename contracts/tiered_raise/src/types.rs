//! # Types
//!
//! Shared data structures for the tiered-raise protocol.
//!
//! ## Config / State split
//!
//! A fundraising campaign is stored as three separate ledger entries:
//!
//! - [`FundraisingConfig`] — written once at creation; never mutated. Carries
//!   the snapshot of the tier window durations taken from the registry at
//!   construction time, so later registry changes affect only new campaigns.
//! - [`TierPrices`] — mutable only while the campaign is in `Creation`.
//! - [`FundraisingState`] — the hot entry, rewritten on every contribution.
//!
//! The public API exposes the reconstructed [`Fundraising`] view.
//!
//! ## Status as a Finite-State Machine
//!
//! [`Status`] enforces a strict forward-only lifecycle:
//!
//! ```text
//! Creation ──► Open ──► Success
//!     │          └────► Failed
//!     └──► Cancelled
//! ```
//!
//! `Cancelled`, `Failed` and `Success` are terminal and sticky: once written
//! back to storage they are never recomputed. `Open` is derived from the
//! clock on every query and never stored.

use soroban_sdk::{contracttype, Address};

/// Scarcity class of a collectible. Discriminant order is scarcity order,
/// `Legendary` highest. `None` is the unset default and is never allocated.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Tier {
    None      = 0,
    Common    = 1,
    Epic      = 2,
    Legendary = 3,
}

impl Tier {
    /// Allocation order: most scarce first.
    pub const DESCENDING: [Tier; 3] = [Tier::Legendary, Tier::Epic, Tier::Common];
    /// Claim order: least scarce first.
    pub const ASCENDING: [Tier; 3] = [Tier::Common, Tier::Epic, Tier::Legendary];
}

/// Lifecycle status of a fundraising campaign.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Status {
    /// Before start time; the moderator may still edit prices or cancel.
    Creation,
    /// Between start and target time; contributions allowed.
    Open,
    /// Cancelled by the moderator while still in `Creation`. Terminal.
    Cancelled,
    /// Target time passed below the target amount. Terminal.
    Failed,
    /// Target time passed at or above the target amount. Terminal.
    Success,
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Cancelled | Status::Failed | Status::Success)
    }
}

/// Immutable campaign configuration, written once at creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundraisingConfig {
    pub id: u64,
    /// Identity that created the campaign, may cancel it, edit prices while
    /// in `Creation`, manage the whitelist, and claim the fund on success.
    pub moderator: Address,
    pub start_time: u64,
    /// `start_time + duration`.
    pub target_time: u64,
    /// Contribution value required for the campaign to succeed.
    pub target_amount: i128,
    /// Legendary window length, snapshotted from the registry at creation.
    pub legendary_duration: u64,
    /// Epic window length, snapshotted from the registry at creation.
    pub epic_duration: u64,
    pub legendary_cap: u32,
    pub epic_cap: u32,
}

impl FundraisingConfig {
    /// Window length for `tier` as baked into this campaign. `Common` has no
    /// configured window — it is the open-ended residual phase.
    pub fn window_duration(&self, tier: Tier) -> u64 {
        match tier {
            Tier::Legendary => self.legendary_duration,
            Tier::Epic => self.epic_duration,
            Tier::Common | Tier::None => 0,
        }
    }

    /// Purchase cap for `tier`; `None` means uncapped (`Common` absorbs
    /// unlimited demand).
    pub fn cap(&self, tier: Tier) -> Option<u32> {
        match tier {
            Tier::Legendary => Some(self.legendary_cap),
            Tier::Epic => Some(self.epic_cap),
            Tier::Common => None,
            Tier::None => Some(0),
        }
    }
}

/// Per-tier base prices. Mutable only while the campaign is in `Creation`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TierPrices {
    pub legendary: i128,
    pub epic: i128,
    pub common: i128,
}

impl TierPrices {
    pub fn price(&self, tier: Tier) -> i128 {
        match tier {
            Tier::Legendary => self.legendary,
            Tier::Epic => self.epic,
            Tier::Common => self.common,
            Tier::None => 0,
        }
    }

    /// Returns `false` when `tier` carries no price (`None`).
    pub fn set_price(&mut self, tier: Tier, price: i128) -> bool {
        match tier {
            Tier::Legendary => self.legendary = price,
            Tier::Epic => self.epic = price,
            Tier::Common => self.common = price,
            Tier::None => return false,
        }
        true
    }
}

/// Mutable campaign state, updated on every contribution.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundraisingState {
    pub status: Status,
    /// Total value contributed so far.
    pub total_contribution: i128,
    pub fund_claimed: bool,
    pub legendary_bought: u32,
    pub epic_bought: u32,
    pub common_bought: u32,
}

impl FundraisingState {
    pub fn bought(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Legendary => self.legendary_bought,
            Tier::Epic => self.epic_bought,
            Tier::Common => self.common_bought,
            Tier::None => 0,
        }
    }

    pub fn add_bought(&mut self, tier: Tier, amount: u32) {
        match tier {
            Tier::Legendary => self.legendary_bought += amount,
            Tier::Epic => self.epic_bought += amount,
            Tier::Common => self.common_bought += amount,
            Tier::None => {}
        }
    }
}

/// Per-user contribution ledger, scoped to one campaign.
///
/// Invariants maintained by the state machine:
/// - `legendary + epic + common == total_contribution`
/// - `claimed_count` is monotonic and `<= total_contribution`
/// - `refunded` and `claimed_count > 0` are mutually exclusive
/// - `full_claimed` implies `claimed_count == total_contribution`
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserState {
    pub legendary: u32,
    pub epic: u32,
    pub common: u32,
    /// Total value this user paid for its contributions.
    pub total_value: i128,
    /// Total item count across all tiers.
    pub total_contribution: u32,
    pub refunded: bool,
    pub full_claimed: bool,
    /// Claim cursor into the flattened per-tier sequence (ascending order).
    pub claimed_count: u32,
}

impl UserState {
    pub fn empty() -> Self {
        UserState {
            legendary: 0,
            epic: 0,
            common: 0,
            total_value: 0,
            total_contribution: 0,
            refunded: false,
            full_claimed: false,
            claimed_count: 0,
        }
    }

    pub fn contribution(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Legendary => self.legendary,
            Tier::Epic => self.epic,
            Tier::Common => self.common,
            Tier::None => 0,
        }
    }

    pub fn add_contribution(&mut self, tier: Tier, amount: u32) {
        match tier {
            Tier::Legendary => self.legendary += amount,
            Tier::Epic => self.epic += amount,
            Tier::Common => self.common += amount,
            Tier::None => return,
        }
        self.total_contribution += amount;
    }
}

/// One (tier, quantity) line of an allocation or a claim batch.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TierQuote {
    pub tier: Tier,
    pub amount: u32,
}

/// Result of a purchase preview: the ordered allocation and its total price.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PurchaseQuote {
    pub allocations: soroban_sdk::Vec<TierQuote>,
    pub total_value: i128,
}

/// Full view of a fundraising campaign.
///
/// Used as the public API return type; reconstructed internally from the
/// split `FundraisingConfig` + `TierPrices` + `FundraisingState` entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Fundraising {
    pub id: u64,
    pub moderator: Address,
    pub start_time: u64,
    pub target_time: u64,
    pub target_amount: i128,
    pub legendary_duration: u64,
    pub epic_duration: u64,
    pub legendary_cap: u32,
    pub epic_cap: u32,
    pub prices: TierPrices,
    pub status: Status,
    pub total_contribution: i128,
    pub fund_claimed: bool,
    pub legendary_bought: u32,
    pub epic_bought: u32,
    pub common_bought: u32,
}
