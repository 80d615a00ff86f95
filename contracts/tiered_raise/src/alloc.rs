//! # Allocation Engine
//!
//! Pure computation of which tiers a purchase request lands on at a given
//! timestamp. No storage access, no side effects — callers pass snapshots of
//! the campaign's config, prices, and bought counters, so the same function
//! backs both the read-only `quote` entry point and `contribute`.
//!
//! ## Phase model
//!
//! Tier windows are consumed sequentially from campaign start, most scarce
//! first: Legendary owns `[0, Dl)`, Epic owns `[Dl, Dl + De)`, and Common is
//! the open-ended residual phase after that. During a tier's window, that
//! tier *and every less scarce tier* is purchasable; scarcer ("future") tiers
//! never are. Demand that exceeds a tier's remaining cap rolls forward into
//! the next, less scarce tier. Common is uncapped and absorbs any remainder.

use soroban_sdk::{panic_with_error, Env, Vec};

use crate::types::{FundraisingConfig, FundraisingState, Tier, TierPrices, TierQuote};
use crate::Error;

/// Compute the ordered `(tier, quantity)` allocation for a request of
/// `number` items at time `now`, and its total price.
///
/// The returned list is in descending scarcity order and omits zero-quantity
/// entries. Quantities never exceed `cap - bought` for capped tiers, so
/// applying the allocation cannot break the cap invariant.
///
/// Panics with `InvalidQuantity` when `number == 0`. Timestamps before
/// `start_time` quote as if the campaign had just opened.
pub fn determine_buy_amounts(
    env: &Env,
    config: &FundraisingConfig,
    prices: &TierPrices,
    state: &FundraisingState,
    number: u32,
    now: u64,
) -> (Vec<TierQuote>, i128) {
    if number == 0 {
        panic_with_error!(env, Error::InvalidQuantity);
    }

    let elapsed = now.saturating_sub(config.start_time);

    // Find the current phase tier: the first tier, in descending scarcity
    // order, whose cumulative window end lies beyond `elapsed`.
    let mut accumulated = 0u64;
    let mut phase: Option<Tier> = None;
    for tier in [Tier::Legendary, Tier::Epic] {
        accumulated += config.window_duration(tier);
        if elapsed < accumulated {
            phase = Some(tier);
            break;
        }
    }

    let mut allocations = Vec::new(env);

    // All scarce windows have lapsed: the entire request lands on Common,
    // which has no cap.
    let Some(phase) = phase else {
        allocations.push_back(TierQuote {
            tier: Tier::Common,
            amount: number,
        });
        return (allocations, number as i128 * prices.price(Tier::Common));
    };

    // Greedy fill from the phase tier down through Common.
    let mut remaining_request = number;
    let mut total_value: i128 = 0;
    for tier in Tier::DESCENDING {
        if tier > phase {
            continue;
        }
        let available = match config.cap(tier) {
            Some(cap) => cap - state.bought(tier),
            None => remaining_request,
        };
        let to_buy = remaining_request.min(available);
        if to_buy > 0 {
            total_value += to_buy as i128 * prices.price(tier);
            allocations.push_back(TierQuote {
                tier,
                amount: to_buy,
            });
            remaining_request -= to_buy;
        }
        if remaining_request == 0 {
            break;
        }
    }

    (allocations, total_value)
}
