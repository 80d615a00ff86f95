extern crate std;

use soroban_sdk::{testutils::Address as _, Address};

use collectible::Tier as ItemTier;

use crate::invariants::{assert_refund_claim_exclusive, assert_user_consistent};
use crate::test::{
    advance_to, create_campaign, give_tokens, setup, Ctx, DURATION, EPIC_WINDOW, LEGENDARY_WINDOW,
    START,
};
use crate::{Tier, TierQuote};

/// A buyer holding legendary 3, epic 5, common 8 in a campaign that will
/// succeed (target 35 == the purchase value).
fn successful_campaign_with_buyer(ctx: &Ctx) -> (u64, Address) {
    let id = create_campaign(ctx, 35);
    let buyer = Address::generate(&ctx.env);
    give_tokens(ctx, &buyer, 1_000);
    ctx.raise.add_to_whitelist(&ctx.moderator, &id, &buyer);

    advance_to(&ctx.env, START);
    ctx.raise.contribute(&id, &buyer, &16, &35);

    advance_to(&ctx.env, START + DURATION);
    (id, buyer)
}

// ── Fund claim ───────────────────────────────────────────────────────

#[test]
fn test_claim_fund_pays_moderator_once() {
    let ctx = setup();
    let (id, _buyer) = successful_campaign_with_buyer(&ctx);

    ctx.raise.claim_fund(&id);
    assert_eq!(ctx.token.balance(&ctx.moderator), 35);
    assert_eq!(ctx.token.balance(&ctx.raise.address), 0);
    assert!(ctx.raise.get_fundraising(&id).fund_claimed);
}

#[test]
#[should_panic(expected = "Error(Contract, #15)")]
fn test_claim_fund_twice_fails() {
    let ctx = setup();
    let (id, _buyer) = successful_campaign_with_buyer(&ctx);
    ctx.raise.claim_fund(&id);
    ctx.raise.claim_fund(&id);
}

#[test]
#[should_panic(expected = "Error(Contract, #13)")]
fn test_claim_fund_while_open_fails() {
    let ctx = setup();
    let id = create_campaign(&ctx, 100);
    advance_to(&ctx.env, START);
    ctx.raise.claim_fund(&id);
}

// ── Refunds ──────────────────────────────────────────────────────────

#[test]
fn test_refund_after_failure() {
    let ctx = setup();
    let id = create_campaign(&ctx, 1_000_000); // unreachable target
    let buyer = Address::generate(&ctx.env);
    give_tokens(&ctx, &buyer, 100);
    ctx.raise.add_to_whitelist(&ctx.moderator, &id, &buyer);

    advance_to(&ctx.env, START);
    ctx.raise.contribute(&id, &buyer, &1, &4); // one legendary, price 4
    assert_eq!(ctx.token.balance(&buyer), 96);

    advance_to(&ctx.env, START + DURATION);
    ctx.raise.refund(&id, &buyer);
    assert_eq!(ctx.token.balance(&buyer), 100);

    let user = ctx.raise.get_user_state(&id, &buyer);
    assert!(user.refunded);
    assert_refund_claim_exclusive(&user);
}

#[test]
#[should_panic(expected = "Error(Contract, #16)")]
fn test_refund_twice_fails() {
    let ctx = setup();
    let id = create_campaign(&ctx, 1_000_000);
    let buyer = Address::generate(&ctx.env);
    give_tokens(&ctx, &buyer, 100);

    advance_to(&ctx.env, START + LEGENDARY_WINDOW + EPIC_WINDOW);
    ctx.raise.contribute(&id, &buyer, &4, &4);

    advance_to(&ctx.env, START + DURATION);
    ctx.raise.refund(&id, &buyer);
    ctx.raise.refund(&id, &buyer);
}

#[test]
#[should_panic(expected = "Error(Contract, #17)")]
fn test_refund_without_contribution_fails() {
    let ctx = setup();
    let id = create_campaign(&ctx, 1_000_000);
    advance_to(&ctx.env, START + DURATION);
    let bystander = Address::generate(&ctx.env);
    ctx.raise.refund(&id, &bystander);
}

#[test]
#[should_panic(expected = "Error(Contract, #14)")]
fn test_refund_while_open_fails() {
    let ctx = setup();
    let id = create_campaign(&ctx, 1_000_000);
    let buyer = Address::generate(&ctx.env);
    give_tokens(&ctx, &buyer, 100);

    advance_to(&ctx.env, START + LEGENDARY_WINDOW + EPIC_WINDOW);
    ctx.raise.contribute(&id, &buyer, &4, &4);
    ctx.raise.refund(&id, &buyer);
}

#[test]
#[should_panic(expected = "Error(Contract, #14)")]
fn test_refund_on_success_fails() {
    let ctx = setup();
    let (id, buyer) = successful_campaign_with_buyer(&ctx);
    ctx.raise.refund(&id, &buyer);
}

// ── Item claims ──────────────────────────────────────────────────────

#[test]
fn test_claim_walks_ascending_scarcity() {
    let ctx = setup();
    let (id, buyer) = successful_campaign_with_buyer(&ctx);

    // The buyer holds common 8, epic 5, legendary 3. The first batch of 4
    // comes entirely out of commons.
    let claims = ctx.raise.claim_nft(&id, &buyer, &4);
    assert_eq!(claims.len(), 1);
    assert_eq!(
        claims.get(0).unwrap(),
        TierQuote {
            tier: Tier::Common,
            amount: 4
        }
    );

    // The next 6 finish the commons and start on epics.
    let claims = ctx.raise.claim_nft(&id, &buyer, &6);
    assert_eq!(claims.len(), 2);
    assert_eq!(
        claims.get(0).unwrap(),
        TierQuote {
            tier: Tier::Common,
            amount: 4
        }
    );
    assert_eq!(
        claims.get(1).unwrap(),
        TierQuote {
            tier: Tier::Epic,
            amount: 2
        }
    );

    let user = ctx.raise.get_user_state(&id, &buyer);
    assert_eq!(user.claimed_count, 10);
    assert!(!user.full_claimed);
    assert_user_consistent(&user);
}

#[test]
fn test_claim_all_mints_everything() {
    let ctx = setup();
    let (id, buyer) = successful_campaign_with_buyer(&ctx);

    let claims = ctx.raise.claim_all_nft(&id, &buyer);
    assert_eq!(claims.len(), 3);

    let user = ctx.raise.get_user_state(&id, &buyer);
    assert!(user.full_claimed);
    assert_eq!(user.claimed_count, 16);
    assert_user_consistent(&user);

    // The minting ledger holds the per-tier totals and owners.
    assert_eq!(ctx.collectible.total_minted(&ItemTier::Common), 8);
    assert_eq!(ctx.collectible.total_minted(&ItemTier::Epic), 5);
    assert_eq!(ctx.collectible.total_minted(&ItemTier::Legendary), 3);

    let first_common = (ItemTier::Common as u64) << 32;
    let first_legendary = (ItemTier::Legendary as u64) << 32;
    assert_eq!(ctx.collectible.owner_of(&first_common), buyer);
    assert_eq!(ctx.collectible.owner_of(&(first_legendary | 2)), buyer);
    assert_eq!(
        ctx.collectible.id_to_tier(&(first_legendary | 2)),
        ItemTier::Legendary
    );
}

#[test]
fn test_batched_claims_match_claim_all() {
    let ctx = setup();
    let (id, alice) = successful_campaign_with_buyer(&ctx);

    // Bob makes the identical purchase in a second, identical environment
    // so both ledgers start from the same shape.
    let ctx2 = setup();
    let (id2, bob) = successful_campaign_with_buyer(&ctx2);

    // Alice claims in uneven batches, Bob in one call.
    ctx.raise.claim_nft(&id, &alice, &4);
    ctx.raise.claim_nft(&id, &alice, &5);
    ctx.raise.claim_nft(&id, &alice, &7);
    ctx2.raise.claim_all_nft(&id2, &bob);

    let alice_state = ctx.raise.get_user_state(&id, &alice);
    let bob_state = ctx2.raise.get_user_state(&id2, &bob);
    assert_eq!(alice_state.claimed_count, bob_state.claimed_count);
    assert!(alice_state.full_claimed && bob_state.full_claimed);

    // Identical per-tier mint totals on both ledgers.
    for tier in [ItemTier::Common, ItemTier::Epic, ItemTier::Legendary] {
        assert_eq!(
            ctx.collectible.total_minted(&tier),
            ctx2.collectible.total_minted(&tier)
        );
    }
}

#[test]
fn test_claim_more_than_owned_claims_remainder() {
    let ctx = setup();
    let (id, buyer) = successful_campaign_with_buyer(&ctx);

    let claims = ctx.raise.claim_nft(&id, &buyer, &999);
    let mut total = 0u32;
    for claim in claims.iter() {
        total += claim.amount;
    }
    assert_eq!(total, 16);
    assert!(ctx.raise.get_user_state(&id, &buyer).full_claimed);
}

#[test]
#[should_panic(expected = "Error(Contract, #15)")]
fn test_claim_after_full_claim_fails() {
    let ctx = setup();
    let (id, buyer) = successful_campaign_with_buyer(&ctx);
    ctx.raise.claim_all_nft(&id, &buyer);
    ctx.raise.claim_nft(&id, &buyer, &1);
}

#[test]
#[should_panic(expected = "Error(Contract, #13)")]
fn test_claim_before_success_fails() {
    let ctx = setup();
    let id = create_campaign(&ctx, 100);
    advance_to(&ctx.env, START);
    let buyer = Address::generate(&ctx.env);
    ctx.raise.claim_nft(&id, &buyer, &1);
}

#[test]
#[should_panic(expected = "Error(Contract, #13)")]
fn test_claim_on_failed_campaign_fails() {
    let ctx = setup();
    let id = create_campaign(&ctx, 1_000_000);
    let buyer = Address::generate(&ctx.env);
    give_tokens(&ctx, &buyer, 100);

    advance_to(&ctx.env, START + LEGENDARY_WINDOW + EPIC_WINDOW);
    ctx.raise.contribute(&id, &buyer, &4, &4);

    advance_to(&ctx.env, START + DURATION);
    ctx.raise.claim_nft(&id, &buyer, &1);
}

#[test]
#[should_panic(expected = "Error(Contract, #10)")]
fn test_claim_zero_fails() {
    let ctx = setup();
    let (id, buyer) = successful_campaign_with_buyer(&ctx);
    ctx.raise.claim_nft(&id, &buyer, &0);
}
