extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events},
    vec, Address, IntoVal, TryIntoVal,
};

use crate::events::{ContributionMade, FundraisingCreated, ItemsClaimed, WhitelistUpdated};
use crate::test::{advance_to, create_campaign, default_prices, give_tokens, setup, DURATION, START};
use crate::{Tier, TierQuote};

#[test]
fn test_created_event() {
    let ctx = setup();
    let fundraising = ctx.raise.create_fundraising(
        &ctx.moderator,
        &START,
        &DURATION,
        &200i128,
        &default_prices(),
        &3,
        &5,
    );

    let all_events = ctx.env.events().all();
    let last_event = all_events.last().expect("no events found");

    assert_eq!(last_event.0, ctx.raise.address);
    let expected_topics = vec![
        &ctx.env,
        symbol_short!("created").into_val(&ctx.env),
        fundraising.id.into_val(&ctx.env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: FundraisingCreated = last_event.2.try_into_val(&ctx.env).unwrap();
    assert_eq!(
        event_data,
        FundraisingCreated {
            fundraising_id: fundraising.id,
            moderator: ctx.moderator.clone(),
            start_time: START,
            target_time: START + DURATION,
            target_amount: 200,
        }
    );
}

#[test]
fn test_contribution_event_carries_allocation() {
    let ctx = setup();
    let id = create_campaign(&ctx, 100);
    let buyer = Address::generate(&ctx.env);
    give_tokens(&ctx, &buyer, 100);
    ctx.raise.add_to_whitelist(&ctx.moderator, &id, &buyer);

    advance_to(&ctx.env, START);
    ctx.raise.contribute(&id, &buyer, &4, &17);

    let all_events = ctx.env.events().all();
    let last_event = all_events.last().expect("no events found");

    let expected_topics = vec![
        &ctx.env,
        symbol_short!("contrib").into_val(&ctx.env),
        id.into_val(&ctx.env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ContributionMade = last_event.2.try_into_val(&ctx.env).unwrap();
    assert_eq!(event_data.contributor, buyer);
    assert_eq!(event_data.total_value, 15); // 3 legendary + 1 epic
    assert_eq!(
        event_data.allocations,
        vec![
            &ctx.env,
            TierQuote {
                tier: Tier::Legendary,
                amount: 3
            },
            TierQuote {
                tier: Tier::Epic,
                amount: 1
            },
        ]
    );
}

#[test]
fn test_whitelist_event() {
    let ctx = setup();
    let id = create_campaign(&ctx, 100);
    let account = Address::generate(&ctx.env);

    ctx.raise.add_to_whitelist(&ctx.moderator, &id, &account);

    let all_events = ctx.env.events().all();
    let last_event = all_events.last().expect("no events found");
    let event_data: WhitelistUpdated = last_event.2.try_into_val(&ctx.env).unwrap();
    assert_eq!(
        event_data,
        WhitelistUpdated {
            fundraising_id: id,
            account: account.clone(),
            added: true,
        }
    );

    ctx.raise.remove_from_whitelist(&ctx.moderator, &id, &account);
    let all_events = ctx.env.events().all();
    let event_data: WhitelistUpdated = all_events
        .last()
        .expect("no events found")
        .2
        .try_into_val(&ctx.env)
        .unwrap();
    assert!(!event_data.added);
}

#[test]
fn test_items_claimed_event_tracks_cursor() {
    let ctx = setup();
    let id = create_campaign(&ctx, 10);
    let buyer = Address::generate(&ctx.env);
    give_tokens(&ctx, &buyer, 100);

    advance_to(&ctx.env, START);
    ctx.raise.add_to_whitelist(&ctx.moderator, &id, &buyer);
    ctx.raise.contribute(&id, &buyer, &4, &17); // legendary 3, epic 1 = 15

    advance_to(&ctx.env, START + DURATION);
    ctx.raise.claim_nft(&id, &buyer, &2);

    let all_events = ctx.env.events().all();
    let last_event = all_events.last().expect("no events found");
    let event_data: ItemsClaimed = last_event.2.try_into_val(&ctx.env).unwrap();
    assert_eq!(event_data.owner, buyer);
    assert_eq!(event_data.claimed_count, 2);
    // Ascending scarcity: the lone epic is claimed before any legendary.
    assert_eq!(
        event_data.claims,
        vec![
            &ctx.env,
            TierQuote {
                tier: Tier::Epic,
                amount: 1
            },
            TierQuote {
                tier: Tier::Legendary,
                amount: 1
            },
        ]
    );
}
