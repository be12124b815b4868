//! Property-based tests for the match engine.
//!
//! - Coin movements never overdraw and never create or destroy coins
//! - Exchanging roles twice restores both holders
//! - Nobody peeks or claims during the opening turns
//! - Every command the match offers is accepted

use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use masquerade_rs::testing::{RandomInput, Transcript};
use masquerade_rs::role::ROLE_VARIANTS;
use masquerade_rs::{CoinOwner, Command, ErrorKind, MatchBuilder, Player, Role, Swappable, TableCard};

const NAMES: [&str; 6] = ["alice", "bob", "carol", "dave", "erin", "frank"];
const ROLES: [&str; 12] = ["judge", "bishop", "king", "fool", "queen", "thief", "witch", "spy", "peasant", "cheat", "inquisitor", "widow"];

fn role_strategy() -> impl Strategy<Value = Role> {
    prop::sample::select(ROLE_VARIANTS.to_vec())
}

fn builder(num_players: usize) -> MatchBuilder {
    let mut builder = MatchBuilder::new();
    for name in &NAMES[..num_players] {
        builder.add_player(name).unwrap();
    }
    for role in ROLES {
        builder.add_role(role).unwrap();
    }
    builder
}

#[test]
fn prop_payment_is_clamped_and_conserved() {
    proptest!(|(payer_coins in 0u64..30, receiver_coins in 0u64..30, amount in 0u64..30)| {
        let mut payer = Player::new("alice", Role::King, payer_coins);
        let mut receiver = Player::new("bob", Role::Queen, receiver_coins);

        let paid = payer.pay(&mut receiver, amount);

        prop_assert_eq!(paid, amount.min(payer_coins));
        prop_assert_eq!(payer.coins(), payer_coins - paid);
        prop_assert_eq!(payer.coins() + receiver.coins(), payer_coins + receiver_coins);
    });
}

#[test]
fn prop_exchange_twice_restores_roles() {
    proptest!(|(mine in role_strategy(), theirs in role_strategy(), id in 0usize..4)| {
        let mut player = Player::new("alice", mine, 6);
        let mut card = TableCard::new(id, theirs);

        player.exchange(&mut card);
        prop_assert_eq!(player.role(), theirs);
        prop_assert_eq!(card.role(), mine);

        card.exchange(&mut player);
        prop_assert_eq!(player.role(), mine);
        prop_assert_eq!(card.role(), theirs);
    });
}

#[test]
fn prop_opening_turns_are_forced_swaps() {
    proptest!(|(seed in any::<u64>(), num_players in 2usize..=6)| {
        let mut rng = Pcg64::seed_from_u64(seed);
        let input = RandomInput::new(Pcg64::seed_from_u64(seed.wrapping_add(1)));
        let mut game = builder(num_players).build(&mut rng, Transcript::default(), input).unwrap();

        while game.turn() < 4 {
            let commands = game.commands();
            let all_swaps = commands.iter().all(|c| matches!(c, Command::Swap { .. }));
            prop_assert!(all_swaps);
            prop_assert_eq!(game.execute(Command::Peek).unwrap_err().kind(), ErrorKind::ForcedActionViolation);
            prop_assert_eq!(
                game.execute(Command::Claim("king".into())).unwrap_err().kind(),
                ErrorKind::ForcedActionViolation
            );

            let command = commands[rng.gen_range(0..commands.len())].clone();
            game.execute(command).unwrap();
        }
    });
}

#[test]
fn prop_offered_commands_are_accepted() {
    proptest!(ProptestConfig::with_cases(64), |(seed in any::<u64>(), num_players in 2usize..=6)| {
        let mut rng = Pcg64::seed_from_u64(seed);
        let input = RandomInput::new(Pcg64::seed_from_u64(seed.wrapping_add(1)));
        let mut game = builder(num_players).build(&mut rng, Transcript::default(), input).unwrap();

        for _ in 0..300 {
            if game.is_over() {
                prop_assert!(game.commands().is_empty());
                prop_assert!(!game.winners().is_empty());
                break;
            }

            let turn = game.turn();
            let commands = game.commands();
            prop_assert!(!commands.is_empty());

            let command = commands[rng.gen_range(0..commands.len())].clone();
            prop_assert!(game.execute(command.clone()).is_ok(), "{:?} was offered but rejected", command);
            prop_assert!(game.turn() == turn || game.turn() == turn + 1);
        }
    });
}
