//! Whole matches driven through the public API.

use std::io::Cursor;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use masquerade_rs::testing::{RandomInput, ScriptedInput, Transcript};
use masquerade_rs::{CoinOwner, ErrorKind, Event, LineInput, MatchBuilder, Phase, Role, Rules, Swappable, Victory};

const NAMES: [&str; 6] = ["alice", "bob", "carol", "dave", "erin", "frank"];

fn builder(num_players: usize, roles: &[&str]) -> MatchBuilder {
    let mut builder = MatchBuilder::new();
    for name in &NAMES[..num_players] {
        builder.add_player(name).unwrap();
    }
    for role in roles {
        builder.add_role(role).unwrap();
    }
    builder
}

/// Two kings take turns claiming until the first seat reaches the target.
#[test]
fn test_match_from_typed_lines() {
    let mut script = String::new();
    for _ in 0..4 {
        script.push_str("swap #0 no\n");
    }
    script.push_str("dance\n");
    for _ in 0..5 {
        script.push_str("claim king\npass\n");
    }

    let builder = builder(2, &["king", "queen", "judge"]);
    let mut rng = Pcg64::seed_from_u64(42);
    let mut game = builder
        .build(&mut rng, Transcript::default(), LineInput::new(Cursor::new(script)))
        .unwrap();
    let first = game.players()[0].name();

    while let Some(tokens) = game.input_mut().next_line() {
        if game.submit(&tokens).is_err() {
            assert_eq!(tokens, vec!["dance"]);
        }
    }

    assert_eq!(game.phase(), Phase::GameOver);
    assert_eq!(game.victory(), Some(&Victory::TargetReached { winners: vec![first.clone()] }));
    assert_eq!(game.player_named(&first).unwrap().coins(), 15);
    assert_eq!(game.turn(), 9);
    assert_eq!(game.notifier().rejections(&first), 1);
}

/// Running out of input while a power waits for an answer ends the match.
#[test]
fn test_closed_input_ends_the_match() {
    let rules = Rules::from_json(r#"{ "opening_swap_turns": 0 }"#).unwrap();
    let mut builder = builder(2, &["fool", "king", "queen"]);
    builder.rules(rules);

    let mut rng = Pcg64::seed_from_u64(11);
    let mut game = builder
        .build(&mut rng, Transcript::default(), LineInput::new(Cursor::new("")))
        .unwrap();
    let claimant = game.active_player().name();

    game.submit(&["claim", "fool"]).unwrap();
    game.submit(&["pass"]).unwrap();

    assert!(game.is_over());
    assert!(game.winners().is_empty());
    assert_eq!(game.notifier().rejections(&claimant), 0);
    assert!(game.notifier().was_announced(&Event::Abandoned { turn: 0 }));
    assert_eq!(game.submit(&["pass"]).unwrap_err().kind(), ErrorKind::PhaseViolation);
}

#[test]
fn test_opening_turns_are_swaps_for_everyone() {
    for num_players in 2..=6 {
        let builder = builder(num_players, &["judge", "bishop", "king", "queen", "thief", "witch"]);
        let mut rng = Pcg64::seed_from_u64(num_players as u64);
        let mut game = builder.build(&mut rng, Transcript::default(), ScriptedInput::default()).unwrap();

        for turn in 0..4 {
            assert_eq!(game.turn(), turn);
            assert_eq!(game.submit(&["claim", "king"]).unwrap_err().kind(), ErrorKind::ForcedActionViolation);
            let target = game.table_cards().first().map(|card| card.name()).unwrap_or_else(|| {
                let active = game.active_player().name();
                game.players().iter().map(|p| p.name()).find(|name| *name != active).unwrap()
            });
            game.submit(&["swap", target.as_str(), "yes"]).unwrap();
        }

        assert!(game.commands().iter().any(|c| matches!(c, masquerade_rs::Command::Peek)));
    }
}

#[test]
fn test_custom_rules_apply() {
    let rules = Rules::from_json(r#"{ "starting_coins": 2, "opening_swap_turns": 0, "king_coins": 5 }"#).unwrap();
    let mut builder = builder(3, &["king", "queen", "judge"]);
    builder.rules(rules);

    let mut rng = Pcg64::seed_from_u64(3);
    let mut game = builder.build(&mut rng, Transcript::default(), ScriptedInput::default()).unwrap();
    assert!(game.players().iter().all(|p| p.coins() == 2));

    let claimant = game.active_player().name();
    game.submit(&["claim", "king"]).unwrap();
    game.submit(&["pass"]).unwrap();
    game.submit(&["pass"]).unwrap();

    assert_eq!(game.player_named(&claimant).unwrap().coins(), 7);
    assert!(game.notifier().was_announced(&Event::Unchallenged { claimant, role: Role::King }));
}

/// Random players only ever issue legal commands, so every match runs until someone wins.
#[test]
fn test_random_matches_finish() {
    let roles = ["judge", "bishop", "king", "fool", "queen", "thief", "witch", "spy", "peasant", "cheat", "inquisitor", "widow"];
    for seed in 0..20u64 {
        let num_players = 2 + (seed as usize % 5);
        let builder = builder(num_players, &roles);
        let mut rng = Pcg64::seed_from_u64(seed);
        let input = RandomInput::new(Pcg64::seed_from_u64(seed + 1000));
        let mut game = builder.build(&mut rng, Transcript::default(), input).unwrap();

        let mut steps = 0;
        while !game.is_over() && steps < 5000 {
            let commands = game.commands();
            let command = commands[rand::Rng::gen_range(&mut rng, 0..commands.len())].clone();
            game.execute(command).unwrap();
            steps += 1;
        }

        let mut dealt: Vec<Role> = game.players().iter().map(|p| p.role())
            .chain(game.table_cards().iter().map(|c| c.role()))
            .collect();
        dealt.sort();
        assert_eq!(dealt, builder.deck(), "roles are only ever exchanged");

        if let Some(victory) = game.victory() {
            assert!(!victory.winners().is_empty());
            for winner in victory.winners() {
                assert!(game.player_named(winner).is_some());
            }
        }
    }
}
