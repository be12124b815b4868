//! Role powers.
//!
//! A power only sees the match through [`Resolver`], the narrow set of queries and
//! mutations the orchestrator hands out while a claim is being resolved. Every power
//! receives the seat of the player using it and the number of correct claimants.

use crate::entity::{EntityId, Player};
use crate::error::{MatchError, Result};
use crate::event::Event;
use crate::role::Role;
use crate::rules::Rules;

pub type Power = fn(&mut dyn Resolver, usize, usize);

pub trait Resolver {
    fn rules(&self) -> &Rules;
    fn seat(&self, seat: usize) -> &Player;
    fn entity_name(&self, id: EntityId) -> String;
    fn entity_role(&self, id: EntityId) -> Role;

    /// Every player but `exclude_idx`, in seating order starting after it.
    fn other_player_indexes(&self, exclude_idx: usize) -> Vec<usize>;
    /// Every player but `seat` followed by every table card.
    fn swappables_other_than(&self, seat: usize) -> Vec<EntityId>;
    /// Seats immediately before and after `seat`.
    fn neighbours(&self, seat: usize) -> (usize, usize);
    fn richest_other_than(&self, seat: usize) -> Vec<usize>;
    fn all_player_indexes(&self) -> Vec<usize>;

    fn take_courthouse(&mut self) -> u64;
    fn credit(&mut self, seat: usize, amount: u64);
    /// Clamped transfer between two players, returns what actually moved.
    fn transfer(&mut self, from: usize, to: usize, amount: u64) -> u64;
    fn exchange(&mut self, a: EntityId, b: EntityId);
    fn reveal(&mut self, seat: usize);
    fn declare_cheat_winner(&mut self, seat: usize);

    fn announce(&mut self, event: Event);
    fn tell(&mut self, seat: usize, event: Event);

    // The prompts below return `None` once input is closed. The power must then stop
    // without further effects.

    /// Blocks until `seat` picks exactly `count` distinct entries of `candidates`.
    fn choose(&mut self, seat: usize, power: Role, candidates: &[EntityId], count: usize) -> Option<Vec<EntityId>>;
    fn confirm(&mut self, seat: usize, power: Role) -> Option<bool>;
    /// Blocks until `seat` names a role, on behalf of the inquisitor at `inquisitor`.
    fn guess_role(&mut self, seat: usize, inquisitor: usize) -> Option<Role>;
}

/// The power of `role`, if it has one.
pub fn lookup(role: Role) -> Option<Power> {
    match role {
        Role::Judge => Some(judge),
        Role::Bishop => Some(bishop),
        Role::King => Some(king),
        Role::Fool => Some(fool),
        Role::Queen => Some(queen),
        Role::Thief => Some(thief),
        Role::Witch => Some(witch),
        Role::Peasant => Some(peasant),
        Role::Spy => Some(spy),
        Role::Cheat => Some(cheat),
        Role::Inquisitor => Some(inquisitor),
        Role::Widow => Some(widow),
        Role::Damned => None,
    }
}

/// Validates an answer against the offered names, returning indexes into `names`.
pub fn select<S: AsRef<str>>(names: &[String], answer: &[S], count: usize) -> Result<Vec<usize>> {
    let mut chosen = Vec::with_capacity(count);
    for token in answer {
        let token: &str = token.as_ref();
        let idx = names
            .iter()
            .position(|name| name == token)
            .ok_or_else(|| MatchError::NotACandidate(token.to_string()))?;

        if chosen.contains(&idx) {
            return Err(MatchError::DuplicateSelection(token.to_string()));
        }
        chosen.push(idx);
    }

    if chosen.len() != count {
        return Err(MatchError::WrongSelectionCount { expected: count, actual: chosen.len() });
    }

    Ok(chosen)
}

fn gain(game: &mut dyn Resolver, seat: usize, amount: u64) {
    game.credit(seat, amount);
    let player = game.seat(seat);
    let event = Event::CoinsGained {
        player: player.name_str().to_string(),
        amount,
        balance: player.coins,
    };
    game.announce(event);
}

fn pay(game: &mut dyn Resolver, from: usize, to: usize, amount: u64) {
    let paid = game.transfer(from, to, amount);
    let event = Event::CoinsPaid {
        payer: game.seat(from).name_str().to_string(),
        payer_balance: game.seat(from).coins,
        amount: paid,
        receiver: game.seat(to).name_str().to_string(),
        receiver_balance: game.seat(to).coins,
    };
    game.announce(event);
}

fn swap_or_not(game: &mut dyn Resolver, user: usize, power: Role, first: EntityId, second: EntityId) {
    let Some(actually_swap) = game.confirm(user, power) else {
        return;
    };
    if actually_swap {
        game.exchange(first, second);
    }

    let event = Event::SwapOrNot {
        actor: game.seat(user).name_str().to_string(),
        first: game.entity_name(first),
        second: game.entity_name(second),
    };
    game.announce(event);
}

fn judge(game: &mut dyn Resolver, user: usize, _num_correct: usize) {
    let coins = game.take_courthouse();
    gain(game, user, coins);
    game.announce(Event::Courthouse { coins: 0 });
}

fn bishop(game: &mut dyn Resolver, user: usize, _num_correct: usize) {
    let richest = game.richest_other_than(user);
    let victim = match richest.as_slice() {
        [only] => *only,
        tied => {
            let candidates: Vec<EntityId> = tied.iter().map(|&seat| EntityId::Player(seat)).collect();
            match game.choose(user, Role::Bishop, &candidates, 1).as_deref() {
                Some([EntityId::Player(seat)]) => *seat,
                None => return,
                other => unreachable!("bishop must pick a single player, got {:?}", other),
            }
        }
    };

    let amount = game.rules().bishop_coins;
    pay(game, victim, user, amount);
}

fn king(game: &mut dyn Resolver, user: usize, _num_correct: usize) {
    let amount = game.rules().king_coins;
    gain(game, user, amount);
}

fn fool(game: &mut dyn Resolver, user: usize, _num_correct: usize) {
    gain(game, user, 1);

    let candidates = game.swappables_other_than(user);
    if candidates.len() < 2 {
        // heads up with no table cards
        tracing::debug!(user, "nothing for the fool to swap");
        return;
    }
    let Some(picked) = game.choose(user, Role::Fool, &candidates, 2) else {
        return;
    };
    swap_or_not(game, user, Role::Fool, picked[0], picked[1]);
}

fn queen(game: &mut dyn Resolver, user: usize, _num_correct: usize) {
    let amount = game.rules().queen_coins;
    gain(game, user, amount);
}

fn thief(game: &mut dyn Resolver, user: usize, _num_correct: usize) {
    let (before, after) = game.neighbours(user);
    let amount = game.rules().thief_coins;
    pay(game, before, user, amount);
    pay(game, after, user, amount);
}

fn witch(game: &mut dyn Resolver, user: usize, _num_correct: usize) {
    let candidates: Vec<EntityId> = game.all_player_indexes().into_iter().map(EntityId::Player).collect();
    let other = match game.choose(user, Role::Witch, &candidates, 1).as_deref() {
        Some([EntityId::Player(seat)]) => *seat,
        None => return,
        other => unreachable!("witch must pick a single player, got {:?}", other),
    };

    let mine = game.seat(user).coins;
    let theirs = game.seat(other).coins;

    // the richer one hands over the difference, which trades the two fortunes
    if theirs > mine {
        pay(game, other, user, theirs - mine);
    } else if mine > theirs {
        pay(game, user, other, mine - theirs);
    }
}

fn peasant(game: &mut dyn Resolver, user: usize, num_correct: usize) {
    let amount = if num_correct == 2 { 2 } else { 1 };
    gain(game, user, amount);
}

fn spy(game: &mut dyn Resolver, user: usize, _num_correct: usize) {
    let own = game.seat(user).role;
    game.tell(user, Event::OwnRole { role: own });

    let candidates = game.swappables_other_than(user);
    let Some(picked) = game.choose(user, Role::Spy, &candidates, 1).map(|picked| picked[0]) else {
        return;
    };
    let event = Event::SawRole {
        whose: game.entity_name(picked),
        role: game.entity_role(picked),
    };
    game.tell(user, event);

    swap_or_not(game, user, Role::Spy, EntityId::Player(user), picked);
}

fn cheat(game: &mut dyn Resolver, user: usize, _num_correct: usize) {
    if game.seat(user).coins >= game.rules().cheat_coins {
        game.declare_cheat_winner(user);
    }
}

fn inquisitor(game: &mut dyn Resolver, user: usize, _num_correct: usize) {
    let candidates: Vec<EntityId> = game.other_player_indexes(user).into_iter().map(EntityId::Player).collect();
    let target = match game.choose(user, Role::Inquisitor, &candidates, 1).as_deref() {
        Some([EntityId::Player(seat)]) => *seat,
        None => return,
        other => unreachable!("inquisitor must pick a single player, got {:?}", other),
    };

    let Some(guess) = game.guess_role(target, user) else {
        return;
    };
    game.reveal(target);

    let name = game.seat(target).name_str().to_string();
    let actual = game.seat(target).role;
    if guess == actual {
        game.announce(Event::ClaimCorrect { player: name, role: guess });
    } else {
        game.announce(Event::ClaimIncorrect { player: name, actual, claimed: guess });
        let penalty = game.rules().inquisitor_penalty;
        pay(game, target, user, penalty);
    }
}

fn widow(game: &mut dyn Resolver, user: usize, _num_correct: usize) {
    let target = game.rules().widow_coins;
    let coins = game.seat(user).coins;
    if coins < target {
        gain(game, user, target - coins);
    }
}
