use std::collections::BTreeSet;
use rand::seq::SliceRandom;
use rand::Rng;
use crate::entity::{Player, TableCard};
use crate::error::{MatchError, Result};
use crate::io::{InputProvider, Notifier};
use crate::role::Role;
use crate::rules::Rules;
use crate::Match;

/// Collects players and roles, then deals them out into a fresh [`Match`].
#[derive(Clone, Debug, Default)]
pub struct MatchBuilder {
    player_names: Vec<String>,
    roles: BTreeSet<Role>,
    rules: Rules,
}

impl MatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_player(&mut self, name: &str) -> Result<()> {
        // '#' addresses table cards
        if name.is_empty() || name.starts_with('#') || name.chars().any(char::is_whitespace) {
            return Err(MatchError::InvalidPlayerName(name.to_string()));
        }
        if self.player_names.iter().any(|existing| existing == name) {
            return Err(MatchError::DuplicatePlayer(name.to_string()));
        }

        self.player_names.push(name.to_string());
        Ok(())
    }

    /// Adds a role by display name. Adding the same role twice has no further effect.
    pub fn add_role(&mut self, name: &str) -> Result<Role> {
        let role = Role::from_name(name)?;
        self.roles.insert(role);
        Ok(role)
    }

    pub fn rules(&mut self, rules: Rules) -> &mut Self {
        self.rules = rules;
        self
    }

    /// Every card that will be dealt, pairable roles twice.
    pub fn deck(&self) -> Vec<Role> {
        self.roles
            .iter()
            .flat_map(|&role| std::iter::repeat(role).take(if role.is_pairable() { 2 } else { 1 }))
            .collect()
    }

    /// Seats the players in a random order and deals the deck at random, leftover cards
    /// going face down on the table.
    pub fn build<R: Rng + ?Sized, N: Notifier, I: InputProvider>(&self, rng: &mut R, notifier: N, input: I) -> Result<Match<N, I>> {
        let num_players = self.player_names.len();
        if num_players < 2 {
            return Err(MatchError::NotEnoughPlayers(num_players));
        }

        let deck = self.deck();
        if deck.len() < num_players {
            return Err(MatchError::InsufficientRoles { roles: deck.len(), players: num_players });
        }

        let mut seating: Vec<usize> = (0..num_players).collect();
        seating.shuffle(rng);
        let mut dealing: Vec<usize> = (0..deck.len()).collect();
        dealing.shuffle(rng);

        let mut seated: Vec<(usize, Player)> = self.player_names
            .iter()
            .enumerate()
            .map(|(i, name)| (seating[i], Player::new(name, deck[dealing[i]], self.rules.starting_coins)))
            .collect();
        seated.sort_by_key(|(seat, _)| *seat);
        let players = seated.into_iter().map(|(_, player)| player).collect();

        let table_cards = dealing[num_players..]
            .iter()
            .enumerate()
            .map(|(id, &card)| TableCard::new(id, deck[card]))
            .collect();

        tracing::debug!(players = num_players, cards = deck.len(), "dealt");

        Ok(Match::new(players, table_cards, self.roles.clone(), self.rules.clone(), notifier, input))
    }
}
