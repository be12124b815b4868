pub mod action;
pub mod builder;
pub mod entity;
pub mod error;
pub mod event;
pub mod io;
pub mod power;
pub mod role;
pub mod rules;
pub mod testing;

pub use action::Command;
pub use builder::MatchBuilder;
pub use entity::{CoinOwner, EntityId, Player, Swappable, TableCard};
pub use error::{ErrorKind, MatchError, Result};
pub use event::{Event, Prompt};
pub use io::{InputProvider, JsonLines, LineInput, Notifier};
pub use role::Role;
pub use rules::Rules;

use std::collections::BTreeSet;
use std::fmt::{Debug, Formatter};
use crate::action::parse_bool;
use crate::entity::pair_mut;
use crate::power::Resolver;

/// An outstanding claim, waiting for every other player to counter-claim or pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Claim {
    pub role: Role,
    pub claimant: usize,
    // in the order they counter-claimed
    pub challengers: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Victory {
    Cheat { winner: String },
    TargetReached { winners: Vec<String> },
    Broke { winners: Vec<String>, broke: Vec<String> },
}

impl Victory {
    pub fn winners(&self) -> &[String] {
        match self {
            Victory::Cheat { winner } => std::slice::from_ref(winner),
            Victory::TargetReached { winners } => winners,
            Victory::Broke { winners, .. } => winners,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Turn,
    Challenge,
    GameOver,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum State {
    AwaitingCommand,
    AwaitingChallengeResponse(Claim),
    Over(Victory),
    Abandoned,
}

pub struct Match<N: Notifier, I: InputProvider> {
    turn: u32,
    current_player_idx: usize,
    players: Vec<Player>,
    table_cards: Vec<TableCard>,
    roles_in_play: BTreeSet<Role>,
    courthouse: u64,

    state: State,
    cheat_winner: Option<usize>,
    input_closed: bool,

    rules: Rules,
    notifier: N,
    input: I,
}

impl<N: Notifier, I: InputProvider> Debug for Match<N, I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(format!("T {} | P {} | $C {} | {:?}\n", self.turn, self.current_player_idx, self.courthouse, self.state).as_str())?;
        for (player_idx, player) in self.players.iter().enumerate() {
            f.write_str(format!("\tP {player_idx} {}: ${} | {:?}\n", player.name, player.coins, player.role).as_str())?;
        }
        for card in &self.table_cards {
            f.write_str(format!("\t#{}: {:?}\n", card.id, card.role).as_str())?;
        }
        Ok(())
    }
}

impl<N: Notifier, I: InputProvider> Match<N, I> {
    /// Starts a match from an already dealt table: `players` in seating order, the first
    /// one to act first. Most callers want [`MatchBuilder`] instead.
    ///
    /// Panics with fewer than two players.
    pub fn new(
        players: Vec<Player>,
        table_cards: Vec<TableCard>,
        roles_in_play: BTreeSet<Role>,
        rules: Rules,
        notifier: N,
        input: I,
    ) -> Self {
        assert!(players.len() >= 2, "a match needs at least 2 players, got {}", players.len());

        let mut game = Self {
            turn: 0,
            current_player_idx: 0,
            players,
            table_cards,
            roles_in_play,
            courthouse: 0,
            state: State::AwaitingCommand,
            cheat_winner: None,
            input_closed: false,
            rules,
            notifier,
            input,
        };

        let player = game.players[0].name.clone();
        tracing::debug!(%player, "match started");
        game.announce(Event::TurnStarted { player, turn: 0 });
        game
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::AwaitingCommand => Phase::Turn,
            State::AwaitingChallengeResponse(_) => Phase::Challenge,
            State::Over(_) | State::Abandoned => Phase::GameOver,
        }
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// The player expected to act next: the one taking a turn, or the one asked to challenge.
    pub fn active_player(&self) -> &Player {
        &self.players[self.current_player_idx]
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_named(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|player| player.name == name)
    }

    pub fn table_cards(&self) -> &[TableCard] {
        &self.table_cards
    }

    pub fn roles_in_play(&self) -> &BTreeSet<Role> {
        &self.roles_in_play
    }

    pub fn courthouse(&self) -> u64 {
        self.courthouse
    }

    pub fn claim(&self) -> Option<&Claim> {
        match &self.state {
            State::AwaitingChallengeResponse(claim) => Some(claim),
            _ => None,
        }
    }

    pub fn victory(&self) -> Option<&Victory> {
        match &self.state {
            State::Over(victory) => Some(victory),
            _ => None,
        }
    }

    pub fn winners(&self) -> &[String] {
        self.victory().map(Victory::winners).unwrap_or(&[])
    }

    pub fn is_over(&self) -> bool {
        matches!(self.state, State::Over(_) | State::Abandoned)
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// Every command the active player could legally issue right now.
    pub fn commands(&self) -> Vec<Command> {
        let mut commands = Vec::with_capacity(self.players.len() * 2 + self.table_cards.len() * 2 + self.roles_in_play.len() + 1);

        match self.state {
            State::AwaitingCommand => {
                for id in self.swappables_other_than(self.current_player_idx) {
                    let target = self.entity_name(id);
                    commands.push(Command::Swap { target: target.clone(), confirm: true });
                    commands.push(Command::Swap { target, confirm: false });
                }

                if self.check_free_action().is_ok() {
                    commands.push(Command::Peek);
                    for role in self.roles_in_play.iter().filter(|role| role.is_announceable()) {
                        commands.push(Command::Claim(role.name().to_string()));
                    }
                }
            }
            State::AwaitingChallengeResponse(_) => {
                commands.push(Command::Challenge);
                commands.push(Command::Pass);
            }
            State::Over(_) | State::Abandoned => {}
        }

        commands
    }

    /// Applies `command` on behalf of the active player.
    pub fn execute(&mut self, command: Command) -> Result<()> {
        tracing::trace!(player = %self.active_player().name, ?command, "executing");
        match command {
            Command::Peek => self.peek(),
            Command::Swap { target, confirm } => self.swap(&target, confirm),
            Command::Claim(role) => self.claim_role(&role),
            Command::Challenge => self.challenge(),
            Command::Pass => self.pass(),
        }
    }

    /// Applies `command` for `actor`, reporting any rejection to them privately.
    pub fn execute_as(&mut self, actor: &str, command: Command) -> Result<()> {
        let result = if self.is_over() {
            Err(MatchError::GameOver)
        } else if self.active_player().name != actor {
            Err(MatchError::NotYourTurn {
                actor: actor.to_string(),
                active: self.active_player().name.clone(),
            })
        } else {
            self.execute(command)
        };

        if let Err(err) = &result {
            self.reject(actor, err);
        }
        result
    }

    /// Parses and applies a command typed by the active player.
    pub fn submit<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<()> {
        let actor = self.active_player().name.clone();
        match Command::parse(tokens) {
            Ok(command) => self.execute_as(&actor, command),
            Err(err) => {
                self.reject(&actor, &err);
                Err(err)
            }
        }
    }

    pub fn peek(&mut self) -> Result<()> {
        self.ensure_turn()?;
        self.check_free_action()?;

        let player = self.active_player().name.clone();
        let role = self.active_player().role;
        tracing::debug!(turn = self.turn, %player, "peek");

        self.announce(Event::Peeked { player });
        self.tell(self.current_player_idx, Event::OwnRole { role });

        self.advance_turn();
        Ok(())
    }

    pub fn swap(&mut self, target: &str, confirm: bool) -> Result<()> {
        self.ensure_turn()?;

        let id = self.resolve_swappable(target)?;
        let me = EntityId::Player(self.current_player_idx);
        if id == me {
            return Err(MatchError::SelfSwap(self.active_player().name.clone()));
        }

        if confirm {
            self.exchange(me, id);
        }

        let actor = self.active_player().name.clone();
        tracing::debug!(turn = self.turn, %actor, target, "swap or not");
        self.announce(Event::SwapOrNot { actor: actor.clone(), first: actor, second: self.entity_name(id) });

        self.advance_turn();
        Ok(())
    }

    pub fn claim_role(&mut self, role_name: &str) -> Result<()> {
        self.ensure_turn()?;
        self.check_free_action()?;

        let role = Role::from_name(role_name)?;
        if !role.is_announceable() {
            return Err(MatchError::NotAnnounceable(role));
        }
        if !self.roles_in_play.contains(&role) {
            return Err(MatchError::RoleNotInMatch(role));
        }

        let claimant = self.active_player().name.clone();
        tracing::debug!(turn = self.turn, %claimant, %role, "claim");

        self.state = State::AwaitingChallengeResponse(Claim {
            role,
            claimant: self.current_player_idx,
            challengers: Vec::new(),
        });
        self.announce(Event::Claimed { claimant, role });

        self.advance_claim();
        Ok(())
    }

    pub fn challenge(&mut self) -> Result<()> {
        let seat = self.current_player_idx;
        let claim = match &mut self.state {
            State::AwaitingChallengeResponse(claim) => claim,
            State::Over(_) | State::Abandoned => return Err(MatchError::GameOver),
            State::AwaitingCommand => return Err(MatchError::NoClaim),
        };
        claim.challengers.push(seat);
        let (claimant, role) = (claim.claimant, claim.role);

        let event = Event::CounterClaimed {
            player: self.players[seat].name.clone(),
            claimant: self.players[claimant].name.clone(),
            role,
        };
        tracing::debug!(turn = self.turn, player = %self.players[seat].name, %role, "counter-claim");
        self.announce(event);

        self.advance_claim();
        Ok(())
    }

    pub fn pass(&mut self) -> Result<()> {
        let (claimant, role) = match &self.state {
            State::AwaitingChallengeResponse(claim) => (claim.claimant, claim.role),
            State::Over(_) | State::Abandoned => return Err(MatchError::GameOver),
            State::AwaitingCommand => return Err(MatchError::NoClaim),
        };

        let event = Event::Passed {
            player: self.active_player().name.clone(),
            claimant: self.players[claimant].name.clone(),
            role,
        };
        self.announce(event);

        self.advance_claim();
        Ok(())
    }

    fn ensure_turn(&self) -> Result<()> {
        match &self.state {
            State::AwaitingCommand => Ok(()),
            State::AwaitingChallengeResponse(claim) => Err(MatchError::ClaimOutstanding {
                claimant: self.players[claim.claimant].name.clone(),
                role: claim.role,
            }),
            State::Over(_) | State::Abandoned => Err(MatchError::GameOver),
        }
    }

    // peeking and claiming are off limits early on and right after a reveal
    fn check_free_action(&self) -> Result<()> {
        if self.turn < self.rules.opening_swap_turns {
            return Err(MatchError::OpeningTurns { turns: self.rules.opening_swap_turns });
        }
        if self.turn > 0 && self.active_player().revealed_on(self.turn - 1) {
            return Err(MatchError::RevealedLastTurn);
        }
        Ok(())
    }

    fn resolve_swappable(&self, name: &str) -> Result<EntityId> {
        if let Some(index) = name.strip_prefix('#') {
            return match index.parse::<usize>() {
                Ok(index) if index < self.table_cards.len() => Ok(EntityId::Table(index)),
                _ => Err(MatchError::UnknownTableCard { name: name.to_string(), count: self.table_cards.len() }),
            };
        }

        self.players
            .iter()
            .position(|player| player.name == name)
            .map(EntityId::Player)
            .ok_or_else(|| MatchError::UnknownPlayer(name.to_string()))
    }

    fn next_player_idx(&self, idx: usize) -> usize {
        (idx + 1) % self.players.len()
    }

    fn advance_claim(&mut self) {
        self.current_player_idx = self.next_player_idx(self.current_player_idx);

        let (claimant, role) = match &self.state {
            State::AwaitingChallengeResponse(claim) => (claim.claimant, claim.role),
            _ => unreachable!("claim must be outstanding while rotating"),
        };

        if self.current_player_idx == claimant {
            self.resolve_claim();
        } else {
            let event = Event::ChallengeTurn {
                player: self.active_player().name.clone(),
                claimant: self.players[claimant].name.clone(),
                role,
            };
            self.announce(event);
        }
    }

    fn resolve_claim(&mut self) {
        let claim = match std::mem::replace(&mut self.state, State::AwaitingCommand) {
            State::AwaitingChallengeResponse(claim) => claim,
            _ => unreachable!("only an outstanding claim can be resolved"),
        };

        let mut correct = Vec::with_capacity(claim.challengers.len() + 1);
        let mut liars = Vec::with_capacity(claim.challengers.len() + 1);

        if claim.challengers.is_empty() {
            self.announce(Event::Unchallenged {
                claimant: self.players[claim.claimant].name.clone(),
                role: claim.role,
            });
            correct.push(claim.claimant);
        } else {
            // the original claimant reveals last
            for seat in claim.challengers.iter().copied().chain(std::iter::once(claim.claimant)) {
                let actual = self.players[seat].role;
                self.players[seat].reveal(self.turn);

                let player = self.players[seat].name.clone();
                if actual == claim.role {
                    correct.push(seat);
                    self.announce(Event::ClaimCorrect { player, role: claim.role });
                } else {
                    liars.push(seat);
                    self.announce(Event::ClaimIncorrect { player, actual, claimed: claim.role });
                }
            }
        }

        tracing::debug!(turn = self.turn, role = %claim.role, correct = correct.len(), liars = liars.len(), "claim resolved");

        let power = power::lookup(claim.role)
            .unwrap_or_else(|| panic!("no power registered for the {}", claim.role));

        for &seat in &correct {
            self.announce(Event::PowerUsed { player: self.players[seat].name.clone(), role: claim.role });
            power(self, seat, correct.len());
            if self.input_closed {
                self.abandon();
                return;
            }
        }

        for &seat in &liars {
            let paid = self.players[seat].debit(self.rules.fine);
            self.courthouse += paid;
            self.announce(Event::FinePaid {
                player: self.players[seat].name.clone(),
                amount: paid,
                balance: self.players[seat].coins,
            });
        }
        if !liars.is_empty() {
            self.announce(Event::Courthouse { coins: self.courthouse });
        }

        self.advance_turn();
    }

    fn advance_turn(&mut self) {
        // player's turn is over
        self.state = State::AwaitingCommand;
        self.turn += 1;

        if let Some(victory) = self.check_victory() {
            tracing::info!(turn = self.turn, winners = ?victory.winners(), "match over");
            let event = match &victory {
                Victory::Cheat { winner } => Event::CheatWins { player: winner.clone() },
                Victory::TargetReached { winners } => Event::TargetReached { winners: winners.clone() },
                Victory::Broke { winners, broke } => Event::Broke { winners: winners.clone(), broke: broke.clone() },
            };
            self.announce(event);
            self.state = State::Over(victory);
            return;
        }

        // go to next player
        self.current_player_idx = self.next_player_idx(self.current_player_idx);
        let player = self.active_player().name.clone();
        tracing::debug!(turn = self.turn, %player, "turn started");
        self.announce(Event::TurnStarted { player, turn: self.turn });
    }

    fn check_victory(&self) -> Option<Victory> {
        if let Some(seat) = self.cheat_winner {
            return Some(Victory::Cheat { winner: self.players[seat].name.clone() });
        }

        let highest = self.players.iter().map(|player| player.coins).max().unwrap_or(0);

        if highest >= self.rules.win_coins {
            let win_coins = self.rules.win_coins;
            return Some(Victory::TargetReached { winners: self.names_where(|player| player.coins >= win_coins) });
        }

        let broke = self.names_where(|player| player.coins == 0);
        if !broke.is_empty() {
            return Some(Victory::Broke { winners: self.names_where(|player| player.coins == highest), broke });
        }

        None
    }

    fn abandon(&mut self) {
        tracing::warn!(turn = self.turn, "input closed mid-resolution, match abandoned");
        self.announce(Event::Abandoned { turn: self.turn });
        self.state = State::Abandoned;
    }

    fn names_where(&self, f: impl Fn(&Player) -> bool) -> Vec<String> {
        self.players
            .iter()
            .filter(|player| f(player))
            .map(|player| player.name.clone())
            .collect()
    }

    fn reject(&mut self, player: &str, err: &MatchError) {
        tracing::warn!(player, %err, "rejected");
        self.notifier.private(player, &Event::Rejected { reason: err.to_string() });
    }

    fn prompt(&mut self, seat: usize, prompt: &Prompt) -> Option<(String, Vec<String>)> {
        let player = self.players[seat].name.clone();
        tracing::trace!(%player, ?prompt, "prompt");
        self.notifier.private(&player, &Event::Prompt(prompt.clone()));
        match self.input.respond(&player, prompt) {
            Some(answer) => Some((player, answer)),
            None => {
                self.input_closed = true;
                None
            }
        }
    }
}

impl<N: Notifier, I: InputProvider> Resolver for Match<N, I> {
    fn rules(&self) -> &Rules {
        &self.rules
    }

    fn seat(&self, seat: usize) -> &Player {
        &self.players[seat]
    }

    fn entity_name(&self, id: EntityId) -> String {
        match id {
            EntityId::Player(seat) => self.players[seat].name(),
            EntityId::Table(idx) => self.table_cards[idx].name(),
        }
    }

    fn entity_role(&self, id: EntityId) -> Role {
        match id {
            EntityId::Player(seat) => self.players[seat].role,
            EntityId::Table(idx) => self.table_cards[idx].role,
        }
    }

    fn other_player_indexes(&self, exclude_idx: usize) -> Vec<usize> {
        (1..self.players.len())
            .map(|n| (exclude_idx + n) % self.players.len())
            .collect()
    }

    fn swappables_other_than(&self, seat: usize) -> Vec<EntityId> {
        self.other_player_indexes(seat)
            .into_iter()
            .map(EntityId::Player)
            .chain((0..self.table_cards.len()).map(EntityId::Table))
            .collect()
    }

    fn neighbours(&self, seat: usize) -> (usize, usize) {
        let len = self.players.len();
        ((seat + len - 1) % len, (seat + 1) % len)
    }

    fn richest_other_than(&self, seat: usize) -> Vec<usize> {
        let others = self.other_player_indexes(seat);
        let highest = others.iter().map(|&idx| self.players[idx].coins).max().unwrap_or(0);
        others.into_iter().filter(|&idx| self.players[idx].coins == highest).collect()
    }

    fn all_player_indexes(&self) -> Vec<usize> {
        (0..self.players.len()).collect()
    }

    fn take_courthouse(&mut self) -> u64 {
        std::mem::take(&mut self.courthouse)
    }

    fn credit(&mut self, seat: usize, amount: u64) {
        self.players[seat].credit(amount);
    }

    fn transfer(&mut self, from: usize, to: usize, amount: u64) -> u64 {
        if from == to {
            return 0;
        }
        let (payer, receiver) = pair_mut(&mut self.players, from, to);
        payer.pay(receiver, amount)
    }

    fn exchange(&mut self, a: EntityId, b: EntityId) {
        match (a, b) {
            (EntityId::Player(x), EntityId::Player(y)) => {
                let (first, second) = pair_mut(&mut self.players, x, y);
                first.exchange(second);
            }
            (EntityId::Table(x), EntityId::Table(y)) => {
                let (first, second) = pair_mut(&mut self.table_cards, x, y);
                first.exchange(second);
            }
            (EntityId::Player(seat), EntityId::Table(idx)) | (EntityId::Table(idx), EntityId::Player(seat)) => {
                self.players[seat].exchange(&mut self.table_cards[idx]);
            }
        }
    }

    fn reveal(&mut self, seat: usize) {
        self.players[seat].reveal(self.turn);
    }

    fn declare_cheat_winner(&mut self, seat: usize) {
        tracing::debug!(player = %self.players[seat].name, "cheat condition met");
        self.cheat_winner = Some(seat);
    }

    fn announce(&mut self, event: Event) {
        self.notifier.public(&event);
    }

    fn tell(&mut self, seat: usize, event: Event) {
        self.notifier.private(&self.players[seat].name, &event);
    }

    fn choose(&mut self, seat: usize, power: Role, candidates: &[EntityId], count: usize) -> Option<Vec<EntityId>> {
        let names: Vec<String> = candidates.iter().map(|&id| self.entity_name(id)).collect();
        let prompt = Prompt::Choose { power, count, candidates: names.clone() };

        loop {
            let (player, answer) = self.prompt(seat, &prompt)?;
            match power::select(&names, &answer, count) {
                Ok(picked) => return Some(picked.into_iter().map(|idx| candidates[idx]).collect()),
                Err(err) => self.reject(&player, &err),
            }
        }
    }

    fn confirm(&mut self, seat: usize, power: Role) -> Option<bool> {
        let prompt = Prompt::Confirm { power };

        loop {
            let (player, answer) = self.prompt(seat, &prompt)?;
            let token = answer.first().map(String::as_str).unwrap_or("");
            match parse_bool(token) {
                Some(actually) => return Some(actually),
                None => self.reject(&player, &MatchError::NotABoolean(token.to_string())),
            }
        }
    }

    fn guess_role(&mut self, seat: usize, inquisitor: usize) -> Option<Role> {
        let prompt = Prompt::GuessRole { inquisitor: self.players[inquisitor].name.clone() };

        loop {
            let (player, answer) = self.prompt(seat, &prompt)?;
            let guessed = match answer.as_slice() {
                [guess] => Role::from_name(guess),
                other => Err(MatchError::WrongSelectionCount { expected: 1, actual: other.len() }),
            };
            match guessed {
                Ok(role) => return Some(role),
                Err(err) => self.reject(&player, &err),
            }
        }
    }
}
