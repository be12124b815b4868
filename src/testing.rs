//! Collaborators for driving a match without a human at the keyboard.
//!
//! [`Transcript`] records every event, [`ScriptedInput`] replays canned answers and
//! [`RandomInput`] answers any prompt with a random valid choice.

use std::collections::VecDeque;
use rand::seq::SliceRandom;
use rand::Rng;
use crate::event::{Event, Prompt};
use crate::io::{InputProvider, Notifier};
use crate::role::ROLE_VARIANTS;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Channel {
    Public,
    Private(String),
}

/// Notifier that keeps everything it is sent.
#[derive(Clone, Debug, Default)]
pub struct Transcript {
    pub events: Vec<(Channel, Event)>,
}

impl Transcript {
    pub fn public_events(&self) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|(channel, _)| *channel == Channel::Public)
            .map(|(_, event)| event)
            .collect()
    }

    pub fn private_events(&self, recipient: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|(channel, _)| matches!(channel, Channel::Private(name) if name == recipient))
            .map(|(_, event)| event)
            .collect()
    }

    pub fn was_announced(&self, event: &Event) -> bool {
        self.public_events().contains(&event)
    }

    pub fn was_told(&self, recipient: &str, event: &Event) -> bool {
        self.private_events(recipient).contains(&event)
    }

    pub fn rejections(&self, recipient: &str) -> usize {
        self.private_events(recipient)
            .iter()
            .filter(|event| matches!(event, Event::Rejected { .. }))
            .count()
    }
}

impl Notifier for Transcript {
    fn public(&mut self, event: &Event) {
        self.events.push((Channel::Public, event.clone()));
    }

    fn private(&mut self, recipient: &str, event: &Event) {
        self.events.push((Channel::Private(recipient.to_string()), event.clone()));
    }
}

/// Answers prompts from a fixed script, in order.
///
/// Panics when asked for an answer the script doesn't have, or when the next answer
/// belongs to somebody else.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    answers: VecDeque<(String, Vec<String>)>,
}

impl ScriptedInput {
    pub fn answer(mut self, player: &str, tokens: &[&str]) -> Self {
        self.push(player, tokens);
        self
    }

    pub fn push(&mut self, player: &str, tokens: &[&str]) {
        self.answers.push_back((player.to_string(), tokens.iter().map(|t| t.to_string()).collect()));
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl InputProvider for ScriptedInput {
    fn respond(&mut self, player: &str, prompt: &Prompt) -> Option<Vec<String>> {
        match self.answers.pop_front() {
            Some((expected, tokens)) if expected == player => Some(tokens),
            Some((expected, _)) => panic!("{player} was prompted with {prompt:?} but the next answer is {expected}'s"),
            None => panic!("{player} was prompted with {prompt:?} but the script is exhausted"),
        }
    }
}

/// Answers every prompt with a uniformly random valid choice.
pub struct RandomInput<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomInput<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> InputProvider for RandomInput<R> {
    fn respond(&mut self, _player: &str, prompt: &Prompt) -> Option<Vec<String>> {
        let answer = match prompt {
            Prompt::Choose { count, candidates, .. } => candidates
                .choose_multiple(&mut self.rng, *count)
                .cloned()
                .collect(),
            Prompt::Confirm { .. } => {
                let token = if self.rng.gen_bool(0.5) { "yes" } else { "no" };
                vec![token.to_string()]
            }
            Prompt::GuessRole { .. } => {
                let role = ROLE_VARIANTS[self.rng.gen_range(0..ROLE_VARIANTS.len())];
                vec![role.name().to_string()]
            }
        };
        Some(answer)
    }
}
