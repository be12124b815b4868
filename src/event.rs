use serde::{Deserialize, Serialize};
use crate::role::Role;

/// Something that happened in a match, handed to the notifier without any formatting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    TurnStarted { player: String, turn: u32 },
    // the exchange may or may not have happened
    SwapOrNot { actor: String, first: String, second: String },
    Peeked { player: String },
    OwnRole { role: Role },
    SawRole { whose: String, role: Role },
    Claimed { claimant: String, role: Role },
    ChallengeTurn { player: String, claimant: String, role: Role },
    CounterClaimed { player: String, claimant: String, role: Role },
    Passed { player: String, claimant: String, role: Role },
    Unchallenged { claimant: String, role: Role },
    ClaimCorrect { player: String, role: Role },
    ClaimIncorrect { player: String, actual: Role, claimed: Role },
    PowerUsed { player: String, role: Role },
    CoinsGained { player: String, amount: u64, balance: u64 },
    CoinsPaid {
        payer: String,
        payer_balance: u64,
        amount: u64,
        receiver: String,
        receiver_balance: u64,
    },
    FinePaid { player: String, amount: u64, balance: u64 },
    Courthouse { coins: u64 },
    CheatWins { player: String },
    TargetReached { winners: Vec<String> },
    Broke { winners: Vec<String>, broke: Vec<String> },
    // input closed while a power was waiting for an answer
    Abandoned { turn: u32 },
    Prompt(Prompt),
    Rejected { reason: String },
}

/// A request for input, sent privately to the player who has to answer it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "prompt", rename_all = "snake_case")]
pub enum Prompt {
    /// Pick exactly `count` distinct names out of `candidates`.
    Choose { power: Role, count: usize, candidates: Vec<String> },
    /// Actually perform the exchange just selected, or not.
    Confirm { power: Role },
    /// Name the role you believe you hold.
    GuessRole { inquisitor: String },
}

#[cfg(test)]
mod tests {
    use crate::event::{Event, Prompt};
    use crate::role::Role;

    #[test]
    fn serializes_with_tag() {
        let event = Event::CoinsGained { player: "alice".into(), amount: 3, balance: 9 };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"event":"coins_gained","player":"alice","amount":3,"balance":9}"#);
    }

    #[test]
    fn prompt_payload() {
        let event = Event::Prompt(Prompt::Confirm { power: Role::Spy });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "prompt");
        assert_eq!(json["prompt"], "confirm");
        assert_eq!(json["power"], "Spy");
    }
}
