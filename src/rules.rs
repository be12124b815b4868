use serde::{Deserialize, Serialize};

/// Tunable constants of a match. Missing fields in a JSON document fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub starting_coins: u64,
    /// Any player at or above this balance wins.
    pub win_coins: u64,
    /// Turns during which only swap-or-not is allowed.
    pub opening_swap_turns: u32,
    pub fine: u64,
    pub cheat_coins: u64,
    pub widow_coins: u64,
    pub inquisitor_penalty: u64,
    pub king_coins: u64,
    pub queen_coins: u64,
    pub bishop_coins: u64,
    pub thief_coins: u64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            starting_coins: 6,
            win_coins: 13,
            opening_swap_turns: 4,
            fine: 1,
            cheat_coins: 10,
            widow_coins: 10,
            inquisitor_penalty: 4,
            king_coins: 3,
            queen_coins: 2,
            bishop_coins: 2,
            thief_coins: 1,
        }
    }
}

impl Rules {
    pub fn from_json(json: &str) -> serde_json::Result<Rules> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use crate::rules::Rules;

    #[test]
    fn partial_json_keeps_defaults() {
        let rules = Rules::from_json(r#"{ "win_coins": 20, "starting_coins": 8 }"#).unwrap();
        assert_eq!(rules.win_coins, 20);
        assert_eq!(rules.starting_coins, 8);
        assert_eq!(rules.fine, 1);
        assert_eq!(rules.opening_swap_turns, 4);
    }

    #[test]
    fn rejects_garbage() {
        assert!(Rules::from_json("{ \"win_coins\": -3 }").is_err());
    }
}
