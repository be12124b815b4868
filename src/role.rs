use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use crate::error::{MatchError, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    Judge,
    Bishop,
    King,
    Fool,
    Queen,
    Thief,
    Witch,
    Spy,
    Peasant,
    Cheat,
    Inquisitor,
    Widow,
    Damned,
}

pub static ROLE_VARIANTS: [Role; 13] = [
    Role::Judge,
    Role::Bishop,
    Role::King,
    Role::Fool,
    Role::Queen,
    Role::Thief,
    Role::Witch,
    Role::Spy,
    Role::Peasant,
    Role::Cheat,
    Role::Inquisitor,
    Role::Widow,
    Role::Damned,
];

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Role::Judge => "Judge",
            Role::Bishop => "Bishop",
            Role::King => "King",
            Role::Fool => "Fool",
            Role::Queen => "Queen",
            Role::Thief => "Thief",
            Role::Witch => "Witch",
            Role::Spy => "Spy",
            Role::Peasant => "Peasant",
            Role::Cheat => "Cheat",
            Role::Inquisitor => "Inquisitor",
            Role::Widow => "Widow",
            Role::Damned => "Damned",
        }
    }

    pub fn power_description(&self) -> &'static str {
        match self {
            Role::Judge => "Take all of the courthouse's gold",
            Role::Bishop => "Take 2 coins from the richest of the other players",
            Role::King => "Take 3 coins",
            Role::Fool => "Take 1 coin, then swap (or not) two cards not your own",
            Role::Queen => "Take 2 coins",
            Role::Thief => "Take one coin from each adjacent player",
            Role::Witch => "May swap fortune with another player",
            Role::Spy => "Look at own card and another, then swap (or not)",
            Role::Peasant => "Take 1 coin, or 2 coins if both Peasants reveal",
            Role::Cheat => "Wins with 10 coins",
            Role::Inquisitor => "Target must guess own character or pay 4 coins",
            Role::Widow => "Take coins from the bank until at 10 coins",
            Role::Damned => "You are eliminated!!!",
        }
    }

    /// Two copies of a pairable role are dealt whenever it is in the match.
    pub fn is_pairable(&self) -> bool {
        *self == Role::Peasant
    }

    pub fn is_announceable(&self) -> bool {
        *self != Role::Damned
    }

    /// Case-insensitive lookup by display name.
    pub fn from_name(name: &str) -> Result<Role> {
        ROLE_VARIANTS
            .iter()
            .copied()
            .find(|role| role.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| MatchError::UnknownRole(name.to_string()))
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::role::{Role, ROLE_VARIANTS};

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(Role::from_name("judge").unwrap(), Role::Judge);
        assert_eq!(Role::from_name("INQUISITOR").unwrap(), Role::Inquisitor);
        assert_eq!(Role::from_name("wIdOw").unwrap(), Role::Widow);
    }

    #[test]
    fn unknown_name() {
        let err = Role::from_name("Duke").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownEntity);
    }

    #[test]
    fn every_variant_round_trips_through_its_name() {
        for role in ROLE_VARIANTS {
            assert_eq!(Role::from_name(role.name()).unwrap(), role);
        }
    }

    #[test]
    fn flags() {
        let pairable: Vec<Role> = ROLE_VARIANTS.iter().copied().filter(|r| r.is_pairable()).collect();
        assert_eq!(pairable, vec![Role::Peasant]);

        let silent: Vec<Role> = ROLE_VARIANTS.iter().copied().filter(|r| !r.is_announceable()).collect();
        assert_eq!(silent, vec![Role::Damned]);
    }
}
