use std::fmt::{Debug, Formatter};
use serde::{Deserialize, Serialize};
use crate::error::{MatchError, Result};

const USAGE: &str = "<swap|peek|claim|cc|pass> [args]";
const SWAP_USAGE: &str = "swap <player_or_table> <yes|no>";
const CLAIM_USAGE: &str = "claim <role>";

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum Command {
    Peek,
    Swap { target: String, confirm: bool },
    Claim(String),
    Challenge,
    Pass,
}

impl Command {
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Command> {
        let tokens: Vec<&str> = tokens.iter().map(|t| t.as_ref()).collect();
        let Some((verb, args)) = tokens.split_first() else {
            return Err(MatchError::MalformedCommand { usage: USAGE });
        };

        match verb.to_ascii_lowercase().as_str() {
            "peek" => Ok(Command::Peek),
            "swap" => match args {
                [target, confirm, ..] => {
                    let confirm = parse_bool(confirm).ok_or(MatchError::MalformedCommand { usage: SWAP_USAGE })?;
                    Ok(Command::Swap { target: target.to_string(), confirm })
                }
                _ => Err(MatchError::MalformedCommand { usage: SWAP_USAGE }),
            },
            "claim" => match args.first() {
                Some(role) => Ok(Command::Claim(role.to_string())),
                None => Err(MatchError::MalformedCommand { usage: CLAIM_USAGE }),
            },
            "cc" | "challenge" => Ok(Command::Challenge),
            "pass" => Ok(Command::Pass),
            _ => Err(MatchError::MalformedCommand { usage: USAGE }),
        }
    }
}

pub(crate) fn parse_bool(token: &str) -> Option<bool> {
    match token.to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

impl Debug for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Peek => {
                f.write_str("peeks")
            }
            Command::Swap { target, confirm } => {
                f.write_fmt(format_args!("swaps (or not: {confirm}) with {target}"))
            }
            Command::Claim(role) => {
                f.write_fmt(format_args!("claims to be the {role}"))
            }
            Command::Challenge => {
                f.write_str("counter-claims")
            }
            Command::Pass => {
                f.write_str("passes")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::action::Command;
    use crate::error::ErrorKind;

    #[test]
    fn parses_every_verb() {
        assert_eq!(Command::parse(&["peek"]).unwrap(), Command::Peek);
        assert_eq!(Command::parse(&["PASS"]).unwrap(), Command::Pass);
        assert_eq!(Command::parse(&["cc"]).unwrap(), Command::Challenge);
        assert_eq!(Command::parse(&["challenge"]).unwrap(), Command::Challenge);
        assert_eq!(Command::parse(&["claim", "judge"]).unwrap(), Command::Claim("judge".into()));
        assert_eq!(
            Command::parse(&["swap", "#1", "no"]).unwrap(),
            Command::Swap { target: "#1".into(), confirm: false }
        );
    }

    #[test]
    fn rejects_bad_shapes() {
        let cases: [&[&str]; 5] = [&[], &["swap", "bob"], &["swap", "bob", "maybe"], &["claim"], &["dance"]];
        for tokens in cases {
            assert_eq!(Command::parse(tokens).unwrap_err().kind(), ErrorKind::MalformedCommand);
        }
    }
}
