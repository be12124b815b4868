//! Collaborators the match talks to: where events go and where answers come from.

use std::io::{BufRead, Write};
use crate::event::{Event, Prompt};

/// Sink for match events with a public channel and a per-player private one.
pub trait Notifier {
    fn public(&mut self, event: &Event);
    fn private(&mut self, recipient: &str, event: &Event);
}

/// Blocks until `player` answers `prompt`, returning the answer split into tokens.
/// `None` means no answer will ever come and the match is abandoned.
pub trait InputProvider {
    fn respond(&mut self, player: &str, prompt: &Prompt) -> Option<Vec<String>>;
}

/// Writes one JSON document per event, prefixed with the channel it was sent on.
pub struct JsonLines<W: Write> {
    out: W,
}

impl<W: Write> JsonLines<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, prefix: &str, event: &Event) {
        let written = serde_json::to_string(event)
            .map_err(std::io::Error::from)
            .and_then(|json| writeln!(self.out, "{prefix}: {json}"));

        if let Err(err) = written {
            tracing::error!(%err, "failed to write event");
        }
    }
}

impl<W: Write> Notifier for JsonLines<W> {
    fn public(&mut self, event: &Event) {
        self.write("PUBLIC", event);
    }

    fn private(&mut self, recipient: &str, event: &Event) {
        self.write(&format!("PRIVATE[{recipient}]"), event);
    }
}

/// Reads whitespace separated tokens, one line per answer.
pub struct LineInput<B: BufRead> {
    input: B,
}

impl<B: BufRead> LineInput<B> {
    pub fn new(input: B) -> Self {
        Self { input }
    }

    /// Next non-empty line, or `None` once the input is exhausted.
    pub fn next_line(&mut self) -> Option<Vec<String>> {
        let mut line = String::new();
        loop {
            line.clear();
            match self.input.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {
                    let tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
                    if !tokens.is_empty() {
                        return Some(tokens);
                    }
                }
                Err(err) => {
                    tracing::warn!(%err, "failed to read input line");
                    return None;
                }
            }
        }
    }
}

impl<B: BufRead> InputProvider for LineInput<B> {
    fn respond(&mut self, player: &str, prompt: &Prompt) -> Option<Vec<String>> {
        tracing::trace!(player, ?prompt, "waiting for answer");
        self.next_line()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use crate::event::{Event, Prompt};
    use crate::io::{InputProvider, JsonLines, LineInput, Notifier};
    use crate::role::Role;

    #[test]
    fn prefixes_channels() {
        let mut out = JsonLines::new(Vec::new());
        out.public(&Event::Peeked { player: "alice".into() });
        out.private("alice", &Event::OwnRole { role: Role::King });

        let text = String::from_utf8(out.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], r#"PUBLIC: {"event":"peeked","player":"alice"}"#);
        assert_eq!(lines[1], r#"PRIVATE[alice]: {"event":"own_role","role":"King"}"#);
    }

    #[test]
    fn skips_blank_lines() {
        let mut input = LineInput::new(Cursor::new("\n   \nswap bob yes\n"));
        assert_eq!(input.next_line().unwrap(), vec!["swap", "bob", "yes"]);
        assert_eq!(input.next_line(), None);
    }

    #[test]
    fn respond_reads_one_line() {
        let mut input = LineInput::new(Cursor::new("#0 carol\nyes\n"));
        let prompt = Prompt::Confirm { power: Role::Fool };
        assert_eq!(input.respond("alice", &prompt).unwrap(), vec!["#0", "carol"]);
        assert_eq!(input.respond("alice", &prompt).unwrap(), vec!["yes"]);
        assert_eq!(input.respond("alice", &prompt), None);
    }
}
