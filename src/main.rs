use std::error::Error;
use std::io;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use masquerade_rs::{JsonLines, LineInput, MatchBuilder, Rules};

const DEFAULT_LOG: &str = "masquerade_rs=info";
const USAGE: &str = "usage: masquerade-rs [--seed N] [--rules rules.json] num_players player1 ... playerN role1 ... roleM";

struct Args {
    seed: Option<u64>,
    rules: Rules,
    player_names: Vec<String>,
    role_names: Vec<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, Box<dyn Error>> {
    let mut seed = None;
    let mut rules = Rules::default();

    let num_players = loop {
        match args.next().as_deref() {
            Some("--seed") => {
                let value = args.next().ok_or("--seed needs a value")?;
                seed = Some(value.parse()?);
            }
            Some("--rules") => {
                let path = args.next().ok_or("--rules needs a path")?;
                rules = Rules::from_json(&std::fs::read_to_string(path)?)?;
            }
            Some(count) => break count.parse::<usize>()?,
            None => return Err(USAGE.into()),
        }
    };

    let player_names: Vec<String> = args.by_ref().take(num_players).collect();
    if player_names.len() < num_players {
        return Err(format!("expected {num_players} player names, but only have {}", player_names.len()).into());
    }

    Ok(Args { seed, rules, player_names, role_names: args.collect() })
}

// RUST_LOG wins when it is set and parses
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG))
}

fn main() -> Result<(), Box<dyn Error>> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    // events go to stdout, logs to stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(log_filter(rust_log.as_deref()))
        .init();

    let args = parse_args(std::env::args().skip(1))?;

    let mut builder = MatchBuilder::new();
    for name in &args.player_names {
        builder.add_player(name)?;
    }
    for role in &args.role_names {
        builder.add_role(role)?;
    }
    builder.rules(args.rules);

    let mut rng = match args.seed {
        Some(seed) => Pcg64::seed_from_u64(seed),
        None => Pcg64::from_entropy(),
    };

    let stdin = io::stdin();
    let mut game = builder.build(&mut rng, JsonLines::new(io::stdout()), LineInput::new(stdin.lock()))?;
    tracing::info!(players = game.players().len(), seed = ?args.seed, "match started");

    while !game.is_over() {
        let Some(tokens) = game.input_mut().next_line() else {
            tracing::warn!("input closed before the match ended");
            break;
        };
        // rejections were already sent to the player
        game.submit(&tokens).ok();
    }

    tracing::info!(winners = ?game.winners(), "match over");
    Ok(())
}
