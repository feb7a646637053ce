use std::str::FromStr;

use anyhow::{Context, anyhow, bail};
use blitz_core::{Coord, Coord2, PowerUp};

/// One line of player input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Swap(Coord2, Coord2),
    Power(PowerUp, Option<Coord2>),
    Pause,
    Resume,
    Reset,
    /// Start the following level once the current one is won.
    Next,
    Show,
    Json,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  swap <r1> <c1> <r2> <c2>   swap two adjacent cells
  power <key> [<r> <c>]      use a power-up (hammer, shuffle, extraMoves,
                             colorBomb, baconBomb, mapleSyrup, coffeeBoost)
  pause | resume | reset | next
  show | json | help | quit";

fn coord(word: Option<&str>) -> anyhow::Result<Coord> {
    let word = word.ok_or_else(|| anyhow!("missing coordinate"))?;
    word.parse()
        .with_context(|| format!("bad coordinate {word:?}"))
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> anyhow::Result<Self> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            bail!("empty command");
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "swap" | "s" => {
                let from = (coord(words.next())?, coord(words.next())?);
                let to = (coord(words.next())?, coord(words.next())?);
                Self::Swap(from, to)
            }
            "power" | "p" => {
                let key = words.next().ok_or_else(|| anyhow!("missing power-up name"))?;
                let power_up: PowerUp = key
                    .parse()
                    .with_context(|| format!("no power-up called {key:?}"))?;
                let target = match words.next() {
                    Some(row) => Some((coord(Some(row))?, coord(words.next())?)),
                    None => None,
                };
                Self::Power(power_up, target)
            }
            "pause" => Self::Pause,
            "resume" => Self::Resume,
            "reset" => Self::Reset,
            "next" => Self::Next,
            "show" => Self::Show,
            "json" => Self::Json,
            "help" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => bail!("unknown command {other:?}, try `help`"),
        };

        if let Some(extra) = words.next() {
            bail!("unexpected {extra:?} after command");
        }
        Ok(command)
    }
}
