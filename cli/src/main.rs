use std::io::{self, BufRead, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, anyhow, bail};
use blitz_core::*;
use clap::Parser;

use crate::command::{Command, HELP};

mod command;

#[derive(Parser, Debug)]
#[command(version, about = "Play Breakfast Blitz in the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity<clap_verbosity_flag::InfoLevel>,

    /// Level to start on
    #[arg(short, long, default_value_t = 1)]
    level: LevelId,

    /// Play the generated 1000-level world map instead of the tutorial run
    #[arg(short, long)]
    procedural: bool,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Board size, clamped to 3..=32
    #[arg(long)]
    size: Option<Coord>,

    /// Seed obstacles even on levels that list none
    #[arg(long)]
    obstacles: bool,
}

enum Catalog {
    Tutorial(StaticLevelCatalog),
    Procedural(ProceduralCatalog),
}

impl Catalog {
    fn levels(&self) -> &dyn LevelCatalog {
        match self {
            Self::Tutorial(catalog) => catalog,
            Self::Procedural(catalog) => catalog,
        }
    }

    fn bonus_power_ups(&self, id: LevelId) -> Option<PowerUpInventory> {
        match self {
            Self::Tutorial(_) => None,
            Self::Procedural(catalog) => catalog.details(id)?.reward.power_ups,
        }
    }
}

/// Session settings chosen on the command line.
struct Settings {
    seed: u64,
    size: Option<Coord>,
    force_obstacles: bool,
}

impl Settings {
    /// Fresh session for `level`, carrying `inventory` over.
    fn session(&self, level: Level, inventory: PowerUpInventory) -> anyhow::Result<GameSession> {
        let mut config = match self.size {
            Some(size) => SessionConfig::new(size),
            None => SessionConfig::default(),
        };
        config.obstacles = self.force_obstacles;
        config.starting_inventory = inventory;

        let source = RandomPieceSource::new(self.seed ^ u64::from(level.id));
        Ok(GameSession::new(level, config, Box::new(source))?)
    }
}

struct Game {
    session: GameSession,
    catalog: Catalog,
    settings: Settings,
    /// Whether the finished attempt was already paid out.
    recorded: bool,
    coins: u32,
}

impl Game {
    fn new(args: &Args, seed: u64) -> anyhow::Result<Self> {
        let catalog = if args.procedural {
            Catalog::Procedural(ProceduralCatalog::new(seed))
        } else {
            Catalog::Tutorial(StaticLevelCatalog::default())
        };
        let level = catalog
            .levels()
            .level(args.level)
            .ok_or_else(|| anyhow!("no level {} in this catalog", args.level))?;
        let settings = Settings {
            seed,
            size: args.size,
            force_obstacles: args.obstacles,
        };

        let game = Self {
            session: settings.session(level, PowerUpInventory::STARTER)?,
            catalog,
            settings,
            recorded: false,
            coins: 0,
        };
        game.announce();
        Ok(game)
    }

    fn start(&mut self, level: Level, inventory: PowerUpInventory) -> anyhow::Result<()> {
        self.session = self.settings.session(level, inventory)?;
        self.recorded = false;
        self.announce();
        Ok(())
    }

    fn announce(&self) {
        let level = self.session.current_level();
        println!("== Level {}: {} ==", level.id, level.name);
        println!("{}", level.objective);
        if !level.obstacles.is_empty() {
            println!("Obstacles: {}", level.obstacles.join(", "));
        }
        self.show();
    }

    fn run(&mut self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::Swap(from, to) => match self.session.make_move(from, to)? {
                MoveOutcome::Resolved {
                    score_delta,
                    passes,
                    cleared,
                    ..
                } => {
                    println!("+{score_delta} ({cleared} cleared in {passes} passes)");
                    self.show();
                }
                MoveOutcome::NoMatch => println!("No match, the move was not spent"),
                MoveOutcome::NoMovesLeft => println!("No moves left"),
                MoveOutcome::NotPlaying => println!("Game is {:?}", self.session.status()),
            },
            Command::Power(power_up, target) => match self.session.use_power_up(power_up, target)? {
                PowerUpOutcome::Applied {
                    score_delta,
                    bonus_moves,
                    ..
                } => {
                    if bonus_moves > 0 {
                        println!("{power_up}: +{bonus_moves} moves");
                    } else {
                        println!("{power_up}: +{score_delta}");
                    }
                    self.show();
                }
                PowerUpOutcome::Unavailable => println!("No {power_up} left"),
                PowerUpOutcome::NotPlaying => println!("Game is {:?}", self.session.status()),
            },
            Command::Pause => {
                if !self.session.pause() {
                    println!("Can only pause a game in progress");
                }
                self.print_status();
            }
            Command::Resume => {
                if !self.session.resume() {
                    println!("Game is not paused");
                }
                self.print_status();
            }
            Command::Reset => {
                self.session.reset()?;
                self.recorded = false;
                self.show();
            }
            Command::Next => {
                if self.session.status() != GameStatus::Won {
                    bail!("win this level first");
                }
                let id = self.session.current_level().id;
                let next = self
                    .catalog
                    .levels()
                    .next_level(id)
                    .ok_or_else(|| anyhow!("level {id} was the last one"))?;
                let inventory = *self.session.inventory();
                self.start(next, inventory)?;
            }
            Command::Show => self.show(),
            Command::Json => {
                let json = serde_json::to_string_pretty(&self.session.snapshot())
                    .context("serializing snapshot")?;
                println!("{json}");
            }
            Command::Help => println!("{HELP}"),
            // handled by the input loop
            Command::Quit => {}
        }

        self.settle();
        Ok(())
    }

    /// Pays out a finished attempt once.
    fn settle(&mut self) {
        if self.recorded {
            return;
        }
        let Some(result) = LevelResult::from_session(&self.session) else {
            return;
        };
        self.recorded = true;
        log::debug!("{result:?}");

        if !result.won {
            println!("Out of moves! Final score {}. Try `reset`.", result.score);
            return;
        }

        self.coins += result.coins;
        println!(
            "Level complete! {} {} star(s), +{} coins ({} total)",
            "*".repeat(result.stars.into()),
            result.stars,
            result.coins,
            self.coins
        );
        if let Some(bonus) = self.catalog.bonus_power_ups(result.level_id) {
            self.session.grant_power_ups(&bonus);
            println!("Bonus power-ups granted");
        }
        println!("Type `next` for the next level.");
    }

    fn print_status(&self) {
        let session = &self.session;
        println!(
            "Score {}/{} | Moves {} | {:?}",
            session.score(),
            session.current_level().target_score,
            session.moves_remaining(),
            session.status()
        );
    }

    fn show(&self) {
        let board = self.session.board();
        print!("   ");
        for col in 0..board.size() {
            print!("{col:>2}");
        }
        println!();
        for (row, line) in board.to_string().lines().enumerate() {
            println!("{row:>2}  {line}");
        }

        let charges: Vec<String> = self
            .session
            .inventory()
            .iter()
            .filter(|&(_, count)| count > 0)
            .map(|(power_up, count)| format!("{power_up} x{count}"))
            .collect();
        println!("Power-ups: {}", charges.join(", "));
        self.print_status();
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

fn prompt() -> io::Result<()> {
    print!("> ");
    io::stdout().flush()
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let seed = args.seed.unwrap_or_else(clock_seed);
    log::debug!("seed: {seed}");

    let mut game = Game::new(&args, seed)?;
    prompt()?;
    for line in io::stdin().lock().lines() {
        let line = line.context("reading input")?;
        if !line.trim().is_empty() {
            match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => {
                    if let Err(err) = game.run(command) {
                        println!("Error: {err:#}");
                    }
                }
                Err(err) => println!("{err:#}"),
            }
        }
        prompt()?;
    }
    Ok(())
}
