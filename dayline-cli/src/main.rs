use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dayline_core::{NewGoal, RawFixedBlock, time::parse_iso_date};
use dayline_store::{JsonStore, Planner};
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod board;
mod prompt;
mod render;
mod server;
mod settings;
mod shell;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("DAYLINE_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "dayline", version = VERSION, about = "Plan each day around your goals")]
struct Cli {
    /// Data directory (default: ~/.dayline)
    #[arg(long, global = true, env = "DAYLINE_HOME")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the data directory and a default settings.toml
    Init,

    /// Add a goal; missing fields are asked for interactively
    Add {
        #[arg(long)]
        description: Option<String>,

        /// daily, weekly or one-time
        #[arg(long)]
        frequency: Option<String>,

        /// Day name for weekly goals
        #[arg(long)]
        week_day: Option<String>,

        /// YYYY-MM-DD
        #[arg(long)]
        target_date: Option<String>,

        /// high, medium or low
        #[arg(long)]
        priority: Option<String>,

        /// Minutes per session
        #[arg(long)]
        minutes: Option<i64>,
    },

    /// Show the day's timeline (default: today)
    Schedule {
        /// YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// List goals with their numbers
    Goals {
        #[arg(long)]
        json: bool,
    },

    /// Mark goal N done for today
    Complete { n: String },

    /// Record a skip for goal N
    Skip {
        n: String,

        #[arg(long)]
        reason: Option<String>,
    },

    /// Remove goal N
    Delete { n: String },

    /// Day configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommand>,
    },

    /// Interactive line shell
    Shell,

    /// Full-screen view of today's schedule
    Board,

    /// Serve the web dashboard
    Serve {
        /// Listen address (default from settings.toml)
        #[arg(long)]
        addr: Option<SocketAddr>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print start time, hours and fixed blocks
    Show,

    /// Set the day's start time (HH:MM)
    Start { time: String },

    /// Set available hours (1-24)
    Hours { hours: i64 },

    /// Add a fixed block
    AddBlock {
        #[arg(long)]
        name: String,

        /// HH:MM
        #[arg(long)]
        start: String,

        /// HH:MM
        #[arg(long)]
        end: String,

        /// daily, weekly or one-time
        #[arg(long, default_value = "daily")]
        recurrence: String,

        #[arg(long)]
        week_day: Option<String>,

        /// YYYY-MM-DD, for one-time blocks
        #[arg(long)]
        date: Option<String>,
    },

    /// Remove fixed block N (as numbered by `config show`)
    RemoveBlock { n: usize },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(matches!(cli.command, Command::Serve { .. }));

    let home = settings::dayline_home(cli.data_dir.as_deref())?;

    if let Command::Init = cli.command {
        let p = settings::init_settings(&home)?;
        println!("Data directory: {}", home.display());
        println!("Settings: {}", p.display());
        return Ok(());
    }

    let store = JsonStore::open(&home)
        .with_context(|| format!("open data directory {}", home.display()))?;

    if let Command::Serve { addr } = cli.command {
        let addr = match addr {
            Some(a) => a,
            None => {
                let s = settings::load_settings(&home)?;
                s.server
                    .addr
                    .parse()
                    .with_context(|| format!("invalid server.addr '{}'", s.server.addr))?
            }
        };
        return server::serve(store, addr).await;
    }

    let planner = Planner::new(store);
    let today = planner.today();

    match cli.command {
        Command::Init | Command::Serve { .. } => {}

        Command::Add {
            description,
            frequency,
            week_day,
            target_date,
            priority,
            minutes,
        } => {
            let draft = NewGoal {
                description: description.unwrap_or_default(),
                frequency: frequency.unwrap_or_default(),
                week_day,
                target_date: target_date.unwrap_or_default(),
                priority: priority.unwrap_or_default(),
                daily_minutes: minutes.unwrap_or(0),
            };
            let default_target = today.format("%Y-12-31").to_string();
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut out = io::stdout();
            let draft = prompt::complete_draft(&mut input, &mut out, draft, &default_target)?;
            let g = planner.add_goal(draft)?;
            println!(
                "Added: {} ({} min, {})",
                g.description,
                g.metric.daily_minutes,
                g.frequency.as_str()
            );
        }

        Command::Schedule { date, json } => {
            let date = match date {
                Some(d) => parse_iso_date(&d)?,
                None => today,
            };
            let s = planner.schedule_for(date)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&s)?);
            } else {
                print!("{}", render::render_schedule(&s, date));
            }
        }

        Command::Goals { json } => {
            let goals = planner.goals()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&goals)?);
            } else {
                print!("{}", render::render_goals(&goals, today));
            }
        }

        Command::Complete { n } => {
            let id = shell::goal_at(&planner, &n)?;
            let g = planner.complete(id)?;
            println!("Completed {}", render::render_goal_line(&g));
        }

        Command::Skip { n, reason } => {
            let id = shell::goal_at(&planner, &n)?;
            let g = planner.skip(id, reason.as_deref())?;
            println!("Skipped {}", g.description);
        }

        Command::Delete { n } => {
            let id = shell::goal_at(&planner, &n)?;
            let g = planner.delete_goal(id)?;
            println!("Deleted {}", g.description);
        }

        Command::Config { command } => match command.unwrap_or(ConfigCommand::Show) {
            ConfigCommand::Show => {
                print!("{}", render::render_config(&planner.config()?));
            }
            ConfigCommand::Start { time } => {
                let cfg = planner.set_start_time(&time)?;
                println!("Start time set to {}", cfg.start_time);
            }
            ConfigCommand::Hours { hours } => {
                let cfg = planner.set_available_hours(hours)?;
                println!("Available hours set to {}", cfg.available_hours);
            }
            ConfigCommand::AddBlock {
                name,
                start,
                end,
                recurrence,
                week_day,
                date,
            } => {
                let raw = RawFixedBlock {
                    name,
                    start_time: start,
                    end_time: end,
                    recurrence: Some(recurrence),
                    week_day,
                    date,
                    recurring: None,
                };
                let b = planner.add_fixed_block(&raw)?;
                println!("Added block: {} ({})", b.name, b.recurrence.label());
            }
            ConfigCommand::RemoveBlock { n } => {
                if n == 0 {
                    bail!("block numbers start at 1");
                }
                let b = planner.remove_fixed_block(n - 1)?;
                println!("Removed block: {}", b.name);
            }
        },

        Command::Shell => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut out = io::stdout();
            shell::run_shell(&planner, &mut input, &mut out)?;
            out.flush()?;
        }

        Command::Board => {
            board::run_board(&planner)?;
        }
    }

    Ok(())
}

/// Logs go to stderr so `--json` output stays clean.
fn init_tracing(serving: bool) {
    let default = if serving { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("DAYLINE_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
