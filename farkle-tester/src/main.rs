mod narrator;
mod players;
mod reports;
mod runner;
mod util;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use farkle_game::MatchConfig;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};

use players::{StrategyKind, has_human, parse_roster};
use runner::SeriesRunner;
use util::{parse_seeds, split_csv};

#[derive(Debug, Parser)]
#[command(name = "farkle-tester", version = "0.1.0")]
#[command(about = "Plays automated Farkle matches and reports how each strategy fared")]
struct Args {
    /// Roster as NAME:STRATEGY pairs (comma-separated)
    #[arg(long, default_value = "Ben:adaptive,Jessica:simple")]
    players: String,

    /// List all available strategies and exit
    #[arg(long)]
    list_strategies: bool,

    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of matches per seed
    #[arg(long, default_value_t = 1)]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Match config JSON (seed is overridden per match)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Narrate every match, including the options offered on each roll
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_strategies(&args)? {
        return Ok(());
    }

    let roster = parse_roster(&split_csv(&args.players))?;
    let seeds = parse_seeds(&args.seeds)?;
    let config = load_config(args.config.as_deref())?;

    if args.report == "console" || args.output.is_some() {
        announce_banner();
    }

    let narrate = args.verbose || has_human(&roster);
    let mut runner = SeriesRunner::new(roster, config);
    if narrate {
        runner = runner.narrated(args.verbose);
    }
    log::info!(
        "playing {} seats over {} seeds x {} iterations",
        runner.roster().len(),
        seeds.len(),
        args.iterations
    );
    let (summary, duration) = runner.run(&seeds, args.iterations)?;

    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut output_target, &summary)?,
        "markdown" => reports::generate_markdown_report(&mut output_target, &summary)?,
        _ => reports::generate_console_report(&mut output_target, &summary, duration)?,
    }
    output_target.flush_inner()?;

    Ok(())
}

fn maybe_list_strategies(args: &Args) -> Result<bool> {
    if !args.list_strategies {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available strategies:")?;
    for kind in StrategyKind::ALL {
        writeln!(
            output_target.writer(),
            "  {:10} - {}",
            kind.key(),
            kind.description()
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🎲 Farkle Match Runner".bright_cyan().bold());
    println!("{}", "======================".cyan());
}

fn load_config(path: Option<&Path>) -> Result<MatchConfig> {
    let Some(path) = path else {
        return Ok(MatchConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    MatchConfig::from_json(&raw).with_context(|| format!("invalid config in {}", path.display()))
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
