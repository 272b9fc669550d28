use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;

use crate::runner::SeriesSummary;

pub fn generate_console_report(
    out: &mut dyn Write,
    summary: &SeriesSummary,
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Farkle Series Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "========================".cyan())?;

    // Overall stats
    writeln!(out, "Matches played: {}", summary.matches)?;
    writeln!(
        out,
        "Without a winner: {}",
        summary.unfinished.to_string().yellow()
    )?;
    writeln!(out, "Average turns: {:.1}", summary.average_turns)?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for tally in &summary.players {
        writeln!(out, "{} ({})", tally.name.bold(), tally.strategy)?;
        writeln!(
            out,
            "   Wins: {}/{}",
            tally.wins.to_string().green(),
            summary.matches
        )?;
        writeln!(out, "   Average score: {:.0}", tally.average_score)?;
        writeln!(out, "   Farkles: {}", tally.farkles)?;
        if tally.eliminations > 0 {
            writeln!(
                out,
                "   Eliminated: {}",
                tally.eliminations.to_string().red()
            )?;
        }
        writeln!(out)?;
    }

    if let Some(leader) = summary.leader() {
        writeln!(
            out,
            "🏆 Most wins: {} ({})",
            leader.name.bright_green().bold(),
            leader.wins
        )?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, summary: &SeriesSummary) -> Result<()> {
    let json_output = serde_json::to_string_pretty(summary)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, summary: &SeriesSummary) -> Result<()> {
    writeln!(out, "# Farkle Series Results\n")?;

    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Matches played**: {}", summary.matches)?;
    writeln!(out, "- **Without a winner**: {}", summary.unfinished)?;
    writeln!(out, "- **Average turns**: {:.1}\n", summary.average_turns)?;

    writeln!(out, "## Players\n")?;
    writeln!(
        out,
        "| Player | Strategy | Wins | Average score | Farkles | Eliminated |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|")?;
    for tally in &summary.players {
        writeln!(
            out,
            "| {} | {} | {} | {:.0} | {} | {} |",
            tally.name,
            tally.strategy,
            tally.wins,
            tally.average_score,
            tally.farkles,
            tally.eliminations
        )?;
    }
    writeln!(out)?;

    writeln!(out, "## Matches\n")?;
    for record in &summary.records {
        let winner = record.result.winner.as_deref().unwrap_or("no winner");
        writeln!(
            out,
            "### Seed {}: {} ({} turns)\n",
            record.seed, winner, record.result.turns_played
        )?;
        writeln!(out, "```\n{}\n```\n", record.result.score_sheet)?;
    }
    Ok(())
}
