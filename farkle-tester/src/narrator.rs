use colored::Colorize;
use farkle_game::{LedgerEntry, MatchEvent, MatchObserver, format_dice};

/// Prints a running commentary of the match to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNarrator {
    /// Also list every scoring option after each roll.
    show_options: bool,
}

impl ConsoleNarrator {
    #[must_use]
    pub const fn new(show_options: bool) -> Self {
        Self { show_options }
    }

    /// Text for one event, or `None` when the event is not narrated.
    #[must_use]
    pub fn render(&self, event: &MatchEvent) -> Option<String> {
        let line = match event {
            MatchEvent::MatchStarted { players } => format!(
                "{} {}",
                "🎲 Play beginning:".bright_cyan().bold(),
                players.join(", ")
            ),
            MatchEvent::TurnStarted {
                player,
                turn,
                score,
                danger_level,
            } => {
                let mut line = format!(
                    "\n{} {} (score {score})",
                    format!("Turn {turn}:").bold(),
                    player.bright_white()
                );
                if *danger_level > 0 {
                    line.push_str(&format!(" {}", format!("danger {danger_level}").yellow()));
                }
                line
            }
            MatchEvent::PlayerSkipped { .. } => return None,
            MatchEvent::Rolled {
                player,
                commentary,
                dice,
                options,
            } => {
                let mut line = format!("  {player} rolls {}", format_dice(dice).bold());
                if !commentary.is_empty() {
                    line.push_str(&format!(" \"{commentary}\""));
                }
                if self.show_options {
                    for scoring in options {
                        line.push_str(&format!(
                            "\n      {:12} - {} pts",
                            format_dice(&scoring.dice),
                            scoring.points
                        ));
                    }
                }
                line
            }
            MatchEvent::InvalidSelection { .. } => {
                format!("  ⚠️  {}", event.describe().yellow())
            }
            MatchEvent::Scored {
                player,
                points,
                dice,
                dice_remaining,
                turn_points,
                ..
            } => format!(
                "  {player} keeps {} for {} ({turn_points} this turn, {dice_remaining} dice to roll)",
                format_dice(dice),
                points.to_string().green()
            ),
            MatchEvent::Farkled {
                player,
                danger_level,
            } => {
                let mut line = format!("  {} {player}", "💥 FARKLE!".red().bold());
                let warning = match danger_level {
                    1 => Some("Warning: Two Farkles in a row."),
                    2 => Some("Oh, no! Three Farkles in a row."),
                    _ => None,
                };
                if let Some(warning) = warning {
                    line.push_str(&format!("\n  {}", warning.yellow().bold()));
                }
                line
            }
            MatchEvent::TurnEnded {
                player,
                commentary,
                recorded,
                ..
            } => {
                let recorded = match recorded {
                    LedgerEntry::Points(points) if *points < 0 => points.to_string().red(),
                    LedgerEntry::Points(points) => points.to_string().green(),
                    LedgerEntry::NoScore => "no score".dimmed(),
                };
                format!("  {player} records {recorded}: \"{commentary}\"")
            }
            MatchEvent::OpeningScoreMissed { .. } => format!("  {}", event.describe().dimmed()),
            MatchEvent::PlayerEliminated { .. } => {
                format!("  ❌ {}", event.describe().red())
            }
            MatchEvent::BonusRoundStarted { .. } => {
                format!("\n🏁 {}", event.describe().bright_yellow().bold())
            }
            MatchEvent::MatchEnded { .. } => {
                format!("\n{}", event.describe().bright_green().bold())
            }
        };
        Some(line)
    }
}

impl MatchObserver for ConsoleNarrator {
    fn notify(&mut self, event: &MatchEvent) {
        if let Some(line) = self.render(event) {
            println!("{line}");
        }
    }
}
