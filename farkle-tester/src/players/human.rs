//! Console-driven player.
use std::io::{self, BufRead, Stdout, Write};

use anyhow::{Context, Result, bail};
use farkle_game::{
    OPENING_MINIMUM, Player, RollResult, TurnController, TurnFault, farkle_odds, format_dice,
};

/// Something a human player reads answers from, one line at a time.
pub trait LineSource {
    /// Append the next line to `buf`; `Ok(0)` at end of input.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying reader.
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize>;
}

impl<R: BufRead> LineSource for R {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        BufRead::read_line(self, buf)
    }
}

/// Process stdin, locked only for the duration of each read so several
/// console seats can share it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleInput;

impl LineSource for ConsoleInput {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        io::stdin().read_line(buf)
    }
}

/// Takes every decision from a person at the console.
///
/// Generic over its streams so sessions can be scripted.
pub struct HumanPlayer<R, W> {
    name: String,
    input: R,
    output: W,
}

impl HumanPlayer<ConsoleInput, Stdout> {
    #[must_use]
    pub fn console(name: impl Into<String>) -> Self {
        Self::new(name, ConsoleInput, io::stdout())
    }
}

impl<R: LineSource, W: Write> HumanPlayer<R, W> {
    pub fn new(name: impl Into<String>, input: R, output: W) -> Self {
        Self {
            name: name.into(),
            input,
            output,
        }
    }

    fn prompt_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read console input")?;
        if read == 0 {
            bail!("console input closed");
        }
        Ok(line.trim().to_string())
    }

    fn prompt_integer_between(&mut self, prompt: &str, lo: usize, hi: usize) -> Result<usize> {
        loop {
            let response = self.prompt_line(prompt)?;
            match response.parse::<usize>() {
                Ok(value) if (lo..=hi).contains(&value) => return Ok(value),
                Ok(_) => writeln!(
                    self.output,
                    "  *** Enter an integer value between {lo} and {hi}. ***"
                )?,
                Err(_) => writeln!(self.output, "  *** Enter an integer value. ***")?,
            }
        }
    }

    /// Show numbered options and return the zero-based index picked.
    fn menu_selection(&mut self, items: &[String], prompt: &str) -> Result<usize> {
        for (number, item) in items.iter().enumerate() {
            writeln!(self.output, "{:2}: {item}", number + 1)?;
        }
        Ok(self.prompt_integer_between(prompt, 1, items.len())? - 1)
    }

    fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    fn play_turn(&mut self, turn: &mut TurnController<'_>) -> Result<String, TurnFault> {
        let my_score = turn.my_score();
        self.say(&format!("Your turn, {}.", self.name))?;
        self.say(&format!(
            "Your score is {my_score}. The high score is {}",
            turn.high_score()
        ))?;
        let danger = turn.my_danger_level();
        if danger > 0 {
            self.say(&format!("  Farkle danger level {danger}."))?;
        }

        loop {
            let roll_number = turn.rolls() + 1;
            self.say(&format!("Roll #{roll_number}:"))?;
            let thoughts = self.prompt_line(&format!(
                "Enter your thoughts before you make roll #{roll_number}: "
            ))?;
            let RollResult::Scored(options) = turn.roll(&thoughts)? else {
                self.say(&format!("Farkle after roll #{roll_number}!"))?;
                break;
            };

            let items: Vec<String> = options
                .iter()
                .map(|scoring| format!("{:12} - {} pts", format_dice(&scoring.dice), scoring.points))
                .collect();
            let selection = self.menu_selection(&items, "Which scoring? ")?;
            let chosen = options
                .get(selection)
                .map(|scoring| format_dice(&scoring.dice))
                .unwrap_or_default();
            let thoughts = self.prompt_line(&format!("Your thoughts about selecting {chosen}: "))?;
            let dice = turn.score_as(selection, &thoughts)?;

            let so_far = turn.turn_points();
            self.say(&format!("Your score for this turn so far is {so_far}."))?;
            if my_score == 0 && i64::from(so_far) < i64::from(OPENING_MINIMUM) {
                self.say(&format!(
                    "  REMEMBER THAT YOU NEED {OPENING_MINIMUM} POINTS TO GET ON THE BOARD."
                ))?;
            }
            if let Some(odds) = farkle_odds(dice) {
                self.say(&format!(
                    "  The probability of a Farkle rolling {dice} dice is {odds:.2}"
                ))?;
            }
            let again = ["Yes".to_string(), "No".to_string()];
            if self.menu_selection(&again, &format!("Do you want to roll {dice} dice? "))? != 0 {
                break;
            }
        }

        Ok(self.prompt_line("Enter your thoughts about this turn: ")?)
    }
}

impl<R: LineSource, W: Write> Player for HumanPlayer<R, W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn take_turn(&mut self, turn: &mut TurnController<'_>) -> Result<String, TurnFault> {
        self.play_turn(turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farkle_game::{EventLog, ScoreLedger, ScriptedDice};
    use std::io::Cursor;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    fn run(script: &str, rolls: &[&[u8]]) -> (Result<String, TurnFault>, u32, String) {
        let ledger = ScoreLedger::new(["Me"]).unwrap();
        let mut dice = ScriptedDice::from_values(rolls).unwrap();
        let mut log = EventLog::default();
        let mut turn = TurnController::new("Me", &ledger, &mut dice, &mut log);
        let mut player = HumanPlayer::new("Me", Cursor::new(script.to_string()), Vec::new());
        let result = player.take_turn(&mut turn);
        let points = turn.turn_points();
        let transcript = String::from_utf8(player.output.clone()).unwrap();
        (result, points, transcript)
    }

    #[test]
    fn scripted_session_banks_points() {
        // thoughts, pick option 2 (100 for the 1), thoughts, roll again,
        // thoughts, pick option 1, thoughts, stop, closing thoughts.
        let script = "go\n2\nthe one\n1\nagain\nx\n9\n1\nnice\n2\ndone\n";
        let (result, points, transcript) = run(script, &[&[1, 5, 2, 3, 4, 4], &[5, 5, 5, 2, 3]]);
        assert_eq!(result.unwrap(), "done");
        assert_eq!(points, 600);
        assert!(transcript.contains("Your turn, Me."));
        assert!(transcript.contains(" 1: 1 5          - 150 pts"));
        assert!(transcript.contains("REMEMBER THAT YOU NEED 500 POINTS"));
        assert!(transcript.contains("*** Enter an integer value. ***"));
        assert!(transcript.contains("*** Enter an integer value between 1 and 4. ***"));
        assert!(transcript.contains("The probability of a Farkle rolling 5 dice is 0.08"));
    }

    #[test]
    fn farkle_skips_to_closing_thoughts() {
        let (result, points, transcript) = run("here goes\nugh\n", &[&[2, 3, 4, 6, 6, 2]]);
        assert_eq!(result.unwrap(), "ugh");
        assert_eq!(points, 0);
        assert!(transcript.contains("Farkle after roll #1!"));
    }

    #[test]
    fn console_seats_share_stdin() {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let first = HumanPlayer::console("A");
            let second = HumanPlayer::console("B");
            sender
                .send((first.name().to_string(), second.name().to_string()))
                .unwrap();
        });
        let names = receiver.recv_timeout(Duration::from_secs(3)).unwrap();
        assert_eq!(names, ("A".to_string(), "B".to_string()));
    }

    #[test]
    fn closed_input_is_a_fault() {
        let (result, _, _) = run("", &[]);
        assert!(matches!(result, Err(TurnFault::Player(_))));
    }
}
