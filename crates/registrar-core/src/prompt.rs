//! Interactive input
//!
//! `ConsolePrompter` reads from the terminal; `ScriptedPrompter` replays
//! canned answers and is what the tests drive.

use console::Term;
use std::collections::VecDeque;

use crate::error::{CoreError, Result};

/// Source of interactive answers
pub trait Prompter {
    /// Read an integer within `[min, max]`
    fn read_option(&mut self, label: &str, min: usize, max: usize) -> Result<usize>;

    /// Read a line of text, trimmed
    fn read_text(&mut self, label: &str) -> Result<String>;

    /// Read a value without echoing it
    fn read_secret(&mut self, label: &str) -> Result<String>;
}

/// Parse a menu choice, rejecting anything outside `[min, max]`
pub fn parse_option(input: &str, min: usize, max: usize) -> Result<usize> {
    let invalid = || CoreError::InvalidOption {
        input: input.trim().to_string(),
        min,
        max,
    };
    let value: usize = input.trim().parse().map_err(|_| invalid())?;
    if value < min || value > max {
        return Err(invalid());
    }
    Ok(value)
}

/// Prompter backed by the controlling terminal
pub struct ConsolePrompter {
    term: Term,
}

impl ConsolePrompter {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }
}

impl Default for ConsolePrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for ConsolePrompter {
    fn read_option(&mut self, label: &str, min: usize, max: usize) -> Result<usize> {
        let line = self.read_text(&format!("{} [{}-{}]", label, min, max))?;
        parse_option(&line, min, max)
    }

    fn read_text(&mut self, label: &str) -> Result<String> {
        self.term.write_str(&format!("{}: ", label))?;
        let line = self.term.read_line()?;
        Ok(line.trim().to_string())
    }

    fn read_secret(&mut self, label: &str) -> Result<String> {
        Ok(rpassword::prompt_password(format!("{}: ", label))?)
    }
}

/// Prompter that answers from a fixed script
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    /// Labels of every prompt shown, in order
    pub asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, label: &str) -> Result<String> {
        self.asked.push(label.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| CoreError::PromptExhausted {
                label: label.to_string(),
            })
    }
}

impl Prompter for ScriptedPrompter {
    fn read_option(&mut self, label: &str, min: usize, max: usize) -> Result<usize> {
        let answer = self.next(label)?;
        parse_option(&answer, min, max)
    }

    fn read_text(&mut self, label: &str) -> Result<String> {
        Ok(self.next(label)?.trim().to_string())
    }

    fn read_secret(&mut self, label: &str) -> Result<String> {
        self.next(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_option_in_range() {
        assert_eq!(parse_option("1", 1, 4).unwrap(), 1);
        assert_eq!(parse_option(" 4\n", 1, 4).unwrap(), 4);
    }

    #[test]
    fn test_parse_option_rejects() {
        for input in ["0", "5", "-1", "two", "", "1.5"] {
            let err = parse_option(input, 1, 4).unwrap_err();
            assert!(
                matches!(err, CoreError::InvalidOption { min: 1, max: 4, .. }),
                "input {:?} gave {}",
                input,
                err
            );
        }
    }

    #[test]
    fn test_invalid_option_message() {
        let err = parse_option("9", 1, 3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid option '9': expected a number between 1 and 3"
        );
    }

    #[test]
    fn test_scripted_prompter() {
        let mut prompter = ScriptedPrompter::new(["2", "  john  ", "pw "]);
        assert_eq!(prompter.read_option("Choose", 1, 3).unwrap(), 2);
        assert_eq!(prompter.read_text("User").unwrap(), "john");
        assert_eq!(prompter.read_secret("Password").unwrap(), "pw ");
        assert_eq!(prompter.asked, vec!["Choose", "User", "Password"]);
        assert_eq!(prompter.remaining(), 0);

        let err = prompter.read_text("More").unwrap_err();
        assert!(matches!(err, CoreError::PromptExhausted { .. }));
    }
}
