//! Operator prompts.
//!
//! The interactive surface is a capability trait so the capture and upload
//! flows can be driven by a scripted double in tests. The terminal
//! implementation reads answers line-by-line from stdin.

use std::io::{self, BufRead, Write};

use thiserror::Error;

/// Errors from operator interaction.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("I/O error reading operator input: {0}")]
    Io(#[from] io::Error),

    /// stdin closed before the operator answered.
    #[error("Input stream closed before a choice was made")]
    Closed,
}

/// Interactive capability consumed by the capture and upload flows.
pub trait Prompt {
    /// Present a yes/no question and block until answered.
    fn confirm(&mut self, message: &str) -> Result<bool, PromptError>;

    /// Present a multi-select checklist and return the chosen indices.
    ///
    /// An empty choice list yields an empty selection without blocking.
    fn multi_select(
        &mut self,
        message: &str,
        choices: &[String],
    ) -> Result<Vec<usize>, PromptError>;
}

/// Interactive prompt over stdin/stdout.
pub struct TerminalPrompt;

impl TerminalPrompt {
    pub fn new() -> Self {
        Self
    }

    fn read_line(&self) -> Result<String, PromptError> {
        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(PromptError::Closed);
        }
        Ok(line)
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for TerminalPrompt {
    fn confirm(&mut self, message: &str) -> Result<bool, PromptError> {
        loop {
            print!("{} [y/n]: ", message);
            io::stdout().flush()?;
            let line = self.read_line()?;
            match parse_confirmation(&line) {
                Some(answer) => return Ok(answer),
                None => println!("Please answer 'y' or 'n'."),
            }
        }
    }

    fn multi_select(
        &mut self,
        message: &str,
        choices: &[String],
    ) -> Result<Vec<usize>, PromptError> {
        if choices.is_empty() {
            return Ok(Vec::new());
        }

        println!("{}", message);
        for (index, choice) in choices.iter().enumerate() {
            println!("  [{}] {}", index + 1, choice);
        }

        loop {
            print!("Select entries (e.g. '1 3', empty for none): ");
            io::stdout().flush()?;
            let line = self.read_line()?;
            match parse_selection(&line, choices.len()) {
                Ok(selected) => return Ok(selected),
                Err(reason) => println!("{}", reason),
            }
        }
    }
}

/// Parse a yes/no answer. Returns `None` for input that is neither.
pub fn parse_confirmation(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Parse a checklist selection: 1-based indices separated by spaces or
/// commas. Duplicates collapse; the order of first mention is kept.
pub fn parse_selection(input: &str, len: usize) -> Result<Vec<usize>, String> {
    let mut selected = Vec::new();
    for token in input
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        let number: usize = token
            .parse()
            .map_err(|_| format!("'{}' is not a number", token))?;
        if number == 0 || number > len {
            return Err(format!("'{}' is out of range (1-{})", number, len));
        }
        if !selected.contains(&(number - 1)) {
            selected.push(number - 1);
        }
    }
    Ok(selected)
}

#[cfg(test)]
pub mod testing {
    use std::collections::VecDeque;

    use super::{Prompt, PromptError};

    /// Scripted prompt double. Answers are popped in order; consulting it
    /// with no programmed answer surfaces as [`PromptError::Closed`].
    #[derive(Default)]
    pub struct ScriptedPrompt {
        confirms: VecDeque<bool>,
        selections: VecDeque<Vec<usize>>,
    }

    impl ScriptedPrompt {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_confirm(&mut self, answer: bool) {
            self.confirms.push_back(answer);
        }

        pub fn push_selection(&mut self, selection: Vec<usize>) {
            self.selections.push_back(selection);
        }
    }

    impl Prompt for ScriptedPrompt {
        fn confirm(&mut self, _message: &str) -> Result<bool, PromptError> {
            self.confirms.pop_front().ok_or(PromptError::Closed)
        }

        fn multi_select(
            &mut self,
            _message: &str,
            choices: &[String],
        ) -> Result<Vec<usize>, PromptError> {
            if choices.is_empty() {
                return Ok(Vec::new());
            }
            self.selections.pop_front().ok_or(PromptError::Closed)
        }
    }
}
