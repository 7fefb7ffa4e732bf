//! Line-oriented prompts over any reader/writer pair

use std::io::{BufRead, Write};

use thiserror::Error;

/// Why a prompt produced no value
#[derive(Error, Debug)]
pub enum PromptError {
    /// Input closed before a value was read
    #[error("input closed")]
    Eof,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PromptResult<T> = Result<T, PromptError>;

/// Reads answers from `input`, writing questions to `output`
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writer for non-prompt output
    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Read one trimmed line
    pub fn line(&mut self, label: &str) -> PromptResult<String> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Err(PromptError::Eof);
        }
        Ok(buf.trim().to_string())
    }

    /// Ask until a non-empty answer is given
    pub fn required(&mut self, label: &str) -> PromptResult<String> {
        let mut answer = self.line(&format!("{}: ", label))?;
        while answer.is_empty() {
            answer = self.line(&format!("Value required. {}: ", label))?;
        }
        Ok(answer)
    }

    /// Ask once; an empty answer is allowed
    pub fn optional(&mut self, label: &str) -> PromptResult<String> {
        self.line(&format!("{}: ", label))
    }

    /// Ask with a shown default taken on empty input
    pub fn with_default(&mut self, label: &str, current: &str) -> PromptResult<String> {
        let answer = self.line(&format!("{} ({}): ", label, current))?;
        Ok(if answer.is_empty() {
            current.to_string()
        } else {
            answer
        })
    }

    /// Ask until an integer `>= min` is given
    pub fn int(&mut self, label: &str, min: i64) -> PromptResult<i64> {
        loop {
            let answer = self.line(&format!("{}: ", label))?;
            if let Some(value) = self.parse_min(&answer, min)? {
                return Ok(value);
            }
        }
    }

    /// Like [`Prompter::int`], taking `current` on empty input
    pub fn int_with_default(&mut self, label: &str, current: i64, min: i64) -> PromptResult<i64> {
        loop {
            let answer = self.line(&format!("{} ({}): ", label, current))?;
            if answer.is_empty() {
                return Ok(current);
            }
            if let Some(value) = self.parse_min(&answer, min)? {
                return Ok(value);
            }
        }
    }

    fn parse_min(&mut self, answer: &str, min: i64) -> PromptResult<Option<i64>> {
        match answer.parse::<i64>() {
            Ok(value) if value >= min => Ok(Some(value)),
            Ok(_) => {
                writeln!(self.output, "Value must be at least {}.", min)?;
                Ok(None)
            }
            Err(_) => {
                writeln!(self.output, "Please enter a valid number.")?;
                Ok(None)
            }
        }
    }
}
