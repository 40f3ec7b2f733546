//! Blocking yes/no confirmation.

use std::io::{self, Write};

pub trait Confirm {
    fn confirm(&mut self, question: &str) -> bool;
}

/// Prompts on the terminal. Stdin is locked only for the duration of one answer
/// so the command loop can keep reading from it.
pub struct StdinPrompt;

impl Confirm for StdinPrompt {
    fn confirm(&mut self, question: &str) -> bool {
        ask(&mut io::stdout(), question, |answer| io::stdin().read_line(answer))
    }
}

fn ask<W, F>(output: &mut W, question: &str, read_line: F) -> bool
where
    W: Write,
    F: FnOnce(&mut String) -> io::Result<usize>,
{
    if write!(output, "{question} [y/N] ")
        .and_then(|_| output.flush())
        .is_err()
    {
        return false;
    }
    let mut answer = String::new();
    match read_line(&mut answer) {
        Ok(_) => is_yes(&answer),
        Err(err) => {
            tracing::warn!(error = %err, "confirmation prompt failed");
            false
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
