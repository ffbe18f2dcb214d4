use anyhow::{Context, Result};
use paris::{warn, Logger};
use std::io::{self, stdin, Write};

use crate::global::states::ForceMode;

// this handles user-interactivity, specifically getting a "yes" or "no" answer from the user
// if force is enabled then it will just return true
pub fn get_answer(prompt: &str, default: bool, force: ForceMode) -> Result<bool> {
    if force == ForceMode::Force {
        return Ok(true);
    }

    let switch = if default { "(Y/n)" } else { "(y/N)" };

    let answer_bool = loop {
        let mut logger = Logger::new();

        logger.same().warn(format!("{prompt} {switch}: "));
        io::stdout().flush().context("Unable to flush stdout")?;

        let mut answer = String::new();
        stdin()
            .read_line(&mut answer)
            .context("Unable to read from stdin")?;

        break match parse_answer(&answer, default) {
            Some(value) => value,
            None => {
                warn!("Unrecognised answer - please try again");
                continue;
            }
        };
    };
    Ok(answer_bool)
}

fn parse_answer(answer: &str, default: bool) -> Option<bool> {
    match answer.to_lowercase().chars().next() {
        None | Some('\n' | '\r') => Some(default),
        Some('y') => Some(true),
        Some('n') => Some(false),
        _ => None,
    }
}
