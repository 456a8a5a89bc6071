//! Terminal confirmation prompt for leaving the workflow with unsaved changes

use std::io::{self, BufRead, BufReader, Write};
use std::sync::Mutex;

use crate::application::ports::outbound::{ConfirmPrompt, NavigationDecision};

pub struct TerminalPrompt {
    input: Mutex<Box<dyn BufRead + Send>>,
    output: Mutex<Box<dyn Write + Send>>,
}

impl TerminalPrompt {
    pub fn new(input: impl BufRead + Send + 'static, output: impl Write + Send + 'static) -> Self {
        Self {
            input: Mutex::new(Box::new(input)),
            output: Mutex::new(Box::new(output)),
        }
    }

    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stderr())
    }

    fn ask(&self, message: &str) -> io::Result<NavigationDecision> {
        let (Ok(mut input), Ok(mut output)) = (self.input.lock(), self.output.lock()) else {
            return Ok(NavigationDecision::Stay);
        };
        loop {
            write!(output, "{message} [s]ave / [d]iscard / s[t]ay: ")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                // Nobody to answer; keep the user's work where it is
                return Ok(NavigationDecision::Stay);
            }
            match parse_decision(&line) {
                Some(decision) => return Ok(decision),
                None => writeln!(output, "Please answer s, d or t.")?,
            }
        }
    }
}

pub fn parse_decision(answer: &str) -> Option<NavigationDecision> {
    match answer.trim().to_lowercase().as_str() {
        "s" | "save" => Some(NavigationDecision::SaveAndLeave),
        "d" | "discard" => Some(NavigationDecision::DiscardAndLeave),
        "t" | "stay" | "" => Some(NavigationDecision::Stay),
        _ => None,
    }
}

impl ConfirmPrompt for TerminalPrompt {
    /// Blocks the calling thread until a line is read
    fn confirm(&self, message: &str) -> NavigationDecision {
        self.ask(message).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Prompt failed, staying on page");
            NavigationDecision::Stay
        })
    }
}
