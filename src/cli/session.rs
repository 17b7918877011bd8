//! Session command - interactive prediction loop
//!
//! Each non-empty stdin line is one Predict action. After every action the
//! current result (or error) and the trend chart are printed.

use anyhow::Result;
use console::{style, Term};
use sepsafe::{Pipeline, Session};
use std::io::{BufRead, Write};
use tracing::debug;

use super::render;

pub fn run(pipeline: Pipeline) -> Result<()> {
    let interactive = Term::stdout().is_term();
    let mut session = Session::new(pipeline);

    if interactive {
        println!("{}", style("Sepsafe: Early prediction of sepsis").bold());
        println!("{}", super::order_hint());
        println!("Enter 8 values separated by commas (\"quit\" to exit)\n");
    }

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            print!("> ");
            std::io::stdout().flush()?;
        }
        let Some(line) = lines.next() else { break };
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "quit" | "exit") {
            break;
        }

        // Errors are shown in the view; the loop keeps going
        let _ = session.predict(input);
        if let Some(text) = render::view(session.view()) {
            println!("{}", text);
        }
        if let Some(chart) = render::trend(&session.trend().snapshot()) {
            println!("{}", chart);
        }
        println!();
    }

    debug!("Session ended with {} points of history", session.trend().len());
    Ok(())
}
