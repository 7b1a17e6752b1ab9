//! The interactive console loop.
//!
//! Presents the current node's rendered text and its reachable replies,
//! reads a selection, and advances the session. A reply node is never a
//! resting point: the loop immediately advances again through a uniformly
//! random eligible follow-up.

use anyhow::Result;
use colloquy_core::{NodeType, Session, render};
use rand::Rng;
use rand::seq::SliceRandom;
use std::io::{self, BufRead, Write};

const QUIT_TOKENS: [&str; 3] = ["q", "quit", "exit"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// A valid selection index in `[0, count)`.
    Choice(usize),
    Quit,
}

/// Interpret one input line against `count` presented options. `None` means
/// ask again.
pub fn parse_input(line: &str, count: usize) -> Option<Input> {
    let line = line.trim();
    if QUIT_TOKENS.contains(&line) {
        return Some(Input::Quit);
    }
    line.parse::<usize>()
        .ok()
        .filter(|choice| *choice < count)
        .map(Input::Choice)
}

/// Run the conversation until a terminal node, a quit token, or EOF.
pub fn run<R: Rng + ?Sized>(session: &mut Session<'_>, rng: &mut R) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!("{}", render(&session.current().text, session.state())?);

        let options = session.next_nodes();
        if options.is_empty() {
            return Ok(());
        }
        for (index, option) in options.iter().enumerate() {
            println!("{index}) {}", render(&option.text, session.state())?);
        }

        let choice = loop {
            print!("> ");
            io::stdout().flush()?;
            let Some(line) = lines.next() else {
                return Ok(());
            };
            match parse_input(&line?, options.len()) {
                Some(Input::Quit) => return Ok(()),
                Some(Input::Choice(choice)) => break choice,
                None => {}
            }
        };

        let chosen = options[choice].id().to_string();
        tracing::debug!(choice, node = %chosen, "selection");
        session.move_to(&chosen)?;

        if session.current().node_type == NodeType::Reply {
            let follow = session.next_nodes();
            let Some(next) = follow.choose(rng) else {
                return Ok(());
            };
            let next_id = next.id().to_string();
            tracing::debug!(node = %next_id, "auto-advance past reply");
            session.move_to(&next_id)?;
        }
    }
}
