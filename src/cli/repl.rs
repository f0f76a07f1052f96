//! Interactive read-eval-print loop.
//!
//! Reads one line at a time, hands it to the [`ChatSession`] and prints the
//! outcome. The loop waits for each reply before reading the next line.
//! `/exit`, end of input and Ctrl-C all end the session with the farewell
//! line; any generation error ends it with that error.
//!
//! Lines arrive over a channel so the loop never owns a read it cannot
//! abandon. Stdin is read on a plain OS thread; an interrupt at the prompt
//! leaves that thread blocked and returns immediately.

use super::output::Output;
use crate::chat::{ChatSession, Outcome, HELP_TEXT};
use crate::llm::GenerationService;
use crate::types::Result;
use std::io::{self, BufRead};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::debug;

type LineReceiver = mpsc::Receiver<io::Result<String>>;

/// Run the chat loop on stdin until the user leaves.
pub async fn run<G: GenerationService>(session: &mut ChatSession<G>, output: &Output) -> Result<()> {
    let (tx, rx) = mpsc::channel(1);
    std::thread::spawn(move || read_stdin(tx));
    run_with_lines(session, rx, output).await
}

/// Blocking stdin reader. Stops at end of input, on a read error, or once
/// the loop has gone away.
fn read_stdin(tx: mpsc::Sender<io::Result<String>>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let failed = line.is_err();
        if tx.blocking_send(line).is_err() || failed {
            break;
        }
    }
}

/// Run the chat loop over any line source.
pub async fn run_with_input<G, R>(
    session: &mut ChatSession<G>,
    input: R,
    output: &Output,
) -> Result<()>
where
    G: GenerationService,
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(1);
    tokio::spawn(async move {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await.transpose() {
            let failed = line.is_err();
            if tx.send(line).await.is_err() || failed {
                break;
            }
        }
    });
    run_with_lines(session, rx, output).await
}

async fn run_with_lines<G: GenerationService>(
    session: &mut ChatSession<G>,
    mut lines: LineReceiver,
    output: &Output,
) -> Result<()> {
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    loop {
        output.prompt();

        let line = tokio::select! {
            line = lines.recv() => line,
            _ = &mut interrupt => {
                debug!("Interrupted while reading input");
                output.newline();
                output.farewell();
                return Ok(());
            }
        };

        let Some(line) = line else {
            debug!("End of input");
            output.newline();
            output.farewell();
            return Ok(());
        };
        let line = line?;

        let outcome = tokio::select! {
            outcome = session.handle_line(&line) => outcome?,
            _ = &mut interrupt => {
                debug!("Interrupted while generating");
                output.newline();
                output.farewell();
                return Ok(());
            }
        };

        match outcome {
            Outcome::Ignored => continue,
            Outcome::Exit => {
                output.farewell();
                return Ok(());
            }
            Outcome::Reset => output.success("Memory cleared!"),
            Outcome::Help => output.info(HELP_TEXT),
            Outcome::Reply(reply) => output.bot(&reply),
        }
    }
}
