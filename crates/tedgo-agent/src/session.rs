//! The interactive loop: one line in, one reply out.

use std::future::Future;
use std::io::Write;

use tedgo_core::{classify, Intent};
use tedgo_state::InteractionLog;
use tracing::{info, warn};

use crate::dispatcher::{record, Dispatcher, Reply};
use crate::input::LineReceiver;
use crate::replies;

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    ExitCommand,
    /// End of input, read error or interrupt signal.
    Interrupted,
}

/// Run a session until an exit command, end of input or `interrupt` fires.
///
/// `interrupt` is only observed while waiting for the next line. A command
/// already being handled runs to completion, so a transfer is always either
/// sent or cached before the session closes. The closing log lines are
/// written on every path.
pub async fn run_session<W: Write>(
    dispatcher: &mut Dispatcher,
    log: &dyn InteractionLog,
    mut lines: LineReceiver,
    out: &mut W,
    startup_lines: usize,
    interrupt: impl Future<Output = ()>,
) -> SessionEnd {
    let mut interrupt = std::pin::pin!(interrupt);

    say(out, &replies::welcome());
    record(log, replies::LOG_STARTED).await;
    greet_with_history(log, out, startup_lines).await;

    let end = loop {
        prompt(out);

        let line = tokio::select! {
            biased;
            _ = &mut interrupt => break SessionEnd::Interrupted,
            line = lines.recv() => line,
        };

        let line = match line {
            Some(Ok(line)) => line,
            None => break SessionEnd::Interrupted,
            Some(Err(e)) => {
                warn!(error = %e, "could not read input");
                break SessionEnd::Interrupted;
            }
        };

        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let intent = classify(text);
        if matches!(intent, Intent::ListBlocks) {
            say(out, replies::BLOCKS_FETCHING);
        }

        let reply = dispatcher.dispatch(text, intent).await;

        say(out, reply.text());
        if let Reply::Exit(_) = reply {
            break SessionEnd::ExitCommand;
        }
    };

    match end {
        SessionEnd::ExitCommand => record(log, replies::LOG_EXIT_COMMAND).await,
        SessionEnd::Interrupted => {
            say(out, &format!("\n{}", replies::INTERRUPTED));
            record(log, replies::LOG_INTERRUPTED).await;
        }
    }

    say(out, replies::CLOSED);
    record(log, replies::LOG_FINISHED).await;
    info!(?end, "session closed");
    end
}

async fn greet_with_history<W: Write>(log: &dyn InteractionLog, out: &mut W, n: usize) {
    match log.recent(n).await {
        Ok(recent) if !recent.is_empty() => {
            say(out, "Últimas interações:");
            for line in recent {
                say(out, &format!("   {line}"));
            }
        }
        Ok(_) => {}
        Err(e) => warn!(error = %e, "could not read interaction history"),
    }
}

fn say<W: Write>(out: &mut W, text: &str) {
    if let Err(e) = writeln!(out, "{text}") {
        warn!(error = %e, "could not write to terminal");
    }
}

fn prompt<W: Write>(out: &mut W) {
    if let Err(e) = write!(out, "Você: ").and_then(|()| out.flush()) {
        warn!(error = %e, "could not write prompt");
    }
}
