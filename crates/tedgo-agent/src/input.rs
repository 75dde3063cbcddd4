//! Terminal input on its own thread.
//!
//! A blocking read of stdin cannot be cancelled, so it must not live on the
//! runtime: a reader parked there keeps the process alive after the session
//! has ended. Lines are handed over through a channel instead, and the
//! thread simply dies with the process.

use std::io::{self, BufRead};
use std::thread;

use tokio::sync::mpsc;

/// Lines read from the terminal, or the read error that ended them.
pub type LineReceiver = mpsc::Receiver<io::Result<String>>;

const LINE_BUFFER: usize = 16;

/// Read `reader` line by line on a detached thread.
///
/// The channel closes at end of input, after the first read error, or once
/// the receiving side is dropped.
pub fn spawn_line_reader<R>(reader: R) -> io::Result<LineReceiver>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(LINE_BUFFER);

    thread::Builder::new()
        .name("tedgo-input".into())
        .spawn(move || {
            for line in reader.lines() {
                let failed = line.is_err();
                if tx.blocking_send(line).is_err() || failed {
                    break;
                }
            }
        })?;

    Ok(rx)
}
