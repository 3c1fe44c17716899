//! Interactive shell loop
//!
//! Input lines arrive over a channel (a reader thread in production, a
//! vector in tests). Between lines the loop ticks the app so async results
//! and autosave deadlines are handled while the user is idle.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;

use super::app::App;
use super::input::{parse_line, ShellCommand, HELP};
use crate::messages::Msg;
use crate::view;

/// How often the loop wakes up without input
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// How long a command waits for its file operations before the prompt
/// returns. Dialogs usually take longer and report back on a later tick.
pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(2);

/// Upper bound on waiting for writes at exit
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Run the shell on stdin/stdout until `quit` or end of input
pub fn run(app: &mut App) -> Result<()> {
    let (line_tx, line_rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if line_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!("stdin read failed: {}", e);
                    break;
                }
            }
        }
    });

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "vellum - type 'help' for commands")?;
    run_with(app, line_rx, &mut out)
}

/// The shell loop over an arbitrary line source and output
pub fn run_with(app: &mut App, lines: Receiver<String>, out: &mut impl Write) -> Result<()> {
    loop {
        match lines.recv_timeout(TICK_INTERVAL) {
            Ok(line) => match parse_line(&line) {
                Ok(ShellCommand::Quit) => break,
                Ok(command) => execute(app, command, out)?,
                Err(e) => writeln!(out, "error: {}", e)?,
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                tracing::debug!("end of input");
                break;
            }
        }

        app.tick(Instant::now());
        print_status(app, out)?;
    }

    if !app.shutdown(SHUTDOWN_TIMEOUT) {
        writeln!(out, "warning: some writes did not finish")?;
    }
    print_status(app, out)?;
    out.flush()?;
    Ok(())
}

fn execute(app: &mut App, command: ShellCommand, out: &mut impl Write) -> Result<()> {
    match command {
        ShellCommand::Nothing | ShellCommand::Quit => {}
        ShellCommand::Dispatch(msg) => {
            app.dispatch(msg);
            app.wait_idle(SETTLE_TIMEOUT);
        }
        ShellCommand::Append(text) => {
            if app.model().session.has_document() {
                let appended = format!("{}{}", app.model().session.buffer(), text);
                app.dispatch(Msg::edit(appended));
            } else {
                writeln!(out, "No document open")?;
            }
        }
        ShellCommand::Tree => write!(out, "{}", view::render_tree(app.model()))?,
        ShellCommand::Show => write!(out, "{}", view::render_document(app.model()))?,
        ShellCommand::Status => {
            writeln!(out, "{}", view::render_status(app.model(), Instant::now()))?
        }
        ShellCommand::Help => writeln!(out, "{}", HELP)?,
    }
    Ok(())
}

fn print_status(app: &mut App, out: &mut impl Write) -> io::Result<()> {
    while let Some(status) = app.take_status() {
        writeln!(out, "{}", status)?;
    }
    out.flush()
}
