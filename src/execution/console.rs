//! Interactive Terminal Operator
//!
//! The [`Operator`] used by the binary: coloured output on stdout, "press
//! Enter" prompts on stdin, commands through the platform shell and URLs
//! through the platform opener.
//!
//! Ctrl-C is caught for the lifetime of the operator. A dedicated thread
//! runs a small tokio runtime that forwards every interrupt into the same
//! channel the prompt reader uses, so a confirmation wait ends with either a
//! line, end of input, or an interrupt. Interrupts that arrive while a
//! spawned command is running reach that command (same process group) and
//! are dropped before the next prompt; the engine never cancels a command
//! mid-flight.

use std::io::{self, BufRead, Write};
use std::process::{Command, Stdio};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

use log::{debug, warn};

use crate::error::{ReleaseError, Result};

use super::operator::{CommandOutcome, Operator, Tone};

/// What ended a confirmation wait.
#[derive(Debug)]
enum InputEvent {
    Line,
    Closed,
    Interrupt,
    Failed(io::Error),
}

/// Operator backed by the process's terminal.
pub struct ConsoleOperator {
    events: Receiver<InputEvent>,
    sender: Sender<InputEvent>,
}

impl ConsoleOperator {
    /// Creates the operator and installs the Ctrl-C listener.
    pub fn new() -> Result<Self> {
        let (sender, events) = channel();
        install_interrupt_listener(sender.clone())?;
        Ok(Self { events, sender })
    }

    fn discard_stale_events(&self) {
        while let Ok(event) = self.events.try_recv() {
            debug!("Discarding input event from before the prompt: {:?}", event);
        }
    }
}

impl Operator for ConsoleOperator {
    fn show(&mut self, tone: Tone, text: &str) {
        println!("{}", tone.paint(text));
    }

    fn confirm(&mut self) -> Result<()> {
        self.discard_stale_events();

        print!("\n{}", Tone::Prompt.paint("Press Enter to continue"));
        io::stdout().flush().map_err(ReleaseError::Console)?;

        let sender = self.sender.clone();
        thread::Builder::new()
            .name("prompt-reader".to_string())
            .spawn(move || {
                let mut line = String::new();
                let event = match io::stdin().lock().read_line(&mut line) {
                    Ok(0) => InputEvent::Closed,
                    Ok(_) => InputEvent::Line,
                    Err(e) => InputEvent::Failed(e),
                };
                let _ = sender.send(event);
            })
            .map_err(ReleaseError::Console)?;

        match self.events.recv() {
            Ok(InputEvent::Line) => {
                println!();
                Ok(())
            }
            Ok(InputEvent::Interrupt) => Err(ReleaseError::Interrupted),
            Ok(InputEvent::Failed(e)) => Err(ReleaseError::Console(e)),
            Ok(InputEvent::Closed) | Err(_) => {
                println!();
                Err(ReleaseError::InputClosed)
            }
        }
    }

    fn run_command(&mut self, command: &str) -> Result<CommandOutcome> {
        let status = shell(command)
            .status()
            .map_err(|source| ReleaseError::Spawn {
                command: command.to_string(),
                source,
            })?;

        debug!("'{}' exited with {:?}", command, status.code());
        Ok(CommandOutcome {
            code: status.code(),
        })
    }

    fn open_url(&mut self, url: &str) -> Result<()> {
        self.show(Tone::Plain, &format!("Opening {}", url));

        match opener(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(_) => debug!("Browser launched for {}", url),
            Err(e) => warn!("Could not open a browser for {}: {}", url, e),
        }
        Ok(())
    }
}

#[cfg(unix)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

#[cfg(target_os = "macos")]
fn opener(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(windows)]
fn opener(url: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(url);
    cmd
}

#[cfg(all(unix, not(target_os = "macos")))]
fn opener(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}

/// Spawns the thread that turns Ctrl-C into [`InputEvent::Interrupt`].
///
/// Returns once the handler is registered, so no interrupt after this call
/// can terminate the process.
fn install_interrupt_listener(sender: Sender<InputEvent>) -> Result<()> {
    let (ready_tx, ready_rx) = channel::<io::Result<()>>();

    thread::Builder::new()
        .name("interrupt-listener".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };

            runtime.block_on(async move {
                let mut interrupts = match listen() {
                    Ok(interrupts) => {
                        let _ = ready_tx.send(Ok(()));
                        interrupts
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };

                while interrupts.recv().await.is_some() {
                    if sender.send(InputEvent::Interrupt).is_err() {
                        break;
                    }
                }
            });
        })
        .map_err(ReleaseError::Console)?;

    match ready_rx.recv() {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(ReleaseError::Console(e)),
        Err(_) => Err(ReleaseError::Console(io::Error::new(
            io::ErrorKind::Other,
            "interrupt listener exited during setup",
        ))),
    }
}

#[cfg(unix)]
fn listen() -> io::Result<tokio::signal::unix::Signal> {
    use tokio::signal::unix::{signal, SignalKind};
    signal(SignalKind::interrupt())
}

#[cfg(windows)]
fn listen() -> io::Result<tokio::signal::windows::CtrlC> {
    tokio::signal::windows::ctrl_c()
}
