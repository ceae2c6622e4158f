use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};

use log::debug;
use thiserror::Error;

use crate::browser::provider::DocumentProvider;
use crate::interact::dispatcher::Payload;
use crate::navigation::controller::NavigationController;
use crate::navigation::display::DisplaySurface;

/// Work for the navigation controller, consumed one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `epoch` orders navigations; only the newest one is rendered.
    Navigate { url: String, epoch: u64 },
    Select { index: i64, value: Option<String> },
    Refresh,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("navigation worker has stopped")]
pub struct QueueClosed;

/// Producer side, held by the display surface.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: Sender<Command>,
    latest_navigation: Arc<AtomicU64>,
}

/// Consumer side, held by the thread that owns the controller.
pub struct CommandReceiver {
    rx: Receiver<Command>,
    latest_navigation: Arc<AtomicU64>,
    backlog: VecDeque<Command>,
}

pub fn command_channel() -> (CommandSender, CommandReceiver) {
    let (tx, rx) = mpsc::channel();
    let latest_navigation = Arc::new(AtomicU64::new(0));

    (
        CommandSender {
            tx,
            latest_navigation: Arc::clone(&latest_navigation),
        },
        CommandReceiver {
            rx,
            latest_navigation,
            backlog: VecDeque::new(),
        },
    )
}

impl CommandSender {
    /// Queue a navigation. Any navigation queued or in flight before it
    /// becomes stale.
    pub fn navigate(&self, url: &str) -> Result<(), QueueClosed> {
        let epoch = self.latest_navigation.fetch_add(1, Ordering::SeqCst) + 1;
        self.send(Command::Navigate {
            url: url.to_string(),
            epoch,
        })
    }

    pub fn select(&self, index: i64, value: Option<String>) -> Result<(), QueueClosed> {
        self.send(Command::Select { index, value })
    }

    pub fn refresh(&self) -> Result<(), QueueClosed> {
        self.send(Command::Refresh)
    }

    pub fn quit(&self) -> Result<(), QueueClosed> {
        self.send(Command::Quit)
    }

    fn send(&self, command: Command) -> Result<(), QueueClosed> {
        self.tx.send(command).map_err(|_| QueueClosed)
    }
}

impl CommandReceiver {
    /// Block until the next command worth running. A pending `Quit` jumps
    /// the queue and discards everything else, stale navigations are
    /// dropped, and back-to-back refreshes collapse into one. `None` once
    /// every sender is gone.
    pub fn next_command(&mut self) -> Option<Command> {
        loop {
            if self.backlog.is_empty() {
                let command = self.rx.recv().ok()?;
                self.backlog.push_back(command);
            }
            self.drain();

            if self.backlog.contains(&Command::Quit) {
                debug!("quit requested, dropping {} pending commands", self.backlog.len() - 1);
                self.backlog.clear();
                return Some(Command::Quit);
            }

            while let Some(command) = self.backlog.pop_front() {
                let skip = match &command {
                    Command::Navigate { url, epoch } if self.is_superseded(*epoch) => {
                        debug!("dropping stale navigation to {}", url);
                        true
                    }
                    Command::Refresh => matches!(self.backlog.front(), Some(Command::Refresh)),
                    _ => false,
                };
                if !skip {
                    return Some(command);
                }
            }
        }
    }

    /// Whether a navigation newer than `epoch` has been requested.
    pub fn is_superseded(&self, epoch: u64) -> bool {
        self.latest_navigation.load(Ordering::SeqCst) != epoch
    }

    /// The epoch of the newest navigation requested so far.
    pub fn current_epoch(&self) -> u64 {
        self.latest_navigation.load(Ordering::SeqCst)
    }

    fn drain(&mut self) {
        while let Ok(command) = self.rx.try_recv() {
            self.backlog.push_back(command);
        }
    }
}

/// Run commands against the controller until `Quit` or until the sender
/// side hangs up, then close the session.
pub fn run_worker<P: DocumentProvider, D: DisplaySurface>(
    mut controller: NavigationController<P, D>,
    mut commands: CommandReceiver,
) {
    while let Some(command) = commands.next_command() {
        let result = match command {
            Command::Navigate { url, epoch } => {
                controller.navigate_unless(&url, &|| commands.is_superseded(epoch))
            }
            Command::Select { index, value } => {
                let epoch = commands.current_epoch();
                controller.interact_unless(index, &Payload { value }, &|| commands.is_superseded(epoch))
            }
            Command::Refresh => controller.refresh(),
            Command::Quit => break,
        };

        if let Err(e) = result {
            debug!("command finished with: {}", e);
        }
    }

    controller.close();
}
