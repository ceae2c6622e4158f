//! Terminal display surface.
//!
//! The navigation controller runs on its own thread and owns the document
//! session. This thread only draws what the controller reports and turns
//! key presses into commands for it.

pub mod app;
pub mod keys;
pub mod view;

use std::io;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use log::{info, warn};
use ratatui::DefaultTerminal;

use crate::browser::provider::DocumentProvider;
use crate::navigation::controller::NavigationController;
use crate::navigation::display::{ChannelDisplay, DisplayUpdate};
use crate::navigation::queue::{CommandSender, command_channel, run_worker};
use crate::render::render_model::RenderOptions;
use crate::trace::logger::TraceLogger;
use crate::tui::app::{App, UserRequest};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn run<P: DocumentProvider + Send + 'static>(
    provider: P,
    start_url: &str,
    options: RenderOptions,
    tracer: TraceLogger,
) -> io::Result<()> {
    let (commands, receiver) = command_channel();
    let (update_tx, update_rx) = mpsc::channel();

    let controller = NavigationController::new(provider, ChannelDisplay::new(update_tx), options, tracer);
    let worker = thread::Builder::new()
        .name("navigation".into())
        .spawn(move || run_worker(controller, receiver))?;

    let mut app = App::new(start_url);
    if commands.navigate(start_url).is_err() {
        app.notice = Some("navigation worker has stopped".into());
    }

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app, &commands, &update_rx);
    ratatui::restore();

    let _ = commands.quit();
    if worker.join().is_err() {
        warn!("navigation worker panicked");
    }
    info!("session closed");
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    commands: &CommandSender,
    updates: &Receiver<DisplayUpdate>,
) -> io::Result<()> {
    loop {
        while let Ok(update) = updates.try_recv() {
            app.apply(update);
        }

        terminal.draw(|frame| view::draw(frame, app))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(request) = app.handle_key(key) {
                        submit(app, commands, request);
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn submit(app: &mut App, commands: &CommandSender, request: UserRequest) {
    let sent = match request {
        UserRequest::Navigate(url) => commands.navigate(&url),
        UserRequest::Select { index, value } => commands.select(index, value),
        UserRequest::Refresh => commands.refresh(),
        UserRequest::Quit => return,
    };

    if let Err(e) = sent {
        app.notice = Some(e.to_string());
    }
}
