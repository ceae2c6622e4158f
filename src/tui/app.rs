use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::navigation::address::normalize_address;
use crate::navigation::controller::NavState;
use crate::navigation::display::DisplayUpdate;
use crate::render::formatter::StyledText;
use crate::tui::keys::{BROWSE_BINDINGS, KeyAction, PROMPT_BINDINGS, lookup};

/// What currently receives typed characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Address,
    Index,
    Value { index: usize, input_type: String },
}

/// A request for the navigation worker, produced by a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRequest {
    Navigate(String),
    Select { index: i64, value: Option<String> },
    Refresh,
    Quit,
}

/// Terminal-side state. Holds only what is on screen; the registry stays
/// with the controller.
#[derive(Debug)]
pub struct App {
    pub mode: Mode,
    pub address: String,
    pub input: String,
    pub content: StyledText,
    pub state: NavState,
    pub notice: Option<String>,
    pub scroll: u16,
    pub page_height: u16,
    pub should_quit: bool,
}

impl App {
    pub fn new(address: &str) -> Self {
        Self {
            mode: Mode::Browse,
            address: address.to_string(),
            input: String::new(),
            content: StyledText::default(),
            state: NavState::Idle,
            notice: None,
            scroll: 0,
            page_height: 20,
            should_quit: false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<UserRequest> {
        match self.mode {
            Mode::Browse => self.handle_browse_key(&key),
            _ => self.handle_prompt_key(&key),
        }
    }

    pub fn apply(&mut self, update: DisplayUpdate) {
        match update {
            DisplayUpdate::Text(content) => {
                self.content = content;
                self.scroll = 0;
            }
            DisplayUpdate::Address(url) => self.address = url,
            DisplayUpdate::State(state) => self.state = state,
            DisplayUpdate::PromptValue { index, input_type } => {
                self.input.clear();
                self.mode = Mode::Value { index, input_type };
            }
        }
    }

    /// Text for the bottom line.
    pub fn prompt_line(&self) -> Option<String> {
        match &self.mode {
            Mode::Index => Some(format!("Enter element number: {}", self.input)),
            Mode::Value { input_type, .. } => {
                Some(format!("Enter value for {} input: {}", input_type, self.input))
            }
            Mode::Browse | Mode::Address => None,
        }
    }

    fn handle_browse_key(&mut self, key: &KeyEvent) -> Option<UserRequest> {
        self.notice = None;

        match lookup(BROWSE_BINDINGS, key)? {
            KeyAction::Quit => {
                self.should_quit = true;
                Some(UserRequest::Quit)
            }
            KeyAction::FocusAddress => {
                self.input = self.address.clone();
                self.mode = Mode::Address;
                None
            }
            KeyAction::ScrollUp => {
                self.scroll = self.scroll.saturating_sub(1);
                None
            }
            KeyAction::ScrollDown => {
                self.scroll = self.scroll.saturating_add(1).min(self.max_scroll());
                None
            }
            KeyAction::PageUp => {
                self.scroll = self.scroll.saturating_sub(self.page_height);
                None
            }
            KeyAction::PageDown => {
                self.scroll = self.scroll.saturating_add(self.page_height).min(self.max_scroll());
                None
            }
            KeyAction::SelectIndex => {
                self.input.clear();
                self.mode = Mode::Index;
                None
            }
            KeyAction::Refresh => Some(UserRequest::Refresh),
            KeyAction::Confirm | KeyAction::Cancel => None,
        }
    }

    fn handle_prompt_key(&mut self, key: &KeyEvent) -> Option<UserRequest> {
        match lookup(PROMPT_BINDINGS, key) {
            Some(KeyAction::Quit) => {
                self.should_quit = true;
                return Some(UserRequest::Quit);
            }
            Some(KeyAction::Cancel) => {
                self.leave_prompt();
                return None;
            }
            Some(KeyAction::Confirm) => return self.confirm(),
            _ => {}
        }

        match key.code {
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.push(c);
            }
            _ => {}
        }
        None
    }

    fn confirm(&mut self) -> Option<UserRequest> {
        let input = std::mem::take(&mut self.input);
        let mode = std::mem::replace(&mut self.mode, Mode::Browse);

        match mode {
            Mode::Address => normalize_address(&input).map(UserRequest::Navigate),
            Mode::Index => match input.trim().parse::<i64>() {
                Ok(index) => Some(UserRequest::Select { index, value: None }),
                Err(_) => {
                    self.notice = Some(format!("Not an element number: {}", input.trim()));
                    None
                }
            },
            Mode::Value { index, .. } => Some(UserRequest::Select {
                index: index as i64,
                value: Some(input),
            }),
            Mode::Browse => None,
        }
    }

    fn leave_prompt(&mut self) {
        self.input.clear();
        self.mode = Mode::Browse;
    }

    fn max_scroll(&self) -> u16 {
        let lines = u16::try_from(self.content.len()).unwrap_or(u16::MAX);
        lines.saturating_sub(1)
    }
}
