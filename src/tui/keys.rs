use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Operations reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    FocusAddress,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    SelectIndex,
    Refresh,
    Confirm,
    Cancel,
}

pub struct Binding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: KeyAction,
    pub description: &'static str,
}

const fn bind(code: KeyCode, modifiers: KeyModifiers, action: KeyAction, description: &'static str) -> Binding {
    Binding {
        code,
        modifiers,
        action,
        description,
    }
}

/// Bindings active while reading the page.
pub const BROWSE_BINDINGS: &[Binding] = &[
    bind(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyAction::Quit, "quit"),
    bind(KeyCode::Char('q'), KeyModifiers::NONE, KeyAction::Quit, "quit"),
    bind(KeyCode::Char('l'), KeyModifiers::CONTROL, KeyAction::FocusAddress, "address"),
    bind(KeyCode::Up, KeyModifiers::NONE, KeyAction::ScrollUp, "scroll"),
    bind(KeyCode::Down, KeyModifiers::NONE, KeyAction::ScrollDown, "scroll"),
    bind(KeyCode::PageUp, KeyModifiers::NONE, KeyAction::PageUp, "page up"),
    bind(KeyCode::PageDown, KeyModifiers::NONE, KeyAction::PageDown, "page down"),
    bind(KeyCode::Char('i'), KeyModifiers::NONE, KeyAction::SelectIndex, "select element"),
    bind(KeyCode::Char('r'), KeyModifiers::NONE, KeyAction::Refresh, "refresh"),
];

/// Bindings active while a prompt (address, index, value) is being edited.
/// Every other key edits the prompt text.
pub const PROMPT_BINDINGS: &[Binding] = &[
    bind(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyAction::Quit, "quit"),
    bind(KeyCode::Enter, KeyModifiers::NONE, KeyAction::Confirm, "confirm"),
    bind(KeyCode::Esc, KeyModifiers::NONE, KeyAction::Cancel, "cancel"),
];

pub fn lookup(bindings: &[Binding], key: &KeyEvent) -> Option<KeyAction> {
    // Shift is implied by the character itself
    let modifiers = key.modifiers.difference(KeyModifiers::SHIFT);
    bindings
        .iter()
        .find(|b| b.code == key.code && b.modifiers == modifiers)
        .map(|b| b.action)
}

/// One-line help built from the browse table, e.g. "q quit · i select element".
pub fn help_line() -> String {
    BROWSE_BINDINGS
        .iter()
        .filter(|b| !matches!(b.action, KeyAction::ScrollDown | KeyAction::PageDown))
        .map(|b| format!("{} {}", key_label(b), b.description))
        .collect::<Vec<_>>()
        .join(" · ")
}

fn key_label(binding: &Binding) -> String {
    let key = match binding.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Up => "↑/↓".to_string(),
        KeyCode::PageUp => "PgUp/PgDn".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        other => format!("{:?}", other),
    };

    if binding.modifiers.contains(KeyModifiers::CONTROL) {
        format!("Ctrl+{}", key.to_uppercase())
    } else {
        key
    }
}
