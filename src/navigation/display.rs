use std::sync::mpsc::Sender;

use serde::Serialize;

use crate::navigation::controller::NavState;
use crate::render::formatter::StyledText;

/// Where the controller sends what the user should see.
pub trait DisplaySurface {
    fn set_text(&mut self, content: StyledText);

    /// Address indicator; only updated after a successful load.
    fn set_address(&mut self, url: &str);

    fn set_state(&mut self, _state: &NavState) {}

    /// An input was selected without a value; ask the user for one.
    fn prompt_value(&mut self, _index: usize, _input_type: &str) {}
}

/// Updates carried from the controller thread to the terminal thread.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DisplayUpdate {
    Text(StyledText),
    Address(String),
    State(NavState),
    PromptValue { index: usize, input_type: String },
}

/// A display surface that forwards every update over a channel.
/// Send errors mean the terminal side has gone away and are ignored.
pub struct ChannelDisplay {
    tx: Sender<DisplayUpdate>,
}

impl ChannelDisplay {
    pub fn new(tx: Sender<DisplayUpdate>) -> Self {
        Self { tx }
    }
}

impl DisplaySurface for ChannelDisplay {
    fn set_text(&mut self, content: StyledText) {
        let _ = self.tx.send(DisplayUpdate::Text(content));
    }

    fn set_address(&mut self, url: &str) {
        let _ = self.tx.send(DisplayUpdate::Address(url.to_string()));
    }

    fn set_state(&mut self, state: &NavState) {
        let _ = self.tx.send(DisplayUpdate::State(state.clone()));
    }

    fn prompt_value(&mut self, index: usize, input_type: &str) {
        let _ = self.tx.send(DisplayUpdate::PromptValue {
            index,
            input_type: input_type.to_string(),
        });
    }
}

/// Keeps the last content and address; used by one-shot rendering.
#[derive(Debug, Default)]
pub struct CaptureDisplay {
    pub last: Option<StyledText>,
    pub address: Option<String>,
}

impl DisplaySurface for CaptureDisplay {
    fn set_text(&mut self, content: StyledText) {
        self.last = Some(content);
    }

    fn set_address(&mut self, url: &str) {
        self.address = Some(url.to_string());
    }
}
