//! Terminal web browser: renders a live document tree as numbered text and
//! lets the keyboard act on its links, inputs, buttons and forms.

pub mod browser;
pub mod cli;
pub mod document;
pub mod error;
pub mod interact;
pub mod navigation;
pub mod registry;
pub mod render;
pub mod trace;
pub mod tui;
