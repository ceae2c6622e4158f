use serde::Serialize;

use crate::error::BrowserError;
use crate::render::render_model::{ElementKind, InteractiveElement, RenderedPage};

pub const SUMMARY_HEADER: &str = "=== Interactive Elements ===";

/// Visual treatment of a line; the display surface maps tones to colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tone {
    Plain,
    Section,
    Link,
    Input,
    Button,
    Form,
    Image,
    Error,
    Notice,
}

impl From<ElementKind> for Tone {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Link => Tone::Link,
            ElementKind::Input => Tone::Input,
            ElementKind::Button => Tone::Button,
            ElementKind::Form => Tone::Form,
            ElementKind::Image => Tone::Image,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledLine {
    pub text: String,
    pub tone: Tone,
}

impl StyledLine {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// Display-ready text: one tone per line.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StyledText {
    pub lines: Vec<StyledLine>,
}

impl StyledText {
    /// A single line, e.g. "Loading..." or an error message.
    pub fn message(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            lines: vec![StyledLine::new(text, tone)],
        }
    }

    pub fn from_error(error: &BrowserError) -> Self {
        Self::message(error.to_string(), Tone::Error)
    }

    pub fn to_plain(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Decorate a rendered page: marker lines in the body take their kind's
/// tone, and a summary section with one line per element follows the body.
/// Element order and indices are left as rendered.
pub fn format_page(page: &RenderedPage) -> StyledText {
    let mut lines: Vec<StyledLine> = page
        .body
        .lines()
        .map(|l| StyledLine::new(l, Tone::Plain))
        .collect();

    for descriptor in &page.elements {
        if let Some(line) = lines.get_mut(descriptor.line) {
            line.tone = descriptor.kind().into();
        }
    }

    lines.push(StyledLine::new("", Tone::Plain));
    lines.push(StyledLine::new(SUMMARY_HEADER, Tone::Section));

    for descriptor in &page.elements {
        let kind = descriptor.kind();
        let detail = summary_detail(&descriptor.element);
        let entry = format!("[{}] {}: {}", descriptor.index, kind.label(), detail);
        lines.push(StyledLine::new(entry, kind.into()));
    }

    StyledText { lines }
}

/// The part of a summary line after the kind label.
fn summary_detail(element: &InteractiveElement) -> String {
    match element {
        InteractiveElement::Link { text, href } => format!("{} → {}", text, href),
        InteractiveElement::Input {
            input_type,
            placeholder,
            ..
        } => {
            let input_type = if input_type.is_empty() { "text" } else { input_type.as_str() };
            if placeholder.is_empty() {
                input_type.to_string()
            } else {
                format!("{} → {}", input_type, placeholder)
            }
        }
        InteractiveElement::Button { text, .. } => text.clone(),
        InteractiveElement::Form { action, .. } => action.clone(),
        InteractiveElement::Image { alt, .. } => {
            let alt = if alt.is_empty() { "image" } else { alt.as_str() };
            format!("{} (not actionable)", alt)
        }
    }
}

/// Either the formatted page or the single-line failure message.
pub fn format_result(result: &Result<RenderedPage, BrowserError>) -> StyledText {
    match result {
        Ok(page) => format_page(page),
        Err(e) => StyledText::from_error(e),
    }
}
