use serde::Serialize;
use thiserror::Error;

use crate::document::document_model::DocumentNode;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Node.js subprocess failed to spawn
    #[error("Failed to spawn {script} (is Node.js installed?): {source}")]
    SubprocessSpawn {
        script: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading from or writing to the subprocess failed
    #[error("Browser session I/O: {0}")]
    SessionIO(String),

    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON serialize error ({context}): {source}")]
    JsonSerialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The provider answered but reported failure
    #[error("{command} failed: {error}")]
    Protocol { command: String, error: String },

    /// No node of the requested tag at the requested position
    #[error("no <{tag}> element at position {position}")]
    NodeMissing { tag: String, position: usize },

    #[error("{0}")]
    Page(String),
}

/// Which same-tag collection an action addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorKind {
    Input,
    Button,
    Form,
}

impl SelectorKind {
    pub fn tag(self) -> &'static str {
        match self {
            SelectorKind::Input => "input",
            SelectorKind::Button => "button",
            SelectorKind::Form => "form",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementAction {
    Fill,
    Click,
    Submit,
}

/// An action against the live document, addressed by position among
/// same-tag elements (0-based, document order).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionRequest {
    pub selector: SelectorKind,
    pub position: usize,
    pub action: ElementAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ActionRequest {
    pub fn fill(position: usize, value: &str) -> Self {
        Self {
            selector: SelectorKind::Input,
            position,
            action: ElementAction::Fill,
            value: Some(value.to_string()),
        }
    }

    pub fn click(position: usize) -> Self {
        Self {
            selector: SelectorKind::Button,
            position,
            action: ElementAction::Click,
            value: None,
        }
    }

    pub fn submit(position: usize) -> Self {
        Self {
            selector: SelectorKind::Form,
            position,
            action: ElementAction::Submit,
            value: None,
        }
    }
}

/// An engine that loads pages, exposes their document tree and performs
/// actions on it. One provider backs one browsing session.
pub trait DocumentProvider {
    /// Load `url`, following redirects.
    fn load(&mut self, url: &str) -> Result<(), ProviderError>;

    /// The URL of the loaded document after redirects.
    fn current_url(&mut self) -> Result<String, ProviderError>;

    /// Snapshot the live document tree rooted at `<body>`.
    fn evaluate(&mut self) -> Result<DocumentNode, ProviderError>;

    fn act(&mut self, request: &ActionRequest) -> Result<(), ProviderError>;

    fn close(&mut self) -> Result<(), ProviderError>;
}

impl<P: DocumentProvider + ?Sized> DocumentProvider for Box<P> {
    fn load(&mut self, url: &str) -> Result<(), ProviderError> {
        (**self).load(url)
    }

    fn current_url(&mut self) -> Result<String, ProviderError> {
        (**self).current_url()
    }

    fn evaluate(&mut self) -> Result<DocumentNode, ProviderError> {
        (**self).evaluate()
    }

    fn act(&mut self, request: &ActionRequest) -> Result<(), ProviderError> {
        (**self).act(request)
    }

    fn close(&mut self) -> Result<(), ProviderError> {
        (**self).close()
    }
}
