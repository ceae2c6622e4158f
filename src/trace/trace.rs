use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::navigation::controller::NavState;
use crate::render::render_model::ElementKind;

/// One line of the session trace.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub step: u64,

    pub state: String,
    pub operation: String,

    pub url: Option<String>,
    pub index: Option<i64>,
    pub kind: Option<ElementKind>,

    pub elements: Option<usize>,
    pub fingerprint: Option<String>,
    pub error: Option<String>,
}

impl TraceEvent {
    pub fn now(step: u64, state: &NavState, operation: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            step,
            state: state.label().to_string(),
            operation: operation.to_string(),
            url: None,
            index: None,
            kind: None,
            elements: None,
            fingerprint: None,
            error: None,
        }
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn with_index(mut self, index: i64) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_kind(mut self, kind: ElementKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_page(mut self, elements: usize, fingerprint: Option<&str>) -> Self {
        self.elements = Some(elements);
        self.fingerprint = fingerprint.map(str::to_string);
        self
    }

    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }
}
