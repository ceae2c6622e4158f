use std::collections::HashMap;

use log::debug;

use crate::browser::provider::{ActionRequest, DocumentProvider, ElementAction, ProviderError};
use crate::document::document_model::DocumentNode;

/// In-memory provider over fixed document trees, keyed by URL.
///
/// Used for offline rendering of saved trees. Actions mutate the loaded
/// tree the way a browser would: `fill` sets the input's value, `submit`
/// navigates to the form's action when a page is registered for it, and
/// `click` is recorded.
#[derive(Debug, Default)]
pub struct StaticProvider {
    pages: HashMap<String, DocumentNode>,
    redirects: HashMap<String, String>,
    current: Option<(String, DocumentNode)>,
    clicks: Vec<usize>,
    evaluate_calls: usize,
    fail_evaluate: Option<String>,
    closed: bool,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, root: DocumentNode) -> Self {
        self.pages.insert(url.to_string(), root);
        self
    }

    pub fn with_redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.insert(from.to_string(), to.to_string());
        self
    }

    /// Make every following `evaluate` fail with `message` (or succeed
    /// again with `None`).
    pub fn set_evaluate_failure(&mut self, message: Option<&str>) {
        self.fail_evaluate = message.map(str::to_string);
    }

    /// Replace the loaded document in place, as a script on the page would.
    pub fn mutate_current(&mut self, f: impl FnOnce(&mut DocumentNode)) {
        if let Some((_, root)) = self.current.as_mut() {
            f(root);
        }
    }

    pub fn current_tree(&self) -> Option<&DocumentNode> {
        self.current.as_ref().map(|(_, root)| root)
    }

    /// Positions of buttons clicked so far.
    pub fn clicks(&self) -> &[usize] {
        &self.clicks
    }

    pub fn evaluate_calls(&self) -> usize {
        self.evaluate_calls
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn current_mut(&mut self) -> Result<&mut DocumentNode, ProviderError> {
        self.current
            .as_mut()
            .map(|(_, root)| root)
            .ok_or_else(|| ProviderError::Page("no document loaded".into()))
    }
}

impl DocumentProvider for StaticProvider {
    fn load(&mut self, url: &str) -> Result<(), ProviderError> {
        let resolved = self.redirects.get(url).cloned().unwrap_or_else(|| url.to_string());
        let root = self
            .pages
            .get(&resolved)
            .cloned()
            .ok_or_else(|| ProviderError::Page(format!("net::ERR_NAME_NOT_RESOLVED at {}", url)))?;

        debug!("static load {} -> {}", url, resolved);
        self.current = Some((resolved, root));
        Ok(())
    }

    fn current_url(&mut self) -> Result<String, ProviderError> {
        self.current
            .as_ref()
            .map(|(url, _)| url.clone())
            .ok_or_else(|| ProviderError::Page("no document loaded".into()))
    }

    fn evaluate(&mut self) -> Result<DocumentNode, ProviderError> {
        self.evaluate_calls += 1;
        if let Some(message) = &self.fail_evaluate {
            return Err(ProviderError::Page(message.clone()));
        }
        self.current
            .as_ref()
            .map(|(_, root)| root.clone())
            .ok_or_else(|| ProviderError::Page("no document loaded".into()))
    }

    fn act(&mut self, request: &ActionRequest) -> Result<(), ProviderError> {
        let tag = request.selector.tag();
        let position = request.position;
        let root = self.current_mut()?;
        let node = root
            .nth_with_tag_mut(tag, position)
            .ok_or_else(|| ProviderError::NodeMissing {
                tag: tag.to_string(),
                position,
            })?;

        match request.action {
            ElementAction::Fill => {
                node.attrs.value = Some(request.value.clone().unwrap_or_default());
            }
            ElementAction::Click => {
                self.clicks.push(position);
            }
            ElementAction::Submit => {
                let target = node.attrs.action.clone().unwrap_or_default();
                if self.pages.contains_key(&target) {
                    self.load(&target)?;
                }
            }
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), ProviderError> {
        self.closed = true;
        Ok(())
    }
}
