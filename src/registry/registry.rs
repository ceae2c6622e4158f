use sha1::{Digest, Sha1};

use crate::error::BrowserError;
use crate::render::render_model::{Descriptor, RenderedPage};

/// The interactive elements of the last successful render, addressable
/// by global index.
///
/// Stamped with the document generation it was rendered from so that
/// positional actions against an outdated snapshot can be refused.
#[derive(Debug, Clone, Default)]
pub struct ElementRegistry {
    descriptors: Vec<Descriptor>,
    generation: u64,
    fingerprint: Option<String>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a freshly rendered page. The previous entries are dropped.
    pub fn replace(&mut self, page: &RenderedPage, generation: u64) {
        self.descriptors = page.elements.clone();
        self.generation = generation;
        self.fingerprint = Some(page_fingerprint(&page.body));
    }

    /// Look up a descriptor by its 1-based global index.
    pub fn get(&self, index: i64) -> Result<&Descriptor, BrowserError> {
        if index <= 0 {
            return Err(BrowserError::UnknownIndex(index));
        }

        self.descriptors
            .get(index as usize - 1)
            .ok_or(BrowserError::UnknownIndex(index))
    }

    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether this snapshot still describes the document at `generation`.
    pub fn is_current(&self, generation: u64) -> bool {
        self.fingerprint.is_some() && self.generation == generation
    }

    /// Whether `elements`, freshly serialized from the live document, are
    /// the ones this snapshot was rendered from: same kinds at the same
    /// per-kind positions, with the same attributes.
    pub fn describes(&self, elements: &[Descriptor]) -> bool {
        self.descriptors.len() == elements.len()
            && self.descriptors.iter().zip(elements).all(|(ours, live)| {
                ours.index == live.index && ours.position == live.position && ours.element == live.element
            })
    }

    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }
}

/// SHA-1 of a rendered body, used to tell whether an interaction changed
/// what the user sees.
pub fn page_fingerprint(body: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(body.as_bytes());
    format!("{:x}", hasher.finalize())
}
