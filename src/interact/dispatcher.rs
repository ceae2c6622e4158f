use log::{debug, warn};

use crate::browser::provider::{ActionRequest, DocumentProvider};
use crate::error::BrowserError;
use crate::registry::registry::ElementRegistry;
use crate::render::render_model::{ElementKind, InteractiveElement, RenderOptions};
use crate::render::serializer::serialize;

/// What the user supplied along with an index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    pub value: Option<String>,
}

impl Payload {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }
}

/// Result of a successful dispatch. The caller decides how to follow up:
/// navigate for links, re-render after a performed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Navigate { href: String },
    Performed { kind: ElementKind, position: usize },
}

/// Resolve `index` in the registry and act on the element it names.
///
/// Inputs, buttons and forms are addressed in the live document by their
/// position among same-tag elements, never by the global index. Those
/// positions are only meaningful while the live document still holds the
/// elements the registry was rendered from, so before acting the live
/// document is snapshotted again and compared. A registry from another
/// document generation, or one the live document no longer matches, is
/// refused.
pub fn dispatch<P: DocumentProvider + ?Sized>(
    provider: &mut P,
    registry: &ElementRegistry,
    document_generation: u64,
    index: i64,
    payload: &Payload,
) -> Result<DispatchOutcome, BrowserError> {
    let descriptor = registry.get(index)?;
    let kind = descriptor.kind();
    let position = descriptor.position;

    let request = match &descriptor.element {
        InteractiveElement::Link { href, .. } => {
            debug!("dispatch [{}] link -> {}", index, href);
            return Ok(DispatchOutcome::Navigate { href: href.clone() });
        }
        InteractiveElement::Image { .. } => {
            return Err(BrowserError::NotInteractive(descriptor.index));
        }
        InteractiveElement::Input { input_type, .. } => match &payload.value {
            Some(value) => ActionRequest::fill(position, value),
            None => {
                return Err(BrowserError::ValueRequired {
                    index: descriptor.index,
                    input_type: if input_type.is_empty() {
                        "text".into()
                    } else {
                        input_type.clone()
                    },
                });
            }
        },
        InteractiveElement::Button { .. } => ActionRequest::click(position),
        InteractiveElement::Form { .. } => ActionRequest::submit(position),
    };

    if !registry.is_current(document_generation) {
        warn!(
            "refusing {:?} [{}]: registry generation {} but document generation {}",
            kind,
            index,
            registry.generation(),
            document_generation
        );
        return Err(page_changed());
    }

    let live = provider
        .evaluate()
        .map_err(|e| BrowserError::ActionFailure(e.to_string()))?;
    // Positions and elements do not depend on layout options.
    let live = serialize(&live, &RenderOptions::default());
    if !registry.describes(&live.elements) {
        warn!(
            "refusing {:?} [{}]: live document has {} elements, registry has {}",
            kind,
            index,
            live.elements.len(),
            registry.len()
        );
        return Err(page_changed());
    }

    debug!(
        "dispatch [{}] {:?} -> {} #{}",
        index,
        request.action,
        request.selector.tag(),
        position
    );

    provider
        .act(&request)
        .map_err(|e| BrowserError::ActionFailure(e.to_string()))?;

    Ok(DispatchOutcome::Performed { kind, position })
}

fn page_changed() -> BrowserError {
    BrowserError::ActionFailure("page changed since it was rendered; refresh first".into())
}
