use std::collections::HashMap;

use log::debug;

use crate::browser::provider::DocumentProvider;
use crate::document::document_model::{DocumentNode, NodeKind};
use crate::error::BrowserError;
use crate::render::classifier::{FragmentLine, classify_node};
use crate::render::render_model::{Descriptor, ElementKind, RenderOptions, RenderedPage};

/// Evaluate the provider's live document and serialize it.
///
/// Any provider failure becomes a `RenderFailure`; no partial page is
/// produced.
pub fn render_live<P: DocumentProvider + ?Sized>(
    provider: &mut P,
    options: &RenderOptions,
) -> Result<RenderedPage, BrowserError> {
    let root = provider
        .evaluate()
        .map_err(|e| BrowserError::RenderFailure(e.to_string()))?;
    Ok(serialize(&root, options))
}

/// Depth-first, pre-order walk producing the text body and the
/// interactive elements in traversal order.
///
/// Invisible nodes are skipped together with their whole subtree, but
/// still count towards per-kind positions since the live document
/// indexes them.
pub fn serialize(root: &DocumentNode, options: &RenderOptions) -> RenderedPage {
    let mut serializer = Serializer::new(options);
    serializer.visit(root, 0);

    debug!(
        "serialized {} lines, {} interactive elements",
        serializer.line,
        serializer.elements.len()
    );

    RenderedPage {
        body: serializer.body,
        elements: serializer.elements,
    }
}

struct Serializer<'a> {
    options: &'a RenderOptions,
    body: String,
    line: usize,
    elements: Vec<Descriptor>,
    positions: HashMap<ElementKind, usize>,
}

impl<'a> Serializer<'a> {
    fn new(options: &'a RenderOptions) -> Self {
        Self {
            options,
            body: String::new(),
            line: 0,
            elements: vec![],
            positions: HashMap::new(),
        }
    }

    fn visit(&mut self, node: &DocumentNode, depth: usize) {
        if !node.visible {
            self.skip(node);
            return;
        }

        let position = self.claim_position(node);
        let classification = classify_node(node, true, self.options);
        let indent = " ".repeat(depth * self.options.indent_width);

        let index = classification.element.as_ref().map(|_| self.elements.len() + 1);
        let mut marker_line = None;

        for fragment in &classification.fragment {
            match fragment {
                FragmentLine::Blank => self.push_line(""),
                FragmentLine::Text(text) => self.push_line(&format!("{}{}", indent, text)),
                FragmentLine::Marker { label, detail } => {
                    let number = index.unwrap_or_default();
                    marker_line = Some(self.line);
                    if detail.is_empty() {
                        self.push_line(&format!("{}[{}] {}", indent, number, label));
                    } else {
                        self.push_line(&format!("{}[{}] {} {}", indent, number, label, detail));
                    }
                }
            }
        }

        if let (Some(element), Some(index)) = (classification.element, index) {
            self.elements.push(Descriptor {
                index,
                position: position.unwrap_or_default(),
                line: marker_line.unwrap_or(self.line),
                element,
            });
        }

        for child in &node.children {
            self.visit(child, depth + 1);
        }
    }

    /// Walk an invisible subtree only to keep per-kind positions aligned.
    fn skip(&mut self, node: &DocumentNode) {
        self.claim_position(node);
        for child in &node.children {
            self.skip(child);
        }
    }

    fn claim_position(&mut self, node: &DocumentNode) -> Option<usize> {
        let kind = addressable_kind(node.kind())?;
        let counter = self.positions.entry(kind).or_insert(0);
        let position = *counter;
        *counter += 1;
        Some(position)
    }

    fn push_line(&mut self, text: &str) {
        self.body.push_str(text);
        self.body.push('\n');
        self.line += 1;
    }
}

fn addressable_kind(kind: NodeKind) -> Option<ElementKind> {
    match kind {
        NodeKind::Anchor => Some(ElementKind::Link),
        NodeKind::Input => Some(ElementKind::Input),
        NodeKind::Button => Some(ElementKind::Button),
        NodeKind::Form => Some(ElementKind::Form),
        NodeKind::Image => Some(ElementKind::Image),
        _ => None,
    }
}
