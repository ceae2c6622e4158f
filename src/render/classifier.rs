use crate::document::document_model::{DocumentNode, NodeKind};
use crate::render::render_model::{InteractiveElement, RenderOptions};

/// One line of a node's own textual contribution, before indentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentLine {
    Text(String),
    Blank,
    /// The line that carries an element's `[index]`; the index is filled in
    /// by the serializer once it is assigned.
    Marker { label: String, detail: String },
}

/// What a single node contributes to the rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classification {
    pub fragment: Vec<FragmentLine>,
    pub element: Option<InteractiveElement>,
}

impl Classification {
    fn lines(fragment: Vec<FragmentLine>) -> Self {
        Self {
            fragment,
            element: None,
        }
    }

    fn interactive(fragment: Vec<FragmentLine>, element: InteractiveElement) -> Self {
        Self {
            fragment,
            element: Some(element),
        }
    }
}

pub fn classify_node(node: &DocumentNode, visible: bool, options: &RenderOptions) -> Classification {
    if !visible {
        return Classification::default();
    }

    let attrs = &node.attrs;

    match node.kind() {
        NodeKind::Text => match normalize_text(&node.text) {
            Some(text) => Classification::lines(vec![FragmentLine::Text(text)]),
            None => Classification::default(),
        },

        NodeKind::Image => {
            let max = options.image_max_width.max(2);
            let width = attrs
                .width
                .map(|w| w as usize)
                .unwrap_or(max)
                .clamp(2, max);
            let alt = attrs.alt.clone().unwrap_or_default();
            let caption = if alt.trim().is_empty() { "image" } else { alt.trim() };

            Classification::interactive(
                vec![
                    FragmentLine::Blank,
                    FragmentLine::Text("+".repeat(width)),
                    FragmentLine::Text(format!("|{}|", " ".repeat(width - 2))),
                    FragmentLine::Text("+".repeat(width)),
                    FragmentLine::Marker {
                        label: format!("[IMG: {}]", caption),
                        detail: String::new(),
                    },
                ],
                InteractiveElement::Image {
                    alt,
                    src: attrs.src.clone().unwrap_or_default(),
                },
            )
        }

        NodeKind::Input => {
            let input_type = attrs.input_type.clone().unwrap_or_default();
            let placeholder = attrs.placeholder.clone().unwrap_or_default();
            let label = if input_type.is_empty() {
                "[INPUT]".to_string()
            } else {
                format!("[INPUT: {}]", input_type)
            };

            Classification::interactive(
                vec![FragmentLine::Marker {
                    label,
                    detail: collapse_whitespace(&placeholder),
                }],
                InteractiveElement::Input {
                    input_type,
                    name: attrs.name.clone().unwrap_or_default(),
                    value: attrs.value.clone().unwrap_or_default(),
                    placeholder,
                },
            )
        }

        NodeKind::Button => {
            let text = collapse_whitespace(&node.text_content());

            Classification::interactive(
                vec![FragmentLine::Marker {
                    label: "[BUTTON]".into(),
                    detail: text.clone(),
                }],
                InteractiveElement::Button {
                    text,
                    has_click_handler: attrs.has_click_handler,
                },
            )
        }

        NodeKind::Form => {
            let action = attrs.action.clone().unwrap_or_default();
            let detail = if action.is_empty() { "form".to_string() } else { action.clone() };

            Classification::interactive(
                vec![FragmentLine::Marker {
                    label: "[FORM]".into(),
                    detail,
                }],
                InteractiveElement::Form {
                    action,
                    method: attrs.method.clone().unwrap_or_default(),
                },
            )
        }

        NodeKind::Rule => Classification::lines(vec![
            FragmentLine::Blank,
            FragmentLine::Text("-".repeat(options.rule_width)),
        ]),

        NodeKind::Heading(level) => {
            let text = collapse_whitespace(&node.text_content());
            let line = if level == 1 {
                format!("### {} ###", text)
            } else {
                format!("## {} ##", text)
            };
            Classification::lines(vec![FragmentLine::Text(line)])
        }

        NodeKind::Paragraph => match normalize_text(&node.text_content()) {
            Some(text) => Classification::lines(vec![FragmentLine::Text(text), FragmentLine::Blank]),
            None => Classification::default(),
        },

        NodeKind::Anchor => {
            let text = collapse_whitespace(&node.text_content());

            Classification::interactive(
                vec![FragmentLine::Marker {
                    label: "[LINK]".into(),
                    detail: text.clone(),
                }],
                InteractiveElement::Link {
                    text,
                    href: attrs.href.clone().unwrap_or_default(),
                },
            )
        }

        NodeKind::Other => Classification::default(),
    }
}

/// Trimmed, single-line text; `None` when nothing is left.
pub fn normalize_text(raw: &str) -> Option<String> {
    let text = collapse_whitespace(raw);
    if text.is_empty() { None } else { Some(text) }
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
