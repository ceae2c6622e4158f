use serde::{Deserialize, Serialize};

/// An interactive element found while rendering, one variant per kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InteractiveElement {
    Link {
        text: String,
        href: String,
    },
    Input {
        #[serde(rename = "inputType")]
        input_type: String,
        name: String,
        value: String,
        placeholder: String,
    },
    Button {
        text: String,
        #[serde(rename = "hasClickHandler")]
        has_click_handler: bool,
    },
    Form {
        action: String,
        method: String,
    },
    Image {
        alt: String,
        src: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Link,
    Input,
    Button,
    Form,
    Image,
}

impl ElementKind {
    /// Name used in the interactive-elements summary.
    pub fn label(self) -> &'static str {
        match self {
            ElementKind::Link => "Link",
            ElementKind::Input => "Input",
            ElementKind::Button => "Button",
            ElementKind::Form => "Form",
            ElementKind::Image => "Image",
        }
    }
}

impl InteractiveElement {
    pub fn kind(&self) -> ElementKind {
        match self {
            InteractiveElement::Link { .. } => ElementKind::Link,
            InteractiveElement::Input { .. } => ElementKind::Input,
            InteractiveElement::Button { .. } => ElementKind::Button,
            InteractiveElement::Form { .. } => ElementKind::Form,
            InteractiveElement::Image { .. } => ElementKind::Image,
        }
    }
}

/// An interactive element plus the two numbers that locate it.
///
/// `index` is the 1-based global index shown to the user, assigned in
/// traversal order across all kinds. `position` is the 0-based position
/// among same-tag elements of the live document and is only used to
/// address actions. `line` is the 0-based body line carrying the
/// element's `[index]` marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    pub index: usize,
    pub position: usize,
    pub line: usize,
    pub element: InteractiveElement,
}

impl Descriptor {
    pub fn kind(&self) -> ElementKind {
        self.element.kind()
    }
}

/// Output of one serialization pass. Discarded wholesale on the next render.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedPage {
    pub body: String,
    pub elements: Vec<Descriptor>,
}

/// Layout constants for the text rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Spaces of indentation per traversal depth.
    pub indent_width: usize,
    pub rule_width: usize,
    pub image_max_width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent_width: 2,
            rule_width: 80,
            image_max_width: 50,
        }
    }
}
