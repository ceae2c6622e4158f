use serde::{Deserialize, Serialize};

/// One node of a page as reported by a document provider.
///
/// Element nodes carry a `tag`; text nodes have no tag and carry their
/// text in `text`. Visibility is computed by the provider from
/// `display`, `visibility` and `opacity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default)]
    pub attrs: NodeAttributes,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DocumentNode>,
}

/// The subset of element attributes the renderer reads.
/// Missing attributes default to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>, // e.g. "text", "password", "submit"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>, // rendered width in pixels (images)
    #[serde(rename = "hasClickHandler", default)]
    pub has_click_handler: bool,
}

fn default_visible() -> bool {
    true
}

/// Closed set of node kinds the renderer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Text,
    Image,
    Input,
    Button,
    Form,
    Rule,
    Heading(u8),
    Paragraph,
    Anchor,
    Other,
}

impl NodeKind {
    pub fn from_tag(tag: Option<&str>) -> NodeKind {
        let Some(tag) = tag else {
            return NodeKind::Text;
        };

        match tag.to_ascii_lowercase().as_str() {
            "img" => NodeKind::Image,
            "input" => NodeKind::Input,
            "button" => NodeKind::Button,
            "form" => NodeKind::Form,
            "hr" => NodeKind::Rule,
            "h1" => NodeKind::Heading(1),
            "h2" => NodeKind::Heading(2),
            "h3" => NodeKind::Heading(3),
            "p" => NodeKind::Paragraph,
            "a" => NodeKind::Anchor,
            _ => NodeKind::Other,
        }
    }
}

impl DocumentNode {
    pub fn element(tag: &str) -> Self {
        DocumentNode {
            tag: Some(tag.to_string()),
            text: String::new(),
            attrs: NodeAttributes::default(),
            visible: true,
            children: vec![],
        }
    }

    pub fn text_node(text: &str) -> Self {
        DocumentNode {
            tag: None,
            text: text.to_string(),
            attrs: NodeAttributes::default(),
            visible: true,
            children: vec![],
        }
    }

    pub fn with_child(mut self, child: DocumentNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn kind(&self) -> NodeKind {
        NodeKind::from_tag(self.tag.as_deref())
    }

    /// Lowercased tag name, `None` for text nodes.
    pub fn tag_name(&self) -> Option<String> {
        self.tag.as_ref().map(|t| t.to_ascii_lowercase())
    }

    /// Concatenated text of this node and all descendants, like `textContent`.
    pub fn text_content(&self) -> String {
        if self.tag.is_none() {
            return self.text.clone();
        }

        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// The `position`-th element (0-based, document order) whose tag is `tag`,
    /// visible or not.
    pub fn nth_with_tag_mut(&mut self, tag: &str, position: usize) -> Option<&mut DocumentNode> {
        let mut remaining = position;
        find_nth(self, tag, &mut remaining)
    }

    /// Number of elements with the given tag in this subtree.
    pub fn count_tag(&self, tag: &str) -> usize {
        let own = usize::from(self.tag_name().as_deref() == Some(tag));
        own + self.children.iter().map(|c| c.count_tag(tag)).sum::<usize>()
    }
}

fn collect_text(node: &DocumentNode, out: &mut String) {
    if node.tag.is_none() {
        out.push_str(&node.text);
        return;
    }
    for child in &node.children {
        collect_text(child, out);
    }
}

fn find_nth<'a>(
    node: &'a mut DocumentNode,
    tag: &str,
    remaining: &mut usize,
) -> Option<&'a mut DocumentNode> {
    if node.tag_name().as_deref() == Some(tag) {
        if *remaining == 0 {
            return Some(node);
        }
        *remaining -= 1;
    }

    for child in node.children.iter_mut() {
        if let Some(found) = find_nth(child, tag, remaining) {
            return Some(found);
        }
    }
    None
}
