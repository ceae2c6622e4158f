use serde_json::json;
use termium::{
    browser::static_provider::StaticProvider,
    document::document_model::DocumentNode,
    error::BrowserError,
    render::{
        classifier::{FragmentLine, classify_node},
        formatter::{SUMMARY_HEADER, Tone, format_page, format_result},
        render_model::{ElementKind, InteractiveElement, RenderOptions},
        serializer::{render_live, serialize},
    },
};

fn tree(value: serde_json::Value) -> DocumentNode {
    serde_json::from_value(value).unwrap()
}

fn text(t: &str) -> serde_json::Value {
    json!({ "text": t })
}

fn mixed_page() -> DocumentNode {
    tree(json!({
        "tag": "body",
        "children": [
            { "tag": "a", "attrs": { "href": "/home" }, "children": [text("Home")] },
            { "tag": "form", "attrs": { "action": "/login", "method": "post" }, "children": [
                { "tag": "input", "attrs": { "type": "email", "name": "email", "placeholder": "you@example.com" } },
                { "tag": "input", "attrs": { "type": "password", "name": "pw" } },
                { "tag": "button", "attrs": { "hasClickHandler": true }, "children": [text("Sign in")] }
            ]},
            { "tag": "img", "attrs": { "alt": "Logo", "src": "/logo.png", "width": 10 } },
            { "tag": "a", "visible": false, "children": [text("Hidden")] },
            { "tag": "p", "children": [
                text("Read the "),
                { "tag": "a", "attrs": { "href": "/docs" }, "children": [text("docs")] }
            ]}
        ]
    }))
}

// =========================================================================
// Serializer: ordering and indices
// =========================================================================

#[test]
fn heading_link_paragraph_scenario() {
    let root = tree(json!({
        "tag": "body",
        "children": [
            { "tag": "h1", "children": [text("Title")] },
            { "tag": "a", "attrs": { "href": "/x" }, "children": [text("Go")] },
            { "tag": "p", "children": [text("Hi")] }
        ]
    }));

    let page = serialize(&root, &RenderOptions::default());

    let title = page.body.find("### Title ###").expect("heading rendered");
    let link = page.body.find("[1] [LINK] Go").expect("link rendered");
    let para = page.body[link..].find("Hi").map(|p| p + link).expect("paragraph rendered");
    assert!(title < link && link < para, "body order must follow the document: {}", page.body);

    assert_eq!(page.elements.len(), 1);
    assert_eq!(page.elements[0].index, 1);
    assert_eq!(
        page.elements[0].element,
        InteractiveElement::Link {
            text: "Go".into(),
            href: "/x".into()
        }
    );
}

#[test]
fn global_indices_are_contiguous_in_traversal_order() {
    let page = serialize(&mixed_page(), &RenderOptions::default());

    let kinds: Vec<ElementKind> = page.elements.iter().map(|d| d.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            ElementKind::Link,
            ElementKind::Form,
            ElementKind::Input,
            ElementKind::Input,
            ElementKind::Button,
            ElementKind::Image,
            ElementKind::Link,
        ]
    );

    for (i, descriptor) in page.elements.iter().enumerate() {
        assert_eq!(descriptor.index, i + 1, "index must equal traversal position + 1");
    }
}

#[test]
fn serializing_twice_is_identical() {
    let root = mixed_page();
    let options = RenderOptions::default();

    assert_eq!(serialize(&root, &options), serialize(&root, &options));
}

#[test]
fn marker_lines_carry_the_global_index() {
    let page = serialize(&mixed_page(), &RenderOptions::default());
    let lines: Vec<&str> = page.body.lines().collect();

    for descriptor in &page.elements {
        let line = lines[descriptor.line].trim_start();
        assert!(
            line.starts_with(&format!("[{}] ", descriptor.index)),
            "line {} should start with [{}]: {:?}",
            descriptor.line,
            descriptor.index,
            line
        );
    }

    assert!(page.body.contains("[3] [INPUT: email] you@example.com"));
    assert!(page.body.contains("[4] [INPUT: password]\n"));
    assert!(page.body.contains("[5] [BUTTON] Sign in"));
    assert!(page.body.contains("[2] [FORM] /login"));
    assert!(page.body.contains("[6] [IMG: Logo]"));
}

// =========================================================================
// Visibility
// =========================================================================

#[test]
fn invisible_link_registers_nothing() {
    let root = tree(json!({
        "tag": "body",
        "children": [
            { "tag": "a", "attrs": { "href": "/shown" }, "children": [text("Shown")] },
            { "tag": "a", "visible": false, "attrs": { "href": "/hidden" }, "children": [text("Hidden")] }
        ]
    }));

    let page = serialize(&root, &RenderOptions::default());

    let links: Vec<_> = page.elements.iter().filter(|d| d.kind() == ElementKind::Link).collect();
    assert_eq!(links.len(), 1);
    assert!(!page.body.contains("Hidden"));
}

#[test]
fn invisible_subtree_is_skipped_entirely() {
    let root = tree(json!({
        "tag": "body",
        "children": [
            { "tag": "div", "visible": false, "children": [
                text("secret"),
                { "tag": "button", "children": [text("Ghost")] }
            ]},
            { "tag": "p", "children": [text("Visible")] }
        ]
    }));

    let page = serialize(&root, &RenderOptions::default());

    assert!(page.elements.is_empty());
    assert!(!page.body.contains("secret"));
    assert!(!page.body.contains("Ghost"));
    assert!(page.body.contains("Visible"));
}

// =========================================================================
// Per-kind positions
// =========================================================================

#[test]
fn positions_count_same_tag_elements_including_hidden_ones() {
    let root = tree(json!({
        "tag": "body",
        "children": [
            { "tag": "a", "attrs": { "href": "/" }, "children": [text("Home")] },
            { "tag": "input", "attrs": { "type": "text" } },
            { "tag": "button", "children": [text("Go")] },
            { "tag": "div", "visible": false, "children": [
                { "tag": "input", "attrs": { "type": "hidden" } }
            ]},
            { "tag": "input", "attrs": { "type": "search" } },
            { "tag": "button", "children": [text("Clear")] }
        ]
    }));

    let page = serialize(&root, &RenderOptions::default());

    let located: Vec<(usize, ElementKind, usize)> = page
        .elements
        .iter()
        .map(|d| (d.index, d.kind(), d.position))
        .collect();

    assert_eq!(
        located,
        vec![
            (1, ElementKind::Link, 0),
            (2, ElementKind::Input, 0),
            (3, ElementKind::Button, 0),
            (4, ElementKind::Input, 2),
            (5, ElementKind::Button, 1),
        ]
    );
}

// =========================================================================
// Classifier fragments
// =========================================================================

#[test]
fn missing_attributes_default_to_empty() {
    let root = tree(json!({
        "tag": "body",
        "children": [
            { "tag": "input" },
            { "tag": "img" },
            { "tag": "form" }
        ]
    }));

    let page = serialize(&root, &RenderOptions::default());

    assert!(page.body.contains("[1] [INPUT]\n"));
    assert!(page.body.contains("[2] [IMG: image]"));
    assert!(page.body.contains("[3] [FORM] form"));
    assert_eq!(
        page.elements[0].element,
        InteractiveElement::Input {
            input_type: String::new(),
            name: String::new(),
            value: String::new(),
            placeholder: String::new(),
        }
    );
    assert_eq!(
        page.elements[1].element,
        InteractiveElement::Image {
            alt: String::new(),
            src: String::new()
        }
    );
}

#[test]
fn image_placeholder_is_capped_at_max_width() {
    let options = RenderOptions::default();
    let small = tree(json!({ "tag": "img", "attrs": { "alt": "dot", "width": 6 } }));
    let large = tree(json!({ "tag": "img", "attrs": { "alt": "banner", "width": 900 } }));

    let small_fragment = classify_node(&small, true, &options).fragment;
    assert_eq!(small_fragment[1], FragmentLine::Text("++++++".into()));
    assert_eq!(small_fragment[2], FragmentLine::Text("|    |".into()));

    let large_fragment = classify_node(&large, true, &options).fragment;
    assert_eq!(large_fragment[1], FragmentLine::Text("+".repeat(50)));
}

#[test]
fn invisible_node_classifies_to_nothing() {
    let button = tree(json!({ "tag": "button", "children": [text("Buy")] }));
    let classification = classify_node(&button, false, &RenderOptions::default());

    assert!(classification.fragment.is_empty());
    assert!(classification.element.is_none());
}

#[test]
fn rules_and_headings() {
    let root = tree(json!({
        "tag": "body",
        "children": [
            { "tag": "h2", "children": [text("Section")] },
            { "tag": "hr" },
            { "tag": "H3", "children": [text("Upper")] }
        ]
    }));

    let page = serialize(&root, &RenderOptions::default());

    assert!(page.body.contains("## Section ##"));
    assert!(page.body.contains("## Upper ##"), "tags are case-insensitive");
    assert!(page.body.contains(&"-".repeat(80)));
}

#[test]
fn text_is_trimmed_collapsed_and_indented_by_depth() {
    let root = tree(json!({
        "tag": "body",
        "children": [
            { "tag": "div", "children": [text("  hello \n   world  ")] },
            text("   ")
        ]
    }));

    let page = serialize(&root, &RenderOptions::default());

    assert_eq!(page.body, "    hello world\n");
}

// =========================================================================
// Formatter
// =========================================================================

#[test]
fn summary_lists_every_element_after_the_body() {
    let page = serialize(&mixed_page(), &RenderOptions::default());
    let styled = format_page(&page);
    let plain = styled.to_plain();

    let header = plain.find(SUMMARY_HEADER).expect("summary header present");
    assert!(header > plain.find("[1] [LINK] Home").unwrap());

    let summary: Vec<&str> = plain[header..].lines().skip(1).collect();
    assert_eq!(
        summary,
        vec![
            "[1] Link: Home → /home",
            "[2] Form: /login",
            "[3] Input: email → you@example.com",
            "[4] Input: password",
            "[5] Button: Sign in",
            "[6] Image: Logo (not actionable)",
            "[7] Link: docs → /docs",
        ]
    );
    assert_eq!(summary.len(), page.elements.len());
}

#[test]
fn summary_lines_are_toned_and_labelled_by_kind() {
    let page = serialize(&mixed_page(), &RenderOptions::default());
    let styled = format_page(&page);

    let summary = &styled.lines[styled.lines.len() - page.elements.len()..];
    for (line, descriptor) in summary.iter().zip(&page.elements) {
        let kind = descriptor.kind();
        assert!(line.text.starts_with(&format!("[{}] {}: ", descriptor.index, kind.label())));
        assert_eq!(line.tone, Tone::from(kind));
    }
}

#[test]
fn marker_lines_take_their_kind_tone() {
    let page = serialize(&mixed_page(), &RenderOptions::default());
    let styled = format_page(&page);

    for descriptor in &page.elements {
        assert_eq!(styled.lines[descriptor.line].tone, Tone::from(descriptor.kind()));
    }

    let header = styled
        .lines
        .iter()
        .find(|l| l.text == SUMMARY_HEADER)
        .expect("header line");
    assert_eq!(header.tone, Tone::Section);
}

#[test]
fn render_failure_formats_as_one_line() {
    let styled = format_result(&Err(BrowserError::RenderFailure("frame detached".into())));

    assert_eq!(styled.len(), 1);
    assert_eq!(styled.lines[0].text, "Error rendering page: frame detached");
    assert_eq!(styled.lines[0].tone, Tone::Error);
}

#[test]
fn render_live_reports_provider_failure_as_render_failure() {
    let mut provider = StaticProvider::new();
    provider.set_evaluate_failure(Some("Execution context was destroyed"));

    let result = render_live(&mut provider, &RenderOptions::default());

    assert_eq!(
        result,
        Err(BrowserError::RenderFailure("Execution context was destroyed".into()))
    );
}
