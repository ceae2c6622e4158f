use std::sync::mpsc;
use std::thread;

use serde_json::json;
use termium::{
    browser::static_provider::StaticProvider,
    document::document_model::DocumentNode,
    error::BrowserError,
    interact::dispatcher::Payload,
    navigation::{
        controller::{NavState, NavigationController},
        display::{ChannelDisplay, DisplaySurface, DisplayUpdate},
        queue::{Command, command_channel, run_worker},
    },
    render::{
        formatter::{SUMMARY_HEADER, StyledText},
        render_model::RenderOptions,
    },
    trace::logger::TraceLogger,
};

const HOME: &str = "https://site.test/index.html";
const ABOUT: &str = "https://site.test/about";
const DONE: &str = "https://site.test/done";

// =========================================================================
// Test doubles and fixtures
// =========================================================================

#[derive(Debug, Default)]
struct RecordingDisplay {
    texts: Vec<StyledText>,
    addresses: Vec<String>,
    states: Vec<NavState>,
    prompts: Vec<(usize, String)>,
}

impl RecordingDisplay {
    fn last_text(&self) -> String {
        self.texts.last().map(|t| t.to_plain()).unwrap_or_default()
    }
}

impl DisplaySurface for RecordingDisplay {
    fn set_text(&mut self, content: StyledText) {
        self.texts.push(content);
    }

    fn set_address(&mut self, url: &str) {
        self.addresses.push(url.to_string());
    }

    fn set_state(&mut self, state: &NavState) {
        self.states.push(state.clone());
    }

    fn prompt_value(&mut self, index: usize, input_type: &str) {
        self.prompts.push((index, input_type.to_string()));
    }
}

fn text(t: &str) -> serde_json::Value {
    json!({ "text": t })
}

fn node(value: serde_json::Value) -> DocumentNode {
    serde_json::from_value(value).unwrap()
}

/// [1] link /about, [2] form -> DONE, [3] email input, [4] button
fn home_page() -> DocumentNode {
    node(json!({
        "tag": "body",
        "children": [
            { "tag": "h1", "children": [text("Home")] },
            { "tag": "a", "attrs": { "href": "/about" }, "children": [text("About us")] },
            { "tag": "form", "attrs": { "action": DONE }, "children": [
                { "tag": "input", "attrs": { "type": "email", "name": "email" } },
                { "tag": "button", "children": [text("Subscribe")] }
            ]}
        ]
    }))
}

fn about_page() -> DocumentNode {
    node(json!({
        "tag": "body",
        "children": [
            { "tag": "p", "children": [text("About this site")] },
            { "tag": "a", "attrs": { "href": HOME }, "children": [text("Back")] }
        ]
    }))
}

fn done_page() -> DocumentNode {
    node(json!({
        "tag": "body",
        "children": [{ "tag": "p", "children": [text("Thanks for subscribing")] }]
    }))
}

fn site() -> StaticProvider {
    StaticProvider::new()
        .with_page(HOME, home_page())
        .with_page(ABOUT, about_page())
        .with_page(DONE, done_page())
}

fn controller(provider: StaticProvider) -> NavigationController<StaticProvider, RecordingDisplay> {
    NavigationController::new(
        provider,
        RecordingDisplay::default(),
        RenderOptions::default(),
        TraceLogger::disabled(),
    )
}

// =========================================================================
// Navigation
// =========================================================================

#[test]
fn starts_idle_with_empty_registry() {
    let nav = controller(site());

    assert_eq!(nav.state(), &NavState::Idle);
    assert!(nav.registry().is_empty());
    assert_eq!(nav.address(), None);
}

#[test]
fn successful_navigation_renders_and_fills_registry() {
    let mut nav = controller(site());

    nav.navigate(HOME).unwrap();

    assert_eq!(nav.state(), &NavState::Rendered);
    assert_eq!(nav.registry().len(), 4);
    assert_eq!(nav.address(), Some(HOME));
    assert_eq!(nav.display().addresses, vec![HOME.to_string()]);

    let shown = nav.display().last_text();
    assert!(shown.contains("### Home ###"));
    assert!(shown.contains(SUMMARY_HEADER));

    let states = &nav.display().states;
    assert_eq!(states.first(), Some(&NavState::Loading { url: HOME.into() }));
    assert_eq!(states.last(), Some(&NavState::Rendered));
}

#[test]
fn address_shows_url_after_redirects() {
    let provider = site().with_redirect("https://site.test/", HOME);
    let mut nav = controller(provider);

    nav.navigate("https://site.test/").unwrap();

    assert_eq!(nav.address(), Some(HOME));
}

#[test]
fn failed_load_keeps_previous_registry_and_address() {
    let mut nav = controller(site());
    nav.navigate(HOME).unwrap();
    let before = nav.registry().descriptors().to_vec();

    let result = nav.navigate("https://nowhere.invalid/");

    match result {
        Err(BrowserError::LoadFailure(message)) => assert!(message.contains("net::ERR_NAME_NOT_RESOLVED")),
        other => panic!("expected LoadFailure, got {:?}", other),
    }
    assert_eq!(nav.registry().descriptors(), before.as_slice());
    assert_eq!(nav.address(), Some(HOME));
    assert!(matches!(nav.state(), NavState::Error { .. }));

    let shown = nav.display().last_text();
    assert!(shown.starts_with("Error loading page:"), "{}", shown);
    assert!(shown.contains("net::ERR_NAME_NOT_RESOLVED"));
    assert_eq!(shown.lines().count(), 1);
}

#[test]
fn failed_first_load_leaves_registry_empty() {
    let mut nav = controller(site());

    assert!(nav.navigate("https://nowhere.invalid/").is_err());

    assert!(nav.registry().is_empty());
    assert_eq!(nav.address(), None);
}

#[test]
fn superseded_navigation_does_not_render() {
    let mut nav = controller(site());
    nav.navigate(HOME).unwrap();
    let evaluations = nav.provider().evaluate_calls();

    nav.navigate_unless(ABOUT, &|| true).unwrap();

    assert_eq!(nav.provider().evaluate_calls(), evaluations);
    assert_eq!(nav.registry().len(), 4);
    assert_eq!(nav.address(), Some(HOME));
}

// =========================================================================
// Interaction
// =========================================================================

#[test]
fn relative_link_resolves_against_current_address() {
    let mut nav = controller(site());
    nav.navigate(HOME).unwrap();

    nav.interact(1, &Payload::none()).unwrap();

    assert_eq!(nav.address(), Some(ABOUT));
    assert!(nav.display().last_text().contains("About this site"));
    assert_eq!(nav.registry().len(), 1);
}

#[test]
fn button_click_rerenders_exactly_once() {
    let mut nav = controller(site());
    nav.navigate(HOME).unwrap();
    let evaluations = nav.provider().evaluate_calls();

    nav.interact(4, &Payload::none()).unwrap();

    assert_eq!(nav.provider().clicks(), &[0]);
    // One check of the live document, one re-render
    assert_eq!(nav.provider().evaluate_calls(), evaluations + 2);
    assert_eq!(nav.state(), &NavState::Rendered);
}

#[test]
fn input_asks_for_value_then_fills() {
    let mut nav = controller(site());
    nav.navigate(HOME).unwrap();

    let first = nav.interact(3, &Payload::none());
    assert_eq!(
        first,
        Err(BrowserError::ValueRequired {
            index: 3,
            input_type: "email".into()
        })
    );
    assert_eq!(nav.display().prompts, vec![(3, "email".to_string())]);
    assert_eq!(nav.state(), &NavState::Rendered);

    nav.interact(3, &Payload::value("me@site.test")).unwrap();

    let input = &nav.provider().current_tree().unwrap().children[2].children[0];
    assert_eq!(input.attrs.value.as_deref(), Some("me@site.test"));
}

#[test]
fn form_submit_follows_the_page_and_address() {
    let mut nav = controller(site());
    nav.navigate(HOME).unwrap();

    nav.interact(2, &Payload::none()).unwrap();

    assert_eq!(nav.address(), Some(DONE));
    assert_eq!(nav.display().addresses.last().map(String::as_str), Some(DONE));
    assert!(nav.display().last_text().contains("Thanks for subscribing"));
    assert!(nav.registry().is_empty());
}

#[test]
fn unknown_index_is_reported_without_state_change() {
    let mut nav = controller(site());
    nav.navigate(HOME).unwrap();

    let result = nav.interact(99, &Payload::none());

    assert_eq!(result, Err(BrowserError::UnknownIndex(99)));
    assert_eq!(nav.state(), &NavState::Rendered);
    assert_eq!(nav.registry().len(), 4);
    assert_eq!(nav.display().last_text(), "No element with index 99");
}

#[test]
fn actions_refused_after_failed_render_until_refresh() {
    let mut nav = controller(site());
    nav.navigate(HOME).unwrap();

    nav.provider_mut().set_evaluate_failure(Some("Execution context was destroyed"));
    let refreshed = nav.refresh();
    assert_eq!(
        refreshed,
        Err(BrowserError::RenderFailure("Execution context was destroyed".into()))
    );
    assert!(matches!(nav.state(), NavState::Error { .. }));
    assert_eq!(nav.registry().len(), 4);

    let refused = nav.interact(4, &Payload::none());
    assert!(matches!(refused, Err(BrowserError::ActionFailure(_))));
    assert!(nav.provider().clicks().is_empty());

    nav.provider_mut().set_evaluate_failure(None);
    nav.refresh().unwrap();
    nav.interact(4, &Payload::none()).unwrap();
    assert_eq!(nav.provider().clicks(), &[0]);
}

const LOGIN: &str = "https://site.test/login";

fn login_page() -> DocumentNode {
    node(json!({
        "tag": "body",
        "children": [
            { "tag": "input", "attrs": { "type": "text", "name": "user" } },
            { "tag": "input", "attrs": { "type": "password", "name": "pass" } }
        ]
    }))
}

fn input_value(nav: &NavigationController<StaticProvider, RecordingDisplay>, name: &str) -> Option<String> {
    nav.provider()
        .current_tree()
        .unwrap()
        .children
        .iter()
        .find(|c| c.attrs.name.as_deref() == Some(name))
        .and_then(|c| c.attrs.value.clone())
}

#[test]
fn script_inserted_input_refuses_fill_until_refresh() {
    let mut nav = controller(StaticProvider::new().with_page(LOGIN, login_page()));
    nav.navigate(LOGIN).unwrap();
    let generation = nav.document_generation();

    nav.provider_mut().mutate_current(|root| {
        let mut injected = DocumentNode::element("input");
        injected.attrs.name = Some("injected".into());
        root.children.insert(0, injected);
    });

    let result = nav.interact(2, &Payload::value("secret"));

    match result {
        Err(BrowserError::ActionFailure(message)) => assert!(message.contains("refresh first"), "{}", message),
        other => panic!("expected ActionFailure, got {:?}", other),
    }
    assert_eq!(input_value(&nav, "injected"), None);
    assert_eq!(input_value(&nav, "user"), None);
    assert_eq!(input_value(&nav, "pass"), None);
    assert_eq!(nav.state(), &NavState::Rendered);
    assert_eq!(nav.document_generation(), generation);

    nav.refresh().unwrap();
    assert_eq!(nav.registry().len(), 3);
    nav.interact(3, &Payload::value("secret")).unwrap();

    assert_eq!(input_value(&nav, "pass").as_deref(), Some("secret"));
    assert_eq!(input_value(&nav, "user"), None);
    assert_eq!(input_value(&nav, "injected"), None);
}

#[test]
fn registry_generation_follows_the_document() {
    let mut nav = controller(site());
    nav.navigate(HOME).unwrap();
    let first = nav.document_generation();
    assert!(nav.registry().is_current(first));

    nav.interact(4, &Payload::none()).unwrap();

    assert!(nav.document_generation() > first);
    assert!(nav.registry().is_current(nav.document_generation()));
}

#[test]
fn close_is_idempotent() {
    let mut nav = controller(site());
    nav.navigate(HOME).unwrap();

    nav.close();
    nav.close();

    assert!(nav.provider().is_closed());
}

// =========================================================================
// Command queue
// =========================================================================

#[test]
fn only_the_latest_navigation_survives() {
    let (sender, mut receiver) = command_channel();
    sender.navigate(HOME).unwrap();
    sender.navigate(ABOUT).unwrap();
    sender.refresh().unwrap();

    assert_eq!(
        receiver.next_command(),
        Some(Command::Navigate {
            url: ABOUT.into(),
            epoch: 2
        })
    );
    assert_eq!(receiver.next_command(), Some(Command::Refresh));
}

#[test]
fn quit_jumps_ahead_of_pending_work() {
    let (sender, mut receiver) = command_channel();
    sender.navigate(HOME).unwrap();
    sender.select(3, Some("x".into())).unwrap();
    sender.refresh().unwrap();
    sender.quit().unwrap();
    sender.select(1, None).unwrap();

    assert_eq!(receiver.next_command(), Some(Command::Quit));

    drop(sender);
    assert_eq!(receiver.next_command(), None);
}

#[test]
fn consecutive_refreshes_collapse() {
    let (sender, mut receiver) = command_channel();
    sender.refresh().unwrap();
    sender.refresh().unwrap();
    sender.refresh().unwrap();
    sender.select(2, None).unwrap();
    sender.refresh().unwrap();

    assert_eq!(receiver.next_command(), Some(Command::Refresh));
    assert_eq!(receiver.next_command(), Some(Command::Select { index: 2, value: None }));
    assert_eq!(receiver.next_command(), Some(Command::Refresh));
}

#[test]
fn queue_ends_when_senders_are_gone() {
    let (sender, mut receiver) = command_channel();
    sender.select(1, Some("x".into())).unwrap();
    drop(sender);

    assert_eq!(
        receiver.next_command(),
        Some(Command::Select {
            index: 1,
            value: Some("x".into())
        })
    );
    assert_eq!(receiver.next_command(), None);
}

#[test]
fn superseded_epoch_is_detected() {
    let (sender, receiver) = command_channel();
    sender.navigate(HOME).unwrap();
    assert!(!receiver.is_superseded(1));

    sender.navigate(ABOUT).unwrap();
    assert!(receiver.is_superseded(1));
    assert_eq!(receiver.current_epoch(), 2);
}

#[test]
fn worker_renders_latest_navigation_and_closes() {
    let (sender, receiver) = command_channel();
    let (update_tx, update_rx) = mpsc::channel();
    let nav = NavigationController::new(
        site(),
        ChannelDisplay::new(update_tx),
        RenderOptions::default(),
        TraceLogger::disabled(),
    );

    sender.navigate("https://nowhere.invalid/").unwrap();
    sender.navigate(HOME).unwrap();
    sender.select(1, None).unwrap();
    drop(sender);

    let worker = thread::spawn(move || run_worker(nav, receiver));
    worker.join().unwrap();

    let updates: Vec<DisplayUpdate> = update_rx.try_iter().collect();
    let addresses: Vec<&str> = updates
        .iter()
        .filter_map(|u| match u {
            DisplayUpdate::Address(url) => Some(url.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(addresses, vec![HOME, ABOUT]);

    let loaded_error = updates.iter().any(|u| match u {
        DisplayUpdate::Text(text) => text.to_plain().starts_with("Error loading page"),
        _ => false,
    });
    assert!(!loaded_error, "stale navigation must not run");
}

#[test]
fn worker_quits_without_running_pending_commands() {
    let (sender, receiver) = command_channel();
    let (update_tx, update_rx) = mpsc::channel();
    let nav = NavigationController::new(
        site(),
        ChannelDisplay::new(update_tx),
        RenderOptions::default(),
        TraceLogger::disabled(),
    );

    sender.navigate(HOME).unwrap();
    sender.refresh().unwrap();
    sender.quit().unwrap();

    thread::spawn(move || run_worker(nav, receiver)).join().unwrap();

    assert_eq!(update_rx.try_iter().count(), 0);
}
