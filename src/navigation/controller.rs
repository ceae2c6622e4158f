use log::{debug, info, warn};
use serde::Serialize;

use crate::browser::provider::DocumentProvider;
use crate::error::BrowserError;
use crate::interact::dispatcher::{DispatchOutcome, Payload, dispatch};
use crate::navigation::address::resolve_href;
use crate::navigation::display::DisplaySurface;
use crate::registry::registry::ElementRegistry;
use crate::render::formatter::{StyledText, Tone, format_page};
use crate::render::render_model::RenderOptions;
use crate::render::serializer::render_live;
use crate::trace::{logger::TraceLogger, trace::TraceEvent};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NavState {
    Idle,
    Loading { url: String },
    Rendered,
    Error { message: String },
}

impl NavState {
    pub fn label(&self) -> &'static str {
        match self {
            NavState::Idle => "idle",
            NavState::Loading { .. } => "loading",
            NavState::Rendered => "rendered",
            NavState::Error { .. } => "error",
        }
    }
}

/// Owns the document session and the element registry, and runs the
/// load -> render -> display cycle.
///
/// The registry is only replaced at the end of a successful render. A
/// failed load or render leaves it as it was, but the document generation
/// moves on, so positional actions against it are refused until the next
/// successful render.
pub struct NavigationController<P: DocumentProvider, D: DisplaySurface> {
    provider: P,
    display: D,
    options: RenderOptions,
    state: NavState,
    registry: ElementRegistry,
    document_generation: u64,
    address: Option<String>,
    tracer: TraceLogger,
    step: u64,
    closed: bool,
}

impl<P: DocumentProvider, D: DisplaySurface> NavigationController<P, D> {
    pub fn new(provider: P, display: D, options: RenderOptions, tracer: TraceLogger) -> Self {
        Self {
            provider,
            display,
            options,
            state: NavState::Idle,
            registry: ElementRegistry::new(),
            document_generation: 0,
            address: None,
            tracer,
            step: 0,
            closed: false,
        }
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn document_generation(&self) -> u64 {
        self.document_generation
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.navigate_unless(url, &|| false)
    }

    /// Load `url` and render it. If `superseded` reports a newer navigation
    /// once the load returns, the result is dropped without rendering.
    pub fn navigate_unless(&mut self, url: &str, superseded: &dyn Fn() -> bool) -> Result<(), BrowserError> {
        info!("navigate {}", url);
        self.set_state(NavState::Loading { url: url.to_string() });
        self.display.set_text(StyledText::message("Loading...", Tone::Notice));

        // Whatever happens next, the old document is gone.
        self.document_generation += 1;

        if let Err(e) = self.provider.load(url) {
            let error = BrowserError::LoadFailure(e.to_string());
            self.trace(TraceEvent::now(self.step, &self.state, "navigate").with_url(url).with_error(&error));
            self.show_page_failure(&error);
            return Err(error);
        }

        if superseded() {
            debug!("navigation to {} superseded, dropping result", url);
            self.trace(
                TraceEvent::now(self.step, &self.state, "navigate")
                    .with_url(url)
                    .with_error("superseded"),
            );
            return Ok(());
        }

        let resolved = match self.provider.current_url() {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!("could not read current url: {}", e);
                url.to_string()
            }
        };
        if resolved != url {
            debug!("{} resolved to {}", url, resolved);
        }
        self.display.set_address(&resolved);
        self.address = Some(resolved);

        self.render("navigate")
    }

    /// Re-render the live document without loading it again.
    pub fn refresh(&mut self) -> Result<(), BrowserError> {
        self.render("refresh")
    }

    pub fn interact(&mut self, index: i64, payload: &Payload) -> Result<(), BrowserError> {
        self.interact_unless(index, payload, &|| false)
    }

    /// Act on the element at global `index`. Links navigate, other
    /// actionable kinds act on the live document and trigger one re-render.
    /// Failures are shown and leave the state as it was.
    pub fn interact_unless(
        &mut self,
        index: i64,
        payload: &Payload,
        superseded: &dyn Fn() -> bool,
    ) -> Result<(), BrowserError> {
        let outcome = dispatch(
            &mut self.provider,
            &self.registry,
            self.document_generation,
            index,
            payload,
        );

        match outcome {
            Ok(DispatchOutcome::Navigate { href }) => {
                let url = resolve_href(self.address.as_deref(), &href);
                self.navigate_unless(&url, superseded)
            }
            Ok(DispatchOutcome::Performed { kind, position }) => {
                self.trace(
                    TraceEvent::now(self.step, &self.state, "interact")
                        .with_index(index)
                        .with_kind(kind),
                );
                debug!("{:?} #{} performed, re-rendering", kind, position);
                self.document_generation += 1;
                self.sync_address();
                self.render("refresh")
            }
            Err(BrowserError::ValueRequired { index, input_type }) => {
                self.display.prompt_value(index, &input_type);
                Err(BrowserError::ValueRequired { index, input_type })
            }
            Err(error) => {
                warn!("interaction with [{}] failed: {}", index, error);
                self.trace(
                    TraceEvent::now(self.step, &self.state, "interact")
                        .with_index(index)
                        .with_error(&error),
                );
                self.display.set_text(StyledText::from_error(&error));
                Err(error)
            }
        }
    }

    /// Close the document provider. Safe to call from any state, and more
    /// than once.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.provider.close() {
            warn!("closing document provider: {}", e);
        }
        self.trace(TraceEvent::now(self.step, &self.state, "close"));
    }

    fn render(&mut self, operation: &str) -> Result<(), BrowserError> {
        match render_live(&mut self.provider, &self.options) {
            Ok(page) => {
                self.registry.replace(&page, self.document_generation);
                self.display.set_text(format_page(&page));
                self.set_state(NavState::Rendered);

                let mut event = TraceEvent::now(self.step, &self.state, operation)
                    .with_page(self.registry.len(), self.registry.fingerprint());
                if let Some(url) = &self.address {
                    event = event.with_url(url);
                }
                self.trace(event);
                Ok(())
            }
            Err(error) => {
                // The document may have moved on without us seeing it.
                self.document_generation += 1;
                self.trace(TraceEvent::now(self.step, &self.state, operation).with_error(&error));
                self.show_page_failure(&error);
                Err(error)
            }
        }
    }

    /// Actions such as form submits may have moved the page elsewhere.
    fn sync_address(&mut self) {
        match self.provider.current_url() {
            Ok(url) if self.address.as_deref() != Some(url.as_str()) => {
                self.display.set_address(&url);
                self.address = Some(url);
            }
            Ok(_) => {}
            Err(e) => warn!("could not read current url: {}", e),
        }
    }

    fn show_page_failure(&mut self, error: &BrowserError) {
        warn!("{}", error);
        self.set_state(NavState::Error {
            message: error.to_string(),
        });
        self.display.set_text(StyledText::from_error(error));
    }

    fn set_state(&mut self, state: NavState) {
        self.state = state;
        self.display.set_state(&self.state);
    }

    fn trace(&mut self, event: TraceEvent) {
        self.tracer.log(&event);
        self.step += 1;
    }
}

impl<P: DocumentProvider, D: DisplaySurface> Drop for NavigationController<P, D> {
    fn drop(&mut self) {
        self.close();
    }
}
