use log::info;

use crate::browser::provider::DocumentProvider;
use crate::browser::session::BrowserSession;
use crate::browser::static_provider::StaticProvider;
use crate::cli::config::AppConfig;
use crate::document::document_model::DocumentNode;
use crate::error::BrowserError;
use crate::navigation::address::normalize_address;
use crate::navigation::controller::NavigationController;
use crate::navigation::display::CaptureDisplay;
use crate::render::formatter::StyledText;
use crate::render::render_model::RenderOptions;
use crate::trace::logger::TraceLogger;
use crate::tui;

fn build_tracer(trace: Option<&str>) -> TraceLogger {
    trace.map(TraceLogger::new).unwrap_or_else(TraceLogger::disabled)
}

// ============================================================================
// browse subcommand
// ============================================================================

pub fn cmd_browse(
    url: Option<&str>,
    config: &AppConfig,
    trace: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = url.unwrap_or(config.start_url.as_str());
    let start = normalize_address(start).unwrap_or_else(|| config.start_url.clone());

    let session = BrowserSession::launch(&config.browser)?;
    info!("browsing from {}", start);

    tui::run(session, &start, config.render.options(), build_tracer(trace))?;
    Ok(())
}

// ============================================================================
// render subcommand
// ============================================================================

/// Render one page and print it. Returns whether the page rendered.
pub fn cmd_render(
    url: Option<&str>,
    tree: Option<&str>,
    config: &AppConfig,
    trace: Option<&str>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let options = config.render.options();
    let tracer = build_tracer(trace);

    let result = match (tree, url) {
        (Some(path), _) => {
            let content = std::fs::read_to_string(path)?;
            let root: DocumentNode = serde_json::from_str(&content)?;
            let target = format!("file://{}", path);
            let provider = StaticProvider::new().with_page(&target, root);
            render_once(provider, &target, options, tracer)
        }
        (None, Some(url)) => {
            let target = normalize_address(url).ok_or("empty URL")?;
            let session = BrowserSession::launch(&config.browser)?;
            render_once(session, &target, options, tracer)
        }
        (None, None) => return Err("either --url or --tree is required".into()),
    };

    match result {
        Ok(text) => {
            println!("{}", text.to_plain());
            Ok(true)
        }
        Err(e) => {
            eprintln!("{}", e);
            Ok(false)
        }
    }
}

/// Navigate a fresh controller to `url` and return what it displays.
pub fn render_once<P: DocumentProvider>(
    provider: P,
    url: &str,
    options: RenderOptions,
    tracer: TraceLogger,
) -> Result<StyledText, BrowserError> {
    let mut controller = NavigationController::new(provider, CaptureDisplay::default(), options, tracer);
    controller.navigate(url)?;

    let text = controller.display().last.clone().unwrap_or_default();
    controller.close();
    Ok(text)
}
