use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::browser::provider::{
    ActionRequest, DocumentProvider, ElementAction, ProviderError, SelectorKind,
};
use crate::cli::config::BrowserConfig;
use crate::document::document_model::DocumentNode;

/// Request sent to browser_server.js over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BrowserRequest<'a> {
    Navigate {
        cmd: &'static str,
        url: String,
        settle_ms: u64,
    },
    Snapshot {
        cmd: &'static str,
    },
    Action {
        cmd: &'static str,
        selector: SelectorKind,
        position: usize,
        action: ElementAction,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<&'a str>,
        settle_ms: u64,
    },
    CurrentUrl {
        cmd: &'static str,
    },
    Quit {
        cmd: &'static str,
    },
}

impl<'a> BrowserRequest<'a> {
    pub fn navigate(url: &str, settle_ms: u64) -> Self {
        BrowserRequest::Navigate {
            cmd: "navigate",
            url: url.to_string(),
            settle_ms,
        }
    }

    pub fn snapshot() -> Self {
        BrowserRequest::Snapshot { cmd: "snapshot" }
    }

    pub fn action(request: &'a ActionRequest, settle_ms: u64) -> Self {
        BrowserRequest::Action {
            cmd: "action",
            selector: request.selector,
            position: request.position,
            action: request.action,
            value: request.value.as_deref(),
            settle_ms,
        }
    }

    pub fn current_url() -> Self {
        BrowserRequest::CurrentUrl { cmd: "current_url" }
    }

    pub fn quit() -> Self {
        BrowserRequest::Quit { cmd: "quit" }
    }
}

/// Response received from browser_server.js over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct BrowserResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
}

/// A persistent browser session backed by browser_server.js.
///
/// Launches a long-lived Node.js process that keeps a Chromium page open.
/// Commands are sent as NDJSON over stdin, responses read from stdout.
pub struct BrowserSession {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
    settle_ms: u64,
    closed: bool,
}

impl BrowserSession {
    /// Launch a new browser session by spawning the configured script.
    pub fn launch(config: &BrowserConfig) -> Result<Self, ProviderError> {
        info!("launching {} {}", config.node, config.script);

        let mut command = Command::new(&config.node);
        command
            .arg(&config.script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        if !config.headless {
            command.env("TERMIUM_HEADFUL", "1");
        }

        let mut child = command.spawn().map_err(|e| ProviderError::SubprocessSpawn {
            script: config.script.clone(),
            source: e,
        })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            ProviderError::SessionIO("Failed to capture stdin of browser_server.js".into())
        })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            ProviderError::SessionIO("Failed to capture stdout of browser_server.js".into())
        })?;

        let mut reader = BufReader::new(stdout);

        // Wait for the ready signal
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| ProviderError::SessionIO(format!("Failed to read ready signal: {}", e)))?;

        let response: BrowserResponse =
            serde_json::from_str(line.trim()).map_err(|e| ProviderError::JsonParse {
                context: "browser_server.js ready signal".into(),
                source: e,
            })?;

        if !response.ok || response.ready != Some(true) {
            return Err(ProviderError::Protocol {
                command: "launch".into(),
                error: response
                    .error
                    .unwrap_or_else(|| "Did not receive ready signal from browser_server.js".into()),
            });
        }

        Ok(BrowserSession {
            child,
            stdin,
            reader,
            settle_ms: config.settle_ms,
            closed: false,
        })
    }

    /// Send a request and read the response.
    fn send(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, ProviderError> {
        let json = serde_json::to_string(request).map_err(|e| ProviderError::JsonSerialize {
            context: "BrowserRequest".into(),
            source: e,
        })?;
        debug!("-> {}", json);

        writeln!(self.stdin, "{}", json).map_err(|e| {
            ProviderError::SessionIO(format!("Failed to write to browser_server.js stdin: {}", e))
        })?;

        self.stdin.flush().map_err(|e| {
            ProviderError::SessionIO(format!("Failed to flush browser_server.js stdin: {}", e))
        })?;

        let mut line = String::new();
        self.reader.read_line(&mut line).map_err(|e| {
            ProviderError::SessionIO(format!("Failed to read from browser_server.js stdout: {}", e))
        })?;

        if line.trim().is_empty() {
            return Err(ProviderError::SessionIO(
                "Empty response from browser_server.js (process may have died)".into(),
            ));
        }

        serde_json::from_str(line.trim()).map_err(|e| ProviderError::JsonParse {
            context: "browser_server.js response".into(),
            source: e,
        })
    }

    /// Send a request and verify it succeeded.
    fn send_ok(&mut self, request: &BrowserRequest, command_name: &str) -> Result<BrowserResponse, ProviderError> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(ProviderError::Protocol {
                command: command_name.into(),
                error: response.error.unwrap_or_else(|| "Unknown error".into()),
            });
        }
        Ok(response)
    }
}

impl DocumentProvider for BrowserSession {
    fn load(&mut self, url: &str) -> Result<(), ProviderError> {
        let request = BrowserRequest::navigate(url, self.settle_ms);
        let response = self.send_ok(&request, "navigate")?;
        debug!("loaded {}", response.url.as_deref().unwrap_or(url));
        Ok(())
    }

    fn current_url(&mut self) -> Result<String, ProviderError> {
        let request = BrowserRequest::current_url();
        let response = self.send_ok(&request, "current_url")?;
        let url = response.url.ok_or_else(|| ProviderError::Protocol {
            command: "current_url".into(),
            error: "No URL in current_url response".into(),
        })?;
        Ok(url)
    }

    fn evaluate(&mut self) -> Result<DocumentNode, ProviderError> {
        let request = BrowserRequest::snapshot();
        let response = self.send_ok(&request, "snapshot")?;
        let data = response.data.ok_or_else(|| ProviderError::Protocol {
            command: "snapshot".into(),
            error: "No data in snapshot response".into(),
        })?;

        serde_json::from_value(data).map_err(|e| ProviderError::JsonParse {
            context: "document tree".into(),
            source: e,
        })
    }

    fn act(&mut self, request: &ActionRequest) -> Result<(), ProviderError> {
        let message = BrowserRequest::action(request, self.settle_ms);
        self.send_ok(&message, "action")?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), ProviderError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        // Best-effort quit, the process may already be gone
        if let Err(e) = self.send(&BrowserRequest::quit()) {
            warn!("browser_server.js did not acknowledge quit: {}", e);
        }
        let _ = self.child.wait();
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
