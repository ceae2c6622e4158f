use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Mutex;

use log::warn;

use crate::trace::trace::TraceEvent;

/// Appends `TraceEvent`s as JSON lines. Failures are logged and ignored.
pub struct TraceLogger {
    file: Option<Mutex<File>>,
}

impl TraceLogger {
    pub fn new(path: &str) -> Self {
        let file = OpenOptions::new().create(true).append(true).open(path);

        match file {
            Ok(f) => Self {
                file: Some(Mutex::new(f)),
            },
            Err(e) => {
                warn!("could not open trace file '{}': {}", path, e);
                Self { file: None }
            }
        }
    }

    pub fn disabled() -> Self {
        Self { file: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    pub fn log(&self, event: &TraceEvent) {
        let Some(file) = &self.file else {
            return;
        };

        if let Err(e) = Self::append(file, event) {
            warn!("dropping trace event for step {}: {}", event.step, e);
        }
    }

    fn append(file: &Mutex<File>, event: &TraceEvent) -> Result<(), String> {
        let json = serde_json::to_string(event).map_err(|e| format!("serialize: {}", e))?;
        let mut file = file.lock().map_err(|_| "trace file lock poisoned".to_string())?;
        writeln!(file, "{}", json).map_err(|e| format!("write: {}", e))
    }
}
