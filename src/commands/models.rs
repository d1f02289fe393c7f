use crate::utils::config::{SessionConfig, DEFAULT_EVENT_LOG_CAPACITY};
use std::path::PathBuf;

/// Arguments for the summarize command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct SummarizeArgs {
    /// Trace dump to read
    pub trace: PathBuf,

    /// Print the summary as JSON instead of text
    pub json: bool,

    /// List every location and region name
    pub list_names: bool,

    /// Keep every resolved event in memory
    pub retain_events: bool,

    /// Print the first N resolved events (requires retention)
    pub show_events: usize,

    /// Initial capacity of the event log
    pub log_capacity: usize,
}

impl Default for SummarizeArgs {
    fn default() -> Self {
        Self {
            trace: PathBuf::from("trace.json"),
            json: false,
            list_names: false,
            retain_events: true,
            show_events: 0,
            log_capacity: DEFAULT_EVENT_LOG_CAPACITY,
        }
    }
}

impl SummarizeArgs {
    /// Session tunables derived from the arguments
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            event_log_capacity: self.log_capacity,
            retain_events: self.retain_events,
            ..SessionConfig::default()
        }
    }
}
