//! Load a JSON trace dump from disk or from a string.

use super::dump::TraceDump;
use super::replay::MemoryTrace;
use crate::utils::error::ReaderError;
use log::{debug, info};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Open a trace dump file
///
/// **Public** - main entry point for the replay reader
///
/// # Errors
/// * `ReaderError::Io` - file cannot be opened or read
/// * `ReaderError::Json` - invalid JSON or wrong structure
/// * `ReaderError::InvalidFormat` - unsupported version or malformed events
pub fn open_trace(path: impl AsRef<Path>) -> Result<MemoryTrace, ReaderError> {
    let path = path.as_ref();

    info!("Opening trace dump: {}", path.display());

    let file = File::open(path)?;
    let dump: TraceDump = serde_json::from_reader(BufReader::new(file))?;

    log_dump_shape(&dump);
    MemoryTrace::from_dump(dump)
}

/// Parse a trace dump held in a string
pub fn parse_trace(json: &str) -> Result<MemoryTrace, ReaderError> {
    let dump: TraceDump = serde_json::from_str(json)?;

    log_dump_shape(&dump);
    MemoryTrace::from_dump(dump)
}

fn log_dump_shape(dump: &TraceDump) {
    debug!(
        "Dump v{}: {} strings, {} locations, {} regions, {} events",
        dump.version,
        dump.strings.len(),
        dump.locations.len(),
        dump.regions.len(),
        dump.event_count()
    );
}
