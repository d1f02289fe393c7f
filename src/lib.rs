//! Trace Event Stats
//!
//! Reference-keyed name resolution and streaming enter/leave aggregation
//! for performance traces.
//!
//! A trace reader delivers definitions (strings, locations, regions) and
//! then a globally time-ordered stream of enter/leave events through
//! callbacks. This crate resolves every event's location and region to a
//! name, counts events per kind and optionally keeps the resolved events.
//!
//! ## Getting Started
//!
//! ```bash
//! trace-stats summarize --trace trace.json --names
//! ```

pub mod aggregator;
pub mod commands;
pub mod index;
pub mod output;
pub mod reader;
pub mod resolver;
pub mod session;
pub mod utils;
