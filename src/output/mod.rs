//! Output rendering for session results.
//!
//! - Text summaries (counters, metric members, optional name listings)
//! - JSON summaries
//! - Event log excerpts

pub mod summary;

// Re-export main functions
pub use summary::{
    build_summary, render_events, render_text, summary_to_json, MetricSummary, TimingSummary,
    TraceSummary, UnresolvedCounts,
};
