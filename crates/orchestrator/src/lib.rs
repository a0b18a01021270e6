//! Driver for the profile pipeline.
//!
//! Runs each user of a dataset through description and embedding, collects the
//! results and a per-user error ledger, and writes both as JSON.

pub mod orchestrator;
pub mod report;

pub use orchestrator::{ProfileOrchestrator, UserStage};
pub use report::{PersistSummary, RunReport, UserRecord, persist};
