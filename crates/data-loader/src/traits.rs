//! The capability interface shared by movie and music users.

use crate::types::{Description, Domain, Score, UserKey};
use indexmap::IndexMap;

/// A user whose ratings can be rendered into a prompt and who can carry the
/// artifacts produced from that prompt.
///
/// Implemented by `MovieUser` and `MusicUser`. Agents and the orchestrator only
/// ever see users through this trait.
pub trait Profile {
    /// Which corpus this user belongs to
    const DOMAIN: Domain;

    /// Identity used for memoization and the error ledger
    fn key(&self) -> UserKey;

    /// Render the ratings into natural-language prompt text.
    ///
    /// Must be a pure function of the current ratings: calling it twice on an
    /// unmodified user yields the same text.
    fn prompt(&self) -> String;

    /// Ratings keyed by the item's display form, in insertion order
    fn rating_entries(&self) -> IndexMap<String, Score>;

    fn description(&self) -> Option<&Description>;

    fn embedding(&self) -> Option<&[f32]>;

    fn set_description(&mut self, description: Description);

    fn set_embedding(&mut self, embedding: Vec<f32>);
}
