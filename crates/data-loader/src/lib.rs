//! # Data Loader Crate
//!
//! Loads the two rating corpora and turns every user's ratings into
//! prompt-ready text.
//!
//! ## Main Components
//!
//! - **types**: Shared value types (ids, demographics, prompt messages)
//! - **item**: Catalog items (`MovieItem`, `MusicItem`) and id canonicalization
//! - **user**: `MovieUser` / `MusicUser` and their prompt renderings
//! - **traits**: The `Profile` capability trait both users implement
//! - **parser**: Parse `.dat` and typed `.tsv` files into raw rows
//! - **dataset**: Join raw rows into `MovieDataset` / `MusicDataset`
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{MovieDataset, Profile};
//! use std::path::Path;
//!
//! let dataset = MovieDataset::load_from_files(Path::new("data/ml-1m"))?;
//! let user = dataset.get(1).unwrap();
//! println!("{}", user.prompt());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod item;
pub mod user;
pub mod traits;
pub mod parser;
pub mod dataset;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{
    // Type aliases
    UserId,
    MovieId,
    Score,
    // Enums
    Gender,
    AgeGroup,
    Domain,
    PromptStyle,
    Role,
    UserKey,
    // Prompt payloads
    ChatMessage,
    Description,
};
pub use item::{MovieItem, MusicItem, canonical_id};
pub use user::{MovieUser, MusicUser};
pub use traits::Profile;
pub use dataset::{MovieDataset, MusicDataset};
