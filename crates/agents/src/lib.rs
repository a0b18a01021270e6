//! Agents that turn user profiles into descriptions and embeddings.
//!
//! This crate provides:
//! - `DescriptionAgent`: builds the `[system, user]` prompt for a profile and
//!   asks the completion service for a description
//! - `EmbeddingAgent`: embeds description text
//! - Domain system instructions for movies and music
//!
//! Both agents memoize their results for the lifetime of the instance.
//!
//! ## Example Usage
//! ```ignore
//! use agents::{DescriptionAgent, EmbeddingAgent};
//!
//! let mut describer = DescriptionAgent::new(client.clone());
//! let mut encoder = EmbeddingAgent::new(client);
//!
//! let (description, vector) = encoder.encode_user(&mut describer, &user).await?;
//! ```

pub mod description;
pub mod embedding;
pub mod error;
pub mod instructions;

pub use description::DescriptionAgent;
pub use embedding::EmbeddingAgent;
pub use error::AgentError;
pub use instructions::system_instruction;
