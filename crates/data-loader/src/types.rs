//! Core domain types shared by every crate in the workspace.
//!
//! Items and users live in their own modules; this module holds the small
//! value types around them: identifiers, demographic enums, and the prompt
//! and description payloads exchanged with the completion service.

use crate::error::{DataLoadError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a MovieLens user (1-6040 in MovieLens 1M)
pub type UserId = u32;

/// Unique identifier for a MovieLens movie
pub type MovieId = u32;

/// User rating on the dataset's native 1-5 scale
pub type Score = u8;

// =============================================================================
// User-related Types
// =============================================================================

/// Gender as recorded in `users.dat`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Parse the single-letter code used by MovieLens ("M" / "F")
    pub fn from_code(code: &str) -> Result<Self> {
        match code {
            "M" => Ok(Gender::Male),
            "F" => Ok(Gender::Female),
            _ => Err(DataLoadError::InvalidValue {
                field: "gender".to_string(),
                value: code.to_string(),
            }),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

/// Age groups from the MovieLens dataset
///
/// MovieLens stores the lower bound of the bucket as the age code, so only the
/// seven codes below are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    Under18,
    Age18To24,
    Age25To34,
    Age35To44,
    Age45To49,
    Age50To55,
    Age56Plus,
}

impl AgeGroup {
    /// Look up the bucket for a raw age code
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            1 => Ok(AgeGroup::Under18),
            18 => Ok(AgeGroup::Age18To24),
            25 => Ok(AgeGroup::Age25To34),
            35 => Ok(AgeGroup::Age35To44),
            45 => Ok(AgeGroup::Age45To49),
            50 => Ok(AgeGroup::Age50To55),
            56 => Ok(AgeGroup::Age56Plus),
            _ => Err(DataLoadError::InvalidValue {
                field: "age".to_string(),
                value: code.to_string(),
            }),
        }
    }

    /// The code this bucket is stored as in `users.dat`
    pub fn code(&self) -> u8 {
        match self {
            AgeGroup::Under18 => 1,
            AgeGroup::Age18To24 => 18,
            AgeGroup::Age25To34 => 25,
            AgeGroup::Age35To44 => 35,
            AgeGroup::Age45To49 => 45,
            AgeGroup::Age50To55 => 50,
            AgeGroup::Age56Plus => 56,
        }
    }

    /// Human readable bucket used in prompts
    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::Under18 => "Under 18",
            AgeGroup::Age18To24 => "18-24",
            AgeGroup::Age25To34 => "25-34",
            AgeGroup::Age35To44 => "35-44",
            AgeGroup::Age45To49 => "45-49",
            AgeGroup::Age50To55 => "50-55",
            AgeGroup::Age56Plus => "56+",
        }
    }
}

/// Identity of a user across both datasets.
///
/// MovieLens ids are numeric, Amazon ids are opaque tokens. Serialized
/// untagged so the results file keeps the dataset's native id type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserKey {
    Numeric(u32),
    Text(String),
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserKey::Numeric(id) => write!(f, "{}", id),
            UserKey::Text(id) => f.write_str(id),
        }
    }
}

/// Which corpus a profile comes from. Drives the system instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    Movie,
    Music,
}

/// How a music user's ratings are rendered into a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PromptStyle {
    /// One sentence with the item count and every rated item
    #[default]
    Summary,
    /// One sentence per rating value, best first
    Grouped,
}

// =============================================================================
// Prompt-related Types
// =============================================================================

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single role-tagged message of a chat prompt
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Result of the description step.
///
/// In test mode the agent hands back the prompt it would have sent, so the
/// description is either model text or the raw message list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Prompt(Vec<ChatMessage>),
}

impl Description {
    /// The model text, if this is not a test-mode prompt
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Description::Text(text) => Some(text),
            Description::Prompt(_) => None,
        }
    }
}
