//! Users and their prompt renderings.
//!
//! Both user types keep ratings in an `IndexMap` so that prompts list items in
//! the order the loader first saw them. Re-rating an item updates the value in
//! place and never moves it.

use crate::item::{MovieItem, MusicItem};
use crate::traits::Profile;
use crate::types::*;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Movie users
// =============================================================================

/// A MovieLens user with demographics and title-keyed ratings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieUser {
    pub id: UserId,
    pub gender: Gender,
    pub age: AgeGroup,
    pub ratings: IndexMap<MovieItem, Score>,
    pub description: Option<Description>,
    pub embedding: Option<Vec<f32>>,
}

impl MovieUser {
    pub fn new(id: UserId, gender: Gender, age: AgeGroup) -> Self {
        Self {
            id,
            gender,
            age,
            ratings: IndexMap::new(),
            description: None,
            embedding: None,
        }
    }

    /// Record a rating. A repeated title keeps its position and takes the new value.
    pub fn rate(&mut self, item: MovieItem, rating: Score) {
        self.ratings.insert(item, rating);
    }
}

impl Profile for MovieUser {
    const DOMAIN: Domain = Domain::Movie;

    fn key(&self) -> UserKey {
        UserKey::Numeric(self.id)
    }

    /// "I am a Female of age 25-34 and I rank movies as follows: Movie A: 5, Movie B: 2"
    fn prompt(&self) -> String {
        let movies = self
            .ratings
            .iter()
            .map(|(movie, rating)| format!("{}: {}", movie, rating))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "I am a {} of age {} and I rank movies as follows: {}",
            self.gender.label(),
            self.age.label(),
            movies
        )
    }

    fn rating_entries(&self) -> IndexMap<String, Score> {
        self.ratings
            .iter()
            .map(|(movie, &rating)| (movie.title.clone(), rating))
            .collect()
    }

    fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }

    fn embedding(&self) -> Option<&[f32]> {
        self.embedding.as_deref()
    }

    fn set_description(&mut self, description: Description) {
        self.description = Some(description);
    }

    fn set_embedding(&mut self, embedding: Vec<f32>) {
        self.embedding = Some(embedding);
    }
}

// =============================================================================
// Music users
// =============================================================================

/// Sentence openers for the grouped rendering, best rating first
const GROUPED_SENTENCES: [(Score, &str); 5] = [
    (5, "I found following items excellent and rate theme five of five"),
    (4, "Items that I found good and rate them four of five"),
    (3, "Items that I found average and rate them three of five"),
    (2, "Items that I found below average and rate them two of five"),
    (1, "Items that I found terrible and rate them one of five"),
];

/// An Amazon CDs & Vinyl reviewer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MusicUser {
    pub id: String,
    pub ratings: IndexMap<MusicItem, Score>,
    /// Timestamp of the observation currently held in `ratings`, by item id
    pub timestamps: HashMap<String, i64>,
    pub style: PromptStyle,
    pub description: Option<Description>,
    pub embedding: Option<Vec<f32>>,
}

impl MusicUser {
    pub fn new(id: impl Into<String>, style: PromptStyle) -> Self {
        Self {
            id: id.into(),
            ratings: IndexMap::new(),
            timestamps: HashMap::new(),
            style,
            description: None,
            embedding: None,
        }
    }

    /// Record a rating observation.
    ///
    /// For an item seen before, the observation replaces the stored rating
    /// only if its timestamp is not older than the stored one. Equal
    /// timestamps resolve to the last observation.
    ///
    /// Returns whether the observation was kept.
    pub fn add(&mut self, item: MusicItem, rating: Score, timestamp: i64) -> bool {
        if let Some(&seen) = self.timestamps.get(&item.id) {
            if timestamp < seen {
                return false;
            }
        }

        self.timestamps.insert(item.id.clone(), timestamp);
        self.ratings.insert(item, rating);
        true
    }

    /// "I have rated 2 items. T1 of B1 in unknown category: 4, ..."
    pub fn summary_prompt(&self) -> String {
        let items = self
            .ratings
            .iter()
            .map(|(item, rating)| format!("{}: {}", item_phrase(item), rating))
            .collect::<Vec<_>>()
            .join(", ");

        format!("I have rated {} items. {}", self.ratings.len(), items)
    }

    /// One sentence per rating value from 5 down to 1, newline separated.
    /// Rating values nobody used produce no sentence at all.
    pub fn grouped_prompt(&self) -> String {
        let mut buckets: HashMap<Score, Vec<String>> = HashMap::new();
        for (item, &rating) in &self.ratings {
            buckets.entry(rating).or_default().push(item_phrase(item));
        }

        GROUPED_SENTENCES
            .iter()
            .filter_map(|(rating, opener)| {
                let items = buckets.get(rating).filter(|items| !items.is_empty())?;
                Some(format!("{}: {}. ", opener, items.join(", ")))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn item_phrase(item: &MusicItem) -> String {
    format!(
        "{} of {} in {} category",
        item.title,
        item.brand,
        item.category_label()
    )
}

impl Profile for MusicUser {
    const DOMAIN: Domain = Domain::Music;

    fn key(&self) -> UserKey {
        UserKey::Text(self.id.clone())
    }

    fn prompt(&self) -> String {
        match self.style {
            PromptStyle::Summary => self.summary_prompt(),
            PromptStyle::Grouped => self.grouped_prompt(),
        }
    }

    fn rating_entries(&self) -> IndexMap<String, Score> {
        self.ratings
            .iter()
            .map(|(item, &rating)| (item.to_string(), rating))
            .collect()
    }

    fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }

    fn embedding(&self) -> Option<&[f32]> {
        self.embedding.as_deref()
    }

    fn set_description(&mut self, description: Description) {
        self.description = Some(description);
    }

    fn set_embedding(&mut self, embedding: Vec<f32>) {
        self.embedding = Some(embedding);
    }
}
