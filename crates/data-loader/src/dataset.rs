//! Dataset loading: parse the raw files and join them into users.
//!
//! Both datasets are built eagerly by `load_from_files` and own their users
//! for the rest of their lifetime. Iteration order is load order.

use crate::error::{DataLoadError, Result};
use crate::item::{MovieItem, MusicItem, canonical_id};
use crate::parser::{self, Interaction, MovieRow, RatingRow, UserRow};
use crate::types::*;
use crate::user::{MovieUser, MusicUser};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::hash::Hash;
use std::path::Path;
use tracing::{debug, info, warn};

pub const MOVIE_USERS_FILE: &str = "users.dat";
pub const MOVIE_ITEMS_FILE: &str = "movies.dat";
pub const MOVIE_RATINGS_FILE: &str = "ratings.dat";
pub const MUSIC_ITEMS_FILE: &str = "Amazon_CDs_and_Vinyl.item";
pub const MUSIC_INTERACTIONS_FILE: &str = "Amazon_CDs_and_Vinyl.inter";

/// Resolve a reference, failing with `MissingReference` when `id` is unknown
fn lookup<'a, K, V>(map: &'a HashMap<K, V>, entity: &str, id: &K) -> Result<&'a V>
where
    K: Hash + Eq + Display,
{
    map.get(id).ok_or_else(|| DataLoadError::MissingReference {
        entity: entity.to_string(),
        id: id.to_string(),
    })
}

// =============================================================================
// MovieLens 1M
// =============================================================================

/// All MovieLens users with their title-keyed ratings
#[derive(Debug, Default)]
pub struct MovieDataset {
    users: IndexMap<UserId, MovieUser>,
}

impl MovieDataset {
    /// Load the MovieLens dataset from a directory
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        Self::load_with_allowlist(data_dir, None)
    }

    /// Load the dataset keeping only ratings of the given movie ids
    ///
    /// Steps:
    /// 1. Parse all three files (users, movies, ratings) in parallel
    /// 2. Build the movie lookup
    /// 3. Join ratings to titles, one user per users.dat row
    pub fn load_with_allowlist(
        data_dir: &Path,
        allowlist: Option<&HashSet<MovieId>>,
    ) -> Result<Self> {
        info!("Loading MovieLens dataset from {:?}", data_dir);

        let users_path = data_dir.join(MOVIE_USERS_FILE);
        let movies_path = data_dir.join(MOVIE_ITEMS_FILE);
        let ratings_path = data_dir.join(MOVIE_RATINGS_FILE);

        // Nested joins give three-way parallelism
        let ((users, movies), ratings) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_users(&users_path),
                    || parser::parse_movies(&movies_path),
                )
            },
            || parser::parse_ratings(&ratings_path),
        );

        let users = users?;
        let movies = movies?;
        let ratings = ratings?;

        info!(
            "Parsed {} users, {} movies, {} ratings",
            users.len(),
            movies.len(),
            ratings.len()
        );

        Ok(Self::from_rows(users, movies, ratings, allowlist))
    }

    /// Join parsed rows into users.
    ///
    /// Ratings keep their file order within each user. Ratings that point at
    /// an unknown user or movie are skipped.
    pub fn from_rows(
        users: Vec<UserRow>,
        movies: Vec<MovieRow>,
        ratings: Vec<RatingRow>,
        allowlist: Option<&HashSet<MovieId>>,
    ) -> Self {
        let titles: HashMap<MovieId, String> = movies
            .into_iter()
            .map(|movie| (movie.id, movie.title))
            .collect();

        let mut by_id: IndexMap<UserId, MovieUser> = users
            .into_iter()
            .map(|row| (row.id, MovieUser::new(row.id, row.gender, row.age)))
            .collect();

        let mut unknown_users = 0usize;
        let mut unknown_movies = 0usize;
        for rating in ratings {
            if allowlist.is_some_and(|allowed| !allowed.contains(&rating.movie_id)) {
                continue;
            }

            let title = match lookup(&titles, "movie", &rating.movie_id) {
                Ok(title) => title,
                Err(e) => {
                    unknown_movies += 1;
                    debug!("Skipping rating of user {}: {}", rating.user_id, e);
                    continue;
                }
            };
            let Some(user) = by_id.get_mut(&rating.user_id) else {
                unknown_users += 1;
                let e = DataLoadError::MissingReference {
                    entity: "user".to_string(),
                    id: rating.user_id.to_string(),
                };
                debug!("Skipping rating of movie {}: {}", rating.movie_id, e);
                continue;
            };

            user.rate(MovieItem::new(title.clone()), rating.rating);
        }

        if unknown_movies > 0 || unknown_users > 0 {
            warn!(
                "Skipped ratings with missing references: {} unknown movies, {} unknown users",
                unknown_movies, unknown_users
            );
        }

        Self { users: by_id }
    }

    /// Build a dataset from already constructed users
    pub fn from_users(users: impl IntoIterator<Item = MovieUser>) -> Self {
        Self {
            users: users.into_iter().map(|user| (user.id, user)).collect(),
        }
    }

    pub fn get(&self, id: UserId) -> Option<&MovieUser> {
        self.users.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MovieUser> {
        self.users.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut MovieUser> {
        self.users.values_mut()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

// =============================================================================
// Amazon CDs & Vinyl
// =============================================================================

/// The Amazon catalog and every reviewer's ratings
#[derive(Debug, Default)]
pub struct MusicDataset {
    items: HashMap<String, MusicItem>,
    users: IndexMap<String, MusicUser>,
}

impl MusicDataset {
    /// Load catalog and interactions from a directory
    pub fn load_from_files(data_dir: &Path, style: PromptStyle) -> Result<Self> {
        let items_path = data_dir.join(MUSIC_ITEMS_FILE);
        info!("Loading items from {:?}", items_path);
        let items = parser::parse_music_items(&items_path)?;

        let interactions_path = data_dir.join(MUSIC_INTERACTIONS_FILE);
        info!("Loading interactions from {:?}", interactions_path);
        let interactions = parser::parse_interactions(&interactions_path)?;

        info!(
            "Parsed {} items and {} interactions",
            items.len(),
            interactions.len()
        );

        Ok(Self::from_records(items, interactions, style))
    }

    /// Join interactions to the catalog.
    ///
    /// A user is created on first sight, even if none of their ratings can be
    /// resolved. An interaction whose item is missing from the catalog is
    /// skipped on its own.
    pub fn from_records(
        items: Vec<MusicItem>,
        interactions: Vec<Interaction>,
        style: PromptStyle,
    ) -> Self {
        let items: HashMap<String, MusicItem> = items
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect();

        let mut users: IndexMap<String, MusicUser> = IndexMap::new();
        let mut missing = 0usize;
        for interaction in interactions {
            let user = users
                .entry(interaction.user_id.clone())
                .or_insert_with(|| MusicUser::new(interaction.user_id.clone(), style));

            let item_id = canonical_id(&interaction.item_id);
            match lookup(&items, "item", &item_id) {
                Ok(item) => {
                    user.add(item.clone(), interaction.rating, interaction.timestamp);
                }
                Err(e) => {
                    missing += 1;
                    debug!("Skipping rating of user {}: {}", interaction.user_id, e);
                }
            }
        }

        if missing > 0 {
            warn!("Skipped {} interactions with items missing from the catalog", missing);
        }
        info!("Built {} music users", users.len());

        Self { items, users }
    }

    pub fn get(&self, id: &str) -> Option<&MusicUser> {
        self.users.get(id)
    }

    /// Look up a catalog item by raw or canonical id
    pub fn get_item(&self, id: &str) -> Option<&MusicItem> {
        self.items.get(&canonical_id(id))
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MusicUser> {
        self.users.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut MusicUser> {
        self.users.values_mut()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
