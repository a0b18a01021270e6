//! Parsers for the raw dataset files.
//!
//! MovieLens 1M (`::` separated, ISO-8859-1):
//! - users.dat: userId::gender::age::occupation::zipcode
//! - movies.dat: movieId::title::genres
//! - ratings.dat: userId::movieId::rating::timestamp
//!
//! Amazon CDs & Vinyl (tab separated, UTF-8, header row):
//! - Amazon_CDs_and_Vinyl.item: item_id:token, title:token, categories:token_seq, ...
//! - Amazon_CDs_and_Vinyl.inter: user_id:token, item_id:token, rating:float, timestamp:float
//!
//! A missing file is fatal. A malformed line is logged and skipped so one bad
//! row never costs the whole load.

use crate::error::{DataLoadError, Result};
use crate::item::MusicItem;
use crate::types::*;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::warn;

// =============================================================================
// Raw record types
// =============================================================================

/// One row of users.dat
#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
    pub id: UserId,
    pub gender: Gender,
    pub age: AgeGroup,
    pub occupation: u8,
    pub zipcode: String,
}

/// One row of movies.dat
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRow {
    pub id: MovieId,
    pub title: String,
    pub genres: Vec<String>,
}

/// One row of ratings.dat
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingRow {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: Score,
    /// Unix timestamp when rating was made
    pub timestamp: i64,
}

/// One row of the Amazon interaction file. `item_id` is still the raw token.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    pub user_id: String,
    pub item_id: String,
    pub rating: Score,
    pub timestamp: i64,
}

// =============================================================================
// File helpers
// =============================================================================

fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        })
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read a file with ISO-8859-1 encoding (Latin-1)
///
/// Every Latin-1 byte maps directly to the Unicode code point of the same value.
fn read_lines_latin1(path: &Path) -> Result<Vec<String>> {
    ensure_exists(path)?;
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let content: String = bytes.iter().map(|&b| b as char).collect();
    Ok(content.lines().map(|s| s.to_string()).collect())
}

fn read_lines_utf8(path: &Path) -> Result<Vec<String>> {
    ensure_exists(path)?;
    let bytes = std::fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);
    Ok(content.lines().map(|s| s.to_string()).collect())
}

/// Split a `::` line and check the field count
fn split_fields(line: &str, expected: usize, line_no: usize) -> Result<Vec<&str>> {
    let fields: Vec<&str> = line.split("::").collect();
    if fields.len() != expected {
        return Err(DataLoadError::FieldCountMismatch {
            expected,
            found: fields.len(),
            line: line_no,
        });
    }
    Ok(fields)
}

fn parse_number<T>(value: &str, file: &str, line: usize, field: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Invalid {}: {}", field, e),
    })
}

/// Parse a rating on the 1-5 scale. Accepts "4" as well as "4.0".
fn parse_score(value: &str, file: &str, line: usize) -> Result<Score> {
    let raw: f32 = parse_number(value, file, line, "rating")?;
    if !(1.0..=5.0).contains(&raw) || raw.fract() != 0.0 {
        return Err(DataLoadError::InvalidValue {
            field: "rating".to_string(),
            value: value.to_string(),
        });
    }
    Ok(raw as Score)
}

/// Run `parse` on every non-empty line, skipping the ones that fail
fn parse_lines<T>(
    lines: &[String],
    file: &str,
    mut parse: impl FnMut(&str, usize) -> Result<T>,
) -> Vec<T> {
    let mut records = Vec::with_capacity(lines.len());
    let mut skipped = 0usize;

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim_end_matches(['\r', '\n']);
        if line_trimmed.trim().is_empty() {
            continue;
        }

        match parse(line_trimmed, line_no) {
            Ok(record) => records.push(record),
            Err(e) => {
                skipped += 1;
                warn!("Skipping line {} of {}: {}", line_no, file, e);
            }
        }
    }

    if skipped > 0 {
        warn!("Skipped {} malformed lines in {}", skipped, file);
    }
    records
}

// =============================================================================
// MovieLens
// =============================================================================

/// Parse the users.dat file
///
/// Format: userId::gender::age::occupation::zipcode
pub fn parse_users(path: &Path) -> Result<Vec<UserRow>> {
    let lines = read_lines_latin1(path)?;
    let file = file_label(path);

    Ok(parse_lines(&lines, &file, |line, line_no| {
        let fields = split_fields(line, 5, line_no)?;
        let age_code: u8 = parse_number(fields[2], &file, line_no, "age")?;

        Ok(UserRow {
            id: parse_number(fields[0], &file, line_no, "userId")?,
            gender: Gender::from_code(fields[1].trim())?,
            age: AgeGroup::from_code(age_code)?,
            occupation: parse_number(fields[3], &file, line_no, "occupation")?,
            zipcode: fields[4].trim().to_string(),
        })
    }))
}

/// Parse the movies.dat file
///
/// Format: movieId::title::genres
///
/// Genres are pipe-separated: "Animation|Children's|Comedy"
pub fn parse_movies(path: &Path) -> Result<Vec<MovieRow>> {
    let lines = read_lines_latin1(path)?;
    let file = file_label(path);

    Ok(parse_lines(&lines, &file, |line, line_no| {
        let fields = split_fields(line, 3, line_no)?;
        let title = fields[1].trim();
        if title.is_empty() {
            return Err(DataLoadError::ParseError {
                file: file.clone(),
                line: line_no,
                reason: "Missing title".to_string(),
            });
        }

        Ok(MovieRow {
            id: parse_number(fields[0], &file, line_no, "movieId")?,
            title: title.to_string(),
            genres: fields[2]
                .split('|')
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(String::from)
                .collect(),
        })
    }))
}

/// Parse the ratings.dat file
///
/// Format: userId::movieId::rating::timestamp
pub fn parse_ratings(path: &Path) -> Result<Vec<RatingRow>> {
    let lines = read_lines_latin1(path)?;
    let file = file_label(path);

    Ok(parse_lines(&lines, &file, |line, line_no| {
        let fields = split_fields(line, 4, line_no)?;

        Ok(RatingRow {
            user_id: parse_number(fields[0], &file, line_no, "userId")?,
            movie_id: parse_number(fields[1], &file, line_no, "movieId")?,
            rating: parse_score(fields[2], &file, line_no)?,
            timestamp: parse_number(fields[3], &file, line_no, "timestamp")?,
        })
    }))
}

// =============================================================================
// Amazon (tab separated with typed headers)
// =============================================================================

/// Drop the `:type` annotation from a header name ("user_id:token" -> "user_id")
pub fn strip_type_suffix(column: &str) -> &str {
    column.split(':').next().unwrap_or(column).trim()
}

/// A tab-separated file with a typed header row
struct TsvTable {
    file: String,
    columns: Vec<String>,
    /// (1-based line number, fields)
    rows: Vec<(usize, Vec<String>)>,
}

impl TsvTable {
    fn read(path: &Path) -> Result<Self> {
        let lines = read_lines_utf8(path)?;
        let file = file_label(path);

        let mut lines = lines.into_iter().enumerate();
        let columns: Vec<String> = lines
            .next()
            .map(|(_, header)| {
                header
                    .split('\t')
                    .map(|c| strip_type_suffix(c).to_string())
                    .collect()
            })
            .ok_or_else(|| DataLoadError::ParseError {
                file: file.clone(),
                line: 1,
                reason: "Missing header row".to_string(),
            })?;

        let rows = lines
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                let fields = line
                    .trim_end_matches('\r')
                    .split('\t')
                    .map(String::from)
                    .collect();
                (idx + 1, fields)
            })
            .collect();

        Ok(Self {
            file,
            columns,
            rows,
        })
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    fn require_column(&self, name: &str) -> Result<usize> {
        self.column(name).ok_or_else(|| DataLoadError::ParseError {
            file: self.file.clone(),
            line: 1,
            reason: format!("Missing column {}", name),
        })
    }

    /// Check the width of a row; short rows are allowed and read as blanks
    fn check_width(&self, fields: &[String], line: usize) -> Result<()> {
        if fields.len() > self.columns.len() {
            return Err(DataLoadError::FieldCountMismatch {
                expected: self.columns.len(),
                found: fields.len(),
                line,
            });
        }
        Ok(())
    }
}

fn field(fields: &[String], column: Option<usize>) -> &str {
    column
        .and_then(|idx| fields.get(idx))
        .map(|s| s.trim())
        .unwrap_or("")
}

/// Parse the Amazon item catalog.
///
/// Records that fail validation are skipped. Missing optional columns read
/// as empty strings.
pub fn parse_music_items(path: &Path) -> Result<Vec<MusicItem>> {
    let table = TsvTable::read(path)?;
    let id_col = Some(table.require_column("item_id")?);
    let title_col = table.column("title");
    let categories_col = table.column("categories");
    let brand_col = table.column("brand");
    let sales_type_col = table.column("sales_type");

    let mut items = Vec::with_capacity(table.rows.len());
    let mut skipped = 0usize;
    for (line_no, fields) in &table.rows {
        let item = table.check_width(fields, *line_no).and_then(|_| {
            MusicItem::new(
                field(fields, id_col),
                field(fields, title_col),
                field(fields, categories_col),
                field(fields, brand_col),
                field(fields, sales_type_col),
            )
        });

        match item {
            Ok(item) => items.push(item),
            Err(e) => {
                skipped += 1;
                warn!("Skipping item at line {} of {}: {}", line_no, table.file, e);
            }
        }
    }

    if skipped > 0 {
        warn!("Skipped {} invalid items in {}", skipped, table.file);
    }
    Ok(items)
}

/// Parse the Amazon interaction file.
///
/// A missing `timestamp` column means every observation has timestamp 0.
pub fn parse_interactions(path: &Path) -> Result<Vec<Interaction>> {
    let table = TsvTable::read(path)?;
    let user_col = Some(table.require_column("user_id")?);
    let item_col = Some(table.require_column("item_id")?);
    let rating_col = Some(table.require_column("rating")?);
    let timestamp_col = table.column("timestamp");

    let mut interactions = Vec::with_capacity(table.rows.len());
    let mut skipped = 0usize;
    for (line_no, fields) in &table.rows {
        let parsed = table.check_width(fields, *line_no).and_then(|_| {
            let user_id = field(fields, user_col);
            if user_id.is_empty() {
                return Err(DataLoadError::ParseError {
                    file: table.file.clone(),
                    line: *line_no,
                    reason: "Missing user_id".to_string(),
                });
            }

            let timestamp = match field(fields, timestamp_col) {
                "" => 0,
                raw => parse_number::<f64>(raw, &table.file, *line_no, "timestamp")? as i64,
            };

            Ok(Interaction {
                user_id: user_id.to_string(),
                item_id: field(fields, item_col).to_string(),
                rating: parse_score(field(fields, rating_col), &table.file, *line_no)?,
                timestamp,
            })
        });

        match parsed {
            Ok(interaction) => interactions.push(interaction),
            Err(e) => {
                skipped += 1;
                warn!("Skipping interaction at line {} of {}: {}", line_no, table.file, e);
            }
        }
    }

    if skipped > 0 {
        warn!("Skipped {} malformed interactions in {}", skipped, table.file);
    }
    Ok(interactions)
}
