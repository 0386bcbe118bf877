use std::fmt;

use mongodb::bson::oid::ObjectId;

use crate::movie::errors::MovieIdError;
use crate::movie::errors::MovieTitleError;

/// Movie catalog entry.
///
/// Genre and director are embedded rather than referenced; lookups by
/// genre or director name scan the embedded documents.
#[derive(Debug, Clone)]
pub struct Movie {
    pub id: MovieId,
    pub title: MovieTitle,
    pub description: String,
    pub genre: Genre,
    pub director: Director,
    pub image_url: Option<String>,
    pub featured: bool,
}

/// Movie unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MovieId(pub ObjectId);

impl MovieId {
    /// Generate a new random movie ID.
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// Parse a movie ID from its hex string form.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid ObjectId
    pub fn from_string(s: &str) -> Result<Self, MovieIdError> {
        ObjectId::parse_str(s)
            .map(MovieId)
            .map_err(|e| MovieIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for MovieId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.to_hex().fmt(f)
    }
}

/// Movie title value type
///
/// Non-empty after trimming; uniqueness is enforced by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieTitle(String);

impl MovieTitle {
    pub fn new(title: String) -> Result<Self, MovieTitleError> {
        if title.trim().is_empty() {
            Err(MovieTitleError::Empty)
        } else {
            Ok(Self(title))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MovieTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Genre embedded in a movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    pub name: String,
    pub description: String,
}

/// Director embedded in a movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Director {
    pub name: String,
    pub bio: String,
    pub birth_year: Option<i32>,
    pub death_year: Option<i32>,
}

/// Substring search over movie titles.
///
/// Matching is case-insensitive; limit and offset only shape the page.
#[derive(Debug, Clone, Default)]
pub struct TitleSearch {
    pub query: String,
    pub limit: Option<i64>,
    pub offset: Option<u64>,
}
