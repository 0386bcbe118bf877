use async_trait::async_trait;

use crate::movie::errors::MovieError;
use crate::movie::models::Director;
use crate::movie::models::Genre;
use crate::movie::models::Movie;
use crate::movie::models::MovieId;
use crate::movie::models::TitleSearch;

/// Port for movie catalog service operations.
#[async_trait]
pub trait MovieServicePort: Send + Sync + 'static {
    /// Retrieve the whole catalog.
    async fn list_movies(&self) -> Result<Vec<Movie>, MovieError>;

    /// Retrieve a movie by exact title.
    ///
    /// # Errors
    /// * `NotFound` - No movie with this title
    async fn get_movie_by_title(&self, title: &str) -> Result<Movie, MovieError>;

    /// Retrieve a genre by name from the embedded documents.
    ///
    /// # Errors
    /// * `GenreNotFound` - No movie carries this genre
    async fn get_genre(&self, name: &str) -> Result<Genre, MovieError>;

    /// Retrieve a director by name from the embedded documents.
    ///
    /// # Errors
    /// * `DirectorNotFound` - No movie carries this director
    async fn get_director(&self, name: &str) -> Result<Director, MovieError>;

    /// Case-insensitive substring search over titles.
    async fn search_movies(&self, search: TitleSearch) -> Result<Vec<Movie>, MovieError>;

    /// Same search, projected down to the matching titles.
    async fn search_titles(&self, search: TitleSearch) -> Result<Vec<String>, MovieError>;
}

/// Persistence operations for the movie catalog.
#[async_trait]
pub trait MovieRepository: Send + Sync + 'static {
    /// Retrieve all movies.
    async fn find_all(&self) -> Result<Vec<Movie>, MovieError>;

    /// Retrieve a movie by exact title (None if not found).
    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>, MovieError>;

    /// Retrieve a movie by identifier (None if not found).
    async fn find_by_id(&self, id: &MovieId) -> Result<Option<Movie>, MovieError>;

    /// Retrieve multiple movies by identifiers (missing IDs are skipped).
    async fn find_by_ids(&self, ids: &[MovieId]) -> Result<Vec<Movie>, MovieError>;

    /// Case-insensitive substring match on title with optional paging.
    async fn search_by_title(&self, search: &TitleSearch) -> Result<Vec<Movie>, MovieError>;

    /// Retrieve an embedded genre by exact name (None if not found).
    async fn find_genre(&self, name: &str) -> Result<Option<Genre>, MovieError>;

    /// Retrieve an embedded director by exact name (None if not found).
    async fn find_director(&self, name: &str) -> Result<Option<Director>, MovieError>;
}
