use std::sync::Arc;

use async_trait::async_trait;

use crate::movie::errors::MovieError;
use crate::movie::models::Director;
use crate::movie::models::Genre;
use crate::movie::models::Movie;
use crate::movie::models::TitleSearch;
use crate::movie::ports::MovieRepository;
use crate::movie::ports::MovieServicePort;

/// Domain service implementation for catalog lookups.
///
/// The catalog is read-only through the API; records are seeded out of
/// band, so every operation here maps to a single repository read.
pub struct MovieService<MR>
where
    MR: MovieRepository,
{
    repository: Arc<MR>,
}

impl<MR> MovieService<MR>
where
    MR: MovieRepository,
{
    pub fn new(repository: Arc<MR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<MR> MovieServicePort for MovieService<MR>
where
    MR: MovieRepository,
{
    async fn list_movies(&self) -> Result<Vec<Movie>, MovieError> {
        self.repository.find_all().await
    }

    async fn get_movie_by_title(&self, title: &str) -> Result<Movie, MovieError> {
        self.repository
            .find_by_title(title)
            .await?
            .ok_or(MovieError::NotFound(title.to_string()))
    }

    async fn get_genre(&self, name: &str) -> Result<Genre, MovieError> {
        self.repository
            .find_genre(name)
            .await?
            .ok_or(MovieError::GenreNotFound(name.to_string()))
    }

    async fn get_director(&self, name: &str) -> Result<Director, MovieError> {
        self.repository
            .find_director(name)
            .await?
            .ok_or(MovieError::DirectorNotFound(name.to_string()))
    }

    async fn search_movies(&self, search: TitleSearch) -> Result<Vec<Movie>, MovieError> {
        self.repository.search_by_title(&search).await
    }

    async fn search_titles(&self, search: TitleSearch) -> Result<Vec<String>, MovieError> {
        // Same substring query as search_movies, projected to titles
        let movies = self.repository.search_by_title(&search).await?;
        Ok(movies
            .into_iter()
            .map(|movie| movie.title.as_str().to_string())
            .collect())
    }
}
