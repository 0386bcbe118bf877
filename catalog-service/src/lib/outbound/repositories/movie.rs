use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::options::FindOptions;
use mongodb::Collection;
use mongodb::Database;
use serde::Deserialize;

use crate::movie::errors::MovieError;
use crate::movie::models::Director;
use crate::movie::models::Genre;
use crate::movie::models::Movie;
use crate::movie::models::MovieId;
use crate::movie::models::MovieTitle;
use crate::movie::models::TitleSearch;
use crate::movie::ports::MovieRepository;

const COLLECTION: &str = "movies";

/// Catalog reads over the `movies` collection.
///
/// The API never writes movies; the collection is seeded out of band.
pub struct MongoMovieRepository {
    collection: Collection<MovieDocument>,
}

#[derive(Debug, Deserialize)]
struct MovieDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    description: String,
    genre: GenreDocument,
    director: DirectorDocument,
    image_url: Option<String>,
    featured: bool,
}

#[derive(Debug, Deserialize)]
struct GenreDocument {
    name: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct DirectorDocument {
    name: String,
    bio: String,
    birth_year: Option<i32>,
    death_year: Option<i32>,
}

impl MovieDocument {
    fn try_into_movie(self) -> Result<Movie, MovieError> {
        Ok(Movie {
            id: MovieId(self.id),
            title: MovieTitle::new(self.title)?,
            description: self.description,
            genre: Genre {
                name: self.genre.name,
                description: self.genre.description,
            },
            director: Director {
                name: self.director.name,
                bio: self.director.bio,
                birth_year: self.director.birth_year,
                death_year: self.director.death_year,
            },
            image_url: self.image_url,
            featured: self.featured,
        })
    }
}

/// Escape regex metacharacters so the query is a plain substring match.
fn escape_regex(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if r"\.+*?()|[]{}^$".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl MongoMovieRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(COLLECTION),
        }
    }

    async fn collect_movies(
        &self,
        filter: mongodb::bson::Document,
        options: Option<FindOptions>,
    ) -> Result<Vec<Movie>, MovieError> {
        let cursor = self
            .collection
            .find(filter, options)
            .await
            .map_err(|e| MovieError::DatabaseError(e.to_string()))?;

        let documents: Vec<MovieDocument> = cursor
            .try_collect()
            .await
            .map_err(|e| MovieError::DatabaseError(e.to_string()))?;

        documents
            .into_iter()
            .map(MovieDocument::try_into_movie)
            .collect()
    }
}

#[async_trait]
impl MovieRepository for MongoMovieRepository {
    async fn find_all(&self) -> Result<Vec<Movie>, MovieError> {
        let options = FindOptions::builder().sort(doc! { "title": 1 }).build();
        self.collect_movies(doc! {}, Some(options)).await
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>, MovieError> {
        let document = self
            .collection
            .find_one(doc! { "title": title }, None)
            .await
            .map_err(|e| MovieError::DatabaseError(e.to_string()))?;

        document.map(MovieDocument::try_into_movie).transpose()
    }

    async fn find_by_id(&self, id: &MovieId) -> Result<Option<Movie>, MovieError> {
        let document = self
            .collection
            .find_one(doc! { "_id": id.0 }, None)
            .await
            .map_err(|e| MovieError::DatabaseError(e.to_string()))?;

        document.map(MovieDocument::try_into_movie).transpose()
    }

    async fn find_by_ids(&self, ids: &[MovieId]) -> Result<Vec<Movie>, MovieError> {
        let object_ids: Vec<ObjectId> = ids.iter().map(|id| id.0).collect();
        let options = FindOptions::builder().sort(doc! { "title": 1 }).build();

        self.collect_movies(doc! { "_id": { "$in": object_ids } }, Some(options))
            .await
    }

    async fn search_by_title(&self, search: &TitleSearch) -> Result<Vec<Movie>, MovieError> {
        // Substring containment, nothing smarter
        let filter = doc! {
            "title": { "$regex": escape_regex(&search.query), "$options": "i" }
        };

        let options = FindOptions::builder()
            .sort(doc! { "title": 1 })
            .limit(search.limit)
            .skip(search.offset)
            .build();

        self.collect_movies(filter, Some(options)).await
    }

    async fn find_genre(&self, name: &str) -> Result<Option<Genre>, MovieError> {
        let document = self
            .collection
            .find_one(doc! { "genre.name": name }, None)
            .await
            .map_err(|e| MovieError::DatabaseError(e.to_string()))?;

        Ok(document
            .map(MovieDocument::try_into_movie)
            .transpose()?
            .map(|movie| movie.genre))
    }

    async fn find_director(&self, name: &str) -> Result<Option<Director>, MovieError> {
        let document = self
            .collection
            .find_one(doc! { "director.name": name }, None)
            .await
            .map_err(|e| MovieError::DatabaseError(e.to_string()))?;

        Ok(document
            .map(MovieDocument::try_into_movie)
            .transpose()?
            .map(|movie| movie.director))
    }
}
