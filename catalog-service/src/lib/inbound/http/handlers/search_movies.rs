use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::MovieData;
use crate::inbound::http::router::AppState;
use crate::movie::models::TitleSearch;

/// Query parameters shared by the search variants.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
    limit: Option<i64>,
    offset: Option<u64>,
}

impl SearchParams {
    fn try_into_search(self) -> Result<TitleSearch, ApiError> {
        let query = self
            .q
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| {
                ApiError::UnprocessableEntity("Missing query parameter 'q'".to_string())
            })?;

        if self.limit.is_some_and(|limit| limit < 0) {
            return Err(ApiError::UnprocessableEntity(
                "Query parameter 'limit' must not be negative".to_string(),
            ));
        }

        Ok(TitleSearch {
            query,
            limit: self.limit,
            offset: self.offset,
        })
    }
}

/// `GET /api/movies/search?q=&limit=&offset=`
///
/// Case-insensitive substring match on titles. No ranking.
pub async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<ApiSuccess<Vec<MovieData>>, ApiError> {
    let movies = state
        .movie_service
        .search_movies(params.try_into_search()?)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        movies.iter().map(MovieData::from).collect(),
    ))
}

/// `GET /api/movies/titles?q=&limit=&offset=`
///
/// Same substring match, projected down to the titles.
pub async fn search_titles(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<ApiSuccess<Vec<String>>, ApiError> {
    let titles = state
        .movie_service
        .search_titles(params.try_into_search()?)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(StatusCode::OK, titles))
}
