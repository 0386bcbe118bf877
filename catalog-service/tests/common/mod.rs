use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use catalog_service::domain::movie::service::MovieService;
use catalog_service::domain::user::service::UserService;
use catalog_service::inbound::http::router::create_router;
use catalog_service::movie::errors::MovieError;
use catalog_service::movie::models::Director;
use catalog_service::movie::models::Genre;
use catalog_service::movie::models::Movie;
use catalog_service::movie::models::MovieId;
use catalog_service::movie::models::MovieTitle;
use catalog_service::movie::models::TitleSearch;
use catalog_service::movie::ports::MovieRepository;
use catalog_service::user::errors::UserError;
use catalog_service::user::models::EmailAddress;
use catalog_service::user::models::User;
use catalog_service::user::models::Username;
use catalog_service::user::ports::UserRepository;
use chrono::Duration;
use chrono::Utc;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server over in-memory repositories
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub user_repo: Arc<InMemoryUserRepository>,
    pub movies: Vec<Movie>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let movies = seed_movies();

        let user_repo = Arc::new(InMemoryUserRepository::default());
        let movie_repo = Arc::new(InMemoryMovieRepository::new(movies.clone()));

        let user_service = Arc::new(UserService::new(
            Arc::clone(&user_repo),
            Arc::clone(&movie_repo),
        ));
        let movie_service = Arc::new(MovieService::new(movie_repo));

        let authenticator = Arc::new(Authenticator::new(TEST_SECRET, Duration::days(7)));

        let router = create_router(user_service, movie_service, authenticator);

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            user_repo,
            movies,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .patch(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register a user through the API
    pub async fn register(&self, username: &str, password: &str) {
        let response = self
            .post("/api/users")
            .json(&serde_json::json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    }

    /// Login through the API and return the bearer token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post("/api/auth/login")
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    /// Seed a user straight into the repository, bypassing the API.
    /// The only way a test can mint an admin.
    pub async fn seed_user(&self, username: &str, password: &str, is_admin: bool) {
        let password_hash = auth::PasswordHasher::new()
            .hash(password)
            .expect("Failed to hash password");

        let user = User {
            username: Username::new(username.to_string()).unwrap(),
            email: EmailAddress::new(format!("{}@example.com", username)).unwrap(),
            password_hash,
            birthday: None,
            favorite_movie_ids: Default::default(),
            is_admin,
            created_at: Utc::now(),
        };

        self.user_repo.create(user).await.expect("Failed to seed user");
    }

    /// Id of a seeded catalog movie, by title
    pub fn movie_id(&self, title: &str) -> String {
        self.movies
            .iter()
            .find(|movie| movie.title.as_str() == title)
            .map(|movie| movie.id.to_string())
            .expect("Unknown seeded movie")
    }
}

fn movie(title: &str, genre: (&str, &str), director: (&str, i32)) -> Movie {
    Movie {
        id: MovieId::new(),
        title: MovieTitle::new(title.to_string()).unwrap(),
        description: format!("{} (test catalog entry)", title),
        genre: Genre {
            name: genre.0.to_string(),
            description: genre.1.to_string(),
        },
        director: Director {
            name: director.0.to_string(),
            bio: format!("{}, filmmaker", director.0),
            birth_year: Some(director.1),
            death_year: None,
        },
        image_url: None,
        featured: false,
    }
}

fn seed_movies() -> Vec<Movie> {
    vec![
        movie(
            "Arrival",
            ("Sci-Fi", "Speculative science fiction"),
            ("Denis Villeneuve", 1967),
        ),
        movie(
            "Alien",
            ("Horror", "Meant to frighten"),
            ("Ridley Scott", 1937),
        ),
        movie(
            "Aliens",
            ("Horror", "Meant to frighten"),
            ("James Cameron", 1954),
        ),
    ]
}

/// In-memory user store mirroring the unique constraints of the real one
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();

        if users.contains_key(user.username.as_str()) {
            return Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.as_str().to_string()));
        }

        users.insert(user.username.as_str().to_string(), user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users.get(username.as_str()).cloned())
    }

    async fn update(&self, username: &Username, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();

        if !users.contains_key(username.as_str()) {
            return Err(UserError::NotFound(username.to_string()));
        }
        if user.username != *username && users.contains_key(user.username.as_str()) {
            return Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ));
        }
        if users
            .values()
            .any(|u| u.username.as_str() != username.as_str() && u.email == user.email)
        {
            return Err(UserError::EmailAlreadyExists(user.email.as_str().to_string()));
        }

        users.remove(username.as_str());
        users.insert(user.username.as_str().to_string(), user.clone());
        Ok(user)
    }

    async fn delete(&self, username: &Username) -> Result<(), UserError> {
        let mut users = self.users.lock().unwrap();
        users
            .remove(username.as_str())
            .map(|_| ())
            .ok_or(UserError::NotFound(username.to_string()))
    }

    async fn add_favorite(
        &self,
        username: &Username,
        movie_id: &MovieId,
    ) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(username.as_str())
            .ok_or(UserError::NotFound(username.to_string()))?;
        user.favorite_movie_ids.insert(*movie_id);
        Ok(user.clone())
    }

    async fn remove_favorite(
        &self,
        username: &Username,
        movie_id: &MovieId,
    ) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(username.as_str())
            .ok_or(UserError::NotFound(username.to_string()))?;
        user.favorite_movie_ids.remove(movie_id);
        Ok(user.clone())
    }
}

/// In-memory read-only catalog
pub struct InMemoryMovieRepository {
    movies: Vec<Movie>,
}

impl InMemoryMovieRepository {
    pub fn new(mut movies: Vec<Movie>) -> Self {
        movies.sort_by(|a, b| a.title.as_str().cmp(b.title.as_str()));
        Self { movies }
    }
}

#[async_trait]
impl MovieRepository for InMemoryMovieRepository {
    async fn find_all(&self) -> Result<Vec<Movie>, MovieError> {
        Ok(self.movies.clone())
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>, MovieError> {
        Ok(self
            .movies
            .iter()
            .find(|movie| movie.title.as_str() == title)
            .cloned())
    }

    async fn find_by_id(&self, id: &MovieId) -> Result<Option<Movie>, MovieError> {
        Ok(self.movies.iter().find(|movie| movie.id == *id).cloned())
    }

    async fn find_by_ids(&self, ids: &[MovieId]) -> Result<Vec<Movie>, MovieError> {
        Ok(self
            .movies
            .iter()
            .filter(|movie| ids.contains(&movie.id))
            .cloned()
            .collect())
    }

    async fn search_by_title(&self, search: &TitleSearch) -> Result<Vec<Movie>, MovieError> {
        let needle = search.query.to_lowercase();
        let offset = search.offset.unwrap_or(0) as usize;
        let limit = search.limit.map(|l| l as usize).unwrap_or(usize::MAX);

        Ok(self
            .movies
            .iter()
            .filter(|movie| movie.title.as_str().to_lowercase().contains(&needle))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_genre(&self, name: &str) -> Result<Option<Genre>, MovieError> {
        Ok(self
            .movies
            .iter()
            .find(|movie| movie.genre.name == name)
            .map(|movie| movie.genre.clone()))
    }

    async fn find_director(&self, name: &str) -> Result<Option<Director>, MovieError> {
        Ok(self
            .movies
            .iter()
            .find(|movie| movie.director.name == name)
            .map(|movie| movie.director.clone()))
    }
}
