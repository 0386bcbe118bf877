use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::movie::models::Movie;
use crate::movie::models::MovieId;
use crate::movie::ports::MovieRepository;
use crate::user::errors::UserError;
use crate::user::models::RegisterUserCommand;
use crate::user::models::UpdateUserCommand;
use crate::user::models::User;
use crate::user::models::Username;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Owns credential verification and the registration/update password
/// hashing; the movie repository is only consulted to validate and
/// resolve favorite-movie ids.
pub struct UserService<UR, MR>
where
    UR: UserRepository,
    MR: MovieRepository,
{
    repository: Arc<UR>,
    movie_repository: Arc<MR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR, MR> UserService<UR, MR>
where
    UR: UserRepository,
    MR: MovieRepository,
{
    pub fn new(repository: Arc<UR>, movie_repository: Arc<MR>) -> Self {
        Self {
            repository,
            movie_repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    fn hash_password(&self, password: &str) -> Result<String, UserError> {
        self.password_hasher
            .hash(password)
            .map_err(|e| UserError::Unknown(format!("Password hashing failed: {}", e)))
    }
}

#[async_trait]
impl<UR, MR> UserServicePort for UserService<UR, MR>
where
    UR: UserRepository,
    MR: MovieRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        let password_hash = self.hash_password(&command.password)?;

        let user = User {
            username: command.username,
            email: command.email,
            password_hash,
            birthday: command.birthday,
            favorite_movie_ids: HashSet::new(),
            is_admin: false,
            created_at: Utc::now(),
        };

        self.repository.create(user).await
    }

    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, UserError> {
        // A username that cannot exist fails the same way as one that
        // does not exist
        let username = match Username::new(username.to_string()) {
            Ok(username) => username,
            Err(_) => return Err(UserError::InvalidCredentials),
        };

        if password.is_empty() {
            return Err(UserError::InvalidCredentials);
        }

        let user = self
            .repository
            .find_by_username(&username)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        let matches = self
            .password_hasher
            .verify(password, &user.password_hash)
            .map_err(|e| UserError::Unknown(format!("Password verification failed: {}", e)))?;

        if !matches {
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }

    async fn get_user(&self, username: &Username) -> Result<User, UserError> {
        self.repository
            .find_by_username(username)
            .await?
            .ok_or(UserError::NotFound(username.to_string()))
    }

    async fn update_user(
        &self,
        username: &Username,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let mut user = self
            .repository
            .find_by_username(username)
            .await?
            .ok_or(UserError::NotFound(username.to_string()))?;

        if let Some(new_username) = command.username {
            user.username = new_username;
        }

        if let Some(new_email) = command.email {
            user.email = new_email;
        }

        if let Some(new_password) = command.password {
            user.password_hash = self.hash_password(&new_password)?;
        }

        if let Some(new_birthday) = command.birthday {
            user.birthday = Some(new_birthday);
        }

        self.repository.update(username, user).await
    }

    async fn delete_user(&self, username: &Username) -> Result<(), UserError> {
        self.repository.delete(username).await
    }

    async fn list_favorites(&self, username: &Username) -> Result<Vec<Movie>, UserError> {
        let user = self
            .repository
            .find_by_username(username)
            .await?
            .ok_or(UserError::NotFound(username.to_string()))?;

        let ids: Vec<MovieId> = user.favorite_movie_ids.into_iter().collect();
        let movies = self.movie_repository.find_by_ids(&ids).await?;

        Ok(movies)
    }

    async fn add_favorite(
        &self,
        username: &Username,
        movie_id: &MovieId,
    ) -> Result<User, UserError> {
        // Only catalog movies can be favorited
        self.movie_repository
            .find_by_id(movie_id)
            .await?
            .ok_or(UserError::MovieNotFound(movie_id.to_string()))?;

        self.repository.add_favorite(username, movie_id).await
    }

    async fn remove_favorite(
        &self,
        username: &Username,
        movie_id: &MovieId,
    ) -> Result<User, UserError> {
        self.repository.remove_favorite(username, movie_id).await
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::movie::errors::MovieError;
    use crate::movie::models::Director;
    use crate::movie::models::Genre;
    use crate::movie::models::MovieTitle;
    use crate::movie::models::TitleSearch;
    use crate::user::models::EmailAddress;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;
            async fn update(&self, username: &Username, user: User) -> Result<User, UserError>;
            async fn delete(&self, username: &Username) -> Result<(), UserError>;
            async fn add_favorite(&self, username: &Username, movie_id: &MovieId) -> Result<User, UserError>;
            async fn remove_favorite(&self, username: &Username, movie_id: &MovieId) -> Result<User, UserError>;
        }
    }

    mock! {
        pub TestMovieRepository {}

        #[async_trait]
        impl MovieRepository for TestMovieRepository {
            async fn find_all(&self) -> Result<Vec<Movie>, MovieError>;
            async fn find_by_title(&self, title: &str) -> Result<Option<Movie>, MovieError>;
            async fn find_by_id(&self, id: &MovieId) -> Result<Option<Movie>, MovieError>;
            async fn find_by_ids(&self, ids: &[MovieId]) -> Result<Vec<Movie>, MovieError>;
            async fn search_by_title(&self, search: &TitleSearch) -> Result<Vec<Movie>, MovieError>;
            async fn find_genre(&self, name: &str) -> Result<Option<Genre>, MovieError>;
            async fn find_director(&self, name: &str) -> Result<Option<Director>, MovieError>;
        }
    }

    fn sample_command() -> RegisterUserCommand {
        RegisterUserCommand {
            username: Username::new("alice01".to_string()).unwrap(),
            email: EmailAddress::new("alice@x.com".to_string()).unwrap(),
            password: "Secret123".to_string(),
            birthday: None,
        }
    }

    fn stored_user(password_hash: String) -> User {
        User {
            username: Username::new("alice01".to_string()).unwrap(),
            email: EmailAddress::new("alice@x.com".to_string()).unwrap(),
            password_hash,
            birthday: None,
            favorite_movie_ids: HashSet::new(),
            is_admin: false,
            created_at: Utc::now(),
        }
    }

    fn sample_movie(id: MovieId) -> Movie {
        Movie {
            id,
            title: MovieTitle::new("Arrival".to_string()).unwrap(),
            description: "First contact".to_string(),
            genre: Genre {
                name: "Sci-Fi".to_string(),
                description: "Science fiction".to_string(),
            },
            director: Director {
                name: "Denis Villeneuve".to_string(),
                bio: "Canadian filmmaker".to_string(),
                birth_year: Some(1967),
                death_year: None,
            },
            image_url: None,
            featured: true,
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password_and_clears_admin_bit() {
        let mut repository = MockTestUserRepository::new();
        let movie_repository = MockTestMovieRepository::new();

        repository
            .expect_create()
            .withf(|user| {
                user.username.as_str() == "alice01"
                    && user.password_hash.starts_with("$argon2")
                    && user.password_hash != "Secret123"
                    && !user.is_admin
                    && user.favorite_movie_ids.is_empty()
            })
            .times(1)
            .returning(Ok);

        let service = UserService::new(Arc::new(repository), Arc::new(movie_repository));

        let user = service.register(sample_command()).await.unwrap();
        assert_eq!(user.username.as_str(), "alice01");
    }

    #[tokio::test]
    async fn test_verify_credentials_success() {
        let hash = auth::PasswordHasher::new().hash("Secret123").unwrap();

        let mut repository = MockTestUserRepository::new();
        let movie_repository = MockTestMovieRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(stored_user(hash.clone()))));

        let service = UserService::new(Arc::new(repository), Arc::new(movie_repository));

        let user = service.verify_credentials("alice01", "Secret123").await;
        assert!(user.is_ok());
    }

    #[tokio::test]
    async fn test_verify_credentials_wrong_password_and_unknown_user_match() {
        let hash = auth::PasswordHasher::new().hash("Secret123").unwrap();

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .withf(|username| username.as_str() == "alice01")
            .returning(move |_| Ok(Some(stored_user(hash.clone()))));
        repository
            .expect_find_by_username()
            .returning(|_| Ok(None));

        let service =
            UserService::new(Arc::new(repository), Arc::new(MockTestMovieRepository::new()));

        let wrong_password = service.verify_credentials("alice01", "WrongPass1").await;
        let unknown_user = service.verify_credentials("nobody99", "Secret123").await;

        assert!(matches!(wrong_password, Err(UserError::InvalidCredentials)));
        assert!(matches!(unknown_user, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_verify_credentials_rejects_malformed_username() {
        let repository = MockTestUserRepository::new();
        let service =
            UserService::new(Arc::new(repository), Arc::new(MockTestMovieRepository::new()));

        // Never reaches the repository
        let result = service.verify_credentials("a!", "Secret123").await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_update_user_rehashes_password() {
        let original_hash = auth::PasswordHasher::new().hash("Secret123").unwrap();

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(stored_user(original_hash.clone()))));
        repository
            .expect_update()
            .withf(|_, user| {
                user.password_hash.starts_with("$argon2")
                    && auth::PasswordHasher::new()
                        .verify("NewSecret456", &user.password_hash)
                        .unwrap()
            })
            .times(1)
            .returning(|_, user| Ok(user));

        let service =
            UserService::new(Arc::new(repository), Arc::new(MockTestMovieRepository::new()));

        let username = Username::new("alice01".to_string()).unwrap();
        let command = UpdateUserCommand {
            username: None,
            email: None,
            password: Some("NewSecret456".to_string()),
            birthday: None,
        };

        let result = service.update_user(&username, command).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_add_favorite_unknown_movie() {
        let mut movie_repository = MockTestMovieRepository::new();
        movie_repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let repository = MockTestUserRepository::new();
        let service = UserService::new(Arc::new(repository), Arc::new(movie_repository));

        let username = Username::new("alice01".to_string()).unwrap();
        let movie_id = MovieId::new();

        let result = service.add_favorite(&username, &movie_id).await;
        assert!(matches!(result, Err(UserError::MovieNotFound(_))));
    }

    #[tokio::test]
    async fn test_add_favorite_known_movie() {
        let movie_id = MovieId::new();

        let mut movie_repository = MockTestMovieRepository::new();
        movie_repository
            .expect_find_by_id()
            .times(1)
            .returning(move |id| Ok(Some(sample_movie(*id))));

        let hash = auth::PasswordHasher::new().hash("Secret123").unwrap();
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_add_favorite()
            .times(1)
            .returning(move |_, id| {
                let mut user = stored_user(hash.clone());
                user.favorite_movie_ids.insert(*id);
                Ok(user)
            });

        let service = UserService::new(Arc::new(repository), Arc::new(movie_repository));

        let username = Username::new("alice01".to_string()).unwrap();
        let user = service.add_favorite(&username, &movie_id).await.unwrap();
        assert!(user.favorite_movie_ids.contains(&movie_id));
    }
}
