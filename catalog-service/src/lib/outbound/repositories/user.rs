use async_trait::async_trait;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::error::ErrorKind;
use mongodb::error::WriteFailure;
use mongodb::options::FindOneAndUpdateOptions;
use mongodb::options::IndexOptions;
use mongodb::options::ReturnDocument;
use mongodb::Collection;
use mongodb::Database;
use mongodb::IndexModel;
use serde::Deserialize;
use serde::Serialize;

use crate::movie::models::MovieId;
use crate::user::errors::UserError;
use crate::user::models::EmailAddress;
use crate::user::models::User;
use crate::user::models::Username;
use crate::user::ports::UserRepository;

const COLLECTION: &str = "users";

pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

/// Wire form of the user aggregate in the `users` collection.
#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    username: String,
    email: String,
    password_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    birthday: Option<String>,
    favorite_movie_ids: Vec<ObjectId>,
    is_admin: bool,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    created_at: DateTime<Utc>,
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        Self {
            id: None,
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            password_hash: user.password_hash.clone(),
            birthday: user.birthday.map(|d| d.to_string()),
            favorite_movie_ids: user.favorite_movie_ids.iter().map(|id| id.0).collect(),
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

impl UserDocument {
    fn try_into_user(self) -> Result<User, UserError> {
        let birthday = self
            .birthday
            .map(|d| {
                NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                    .map_err(|e| UserError::DatabaseError(format!("Invalid birthday field: {}", e)))
            })
            .transpose()?;

        Ok(User {
            username: Username::new(self.username)?,
            email: EmailAddress::new(self.email)?,
            password_hash: self.password_hash,
            birthday,
            favorite_movie_ids: self.favorite_movie_ids.into_iter().map(MovieId).collect(),
            is_admin: self.is_admin,
            created_at: self.created_at,
        })
    }
}

impl MongoUserRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(COLLECTION),
        }
    }

    /// Create the unique indexes the duplicate-key mapping relies on.
    pub async fn ensure_indexes(&self) -> Result<(), UserError> {
        for field in ["username", "email"] {
            let index = IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name(format!("{}_unique", field))
                        .build(),
                )
                .build();

            self.collection
                .create_index(index, None)
                .await
                .map_err(|e| UserError::DatabaseError(e.to_string()))?;
        }

        Ok(())
    }

    fn map_write_error(e: mongodb::error::Error, user: &User) -> UserError {
        if let ErrorKind::Write(WriteFailure::WriteError(ref write_error)) = *e.kind {
            if write_error.code == 11000 {
                if write_error.message.contains("username") {
                    return UserError::UsernameAlreadyExists(user.username.as_str().to_string());
                }
                if write_error.message.contains("email") {
                    return UserError::EmailAlreadyExists(user.email.as_str().to_string());
                }
            }
        }
        UserError::DatabaseError(e.to_string())
    }

    async fn update_favorites(
        &self,
        username: &Username,
        update: mongodb::bson::Document,
    ) -> Result<User, UserError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let document = self
            .collection
            .find_one_and_update(doc! { "username": username.as_str() }, update, options)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?
            .ok_or(UserError::NotFound(username.to_string()))?;

        document.try_into_user()
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        self.collection
            .insert_one(UserDocument::from(&user), None)
            .await
            .map_err(|e| Self::map_write_error(e, &user))?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let document = self
            .collection
            .find_one(doc! { "username": username.as_str() }, None)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        document.map(UserDocument::try_into_user).transpose()
    }

    async fn update(&self, username: &Username, user: User) -> Result<User, UserError> {
        let result = self
            .collection
            .replace_one(
                doc! { "username": username.as_str() },
                UserDocument::from(&user),
                None,
            )
            .await
            .map_err(|e| Self::map_write_error(e, &user))?;

        if result.matched_count == 0 {
            return Err(UserError::NotFound(username.to_string()));
        }

        Ok(user)
    }

    async fn delete(&self, username: &Username) -> Result<(), UserError> {
        let result = self
            .collection
            .delete_one(doc! { "username": username.as_str() }, None)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        if result.deleted_count == 0 {
            return Err(UserError::NotFound(username.to_string()));
        }

        Ok(())
    }

    async fn add_favorite(
        &self,
        username: &Username,
        movie_id: &MovieId,
    ) -> Result<User, UserError> {
        self.update_favorites(
            username,
            doc! { "$addToSet": { "favorite_movie_ids": movie_id.0 } },
        )
        .await
    }

    async fn remove_favorite(
        &self,
        username: &Username,
        movie_id: &MovieId,
    ) -> Result<User, UserError> {
        self.update_favorites(
            username,
            doc! { "$pull": { "favorite_movie_ids": movie_id.0 } },
        )
        .await
    }
}
