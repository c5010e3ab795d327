// ============================
// authgate-backend-lib/src/repositories.rs
// ============================
//! Repositories over the `users` collection.
use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::auth::{LoadUserByEmail, UpdateAccessToken, User};
use crate::error::AppError;
use crate::storage::{ConnectionManager, MongoDriver};

/// Collection name for users
pub const USER_COLLECTION: &str = "users";

/// User document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct UserDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    #[serde(default)]
    pub email: String,

    /// PHC password hash
    #[serde(default)]
    pub password: String,

    /// Last issued access token
    #[serde(rename = "accessToken", default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// [`LoadUserByEmail`] capability backed by MongoDB
#[derive(Clone)]
pub struct LoadUserByEmailRepository {
    store: Arc<ConnectionManager<MongoDriver>>,
}

impl LoadUserByEmailRepository {
    pub fn new(store: Arc<ConnectionManager<MongoDriver>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl LoadUserByEmail for LoadUserByEmailRepository {
    async fn load(&self, email: &str) -> Result<Option<User>, AppError> {
        if email.is_empty() {
            return Err(AppError::MissingParam("email".to_string()));
        }

        let users = self
            .store
            .collection(USER_COLLECTION)
            .await?
            .clone_with_type::<UserDoc>();

        let found = users
            .find_one(doc! { "email": email })
            .projection(doc! { "password": 1 })
            .await
            .map_err(|e| AppError::Database(format!("Find failed: {e}")))?;

        let Some(doc) = found else {
            return Ok(None);
        };
        let id = doc
            .id
            .ok_or_else(|| AppError::Database("user document without _id".to_string()))?;

        debug!(user_id = %id, "user loaded");
        Ok(Some(User {
            id: id.to_hex(),
            password: doc.password,
        }))
    }
}

/// [`UpdateAccessToken`] capability backed by MongoDB
#[derive(Clone)]
pub struct UpdateAccessTokenRepository {
    store: Arc<ConnectionManager<MongoDriver>>,
}

impl UpdateAccessTokenRepository {
    pub fn new(store: Arc<ConnectionManager<MongoDriver>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UpdateAccessToken for UpdateAccessTokenRepository {
    async fn update(&self, user_id: &str, access_token: &str) -> Result<(), AppError> {
        if user_id.is_empty() {
            return Err(AppError::MissingParam("userId".to_string()));
        }
        if access_token.is_empty() {
            return Err(AppError::MissingParam("accessToken".to_string()));
        }
        let id = ObjectId::parse_str(user_id)
            .map_err(|_| AppError::InvalidParam("userId".to_string()))?;

        let users = self.store.collection(USER_COLLECTION).await?;
        users
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "accessToken": access_token } },
            )
            .await
            .map_err(|e| AppError::Database(format!("Update failed: {e}")))?;

        debug!(user_id = %id, "access token stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoreError;

    fn disconnected_store() -> Arc<ConnectionManager<MongoDriver>> {
        Arc::new(ConnectionManager::new(MongoDriver))
    }

    #[tokio::test]
    async fn test_load_requires_email() {
        let sut = LoadUserByEmailRepository::new(disconnected_store());
        let result = sut.load("").await;
        assert!(matches!(result, Err(AppError::MissingParam(ref p)) if p == "email"));
    }

    #[tokio::test]
    async fn test_load_without_connection_reports_store_error() {
        let sut = LoadUserByEmailRepository::new(disconnected_store());
        let result = sut.load("any_email@mail.com").await;
        assert!(matches!(
            result,
            Err(AppError::Store(StoreError::NeverConnected))
        ));
    }

    #[tokio::test]
    async fn test_update_requires_params() {
        let sut = UpdateAccessTokenRepository::new(disconnected_store());

        let result = sut.update("", "any_token").await;
        assert!(matches!(result, Err(AppError::MissingParam(ref p)) if p == "userId"));

        let result = sut.update("64b7f0c2a1b2c3d4e5f60718", "").await;
        assert!(matches!(result, Err(AppError::MissingParam(ref p)) if p == "accessToken"));

        let result = sut.update("not-an-object-id", "any_token").await;
        assert!(matches!(result, Err(AppError::InvalidParam(ref p)) if p == "userId"));
    }

    #[test]
    fn test_user_doc_field_names() {
        let doc = UserDoc {
            id: None,
            email: "any_email@mail.com".to_string(),
            password: "hashed_password".to_string(),
            access_token: Some("any_token".to_string()),
        };
        let bson = bson::to_document(&doc).unwrap();
        assert!(!bson.contains_key("_id"));
        assert_eq!(bson.get_str("accessToken").unwrap(), "any_token");
    }
}
