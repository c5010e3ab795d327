//! Tests against a live MongoDB. Run with
//! `MONGO_URL=mongodb://localhost:27017 cargo test -- --ignored`.

use authgate_backend_lib::{
    auth::{hash_password, AuthOutcome},
    config::Settings,
    repositories::{UserDoc, USER_COLLECTION},
    storage::{ConnectionManager, MongoDriver},
    AppState,
};
use bson::doc;
use std::sync::Arc;

fn mongo_url() -> String {
    std::env::var("MONGO_URL").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn test_reconnects_when_namespace_requested_after_disconnect() {
    let sut = ConnectionManager::new(MongoDriver);

    sut.connect(&mongo_url(), "authgate-test").await.unwrap();
    assert!(sut.is_connected().await);

    sut.disconnect().await.unwrap();
    assert!(!sut.is_connected().await);

    let db = sut.namespace().await.unwrap();
    assert_eq!(db.name(), "authgate-test");
    assert!(sut.is_connected().await);

    sut.disconnect().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn test_login_flow_persists_access_token() {
    let store = Arc::new(ConnectionManager::new(MongoDriver));
    store.connect(&mongo_url(), "authgate-test-flow").await.unwrap();

    let users = store
        .collection(USER_COLLECTION)
        .await
        .unwrap()
        .clone_with_type::<UserDoc>();
    users.delete_many(doc! {}).await.unwrap();

    let inserted = users
        .insert_one(UserDoc {
            id: None,
            email: "valid_email@mail.com".to_string(),
            password: hash_password("hashed_password").unwrap(),
            access_token: None,
        })
        .await
        .unwrap();

    let settings = Settings::default();
    let state = AppState::compose(&settings, store.clone());

    let outcome = state
        .auth
        .authenticate(Some("valid_email@mail.com"), Some("wrong_password"))
        .await
        .unwrap();
    assert_eq!(outcome, AuthOutcome::NoMatch);

    let outcome = state
        .auth
        .authenticate(Some("unknown@mail.com"), Some("hashed_password"))
        .await
        .unwrap();
    assert_eq!(outcome, AuthOutcome::NoMatch);

    let token = state
        .auth
        .authenticate(Some("valid_email@mail.com"), Some("hashed_password"))
        .await
        .unwrap()
        .into_token()
        .unwrap();

    let stored = users
        .find_one(doc! { "_id": inserted.inserted_id })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.access_token.as_deref(), Some(token.as_str()));

    // A dropped connection heals on the next lookup.
    store.disconnect().await.unwrap();
    let outcome = state
        .auth
        .authenticate(Some("valid_email@mail.com"), Some("hashed_password"))
        .await
        .unwrap();
    assert!(matches!(outcome, AuthOutcome::Token(_)));

    store.disconnect().await.unwrap();
}
