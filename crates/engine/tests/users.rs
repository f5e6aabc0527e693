mod common;

use engine::{DEFAULT_ROLE, EngineError};

use common::{engine, engine_with_users};

#[tokio::test]
async fn register_assigns_default_role() {
    let engine = engine().await;
    let user = engine
        .register("  carol ", "carol@example.com", "secret")
        .await
        .unwrap();
    assert_eq!(user.username, "carol");
    assert_eq!(user.roles, vec![DEFAULT_ROLE.to_string()]);
    assert!(user.has_role("USER"));
}

#[tokio::test]
async fn register_rejects_taken_username_and_email() {
    let (engine, _alice, _bob) = engine_with_users().await;

    let err = engine
        .register("alice", "other@example.com", "pw")
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("alice".to_string()));

    let err = engine
        .register("alice2", "alice@example.com", "pw")
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("alice@example.com".to_string()));
}

#[tokio::test]
async fn register_validates_input() {
    let engine = engine().await;
    assert!(matches!(
        engine.register("dave", "not-an-email", "pw").await,
        Err(EngineError::InvalidValue(_))
    ));
    assert!(matches!(
        engine.register("   ", "dave@example.com", "pw").await,
        Err(EngineError::InvalidValue(_))
    ));
    assert!(matches!(
        engine.register("dave", "dave@example.com", "").await,
        Err(EngineError::InvalidValue(_))
    ));
}

#[tokio::test]
async fn login_by_username_or_email() {
    let (engine, alice, _bob) = engine_with_users().await;

    let by_name = engine.login("alice", "alice-password").await.unwrap();
    assert_eq!(by_name.id, alice.id);

    let by_email = engine
        .login("alice@example.com", "alice-password")
        .await
        .unwrap();
    assert_eq!(by_email.id, alice.id);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let (engine, _alice, _bob) = engine_with_users().await;

    let wrong_password = engine.login("alice", "nope").await.unwrap_err();
    let unknown_user = engine.login("mallory", "nope").await.unwrap_err();
    assert_eq!(wrong_password, EngineError::InvalidCredentials);
    assert_eq!(unknown_user, EngineError::InvalidCredentials);
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
}

#[tokio::test]
async fn change_password_replaces_credentials() {
    let (engine, alice, _bob) = engine_with_users().await;

    engine.change_password(alice.id, "new-password").await.unwrap();
    assert_eq!(
        engine.login("alice", "alice-password").await.unwrap_err(),
        EngineError::InvalidCredentials
    );
    assert!(engine.login("alice", "new-password").await.is_ok());
}

#[tokio::test]
async fn grant_role_is_idempotent() {
    let (engine, alice, _bob) = engine_with_users().await;

    engine.grant_role(alice.id, "admin").await.unwrap();
    let user = engine.grant_role(alice.id, "ADMIN").await.unwrap();
    assert_eq!(user.roles, vec!["ADMIN".to_string(), "USER".to_string()]);

    let fetched = engine.user_by_username("alice").await.unwrap();
    assert_eq!(fetched.roles, user.roles);
}

#[tokio::test]
async fn unknown_user_lookup_fails() {
    let engine = engine().await;
    assert!(matches!(
        engine.user(uuid::Uuid::new_v4()).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.user_by_username("ghost").await,
        Err(EngineError::KeyNotFound(_))
    ));
}
