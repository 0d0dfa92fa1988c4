mod common;

use assert_matches::assert_matches;
use stockbook::{
    entities::user::UserRole,
    errors::ServiceError,
    services::access::{AccessDecision, BOOTSTRAP_SECRET, BOOTSTRAP_USERNAME},
};

use common::TestApp;

#[tokio::test]
async fn bootstrap_admin_exists_on_a_fresh_store() {
    let app = TestApp::new().await;

    let decision = app
        .book
        .access
        .verify(BOOTSTRAP_USERNAME, BOOTSTRAP_SECRET)
        .await
        .unwrap();
    assert_eq!(
        decision,
        AccessDecision::Granted {
            role: UserRole::Admin
        }
    );
}

#[tokio::test]
async fn wrong_secret_and_unknown_user_deny_identically() {
    let app = TestApp::new().await;

    let wrong_secret = app
        .book
        .access
        .verify(BOOTSTRAP_USERNAME, "not-the-secret")
        .await
        .unwrap();
    let unknown_user = app
        .book
        .access
        .verify("nobody", "whatever")
        .await
        .unwrap();

    // No signal distinguishes "user absent" from "secret wrong".
    assert_eq!(wrong_secret, AccessDecision::Denied);
    assert_eq!(unknown_user, AccessDecision::Denied);
}

#[tokio::test]
async fn session_terminates_after_three_denials() {
    let app = TestApp::new().await;
    let mut session = app.book.login_session();

    for _ in 0..3 {
        let decision = session
            .attempt(&app.book.access, BOOTSTRAP_USERNAME, "bad-secret")
            .await
            .unwrap();
        assert_eq!(decision, AccessDecision::Denied);
    }
    assert!(session.is_terminated());

    // The fourth attempt is rejected before credentials are evaluated;
    // even the correct secret no longer gets through.
    assert_matches!(
        session
            .attempt(&app.book.access, BOOTSTRAP_USERNAME, BOOTSTRAP_SECRET)
            .await,
        Err(ServiceError::AuthError(_))
    );
}

#[tokio::test]
async fn successful_login_within_the_limit_is_granted() {
    let app = TestApp::new().await;
    let mut session = app.book.login_session();

    session
        .attempt(&app.book.access, BOOTSTRAP_USERNAME, "typo")
        .await
        .unwrap();
    let decision = session
        .attempt(&app.book.access, BOOTSTRAP_USERNAME, BOOTSTRAP_SECRET)
        .await
        .unwrap();
    assert_matches!(decision, AccessDecision::Granted { .. });
    assert!(!session.is_terminated());
}

#[tokio::test]
async fn user_administration_round_trip() {
    let app = TestApp::new().await;

    let id = app
        .book
        .access
        .create_user("clerk", "clerk-secret", UserRole::Standard)
        .await
        .unwrap();

    let decision = app.book.access.verify("clerk", "clerk-secret").await.unwrap();
    assert_eq!(
        decision,
        AccessDecision::Granted {
            role: UserRole::Standard
        }
    );

    // Reset secret and promote.
    app.book
        .access
        .update_user(id, "new-secret", UserRole::Admin)
        .await
        .unwrap();
    assert_eq!(
        app.book.access.verify("clerk", "clerk-secret").await.unwrap(),
        AccessDecision::Denied
    );
    assert_eq!(
        app.book.access.verify("clerk", "new-secret").await.unwrap(),
        AccessDecision::Granted {
            role: UserRole::Admin
        }
    );

    app.book.access.delete_user(id).await.unwrap();
    assert_eq!(
        app.book.access.verify("clerk", "new-secret").await.unwrap(),
        AccessDecision::Denied
    );
}

#[tokio::test]
async fn create_user_rejects_duplicates_and_empty_input() {
    let app = TestApp::new().await;

    assert_matches!(
        app.book
            .access
            .create_user(BOOTSTRAP_USERNAME, "x", UserRole::Standard)
            .await,
        Err(ServiceError::ValidationError(_))
    );
    assert_matches!(
        app.book.access.create_user("", "x", UserRole::Standard).await,
        Err(ServiceError::ValidationError(_))
    );
    assert_matches!(
        app.book
            .access
            .create_user("clerk", "", UserRole::Standard)
            .await,
        Err(ServiceError::ValidationError(_))
    );

    // Only the bootstrap account exists.
    let users = app.book.access.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, BOOTSTRAP_USERNAME);
}
