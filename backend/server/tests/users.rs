mod common;

use axum::{extract::State as AxumState, http::StatusCode};
use common::TestApp;
use domain::users::{ProfileUpdate, Role, User};
use serde_json::json;
use server::{
    auth::AuthUser, error::AppError, routes::users::update_profile_handler, utils::AppJson,
};

#[tokio::test]
async fn admin_lists_without_passwords() {
    let app = TestApp::new();
    let (_, admin) = app.account("Admin", Role::Admin).await;
    app.account("Shopper", Role::User).await;

    let (status, body) = app.get("/api/users", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    for user in body["users"].as_array().unwrap() {
        assert!(user.get("password").is_none());
    }
}

#[tokio::test]
async fn user_routes_need_admin() {
    let app = TestApp::new();
    let (admin, _) = app.account("Admin", Role::Admin).await;
    let (_, user) = app.account("Shopper", Role::User).await;

    let (status, _) = app.get("/api/users", Some(&user)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get(&format!("/api/users/{}", admin.id), Some(&user)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .put(
            &format!("/api/users/{}/role", admin.id),
            Some(&user),
            json!({ "role": "user" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_user() {
    let app = TestApp::new();
    let (_, admin) = app.account("Admin", Role::Admin).await;

    let (status, body) = app.get("/api/users/nobody", Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");

    let (status, _) = app.delete("/api/users/nobody", Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn profile_update() {
    let app = TestApp::new();
    let (user, token) = app.account("Shopper", Role::User).await;

    let (status, body) = app
        .put(
            "/api/users/profile",
            Some(&token),
            json!({
                "name": "Sho Pper",
                "phone": "555-0100",
                "address": { "street": "2 Crumb Ln", "zipCode": "90210" },
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Profile updated successfully");
    assert_eq!(body["user"]["name"], "Sho Pper");
    assert_eq!(body["user"]["phone"], "555-0100");
    assert_eq!(body["user"]["address"]["zipCode"], "90210");
    assert_eq!(body["user"]["email"], user.email.as_str());

    let (_, body) = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(body["user"]["name"], "Sho Pper");
}

#[tokio::test]
async fn role_changes_take_effect_immediately() {
    let app = TestApp::new();
    let (_, admin) = app.account("Admin", Role::Admin).await;
    let (user, token) = app.account("Shopper", Role::User).await;

    let (status, _) = app
        .put(
            &format!("/api/users/{}/role", user.id),
            Some(&admin),
            json!({ "role": "overlord" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .put(
            &format!("/api/users/{}/role", user.id),
            Some(&admin),
            json!({ "role": "admin" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "admin");

    // Same token, new role.
    let (status, _) = app.get("/api/users", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn admin_cannot_delete_self() {
    let app = TestApp::new();
    let (admin, token) = app.account("Admin", Role::Admin).await;
    let (user, _) = app.account("Shopper", Role::User).await;

    let (status, body) = app
        .delete(&format!("/api/users/{}", admin.id), Some(&token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Cannot delete your own account");

    let (status, body) = app
        .delete(&format!("/api/users/{}", user.id), Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");

    // The email is free again once the account is gone.
    let (status, _) = app
        .post(
            "/api/auth/signup",
            None,
            json!({ "name": "Shopper", "email": user.email, "password": "secret1" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn profile_edit_after_deletion_does_not_restore_account() {
    let app = TestApp::new();
    let (_, admin) = app.account("Admin", Role::Admin).await;
    let (victim, _) = app.account("Victim", Role::User).await;

    // The request authenticated before the account went away.
    let (status, _) = app
        .delete(&format!("/api/users/{}", victim.id), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);

    let update = ProfileUpdate {
        name: Some("Renamed".into()),
        ..Default::default()
    };
    let result = update_profile_handler(
        AxumState(app.state.clone()),
        AuthUser(victim.clone()),
        AppJson(update),
    )
    .await;
    assert!(matches!(result, Err(AppError::NotFound("User not found"))));

    let (status, _) = app
        .post(
            "/api/auth/signup",
            None,
            json!({ "name": "Victim", "email": victim.email, "password": "secret1" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let holders = app
        .state
        .db
        .find_all::<User>()
        .await
        .unwrap()
        .into_iter()
        .filter(|u| u.email == victim.email)
        .count();
    assert_eq!(holders, 1);
}

#[tokio::test]
async fn profile_edit_keeps_concurrent_role_change() {
    let app = TestApp::new();
    let (_, admin) = app.account("Admin", Role::Admin).await;
    let (user, _) = app.account("Shopper", Role::User).await;

    // Loaded as a plain user, promoted before the profile write lands.
    app.put(
        &format!("/api/users/{}/role", user.id),
        Some(&admin),
        json!({ "role": "admin" }),
    )
    .await;

    let update = ProfileUpdate {
        phone: Some("555-0199".into()),
        ..Default::default()
    };
    let result = update_profile_handler(
        AxumState(app.state.clone()),
        AuthUser(user.clone()),
        AppJson(update),
    )
    .await;
    assert!(result.is_ok());

    let stored = app.state.db.find::<User>(&user.id).await.unwrap().unwrap();
    assert_eq!(stored.role, Role::Admin);
    assert_eq!(stored.phone.as_deref(), Some("555-0199"));
}
