use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use shelfkeeper::{app::build_app, auth::Claims, state::AppState};
use tower::ServiceExt;
use uuid::Uuid;

fn app() -> (Router, AppState) {
    let state = AppState::fake();
    (build_app(state.clone()).unwrap(), state)
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let req = match body {
        Some(b) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn register(app: &Router, username: &str) -> (String, String) {
    let (status, body) = call(
        app,
        Method::POST,
        "/register",
        None,
        Some(json!({ "username": username })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    (
        body["token"].as_str().unwrap().to_string(),
        body["userId"].as_str().unwrap().to_string(),
    )
}

fn book(title: &str) -> Value {
    json!({ "title": title, "author": "Ursula K. Le Guin", "cover": "https://covers.example/1.jpg" })
}

#[tokio::test]
async fn root_and_health_respond() {
    let (app, _) = app();
    let res = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"API is working!");
}

#[tokio::test]
async fn distinct_registrations_get_distinct_ids_and_valid_tokens() {
    let (app, state) = app();
    let (t1, id1) = register(&app, "alice").await;
    let (t2, id2) = register(&app, "bob").await;
    assert_ne!(id1, id2);
    assert_eq!(state.keys.verify(&t1).unwrap().to_string(), id1);
    assert_eq!(state.keys.verify(&t2).unwrap().to_string(), id2);
}

#[tokio::test]
async fn register_rejects_bad_and_duplicate_usernames() {
    let (app, _) = app();
    for bad in [json!({ "username": "has space" }), json!({ "username": "  " }), json!({})] {
        let (status, body) = call(&app, Method::POST, "/register", None, Some(bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    register(&app, "carol").await;
    let (status, body) = call(
        &app,
        Method::POST,
        "/register",
        None,
        Some(json!({ "username": "carol" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username already exists");
}

#[tokio::test]
async fn login_known_and_unknown_users() {
    let (app, state) = app();
    let (_, id) = register(&app, "dora").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "username": " dora " })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userId"], id.as_str());
    assert_eq!(body["username"], "dora");
    let token = body["token"].as_str().unwrap();
    assert_eq!(state.keys.verify(token).unwrap().to_string(), id);

    let (status, body) = call(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "username": "ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User does not exist. Please register first.");
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let (app, _) = app();
    let id = Uuid::new_v4();
    let routes = [
        (Method::GET, "/books".to_string()),
        (Method::POST, "/books".to_string()),
        (Method::DELETE, format!("/books/{id}")),
        (Method::GET, "/me".to_string()),
    ];
    for (method, uri) in routes {
        let (status, _) = call(&app, method.clone(), &uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");

        let (status, body) = call(&app, method.clone(), &uri, Some("garbage.token.here"), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
        assert_eq!(body["error"], "Unauthorized: Invalid token");
    }
}

#[tokio::test]
async fn me_returns_identity() {
    let (app, _) = app();
    let (token, id) = register(&app, "eve").await;
    let (status, body) = call(&app, Method::GET, "/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "userId": id, "username": "eve" }));
}

#[tokio::test]
async fn me_for_vanished_user_is_not_found() {
    let (app, state) = app();
    let token = state.keys.issue(Uuid::new_v4()).unwrap();
    let (status, body) = call(&app, Method::GET, "/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn books_are_scoped_sorted_and_unique_per_user() {
    let (app, _) = app();
    let (alice, alice_id) = register(&app, "alice").await;
    let (bob, _) = register(&app, "bob").await;

    for title in ["The Left Hand of Darkness", "A Wizard of Earthsea", "The Dispossessed"] {
        let (status, body) = call(&app, Method::POST, "/books", Some(&alice), Some(book(title))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["title"], title);
        assert_eq!(body["userId"], alice_id.as_str());
    }

    // Same title for a different user is allowed.
    let (status, _) = call(
        &app,
        Method::POST,
        "/books",
        Some(&bob),
        Some(book("The Dispossessed")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Same title twice for one user is not.
    let (status, body) = call(
        &app,
        Method::POST,
        "/books",
        Some(&alice),
        Some(book("The Dispossessed")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "You already added this book!");

    let (status, body) = call(&app, Method::GET, "/books", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(
        titles,
        ["A Wizard of Earthsea", "The Dispossessed", "The Left Hand of Darkness"]
    );

    let (_, body) = call(&app, Method::GET, "/books", Some(&bob), None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn add_book_requires_every_field() {
    let (app, _) = app();
    let (token, _) = register(&app, "fay").await;
    let (status, body) = call(
        &app,
        Method::POST,
        "/books",
        Some(&token),
        Some(json!({ "title": "Kindred", "author": "Octavia E. Butler" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All fields are required");
}

#[tokio::test]
async fn delete_checks_existence_and_ownership() {
    let (app, _) = app();
    let (owner, _) = register(&app, "gus").await;
    let (intruder, _) = register(&app, "hank").await;

    let (_, created) = call(&app, Method::POST, "/books", Some(&owner), Some(book("Lathe of Heaven"))).await;
    let uri = format!("/books/{}", created["id"].as_str().unwrap());

    let (status, body) = call(&app, Method::DELETE, &uri, Some(&intruder), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Unauthorized to delete this book");
    let (_, list) = call(&app, Method::GET, "/books", Some(&owner), None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, body) = call(&app, Method::DELETE, &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book deleted successfully");

    let (status, _) = call(&app, Method::DELETE, &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::DELETE, "/books/not-an-id", Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn null_book_field_counts_as_missing() {
    let (app, _) = app();
    let (token, _) = register(&app, "ivan").await;
    let (status, body) = call(
        &app,
        Method::POST,
        "/books",
        Some(&token),
        Some(json!({ "title": null, "author": "Octavia E. Butler", "cover": "https://covers.example/k.jpg" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All fields are required");
}

#[tokio::test]
async fn scalar_username_is_stringified_and_null_rejected() {
    let (app, _) = app();
    let (status, body) = call(&app, Method::POST, "/register", None, Some(json!({ "username": 123 }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "123");

    let (status, body) = call(&app, Method::POST, "/register", None, Some(json!({ "username": null }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username is required and cannot contain spaces");
}

#[tokio::test]
async fn unusable_bodies_get_json_400() {
    let (app, _) = app();

    let req = Request::builder()
        .method(Method::POST)
        .uri("/register")
        .body(Body::from(r#"{"username":"jo"}"#))
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());

    let req = Request::builder()
        .method(Method::POST)
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn expired_token_is_forbidden() {
    let (app, state) = app();
    let (_, user_id) = register(&app, "kate").await;

    let now = time::OffsetDateTime::now_utc().unix_timestamp() as usize;
    let claims = Claims {
        sub: user_id.parse().unwrap(),
        iat: now - 8 * 24 * 60 * 60,
        exp: now - 24 * 60 * 60,
        iss: state.config.jwt.issuer.clone(),
        aud: state.config.jwt.audience.clone(),
    };
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(state.config.jwt.secret.as_bytes()),
    )
    .unwrap();

    let (status, body) = call(&app, Method::GET, "/books", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Unauthorized: Invalid token");
}
