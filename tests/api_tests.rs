use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use reelrate::config::Config;
use reelrate::db::DEFAULT_API_KEY;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();

    let state = reelrate::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    reelrate::api::router(state).await
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    api_key: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(key) = api_key {
        builder = builder.header("X-Api-Key", key);
    }

    let request = match body {
        Some(body) => builder
            .header("Content-Type", mime::APPLICATION_JSON.as_ref())
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

async fn register(app: &Router, name: &str, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": name, "email": email, "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

async fn create_movie(app: &Router, title: &str, genre: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/movies",
        Some(DEFAULT_API_KEY),
        Some(json!({
            "title": title,
            "description": "A film.",
            "genre": genre,
            "director": "Someone",
            "releaseDate": "2010-07-16",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create movie failed: {body}");
    body["id"].as_i64().unwrap()
}

async fn review(app: &Router, token: &str, movie_id: i64, rating: i32) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/api/reviews",
        Some(token),
        Some(json!({ "movieId": movie_id, "rating": rating, "comment": "Seen it." })),
    )
    .await
}

#[tokio::test]
async fn test_auth_endpoints() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication required");

    let (status, _) = send(&app, "GET", "/api/auth/me", Some("wrong-key"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(DEFAULT_API_KEY), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");
    assert!(body.get("apiKey").is_none());
    assert!(body.get("passwordHash").is_none());
}

#[tokio::test]
async fn test_bearer_token_is_accepted() {
    let app = spawn_app().await;

    let request = Request::builder()
        .uri("/api/auth/me")
        .header("Authorization", format!("Bearer {DEFAULT_API_KEY}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_and_login() {
    let app = spawn_app().await;

    let token = register(&app, "Lisa", "Lisa@Example.com").await;
    assert_eq!(token.len(), 64);

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "lisa@example.com");
    assert_eq!(body["role"], "user");

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": "Lisa", "email": "lisa@example.com", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": "Short", "email": "short@example.com", "password": "abc" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "lisa@example.com", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "lisa@example.com", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], token.as_str());
    assert_eq!(body["user"]["name"], "Lisa");
}

#[tokio::test]
async fn test_regenerate_token_revokes_old_one() {
    let app = spawn_app().await;
    let token = register(&app, "Chris", "chris@example.com").await;

    let (status, body) = send(&app, "POST", "/api/auth/token/regenerate", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let fresh = body["token"].as_str().unwrap().to_string();
    assert_ne!(fresh, token);

    let (status, _) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/auth/me", Some(&fresh), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_guard() {
    let app = spawn_app().await;
    let token = register(&app, "John", "john@example.com").await;
    let body = json!({
        "title": "Heat",
        "description": "Cops and robbers.",
        "genre": "Crime",
        "director": "Michael Mann",
        "releaseDate": "1995-12-15",
    });

    let (status, _) = send(&app, "POST", "/api/movies", None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, resp) = send(&app, "POST", "/api/movies", Some(&token), Some(body.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(resp["error"], "Admin access required");

    let (status, _) = send(&app, "GET", "/api/metrics", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "POST", "/api/movies", Some(DEFAULT_API_KEY), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_movie_crud() {
    let app = spawn_app().await;
    let id = create_movie(&app, "Inception", "Sci-Fi").await;

    let (status, body) = send(&app, "GET", &format!("/api/movies/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Inception");
    assert_eq!(body["releaseDate"], "2010-07-16");
    assert_eq!(body["averageRating"], 0.0);
    assert_eq!(body["totalReviews"], 0);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/movies/{id}"),
        Some(DEFAULT_API_KEY),
        Some(json!({ "title": "Inception (2010)" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Inception (2010)");
    assert_eq!(body["genre"], "Sci-Fi");

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/movies/{id}"),
        Some(DEFAULT_API_KEY),
        Some(json!({ "director": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    create_movie(&app, "Heat", "Crime").await;

    let (status, body) = send(&app, "GET", "/api/movies?search=incep", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = send(&app, "GET", "/api/movies/genres", None, None).await;
    assert_eq!(body, json!(["Crime", "Sci-Fi"]));

    let (status, _) = send(&app, "GET", "/api/movies?sort=sideways", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/movies/{id}"),
        Some(DEFAULT_API_KEY),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Movie deleted successfully");

    let (status, body) = send(&app, "GET", &format!("/api/movies/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Movie not found");

    let (status, _) = send(&app, "GET", "/api/movies/0", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

fn titles(body: &Value) -> Vec<&str> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_movie_list_query_parameters() {
    let app = spawn_app().await;
    let heat = create_movie(&app, "Heat", "Crime").await;
    let casino = create_movie(&app, "Casino", "Crime").await;
    create_movie(&app, "Up", "Animation").await;
    let john = register(&app, "John", "john@example.com").await;
    let jane = register(&app, "Jane", "jane@example.com").await;

    review(&app, &john, heat, 4).await;
    review(&app, &jane, heat, 4).await;
    review(&app, &john, casino, 2).await;

    let cases: &[(&str, &[&str])] = &[
        ("/api/movies", &["Up", "Casino", "Heat"]),
        ("/api/movies?sort=rating-high", &["Heat", "Casino", "Up"]),
        ("/api/movies?rating=3%2B", &["Heat"]),
        ("/api/movies?rating=3+", &["Heat"]),
        ("/api/movies?rating=all", &["Up", "Casino", "Heat"]),
        ("/api/movies?rating=", &["Up", "Casino", "Heat"]),
        ("/api/movies?rating=no-rating", &["Up"]),
        ("/api/movies?genre=all", &["Up", "Casino", "Heat"]),
        ("/api/movies?genre=Crime&sort=title-asc", &["Casino", "Heat"]),
        ("/api/movies?search=", &["Up", "Casino", "Heat"]),
        ("/api/movies?search=hea&rating=all&genre=all", &["Heat"]),
    ];

    for (uri, expected) in cases {
        let (status, body) = send(&app, "GET", uri, None, None).await;
        assert_eq!(status, StatusCode::OK, "{uri}: {body}");
        assert_eq!(titles(&body), *expected, "{uri}");
    }

    let (status, body) = send(&app, "GET", "/api/movies?rating=best", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("invalid rating filter"));
}

#[tokio::test]
async fn test_create_movie_requires_fields() {
    let app = spawn_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/movies",
        Some(DEFAULT_API_KEY),
        Some(json!({
            "description": "No title.",
            "genre": "Drama",
            "director": "Nobody",
            "releaseDate": "2001-01-01",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Title is required");
}

#[tokio::test]
async fn test_one_review_per_user_per_movie() {
    let app = spawn_app().await;
    let movie_id = create_movie(&app, "Parasite", "Thriller").await;
    let jane = register(&app, "Jane", "jane@example.com").await;
    let mike = register(&app, "Mike", "mike@example.com").await;

    let (status, body) = review(&app, &jane, movie_id, 5).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["rating"], 5);
    assert_eq!(body["movie"]["title"], "Parasite");
    assert_eq!(body["user"]["name"], "Jane");

    let (status, body) = review(&app, &jane, movie_id, 3).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("already reviewed"));

    let (status, _) = review(&app, &mike, movie_id, 6).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = review(&app, &mike, 9999, 4).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = review(&app, &mike, movie_id, 2).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, "GET", &format!("/api/movies/{movie_id}"), None, None).await;
    assert_eq!(body["averageRating"], 3.5);
    assert_eq!(body["totalReviews"], 2);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/reviews/movie/{movie_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let reviews = body.as_array().unwrap();
    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0]["user"]["name"], "Mike");

    let (status, body) = send(&app, "GET", "/api/reviews/user", Some(&jane), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_author_only_edits() {
    let app = spawn_app().await;
    let movie_id = create_movie(&app, "The Matrix", "Sci-Fi").await;
    let author = register(&app, "Sarah", "sarah@example.com").await;
    let other = register(&app, "David", "david@example.com").await;

    let (_, body) = review(&app, &author, movie_id, 4).await;
    let review_uri = format!("/api/reviews/{}", body["id"]);

    let (status, body) = send(
        &app,
        "PUT",
        &review_uri,
        Some(&other),
        Some(json!({ "rating": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "You can only update your own reviews");

    let (status, body) = send(
        &app,
        "PUT",
        &review_uri,
        Some(&author),
        Some(json!({ "rating": 2, "comment": "Changed my mind." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rating"], 2);
    assert_eq!(body["comment"], "Changed my mind.");

    let (status, _) = send(&app, "DELETE", &review_uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", &review_uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, "DELETE", &review_uri, Some(&author), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Review deleted successfully");

    let (status, _) = send(&app, "GET", &review_uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_watchlist() {
    let app = spawn_app().await;
    let movie_id = create_movie(&app, "Interstellar", "Sci-Fi").await;
    let token = register(&app, "Emily", "emily@example.com").await;
    let uri = format!("/api/watchlist/{movie_id}");
    let check_uri = format!("/api/watchlist/check/{movie_id}");

    let (status, _) = send(&app, "GET", "/api/watchlist", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, "POST", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["movie"]["title"], "Interstellar");

    let (status, body) = send(&app, "POST", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Movie already in watchlist");

    let (status, _) = send(&app, "POST", "/api/watchlist/9999", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", &check_uri, Some(&token), None).await;
    assert_eq!(body, json!({ "inWatchlist": true }));

    let (status, body) = send(&app, "GET", "/api/watchlist", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Movie removed from watchlist");

    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", &check_uri, Some(&token), None).await;
    assert_eq!(body, json!({ "inWatchlist": false }));
}

#[tokio::test]
async fn test_analytics_endpoints() {
    let app = spawn_app().await;
    let a = create_movie(&app, "Heat", "Crime").await;
    let b = create_movie(&app, "Casino", "Crime").await;
    create_movie(&app, "Up", "Animation").await;
    let john = register(&app, "John", "john@example.com").await;
    let jane = register(&app, "Jane", "jane@example.com").await;

    review(&app, &john, a, 4).await;
    review(&app, &jane, a, 4).await;
    review(&app, &john, b, 5).await;

    let (status, body) = send(&app, "GET", "/api/analytics/stats", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalMovies"], 3);
    assert_eq!(body["totalReviews"], 3);
    // Bootstrap admin plus the two registered users
    assert_eq!(body["totalUsers"], 3);
    assert_eq!(body["averageRating"], 4.3);

    let (_, body) = send(&app, "GET", "/api/analytics/rating-distribution", None, None).await;
    let buckets = body.as_array().unwrap();
    assert_eq!(buckets.len(), 5);
    assert_eq!(buckets[0], json!({ "name": "1 Star", "value": 0, "rating": 1 }));
    assert_eq!(buckets[3]["value"], 2);
    assert_eq!(buckets[4]["value"], 1);

    let (_, body) = send(&app, "GET", "/api/analytics/genre-analysis", None, None).await;
    assert_eq!(body[0], json!({ "name": "Crime", "count": 2 }));
    assert_eq!(body[1], json!({ "name": "Animation", "count": 1 }));

    let (_, body) = send(&app, "GET", "/api/analytics/top-movies", None, None).await;
    let top = body.as_array().unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0]["title"], "Casino");
    assert_eq!(top[0]["averageRating"], 5.0);
    assert_eq!(top[1]["totalReviews"], 2);

    let (_, body) = send(&app, "GET", "/api/analytics/top-movies?limit=1", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "GET", "/api/analytics/top-movies?limit=abc", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_deleting_movie_removes_its_reviews() {
    let app = spawn_app().await;
    let movie_id = create_movie(&app, "Titanic", "Romance").await;
    let token = register(&app, "Lisa", "lisa@example.com").await;
    review(&app, &token, movie_id, 3).await;
    send(&app, "POST", &format!("/api/watchlist/{movie_id}"), Some(&token), None).await;

    send(
        &app,
        "DELETE",
        &format!("/api/movies/{movie_id}"),
        Some(DEFAULT_API_KEY),
        None,
    )
    .await;

    let (_, body) = send(&app, "GET", "/api/analytics/stats", None, None).await;
    assert_eq!(body["totalReviews"], 0);

    let (_, body) = send(&app, "GET", "/api/watchlist", Some(&token), None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_health() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], true);
}
