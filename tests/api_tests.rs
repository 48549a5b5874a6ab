mod common;

use axum::http::StatusCode;
use axum_test::{
    multipart::{MultipartForm, Part},
    TestServer,
};
use serde_json::{json, Value};

use cinecat_api::{db::CatalogStore, models::MovieView, routes::create_router};
use common::{test_context, StaticFeed, TestContext, VALID_PASSWORD};

fn empty_feed() -> StaticFeed {
    StaticFeed {
        movies: Vec::new(),
        fail: false,
    }
}

fn create_test_server(context: &TestContext) -> TestServer {
    let app = create_router(context.state.clone());
    TestServer::new(app).unwrap()
}

/// Two categories: Action holds m1 and m2, Drama is empty
fn seeded_context() -> TestContext {
    let context = test_context(empty_feed());
    let store = &context.store;

    store.add_category("c1", "Action");
    store.add_category("c2", "Drama");
    store.add_genre("g1", "Thriller");
    store.add_genre("g2", "Comedy");
    store.add_movie("m1", Some("c1"), Some(0.8));
    store.add_movie("m2", Some("c1"), None);
    store.link("m1", "g1");

    context
}

#[tokio::test]
async fn test_health_check() {
    let context = test_context(empty_feed());
    let server = create_test_server(&context);

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let context = test_context(empty_feed());
    let server = create_test_server(&context);

    let response = server.get("/health").await;
    let header = response.header("x-request-id");
    assert!(!header.to_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_catalog_grouped_by_category() {
    let context = seeded_context();
    context.store.upsert_favorite("u1", "m1").await.unwrap();
    let server = create_test_server(&context);

    let response = server
        .get("/movies")
        .add_query_param("userLogged", "u1")
        .await;
    response.assert_status_ok();

    let groups: Vec<Value> = response.json();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["name"], "Action");
    assert_eq!(groups[1]["name"], "Drama");
    assert_eq!(groups[1]["movies"], json!([]));

    let movies = groups[0]["movies"].as_array().unwrap();
    assert_eq!(movies[0]["id"], "m1");
    assert_eq!(movies[0]["isFavorite"], true);
    assert_eq!(movies[0]["release_date"], "2020-01-01");
    assert_eq!(movies[1]["id"], "m2");
    assert_eq!(movies[1]["isFavorite"], false);
    assert_eq!(movies[1]["rating"], 0.0);
    assert_eq!(movies[1]["horizontal_image"], "");
}

#[tokio::test]
async fn test_catalog_without_viewer_has_no_favorites() {
    let context = seeded_context();
    context.store.upsert_favorite("u1", "m1").await.unwrap();
    let server = create_test_server(&context);

    let response = server.get("/movies").await;
    response.assert_status_ok();

    let groups: Vec<Value> = response.json();
    let movies = groups[0]["movies"].as_array().unwrap();
    assert!(movies.iter().all(|m| m["isFavorite"] == false));
}

#[tokio::test]
async fn test_catalog_by_genre_keeps_empty_categories() {
    let context = seeded_context();
    let server = create_test_server(&context);

    let response = server
        .get("/movies/by-genre")
        .add_query_param("genreId", "g1")
        .await;
    response.assert_status_ok();

    let groups: Vec<Value> = response.json();
    assert_eq!(groups.len(), 2);
    let action = groups[0]["movies"].as_array().unwrap();
    assert_eq!(action.len(), 1);
    assert_eq!(action[0]["id"], "m1");
    assert_eq!(groups[1]["movies"], json!([]));
}

#[tokio::test]
async fn test_catalog_by_genre_requires_genre_id() {
    let context = seeded_context();
    let server = create_test_server(&context);

    let response = server.get("/movies/by-genre").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "genreId is required.");
}

#[tokio::test]
async fn test_recommendations_rank_and_exclude_seed() {
    let context = seeded_context();
    let store = &context.store;
    store.add_movie("m3", Some("c2"), Some(0.5));
    store.add_movie("m4", Some("c2"), Some(0.9));
    store.link("m1", "g2");
    store.link("m3", "g1");
    store.link("m3", "g2");
    store.link("m4", "g1");
    let server = create_test_server(&context);

    let response = server
        .get("/movies/recommendations")
        .add_query_param("movieId", "m1")
        .await;
    response.assert_status_ok();

    let movies: Vec<Value> = response.json();
    let ids: Vec<&str> = movies.iter().map(|m| m["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["m4", "m3"]);
    assert!(movies[0].get("release_date").is_none());
    assert!(movies[0].get("isFavorite").is_none());
}

#[tokio::test]
async fn test_recommendations_without_genres_is_empty() {
    let context = seeded_context();
    let server = create_test_server(&context);

    let response = server
        .get("/movies/recommendations")
        .add_query_param("movieId", "m2")
        .await;
    response.assert_status_ok();
    let movies: Vec<Value> = response.json();
    assert!(movies.is_empty());
}

#[tokio::test]
async fn test_recommendations_require_movie_id() {
    let context = seeded_context();
    let server = create_test_server(&context);

    let response = server.get("/movies/recommendations").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_favorite_twice_keeps_one_row() {
    let context = seeded_context();
    let server = create_test_server(&context);
    let body = json!({ "userId": "u1", "movieId": "m1" });

    for _ in 0..2 {
        let response = server.post("/movies/favorites").json(&body).await;
        response.assert_status(StatusCode::CREATED);
        let message: Value = response.json();
        assert_eq!(message["message"], "Favorite updated successfully");
    }

    assert_eq!(context.store.favorite_count("u1", "m1"), 1);
}

#[tokio::test]
async fn test_favorite_requires_both_ids() {
    let context = seeded_context();
    let server = create_test_server(&context);

    let response = server
        .post("/movies/favorites")
        .json(&json!({ "userId": "u1" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(context.store.favorite_count("u1", "m1"), 0);
}

#[tokio::test]
async fn test_favorites_grouped_by_category() {
    let context = seeded_context();
    let server = create_test_server(&context);

    server
        .post("/movies/favorites")
        .json(&json!({ "userId": "u1", "movieId": "m2" }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .get("/movies/favorites")
        .add_query_param("userId", "u1")
        .await;
    response.assert_status_ok();

    let groups: Vec<Value> = response.json();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["name"], "Action");
    assert_eq!(groups[0]["movies"][0]["id"], "m2");
    assert_eq!(groups[0]["movies"][0]["vertical_image_large"], "https://cdn.test/m2.jpg");
}

#[tokio::test]
async fn test_genres_sorted_by_name() {
    let context = seeded_context();
    let server = create_test_server(&context);

    let response = server.get("/movies/genres").await;
    response.assert_status_ok();
    let genres: Vec<Value> = response.json();
    assert_eq!(
        genres,
        vec![
            json!({ "id": "g2", "name": "Comedy" }),
            json!({ "id": "g1", "name": "Thriller" }),
        ]
    );
}

#[tokio::test]
async fn test_movie_details() {
    let context = seeded_context();
    let server = create_test_server(&context);

    let response = server.get("/movies/m1").await;
    response.assert_status_ok();
    let details: Value = response.json();
    assert_eq!(details["title"], "Movie m1");
    assert_eq!(details["genres"], json!([{ "id": "g1", "name": "Thriller" }]));

    let response = server.get("/movies/missing").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_movie_uploads_images() {
    let context = seeded_context();
    let server = create_test_server(&context);

    let form = MultipartForm::new()
        .add_text("title", "Arrival")
        .add_text("rating", "0.79")
        .add_text("release_date", "2016-11-11")
        .add_text("category_id", "c2")
        .add_text("trailer_url", "https://video.test/arrival")
        .add_part(
            "vertical_image_large",
            Part::bytes(vec![1, 2, 3])
                .file_name("arrival.png")
                .mime_type("image/png"),
        );

    let response = server.post("/movies/create").multipart(form).await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.text(), "Movie created successfully!");

    let uploaded = context.storage.uploaded.lock().unwrap().clone();
    assert_eq!(uploaded, vec!["vertical_image_large/arrival.png".to_string()]);

    let created = context
        .store
        .movies()
        .into_iter()
        .find(|m| m.title == "Arrival")
        .unwrap();
    assert_eq!(created.category_id.as_deref(), Some("c2"));
    assert_eq!(
        created.vertical_image_large.as_deref(),
        Some("https://cdn.test/vertical_image_large/arrival.png")
    );
    assert_eq!(created.horizontal_image, None);
}

#[tokio::test]
async fn test_create_movie_rejects_invalid_rating() {
    let context = seeded_context();
    let server = create_test_server(&context);
    let movies_before = context.store.movies().len();

    let form = MultipartForm::new()
        .add_text("title", "Arrival")
        .add_text("rating", "7.9")
        .add_text("release_date", "2016-11-11")
        .add_text("category_id", "c2")
        .add_text("trailer_url", "https://video.test/arrival");

    let response = server.post("/movies/create").multipart(form).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(context.store.movies().len(), movies_before);
}

#[tokio::test]
async fn test_tmdb_popular() {
    let feed = StaticFeed {
        movies: vec![MovieView {
            id: "550".to_string(),
            title: "Fight Club".to_string(),
            rating: 0.84,
            release_date: Some("1999-10-15".to_string()),
            horizontal_image: None,
            vertical_image_large: "https://image.test/w500/poster.jpg".to_string(),
            is_favorite: None,
        }],
        fail: false,
    };
    let context = test_context(feed);
    let server = create_test_server(&context);

    let response = server.get("/tmdb/popular").await;
    response.assert_status_ok();
    let group: Value = response.json();
    assert_eq!(group["name"], "TMDB Popular Movies");
    assert_eq!(group["movies"][0]["id"], "550");
    assert_eq!(group["movies"][0]["rating"], 0.84);
}

#[tokio::test]
async fn test_tmdb_popular_upstream_failure() {
    let context = test_context(StaticFeed {
        movies: Vec::new(),
        fail: true,
    });
    let server = create_test_server(&context);

    let response = server.get("/tmdb/popular").await;
    response.assert_status(StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_register_then_login() {
    let context = test_context(empty_feed());
    let server = create_test_server(&context);
    let credentials = json!({ "email": "ana@example.com", "password": VALID_PASSWORD });

    let response = server.post("/auth/register").json(&credentials).await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(context.store.profiles().len(), 1);

    let response = server.post("/auth/login").json(&credentials).await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["accessToken"], "access-token");
    assert_eq!(body["user"]["id"], "user:ana@example.com");
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let context = test_context(empty_feed());
    let server = create_test_server(&context);

    let response = server
        .post("/auth/login")
        .json(&json!({ "email": "ana@example.com", "password": "nope" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}
