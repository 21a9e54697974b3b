//! HTTP-level integration tests for the `/api/review` endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get, patch_json_auth, post_json, post_json_auth};
use reelview_db::repositories::ReviewRepo;
use serde_json::json;
use sqlx::PgPool;

async fn review_ids(pool: &PgPool, movie_id: i64) -> Vec<i64> {
    ReviewRepo::list_for_movie(pool, movie_id)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect()
}

// ---------------------------------------------------------------------------
// Add
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_review_returns_updated_summary(pool: PgPool) {
    let user = common::create_user(&pool, "Bo", true).await;
    let movie = common::create_movie(&pool, "Dune", "public", &["sand"]).await;
    common::add_reviews(&pool, movie.id, &[6.0]).await;
    let app = common::build_test_app(pool);
    let token = app.token_for(&user);

    let response = post_json_auth(
        app.app(),
        &format!("/api/review/add/{}", movie.id),
        json!({ "content": "  Great  ", "rating": 9 }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Your review has been added.");
    assert_eq!(json["reviews"]["ratingAvg"], "7.5");
    assert_eq!(json["reviews"]["reviewCount"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_review_requires_verified_user(pool: PgPool) {
    let user = common::create_user(&pool, "Bo", false).await;
    let movie = common::create_movie(&pool, "Dune", "public", &["sand"]).await;
    let app = common::build_test_app(pool.clone());
    let token = app.token_for(&user);

    let response = post_json_auth(
        app.app(),
        &format!("/api/review/add/{}", movie.id),
        json!({ "rating": 9 }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(response).await["error"],
        "Please verify your email first!"
    );
    assert!(review_ids(&pool, movie.id).await.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_review_requires_token(pool: PgPool) {
    let movie = common::create_movie(&pool, "Dune", "public", &["sand"]).await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app.app(),
        &format!("/api/review/add/{}", movie.id),
        json!({ "rating": 9 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_review_by_same_user_conflicts(pool: PgPool) {
    let user = common::create_user(&pool, "Bo", true).await;
    let movie = common::create_movie(&pool, "Dune", "public", &["sand"]).await;
    let app = common::build_test_app(pool.clone());
    let token = app.token_for(&user);
    let uri = format!("/api/review/add/{}", movie.id);

    let first = post_json_auth(app.app(), &uri, json!({ "rating": 9 }), &token).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_json_auth(app.app(), &uri, json!({ "rating": 3 }), &token).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(second).await["error"],
        "Invalid request, review is already there!"
    );
    assert_eq!(review_ids(&pool, movie.id).await.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_review_rejects_bad_rating_and_hidden_movie(pool: PgPool) {
    let user = common::create_user(&pool, "Bo", true).await;
    let public = common::create_movie(&pool, "Dune", "public", &["sand"]).await;
    let private = common::create_movie(&pool, "Secret Cut", "private", &["sand"]).await;
    let app = common::build_test_app(pool);
    let token = app.token_for(&user);

    let response = post_json_auth(
        app.app(),
        &format!("/api/review/add/{}", public.id),
        json!({ "rating": 11 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Rating must be a number between 0 and 10."
    );

    let response = post_json_auth(
        app.app(),
        &format!("/api/review/add/{}", private.id),
        json!({ "rating": 5 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json_auth(
        app.app(),
        "/api/review/add/999999",
        json!({ "rating": 5 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Update / delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_only_owner_can_update_review(pool: PgPool) {
    let owner = common::create_user(&pool, "Bo", true).await;
    let other = common::create_user(&pool, "Cy", true).await;
    let movie = common::create_movie(&pool, "Dune", "public", &["sand"]).await;
    let app = common::build_test_app(pool.clone());
    let owner_token = app.token_for(&owner);

    post_json_auth(
        app.app(),
        &format!("/api/review/add/{}", movie.id),
        json!({ "content": "Good", "rating": 6 }),
        &owner_token,
    )
    .await;
    let review_id = review_ids(&pool, movie.id).await[0];
    let uri = format!("/api/review/{review_id}");

    let response = patch_json_auth(
        app.app(),
        &uri,
        json!({ "content": "Hijacked", "rating": 1 }),
        &app.token_for(&other),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = patch_json_auth(
        app.app(),
        &uri,
        json!({ "content": "Even better", "rating": 8.5 }),
        &owner_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Your review has been updated."
    );

    let review = ReviewRepo::find_by_id(&pool, review_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(review.content, "Even better");
    assert_eq!(review.rating, 8.5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_only_owner_can_delete_review(pool: PgPool) {
    let owner = common::create_user(&pool, "Bo", true).await;
    let other = common::create_user(&pool, "Cy", true).await;
    let movie = common::create_movie(&pool, "Dune", "public", &["sand"]).await;
    let app = common::build_test_app(pool.clone());
    let owner_token = app.token_for(&owner);

    post_json_auth(
        app.app(),
        &format!("/api/review/add/{}", movie.id),
        json!({ "rating": 6 }),
        &owner_token,
    )
    .await;
    let review_id = review_ids(&pool, movie.id).await[0];
    let uri = format!("/api/review/{review_id}");

    let response = delete_auth(app.app(), &uri, &app.token_for(&other)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app.app(), &uri, &owner_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Review removed successfully."
    );
    assert!(review_ids(&pool, movie.id).await.is_empty());

    // The summary goes back to empty.
    let response = get(app.app(), &format!("/api/movie/single/{}", movie.id)).await;
    assert_eq!(
        body_json(response).await["movie"]["reviews"],
        serde_json::json!({})
    );
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reviews_by_movie_lists_owners(pool: PgPool) {
    let bo = common::create_user(&pool, "Bo", true).await;
    let cy = common::create_user(&pool, "Cy", true).await;
    let movie = common::create_movie(&pool, "Dune", "public", &["sand"]).await;
    let app = common::build_test_app(pool);

    for (user, rating) in [(&bo, 7), (&cy, 9)] {
        let response = post_json_auth(
            app.app(),
            &format!("/api/review/add/{}", movie.id),
            json!({ "content": format!("{} liked it", user.name), "rating": rating }),
            &app.token_for(user),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = get(
        app.app(),
        &format!("/api/review/get-reviews-by-movie/{}", movie.id),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["movie"]["title"], "Dune");
    let reviews = json["movie"]["reviews"].as_array().unwrap();
    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0]["owner"]["name"], "Bo");
    assert_eq!(reviews[0]["owner"]["id"], bo.id);
    assert_eq!(reviews[0]["content"], "Bo liked it");
    assert_eq!(reviews[1]["rating"], 9.0);

    let response = get(app.app(), "/api/review/get-reviews-by-movie/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
