//! Fixtures shared by the repository tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use reelview_core::types::DbId;
use reelview_db::models::actor::CreateActor;
use reelview_db::models::movie::{CastInput, MovieInput};
use reelview_db::models::review::CreateReview;
use reelview_db::models::user::CreateUser;
use reelview_db::repositories::{ActorRepo, MovieRepo, ReviewRepo, UserRepo};
use sqlx::PgPool;

pub async fn user(pool: &PgPool, email: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            name: "Reviewer".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn actor(pool: &PgPool, name: &str) -> DbId {
    ActorRepo::create(
        pool,
        &CreateActor {
            name: name.to_string(),
            about: "About".to_string(),
            gender: "female".to_string(),
            avatar_url: None,
            avatar_public_id: None,
        },
    )
    .await
    .unwrap()
    .id
}

pub fn movie_input(title: &str, status: &str, content_type: &str, tags: &[&str]) -> MovieInput {
    MovieInput {
        title: title.to_string(),
        story_line: "Story".to_string(),
        director_id: None,
        writers: Vec::new(),
        cast: Vec::new(),
        release_date: NaiveDate::from_ymd_opt(2023, 3, 22).unwrap(),
        status: status.to_string(),
        content_type: content_type.to_string(),
        genres: vec!["Drama".to_string()],
        tags: tags.iter().map(|t| t.to_string()).collect(),
        language: "English".to_string(),
        trailer_url: format!("https://cdn.example.com/{title}.mp4"),
        trailer_public_id: title.to_string(),
        poster: None,
    }
}

pub async fn movie(pool: &PgPool, title: &str, status: &str, content_type: &str, tags: &[&str]) -> DbId {
    MovieRepo::create(pool, &movie_input(title, status, content_type, tags))
        .await
        .unwrap()
        .id
}

pub fn cast(actor_id: DbId, role_as: &str) -> CastInput {
    CastInput {
        actor_id,
        role_as: role_as.to_string(),
        lead_actor: false,
    }
}

/// Add `count` reviews to `movie_id`, each from a fresh user.
pub async fn reviews(pool: &PgPool, movie_id: DbId, ratings: &[f64]) {
    for (i, &rating) in ratings.iter().enumerate() {
        let owner_id = user(pool, &format!("m{movie_id}-r{i}@example.com")).await;
        ReviewRepo::create(
            pool,
            &CreateReview {
                owner_id,
                movie_id,
                content: String::new(),
                rating,
            },
        )
        .await
        .unwrap();
    }
}
