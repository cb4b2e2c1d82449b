mod common;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use sqlx::Executor;
use uuid::Uuid;

use crate::common::{FlowDatabase, setup_server, setup_test_db};

async fn signup(server: &mut TestServer, username: &str) -> Uuid {
    server.save_cookies();
    let resp = server
        .post("/api/v1/account/signup")
        .json(&json!({ "username": username, "password": username }))
        .await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    body["id"].as_str().unwrap().parse().unwrap()
}

async fn create_and_enroll(server: &mut TestServer, title: &str) -> Uuid {
    let resp = server
        .post("/api/v1/training-modules/")
        .json(&json!({
            "title": title,
            "description": "",
            "difficulty_level": "beginner",
            "category": "Office",
        }))
        .await;
    let module_id: Uuid = resp.json::<Value>()["data"]["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    server
        .post(&format!("/api/v1/training-modules/{module_id}/enroll"))
        .await
        .assert_status_ok();
    module_id
}

#[tokio::test]
async fn stats_requires_session() {
    let db = setup_test_db().await;
    let server = setup_server(&db).await;

    let resp = server.get("/api/v1/user/stats").await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn stats_fresh_account_is_all_zeroes() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;
    let user_id = signup(&mut server, "FRESH").await;

    let resp = server.get("/api/v1/user/stats").await;
    resp.assert_status_ok();
    let body: Value = resp.json();

    assert_eq!(body["success"], true);
    let cards = body["data"].as_array().unwrap();
    assert_eq!(cards.len(), 4);
    assert_eq!(cards[0]["title"], "Training Modules");
    assert_eq!(cards[0]["value"], "0");
    assert_eq!(cards[0]["subValue"], "0 completed");
    assert_eq!(cards[1]["subValue"], "No points this week");
    assert_eq!(cards[2]["value"], "0");
    assert_eq!(cards[3]["value"], "0%");
    assert_eq!(cards[3]["subValue"], "Target: 5 activities");

    assert_eq!(body["metadata"]["user_id"].as_str().unwrap(), user_id.to_string());

    // the stats call lazily created the profile row
    let profiles: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM user_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&db.pool)
            .await
            .unwrap();
    assert_eq!(profiles, 1);
}

async fn seed_quiz_attempt(db: &FlowDatabase, user_id: Uuid, score: f32, points: i32, days_ago: i32) {
    db.pool
        .execute(
            sqlx::query(
                "INSERT INTO quiz_attempts (id, user_id, score_percentage, points_earned, completed_at) \
                 VALUES ($1, $2, $3, $4, NOW() - ($5 || ' days')::interval)",
            )
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(score)
            .bind(points)
            .bind(days_ago.to_string()),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn stats_aggregates_across_tables() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;
    let user_id = signup(&mut server, "VETERAN").await;

    let first_module = create_and_enroll(&mut server, "Spreadsheets").await;
    create_and_enroll(&mut server, "Email Etiquette").await;

    // one of the two enrollments is finished
    db.pool
        .execute(
            sqlx::query(
                "UPDATE user_progress SET status = 'completed', progress_percentage = 100 \
                 WHERE user_id = $1 AND module_id = $2",
            )
            .bind(user_id)
            .bind(first_module),
        )
        .await
        .unwrap();

    // quiz history: this week, this month, and one too old to count
    seed_quiz_attempt(&db, user_id, 80.0, 30, 0).await;
    seed_quiz_attempt(&db, user_id, 60.0, 10, 10).await;
    seed_quiz_attempt(&db, user_id, 10.0, 99, 40).await;

    db.pool
        .execute(
            sqlx::query(
                "UPDATE user_profiles SET total_points = 120, current_streak = 3 WHERE user_id = $1",
            )
            .bind(user_id),
        )
        .await
        .unwrap();

    db.pool
        .execute(
            sqlx::query(
                "INSERT INTO user_badges (id, user_id, badge_name) VALUES ($1, $2, 'Fast Learner')",
            )
            .bind(Uuid::new_v4())
            .bind(user_id),
        )
        .await
        .unwrap();

    db.pool
        .execute(
            sqlx::query(
                "INSERT INTO certificates (id, user_id, title) VALUES ($1, $2, 'Office Basics')",
            )
            .bind(Uuid::new_v4())
            .bind(user_id),
        )
        .await
        .unwrap();

    let resp = server.get("/api/v1/user/stats").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    let cards = body["data"].as_array().unwrap();

    assert_eq!(cards[0]["value"], "2");
    assert_eq!(cards[0]["subValue"], "1 completed");
    assert_eq!(cards[1]["value"], "120");
    assert_eq!(cards[1]["subValue"], "+30 this week");
    assert_eq!(cards[2]["value"], "1");
    // two enrollments touched this week, target is 5
    assert_eq!(cards[3]["value"], "40%");

    let raw = &body["metadata"]["raw_stats"];
    assert_eq!(raw["total_enrolled_modules"], 2);
    assert_eq!(raw["completed_modules"], 1);
    assert_eq!(raw["total_badges"], 1);
    assert_eq!(raw["weekly_activity"], 2);
    assert_eq!(raw["current_streak"], 3);
    assert_eq!(raw["weekly_points"], 30);
    // 30-day average over 80 and 60, the 40-day-old attempt is ignored
    assert_eq!(raw["avg_quiz_score"].as_f64().unwrap(), 70.0);
}

#[tokio::test]
async fn stats_weekly_progress_clamps_at_hundred() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;
    signup(&mut server, "OVERACHIEVER").await;

    for i in 0..6 {
        create_and_enroll(&mut server, &format!("Module {i}")).await;
    }

    let resp = server.get("/api/v1/user/stats").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    let cards = body["data"].as_array().unwrap();

    assert_eq!(body["metadata"]["raw_stats"]["weekly_activity"], 6);
    assert_eq!(cards[3]["value"], "100%");
}
