mod common;
use axum::http::StatusCode;
use govskills::model::entity::Enrollment;
use govskills::model::{DatabaseError, DbConnection, ModelManager};
use sqlx::Executor;
use uuid::Uuid;

use crate::common::{
    Action, Flow, create_module_action, enroll_action, setup_server, setup_test_db, signup_action,
    unenroll_action,
};

#[tokio::test]
async fn route_enroll_lifecycle_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    Flow::new()
        .step(signup_action("ENROLLER", "ENROLLER"))
        .step(create_module_action("Spreadsheets", "Office", "beginner").with_save_as("module"))
        .step(enroll_action("module").assert_body(|body| {
            assert!(body.contains("Successfully enrolled in Spreadsheets"));
            assert!(body.contains(r#""status":"not_started""#));
        }))
        // the second attempt conflicts, the first row stays alone
        .step(
            enroll_action("module")
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| assert!(body.contains("Already enrolled"))),
        )
        .step(
            Action::new("list_enrolled", "GET", "/api/v1/training-modules/")
                .with_param("enrolled", "true")
                .assert_body(|body| {
                    assert!(body.contains(r#""total":1"#));
                    assert!(body.contains(r#""is_enrolled":true"#));
                    assert!(body.contains(r#""enrollment_count":1"#));
                }),
        )
        .step(unenroll_action("module").assert_body(|body| {
            assert!(body.contains("Successfully unenrolled"));
        }))
        // unenrolling without an enrollment is a state conflict
        .step(
            unenroll_action("module")
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| assert!(body.contains("Not enrolled"))),
        )
        .step(
            Action::new("list_enrolled_after", "GET", "/api/v1/training-modules/")
                .with_param("enrolled", "true")
                .assert_body(|body| {
                    assert!(body.contains(r#""total":0"#));
                }),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_enroll_errors_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    // a module that exists but is no longer published
    let inactive_id = Uuid::new_v4();
    pool.pool
        .execute(
            sqlx::query(
                "INSERT INTO training_modules (id, title, description, difficulty_level, category, is_active) \
                 VALUES ($1, 'Retired Module', '', 'beginner', 'Archive', false)",
            )
            .bind(inactive_id),
        )
        .await
        .unwrap();

    let missing = Uuid::new_v4();
    let enroll_inactive = move |_: &crate::common::FlowContext| {
        format!("/api/v1/training-modules/{inactive_id}/enroll")
    };

    Flow::new()
        // no session at all
        .step(
            Action::new("enroll_anon", "POST", "dynamic")
                .with_dyn_path(move |_| format!("/api/v1/training-modules/{missing}/enroll"))
                .with_expect(StatusCode::UNAUTHORIZED),
        )
        .step(signup_action("LATECOMER", "LATECOMER"))
        // unknown module
        .step(
            Action::new("enroll_missing", "POST", "dynamic")
                .with_dyn_path(move |_| format!("/api/v1/training-modules/{missing}/enroll"))
                .with_expect(StatusCode::NOT_FOUND),
        )
        // inactive module behaves like a missing one
        .step(
            Action::new("enroll_inactive", "POST", "dynamic")
                .with_dyn_path(enroll_inactive)
                .with_expect(StatusCode::NOT_FOUND),
        )
        // and it never shows up in the catalog
        .step(
            Action::new("list", "GET", "/api/v1/training-modules/").assert_body(|body| {
                assert!(!body.contains("Retired Module"));
            }),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn concurrent_enrolls_leave_a_single_row() {
    let db = setup_test_db().await;
    let mm = ModelManager::new(DbConnection::from_pool(db.pool.clone()));

    let user_id = Uuid::new_v4();
    let module_id = Uuid::new_v4();
    db.pool
        .execute(
            sqlx::query(
                "INSERT INTO users (id, username, password_hash) VALUES ($1, 'RACER', 'x')",
            )
            .bind(user_id),
        )
        .await
        .unwrap();
    db.pool
        .execute(
            sqlx::query(
                "INSERT INTO training_modules (id, title, description, difficulty_level, category) \
                 VALUES ($1, 'Contended Module', '', 'beginner', 'Office')",
            )
            .bind(module_id),
        )
        .await
        .unwrap();

    // both skip the route-level existence pre-check, the constraint decides
    let (first, second) = tokio::join!(
        Enrollment::enroll(&mm, user_id, module_id),
        Enrollment::enroll(&mm, user_id, module_id),
    );

    let winners = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for result in [first, second] {
        if let Err(e) = result {
            assert!(matches!(e, DatabaseError::UniqueViolation));
        }
    }

    let rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM user_progress WHERE user_id = $1 AND module_id = $2",
    )
    .bind(user_id)
    .bind(module_id)
    .fetch_one(&db.pool)
    .await
    .unwrap();
    assert_eq!(rows, 1);
}
