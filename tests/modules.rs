mod common;
use axum::http::StatusCode;

use crate::common::{
    Action, Flow, create_module_action, setup_server, setup_test_db, signup_action,
};

#[tokio::test]
async fn route_catalog_list_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    Flow::new()
        // catalog is public, an empty one is still a success envelope
        .step(
            Action::new("list_empty", "GET", "/api/v1/training-modules/")
                .assert_body(|body| {
                    assert!(body.contains(r#""success":true"#));
                    assert!(body.contains(r#""total":0"#));
                })
                .with_expect(StatusCode::OK),
        )
        // creating a module requires a session
        .step(
            create_module_action("Digital Records 101", "Records", "beginner")
                .with_expect(StatusCode::UNAUTHORIZED),
        )
        .step(signup_action("CATALOGUER", "CATALOGUER"))
        .step(create_module_action("Digital Records 101", "Records", "beginner"))
        .step(create_module_action("Network Defence", "Security", "advanced"))
        // unknown difficulty is rejected before any insert
        .step(
            create_module_action("Quantum Filing", "Records", "expert")
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| {
                    assert!(body.contains("Difficulty level"));
                }),
        )
        .step(
            Action::new("list_all", "GET", "/api/v1/training-modules/").assert_body(|body| {
                assert!(body.contains(r#""total":2"#));
                assert!(!body.contains("Quantum Filing"));
            }),
        )
        // difficulty is an exact match
        .step(
            Action::new("list_advanced", "GET", "/api/v1/training-modules/")
                .with_param("difficulty", "advanced")
                .assert_body(|body| {
                    assert!(body.contains(r#""total":1"#));
                    assert!(body.contains("Network Defence"));
                    assert!(!body.contains("Digital Records 101"));
                }),
        )
        .step(
            Action::new("list_advanced_wrong_case", "GET", "/api/v1/training-modules/")
                .with_param("difficulty", "Advanced")
                .assert_body(|body| {
                    assert!(body.contains(r#""total":0"#));
                }),
        )
        // category matches case-insensitively
        .step(
            Action::new("list_security_lower", "GET", "/api/v1/training-modules/")
                .with_param("category", "security")
                .assert_body(|body| {
                    assert!(body.contains(r#""total":1"#));
                    assert!(body.contains("Network Defence"));
                }),
        )
        .step(
            Action::new("list_security_upper", "GET", "/api/v1/training-modules/")
                .with_param("category", "SECURITY")
                .assert_body(|body| {
                    assert!(body.contains(r#""total":1"#));
                }),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_module_create_validation_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    Flow::new()
        .step(signup_action("VALIDATOR", "VALIDATOR"))
        .step(
            create_module_action("", "Records", "beginner")
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| assert!(body.contains("title"))),
        )
        .step(
            create_module_action("Untitled", "", "beginner")
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| assert!(body.contains("category"))),
        )
        // created module is echoed back inside the envelope
        .step(
            create_module_action("Email Etiquette", "Communication", "intermediate").assert_body(
                |body| {
                    assert!(body.contains(r#""success":true"#));
                    assert!(body.contains("Email Etiquette"));
                    assert!(body.contains("created successfully"));
                },
            ),
        )
        .run(&mut server, pool)
        .await;
}
