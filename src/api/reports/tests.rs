use axum::http::{header, StatusCode};
use tower::ServiceExt;

use crate::core::security;
use crate::test_support::{
    bearer_token, form_request, get_request, read_json, read_text, seed_report_fixture,
    setup_test_context,
};

const REPORT: &str = "/api/v1/activities/act-1/report";

#[tokio::test]
async fn report_requires_authentication() {
    let ctx = setup_test_context().await;
    seed_report_fixture(&ctx.store);

    let response = ctx.app.oneshot(get_request(REPORT, None)).await.expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
}

#[tokio::test]
async fn viewers_outside_the_course_are_forbidden() {
    let ctx = setup_test_context().await;
    let fixture = seed_report_fixture(&ctx.store);
    let token = bearer_token(&fixture.outsider.id, ctx.state.settings());

    let response = ctx.app.oneshot(get_request(REPORT, Some(&token))).await.expect("response");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_activity_returns_404() {
    let ctx = setup_test_context().await;
    let fixture = seed_report_fixture(&ctx.store);
    let token = bearer_token(&fixture.teacher.id, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(get_request("/api/v1/activities/missing/report", Some(&token)))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = read_json(response).await;
    assert_eq!(json["detail"], "Activity not found");
}

#[tokio::test]
async fn bad_parameters_are_rejected() {
    let ctx = setup_test_context().await;
    let fixture = seed_report_fixture(&ctx.store);
    let token = bearer_token(&fixture.teacher.id, ctx.state.settings());

    for uri in [format!("{REPORT}?download=pdf"), format!("{REPORT}?attemptsmode=7")] {
        let response =
            ctx.app.clone().oneshot(get_request(&uri, Some(&token))).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri {uri}");
    }
}

#[tokio::test]
async fn teacher_sees_the_attempt_table() {
    let ctx = setup_test_context().await;
    let fixture = seed_report_fixture(&ctx.store);
    let token = bearer_token(&fixture.teacher.id, ctx.state.settings());

    let response = ctx.app.oneshot(get_request(REPORT, Some(&token))).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .expect("content type")
        .starts_with("text/html"));
    let html = read_text(response).await;
    assert!(html.contains("Lab safety"));
    assert!(html.contains("Ada Lovelace"));
    assert!(html.contains("Cleo Clarke"));
    assert!(html.contains(r#"id="attemptsform""#));
    assert!(html.contains(r#"value="s-ada:1""#));
}

#[tokio::test]
async fn assistants_get_no_delete_form() {
    let ctx = setup_test_context().await;
    let fixture = seed_report_fixture(&ctx.store);
    let token = bearer_token(&fixture.assistant.id, ctx.state.settings());

    let response = ctx.app.oneshot(get_request(REPORT, Some(&token))).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let html = read_text(response).await;
    assert!(html.contains("Bob Babbage"));
    assert!(!html.contains(r#"id="attemptsform""#));
}

#[tokio::test]
async fn csv_download_is_an_attachment() {
    let ctx = setup_test_context().await;
    let fixture = seed_report_fixture(&ctx.store);
    let token = bearer_token(&fixture.teacher.id, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(get_request(&format!("{REPORT}?download=csv&attemptsmode=1"), Some(&token)))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        r#"attachment; filename="CHEM-101 Lab safety.txt""#
    );
    let text = read_text(response).await;
    assert_eq!(text.lines().count(), 4);
    assert!(text.lines().all(|line| line.contains('\t')));
}

#[tokio::test]
async fn posted_delete_removes_selected_attempts() {
    let ctx = setup_test_context().await;
    let fixture = seed_report_fixture(&ctx.store);
    let settings = ctx.state.settings();
    let token = bearer_token(&fixture.teacher.id, settings);
    let sesskey = security::session_key(&fixture.teacher.id, settings);

    let response = ctx
        .app
        .clone()
        .oneshot(form_request(
            REPORT,
            Some(&token),
            &[
                ("action", "delete"),
                ("sesskey", &sesskey),
                ("attemptid[]", "s-ada:1"),
                ("attemptid[]", "s-ada:2"),
            ],
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let html = read_text(response).await;
    assert!(html.contains("Selected attempts have been deleted"));
    assert_eq!(ctx.store.attempt_count(&fixture.activity.id), 1);

    let response = ctx
        .app
        .oneshot(form_request(
            REPORT,
            Some(&token),
            &[("action", "delete"), ("sesskey", "stale"), ("attemptid[]", "s-bob:1")],
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(ctx.store.attempt_count(&fixture.activity.id), 1);
}
