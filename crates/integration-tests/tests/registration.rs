//! Integration tests for the registration form.

use axum::http::StatusCode;
use registration_integration_tests::{TestContext, valid_registration, with_field};

#[tokio::test]
async fn test_form_lists_seeded_choices() {
    let mut ctx = TestContext::new().await;
    let response = ctx.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    for label in ["WA", "AK", "LA", "USA", "Some_Made_Up_Place"] {
        assert!(response.body.contains(label), "missing option {label}");
    }
    // Options carry row IDs: AK was seeded second
    assert!(response.body.contains(r#"<option value="2">AK</option>"#));
}

#[tokio::test]
async fn test_valid_submission_redirects_to_new_user() {
    let mut ctx = TestContext::new().await;
    let response = ctx.post_form("/", &valid_registration()).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/user/1"));
    assert_eq!(ctx.user_count().await, 1);

    let detail = ctx.get("/user/1").await;
    assert_eq!(detail.status, StatusCode::OK);
    assert!(detail.body.contains("Ada Lovelace"));
    assert!(detail.body.contains("Anchorage"));
    assert!(detail.body.contains("AK"));
    assert!(detail.body.contains("USA"));
}

#[tokio::test]
async fn test_missing_required_field_rerenders_without_saving() {
    let mut ctx = TestContext::new().await;
    let fields = with_field(valid_registration(), "first_name", "   ");
    let response = ctx.post_form("/", &fields).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("This field is required."));
    // Other submitted values are kept
    assert!(response.body.contains(r#"value="Lovelace""#));
    assert_eq!(ctx.user_count().await, 0);
}

#[tokio::test]
async fn test_overlong_field_is_rejected() {
    let mut ctx = TestContext::new().await;
    let city = "x".repeat(51);
    let fields = with_field(valid_registration(), "city", &city);
    let response = ctx.post_form("/", &fields).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Field cannot be longer than 50 characters."));
    assert_eq!(ctx.user_count().await, 0);
}

#[tokio::test]
async fn test_unknown_choice_is_rejected() {
    let mut ctx = TestContext::new().await;
    let fields = with_field(valid_registration(), "country_id", "99");
    let response = ctx.post_form("/", &fields).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Not a valid choice."));
    assert_eq!(ctx.user_count().await, 0);
}

#[tokio::test]
async fn test_demonstration_path_serves_the_same_form() {
    let mut ctx = TestContext::new().await;

    let page = ctx.get("/demonstration").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains(r#"action="/demonstration""#));

    let response = ctx.post_form("/demonstration", &valid_registration()).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(ctx.user_count().await, 1);
}

#[tokio::test]
async fn test_flash_message_is_shown_once() {
    let mut ctx = TestContext::new().await;
    let response = ctx.post_form("/", &valid_registration()).await;
    let location = response.location.unwrap();

    let first = ctx.get(&location).await;
    assert!(first.body.contains("This data was saved to the database!"));

    let second = ctx.get(&location).await;
    assert_eq!(second.status, StatusCode::OK);
    assert!(!second.body.contains("This data was saved to the database!"));
}

#[tokio::test]
async fn test_every_response_carries_request_id() {
    let mut ctx = TestContext::new().await;
    let response = ctx.get("/").await;
    assert!(response.request_id.is_some());

    let missing = ctx.get("/user/404").await;
    assert!(missing.request_id.is_some());
}
