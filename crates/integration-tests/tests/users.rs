//! Integration tests for the user detail and edit pages.

use axum::http::StatusCode;
use registration_integration_tests::{TestContext, valid_registration, with_field};

async fn registered(ctx: &mut TestContext) -> String {
    let response = ctx.post_form("/", &valid_registration()).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    response.location.unwrap()
}

#[tokio::test]
async fn test_missing_user_is_404() {
    let mut ctx = TestContext::new().await;

    assert_eq!(ctx.get("/user/42").await.status, StatusCode::NOT_FOUND);
    assert_eq!(ctx.get("/user/abc").await.status, StatusCode::NOT_FOUND);
    assert_eq!(ctx.get("/update_user/42").await.status, StatusCode::NOT_FOUND);

    let update = ctx.post_form("/update_user/42", &valid_registration()).await;
    assert_eq!(update.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_edit_form_is_prefilled() {
    let mut ctx = TestContext::new().await;
    registered(&mut ctx).await;

    let page = ctx.get("/update_user/1").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains(r#"action="/update_user/1""#));
    assert!(page.body.contains(r#"value="Ada""#));
    assert!(page.body.contains(r#"<option value="2" selected>AK</option>"#));
}

#[tokio::test]
async fn test_update_keeps_id_and_changes_fields() {
    let mut ctx = TestContext::new().await;
    let location = registered(&mut ctx).await;

    let fields = with_field(valid_registration(), "city", "Juneau");
    let fields = with_field(fields, "address_line_two", "Suite 9");
    let response = ctx.post_form("/update_user/1", &fields).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some(location.as_str()));
    assert_eq!(ctx.user_count().await, 1);

    let detail = ctx.get(&location).await;
    assert!(detail.body.contains("Juneau"));
    assert!(detail.body.contains("Suite 9"));
    assert!(detail.body.contains("Your changes were saved to the database!"));
}

#[tokio::test]
async fn test_invalid_update_changes_nothing() {
    let mut ctx = TestContext::new().await;
    let location = registered(&mut ctx).await;

    let fields = with_field(valid_registration(), "last_name", "");
    let response = ctx.post_form("/update_user/1", &fields).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("This field is required."));

    let detail = ctx.get(&location).await;
    assert!(detail.body.contains("Lovelace"));
}
