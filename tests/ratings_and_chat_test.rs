mod common;

use axum::http::{Method, StatusCode};
use common::{decimal, TestApp, TestUser};
use glazier_api::entities::service;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use uuid::Uuid;

async fn completed_order(app: &TestApp, customer: &TestUser, service: &service::Model) -> (Uuid, Uuid) {
    let staff = app.staff().await;
    let order_id = app.place_order(customer, service, 1).await;
    let scheduled = app
        .request(
            Method::PATCH,
            &format!("/api/admin/orders/{order_id}/schedule"),
            Some(json!({ "scheduled_at": "2026-12-01T08:00:00Z" })),
            Some(&staff.token),
        )
        .await;
    assert_eq!(scheduled.status, StatusCode::OK, "{}", scheduled.body);
    let done = app
        .request(
            Method::PATCH,
            &format!("/api/admin/orders/{order_id}/complete"),
            None,
            Some(&staff.token),
        )
        .await;
    assert_eq!(done.status, StatusCode::OK, "{}", done.body);

    let detail = app
        .request(Method::GET, &format!("/api/orders/{order_id}"), None, Some(&customer.token))
        .await;
    let item_id = detail.data()["items"][0]["id"]
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .expect("order item id");
    (order_id, item_id)
}

fn rating_body(service: &service::Model, order_id: Uuid, item_id: Uuid, rating: i16) -> Value {
    json!({
        "service_id": service.id,
        "order_id": order_id,
        "order_item_id": item_id,
        "rating": rating,
        "comment": "Clean installation",
    })
}

#[tokio::test]
async fn customer_rates_completed_order_once() {
    let app = TestApp::new().await;
    let customer = app.customer().await;
    let service = app.seed_service("Bay Window", dec!(2500)).await;
    let (order_id, item_id) = completed_order(&app, &customer, &service).await;

    let rated = app
        .request(
            Method::POST,
            "/api/ratings/service",
            Some(rating_body(&service, order_id, item_id, 4)),
            Some(&customer.token),
        )
        .await;
    assert_eq!(rated.status, StatusCode::CREATED, "{}", rated.body);

    let again = app
        .request(
            Method::POST,
            "/api/ratings/service",
            Some(rating_body(&service, order_id, item_id, 5)),
            Some(&customer.token),
        )
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);

    let summary = app
        .request(Method::GET, &format!("/api/ratings/service/{}", service.id), None, None)
        .await;
    assert_eq!(summary.status, StatusCode::OK);
    assert_eq!(summary.data()["summary"]["count"], 1);
    assert_eq!(decimal(&summary.data()["summary"]["average"]), dec!(4));

    let listing = app
        .request(Method::GET, &format!("/api/services/{}", service.id), None, None)
        .await;
    assert_eq!(listing.data()["rating"]["count"], 1);
}

#[tokio::test]
async fn ratings_are_limited_to_own_completed_orders() {
    let app = TestApp::new().await;
    let customer = app.customer().await;
    let stranger = app.customer().await;
    let service = app.seed_service("Pivot Door", dec!(3100)).await;
    let other_service = app.seed_service("Louver", dec!(90)).await;

    let pending_order = app.place_order(&customer, &service, 1).await;
    let detail = app
        .request(Method::GET, &format!("/api/orders/{pending_order}"), None, Some(&customer.token))
        .await;
    let pending_item = Uuid::parse_str(detail.data()["items"][0]["id"].as_str().unwrap()).unwrap();
    let not_done = app
        .request(
            Method::POST,
            "/api/ratings/service",
            Some(rating_body(&service, pending_order, pending_item, 5)),
            Some(&customer.token),
        )
        .await;
    assert_eq!(not_done.status, StatusCode::BAD_REQUEST);
    assert_eq!(not_done.body["message"], "You can only rate completed orders");

    let (order_id, item_id) = completed_order(&app, &customer, &service).await;
    let foreign = app
        .request(
            Method::POST,
            "/api/ratings/service",
            Some(rating_body(&service, order_id, item_id, 5)),
            Some(&stranger.token),
        )
        .await;
    assert_eq!(foreign.status, StatusCode::FORBIDDEN);

    let wrong_service = app
        .request(
            Method::POST,
            "/api/ratings/service",
            Some(rating_body(&other_service, order_id, item_id, 5)),
            Some(&customer.token),
        )
        .await;
    assert_eq!(wrong_service.status, StatusCode::BAD_REQUEST);

    let out_of_range = app
        .request(
            Method::POST,
            "/api/ratings/service",
            Some(rating_body(&service, order_id, item_id, 6)),
            Some(&customer.token),
        )
        .await;
    assert_eq!(out_of_range.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn customer_and_staff_converse() {
    let app = TestApp::new().await;
    let customer = app.customer().await;
    let staff = app.staff().await;

    let opened = app
        .request(
            Method::POST,
            "/api/messages",
            Some(json!({ "content": "Hi, can you install on weekends?" })),
            Some(&customer.token),
        )
        .await;
    assert_eq!(opened.status, StatusCode::CREATED, "{}", opened.body);
    let conversation_id = opened.data()["conversation_id"].as_str().unwrap().to_string();
    let customer_message = opened.id();

    let follow_up = app
        .request(
            Method::POST,
            "/api/messages",
            Some(json!({ "content": "Saturday mornings ideally" })),
            Some(&customer.token),
        )
        .await;
    assert_eq!(follow_up.data()["conversation_id"], conversation_id.as_str());

    let inbox = app.request(Method::GET, "/api/messages", None, Some(&staff.token)).await;
    let conversations = inbox.data().as_array().unwrap();
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0]["unread_count"], 2);
    assert_eq!(conversations[0]["customer_name"], "Maria Santos");

    let no_target = app
        .request(
            Method::POST,
            "/api/messages",
            Some(json!({ "content": "Hello" })),
            Some(&staff.token),
        )
        .await;
    assert_eq!(no_target.status, StatusCode::BAD_REQUEST);
    assert_eq!(no_target.body["message"], "Please choose a conversation to reply to");

    let reply = app
        .request(
            Method::POST,
            "/api/messages",
            Some(json!({ "conversation_id": conversation_id, "content": "Yes, we do." })),
            Some(&staff.token),
        )
        .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    let staff_message = reply.id();

    let thread = app
        .request(
            Method::GET,
            &format!("/api/messages/{conversation_id}"),
            None,
            Some(&customer.token),
        )
        .await;
    assert_eq!(thread.data().as_array().unwrap().len(), 3);

    let own_read = app
        .request(
            Method::PATCH,
            &format!("/api/messages/{customer_message}/read"),
            None,
            Some(&customer.token),
        )
        .await;
    assert_eq!(own_read.status, StatusCode::FORBIDDEN);

    let read = app
        .request(
            Method::PATCH,
            &format!("/api/messages/{customer_message}/read"),
            None,
            Some(&staff.token),
        )
        .await;
    assert_eq!(read.status, StatusCode::OK);
    assert_eq!(read.data()["is_read"], true);

    let delete_other = app
        .request(
            Method::DELETE,
            &format!("/api/messages/{staff_message}"),
            None,
            Some(&customer.token),
        )
        .await;
    assert_eq!(delete_other.status, StatusCode::FORBIDDEN);

    let delete_own = app
        .request(
            Method::DELETE,
            &format!("/api/messages/{customer_message}"),
            None,
            Some(&customer.token),
        )
        .await;
    assert_eq!(delete_own.status, StatusCode::OK);
}

#[tokio::test]
async fn customers_cannot_read_other_conversations() {
    let app = TestApp::new().await;
    let alice = app.customer().await;
    let bob = app.customer().await;

    let opened = app
        .request(
            Method::POST,
            "/api/messages",
            Some(json!({ "content": "Quote for a door?" })),
            Some(&alice.token),
        )
        .await;
    let conversation_id = opened.data()["conversation_id"].as_str().unwrap().to_string();

    let peek = app
        .request(
            Method::GET,
            &format!("/api/messages/{conversation_id}"),
            None,
            Some(&bob.token),
        )
        .await;
    assert_eq!(peek.status, StatusCode::FORBIDDEN);

    let blank = app
        .request(
            Method::POST,
            "/api/messages",
            Some(json!({ "content": "   " })),
            Some(&bob.token),
        )
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
}
