//! Back-office flows: catalog, suppliers and materials, calendar tasks,
//! staff profiles, quotations and feedback.

mod common;

use std::sync::atomic::Ordering;

use axum::http::{Method, StatusCode};
use common::{decimal, TestApp};
use glazier_api::entities::{user, UserRole};
use rust_decimal_macros::dec;
use sea_orm::EntityTrait;
use serde_json::json;

#[tokio::test]
async fn catalog_names_are_unique_and_ordered_services_are_kept() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let customer = app.customer().await;

    let created = app
        .request(
            Method::POST,
            "/api/admin/services",
            Some(json!({
                "name": "Tempered Glass Partition",
                "description": "Office partitions",
                "category": "Glass",
                "price": "4500",
                "colors": ["Clear", "Frosted", "Clear"],
            })),
            Some(&admin.token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    assert_eq!(created.data()["colors"], json!(["Clear", "Frosted"]));
    let service_id = created.id();

    let duplicate = app
        .request(
            Method::POST,
            "/api/admin/services",
            Some(json!({
                "name": "Tempered Glass Partition",
                "description": "Again",
                "category": "Glass",
                "price": "10",
            })),
            Some(&admin.token),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let public = app.request(Method::GET, "/api/services?category=Glass", None, None).await;
    assert_eq!(public.status, StatusCode::OK);
    assert_eq!(public.data().as_array().unwrap().len(), 1);

    let service = glazier_api::entities::service::Entity::find_by_id(service_id)
        .one(&*app.state.db)
        .await
        .unwrap()
        .unwrap();
    let order = app
        .request(
            Method::POST,
            "/api/orders",
            Some(json!({
                "items": [{ "service_id": service.id, "color": "Frosted", "quantity": 1, "price": "4500" }],
            })),
            Some(&customer.token),
        )
        .await;
    assert_eq!(order.status, StatusCode::CREATED);

    let delete = app
        .request(
            Method::DELETE,
            &format!("/api/admin/services/{service_id}"),
            None,
            Some(&admin.token),
        )
        .await;
    assert_eq!(delete.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn suppliers_and_materials_enforce_uniqueness_and_references() {
    let app = TestApp::new().await;
    let staff = app.staff().await;

    let supplier = app
        .request(
            Method::POST,
            "/api/admin/suppliers",
            Some(json!({ "name": "Metro Aluminum", "contact_person": "Tess Reyes", "email": "sales@metro.ph" })),
            Some(&staff.token),
        )
        .await;
    assert_eq!(supplier.status, StatusCode::CREATED, "{}", supplier.body);
    let supplier_id = supplier.id();

    let same_name = app
        .request(
            Method::POST,
            "/api/admin/suppliers",
            Some(json!({ "name": "Metro Aluminum", "contact_person": "Someone" })),
            Some(&staff.token),
        )
        .await;
    assert_eq!(same_name.status, StatusCode::CONFLICT);

    let material_body = json!({
        "name": "6mm Clear Glass",
        "supplier_id": supplier_id,
        "unit": "sheet",
        "quantity": 10,
        "unit_price": "1200",
        "reorder_level": 5,
    });
    let material = app
        .request(Method::POST, "/api/admin/materials", Some(material_body.clone()), Some(&staff.token))
        .await;
    assert_eq!(material.status, StatusCode::CREATED, "{}", material.body);
    let material_id = material.id();

    let duplicate = app
        .request(Method::POST, "/api/admin/materials", Some(material_body), Some(&staff.token))
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(duplicate.body["message"], "Material already exists for this supplier");

    let consumed = app
        .request(
            Method::PATCH,
            &format!("/api/admin/materials/{material_id}/stock"),
            Some(json!({ "delta": -6 })),
            Some(&staff.token),
        )
        .await;
    assert_eq!(consumed.status, StatusCode::OK);
    assert_eq!(consumed.data()["quantity"], 4);

    let overdrawn = app
        .request(
            Method::PATCH,
            &format!("/api/admin/materials/{material_id}/stock"),
            Some(json!({ "delta": -5 })),
            Some(&staff.token),
        )
        .await;
    assert_eq!(overdrawn.status, StatusCode::BAD_REQUEST);

    let low = app
        .request(Method::GET, "/api/admin/materials/low-stock", None, Some(&staff.token))
        .await;
    assert_eq!(low.data().as_array().unwrap().len(), 1);

    let referenced = app
        .request(
            Method::DELETE,
            &format!("/api/admin/suppliers/{supplier_id}"),
            None,
            Some(&staff.token),
        )
        .await;
    assert_eq!(referenced.status, StatusCode::CONFLICT);

    let removed = app
        .request(
            Method::DELETE,
            &format!("/api/admin/materials/{material_id}"),
            None,
            Some(&staff.token),
        )
        .await;
    assert_eq!(removed.status, StatusCode::OK);

    let now_free = app
        .request(
            Method::DELETE,
            &format!("/api/admin/suppliers/{supplier_id}"),
            None,
            Some(&staff.token),
        )
        .await;
    assert_eq!(now_free.status, StatusCode::OK);
}

#[tokio::test]
async fn calendar_lists_overlapping_tasks() {
    let app = TestApp::new().await;
    let staff = app.staff().await;

    let bad_window = app
        .request(
            Method::POST,
            "/api/admin/tasks",
            Some(json!({
                "title": "Measure site",
                "start_at": "2026-11-02T10:00:00Z",
                "end_at": "2026-11-02T09:00:00Z",
            })),
            Some(&staff.token),
        )
        .await;
    assert_eq!(bad_window.status, StatusCode::BAD_REQUEST);

    for (title, start, end) in [
        ("Install windows", "2026-11-02T08:00:00Z", "2026-11-02T12:00:00Z"),
        ("Deliver glass", "2026-11-09T08:00:00Z", "2026-11-09T10:00:00Z"),
    ] {
        let created = app
            .request(
                Method::POST,
                "/api/admin/tasks",
                Some(json!({ "title": title, "start_at": start, "end_at": end })),
                Some(&staff.token),
            )
            .await;
        assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    }

    let week = app
        .request(
            Method::GET,
            "/api/admin/tasks?from=2026-11-02T11:00:00Z&to=2026-11-08T00:00:00Z",
            None,
            Some(&staff.token),
        )
        .await;
    assert_eq!(week.status, StatusCode::OK, "{}", week.body);
    let tasks = week.data().as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Install windows");
}

#[tokio::test]
async fn staff_profiles_promote_and_demote_accounts() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let recruit = app.customer().await;

    let created = app
        .request(
            Method::POST,
            "/api/admin/staff",
            Some(json!({ "user_id": recruit.id, "position": "Installer", "contact_number": "09181112222" })),
            Some(&admin.token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    assert_eq!(created.data()["role"], "Staff");
    let staff_id = created.id();

    let again = app
        .request(
            Method::POST,
            "/api/admin/staff",
            Some(json!({ "user_id": recruit.id, "position": "Installer", "contact_number": "09181112222" })),
            Some(&admin.token),
        )
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);

    let removed = app
        .request(
            Method::DELETE,
            &format!("/api/admin/staff/{staff_id}"),
            None,
            Some(&admin.token),
        )
        .await;
    assert_eq!(removed.status, StatusCode::OK);

    let account = user::Entity::find_by_id(recruit.id)
        .one(&*app.state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.role, UserRole::Customer);
}

#[tokio::test]
async fn quotation_update_survives_mail_failure() {
    let app = TestApp::new().await;
    let customer = app.customer().await;
    let staff = app.staff().await;

    let requested = app
        .request(
            Method::POST,
            "/api/quotations",
            Some(json!({
                "name": "Maria Santos",
                "email": "maria@example.com",
                "phone": "09171234567",
                "details": "Sliding doors for a balcony",
                "dimensions": "2.4m x 2.1m",
            })),
            Some(&customer.token),
        )
        .await;
    assert_eq!(requested.status, StatusCode::CREATED, "{}", requested.body);
    assert_eq!(requested.data()["status"], "Pending");
    let quotation_id = requested.id();

    app.mailer.fail.store(true, Ordering::SeqCst);
    let approved = app
        .request(
            Method::PATCH,
            &format!("/api/admin/quotations/{quotation_id}/status"),
            Some(json!({ "status": "Approved", "estimated_price": "18500", "note": "Includes installation" })),
            Some(&staff.token),
        )
        .await;
    assert_eq!(approved.status, StatusCode::OK, "{}", approved.body);
    assert_eq!(approved.data()["email_sent"], false);
    assert_eq!(approved.data()["quotation"]["status"], "Approved");
    assert_eq!(decimal(&approved.data()["quotation"]["estimated_price"]), dec!(18500));

    app.mailer.fail.store(false, Ordering::SeqCst);
    let completed = app
        .request(
            Method::PATCH,
            &format!("/api/admin/quotations/{quotation_id}/status"),
            Some(json!({ "status": "Completed" })),
            Some(&staff.token),
        )
        .await;
    assert_eq!(completed.data()["email_sent"], true);
    assert_eq!(app.mailer.sent.lock().unwrap().len(), 1);

    let backwards = app
        .request(
            Method::PATCH,
            &format!("/api/admin/quotations/{quotation_id}/status"),
            Some(json!({ "status": "Pending" })),
            Some(&staff.token),
        )
        .await;
    assert_eq!(backwards.status, StatusCode::BAD_REQUEST);

    let mine = app
        .request(Method::GET, "/api/quotations", None, Some(&customer.token))
        .await;
    assert_eq!(mine.data().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn feedback_is_collected_for_staff() {
    let app = TestApp::new().await;
    let customer = app.customer().await;
    let stranger = app.customer().await;
    let staff = app.staff().await;
    let service = app.seed_service("Kitchen Cabinet Glass", dec!(700)).await;
    let order_id = app.place_order(&customer, &service, 1).await;

    let sent = app
        .request(
            Method::POST,
            "/api/feedback",
            Some(json!({ "message": "Great crew", "order_id": order_id })),
            Some(&customer.token),
        )
        .await;
    assert_eq!(sent.status, StatusCode::CREATED, "{}", sent.body);

    let foreign = app
        .request(
            Method::POST,
            "/api/feedback",
            Some(json!({ "message": "Not mine", "order_id": order_id })),
            Some(&stranger.token),
        )
        .await;
    assert_eq!(foreign.status, StatusCode::FORBIDDEN);

    let listed = app
        .request(Method::GET, "/api/admin/feedback", None, Some(&staff.token))
        .await;
    assert_eq!(listed.data().as_array().unwrap().len(), 1);
}
