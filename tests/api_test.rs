//! HTTP surface: routing, status codes and the `{"error": ...}` body.
//!
//! Runs the real route table against an in-memory database.
//! Run with: `cargo test --test api_test`
mod common;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use floormatch_backend::Storage;
use floormatch_backend::cache::{CacheConfig, IdentityCache};
use floormatch_backend::handlers;
use floormatch_backend::models::tariffs::TariffCatalog;

macro_rules! app {
    ($storage:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($storage))
                .app_data(web::Data::new(IdentityCache::new(&CacheConfig::default())))
                .app_data(web::Data::new(TariffCatalog::default()))
                .service(web::scope("/api").configure(handlers::init_routes)),
        )
        .await
    };
}

/// Send a request and return the status with the parsed JSON body.
macro_rules! call {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

#[actix_web::test]
async fn tariffs_are_served_without_storage() {
    let app = app!(Storage::disabled());

    let (status, body) = call!(app, test::TestRequest::get().uri("/api/tariffs"));
    assert_eq!(status, StatusCode::OK);
    for key in ["econom", "comfort", "business", "premium", "universal", "self-leveling"] {
        assert!(body.get(key).is_some(), "missing tariff {key}");
    }
    assert_eq!(body["econom"]["name"], json!("ЭКОНОМ"));
    assert_eq!(body["econom"]["days"], json!("28 дней"));
    assert_eq!(body["business"]["isAddon"], json!(true));
    assert!(body["econom"].get("isAddon").is_none());
    assert!(body["comfort"]["priceRange"]["min"].is_u64());
}

#[actix_web::test]
async fn storage_backed_routes_answer_503_when_disabled() {
    let app = app!(Storage::disabled());

    let (status, body) = call!(app, test::TestRequest::get().uri("/api/user/42"));
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].is_string());

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/orders")
            .set_json(json!({ "external_id": 42, "category": "comfort" }))
    );
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn user_is_created_then_updated() {
    let app = app!(Storage::new(common::setup_db().await));

    let (status, body) = call!(
        app,
        test::TestRequest::post().uri("/api/user").set_json(json!({
            "telegram_id": 777,
            "role": "client",
            "name": "Irina",
        }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["external_id"], json!(777));
    assert_eq!(body["user"]["role"], json!("client"));

    // Prime the cache, then change the name; the next read must see it.
    call!(app, test::TestRequest::get().uri("/api/user/777"));
    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/user")
            .set_json(json!({ "external_id": 777, "name": "Irina K." }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], json!("Irina K."));

    let (status, body) = call!(app, test::TestRequest::get().uri("/api/user/777"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], json!("Irina K."));
    assert_eq!(body["profile"], Value::Null);
}

#[actix_web::test]
async fn user_creation_without_role_is_rejected() {
    let app = app!(Storage::new(common::setup_db().await));

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/user")
            .set_json(json!({ "external_id": 778, "name": "Anon" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Role"));
}

#[actix_web::test]
async fn bad_and_unknown_ids() {
    let app = app!(Storage::new(common::setup_db().await));

    let (status, body) = call!(app, test::TestRequest::get().uri("/api/user/abc"));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = call!(app, test::TestRequest::get().uri("/api/user/-5"));
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call!(app, test::TestRequest::get().uri("/api/user/9999"));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, _) = call!(app, test::TestRequest::get().uri("/api/orders/xyz"));
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call!(app, test::TestRequest::get().uri("/api/orders/31337"));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn malformed_json_gets_error_body() {
    let app = app!(Storage::new(common::setup_db().await));

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/user")
            .insert_header(("content-type", "application/json"))
            .set_payload("{ not json")
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn search_requires_a_category() {
    let app = app!(Storage::new(common::setup_db().await));

    let (status, body) = call!(app, test::TestRequest::get().uri("/api/contractors/search"));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = call!(
        app,
        test::TestRequest::get().uri("/api/contractors/search?category=%20%20")
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn profile_update_is_for_contractors_only() {
    let db = common::setup_db().await;
    common::create_client(&db, 501).await;
    common::create_user(
        &db,
        502,
        floormatch_backend::models::users::Roles::Contractor,
        "Sergey",
    )
    .await;
    let app = app!(Storage::new(db));

    let (status, _) = call!(
        app,
        test::TestRequest::post().uri("/api/contractor/profile").set_json(json!({
            "external_id": 501,
            "categories": ["comfort"],
            "is_active": true,
        }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call!(
        app,
        test::TestRequest::post().uri("/api/contractor/profile").set_json(json!({
            "external_id": 502,
            "experience_years": -1,
            "categories": [],
            "is_active": true,
        }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call!(
        app,
        test::TestRequest::post().uri("/api/contractor/profile").set_json(json!({
            "external_id": 502,
            "experience_years": 7,
            "categories": [" premium ", "comfort", "premium"],
            "is_active": true,
        }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["categories"], json!(["comfort", "premium"]));
    assert_eq!(body["profile"]["experience_years"], json!(7));
    assert_eq!(body["profile"]["completed_orders"], json!(0));
}

#[actix_web::test]
async fn order_flow_over_http() {
    let db = common::setup_db().await;
    common::create_client(&db, 601).await;
    common::create_contractor(&db, 602, &["comfort"]).await;
    common::create_contractor(&db, 603, &["comfort"]).await;
    let app = app!(Storage::new(db));

    // Contractors cannot place orders.
    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/orders")
            .set_json(json!({ "external_id": 602, "category": "comfort" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call!(
        app,
        test::TestRequest::post().uri("/api/orders").set_json(json!({
            "telegram_id": 601,
            "category": "comfort",
            "area": 42.0,
            "address": "Gagarina 3",
        }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["order"]["status"], json!("pending"));
    assert_eq!(body["order"]["client_external_id"], json!(601));
    let order_id = body["order"]["id"].as_i64().unwrap();

    let (status, body) = call!(
        app,
        test::TestRequest::get().uri("/api/contractors/search?category=comfort")
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contractors"].as_array().unwrap().len(), 2);

    let (status, body) = call!(
        app,
        test::TestRequest::get().uri("/api/contractor/pending-orders/602")
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orders"][0]["id"], json!(order_id));

    // Clients have no pending feed.
    let (status, _) = call!(
        app,
        test::TestRequest::get().uri("/api/contractor/pending-orders/601")
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let accept = format!("/api/orders/{order_id}/accept");
    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri(&accept)
            .set_json(json!({ "external_id": 602 }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["status"], json!("accepted"));
    assert_eq!(body["order"]["contractor_external_id"], json!(602));

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri(&accept)
            .set_json(json!({ "external_id": 603 }))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());

    // The busy contractor drops out of search.
    let (_, body) = call!(
        app,
        test::TestRequest::get().uri("/api/contractors/search?category=comfort")
    );
    let ids: Vec<i64> = body["contractors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["external_id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![603]);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/orders/{order_id}/complete"))
            .set_json(json!({ "external_id": 602 }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["status"], json!("completed"));

    let (status, body) = call!(
        app,
        test::TestRequest::get().uri("/api/contractor/orders/602")
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orders"].as_array().unwrap().len(), 1);

    let (_, body) = call!(app, test::TestRequest::get().uri("/api/user/602"));
    assert_eq!(body["profile"]["completed_orders"], json!(1));
    assert_eq!(body["profile"]["current_order_id"], Value::Null);

    // Completed orders cannot be rejected.
    let (status, _) = call!(
        app,
        test::TestRequest::post().uri(&format!("/api/orders/{order_id}/reject"))
    );
    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn reject_cancels_a_pending_order() {
    let db = common::setup_db().await;
    common::create_client(&db, 701).await;
    let app = app!(Storage::new(db));

    let (_, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/orders")
            .set_json(json!({ "external_id": 701, "category": "econom" }))
    );
    let order_id = body["order"]["id"].as_i64().unwrap();

    let (status, body) = call!(
        app,
        test::TestRequest::post().uri(&format!("/api/orders/{order_id}/reject"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["order"]["status"], json!("cancelled"));

    let (status, body) = call!(
        app,
        test::TestRequest::get().uri(&format!("/api/orders/{order_id}"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["status"], json!("cancelled"));
}
