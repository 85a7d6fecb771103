//! End-to-end HTTP tests against a real, migrated Postgres database
//! (spec §8 concrete scenarios). Requires `DATABASE_URL` to point at a
//! scratch database; falls back to a local default.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

mod helpers;
use helpers::{cleanup, test_app};

async fn send(router: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body: Value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}

fn import_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/imports")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn import_root_then_two_children_computes_floored_mean() {
    let (router, pool) = test_app().await;

    let root = Uuid::new_v4();
    let child_a = Uuid::new_v4();
    let child_b = Uuid::new_v4();

    let batch = json!({
        "items": [
            {"id": root, "name": "root", "parentId": null, "type": "CATEGORY", "price": null},
        ],
        "updateDate": "2026-02-01T00:00:00Z",
    });
    let (status, _) = send(&router, import_request(batch)).await;
    assert_eq!(status, StatusCode::OK);

    let batch = json!({
        "items": [
            {"id": child_a, "name": "a", "parentId": root, "type": "OFFER", "price": 79999},
            {"id": child_b, "name": "b", "parentId": root, "type": "OFFER", "price": 59999},
        ],
        "updateDate": "2026-02-01T00:00:01Z",
    });
    let (status, _) = send(&router, import_request(batch)).await;
    assert_eq!(status, StatusCode::OK);

    let request = Request::builder().uri(format!("/nodes/{root}")).body(Body::empty()).unwrap();
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], 69999);
    assert_eq!(body["children"].as_array().unwrap().len(), 2);

    cleanup(&pool).await;
}

#[tokio::test]
async fn deleting_an_offer_recomputes_ancestor_price() {
    let (router, pool) = test_app().await;

    let root = Uuid::new_v4();
    let offer_a = Uuid::new_v4();
    let offer_b = Uuid::new_v4();

    let batch = json!({
        "items": [
            {"id": root, "name": "root", "parentId": null, "type": "CATEGORY", "price": null},
            {"id": offer_a, "name": "a", "parentId": root, "type": "OFFER", "price": 1000},
            {"id": offer_b, "name": "b", "parentId": root, "type": "OFFER", "price": 3000},
        ],
        "updateDate": "2026-02-01T00:00:00Z",
    });
    let (status, _) = send(&router, import_request(batch)).await;
    assert_eq!(status, StatusCode::OK);

    let request = Request::builder().uri(format!("/nodes/{root}")).body(Body::empty()).unwrap();
    let (_, body) = send(&router, request).await;
    assert_eq!(body["price"], 2000);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/delete/{offer_a}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);

    let request = Request::builder().uri(format!("/nodes/{root}")).body(Body::empty()).unwrap();
    let (_, body) = send(&router, request).await;
    assert_eq!(body["price"], 3000);
    assert_eq!(body["children"].as_array().unwrap().len(), 1);

    cleanup(&pool).await;
}

#[tokio::test]
async fn deleting_a_nested_category_cascades_through_its_offers() {
    // root -> sub -> offer: deleting `sub` must tear down the hierarchy
    // edge from `root` down to `offer` too, not just the edges touching
    // `sub` itself, or the subsequent unit-row delete trips the
    // `hierarchy_edges.descendant_id` FK and the whole delete 500s.
    let (router, pool) = test_app().await;

    let root = Uuid::new_v4();
    let sub = Uuid::new_v4();
    let offer = Uuid::new_v4();
    let sibling_offer = Uuid::new_v4();

    let batch = json!({
        "items": [
            {"id": root, "name": "root", "parentId": null, "type": "CATEGORY", "price": null},
            {"id": sub, "name": "sub", "parentId": root, "type": "CATEGORY", "price": null},
            {"id": offer, "name": "o", "parentId": sub, "type": "OFFER", "price": 1000},
            {"id": sibling_offer, "name": "s", "parentId": root, "type": "OFFER", "price": 3000},
        ],
        "updateDate": "2026-02-01T00:00:00Z",
    });
    let (status, _) = send(&router, import_request(batch)).await;
    assert_eq!(status, StatusCode::OK);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/delete/{sub}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);

    let request = Request::builder().uri(format!("/nodes/{root}")).body(Body::empty()).unwrap();
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], 3000);
    assert_eq!(body["children"].as_array().unwrap().len(), 1);

    let request = Request::builder().uri(format!("/nodes/{offer}")).body(Body::empty()).unwrap();
    let (status, _) = send(&router, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let request = Request::builder().uri(format!("/nodes/{sub}")).body(Body::empty()).unwrap();
    let (status, _) = send(&router, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    cleanup(&pool).await;
}

#[tokio::test]
async fn reparenting_an_offer_moves_its_price_between_categories() {
    let (router, pool) = test_app().await;

    let people_root = Uuid::new_v4();
    let goods_root = Uuid::new_v4();
    let offer = Uuid::new_v4();
    let goods_offer = Uuid::new_v4();

    let batch = json!({
        "items": [
            {"id": people_root, "name": "people", "parentId": null, "type": "CATEGORY", "price": null},
            {"id": goods_root, "name": "goods", "parentId": null, "type": "CATEGORY", "price": null},
            {"id": offer, "name": "moved", "parentId": people_root, "type": "OFFER", "price": 49000},
            {"id": goods_offer, "name": "fixed", "parentId": goods_root, "type": "OFFER", "price": 1000},
        ],
        "updateDate": "2026-02-01T00:00:00Z",
    });
    let (status, _) = send(&router, import_request(batch)).await;
    assert_eq!(status, StatusCode::OK);

    let batch = json!({
        "items": [
            {"id": offer, "name": "moved", "parentId": goods_root, "type": "OFFER", "price": 49000},
        ],
        "updateDate": "2026-02-01T00:00:01Z",
    });
    let (status, _) = send(&router, import_request(batch)).await;
    assert_eq!(status, StatusCode::OK);

    let request = Request::builder().uri(format!("/nodes/{goods_root}")).body(Body::empty()).unwrap();
    let (_, body) = send(&router, request).await;
    assert_eq!(body["price"], 25000);

    let request = Request::builder().uri(format!("/nodes/{people_root}")).body(Body::empty()).unwrap();
    let (_, body) = send(&router, request).await;
    assert!(body["price"].is_null());

    cleanup(&pool).await;
}

#[tokio::test]
async fn importing_a_child_before_its_new_parent_category_still_succeeds() {
    let (router, pool) = test_app().await;

    let root = Uuid::new_v4();
    let offer = Uuid::new_v4();

    // The offer is listed before the category it's parented to.
    let batch = json!({
        "items": [
            {"id": offer, "name": "o", "parentId": root, "type": "OFFER", "price": 12345},
            {"id": root, "name": "root", "parentId": null, "type": "CATEGORY", "price": null},
        ],
        "updateDate": "2026-02-01T00:00:00Z",
    });
    let (status, body) = send(&router, import_request(batch)).await;
    assert_eq!(status, StatusCode::OK, "body: {body}");

    let request = Request::builder().uri(format!("/nodes/{root}")).body(Body::empty()).unwrap();
    let (_, body) = send(&router, request).await;
    assert_eq!(body["price"], 12345);
    assert_eq!(body["children"].as_array().unwrap().len(), 1);

    cleanup(&pool).await;
}

#[tokio::test]
async fn category_with_price_is_rejected() {
    let (router, pool) = test_app().await;

    let category = Uuid::new_v4();
    let batch = json!({
        "items": [
            {"id": category, "name": "bad", "parentId": null, "type": "CATEGORY", "price": 100},
        ],
        "updateDate": "2026-02-01T00:00:00Z",
    });
    let (status, body) = send(&router, import_request(batch)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["code"].as_u64().unwrap() == 400);

    cleanup(&pool).await;
}

#[tokio::test]
async fn changing_an_existing_units_type_is_rejected() {
    let (router, pool) = test_app().await;

    let id = Uuid::new_v4();
    let batch = json!({
        "items": [{"id": id, "name": "x", "parentId": null, "type": "OFFER", "price": 1}],
        "updateDate": "2026-02-01T00:00:00Z",
    });
    let (status, _) = send(&router, import_request(batch)).await;
    assert_eq!(status, StatusCode::OK);

    let batch = json!({
        "items": [{"id": id, "name": "x", "parentId": null, "type": "CATEGORY", "price": null}],
        "updateDate": "2026-02-01T00:00:01Z",
    });
    let (status, _) = send(&router, import_request(batch)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    cleanup(&pool).await;
}

#[tokio::test]
async fn statistic_uses_half_open_interval() {
    let (router, pool) = test_app().await;

    let offer = Uuid::new_v4();
    let batch = json!({
        "items": [{"id": offer, "name": "o", "parentId": null, "type": "OFFER", "price": 100}],
        "updateDate": "2026-02-01T15:00:00Z",
    });
    let (status, _) = send(&router, import_request(batch)).await;
    assert_eq!(status, StatusCode::OK);

    let request = Request::builder()
        .uri(format!("/node/{offer}/statistic?dateStart=2026-02-01T14:00:00Z&dateEnd=2026-02-01T15:00:01Z"))
        .body(Body::empty())
        .unwrap();
    let (_, body) = send(&router, request).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let request = Request::builder()
        .uri(format!("/node/{offer}/statistic?dateStart=2026-02-01T14:00:00Z&dateEnd=2026-02-01T15:00:00Z"))
        .body(Body::empty())
        .unwrap();
    let (_, body) = send(&router, request).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 0);

    cleanup(&pool).await;
}

#[tokio::test]
async fn unknown_node_returns_not_found() {
    let (router, _pool) = test_app().await;
    let request = Request::builder().uri(format!("/nodes/{}", Uuid::new_v4())).body(Body::empty()).unwrap();
    let (status, _) = send(&router, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
