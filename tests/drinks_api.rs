// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Drink catalog routes, authorized against a fixed key set.

mod common;

use axum::http::{Method, StatusCode};
use coffee_shop_server::store::InMemoryStore;
use common::*;
use serde_json::{json, Value};

fn mocha() -> Value {
    json!({
        "title": "mocha",
        "recipe": [
            {"name": "espresso", "color": "brown", "parts": 1},
            {"name": "chocolate", "color": "darkbrown", "parts": 1},
            {"name": "milk", "color": "white", "parts": 2}
        ]
    })
}

#[tokio::test]
async fn public_listing_needs_no_token_and_hides_ingredient_names() {
    let app = static_app(InMemoryStore::with_sample_drink());

    let response = send(&app, Method::GET, "/drinks", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({
            "success": true,
            "drinks": [{"id": 1, "title": "water", "recipe": [{"color": "blue", "parts": 1}]}]
        })
    );
}

#[tokio::test]
async fn detail_listing_requires_permission() {
    let app = static_app(InMemoryStore::with_sample_drink());

    let denied = send(&app, Method::GET, "/drinks-detail", Some(&token(&[])), None).await;
    assert_auth_error(&denied, "permission_denied");

    let allowed = send(&app, Method::GET, "/drinks-detail", Some(&token(BARISTA)), None).await;
    assert_eq!(allowed.status, StatusCode::OK);
    assert_eq!(allowed.body["drinks"][0]["recipe"][0]["name"], "water");
}

#[tokio::test]
async fn manager_can_create_update_and_delete() {
    let app = static_app(InMemoryStore::new());
    let token = token(MANAGER);

    let created = send(&app, Method::POST, "/drinks", Some(&token), Some(mocha())).await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.body["success"], true);
    assert_eq!(created.body["drinks"][0]["id"], 1);
    assert_eq!(created.body["drinks"][0]["title"], "mocha");

    let updated = send(
        &app,
        Method::PATCH,
        "/drinks/1",
        Some(&token),
        Some(json!({"title": "double mocha"})),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["drinks"][0]["title"], "double mocha");
    assert_eq!(updated.body["drinks"][0]["recipe"].as_array().unwrap().len(), 3);

    let deleted = send(&app, Method::DELETE, "/drinks/1", Some(&token), None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body, json!({"success": true, "delete": 1}));

    let listing = send(&app, Method::GET, "/drinks", None, None).await;
    assert_eq!(listing.body["drinks"], json!([]));
}

#[tokio::test]
async fn barista_cannot_mutate() {
    let app = static_app(InMemoryStore::with_sample_drink());
    let token = token(BARISTA);

    let post = send(&app, Method::POST, "/drinks", Some(&token), Some(mocha())).await;
    assert_auth_error(&post, "permission_denied");

    let patch = send(
        &app,
        Method::PATCH,
        "/drinks/1",
        Some(&token),
        Some(json!({"title": "soda"})),
    )
    .await;
    assert_auth_error(&patch, "permission_denied");

    let delete = send(&app, Method::DELETE, "/drinks/1", Some(&token), None).await;
    assert_auth_error(&delete, "permission_denied");

    let listing = send(&app, Method::GET, "/drinks", None, None).await;
    assert_eq!(listing.body["drinks"][0]["title"], "water");
}

#[tokio::test]
async fn authorization_runs_before_resource_lookup() {
    let app = static_app(InMemoryStore::new());

    let response = send(&app, Method::DELETE, "/drinks/42", None, None).await;

    assert_auth_error(&response, "missing_header");
}

#[tokio::test]
async fn unknown_drink_is_not_found() {
    let app = static_app(InMemoryStore::new());
    let token = token(MANAGER);

    let patch = send(
        &app,
        Method::PATCH,
        "/drinks/42",
        Some(&token),
        Some(json!({"title": "soda"})),
    )
    .await;
    assert_eq!(patch.status, StatusCode::NOT_FOUND);
    assert_eq!(
        patch.body,
        json!({"success": false, "error": 404, "message": "resource not found"})
    );

    let delete = send(&app, Method::DELETE, "/drinks/42", Some(&token), None).await;
    assert_eq!(delete.status, StatusCode::NOT_FOUND);

    let bad_id = send(&app, Method::DELETE, "/drinks/espresso", Some(&token), None).await;
    assert_eq!(bad_id.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_bodies_are_rejected() {
    let app = static_app(InMemoryStore::with_sample_drink());
    let token = token(MANAGER);

    let missing_recipe = send(
        &app,
        Method::POST,
        "/drinks",
        Some(&token),
        Some(json!({"title": "latte"})),
    )
    .await;
    assert_eq!(missing_recipe.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(missing_recipe.body["error"], 422);

    let empty_recipe = send(
        &app,
        Method::POST,
        "/drinks",
        Some(&token),
        Some(json!({"title": "latte", "recipe": []})),
    )
    .await;
    assert_eq!(empty_recipe.status, StatusCode::UNPROCESSABLE_ENTITY);

    let duplicate = send(
        &app,
        Method::POST,
        "/drinks",
        Some(&token),
        Some(json!({"title": "water", "recipe": [{"name": "water", "color": "blue", "parts": 1}]})),
    )
    .await;
    assert_eq!(duplicate.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn non_json_body_is_bad_request() {
    let app = static_app(InMemoryStore::new());

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/drinks")
        .header("authorization", format!("Bearer {}", token(MANAGER)))
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listings_are_paginated_by_ten() {
    let app = static_app(InMemoryStore::new());
    let token = token(MANAGER);

    for i in 1..=12 {
        let body = json!({
            "title": format!("drink {i}"),
            "recipe": [{"name": "water", "color": "blue", "parts": i}]
        });
        let created = send(&app, Method::POST, "/drinks", Some(&token), Some(body)).await;
        assert_eq!(created.status, StatusCode::OK);
    }

    let first = send(&app, Method::GET, "/drinks", None, None).await;
    assert_eq!(first.body["drinks"].as_array().unwrap().len(), 10);

    let second = send(&app, Method::GET, "/drinks?page=2", None, None).await;
    let drinks = second.body["drinks"].as_array().unwrap();
    assert_eq!(drinks.len(), 2);
    assert_eq!(drinks[0]["id"], 11);

    let detail = send(&app, Method::GET, "/drinks-detail?page=2", Some(&token), None).await;
    assert_eq!(detail.body["drinks"].as_array().unwrap().len(), 2);

    let garbage = send(&app, Method::GET, "/drinks?page=abc", None, None).await;
    assert_eq!(garbage.body["drinks"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn unmatched_route_uses_error_envelope() {
    let app = static_app(InMemoryStore::new());

    let response = send(&app, Method::GET, "/coffee", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["error"], 404);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = static_app(InMemoryStore::new());

    let response = send(&app, Method::GET, "/api-doc/openapi.json", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["paths"]["/drinks"].is_object());
}
