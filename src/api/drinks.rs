// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Drink catalog endpoints.
//!
//! Listing the public short form is open to everyone; the detail view and
//! every mutation require a permission from the caller's access token.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    auth::{Authorized, DeleteDrinks, GetDrinksDetail, PatchDrinks, PostDrinks},
    error::ApiError,
    models::{
        CreateDrinkRequest, DeleteDrinkResponse, DrinkId, DrinkShort, DrinksResponse,
        DrinksShortResponse, UpdateDrinkRequest,
    },
    state::AppState,
};

/// Page size for drink listings.
pub const MAX_DRINKS_PER_PAGE: usize = 10;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number (default 1).
    pub page: Option<u32>,
}

/// Page number from the query string. Anything unparseable means page 1.
fn page_number(query: Result<Query<PageQuery>, QueryRejection>) -> u32 {
    query.ok().and_then(|Query(q)| q.page).unwrap_or(1)
}

fn paginate<T>(items: Vec<T>, page: u32) -> Vec<T> {
    if page == 0 {
        return Vec::new();
    }
    let start = (page as usize - 1).saturating_mul(MAX_DRINKS_PER_PAGE);
    items
        .into_iter()
        .skip(start)
        .take(MAX_DRINKS_PER_PAGE)
        .collect()
}

/// A malformed ID cannot name an existing drink.
fn drink_id(path: Result<Path<DrinkId>, PathRejection>) -> Result<DrinkId, ApiError> {
    path.map(|Path(id)| id).map_err(|_| ApiError::not_found())
}

#[utoipa::path(
    get,
    path = "/drinks",
    params(PageQuery),
    tag = "Drinks",
    responses((status = 200, description = "Drinks in short form", body = DrinksShortResponse))
)]
pub async fn get_drinks(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Json<DrinksShortResponse> {
    let store = state.store.read().await;
    let drinks: Vec<DrinkShort> = store.list_drinks().iter().map(|d| d.short()).collect();
    Json(paginate(drinks, page_number(query)).into())
}

#[utoipa::path(
    get,
    path = "/drinks-detail",
    params(PageQuery),
    tag = "Drinks",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Drinks in long form", body = DrinksResponse),
        (status = 401, description = "Missing or invalid token, or no get:drinks-detail permission"),
    )
)]
pub async fn get_drinks_detail(
    _auth: Authorized<GetDrinksDetail>,
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Json<DrinksResponse> {
    let store = state.store.read().await;
    Json(paginate(store.list_drinks(), page_number(query)).into())
}

#[utoipa::path(
    post,
    path = "/drinks",
    request_body = CreateDrinkRequest,
    tag = "Drinks",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The created drink", body = DrinksResponse),
        (status = 400, description = "Body is not JSON"),
        (status = 401, description = "Missing or invalid token, or no post:drinks permission"),
        (status = 422, description = "Missing fields, empty recipe, or title already taken"),
    )
)]
pub async fn create_drink(
    auth: Authorized<PostDrinks>,
    State(state): State<AppState>,
    payload: Result<Json<CreateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse>, ApiError> {
    let Json(request) = payload?;
    let drink = state.store.write().await.create_drink(request)?;

    tracing::info!(drink_id = drink.id, sub = ?auth.claims.subject(), "Drink created");
    Ok(Json(vec![drink].into()))
}

#[utoipa::path(
    patch,
    path = "/drinks/{id}",
    params(("id" = u32, Path, description = "Identifier of the drink to update")),
    request_body = UpdateDrinkRequest,
    tag = "Drinks",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The updated drink", body = DrinksResponse),
        (status = 401, description = "Missing or invalid token, or no patch:drinks permission"),
        (status = 404, description = "No such drink"),
        (status = 422, description = "Invalid fields or title already taken"),
    )
)]
pub async fn update_drink(
    auth: Authorized<PatchDrinks>,
    State(state): State<AppState>,
    path: Result<Path<DrinkId>, PathRejection>,
    payload: Result<Json<UpdateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse>, ApiError> {
    let id = drink_id(path)?;
    let Json(request) = payload?;
    let drink = state.store.write().await.update_drink(id, request)?;

    tracing::info!(drink_id = id, sub = ?auth.claims.subject(), "Drink updated");
    Ok(Json(vec![drink].into()))
}

#[utoipa::path(
    delete,
    path = "/drinks/{id}",
    params(("id" = u32, Path, description = "Identifier of the drink to delete")),
    tag = "Drinks",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The drink was deleted", body = DeleteDrinkResponse),
        (status = 401, description = "Missing or invalid token, or no delete:drinks permission"),
        (status = 404, description = "No such drink"),
    )
)]
pub async fn delete_drink(
    auth: Authorized<DeleteDrinks>,
    State(state): State<AppState>,
    path: Result<Path<DrinkId>, PathRejection>,
) -> Result<Json<DeleteDrinkResponse>, ApiError> {
    let id = drink_id(path)?;
    state.store.write().await.delete_drink(id)?;

    tracing::info!(drink_id = id, sub = ?auth.claims.subject(), "Drink deleted");
    Ok(Json(DeleteDrinkResponse {
        success: true,
        delete: id,
    }))
}
