// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, patch},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::not_found_fallback,
    models::{
        CreateDrinkRequest, DeleteDrinkResponse, Drink, DrinkShort, DrinksResponse,
        DrinksShortResponse, Ingredient, IngredientShort, UpdateDrinkRequest,
    },
    state::AppState,
};

pub mod drinks;
pub mod health;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/drinks", get(drinks::get_drinks).post(drinks::create_drink))
        .route("/drinks-detail", get(drinks::get_drinks_detail))
        .route(
            "/drinks/{id}",
            patch(drinks::update_drink).delete(drinks::delete_drink),
        )
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .fallback(not_found_fallback)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

/// Registers the bearer token scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        drinks::get_drinks,
        drinks::get_drinks_detail,
        drinks::create_drink,
        drinks::update_drink,
        drinks::delete_drink,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Drink,
            DrinkShort,
            Ingredient,
            IngredientShort,
            CreateDrinkRequest,
            UpdateDrinkRequest,
            DrinksResponse,
            DrinksShortResponse,
            DeleteDrinkResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Drinks", description = "Drink catalog"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
