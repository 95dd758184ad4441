// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the request and response data structures used by
//! the REST API. All types derive `Serialize`/`Deserialize` and `ToSchema`
//! for automatic JSON handling and OpenAPI documentation.
//!
//! ## Drink representations
//!
//! - **Short** ([`DrinkShort`]): public view, recipe reduced to colors and parts
//! - **Long** ([`Drink`]): full record including ingredient names

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Catalog-assigned drink identifier.
pub type DrinkId = u32;

// =============================================================================
// Drink Models
// =============================================================================

/// One ingredient of a drink recipe.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Ingredient {
    /// Ingredient name, e.g. "milk".
    pub name: String,
    /// Display color used to draw the drink.
    pub color: String,
    /// Relative amount.
    pub parts: u32,
}

/// A drink in the catalog (long representation).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Drink {
    pub id: DrinkId,
    /// Unique title.
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Ingredient without its name, as shown publicly.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct IngredientShort {
    pub color: String,
    pub parts: u32,
}

/// Public drink representation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DrinkShort {
    pub id: DrinkId,
    pub title: String,
    pub recipe: Vec<IngredientShort>,
}

impl Drink {
    pub fn short(&self) -> DrinkShort {
        DrinkShort {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .iter()
                .map(|i| IngredientShort {
                    color: i.color.clone(),
                    parts: i.parts,
                })
                .collect(),
        }
    }
}

/// Request to create a new drink.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateDrinkRequest {
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Partial update of a drink. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateDrinkRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<Vec<Ingredient>>,
}

// =============================================================================
// Response Envelopes
// =============================================================================

/// `{"success": true, "drinks": [...]}` with the public representation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DrinksShortResponse {
    pub success: bool,
    pub drinks: Vec<DrinkShort>,
}

/// `{"success": true, "drinks": [...]}` with the full representation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DrinksResponse {
    pub success: bool,
    pub drinks: Vec<Drink>,
}

impl From<Vec<DrinkShort>> for DrinksShortResponse {
    fn from(drinks: Vec<DrinkShort>) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

impl From<Vec<Drink>> for DrinksResponse {
    fn from(drinks: Vec<Drink>) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

/// `{"success": true, "delete": <id>}`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DeleteDrinkResponse {
    pub success: bool,
    /// ID of the deleted drink.
    pub delete: DrinkId,
}
