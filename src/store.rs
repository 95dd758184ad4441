// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory drink catalog.
//!
//! Drinks are kept in ID order; IDs are assigned sequentially from 1 and
//! never reused. Titles are unique.

use std::collections::BTreeMap;

use crate::error::ApiError;
use crate::models::{CreateDrinkRequest, Drink, DrinkId, Ingredient, UpdateDrinkRequest};

#[derive(Default)]
pub struct InMemoryStore {
    drinks: BTreeMap<DrinkId, Drink>,
    last_id: DrinkId,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding the sample drink.
    pub fn with_sample_drink() -> Self {
        let water = Drink {
            id: 1,
            title: "water".into(),
            recipe: vec![Ingredient {
                name: "water".into(),
                color: "blue".into(),
                parts: 1,
            }],
        };
        Self {
            drinks: BTreeMap::from([(water.id, water)]),
            last_id: 1,
        }
    }

    /// All drinks, in ID order.
    pub fn list_drinks(&self) -> Vec<Drink> {
        self.drinks.values().cloned().collect()
    }

    pub fn create_drink(&mut self, request: CreateDrinkRequest) -> Result<Drink, ApiError> {
        let title = validate_title(&request.title)?;
        validate_recipe(&request.recipe)?;
        self.ensure_title_free(&title, None)?;

        self.last_id += 1;
        let drink = Drink {
            id: self.last_id,
            title,
            recipe: request.recipe,
        };
        self.drinks.insert(drink.id, drink.clone());
        Ok(drink)
    }

    pub fn update_drink(
        &mut self,
        id: DrinkId,
        request: UpdateDrinkRequest,
    ) -> Result<Drink, ApiError> {
        if !self.drinks.contains_key(&id) {
            return Err(ApiError::not_found());
        }

        let title = request.title.as_deref().map(validate_title).transpose()?;
        if let Some(recipe) = &request.recipe {
            validate_recipe(recipe)?;
        }
        if let Some(title) = &title {
            self.ensure_title_free(title, Some(id))?;
        }

        let drink = self.drinks.get_mut(&id).ok_or_else(ApiError::not_found)?;
        if let Some(title) = title {
            drink.title = title;
        }
        if let Some(recipe) = request.recipe {
            drink.recipe = recipe;
        }
        Ok(drink.clone())
    }

    pub fn delete_drink(&mut self, id: DrinkId) -> Result<(), ApiError> {
        if self.drinks.remove(&id).is_some() {
            Ok(())
        } else {
            Err(ApiError::not_found())
        }
    }

    fn ensure_title_free(&self, title: &str, except: Option<DrinkId>) -> Result<(), ApiError> {
        let taken = self
            .drinks
            .values()
            .any(|d| d.title == title && Some(d.id) != except);
        if taken {
            Err(ApiError::unprocessable("A drink with this title already exists."))
        } else {
            Ok(())
        }
    }
}

fn validate_title(title: &str) -> Result<String, ApiError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ApiError::unprocessable("Drink title must not be empty."));
    }
    Ok(title.to_string())
}

fn validate_recipe(recipe: &[Ingredient]) -> Result<(), ApiError> {
    if recipe.is_empty() {
        return Err(ApiError::unprocessable(
            "Drink recipe needs at least one ingredient.",
        ));
    }
    Ok(())
}
