// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Permission checks against verified claims.
//!
//! Permissions are opaque strings such as `post:drinks`, granted through the
//! `permissions` array of an access token. Each protected operation names the
//! permission it needs with a marker type implementing [`Permission`].

use serde_json::Value;

use super::{AuthError, Claims};

/// A permission an operation can require.
pub trait Permission: Send + Sync + 'static {
    /// Permission string. Empty means authentication alone suffices.
    const NAME: &'static str;
}

macro_rules! permissions {
    ($($(#[$meta:meta])* $marker:ident => $name:literal),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy)]
            pub struct $marker;

            impl Permission for $marker {
                const NAME: &'static str = $name;
            }
        )*
    };
}

permissions! {
    /// Any valid token, no specific permission.
    Authenticated => "",
    /// Read the full drink recipes.
    GetDrinksDetail => "get:drinks-detail",
    /// Create drinks.
    PostDrinks => "post:drinks",
    /// Update drinks.
    PatchDrinks => "patch:drinks",
    /// Delete drinks.
    DeleteDrinks => "delete:drinks",
}

/// Check that `claims` grant `required`.
///
/// A literal membership test: the empty string is only granted if the
/// `permissions` array contains it. Skipping the check for operations that
/// need no permission is the gate's decision.
pub fn check_permissions(required: &str, claims: &Claims) -> Result<(), AuthError> {
    let granted = claims
        .permissions()
        .ok_or(AuthError::PermissionsClaimMissing)?;

    let allowed = match granted {
        Value::Array(items) => items.iter().any(|p| p.as_str() == Some(required)),
        _ => false,
    };

    if allowed {
        Ok(())
    } else {
        tracing::debug!(required, "Permission not granted");
        Err(AuthError::PermissionDenied)
    }
}
