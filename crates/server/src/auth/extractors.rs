use axum::{extract::FromRequestParts, http::request::Parts};
use shared_types::{Actor, AppError, UserRole};

use super::jwt::Claims;

/// Extractor that requires authentication. Returns 401 if no valid token.
pub struct AuthRequired(pub Claims);

impl AuthRequired {
    pub fn actor(&self) -> Actor {
        self.0.actor()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AuthRequired {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthRequired)
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}

pub const RESIDENT: u8 = 0;
pub const TANOD: u8 = 1;
pub const SECRETARY: u8 = 2;
pub const OFFICIAL: u8 = 3;
pub const ADMIN: u8 = 4;

fn required_role(role: u8) -> UserRole {
    match role {
        TANOD => UserRole::Tanod,
        SECRETARY => UserRole::Secretary,
        OFFICIAL => UserRole::Official,
        ADMIN => UserRole::Admin,
        _ => UserRole::Resident,
    }
}

/// Extractor that requires authentication AND a minimum portal role.
/// Returns 401 if unauthenticated, 403 if the role does not satisfy `ROLE`.
///
/// Use the role constants in this module (`TANOD`, `SECRETARY`, `ADMIN`, ...).
pub struct RoleRequired<const ROLE: u8>(pub Claims);

impl<const ROLE: u8> RoleRequired<ROLE> {
    pub fn actor(&self) -> Actor {
        self.0.actor()
    }
}

impl<const ROLE: u8, S: Send + Sync> FromRequestParts<S> for RoleRequired<ROLE> {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

        let required = required_role(ROLE);
        if !claims.role().satisfies(&required) {
            return Err(AppError::forbidden(format!(
                "{} role or higher required",
                required.label()
            )));
        }

        Ok(RoleRequired(claims))
    }
}

/// Staff-only access: any role from Tanod up.
pub type StaffRequired = RoleRequired<TANOD>;
/// Case workflow access: Secretary, Official or Admin.
pub type CaseOfficerRequired = RoleRequired<SECRETARY>;
pub type AdminRequired = RoleRequired<ADMIN>;
