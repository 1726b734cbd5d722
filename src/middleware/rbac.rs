// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    models::{auth::CurrentUser, rbac::AccessLevel},
    services::rbac_service::resolve_access,
};

/// 1. O Trait que define uma exigência de acesso: qual recurso e o nível
///    mínimo para passar.
pub trait AccessRequirement: Send + Sync + 'static {
    fn resource_id() -> &'static str;
    fn required() -> AccessLevel;
}

/// 2. O Extractor (Guardião). A resolução é toda em memória: o CurrentUser
///    já carrega o mapa de permissões do grupo, então aqui não há ida ao
///    banco.
pub struct RequireAccess<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts

impl<T, S> FromRequestParts<S> for RequireAccess<T>
where
    T: AccessRequirement,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts.extensions.get::<CurrentUser>();

        if resolve_access(user, T::resource_id(), T::required()) {
            Ok(RequireAccess(PhantomData))
        } else {
            Err(AppError::PermissionDenied(T::resource_id().to_string()))
        }
    }
}

// ---
// DEFINIÇÃO DAS EXIGÊNCIAS (TIPOS)
// ---

macro_rules! access_requirement {
    ($name:ident, $resource:literal, $level:expr) => {
        pub struct $name;
        impl AccessRequirement for $name {
            fn resource_id() -> &'static str {
                $resource
            }
            fn required() -> AccessLevel {
                $level
            }
        }
    };
}

access_requirement!(PartView, "part_master", AccessLevel::View);
access_requirement!(PartEdit, "part_master", AccessLevel::Edit);
access_requirement!(PartAdd, "part_master", AccessLevel::Add);

access_requirement!(MovementView, "movement_logs", AccessLevel::View);

access_requirement!(StockTakeView, "stock_take", AccessLevel::View);
access_requirement!(StockTakeEdit, "stock_take", AccessLevel::Edit);
access_requirement!(StockTakeAdd, "stock_take", AccessLevel::Add);

access_requirement!(GroupView, "user_group_master", AccessLevel::View);
access_requirement!(GroupAdmin, "user_group_master", AccessLevel::Edit);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requirements_carry_resource_and_level() {
        assert_eq!(PartEdit::resource_id(), "part_master");
        assert_eq!(PartEdit::required(), AccessLevel::Edit);
        assert_eq!(GroupAdmin::resource_id(), "user_group_master");
        assert_eq!(StockTakeAdd::required(), AccessLevel::Add);
    }
}
