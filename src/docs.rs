// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::change_password,

        // --- RBAC ---
        handlers::rbac::list_resources,
        handlers::rbac::list_groups,
        handlers::rbac::get_group,
        handlers::rbac::update_group,

        // --- Parts ---
        handlers::parts::list_parts,
        handlers::parts::next_sap_number,
        handlers::parts::get_part,
        handlers::parts::create_part,
        handlers::parts::update_part,
        handlers::parts::delete_part,
        handlers::parts::validate_import,
        handlers::parts::import_csv,
        handlers::parts::detect_duplicates,
        handlers::parts::cleanup_duplicates,
        handlers::parts::list_movements,

        // --- Stock Take ---
        handlers::stock_take::list_sessions,
        handlers::stock_take::open_session,
        handlers::stock_take::get_session,
        handlers::stock_take::save_progress,
        handlers::stock_take::variance_report,
        handlers::stock_take::approve_session,
        handlers::stock_take::reject_session,
        handlers::stock_take::export_session,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::CurrentUser,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::ChangePasswordPayload,
            models::auth::AuthResponse,

            // --- RBAC ---
            models::rbac::AccessLevel,
            models::rbac::LegacyPermissions,
            models::rbac::UserGroup,
            models::rbac::UpdateGroupPayload,
            handlers::rbac::ResourceEntry,

            // --- Parts ---
            models::parts::PartResponse,
            models::parts::PartPayload,
            models::parts::ValidImportRow,
            models::parts::ImportReport,
            models::parts::ImportResult,
            models::parts::DuplicateGroup,
            models::parts::CleanupReport,
            models::parts::StockMovement,
            handlers::parts::NextSapResponse,

            // --- Stock Take ---
            models::stock_take::StockTakeStatus,
            models::stock_take::VarianceClass,
            models::stock_take::CountEntry,
            models::stock_take::StockTakeSession,
            models::stock_take::VarianceEntry,
            models::stock_take::VarianceReport,
            models::stock_take::OpenSessionPayload,
            models::stock_take::SaveProgressPayload,
            models::stock_take::ApprovePayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "RBAC", description = "Grupos de Usuário e Permissões"),
        (name = "Parts", description = "Cadastro de Peças, Importação e Duplicados"),
        (name = "Stock Take", description = "Sessões de Contagem e Variância")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
