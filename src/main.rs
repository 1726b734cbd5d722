//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_middleware;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Semeia/atualiza os quatro grupos embutidos. Falha aqui não derruba o
    // processo.
    app_state.rbac_service.sync_groups().await;

    // Define as rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas do usuário corrente
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/me/password", post(handlers::auth::change_password));

    // Administração de grupos e catálogo de recursos
    let group_routes = Router::new()
        .route("/", get(handlers::rbac::list_groups))
        .route(
            "/{group_id}",
            get(handlers::rbac::get_group).put(handlers::rbac::update_group),
        );

    let part_routes = Router::new()
        .route(
            "/",
            post(handlers::parts::create_part).get(handlers::parts::list_parts),
        )
        .route("/next-sap", get(handlers::parts::next_sap_number))
        .route("/import/validate", post(handlers::parts::validate_import))
        .route("/import", post(handlers::parts::import_csv))
        .route("/duplicates", get(handlers::parts::detect_duplicates))
        .route(
            "/duplicates/cleanup",
            post(handlers::parts::cleanup_duplicates),
        )
        .route(
            "/{id}",
            get(handlers::parts::get_part)
                .put(handlers::parts::update_part)
                .delete(handlers::parts::delete_part),
        );

    let stock_take_routes = Router::new()
        .route(
            "/",
            post(handlers::stock_take::open_session).get(handlers::stock_take::list_sessions),
        )
        .route("/{id}", get(handlers::stock_take::get_session))
        .route("/{id}/items", put(handlers::stock_take::save_progress))
        .route("/{id}/variance", get(handlers::stock_take::variance_report))
        .route("/{id}/approve", post(handlers::stock_take::approve_session))
        .route("/{id}/reject", post(handlers::stock_take::reject_session))
        .route("/{id}/export", get(handlers::stock_take::export_session));

    // Tudo que não é login/registro passa pelo guardião de autenticação.
    let protected_routes = Router::new()
        .nest("/api/users", user_routes)
        .nest("/api/groups", group_routes)
        .route("/api/rbac/resources", get(handlers::rbac::list_resources))
        .nest("/api/parts", part_routes)
        .route("/api/movements", get(handlers::parts::list_movements))
        .nest("/api/stock-take", stock_take_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .merge(protected_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
