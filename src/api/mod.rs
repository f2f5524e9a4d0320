mod handlers;
pub mod middleware;

use axum::{
    extract::FromRef,
    routing::{get, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::db::Database;
use crate::widget::HotSheetWidget;
pub use middleware::SecurityConfig;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub widget: HotSheetWidget,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

/// Router with security settings taken from the environment.
pub fn create_router(db: Database) -> Router {
    create_router_with(db, HotSheetWidget::new(), SecurityConfig::from_env())
}

pub fn create_router_with(db: Database, widget: HotSheetWidget, security: SecurityConfig) -> Router {
    let api = Router::new()
        // Posts
        .route("/posts", get(handlers::list_posts).post(handlers::create_post))
        .route(
            "/posts/{id}",
            get(handlers::get_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .route("/posts/{id}/feature-until", put(handlers::update_feature_date))
        .route(
            "/posts/{id}/feature-until/form",
            get(handlers::feature_date_form),
        )
        // Categories
        .route(
            "/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/categories/{id}",
            get(handlers::get_category).delete(handlers::delete_category),
        )
        // Hot sheet
        .route("/featured", get(handlers::list_featured))
        .route("/widgets/{id}", get(handlers::render_widget))
        .route(
            "/widgets/{id}/settings",
            get(handlers::get_widget_settings).put(handlers::update_widget_settings),
        )
        .route("/widgets/{id}/settings/form", get(handlers::widget_settings_form))
        // Health
        .route("/health", get(handlers::health));

    let cors = security.cors_layer();

    Router::new()
        .nest("/api/v1", api)
        .layer(axum::middleware::from_fn_with_state(
            security,
            middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(AppState { db, widget })
}
