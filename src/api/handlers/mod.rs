use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use super::AppState;
use crate::db::Database;
use crate::models::*;
use crate::widget::{self, render_feature_date_box, Widget};
use crate::{dates, selector};

// ============================================================
// Error Handling
// ============================================================

/// Log an internal error and return a sanitized response to the client.
///
/// Unknown category references are caller mistakes and come back as
/// BAD_REQUEST with the message intact.
fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    let msg = e.to_string();

    if msg.contains("not found") {
        tracing::warn!("Validation error: {}", msg);
        return (StatusCode::BAD_REQUEST, msg);
    }

    tracing::error!("Internal error: {}", msg);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

fn post_not_found() -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, "Post not found".to_string())
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Posts
// ============================================================

pub async fn list_posts(
    State(db): State<Database>,
) -> Result<Json<Vec<Post>>, (StatusCode, String)> {
    db.get_all_posts().map(Json).map_err(internal_error)
}

pub async fn get_post(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<Post>, (StatusCode, String)> {
    db.get_post(id)
        .map_err(internal_error)?
        .map(Json)
        .ok_or_else(post_not_found)
}

pub async fn create_post(
    State(db): State<Database>,
    Json(input): Json<CreatePostInput>,
) -> Result<(StatusCode, Json<Post>), (StatusCode, String)> {
    db.create_post(input)
        .map(|p| (StatusCode::CREATED, Json(p)))
        .map_err(internal_error)
}

pub async fn update_post(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdatePostInput>,
) -> Result<Json<Post>, (StatusCode, String)> {
    db.update_post(id, input)
        .map_err(internal_error)?
        .map(Json)
        .ok_or_else(post_not_found)
}

pub async fn delete_post(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if db.delete_post(id).map_err(internal_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(post_not_found())
    }
}

// ============================================================
// Feature date
// ============================================================

/// Save the editor's "feature until" text.
///
/// An empty field clears the date. So does text that is not a date; the
/// editor gets the post back without a date rather than an error.
pub async fn update_feature_date(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(input): Json<FeatureDateInput>,
) -> Result<Json<Post>, (StatusCode, String)> {
    let found = match dates::parse_feature_date(&input.date) {
        Some(until) => db.set_feature_until(id, until),
        None => db.clear_feature_until(id),
    }
    .map_err(internal_error)?;

    if !found {
        return Err(post_not_found());
    }

    db.get_post(id)
        .map_err(internal_error)?
        .map(Json)
        .ok_or_else(post_not_found)
}

pub async fn feature_date_form(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, (StatusCode, String)> {
    let post = db
        .get_post(id)
        .map_err(internal_error)?
        .ok_or_else(post_not_found)?;

    Ok(Html(render_feature_date_box(&post).into_string()))
}

// ============================================================
// Categories
// ============================================================

pub async fn list_categories(
    State(db): State<Database>,
) -> Result<Json<Vec<Category>>, (StatusCode, String)> {
    db.get_all_categories().map(Json).map_err(internal_error)
}

pub async fn create_category(
    State(db): State<Database>,
    Json(input): Json<CreateCategoryInput>,
) -> Result<(StatusCode, Json<Category>), (StatusCode, String)> {
    db.create_category(input)
        .map(|c| (StatusCode::CREATED, Json(c)))
        .map_err(internal_error)
}

pub async fn get_category(
    State(db): State<Database>,
    Path(id): Path<CategoryId>,
) -> Result<Json<Category>, (StatusCode, String)> {
    db.get_category(id)
        .map_err(internal_error)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Category not found".to_string()))
}

pub async fn delete_category(
    State(db): State<Database>,
    Path(id): Path<CategoryId>,
) -> Result<StatusCode, (StatusCode, String)> {
    if db.delete_category(id).map_err(internal_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Category not found".to_string()))
    }
}

// ============================================================
// Hot sheet
// ============================================================

/// Query parameters for the featured list.
#[derive(Debug, Deserialize)]
pub struct FeaturedQuery {
    /// Restrict to one category. Missing, `0` or not a number lists every
    /// category.
    pub category: Option<String>,
}

pub async fn list_featured(
    State(db): State<Database>,
    Query(query): Query<FeaturedQuery>,
) -> Result<Json<Vec<FeaturedLink>>, (StatusCode, String)> {
    let filter =
        CategoryFilter::from_optional(query.category.as_deref().map(widget::leading_int));
    let candidates = db.get_featured_candidates(filter).map_err(internal_error)?;
    Ok(Json(selector::select(&candidates, filter, Utc::now())))
}

/// The widget as it appears in the sidebar. The body is empty when no post
/// is currently featured.
pub async fn render_widget(
    State(state): State<AppState>,
    Path(widget_id): Path<String>,
) -> Result<Html<String>, (StatusCode, String)> {
    widget::render_widget_instance(&state.widget, &state.db, &widget_id, Utc::now())
        .map(|markup| Html(markup.into_string()))
        .map_err(internal_error)
}

pub async fn get_widget_settings(
    State(db): State<Database>,
    Path(widget_id): Path<String>,
) -> Result<Json<WidgetConfig>, (StatusCode, String)> {
    db.load_widget_config(&widget_id)
        .map(|config| Json(config.unwrap_or_default()))
        .map_err(internal_error)
}

pub async fn update_widget_settings(
    State(state): State<AppState>,
    Path(widget_id): Path<String>,
    Json(input): Json<WidgetSettingsInput>,
) -> Result<Json<WidgetConfig>, (StatusCode, String)> {
    widget::save_widget_settings(&state.widget, &state.db, &widget_id, input)
        .map(Json)
        .map_err(internal_error)
}

pub async fn widget_settings_form(
    State(state): State<AppState>,
    Path(widget_id): Path<String>,
) -> Result<Html<String>, (StatusCode, String)> {
    let config = state
        .db
        .load_widget_config(&widget_id)
        .map_err(internal_error)?
        .unwrap_or_default();
    let categories = state.db.get_all_categories().map_err(internal_error)?;

    Ok(Html(state.widget.form(&config, &categories).into_string()))
}
