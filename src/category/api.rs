//! JSON endpoints for categories.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    category::{
        Category, CategoryFormData, CategoryId, CategoryName, DeleteCategoryOutcome,
        UpdateCategoryOutcome, add_category, delete_category, get_categories, update_category,
    },
    json_error,
};

/// The state needed by the category endpoints.
#[derive(Debug, Clone)]
pub struct CategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Create a category, responds with 201 and the new category.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    Json(payload): Json<CategoryFormData>,
) -> Result<Response, Error> {
    let name = CategoryName::new(&payload.name)?;
    let connection = lock_connection(&state.db_connection)?;

    let category = add_category(name, &connection)?;
    tracing::info!("Created category {category:?}");

    Ok((StatusCode::CREATED, Json(category)).into_response())
}

/// List every category ordered by name.
pub async fn get_categories_endpoint(
    State(state): State<CategoryState>,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_categories(&connection).map(Json)
}

/// Rename a category, responds with the updated category.
pub async fn update_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<CategoryState>,
    Json(payload): Json<CategoryFormData>,
) -> Result<Response, Error> {
    let name = CategoryName::new(&payload.name)?;
    let connection = lock_connection(&state.db_connection)?;

    let response = match update_category(category_id, name.clone(), &connection)? {
        UpdateCategoryOutcome::Updated => Json(Category {
            id: category_id,
            name,
        })
        .into_response(),
        UpdateCategoryOutcome::DuplicateName => json_error(
            StatusCode::BAD_REQUEST,
            format!("The name \"{name}\" is already in use."),
        ),
        UpdateCategoryOutcome::NotFound => json_error(
            StatusCode::NOT_FOUND,
            format!("Category with ID {category_id} not found."),
        ),
    };

    Ok(response)
}

/// Delete a category that no product uses.
pub async fn delete_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<CategoryState>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let response = match delete_category(category_id, &connection)? {
        DeleteCategoryOutcome::Deleted => Json(json!({
            "message": format!("Category ID {category_id} deleted successfully.")
        }))
        .into_response(),
        DeleteCategoryOutcome::InUse => json_error(
            StatusCode::BAD_REQUEST,
            "The category is in use by products and cannot be deleted.",
        ),
        DeleteCategoryOutcome::NotFound => json_error(
            StatusCode::NOT_FOUND,
            format!("Category with ID {category_id} not found."),
        ),
    };

    Ok(response)
}
