//! Stockroom is an inventory manager for a clothing store.
//!
//! Categories and products live in a single SQLite file. The same storage
//! functions are driven by two front ends: a JSON REST API under `/api` and
//! server-rendered HTML forms (htmx) for people working the store.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::{Deserialize, Serialize};
use tokio::signal;

mod alert;
mod app_state;
mod category;
mod db;
mod endpoints;
mod error_page;
mod html;
mod logging;
mod navigation;
mod product;
mod routing;
#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use category::{
    Category, CategoryId, CategoryName, DeleteCategoryOutcome, UpdateCategoryOutcome, add_category,
    delete_category, get_categories, update_category,
};
pub use db::{initialize as initialize_db, open as open_db};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use product::{
    NewProduct, Price, ProductId, ProductWithCategoryName, add_product, delete_product, get_product,
    get_products, update_product,
};
pub use routing::build_router;

use crate::alert::Alert;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used as a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// An empty string was used as a product name.
    #[error("Product name cannot be empty")]
    EmptyProductName,

    /// The price field was left empty.
    #[error("Price is required")]
    MissingPrice,

    /// The price could not be parsed as a number.
    #[error("\"{0}\" is not a valid price, use a number such as 19.99")]
    InvalidPrice(String),

    /// The price was below zero.
    #[error("Price cannot be negative, got {0}")]
    NegativePrice(f64),

    /// A product was submitted without selecting a category.
    #[error("No category selected, create a category first")]
    MissingCategory,

    /// The category name already exists in the database.
    #[error("The category \"{0}\" already exists")]
    DuplicateCategoryName(String),

    /// The category ID used to create or update a product did not match a
    /// category in the database.
    #[error("there is no category with the ID {0}")]
    InvalidCategory(CategoryId),

    /// The requested resource was not found.
    ///
    /// Internally, this error occurs when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    ///
    /// The error should only be logged on the server. Clients get a generic
    /// message instead.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The JSON body sent to API clients when a request fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// A human readable explanation of what went wrong.
    pub detail: String,
}

/// Build a JSON error response with `detail` as the message.
pub(crate) fn json_error(status_code: StatusCode, detail: impl Into<String>) -> Response {
    (
        status_code,
        Json(ErrorBody {
            detail: detail.into(),
        }),
    )
        .into_response()
}

const GENERIC_ERROR_MESSAGE: &str =
    "An unexpected error occurred, check the server logs for more details.";

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::EmptyCategoryName
            | Error::EmptyProductName
            | Error::MissingPrice
            | Error::InvalidPrice(_)
            | Error::NegativePrice(_)
            | Error::MissingCategory
            | Error::DuplicateCategoryName(_)
            | Error::InvalidCategory(_) => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::SqlError(_) | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render the error as an HTML alert for htmx requests.
    fn into_alert_response(self) -> Response {
        let status_code = self.status_code();

        let alert = match self {
            Error::SqlError(_) | Error::DatabaseLockError => Alert::Error {
                message: "Something went wrong".to_owned(),
                details: GENERIC_ERROR_MESSAGE.to_owned(),
            },
            Error::NotFound => Alert::Error {
                message: "Not found".to_owned(),
                details: "The item could not be found. \
                    Try refreshing the page to see if it has already been deleted."
                    .to_owned(),
            },
            Error::DuplicateCategoryName(name) => Alert::Error {
                message: "Duplicate category name".to_owned(),
                details: format!(
                    "The category \"{name}\" already exists. Choose a different name."
                ),
            },
            error => Alert::ErrorSimple {
                message: error.to_string(),
            },
        };

        (status_code, alert.into_html()).into_response()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        match self {
            Error::SqlError(_) | Error::DatabaseLockError => {
                tracing::error!("An unexpected error occurred: {}", self);
                json_error(status_code, GENERIC_ERROR_MESSAGE)
            }
            error => json_error(status_code, error.to_string()),
        }
    }
}
