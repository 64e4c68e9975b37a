//! The category management page and its htmx form endpoints.
//!
//! Every successful mutation re-renders the category list and sends the
//! [CATEGORIES_CHANGED_EVENT] trigger so that the product form on the same
//! page reloads its category selector.

use std::collections::HashMap;

use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HX_TRIGGER;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    Error,
    alert::Alert,
    app_state::lock_connection,
    category::{
        Category, CategoryFormData, CategoryId, CategoryName, DeleteCategoryOutcome,
        UpdateCategoryOutcome, add_category, api::CategoryState, delete_category, get_categories,
        get_category, update_category,
    },
    endpoints::{self, format_endpoint},
    error_page::get_internal_server_error_response,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        text_input,
    },
    navigation::NavBar,
};

/// The htmx event sent after categories are created, renamed or deleted.
pub const CATEGORIES_CHANGED_EVENT: &str = "categories-changed";

const CATEGORY_LIST_ID: &str = "category-list";
const CATEGORY_FORM_CONTAINER_ID: &str = "category-form-container";

/// A category and the number of products in it.
#[derive(Debug, Clone, PartialEq)]
struct CategoryRow {
    category: Category,
    product_count: u32,
}

/// Render the category management page.
pub async fn get_categories_page(State(state): State<CategoryState>) -> Response {
    let panel = match lock_connection(&state.db_connection)
        .and_then(|connection| category_panel(&connection))
    {
        Ok(panel) => panel,
        Err(error) => {
            tracing::error!("Failed to render the categories page: {error}");
            return get_internal_server_error_response();
        }
    };

    let content = html! {
        (NavBar::new(endpoints::CATEGORIES_VIEW).into_html())

        main class=(PAGE_CONTAINER_STYLE) { (panel) }
    };

    base("Categories", &content).into_response()
}

/// The category form and list, embedded in both the categories and products pages.
pub fn category_panel(connection: &Connection) -> Result<Markup, Error> {
    let rows = get_category_rows(connection)?;

    Ok(html! {
        section class="w-full max-w-3xl space-y-4"
        {
            h2 class="text-xl font-bold" { "Categories" }

            (category_form_view(None))
            (category_list_view(&rows))
        }
    })
}

/// An empty category form for creating a category.
pub async fn get_category_form() -> Markup {
    category_form_view(None)
}

/// The category form filled in with the selected category.
pub async fn get_edit_category_form(
    Path(category_id): Path<CategoryId>,
    State(state): State<CategoryState>,
) -> Response {
    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_alert_response(),
    };

    match get_category(category_id, &connection) {
        Ok(category) => category_form_view(Some(&category)).into_response(),
        Err(error) => {
            if error != Error::NotFound {
                tracing::error!("Failed to retrieve category {category_id}: {error}");
            }

            error.into_alert_response()
        }
    }
}

/// Handle the category creation form.
pub async fn create_category_form_endpoint(
    State(state): State<CategoryState>,
    Form(form): Form<CategoryFormData>,
) -> Response {
    let name = match CategoryName::new(&form.name) {
        Ok(name) => name,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_alert_response(),
    };

    match add_category(name, &connection) {
        Ok(category) => {
            mutation_response(&connection, &format!("Category '{}' added.", category.name))
        }
        Err(error) => error.into_alert_response(),
    }
}

/// Handle the category rename form.
pub async fn update_category_form_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<CategoryState>,
    Form(form): Form<CategoryFormData>,
) -> Response {
    let name = match CategoryName::new(&form.name) {
        Ok(name) => name,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_alert_response(),
    };

    match update_category(category_id, name.clone(), &connection) {
        Ok(UpdateCategoryOutcome::Updated) => mutation_response(&connection, "Category updated."),
        Ok(UpdateCategoryOutcome::DuplicateName) => {
            Error::DuplicateCategoryName(name.to_string()).into_alert_response()
        }
        Ok(UpdateCategoryOutcome::NotFound) => alert_response(
            StatusCode::NOT_FOUND,
            "Could not update category",
            "The category could not be found.",
        ),
        Err(error) => error.into_alert_response(),
    }
}

/// Handle the category delete button.
pub async fn delete_category_form_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<CategoryState>,
) -> Response {
    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_alert_response(),
    };

    match delete_category(category_id, &connection) {
        Ok(DeleteCategoryOutcome::Deleted) => mutation_response(&connection, "Category deleted."),
        Ok(DeleteCategoryOutcome::InUse) => alert_response(
            StatusCode::BAD_REQUEST,
            "Could not delete category",
            "This category is used by products. \
            Move or delete those products first.",
        ),
        Ok(DeleteCategoryOutcome::NotFound) => alert_response(
            StatusCode::NOT_FOUND,
            "Could not delete category",
            "The category could not be found. \
            Try refreshing the page to see if it has already been deleted.",
        ),
        Err(error) => {
            tracing::error!("Could not delete category {category_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn alert_response(status_code: StatusCode, message: &str, details: &str) -> Response {
    (
        status_code,
        Alert::Error {
            message: message.to_owned(),
            details: details.to_owned(),
        }
        .into_html(),
    )
        .into_response()
}

/// The refreshed list, a cleared form and a success alert, plus the trigger
/// that tells the product form to reload its categories.
fn mutation_response(connection: &Connection, message: &str) -> Response {
    let rows = match get_category_rows(connection) {
        Ok(rows) => rows,
        Err(error) => return error.into_alert_response(),
    };

    let body = html! {
        (category_list_view(&rows))

        div id=(CATEGORY_FORM_CONTAINER_ID) hx-swap-oob="true"
        {
            (category_form(None))
        }

        (Alert::SuccessSimple { message: message.to_owned() }.into_oob_html())
    };

    ([(HX_TRIGGER, CATEGORIES_CHANGED_EVENT)], body).into_response()
}

fn get_category_rows(connection: &Connection) -> Result<Vec<CategoryRow>, Error> {
    let categories = get_categories(connection)?;
    let products_per_category = count_products_per_category(connection)?;

    Ok(categories
        .into_iter()
        .map(|category| CategoryRow {
            product_count: *products_per_category.get(&category.id).unwrap_or(&0),
            category,
        })
        .collect())
}

fn count_products_per_category(connection: &Connection) -> Result<HashMap<CategoryId, u32>, Error> {
    let result: Result<HashMap<CategoryId, u32>, rusqlite::Error> = connection
        .prepare(
            "SELECT category_id, COUNT(1) FROM product \
            WHERE category_id IS NOT NULL GROUP BY category_id",
        )?
        .query_map((), |row| {
            let category_id = row.get(0)?;
            let count = row.get(1)?;

            Ok((category_id, count))
        })?
        .collect();

    result.map_err(Error::from)
}

fn category_form_view(category: Option<&Category>) -> Markup {
    html! {
        div id=(CATEGORY_FORM_CONTAINER_ID)
        {
            (category_form(category))
        }
    }
}

fn category_form(category: Option<&Category>) -> Markup {
    let list_target = format!("#{CATEGORY_LIST_ID}");
    let name = category
        .map(|category| category.name.as_ref())
        .unwrap_or("");
    let update_endpoint = category
        .map(|category| format_endpoint(endpoints::CATEGORY_FORM_ITEM, category.id));

    html! {
        form
            hx-post=[category.is_none().then_some(endpoints::POST_CATEGORY_FORM)]
            hx-put=[update_endpoint]
            hx-target=(list_target)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4"
        {
            (text_input("name", "Category Name", name, true))

            @match category {
                Some(category) => {
                    div class="flex gap-4 items-center"
                    {
                        button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update Category" }

                        button
                            type="button"
                            hx-delete=(format_endpoint(endpoints::CATEGORY_FORM_ITEM, category.id))
                            hx-confirm={
                                "Are you sure you want to delete '" (category.name) "'? \
                                This only works if no products use it."
                            }
                            hx-target=(list_target)
                            hx-swap="outerHTML"
                            hx-target-error="#alert-container"
                            class=(BUTTON_DELETE_STYLE)
                        {
                            "Delete"
                        }

                        button
                            type="button"
                            hx-get=(endpoints::CATEGORY_FORM)
                            hx-target={ "#" (CATEGORY_FORM_CONTAINER_ID) }
                            hx-swap="outerHTML"
                            class=(BUTTON_SECONDARY_STYLE)
                        {
                            "Clear"
                        }
                    }
                }
                None => {
                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Category" }
                }
            }
        }
    }
}

fn category_list_view(rows: &[CategoryRow]) -> Markup {
    let form_target = format!("#{CATEGORY_FORM_CONTAINER_ID}");

    html! {
        div id=(CATEGORY_LIST_ID) class="dark:bg-gray-800 w-full"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "ID" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Products" }
                    }
                }

                tbody
                {
                    @for row in rows {
                        tr
                            class=(TABLE_ROW_STYLE)
                            hx-get=(format_endpoint(endpoints::EDIT_CATEGORY_FORM, row.category.id))
                            hx-target=(form_target)
                            hx-swap="outerHTML"
                            hx-target-error="#alert-container"
                        {
                            td class=(TABLE_CELL_STYLE) { (row.category.id) }
                            td class=(TABLE_CELL_STYLE) { (row.category.name) }
                            td class=(TABLE_CELL_STYLE) { (row.product_count) }
                        }
                    }

                    @if rows.is_empty() {
                        tr
                        {
                            td
                                colspan="3"
                                class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                            {
                                "No categories yet. Add one above, or go to "
                                a href=(endpoints::PRODUCTS_VIEW) class=(LINK_STYLE) { "products" }
                                "."
                            }
                        }
                    }
                }
            }
        }
    }
}
