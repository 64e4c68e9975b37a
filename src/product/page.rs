//! The product page: the product form and list, with the category panel below.
//!
//! The category selector and the product list both listen for the
//! [CATEGORIES_CHANGED_EVENT] so they stay in step with category edits made
//! on the same page.

use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    Error,
    alert::Alert,
    app_state::lock_connection,
    category::{CATEGORIES_CHANGED_EVENT, Category, CategoryId, category_panel, get_categories},
    endpoints::{self, format_endpoint},
    error_page::get_internal_server_error_response,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, format_price, text_input,
    },
    navigation::NavBar,
    product::{
        ProductFormData, ProductId, ProductWithCategoryName, add_product, api::ProductState,
        delete_product, get_product, get_products, update_product,
    },
};

const PRODUCT_LIST_ID: &str = "product-list";
const PRODUCT_FORM_CONTAINER_ID: &str = "product-form-container";

/// Render the product page.
pub async fn get_products_page(State(state): State<ProductState>) -> Response {
    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Failed to render the products page: {error}");
            return get_internal_server_error_response();
        }
    };

    let content = match products_page_content(&connection) {
        Ok(content) => content,
        Err(error) => {
            tracing::error!("Failed to render the products page: {error}");
            return get_internal_server_error_response();
        }
    };

    base("Products", &content).into_response()
}

fn products_page_content(connection: &Connection) -> Result<Markup, Error> {
    let products = get_products(connection)?;
    let categories = get_categories(connection)?;
    let category_section = category_panel(connection)?;

    Ok(html! {
        (NavBar::new(endpoints::PRODUCTS_VIEW).into_html())

        main class={ (PAGE_CONTAINER_STYLE) " space-y-8" }
        {
            section class="w-full max-w-3xl space-y-4"
            {
                h2 class="text-xl font-bold" { "Products" }

                (product_form_view(None, &categories))
                (product_list_view(&products))
            }

            (category_section)
        }
    })
}

/// The product table on its own, reloaded whenever categories change.
pub async fn get_product_list(State(state): State<ProductState>) -> Response {
    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_alert_response(),
    };

    match get_products(&connection) {
        Ok(products) => product_list_view(&products).into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// An empty product form for creating a product.
pub async fn get_product_form(State(state): State<ProductState>) -> Response {
    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_alert_response(),
    };

    match get_categories(&connection) {
        Ok(categories) => product_form_view(None, &categories).into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// The product form filled in with the selected product.
pub async fn get_edit_product_form(
    Path(product_id): Path<ProductId>,
    State(state): State<ProductState>,
) -> Response {
    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_alert_response(),
    };

    let product = match get_product(product_id, &connection) {
        Ok(product) => product,
        Err(error) => {
            if error != Error::NotFound {
                tracing::error!("Failed to retrieve product {product_id}: {error}");
            }

            return error.into_alert_response();
        }
    };

    match get_categories(&connection) {
        Ok(categories) => product_form_view(Some(&product), &categories).into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// The query string sent by the category selector when it reloads itself.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryOptionsQuery {
    /// The currently selected category, kept selected if it still exists.
    category_id: Option<String>,
}

/// The `<option>` elements for the product form's category selector.
pub async fn get_category_options(
    Query(query): Query<CategoryOptionsQuery>,
    State(state): State<ProductState>,
) -> Response {
    let selected = query
        .category_id
        .and_then(|category_id| category_id.trim().parse::<CategoryId>().ok());

    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_alert_response(),
    };

    match get_categories(&connection) {
        Ok(categories) => category_options(&categories, selected).into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Handle the product creation form.
pub async fn create_product_form_endpoint(
    State(state): State<ProductState>,
    Form(form): Form<ProductFormData>,
) -> Response {
    let new_product = match form.validate() {
        Ok(new_product) => new_product,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_alert_response(),
    };

    match add_product(&new_product, &connection) {
        Ok(_) => mutation_response(&connection, &format!("Product '{}' added.", new_product.name)),
        Err(Error::InvalidCategory(_)) => missing_category_response("Could not add product"),
        Err(error) => error.into_alert_response(),
    }
}

/// Handle the product update form.
pub async fn update_product_form_endpoint(
    Path(product_id): Path<ProductId>,
    State(state): State<ProductState>,
    Form(form): Form<ProductFormData>,
) -> Response {
    let new_product = match form.validate() {
        Ok(new_product) => new_product,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_alert_response(),
    };

    match update_product(product_id, &new_product, &connection) {
        Ok(true) => mutation_response(&connection, "Product updated."),
        Ok(false) => product_not_found_response("Could not update product"),
        Err(Error::InvalidCategory(_)) => missing_category_response("Could not update product"),
        Err(error) => error.into_alert_response(),
    }
}

/// Handle the product delete button.
pub async fn delete_product_form_endpoint(
    Path(product_id): Path<ProductId>,
    State(state): State<ProductState>,
) -> Response {
    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_alert_response(),
    };

    match delete_product(product_id, &connection) {
        Ok(true) => mutation_response(&connection, "Product deleted."),
        Ok(false) => product_not_found_response("Could not delete product"),
        Err(error) => {
            tracing::error!("Could not delete product {product_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn product_not_found_response(message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Alert::Error {
            message: message.to_owned(),
            details: "The product could not be found. \
                Try refreshing the page to see if it has already been deleted."
                .to_owned(),
        }
        .into_html(),
    )
        .into_response()
}

fn missing_category_response(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Alert::Error {
            message: message.to_owned(),
            details: "The selected category no longer exists. \
                Choose another category and try again."
                .to_owned(),
        }
        .into_html(),
    )
        .into_response()
}

/// The refreshed list, a cleared form and a success alert.
fn mutation_response(connection: &Connection, message: &str) -> Response {
    let lists = get_products(connection).and_then(|products| {
        get_categories(connection).map(|categories| (products, categories))
    });

    let (products, categories) = match lists {
        Ok(lists) => lists,
        Err(error) => return error.into_alert_response(),
    };

    html! {
        (product_list_view(&products))

        div id=(PRODUCT_FORM_CONTAINER_ID) hx-swap-oob="true"
        {
            (product_form(None, &categories))
        }

        (Alert::SuccessSimple { message: message.to_owned() }.into_oob_html())
    }
    .into_response()
}

fn product_form_view(product: Option<&ProductWithCategoryName>, categories: &[Category]) -> Markup {
    html! {
        div id=(PRODUCT_FORM_CONTAINER_ID)
        {
            (product_form(product, categories))
        }
    }
}

fn product_form(product: Option<&ProductWithCategoryName>, categories: &[Category]) -> Markup {
    let list_target = format!("#{PRODUCT_LIST_ID}");
    let name = product.map(|product| product.name.as_str()).unwrap_or("");
    let size = product
        .and_then(|product| product.size.as_deref())
        .unwrap_or("");
    // The stored value, not the two decimal display, so resubmitting keeps it.
    let price = product
        .map(|product| product.price.to_string())
        .unwrap_or_default();
    let selected = product.and_then(|product| product.category_id);
    let refresh_trigger = format!("{CATEGORIES_CHANGED_EVENT} from:body");
    let update_endpoint = product
        .map(|product| format_endpoint(endpoints::PRODUCT_FORM_ITEM, product.id));

    html! {
        form
            hx-post=[product.is_none().then_some(endpoints::POST_PRODUCT_FORM)]
            hx-put=[update_endpoint]
            hx-target=(list_target)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4"
        {
            (text_input("name", "Name", name, true))
            (text_input("size", "Size", size, false))

            div
            {
                label for="price" class=(FORM_LABEL_STYLE) { "Price" }

                input
                    id="price"
                    type="text"
                    inputmode="decimal"
                    name="price"
                    placeholder="0.00"
                    value=(price)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="category_id" class=(FORM_LABEL_STYLE) { "Category" }

                select
                    id="category_id"
                    name="category_id"
                    required
                    hx-get=(endpoints::CATEGORY_OPTIONS)
                    hx-trigger=(refresh_trigger)
                    hx-include="this"
                    hx-target="this"
                    hx-swap="innerHTML"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    (category_options(categories, selected))
                }
            }

            @match product {
                Some(product) => {
                    div class="flex gap-4 items-center"
                    {
                        button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update Product" }

                        button
                            type="button"
                            hx-delete=(format_endpoint(endpoints::PRODUCT_FORM_ITEM, product.id))
                            hx-confirm={ "Are you sure you want to delete '" (product.name) "'?" }
                            hx-target=(list_target)
                            hx-swap="outerHTML"
                            hx-target-error="#alert-container"
                            class=(BUTTON_DELETE_STYLE)
                        {
                            "Delete"
                        }

                        button
                            type="button"
                            hx-get=(endpoints::PRODUCT_FORM)
                            hx-target={ "#" (PRODUCT_FORM_CONTAINER_ID) }
                            hx-swap="outerHTML"
                            class=(BUTTON_SECONDARY_STYLE)
                        {
                            "Clear"
                        }
                    }
                }
                None => {
                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Product" }
                }
            }
        }
    }
}

fn category_options(categories: &[Category], selected: Option<CategoryId>) -> Markup {
    let has_selection = categories
        .iter()
        .any(|category| Some(category.id) == selected);

    html! {
        @if categories.is_empty() {
            option value="" disabled selected { "Create a category first" }
        } @else {
            option value="" disabled selected[!has_selection] { "Select a category" }

            @for category in categories {
                option value=(category.id) selected[Some(category.id) == selected] {
                    (category.name)
                }
            }
        }
    }
}

fn product_list_view(products: &[ProductWithCategoryName]) -> Markup {
    let form_target = format!("#{PRODUCT_FORM_CONTAINER_ID}");
    let refresh_trigger = format!("{CATEGORIES_CHANGED_EVENT} from:body");

    html! {
        div
            id=(PRODUCT_LIST_ID)
            hx-get=(endpoints::PRODUCT_LIST)
            hx-trigger=(refresh_trigger)
            hx-swap="outerHTML"
            class="dark:bg-gray-800 w-full"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "ID" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Size" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Price" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                    }
                }

                tbody
                {
                    @for product in products {
                        tr
                            class=(TABLE_ROW_STYLE)
                            hx-get=(format_endpoint(endpoints::EDIT_PRODUCT_FORM, product.id))
                            hx-target=(form_target)
                            hx-swap="outerHTML"
                            hx-target-error="#alert-container"
                        {
                            td class=(TABLE_CELL_STYLE) { (product.id) }
                            td class=(TABLE_CELL_STYLE) { (product.name) }
                            td class=(TABLE_CELL_STYLE) { (product.size.as_deref().unwrap_or("")) }
                            td class=(TABLE_CELL_STYLE) { (format_price(product.price)) }
                            td class=(TABLE_CELL_STYLE) { (product.category_label()) }
                        }
                    }

                    @if products.is_empty() {
                        tr
                        {
                            td
                                colspan="5"
                                class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                            {
                                "No products yet. Fill in the form above to add one."
                            }
                        }
                    }
                }
            }
        }
    }
}
