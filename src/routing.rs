//! Application router with the HTML page routes and the JSON API routes.

use axum::{
    Json, Router,
    response::Redirect,
    routing::{get, put},
};
use serde_json::{Value, json};

use crate::{
    AppState,
    category::{
        create_category_endpoint, create_category_form_endpoint, delete_category_endpoint,
        delete_category_form_endpoint, get_categories_endpoint, get_categories_page,
        get_category_form, get_edit_category_form, update_category_endpoint,
        update_category_form_endpoint,
    },
    endpoints,
    error_page::get_404_not_found,
    product::{
        create_product_endpoint, create_product_form_endpoint, delete_product_endpoint,
        delete_product_form_endpoint, get_category_options, get_edit_product_form,
        get_product_endpoint, get_product_form, get_product_list, get_products_endpoint,
        get_products_page, update_product_endpoint, update_product_form_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(
            endpoints::PRODUCTS_VIEW,
            get(get_products_page).post(create_product_form_endpoint),
        )
        .route(endpoints::PRODUCT_FORM, get(get_product_form))
        .route(endpoints::PRODUCT_LIST, get(get_product_list))
        .route(endpoints::CATEGORY_OPTIONS, get(get_category_options))
        .route(endpoints::EDIT_PRODUCT_FORM, get(get_edit_product_form))
        .route(
            endpoints::PRODUCT_FORM_ITEM,
            put(update_product_form_endpoint).delete(delete_product_form_endpoint),
        )
        .route(
            endpoints::CATEGORIES_VIEW,
            get(get_categories_page).post(create_category_form_endpoint),
        )
        .route(endpoints::CATEGORY_FORM, get(get_category_form))
        .route(endpoints::EDIT_CATEGORY_FORM, get(get_edit_category_form))
        .route(
            endpoints::CATEGORY_FORM_ITEM,
            put(update_category_form_endpoint).delete(delete_category_form_endpoint),
        );

    let api_routes = Router::new()
        .route(endpoints::API_ROOT, get(get_api_root))
        .route(
            endpoints::CATEGORIES_API,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY_API,
            put(update_category_endpoint).delete(delete_category_endpoint),
        )
        .route(
            endpoints::PRODUCTS_API,
            get(get_products_endpoint).post(create_product_endpoint),
        )
        .route(
            endpoints::PRODUCT_API,
            get(get_product_endpoint)
                .put(update_product_endpoint)
                .delete(delete_product_endpoint),
        );

    page_routes
        .merge(api_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the products page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::PRODUCTS_VIEW)
}

async fn get_api_root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the clothing store inventory API." }))
}
