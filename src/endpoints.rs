//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/products/{product_id}', use [format_endpoint].

/// The root route which redirects to the products page.
pub const ROOT: &str = "/";
/// The page for listing and editing products.
pub const PRODUCTS_VIEW: &str = "/products";
/// The page for listing and editing categories.
pub const CATEGORIES_VIEW: &str = "/categories";

/// The form route to create a product.
pub const POST_PRODUCT_FORM: &str = "/products";
/// The form route to update or delete a product.
pub const PRODUCT_FORM_ITEM: &str = "/products/{product_id}";
/// An empty product form, used to clear the selection.
pub const PRODUCT_FORM: &str = "/products/form";
/// The product form filled in with an existing product.
pub const EDIT_PRODUCT_FORM: &str = "/products/{product_id}/edit";
/// The product table fragment.
pub const PRODUCT_LIST: &str = "/products/list";
/// The `<option>` elements for the category selector of the product form.
pub const CATEGORY_OPTIONS: &str = "/products/category-options";
/// The form route to create a category.
pub const POST_CATEGORY_FORM: &str = "/categories";
/// The form route to update or delete a category.
pub const CATEGORY_FORM_ITEM: &str = "/categories/{category_id}";
/// An empty category form, used to clear the selection.
pub const CATEGORY_FORM: &str = "/categories/form";
/// The category form filled in with an existing category.
pub const EDIT_CATEGORY_FORM: &str = "/categories/{category_id}/edit";

/// The root of the JSON API.
pub const API_ROOT: &str = "/api";
/// The route to list and create categories.
pub const CATEGORIES_API: &str = "/api/categories";
/// The route to update and delete a category.
pub const CATEGORY_API: &str = "/api/categories/{category_id}";
/// The route to list and create products.
pub const PRODUCTS_API: &str = "/api/products";
/// The route to get, update and delete a product.
pub const PRODUCT_API: &str = "/api/products/{product_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/products/{product_id}', '{product_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let param_start = match endpoint_path.find('{') {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
