//! JSON endpoints for products.

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
    json_error,
    product::{
        ProductId, ProductPayload, ProductWithCategoryName, add_product, delete_product,
        get_product, get_products, update_product,
    },
};

/// The state needed by the product endpoints.
#[derive(Debug, Clone)]
pub struct ProductState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ProductState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Create a product, responds with 201 and the product including its category name.
pub async fn create_product_endpoint(
    State(state): State<ProductState>,
    Json(payload): Json<ProductPayload>,
) -> Result<Response, Error> {
    let new_product = payload.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    let product_id = match add_product(&new_product, &connection) {
        Ok(product_id) => product_id,
        Err(Error::InvalidCategory(category_id)) => {
            return Ok(json_error(
                StatusCode::BAD_REQUEST,
                format!(
                    "Could not create the product, there is no category with the ID {category_id}."
                ),
            ));
        }
        Err(error) => return Err(error),
    };

    let product = get_product(product_id, &connection)?;
    tracing::info!("Created product {product:?}");

    Ok((StatusCode::CREATED, Json(product)).into_response())
}

/// List every product with its category name, ordered by product name.
pub async fn get_products_endpoint(
    State(state): State<ProductState>,
) -> Result<Json<Vec<ProductWithCategoryName>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_products(&connection).map(Json)
}

/// Get a single product with its category name.
pub async fn get_product_endpoint(
    Path(product_id): Path<ProductId>,
    State(state): State<ProductState>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;

    match get_product(product_id, &connection) {
        Ok(product) => Ok(Json(product).into_response()),
        Err(Error::NotFound) => Ok(product_not_found(product_id)),
        Err(error) => Err(error),
    }
}

/// Replace a product, responds with the updated product.
pub async fn update_product_endpoint(
    Path(product_id): Path<ProductId>,
    State(state): State<ProductState>,
    Json(payload): Json<ProductPayload>,
) -> Result<Response, Error> {
    let new_product = payload.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    match update_product(product_id, &new_product, &connection) {
        Ok(true) => {}
        Ok(false) => return Ok(product_not_found(product_id)),
        Err(Error::InvalidCategory(category_id)) => {
            return Ok(json_error(
                StatusCode::BAD_REQUEST,
                format!(
                    "Could not update the product, there is no category with the ID {category_id}."
                ),
            ));
        }
        Err(error) => return Err(error),
    }

    let product = get_product(product_id, &connection)?;

    Ok(Json(product).into_response())
}

/// Delete a product.
pub async fn delete_product_endpoint(
    Path(product_id): Path<ProductId>,
    State(state): State<ProductState>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;

    if !delete_product(product_id, &connection)? {
        return Ok(product_not_found(product_id));
    }

    Ok(Json(json!({
        "message": format!("Product ID {product_id} deleted successfully.")
    }))
    .into_response())
}

fn product_not_found(product_id: ProductId) -> Response {
    json_error(
        StatusCode::NOT_FOUND,
        format!("Product with ID {product_id} not found."),
    )
}

#[cfg(test)]
mod product_api_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{
        AppState, ErrorBody,
        app_state::lock_connection,
        build_router,
        category::{Category, CategoryName, add_category},
        endpoints::{self, format_endpoint},
        product::ProductWithCategoryName,
    };

    fn get_test_state() -> AppState {
        AppState::new(Connection::open_in_memory().unwrap()).expect("Could not create app state")
    }

    fn get_test_server(state: AppState) -> TestServer {
        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    fn must_add_category(name: &str, state: &AppState) -> Category {
        add_category(
            CategoryName::new_unchecked(name),
            &lock_connection(&state.db_connection).unwrap(),
        )
        .expect("Could not create test category")
    }

    fn payload(name: &str, price: f64, category_id: i64) -> Value {
        json!({
            "name": name,
            "size": "M",
            "price": price,
            "category_id": category_id,
        })
    }

    async fn must_create_product(
        server: &TestServer,
        name: &str,
        category_id: i64,
    ) -> ProductWithCategoryName {
        let response = server
            .post(endpoints::PRODUCTS_API)
            .json(&payload(name, 29.90, category_id))
            .await;
        response.assert_status(StatusCode::CREATED);

        response.json::<ProductWithCategoryName>()
    }

    #[tokio::test]
    async fn create_product_returns_product_with_category_name() {
        let state = get_test_state();
        let shirts = must_add_category("Shirts", &state);
        let server = get_test_server(state);

        let product = must_create_product(&server, "Blue Tee", shirts.id).await;

        assert!(product.id > 0);
        assert_eq!(product.name, "Blue Tee");
        assert_eq!(product.size.as_deref(), Some("M"));
        assert_eq!(product.price, 29.90);
        assert_eq!(product.category_id, Some(shirts.id));
        assert_eq!(product.category_name.as_deref(), Some("Shirts"));
    }

    #[tokio::test]
    async fn create_product_without_size() {
        let state = get_test_state();
        let shirts = must_add_category("Shirts", &state);
        let server = get_test_server(state);

        let response = server
            .post(endpoints::PRODUCTS_API)
            .json(&json!({ "name": "Scarf", "price": 12.5, "category_id": shirts.id }))
            .await;

        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.json::<ProductWithCategoryName>().size, None);
    }

    #[tokio::test]
    async fn create_product_with_unknown_category_returns_bad_request() {
        let server = get_test_server(get_test_state());

        let response = server
            .post(endpoints::PRODUCTS_API)
            .json(&payload("Blue Tee", 29.90, 42))
            .await;

        response.assert_status_bad_request();
        assert_eq!(
            response.json::<ErrorBody>().detail,
            "Could not create the product, there is no category with the ID 42."
        );
    }

    #[tokio::test]
    async fn create_product_with_negative_price_returns_bad_request() {
        let state = get_test_state();
        let shirts = must_add_category("Shirts", &state);
        let server = get_test_server(state);

        let response = server
            .post(endpoints::PRODUCTS_API)
            .json(&payload("Blue Tee", -1.0, shirts.id))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn list_products_is_sorted_by_name() {
        let state = get_test_state();
        let shirts = must_add_category("Shirts", &state);
        let server = get_test_server(state);
        for name in ["Tank Top", "Blue Tee", "Polo"] {
            must_create_product(&server, name, shirts.id).await;
        }

        let response = server.get(endpoints::PRODUCTS_API).await;

        response.assert_status_ok();
        let names = response
            .json::<Vec<ProductWithCategoryName>>()
            .into_iter()
            .map(|product| product.name)
            .collect::<Vec<_>>();
        assert_eq!(names, ["Blue Tee", "Polo", "Tank Top"]);
    }

    #[tokio::test]
    async fn get_missing_product_returns_not_found() {
        let server = get_test_server(get_test_state());

        let response = server
            .get(&format_endpoint(endpoints::PRODUCT_API, 42))
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn update_product_returns_updated_product() {
        let state = get_test_state();
        let shirts = must_add_category("Shirts", &state);
        let pants = must_add_category("Pants", &state);
        let server = get_test_server(state);
        let product = must_create_product(&server, "Blue Tee", shirts.id).await;

        let response = server
            .put(&format_endpoint(endpoints::PRODUCT_API, product.id))
            .json(&payload("Chinos", 59.0, pants.id))
            .await;

        response.assert_status_ok();
        let updated = response.json::<ProductWithCategoryName>();
        assert_eq!(updated.id, product.id);
        assert_eq!(updated.name, "Chinos");
        assert_eq!(updated.category_name.as_deref(), Some("Pants"));
    }

    #[tokio::test]
    async fn update_missing_product_returns_not_found() {
        let state = get_test_state();
        let shirts = must_add_category("Shirts", &state);
        let server = get_test_server(state);

        let response = server
            .put(&format_endpoint(endpoints::PRODUCT_API, 42))
            .json(&payload("Blue Tee", 1.0, shirts.id))
            .await;

        response.assert_status_not_found();
        assert_eq!(
            response.json::<ErrorBody>().detail,
            "Product with ID 42 not found."
        );
    }

    #[tokio::test]
    async fn update_missing_product_with_unknown_category_returns_not_found() {
        let server = get_test_server(get_test_state());

        let response = server
            .put(&format_endpoint(endpoints::PRODUCT_API, 999))
            .json(&payload("Blue Tee", 1.0, 42))
            .await;

        response.assert_status_not_found();
        assert_eq!(
            response.json::<ErrorBody>().detail,
            "Product with ID 999 not found."
        );
    }

    #[tokio::test]
    async fn update_product_with_unknown_category_returns_bad_request() {
        let state = get_test_state();
        let shirts = must_add_category("Shirts", &state);
        let server = get_test_server(state);
        let product = must_create_product(&server, "Blue Tee", shirts.id).await;

        let response = server
            .put(&format_endpoint(endpoints::PRODUCT_API, product.id))
            .json(&payload("Blue Tee", 1.0, 42))
            .await;

        response.assert_status_bad_request();
        assert_eq!(
            response.json::<ErrorBody>().detail,
            "Could not update the product, there is no category with the ID 42."
        );
        let unchanged = server
            .get(&format_endpoint(endpoints::PRODUCT_API, product.id))
            .await
            .json::<ProductWithCategoryName>();
        assert_eq!(unchanged.category_id, Some(shirts.id));
    }

    #[tokio::test]
    async fn delete_product_then_category() {
        let state = get_test_state();
        let shirts = must_add_category("Shirts", &state);
        let server = get_test_server(state);
        let product = must_create_product(&server, "Blue Tee", shirts.id).await;
        let category_url = format_endpoint(endpoints::CATEGORY_API, shirts.id);

        server
            .delete(&category_url)
            .await
            .assert_status_bad_request();

        server
            .delete(&format_endpoint(endpoints::PRODUCT_API, product.id))
            .await
            .assert_status_ok();

        server.delete(&category_url).await.assert_status_ok();
    }

    #[tokio::test]
    async fn delete_missing_product_returns_not_found() {
        let server = get_test_server(get_test_state());

        let response = server
            .delete(&format_endpoint(endpoints::PRODUCT_API, 42))
            .await;

        response.assert_status_not_found();
    }
}
