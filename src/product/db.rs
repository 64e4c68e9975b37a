//! Database operations for products.

use rusqlite::{Connection, Row, params};

use crate::{
    Error,
    category::{CategoryId, category_exists},
    db::is_foreign_key_violation,
    product::{NewProduct, ProductId, ProductWithCategoryName},
};

const SELECT_PRODUCT_WITH_CATEGORY_NAME: &str = "SELECT
        p.id,
        p.name,
        p.size,
        p.price,
        p.category_id,
        c.name
    FROM product p
    LEFT JOIN category c ON p.category_id = c.id";

/// Create a product and return its generated ID.
///
/// # Errors
///
/// Returns [Error::InvalidCategory] if `product.category_id` does not refer to
/// an existing category.
pub fn add_product(product: &NewProduct, connection: &Connection) -> Result<ProductId, Error> {
    ensure_category_exists(product.category_id, connection)?;

    connection
        .execute(
            "INSERT INTO product (name, size, price, category_id) VALUES (?1, ?2, ?3, ?4)",
            params![
                product.name,
                product.size,
                product.price,
                product.category_id
            ],
        )
        .map_err(|error| map_category_error(error, product.category_id))?;

    Ok(connection.last_insert_rowid())
}

/// Retrieve a single product with its category name.
pub fn get_product(
    product_id: ProductId,
    connection: &Connection,
) -> Result<ProductWithCategoryName, Error> {
    connection
        .prepare(&format!("{SELECT_PRODUCT_WITH_CATEGORY_NAME} WHERE p.id = :id;"))?
        .query_row(&[(":id", &product_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all products with their category names, ordered by product name.
///
/// Products without a category are included with `category_name` set to `None`.
pub fn get_products(connection: &Connection) -> Result<Vec<ProductWithCategoryName>, Error> {
    connection
        .prepare(&format!("{SELECT_PRODUCT_WITH_CATEGORY_NAME} ORDER BY p.name ASC, p.id ASC;"))?
        .query_map([], map_row)?
        .map(|maybe_product| maybe_product.map_err(|error| error.into()))
        .collect()
}

/// Replace every field of a product.
///
/// Returns `true` if the product was found and updated, `false` if there is
/// no product with `product_id`. A missing product is reported before the
/// category is checked.
///
/// # Errors
///
/// Returns [Error::InvalidCategory] if the product exists but
/// `product.category_id` does not refer to an existing category.
pub fn update_product(
    product_id: ProductId,
    product: &NewProduct,
    connection: &Connection,
) -> Result<bool, Error> {
    if !product_exists(product_id, connection)? {
        return Ok(false);
    }

    ensure_category_exists(product.category_id, connection)?;

    let rows_affected = connection
        .execute(
            "UPDATE product
            SET name = ?1, size = ?2, price = ?3, category_id = ?4
            WHERE id = ?5",
            params![
                product.name,
                product.size,
                product.price,
                product.category_id,
                product_id
            ],
        )
        .map_err(|error| map_category_error(error, product.category_id))?;

    Ok(rows_affected != 0)
}

/// Delete a product. Returns `false` if there is no product with `product_id`.
pub fn delete_product(product_id: ProductId, connection: &Connection) -> Result<bool, Error> {
    let rows_affected = connection.execute("DELETE FROM product WHERE id = ?1", [product_id])?;

    Ok(rows_affected != 0)
}

/// Initialize the product table and indexes.
///
/// `ON DELETE SET NULL` is never triggered by [crate::category::delete_category],
/// which refuses to delete categories that products still use.
pub fn create_product_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS product (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            size TEXT,
            price REAL NOT NULL,
            category_id INTEGER,
            FOREIGN KEY (category_id) REFERENCES category (id) ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_product_category_id ON product(category_id);",
    )?;

    Ok(())
}

fn product_exists(product_id: ProductId, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM product WHERE id = ?1);",
            [product_id],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

fn ensure_category_exists(
    category_id: Option<CategoryId>,
    connection: &Connection,
) -> Result<(), Error> {
    match category_id {
        Some(id) if !category_exists(id, connection)? => Err(Error::InvalidCategory(id)),
        _ => Ok(()),
    }
}

fn map_category_error(error: rusqlite::Error, category_id: Option<CategoryId>) -> Error {
    match category_id {
        Some(id) if is_foreign_key_violation(&error) => Error::InvalidCategory(id),
        _ => error.into(),
    }
}

fn map_row(row: &Row) -> Result<ProductWithCategoryName, rusqlite::Error> {
    Ok(ProductWithCategoryName {
        id: row.get(0)?,
        name: row.get(1)?,
        size: row.get(2)?,
        price: row.get(3)?,
        category_id: row.get(4)?,
        category_name: row.get(5)?,
    })
}

#[cfg(test)]
mod product_query_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        category::{
            Category, CategoryName, DeleteCategoryOutcome, add_category, delete_category,
            get_categories,
        },
        db::initialize,
        product::{
            NewProduct, ProductWithCategoryName, add_product, delete_product, get_product,
            get_products, update_product,
        },
    };

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    fn must_add_category(name: &str, connection: &Connection) -> Category {
        add_category(CategoryName::new_unchecked(name), connection)
            .expect("Could not create test category")
    }

    fn new_product(name: &str, category_id: Option<i64>) -> NewProduct {
        NewProduct {
            name: name.to_owned(),
            size: Some("M".to_owned()),
            price: 29.90,
            category_id,
        }
    }

    #[test]
    fn add_then_get_product_round_trips() {
        let connection = get_test_db_connection();
        let shirts = must_add_category("Shirts", &connection);
        let product = new_product("Blue Tee", Some(shirts.id));

        let id = add_product(&product, &connection).expect("Could not create product");

        assert_eq!(
            get_product(id, &connection),
            Ok(ProductWithCategoryName {
                id,
                name: "Blue Tee".to_owned(),
                size: Some("M".to_owned()),
                price: 29.90,
                category_id: Some(shirts.id),
                category_name: Some("Shirts".to_owned()),
            })
        );
    }

    #[test]
    fn add_product_without_category_or_size() {
        let connection = get_test_db_connection();
        let product = NewProduct {
            name: "Gift Card".to_owned(),
            size: None,
            price: 0.0,
            category_id: None,
        };

        let id = add_product(&product, &connection).expect("Could not create product");

        let got = get_product(id, &connection).unwrap();
        assert_eq!(got.size, None);
        assert_eq!(got.category_name, None);
        assert_eq!(got.category_label(), "No category");
    }

    #[test]
    fn add_product_with_unknown_category_fails() {
        let connection = get_test_db_connection();

        let result = add_product(&new_product("Blue Tee", Some(42)), &connection);

        assert_eq!(result, Err(Error::InvalidCategory(42)));
        assert_eq!(get_products(&connection), Ok(vec![]));
    }

    #[test]
    fn get_product_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();

        assert_eq!(get_product(999, &connection), Err(Error::NotFound));
    }

    #[test]
    fn get_products_orders_by_name_regardless_of_insertion_order() {
        let connection = get_test_db_connection();
        for name in ["Socks", "Belt", "Trousers", "Anorak", "Jacket"] {
            add_product(&new_product(name, None), &connection).unwrap();
        }

        let names = get_products(&connection)
            .unwrap()
            .into_iter()
            .map(|product| product.name)
            .collect::<Vec<_>>();

        assert_eq!(names, ["Anorak", "Belt", "Jacket", "Socks", "Trousers"]);
    }

    #[test]
    fn get_products_includes_category_names() {
        let connection = get_test_db_connection();
        let shirts = must_add_category("Shirts", &connection);
        add_product(&new_product("Blue Tee", Some(shirts.id)), &connection).unwrap();
        add_product(&new_product("Gift Card", None), &connection).unwrap();

        let labels = get_products(&connection)
            .unwrap()
            .iter()
            .map(|product| (product.name.clone(), product.category_name.clone()))
            .collect::<Vec<_>>();

        assert_eq!(
            labels,
            [
                ("Blue Tee".to_owned(), Some("Shirts".to_owned())),
                ("Gift Card".to_owned(), None),
            ]
        );
    }

    #[test]
    fn update_product_succeeds() {
        let connection = get_test_db_connection();
        let shirts = must_add_category("Shirts", &connection);
        let pants = must_add_category("Pants", &connection);
        let id = add_product(&new_product("Blue Tee", Some(shirts.id)), &connection).unwrap();
        let updated = NewProduct {
            name: "Chinos".to_owned(),
            size: Some("42".to_owned()),
            price: 59.0,
            category_id: Some(pants.id),
        };

        let result = update_product(id, &updated, &connection);

        assert_eq!(result, Ok(true));
        let got = get_product(id, &connection).unwrap();
        assert_eq!(got.name, "Chinos");
        assert_eq!(got.size.as_deref(), Some("42"));
        assert_eq!(got.price, 59.0);
        assert_eq!(got.category_name.as_deref(), Some("Pants"));
    }

    #[test]
    fn update_product_with_invalid_id_returns_false() {
        let connection = get_test_db_connection();

        let result = update_product(999, &new_product("Blue Tee", None), &connection);

        assert_eq!(result, Ok(false));
    }

    #[test]
    fn update_missing_product_with_unknown_category_returns_false() {
        let connection = get_test_db_connection();

        let result = update_product(999, &new_product("Blue Tee", Some(42)), &connection);

        assert_eq!(result, Ok(false));
    }

    #[test]
    fn update_product_with_unknown_category_fails() {
        let connection = get_test_db_connection();
        let id = add_product(&new_product("Blue Tee", None), &connection).unwrap();

        let result = update_product(id, &new_product("Blue Tee", Some(7)), &connection);

        assert_eq!(result, Err(Error::InvalidCategory(7)));
        assert_eq!(get_product(id, &connection).unwrap().category_id, None);
    }

    #[test]
    fn delete_product_succeeds() {
        let connection = get_test_db_connection();
        let id = add_product(&new_product("Blue Tee", None), &connection).unwrap();

        assert_eq!(delete_product(id, &connection), Ok(true));
        assert_eq!(get_product(id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_product_with_invalid_id_returns_false() {
        let connection = get_test_db_connection();

        assert_eq!(delete_product(999, &connection), Ok(false));
    }

    #[test]
    fn store_scenario() {
        let connection = get_test_db_connection();
        let shirts = must_add_category("Shirts", &connection);
        let pants = must_add_category("Pants", &connection);
        assert_eq!(
            add_category(CategoryName::new_unchecked("Shirts"), &connection),
            Err(Error::DuplicateCategoryName("Shirts".to_owned()))
        );

        let tee = add_product(&new_product("Blue Tee", Some(shirts.id)), &connection).unwrap();
        let products = get_products(&connection).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].category_name.as_deref(), Some("Shirts"));

        assert_eq!(
            delete_category(shirts.id, &connection),
            Ok(DeleteCategoryOutcome::InUse)
        );

        assert_eq!(delete_product(tee, &connection), Ok(true));
        assert_eq!(
            delete_category(shirts.id, &connection),
            Ok(DeleteCategoryOutcome::Deleted)
        );
        assert_eq!(get_categories(&connection), Ok(vec![pants]));
    }
}
