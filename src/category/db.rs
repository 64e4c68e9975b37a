//! Database operations for categories.

use rusqlite::{Connection, Row, Transaction, TransactionBehavior};

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName},
    db::is_unique_violation,
};

/// The result of renaming a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateCategoryOutcome {
    /// The category was renamed.
    Updated,
    /// No category has the given ID.
    NotFound,
    /// Another category already uses the new name.
    DuplicateName,
}

/// The result of deleting a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteCategoryOutcome {
    /// The category was removed.
    Deleted,
    /// At least one product references the category, nothing was removed.
    InUse,
    /// No category has the given ID.
    NotFound,
}

/// Create a category and return it with its generated ID.
///
/// # Errors
///
/// Returns [Error::DuplicateCategoryName] if a category with the same name
/// (case-sensitive) already exists.
pub fn add_category(name: CategoryName, connection: &Connection) -> Result<Category, Error> {
    connection
        .execute("INSERT INTO category (name) VALUES (?1);", (name.as_ref(),))
        .map_err(|error| {
            if is_unique_violation(&error) {
                Error::DuplicateCategoryName(name.to_string())
            } else {
                error.into()
            }
        })?;

    let id = connection.last_insert_rowid();

    Ok(Category { id, name })
}

/// Retrieve a single category by ID.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name FROM category WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name FROM category ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Whether a category with `category_id` exists.
pub fn category_exists(category_id: CategoryId, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM category WHERE id = ?1);",
            [category_id],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Rename a category.
///
/// Only storage faults are returned as errors, a missing category or a name
/// collision are reported through [UpdateCategoryOutcome].
pub fn update_category(
    category_id: CategoryId,
    new_name: CategoryName,
    connection: &Connection,
) -> Result<UpdateCategoryOutcome, Error> {
    let result = connection.execute(
        "UPDATE category SET name = ?1 WHERE id = ?2",
        (new_name.as_ref(), category_id),
    );

    match result {
        Ok(0) => Ok(UpdateCategoryOutcome::NotFound),
        Ok(_) => Ok(UpdateCategoryOutcome::Updated),
        Err(error) if is_unique_violation(&error) => Ok(UpdateCategoryOutcome::DuplicateName),
        Err(error) => Err(error.into()),
    }
}

/// Delete a category unless a product still references it.
///
/// The usage check and the delete run in one immediate transaction, so no
/// other writer can attach a product to the category in between.
pub fn delete_category(
    category_id: CategoryId,
    connection: &Connection,
) -> Result<DeleteCategoryOutcome, Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    if count_products_in_category(category_id, &transaction)? > 0 {
        // Dropping the transaction rolls it back.
        return Ok(DeleteCategoryOutcome::InUse);
    }

    let rows_affected = transaction.execute("DELETE FROM category WHERE id = ?1", [category_id])?;
    transaction.commit()?;

    if rows_affected == 0 {
        Ok(DeleteCategoryOutcome::NotFound)
    } else {
        Ok(DeleteCategoryOutcome::Deleted)
    }
}

/// Count the products that reference `category_id`.
fn count_products_in_category(
    category_id: CategoryId,
    connection: &Connection,
) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT COUNT(1) FROM product WHERE category_id = ?1",
            [category_id],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        )",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);

    Ok(Category { id, name })
}
