//! Opening the database file and creating the schema.

use std::path::Path;

use rusqlite::Connection;

use crate::{Error, category::create_category_table, product::create_product_table};

/// Open the database at `path`, creating the file if it does not exist, and
/// make sure the schema is in place.
///
/// # Errors
/// Returns an error if the file cannot be opened or the schema cannot be created.
pub fn open(path: impl AsRef<Path>) -> Result<Connection, Error> {
    let connection = Connection::open(path)?;
    initialize(&connection)?;

    Ok(connection)
}

/// Create the tables for the domain models.
///
/// Safe to call on a database that already has the tables and data in it.
/// Also turns on foreign key enforcement, which SQLite keeps per connection.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    create_category_table(connection)?;
    create_product_table(connection)?;

    Ok(())
}

/// Whether `error` is a failed UNIQUE constraint.
pub(crate) fn is_unique_violation(error: &rusqlite::Error) -> bool {
    // Code 2067 occurs when a UNIQUE constraint failed.
    matches!(
        error,
        rusqlite::Error::SqliteFailure(sql_error, _) if sql_error.extended_code == 2067
    )
}

/// Whether `error` is a failed FOREIGN KEY constraint.
pub(crate) fn is_foreign_key_violation(error: &rusqlite::Error) -> bool {
    // Code 787 occurs when a FOREIGN KEY constraint failed.
    matches!(
        error,
        rusqlite::Error::SqliteFailure(sql_error, _) if sql_error.extended_code == 787
    )
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use crate::{
        category::{CategoryName, add_category, get_categories},
        db::{initialize, open},
    };

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        assert_eq!(initialize(&connection), Ok(()));
        assert_eq!(initialize(&connection), Ok(()));
    }

    #[test]
    fn enables_foreign_keys() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let enabled: bool = connection
            .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
            .unwrap();

        assert!(enabled);
    }

    #[test]
    fn reopening_a_populated_file_keeps_the_data() {
        let directory = tempfile::tempdir().expect("Could not create temp dir");
        let path = directory.path().join("inventory.db");

        {
            let connection = open(&path).expect("Could not open database");
            add_category(CategoryName::new_unchecked("Shirts"), &connection)
                .expect("Could not create category");
        }

        let connection = open(&path).expect("Could not reopen database");
        let categories = get_categories(&connection).expect("Could not get categories");

        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name.as_ref(), "Shirts");
    }
}
