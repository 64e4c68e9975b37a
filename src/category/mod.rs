//! Categories group products, e.g. 'Shirts' or 'Shoes'.

mod api;
mod db;
mod domain;
mod page;

pub use api::{
    create_category_endpoint, delete_category_endpoint, get_categories_endpoint,
    update_category_endpoint,
};
pub use db::{
    DeleteCategoryOutcome, UpdateCategoryOutcome, add_category, category_exists,
    create_category_table, delete_category, get_categories, get_category, update_category,
};
pub use domain::{Category, CategoryFormData, CategoryId, CategoryName};
pub use page::{
    CATEGORIES_CHANGED_EVENT, category_panel, create_category_form_endpoint,
    delete_category_form_endpoint, get_categories_page, get_category_form, get_edit_category_form,
    update_category_form_endpoint,
};
