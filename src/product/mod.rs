//! Products are the items for sale, each with an optional size and category.

mod api;
mod db;
mod domain;
mod page;

pub use api::{
    create_product_endpoint, delete_product_endpoint, get_product_endpoint, get_products_endpoint,
    update_product_endpoint,
};
pub use db::{
    add_product, create_product_table, delete_product, get_product, get_products, update_product,
};
pub use domain::{
    NewProduct, Price, ProductFormData, ProductId, ProductPayload, ProductWithCategoryName,
};
pub use page::{
    create_product_form_endpoint, delete_product_form_endpoint, get_category_options,
    get_edit_product_form, get_product_form, get_product_list, get_products_page,
    update_product_form_endpoint,
};
