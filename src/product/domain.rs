//! Core product domain types and form validation.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, category::CategoryId};

/// Database identifier for a product.
pub type ProductId = i64;

/// A validated, non-negative price.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Price(f64);

impl Price {
    /// Create a price.
    ///
    /// # Errors
    ///
    /// Returns [Error::NegativePrice] if `amount` is below zero and
    /// [Error::InvalidPrice] if it is not a finite number.
    pub fn new(amount: f64) -> Result<Self, Error> {
        if !amount.is_finite() {
            Err(Error::InvalidPrice(amount.to_string()))
        } else if amount < 0.0 {
            Err(Error::NegativePrice(amount))
        } else {
            Ok(Self(amount))
        }
    }

    /// The price as a plain number.
    pub fn as_f64(self) -> f64 {
        self.0
    }
}

impl FromStr for Price {
    type Err = Error;

    /// Parse a price typed by a person, accepting either '.' or ',' as the
    /// decimal separator (e.g., "10.50" or "10,50").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(Error::MissingPrice);
        }

        let amount = trimmed
            .replace(',', ".")
            .parse::<f64>()
            .map_err(|_| Error::InvalidPrice(trimmed.to_owned()))?;

        Price::new(amount)
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// The fields needed to create or update a product.
///
/// The storage layer does not check `name` or `price`, use
/// [NewProduct::new] to validate user input first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    /// The product name.
    pub name: String,
    /// A free-form size such as "M" or "42".
    pub size: Option<String>,
    /// The price, expected to be non-negative.
    pub price: f64,
    /// The category the product belongs to, if any.
    pub category_id: Option<CategoryId>,
}

impl NewProduct {
    /// Validate user input and build a product.
    ///
    /// `name` and `size` are trimmed and a blank size is treated as no size.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyProductName] if `name` is blank.
    pub fn new(
        name: &str,
        size: Option<&str>,
        price: Price,
        category_id: Option<CategoryId>,
    ) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            return Err(Error::EmptyProductName);
        }

        let size = size
            .map(str::trim)
            .filter(|size| !size.is_empty())
            .map(str::to_owned);

        Ok(Self {
            name: name.to_owned(),
            size,
            price: price.as_f64(),
            category_id,
        })
    }
}

/// A product joined with the name of its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductWithCategoryName {
    /// Assigned by the database when the product is created.
    pub id: ProductId,
    /// The product name.
    pub name: String,
    /// A free-form size such as "M" or "42".
    pub size: Option<String>,
    /// The price.
    pub price: f64,
    /// The category the product belongs to, if any.
    pub category_id: Option<CategoryId>,
    /// The name of the category, `None` when the product has no category or
    /// the category could not be resolved.
    pub category_name: Option<String>,
}

/// Label shown in place of a category name for products without one.
const NO_CATEGORY_LABEL: &str = "No category";

impl ProductWithCategoryName {
    /// The category name, or "No category" if there is none.
    pub fn category_label(&self) -> &str {
        self.category_name.as_deref().unwrap_or(NO_CATEGORY_LABEL)
    }
}

/// JSON payload for creating and updating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPayload {
    /// The product name.
    pub name: String,
    /// An optional, free-form size.
    #[serde(default)]
    pub size: Option<String>,
    /// The price, must not be negative.
    pub price: f64,
    /// The category the product belongs to.
    pub category_id: CategoryId,
}

impl ProductPayload {
    /// Validate the payload.
    pub fn validate(&self) -> Result<NewProduct, Error> {
        NewProduct::new(
            &self.name,
            self.size.as_deref(),
            Price::new(self.price)?,
            Some(self.category_id),
        )
    }
}

/// Form data for creating and updating a product.
///
/// Every field is kept as text so that missing or malformed values can be
/// reported back to the user instead of rejected by the extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductFormData {
    /// The product name.
    #[serde(default)]
    pub name: String,
    /// An optional, free-form size.
    #[serde(default)]
    pub size: String,
    /// The price as typed.
    #[serde(default)]
    pub price: String,
    /// The selected category ID, empty when nothing is selected.
    #[serde(default)]
    pub category_id: String,
}

impl ProductFormData {
    /// Validate the form.
    ///
    /// Fields are checked in the order a person fills them in: name, price,
    /// then category.
    pub fn validate(&self) -> Result<NewProduct, Error> {
        if self.name.trim().is_empty() {
            return Err(Error::EmptyProductName);
        }

        let price = self.price.parse::<Price>()?;

        let category_id = self
            .category_id
            .trim()
            .parse::<CategoryId>()
            .map_err(|_| Error::MissingCategory)?;

        NewProduct::new(&self.name, Some(&self.size), price, Some(category_id))
    }
}
