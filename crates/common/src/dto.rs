//! Flat transfer objects exchanged with callers.
//!
//! These shapes carry no behavior: identifiers are strings, money is a
//! decimal, dates are strings (`YYYY-MM-DD` for order dates, `MM/YY` for card
//! expiry). Missing JSON fields deserialize to their empty defaults.

use serde::{Deserialize, Serialize};

use crate::Money;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerDto {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub telephone: String,
}

impl CustomerDto {
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryDto {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl CategoryDto {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category_id: String,
}

impl ProductDto {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        category_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category_id: category_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemDto {
    pub id: String,
    pub name: String,
    pub unit_cost: Money,
    pub image_path: String,
    pub product_id: String,
}

impl ItemDto {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit_cost: Money,
        product_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_cost,
            image_path: String::new(),
            product_id: product_id.into(),
        }
    }
}

/// One line of an order.
///
/// `unit_price` is ignored on input: it is copied from the referenced item
/// when the order is created.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderLineDto {
    pub id: String,
    pub quantity: i32,
    pub unit_price: Money,
    pub item_id: String,
}

impl OrderLineDto {
    pub fn new(quantity: i32, item_id: impl Into<String>) -> Self {
        Self {
            quantity,
            item_id: item_id.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderDto {
    pub id: String,
    pub order_date: String,
    pub first_name: String,
    pub last_name: String,
    pub street1: String,
    pub street2: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub credit_card_type: String,
    pub credit_card_number: String,
    pub credit_card_expiry_date: String,
    pub customer_id: String,
    pub order_lines: Vec<OrderLineDto>,
}

impl OrderDto {
    /// Sets the three credit card fields at once.
    pub fn with_credit_card(
        mut self,
        card_type: impl Into<String>,
        number: impl Into<String>,
        expiry_date: impl Into<String>,
    ) -> Self {
        self.credit_card_type = card_type.into();
        self.credit_card_number = number.into();
        self.credit_card_expiry_date = expiry_date.into();
        self
    }
}
