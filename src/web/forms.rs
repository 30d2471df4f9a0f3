//! Form and query-string bindings.
//!
//! Every field is bound as a string so that a malformed value becomes an inline
//! [`Error::Validation`] naming the field, instead of a generic extractor rejection.
//! Range checks (positive price, non-negative stock) stay in the service layer.

use crate::{
    core::{auth, client::ClientInput, non_blank, product::ProductInput, sale::NewSale},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::str::FromStr;

fn parse_field<T: FromStr>(field: &str, value: &str, message: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::validation(field, message))
}

fn parse_required_id(field: &str, value: &str) -> Result<i64> {
    if value.trim().is_empty() {
        return Err(Error::validation(field, "This field is required"));
    }
    parse_field(field, value, "Select a valid option")
}

fn parse_optional_id(field: &str, value: &str) -> Result<Option<i64>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_field(field, value, "Select a valid option").map(Some)
}

/// Query parameters accepted by list endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    /// Free-text search
    pub search: Option<String>,
    /// 1-based page number
    pub page: Option<String>,
    /// Category filter (products only)
    pub category: Option<String>,
}

impl ListQuery {
    /// The search term, if non-blank.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// The requested page; 1 when absent.
    pub fn page(&self) -> Result<u64> {
        match self.page.as_deref().map(str::trim) {
            None | Some("") => Ok(1),
            Some(page) => parse_field("page", page, "Page must be a positive number"),
        }
    }

    /// The category filter; `None` when absent or blank.
    pub fn category_id(&self) -> Result<Option<i64>> {
        parse_optional_id("category", self.category.as_deref().unwrap_or_default())
    }
}

/// `POST /categories` and `/categories/{id}`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CategoryForm {
    pub name: String,
}

/// `POST /clients` and `/clients/{id}`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClientForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
}

impl From<ClientForm> for ClientInput {
    fn from(form: ClientForm) -> Self {
        Self {
            first_name: form.first_name,
            last_name: form.last_name,
            phone: non_blank(Some(form.phone)),
            address: non_blank(Some(form.address)),
        }
    }
}

/// `POST /products` and `/products/{id}`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: String,
    pub category_id: String,
}

impl TryFrom<ProductForm> for ProductInput {
    type Error = Error;

    fn try_from(form: ProductForm) -> Result<Self> {
        Ok(Self {
            price: parse_field("price", &form.price, "Enter a valid price")?,
            stock: parse_field("stock", &form.stock, "Stock must be a whole number")?,
            category_id: parse_optional_id("category_id", &form.category_id)?,
            description: non_blank(Some(form.description)),
            name: form.name,
        })
    }
}

/// `POST /stores` and `/stores/{id}`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StoreForm {
    pub name: String,
    pub location: String,
}

/// `POST /delivery-locations` and `/delivery-locations/{id}`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeliveryLocationForm {
    pub name: String,
    pub address: String,
}

/// `POST /sales`. Price and total are computed server-side.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SaleForm {
    pub client_id: String,
    pub product_id: String,
    pub quantity: String,
    pub store_id: String,
    pub delivery_location_id: String,
}

impl TryFrom<SaleForm> for NewSale {
    type Error = Error;

    fn try_from(form: SaleForm) -> Result<Self> {
        Ok(Self {
            client_id: parse_required_id("client_id", &form.client_id)?,
            product_id: parse_required_id("product_id", &form.product_id)?,
            quantity: parse_field("quantity", &form.quantity, "Quantity must be a whole number")?,
            store_id: parse_required_id("store_id", &form.store_id)?,
            delivery_location_id: parse_required_id(
                "delivery_location_id",
                &form.delivery_location_id,
            )?,
        })
    }
}

/// `POST /register`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl From<RegisterForm> for auth::RegisterInput {
    fn from(form: RegisterForm) -> Self {
        Self {
            name: form.name,
            email: form.email,
            password: form.password,
        }
    }
}

/// `POST /login`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// `POST /profile`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    pub phone: String,
    /// `YYYY-MM-DD` or blank
    pub birth_date: String,
    pub photo_path: String,
}

impl TryFrom<ProfileForm> for auth::ProfileInput {
    type Error = Error;

    fn try_from(form: ProfileForm) -> Result<Self> {
        let birth_date = match form.birth_date.trim() {
            "" => None,
            date => Some(
                NaiveDate::parse_from_str(date, "%Y-%m-%d")
                    .map_err(|_| Error::validation("birth_date", "Use the format YYYY-MM-DD"))?,
            ),
        };
        Ok(Self {
            phone: non_blank(Some(form.phone)),
            birth_date,
            photo_path: non_blank(Some(form.photo_path)),
        })
    }
}
