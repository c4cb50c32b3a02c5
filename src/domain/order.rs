use chrono::{DateTime, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::cart::ProductId;

/// Customer details collected by the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub name: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Phone,
    Address,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Phone => "phone",
            FormField::Address => "address",
        }
    }
}

impl CheckoutForm {
    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Name => self.name = value,
            FormField::Phone => self.phone = value,
            FormField::Address => self.address = value,
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Phone => &self.phone,
            FormField::Address => &self.address,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraftLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Body of `POST /orders`. Only lives for the duration of one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub items: Vec<OrderDraftLine>,
}

/// A priced line as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineView {
    pub product_id: ProductId,
    #[serde(default)]
    pub product_name: Option<String>,
    pub quantity: u32,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub total: Option<f64>,
}

/// An order as the backend reports it, both from `POST /orders` and the
/// read endpoints. Only `id` and `total_price` are required; every other
/// field degrades to empty when its shape is unexpected, so an accepted
/// order is never mistaken for a failed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub id: i64,
    pub total_price: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub customer_phone: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub customer_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_lines")]
    pub items: Vec<OrderLineView>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<NaiveDateTime>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Keeps the lines that look like priced order lines and skips the rest.
fn lenient_lines<'de, D>(deserializer: D) -> Result<Vec<OrderLineView>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(raw) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(raw
        .into_iter()
        .filter_map(|line| serde_json::from_value(line).ok())
        .collect())
}

/// Accepts RFC 3339 (converted to UTC) as well as the backend's naive form.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Some(raw) = value.as_str() else {
        return Ok(None);
    };
    Ok(DateTime::parse_from_rfc3339(raw)
        .map(|at| at.naive_utc())
        .ok()
        .or_else(|| raw.parse::<NaiveDateTime>().ok()))
}

impl PlacedOrder {
    /// Total in whole currency units, as shown to the customer.
    pub fn total_units(&self) -> u64 {
        if self.total_price.is_finite() && self.total_price > 0.0 {
            self.total_price.round() as u64
        } else {
            0
        }
    }
}
