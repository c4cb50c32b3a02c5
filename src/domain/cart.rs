use std::fmt;

use serde::{Deserialize, Serialize};

/// Catalog identifier of a product. The backend uses integers, but the cart
/// treats the value as opaque and keeps whatever the catalog handed over.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Int(i64),
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Int(id) => write!(f, "{}", id),
            ProductId::Text(id) => f.write_str(id),
        }
    }
}

impl ProductId {
    /// Parses user input. Only the canonical integer form becomes `Int`;
    /// anything that would not print back the same (`01`, `+1`) stays text so
    /// it can still match a string id from the catalog.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<i64>() {
            Ok(id) if id.to_string() == raw => ProductId::Int(id),
            _ => ProductId::Text(raw.to_string()),
        }
    }
}

/// The catalog fields captured when a product is added to the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category_name: String,
    /// Display-formatted price, e.g. "125.000".
    pub price: String,
    #[serde(default)]
    pub image: String,
}

/// One line of the cart as persisted in local storage.
///
/// `price` stays in its display form; numeric values are derived on demand
/// by the pricing module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category_name: String,
    pub price: String,
    #[serde(default)]
    pub image: String,
    pub quantity: u32,
}

impl CartItem {
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            category_name: product.category_name.clone(),
            price: product.price.clone(),
            image: product.image.clone(),
            quantity: 1,
        }
    }

    pub fn increase(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    /// Never goes below 1.
    pub fn decrease(&mut self) {
        self.quantity = self.quantity.saturating_sub(1).max(1);
    }
}

/// Items loaded for one interactive session, in persisted order.
pub type CartSnapshot = Vec<CartItem>;

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64) -> Product {
        Product {
            id: ProductId::Int(id),
            name: "Dulux Weathershield".to_string(),
            brand: "Dulux".to_string(),
            category_name: "Exterior".to_string(),
            price: "125.000".to_string(),
            image: "https://cdn.example/dulux.png".to_string(),
        }
    }

    #[test]
    fn from_product_starts_at_quantity_one() {
        let item = CartItem::from_product(&product(3));
        assert_eq!(item.quantity, 1);
        assert_eq!(item.id, ProductId::Int(3));
        assert_eq!(item.price, "125.000");
    }

    #[test]
    fn decrease_stops_at_one() {
        let mut item = CartItem::from_product(&product(1));
        item.decrease();
        assert_eq!(item.quantity, 1);
        item.increase();
        item.increase();
        item.decrease();
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn serializes_with_persisted_field_names() {
        let json = serde_json::to_value(CartItem::from_product(&product(9))).unwrap();
        assert_eq!(json["id"], 9);
        assert_eq!(json["categoryName"], "Exterior");
        assert_eq!(json["quantity"], 1);
    }

    #[test]
    fn product_id_accepts_numbers_and_strings() {
        let ids: Vec<ProductId> = serde_json::from_str(r#"[12, "sku-7"]"#).unwrap();
        assert_eq!(ids, vec![ProductId::Int(12), ProductId::Text("sku-7".into())]);
        assert_eq!(ProductId::parse(" 12 "), ProductId::Int(12));
        assert_eq!(ProductId::parse("sku-7").to_string(), "sku-7");
    }

    #[test]
    fn non_canonical_numbers_stay_text() {
        assert_eq!(ProductId::parse("01"), ProductId::Text("01".into()));
        assert_eq!(ProductId::parse("+1"), ProductId::Text("+1".into()));
        assert_eq!(ProductId::parse("-4"), ProductId::Int(-4));
        assert_eq!(ProductId::parse("0"), ProductId::Int(0));
    }
}
