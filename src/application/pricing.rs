//! Totals derived from display-formatted prices.
//!
//! Prices are whole currency units. Every non-digit character, including
//! `.` and `,`, is treated as formatting and dropped.

use crate::domain::cart::CartItem;

pub fn parse_price(text: &str) -> u64 {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

pub fn line_total(item: &CartItem) -> u64 {
    parse_price(&item.price).saturating_mul(u64::from(item.quantity))
}

pub fn cart_total(items: &[CartItem]) -> u64 {
    items
        .iter()
        .fold(0u64, |acc, item| acc.saturating_add(line_total(item)))
}

pub fn total_quantity(items: &[CartItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}

/// vi-VN grouping: `25000` renders as `25.000`.
pub fn format_price(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cart::ProductId;

    fn item(price: &str, quantity: u32) -> CartItem {
        CartItem {
            id: ProductId::Int(1),
            name: "Jotun Essence".to_string(),
            brand: "Jotun".to_string(),
            category_name: "Interior".to_string(),
            price: price.to_string(),
            image: String::new(),
            quantity,
        }
    }

    #[test]
    fn parse_price_strips_formatting() {
        assert_eq!(parse_price("125.000đ"), 125_000);
        assert_eq!(parse_price("1,250,000 VND"), 1_250_000);
        assert_eq!(parse_price("125000"), 125_000);
    }

    #[test]
    fn parse_price_degrades_to_zero() {
        assert_eq!(parse_price(""), 0);
        assert_eq!(parse_price("abc"), 0);
        assert_eq!(parse_price("99999999999999999999999"), 0);
    }

    #[test]
    fn cart_total_sums_line_totals() {
        let items = vec![item("10.000", 2), item("5.000", 1)];
        assert_eq!(line_total(&items[0]), 20_000);
        assert_eq!(cart_total(&items), 25_000);
        assert_eq!(total_quantity(&items), 3);
    }

    #[test]
    fn empty_cart_totals_are_zero() {
        assert_eq!(cart_total(&[]), 0);
        assert_eq!(total_quantity(&[]), 0);
    }

    #[test]
    fn format_price_groups_thousands() {
        assert_eq!(format_price(0), "0");
        assert_eq!(format_price(999), "999");
        assert_eq!(format_price(25_000), "25.000");
        assert_eq!(format_price(1_250_000), "1.250.000");
    }
}
