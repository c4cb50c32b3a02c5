use crate::domain::cart::CartItem;
use crate::domain::errors::CheckoutError;
use crate::domain::order::{CheckoutForm, FormField, OrderDraft, OrderDraftLine};
use crate::domain::ports::OrderGateway;

use super::session::SessionEvent;

/// Checks the form and cart locally and builds the order body from the
/// current in-session quantities. No request is made here.
pub fn validate(form: &CheckoutForm, items: &[CartItem]) -> Result<OrderDraft, CheckoutError> {
    for field in [FormField::Name, FormField::Phone, FormField::Address] {
        if form.get(field).trim().is_empty() {
            return Err(CheckoutError::MissingField(field));
        }
    }
    if items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    Ok(OrderDraft {
        customer_name: form.name.trim().to_string(),
        customer_phone: form.phone.trim().to_string(),
        customer_address: form.address.trim().to_string(),
        items: items
            .iter()
            .map(|item| OrderDraftLine {
                product_id: item.id.clone(),
                quantity: item.quantity,
            })
            .collect(),
    })
}

/// Sends one draft and turns the result into the event the session expects
/// back. Runs to completion; there is no cancellation.
pub async fn submit<G: OrderGateway>(gateway: &G, draft: &OrderDraft) -> SessionEvent {
    log::info!(
        "Submitting order for {} with {} line(s)",
        draft.customer_name,
        draft.items.len()
    );
    match gateway.create_order(draft).await {
        Ok(order) => {
            log::info!("Order {} placed, total {}", order.id, order.total_price);
            SessionEvent::SubmitSucceeded(order)
        }
        Err(e) => {
            log::warn!("Order submission failed: {}", e);
            SessionEvent::SubmitFailed(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cart::ProductId;

    fn form() -> CheckoutForm {
        CheckoutForm {
            name: "  Nguyen Van A ".to_string(),
            phone: "0901234567".to_string(),
            address: "12 Le Loi, Q1".to_string(),
        }
    }

    fn item(id: i64, quantity: u32) -> CartItem {
        CartItem {
            id: ProductId::Int(id),
            name: "Kova".to_string(),
            brand: "Kova".to_string(),
            category_name: "Primer".to_string(),
            price: "10.000".to_string(),
            image: String::new(),
            quantity,
        }
    }

    #[test]
    fn builds_draft_from_current_quantities() {
        let draft = validate(&form(), &[item(1, 3), item(2, 1)]).unwrap();
        assert_eq!(draft.customer_name, "Nguyen Van A");
        assert_eq!(
            draft.items,
            vec![
                OrderDraftLine {
                    product_id: ProductId::Int(1),
                    quantity: 3
                },
                OrderDraftLine {
                    product_id: ProductId::Int(2),
                    quantity: 1
                },
            ]
        );
    }

    #[test]
    fn blank_fields_are_rejected() {
        let mut f = form();
        f.phone = "   ".to_string();
        assert_eq!(
            validate(&f, &[item(1, 1)]),
            Err(CheckoutError::MissingField(FormField::Phone))
        );
    }

    #[test]
    fn empty_cart_is_rejected() {
        assert_eq!(validate(&form(), &[]), Err(CheckoutError::EmptyCart));
    }
}
