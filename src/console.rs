//! Line-oriented terminal host for the cart session.
//!
//! Each input line becomes one command; session events go through
//! [`CartSession::handle`] and a returned draft is submitted before the next
//! line is read.

use std::io::{BufRead, Write};

use crate::application::checkout;
use crate::application::pricing::{format_price, line_total};
use crate::application::session::{CartSession, Notice, SessionEvent, SessionOutcome};
use crate::domain::cart::{Product, ProductId};
use crate::domain::order::{FormField, PlacedOrder};
use crate::domain::ports::{OrderGateway, Storage};
use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Event(SessionEvent),
    Add(Product),
    Show,
    Orders { today_only: bool },
    Order(i64),
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  add <product-json>        add a catalog product to the cart
  open | close              open or close the cart
  show                      list cart lines
  inc <n> | dec <n>         change the quantity of line n
  remove <id>               remove every line for a product id
  checkout | back           go to or leave the checkout form
  set name|phone|address <value>
  submit                    place the order
  orders [today]            list orders
  order <id>                show one order
  quit";

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map(|(verb, rest)| (verb, rest.trim()))
        .unwrap_or((line, ""));

    let index = |rest: &str| -> Result<usize, String> {
        rest.parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .ok_or_else(|| format!("expected a line number, got '{}'", rest))
    };

    let command = match verb {
        "add" => Command::Add(
            serde_json::from_str(rest).map_err(|e| format!("invalid product: {}", e))?,
        ),
        "open" => Command::Event(SessionEvent::Open),
        "close" => Command::Event(SessionEvent::Close),
        "show" => Command::Show,
        "inc" => Command::Event(SessionEvent::Increase(index(rest)?)),
        "dec" => Command::Event(SessionEvent::Decrease(index(rest)?)),
        "remove" if !rest.is_empty() => Command::Event(SessionEvent::Remove(ProductId::parse(rest))),
        "checkout" => Command::Event(SessionEvent::BeginCheckout),
        "back" => Command::Event(SessionEvent::Back),
        "set" => {
            let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let field = match field {
                "name" => FormField::Name,
                "phone" => FormField::Phone,
                "address" => FormField::Address,
                other => return Err(format!("unknown field '{}'", other)),
            };
            Command::Event(SessionEvent::EditForm(field, value.trim().to_string()))
        }
        "submit" => Command::Event(SessionEvent::Submit),
        "orders" => Command::Orders {
            today_only: rest == "today",
        },
        "order" => Command::Order(
            rest.parse()
                .map_err(|_| format!("expected an order id, got '{}'", rest))?,
        ),
        "help" | "" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{}', try 'help'", other)),
    };
    Ok(command)
}

fn render_cart<S: Storage>(session: &CartSession<S>, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "[{:?}] {} line(s)", session.state(), session.items().len())?;
    if session.items().is_empty() {
        return writeln!(out, "Your cart is empty.");
    }
    for (n, item) in session.items().iter().enumerate() {
        writeln!(
            out,
            "{:>2}. {} ({}, {}) {} x{} = {}đ",
            n + 1,
            item.name,
            item.brand,
            item.category_name,
            item.price,
            item.quantity,
            format_price(line_total(item))
        )?;
    }
    writeln!(
        out,
        "Total: {}đ for {} item(s)",
        format_price(session.total()),
        session.total_quantity()
    )
}

fn render_order(order: &PlacedOrder, out: &mut impl Write) -> std::io::Result<()> {
    let created = order
        .created_at
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    writeln!(
        out,
        "#{} {} {} {}đ {}",
        order.id,
        order.customer_name.as_deref().unwrap_or("-"),
        order.customer_phone.as_deref().unwrap_or("-"),
        format_price(order.total_units()),
        created
    )
}

fn render_notice(notice: &Notice, out: &mut impl Write) -> std::io::Result<()> {
    match notice {
        Notice::Confirmation(message) => writeln!(out, "{}", message),
        Notice::Error(message) => writeln!(out, "error: {}", message),
    }
}

/// Feeds one event in and, when it produces a draft, submits it and feeds
/// the result back.
pub async fn dispatch<S: Storage, G: OrderGateway>(
    session: &mut CartSession<S>,
    gateway: &G,
    event: SessionEvent,
    out: &mut impl Write,
) -> std::io::Result<()> {
    let outcome = match session.handle(event) {
        SessionOutcome::Submit(draft) => {
            let result = checkout::submit(gateway, &draft).await;
            session.handle(result)
        }
        other => other,
    };
    match outcome {
        SessionOutcome::Ignored => writeln!(out, "(nothing to do in {:?})", session.state()),
        SessionOutcome::Updated => render_cart(session, out),
        SessionOutcome::Notice(notice) => render_notice(&notice, out),
        SessionOutcome::Submit(_) => Ok(()),
    }
}

pub async fn run<S: Storage, G: OrderGateway>(
    session: &mut CartSession<S>,
    gateway: &G,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<(), AppError> {
    for line in input.lines() {
        let line = line?;
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(msg) => {
                writeln!(out, "error: {}", msg)?;
                continue;
            }
        };
        match command {
            Command::Event(event) => dispatch(session, gateway, event, out).await?,
            Command::Add(product) => {
                let count = session.store().add_item(&product);
                writeln!(out, "Added {}. Cart now holds {} item(s).", product.name, count)?;
            }
            Command::Show => render_cart(session, out)?,
            Command::Orders { today_only } => match gateway.list_orders(today_only).await {
                Ok(orders) if orders.is_empty() => writeln!(out, "No orders.")?,
                Ok(orders) => {
                    for order in &orders {
                        render_order(order, out)?;
                    }
                }
                Err(e) => writeln!(out, "error: {}", e.user_message())?,
            },
            Command::Order(id) => match gateway.get_order(id).await {
                Ok(Some(order)) => {
                    render_order(&order, out)?;
                    for line in &order.items {
                        writeln!(
                            out,
                            "    {} x{}",
                            line.product_name.as_deref().unwrap_or("?"),
                            line.quantity
                        )?;
                    }
                }
                Ok(None) => writeln!(out, "Order {} not found.", id)?,
                Err(e) => writeln!(out, "error: {}", e.user_message())?,
            },
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => break,
        }
        out.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_session_commands() {
        assert_eq!(parse_command("open"), Ok(Command::Event(SessionEvent::Open)));
        assert_eq!(
            parse_command("inc 2"),
            Ok(Command::Event(SessionEvent::Increase(1)))
        );
        assert_eq!(
            parse_command("remove 14"),
            Ok(Command::Event(SessionEvent::Remove(ProductId::Int(14))))
        );
        assert_eq!(
            parse_command("set address  12 Le Loi, Q1 "),
            Ok(Command::Event(SessionEvent::EditForm(
                FormField::Address,
                "12 Le Loi, Q1".to_string()
            )))
        );
        assert_eq!(
            parse_command("orders today"),
            Ok(Command::Orders { today_only: true })
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_command("inc 0").is_err());
        assert!(parse_command("inc x").is_err());
        assert!(parse_command("set email a@b").is_err());
        assert!(parse_command("remove").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn parses_product_json() {
        let cmd = parse_command(
            r#"add {"id": 5, "name": "Jotun", "brand": "Jotun", "categoryName": "Interior", "price": "320.000", "image": ""}"#,
        )
        .unwrap();
        let Command::Add(product) = cmd else {
            panic!("expected add");
        };
        assert_eq!(product.id, ProductId::Int(5));
        assert_eq!(product.price, "320.000");
    }
}
