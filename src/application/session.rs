//! The interactive cart session.
//!
//! Every UI action is a [`SessionEvent`] fed to [`CartSession::handle`]. The
//! session never performs network I/O itself: a valid submit yields
//! [`SessionOutcome::Submit`] with the draft, and the host reports the result
//! back as `SubmitSucceeded` or `SubmitFailed`.

use std::str::FromStr;

use crate::domain::cart::{CartItem, CartSnapshot, ProductId};
use crate::domain::errors::CheckoutError;
use crate::domain::order::{CheckoutForm, FormField, OrderDraft, PlacedOrder};
use crate::domain::ports::Storage;

use super::cart_store::CartStore;
use super::checkout;
use super::pricing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Closed,
    Browsing,
    Checkout,
}

/// Whether quantity edits reach the store before checkout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuantityPolicy {
    /// Edits stay in the snapshot and are lost on removal or close.
    #[default]
    SessionLocal,
    /// Every edit is saved to the store immediately.
    WriteThrough,
}

impl FromStr for QuantityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "session" | "session-local" => Ok(QuantityPolicy::SessionLocal),
            "write-through" | "writethrough" => Ok(QuantityPolicy::WriteThrough),
            other => Err(format!("unknown quantity policy '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Open,
    /// Index into the snapshot; ids may repeat across lines.
    Increase(usize),
    Decrease(usize),
    Remove(ProductId),
    BeginCheckout,
    Back,
    EditForm(FormField, String),
    Submit,
    SubmitSucceeded(PlacedOrder),
    SubmitFailed(CheckoutError),
    Close,
}

/// A message for the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Confirmation(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// The event does not apply in the current state.
    Ignored,
    Updated,
    Notice(Notice),
    /// Transmit this draft and report the result back.
    Submit(OrderDraft),
}

pub struct CartSession<S> {
    store: CartStore<S>,
    policy: QuantityPolicy,
    state: SessionState,
    snapshot: CartSnapshot,
    form: CheckoutForm,
    in_flight: bool,
}

impl<S: Storage> CartSession<S> {
    pub fn new(store: CartStore<S>) -> Self {
        Self::with_policy(store, QuantityPolicy::default())
    }

    pub fn with_policy(store: CartStore<S>, policy: QuantityPolicy) -> Self {
        Self {
            store,
            policy,
            state: SessionState::Closed,
            snapshot: Vec::new(),
            form: CheckoutForm::default(),
            in_flight: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn items(&self) -> &[CartItem] {
        &self.snapshot
    }

    pub fn form(&self) -> &CheckoutForm {
        &self.form
    }

    pub fn store(&self) -> &CartStore<S> {
        &self.store
    }

    /// True while a submitted draft has not been reported back.
    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    pub fn total(&self) -> u64 {
        pricing::cart_total(&self.snapshot)
    }

    pub fn total_quantity(&self) -> u64 {
        pricing::total_quantity(&self.snapshot)
    }

    pub fn handle(&mut self, event: SessionEvent) -> SessionOutcome {
        log::debug!("{:?} <- {:?}", self.state, event);
        match event {
            SessionEvent::Open => self.open(),
            SessionEvent::Increase(index) => self.edit_quantity(index, CartItem::increase),
            SessionEvent::Decrease(index) => self.edit_quantity(index, CartItem::decrease),
            SessionEvent::Remove(id) => self.remove(&id),
            SessionEvent::BeginCheckout => self.begin_checkout(),
            SessionEvent::Back => self.back(),
            SessionEvent::EditForm(field, value) => self.edit_form(field, value),
            SessionEvent::Submit => self.submit(),
            SessionEvent::SubmitSucceeded(order) => self.submit_succeeded(&order),
            SessionEvent::SubmitFailed(err) => self.submit_failed(&err),
            SessionEvent::Close => self.close(),
        }
    }

    fn is_open(&self) -> bool {
        self.state != SessionState::Closed
    }

    fn open(&mut self) -> SessionOutcome {
        if self.is_open() {
            return SessionOutcome::Ignored;
        }
        self.snapshot = self.store.get_items();
        self.state = SessionState::Browsing;
        SessionOutcome::Updated
    }

    fn edit_quantity(&mut self, index: usize, edit: fn(&mut CartItem)) -> SessionOutcome {
        if !self.is_open() {
            return SessionOutcome::Ignored;
        }
        let Some(item) = self.snapshot.get_mut(index) else {
            return SessionOutcome::Ignored;
        };
        edit(item);
        if self.policy == QuantityPolicy::WriteThrough {
            self.store.save_items(&self.snapshot);
        }
        SessionOutcome::Updated
    }

    fn remove(&mut self, id: &ProductId) -> SessionOutcome {
        if self.state != SessionState::Browsing {
            return SessionOutcome::Ignored;
        }
        self.store.remove_item(id);
        self.snapshot = self.store.get_items();
        SessionOutcome::Updated
    }

    fn begin_checkout(&mut self) -> SessionOutcome {
        if self.state != SessionState::Browsing {
            return SessionOutcome::Ignored;
        }
        if self.snapshot.is_empty() {
            return SessionOutcome::Notice(Notice::Error(CheckoutError::EmptyCart.user_message()));
        }
        self.state = SessionState::Checkout;
        SessionOutcome::Updated
    }

    fn back(&mut self) -> SessionOutcome {
        if self.state != SessionState::Checkout {
            return SessionOutcome::Ignored;
        }
        self.state = SessionState::Browsing;
        SessionOutcome::Updated
    }

    fn edit_form(&mut self, field: FormField, value: String) -> SessionOutcome {
        if self.state != SessionState::Checkout {
            return SessionOutcome::Ignored;
        }
        self.form.set(field, value);
        SessionOutcome::Updated
    }

    fn submit(&mut self) -> SessionOutcome {
        if self.state != SessionState::Checkout || self.in_flight {
            return SessionOutcome::Ignored;
        }
        match checkout::validate(&self.form, &self.snapshot) {
            Ok(draft) => {
                self.in_flight = true;
                SessionOutcome::Submit(draft)
            }
            Err(e) => {
                log::info!("Checkout blocked: {}", e);
                SessionOutcome::Notice(Notice::Error(e.user_message()))
            }
        }
    }

    fn submit_succeeded(&mut self, order: &PlacedOrder) -> SessionOutcome {
        if !self.in_flight {
            return SessionOutcome::Ignored;
        }
        self.in_flight = false;
        self.store.clear();
        self.snapshot.clear();
        self.form = CheckoutForm::default();
        self.state = SessionState::Closed;
        SessionOutcome::Notice(Notice::Confirmation(format!(
            "Order #{} placed. Total: {}đ. We will contact you shortly.",
            order.id,
            pricing::format_price(order.total_units())
        )))
    }

    fn submit_failed(&mut self, err: &CheckoutError) -> SessionOutcome {
        if !self.in_flight {
            return SessionOutcome::Ignored;
        }
        self.in_flight = false;
        SessionOutcome::Notice(Notice::Error(err.user_message()))
    }

    fn close(&mut self) -> SessionOutcome {
        if !self.is_open() {
            return SessionOutcome::Ignored;
        }
        self.snapshot.clear();
        self.state = SessionState::Closed;
        SessionOutcome::Updated
    }
}
