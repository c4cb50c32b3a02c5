pub mod cart_store;
pub mod checkout;
pub mod pricing;
pub mod session;
