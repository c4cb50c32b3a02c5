pub mod order_client;
pub mod storage;
