// foodtruck/src/services/mod.rs

pub mod auth_service;
pub mod gateway;
pub mod memory_store;
pub mod payment_mock;
pub mod seed;
pub mod square;
pub mod store;
pub mod webhook_auth;

pub use gateway::PaymentGateway;
pub use memory_store::MemoryStore;
pub use payment_mock::MockGateway;
pub use square::SquareClient;
pub use store::{MenuItemRemoval, PgStore, Store};
