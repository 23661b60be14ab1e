//! Persistence layer for the order-management service.
//!
//! Owns the typed records for every collection and the [`OrderStore`] /
//! [`EntityStore`] traits. Two implementations are provided: a
//! PostgreSQL-backed store ([`PgStore`]) where every multi-record operation
//! runs in a single SQL transaction, and an in-memory store
//! ([`MemoryStore`]) for tests, with write-fault injection to exercise
//! abort paths.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod records;
pub mod sort;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use records::{
    AddressRecord, CustomerRecord, LineItemPatch, LineItemRecord, OrderRecord, PaymentMethodRecord,
    PaymentPatch, PaymentRecord, ProductRecord,
};
pub use sort::{OrderSort, OrderSortField, SortDirection};
pub use store::{EntityStore, OrderStore, Store};
