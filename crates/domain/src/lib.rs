//! Domain layer for the order-management service.
//!
//! The [`OrderWorkflow`] engine owns the only non-trivial logic in the
//! system: computing the denormalized header totals, orchestrating the
//! atomic create/replace/delete of an order with its line items and
//! payments, and assembling the composite read view. The entity services
//! cover the thin-CRUD collaborators around it.

pub mod catalog;
pub mod customers;
pub mod error;
pub mod join;
pub mod orders;

pub use catalog::{CatalogService, PaymentMethodInput, ProductInput};
pub use customers::{AddressInput, CustomerInput, CustomerService, CustomerWithAddresses};
pub use error::DomainError;
pub use orders::{LineItemInput, OrderInput, OrderView, OrderWorkflow, PaymentInput};
