//! Shared identifier types for the order-management service.

pub mod types;

pub use types::{
    AddressId, CustomerId, LineItemId, OrderId, PaymentId, PaymentMethodId, ProductId,
};
