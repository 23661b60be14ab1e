pub mod customer_addresses;
pub mod customers;
pub mod health;
pub mod metrics;
pub mod payment_methods;
pub mod products;
pub mod transactions;
