use async_trait::async_trait;

use common::{AddressId, CustomerId, OrderId, PaymentMethodId, ProductId};

use crate::records::{
    AddressRecord, CustomerRecord, LineItemPatch, LineItemRecord, OrderRecord, PaymentMethodRecord,
    PaymentPatch, PaymentRecord, ProductRecord,
};
use crate::sort::OrderSort;
use crate::Result;

/// Repository for the order aggregate: headers, line items, and payments.
///
/// The multi-record operations (`insert_order`, `replace_order`,
/// `delete_order`) are atomic units of work — either every write in the
/// sequence is durably applied, or none is. Within one unit, writes are
/// issued in a fixed order: header, then each line item in input order,
/// then each payment in input order.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts a header with its line items and payments in one unit of work.
    async fn insert_order(
        &self,
        header: &OrderRecord,
        items: &[LineItemRecord],
        payments: &[PaymentRecord],
    ) -> Result<()>;

    /// Replaces the header in place, deletes every existing line item
    /// referencing it and inserts the supplied set, and appends the
    /// supplied payments — all in one unit of work.
    ///
    /// Existing payments are deliberately left untouched; the
    /// line-item/payment asymmetry is observed behavior of the system.
    async fn replace_order(
        &self,
        header: &OrderRecord,
        items: &[LineItemRecord],
        payments: &[PaymentRecord],
    ) -> Result<()>;

    /// Deletes the header and cascades to its line items and payments in
    /// one unit of work.
    async fn delete_order(&self, id: OrderId) -> Result<()>;

    /// Fetches a single header. `None` means the id does not resolve.
    async fn fetch_order(&self, id: OrderId) -> Result<Option<OrderRecord>>;

    /// Lists all headers in the requested sort order.
    async fn list_orders(&self, sort: OrderSort) -> Result<Vec<OrderRecord>>;

    /// Fetches the line items referencing a header.
    async fn line_items_for_order(&self, id: OrderId) -> Result<Vec<LineItemRecord>>;

    /// Fetches the payments referencing a header.
    async fn payments_for_order(&self, id: OrderId) -> Result<Vec<PaymentRecord>>;

    /// Applies a targeted update to a line item.
    ///
    /// Returns `false` when no record matched the patch's id.
    async fn update_line_item(&self, patch: &LineItemPatch) -> Result<bool>;

    /// Applies a targeted update to a payment.
    ///
    /// Returns `false` when no record matched the patch's id.
    async fn update_payment(&self, patch: &PaymentPatch) -> Result<bool>;

    /// Counts the orders referencing a customer. Consumed by the customer
    /// deletion guard.
    async fn count_orders_for_customer(&self, customer_id: CustomerId) -> Result<u64>;
}

/// Generic persistence for the single-record collaborators: customers,
/// addresses, products, and payment methods.
#[async_trait]
pub trait EntityStore: Send + Sync {
    // -- Customers --

    async fn insert_customer(&self, customer: &CustomerRecord) -> Result<()>;
    async fn fetch_customer(&self, id: CustomerId) -> Result<Option<CustomerRecord>>;
    async fn find_customer_by_email(&self, email: &str) -> Result<Option<CustomerRecord>>;
    async fn list_customers(&self) -> Result<Vec<CustomerRecord>>;
    async fn update_customer(&self, customer: &CustomerRecord) -> Result<()>;

    /// Deletes a customer and its addresses in one unit of work.
    async fn delete_customer_with_addresses(&self, id: CustomerId) -> Result<()>;

    // -- Customer addresses --

    async fn insert_address(&self, address: &AddressRecord) -> Result<()>;
    async fn fetch_address(&self, id: AddressId) -> Result<Option<AddressRecord>>;
    async fn list_addresses(&self) -> Result<Vec<AddressRecord>>;
    async fn addresses_for_customer(&self, customer_id: CustomerId) -> Result<Vec<AddressRecord>>;
    async fn update_address(&self, address: &AddressRecord) -> Result<()>;
    async fn delete_address(&self, id: AddressId) -> Result<()>;

    // -- Products --

    async fn insert_product(&self, product: &ProductRecord) -> Result<()>;
    async fn fetch_product(&self, id: ProductId) -> Result<Option<ProductRecord>>;
    async fn find_product_by_code(&self, code: &str) -> Result<Option<ProductRecord>>;
    async fn list_products(&self) -> Result<Vec<ProductRecord>>;
    async fn update_product(&self, product: &ProductRecord) -> Result<()>;
    async fn delete_product(&self, id: ProductId) -> Result<()>;

    // -- Payment methods --

    async fn insert_payment_method(&self, method: &PaymentMethodRecord) -> Result<()>;
    async fn fetch_payment_method(
        &self,
        id: PaymentMethodId,
    ) -> Result<Option<PaymentMethodRecord>>;
    async fn find_payment_method_by_name(
        &self,
        name: &str,
    ) -> Result<Option<PaymentMethodRecord>>;
    async fn list_payment_methods(&self) -> Result<Vec<PaymentMethodRecord>>;
    async fn update_payment_method(&self, method: &PaymentMethodRecord) -> Result<()>;
    async fn delete_payment_method(&self, id: PaymentMethodId) -> Result<()>;
}

/// Convenience bound for a complete store implementation, shared across
/// the service and HTTP layers.
pub trait Store: OrderStore + EntityStore + Clone + Send + Sync + 'static {}

impl<T> Store for T where T: OrderStore + EntityStore + Clone + Send + Sync + 'static {}
