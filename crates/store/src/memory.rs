use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::RwLock;

use common::{AddressId, CustomerId, OrderId, PaymentMethodId, ProductId};

use crate::records::{
    AddressRecord, CustomerRecord, LineItemPatch, LineItemRecord, OrderRecord, PaymentMethodRecord,
    PaymentPatch, PaymentRecord, ProductRecord,
};
use crate::sort::{OrderSort, OrderSortField, SortDirection};
use crate::store::{EntityStore, OrderStore};
use crate::{Result, StoreError};

#[derive(Debug, Clone, Default)]
struct Collections {
    orders: Vec<OrderRecord>,
    line_items: Vec<LineItemRecord>,
    payments: Vec<PaymentRecord>,
    customers: Vec<CustomerRecord>,
    addresses: Vec<AddressRecord>,
    products: Vec<ProductRecord>,
    payment_methods: Vec<PaymentMethodRecord>,
}

/// In-memory store implementation for testing.
///
/// Multi-record operations stage their writes against a copy of the
/// collections and merge only when every write succeeded, matching the
/// all-or-nothing guarantee of the PostgreSQL implementation.
///
/// A write budget can be armed with [`MemoryStore::fail_after_writes`] to
/// force a mid-sequence failure and observe the abort path.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<Collections>>,
    writes_until_failure: Arc<Mutex<Option<usize>>>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms fault injection: the next `n` record writes succeed, the
    /// write after that fails until [`MemoryStore::clear_write_faults`]
    /// is called.
    pub fn fail_after_writes(&self, n: usize) {
        *self.writes_until_failure.lock().unwrap() = Some(n);
    }

    /// Disarms fault injection.
    pub fn clear_write_faults(&self) {
        *self.writes_until_failure.lock().unwrap() = None;
    }

    fn take_write(&self) -> Result<()> {
        let mut budget = self.writes_until_failure.lock().unwrap();
        if let Some(remaining) = budget.as_mut() {
            if *remaining == 0 {
                return Err(StoreError::Backend("injected write failure".to_string()));
            }
            *remaining -= 1;
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert_order(
        &self,
        header: &OrderRecord,
        items: &[LineItemRecord],
        payments: &[PaymentRecord],
    ) -> Result<()> {
        let mut collections = self.collections.write().await;
        let mut staged = collections.clone();

        self.take_write()?;
        staged.orders.push(header.clone());
        for item in items {
            self.take_write()?;
            staged.line_items.push(item.clone());
        }
        for payment in payments {
            self.take_write()?;
            staged.payments.push(payment.clone());
        }

        *collections = staged;
        Ok(())
    }

    async fn replace_order(
        &self,
        header: &OrderRecord,
        items: &[LineItemRecord],
        payments: &[PaymentRecord],
    ) -> Result<()> {
        let mut collections = self.collections.write().await;
        let mut staged = collections.clone();

        self.take_write()?;
        if let Some(existing) = staged.orders.iter_mut().find(|o| o.id == header.id) {
            *existing = header.clone();
        }

        self.take_write()?;
        staged.line_items.retain(|item| item.order_id != header.id);
        for item in items {
            self.take_write()?;
            staged.line_items.push(item.clone());
        }
        for payment in payments {
            self.take_write()?;
            staged.payments.push(payment.clone());
        }

        *collections = staged;
        Ok(())
    }

    async fn delete_order(&self, id: OrderId) -> Result<()> {
        let mut collections = self.collections.write().await;
        let mut staged = collections.clone();

        self.take_write()?;
        staged.orders.retain(|o| o.id != id);
        self.take_write()?;
        staged.line_items.retain(|item| item.order_id != id);
        self.take_write()?;
        staged.payments.retain(|payment| payment.order_id != id);

        *collections = staged;
        Ok(())
    }

    async fn fetch_order(&self, id: OrderId) -> Result<Option<OrderRecord>> {
        let collections = self.collections.read().await;
        Ok(collections.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn list_orders(&self, sort: OrderSort) -> Result<Vec<OrderRecord>> {
        let collections = self.collections.read().await;
        let mut orders = collections.orders.clone();

        orders.sort_by(|a, b| {
            let ordering = match sort.field {
                OrderSortField::TransactionDate => a.transaction_date.cmp(&b.transaction_date),
                OrderSortField::TotalAmount => a.total_amount.total_cmp(&b.total_amount),
                OrderSortField::TotalQty => a.total_qty.total_cmp(&b.total_qty),
            };
            match sort.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        Ok(orders)
    }

    async fn line_items_for_order(&self, id: OrderId) -> Result<Vec<LineItemRecord>> {
        let collections = self.collections.read().await;
        Ok(collections
            .line_items
            .iter()
            .filter(|item| item.order_id == id)
            .cloned()
            .collect())
    }

    async fn payments_for_order(&self, id: OrderId) -> Result<Vec<PaymentRecord>> {
        let collections = self.collections.read().await;
        Ok(collections
            .payments
            .iter()
            .filter(|payment| payment.order_id == id)
            .cloned()
            .collect())
    }

    async fn update_line_item(&self, patch: &LineItemPatch) -> Result<bool> {
        self.take_write()?;
        let mut collections = self.collections.write().await;
        match collections
            .line_items
            .iter_mut()
            .find(|item| item.id == patch.id)
        {
            Some(item) => {
                item.quantity = patch.quantity;
                item.subtotal = patch.subtotal;
                item.price = patch.price;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_payment(&self, patch: &PaymentPatch) -> Result<bool> {
        self.take_write()?;
        let mut collections = self.collections.write().await;
        match collections
            .payments
            .iter_mut()
            .find(|payment| payment.id == patch.id)
        {
            Some(payment) => {
                payment.status = patch.status;
                payment.paid_amount = patch.paid_amount;
                payment.payment_date = patch.payment_date;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_orders_for_customer(&self, customer_id: CustomerId) -> Result<u64> {
        let collections = self.collections.read().await;
        Ok(collections
            .orders
            .iter()
            .filter(|o| o.customer_id == customer_id)
            .count() as u64)
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn insert_customer(&self, customer: &CustomerRecord) -> Result<()> {
        self.take_write()?;
        let mut collections = self.collections.write().await;
        collections.customers.push(customer.clone());
        Ok(())
    }

    async fn fetch_customer(&self, id: CustomerId) -> Result<Option<CustomerRecord>> {
        let collections = self.collections.read().await;
        Ok(collections.customers.iter().find(|c| c.id == id).cloned())
    }

    async fn find_customer_by_email(&self, email: &str) -> Result<Option<CustomerRecord>> {
        let collections = self.collections.read().await;
        Ok(collections
            .customers
            .iter()
            .find(|c| c.email == email)
            .cloned())
    }

    async fn list_customers(&self) -> Result<Vec<CustomerRecord>> {
        let collections = self.collections.read().await;
        Ok(collections.customers.clone())
    }

    async fn update_customer(&self, customer: &CustomerRecord) -> Result<()> {
        self.take_write()?;
        let mut collections = self.collections.write().await;
        if let Some(existing) = collections.customers.iter_mut().find(|c| c.id == customer.id) {
            *existing = customer.clone();
        }
        Ok(())
    }

    async fn delete_customer_with_addresses(&self, id: CustomerId) -> Result<()> {
        let mut collections = self.collections.write().await;
        let mut staged = collections.clone();

        self.take_write()?;
        staged.addresses.retain(|a| a.customer_id != id);
        self.take_write()?;
        staged.customers.retain(|c| c.id != id);

        *collections = staged;
        Ok(())
    }

    async fn insert_address(&self, address: &AddressRecord) -> Result<()> {
        self.take_write()?;
        let mut collections = self.collections.write().await;
        collections.addresses.push(address.clone());
        Ok(())
    }

    async fn fetch_address(&self, id: AddressId) -> Result<Option<AddressRecord>> {
        let collections = self.collections.read().await;
        Ok(collections.addresses.iter().find(|a| a.id == id).cloned())
    }

    async fn list_addresses(&self) -> Result<Vec<AddressRecord>> {
        let collections = self.collections.read().await;
        Ok(collections.addresses.clone())
    }

    async fn addresses_for_customer(&self, customer_id: CustomerId) -> Result<Vec<AddressRecord>> {
        let collections = self.collections.read().await;
        Ok(collections
            .addresses
            .iter()
            .filter(|a| a.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn update_address(&self, address: &AddressRecord) -> Result<()> {
        self.take_write()?;
        let mut collections = self.collections.write().await;
        if let Some(existing) = collections.addresses.iter_mut().find(|a| a.id == address.id) {
            *existing = address.clone();
        }
        Ok(())
    }

    async fn delete_address(&self, id: AddressId) -> Result<()> {
        self.take_write()?;
        let mut collections = self.collections.write().await;
        collections.addresses.retain(|a| a.id != id);
        Ok(())
    }

    async fn insert_product(&self, product: &ProductRecord) -> Result<()> {
        self.take_write()?;
        let mut collections = self.collections.write().await;
        collections.products.push(product.clone());
        Ok(())
    }

    async fn fetch_product(&self, id: ProductId) -> Result<Option<ProductRecord>> {
        let collections = self.collections.read().await;
        Ok(collections.products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_product_by_code(&self, code: &str) -> Result<Option<ProductRecord>> {
        let collections = self.collections.read().await;
        Ok(collections.products.iter().find(|p| p.code == code).cloned())
    }

    async fn list_products(&self) -> Result<Vec<ProductRecord>> {
        let collections = self.collections.read().await;
        Ok(collections.products.clone())
    }

    async fn update_product(&self, product: &ProductRecord) -> Result<()> {
        self.take_write()?;
        let mut collections = self.collections.write().await;
        if let Some(existing) = collections.products.iter_mut().find(|p| p.id == product.id) {
            *existing = product.clone();
        }
        Ok(())
    }

    async fn delete_product(&self, id: ProductId) -> Result<()> {
        self.take_write()?;
        let mut collections = self.collections.write().await;
        collections.products.retain(|p| p.id != id);
        Ok(())
    }

    async fn insert_payment_method(&self, method: &PaymentMethodRecord) -> Result<()> {
        self.take_write()?;
        let mut collections = self.collections.write().await;
        collections.payment_methods.push(method.clone());
        Ok(())
    }

    async fn fetch_payment_method(
        &self,
        id: PaymentMethodId,
    ) -> Result<Option<PaymentMethodRecord>> {
        let collections = self.collections.read().await;
        Ok(collections
            .payment_methods
            .iter()
            .find(|m| m.id == id)
            .cloned())
    }

    async fn find_payment_method_by_name(
        &self,
        name: &str,
    ) -> Result<Option<PaymentMethodRecord>> {
        let collections = self.collections.read().await;
        Ok(collections
            .payment_methods
            .iter()
            .find(|m| m.name == name)
            .cloned())
    }

    async fn list_payment_methods(&self) -> Result<Vec<PaymentMethodRecord>> {
        let collections = self.collections.read().await;
        Ok(collections.payment_methods.clone())
    }

    async fn update_payment_method(&self, method: &PaymentMethodRecord) -> Result<()> {
        self.take_write()?;
        let mut collections = self.collections.write().await;
        if let Some(existing) = collections
            .payment_methods
            .iter_mut()
            .find(|m| m.id == method.id)
        {
            *existing = method.clone();
        }
        Ok(())
    }

    async fn delete_payment_method(&self, id: PaymentMethodId) -> Result<()> {
        self.take_write()?;
        let mut collections = self.collections.write().await;
        collections.payment_methods.retain(|m| m.id != id);
        Ok(())
    }
}
