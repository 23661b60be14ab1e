use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use common::{
    AddressId, CustomerId, LineItemId, OrderId, PaymentId, PaymentMethodId, ProductId,
};

use crate::records::{
    AddressRecord, CustomerRecord, LineItemPatch, LineItemRecord, OrderRecord, PaymentMethodRecord,
    PaymentPatch, PaymentRecord, ProductRecord,
};
use crate::sort::OrderSort;
use crate::store::{EntityStore, OrderStore};
use crate::Result;

/// PostgreSQL-backed store implementation.
///
/// Every multi-record operation opens one SQL transaction and issues its
/// writes sequentially against it; the transaction handle is committed on
/// success and rolled back on drop, so the unit of work is released
/// exactly once on every exit path.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_order(row: &PgRow) -> Result<OrderRecord> {
        Ok(OrderRecord {
            id: OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            customer_id: CustomerId::from_uuid(row.try_get::<Uuid, _>("customer_id")?),
            total_amount: row.try_get("total_amount")?,
            total_qty: row.try_get("total_qty")?,
            transaction_date: row.try_get("transaction_date")?,
        })
    }

    fn row_to_line_item(row: &PgRow) -> Result<LineItemRecord> {
        Ok(LineItemRecord {
            id: LineItemId::from_uuid(row.try_get::<Uuid, _>("id")?),
            order_id: OrderId::from_uuid(row.try_get::<Uuid, _>("order_id")?),
            product_id: ProductId::from_uuid(row.try_get::<Uuid, _>("product_id")?),
            quantity: row.try_get("quantity")?,
            subtotal: row.try_get("subtotal")?,
            price: row.try_get("price")?,
        })
    }

    fn row_to_payment(row: &PgRow) -> Result<PaymentRecord> {
        Ok(PaymentRecord {
            id: PaymentId::from_uuid(row.try_get::<Uuid, _>("id")?),
            order_id: OrderId::from_uuid(row.try_get::<Uuid, _>("order_id")?),
            payment_method_id: PaymentMethodId::from_uuid(
                row.try_get::<Uuid, _>("payment_method_id")?,
            ),
            status: row.try_get("status")?,
            paid_amount: row.try_get("paid_amount")?,
            payment_date: row.try_get("payment_date")?,
        })
    }

    fn row_to_customer(row: &PgRow) -> Result<CustomerRecord> {
        Ok(CustomerRecord {
            id: CustomerId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            code: row.try_get("code")?,
            email: row.try_get("email")?,
        })
    }

    fn row_to_address(row: &PgRow) -> Result<AddressRecord> {
        Ok(AddressRecord {
            id: AddressId::from_uuid(row.try_get::<Uuid, _>("id")?),
            customer_id: CustomerId::from_uuid(row.try_get::<Uuid, _>("customer_id")?),
            street: row.try_get("street")?,
            city: row.try_get("city")?,
            postal_code: row.try_get("postal_code")?,
        })
    }

    fn row_to_product(row: &PgRow) -> Result<ProductRecord> {
        Ok(ProductRecord {
            id: ProductId::from_uuid(row.try_get::<Uuid, _>("id")?),
            code: row.try_get("code")?,
            name: row.try_get("name")?,
            price: row.try_get("price")?,
            description: row.try_get("description")?,
        })
    }

    fn row_to_payment_method(row: &PgRow) -> Result<PaymentMethodRecord> {
        Ok(PaymentMethodRecord {
            id: PaymentMethodId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            is_active: row.try_get("is_active")?,
        })
    }
}

async fn insert_line_item(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    item: &LineItemRecord,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO order_line_items (id, order_id, product_id, quantity, subtotal, price)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(item.id.as_uuid())
    .bind(item.order_id.as_uuid())
    .bind(item.product_id.as_uuid())
    .bind(item.quantity)
    .bind(item.subtotal)
    .bind(item.price)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn insert_payment(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    payment: &PaymentRecord,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO order_payments (id, order_id, payment_method_id, status, paid_amount, payment_date)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(payment.id.as_uuid())
    .bind(payment.order_id.as_uuid())
    .bind(payment.payment_method_id.as_uuid())
    .bind(payment.status)
    .bind(payment.paid_amount)
    .bind(payment.payment_date)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[async_trait]
impl OrderStore for PgStore {
    async fn insert_order(
        &self,
        header: &OrderRecord,
        items: &[LineItemRecord],
        payments: &[PaymentRecord],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, customer_id, total_amount, total_qty, transaction_date)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(header.id.as_uuid())
        .bind(header.customer_id.as_uuid())
        .bind(header.total_amount)
        .bind(header.total_qty)
        .bind(header.transaction_date)
        .execute(&mut *tx)
        .await?;

        for item in items {
            insert_line_item(&mut tx, item).await?;
        }
        for payment in payments {
            insert_payment(&mut tx, payment).await?;
        }

        tx.commit().await?;
        tracing::debug!(order_id = %header.id, "order inserted");
        Ok(())
    }

    async fn replace_order(
        &self,
        header: &OrderRecord,
        items: &[LineItemRecord],
        payments: &[PaymentRecord],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE orders
            SET customer_id = $2, total_amount = $3, total_qty = $4, transaction_date = $5
            WHERE id = $1
            "#,
        )
        .bind(header.id.as_uuid())
        .bind(header.customer_id.as_uuid())
        .bind(header.total_amount)
        .bind(header.total_qty)
        .bind(header.transaction_date)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM order_line_items WHERE order_id = $1")
            .bind(header.id.as_uuid())
            .execute(&mut *tx)
            .await?;

        for item in items {
            insert_line_item(&mut tx, item).await?;
        }
        // Payments are only ever appended on replace.
        for payment in payments {
            insert_payment(&mut tx, payment).await?;
        }

        tx.commit().await?;
        tracing::debug!(order_id = %header.id, "order replaced");
        Ok(())
    }

    async fn delete_order(&self, id: OrderId) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM order_line_items WHERE order_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM order_payments WHERE order_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(order_id = %id, "order deleted with line items and payments");
        Ok(())
    }

    async fn fetch_order(&self, id: OrderId) -> Result<Option<OrderRecord>> {
        let row = sqlx::query(
            "SELECT id, customer_id, total_amount, total_qty, transaction_date FROM orders WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_order).transpose()
    }

    async fn list_orders(&self, sort: OrderSort) -> Result<Vec<OrderRecord>> {
        // Column and direction come from a whitelist, never from raw input.
        let sql = format!(
            "SELECT id, customer_id, total_amount, total_qty, transaction_date FROM orders ORDER BY {} {}",
            sort.field.column(),
            sort.direction.keyword(),
        );

        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_order).collect()
    }

    async fn line_items_for_order(&self, id: OrderId) -> Result<Vec<LineItemRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, order_id, product_id, quantity, subtotal, price
            FROM order_line_items
            WHERE order_id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_line_item).collect()
    }

    async fn payments_for_order(&self, id: OrderId) -> Result<Vec<PaymentRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, order_id, payment_method_id, status, paid_amount, payment_date
            FROM order_payments
            WHERE order_id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_payment).collect()
    }

    async fn update_line_item(&self, patch: &LineItemPatch) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE order_line_items SET quantity = $2, subtotal = $3, price = $4 WHERE id = $1",
        )
        .bind(patch.id.as_uuid())
        .bind(patch.quantity)
        .bind(patch.subtotal)
        .bind(patch.price)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_payment(&self, patch: &PaymentPatch) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE order_payments SET status = $2, paid_amount = $3, payment_date = $4 WHERE id = $1",
        )
        .bind(patch.id.as_uuid())
        .bind(patch.status)
        .bind(patch.paid_amount)
        .bind(patch.payment_date)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_orders_for_customer(&self, customer_id: CustomerId) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE customer_id = $1")
            .bind(customer_id.as_uuid())
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }
}

#[async_trait]
impl EntityStore for PgStore {
    async fn insert_customer(&self, customer: &CustomerRecord) -> Result<()> {
        sqlx::query("INSERT INTO customers (id, name, code, email) VALUES ($1, $2, $3, $4)")
            .bind(customer.id.as_uuid())
            .bind(&customer.name)
            .bind(&customer.code)
            .bind(&customer.email)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn fetch_customer(&self, id: CustomerId) -> Result<Option<CustomerRecord>> {
        let row = sqlx::query("SELECT id, name, code, email FROM customers WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_customer).transpose()
    }

    async fn find_customer_by_email(&self, email: &str) -> Result<Option<CustomerRecord>> {
        let row = sqlx::query("SELECT id, name, code, email FROM customers WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_customer).transpose()
    }

    async fn list_customers(&self) -> Result<Vec<CustomerRecord>> {
        let rows = sqlx::query("SELECT id, name, code, email FROM customers")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::row_to_customer).collect()
    }

    async fn update_customer(&self, customer: &CustomerRecord) -> Result<()> {
        sqlx::query("UPDATE customers SET name = $2, code = $3, email = $4 WHERE id = $1")
            .bind(customer.id.as_uuid())
            .bind(&customer.name)
            .bind(&customer.code)
            .bind(&customer.email)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_customer_with_addresses(&self, id: CustomerId) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM customer_addresses WHERE customer_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn insert_address(&self, address: &AddressRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO customer_addresses (id, customer_id, street, city, postal_code)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(address.id.as_uuid())
        .bind(address.customer_id.as_uuid())
        .bind(&address.street)
        .bind(&address.city)
        .bind(&address.postal_code)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn fetch_address(&self, id: AddressId) -> Result<Option<AddressRecord>> {
        let row = sqlx::query(
            "SELECT id, customer_id, street, city, postal_code FROM customer_addresses WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(Self::row_to_address).transpose()
    }

    async fn list_addresses(&self) -> Result<Vec<AddressRecord>> {
        let rows =
            sqlx::query("SELECT id, customer_id, street, city, postal_code FROM customer_addresses")
                .fetch_all(&self.pool)
                .await?;
        rows.iter().map(Self::row_to_address).collect()
    }

    async fn addresses_for_customer(&self, customer_id: CustomerId) -> Result<Vec<AddressRecord>> {
        let rows = sqlx::query(
            "SELECT id, customer_id, street, city, postal_code FROM customer_addresses WHERE customer_id = $1",
        )
        .bind(customer_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::row_to_address).collect()
    }

    async fn update_address(&self, address: &AddressRecord) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE customer_addresses
            SET customer_id = $2, street = $3, city = $4, postal_code = $5
            WHERE id = $1
            "#,
        )
        .bind(address.id.as_uuid())
        .bind(address.customer_id.as_uuid())
        .bind(&address.street)
        .bind(&address.city)
        .bind(&address.postal_code)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_address(&self, id: AddressId) -> Result<()> {
        sqlx::query("DELETE FROM customer_addresses WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_product(&self, product: &ProductRecord) -> Result<()> {
        sqlx::query(
            "INSERT INTO products (id, code, name, price, description) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(product.id.as_uuid())
        .bind(&product.code)
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.description)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn fetch_product(&self, id: ProductId) -> Result<Option<ProductRecord>> {
        let row = sqlx::query("SELECT id, code, name, price, description FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_product).transpose()
    }

    async fn find_product_by_code(&self, code: &str) -> Result<Option<ProductRecord>> {
        let row =
            sqlx::query("SELECT id, code, name, price, description FROM products WHERE code = $1")
                .bind(code)
                .fetch_optional(&self.pool)
                .await?;
        row.as_ref().map(Self::row_to_product).transpose()
    }

    async fn list_products(&self) -> Result<Vec<ProductRecord>> {
        let rows = sqlx::query("SELECT id, code, name, price, description FROM products")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::row_to_product).collect()
    }

    async fn update_product(&self, product: &ProductRecord) -> Result<()> {
        sqlx::query(
            "UPDATE products SET code = $2, name = $3, price = $4, description = $5 WHERE id = $1",
        )
        .bind(product.id.as_uuid())
        .bind(&product.code)
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.description)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_product(&self, id: ProductId) -> Result<()> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_payment_method(&self, method: &PaymentMethodRecord) -> Result<()> {
        sqlx::query("INSERT INTO payment_methods (id, name, is_active) VALUES ($1, $2, $3)")
            .bind(method.id.as_uuid())
            .bind(&method.name)
            .bind(method.is_active)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn fetch_payment_method(
        &self,
        id: PaymentMethodId,
    ) -> Result<Option<PaymentMethodRecord>> {
        let row = sqlx::query("SELECT id, name, is_active FROM payment_methods WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_payment_method).transpose()
    }

    async fn find_payment_method_by_name(
        &self,
        name: &str,
    ) -> Result<Option<PaymentMethodRecord>> {
        let row = sqlx::query("SELECT id, name, is_active FROM payment_methods WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_payment_method).transpose()
    }

    async fn list_payment_methods(&self) -> Result<Vec<PaymentMethodRecord>> {
        let rows = sqlx::query("SELECT id, name, is_active FROM payment_methods")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::row_to_payment_method).collect()
    }

    async fn update_payment_method(&self, method: &PaymentMethodRecord) -> Result<()> {
        sqlx::query("UPDATE payment_methods SET name = $2, is_active = $3 WHERE id = $1")
            .bind(method.id.as_uuid())
            .bind(&method.name)
            .bind(method.is_active)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_payment_method(&self, id: PaymentMethodId) -> Result<()> {
        sqlx::query("DELETE FROM payment_methods WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
