//! Product and payment-method services.

use common::{PaymentMethodId, ProductId};
use serde::Deserialize;
use store::{EntityStore, PaymentMethodRecord, ProductRecord};

use crate::error::DomainError;

/// Inbound product fields.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub code: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
}

/// Inbound payment-method fields.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentMethodInput {
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
}

/// CRUD for the product and payment-method collections.
pub struct CatalogService<S> {
    store: S,
}

impl<S: EntityStore> CatalogService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates a product; the code must be unique across the collection.
    #[tracing::instrument(skip(self, input), fields(code = %input.code))]
    pub async fn create_product(&self, input: ProductInput) -> Result<ProductRecord, DomainError> {
        if self.store.find_product_by_code(&input.code).await?.is_some() {
            return Err(DomainError::Conflict("Code already exists".to_string()));
        }

        let product = ProductRecord {
            id: ProductId::new(),
            code: input.code,
            name: input.name,
            price: input.price,
            description: input.description,
        };
        self.store.insert_product(&product).await?;
        Ok(product)
    }

    pub async fn get_products(&self) -> Result<Vec<ProductRecord>, DomainError> {
        Ok(self.store.list_products().await?)
    }

    pub async fn get_product(&self, id: ProductId) -> Result<ProductRecord, DomainError> {
        self.store
            .fetch_product(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Product"))
    }

    /// Updates a product in place.
    #[tracing::instrument(skip(self, input))]
    pub async fn update_product(
        &self,
        id: ProductId,
        input: ProductInput,
    ) -> Result<ProductRecord, DomainError> {
        self.store
            .fetch_product(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Product"))?;

        let product = ProductRecord {
            id,
            code: input.code,
            name: input.name,
            price: input.price,
            description: input.description,
        };
        self.store.update_product(&product).await?;
        Ok(product)
    }

    /// Deletes a product.
    #[tracing::instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), DomainError> {
        self.store
            .fetch_product(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Product"))?;
        self.store.delete_product(id).await?;
        Ok(())
    }

    /// Creates a payment method; the name must be unique.
    #[tracing::instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_payment_method(
        &self,
        input: PaymentMethodInput,
    ) -> Result<PaymentMethodRecord, DomainError> {
        if self
            .store
            .find_payment_method_by_name(&input.name)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict("Name already exists".to_string()));
        }

        let method = PaymentMethodRecord {
            id: PaymentMethodId::new(),
            name: input.name,
            is_active: input.is_active,
        };
        self.store.insert_payment_method(&method).await?;
        Ok(method)
    }

    pub async fn get_payment_methods(&self) -> Result<Vec<PaymentMethodRecord>, DomainError> {
        Ok(self.store.list_payment_methods().await?)
    }

    pub async fn get_payment_method(
        &self,
        id: PaymentMethodId,
    ) -> Result<PaymentMethodRecord, DomainError> {
        self.store
            .fetch_payment_method(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Payment method"))
    }

    /// Updates a payment method in place.
    #[tracing::instrument(skip(self, input))]
    pub async fn update_payment_method(
        &self,
        id: PaymentMethodId,
        input: PaymentMethodInput,
    ) -> Result<PaymentMethodRecord, DomainError> {
        self.store
            .fetch_payment_method(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Payment method"))?;

        let method = PaymentMethodRecord {
            id,
            name: input.name,
            is_active: input.is_active,
        };
        self.store.update_payment_method(&method).await?;
        Ok(method)
    }

    /// Deletes a payment method.
    #[tracing::instrument(skip(self))]
    pub async fn delete_payment_method(&self, id: PaymentMethodId) -> Result<(), DomainError> {
        self.store
            .fetch_payment_method(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Payment method"))?;
        self.store.delete_payment_method(id).await?;
        Ok(())
    }
}
