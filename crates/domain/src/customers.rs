//! Customer and customer-address services.

use common::{AddressId, CustomerId};
use serde::{Deserialize, Serialize};
use store::{AddressRecord, CustomerRecord, EntityStore, OrderStore};

use crate::error::DomainError;
use crate::join::group_by_parent;

/// Inbound customer fields.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerInput {
    pub name: String,
    pub code: String,
    pub email: String,
}

/// Inbound customer address fields.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressInput {
    pub customer_id: CustomerId,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
}

/// Composite view: customer fields flattened with the correlated
/// addresses embedded.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerWithAddresses {
    #[serde(flatten)]
    pub customer: CustomerRecord,
    pub addresses: Vec<AddressRecord>,
}

/// CRUD for customers and their addresses, plus the cross-aggregate
/// deletion guard against orders.
pub struct CustomerService<S> {
    store: S,
}

impl<S: EntityStore + OrderStore> CustomerService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates a customer; the email must be unique across the collection.
    #[tracing::instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_customer(&self, input: CustomerInput) -> Result<CustomerRecord, DomainError> {
        if self.store.find_customer_by_email(&input.email).await?.is_some() {
            return Err(DomainError::Conflict("Email already exists".to_string()));
        }

        let customer = CustomerRecord {
            id: CustomerId::new(),
            name: input.name,
            code: input.code,
            email: input.email,
        };
        self.store.insert_customer(&customer).await?;
        Ok(customer)
    }

    /// Lists every customer joined with its addresses in one bulk pass.
    #[tracing::instrument(skip(self))]
    pub async fn get_customers(&self) -> Result<Vec<CustomerWithAddresses>, DomainError> {
        let customers = self.store.list_customers().await?;
        let addresses = self.store.list_addresses().await?;
        let mut grouped = group_by_parent(addresses, |a| a.customer_id);

        Ok(customers
            .into_iter()
            .map(|customer| {
                let addresses = grouped.remove(&customer.id).unwrap_or_default();
                CustomerWithAddresses {
                    customer,
                    addresses,
                }
            })
            .collect())
    }

    /// Resolves one customer with its addresses.
    #[tracing::instrument(skip(self))]
    pub async fn get_customer(&self, id: CustomerId) -> Result<CustomerWithAddresses, DomainError> {
        let customer = self
            .store
            .fetch_customer(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Customer"))?;
        let addresses = self.store.addresses_for_customer(id).await?;
        Ok(CustomerWithAddresses {
            customer,
            addresses,
        })
    }

    /// Updates a customer in place.
    #[tracing::instrument(skip(self, input))]
    pub async fn update_customer(
        &self,
        id: CustomerId,
        input: CustomerInput,
    ) -> Result<CustomerRecord, DomainError> {
        self.store
            .fetch_customer(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Customer"))?;

        let customer = CustomerRecord {
            id,
            name: input.name,
            code: input.code,
            email: input.email,
        };
        self.store.update_customer(&customer).await?;
        Ok(customer)
    }

    /// Deletes a customer and cascades to its addresses.
    ///
    /// A customer may not be deleted while any order references it; the
    /// guard consults the order collection before any write.
    #[tracing::instrument(skip(self))]
    pub async fn delete_customer(&self, id: CustomerId) -> Result<(), DomainError> {
        self.store
            .fetch_customer(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Customer"))?;

        let order_count = self.store.count_orders_for_customer(id).await?;
        if order_count > 0 {
            return Err(DomainError::Conflict(
                "Cannot delete customer with associated transaction".to_string(),
            ));
        }

        self.store.delete_customer_with_addresses(id).await?;
        Ok(())
    }

    /// Creates a customer address.
    #[tracing::instrument(skip(self, input))]
    pub async fn create_address(&self, input: AddressInput) -> Result<AddressRecord, DomainError> {
        let address = AddressRecord {
            id: AddressId::new(),
            customer_id: input.customer_id,
            street: input.street,
            city: input.city,
            postal_code: input.postal_code,
        };
        self.store.insert_address(&address).await?;
        Ok(address)
    }

    /// Lists every customer address.
    pub async fn get_addresses(&self) -> Result<Vec<AddressRecord>, DomainError> {
        Ok(self.store.list_addresses().await?)
    }

    /// Resolves one customer address.
    pub async fn get_address(&self, id: AddressId) -> Result<AddressRecord, DomainError> {
        self.store
            .fetch_address(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Customer address"))
    }

    /// Replaces a customer address in place.
    #[tracing::instrument(skip(self, input))]
    pub async fn update_address(
        &self,
        id: AddressId,
        input: AddressInput,
    ) -> Result<AddressRecord, DomainError> {
        self.store
            .fetch_address(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Customer address"))?;

        let address = AddressRecord {
            id,
            customer_id: input.customer_id,
            street: input.street,
            city: input.city,
            postal_code: input.postal_code,
        };
        self.store.update_address(&address).await?;
        Ok(address)
    }

    /// Deletes a customer address.
    #[tracing::instrument(skip(self))]
    pub async fn delete_address(&self, id: AddressId) -> Result<(), DomainError> {
        self.store
            .fetch_address(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Customer address"))?;
        self.store.delete_address(id).await?;
        Ok(())
    }
}
