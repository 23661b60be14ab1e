//! Typed records for each persisted collection.
//!
//! These are the shapes stored by both implementations and serialized on
//! the wire; the JSON field names follow the original collection layout
//! (`transaction_id` for the order foreign key).

use chrono::{DateTime, Utc};
use common::{
    AddressId, CustomerId, LineItemId, OrderId, PaymentId, PaymentMethodId, ProductId,
};
use serde::{Deserialize, Serialize};

/// Order header — the aggregate root.
///
/// `total_amount` and `total_qty` are denormalized sums over the line items
/// currently associated with the header; the workflow layer recomputes them
/// on every create/replace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub total_amount: f64,
    pub total_qty: f64,
    pub transaction_date: DateTime<Utc>,
}

/// Order line item, owned exclusively by its header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemRecord {
    pub id: LineItemId,
    #[serde(rename = "transaction_id")]
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: f64,
    pub subtotal: f64,
    pub price: f64,
}

/// Order payment, owned exclusively by its header.
///
/// `payment_date` stays unset until the payment is actually made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: PaymentId,
    #[serde(rename = "transaction_id")]
    pub order_id: OrderId,
    pub payment_method_id: PaymentMethodId,
    pub status: i16,
    pub paid_amount: f64,
    pub payment_date: Option<DateTime<Utc>>,
}

/// Targeted partial update for a line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemPatch {
    pub id: LineItemId,
    pub quantity: f64,
    pub subtotal: f64,
    pub price: f64,
}

/// Targeted partial update for a payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPatch {
    pub id: PaymentId,
    pub status: i16,
    pub paid_amount: f64,
    pub payment_date: Option<DateTime<Utc>>,
}

/// Customer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub name: String,
    pub code: String,
    pub email: String,
}

/// Customer address record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub id: AddressId,
    pub customer_id: CustomerId,
    pub street: String,
    pub city: String,
    pub postal_code: String,
}

/// Product record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub code: String,
    pub name: String,
    pub price: f64,
    pub description: String,
}

/// Payment method record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodRecord {
    pub id: PaymentMethodId,
    pub name: String,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_item_serializes_foreign_key_as_transaction_id() {
        let item = LineItemRecord {
            id: LineItemId::new(),
            order_id: OrderId::new(),
            product_id: ProductId::new(),
            quantity: 2.0,
            subtotal: 20.0,
            price: 10.0,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["transaction_id"], item.order_id.to_string());
        assert!(json.get("order_id").is_none());
    }

    #[test]
    fn payment_date_is_null_until_paid() {
        let payment = PaymentRecord {
            id: PaymentId::new(),
            order_id: OrderId::new(),
            payment_method_id: PaymentMethodId::new(),
            status: 0,
            paid_amount: 0.0,
            payment_date: None,
        };

        let json = serde_json::to_value(&payment).unwrap();
        assert!(json["payment_date"].is_null());
    }
}
