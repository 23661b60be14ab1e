//! Sort specification for order listings.

/// Header fields a listing may be sorted by.
///
/// The set is a whitelist: the field name reaches the SQL `ORDER BY`
/// clause, so arbitrary caller input is never interpolated. An
/// unrecognized name falls back to the transaction date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderSortField {
    #[default]
    TransactionDate,
    TotalAmount,
    TotalQty,
}

impl OrderSortField {
    /// Parses a caller-supplied field name, falling back to the default.
    pub fn parse(name: &str) -> Self {
        match name {
            "total_amount" => Self::TotalAmount,
            "total_qty" => Self::TotalQty,
            _ => Self::TransactionDate,
        }
    }

    /// Returns the SQL column name for this field.
    pub fn column(self) -> &'static str {
        match self {
            Self::TransactionDate => "transaction_date",
            Self::TotalAmount => "total_amount",
            Self::TotalQty => "total_qty",
        }
    }
}

/// Sort direction; ascending unless descending is explicitly requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Parses a caller-supplied direction; only `"desc"` flips the order.
    pub fn parse(direction: &str) -> Self {
        if direction == "desc" {
            Self::Descending
        } else {
            Self::Ascending
        }
    }

    /// Returns the SQL keyword for this direction.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Complete sort specification for `list_orders`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderSort {
    pub field: OrderSortField,
    pub direction: SortDirection,
}

impl OrderSort {
    /// Builds a sort order from raw query parameters.
    pub fn from_params(order_by: Option<&str>, order_direction: Option<&str>) -> Self {
        Self {
            field: order_by.map(OrderSortField::parse).unwrap_or_default(),
            direction: order_direction
                .map(SortDirection::parse)
                .unwrap_or_default(),
        }
    }
}
