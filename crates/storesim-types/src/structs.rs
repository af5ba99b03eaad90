//! Core entity structs for the store simulation.
//!
//! [`Customer`] is the full roster record. [`CustomerView`] and
//! [`SimulationStats`] are the read-only projections handed to pollers and
//! streamed to the browser.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::ProductCategory;
use crate::ids::CustomerId;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Integer coordinate on the store canvas.
///
/// Positions are values: a new position is always computed and written
/// back as a whole, never patched field by field by more than one writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Position {
    /// Horizontal coordinate (grows to the right).
    pub x: i32,
    /// Vertical coordinate (grows downward).
    pub y: i32,
}

impl Position {
    /// Create a position from its coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise saturating addition.
    #[must_use]
    pub const fn saturating_add(self, delta: Self) -> Self {
        Self {
            x: self.x.saturating_add(delta.x),
            y: self.y.saturating_add(delta.y),
        }
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Customer
// ---------------------------------------------------------------------------

/// What the customer came to buy. Fixed for the customer's whole visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DesiredProduct {
    /// The product category.
    pub category: ProductCategory,
}

impl DesiredProduct {
    /// Wrap a category.
    pub const fn new(category: ProductCategory) -> Self {
        Self { category }
    }
}

/// A simulated customer.
///
/// The profile fields (names, purchase history) are opaque to the
/// simulation; only [`desired_product`](Self::desired_product) and
/// [`current_position`](Self::current_position) drive movement. The
/// position is written exclusively under the store's roster lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique ID, never reused while the customer is in the store.
    pub id: CustomerId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Lifetime purchase total.
    pub purchase_amount: Decimal,
    /// Number of past purchases.
    pub purchase_count: u32,
    /// Number of past visits.
    pub visit_count: u32,
    /// What the customer is looking for on this visit.
    pub desired_product: DesiredProduct,
    /// Where the customer currently stands.
    pub current_position: Position,
}

impl Customer {
    /// Create a customer with an empty profile.
    pub fn new(id: CustomerId, category: ProductCategory) -> Self {
        Self {
            id,
            first_name: String::new(),
            last_name: String::new(),
            purchase_amount: Decimal::ZERO,
            purchase_count: 0,
            visit_count: 0,
            desired_product: DesiredProduct::new(category),
            current_position: Position::default(),
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    /// Set the purchase history counters.
    #[must_use]
    pub fn with_history(
        mut self,
        purchase_amount: Decimal,
        purchase_count: u32,
        visit_count: u32,
    ) -> Self {
        self.purchase_amount = purchase_amount;
        self.purchase_count = purchase_count;
        self.visit_count = visit_count;
        self
    }

    /// The category this customer is heading for.
    pub const fn category(&self) -> ProductCategory {
        self.desired_product.category
    }

    /// Project the fields a renderer needs.
    pub const fn view(&self) -> CustomerView {
        CustomerView {
            id: self.id,
            current_position: self.current_position,
            desired_product: self.desired_product,
        }
    }
}

/// The renderer's view of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CustomerView {
    /// Customer ID.
    pub id: CustomerId,
    /// Position at the time of the snapshot.
    pub current_position: Position,
    /// What the customer is looking for.
    pub desired_product: DesiredProduct,
}

// ---------------------------------------------------------------------------
// Poller snapshot
// ---------------------------------------------------------------------------

/// Point-in-time view of the store served to pollers and `WebSocket`
/// clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SimulationStats {
    /// Every customer in the roster at snapshot time.
    pub customers: Vec<CustomerView>,
    /// Mean of the customers' past purchase counts.
    #[ts(as = "String")]
    pub average_purchase_count: Decimal,
    /// Customer count per desired department name.
    pub customer_categories: BTreeMap<String, u32>,
    /// Roster size divided by the store's nominal capacity.
    #[ts(as = "String")]
    pub store_load: Decimal,
    /// Customer workers currently running.
    #[ts(type = "number")]
    pub active_workers: u64,
    /// Dispatchers currently attached to the intake queue.
    #[ts(type = "number")]
    pub active_channels: u64,
    /// Most recent event log entries, oldest first.
    pub technical_logs: Vec<String>,
    /// When the snapshot was taken.
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_customer_has_blank_profile() {
        let customer = Customer::new(CustomerId::new(3), ProductCategory::Meat);
        assert!(customer.first_name.is_empty());
        assert_eq!(customer.purchase_amount, Decimal::ZERO);
        assert_eq!(customer.category(), ProductCategory::Meat);
        assert_eq!(customer.current_position, Position::new(0, 0));
    }

    #[test]
    fn view_copies_renderer_fields() {
        let mut customer = Customer::new(CustomerId::new(9), ProductCategory::Bread)
            .with_name("Anna", "Petrova");
        customer.current_position = Position::new(10, 20);
        let view = customer.view();
        assert_eq!(view.id, CustomerId::new(9));
        assert_eq!(view.current_position, Position::new(10, 20));
        assert_eq!(view.desired_product.category, ProductCategory::Bread);
    }

    #[test]
    fn position_add_saturates() {
        let p = Position::new(i32::MAX, 0).saturating_add(Position::new(5, -5));
        assert_eq!(p, Position::new(i32::MAX, -5));
    }

    #[test]
    fn customer_json_shape() {
        let customer = Customer::new(CustomerId::new(1), ProductCategory::Vegetables)
            .with_history(Decimal::new(1250, 2), 4, 7);
        let json = serde_json::to_value(&customer).ok();
        let json = json.unwrap_or_default();
        assert_eq!(json["id"], 1);
        assert_eq!(json["purchase_amount"], "12.50");
        assert_eq!(json["desired_product"]["category"], "vegetables");
        assert_eq!(json["current_position"]["x"], 0);
    }
}
