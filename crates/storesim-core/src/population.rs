//! Random customer generation.

use rand::Rng;
use rand::seq::IndexedRandom;
use rust_decimal::Decimal;
use storesim_types::{Customer, CustomerId, ProductCategory};

use crate::error::StoreError;
use crate::layout::StoreLayout;
use crate::store::Store;

const FIRST_NAMES: &[&str] = &[
    "Anna", "Boris", "Daria", "Egor", "Irina", "Kirill", "Maria", "Nikita", "Olga", "Pavel",
    "Sofia", "Timur",
];

const LAST_NAMES: &[&str] = &[
    "Ivanova", "Petrov", "Smirnova", "Kuznetsov", "Popova", "Volkov", "Sokolova", "Morozov",
    "Lebedeva", "Kozlov",
];

/// Generate a customer wanting a random department's category.
///
/// A layout without departments yields [`ProductCategory::Unknown`].
pub fn random_customer<R: Rng + ?Sized>(
    id: CustomerId,
    layout: &StoreLayout,
    rng: &mut R,
) -> Customer {
    let category = layout
        .departments()
        .choose(rng)
        .map_or(ProductCategory::Unknown, |d| d.category);
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Anna");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Ivanova");
    let purchase_count: u32 = rng.random_range(0..=40);
    let visit_count = purchase_count.saturating_add(rng.random_range(0..=10));
    let purchase_amount = Decimal::new(rng.random_range(0..=500_000), 2);

    Customer::new(id, category)
        .with_name(first, last)
        .with_history(purchase_amount, purchase_count, visit_count)
}

/// Generate `count` customers with fresh IDs and add them to the store.
///
/// Returns the admitted IDs in order. Waits whenever the intake queue is
/// full.
///
/// # Errors
///
/// Stops at the first [`StoreError`]; customers admitted before it stay.
pub async fn admit_random(store: &Store, count: u32) -> Result<Vec<CustomerId>, StoreError> {
    let mut admitted = Vec::new();
    for _ in 0..count {
        let id = store.next_customer_id();
        let customer = {
            let mut rng = rand::rng();
            random_customer(id, store.layout(), &mut rng)
        };
        store.add_customer(customer).await?;
        admitted.push(id);
    }
    tracing::info!(count = admitted.len(), "admitted generated customers");
    Ok(admitted)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::config::SimulationConfig;

    #[test]
    fn generated_customers_target_real_departments() {
        let layout = StoreLayout::standard();
        let mut rng = StdRng::seed_from_u64(11);
        for n in 1..=50 {
            let customer = random_customer(CustomerId::new(n), &layout, &mut rng);
            assert!(layout.department_for(customer.category()).is_some());
            assert!(!customer.first_name.is_empty());
            assert!(customer.visit_count >= customer.purchase_count);
        }
    }

    #[test]
    fn empty_layout_yields_unknown() {
        let standard = StoreLayout::standard();
        let layout = StoreLayout::new(Vec::new(), standard.entry(), standard.exit());
        let mut rng = StdRng::seed_from_u64(1);
        let customer = random_customer(CustomerId::new(1), &layout, &mut rng);
        assert_eq!(customer.category(), ProductCategory::Unknown);
    }

    #[tokio::test]
    async fn admit_random_allocates_distinct_ids() {
        let store = Store::from_config(&SimulationConfig::default());
        let ids = admit_random(&store, 5).await;
        assert!(ids.is_ok());
        let ids = ids.unwrap_or_default();

        assert_eq!(ids.len(), 5);
        assert_eq!(store.roster_len().await, 5);
        let mut sorted = ids.clone();
        sorted.dedup();
        assert_eq!(sorted, ids);
    }
}
