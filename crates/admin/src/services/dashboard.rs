//! Admin dashboard statistics.

use std::collections::HashSet;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use toyshop_core::{Category, Gender, Price, Product};

/// Products with fewer units than this (but at least one) are low on stock.
pub const LOW_STOCK_THRESHOLD: u64 = 10;

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: usize,
    /// Sum of unit prices across the catalog.
    pub total_value: Price,
    pub unique_sizes: usize,
    pub inventory: InventorySummary,
    pub breakdown: CategoryBreakdown,
}

impl DashboardStats {
    #[must_use]
    pub fn from_products(products: &[Product]) -> Self {
        let unique_sizes = products
            .iter()
            .flat_map(|p| p.sizes.iter().map(|s| s.name.as_str()))
            .collect::<HashSet<_>>()
            .len();

        Self {
            total_products: products.len(),
            total_value: products.iter().map(|p| p.price).sum(),
            unique_sizes,
            inventory: InventorySummary::from_products(products),
            breakdown: CategoryBreakdown::from_products(products),
        }
    }
}

/// Stock health across the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    /// Units across every size of every product.
    pub total_units: u64,
    /// Products with `0 < units < LOW_STOCK_THRESHOLD`.
    pub low_stock: Vec<Product>,
    /// Products whose sizes are all at zero.
    pub out_of_stock: Vec<Product>,
    pub low_stock_percentage: Decimal,
    pub out_of_stock_percentage: Decimal,
    pub healthy_percentage: Decimal,
}

impl InventorySummary {
    #[must_use]
    pub fn from_products(products: &[Product]) -> Self {
        let total_units = products.iter().map(Product::total_inventory).sum();

        let low_stock: Vec<Product> = products
            .iter()
            .filter(|p| {
                let units = p.total_inventory();
                units > 0 && units < LOW_STOCK_THRESHOLD
            })
            .cloned()
            .collect();

        let out_of_stock: Vec<Product> = products
            .iter()
            .filter(|p| p.is_out_of_stock())
            .cloned()
            .collect();

        let low_stock_percentage = percentage(low_stock.len(), products.len());
        let out_of_stock_percentage = percentage(out_of_stock.len(), products.len());
        let healthy_percentage = if products.is_empty() {
            Decimal::ZERO
        } else {
            Decimal::ONE_HUNDRED - low_stock_percentage - out_of_stock_percentage
        };

        Self {
            total_units,
            low_stock,
            out_of_stock,
            low_stock_percentage,
            out_of_stock_percentage,
            healthy_percentage,
        }
    }

    /// Whether any product needs restocking.
    #[must_use]
    pub fn needs_attention(&self) -> bool {
        !self.low_stock.is_empty() || !self.out_of_stock.is_empty()
    }
}

/// `part / whole` as a percentage rounded to one decimal place.
fn percentage(part: usize, whole: usize) -> Decimal {
    if whole == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(whole))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// A labelled count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slice<T> {
    pub value: T,
    pub count: usize,
}

/// How the catalog splits by category, gender, and age range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    /// Non-empty categories in declaration order.
    pub categories: Vec<Slice<Category>>,
    /// Non-empty genders in declaration order.
    pub genders: Vec<Slice<Gender>>,
    /// Age ranges by descending count; ties keep first-seen order.
    pub age_ranges: Vec<Slice<String>>,
}

impl CategoryBreakdown {
    #[must_use]
    pub fn from_products(products: &[Product]) -> Self {
        let categories = Category::ALL
            .iter()
            .map(|&category| Slice {
                value: category,
                count: products.iter().filter(|p| p.category == category).count(),
            })
            .filter(|s| s.count > 0)
            .collect();

        let genders = Gender::ALL
            .iter()
            .map(|&gender| Slice {
                value: gender,
                count: products.iter().filter(|p| p.gender == gender).count(),
            })
            .filter(|s| s.count > 0)
            .collect();

        let mut age_ranges: Vec<Slice<String>> = Vec::new();
        for product in products {
            match age_ranges.iter_mut().find(|s| s.value == product.age_range) {
                Some(slice) => slice.count += 1,
                None => age_ranges.push(Slice {
                    value: product.age_range.clone(),
                    count: 1,
                }),
            }
        }
        age_ranges.sort_by(|a, b| b.count.cmp(&a.count));

        Self {
            categories,
            genders,
            age_ranges,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use toyshop_core::{ProductId, SizeVariant};

    use super::*;

    fn product(id: &str, counts: &[u32], category: Category, gender: Gender, age: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: id.to_string(),
            price: Price::from_cents(1000),
            code: "N/A".to_string(),
            sizes: counts
                .iter()
                .enumerate()
                .map(|(i, &c)| SizeVariant::new(format!("S{i}"), c))
                .collect(),
            age_range: age.to_string(),
            description: String::new(),
            images: Vec::new(),
            category,
            gender,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("healthy", &[10, 5], Category::Toys, Gender::Unisex, "0-3 years"),
            product("low", &[2, 3], Category::Clothes, Gender::Male, "3-6 years"),
            product("out", &[0, 0], Category::Clothes, Gender::Male, "3-6 years"),
            product("also-healthy", &[20], Category::Toys, Gender::Female, "6-9 years"),
        ]
    }

    #[test]
    fn test_inventory_summary() {
        let summary = InventorySummary::from_products(&catalog());

        assert_eq!(summary.total_units, 40);
        assert_eq!(summary.low_stock.len(), 1);
        assert_eq!(summary.low_stock[0].id.as_str(), "low");
        assert_eq!(summary.out_of_stock.len(), 1);
        assert_eq!(summary.out_of_stock[0].id.as_str(), "out");
        assert_eq!(summary.low_stock_percentage, Decimal::from(25));
        assert_eq!(summary.out_of_stock_percentage, Decimal::from(25));
        assert_eq!(summary.healthy_percentage, Decimal::from(50));
        assert!(summary.needs_attention());
    }

    #[test]
    fn test_empty_catalog_summary() {
        let summary = InventorySummary::from_products(&[]);
        assert_eq!(summary.total_units, 0);
        assert_eq!(summary.healthy_percentage, Decimal::ZERO);
        assert!(!summary.needs_attention());
    }

    #[test]
    fn test_percentage_rounds_to_one_place() {
        assert_eq!(percentage(1, 3), Decimal::new(333, 1));
        assert_eq!(percentage(2, 3), Decimal::new(667, 1));
    }

    #[test]
    fn test_breakdown_omits_empty_groups() {
        let breakdown = CategoryBreakdown::from_products(&catalog());

        assert_eq!(
            breakdown.categories,
            vec![
                Slice {
                    value: Category::Toys,
                    count: 2
                },
                Slice {
                    value: Category::Clothes,
                    count: 2
                },
            ]
        );
        assert_eq!(breakdown.genders.len(), 3);
        assert_eq!(breakdown.age_ranges[0].value, "3-6 years");
        assert_eq!(breakdown.age_ranges[0].count, 2);
        assert_eq!(breakdown.age_ranges[1].value, "0-3 years");
        assert_eq!(breakdown.age_ranges[2].value, "6-9 years");
    }

    #[test]
    fn test_dashboard_stats() {
        let stats = DashboardStats::from_products(&catalog());

        assert_eq!(stats.total_products, 4);
        assert_eq!(stats.total_value, Price::from_cents(4000));
        assert_eq!(stats.unique_sizes, 2);
    }
}
