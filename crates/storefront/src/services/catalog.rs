//! Product catalog browsing: search, facet filters, and grouping.

use toyshop_core::storage::{StorageEvent, keys};
use toyshop_core::{Category, Gender, KeyValueStore, Product, ProductId};

use crate::db::ProductRepository;

/// Catalog filter. `None` on a facet means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Case-insensitive search over name, description, and code.
    pub search: String,
    pub category: Option<Category>,
    pub gender: Option<Gender>,
    pub age_range: Option<String>,
}

impl CatalogFilter {
    /// Whether no search term or facet is set.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.search.trim().is_empty()
            && self.category.is_none()
            && self.gender.is_none()
            && self.age_range.is_none()
    }

    /// Whether a product passes every predicate.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_search(product)
            && self.category.is_none_or(|c| product.category == c)
            && self.gender.is_none_or(|g| product.gender == g)
            && self
                .age_range
                .as_deref()
                .is_none_or(|age| product.age_range == age)
    }

    fn matches_search(&self, product: &Product) -> bool {
        let term = self.search.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [&product.name, &product.description, &product.code]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }

    /// Products passing the filter, in catalog order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Distinct filter options present in a product list, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub categories: Vec<Category>,
    pub genders: Vec<Gender>,
    pub age_ranges: Vec<String>,
}

impl Facets {
    /// Collect the facets of `products`.
    #[must_use]
    pub fn from_products(products: &[Product]) -> Self {
        let mut facets = Self::default();
        for product in products {
            if !facets.categories.contains(&product.category) {
                facets.categories.push(product.category);
            }
            if !facets.genders.contains(&product.gender) {
                facets.genders.push(product.gender);
            }
            if !facets.age_ranges.contains(&product.age_range) {
                facets.age_ranges.push(product.age_range.clone());
            }
        }
        facets
    }
}

/// Products of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup<'a> {
    pub category: Category,
    pub products: Vec<&'a Product>,
}

/// Group products by category, in first-seen category order.
#[must_use]
pub fn group_by_category(products: &[Product]) -> Vec<CategoryGroup<'_>> {
    Facets::from_products(products)
        .categories
        .into_iter()
        .map(|category| CategoryGroup {
            category,
            products: products
                .iter()
                .filter(|p| p.category == category)
                .collect(),
        })
        .collect()
}

/// What the product listing shows for a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogView<'a> {
    /// No filter set: every product, grouped by category.
    Grouped(Vec<CategoryGroup<'a>>),
    /// Flat list of matching products (possibly empty).
    Filtered(Vec<&'a Product>),
}

/// The product list as seen by one tab.
#[derive(Debug)]
pub struct Catalog<S> {
    repo: ProductRepository<S>,
    products: Vec<Product>,
}

impl<S: KeyValueStore> Catalog<S> {
    /// Load the catalog from storage. Unreadable state loads as empty.
    #[must_use]
    pub fn load(store: S) -> Self {
        let mut catalog = Self {
            repo: ProductRepository::new(store),
            products: Vec::new(),
        };
        catalog.reload();
        catalog
    }

    /// All products in stored order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Find a product by ID.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == *id)
    }

    /// Filter options for the current products.
    #[must_use]
    pub fn facets(&self) -> Facets {
        Facets::from_products(&self.products)
    }

    /// Listing for a filter: grouped when unfiltered, flat otherwise.
    #[must_use]
    pub fn browse(&self, filter: &CatalogFilter) -> CatalogView<'_> {
        if filter.is_unfiltered() {
            CatalogView::Grouped(group_by_category(&self.products))
        } else {
            CatalogView::Filtered(filter.apply(&self.products))
        }
    }

    /// Replace in-memory products with the persisted list.
    pub fn reload(&mut self) {
        self.products = match self.repo.list() {
            Ok(products) => products,
            Err(e) => {
                tracing::error!(error = %e, "failed to load products, showing empty catalog");
                Vec::new()
            }
        };
        tracing::debug!(count = self.products.len(), "catalog loaded");
    }

    /// React to a change made by another tab. Returns whether the catalog
    /// was reloaded.
    pub fn handle_storage_event(&mut self, event: &StorageEvent) -> bool {
        if event.affects(keys::PRODUCTS) {
            self.reload();
            true
        } else {
            false
        }
    }
}
