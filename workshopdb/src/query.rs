//! In-memory filtering and sorting applied after a `find`.
//!
//! These run on records that are already loaded; the store-side part of a
//! query is expressed with [`FindOptions`](crate::repository::FindOptions).

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

use thiserror::Error;

use crate::entity::{contact, product};
use crate::repository::{Direction, FindOptions};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownOption {
    pub kind: &'static str,
    pub value: String,
}

/// Case-insensitive substring match of `term` against any of `fields`.
/// An empty term matches every record.
pub fn matches_search(term: &str, fields: &[&str]) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Name ordering close to a locale collation: letters compare without case
/// first, and on a tie lowercase sorts before uppercase.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Distinct non-empty categories of `products`, sorted.
pub fn distinct_categories(products: &[product::Model]) -> Vec<String> {
    products
        .iter()
        .map(|p| p.category.as_str())
        .filter(|c| !c.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Which tasks the task list shows. Evaluated by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TaskFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskFilter::All => "all",
            TaskFilter::Active => "active",
            TaskFilter::Completed => "completed",
        }
    }

    /// Newest first, restricted by completion state.
    pub fn find_options(&self) -> FindOptions {
        let options = match self {
            TaskFilter::All => FindOptions::all(),
            TaskFilter::Active => FindOptions::all().where_eq("completed", false),
            TaskFilter::Completed => FindOptions::all().where_eq("completed", true),
        };
        options.order_by("createdAt", Direction::Desc)
    }
}

impl FromStr for TaskFilter {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(TaskFilter::All),
            "active" => Ok(TaskFilter::Active),
            "completed" => Ok(TaskFilter::Completed),
            _ => Err(UnknownOption {
                kind: "task filter",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StockFilter {
    #[default]
    All,
    InStock,
    OutOfStock,
}

impl StockFilter {
    pub fn matches(&self, in_stock: bool) -> bool {
        match self {
            StockFilter::All => true,
            StockFilter::InStock => in_stock,
            StockFilter::OutOfStock => !in_stock,
        }
    }
}

impl FromStr for StockFilter {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StockFilter::All),
            "in-stock" => Ok(StockFilter::InStock),
            "out-of-stock" => Ok(StockFilter::OutOfStock),
            _ => Err(UnknownOption {
                kind: "stock filter",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    #[default]
    Name,
    PriceAsc,
    PriceDesc,
}

impl ProductSort {
    pub fn compare(&self, a: &product::Model, b: &product::Model) -> Ordering {
        match self {
            ProductSort::Name => locale_compare(&a.name, &b.name),
            ProductSort::PriceAsc => a.price.total_cmp(&b.price),
            ProductSort::PriceDesc => b.price.total_cmp(&a.price),
        }
    }
}

impl FromStr for ProductSort {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(ProductSort::Name),
            "price-asc" => Ok(ProductSort::PriceAsc),
            "price-desc" => Ok(ProductSort::PriceDesc),
            _ => Err(UnknownOption {
                kind: "product sort",
                value: s.to_string(),
            }),
        }
    }
}

/// Search, category, stock and sort selection of the products page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub search: String,
    /// Exact category, empty for all.
    pub category: String,
    pub stock: StockFilter,
    pub sort: ProductSort,
}

impl ProductQuery {
    pub fn matches(&self, product: &product::Model) -> bool {
        let text = [product.name.as_str(), product.description.as_str()];
        matches_search(&self.search, &text)
            && (self.category.is_empty() || product.category == self.category)
            && self.stock.matches(product.in_stock)
    }

    /// Matching products, sorted. The sort is stable, so equal keys keep
    /// their loaded order.
    pub fn apply(&self, products: &[product::Model]) -> Vec<product::Model> {
        let mut visible: Vec<_> = products
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect();
        visible.sort_by(|a, b| self.sort.compare(a, b));
        visible
    }
}

/// Search box of the contacts page: name, email or company.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactQuery {
    pub search: String,
}

impl ContactQuery {
    pub fn matches(&self, contact: &contact::Model) -> bool {
        matches_search(
            &self.search,
            &[
                contact.name.as_str(),
                contact.email.as_str(),
                contact.company.as_str(),
            ],
        )
    }

    pub fn apply(&self, contacts: &[contact::Model]) -> Vec<contact::Model> {
        contacts
            .iter()
            .filter(|c| self.matches(c))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldValue;

    fn item(id: i32, name: &str, price: f64, category: &str, in_stock: bool) -> product::Model {
        product::Model {
            id,
            name: name.into(),
            description: format!("{name} description"),
            price,
            category: category.into(),
            in_stock,
        }
    }

    fn catalog() -> Vec<product::Model> {
        vec![
            item(1, "Wireless Mouse", 29.99, "Electronics", true),
            item(2, "USB-C Hub", 45.99, "Electronics", false),
            item(3, "Notebook", 12.99, "Office Supplies", true),
            item(4, "Pen Set", 8.99, "Office Supplies", true),
            item(5, "Monitor Stand", 49.99, "", false),
        ]
    }

    fn names(products: &[product::Model]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_search_is_case_insensitive_over_any_field() {
        assert!(matches_search("", &["anything"]));
        assert!(matches_search("MOUSE", &["Wireless Mouse", ""]));
        assert!(matches_search("acme", &["Jane", "jane@x.io", "ACME Corp"]));
        assert!(!matches_search("zzz", &["Jane", "jane@x.io"]));
    }

    #[test]
    fn test_locale_compare_ignores_case_first() {
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("Zebra", "apple"), Ordering::Greater);
        assert_eq!(locale_compare("a", "A"), Ordering::Less);
        assert_eq!(locale_compare("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_distinct_categories_sorted_and_non_empty() {
        assert_eq!(distinct_categories(&catalog()), ["Electronics", "Office Supplies"]);
        assert!(distinct_categories(&[]).is_empty());
    }

    #[test]
    fn test_out_of_stock_filter_excludes_in_stock_products() {
        let query = ProductQuery {
            stock: "out-of-stock".parse().unwrap(),
            ..Default::default()
        };
        let visible = query.apply(&catalog());
        assert_eq!(names(&visible), ["Monitor Stand", "USB-C Hub"]);
    }

    #[test]
    fn test_price_sorts() {
        let asc = ProductQuery {
            sort: ProductSort::PriceAsc,
            ..Default::default()
        };
        assert_eq!(
            names(&asc.apply(&catalog())),
            ["Pen Set", "Notebook", "Wireless Mouse", "USB-C Hub", "Monitor Stand"]
        );

        let desc = ProductQuery {
            sort: ProductSort::PriceDesc,
            ..Default::default()
        };
        assert_eq!(names(&desc.apply(&catalog()))[0], "Monitor Stand");
    }

    #[test]
    fn test_category_and_search_combine() {
        let query = ProductQuery {
            search: "note".into(),
            category: "Office Supplies".into(),
            ..Default::default()
        };
        assert_eq!(names(&query.apply(&catalog())), ["Notebook"]);

        let query = ProductQuery {
            search: "note".into(),
            category: "Electronics".into(),
            ..Default::default()
        };
        assert!(query.apply(&catalog()).is_empty());
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let products = vec![
            item(1, "B", 10.0, "x", true),
            item(2, "A", 10.0, "x", true),
            item(3, "C", 5.0, "x", true),
        ];
        let query = ProductQuery {
            sort: ProductSort::PriceAsc,
            ..Default::default()
        };
        let ids: Vec<_> = query.apply(&products).iter().map(|p| p.id).collect();
        assert_eq!(ids, [3, 1, 2]);
    }

    #[test]
    fn test_contact_search_fields() {
        let contacts = vec![
            contact::Model {
                id: 1,
                name: "Ada Lovelace".into(),
                email: "ada@engine.org".into(),
                phone: "555-0100".into(),
                company: "Analytical".into(),
            },
            contact::Model {
                id: 2,
                name: "Grace Hopper".into(),
                email: "grace@navy.mil".into(),
                phone: "555-0199".into(),
                company: "Navy".into(),
            },
        ];
        let by_company = ContactQuery { search: "NAVY".into() };
        assert_eq!(by_company.apply(&contacts).len(), 1);
        // Phone is not searched.
        let by_phone = ContactQuery { search: "0100".into() };
        assert!(by_phone.apply(&contacts).is_empty());
    }

    #[test]
    fn test_task_filter_find_options() {
        let active = TaskFilter::Active.find_options();
        assert_eq!(
            active.filter.terms(),
            &[("completed".to_string(), FieldValue::Boolean(false))]
        );
        assert_eq!(active.order_by, vec![("createdAt".to_string(), Direction::Desc)]);
        assert!(TaskFilter::All.find_options().filter.is_empty());
    }

    #[test]
    fn test_option_parsing() {
        assert_eq!("completed".parse::<TaskFilter>(), Ok(TaskFilter::Completed));
        assert_eq!("price-desc".parse::<ProductSort>(), Ok(ProductSort::PriceDesc));
        let err = "sold-out".parse::<StockFilter>().unwrap_err();
        assert_eq!(err.to_string(), "unknown stock filter `sold-out`");
    }
}
