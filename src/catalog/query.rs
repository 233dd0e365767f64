use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::error::CatalogError;
use super::params::{QueryParams, SortField, SortOrder};
use crate::domain::Product;

/// One page of catalog results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub products: Vec<Product>,
    pub total_items: usize,
    pub total_pages: usize,
    pub current_page: usize,
}

/// Filters, sorts and paginates `products`.
///
/// Pure: the same collection and parameters always give the same page. Ordering is
/// a stable sort on the requested field, so records with equal keys keep their
/// collection order in both directions. A page past the end is empty, not an error.
///
/// # Errors
/// - [`CatalogError::InvalidParameter`] when `page` or `limit` is zero.
/// - [`CatalogError::DataIntegrity`] when a non-empty search meets a record
///   without a name or description.
pub fn query(products: &[Product], params: &QueryParams) -> Result<QueryResult, CatalogError> {
    params.validate()?;

    let mut matched = filter(products, params)?;
    sort(&mut matched, params.sort, params.order);

    let total_items = matched.len();
    let total_pages = total_items.div_ceil(params.limit);
    let start = (params.page - 1).saturating_mul(params.limit);

    let products = matched
        .into_iter()
        .skip(start)
        .take(params.limit)
        .cloned()
        .collect();

    Ok(QueryResult {
        products,
        total_items,
        total_pages,
        current_page: params.page,
    })
}

fn filter<'a>(products: &'a [Product], params: &QueryParams) -> Result<Vec<&'a Product>, CatalogError> {
    let needle = params.search.to_lowercase();
    let mut matched = Vec::with_capacity(products.len());

    for product in products {
        if let Some(category) = &params.category {
            if &product.category != category {
                continue;
            }
        }
        if needle.is_empty() || matches_search(product, &needle)? {
            matched.push(product);
        }
    }

    Ok(matched)
}

fn matches_search(product: &Product, needle: &str) -> Result<bool, CatalogError> {
    let name = product.name.as_deref().ok_or(CatalogError::DataIntegrity {
        id: product.id,
        field: "name",
    })?;
    let description = product.description.as_deref().ok_or(CatalogError::DataIntegrity {
        id: product.id,
        field: "description",
    })?;

    Ok(name.to_lowercase().contains(needle) || description.to_lowercase().contains(needle))
}

/// Stable sort; absent values order lowest.
fn sort(products: &mut [&Product], field: SortField, order: SortOrder) {
    let compare = |a: &&Product, b: &&Product| -> Ordering { field.key(a).cmp(&field.key(b)) };

    match order {
        SortOrder::Asc => products.sort_by(compare),
        SortOrder::Desc => products.sort_by(|a, b| compare(b, a)),
    }
}

/// Distinct non-empty categories in the order they first appear.
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for product in products {
        if !product.category.is_empty() && !seen.contains(&product.category) {
            seen.push(product.category.clone());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chair_and_desk() -> Vec<Product> {
        vec![
            Product::new(1, "Chair", 50.0, 10).with_description("Oak dining chair"),
            Product::new(2, "Desk", 150.0, 4).with_description("Standing desk"),
        ]
    }

    fn catalog() -> Vec<Product> {
        vec![
            Product::new(1, "Chair", 50.0, 10).with_category("Furniture").with_rating(4.0),
            Product::new(2, "Desk", 150.0, 4).with_category("Furniture"),
            Product::new(3, "Lamp", 20.0, 8).with_category("Lighting").with_rating(4.0),
            Product::new(4, "Bulb", 5.0, 100)
                .with_category("Lighting")
                .with_description("Warm LED for any lamp"),
            Product::new(5, "Rug", 50.0, 2).with_category("Textile").with_rating(3.5),
        ]
    }

    fn ids(result: &QueryResult) -> Vec<u64> {
        result.products.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_price_descending_first_page() {
        let params = QueryParams::default().sort(SortField::Price, SortOrder::Desc);
        let result = query(&chair_and_desk(), &params).unwrap();

        assert_eq!(ids(&result), vec![2, 1]);
        assert_eq!(result.total_items, 2);
        assert_eq!(result.total_pages, 1);
        assert_eq!(result.current_page, 1);
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let params = QueryParams::default().limit(1).page(3);
        let result = query(&chair_and_desk(), &params).unwrap();

        assert!(result.products.is_empty());
        assert_eq!(result.total_items, 2);
        assert_eq!(result.total_pages, 2);
        assert_eq!(result.current_page, 3);
    }

    #[test]
    fn test_empty_search_returns_whole_collection() {
        let products = catalog();
        let result = query(&products, &QueryParams::default().limit(100)).unwrap();
        assert_eq!(result.products, products);
    }

    #[test]
    fn test_search_is_case_insensitive_over_name_and_description() {
        let params = QueryParams::default().search("LAMP");
        let result = query(&catalog(), &params).unwrap();
        assert_eq!(ids(&result), vec![3, 4]);
    }

    #[test]
    fn test_category_filter_combines_with_search() {
        let products = catalog();
        let result = query(&products, &QueryParams::default().category("Lighting")).unwrap();
        assert_eq!(ids(&result), vec![3, 4]);

        let result = query(&products, &QueryParams::default().category("Lighting").search("bulb")).unwrap();
        assert_eq!(ids(&result), vec![4]);
    }

    #[test]
    fn test_equal_keys_keep_collection_order_both_ways() {
        let products = catalog();

        let asc = query(&products, &QueryParams::default().sort(SortField::Price, SortOrder::Asc)).unwrap();
        assert_eq!(ids(&asc), vec![4, 3, 1, 5, 2]);

        let desc = query(&products, &QueryParams::default().sort(SortField::Price, SortOrder::Desc)).unwrap();
        assert_eq!(ids(&desc), vec![2, 1, 5, 3, 4]);

        // Re-sorting an already sorted page in the other direction and back is stable.
        let again = query(&desc.products, &QueryParams::default().sort(SortField::Price, SortOrder::Asc)).unwrap();
        let back = query(&again.products, &QueryParams::default().sort(SortField::Price, SortOrder::Desc)).unwrap();
        assert_eq!(ids(&back), ids(&desc));
    }

    #[test]
    fn test_missing_values_sort_first_ascending_last_descending() {
        let products = catalog();

        let asc = query(&products, &QueryParams::default().sort(SortField::Rating, SortOrder::Asc)).unwrap();
        assert_eq!(ids(&asc), vec![2, 4, 5, 1, 3]);

        let desc = query(&products, &QueryParams::default().sort(SortField::Rating, SortOrder::Desc)).unwrap();
        assert_eq!(ids(&desc), vec![1, 3, 5, 2, 4]);
    }

    #[test]
    fn test_pages_concatenate_to_full_sorted_sequence() {
        let products = catalog();
        for limit in 1..=6 {
            let base = QueryParams::default().limit(limit).sort(SortField::Name, SortOrder::Asc);
            let first = query(&products, &base).unwrap();
            assert_eq!(first.total_pages, products.len().div_ceil(limit));

            let mut collected = Vec::new();
            for page in 1..=first.total_pages {
                let result = query(&products, &base.clone().page(page)).unwrap();
                collected.extend(ids(&result));
            }
            assert_eq!(collected, vec![4, 1, 2, 3, 5], "limit {limit}");
        }
    }

    #[test]
    fn test_no_matches_means_zero_pages() {
        let params = QueryParams::default().search("sofa");
        let result = query(&catalog(), &params).unwrap();
        assert_eq!(result.total_items, 0);
        assert_eq!(result.total_pages, 0);

        let result = query(&[], &QueryParams::default().page(4)).unwrap();
        assert!(result.products.is_empty());
        assert_eq!(result.total_pages, 0);
        assert_eq!(result.current_page, 4);
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        let err = query(&catalog(), &QueryParams::default().limit(0)).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidParameter { name: "limit", .. }));
    }

    #[test]
    fn test_search_over_record_without_description_is_data_integrity_error() {
        let mut products = catalog();
        products[2].description = None;

        let err = query(&products, &QueryParams::default().search("chair")).unwrap_err();
        assert_eq!(err, CatalogError::DataIntegrity { id: 3, field: "description" });

        // Listing without a search does not need the field.
        assert_eq!(query(&products, &QueryParams::default()).unwrap().total_items, 5);
    }

    #[test]
    fn test_categories_in_first_seen_order() {
        let mut products = catalog();
        products.push(Product::new(6, "Stool", 30.0, 1));
        assert_eq!(categories(&products), vec!["Furniture", "Lighting", "Textile"]);
    }
}
