// Aggregation operations - explicit filter / group / sum over transactions
//
// Each binding is one of these operations followed by a chart constructor.

use crate::dataset::Transaction;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

// ============================================================================
// RESULT TYPES
// ============================================================================

/// Summed sales for one order date
#[derive(Debug, Clone, PartialEq)]
pub struct DailySales {
    pub date: NaiveDate,
    pub sales: f64,
}

/// Summed sales for one label (category or segment)
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSales {
    pub label: String,
    pub sales: f64,
}

/// Sales/profit points sharing one sub-category
#[derive(Debug, Clone, PartialEq)]
pub struct SubCategoryPoints {
    pub sub_category: String,
    pub sales: Vec<f64>,
    pub profit: Vec<f64>,
}

impl SubCategoryPoints {
    pub fn len(&self) -> usize {
        self.sales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }
}

// ============================================================================
// OPERATIONS
// ============================================================================

/// Distinct values in first-seen order
pub fn distinct_in_order<'a, I>(values: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    values.into_iter().filter(|v| seen.insert(*v)).collect()
}

/// Sum sales per order date within the closed interval [start, end],
/// ascending by date. `start > end` selects nothing.
pub fn sales_by_date<'a, I>(transactions: I, start: NaiveDate, end: NaiveDate) -> Vec<DailySales>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    for tx in transactions
        .into_iter()
        .filter(|tx| tx.order_date >= start && tx.order_date <= end)
    {
        *totals.entry(tx.order_date).or_insert(0.0) += tx.sales;
    }

    totals
        .into_iter()
        .map(|(date, sales)| DailySales { date, sales })
        .collect()
}

/// Sum sales per category for rows in `region` (exact match), sorted by category
pub fn sales_by_category<'a, I>(transactions: I, region: &str) -> Vec<LabeledSales>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();

    for tx in transactions.into_iter().filter(|tx| tx.region == region) {
        *totals.entry(tx.category.as_str()).or_insert(0.0) += tx.sales;
    }

    totals
        .into_iter()
        .map(|(label, sales)| LabeledSales {
            label: label.to_string(),
            sales,
        })
        .collect()
}

/// Sum sales per customer segment for rows in `category` (exact match),
/// segments in first-seen order
pub fn sales_by_segment<'a, I>(transactions: I, category: &str) -> Vec<LabeledSales>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut slices: Vec<LabeledSales> = Vec::new();

    for tx in transactions.into_iter().filter(|tx| tx.category == category) {
        match slices.iter_mut().find(|s| s.label == tx.segment) {
            Some(slice) => slice.sales += tx.sales,
            None => slices.push(LabeledSales {
                label: tx.segment.clone(),
                sales: tx.sales,
            }),
        }
    }

    slices
}

/// Every transaction as a (sales, profit) point, grouped by sub-category in
/// first-seen order. Row order is preserved inside each group.
pub fn points_by_sub_category<'a, I>(transactions: I) -> Vec<SubCategoryPoints>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut groups: Vec<SubCategoryPoints> = Vec::new();

    for tx in transactions {
        let idx = match groups.iter().position(|g| g.sub_category == tx.sub_category) {
            Some(idx) => idx,
            None => {
                groups.push(SubCategoryPoints {
                    sub_category: tx.sub_category.clone(),
                    sales: Vec::new(),
                    profit: Vec::new(),
                });
                groups.len() - 1
            }
        };
        groups[idx].sales.push(tx.sales);
        groups[idx].profit.push(tx.profit);
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{update_bar, update_line, update_pie, update_scatter};
    use crate::dataset::TransactionTable;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_transaction(
        order_date: NaiveDate,
        region: &str,
        category: &str,
        sub_category: &str,
        segment: &str,
        sales: f64,
        profit: f64,
    ) -> Transaction {
        Transaction {
            order_date,
            region: region.to_string(),
            category: category.to_string(),
            sub_category: sub_category.to_string(),
            segment: segment.to_string(),
            sales,
            profit,
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            create_test_transaction(date(2016, 1, 5), "East", "Furniture", "Chairs", "Consumer", 100.0, 20.0),
            create_test_transaction(date(2016, 1, 5), "West", "Technology", "Phones", "Corporate", 50.0, -5.0),
            create_test_transaction(date(2016, 1, 7), "East", "Technology", "Phones", "Consumer", 25.0, 4.0),
            create_test_transaction(date(2016, 2, 1), "East", "Furniture", "Tables", "Home Office", 10.0, -2.0),
            create_test_transaction(date(2016, 2, 3), "East", "Furniture", "Chairs", "Consumer", 5.0, 1.0),
        ]
    }

    #[test]
    fn test_sales_by_date_groups_and_bounds_are_inclusive() {
        let rows = sample();
        let series = sales_by_date(&rows, date(2016, 1, 5), date(2016, 2, 1));

        assert_eq!(
            series,
            vec![
                DailySales { date: date(2016, 1, 5), sales: 150.0 },
                DailySales { date: date(2016, 1, 7), sales: 25.0 },
                DailySales { date: date(2016, 2, 1), sales: 10.0 },
            ]
        );
    }

    #[test]
    fn test_sales_by_date_inverted_range_is_empty() {
        let rows = sample();
        assert!(sales_by_date(&rows, date(2016, 3, 1), date(2016, 1, 1)).is_empty());
    }

    #[test]
    fn test_sales_by_category_sorted_and_summed() {
        let rows = sample();
        let bars = sales_by_category(&rows, "East");

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].label, "Furniture");
        assert_eq!(bars[0].sales, 115.0);
        assert_eq!(bars[1].label, "Technology");
        assert_eq!(bars[1].sales, 25.0);
    }

    #[test]
    fn test_sales_by_category_unknown_region() {
        let rows = sample();
        assert!(sales_by_category(&rows, "east").is_empty());
    }

    #[test]
    fn test_sales_by_segment_sums_repeated_labels() {
        let rows = sample();
        let slices = sales_by_segment(&rows, "Furniture");

        assert_eq!(
            slices,
            vec![
                LabeledSales { label: "Consumer".to_string(), sales: 105.0 },
                LabeledSales { label: "Home Office".to_string(), sales: 10.0 },
            ]
        );
    }

    #[test]
    fn test_points_by_sub_category_keeps_every_row() {
        let rows = sample();
        let groups = points_by_sub_category(&rows);

        let names: Vec<&str> = groups.iter().map(|g| g.sub_category.as_str()).collect();
        assert_eq!(names, vec!["Chairs", "Phones", "Tables"]);
        assert_eq!(groups[0].sales, vec![100.0, 5.0]);
        assert_eq!(groups[0].profit, vec![20.0, 1.0]);
        assert_eq!(groups.iter().map(|g| g.len()).sum::<usize>(), rows.len());
    }

    #[test]
    fn test_distinct_in_order() {
        assert_eq!(distinct_in_order(["b", "a", "b", "c", "a"]), vec!["b", "a", "c"]);
    }

    // ------------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------------

    const REGIONS: [&str; 3] = ["East", "West", "Central"];
    const CATEGORIES: [&str; 3] = ["Furniture", "Technology", "Office Supplies"];
    const SEGMENTS: [&str; 3] = ["Consumer", "Corporate", "Home Office"];

    prop_compose! {
        fn arb_transaction()(
            day in 0i64..60,
            region in 0usize..3,
            category in 0usize..3,
            segment in 0usize..3,
            cents in 0u32..100_000,
            profit_cents in -50_000i32..50_000,
        ) -> Transaction {
            create_test_transaction(
                date(2016, 1, 1) + chrono::Duration::days(day),
                REGIONS[region],
                CATEGORIES[category],
                "Chairs",
                SEGMENTS[segment],
                f64::from(cents) / 100.0,
                f64::from(profit_cents) / 100.0,
            )
        }
    }

    proptest! {
        #[test]
        fn prop_line_series_stays_in_range_and_preserves_sum(
            rows in proptest::collection::vec(arb_transaction(), 1..80),
            a in 0i64..60,
            b in 0i64..60,
        ) {
            let start = date(2016, 1, 1) + chrono::Duration::days(a.min(b));
            let end = date(2016, 1, 1) + chrono::Duration::days(a.max(b));
            let series = sales_by_date(&rows, start, end);

            prop_assert!(series.iter().all(|p| p.date >= start && p.date <= end));
            prop_assert!(series.windows(2).all(|w| w[0].date < w[1].date));

            let expected: f64 = rows
                .iter()
                .filter(|tx| tx.order_date >= start && tx.order_date <= end)
                .map(|tx| tx.sales)
                .sum();
            let actual: f64 = series.iter().map(|p| p.sales).sum();
            prop_assert!((expected - actual).abs() < 1e-6);
        }

        #[test]
        fn prop_bar_categories_match_region_rows(
            rows in proptest::collection::vec(arb_transaction(), 1..80),
            region in 0usize..3,
        ) {
            let region = REGIONS[region];
            let bars = sales_by_category(&rows, region);

            let mut expected: Vec<&str> = distinct_in_order(
                rows.iter().filter(|tx| tx.region == region).map(|tx| tx.category.as_str()),
            );
            expected.sort();
            let labels: Vec<&str> = bars.iter().map(|b| b.label.as_str()).collect();
            prop_assert_eq!(labels, expected);

            for bar in &bars {
                let sum: f64 = rows
                    .iter()
                    .filter(|tx| tx.region == region && tx.category == bar.label)
                    .map(|tx| tx.sales)
                    .sum();
                prop_assert!((sum - bar.sales).abs() < 1e-6);
            }
        }

        #[test]
        fn prop_pie_slices_are_category_segments(
            rows in proptest::collection::vec(arb_transaction(), 1..80),
            category in 0usize..3,
        ) {
            let category = CATEGORIES[category];
            let slices = sales_by_segment(&rows, category);

            let expected = distinct_in_order(
                rows.iter().filter(|tx| tx.category == category).map(|tx| tx.segment.as_str()),
            );
            let labels: Vec<&str> = slices.iter().map(|s| s.label.as_str()).collect();
            prop_assert_eq!(labels, expected);
        }

        #[test]
        fn prop_scatter_keeps_every_row(
            rows in proptest::collection::vec(arb_transaction(), 1..80),
            clicks in any::<u64>(),
        ) {
            let table = TransactionTable::from_records(rows.clone()).unwrap();
            let figure = update_scatter(&table, clicks);

            prop_assert_eq!(figure.point_count(), rows.len());
            prop_assert_eq!(figure.layout.paper_bgcolor.is_some(), clicks % 2 == 1);
            prop_assert_eq!(
                points_by_sub_category(&rows).iter().map(|g| g.len()).sum::<usize>(),
                rows.len()
            );
        }

        #[test]
        fn prop_bindings_are_idempotent(
            rows in proptest::collection::vec(arb_transaction(), 1..40),
            region in 0usize..3,
            category in 0usize..3,
            clicks in any::<u64>(),
        ) {
            let table = TransactionTable::from_records(rows).unwrap();
            let (start, end) = table.date_bounds();

            prop_assert_eq!(update_line(&table, start, end), update_line(&table, start, end));
            prop_assert_eq!(update_bar(&table, REGIONS[region]), update_bar(&table, REGIONS[region]));
            prop_assert_eq!(update_pie(&table, CATEGORIES[category]), update_pie(&table, CATEGORIES[category]));
            prop_assert_eq!(update_scatter(&table, clicks), update_scatter(&table, clicks));
        }
    }
}
