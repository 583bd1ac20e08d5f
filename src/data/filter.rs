use std::collections::BTreeSet;

use super::model::{ListingRecord, NormalizedDataset};

// ---------------------------------------------------------------------------
// Filter criteria: what the user selected in the side panel
// ---------------------------------------------------------------------------

/// Inclusive price range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

/// The user's current selection, rebuilt on every interaction.
///
/// An empty `room_types` set means "no room-type filter" (show all), never
/// "exclude everything".
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub price_range: PriceRange,
    pub room_types: BTreeSet<String>,
}

impl FilterCriteria {
    /// Initialise criteria that select everything: full price bounds and every
    /// room type ticked.
    pub fn all(dataset: &NormalizedDataset) -> Self {
        FilterCriteria {
            price_range: PriceRange {
                min: dataset.price_bounds.min,
                max: dataset.price_bounds.max,
            },
            room_types: dataset.room_types.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Rows passing the current criteria plus their summary aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView {
    /// Positions of the kept rows in `NormalizedDataset::rows`, ascending.
    pub indices: Vec<usize>,
    pub count: usize,
    /// Mean price rounded to 2 decimals; `None` when no row is kept.
    pub average_price: Option<f64>,
}

impl FilteredView {
    /// The kept listings in source order.
    pub fn rows<'a>(
        &'a self,
        dataset: &'a NormalizedDataset,
    ) -> impl Iterator<Item = &'a ListingRecord> + 'a {
        self.indices.iter().map(move |&i| &dataset.rows[i])
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Apply the criteria to the dataset.
///
/// A listing passes when:
/// * its price lies in `price_range` (both ends inclusive), and
/// * `room_types` is empty → passes (no constraint), or
/// * the dataset has no room-type column → passes (filter inapplicable), or
/// * its room type is present and in `room_types`. A missing room type never
///   matches an active filter.
///
/// Count and mean are taken after both predicates.
pub fn evaluate(dataset: &NormalizedDataset, criteria: &FilterCriteria) -> FilteredView {
    let room_filter_active =
        dataset.capabilities.has_room_type && !criteria.room_types.is_empty();

    let indices: Vec<usize> = dataset
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| criteria.price_range.contains(row.price))
        .filter(|(_, row)| {
            if !room_filter_active {
                return true;
            }
            match &row.room_type {
                Some(t) => criteria.room_types.contains(t),
                None => false,
            }
        })
        .map(|(i, _)| i)
        .collect();

    let count = indices.len();
    let average_price = if count == 0 {
        None
    } else {
        let total: f64 = indices.iter().map(|&i| dataset.rows[i].price).sum();
        Some(round2(total / count as f64))
    };

    log::trace!("Filter kept {count} of {} listings", dataset.len());

    FilteredView {
        indices,
        count,
        average_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{columns, listing};

    fn dataset() -> NormalizedDataset {
        NormalizedDataset::from_records(
            columns(&["price", "room type"]),
            vec![
                listing(100.0, Some("Private room")),
                listing(50.0, Some("Entire home")),
                listing(75.0, None),
                listing(300.0, Some("Shared room")),
                listing(0.0, Some("Private room")),
            ],
        )
        .unwrap()
    }

    fn criteria(min: f64, max: f64, types: &[&str]) -> FilterCriteria {
        FilterCriteria {
            price_range: PriceRange { min, max },
            room_types: types.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_end_to_end_scenario() {
        let ds = NormalizedDataset::from_records(
            columns(&["price", "room type"]),
            vec![
                listing(crate::data::loader::parse_price("$100"), Some("Private room")),
                listing(crate::data::loader::parse_price("$50"), Some("Entire home")),
            ],
        )
        .unwrap();

        let view = evaluate(&ds, &criteria(0.0, 100.0, &["Private room"]));
        let rows: Vec<&ListingRecord> = view.rows(&ds).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].price, 100.0);
        assert_eq!(rows[0].room_type.as_deref(), Some("Private room"));
        assert_eq!(view.count, 1);
        assert_eq!(view.average_price, Some(100.0));
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let ds = dataset();
        let view = evaluate(&ds, &criteria(50.0, 100.0, &[]));
        assert_eq!(view.indices, vec![0, 1, 2]);
        for row in view.rows(&ds) {
            assert!(row.price >= 50.0 && row.price <= 100.0);
        }
        assert_eq!(view.average_price, Some(75.0));
    }

    #[test]
    fn test_empty_room_types_is_noop() {
        let ds = dataset();
        // range (60, 120) alone keeps 100 and 75, including the row without a
        // room type
        let view = evaluate(&ds, &criteria(60.0, 120.0, &[]));
        assert_eq!(view.indices, vec![0, 2]);
        assert_eq!(view.count, 2);
        assert_eq!(view.average_price, Some(87.5));
    }

    #[test]
    fn test_missing_room_type_excluded_when_filter_active() {
        let ds = dataset();
        let all_types: Vec<&str> = ds.room_types.iter().map(String::as_str).collect();
        let view = evaluate(&ds, &criteria(0.0, 1000.0, &all_types));
        assert_eq!(view.indices, vec![0, 1, 3, 4]);
    }

    #[test]
    fn test_room_type_ignored_without_column() {
        let ds = NormalizedDataset::from_records(
            columns(&["price"]),
            vec![listing(10.0, None), listing(20.0, None)],
        )
        .unwrap();
        let view = evaluate(&ds, &criteria(0.0, 100.0, &["Private room"]));
        assert_eq!(view.count, 2);
        assert_eq!(view.average_price, Some(15.0));
    }

    #[test]
    fn test_empty_result_has_undefined_average() {
        let ds = dataset();
        let view = evaluate(&ds, &criteria(500.0, 1000.0, &[]));
        assert_eq!(view.count, 0);
        assert!(view.is_empty());
        assert_eq!(view.average_price, None);

        // inverted range is accepted and simply matches nothing
        let view = evaluate(&ds, &criteria(100.0, 50.0, &[]));
        assert_eq!(view.average_price, None);
    }

    #[test]
    fn test_average_is_rounded() {
        let ds = NormalizedDataset::from_records(
            columns(&["price"]),
            vec![listing(10.0, None), listing(10.0, None), listing(10.01, None)],
        )
        .unwrap();
        let view = evaluate(&ds, &criteria(0.0, 100.0, &[]));
        assert_eq!(view.average_price, Some(10.0));
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let ds = dataset();
        let c = criteria(0.0, 150.0, &["Private room", "Entire home"]);
        let first = evaluate(&ds, &c);
        let second = evaluate(&ds, &c);
        assert_eq!(first, second);
        assert_eq!(first.indices, vec![0, 1, 4]);
    }

    #[test]
    fn test_default_criteria_select_everything_with_room_type() {
        let ds = dataset();
        let view = evaluate(&ds, &FilterCriteria::all(&ds));
        // the listing without a room type drops out once the filter is active,
        // matching the multiselect defaulting to every known type
        assert_eq!(view.count, ds.len() - 1);
    }
}
