//! Aggregates the charts draw from a [`FilteredView`].

use std::collections::BTreeMap;

use super::filter::FilteredView;
use super::model::NormalizedDataset;

/// One bar of the price histogram: `[start, end)`, the last bin closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Equal-width bins over the kept prices.
///
/// Returns nothing for an empty view and a single bin when every kept price
/// is the same.
pub fn price_histogram(
    dataset: &NormalizedDataset,
    view: &FilteredView,
    bins: usize,
) -> Vec<HistogramBin> {
    if view.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (min, max) = view
        .rows(dataset)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(r.price), hi.max(r.price))
        });

    if max <= min {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: view.count,
        }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for row in view.rows(dataset) {
        let idx = ((row.price - min) / width).floor() as usize;
        counts[idx.min(bins - 1)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: min + i as f64 * width,
            end: if i + 1 == bins { max } else { min + (i + 1) as f64 * width },
            count,
        })
        .collect()
}

/// Share of one room type among the kept listings that have a room type.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomTypeShare {
    pub room_type: String,
    pub count: usize,
    /// `count` over the number of kept listings with a room type, in `0..=1`.
    pub fraction: f64,
}

/// Room-type proportions, largest first (ties by name).
pub fn room_type_breakdown(dataset: &NormalizedDataset, view: &FilteredView) -> Vec<RoomTypeShare> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for row in view.rows(dataset) {
        if let Some(t) = &row.room_type {
            *counts.entry(t.as_str()).or_default() += 1;
        }
    }

    let total: usize = counts.values().sum();
    let mut shares: Vec<RoomTypeShare> = counts
        .into_iter()
        .map(|(room_type, count)| RoomTypeShare {
            room_type: room_type.to_string(),
            count,
            fraction: count as f64 / total as f64,
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.room_type.cmp(&b.room_type)));
    shares
}

/// `[longitude, latitude]` of every kept listing that has both.
pub fn geo_points(dataset: &NormalizedDataset, view: &FilteredView) -> Vec<[f64; 2]> {
    view.rows(dataset).filter_map(|r| r.coordinates()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{evaluate, FilterCriteria, PriceRange};
    use crate::data::model::tests::{columns, listing};
    use std::collections::BTreeSet;

    fn everything(ds: &NormalizedDataset) -> FilteredView {
        evaluate(
            ds,
            &FilterCriteria {
                price_range: PriceRange { min: 0.0, max: f64::MAX },
                room_types: BTreeSet::new(),
            },
        )
    }

    #[test]
    fn test_histogram_bins_cover_range() {
        let ds = NormalizedDataset::from_records(
            columns(&["price"]),
            vec![
                listing(0.0, None),
                listing(10.0, None),
                listing(49.0, None),
                listing(100.0, None),
            ],
        )
        .unwrap();
        let bins = price_histogram(&ds, &everything(&ds), 4);
        assert_eq!(bins.len(), 4);
        let counts: Vec<usize> = bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 1, 0, 1]);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[3].end, 100.0);
        assert_eq!(bins[1].width(), 25.0);
        assert_eq!(bins[0].center(), 12.5);
    }

    #[test]
    fn test_histogram_single_value_and_empty() {
        let ds = NormalizedDataset::from_records(
            columns(&["price"]),
            vec![listing(80.0, None), listing(80.0, None)],
        )
        .unwrap();
        let bins = price_histogram(&ds, &everything(&ds), 50);
        assert_eq!(bins, vec![HistogramBin { start: 80.0, end: 80.0, count: 2 }]);

        let empty = FilteredView { indices: Vec::new(), count: 0, average_price: None };
        assert!(price_histogram(&ds, &empty, 50).is_empty());
    }

    #[test]
    fn test_room_type_breakdown() {
        let ds = NormalizedDataset::from_records(
            columns(&["price", "room type"]),
            vec![
                listing(1.0, Some("Private room")),
                listing(2.0, Some("Entire home/apt")),
                listing(3.0, Some("Private room")),
                listing(4.0, None),
                listing(5.0, Some("Hotel room")),
            ],
        )
        .unwrap();
        let shares = room_type_breakdown(&ds, &everything(&ds));
        let names: Vec<&str> = shares.iter().map(|s| s.room_type.as_str()).collect();
        assert_eq!(names, vec!["Private room", "Entire home/apt", "Hotel room"]);
        assert_eq!(shares[0].count, 2);
        assert_eq!(shares[0].fraction, 0.5);
        let total: f64 = shares.iter().map(|s| s.fraction).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_geo_points_need_both_coordinates() {
        let mut a = listing(1.0, None);
        a.latitude = Some(40.7);
        a.longitude = Some(-73.9);
        let mut b = listing(2.0, None);
        b.latitude = Some(40.6);
        let ds = NormalizedDataset::from_records(columns(&["price", "lat", "longitude"]), vec![a, b])
            .unwrap();
        assert_eq!(geo_points(&ds, &everything(&ds)), vec![[-73.9, 40.7]]);
    }
}
