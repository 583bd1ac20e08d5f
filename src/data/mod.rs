/// Data layer: core types, loading, filtering and chart aggregates.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, clean price, rename `long` → NormalizedDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ NormalizedDataset │  Vec<ListingRecord>, capabilities, price bounds
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  price range + room types → FilteredView (count, mean)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  histogram bins, room-type shares, map points
///   └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
