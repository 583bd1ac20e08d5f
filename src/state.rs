use crate::color::ColorMap;
use crate::data::filter::{evaluate, FilterCriteria, FilteredView};
use crate::data::model::NormalizedDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset, replaced wholesale by File → Open….
    pub dataset: NormalizedDataset,

    /// Current selection in the side panel.
    pub criteria: FilterCriteria,

    /// Result of evaluating `criteria` (cached until the next change).
    pub view: FilteredView,

    /// Room type colours for the pie chart and filter labels.
    pub room_type_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: NormalizedDataset) -> Self {
        let criteria = FilterCriteria::all(&dataset);
        let view = evaluate(&dataset, &criteria);
        let room_type_colors = ColorMap::new(&dataset.room_types);
        Self {
            dataset,
            criteria,
            view,
            room_type_colors,
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset, resetting filters and colours.
    pub fn set_dataset(&mut self, dataset: NormalizedDataset) {
        *self = AppState::new(dataset);
    }

    /// Recompute the whole view after a criteria change.
    pub fn refilter(&mut self) {
        self.view = evaluate(&self.dataset, &self.criteria);
    }

    /// Move the lower bound, clamped to the price bounds; drags the upper
    /// bound along if needed.
    pub fn set_min_price(&mut self, value: f64) {
        let bounds = self.dataset.price_bounds;
        let value = value.clamp(bounds.min, bounds.max);
        let range = &mut self.criteria.price_range;
        range.min = value;
        if range.max < value {
            range.max = value;
        }
        self.refilter();
    }

    /// Move the upper bound, clamped to the price bounds; drags the lower
    /// bound along if needed.
    pub fn set_max_price(&mut self, value: f64) {
        let bounds = self.dataset.price_bounds;
        let value = value.clamp(bounds.min, bounds.max);
        let range = &mut self.criteria.price_range;
        range.max = value;
        if range.min > value {
            range.min = value;
        }
        self.refilter();
    }

    /// Toggle a single room type in the filter.
    pub fn toggle_room_type(&mut self, room_type: &str) {
        let selected = &mut self.criteria.room_types;
        if !selected.remove(room_type) {
            selected.insert(room_type.to_string());
        }
        self.refilter();
    }

    /// Select every room type.
    pub fn select_all_room_types(&mut self) {
        self.criteria.room_types = self.dataset.room_types.clone();
        self.refilter();
    }

    /// Clear the room type selection. An empty selection applies no room
    /// type filter at all.
    pub fn select_no_room_types(&mut self) {
        self.criteria.room_types.clear();
        self.refilter();
    }
}
