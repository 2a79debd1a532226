//! Filtering and selection state for the visible object set

use std::collections::BTreeSet;

use serde::Serialize;

use super::{ObjectCategory, TrackedObject};

/// Lower bound for the maximum rendered-object count
pub const MIN_VISIBLE: usize = 10;

/// Maximum rendered-object count before the user touches the slider
pub const DEFAULT_MAX_VISIBLE: usize = 200;

/// Per-category count shown in the filter sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: ObjectCategory,
    pub count: usize,
    pub visible: bool,
}

/// Filter criteria and selection shared by the scene and the side panel
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub visible_categories: BTreeSet<ObjectCategory>,
    pub search: String,
    pub max_visible: usize,
    pub show_orbit_paths: bool,
    pub show_all_labels: bool,
    /// Animation speed in phase-units per second
    pub speed: f64,
    pub selected: Option<u32>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            visible_categories: ObjectCategory::ALL.into_iter().collect(),
            search: String::new(),
            max_visible: DEFAULT_MAX_VISIBLE,
            show_orbit_paths: true,
            show_all_labels: false,
            speed: crate::renderer::DEFAULT_ANIMATION_SPEED,
            selected: None,
        }
    }
}

impl FilterState {
    pub fn toggle_category(&mut self, category: ObjectCategory) {
        if !self.visible_categories.remove(&category) {
            self.visible_categories.insert(category);
        }
    }

    pub fn select_all_categories(&mut self) {
        self.visible_categories = ObjectCategory::ALL.into_iter().collect();
    }

    pub fn select_no_categories(&mut self) {
        self.visible_categories.clear();
    }

    pub fn is_category_visible(&self, category: ObjectCategory) -> bool {
        self.visible_categories.contains(&category)
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    /// Set the maximum rendered-object count, bounded to
    /// `[MIN_VISIBLE, filtered_total]`.
    pub fn set_max_visible(&mut self, requested: usize, filtered_total: usize) {
        let (lo, hi) = max_visible_bounds(filtered_total);
        self.max_visible = requested.clamp(lo, hi);
    }

    /// Click on an object: selects it, or deselects it if already selected
    pub fn click_object(&mut self, norad_id: u32) {
        self.selected = if self.selected == Some(norad_id) {
            None
        } else {
            Some(norad_id)
        };
    }

    /// Click on empty space
    pub fn click_empty(&mut self) {
        self.selected = None;
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Objects passing the category and search filters, in input order
    pub fn filtered<'a>(&self, objects: &'a [TrackedObject]) -> Vec<&'a TrackedObject> {
        let query = self.search.trim().to_lowercase();
        objects
            .iter()
            .filter(|obj| self.visible_categories.contains(&obj.category))
            .filter(|obj| obj.matches_query(&query))
            .collect()
    }

    /// The effective visible set: filtered objects truncated to `max_visible`
    pub fn effective_set<'a>(&self, objects: &'a [TrackedObject]) -> Vec<&'a TrackedObject> {
        let mut visible = self.filtered(objects);
        visible.truncate(self.max_visible);
        visible
    }

    /// Clear the selection if it is not part of `visible`.
    /// Returns true when the selection was dropped.
    pub fn retain_selection(&mut self, visible: &[&TrackedObject]) -> bool {
        match self.selected {
            Some(id) if !visible.iter().any(|obj| obj.norad_id == id) => {
                self.selected = None;
                true
            }
            _ => false,
        }
    }

    /// Per-category counts over the full object list
    pub fn category_counts(&self, objects: &[TrackedObject]) -> Vec<CategoryCount> {
        ObjectCategory::ALL
            .iter()
            .map(|&category| CategoryCount {
                category,
                count: objects.iter().filter(|obj| obj.category == category).count(),
                visible: self.visible_categories.contains(&category),
            })
            .collect()
    }
}

/// Slider range for the maximum rendered-object count
pub fn max_visible_bounds(filtered_total: usize) -> (usize, usize) {
    (MIN_VISIBLE, filtered_total.max(MIN_VISIBLE))
}
