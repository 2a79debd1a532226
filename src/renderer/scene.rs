//! Scene state: filter/selection, the orbit set, and per-frame output
//!
//! The orbit set is rebuilt from scratch whenever the effective visible set
//! changes, either inline or on a background [`OrbitWorker`]. A background
//! result is only accepted if its generation is the one last requested;
//! anything older is dropped whole so stale and fresh orbits never mix.

use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

use super::{
    frame_state, marker_visual, AnimatedOrbit, FrameState, MarkerVisual, DEFAULT_ANIMATION_SPEED,
};
use crate::data::{
    max_visible_bounds, CategoryCount, CollisionAlert, FilterState, ObjectCategory, ObjectSource,
    TlePair, TrackedObject, DEFAULT_MAX_VISIBLE,
};
use crate::propagation::{
    build_orbits, derive_parameters, OrbitRecord, OrbitWorker, OrbitalParameters, Propagator,
    DEFAULT_SAMPLES_PER_ORBIT,
};

/// Scene configuration
#[derive(Debug, Clone)]
pub struct SceneSettings {
    /// Orbit track resolution (points per orbit)
    pub samples_per_orbit: usize,
    /// Initial animation speed (phase-units per second)
    pub speed: f64,
    /// Initial cap on rendered objects
    pub max_visible: usize,
    /// Build orbit sets on a worker thread
    pub background_builds: bool,
    /// Speed presets offered to the user (phase-units per second)
    pub speed_presets: Vec<f64>,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            samples_per_orbit: DEFAULT_SAMPLES_PER_ORBIT,
            speed: DEFAULT_ANIMATION_SPEED,
            max_visible: DEFAULT_MAX_VISIBLE,
            background_builds: false,
            speed_presets: vec![0.0, 0.001, 0.003, 0.01, 0.03, 0.1],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CursorHint {
    Default,
    Pointer,
}

/// Hover output for the host to apply (cursor style, tooltips)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HoverState {
    pub hovered: Option<u32>,
    pub cursor: CursorHint,
}

impl Default for HoverState {
    fn default() -> Self {
        Self {
            hovered: None,
            cursor: CursorHint::Default,
        }
    }
}

/// One marker in one frame
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MarkerFrame {
    pub norad_id: u32,
    pub state: FrameState,
    pub visual: MarkerVisual,
}

/// Side-panel statistics
#[derive(Debug, Clone, Serialize)]
pub struct SceneStatistics {
    pub total_objects: usize,
    pub visible_objects: usize,
    pub rendered_orbits: usize,
    pub selected_name: Option<String>,
    pub categories: Vec<CategoryCount>,
}

/// Data for the selected-object info panel
#[derive(Debug, Clone, Serialize)]
pub struct InfoPanel {
    pub norad_id: u32,
    pub name: String,
    pub category: ObjectCategory,
    pub source: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub tle: TlePair,
    pub parameters: Option<OrbitalParameters>,
    pub alert_count: usize,
    /// First three alerts
    pub alerts: Vec<CollisionAlert>,
}

impl InfoPanel {
    /// Panel for one object. Derives elements only; no propagation.
    pub fn new<P: Propagator + ?Sized>(propagator: &P, obj: &TrackedObject) -> Self {
        let alerts = obj.alerts();

        Self {
            norad_id: obj.norad_id,
            name: obj.display_name(),
            category: obj.category,
            source: obj.source.clone(),
            created_at: obj.created_at.clone(),
            updated_at: obj.updated_at.clone(),
            tle: obj.tle.clone(),
            parameters: derive_parameters(propagator, &obj.tle),
            alert_count: alerts.len(),
            alerts: alerts.iter().take(3).cloned().collect(),
        }
    }
}

pub struct Scene<P: Propagator + Clone + 'static> {
    propagator: P,
    settings: SceneSettings,
    filter: FilterState,
    /// Max-visible as last requested; the filter holds it clamped
    requested_max_visible: usize,
    objects: Vec<TrackedObject>,
    /// Effective visible set the current request was made for
    visible_ids: Vec<u32>,
    orbits: Vec<AnimatedOrbit>,
    /// Generation of `orbits`
    orbit_generation: u64,
    /// Latest requested generation
    generation: u64,
    worker: Option<OrbitWorker>,
    hover: HoverState,
}

impl<P: Propagator + Clone + 'static> Scene<P> {
    pub fn new(propagator: P, settings: SceneSettings) -> Self {
        let worker = settings
            .background_builds
            .then(|| OrbitWorker::new(propagator.clone()));
        let filter = FilterState {
            speed: settings.speed,
            max_visible: settings.max_visible,
            ..FilterState::default()
        };

        Self {
            propagator,
            requested_max_visible: settings.max_visible,
            settings,
            filter,
            objects: Vec::new(),
            visible_ids: Vec::new(),
            orbits: Vec::new(),
            orbit_generation: 0,
            generation: 0,
            worker,
            hover: HoverState::default(),
        }
    }

    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn objects(&self) -> &[TrackedObject] {
        &self.objects
    }

    pub fn orbits(&self) -> &[AnimatedOrbit] {
        &self.orbits
    }

    pub fn visible_ids(&self) -> &[u32] {
        &self.visible_ids
    }

    /// True while a requested orbit set has not arrived yet
    pub fn is_stale(&self) -> bool {
        self.orbit_generation != self.generation
    }

    /// Replace the object list (e.g. after a poll) and rebuild
    pub fn set_objects(&mut self, objects: Vec<TrackedObject>) {
        self.objects = objects;
        self.refresh(true);
    }

    /// Poll a data source. On failure the current objects stay in place.
    pub fn refresh_from(&mut self, source: &mut dyn ObjectSource) -> Result<usize> {
        match source.request() {
            Ok(objects) => {
                let count = objects.len();
                self.set_objects(objects);
                Ok(count)
            }
            Err(e) => {
                log::warn!("Keeping {} cached objects: {:#}", self.objects.len(), e);
                Err(e)
            }
        }
    }

    pub fn toggle_category(&mut self, category: ObjectCategory) {
        self.filter.toggle_category(category);
        self.refresh(false);
    }

    pub fn select_all_categories(&mut self) {
        self.filter.select_all_categories();
        self.refresh(false);
    }

    pub fn select_no_categories(&mut self) {
        self.filter.select_no_categories();
        self.refresh(false);
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.filter.set_search(text);
        self.refresh(false);
    }

    pub fn set_max_visible(&mut self, requested: usize) {
        self.requested_max_visible = requested;
        self.refresh(false);
    }

    /// Slider range for the max-visible control
    pub fn max_visible_range(&self) -> (usize, usize) {
        max_visible_bounds(self.filter.filtered(&self.objects).len())
    }

    pub fn set_show_orbit_paths(&mut self, show: bool) {
        self.filter.show_orbit_paths = show;
    }

    pub fn set_show_all_labels(&mut self, show: bool) {
        self.filter.show_all_labels = show;
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.filter.speed = speed;
    }

    /// Move to the next faster (`direction > 0`) or slower speed preset
    pub fn step_speed(&mut self, direction: i32) -> f64 {
        let mut presets = self.settings.speed_presets.clone();
        presets.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        presets.dedup_by(|a, b| (*a - *b).abs() < f64::EPSILON);
        if presets.is_empty() {
            return self.filter.speed;
        }

        let current = self.filter.speed;
        let mut idx = presets
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (*a - current)
                    .abs()
                    .partial_cmp(&(*b - current).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i)
            .unwrap_or(0);

        if direction > 0 && idx + 1 < presets.len() {
            idx += 1;
        } else if direction < 0 && idx > 0 {
            idx -= 1;
        }

        self.filter.speed = presets[idx];
        self.filter.speed
    }

    pub fn click_object(&mut self, norad_id: u32) {
        if self.visible_ids.contains(&norad_id) {
            self.filter.click_object(norad_id);
        }
    }

    pub fn click_empty(&mut self) {
        self.filter.click_empty();
    }

    pub fn clear_selection(&mut self) {
        self.filter.clear_selection();
    }

    pub fn selected(&self) -> Option<u32> {
        self.filter.selected
    }

    pub fn hover(&mut self, norad_id: Option<u32>) -> HoverState {
        let hovered = norad_id.filter(|id| self.visible_ids.contains(id));
        self.hover = HoverState {
            hovered,
            cursor: if hovered.is_some() {
                CursorHint::Pointer
            } else {
                CursorHint::Default
            },
        };
        self.hover
    }

    pub fn hover_state(&self) -> HoverState {
        self.hover
    }

    /// Recompute the effective visible set; rebuild orbits if it changed
    fn refresh(&mut self, force: bool) {
        let filtered_total = self.filter.filtered(&self.objects).len();
        self.filter.set_max_visible(self.requested_max_visible, filtered_total);

        let visible = self.filter.effective_set(&self.objects);

        if self.filter.retain_selection(&visible) {
            log::debug!("Selection left the visible set and was cleared");
        }

        let ids: Vec<u32> = visible.iter().map(|obj| obj.norad_id).collect();
        if !force && ids == self.visible_ids {
            return;
        }

        self.visible_ids = ids;
        self.generation += 1;
        if let Some(hovered) = self.hover.hovered {
            if !self.visible_ids.contains(&hovered) {
                self.hover = HoverState::default();
            }
        }

        let records = match &self.worker {
            Some(worker) => {
                let objects: Vec<TrackedObject> = visible.into_iter().cloned().collect();
                if !worker.request(self.generation, objects, self.settings.samples_per_orbit) {
                    log::error!("Orbit worker stopped; build #{} lost", self.generation);
                }
                None
            }
            None => Some(build_orbits(
                &self.propagator,
                visible,
                self.settings.samples_per_orbit,
            )),
        };

        if let Some(records) = records {
            self.install(self.generation, records);
        }
    }

    fn install(&mut self, generation: u64, records: Vec<OrbitRecord>) {
        self.orbits = records.into_iter().filter_map(AnimatedOrbit::new).collect();
        self.orbit_generation = generation;
        log::info!(
            "Orbit set #{} installed ({} orbits)",
            generation,
            self.orbits.len()
        );
    }

    /// Accept a finished background build, if it is current.
    /// Returns true when a new orbit set was installed.
    pub fn poll(&mut self) -> bool {
        let latest = match &self.worker {
            Some(worker) => worker.try_latest(),
            None => None,
        };
        match latest {
            Some(result) if result.generation == self.generation => {
                self.install(result.generation, result.orbits);
                true
            }
            Some(stale) => {
                log::debug!(
                    "Discarding orbit set #{} (current #{})",
                    stale.generation,
                    self.generation
                );
                false
            }
            None => false,
        }
    }

    /// Block until the current orbit set is installed
    pub fn wait_for_orbits(&mut self, timeout: Duration) -> bool {
        if !self.is_stale() {
            return true;
        }
        let result = match &self.worker {
            Some(worker) => worker.wait_for(self.generation, timeout),
            None => None,
        };
        match result {
            Some(result) if result.generation == self.generation => {
                self.install(result.generation, result.orbits);
                true
            }
            _ => false,
        }
    }

    /// Per-frame marker states. Never propagates; O(1) per orbit.
    pub fn frame(&self, elapsed_seconds: f64) -> Vec<MarkerFrame> {
        let selected = self.filter.selected;
        self.orbits
            .iter()
            .map(|orbit| {
                let is_selected = selected == Some(orbit.norad_id());
                MarkerFrame {
                    norad_id: orbit.norad_id(),
                    state: frame_state(
                        orbit,
                        elapsed_seconds,
                        self.filter.speed,
                        is_selected,
                        self.filter.show_orbit_paths,
                    ),
                    visual: marker_visual(
                        orbit.record.category,
                        is_selected,
                        self.filter.show_all_labels,
                    ),
                }
            })
            .collect()
    }

    fn selected_object(&self) -> Option<&TrackedObject> {
        let id = self.filter.selected?;
        self.objects.iter().find(|obj| obj.norad_id == id)
    }

    /// Info panel for the selected object; parameters derived on demand
    pub fn info_panel(&self) -> Option<InfoPanel> {
        let obj = self.selected_object()?;
        Some(InfoPanel::new(&self.propagator, obj))
    }

    pub fn statistics(&self) -> SceneStatistics {
        SceneStatistics {
            total_objects: self.objects.len(),
            visible_objects: self.visible_ids.len(),
            rendered_orbits: self.orbits.len(),
            selected_name: self.selected_object().map(|obj| obj.display_name()),
            categories: self.filter.category_counts(&self.objects),
        }
    }
}
