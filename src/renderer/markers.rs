//! Marker appearance per object category

use serde::Serialize;

use crate::data::ObjectCategory;

/// Base marker size in scene units
pub const MARKER_BASE_SIZE: f32 = 0.08;
pub const MARKER_SELECTED_SIZE: f32 = 0.13;

pub const ORBIT_PATH_OPACITY: f32 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkerShape {
    Box,
    Icosahedron,
    Cylinder,
    Sphere,
}

/// Fixed visual attributes of a category
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryStyle {
    pub hex: &'static str,
    pub color: [f32; 4],
    pub shape: MarkerShape,
    pub size_factor: f32,
}

pub fn category_style(category: ObjectCategory) -> CategoryStyle {
    match category {
        ObjectCategory::Payload => CategoryStyle {
            hex: "#00ff00",
            color: [0.0, 1.0, 0.0, 1.0],
            shape: MarkerShape::Box,
            size_factor: 1.2,
        },
        ObjectCategory::Debris => CategoryStyle {
            hex: "#ff4444",
            color: [1.0, 0.267, 0.267, 1.0],
            shape: MarkerShape::Icosahedron,
            size_factor: 0.8,
        },
        ObjectCategory::RocketBody => CategoryStyle {
            hex: "#ffaa00",
            color: [1.0, 0.667, 0.0, 1.0],
            shape: MarkerShape::Cylinder,
            size_factor: 1.0,
        },
        ObjectCategory::Unknown => CategoryStyle {
            hex: "#ffffff",
            color: [1.0, 1.0, 1.0, 1.0],
            shape: MarkerShape::Sphere,
            size_factor: 1.0,
        },
    }
}

/// Resolved appearance of one marker and its orbit path
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerVisual {
    pub color: [f32; 4],
    pub shape: MarkerShape,
    pub size: f32,
    pub opacity: f32,
    pub emissive_intensity: f32,
    /// Radius of the translucent glow shell around a selected marker
    pub glow_radius: Option<f32>,
    pub show_label: bool,
    pub path_opacity: f32,
}

pub fn marker_visual(category: ObjectCategory, selected: bool, show_all_labels: bool) -> MarkerVisual {
    let style = category_style(category);
    let base = if selected {
        MARKER_SELECTED_SIZE
    } else {
        MARKER_BASE_SIZE
    };
    let size = base * style.size_factor;

    MarkerVisual {
        color: style.color,
        shape: style.shape,
        size,
        opacity: if selected { 1.0 } else { 0.8 },
        emissive_intensity: if selected { 0.2 } else { 0.0 },
        glow_radius: selected.then_some(size * 2.0),
        show_label: selected || show_all_labels,
        path_opacity: if selected { 1.0 } else { ORBIT_PATH_OPACITY },
    }
}
