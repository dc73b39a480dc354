use std::sync::Arc;

use scene::AdminLevel;
use serde::{Deserialize, Serialize};

use crate::symbology::{LabelStyle, LayerSymbology};

pub const BOUNDARY: &str = "boundary";
pub const PROVINCES: &str = "states";
pub const DISTRICTS: &str = "districts";
pub const MUNICIPALITIES: &str = "municipalities";
pub const WARDS: &str = "wards";

/// A renderable group: one GeoJSON source drawn as fill, outline and label
/// layers named `<id>-fill`, `<id>-line` and `<id>-label`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayerGroup {
    pub id: &'static str,
    pub label: &'static str,
    pub level: Option<AdminLevel>,
    pub source_file: &'static str,
    pub default_opacity: f64,
    pub symbology: LayerSymbology,
}

pub static LAYER_GROUPS: [LayerGroup; 5] = [
    LayerGroup {
        id: BOUNDARY,
        label: "Country Boundary",
        level: None,
        source_file: "nepal-boundary.geojson",
        default_opacity: 0.8,
        symbology: LayerSymbology::new("#4da3ff", "#003366", 4.0),
    },
    LayerGroup {
        id: PROVINCES,
        label: "Province",
        level: Some(AdminLevel::Province),
        source_file: "provinces.geojson",
        default_opacity: 0.5,
        symbology: LayerSymbology::new("#ffa64d", "#003366", 3.0)
            .with_label(LabelStyle::new(20.0, "#ffffff")),
    },
    LayerGroup {
        id: DISTRICTS,
        label: "Districts",
        level: Some(AdminLevel::District),
        source_file: "districts.geojson",
        default_opacity: 0.2,
        symbology: LayerSymbology::new("#FF7F7F", "#003366", 2.0)
            .with_label(LabelStyle::new(12.0, "#000000").with_halo("#FFFFFF", 1.0)),
    },
    LayerGroup {
        id: MUNICIPALITIES,
        label: "Municipalities",
        level: Some(AdminLevel::Municipality),
        source_file: "municipal.geojson",
        default_opacity: 0.2,
        symbology: LayerSymbology::new("#7FFF7F", "#003366", 1.0)
            .with_label(LabelStyle::new(8.0, "#000000")),
    },
    LayerGroup {
        id: WARDS,
        label: "Wards",
        level: Some(AdminLevel::Ward),
        source_file: "nepal-wards.geojson",
        default_opacity: 0.2,
        symbology: LayerSymbology::new("#7FFF7F", "#003366", 0.5)
            .with_label(LabelStyle::new(8.0, "#000000")),
    },
];

pub fn layer_group(id: &str) -> Option<&'static LayerGroup> {
    LAYER_GROUPS.iter().find(|g| g.id == id)
}

pub fn group_for_level(level: AdminLevel) -> &'static LayerGroup {
    match level {
        AdminLevel::Province => &LAYER_GROUPS[1],
        AdminLevel::District => &LAYER_GROUPS[2],
        AdminLevel::Municipality => &LAYER_GROUPS[3],
        AdminLevel::Ward => &LAYER_GROUPS[4],
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Sublayer {
    Fill,
    Line,
    Label,
}

impl Sublayer {
    pub const ALL: [Sublayer; 3] = [Sublayer::Fill, Sublayer::Line, Sublayer::Label];

    pub fn layer_id(self, group_id: &str) -> String {
        let suffix = match self {
            Sublayer::Fill => "fill",
            Sublayer::Line => "line",
            Sublayer::Label => "label",
        };
        format!("{group_id}-{suffix}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerVisual {
    pub id: String,
    pub label: String,
    pub opacity: f64,
    pub visible: bool,
}

impl LayerVisual {
    pub fn new(id: impl Into<String>, label: impl Into<String>, opacity: f64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            opacity: opacity.clamp(0.0, 1.0),
            visible: true,
        }
    }
}

/// Per-layer opacity and visibility.
///
/// Every mutation swaps in a fresh snapshot, so a snapshot handed out earlier
/// never changes underneath its holder. Unknown ids are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerPanel {
    layers: Arc<[LayerVisual]>,
}

impl LayerPanel {
    pub fn new(layers: Vec<LayerVisual>) -> Self {
        Self {
            layers: layers.into(),
        }
    }

    pub fn snapshot(&self) -> Arc<[LayerVisual]> {
        Arc::clone(&self.layers)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayerVisual> {
        self.layers.iter()
    }

    pub fn get(&self, id: &str) -> Option<&LayerVisual> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Sets the opacity of `id`, clamped to `[0, 1]`.
    ///
    /// Returns `true` if the panel changed. NaN is rejected.
    pub fn set_opacity(&mut self, id: &str, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        let opacity = value.clamp(0.0, 1.0);
        self.replace(id, |l| LayerVisual {
            opacity,
            ..l.clone()
        })
    }

    /// Returns `true` if a layer with `id` exists (and was flipped).
    pub fn toggle_visibility(&mut self, id: &str) -> bool {
        self.replace(id, |l| LayerVisual {
            visible: !l.visible,
            ..l.clone()
        })
    }

    fn replace(&mut self, id: &str, update: impl Fn(&LayerVisual) -> LayerVisual) -> bool {
        let mut changed = false;
        let next: Vec<LayerVisual> = self
            .layers
            .iter()
            .map(|l| {
                if l.id != id {
                    return l.clone();
                }
                let updated = update(l);
                changed |= updated != *l;
                updated
            })
            .collect();
        if changed {
            self.layers = next.into();
        }
        changed
    }
}

impl Default for LayerPanel {
    fn default() -> Self {
        Self::new(
            LAYER_GROUPS
                .iter()
                .map(|g| LayerVisual::new(g.id, g.label, g.default_opacity))
                .collect(),
        )
    }
}
