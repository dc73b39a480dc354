//! Declarative commands for the map host.
//!
//! The core never touches the renderer. It emits these commands and the host
//! (a MapLibre page, a test harness, ...) executes them in order. Field names
//! and values follow the MapLibre style specification so the host can pass
//! them through unchanged.

use serde::Serialize;
use serde_json::Value;

use crate::gate::Ticket;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapCommand {
    /// Load the basemap style.
    SetStyle { url: String },

    /// Register a GeoJSON source by URL.
    AddSource { id: String, data: String },

    /// Add a style layer; `spec` is a complete MapLibre layer object.
    AddLayer { spec: Value },

    /// Replace a layer filter; `None` removes it.
    SetFilter {
        layer_id: String,
        filter: Option<Value>,
    },

    /// Fit the camera to `[min_lon, min_lat, max_lon, max_lat]`.
    FitBounds { bounds: [f64; 4], padding: u32 },

    /// Animate the camera to a fixed view.
    FlyTo { center: [f64; 2], zoom: f64 },

    SetPaintProperty {
        layer_id: String,
        property: String,
        value: Value,
    },

    SetLayoutProperty {
        layer_id: String,
        property: String,
        value: Value,
    },
}

/// Commands produced by one state transition.
///
/// The host must check the ticket with `MapSync::is_current` before applying
/// and report back with `MapSync::acknowledge`, so a batch that was
/// overtaken by a newer one is never applied late.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandBatch {
    pub ticket: Ticket,
    /// Selection generation the batch was planned for, when it is a selection batch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<u64>,
    pub commands: Vec<MapCommand>,
}

impl CommandBatch {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
