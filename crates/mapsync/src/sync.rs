use std::collections::BTreeMap;

use layers::{LAYER_GROUPS, LayerVisual, Sublayer, group_for_level, layer_group};
use scene::{AdminAtlas, AdminLevel, SelectionState};
use serde_json::Value;
use tracing::debug;

use crate::command::{CommandBatch, MapCommand};
use crate::filter::unit_filter;
use crate::gate::{Channel, RequestGate, Ticket};
use crate::style::{layer_specs, sublayers, visibility_value};

pub const MAPTILER_STYLE_URL: &str = "https://api.maptiler.com/maps/streets/style.json";

#[derive(Debug, Clone, PartialEq)]
pub struct SyncConfig {
    /// Map-tile service credential; only used to build the style URL.
    pub tile_key: Option<String>,
    /// URL prefix the host serves the GeoJSON files under.
    pub data_base_url: String,
    pub default_center: [f64; 2],
    pub default_zoom: f64,
    pub fit_padding: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            tile_key: None,
            data_base_url: "/geojsons".to_string(),
            default_center: [84.124, 28.3949],
            default_zoom: 7.0,
            fit_padding: 40,
        }
    }
}

impl SyncConfig {
    pub fn style_url(&self) -> Option<String> {
        self.tile_key
            .as_deref()
            .map(|key| format!("{MAPTILER_STYLE_URL}?key={key}"))
    }

    pub fn source_url(&self, file: &str) -> String {
        format!("{}/{file}", self.data_base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Viewport {
    Default,
    Fit([f64; 4]),
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct SelectionView {
    units: SelectionState,
    viewport: Viewport,
}

impl Default for SelectionView {
    fn default() -> Self {
        Self {
            units: SelectionState::default(),
            viewport: Viewport::Default,
        }
    }
}

#[derive(Debug, Default)]
struct Tracked<T> {
    applied: T,
    pending: Option<(Ticket, T)>,
}

impl<T> Tracked<T> {
    fn acknowledge(&mut self, ticket: &Ticket) -> bool {
        match self.pending.take() {
            Some((t, planned)) if t == *ticket => {
                self.applied = planned;
                true
            }
            other => {
                self.pending = other;
                false
            }
        }
    }
}

/// Turns selection and layer state into map commands.
///
/// Each plan is diffed against what the host last acknowledged, so
/// re-planning unchanged state yields an empty batch. Planning a newer batch
/// before the previous one was acknowledged supersedes it: the old ticket is
/// no longer current and the new batch covers both changes.
#[derive(Debug)]
pub struct MapSync {
    config: SyncConfig,
    gate: RequestGate,
    selection: Tracked<SelectionView>,
    layers: Tracked<BTreeMap<String, LayerVisual>>,
}

impl MapSync {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config,
            gate: RequestGate::new(),
            selection: Tracked::default(),
            layers: Tracked::default(),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.gate.is_current(ticket)
    }

    /// Records that the host applied the batch for `ticket`.
    ///
    /// Returns `false` for a ticket that was superseded; such a batch must
    /// not be applied.
    pub fn acknowledge(&mut self, ticket: &Ticket) -> bool {
        if !self.gate.is_current(ticket) {
            debug!(?ticket, "dropping superseded batch");
            return false;
        }
        match ticket.channel {
            Channel::Style => true,
            Channel::Selection => self.selection.acknowledge(ticket),
            Channel::Layers => self.layers.acknowledge(ticket),
        }
    }

    /// Basemap, sources and layers for a freshly created map.
    ///
    /// The map starts unfiltered at the default viewport with `layers`
    /// applied, and that becomes the baseline for later diffs.
    pub fn initial_style(&mut self, atlas: &AdminAtlas, layers: &[LayerVisual]) -> CommandBatch {
        let mut commands = Vec::new();
        if let Some(url) = self.config.style_url() {
            commands.push(MapCommand::SetStyle { url });
        }
        commands.push(self.default_viewport());

        let mut applied = BTreeMap::new();
        for group in LAYER_GROUPS.iter() {
            commands.push(MapCommand::AddSource {
                id: group.id.to_string(),
                data: self.config.source_url(group.source_file),
            });
            let visual = layers
                .iter()
                .find(|l| l.id == group.id)
                .cloned()
                .unwrap_or_else(|| LayerVisual::new(group.id, group.label, group.default_opacity));
            for spec in layer_specs(group, atlas.schema(), &visual) {
                commands.push(MapCommand::AddLayer { spec });
            }
            applied.insert(visual.id.clone(), visual);
        }

        self.selection = Tracked::default();
        self.layers = Tracked {
            applied,
            pending: None,
        };

        CommandBatch {
            ticket: self.gate.issue(Channel::Style),
            generation: None,
            commands,
        }
    }

    /// Filters and viewport for `state`.
    ///
    /// Each level's group is filtered to its selected unit or unfiltered when
    /// the level is empty. The camera fits the deepest selected unit, or
    /// returns to the default view when nothing is selected. A unit without
    /// geometry leaves the camera where it is.
    pub fn plan_selection(
        &mut self,
        atlas: &AdminAtlas,
        state: &SelectionState,
        generation: u64,
    ) -> CommandBatch {
        let base = self.selection.applied;
        let mut commands = Vec::new();

        for level in AdminLevel::ALL {
            let unit = state.get(level);
            if unit == base.units.get(level) {
                continue;
            }
            let filter = unit.and_then(|id| unit_filter(atlas, id));
            push_filter(&mut commands, level, filter);
        }

        let viewport = match state.deepest() {
            None => Viewport::Default,
            Some(id) => {
                let bounds = atlas.unit_bounds(id);
                if bounds.is_empty() {
                    debug!(?id, "selected unit has no geometry; keeping viewport");
                    base.viewport
                } else {
                    Viewport::Fit(bounds.to_array())
                }
            }
        };
        if viewport != base.viewport {
            commands.push(match viewport {
                Viewport::Default => self.default_viewport(),
                Viewport::Fit(bounds) => MapCommand::FitBounds {
                    bounds,
                    padding: self.config.fit_padding,
                },
            });
        }

        let ticket = self.gate.issue(Channel::Selection);
        self.selection.pending = Some((
            ticket,
            SelectionView {
                units: *state,
                viewport,
            },
        ));
        CommandBatch {
            ticket,
            generation: Some(generation),
            commands,
        }
    }

    /// Paint and layout updates mirroring `layers`. Entries without a known
    /// layer group are skipped.
    pub fn plan_layers(&mut self, layers: &[LayerVisual]) -> CommandBatch {
        let mut commands = Vec::new();
        let mut planned = self.layers.applied.clone();

        for visual in layers {
            let Some(group) = layer_group(&visual.id) else {
                continue;
            };
            let base = self.layers.applied.get(&visual.id);

            if base.map(|b| b.opacity) != Some(visual.opacity) {
                commands.push(MapCommand::SetPaintProperty {
                    layer_id: Sublayer::Fill.layer_id(group.id),
                    property: "fill-opacity".to_string(),
                    value: Value::from(visual.opacity),
                });
            }
            if base.map(|b| b.visible) != Some(visual.visible) {
                for sub in sublayers(group) {
                    commands.push(MapCommand::SetLayoutProperty {
                        layer_id: sub.layer_id(group.id),
                        property: "visibility".to_string(),
                        value: visibility_value(visual.visible),
                    });
                }
            }
            planned.insert(visual.id.clone(), visual.clone());
        }

        let ticket = self.gate.issue(Channel::Layers);
        self.layers.pending = Some((ticket, planned));
        CommandBatch {
            ticket,
            generation: None,
            commands,
        }
    }

    fn default_viewport(&self) -> MapCommand {
        MapCommand::FlyTo {
            center: self.config.default_center,
            zoom: self.config.default_zoom,
        }
    }
}

fn push_filter(commands: &mut Vec<MapCommand>, level: AdminLevel, filter: Option<Value>) {
    let group = group_for_level(level);
    for sub in Sublayer::ALL {
        commands.push(MapCommand::SetFilter {
            layer_id: sub.layer_id(group.id),
            filter: filter.clone(),
        });
    }
}
