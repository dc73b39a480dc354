use layers::{LayerPanel, LayerVisual};
use mapsync::{CommandBatch, MapSync, SyncConfig};
use scene::{AdminAtlas, AdminLevel, Selection, SelectionEvent, SelectionState};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One dropdown: its options, the current choice and whether it can be used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelView {
    pub level: AdminLevel,
    pub candidates: Vec<String>,
    pub selected: Option<String>,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    pub levels: Vec<LevelView>,
    pub layers: Vec<LayerVisual>,
}

impl PanelView {
    pub fn level(&self, level: AdminLevel) -> &LevelView {
        &self.levels[level.index()]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Select(SelectionEvent),
    SetOpacity { layer: String, opacity: f64 },
    ToggleVisibility { layer: String },
    Panel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionOutput {
    Commands(CommandBatch),
    Panel(PanelView),
    Error { message: String },
}

/// Owns the map state and turns user actions into command batches.
///
/// Batches are acknowledged as they are handed out: the host applies them in
/// the order it receives them, so the last one handed out always wins.
#[derive(Debug)]
pub struct MapSession {
    atlas: AdminAtlas,
    selection: Selection,
    panel: LayerPanel,
    sync: MapSync,
}

impl MapSession {
    pub fn new(atlas: AdminAtlas, config: SyncConfig) -> Self {
        Self {
            atlas,
            selection: Selection::new(),
            panel: LayerPanel::default(),
            sync: MapSync::new(config),
        }
    }

    pub fn atlas(&self) -> &AdminAtlas {
        &self.atlas
    }

    pub fn selection(&self) -> SelectionState {
        self.selection.state()
    }

    pub fn layers(&self) -> &LayerPanel {
        &self.panel
    }

    pub fn initial_style(&mut self) -> CommandBatch {
        let layers = self.panel.snapshot();
        let batch = self.sync.initial_style(&self.atlas, &layers);
        self.commit(batch)
    }

    pub fn select(&mut self, level: AdminLevel, name: Option<&str>) -> CommandBatch {
        self.selection.select(&self.atlas, level, name);
        self.sync_selection()
    }

    pub fn select_province(&mut self, name: Option<&str>) -> CommandBatch {
        self.select(AdminLevel::Province, name)
    }

    pub fn select_district(&mut self, name: Option<&str>) -> CommandBatch {
        self.select(AdminLevel::District, name)
    }

    pub fn select_municipality(&mut self, name: Option<&str>) -> CommandBatch {
        self.select(AdminLevel::Municipality, name)
    }

    pub fn select_ward(&mut self, name: Option<&str>) -> CommandBatch {
        self.select(AdminLevel::Ward, name)
    }

    pub fn set_opacity(&mut self, layer: &str, opacity: f64) -> CommandBatch {
        self.panel.set_opacity(layer, opacity);
        self.sync_layers()
    }

    pub fn toggle_visibility(&mut self, layer: &str) -> CommandBatch {
        self.panel.toggle_visibility(layer);
        self.sync_layers()
    }

    pub fn panel(&self) -> PanelView {
        let state = self.selection.state();
        let levels = AdminLevel::ALL
            .into_iter()
            .map(|level| LevelView {
                level,
                candidates: state.candidates(&self.atlas, level),
                selected: self
                    .selection
                    .selected_name(&self.atlas, level)
                    .map(str::to_string),
                enabled: match level.parent() {
                    None => true,
                    Some(parent) => state.get(parent).is_some(),
                },
            })
            .collect();
        PanelView {
            levels,
            layers: self.panel.iter().cloned().collect(),
        }
    }

    pub fn handle(&mut self, event: SessionEvent) -> SessionOutput {
        match event {
            SessionEvent::Select(event) => {
                self.selection.apply(&self.atlas, &event);
                SessionOutput::Commands(self.sync_selection())
            }
            SessionEvent::SetOpacity { layer, opacity } => {
                SessionOutput::Commands(self.set_opacity(&layer, opacity))
            }
            SessionEvent::ToggleVisibility { layer } => {
                SessionOutput::Commands(self.toggle_visibility(&layer))
            }
            SessionEvent::Panel => SessionOutput::Panel(self.panel()),
        }
    }

    fn sync_selection(&mut self) -> CommandBatch {
        let batch = self.sync.plan_selection(
            &self.atlas,
            &self.selection.state(),
            self.selection.generation(),
        );
        self.commit(batch)
    }

    fn sync_layers(&mut self) -> CommandBatch {
        let layers = self.panel.snapshot();
        let batch = self.sync.plan_layers(&layers);
        self.commit(batch)
    }

    fn commit(&mut self, batch: CommandBatch) -> CommandBatch {
        if !self.sync.acknowledge(&batch.ticket) {
            debug!(ticket = ?batch.ticket, "batch superseded before hand-off");
        }
        batch
    }
}
