use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::admin::{AdminLevel, UnitId};
use crate::atlas::{AdminAtlas, CandidateScope};

/// One optional selected unit per administrative level.
///
/// Cascade contract:
/// - If a level is `None`, every level below it is `None`.
/// - Setting a level clears every level below it.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct SelectionState {
    pub province: Option<UnitId>,
    pub district: Option<UnitId>,
    pub municipality: Option<UnitId>,
    pub ward: Option<UnitId>,
}

impl SelectionState {
    pub fn get(&self, level: AdminLevel) -> Option<UnitId> {
        match level {
            AdminLevel::Province => self.province,
            AdminLevel::District => self.district,
            AdminLevel::Municipality => self.municipality,
            AdminLevel::Ward => self.ward,
        }
    }

    fn slot(&mut self, level: AdminLevel) -> &mut Option<UnitId> {
        match level {
            AdminLevel::Province => &mut self.province,
            AdminLevel::District => &mut self.district,
            AdminLevel::Municipality => &mut self.municipality,
            AdminLevel::Ward => &mut self.ward,
        }
    }

    /// Returns the state with `level` set to `unit` and every lower level cleared.
    pub fn with(mut self, level: AdminLevel, unit: Option<UnitId>) -> Self {
        *self.slot(level) = unit;
        for below in level.below() {
            *self.slot(below) = None;
        }
        self
    }

    /// The most specific selected unit, if any.
    pub fn deepest(&self) -> Option<UnitId> {
        self.ward
            .or(self.municipality)
            .or(self.district)
            .or(self.province)
    }

    pub fn is_consistent(&self) -> bool {
        AdminLevel::ALL.windows(2).all(|pair| {
            let (upper, lower) = (pair[0], pair[1]);
            self.get(upper).is_some() || self.get(lower).is_none()
        })
    }

    /// Where candidates for `level` come from. Wards narrow to the selected
    /// municipality when there is one, otherwise to the selected district.
    pub fn scope(&self, level: AdminLevel) -> CandidateScope {
        let parent = match level {
            AdminLevel::Province => return CandidateScope::All,
            AdminLevel::District => self.province,
            AdminLevel::Municipality => self.district,
            AdminLevel::Ward => self.municipality.or(self.district),
        };
        parent.map_or(CandidateScope::Unavailable, CandidateScope::Under)
    }

    pub fn candidates(&self, atlas: &AdminAtlas, level: AdminLevel) -> Vec<String> {
        atlas.candidate_names(level, self.scope(level))
    }

    pub fn province_candidates(&self, atlas: &AdminAtlas) -> Vec<String> {
        self.candidates(atlas, AdminLevel::Province)
    }

    pub fn district_candidates(&self, atlas: &AdminAtlas) -> Vec<String> {
        self.candidates(atlas, AdminLevel::District)
    }

    pub fn municipality_candidates(&self, atlas: &AdminAtlas) -> Vec<String> {
        self.candidates(atlas, AdminLevel::Municipality)
    }

    pub fn ward_candidates(&self, atlas: &AdminAtlas) -> Vec<String> {
        self.candidates(atlas, AdminLevel::Ward)
    }
}

/// A dropdown change at one level; `None` means "show all".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionEvent {
    pub level: AdminLevel,
    #[serde(default)]
    pub name: Option<String>,
}

impl SelectionEvent {
    pub fn new(level: AdminLevel, name: Option<impl Into<String>>) -> Self {
        Self {
            level,
            name: name.map(Into::into),
        }
    }
}

/// Cascading selection over an [`AdminAtlas`].
///
/// Names are resolved against the current candidates of their level. A name
/// that is not a candidate (including any name while the enclosing level is
/// unset) clears that level and everything below it. Every effective change
/// bumps `generation`, which downstream consumers use to drop stale work.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    state: SelectionState,
    generation: u64,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Selects `name` at `level`.
    ///
    /// Returns `true` if the state changed.
    pub fn select(&mut self, atlas: &AdminAtlas, level: AdminLevel, name: Option<&str>) -> bool {
        // A level can only hold a unit while the level above it is set, even
        // where its candidate list is wider (wards listed by district).
        let parent_unset = level.parent().is_some_and(|p| self.state.get(p).is_none());
        let unit = name.filter(|_| !parent_unset).and_then(|n| {
            let found = atlas.find(level, self.state.scope(level), n).map(|u| u.id);
            if found.is_none() {
                trace!(%level, name = n, "no matching unit; clearing");
            }
            found
        });

        let next = self.state.with(level, unit);
        if next == self.state {
            return false;
        }
        trace!(%level, ?unit, generation = self.generation + 1, "selection changed");
        self.state = next;
        self.generation += 1;
        true
    }

    pub fn select_province(&mut self, atlas: &AdminAtlas, name: Option<&str>) -> bool {
        self.select(atlas, AdminLevel::Province, name)
    }

    pub fn select_district(&mut self, atlas: &AdminAtlas, name: Option<&str>) -> bool {
        self.select(atlas, AdminLevel::District, name)
    }

    pub fn select_municipality(&mut self, atlas: &AdminAtlas, name: Option<&str>) -> bool {
        self.select(atlas, AdminLevel::Municipality, name)
    }

    pub fn select_ward(&mut self, atlas: &AdminAtlas, name: Option<&str>) -> bool {
        self.select(atlas, AdminLevel::Ward, name)
    }

    pub fn apply(&mut self, atlas: &AdminAtlas, event: &SelectionEvent) -> bool {
        self.select(atlas, event.level, event.name.as_deref())
    }

    /// Display name of the selection at `level`.
    pub fn selected_name<'a>(&self, atlas: &'a AdminAtlas, level: AdminLevel) -> Option<&'a str> {
        self.state.get(level).and_then(|id| atlas.name_of(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{atlas, collection};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn select_all_levels(sel: &mut Selection, atlas: &AdminAtlas) {
        assert!(sel.select_province(atlas, Some("Gandaki")));
        assert!(sel.select_district(atlas, Some("KASKI")));
        assert!(sel.select_municipality(atlas, Some("Pokhara")));
        assert!(sel.select_ward(atlas, Some("Pokhara-2")));
    }

    #[test]
    fn starts_empty_with_only_provinces_available() {
        let atlas = atlas();
        let sel = Selection::new();
        assert_eq!(sel.state(), SelectionState::default());
        assert_eq!(
            sel.state().province_candidates(&atlas),
            names(&["Gandaki", "Koshi"])
        );
        assert!(sel.state().district_candidates(&atlas).is_empty());
        assert!(sel.state().municipality_candidates(&atlas).is_empty());
        assert!(sel.state().ward_candidates(&atlas).is_empty());
    }

    #[test]
    fn selecting_a_level_clears_everything_below() {
        let atlas = atlas();
        let mut sel = Selection::new();
        select_all_levels(&mut sel, &atlas);
        assert!(sel.state().ward.is_some());

        for level in AdminLevel::ALL {
            let mut s = sel.clone();
            let name = sel.selected_name(&atlas, level).map(str::to_string);
            s.select(&atlas, level, name.as_deref());
            assert_eq!(s.state().get(level), sel.state().get(level));
            for below in level.below() {
                assert_eq!(s.state().get(below), None, "{below} after re-selecting {level}");
            }
            assert!(s.state().is_consistent());
        }
    }

    #[test]
    fn clearing_province_resets_the_cascade() {
        let atlas = atlas();
        let mut sel = Selection::new();
        select_all_levels(&mut sel, &atlas);

        assert!(sel.select_province(&atlas, None));
        assert_eq!(sel.state(), SelectionState::default());
        assert!(sel.state().district_candidates(&atlas).is_empty());
    }

    #[test]
    fn district_candidates_follow_the_province_code() {
        let mut atlas = AdminAtlas::new();
        atlas.install(
            AdminLevel::Province,
            collection(vec![
                json!({ "state": "Province A", "fid": 1 }),
                json!({ "state": "Province B", "fid": 2 }),
            ]),
        );
        atlas.install(
            AdminLevel::District,
            collection(vec![
                json!({ "DISTRICT": "D1", "SCode": 1 }),
                json!({ "DISTRICT": "D2", "SCode": 2 }),
            ]),
        );

        let mut sel = Selection::new();
        sel.select_province(&atlas, Some("Province A"));
        assert_eq!(sel.state().district_candidates(&atlas), names(&["D1"]));

        sel.select_province(&atlas, None);
        assert_eq!(sel.state(), SelectionState::default());
        assert!(sel.state().district_candidates(&atlas).is_empty());
    }

    #[test]
    fn unknown_names_clear_instead_of_failing() {
        let atlas = atlas();
        let mut sel = Selection::new();
        sel.select_province(&atlas, Some("Gandaki"));

        // JHAPA exists, but not under Gandaki.
        sel.select_district(&atlas, Some("JHAPA"));
        assert_eq!(sel.state().district, None);

        sel.select_district(&atlas, Some("Atlantis"));
        assert_eq!(sel.state().district, None);
        assert!(sel.state().province.is_some());
    }

    #[test]
    fn child_setters_without_parent_leave_level_unset() {
        let atlas = atlas();
        let mut sel = Selection::new();
        assert!(!sel.select_district(&atlas, Some("KASKI")));
        assert!(!sel.select_municipality(&atlas, Some("Pokhara")));
        assert!(!sel.select_ward(&atlas, Some("Pokhara-1")));
        assert_eq!(sel.state(), SelectionState::default());
        assert_eq!(sel.generation(), 0);
    }

    #[test]
    fn ward_needs_a_municipality_even_when_listed_by_district() {
        let atlas = atlas();
        let mut sel = Selection::new();
        sel.select_province(&atlas, Some("Gandaki"));
        sel.select_district(&atlas, Some("KASKI"));
        assert!(sel.state().ward_candidates(&atlas).contains(&"Pokhara-1".to_string()));

        let generation = sel.generation();
        assert!(!sel.select_ward(&atlas, Some("Pokhara-1")));
        assert_eq!(sel.state().ward, None);
        assert_eq!(sel.generation(), generation);
        assert!(sel.state().is_consistent());
    }

    #[test]
    fn every_setter_order_keeps_the_cascade() {
        let atlas = atlas();
        let actions: [(AdminLevel, Option<&str>); 7] = [
            (AdminLevel::Province, Some("Gandaki")),
            (AdminLevel::District, Some("KASKI")),
            (AdminLevel::Municipality, Some("Pokhara")),
            (AdminLevel::Ward, Some("Pokhara-1")),
            (AdminLevel::Province, None),
            (AdminLevel::District, None),
            (AdminLevel::Municipality, None),
        ];

        for a in actions {
            for b in actions {
                for c in actions {
                    for d in actions {
                        let mut sel = Selection::new();
                        for (level, name) in [a, b, c, d] {
                            sel.select(&atlas, level, name);
                            assert!(
                                sel.state().is_consistent(),
                                "{:?} after {level} {name:?}",
                                sel.state()
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn repeating_a_selection_changes_nothing() {
        let atlas = atlas();
        let mut sel = Selection::new();
        assert!(sel.select_province(&atlas, Some("Koshi")));
        let (state, generation) = (sel.state(), sel.generation());

        assert!(!sel.select_province(&atlas, Some("Koshi")));
        assert!(!sel.select_province(&atlas, Some(" koshi ")));
        assert_eq!(sel.state(), state);
        assert_eq!(sel.generation(), generation);
    }

    #[test]
    fn wards_narrow_from_district_to_municipality() {
        let atlas = atlas();
        let mut sel = Selection::new();
        sel.select_province(&atlas, Some("Gandaki"));
        sel.select_district(&atlas, Some("Kaski"));
        assert_eq!(
            sel.state().ward_candidates(&atlas),
            names(&["Lwang-1", "Pokhara-1", "Pokhara-2"])
        );

        sel.select_municipality(&atlas, Some("Machhapuchchhre"));
        assert_eq!(sel.state().ward_candidates(&atlas), names(&["Lwang-1"]));
    }

    #[test]
    fn name_policy_applies_at_every_level() {
        let atlas = atlas();
        let mut sel = Selection::new();
        sel.select_province(&atlas, Some("GANDAKI"));
        sel.select_district(&atlas, Some("kaski"));
        sel.select_municipality(&atlas, Some("pokhara "));
        sel.select_ward(&atlas, Some("POKHARA-1"));
        assert_eq!(sel.selected_name(&atlas, AdminLevel::Province), Some("Gandaki"));
        assert_eq!(sel.selected_name(&atlas, AdminLevel::District), Some("KASKI"));
        assert_eq!(sel.selected_name(&atlas, AdminLevel::Municipality), Some("Pokhara"));
        assert_eq!(sel.selected_name(&atlas, AdminLevel::Ward), Some("Pokhara-1"));
    }

    #[test]
    fn events_mirror_setters() {
        let atlas = atlas();
        let mut by_event = Selection::new();
        by_event.apply(&atlas, &SelectionEvent::new(AdminLevel::Province, Some("Koshi")));
        by_event.apply(&atlas, &SelectionEvent::new(AdminLevel::District, Some("JHAPA")));

        let mut by_setter = Selection::new();
        by_setter.select_province(&atlas, Some("Koshi"));
        by_setter.select_district(&atlas, Some("JHAPA"));

        assert_eq!(by_event.state(), by_setter.state());
        assert_eq!(by_event.state().deepest(), by_setter.state().district);
    }

    #[test]
    fn selection_events_deserialize_from_json() {
        let event: SelectionEvent =
            serde_json::from_value(json!({ "level": "municipality", "name": "Pokhara" })).unwrap();
        assert_eq!(event, SelectionEvent::new(AdminLevel::Municipality, Some("Pokhara")));

        let clear: SelectionEvent = serde_json::from_value(json!({ "level": "ward" })).unwrap();
        assert_eq!(clear.name, None);
    }
}
