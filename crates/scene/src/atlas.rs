use std::collections::{BTreeSet, HashMap};

use formats::{FeatureCollection, compute_bounds_of};
use foundation::bounds::Aabb2;
use foundation::names::{name_key, names_match};
use tracing::{debug, warn};

use crate::admin::{AdminLevel, AdminSchema, AdminUnit, Lineage, ParentRefs, UnitId};

/// Which units at a level are currently selectable.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CandidateScope {
    All,
    Under(UnitId),
    /// The enclosing level has no selection.
    Unavailable,
}

/// The four administrative feature collections plus the units resolved from
/// them.
///
/// Each level is installed at most once. A level that has not been installed
/// (still loading, or failed) reads as empty. Parent links are resolved into
/// [`Lineage`] ids on every install, so levels may arrive in any order.
#[derive(Debug, Default)]
pub struct AdminAtlas {
    schema: AdminSchema,
    collections: [Option<FeatureCollection>; 4],
    units: [Vec<AdminUnit>; 4],
}

impl AdminAtlas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schema(&self) -> &AdminSchema {
        &self.schema
    }

    pub fn is_loaded(&self, level: AdminLevel) -> bool {
        self.collections[level.index()].is_some()
    }

    pub fn collection(&self, level: AdminLevel) -> Option<&FeatureCollection> {
        self.collections[level.index()].as_ref()
    }

    /// Installs the collection for `level` and re-resolves every lineage.
    ///
    /// Returns `false` (and keeps the existing data) if the level was already
    /// installed.
    pub fn install(&mut self, level: AdminLevel, collection: FeatureCollection) -> bool {
        if self.is_loaded(level) {
            warn!(%level, "level already installed; ignoring reload");
            return false;
        }

        let (units, skipped) = build_units(&self.schema, level, &collection);
        debug!(
            %level,
            features = collection.len(),
            units = units.len(),
            skipped,
            "installed administrative level"
        );
        self.units[level.index()] = units;
        self.collections[level.index()] = Some(collection);
        self.relink();
        true
    }

    pub fn units(&self, level: AdminLevel) -> &[AdminUnit] {
        &self.units[level.index()]
    }

    pub fn unit(&self, id: UnitId) -> Option<&AdminUnit> {
        self.units[id.level.index()].get(id.index as usize)
    }

    pub fn name_of(&self, id: UnitId) -> Option<&str> {
        self.unit(id).map(|u| u.name.as_str())
    }

    pub fn candidates(
        &self,
        level: AdminLevel,
        scope: CandidateScope,
    ) -> impl Iterator<Item = &AdminUnit> + '_ {
        self.units(level).iter().filter(move |u| match scope {
            CandidateScope::All => true,
            CandidateScope::Under(parent) => u.lineage.get(parent.level) == Some(parent),
            CandidateScope::Unavailable => false,
        })
    }

    /// Sorted, de-duplicated display names of the candidates.
    pub fn candidate_names(&self, level: AdminLevel, scope: CandidateScope) -> Vec<String> {
        let names: BTreeSet<&str> = self
            .candidates(level, scope)
            .map(|u| u.name.as_str())
            .collect();
        names.into_iter().map(str::to_string).collect()
    }

    /// First candidate whose name matches under the shared name policy.
    pub fn find(&self, level: AdminLevel, scope: CandidateScope, name: &str) -> Option<&AdminUnit> {
        self.candidates(level, scope)
            .find(|u| names_match(&u.name, name))
    }

    /// Envelope of the unit's features; empty if the unit is unknown.
    pub fn unit_bounds(&self, id: UnitId) -> Aabb2 {
        let (Some(unit), Some(collection)) = (self.unit(id), self.collection(id.level)) else {
            return Aabb2::EMPTY;
        };
        compute_bounds_of(collection, &unit.features)
    }

    fn relink(&mut self) {
        let [provinces, districts, municipalities, wards] = &mut self.units;

        let mut province_by_code: HashMap<String, UnitId> = HashMap::new();
        for p in provinces.iter() {
            if let Some(code) = &p.code {
                province_by_code.entry(code_key(code)).or_insert(p.id);
            }
        }

        for d in districts.iter_mut() {
            let province = d
                .refs
                .province_code
                .as_deref()
                .and_then(|c| province_by_code.get(&code_key(c)).copied());
            d.lineage = Lineage {
                province,
                ..Lineage::default()
            };
        }

        let mut district_by_name: HashMap<String, (UnitId, Lineage)> = HashMap::new();
        for d in districts.iter() {
            district_by_name
                .entry(name_key(&d.name).into_owned())
                .or_insert((d.id, d.lineage));
        }
        let lookup_district = |name: Option<&str>| -> Option<(UnitId, Lineage)> {
            district_by_name.get(&*name_key(name?)).copied()
        };

        for m in municipalities.iter_mut() {
            let district = lookup_district(m.refs.district_name.as_deref());
            m.lineage = Lineage {
                province: district.and_then(|(_, l)| l.province),
                district: district.map(|(id, _)| id),
                municipality: None,
            };
        }

        // Municipality names repeat across districts, so wards resolve them
        // within their own district when it is known.
        let mut municipality_by_name: HashMap<(Option<UnitId>, String), (UnitId, Lineage)> =
            HashMap::new();
        for m in municipalities.iter() {
            let key = name_key(&m.name).into_owned();
            municipality_by_name
                .entry((m.lineage.district, key.clone()))
                .or_insert((m.id, m.lineage));
            municipality_by_name
                .entry((None, key))
                .or_insert((m.id, m.lineage));
        }

        for w in wards.iter_mut() {
            let district = lookup_district(w.refs.district_name.as_deref());
            let municipality = w.refs.municipality_name.as_deref().and_then(|n| {
                let key = (district.map(|(id, _)| id), name_key(n).into_owned());
                municipality_by_name.get(&key).copied()
            });
            let district_id = district
                .map(|(id, _)| id)
                .or_else(|| municipality.and_then(|(_, l)| l.district));
            let province = district
                .and_then(|(_, l)| l.province)
                .or_else(|| municipality.and_then(|(_, l)| l.province));
            w.lineage = Lineage {
                province,
                district: district_id,
                municipality: municipality.map(|(id, _)| id),
            };
        }

        let orphans = districts
            .iter()
            .filter(|u| u.lineage.province.is_none())
            .chain(municipalities.iter().filter(|u| u.lineage.district.is_none()))
            .chain(wards.iter().filter(|u| u.lineage.district.is_none()))
            .count();
        if orphans > 0 {
            debug!(orphans, "units without a resolved parent");
        }
    }
}

fn build_units(
    schema: &AdminSchema,
    level: AdminLevel,
    collection: &FeatureCollection,
) -> (Vec<AdminUnit>, usize) {
    let mut units: Vec<AdminUnit> = Vec::new();
    let mut by_key: HashMap<(String, ParentRefs), usize> = HashMap::new();
    let mut skipped = 0usize;

    for (feature_index, feature) in collection.features.iter().enumerate() {
        let Some(name) = feature.property_text(schema.name_key(level)) else {
            skipped += 1;
            continue;
        };

        let text = |key: &str| feature.property_text(key).map(|v| v.into_owned());
        let refs = match level {
            AdminLevel::Province => ParentRefs::default(),
            AdminLevel::District => ParentRefs {
                province_code: text(schema.district_province_code),
                ..ParentRefs::default()
            },
            AdminLevel::Municipality => ParentRefs {
                district_name: text(schema.municipality_district),
                ..ParentRefs::default()
            },
            AdminLevel::Ward => ParentRefs {
                district_name: text(schema.ward_district),
                municipality_name: text(schema.ward_municipality),
                ..ParentRefs::default()
            },
        };

        // Several features with the same name under the same parent are one unit.
        let key = (name_key(&name).into_owned(), normalized_refs(&refs));
        if let Some(&existing) = by_key.get(&key) {
            units[existing].features.push(feature_index);
            continue;
        }

        let Some(id) = unit_id(level, units.len()) else {
            warn!(%level, feature_index, "unit index space exhausted; skipping feature");
            skipped += 1;
            continue;
        };
        let code = match level {
            AdminLevel::Province => text(schema.province_code),
            _ => None,
        };
        by_key.insert(key, units.len());
        units.push(AdminUnit {
            id,
            name: name.into_owned(),
            code,
            features: vec![feature_index],
            refs,
            lineage: Lineage::default(),
        });
    }

    (units, skipped)
}

fn unit_id(level: AdminLevel, position: usize) -> Option<UnitId> {
    u32::try_from(position).ok().map(|index| UnitId::new(level, index))
}

/// Province codes appear as `4`, `"4"` or `4.0` depending on the file;
/// integral numbers key without a fraction.
fn code_key(code: &str) -> String {
    let code = code.trim();
    match code.parse::<f64>() {
        Ok(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", n as i64),
        _ => code.to_string(),
    }
}

fn normalized_refs(refs: &ParentRefs) -> ParentRefs {
    let norm = |v: &Option<String>| v.as_deref().map(|s| name_key(s).into_owned());
    ParentRefs {
        province_code: refs.province_code.as_deref().map(code_key),
        district_name: norm(&refs.district_name),
        municipality_name: norm(&refs.municipality_name),
    }
}
