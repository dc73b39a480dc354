use serde::{Deserialize, Serialize};

/// Administrative levels in strict containment order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminLevel {
    Province,
    District,
    Municipality,
    Ward,
}

impl AdminLevel {
    pub const ALL: [AdminLevel; 4] = [
        AdminLevel::Province,
        AdminLevel::District,
        AdminLevel::Municipality,
        AdminLevel::Ward,
    ];

    pub fn index(self) -> usize {
        match self {
            AdminLevel::Province => 0,
            AdminLevel::District => 1,
            AdminLevel::Municipality => 2,
            AdminLevel::Ward => 3,
        }
    }

    pub fn parent(self) -> Option<AdminLevel> {
        match self {
            AdminLevel::Province => None,
            AdminLevel::District => Some(AdminLevel::Province),
            AdminLevel::Municipality => Some(AdminLevel::District),
            AdminLevel::Ward => Some(AdminLevel::Municipality),
        }
    }

    pub fn child(self) -> Option<AdminLevel> {
        match self {
            AdminLevel::Province => Some(AdminLevel::District),
            AdminLevel::District => Some(AdminLevel::Municipality),
            AdminLevel::Municipality => Some(AdminLevel::Ward),
            AdminLevel::Ward => None,
        }
    }

    /// Levels strictly below `self`, nearest first.
    pub fn below(self) -> impl Iterator<Item = AdminLevel> {
        AdminLevel::ALL.into_iter().filter(move |l| *l > self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AdminLevel::Province => "province",
            AdminLevel::District => "district",
            AdminLevel::Municipality => "municipality",
            AdminLevel::Ward => "ward",
        }
    }
}

impl std::fmt::Display for AdminLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identifier of a unit: its level plus its position in that level's
/// unit table. Assigned once when the level is installed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitId {
    pub level: AdminLevel,
    pub index: u32,
}

impl UnitId {
    pub fn new(level: AdminLevel, index: u32) -> Self {
        Self { level, index }
    }
}

/// Resolved foreign keys to every enclosing unit.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Lineage {
    pub province: Option<UnitId>,
    pub district: Option<UnitId>,
    pub municipality: Option<UnitId>,
}

impl Lineage {
    pub fn get(&self, level: AdminLevel) -> Option<UnitId> {
        match level {
            AdminLevel::Province => self.province,
            AdminLevel::District => self.district,
            AdminLevel::Municipality => self.municipality,
            AdminLevel::Ward => None,
        }
    }
}

/// Parent references exactly as they appear in the source properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ParentRefs {
    pub province_code: Option<String>,
    pub district_name: Option<String>,
    pub municipality_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminUnit {
    pub id: UnitId,
    pub name: String,
    /// Code other levels refer to this unit by (provinces only).
    pub code: Option<String>,
    /// Indices of the source features that make up this unit.
    pub features: Vec<usize>,
    pub refs: ParentRefs,
    pub lineage: Lineage,
}

impl AdminUnit {
    pub fn level(&self) -> AdminLevel {
        self.id.level
    }
}

/// Property keys used by the source GeoJSON files.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AdminSchema {
    pub province_name: &'static str,
    pub province_code: &'static str,
    pub district_name: &'static str,
    pub district_province_code: &'static str,
    pub municipality_name: &'static str,
    pub municipality_district: &'static str,
    pub ward_name: &'static str,
    pub ward_municipality: &'static str,
    pub ward_district: &'static str,
}

impl AdminSchema {
    pub const NEPAL: AdminSchema = AdminSchema {
        province_name: "state",
        province_code: "fid",
        district_name: "DISTRICT",
        district_province_code: "SCode",
        municipality_name: "GaPa_NaPa",
        municipality_district: "DISTRICT",
        ward_name: "SURVEY_NAM",
        ward_municipality: "VDC_NAME",
        ward_district: "DISTRICT",
    };

    /// Key holding the display name at `level`; also what map filters match on.
    pub fn name_key(&self, level: AdminLevel) -> &'static str {
        match level {
            AdminLevel::Province => self.province_name,
            AdminLevel::District => self.district_name,
            AdminLevel::Municipality => self.municipality_name,
            AdminLevel::Ward => self.ward_name,
        }
    }
}

impl Default for AdminSchema {
    fn default() -> Self {
        Self::NEPAL
    }
}

#[cfg(test)]
mod tests {
    use super::AdminLevel;

    #[test]
    fn levels_are_ordered() {
        assert!(AdminLevel::Province < AdminLevel::Ward);
        let below: Vec<_> = AdminLevel::District.below().collect();
        assert_eq!(below, vec![AdminLevel::Municipality, AdminLevel::Ward]);
        assert_eq!(AdminLevel::Ward.below().count(), 0);
    }

    #[test]
    fn parent_and_child_are_inverse() {
        for level in AdminLevel::ALL {
            if let Some(child) = level.child() {
                assert_eq!(child.parent(), Some(level));
            }
        }
        assert_eq!(AdminLevel::Province.parent(), None);
    }
}
