use std::collections::BTreeSet;

use scene::{AdminAtlas, UnitId};
use serde_json::{Value, json};

/// `["==", ["get", key], name]` for one spelling, `["in", ...]` for several.
pub fn name_filter<S: AsRef<str>>(key: &str, spellings: &[S]) -> Option<Value> {
    match spellings {
        [] => None,
        [one] => {
            let name: &str = one.as_ref();
            Some(json!(["==", ["get", key], name]))
        }
        many => {
            let names: Vec<&str> = many.iter().map(|s| s.as_ref()).collect();
            Some(json!(["in", ["get", key], ["literal", names]]))
        }
    }
}

/// Filter that shows exactly the features of `unit`.
///
/// Source files spell the same region differently at times ("Kaski" vs
/// "KASKI"); every spelling found on the unit's features is included.
pub fn unit_filter(atlas: &AdminAtlas, unit: UnitId) -> Option<Value> {
    let record = atlas.unit(unit)?;
    let key = atlas.schema().name_key(unit.level);

    let mut spellings: BTreeSet<String> = atlas
        .collection(unit.level)
        .map(|fc| {
            record
                .features
                .iter()
                .filter_map(|&i| fc.features.get(i))
                .filter_map(|f| f.property_text(key))
                .map(|s| s.into_owned())
                .collect()
        })
        .unwrap_or_default();
    if spellings.is_empty() {
        spellings.insert(record.name.clone());
    }

    let spellings: Vec<String> = spellings.into_iter().collect();
    name_filter(key, &spellings)
}

#[cfg(test)]
mod tests {
    use super::name_filter;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn single_spelling_is_an_equality() {
        assert_eq!(
            name_filter("DISTRICT", &["KASKI"]),
            Some(json!(["==", ["get", "DISTRICT"], "KASKI"]))
        );
    }

    #[test]
    fn several_spellings_use_membership() {
        assert_eq!(
            name_filter("DISTRICT", &["KASKI", "Kaski"]),
            Some(json!(["in", ["get", "DISTRICT"], ["literal", ["KASKI", "Kaski"]]]))
        );
    }

    #[test]
    fn no_spelling_means_no_filter() {
        let empty: [&str; 0] = [];
        assert_eq!(name_filter("DISTRICT", &empty), None);
    }
}
