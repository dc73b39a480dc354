use formats::FeatureCollection;
use serde_json::{Value, json};

use crate::admin::AdminLevel;
use crate::atlas::AdminAtlas;

/// One unit-square polygon per feature, shifted east by the feature index.
pub fn collection(properties: Vec<Value>) -> FeatureCollection {
    let features: Vec<Value> = properties
        .into_iter()
        .enumerate()
        .map(|(i, props)| {
            let x = i as f64;
            json!({
                "type": "Feature",
                "properties": props,
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[x, 0.0], [x + 1.0, 0.0], [x + 1.0, 1.0], [x, 1.0], [x, 0.0]]]
                }
            })
        })
        .collect();
    FeatureCollection::from_geojson_value(&json!({
        "type": "FeatureCollection",
        "features": features,
    }))
    .expect("fixture collection")
}

pub fn atlas() -> AdminAtlas {
    let mut atlas = AdminAtlas::new();
    atlas.install(
        AdminLevel::Province,
        collection(vec![
            json!({ "state": "Koshi", "fid": 1 }),
            json!({ "state": "Gandaki", "fid": 4 }),
        ]),
    );
    atlas.install(
        AdminLevel::District,
        collection(vec![
            json!({ "DISTRICT": "TAPLEJUNG", "SCode": 1 }),
            json!({ "DISTRICT": "JHAPA", "SCode": 1 }),
            json!({ "DISTRICT": "KASKI", "SCode": 4 }),
            json!({ "DISTRICT": "SYANGJA", "SCode": 4 }),
        ]),
    );
    atlas.install(
        AdminLevel::Municipality,
        collection(vec![
            json!({ "GaPa_NaPa": "Pokhara", "DISTRICT": "KASKI" }),
            json!({ "GaPa_NaPa": "Machhapuchchhre", "DISTRICT": "Kaski" }),
            json!({ "GaPa_NaPa": "Mechinagar", "DISTRICT": "JHAPA" }),
            json!({ "GaPa_NaPa": "Putalibazar", "DISTRICT": "SYANGJA" }),
        ]),
    );
    atlas.install(
        AdminLevel::Ward,
        collection(vec![
            json!({ "SURVEY_NAM": "Pokhara-1", "VDC_NAME": "Pokhara", "DISTRICT": "Kaski" }),
            json!({ "SURVEY_NAM": "Pokhara-2", "VDC_NAME": "POKHARA", "DISTRICT": "KASKI" }),
            json!({ "SURVEY_NAM": "Lwang-1", "VDC_NAME": "Machhapuchchhre", "DISTRICT": "KASKI" }),
            json!({ "SURVEY_NAM": "Mechinagar-1", "VDC_NAME": "Mechinagar", "DISTRICT": "JHAPA" }),
            json!({ "VDC_NAME": "Mechinagar", "DISTRICT": "JHAPA" }),
        ]),
    );
    atlas
}
