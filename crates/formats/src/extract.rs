use std::collections::BTreeSet;

use foundation::bounds::Aabb2;

use crate::geojson::{Feature, FeatureCollection, Geometry};

/// Sorted, de-duplicated display names found under `property_key`.
///
/// Features without a usable value for the key are skipped.
pub fn extract_names(collection: &FeatureCollection, property_key: &str) -> Vec<String> {
    let names: BTreeSet<String> = collection
        .features
        .iter()
        .filter_map(|f| f.property_text(property_key))
        .map(|name| name.into_owned())
        .collect();
    names.into_iter().collect()
}

/// Envelope of every position in the collection.
///
/// Returns [`Aabb2::EMPTY`] when there is nothing to measure; callers should
/// check [`Aabb2::is_empty`] before fitting a viewport to it.
pub fn compute_bounds(collection: &FeatureCollection) -> Aabb2 {
    collection
        .features
        .iter()
        .fold(Aabb2::EMPTY, |acc, f| acc.union(&feature_bounds(f)))
}

/// Like [`compute_bounds`], restricted to the features at `indices`.
/// Out-of-range indices are ignored.
pub fn compute_bounds_of(collection: &FeatureCollection, indices: &[usize]) -> Aabb2 {
    indices
        .iter()
        .filter_map(|&i| collection.features.get(i))
        .fold(Aabb2::EMPTY, |acc, f| acc.union(&feature_bounds(f)))
}

pub fn feature_bounds(feature: &Feature) -> Aabb2 {
    feature
        .geometry
        .as_ref()
        .map(geometry_bounds)
        .unwrap_or(Aabb2::EMPTY)
}

pub fn geometry_bounds(geometry: &Geometry) -> Aabb2 {
    let mut out = Aabb2::EMPTY;
    geometry
        .coordinates
        .for_each_position(&mut |lon, lat| out.extend(lon, lat));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn provinces() -> FeatureCollection {
        FeatureCollection::from_geojson_value(&json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "state": "Madhesh" },
                  "geometry": { "type": "Polygon", "coordinates": [[[85.0, 26.5], [86.5, 26.5], [86.0, 27.2], [85.0, 26.5]]] } },
                { "type": "Feature", "properties": { "state": "Bagmati" },
                  "geometry": { "type": "MultiPolygon", "coordinates": [[[[84.4, 27.2], [86.2, 27.4], [85.3, 28.4], [84.4, 27.2]]]] } },
                { "type": "Feature", "properties": { "state": "Madhesh" }, "geometry": null },
                { "type": "Feature", "properties": { "state": null }, "geometry": null },
                { "type": "Feature", "properties": {}, "geometry": null }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn names_are_sorted_unique_and_skip_missing() {
        let names = extract_names(&provinces(), "state");
        assert_eq!(names, vec!["Bagmati".to_string(), "Madhesh".to_string()]);
    }

    #[test]
    fn names_are_deterministic() {
        let fc = provinces();
        assert_eq!(extract_names(&fc, "state"), extract_names(&fc, "state"));
        assert!(extract_names(&fc, "DISTRICT").is_empty());
    }

    #[test]
    fn bounds_cover_nested_polygons() {
        let b = compute_bounds(&provinces());
        assert_eq!(b.to_array(), [84.4, 26.5, 86.5, 28.4]);
    }

    #[test]
    fn bounds_of_subset() {
        let fc = provinces();
        assert_eq!(compute_bounds_of(&fc, &[1]).to_array(), [84.4, 27.2, 86.2, 28.4]);
        assert!(compute_bounds_of(&fc, &[2, 3, 99]).is_empty());
    }

    #[test]
    fn single_point_collapses_to_point() {
        let fc = FeatureCollection::from_geojson_value(&json!({
            "type": "FeatureCollection",
            "features": [{ "type": "Feature", "properties": {},
                "geometry": { "type": "Point", "coordinates": [85.324, 27.7172] } }]
        }))
        .unwrap();
        let b = compute_bounds(&fc);
        assert_eq!(b.min, [85.324, 27.7172]);
        assert_eq!(b.max, [85.324, 27.7172]);
    }

    #[test]
    fn empty_collection_yields_sentinel() {
        let b = compute_bounds(&FeatureCollection::default());
        assert!(b.is_empty());
        assert_eq!(b, Aabb2::EMPTY);
    }
}
