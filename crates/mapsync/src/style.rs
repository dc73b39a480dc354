use layers::{LABEL_ANCHOR, LABEL_OFFSET, LayerGroup, LayerVisual, Sublayer};
use scene::AdminSchema;
use serde_json::{Map, Value, json};

pub fn visibility_value(visible: bool) -> Value {
    Value::from(if visible { "visible" } else { "none" })
}

/// Sublayers that exist for `group`; groups without a label style have no
/// label layer.
pub fn sublayers(group: &LayerGroup) -> impl Iterator<Item = Sublayer> + '_ {
    Sublayer::ALL
        .into_iter()
        .filter(move |s| *s != Sublayer::Label || group.symbology.label.is_some())
}

/// MapLibre layer objects for one group, in draw order.
pub fn layer_specs(group: &LayerGroup, schema: &AdminSchema, visual: &LayerVisual) -> Vec<Value> {
    let sym = &group.symbology;
    let visibility = visibility_value(visual.visible);

    let mut out = vec![
        json!({
            "id": Sublayer::Fill.layer_id(group.id),
            "type": "fill",
            "source": group.id,
            "paint": { "fill-color": sym.fill_color, "fill-opacity": visual.opacity },
            "layout": { "visibility": visibility },
        }),
        json!({
            "id": Sublayer::Line.layer_id(group.id),
            "type": "line",
            "source": group.id,
            "paint": { "line-color": sym.line_color, "line-width": sym.line_width },
            "layout": { "visibility": visibility },
        }),
    ];

    if let (Some(label), Some(level)) = (sym.label, group.level) {
        let mut paint = Map::new();
        paint.insert("text-color".to_string(), Value::from(label.color));
        if let Some((halo_color, halo_width)) = label.halo {
            paint.insert("text-halo-color".to_string(), Value::from(halo_color));
            paint.insert("text-halo-width".to_string(), Value::from(halo_width));
        }
        out.push(json!({
            "id": Sublayer::Label.layer_id(group.id),
            "type": "symbol",
            "source": group.id,
            "layout": {
                "text-field": ["get", schema.name_key(level)],
                "text-size": label.text_size,
                "text-offset": LABEL_OFFSET,
                "text-anchor": LABEL_ANCHOR,
                "visibility": visibility,
            },
            "paint": Value::Object(paint),
        }));
    }

    out
}
