#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LabelStyle {
    pub text_size: f64,
    pub color: &'static str,
    pub halo: Option<(&'static str, f64)>,
}

impl LabelStyle {
    pub const fn new(text_size: f64, color: &'static str) -> Self {
        Self {
            text_size,
            color,
            halo: None,
        }
    }

    pub const fn with_halo(mut self, color: &'static str, width: f64) -> Self {
        self.halo = Some((color, width));
        self
    }
}

/// Paint for one layer group: a fill, an outline and an optional label.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayerSymbology {
    pub fill_color: &'static str,
    pub line_color: &'static str,
    pub line_width: f64,
    pub label: Option<LabelStyle>,
}

impl LayerSymbology {
    pub const fn new(fill_color: &'static str, line_color: &'static str, line_width: f64) -> Self {
        Self {
            fill_color,
            line_color,
            line_width,
            label: None,
        }
    }

    pub const fn with_label(mut self, label: LabelStyle) -> Self {
        self.label = Some(label);
        self
    }
}

// Labels sit just under the anchor point.
pub const LABEL_OFFSET: [f64; 2] = [0.0, 0.6];
pub const LABEL_ANCHOR: &str = "top";
