use serde::Serialize;

/// Leaflet path style for vector overlays.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStyle {
    pub color: String,
    /// Stroke width in pixels; Leaflet's default applies when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    pub fill_opacity: f64,
}

impl LayerStyle {
    pub fn new(color: impl Into<String>, weight: f64, fill_opacity: f64) -> Self {
        Self {
            color: color.into(),
            weight: Some(weight),
            fill_opacity,
        }
    }

    pub fn fill(color: impl Into<String>, fill_opacity: f64) -> Self {
        Self {
            color: color.into(),
            weight: None,
            fill_opacity,
        }
    }
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            color: "#3388ff".to_string(),
            weight: Some(3.0),
            fill_opacity: 0.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LayerStyle;

    #[test]
    fn serializes_as_leaflet_path_options() {
        let style = LayerStyle::new("darkblue", 4.0, 1.0);
        let json = serde_json::to_string(&style).unwrap();
        assert_eq!(json, r#"{"color":"darkblue","weight":4.0,"fillOpacity":1.0}"#);
    }

    #[test]
    fn fill_only_style_omits_weight() {
        let json = serde_json::to_string(&LayerStyle::fill("lightblue", 0.5)).unwrap();
        assert_eq!(json, r#"{"color":"lightblue","fillOpacity":0.5}"#);
    }
}
