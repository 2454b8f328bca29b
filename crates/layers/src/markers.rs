use serde::Serialize;
use serde_json::{Map, Value};

/// Marker icon made of arbitrary HTML.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DivIcon {
    pub html: String,
    pub icon_size: [u32; 2],
    pub icon_anchor: [u32; 2],
    pub class_name: String,
}

impl DivIcon {
    pub fn new(html: impl Into<String>, icon_size: [u32; 2], icon_anchor: [u32; 2]) -> Self {
        Self {
            html: html.into(),
            icon_size,
            icon_anchor,
            class_name: "empty".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub html: String,
    pub max_width: u32,
}

impl Popup {
    pub fn new(html: impl Into<String>, max_width: u32) -> Self {
        Self {
            html: html.into(),
            max_width,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// `[lat, lon]`, Leaflet order.
    pub location: [f64; 2],
    pub icon: Option<DivIcon>,
    pub popup: Option<Popup>,
}

impl Marker {
    pub fn new(location: [f64; 2]) -> Self {
        Self {
            location,
            icon: None,
            popup: None,
        }
    }

    pub fn with_icon(mut self, icon: DivIcon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_popup(mut self, popup: Popup) -> Self {
        self.popup = Some(popup);
        self
    }
}

/// Markers grouped by Leaflet.markercluster.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarkerCluster {
    pub options: Map<String, Value>,
    /// JavaScript function expression, emitted verbatim.
    pub icon_create_function: Option<String>,
    pub markers: Vec<Marker>,
}

impl MarkerCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_cluster_radius(mut self, radius: u32) -> Self {
        self.options
            .insert("maxClusterRadius".to_string(), Value::from(radius));
        self
    }

    pub fn with_icon_create_function(mut self, js: impl Into<String>) -> Self {
        self.icon_create_function = Some(js.into());
        self
    }

    pub fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }
}
