use serde::Serialize;
use serde_json::Value;

use crate::markers::{Marker, MarkerCluster};
use crate::symbology::LayerStyle;
use crate::tiles::TileLayer;

#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonOverlay {
    /// Any GeoJSON object: geometry, Feature or FeatureCollection.
    pub data: Value,
    pub style: LayerStyle,
    pub tooltip: Option<String>,
}

impl GeoJsonOverlay {
    pub fn new(data: Value, style: LayerStyle) -> Self {
        Self {
            data,
            style,
            tooltip: None,
        }
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapElement {
    GeoJson(GeoJsonOverlay),
    Marker(Marker),
    MarkerCluster(MarkerCluster),
}

/// Options for the Leaflet.Locate control.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocateControl {
    pub fly_to: bool,
    pub show_popup: bool,
    pub locate_options: LocateOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocateOptions {
    pub enable_high_accuracy: bool,
}

impl Default for LocateControl {
    fn default() -> Self {
        Self {
            fly_to: true,
            show_popup: true,
            locate_options: LocateOptions {
                enable_high_accuracy: true,
            },
        }
    }
}

/// A single-page Leaflet map. Elements are drawn in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafletMap {
    pub title: Option<String>,
    /// `[lat, lon]`.
    pub center: [f64; 2],
    pub zoom: u8,
    pub control_scale: bool,
    pub tile_layers: Vec<TileLayer>,
    pub locate: Option<LocateControl>,
    pub elements: Vec<MapElement>,
}

impl LeafletMap {
    pub fn new(center: [f64; 2], zoom: u8) -> Self {
        Self {
            title: None,
            center,
            zoom,
            control_scale: false,
            tile_layers: vec![TileLayer::openstreetmap()],
            locate: None,
            elements: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_control_scale(mut self, control_scale: bool) -> Self {
        self.control_scale = control_scale;
        self
    }

    pub fn add_tile_layer(&mut self, layer: TileLayer) {
        self.tile_layers.push(layer);
    }

    pub fn set_locate_control(&mut self, control: LocateControl) {
        self.locate = Some(control);
    }

    pub fn add_geojson(&mut self, overlay: GeoJsonOverlay) {
        self.elements.push(MapElement::GeoJson(overlay));
    }

    pub fn add_marker(&mut self, marker: Marker) {
        self.elements.push(MapElement::Marker(marker));
    }

    pub fn add_marker_cluster(&mut self, cluster: MarkerCluster) {
        self.elements.push(MapElement::MarkerCluster(cluster));
    }

    pub fn has_marker_clusters(&self) -> bool {
        self.elements
            .iter()
            .any(|e| matches!(e, MapElement::MarkerCluster(_)))
    }
}
