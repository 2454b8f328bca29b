use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    /// Label shown in the layer switcher.
    pub name: String,
    pub url_template: String,
    pub options: TileOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileOptions {
    pub attribution: String,
    pub max_zoom: u8,
    pub min_zoom: u8,
}

impl TileLayer {
    pub fn new(
        name: impl Into<String>,
        url_template: impl Into<String>,
        attribution: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url_template: url_template.into(),
            options: TileOptions {
                attribution: attribution.into(),
                max_zoom: 18,
                min_zoom: 0,
            },
        }
    }

    pub fn openstreetmap() -> Self {
        Self::new(
            "OpenStreetMap",
            "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
            "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors",
        )
        .with_max_zoom(19)
    }

    pub fn esri_world_imagery() -> Self {
        Self::new(
            "Esri Satellite",
            "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
            "Esri",
        )
    }

    pub fn with_max_zoom(mut self, max_zoom: u8) -> Self {
        self.options.max_zoom = max_zoom;
        self
    }
}
