//! Emits a [`LeafletMap`] as one self-contained HTML page.
//!
//! JavaScript variable names are numbered in emission order, so the same map
//! always renders to the same bytes.

use std::fmt::{self, Write};

use serde::Serialize;

use crate::map::{GeoJsonOverlay, LeafletMap, MapElement};
use crate::markers::{Marker, MarkerCluster};

pub const LEAFLET_JS: &str = "https://cdn.jsdelivr.net/npm/leaflet@1.9.3/dist/leaflet.js";
pub const LEAFLET_CSS: &str = "https://cdn.jsdelivr.net/npm/leaflet@1.9.3/dist/leaflet.css";
pub const MARKERCLUSTER_JS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/leaflet.markercluster/1.1.0/leaflet.markercluster.js";
pub const MARKERCLUSTER_CSS: &[&str] = &[
    "https://cdnjs.cloudflare.com/ajax/libs/leaflet.markercluster/1.1.0/MarkerCluster.css",
    "https://cdnjs.cloudflare.com/ajax/libs/leaflet.markercluster/1.1.0/MarkerCluster.Default.css",
];
pub const LOCATE_JS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/leaflet-locatecontrol/0.79.0/L.Control.Locate.min.js";
pub const LOCATE_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/leaflet-locatecontrol/0.79.0/L.Control.Locate.min.css";

/// Inline style of the div wrapping the map container.
pub const MAP_FRAME_STYLE: &str = "position:relative;width:100%;height:0;padding-bottom:60%;";
pub const MAP_ELEMENT_ID: &str = "map";

#[derive(Debug)]
pub enum RenderError {
    Json(serde_json::Error),
    Fmt(fmt::Error),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Json(err) => write!(f, "map serialization failed: {err}"),
            RenderError::Fmt(err) => write!(f, "map formatting failed: {err}"),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::Json(err)
    }
}

impl From<fmt::Error> for RenderError {
    fn from(err: fmt::Error) -> Self {
        RenderError::Fmt(err)
    }
}

pub fn render_html(map: &LeafletMap) -> Result<String, RenderError> {
    let mut out = String::new();
    write_head(&mut out, map)?;
    writeln!(out, "<body>")?;
    writeln!(out, "    <div class=\"map-frame\" style=\"{MAP_FRAME_STYLE}\">")?;
    writeln!(
        out,
        "        <div class=\"leaflet-map\" id=\"{MAP_ELEMENT_ID}\"></div>"
    )?;
    writeln!(out, "    </div>")?;
    writeln!(out, "<script>")?;
    ScriptWriter::new(&mut out).write_map(map)?;
    writeln!(out, "</script>")?;
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")?;
    Ok(out)
}

fn write_head(out: &mut String, map: &LeafletMap) -> Result<(), RenderError> {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html>")?;
    writeln!(out, "<head>")?;
    writeln!(
        out,
        "    <meta http-equiv=\"content-type\" content=\"text/html; charset=UTF-8\" />"
    )?;
    writeln!(
        out,
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=no\" />"
    )?;
    if let Some(title) = &map.title {
        writeln!(out, "    <title>{}</title>", escape_html(title))?;
    }

    let mut scripts = vec![LEAFLET_JS];
    let mut styles = vec![LEAFLET_CSS];
    if map.has_marker_clusters() {
        scripts.push(MARKERCLUSTER_JS);
        styles.extend_from_slice(MARKERCLUSTER_CSS);
    }
    if map.locate.is_some() {
        scripts.push(LOCATE_JS);
        styles.push(LOCATE_CSS);
    }
    for src in scripts {
        writeln!(out, "    <script src=\"{src}\"></script>")?;
    }
    for href in styles {
        writeln!(out, "    <link rel=\"stylesheet\" href=\"{href}\"/>")?;
    }

    writeln!(
        out,
        "    <style>html, body {{width: 100%;height: 100%;margin: 0;padding: 0;}}</style>"
    )?;
    writeln!(
        out,
        "    <style>#{MAP_ELEMENT_ID} {{position:absolute;top:0;bottom:0;right:0;left:0;}}</style>"
    )?;
    writeln!(out, "</head>")?;
    Ok(())
}

struct ScriptWriter<'a> {
    out: &'a mut String,
    next_id: usize,
}

impl<'a> ScriptWriter<'a> {
    fn new(out: &'a mut String) -> Self {
        Self { out, next_id: 0 }
    }

    fn var(&mut self, prefix: &str) -> String {
        let name = format!("{prefix}_{}", self.next_id);
        self.next_id += 1;
        name
    }

    fn write_map(&mut self, map: &LeafletMap) -> Result<(), RenderError> {
        writeln!(
            self.out,
            "    var map = L.map({}, {{center: {}, zoom: {}, zoomControl: true, preferCanvas: false}});",
            js_value(&MAP_ELEMENT_ID)?,
            js_value(&map.center)?,
            map.zoom
        )?;
        if map.control_scale {
            writeln!(self.out, "    L.control.scale().addTo(map);")?;
        }

        let mut base_layers = Vec::with_capacity(map.tile_layers.len());
        for layer in &map.tile_layers {
            let var = self.var("tile_layer");
            writeln!(
                self.out,
                "    var {var} = L.tileLayer({}, {}).addTo(map);",
                js_value(&layer.url_template)?,
                js_value(&layer.options)?
            )?;
            base_layers.push((layer.name.as_str(), var));
        }
        if base_layers.len() > 1 {
            let entries = base_layers
                .iter()
                .map(|(name, var)| Ok(format!("{}: {var}", js_value(name)?)))
                .collect::<Result<Vec<_>, RenderError>>()?;
            writeln!(
                self.out,
                "    L.control.layers({{{}}}, {{}}).addTo(map);",
                entries.join(", ")
            )?;
        }

        if let Some(locate) = &map.locate {
            writeln!(
                self.out,
                "    L.control.locate({}).addTo(map);",
                js_value(locate)?
            )?;
        }

        for element in &map.elements {
            match element {
                MapElement::GeoJson(overlay) => self.write_geojson(overlay)?,
                MapElement::Marker(marker) => {
                    self.write_marker(marker, "map")?;
                }
                MapElement::MarkerCluster(cluster) => self.write_cluster(cluster)?,
            }
        }
        Ok(())
    }

    fn write_geojson(&mut self, overlay: &GeoJsonOverlay) -> Result<(), RenderError> {
        let var = self.var("geo_json");
        writeln!(
            self.out,
            "    var {var} = L.geoJson({}, {{style: function(feature) {{ return {}; }}}});",
            js_value(&overlay.data)?,
            js_value(&overlay.style)?
        )?;
        if let Some(tooltip) = &overlay.tooltip {
            writeln!(
                self.out,
                "    {var}.bindTooltip({}, {{sticky: true}});",
                js_value(tooltip)?
            )?;
        }
        writeln!(self.out, "    {var}.addTo(map);")?;
        Ok(())
    }

    fn write_cluster(&mut self, cluster: &MarkerCluster) -> Result<(), RenderError> {
        let var = self.var("marker_cluster");
        writeln!(
            self.out,
            "    var {var}_options = {};",
            js_value(&cluster.options)?
        )?;
        if let Some(function) = &cluster.icon_create_function {
            writeln!(
                self.out,
                "    {var}_options.iconCreateFunction = {};",
                function.trim()
            )?;
        }
        writeln!(self.out, "    var {var} = L.markerClusterGroup({var}_options);")?;
        writeln!(self.out, "    map.addLayer({var});")?;
        for marker in &cluster.markers {
            self.write_marker(marker, &var)?;
        }
        Ok(())
    }

    fn write_marker(&mut self, marker: &Marker, parent: &str) -> Result<String, RenderError> {
        let var = self.var("marker");
        writeln!(
            self.out,
            "    var {var} = L.marker({});",
            js_value(&marker.location)?
        )?;
        if let Some(icon) = &marker.icon {
            writeln!(self.out, "    {var}.setIcon(L.divIcon({}));", js_value(icon)?)?;
        }
        if let Some(popup) = &marker.popup {
            writeln!(
                self.out,
                "    {var}.bindPopup(L.popup({{maxWidth: {}}}).setContent({}));",
                popup.max_width,
                js_value(&popup.html)?
            )?;
        }
        writeln!(self.out, "    {parent}.addLayer({var});")?;
        Ok(var)
    }
}

/// JSON text that is also safe inside a `<script>` element.
fn js_value<T: Serialize + ?Sized>(value: &T) -> Result<String, RenderError> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{MAP_FRAME_STYLE, escape_html, render_html};
    use crate::map::{GeoJsonOverlay, LeafletMap, LocateControl};
    use crate::markers::{DivIcon, Marker, MarkerCluster, Popup};
    use crate::symbology::LayerStyle;
    use crate::tiles::TileLayer;
    use serde_json::json;

    fn sample_map() -> LeafletMap {
        let mut map = LeafletMap::new([49.41, 2.42], 10).with_title("Lacs <Oise>");
        map.add_tile_layer(TileLayer::esri_world_imagery());
        map.set_locate_control(LocateControl::default());
        map.add_geojson(
            GeoJsonOverlay::new(
                json!({"type": "LineString", "coordinates": [[2.0, 49.0], [2.5, 49.5]]}),
                LayerStyle::new("darkblue", 4.0, 1.0),
            )
            .with_tooltip("L'Oise </script>"),
        );
        let mut cluster = MarkerCluster::new()
            .with_max_cluster_radius(30)
            .with_icon_create_function("function(cluster) { return L.divIcon({html: ''}); }");
        cluster.add_marker(
            Marker::new([49.2, 2.4])
                .with_icon(DivIcon::new("<div>fish</div>", [30, 30], [20, 20]))
                .with_popup(Popup::new("Nom: Étang", 400)),
        );
        map.add_marker_cluster(cluster);
        map
    }

    #[test]
    fn renders_every_element() {
        let html = render_html(&sample_map()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Lacs &lt;Oise&gt;</title>"));
        assert!(html.contains(&format!("style=\"{MAP_FRAME_STYLE}\"")));
        assert!(html.contains("center: [49.41,2.42], zoom: 10"));
        assert!(html.contains("World_Imagery"));
        assert!(html.contains("L.control.layers("));
        assert!(html.contains(r#"L.control.locate({"flyTo":true,"showPopup":true,"locateOptions":{"enableHighAccuracy":true}})"#));
        assert!(html.contains(r#"return {"color":"darkblue","weight":4.0,"fillOpacity":1.0};"#));
        assert!(html.contains(r#"{"maxClusterRadius":30}"#));
        assert!(html.contains(".iconCreateFunction = function(cluster)"));
        assert!(html.contains("L.popup({maxWidth: 400}).setContent(\"Nom: Étang\")"));
        assert!(html.contains("leaflet.markercluster.js"));
        assert!(html.contains("L.Control.Locate.min.js"));
        assert!(!html.contains("L.control.scale()"));
    }

    #[test]
    fn script_payloads_cannot_close_the_script_tag() {
        let html = render_html(&sample_map()).unwrap();
        assert!(html.contains(r#"L'Oise <\/script>"#));
        assert_eq!(html.matches("</script>").count(), 1 + 3);
    }

    #[test]
    fn rendering_is_deterministic() {
        let a = render_html(&sample_map()).unwrap();
        let b = render_html(&sample_map()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn plugins_only_loaded_when_used() {
        let html = render_html(&LeafletMap::new([0.0, 0.0], 3)).unwrap();
        assert!(!html.contains("markercluster"));
        assert!(!html.contains("Locate"));
        assert!(!html.contains("L.control.layers("));
    }

    #[test]
    fn escapes_markup_in_text() {
        assert_eq!(escape_html("a & <b> \"c\""), "a &amp; &lt;b&gt; &quot;c&quot;");
    }
}
