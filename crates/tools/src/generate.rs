//! Batch generation of the lake map page.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use compute::SpatialAnalysis;
use formats::{
    Lake, LakeError, Region, RegionsError, River, RiversError, SubmissionsError,
    geometry_to_geojson_value, lakes_from_submissions, load_regions, load_rivers,
    load_submissions,
};
use layers::{
    GeoJsonOverlay, LayerStyle, LeafletMap, LocateControl, Marker, MarkerCluster, RenderError,
    TileLayer, render_html,
};
use tracing::{debug, info};

use crate::popup::{FISH_CLUSTER_ICON_JS, fish_icon, lake_popup};
use crate::postprocess::{DEFAULT_BANNER, PostProcessError, postprocess_file};

pub const DEFAULT_TARGET_REGION: &str = "OISE";
pub const DEFAULT_TITLE: &str = "La pêche réciprocitaire dans l'Oise";
pub const DEFAULT_ZOOM: u8 = 10;
pub const LAKE_CLUSTER_RADIUS: u32 = 30;

#[derive(Debug, Clone, PartialEq)]
pub enum BannerSource {
    Default,
    File(PathBuf),
    Disabled,
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub lakes_path: PathBuf,
    pub regions_path: PathBuf,
    pub rivers_path: PathBuf,
    pub output_path: PathBuf,
    pub target_region: String,
    pub title: String,
    pub zoom: u8,
    pub banner: BannerSource,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            lakes_path: PathBuf::from("Lacs.json"),
            regions_path: PathBuf::from("Regions.csv"),
            rivers_path: PathBuf::from("CoursEau_02_Rhin-Meuse.json"),
            output_path: PathBuf::from("map.html"),
            target_region: DEFAULT_TARGET_REGION.to_string(),
            title: DEFAULT_TITLE.to_string(),
            zoom: DEFAULT_ZOOM,
            banner: BannerSource::Default,
        }
    }
}

#[derive(Debug)]
pub enum GenerateError {
    Submissions(SubmissionsError),
    Lakes(LakeError),
    Regions(RegionsError),
    Rivers(RiversError),
    UnknownRegion(String),
    EmptyGeometry(String),
    Render(RenderError),
    Write { path: PathBuf, source: std::io::Error },
    Banner { path: PathBuf, source: std::io::Error },
    PostProcess(PostProcessError),
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::Submissions(err) => write!(f, "{err}"),
            GenerateError::Lakes(err) => write!(f, "{err}"),
            GenerateError::Regions(err) => write!(f, "{err}"),
            GenerateError::Rivers(err) => write!(f, "{err}"),
            GenerateError::UnknownRegion(name) => write!(f, "no region named {name:?}"),
            GenerateError::EmptyGeometry(what) => write!(f, "{what} has an empty geometry"),
            GenerateError::Render(err) => write!(f, "{err}"),
            GenerateError::Write { path, source } => {
                write!(f, "write {}: {source}", path.display())
            }
            GenerateError::Banner { path, source } => {
                write!(f, "read banner {}: {source}", path.display())
            }
            GenerateError::PostProcess(err) => write!(f, "post-processing failed: {err}"),
        }
    }
}

impl std::error::Error for GenerateError {}

/// Inputs of one generation run.
#[derive(Debug, Clone)]
pub struct Datasets {
    pub regions: Vec<Region>,
    pub rivers: Vec<River>,
    pub lakes: Vec<Lake>,
}

impl Datasets {
    pub fn load(cfg: &GenerateConfig) -> Result<Self, GenerateError> {
        let submissions =
            load_submissions(&cfg.lakes_path).map_err(GenerateError::Submissions)?;
        let lakes = lakes_from_submissions(&submissions).map_err(GenerateError::Lakes)?;
        let regions = load_regions(&cfg.regions_path).map_err(GenerateError::Regions)?;
        let rivers = load_rivers(&cfg.rivers_path).map_err(GenerateError::Rivers)?;
        info!(
            lakes = lakes.len(),
            regions = regions.len(),
            rivers = rivers.len(),
            "datasets loaded"
        );
        Ok(Self {
            regions,
            rivers,
            lakes,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerateSummary {
    pub neighbour_regions: usize,
    pub rivers: usize,
    pub lakes: usize,
}

pub fn neighbour_style() -> LayerStyle {
    LayerStyle::new("lightgrey", 1.0, 0.2)
}

pub fn target_style() -> LayerStyle {
    LayerStyle::new("white", 1.0, 0.05)
}

pub fn river_style() -> LayerStyle {
    LayerStyle::new("darkblue", 4.0, 1.0)
}

pub fn lake_style() -> LayerStyle {
    LayerStyle::fill("lightblue", 0.5)
}

/// Assembles the map for `target_region`.
pub fn build_map(
    data: &Datasets,
    target_region: &str,
    title: &str,
    zoom: u8,
) -> Result<(LeafletMap, GenerateSummary), GenerateError> {
    let target = data
        .regions
        .iter()
        .find(|r| r.name == target_region)
        .ok_or_else(|| GenerateError::UnknownRegion(target_region.to_string()))?;
    let empty_target = || GenerateError::EmptyGeometry(format!("region {target_region}"));
    let target_bounds = SpatialAnalysis::bounds(&target.geometry).ok_or_else(empty_target)?;
    let [lon, lat] = SpatialAnalysis::centroid_lon_lat(&target.geometry).ok_or_else(empty_target)?;

    let mut map = LeafletMap::new([lat, lon], zoom)
        .with_title(title)
        .with_control_scale(false);
    map.add_tile_layer(TileLayer::esri_world_imagery());
    map.set_locate_control(LocateControl::default());

    let mut summary = GenerateSummary::default();

    let neighbours = SpatialAnalysis::adjacent_by_bounds(
        &target_bounds,
        &data.regions,
        |r| &r.geometry,
        |r| r.name == target_region,
    );
    for region in &neighbours {
        debug!(region = %region.name, "neighbour region");
        map.add_geojson(GeoJsonOverlay::new(
            geometry_to_geojson_value(&region.geometry),
            neighbour_style(),
        ));
    }
    summary.neighbour_regions = neighbours.len();

    map.add_geojson(GeoJsonOverlay::new(
        geometry_to_geojson_value(&target.geometry),
        target_style(),
    ));

    let rivers = SpatialAnalysis::intersecting(&target.geometry, &data.rivers, |r| &r.geometry);
    for river in &rivers {
        let mut overlay =
            GeoJsonOverlay::new(geometry_to_geojson_value(&river.geometry), river_style());
        if let Some(name) = &river.name {
            overlay = overlay.with_tooltip(name.clone());
        }
        map.add_geojson(overlay);
    }
    summary.rivers = rivers.len();

    let mut cluster = MarkerCluster::new()
        .with_max_cluster_radius(LAKE_CLUSTER_RADIUS)
        .with_icon_create_function(FISH_CLUSTER_ICON_JS);
    let mut lake_outlines = Vec::with_capacity(data.lakes.len());
    for lake in &data.lakes {
        let [lake_lon, lake_lat] = SpatialAnalysis::centroid_lon_lat(&lake.geometry)
            .ok_or_else(|| GenerateError::EmptyGeometry(format!("lake {}", lake.name)))?;
        cluster.add_marker(
            Marker::new([lake_lat, lake_lon])
                .with_icon(fish_icon())
                .with_popup(lake_popup(lake, lake_lat, lake_lon)),
        );
        lake_outlines.push(GeoJsonOverlay::new(lake.feature.clone(), lake_style()));
    }
    summary.lakes = lake_outlines.len();

    map.add_marker_cluster(cluster);
    for outline in lake_outlines {
        map.add_geojson(outline);
    }

    Ok((map, summary))
}

/// Loads the inputs, writes the page, then applies the banner edits to it.
pub fn run(cfg: &GenerateConfig) -> Result<GenerateSummary, GenerateError> {
    let data = Datasets::load(cfg)?;
    let (map, summary) = build_map(&data, &cfg.target_region, &cfg.title, cfg.zoom)?;
    info!(
        neighbours = summary.neighbour_regions,
        rivers = summary.rivers,
        lakes = summary.lakes,
        "map assembled"
    );

    let html = render_html(&map).map_err(GenerateError::Render)?;
    fs::write(&cfg.output_path, html).map_err(|source| GenerateError::Write {
        path: cfg.output_path.clone(),
        source,
    })?;

    let banner = match &cfg.banner {
        BannerSource::Default => Some(DEFAULT_BANNER.to_string()),
        BannerSource::File(path) => {
            Some(
                fs::read_to_string(path).map_err(|source| GenerateError::Banner {
                    path: path.clone(),
                    source,
                })?,
            )
        }
        BannerSource::Disabled => None,
    };
    if let Some(banner) = banner {
        postprocess_file(&cfg.output_path, &banner).map_err(GenerateError::PostProcess)?;
    }

    info!(path = %cfg.output_path.display(), "map written");
    Ok(summary)
}
