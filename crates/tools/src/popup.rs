use formats::Lake;
use layers::{DivIcon, Popup};

pub const POPUP_MAX_WIDTH: u32 = 400;

/// Names longer than this get a line break.
const NAME_WRAP_THRESHOLD: usize = 20;
/// The break goes before the first space at or after this character.
const NAME_WRAP_SEARCH_FROM: usize = 25;

pub const FISH_CLUSTER_ICON_JS: &str = r#"
function(cluster) {
    return L.divIcon({
        html: `
            <div style="position: relative; width: 70px; height: 60px;">
                <div style="position: absolute; top: 0; left: 50%; transform: translateX(-50%); font-size: 30px;">🐟</div>
                <div style="position: absolute; bottom: 0; left: 0; font-size: 30px;">🐟</div>
                <div style="position: absolute; bottom: 0; right: 0; font-size: 30px;">🐟</div>
            </div>
            ` + cluster.getChildCount(),
        className: 'marker-cluster',
        iconSize: new L.Point(60, 60),
        iconAnchor: new L.Point(70, 70)
    });
}
"#;

pub fn fish_icon() -> DivIcon {
    DivIcon::new("<div style=\"font-size:24px;\">🐟</div>", [30, 30], [20, 20])
}

pub fn google_maps_link(lat: f64, lon: f64) -> String {
    format!("https://www.google.com/maps/@{lat},{lon},17z")
}

pub fn wrap_lake_name(name: &str) -> String {
    if name.chars().count() <= NAME_WRAP_THRESHOLD {
        return name.to_string();
    }
    let Some((search_from, _)) = name.char_indices().nth(NAME_WRAP_SEARCH_FROM) else {
        return name.to_string();
    };
    match name[search_from..].find(' ') {
        Some(offset) => {
            let at = search_from + offset;
            format!("{}<br>{}", &name[..at], &name[at..])
        }
        None => name.to_string(),
    }
}

/// `lat`/`lon` locate the marker the popup is bound to.
pub fn lake_popup(lake: &Lake, lat: f64, lon: f64) -> Popup {
    let html = format!(
        "Nom: {}<br>Règlement: <a href='{}'>Lien</a><br>Catégorie: {}<br>Carte: <a href='{}' target='_blank'>Voir sur Maps</a>",
        wrap_lake_name(&lake.name),
        lake.link,
        lake.category,
        google_maps_link(lat, lon)
    );
    Popup::new(html, POPUP_MAX_WIDTH)
}
