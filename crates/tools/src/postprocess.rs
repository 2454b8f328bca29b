//! Markup edits applied to a rendered map page: promotional banner on top of
//! the body, page scrolling disabled, and the map frame stretched to fill the
//! viewport below the banner.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use layers::render::MAP_FRAME_STYLE;
use tracing::warn;

pub const DEFAULT_BANNER: &str = include_str!("../assets/banner.html");

pub const BANNER_ELEMENT_ID: &str = "lakemap-banner";
/// Closes the injected banner block; lets a later pass swap the banner.
const BANNER_END_MARKER: &str = "<!-- /lakemap-banner -->";
pub const NO_SCROLL_STYLE_ID: &str = "lakemap-no-scroll";
/// Frame style once the banner sits above the map.
pub const BANNER_FRAME_STYLE: &str = "position:relative;width:100%;height:calc(100vh - 50px);";

#[derive(Debug)]
pub enum PostProcessError {
    Io { path: PathBuf, source: std::io::Error },
    MissingHead,
    MissingBody,
}

impl fmt::Display for PostProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostProcessError::Io { path, source } => write!(f, "{}: {source}", path.display()),
            PostProcessError::MissingHead => write!(f, "page has no </head>"),
            PostProcessError::MissingBody => write!(f, "page has no <body> element"),
        }
    }
}

impl std::error::Error for PostProcessError {}

/// Rewrites the page at `path` in place. Returns `false` when the page
/// already carried every edit and was left as is.
pub fn postprocess_file(path: impl AsRef<Path>, banner: &str) -> Result<bool, PostProcessError> {
    let path = path.as_ref();
    let io_err = |source| PostProcessError::Io {
        path: path.to_path_buf(),
        source,
    };
    let html = fs::read_to_string(path).map_err(io_err)?;
    let updated = postprocess(&html, banner)?;
    if updated == html {
        return Ok(false);
    }
    fs::write(path, updated).map_err(io_err)?;
    Ok(true)
}

/// Applies every edit. Edits already present are not repeated, so the result
/// holds exactly one banner however many times it runs.
pub fn postprocess(html: &str, banner: &str) -> Result<String, PostProcessError> {
    let html = disable_scrolling(html)?;
    let html = inject_banner(&html, banner)?;
    Ok(fit_map_frame(&html))
}

/// Inserts `banner` as the first child of `<body>`, or replaces the banner
/// a previous pass inserted.
pub fn inject_banner(html: &str, banner: &str) -> Result<String, PostProcessError> {
    let open_tag = format!("<div id=\"{BANNER_ELEMENT_ID}\">");
    let block = format!("{open_tag}\n{}\n</div>{BANNER_END_MARKER}", banner.trim());

    if let Some(start) = html.find(&open_tag) {
        let Some(rel_end) = html[start..].find(BANNER_END_MARKER) else {
            warn!("banner block has no end marker, leaving it untouched");
            return Ok(html.to_string());
        };
        let end = start + rel_end + BANNER_END_MARKER.len();
        let mut out = String::with_capacity(html.len() + block.len());
        out.push_str(&html[..start]);
        out.push_str(&block);
        out.push_str(&html[end..]);
        return Ok(out);
    }

    let at = body_content_start(html).ok_or(PostProcessError::MissingBody)?;
    Ok(splice(html, at, &format!("\n{block}")))
}

pub fn disable_scrolling(html: &str) -> Result<String, PostProcessError> {
    if html.contains(&format!("id=\"{NO_SCROLL_STYLE_ID}\"")) {
        return Ok(html.to_string());
    }
    let at = html.find("</head>").ok_or(PostProcessError::MissingHead)?;
    let style = format!(
        "<style id=\"{NO_SCROLL_STYLE_ID}\">\nbody {{\n    overflow: hidden;\n}}\n</style>\n"
    );
    Ok(splice(html, at, &style))
}

/// Pages without the default frame are returned unchanged.
pub fn fit_map_frame(html: &str) -> String {
    html.replacen(
        &format!("style=\"{MAP_FRAME_STYLE}\""),
        &format!("style=\"{BANNER_FRAME_STYLE}\""),
        1,
    )
}

/// Byte offset just past the `<body ...>` opening tag.
fn body_content_start(html: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(rel) = html[from..].find("<body") {
        let start = from + rel;
        let after_name = start + "<body".len();
        match html[after_name..].chars().next() {
            Some('>') => return Some(after_name + 1),
            Some(c) if c.is_ascii_whitespace() => {
                let close = html[after_name..].find('>')?;
                return Some(after_name + close + 1);
            }
            _ => from = after_name,
        }
    }
    None
}

fn splice(html: &str, at: usize, fragment: &str) -> String {
    let mut out = String::with_capacity(html.len() + fragment.len());
    out.push_str(&html[..at]);
    out.push_str(fragment);
    out.push_str(&html[at..]);
    out
}

#[cfg(test)]
mod tests {
    use super::{
        BANNER_ELEMENT_ID, BANNER_FRAME_STYLE, DEFAULT_BANNER, PostProcessError, postprocess,
        postprocess_file,
    };
    use layers::render::MAP_FRAME_STYLE;
    use pretty_assertions::assert_eq;

    fn page() -> String {
        format!(
            "<html>\n<head>\n<title>t</title>\n</head>\n<body class=\"x\">\n\
             <div style=\"{MAP_FRAME_STYLE}\"><div id=\"map\"></div></div>\n</body>\n</html>\n"
        )
    }

    #[test]
    fn banner_is_first_child_of_body() {
        let out = postprocess(&page(), "<p>pub</p>").unwrap();
        let body_at = out.find("<body class=\"x\">").unwrap() + "<body class=\"x\">".len();
        let expected = format!("\n<div id=\"{BANNER_ELEMENT_ID}\">\n<p>pub</p>");
        assert!(out[body_at..].starts_with(&expected));
    }

    #[test]
    fn scroll_style_lands_in_head() {
        let out = postprocess(&page(), "<p>pub</p>").unwrap();
        let style_at = out.find("overflow: hidden;").unwrap();
        assert!(style_at < out.find("</head>").unwrap());
    }

    #[test]
    fn map_frame_is_fitted_below_banner() {
        let out = postprocess(&page(), "<p>pub</p>").unwrap();
        assert!(!out.contains(MAP_FRAME_STYLE));
        assert!(out.contains(&format!("style=\"{BANNER_FRAME_STYLE}\"")));
    }

    #[test]
    fn repeated_runs_keep_a_single_banner() {
        let once = postprocess(&page(), DEFAULT_BANNER).unwrap();
        let twice = postprocess(&once, DEFAULT_BANNER).unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice.matches("class=\"header-bar\"").count(), 1);
        assert_eq!(twice.matches("overflow: hidden;").count(), 1);
    }

    #[test]
    fn default_banner_styles_each_link_and_the_ad_bar() {
        assert!(DEFAULT_BANNER.contains(".header-bar, .ad-bar {"));
        assert_eq!(DEFAULT_BANNER.matches("border: 1px solid #0077b5;").count(), 2);
        assert_eq!(DEFAULT_BANNER.matches("border: 1px solid #0070ba;").count(), 1);
        let out = postprocess(&page(), DEFAULT_BANNER).unwrap();
        assert!(out.contains("target=\"_blank\" style=\"color: #0070ba;"));
    }

    #[test]
    fn page_without_body_is_rejected() {
        let page = "<html><head></head><bodyguard></bodyguard></html>";
        let err = postprocess(page, "b").unwrap_err();
        assert!(matches!(err, PostProcessError::MissingBody));
        let err = postprocess("<html><body></body></html>", "b").unwrap_err();
        assert!(matches!(err, PostProcessError::MissingHead));
    }

    #[test]
    fn rewrites_file_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.html");
        std::fs::write(&path, page()).unwrap();
        assert!(postprocess_file(&path, "<p>pub</p>").unwrap());
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, postprocess(&page(), "<p>pub</p>").unwrap());
        assert!(!postprocess_file(&path, "<p>pub</p>").unwrap());
    }

    #[test]
    fn second_pass_swaps_in_a_new_banner() {
        let first = postprocess(&page(), "<div><p>A</p></div>").unwrap();
        let second = postprocess(&first, "<p>B</p>").unwrap();
        assert!(!second.contains("<p>A</p>"));
        assert_eq!(second.matches("<p>B</p>").count(), 1);
        assert_eq!(second.matches(&format!("id=\"{BANNER_ELEMENT_ID}\"")).count(), 1);
        assert_eq!(second, postprocess(&page(), "<p>B</p>").unwrap());
    }

    #[test]
    fn swapping_the_banner_on_disk_reports_a_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.html");
        std::fs::write(&path, page()).unwrap();
        postprocess_file(&path, "<p>A</p>").unwrap();
        assert!(postprocess_file(&path, "<p>B</p>").unwrap());
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("<p>B</p>"));
        assert!(!written.contains("<p>A</p>"));
    }
}
