//! Flame-graph SVG documents
//!
//! Every `<rect>` becomes a [`SourceRect`]. Frames in flame-graph SVGs are
//! `<g>` groups holding a `<title>` and the `<rect>`, so the title of the
//! enclosing group becomes the block tooltip.

use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::{Document, Node, ParsingOptions};

use super::source::LevelSource;
use super::{LevelError, SourceRect, display_name};

/// Extract rectangles in document order.
///
/// Lengths are read like `parseFloat`: a trailing unit is ignored and an
/// unreadable or missing value becomes NaN, which level scaling rejects for
/// any rectangle that survives filtering.
pub fn parse_svg(text: &str) -> Result<Vec<SourceRect>, LevelError> {
    // Flame graphs ship with an SVG 1.1 DOCTYPE
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(text, options)?;

    let rects = doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "rect")
        .map(rect_from_node)
        .collect();
    Ok(rects)
}

fn rect_from_node(node: Node) -> SourceRect {
    let width = node.attribute("width");
    SourceRect {
        x: parse_length(node.attribute("x")),
        y: parse_length(node.attribute("y")),
        width: parse_length(width),
        height: parse_length(node.attribute("height")),
        fill: node.attribute("fill").map(str::to_string),
        title: group_title(node),
        full_width: width.is_some_and(|w| w.trim() == "100%"),
    }
}

fn group_title(rect: Node) -> Option<String> {
    let group = rect.parent_element()?;
    group
        .children()
        .find(|c| c.is_element() && c.tag_name().name() == "title")
        .and_then(|t| t.text())
        .map(|t| t.trim().to_string())
}

fn parse_length(value: Option<&str>) -> f32 {
    let Some(value) = value else {
        return f32::NAN;
    };
    let value = value.trim();
    let end = value
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || ((c == '-' || c == '+') && i == 0)))
        .map_or(value.len(), |(i, _)| i);
    value[..end].parse().unwrap_or(f32::NAN)
}

/// A flame-graph SVG on disk
#[derive(Debug, Clone)]
pub struct SvgLevelFile {
    path: PathBuf,
}

impl SvgLevelFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LevelSource for SvgLevelFile {
    fn name(&self) -> String {
        display_name(&self.path.to_string_lossy()).to_string()
    }

    fn fetch(&self) -> Result<Vec<SourceRect>, LevelError> {
        let text = fs::read_to_string(&self.path).map_err(|source| LevelError::Io {
            path: self.path.clone(),
            source,
        })?;
        let rects = parse_svg(&text)?;
        log::debug!("Read {} rects from {}", rects.len(), self.path.display());
        Ok(rects)
    }
}

/// A flame-graph SVG fetched over HTTP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLevel {
    url: String,
}

impl RemoteLevel {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn download(&self) -> Result<String, reqwest::Error> {
        reqwest::blocking::get(&self.url)?.error_for_status()?.text()
    }
}

impl LevelSource for RemoteLevel {
    fn name(&self) -> String {
        display_name(&self.url).to_string()
    }

    fn fetch(&self) -> Result<Vec<SourceRect>, LevelError> {
        log::info!("Fetching level {}", self.url);
        let text = self.download().map_err(|source| LevelError::Fetch {
            url: self.url.clone(),
            source,
        })?;
        parse_svg(&text)
    }
}
