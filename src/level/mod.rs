//! Level geometry from flame-graph rectangles
//!
//! A level source hands over the rectangles of a flame graph in document
//! order and in its own coordinate space. Background rectangles are dropped,
//! the rest are rescaled so their bounding extent fills the canvas, and each
//! becomes a destructible [`Block`].

pub mod catalog;
pub mod generator;
pub mod source;
pub mod svg;

use std::path::PathBuf;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{Block, Rect};

pub use catalog::{Catalog, DEMO_BASE_URL, DEMO_LEVELS, demo_level, pick_demo};
pub use generator::FlameGraphGenerator;
pub use source::{JsonLevelFile, LevelDocument, LevelSource, StaticLevel, open_file};
pub use svg::{RemoteLevel, SvgLevelFile, parse_svg};

/// Fill used by flame-graph SVGs for the backdrop rectangle
pub const BACKGROUND_FILL: &str = "url(#background)";

/// Errors while producing level geometry
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed level document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("malformed flame-graph SVG: {0}")]
    Svg(#[from] roxmltree::Error),
    #[error("failed to fetch level {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("rectangle {index} has non-finite geometry")]
    NonFinite { index: usize },
    #[error("level extent {max_right}x{max_bottom} cannot be scaled to the canvas")]
    DegenerateExtent { max_right: f32, max_bottom: f32 },
    #[error("no level named {0:?}")]
    NotFound(String),
}

/// A rectangle as it appears in the source document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub fill: Option<String>,
    /// Frame name shown as a tooltip
    #[serde(default)]
    pub title: Option<String>,
    /// Width was given as the whole document (`width="100%"`)
    #[serde(default)]
    pub full_width: bool,
}

impl SourceRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill: None,
            title: None,
            full_width: false,
        }
    }

    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Not the document backdrop
    pub fn is_playable(&self) -> bool {
        !self.full_width && self.fill.as_deref() != Some(BACKGROUND_FILL)
    }
}

/// Drop backdrop rectangles, keeping document order
pub fn filter_playable(rects: Vec<SourceRect>) -> Vec<SourceRect> {
    rects.into_iter().filter(SourceRect::is_playable).collect()
}

/// Source-to-canvas scale factors, one per axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub scale: f32,
    pub height_scale: f32,
}

impl Default for Scale {
    fn default() -> Self {
        Self {
            scale: 1.0,
            height_scale: 1.0,
        }
    }
}

impl Scale {
    /// Map the rectangles' bounding extent onto `canvas`.
    ///
    /// An empty set keeps the identity scale.
    pub fn fit(rects: &[SourceRect], canvas: Vec2) -> Result<Self, LevelError> {
        if rects.is_empty() {
            return Ok(Self::default());
        }

        let mut max_right = 0.0f32;
        let mut max_bottom = 0.0f32;
        for (index, r) in rects.iter().enumerate() {
            let right = r.x + r.width;
            let bottom = r.y + r.height;
            if !right.is_finite() || !bottom.is_finite() {
                return Err(LevelError::NonFinite { index });
            }
            max_right = max_right.max(right);
            max_bottom = max_bottom.max(bottom);
        }

        if max_right <= 0.0 || max_bottom <= 0.0 {
            return Err(LevelError::DegenerateExtent {
                max_right,
                max_bottom,
            });
        }

        Ok(Self {
            scale: canvas.x / max_right,
            height_scale: canvas.y / max_bottom,
        })
    }

    pub fn apply(&self, r: &SourceRect) -> Rect {
        Rect::new(
            r.x * self.scale,
            r.y * self.height_scale,
            r.width * self.scale,
            r.height * self.height_scale,
        )
    }
}

/// Playable geometry for one level, kept pristine for resets
#[derive(Debug, Clone)]
pub struct Level {
    pub name: String,
    pub scale: Scale,
    pub blocks: Vec<Block>,
}

impl Level {
    /// Filter, rescale and turn source rectangles into blocks
    pub fn build(name: impl Into<String>, rects: Vec<SourceRect>, canvas: Vec2) -> Result<Self, LevelError> {
        let rects = filter_playable(rects);
        let scale = Scale::fit(&rects, canvas)?;

        let blocks = rects
            .into_iter()
            .map(|r| Block {
                rect: scale.apply(&r),
                fill: r.fill,
                title: r.title,
                destroyed: false,
            })
            .collect();

        Ok(Self {
            name: name.into(),
            scale,
            blocks,
        })
    }

    /// Fetch from a source and build
    pub fn load(source: &dyn LevelSource, canvas: Vec2) -> Result<Self, LevelError> {
        let rects = source.fetch()?;
        let level = Self::build(source.name(), rects, canvas)?;
        log::info!(
            "Loaded level {} ({} blocks, scale {:.3}x{:.3})",
            level.name,
            level.blocks.len(),
            level.scale.scale,
            level.scale.height_scale
        );
        Ok(level)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

/// Last path segment of a level location, for the HUD
pub fn display_name(location: &str) -> &str {
    location.rsplit('/').next().unwrap_or(location)
}
