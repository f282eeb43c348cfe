//! Where level rectangles come from

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::svg::SvgLevelFile;
use super::{LevelError, SourceRect, display_name};

/// Something that can produce flame-graph rectangles on demand
pub trait LevelSource {
    /// Name shown in the HUD
    fn name(&self) -> String;

    /// Rectangles in document order, unscaled and unfiltered
    fn fetch(&self) -> Result<Vec<SourceRect>, LevelError>;
}

/// On-disk level format: the rectangles extracted from a flame-graph SVG
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelDocument {
    #[serde(default)]
    pub name: Option<String>,
    pub rects: Vec<SourceRect>,
}

impl LevelDocument {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A level stored as a JSON [`LevelDocument`]
#[derive(Debug, Clone)]
pub struct JsonLevelFile {
    path: PathBuf,
}

impl JsonLevelFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<LevelDocument, LevelError> {
        let json = fs::read_to_string(&self.path).map_err(|source| LevelError::Io {
            path: self.path.clone(),
            source,
        })?;
        LevelDocument::from_json(&json)
    }
}

impl LevelSource for JsonLevelFile {
    fn name(&self) -> String {
        let location = self.path.to_string_lossy();
        display_name(&location).to_string()
    }

    fn fetch(&self) -> Result<Vec<SourceRect>, LevelError> {
        let doc = self.read()?;
        log::debug!("Read {} rects from {}", doc.rects.len(), self.path.display());
        Ok(doc.rects)
    }
}

/// Open a level file by extension: `.svg` is read as a flame graph, anything
/// else as a JSON [`LevelDocument`]
pub fn open_file(path: impl Into<PathBuf>) -> Box<dyn LevelSource> {
    let path = path.into();
    let is_svg = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    if is_svg {
        Box::new(SvgLevelFile::new(path))
    } else {
        Box::new(JsonLevelFile::new(path))
    }
}

/// Rectangles already in memory (an uploaded document, tests)
#[derive(Debug, Clone)]
pub struct StaticLevel {
    pub name: String,
    pub rects: Vec<SourceRect>,
}

impl StaticLevel {
    pub fn new(name: impl Into<String>, rects: Vec<SourceRect>) -> Self {
        Self {
            name: name.into(),
            rects,
        }
    }
}

impl From<LevelDocument> for StaticLevel {
    fn from(doc: LevelDocument) -> Self {
        Self::new(doc.name.unwrap_or_else(|| "untitled".to_string()), doc.rects)
    }
}

impl LevelSource for StaticLevel {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn fetch(&self) -> Result<Vec<SourceRect>, LevelError> {
        Ok(self.rects.clone())
    }
}
