//! Bundled level list and "surprise me" selection

use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;

use super::svg::RemoteLevel;
use super::{LevelError, display_name};

/// Where the bundled demo flame graphs are served from
pub const DEMO_BASE_URL: &str = "https://raw.githubusercontent.com/brendangregg/FlameGraph/refs/heads/master/demos/";

/// Brendan Gregg's demo flame graphs, the built-in "surprise me" levels
pub const DEMO_LEVELS: &[&str] = &[
    "brkbytes-mysql.svg",
    "cpu-illumos-syscalls.svg",
    "cpu-ipnet-diff.svg",
    "cpu-mixedmode-flamegraph-java.svg",
    "cpu-qemu-both.svg",
    "io-gzip.svg",
    "off-bash.svg",
    "palette-example-broken.svg",
    "cpu-grep.svg",
    "cpu-illumos-tcpfuse.svg",
    "cpu-linux-tar.svg",
    "cpu-mysql-filt.svg",
    "io-mysql.svg",
    "off-mysql-busy.svg",
    "palette-example-working.svg",
    "cpu-illumos-ipdce.svg",
    "cpu-iozone.svg",
    "cpu-linux-tcpsend.svg",
    "cpu-mysql.svg",
    "hotcold-kernelthread.svg",
    "mallocbytes-bash.svg",
    "off-mysql-idle.svg",
];

/// A demo level by file name
pub fn demo_level(name: &str) -> Result<RemoteLevel, LevelError> {
    DEMO_LEVELS
        .iter()
        .find(|&&demo| demo == name)
        .map(|demo| RemoteLevel::new(format!("{DEMO_BASE_URL}{demo}")))
        .ok_or_else(|| LevelError::NotFound(name.to_string()))
}

/// Any demo level at random
pub fn pick_demo<R: Rng>(rng: &mut R) -> RemoteLevel {
    let demo = DEMO_LEVELS[rng.random_range(0..DEMO_LEVELS.len())];
    RemoteLevel::new(format!("{DEMO_BASE_URL}{demo}"))
}

/// A set of level files to choose from
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<PathBuf>,
}

impl Catalog {
    pub fn new(entries: Vec<PathBuf>) -> Self {
        Self { entries }
    }

    /// Every `.json` and `.svg` file in `dir`, sorted by name
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, LevelError> {
        let dir = dir.as_ref();
        let read = fs::read_dir(dir).map_err(|source| LevelError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut entries: Vec<PathBuf> = read
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json") || ext.eq_ignore_ascii_case("svg"))
            })
            .collect();
        entries.sort();

        log::info!("Found {} levels in {}", entries.len(), dir.display());
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Look a level up by its display name
    pub fn find(&self, name: &str) -> Result<&Path, LevelError> {
        self.entries
            .iter()
            .find(|p| display_name(&p.to_string_lossy()) == name)
            .map(PathBuf::as_path)
            .ok_or_else(|| LevelError::NotFound(name.to_string()))
    }

    /// Pick any level at random
    pub fn pick_random<R: Rng>(&self, rng: &mut R) -> Option<&Path> {
        if self.entries.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.entries.len());
        Some(&self.entries[index])
    }
}
