//! Seeded synthetic flame graphs
//!
//! Builds the kind of rectangle stack a profiler's flame graph has: a root
//! frame along the bottom, callees stacked on top of their callers, each
//! child narrower than its parent. Same seed, same level.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{BACKGROUND_FILL, LevelError, LevelSource, SourceRect};

/// Function names used for frame tooltips
const FRAME_NAMES: &[&str] = &[
    "main", "run", "poll", "read", "write", "parse", "alloc", "free", "memcpy", "hash",
    "lookup", "insert", "flush", "send", "recv", "lock", "unlock", "compress", "sort", "encode",
];

/// Generator parameters, in source-document units
#[derive(Debug, Clone)]
pub struct FlameGraphGenerator {
    pub seed: u64,
    /// Document width
    pub width: f32,
    /// Height of one stack frame
    pub frame_height: f32,
    /// Deepest stack
    pub max_depth: u32,
    /// Frames narrower than this are not emitted
    pub min_width: f32,
}

impl FlameGraphGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: 1200.0,
            frame_height: 16.0,
            max_depth: 12,
            min_width: 6.0,
        }
    }

    pub fn with_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Total document height for the configured depth
    pub fn height(&self) -> f32 {
        (self.max_depth as f32 + 1.0) * self.frame_height
    }

    /// Produce the rectangles, backdrop first like a real flame-graph SVG
    pub fn generate(&self) -> Vec<SourceRect> {
        let mut rng = Pcg32::seed_from_u64(self.seed);
        let height = self.height();

        let mut backdrop = SourceRect::new(0.0, 0.0, self.width, height).with_fill(BACKGROUND_FILL);
        backdrop.full_width = true;
        let mut rects = vec![backdrop];

        // Root frame sits on the bottom row
        let root_y = height - self.frame_height;
        let root = SourceRect::new(0.0, root_y, self.width, self.frame_height)
            .with_fill(hot_color(&mut rng))
            .with_title("all");
        rects.push(root);

        self.grow(&mut rng, &mut rects, 0.0, self.width, root_y, 1);
        rects
    }

    /// Stack callees on top of the caller spanning `[x, x + width)`
    fn grow(&self, rng: &mut Pcg32, rects: &mut Vec<SourceRect>, x: f32, width: f32, caller_y: f32, depth: u32) {
        if depth > self.max_depth {
            return;
        }

        let y = caller_y - self.frame_height;
        let children = rng.random_range(1..=4u32);
        // Share of the caller's width spent in callees
        let used = width * rng.random_range(0.5..0.95f32);

        let mut weights: Vec<f32> = (0..children).map(|_| rng.random_range(0.2..1.0f32)).collect();
        let total: f32 = weights.iter().sum();
        for w in &mut weights {
            *w = *w / total * used;
        }

        let mut cursor = x;
        for child_width in weights {
            if child_width >= self.min_width {
                let name = FRAME_NAMES[rng.random_range(0..FRAME_NAMES.len())];
                rects.push(
                    SourceRect::new(cursor, y, child_width, self.frame_height - 1.0)
                        .with_fill(hot_color(rng))
                        .with_title(name),
                );
                // Thin out deeper stacks
                if rng.random_bool(0.8) {
                    self.grow(rng, rects, cursor, child_width, y, depth + 1);
                }
            }
            cursor += child_width;
        }
    }
}

impl LevelSource for FlameGraphGenerator {
    fn name(&self) -> String {
        format!("generated-{}", self.seed)
    }

    fn fetch(&self) -> Result<Vec<SourceRect>, LevelError> {
        Ok(self.generate())
    }
}

/// Classic flame-graph "hot" palette
fn hot_color(rng: &mut Pcg32) -> String {
    let r = 205 + rng.random_range(0..50u32);
    let g = rng.random_range(0..230u32);
    let b = rng.random_range(0..55u32);
    format!("rgb({},{},{})", r, g, b)
}
