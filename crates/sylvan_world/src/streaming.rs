//! # Streaming Window
//!
//! Keeps the right set of chunks resident around the camera.
//!
//! Each `reconcile(camera_x)`:
//!
//! 1. computes the camera chunk `c = floor(camera_x / chunk_width)`
//! 2. generates every missing index in `[c - lookback, c + generate_ahead]`
//! 3. evicts every index with `|i - c| > retention_radius`
//!
//! Work per call is bounded by `lookback + generate_ahead + 1` generations,
//! no matter how far the camera jumped. Chunks skipped over by a jump are
//! never generated.

use std::collections::BTreeMap;

use crate::chunk::{Chunk, ChunkGenerator, ChunkIndex};
use crate::config::WindowConfig;

/// Session statistics for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamingStats {
    /// Chunks generated since start-up.
    pub generated_this_session: u64,
    /// Chunks evicted since start-up.
    pub evicted_this_session: u64,
    /// Reconcile calls skipped because of a non-finite camera position.
    pub skipped_reconciles: u64,
}

/// What a single reconcile call changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Camera chunk the window was centred on.
    pub current: ChunkIndex,
    /// Chunks generated by this call.
    pub generated: u32,
    /// Chunks evicted by this call.
    pub evicted: u32,
}

/// Owns the resident chunks and the generator that fills them.
pub struct StreamingWindow {
    chunks: BTreeMap<ChunkIndex, Chunk>,
    generator: ChunkGenerator,
    window: WindowConfig,
    current: Option<ChunkIndex>,
    stats: StreamingStats,
}

impl StreamingWindow {
    /// Creates an empty window. Nothing is generated until the first reconcile.
    #[must_use]
    pub fn new(generator: ChunkGenerator, window: WindowConfig) -> Self {
        Self {
            chunks: BTreeMap::new(),
            generator,
            window,
            current: None,
            stats: StreamingStats::default(),
        }
    }

    /// Brings the resident set in line with the camera position.
    ///
    /// Returns `None` and leaves every chunk untouched when `camera_x` is
    /// not finite; play continues on the previous window.
    pub fn reconcile(&mut self, camera_x: f64) -> Option<ReconcileReport> {
        if !camera_x.is_finite() {
            self.stats.skipped_reconciles += 1;
            tracing::warn!("Invalid camera position {}, skipping chunk reconcile", camera_x);
            return None;
        }

        let current = ChunkIndex::from_world_x(camera_x, self.generator.chunk_width());
        self.current = Some(current);

        let behind = -i64::from(self.window.lookback);
        let ahead = i64::from(self.window.generate_ahead);
        let mut generated = 0;
        for offset in behind..=ahead {
            let index = current.offset(offset);
            if !self.chunks.contains_key(&index) {
                let chunk = self.generator.generate(index);
                self.chunks.insert(index, chunk);
                generated += 1;
            }
        }

        let radius = u64::from(self.window.retention_radius);
        let before = self.chunks.len();
        self.chunks.retain(|index, _| {
            let keep = index.distance(current) <= radius;
            if !keep {
                tracing::trace!("Evicting chunk {} (camera chunk {})", index, current);
            }
            keep
        });
        #[allow(clippy::cast_possible_truncation)]
        let evicted = (before - self.chunks.len()) as u32;

        self.stats.generated_this_session += u64::from(generated);
        self.stats.evicted_this_session += u64::from(evicted);
        if evicted > 0 {
            tracing::debug!(
                "Evicted {} chunks around camera chunk {}, {} resident",
                evicted,
                current,
                self.chunks.len()
            );
        }

        Some(ReconcileReport {
            current,
            generated,
            evicted,
        })
    }

    /// Resident chunks, ascending by index.
    pub fn active_chunks(&self) -> impl Iterator<Item = &Chunk> + '_ {
        self.chunks.values()
    }

    /// Resident chunk indices, ascending.
    pub fn active_indices(&self) -> impl Iterator<Item = ChunkIndex> + '_ {
        self.chunks.keys().copied()
    }

    /// Looks up a resident chunk.
    #[must_use]
    pub fn chunk(&self, index: ChunkIndex) -> Option<&Chunk> {
        self.chunks.get(&index)
    }

    /// Returns true if the chunk is resident.
    #[must_use]
    pub fn contains(&self, index: ChunkIndex) -> bool {
        self.chunks.contains_key(&index)
    }

    /// Number of resident chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns true if nothing is resident.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Total placed objects across resident chunks.
    #[must_use]
    pub fn total_objects(&self) -> usize {
        self.chunks.values().map(Chunk::object_count).sum()
    }

    /// Camera chunk of the last applied reconcile.
    #[must_use]
    pub const fn current_index(&self) -> Option<ChunkIndex> {
        self.current
    }

    /// Session statistics.
    #[must_use]
    pub const fn stats(&self) -> StreamingStats {
        self.stats
    }

    /// The generator filling this window.
    #[must_use]
    pub fn generator(&self) -> &ChunkGenerator {
        &self.generator
    }
}
