//! Chunk coordinates, chunk sizing, and density sample lattices.
#![forbid(unsafe_code)]

use flur_field::DensityField;
use serde::{Deserialize, Serialize};

/// Horizontal chunk grid cell. Chunks tile the xz plane; the vertical
/// axis is bounded and never chunked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cz: self.cz + dz,
        }
    }

    #[inline]
    pub fn distance_sq(self, other: ChunkCoord) -> i64 {
        let dx = i64::from(self.cx - other.cx);
        let dz = i64::from(self.cz - other.cz);
        dx * dx + dz * dz
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkCoord> for (i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cz)
    }
}

/// World-space sizing of one chunk and its sample lattice.
///
/// `guard` extra sample columns extend past the nominal extent on the
/// positive x and z sides so boundary cells keep full corner
/// neighborhoods and gradient reach without touching a neighbor chunk.
#[derive(Clone, Copy, Debug)]
pub struct ChunkShape {
    pub size_x: f64,
    pub size_y: f64,
    pub size_z: f64,
    pub spacing: f64,
    pub guard: usize,
}

impl ChunkShape {
    /// Triangulated cell counts along x/z; one chunk covers exactly
    /// this many cells so adjacent chunks tile without overlap.
    #[inline]
    pub fn cells_x(&self) -> usize {
        (self.size_x / self.spacing).round() as usize
    }

    #[inline]
    pub fn cells_z(&self) -> usize {
        (self.size_z / self.spacing).round() as usize
    }

    /// Lattice point counts, guard included on x/z.
    #[inline]
    pub fn points_x(&self) -> usize {
        self.cells_x() + self.guard
    }

    #[inline]
    pub fn points_y(&self) -> usize {
        (self.size_y / self.spacing).round() as usize
    }

    #[inline]
    pub fn points_z(&self) -> usize {
        self.cells_z() + self.guard
    }

    #[inline]
    pub fn origin_of(&self, coord: ChunkCoord) -> (f64, f64) {
        (
            f64::from(coord.cx) * self.size_x,
            f64::from(coord.cz) * self.size_z,
        )
    }

    /// Chunk containing the given horizontal world position.
    #[inline]
    pub fn coord_of(&self, x: f64, z: f64) -> ChunkCoord {
        ChunkCoord::new(
            (x / self.size_x).floor() as i32,
            (z / self.size_z).floor() as i32,
        )
    }
}

/// Density samples for one chunk on a regular grid, consumed by the
/// triangulator and then dropped.
#[derive(Clone, Debug)]
pub struct Lattice {
    pub coord: ChunkCoord,
    /// Point counts per axis, guard included on x/z.
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    pub spacing: f64,
    pub guard: usize,
    /// World-space origin of sample (0, 0, 0).
    pub origin: (f64, f64),
    pub samples: Vec<f64>,
}

impl Lattice {
    #[inline]
    pub fn idx(&self, i: usize, j: usize, k: usize) -> usize {
        (j * self.nz + k) * self.nx + i
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize) -> f64 {
        self.samples[self.idx(i, j, k)]
    }

    /// Sample with indices clamped to the lattice borders, for gradient
    /// estimation at the edges.
    #[inline]
    pub fn get_clamped(&self, i: isize, j: isize, k: isize) -> f64 {
        let i = i.clamp(0, self.nx as isize - 1) as usize;
        let j = j.clamp(0, self.ny as isize - 1) as usize;
        let k = k.clamp(0, self.nz as isize - 1) as usize;
        self.get(i, j, k)
    }

    #[inline]
    pub fn world_pos(&self, i: usize, j: usize, k: usize) -> (f64, f64, f64) {
        (
            self.origin.0 + i as f64 * self.spacing,
            j as f64 * self.spacing,
            self.origin.1 + k as f64 * self.spacing,
        )
    }

    /// Cells the triangulator walks along x. With a guard this stops at
    /// the chunk's nominal extent; without one it walks the whole array.
    #[inline]
    pub fn cells_x(&self) -> usize {
        self.nx.saturating_sub(self.guard.max(1))
    }

    #[inline]
    pub fn cells_y(&self) -> usize {
        self.ny.saturating_sub(1)
    }

    #[inline]
    pub fn cells_z(&self) -> usize {
        self.nz.saturating_sub(self.guard.max(1))
    }

    /// Sample `field` over the chunk at `coord`, producing the full
    /// guarded lattice.
    pub fn from_field(field: &dyn DensityField, coord: ChunkCoord, shape: &ChunkShape) -> Self {
        let nx = shape.points_x();
        let ny = shape.points_y();
        let nz = shape.points_z();
        let spacing = shape.spacing;
        let origin = shape.origin_of(coord);
        let mut samples = Vec::with_capacity(nx * ny * nz);
        for j in 0..ny {
            let y = j as f64 * spacing;
            for k in 0..nz {
                let z = origin.1 + k as f64 * spacing;
                for i in 0..nx {
                    let x = origin.0 + i as f64 * spacing;
                    samples.push(field.sample(x, y, z));
                }
            }
        }
        Lattice {
            coord,
            nx,
            ny,
            nz,
            spacing,
            guard: shape.guard,
            origin,
            samples,
        }
    }

    /// Build from raw samples; the vector is padded or truncated to the
    /// expected length.
    pub fn from_samples(
        coord: ChunkCoord,
        nx: usize,
        ny: usize,
        nz: usize,
        spacing: f64,
        guard: usize,
        origin: (f64, f64),
        samples: Vec<f64>,
    ) -> Self {
        let mut s = samples;
        let expect = nx * ny * nz;
        if s.len() != expect {
            s.resize(expect, 0.0);
        }
        Lattice {
            coord,
            nx,
            ny,
            nz,
            spacing,
            guard,
            origin,
            samples: s,
        }
    }
}
