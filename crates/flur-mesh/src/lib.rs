//! CPU triangulation of density lattices into renderable meshes.
#![forbid(unsafe_code)]

use flur_field::DensityField;
use flur_geom::{Aabb, Vec3};
use flur_lattice::{ChunkCoord, ChunkShape, Lattice};

mod tables;

use tables::{CORNER_OFFSET, EDGE_CORNERS, EDGE_TABLE, TRI_TABLE};

/// Gradients shorter than this are treated as flat and fall back to up.
const GRADIENT_EPS: f32 = 1e-6;

/// Triangle buffers for one chunk, laid out for upload: positions and
/// normals are homogeneous vec4 runs (w = 1 for points, 0 for
/// directions), indices are unsigned triples.
#[derive(Default, Clone)]
pub struct MeshBuild {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub idx: Vec<u32>,
}

impl MeshBuild {
    /// Clears all arrays but retains capacity for reuse.
    #[inline]
    pub fn clear_keep_capacity(&mut self) {
        self.pos.clear();
        self.norm.clear();
        self.idx.clear();
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 4
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.idx.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idx.is_empty()
    }

    /// Appends one vertex and returns its index.
    #[inline]
    fn push_vertex(&mut self, p: Vec3, n: Vec3) -> u32 {
        let id = self.vertex_count() as u32;
        self.pos.extend_from_slice(&[p.x, p.y, p.z, 1.0]);
        self.norm.extend_from_slice(&[n.x, n.y, n.z, 0.0]);
        id
    }

    #[inline]
    fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.idx.extend_from_slice(&[a, b, c]);
    }
}

/// Finished mesh for one chunk plus the world placement it was
/// generated at. Never mutated after construction.
#[derive(Clone)]
pub struct ChunkMesh {
    pub coord: ChunkCoord,
    /// World-space origin of the chunk's lattice corner.
    pub origin: (f64, f64),
    pub bbox: Aabb,
    pub build: MeshBuild,
}

impl ChunkMesh {
    /// Bundles finished buffers with the chunk's placement.
    pub fn new(coord: ChunkCoord, shape: &ChunkShape, build: MeshBuild) -> Self {
        let origin = shape.origin_of(coord);
        let bbox = Aabb {
            min: Vec3::new(origin.0 as f32, 0.0, origin.1 as f32),
            max: Vec3::new(
                (origin.0 + shape.size_x) as f32,
                shape.size_y as f32,
                (origin.1 + shape.size_z) as f32,
            ),
        };
        Self {
            coord,
            origin,
            bbox,
            build,
        }
    }
}

/// Crossing parameter along an edge from density `d0` to `d1`. Equal
/// densities place the crossing at the midpoint; otherwise the result
/// is clamped into [0, 1] so the vertex never leaves the edge.
#[inline]
fn interp_t(d0: f64, d1: f64, isolevel: f64) -> f64 {
    if d0 == d1 {
        return 0.5;
    }
    ((isolevel - d0) / (d1 - d0)).clamp(0.0, 1.0)
}

/// Central-difference density deltas at a lattice point, indices
/// clamped at the borders. Left unscaled; normalization happens after
/// the edge lerp.
#[inline]
fn corner_gradient(lat: &Lattice, i: usize, j: usize, k: usize) -> (f64, f64, f64) {
    let (i, j, k) = (i as isize, j as isize, k as isize);
    (
        lat.get_clamped(i + 1, j, k) - lat.get_clamped(i - 1, j, k),
        lat.get_clamped(i, j + 1, k) - lat.get_clamped(i, j - 1, k),
        lat.get_clamped(i, j, k + 1) - lat.get_clamped(i, j, k - 1),
    )
}

/// Normal at an edge crossing: gradients at both endpoints lerped by
/// the crossing parameter, negated so the normal points toward falling
/// density, then normalized. Flat spots fall back to straight up.
fn edge_normal(
    lat: &Lattice,
    a: (usize, usize, usize),
    b: (usize, usize, usize),
    t: f64,
) -> Vec3 {
    let ga = corner_gradient(lat, a.0, a.1, a.2);
    let gb = corner_gradient(lat, b.0, b.1, b.2);
    let n = Vec3::new(
        -(ga.0 + (gb.0 - ga.0) * t) as f32,
        -(ga.1 + (gb.1 - ga.1) * t) as f32,
        -(ga.2 + (gb.2 - ga.2) * t) as f32,
    );
    if n.length() < GRADIENT_EPS {
        Vec3::UP
    } else {
        n.normalized()
    }
}

/// Runs the 256-case cell tables over every lattice cell at
/// `isolevel`, producing unwelded triangle buffers.
///
/// A corner counts as inside where its density is strictly below the
/// isolevel. Each crossed edge of a cell emits one vertex, shared by
/// the triangles of that cell's fan but never across cells. Cells
/// whose corners all fall on one side emit nothing, so a uniform
/// lattice yields an empty (and valid) mesh.
pub fn triangulate(lat: &Lattice, isolevel: f64) -> MeshBuild {
    let mut build = MeshBuild::default();
    let (cells_x, cells_y, cells_z) = (lat.cells_x(), lat.cells_y(), lat.cells_z());
    let mut corner = [0.0f64; 8];
    for j in 0..cells_y {
        for k in 0..cells_z {
            for i in 0..cells_x {
                for (c, &(dx, dy, dz)) in CORNER_OFFSET.iter().enumerate() {
                    corner[c] = lat.get(i + dx, j + dy, k + dz);
                }
                let mut case = 0usize;
                for (c, d) in corner.iter().enumerate() {
                    if *d < isolevel {
                        case |= 1 << c;
                    }
                }
                let crossed = EDGE_TABLE[case];
                if crossed == 0 {
                    continue;
                }

                let mut edge_vertex = [0u32; 12];
                for (e, &(a, b)) in EDGE_CORNERS.iter().enumerate() {
                    if crossed & (1 << e) == 0 {
                        continue;
                    }
                    let (adx, ady, adz) = CORNER_OFFSET[a];
                    let (bdx, bdy, bdz) = CORNER_OFFSET[b];
                    let ca = (i + adx, j + ady, k + adz);
                    let cb = (i + bdx, j + bdy, k + bdz);
                    let t = interp_t(corner[a], corner[b], isolevel);
                    let pa = lat.world_pos(ca.0, ca.1, ca.2);
                    let pb = lat.world_pos(cb.0, cb.1, cb.2);
                    let p = Vec3::new(
                        (pa.0 + (pb.0 - pa.0) * t) as f32,
                        (pa.1 + (pb.1 - pa.1) * t) as f32,
                        (pa.2 + (pb.2 - pa.2) * t) as f32,
                    );
                    let n = edge_normal(lat, ca, cb, t);
                    edge_vertex[e] = build.push_vertex(p, n);
                }

                let fan = &TRI_TABLE[case];
                let mut v = 0;
                while fan[v] >= 0 {
                    build.push_triangle(
                        edge_vertex[fan[v] as usize],
                        edge_vertex[fan[v + 1] as usize],
                        edge_vertex[fan[v + 2] as usize],
                    );
                    v += 3;
                }
            }
        }
    }
    build
}

/// Samples `field` over the chunk at `coord` and triangulates it in
/// one step.
pub fn build_chunk_mesh(
    field: &dyn DensityField,
    coord: ChunkCoord,
    shape: &ChunkShape,
    isolevel: f64,
) -> ChunkMesh {
    let lat = Lattice::from_field(field, coord, shape);
    let build = triangulate(&lat, isolevel);
    ChunkMesh::new(coord, shape, build)
}
