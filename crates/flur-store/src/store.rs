//! Resident chunk window: eviction, generation scheduling, lookup.

use std::sync::Arc;
use std::time::Instant;

use hashbrown::{HashMap, HashSet};

use flur_field::DensityField;
use flur_lattice::ChunkCoord;
use flur_mesh::ChunkMesh;

use crate::StreamParams;
use crate::runtime::{GenJob, GenOut, Runtime};

/// Coordinates whose residency changed during one `update` call, in
/// `(cz, cx)` order.
#[derive(Clone, Debug, Default)]
pub struct StreamUpdate {
    pub created: Vec<ChunkCoord>,
    pub evicted: Vec<ChunkCoord>,
}

impl StreamUpdate {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.evicted.is_empty()
    }
}

/// Keeps the square window of generated chunks around the reference
/// point. A chunk is either fully built and resident or absent; moves
/// regenerate only the newly exposed ring.
pub struct ChunkStore {
    params: StreamParams,
    runtime: Runtime,
    resident: HashMap<ChunkCoord, ChunkMesh>,
    center: Option<ChunkCoord>,
    next_job_id: u64,
}

impl ChunkStore {
    pub fn new(field: Arc<dyn DensityField>, params: StreamParams) -> Self {
        let runtime = Runtime::new(field, params.shape, params.isolevel);
        Self {
            params,
            runtime,
            resident: HashMap::new(),
            center: None,
            next_job_id: 0,
        }
    }

    /// Re-centers the window on the reference position, returning once
    /// every newly required chunk is generated and resident. Another
    /// call landing in the same chunk is a no-op.
    pub fn update(&mut self, x: f64, z: f64) -> StreamUpdate {
        let center = self.params.shape.coord_of(x, z);
        if self.center == Some(center) {
            return StreamUpdate::default();
        }
        let t_update = Instant::now();
        log::info!(target: "events", "ViewCenterChanged cc=({}, {})", center.cx, center.cz);

        let window = window_coords(center, self.params.radius);

        let mut evicted: Vec<ChunkCoord> = self
            .resident
            .keys()
            .filter(|c| !window.contains(*c))
            .copied()
            .collect();
        evicted.sort_unstable_by_key(|c| (c.cz, c.cx));
        for c in &evicted {
            self.resident.remove(c);
            log::info!(target: "events", "ChunkEvicted ({}, {})", c.cx, c.cz);
        }

        let mut missing: Vec<ChunkCoord> = window
            .iter()
            .filter(|c| !self.resident.contains_key(*c))
            .copied()
            .collect();
        missing.sort_unstable_by_key(|c| (c.cz, c.cx));

        for &coord in &missing {
            let job_id = self.next_job_id;
            self.next_job_id += 1;
            self.runtime.submit(GenJob { coord, job_id });
        }
        let mut outs: Vec<GenOut> = Vec::with_capacity(missing.len());
        for _ in 0..missing.len() {
            outs.push(self.runtime.recv_result());
        }
        outs.sort_unstable_by_key(|o| (o.coord.cz, o.coord.cx));

        let mut created: Vec<ChunkCoord> = Vec::with_capacity(outs.len());
        for out in outs {
            log::info!(
                target: "perf",
                "sample_ms={} mesh_ms={} total_ms={} cx={} cz={} verts={} job_id={}",
                out.t_sample_ms,
                out.t_mesh_ms,
                out.t_total_ms,
                out.coord.cx,
                out.coord.cz,
                out.mesh.build.vertex_count(),
                out.job_id
            );
            log::info!(target: "events", "ChunkCreated ({}, {})", out.coord.cx, out.coord.cz);
            created.push(out.coord);
            self.resident.insert(out.coord, out.mesh);
        }

        self.center = Some(center);
        let update_ms = t_update.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;
        log::info!(
            target: "perf",
            "update_ms={} created={} evicted={} resident={} cx={} cz={}",
            update_ms,
            created.len(),
            evicted.len(),
            self.resident.len(),
            center.cx,
            center.cz
        );

        StreamUpdate { created, evicted }
    }

    /// Resident chunk lookup; `None` outside the window.
    pub fn get(&self, coord: ChunkCoord) -> Option<&ChunkMesh> {
        self.resident.get(&coord)
    }

    pub fn len(&self) -> usize {
        self.resident.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resident.is_empty()
    }

    pub fn center(&self) -> Option<ChunkCoord> {
        self.center
    }

    pub fn params(&self) -> &StreamParams {
        &self.params
    }

    pub fn workers(&self) -> usize {
        self.runtime.workers
    }
}

fn window_coords(center: ChunkCoord, radius: i32) -> HashSet<ChunkCoord> {
    let side = 2 * radius + 1;
    let mut window = HashSet::with_capacity((side * side) as usize);
    for dz in -radius..=radius {
        for dx in -radius..=radius {
            window.insert(center.offset(dx, dz));
        }
    }
    window
}
