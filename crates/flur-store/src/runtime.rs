//! Worker pool and channels for off-thread chunk generation.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, unbounded};
use rayon::{ThreadPool, ThreadPoolBuilder};

use flur_field::DensityField;
use flur_lattice::{ChunkCoord, ChunkShape, Lattice};
use flur_mesh::{ChunkMesh, triangulate};

/// One chunk generation request.
#[derive(Clone, Copy, Debug)]
pub struct GenJob {
    pub coord: ChunkCoord,
    pub job_id: u64,
}

/// Finished chunk plus per-stage timings.
pub struct GenOut {
    pub coord: ChunkCoord,
    pub job_id: u64,
    pub mesh: ChunkMesh,
    pub t_sample_ms: u32,
    pub t_mesh_ms: u32,
    pub t_total_ms: u32,
}

/// Generation pool shared by one stream: jobs go in over a channel,
/// finished chunks come back in completion order.
pub struct Runtime {
    job_tx: Sender<GenJob>,
    res_rx: Receiver<GenOut>,
    _gen_pool: Arc<ThreadPool>,
    queued: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
    pub workers: usize,
}

impl Runtime {
    pub fn new(field: Arc<dyn DensityField>, shape: ChunkShape, isolevel: f64) -> Self {
        let (job_tx, job_rx) = unbounded::<GenJob>();
        let (res_tx, res_rx) = unbounded::<GenOut>();

        let workers: usize = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(8);

        let queued_ctr = Arc::new(AtomicUsize::new(0));
        let inflight_ctr = Arc::new(AtomicUsize::new(0));

        let pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("flur-gen-{i}"))
                .build()
                .expect("gen pool"),
        );
        for _ in 0..workers {
            let rx = job_rx.clone();
            let tx = res_tx.clone();
            let field = field.clone();
            let queued = queued_ctr.clone();
            let inflight = inflight_ctr.clone();
            pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    queued.fetch_sub(1, Ordering::Relaxed);
                    inflight.fetch_add(1, Ordering::Relaxed);
                    process_gen_job(job, field.as_ref(), &shape, isolevel, &tx);
                    inflight.fetch_sub(1, Ordering::Relaxed);
                }
            });
        }

        Self {
            job_tx,
            res_rx,
            _gen_pool: pool,
            queued: queued_ctr,
            inflight: inflight_ctr,
            workers,
        }
    }

    pub fn submit(&self, job: GenJob) {
        self.queued.fetch_add(1, Ordering::Relaxed);
        if self.job_tx.send(job).is_err() {
            self.queued.fetch_sub(1, Ordering::Relaxed);
        }
    }

    /// Blocks for the next finished chunk. Panics if the workers are
    /// gone; callers never see a partial window.
    pub fn recv_result(&self) -> GenOut {
        self.res_rx.recv().expect("gen workers disconnected")
    }

    /// Drains any finished chunks without blocking.
    pub fn drain_results(&self) -> Vec<GenOut> {
        self.res_rx.try_iter().collect()
    }

    pub fn queue_debug_counts(&self) -> (usize, usize) {
        (
            self.queued.load(Ordering::Relaxed),
            self.inflight.load(Ordering::Relaxed),
        )
    }
}

fn process_gen_job(
    job: GenJob,
    field: &dyn DensityField,
    shape: &ChunkShape,
    isolevel: f64,
    tx: &Sender<GenOut>,
) {
    let t_job_start = Instant::now();

    let t0 = Instant::now();
    let lat = Lattice::from_field(field, job.coord, shape);
    let t_sample_ms = t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;

    let t0 = Instant::now();
    let build = triangulate(&lat, isolevel);
    let t_mesh_ms = t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;

    let mesh = ChunkMesh::new(job.coord, shape, build);
    let t_total_ms = t_job_start.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;
    let _ = tx.send(GenOut {
        coord: job.coord,
        job_id: job.job_id,
        mesh,
        t_sample_ms,
        t_mesh_ms,
        t_total_ms,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use flur_field::Sphere;

    fn test_shape() -> ChunkShape {
        ChunkShape {
            size_x: 4.0,
            size_y: 4.0,
            size_z: 4.0,
            spacing: 1.0,
            guard: 2,
        }
    }

    #[test]
    fn submitted_jobs_come_back_with_matching_ids() {
        let rt = Runtime::new(Arc::new(Sphere::new(3.0)), test_shape(), 0.0);
        rt.submit(GenJob {
            coord: ChunkCoord::new(0, 0),
            job_id: 7,
        });
        let out = rt.recv_result();
        assert_eq!(out.job_id, 7);
        assert_eq!(out.coord, ChunkCoord::new(0, 0));
        assert!(!out.mesh.build.is_empty());
        let (queued, _) = rt.queue_debug_counts();
        assert_eq!(queued, 0);
    }

    #[test]
    fn drain_returns_everything_submitted() {
        let rt = Runtime::new(Arc::new(Sphere::new(3.0)), test_shape(), 0.0);
        for job_id in 0..4 {
            rt.submit(GenJob {
                coord: ChunkCoord::new(job_id as i32, 0),
                job_id,
            });
        }
        let mut outs = Vec::new();
        while outs.len() < 4 {
            outs.push(rt.recv_result());
        }
        assert!(rt.drain_results().is_empty());
        let mut ids: Vec<u64> = outs.iter().map(|o| o.job_id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }
}
