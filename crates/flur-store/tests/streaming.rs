use std::sync::Arc;

use flur_field::Sphere;
use flur_lattice::{ChunkCoord, ChunkShape};
use flur_store::{ChunkStore, StreamParams};

fn small_params(radius: i32) -> StreamParams {
    StreamParams {
        shape: ChunkShape {
            size_x: 4.0,
            size_y: 4.0,
            size_z: 4.0,
            spacing: 1.0,
            guard: 2,
        },
        radius,
        isolevel: 0.0,
    }
}

fn sphere_store(radius: i32) -> ChunkStore {
    ChunkStore::new(Arc::new(Sphere::new(3.0)), small_params(radius))
}

fn by_row(coords: &[ChunkCoord]) -> Vec<ChunkCoord> {
    let mut sorted = coords.to_vec();
    sorted.sort_unstable_by_key(|c| (c.cz, c.cx));
    sorted
}

#[test]
fn first_update_populates_the_window() {
    let mut store = sphere_store(2);
    let up = store.update(0.0, 0.0);
    assert_eq!(up.created.len(), 25);
    assert!(up.evicted.is_empty());
    assert_eq!(store.len(), 25);
    assert_eq!(store.center(), Some(ChunkCoord::new(0, 0)));
    assert_eq!(up.created, by_row(&up.created));
    assert_eq!(up.created.first().copied(), Some(ChunkCoord::new(-2, -2)));
    assert_eq!(up.created.last().copied(), Some(ChunkCoord::new(2, 2)));
    assert!(store.get(ChunkCoord::new(0, 0)).is_some());
}

#[test]
fn same_cell_update_is_a_noop() {
    let mut store = sphere_store(1);
    store.update(0.5, 0.5);
    // Same position and a different position in the same chunk.
    assert!(store.update(0.5, 0.5).is_empty());
    assert!(store.update(3.9, 2.0).is_empty());
    assert_eq!(store.len(), 9);
}

#[test]
fn column_shift_swaps_one_edge() {
    let mut store = sphere_store(2);
    store.update(0.0, 0.0);
    let up = store.update(4.0, 0.0);
    let want_created: Vec<ChunkCoord> = (-2..=2).map(|cz| ChunkCoord::new(3, cz)).collect();
    let want_evicted: Vec<ChunkCoord> = (-2..=2).map(|cz| ChunkCoord::new(-2, cz)).collect();
    assert_eq!(up.created, want_created);
    assert_eq!(up.evicted, want_evicted);
    assert_eq!(store.len(), 25);
    assert_eq!(store.center(), Some(ChunkCoord::new(1, 0)));
}

#[test]
fn diagonal_shift_swaps_an_ell() {
    let mut store = sphere_store(2);
    store.update(0.0, 0.0);
    let up = store.update(4.0, 4.0);
    assert_eq!(up.created.len(), 9);
    assert_eq!(up.evicted.len(), 9);
    assert_eq!(store.len(), 25);
    assert!(up.created.contains(&ChunkCoord::new(3, 3)));
    assert!(up.evicted.contains(&ChunkCoord::new(-2, -2)));
    for c in &up.created {
        assert!(c.cx == 3 || c.cz == 3, "unexpected created chunk ({}, {})", c.cx, c.cz);
    }
    for c in &up.evicted {
        assert!(c.cx == -2 || c.cz == -2, "unexpected evicted chunk ({}, {})", c.cx, c.cz);
    }
}

#[test]
fn get_misses_outside_the_window() {
    let mut store = sphere_store(1);
    store.update(0.0, 0.0);
    assert!(store.get(ChunkCoord::new(1, 1)).is_some());
    assert!(store.get(ChunkCoord::new(2, 0)).is_none());
    assert!(store.get(ChunkCoord::new(5, 5)).is_none());
}

#[test]
fn evict_then_recreate_is_bit_identical() {
    let mut store = sphere_store(1);
    store.update(0.0, 0.0);
    let first = store
        .get(ChunkCoord::new(0, 0))
        .expect("chunk resident")
        .build
        .clone();
    assert!(!first.is_empty());

    // Walk far enough that the origin chunk leaves the window, then
    // come back; the pure field regenerates it exactly.
    let up = store.update(40.0, 0.0);
    assert!(up.evicted.contains(&ChunkCoord::new(0, 0)));
    assert!(store.get(ChunkCoord::new(0, 0)).is_none());
    store.update(0.0, 0.0);
    let second = store.get(ChunkCoord::new(0, 0)).expect("chunk resident");

    let bits = |v: &[f32]| v.iter().map(|f| f.to_bits()).collect::<Vec<u32>>();
    assert_eq!(bits(&first.pos), bits(&second.build.pos));
    assert_eq!(bits(&first.norm), bits(&second.build.norm));
    assert_eq!(first.idx, second.build.idx);
}

#[test]
fn radius_zero_keeps_one_chunk() {
    let mut store = sphere_store(0);
    let up = store.update(0.0, 0.0);
    assert_eq!(up.created, vec![ChunkCoord::new(0, 0)]);
    let up = store.update(-0.1, 0.0);
    assert_eq!(up.created, vec![ChunkCoord::new(-1, 0)]);
    assert_eq!(up.evicted, vec![ChunkCoord::new(0, 0)]);
    assert_eq!(store.len(), 1);
}

#[test]
fn negative_positions_floor_to_chunks() {
    let mut store = sphere_store(1);
    let up = store.update(-5.0, -5.0);
    assert_eq!(store.center(), Some(ChunkCoord::new(-2, -2)));
    assert_eq!(up.created.len(), 9);
    assert!(store.get(ChunkCoord::new(-3, -3)).is_some());
    assert!(store.get(ChunkCoord::new(-1, -1)).is_some());
    assert!(store.get(ChunkCoord::new(0, 0)).is_none());
}

#[test]
fn far_chunks_are_resident_but_empty() {
    let mut store = sphere_store(1);
    store.update(40.0, 40.0);
    // The sphere is nowhere near; the window is still fully resident.
    assert_eq!(store.len(), 9);
    let mesh = store.get(ChunkCoord::new(10, 10)).expect("chunk resident");
    assert!(mesh.build.is_empty());
}
