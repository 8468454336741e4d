use flur_field::Sphere;
use flur_lattice::{ChunkCoord, ChunkShape, Lattice};
use proptest::prelude::*;

fn dim() -> impl Strategy<Value = usize> {
    1usize..=8
}

fn small_i32() -> impl Strategy<Value = i32> {
    -1_000_000i32..=1_000_000
}

proptest! {
    // idx maps each (i,j,k) within bounds to a unique in-range index
    #[test]
    fn idx_is_unique_and_in_range(nx in dim(), ny in dim(), nz in dim()) {
        let expect = nx * ny * nz;
        let lat = Lattice::from_samples(
            ChunkCoord::new(0, 0), nx, ny, nz, 1.0, 0, (0.0, 0.0), vec![0.0; expect],
        );

        let mut seen = vec![false; expect];
        for j in 0..ny { for k in 0..nz { for i in 0..nx {
            let idx = lat.idx(i, j, k);
            prop_assert!(idx < expect);
            prop_assert!(!seen[idx]);
            seen[idx] = true;
        }}}
        prop_assert!(seen.into_iter().all(|b| b));
    }

    // get_clamped agrees with get everywhere inside the lattice
    #[test]
    fn clamped_matches_get_inside(nx in dim(), ny in dim(), nz in dim()) {
        let expect = nx * ny * nz;
        let samples = (0..expect).map(|i| i as f64 * 0.5).collect();
        let lat = Lattice::from_samples(
            ChunkCoord::new(0, 0), nx, ny, nz, 1.0, 0, (0.0, 0.0), samples,
        );
        for j in 0..ny { for k in 0..nz { for i in 0..nx {
            prop_assert_eq!(
                lat.get_clamped(i as isize, j as isize, k as isize),
                lat.get(i, j, k)
            );
        }}}
    }

    // get_clamped outside the lattice equals the nearest border sample
    #[test]
    fn clamped_projects_to_borders(nx in dim(), ny in dim(), nz in dim(), over in 1isize..=4) {
        let expect = nx * ny * nz;
        let samples = (0..expect).map(|i| i as f64).collect();
        let lat = Lattice::from_samples(
            ChunkCoord::new(0, 0), nx, ny, nz, 1.0, 0, (0.0, 0.0), samples,
        );
        prop_assert_eq!(lat.get_clamped(-over, 0, 0), lat.get(0, 0, 0));
        prop_assert_eq!(
            lat.get_clamped(nx as isize - 1 + over, ny as isize - 1 + over, nz as isize - 1 + over),
            lat.get(nx - 1, ny - 1, nz - 1)
        );
    }

    // Chunk origin maps back to the same coordinate for any point inside
    #[test]
    fn coord_of_origin_roundtrip(cx in small_i32(), cz in small_i32(), fx in 0.0f64..1.0, fz in 0.0f64..1.0) {
        let shape = ChunkShape {
            size_x: 16.0,
            size_y: 20.0,
            size_z: 16.0,
            spacing: 0.5,
            guard: 3,
        };
        let coord = ChunkCoord::new(cx, cz);
        let (ox, oz) = shape.origin_of(coord);
        let inside = shape.coord_of(ox + fx * shape.size_x * 0.999, oz + fz * shape.size_z * 0.999);
        prop_assert_eq!(inside, coord);
    }

    // Sampling the same chunk twice is bit-identical
    #[test]
    fn from_field_deterministic(cx in -50i32..=50, cz in -50i32..=50) {
        let shape = ChunkShape {
            size_x: 4.0,
            size_y: 4.0,
            size_z: 4.0,
            spacing: 1.0,
            guard: 2,
        };
        let field = Sphere::new(40.0);
        let a = Lattice::from_field(&field, ChunkCoord::new(cx, cz), &shape);
        let b = Lattice::from_field(&field, ChunkCoord::new(cx, cz), &shape);
        prop_assert_eq!(a.samples.len(), b.samples.len());
        for (sa, sb) in a.samples.iter().zip(b.samples.iter()) {
            prop_assert_eq!(sa.to_bits(), sb.to_bits());
        }
    }
}
