use flur_field::noise;
use flur_field::{DensityField, TerrainField, TerrainParams};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f64> {
    -1.0e4f64..1.0e4f64
}

fn octaves() -> impl Strategy<Value = u32> {
    1u32..=8
}

proptest! {
    #[test]
    fn perlin_deterministic(x in coord(), y in coord(), z in coord()) {
        let a = noise::perlin(x, y, z);
        let b = noise::perlin(x, y, z);
        prop_assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn perlin_in_unit_range(x in coord(), y in coord(), z in coord()) {
        let n = noise::perlin(x, y, z);
        prop_assert!((0.0..=1.0).contains(&n), "perlin out of range: {}", n);
    }

    #[test]
    fn perlin_half_at_integer_lattice(
        x in -100_000i32..100_000,
        y in -100_000i32..100_000,
        z in -100_000i32..100_000,
    ) {
        let n = noise::perlin(f64::from(x), f64::from(y), f64::from(z));
        prop_assert_eq!(n, 0.5);
    }

    #[test]
    fn fbm_in_unit_range(
        x in coord(),
        y in coord(),
        z in coord(),
        o in octaves(),
        p in 0.1f64..1.0,
    ) {
        let n = noise::fbm(x, y, z, o, p);
        prop_assert!((0.0..=1.0).contains(&n), "fbm out of range: {}", n);
    }

    #[test]
    fn terrain_sample_deterministic(x in coord(), y in -50.0f64..100.0, z in coord()) {
        let f = TerrainField::new(TerrainParams::default());
        let a = f.sample(x, y, z);
        let b = f.sample(x, y, z);
        prop_assert_eq!(a.to_bits(), b.to_bits());
    }
}
