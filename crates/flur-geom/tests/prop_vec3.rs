use flur_geom::Vec3;
use proptest::num::f32::NORMAL;
use proptest::prelude::*;
use proptest::strategy::Strategy;

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn vapprox(a: Vec3, b: Vec3, eps: f32) -> bool {
    approx(a.x, b.x, eps) && approx(a.y, b.y, eps) && approx(a.z, b.z, eps)
}

fn approx_zero_scaled(val: f32, scale: f32, atol: f32, rtol: f32) -> bool {
    val.abs() <= atol + rtol * scale
}

fn bounded_f32() -> impl Strategy<Value = f32> {
    NORMAL.prop_filter("bounded", |v| v.is_finite() && v.abs() <= 1e6)
}

fn bounded_nonzero_f32() -> impl Strategy<Value = f32> {
    NORMAL.prop_filter("bounded_nonzero", |v| {
        v.is_finite() && {
            let a = v.abs();
            a >= 1e-6 && a <= 1e6
        }
    })
}

fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (bounded_f32(), bounded_f32(), bounded_f32()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn arb_nondegenerate_vec3() -> impl Strategy<Value = Vec3> {
    (
        bounded_nonzero_f32(),
        bounded_nonzero_f32(),
        bounded_nonzero_f32(),
    )
        .prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    // a + b == b + a element-wise
    #[test]
    fn vec3_add_commutative(
        a in arb_vec3(),
        b in arb_vec3(),
    ) {
        prop_assert!(vapprox(a + b, b + a, 1e-5));
    }

    // a·(a×b) = 0 and b·(a×b) = 0
    #[test]
    fn vec3_cross_orthogonal(
        a in arb_nondegenerate_vec3(),
        b in arb_nondegenerate_vec3(),
    ) {
        let c = a.cross(b);
        let scale_a = a.length() * c.length();
        let scale_b = b.length() * c.length();
        prop_assert!(approx_zero_scaled(a.dot(c), scale_a, 1e-6, 1e-5));
        prop_assert!(approx_zero_scaled(b.dot(c), scale_b, 1e-6, 1e-5));
    }

    // a×b + b×a ≈ 0
    #[test]
    fn vec3_cross_anticommutative(
        a in arb_vec3(),
        b in arb_vec3(),
    ) {
        let sum = a.cross(b) + b.cross(a);
        prop_assert!(vapprox(sum, Vec3::ZERO, 1e-3));
    }

    // |normalize(v)| = 1 for non-zero input
    #[test]
    fn vec3_normalized_length(
        v in arb_nondegenerate_vec3(),
    ) {
        let n = v.normalized();
        prop_assert!(approx(n.length(), 1.0, 1e-3));
    }

    // -(-v) == v and v + (-v) == 0
    #[test]
    fn vec3_neg_involution(
        v in arb_vec3(),
    ) {
        prop_assert!(vapprox(-(-v), v, 1e-6));
        prop_assert!(vapprox(v + (-v), Vec3::ZERO, 1e-6));
    }

    // |a·b| <= |a||b|
    #[test]
    fn vec3_cauchy_schwarz(
        a in arb_vec3(),
        b in arb_vec3(),
    ) {
        let lhs = a.dot(b).abs();
        let rhs = a.length() * b.length();
        prop_assert!(lhs <= rhs + 1e-6 + 1e-5 * rhs.max(1.0));
    }
}
