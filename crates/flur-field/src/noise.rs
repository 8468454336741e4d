//! Perlin improved noise with a fixed permutation table.

/// Ken Perlin's reference permutation, repeated once so corner hash
/// chains never need an explicit wrap.
const PERM: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209,
    76, 132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198,
    173, 186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212,
    207, 206, 59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44,
    154, 163, 70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79,
    113, 224, 232, 178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12,
    191, 179, 162, 241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157,
    184, 84, 204, 176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29,
    24, 72, 243, 141, 128, 195, 78, 66, 215, 61, 156, 180,
];

const P: [u8; 512] = {
    let mut p = [0u8; 512];
    let mut i = 0;
    while i < 512 {
        p[i] = PERM[i & 255];
        i += 1;
    }
    p
};

#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

// The 0xC..=0xF arms repeat earlier gradients, matching the reference table.
#[inline]
fn grad(hash: u8, x: f64, y: f64, z: f64) -> f64 {
    match hash & 0xF {
        0x0 => x + y,
        0x1 => -x + y,
        0x2 => x - y,
        0x3 => -x - y,
        0x4 => x + z,
        0x5 => -x + z,
        0x6 => x - z,
        0x7 => -x - z,
        0x8 => y + z,
        0x9 => -y + z,
        0xA => y - z,
        0xB => -y - z,
        0xC => y + x,
        0xD => -y + z,
        0xE => y - x,
        _ => -y - z,
    }
}

/// Single octave of coherent gradient noise, remapped to `[0, 1]`.
#[inline]
pub fn perlin(x: f64, y: f64, z: f64) -> f64 {
    let xi = (x.floor() as i64 & 255) as usize;
    let yi = (y.floor() as i64 & 255) as usize;
    let zi = (z.floor() as i64 & 255) as usize;
    let xf = x - x.floor();
    let yf = y - y.floor();
    let zf = z - z.floor();

    let u = fade(xf);
    let v = fade(yf);
    let w = fade(zf);

    let aaa = P[P[P[xi] as usize + yi] as usize + zi];
    let aba = P[P[P[xi] as usize + yi + 1] as usize + zi];
    let aab = P[P[P[xi] as usize + yi] as usize + zi + 1];
    let abb = P[P[P[xi] as usize + yi + 1] as usize + zi + 1];
    let baa = P[P[P[xi + 1] as usize + yi] as usize + zi];
    let bba = P[P[P[xi + 1] as usize + yi + 1] as usize + zi];
    let bab = P[P[P[xi + 1] as usize + yi] as usize + zi + 1];
    let bbb = P[P[P[xi + 1] as usize + yi + 1] as usize + zi + 1];

    let x1 = lerp(grad(aaa, xf, yf, zf), grad(baa, xf - 1.0, yf, zf), u);
    let x2 = lerp(
        grad(aba, xf, yf - 1.0, zf),
        grad(bba, xf - 1.0, yf - 1.0, zf),
        u,
    );
    let y1 = lerp(x1, x2, v);
    let x1 = lerp(
        grad(aab, xf, yf, zf - 1.0),
        grad(bab, xf - 1.0, yf, zf - 1.0),
        u,
    );
    let x2 = lerp(
        grad(abb, xf, yf - 1.0, zf - 1.0),
        grad(bbb, xf - 1.0, yf - 1.0, zf - 1.0),
        u,
    );
    let y2 = lerp(x1, x2, v);
    (lerp(y1, y2, w) + 1.0) / 2.0
}

/// Fractal sum of `octaves` noise layers, frequency doubling and amplitude
/// shrinking by `persistence` per layer, normalized back into `[0, 1]`.
pub fn fbm(x: f64, y: f64, z: f64, octaves: u32, persistence: f64) -> f64 {
    let mut total = 0.0;
    let mut frequency = 1.0;
    let mut amplitude = 1.0;
    let mut max_value = 0.0;
    for _ in 0..octaves {
        total += perlin(x * frequency, y * frequency, z * frequency) * amplitude;
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= 2.0;
    }
    total / max_value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_endpoints() {
        assert_eq!(fade(0.0), 0.0);
        assert_eq!(fade(1.0), 1.0);
        assert_eq!(fade(0.5), 0.5);
    }

    #[test]
    fn permutation_wraps() {
        for i in 0..256 {
            assert_eq!(P[i], P[i + 256]);
        }
        assert_eq!(P[0], 151);
        assert_eq!(P[255], 180);
    }

    #[test]
    fn perlin_is_half_at_lattice_points() {
        // All fractional offsets are zero there, so every gradient dot
        // product vanishes and the remap lands exactly on 1/2.
        assert_eq!(perlin(0.0, 0.0, 0.0), 0.5);
        assert_eq!(perlin(17.0, -3.0, 250.0), 0.5);
        assert_eq!(perlin(-1.0, 255.0, 256.0), 0.5);
    }

    #[test]
    fn perlin_deterministic() {
        let a = perlin(12.34, -5.67, 89.01);
        let b = perlin(12.34, -5.67, 89.01);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn perlin_stays_in_unit_range() {
        let mut v = 0.13;
        for _ in 0..500 {
            v = (v * 1.7 + 0.31) % 97.0;
            let n = perlin(v, v * 0.7 - 3.0, 41.0 - v);
            assert!((0.0..=1.0).contains(&n), "out of range: {n}");
        }
    }

    #[test]
    fn fbm_single_octave_matches_perlin() {
        let (x, y, z) = (3.25, 0.5, -7.75);
        assert_eq!(fbm(x, y, z, 1, 0.5), perlin(x, y, z));
    }

    #[test]
    fn fbm_stays_in_unit_range() {
        for i in 0..100 {
            let t = i as f64 * 0.37;
            let n = fbm(t, t * 0.5, -t, 6, 0.5);
            assert!((0.0..=1.0).contains(&n), "out of range: {n}");
        }
    }
}
