//! Hysteresis region growing over a fitted tensor.
//!
//! A strict threshold alone clips the soft edges of moving objects; a
//! loose threshold alone lets background noise through. Growing loose
//! regions only out of strict seeds takes the good half of each.

use super::{DensityTensor, Mask};

/// Floods 4-connected regions from seed pixels.
///
/// Seeds are pixels whose density at `frame` is at or below
/// `seed_threshold`; regions then expand through neighbors at or
/// below `grow_threshold`. Every seed is marked even when nothing
/// around it grows, so the result always contains the plain binary
/// mask at `seed_threshold`.
pub(crate) fn spread(
    tensor: &DensityTensor,
    frame: usize,
    seed_threshold: f32,
    grow_threshold: f32,
) -> Mask {
    let (w, h, n) = (tensor.width(), tensor.height(), tensor.frames());
    let data = tensor.as_slice();
    let density_at = |p: usize| data[p * n + frame];

    let mut mask = Mask::new_zeroed(w, h);
    let out = mask.as_mut_slice();
    let mut visited = vec![false; w * h];
    // Explicit work stack; recursion would overflow on frame-sized regions.
    let mut stack: Vec<usize> = Vec::new();

    for p in 0..w * h {
        if visited[p] || density_at(p) > seed_threshold {
            continue;
        }
        visited[p] = true;
        stack.push(p);

        while let Some(q) = stack.pop() {
            out[q] = 255;
            let (x, y) = (q % w, q / w);

            let mut try_grow = |r: usize| {
                if !visited[r] && density_at(r) <= grow_threshold {
                    visited[r] = true;
                    stack.push(r);
                }
            };
            if x > 0 {
                try_grow(q - 1);
            }
            if x + 1 < w {
                try_grow(q + 1);
            }
            if y > 0 {
                try_grow(q - w);
            }
            if y + 1 < h {
                try_grow(q + w);
            }
        }
    }

    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tensor_1frame(width: usize, height: usize, densities: Vec<f32>) -> DensityTensor {
        DensityTensor::from_values(width, height, 1, densities).unwrap()
    }

    #[test]
    fn test_block_floods_exactly() {
        let mut d = vec![0.9f32; 16];
        for &(x, y) in &[(1, 1), (2, 1), (1, 2), (2, 2)] {
            d[y * 4 + x] = 0.1;
        }
        let mask = spread(&tensor_1frame(4, 4, d), 0, 0.2, 0.2);

        assert_eq!(mask.foreground_count(), 4);
        assert_eq!(mask.is_foreground(1, 1), Some(true));
        assert_eq!(mask.is_foreground(2, 2), Some(true));
        assert_eq!(mask.is_foreground(0, 0), Some(false));
        assert_eq!(mask.is_foreground(3, 1), Some(false));
    }

    #[test]
    fn test_hysteresis_bridges_weak_pixels() {
        // Strict mask alone: pixels 0 and 2. The weak pixel 1 bridges
        // them under the loose threshold; pixel 3 stays out.
        let mask = spread(&tensor_1frame(4, 1, vec![0.05, 0.3, 0.05, 0.9]), 0, 0.1, 0.5);

        assert_eq!(mask.data(), &[255, 255, 255, 0]);
    }

    #[test]
    fn test_single_seed_floods_its_block() {
        // A 3x3 growable block in a 5x5 frame, seeded only at its
        // center: growth reaches all nine cells and stops at the
        // blocking border.
        let mut d = vec![0.9f32; 25];
        for y in 1..4 {
            for x in 1..4 {
                d[y * 5 + x] = 0.3;
            }
        }
        d[2 * 5 + 2] = 0.05;
        let mask = spread(&tensor_1frame(5, 5, d), 0, 0.1, 0.5);

        assert_eq!(mask.foreground_count(), 9);
        for y in 1..4 {
            for x in 1..4 {
                assert_eq!(mask.is_foreground(x, y), Some(true));
            }
        }
        assert_eq!(mask.is_foreground(0, 2), Some(false));
    }

    #[test]
    fn test_growth_does_not_leap_diagonals() {
        // Seed in the center, growable corners, blocking edges: the
        // corners are only diagonal neighbors, so nothing spreads.
        let d = vec![
            0.2, 0.9, 0.2, //
            0.9, 0.05, 0.9, //
            0.2, 0.9, 0.2,
        ];
        let mask = spread(&tensor_1frame(3, 3, d), 0, 0.1, 0.3);

        assert_eq!(mask.foreground_count(), 1);
        assert_eq!(mask.is_foreground(1, 1), Some(true));
    }

    #[test]
    fn test_diagonal_bridge_does_not_connect_blocks() {
        // Two growable blocks meet only at a blocked corner. The lower
        // right block has no seed of its own, so it must stay dark.
        let d = vec![
            0.05, 0.3, 0.9, //
            0.3, 0.9, 0.3, //
            0.9, 0.3, 0.3,
        ];
        let mask = spread(&tensor_1frame(3, 3, d), 0, 0.1, 0.5);

        assert_eq!(mask.foreground_count(), 3);
        assert_eq!(mask.is_foreground(0, 0), Some(true));
        assert_eq!(mask.is_foreground(1, 0), Some(true));
        assert_eq!(mask.is_foreground(0, 1), Some(true));
        assert_eq!(mask.is_foreground(2, 1), Some(false));
        assert_eq!(mask.is_foreground(1, 2), Some(false));
        assert_eq!(mask.is_foreground(2, 2), Some(false));
    }

    #[test]
    fn test_isolated_seed_is_still_marked() {
        let mut d = vec![1.0f32; 25];
        d[12] = 0.0;
        let mask = spread(&tensor_1frame(5, 5, d), 0, 0.05, 0.05);

        assert_eq!(mask.foreground_count(), 1);
        assert_eq!(mask.is_foreground(2, 2), Some(true));
    }

    #[test]
    fn test_result_contains_all_seeds() {
        // Deterministic scatter of densities; every pixel at or below
        // the seed threshold must be foreground no matter how regions
        // merge, even when the grow threshold sits below the seed one.
        let d: Vec<f32> = (0..64).map(|p| ((p * 37 + 11) % 100) as f32 / 100.0).collect();

        for (s, s2) in [(0.15, 0.35), (0.35, 0.15)] {
            let mask = spread(&tensor_1frame(8, 8, d.clone()), 0, s, s2);

            for (p, &density) in d.iter().enumerate() {
                if density <= s {
                    assert_eq!(
                        mask.is_foreground(p % 8, p / 8),
                        Some(true),
                        "seed pixel {p} lost at thresholds ({s}, {s2})"
                    );
                }
            }
        }
    }

    #[test]
    fn test_frame_index_selects_slice() {
        // Two frames: the low pixel moves between them.
        let mut d = vec![1.0f32; 8];
        d[0] = 0.0; // pixel 0, frame 0
        d[7] = 0.0; // pixel 3, frame 1
        let tensor = DensityTensor::from_values(4, 1, 2, d).unwrap();

        let frame0 = spread(&tensor, 0, 0.1, 0.1);
        let frame1 = spread(&tensor, 1, 0.1, 0.1);

        assert_eq!(frame0.data(), &[255, 0, 0, 0]);
        assert_eq!(frame1.data(), &[0, 0, 0, 255]);
    }
}
