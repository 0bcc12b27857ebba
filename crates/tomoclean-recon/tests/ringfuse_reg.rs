//! Ring blending and volume fusion regression test
//!
//! Checks mask properties, the limiting cases of both blenders and the
//! per-slice ring engine hook.

use tomoclean_core::{Image, Volume};
use tomoclean_recon::{
    FusionBlender, RingMaskBlender, RingRemovalParams, angles_linspace, blend_ring, fuse,
    fusion_mask, ring_mask,
};
use tomoclean_test::{FakeRingRemover, FailingEngine, RegParams, disk_image, repeat_stack};

#[test]
fn ringfuse_reg() {
    let mut rp = RegParams::new("ringfuse");

    // --- Test 1: mask weights stay in [0, 1] ---
    for &(radius, sigma) in &[(0.0, 0.5), (5.0, 2.0), (20.0, 10.0)] {
        let mask = ring_mask(33, 27, radius, sigma).unwrap();
        let (lo, hi) = (
            mask.image().min_value().unwrap(),
            mask.image().max_value().unwrap(),
        );
        rp.check((0.0..=1.0).contains(&lo) && hi <= 1.0, "ring mask in [0, 1]");
    }
    for &(radius, sigma) in &[(0.0, 0.0), (6.0, 3.0), (40.0, 20.0)] {
        let mask = fusion_mask(33, 27, radius, sigma).unwrap();
        let (lo, hi) = (
            mask.image().min_value().unwrap(),
            mask.image().max_value().unwrap(),
        );
        rp.check((0.0..=1.0).contains(&lo) && hi <= 1.0, "fusion mask in [0, 1]");
    }

    // --- Test 2: radius 2 on 5x5 leaves the 3x3 centre at zero ---
    let mask = ring_mask(5, 5, 2.0, 1.0).unwrap();
    let centre: f32 = (1..4)
        .flat_map(|y| (1..4).map(move |x| (x, y)))
        .map(|(x, y)| mask.weight(x, y).unwrap())
        .sum();
    rp.compare_values(0.0, centre as f64, 0.0);

    // --- Test 3: tiny sigma with radius = half width is a step ---
    let plain = Image::new_with_value(20, 20, 3.0).unwrap();
    let filtered = Image::new_with_value(20, 20, 7.0).unwrap();
    let out = blend_ring(&plain, &filtered, 10.0, 0.01).unwrap();
    let step = disk_image(20, 20, 10.0, 3.0, 7.0);
    rp.compare_images(&step, &out, 1e-4);

    // --- Test 4: radius_cut 0 with wide blur leaves the exterior ---
    let a = repeat_stack(&Image::new_with_value(10, 10, 1.0).unwrap(), 2);
    let b = repeat_stack(&Image::new_with_value(10, 10, 0.0).unwrap(), 2);
    let fused = fuse(&a, &b, 0.0, 50.0, None).unwrap();
    for slice in &fused {
        rp.check(slice.max_value().unwrap() < 0.05, "fused close to exterior");
    }

    // --- Test 5: large disk without blur keeps the interior ---
    let a = repeat_stack(&disk_image(16, 16, 3.0, 5.0, 2.0), 3);
    let b = repeat_stack(&Image::new_with_value(16, 16, -1.0).unwrap(), 4);
    let fused = FusionBlender::new(100.0, 0.0).unwrap().fuse(&a, &b).unwrap();
    rp.compare_values(3.0, fused.len() as f64, 0.0);
    rp.compare_images(a.get(0).unwrap(), fused.get(2).unwrap(), 0.0);

    // --- Test 6: ring engine per slice ---
    let volume: Volume = repeat_stack(&Image::new_with_value(15, 15, 1.0).unwrap(), 3);
    let blender = RingMaskBlender::new(2.0, 1.0).unwrap();
    let remover = FakeRingRemover::with_offset(4.0);
    let params = RingRemovalParams {
        rwidth: 9,
        thresh: 0.002,
    };
    let out = blender.blend_volume(&volume, &remover, &params).unwrap();
    for slice in &out {
        rp.compare_values(1.0, slice.get_pixel(7, 7).unwrap() as f64, 0.0);
        rp.compare_values(5.0, slice.get_pixel(0, 0).unwrap() as f64, 1e-4);
    }
    let calls = remover.calls();
    rp.compare_values(3.0, calls.len() as f64, 0.0);
    rp.check(
        calls.iter().all(|c| *c == params),
        "ring parameters reach every slice",
    );
    rp.check(
        blender.blend_volume(&volume, &FailingEngine, &params).is_err(),
        "engine failure propagates",
    );

    // --- Test 7: angle array ---
    let theta = angles_linspace(-240.0, -59.4, 259).unwrap();
    rp.compare_values(259.0, theta.len() as f64, 0.0);
    rp.compare_values((-59.4f64).to_radians(), theta[258] as f64, 1e-6);

    assert!(rp.cleanup());
}
