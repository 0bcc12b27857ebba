//! Image, stack and mask regression test
//!
//! Element-wise arithmetic, statistics, cropping, stack transforms and
//! soft-mask blending on small synthetic images.

use tomoclean_core::{Error, Image, ImageStack, Roi, SoftMask};
use tomoclean_test::RegParams;

#[test]
fn stack_reg() {
    let mut rp = RegParams::new("stack");

    // --- Test 1: statistics ---
    let ramp = Image::from_fn(4, 3, |x, y| (x + 4 * y) as f32).unwrap();
    rp.compare_values(5.5, ramp.mean(), 1e-9);
    // population std of 0..12
    rp.compare_values((143.0f64 / 12.0).sqrt(), ramp.std(), 1e-6);
    rp.compare_values(0.0, ramp.min_value().unwrap() as f64, 0.0);
    rp.compare_values(11.0, ramp.max_value().unwrap() as f64, 0.0);
    rp.compare_values(1.0, ramp.min_positive().unwrap() as f64, 0.0);

    // --- Test 2: crop ---
    let roi = Roi::new(1..3, 1..3).unwrap();
    let cropped = ramp.crop(&roi).unwrap();
    let expected = Image::from_data(2, 2, vec![5.0, 6.0, 9.0, 10.0]).unwrap();
    rp.compare_images(&expected, &cropped, 0.0);
    let too_big = Roi::new(0..4, 0..4).unwrap();
    rp.check(
        matches!(ramp.crop(&too_big), Err(Error::InvalidParameter(_))),
        "crop past the border is rejected",
    );

    // --- Test 3: stack order and shape checks ---
    let frames: Vec<Image> = (0..5)
        .map(|i| Image::new_with_value(4, 3, i as f32).unwrap())
        .collect();
    let stack = ImageStack::from_images(frames).unwrap();
    let doubled = stack.map(|img| img.map(|v| 2.0 * v)).unwrap();
    for (i, img) in doubled.iter().enumerate() {
        rp.compare_values(2.0 * i as f64, img.mean(), 0.0);
    }
    let reversed = stack.reversed();
    rp.compare_values(4.0, reversed.get(0).unwrap().mean(), 0.0);
    rp.compare_values(3.0, stack.truncated(3).len() as f64, 0.0);
    let mut grow = stack.clone();
    rp.check(
        matches!(
            grow.push(Image::new(3, 4).unwrap()),
            Err(Error::ShapeMismatch { .. })
        ),
        "push of a different shape is rejected",
    );

    // --- Test 4: soft-mask blend stays between its inputs ---
    let mask = SoftMask::from_fn(4, 3, |x, _| x as f32 / 3.0).unwrap();
    let a = Image::new_with_value(4, 3, -2.0).unwrap();
    let b = Image::from_fn(4, 3, |x, y| (x * y) as f32).unwrap();
    let blended = mask.blend(&a, &b).unwrap();
    let convex = blended
        .data()
        .iter()
        .zip(a.data().iter().zip(b.data()))
        .all(|(&v, (&p, &q))| v >= p.min(q) - 1e-6 && v <= p.max(q) + 1e-6);
    rp.check(convex, "blend is convex");
    rp.write_image(&blended, "blend").unwrap();

    assert!(rp.cleanup());
}
