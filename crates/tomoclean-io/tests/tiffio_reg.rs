//! TIFF frame and slice directory regression test
//!
//! Writes a small volume as numbered float TIFFs, lists and reads it back,
//! and checks that foreign files are ignored.

use std::fs;
use tomoclean_core::{Image, ImageStack};
use tomoclean_io::{
    TiffCompression, indexed_path, list_frames, read_stack_dir, read_tiff_file, write_stack_dir,
    write_tiff_file,
};
use tomoclean_test::{RegParams, disk_image, scratch_dir};

#[test]
fn tiffio_reg() {
    let mut rp = RegParams::new("tiffio");
    let dir = scratch_dir("tiffio").expect("scratch dir");

    // --- Test 1: stack directory roundtrip ---
    let slices: Vec<Image> = (0..3)
        .map(|i| disk_image(12, 10, 2.0 + i as f32, 1.5 * i as f32, -0.25))
        .collect();
    let volume = ImageStack::from_images(slices).unwrap();
    let written = write_stack_dir(&volume, dir.join("slices"), "slice", TiffCompression::Lzw)
        .expect("write slices");
    rp.compare_values(3.0, written.len() as f64, 0.0);
    rp.check(
        written[2] == indexed_path(&dir.join("slices"), "slice", 2),
        "slice paths follow the numbering scheme",
    );

    let back = read_stack_dir(dir.join("slices")).expect("read slices");
    rp.compare_values(3.0, back.len() as f64, 0.0);
    for (orig, read) in volume.iter().zip(back.iter()) {
        rp.compare_images(orig, read, 0.0);
    }

    // --- Test 2: listing ignores non-TIFF files and sorts by name ---
    let frames = dir.join("frames");
    fs::create_dir_all(&frames).unwrap();
    for name in ["b_0002.tif", "a_0001.TIFF", "c_0003.tif"] {
        write_tiff_file(&Image::new(2, 2).unwrap(), frames.join(name), TiffCompression::None)
            .unwrap();
    }
    fs::write(frames.join("notes.txt"), b"not an image").unwrap();
    let listed = list_frames(&frames).expect("list frames");
    let names: Vec<String> = listed
        .iter()
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
        .collect();
    rp.check(
        names == ["a_0001.TIFF", "b_0002.tif", "c_0003.tif"],
        "frames listed in name order",
    );

    // --- Test 3: missing file reports its path ---
    let missing = dir.join("missing.tif");
    let err = read_tiff_file(&missing).unwrap_err();
    rp.check(
        err.to_string().contains("missing.tif"),
        "error message names the file",
    );

    assert!(rp.cleanup());
}
