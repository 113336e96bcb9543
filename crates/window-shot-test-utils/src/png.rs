//! Assertions on written PNG files

use std::{
    fs,
    path::{Path, PathBuf},
};

use image::{ImageFormat, RgbaImage};

/// Decodes the PNG at `path` and checks its dimensions
///
/// # Panics
///
/// Panics if the file is missing, is not a PNG, or has other dimensions.
pub fn assert_png(path: &Path, width: u32, height: u32) -> RgbaImage {
    let bytes = fs::read(path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));

    let format = image::guess_format(&bytes)
        .unwrap_or_else(|e| panic!("{} has no recognizable format: {e}", path.display()));
    assert_eq!(format, ImageFormat::Png, "{} is not a PNG", path.display());

    let image = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
        .unwrap_or_else(|e| panic!("cannot decode {}: {e}", path.display()))
        .to_rgba8();

    assert_eq!(
        image.dimensions(),
        (width, height),
        "{} has unexpected dimensions",
        path.display()
    );
    image
}

/// Lists `*.png` files directly inside `dir`, sorted by name
pub fn png_files_in(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "png"))
        .collect();
    files.sort();
    files
}

/// Asserts that `dir` is missing or contains no entries
pub fn assert_dir_empty(dir: &Path) {
    if let Ok(mut entries) = fs::read_dir(dir) {
        assert!(entries.next().is_none(), "{} is not empty", dir.display());
    }
}
