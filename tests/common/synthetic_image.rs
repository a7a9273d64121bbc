use coherent_lines::image::ImageF32;

/// Generates a simple high-contrast checkerboard image.
pub fn checkerboard_u8(width: usize, height: usize, cell: usize) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    let mut img = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let cx = (x / cell) as i32;
            let cy = (y / cell) as i32;
            let sum = cx + cy;
            let val = if sum & 1 == 0 { 32u8 } else { 220u8 };
            img[y * width + x] = val;
        }
    }
    img
}

/// Dark left half (0), bright right half (1) split at column `width / 2`.
pub fn vertical_step(width: usize, height: usize) -> ImageF32 {
    let mut img = ImageF32::new(width, height);
    for y in 0..height {
        for x in width / 2..width {
            img.set(x, y, 1.0);
        }
    }
    img
}

/// Uniform image.
pub fn flat(width: usize, height: usize, value: f32) -> ImageF32 {
    ImageF32::filled(width, height, value)
}

/// Bright disc on a dark background with a one-pixel linear falloff at the rim.
pub fn disc(width: usize, height: usize, radius: f32) -> ImageF32 {
    let (cx, cy) = ((width as f32 - 1.0) / 2.0, (height as f32 - 1.0) / 2.0);
    let mut img = ImageF32::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
            img.set(x, y, (radius - d + 0.5).clamp(0.0, 1.0));
        }
    }
    img
}
