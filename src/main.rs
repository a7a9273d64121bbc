use coherent_lines::image::ImageF32;
use coherent_lines::{generate, CldOptions};

fn main() {
    // Demo stub: draws the outline of a synthetic bright disc
    let (w, h) = (160usize, 120usize);
    let (cx, cy, r) = (w as f32 / 2.0, h as f32 / 2.0, 40.0f32);
    let mut img = ImageF32::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let (dx, dy) = (x as f32 - cx, y as f32 - cy);
            if dx * dx + dy * dy <= r * r {
                img.set(x, y, 1.0);
            }
        }
    }

    let options = CldOptions::default().with_tau(0.9);
    match generate(&img, &options) {
        Ok(out) => println!(
            "line_pixels={} latency_ms={:.3}",
            out.report.off_pixels, out.report.timing.total_ms
        ),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
