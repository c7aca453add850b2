//! Writing rendered images to disk.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::{ImageBuffer, RenderError, RenderResult};

/// Write `image` as a plain-text PPM: `P3`, then `<width> <height> 255`,
/// then one `R G B` line per pixel, top row first.
pub fn write_ppm<W: Write>(image: &ImageBuffer, mut writer: W) -> io::Result<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {} 255", image.width, image.height)?;

    for [r, g, b] in &image.pixels {
        writeln!(writer, "{r} {g} {b}")?;
    }

    writer.flush()
}

/// Save `image` to `path`, picking the format from the extension.
///
/// Supports `.ppm` and `.png`.
pub fn save_image(image: &ImageBuffer, path: &Path) -> RenderResult<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "ppm" => {
            let file = File::create(path)?;
            write_ppm(image, BufWriter::new(file))?;
        }
        "png" => {
            image::save_buffer(
                path,
                &image.to_rgb_bytes(),
                image.width,
                image.height,
                image::ColorType::Rgb8,
            )?;
        }
        _ => {
            return Err(RenderError::UnsupportedFormat(path.display().to_string()));
        }
    }

    log::info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_one() -> ImageBuffer {
        let mut image = ImageBuffer::new(2, 1);
        image.set(0, 0, [255, 0, 0]);
        image.set(1, 0, [0, 128, 255]);
        image
    }

    #[test]
    fn test_write_ppm() {
        let mut out = Vec::new();
        write_ppm(&two_by_one(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "P3\n2 1 255\n255 0 0\n0 128 255\n");
    }

    #[test]
    fn test_unsupported_extension() {
        let path = std::env::temp_dir().join("srt_output_test.bmp");
        let err = save_image(&two_by_one(), &path).unwrap_err();

        assert!(matches!(err, RenderError::UnsupportedFormat(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_save_png_and_ppm() {
        let dir = std::env::temp_dir().join(format!("srt_output_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let png = dir.join("image.png");
        save_image(&two_by_one(), &png).unwrap();
        let decoded = image::open(&png).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (2, 1));
        assert_eq!(decoded.get_pixel(1, 0).0, [0, 128, 255]);

        let ppm = dir.join("image.ppm");
        save_image(&two_by_one(), &ppm).unwrap();
        let text = std::fs::read_to_string(&ppm).unwrap();
        assert!(text.starts_with("P3\n2 1 255\n"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
