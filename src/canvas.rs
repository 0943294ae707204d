use std::convert::TryFrom;
use std::fs::File;
use std::io;
use std::io::{ BufWriter, Write };
use std::path::Path;

use thiserror::Error;

use crate::color::Rgb8;

/// Errors from writing a canvas to disk.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported output format {0:?}; use .png or .ppm")]
    UnsupportedFormat(String),

    #[error("Canvas of {width}x{height} pixels is too large for PNG")]
    TooLarge { width: usize, height: usize },
}

/// A canvas of finished pixels.
///
/// The camera writes one 8-bit RGB triple per pixel into the canvas. Once
/// rendering finishes the canvas is handed to an encoder and saved, either as
/// PNG (through the `image` crate) or as plain-text PPM.
///
/// Pixels are stored row-major: pixel `(x, y)` lives at `y * width + x`.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    pixels: Vec<Rgb8>,
}

impl Canvas {
    /// Creates a black canvas with specified width and height.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![[0, 0, 0]; width * height],
        }
    }

    /// Writes a color to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored. `y` is the row of the pixel and `x`
    /// the column, both zero-indexed from the top left.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sphere_tracer::canvas::Canvas;
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, [255, 0, 255]);
    /// assert_eq!(canvas.read_pixel(4, 2), Some([255, 0, 255]));
    /// assert_eq!(canvas.read_pixel(8, 2), None);
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: Rgb8) {
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = pixel;
    }

    /// Reads a color from a location on the `Canvas`.
    ///
    /// Returns `None` if the location is out-of-bounds.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Rgb8> {
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }

    /// All pixels, row by row.
    pub fn pixels(&self) -> &[Rgb8] {
        &self.pixels
    }

    /// Saves the canvas, picking the format from the file extension.
    pub fn save(&self, path: &Path) -> Result<(), OutputError> {
        let extension = path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "png" => self.save_png(path),
            "ppm" => Ok(self.save_ppm(path)?),
            _ => Err(OutputError::UnsupportedFormat(extension)),
        }
    }

    /// Encodes the canvas as a PNG file.
    ///
    /// PNG dimensions are 32-bit; wider or taller canvases are rejected.
    pub fn save_png(&self, path: &Path) -> Result<(), OutputError> {
        let too_large = || OutputError::TooLarge {
            width: self.width,
            height: self.height,
        };
        let width = u32::try_from(self.width).map_err(|_| too_large())?;
        let height = u32::try_from(self.height).map_err(|_| too_large())?;

        let raw: Vec<u8> = self.pixels.iter().flatten().copied().collect();
        let image = image::RgbImage::from_raw(width, height, raw)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData,
            "pixel buffer does not match canvas size"))?;

        image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    /// Saves the canvas to a plain-text (P3) PPM file.
    pub fn save_ppm(&self, path: &Path) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_ppm(&mut out)?;
        out.flush()
    }

    /// Writes the canvas as P3 PPM.
    ///
    /// No line of pixel data exceeds 70 characters; values wrap onto the next
    /// line as needed.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?;

        let mut line = String::with_capacity(70);
        for y in 0..self.height {
            let row = &self.pixels[y * self.width..(y + 1) * self.width];

            for value in row.iter().flatten() {
                let value = value.to_string();
                if !line.is_empty() && line.len() + 1 + value.len() > 70 {
                    writeln!(out, "{}", line)?;
                    line.clear();
                }

                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(&value);
            }

            // Every row starts on a fresh line
            if !line.is_empty() {
                writeln!(out, "{}", line)?;
                line.clear();
            }
        }

        Ok(())
    }
}

#[test]
fn new_canvas_is_black() {
    let c = Canvas::new(10, 20);

    assert_eq!(c.pixels().len(), 200);
    assert!(c.pixels().iter().all(|p| *p == [0, 0, 0]));
}

#[test]
fn ppm_header() {
    let c = Canvas::new(5, 3);
    let mut out = Vec::new();
    c.write_ppm(&mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(&lines[0..3], &["P3", "5 3", "255"]);
}

#[test]
fn ppm_pixel_data() {
    let mut c = Canvas::new(5, 3);
    c.write_pixel(0, 0, [255, 0, 0]);
    c.write_pixel(2, 1, [0, 128, 0]);
    c.write_pixel(4, 2, [0, 0, 255]);

    let mut out = Vec::new();
    c.write_ppm(&mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[3], "255 0 0 0 0 0 0 0 0 0 0 0 0 0 0");
    assert_eq!(lines[4], "0 0 0 0 0 0 0 128 0 0 0 0 0 0 0");
    assert_eq!(lines[5], "0 0 0 0 0 0 0 0 0 0 0 0 0 0 255");
    assert!(text.ends_with('\n'));
}

#[test]
fn ppm_wraps_long_lines() {
    let mut c = Canvas::new(10, 2);
    for y in 0..2 {
        for x in 0..10 {
            c.write_pixel(x, y, [255, 204, 153]);
        }
    }

    let mut out = Vec::new();
    c.write_ppm(&mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[3],
        "255 204 153 255 204 153 255 204 153 255 204 153 255 204 153 255 204");
    assert_eq!(lines[4],
        "153 255 204 153 255 204 153 255 204 153 255 204 153");
    assert!(lines.iter().all(|l| l.len() <= 70));
}

#[test]
fn save_rejects_unknown_extension() {
    let c = Canvas::new(1, 1);

    match c.save(Path::new("out.bmp")) {
        Err(OutputError::UnsupportedFormat(ext)) => assert_eq!(ext, "bmp"),
        other => panic!("expected unsupported format, got {:?}", other),
    }
}

#[test]
#[cfg(target_pointer_width = "64")]
fn png_rejects_dimensions_past_u32() {
    // A zero height keeps the pixel buffer empty.
    let width = u32::MAX as usize + 1;
    let c = Canvas::new(width, 0);

    match c.save_png(Path::new("too_wide.png")) {
        Err(OutputError::TooLarge { width: w, height: 0 }) => assert_eq!(w, width),
        other => panic!("expected too large, got {:?}", other),
    }
    assert!(!Path::new("too_wide.png").exists());
}
