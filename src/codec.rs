use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{
    DynamicImage, ExtendedColorType, ImageEncoder, ImageError, ImageReader, Rgb, RgbImage,
    RgbaImage,
};

use crate::error::{InvertError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    /// Pick the encoder from the output path's extension.
    ///
    /// The extension is matched case-insensitively, the same way inputs are
    /// filtered, so `PHOTO.JPG` encodes as JPEG rather than being rejected.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            _ => Err(InvertError::UnsupportedFormat(format!(".{ext}"))),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
        }
    }
}

/// Decode `path`, detecting the format from the file contents.
pub fn decode(path: &Path) -> Result<DynamicImage> {
    let open_err = |source: std::io::Error| InvertError::Open {
        path: path.to_path_buf(),
        source,
    };

    ImageReader::open(path)
        .map_err(open_err)?
        .with_guessed_format()
        .map_err(open_err)?
        .decode()
        .map_err(|source| InvertError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

/// Write `img` to `path` with the encoder its extension selects.
///
/// The format is resolved before the file is created, so an unsupported
/// extension leaves nothing behind.
pub fn encode(img: &RgbaImage, path: &Path) -> Result<OutputFormat> {
    let format = OutputFormat::from_path(path)?;

    let file = File::create(path).map_err(|source| InvertError::CreateOutput {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    let written = match format {
        OutputFormat::Jpeg => write_jpeg(img, &mut writer),
        OutputFormat::Png => write_png(img, &mut writer),
    }
    .and_then(|()| writer.flush().map_err(ImageError::IoError));

    written.map_err(|source| InvertError::Encode {
        format: format.name(),
        path: path.to_path_buf(),
        source,
    })?;

    Ok(format)
}

/// JPEG carries no alpha, so only the color channels are written.
fn write_jpeg<W: Write>(img: &RgbaImage, writer: W) -> image::ImageResult<()> {
    let rgb = drop_alpha(img);
    JpegEncoder::new(writer).write_image(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ExtendedColorType::Rgb8,
    )
}

fn write_png<W: Write>(img: &RgbaImage, writer: W) -> image::ImageResult<()> {
    let encoder = PngEncoder::new(writer);
    if img.pixels().all(|p| p[3] == u8::MAX) {
        let rgb = drop_alpha(img);
        encoder.write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
    } else {
        encoder.write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgba8)
    }
}

fn drop_alpha(img: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b, _] = img.get_pixel(x, y).0;
        Rgb([r, g, b])
    })
}
