use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use log::{debug, info};
use strum::Display;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("File not found at {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Unsupported image format {format} at {}; expected JPEG, PNG or WEBP", .path.display())]
    Unsupported { path: PathBuf, format: String },

    #[error("Could not read {} as an image: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },
}

/// Formats the generation service accepts.
#[derive(Debug, Clone, Copy, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "UPPERCASE")]
pub enum ImageFormat {
    Jpeg,
    Png,
    WebP,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// On rejection, returns the upper-cased name of the detected format.
    fn from_detected(detected: image::ImageFormat) -> Result<Self, String> {
        match detected {
            image::ImageFormat::Jpeg => Ok(ImageFormat::Jpeg),
            image::ImageFormat::Png => Ok(ImageFormat::Png),
            image::ImageFormat::WebP => Ok(ImageFormat::WebP),
            other => Err(other
                .extensions_str()
                .first()
                .map(|ext| ext.to_uppercase())
                .unwrap_or_else(|| format!("{other:?}").to_uppercase())),
        }
    }
}

/// A validated image, owned by a single pipeline run.
#[derive(Clone)]
pub struct ImageReference {
    pub path: PathBuf,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    data: Vec<u8>,
}

impl ImageReference {
    /// The file contents exactly as read from disk.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Debug for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageReference")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Checks that `path` exists, decodes as an image and is JPEG, PNG or WEBP.
///
/// The format is sniffed from the file's magic bytes, so formats without a compiled-in
/// decoder are still reported by name instead of as unreadable.
pub fn validate(path: impl AsRef<Path>) -> Result<ImageReference, ImageError> {
    let path = path.as_ref();
    let unreadable = |reason: String| ImageError::Unreadable {
        path: path.to_path_buf(),
        reason,
    };

    let data = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ImageError::NotFound {
            path: path.to_path_buf(),
        },
        _ => unreadable(e.to_string()),
    })?;

    let detected = image::guess_format(&data).map_err(|e| unreadable(e.to_string()))?;
    let format = ImageFormat::from_detected(detected).map_err(|format| ImageError::Unsupported {
        path: path.to_path_buf(),
        format,
    })?;

    let decoded = image::load_from_memory_with_format(&data, detected)
        .map_err(|e| unreadable(e.to_string()))?;
    debug!(
        "decoded {}: {format}, {}x{}, {} bytes",
        path.display(),
        decoded.width(),
        decoded.height(),
        data.len()
    );
    info!("validated image {}", path.display());

    Ok(ImageReference {
        path: path.to_path_buf(),
        format,
        width: decoded.width(),
        height: decoded.height(),
        data,
    })
}

#[cfg(test)]
pub(crate) mod test {
    use std::path::PathBuf;

    use image::{RgbImage, RgbaImage};
    use tempfile::TempDir;

    use super::*;

    pub(crate) fn write_png(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        RgbImage::from_pixel(4, 3, image::Rgb([200, 120, 40]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.jpg");
        let err = validate(&path).unwrap_err();
        assert!(matches!(err, ImageError::NotFound { .. }));
        assert!(err.to_string().contains("missing.jpg"));
    }

    #[test]
    fn accepts_png() {
        let dir = TempDir::new().unwrap();
        let path = write_png(&dir, "cat.png");
        let image = validate(&path).unwrap();
        assert_eq!(image.format, ImageFormat::Png);
        assert_eq!((image.width, image.height), (4, 3));
        assert_eq!(image.data(), fs::read(&path).unwrap().as_slice());
    }

    #[test]
    fn accepts_jpeg_regardless_of_extension() {
        let dir = TempDir::new().unwrap();
        let jpeg = dir.path().join("photo.jpg");
        RgbImage::new(8, 8).save(&jpeg).unwrap();
        let renamed = dir.path().join("photo.dat");
        fs::rename(&jpeg, &renamed).unwrap();

        let image = validate(&renamed).unwrap();
        assert_eq!(image.format, ImageFormat::Jpeg);
        assert_eq!(image.format.mime_type(), "image/jpeg");
    }

    #[test]
    fn accepts_webp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("x.webp");
        RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let image = validate(&path).unwrap();
        assert_eq!(image.format, ImageFormat::WebP);
        assert_eq!(image.format.mime_type(), "image/webp");
        assert_eq!((image.width, image.height), (3, 2));
    }

    #[test]
    fn pdf_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.pdf");
        fs::write(&path, b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\n").unwrap();
        assert!(matches!(
            validate(&path).unwrap_err(),
            ImageError::Unreadable { .. }
        ));
    }

    #[test]
    fn gif_is_unsupported_and_named() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("anim.gif");
        fs::write(&path, b"GIF89a\x01\x00\x01\x00\x00\x00\x00;").unwrap();
        let err = validate(&path).unwrap_err();
        let ImageError::Unsupported { format, .. } = &err else {
            panic!("expected unsupported format, got {err:?}");
        };
        assert_eq!(format, "GIF");
        assert!(err.to_string().contains("GIF"));
    }

    #[test]
    fn truncated_png_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"\x89PNG\r\n\x1a\n\x00\x00").unwrap();
        assert!(matches!(
            validate(&path).unwrap_err(),
            ImageError::Unreadable { .. }
        ));
    }

    #[test]
    fn directory_is_unreadable() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            validate(dir.path()).unwrap_err(),
            ImageError::Unreadable { .. }
        ));
    }

    #[test]
    fn detected_formats_map_to_supported_ones() {
        assert_eq!(
            ImageFormat::from_detected(image::ImageFormat::WebP),
            Ok(ImageFormat::WebP)
        );
        assert_eq!(
            ImageFormat::from_detected(image::ImageFormat::Jpeg),
            Ok(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_detected(image::ImageFormat::Bmp),
            Err("BMP".to_string())
        );
        assert_eq!(
            ImageFormat::from_detected(image::ImageFormat::Tiff),
            Err("TIFF".to_string())
        );
        assert_eq!(ImageFormat::WebP.to_string(), "WEBP");
    }
}
