use crate::llm::ContentPart;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("image not found: {0}")]
    NotFound(PathBuf),
    #[error("failed reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unsupported or corrupt image {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Formats the model accepts as-is. Everything else is re-encoded to PNG.
fn passthrough_mime(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::WebP => Some("image/webp"),
        _ => None,
    }
}

pub fn load_image_part(path: &Path) -> Result<ContentPart, ImageLoadError> {
    if !path.exists() {
        return Err(ImageLoadError::NotFound(path.to_path_buf()));
    }
    let bytes = std::fs::read(path).map_err(|source| ImageLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = ImageReader::new(Cursor::new(&bytes))
        .with_guessed_format()
        .map_err(|source| ImageLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let decode_err = |source| ImageLoadError::Decode {
        path: path.to_path_buf(),
        source,
    };

    match reader.format().and_then(passthrough_mime) {
        Some(mime) => {
            // Header sniffing alone accepts truncated files; make sure it decodes.
            reader.decode().map_err(decode_err)?;
            Ok(ContentPart::image(mime, BASE64.encode(&bytes)))
        }
        None => {
            let decoded = reader.decode().map_err(decode_err)?;
            let mut png = Cursor::new(Vec::new());
            decoded
                .write_to(&mut png, ImageFormat::Png)
                .map_err(decode_err)?;
            Ok(ContentPart::image("image/png", BASE64.encode(png.into_inner())))
        }
    }
}

/// Loads every readable image in order, skipping (and logging) the rest.
pub fn load_image_parts(paths: &[PathBuf]) -> Vec<ContentPart> {
    paths
        .iter()
        .filter_map(|path| match load_image_part(path) {
            Ok(part) => Some(part),
            Err(err) => {
                warn!(target = "estimator.images", error = %err, "skipping image");
                None
            }
        })
        .collect()
}
