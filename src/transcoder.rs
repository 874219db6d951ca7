use crate::error::StorageError;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use tracing::{debug, warn};

/// Bound on the larger dimension of transcoded images, in pixels.
pub const MAX_DIMENSION: u32 = 600;

/// JPEG quality used for re-encoding, out of 100.
pub const JPEG_QUALITY: u8 = 80;

/// Transcode an uploaded image into a bounded-size JPEG.
///
/// The payload is decoded (any format the `image` crate recognizes), scaled
/// preserving aspect ratio so the larger dimension lands exactly on
/// [`MAX_DIMENSION`] (inputs smaller than the bound are enlarged to reach
/// it), and re-encoded as JPEG at [`JPEG_QUALITY`]. Original format and
/// metadata are discarded. Decode failures surface as
/// [`StorageError::Transcode`]; the object must not be written in that case.
pub fn transcode(data: &[u8]) -> Result<Vec<u8>, StorageError> {
    let decoded = image::load_from_memory(data).map_err(|error| {
        warn!(%error, "Rejecting upload that could not be decoded as an image");
        StorageError::Transcode(error)
    })?;

    let resized = decoded.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Triangle);
    debug!(
        from_width = decoded.width(),
        from_height = decoded.height(),
        to_width = resized.width(),
        to_height = resized.height(),
        "Resized image for storage"
    );

    // JPEG carries no alpha channel
    let rgb = resized.to_rgb8();

    let mut output = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut output, JPEG_QUALITY);
    encoder
        .encode_image(&rgb)
        .map_err(StorageError::Transcode)?;

    Ok(output)
}
