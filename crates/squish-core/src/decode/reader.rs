//! Source byte decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{DecodeError, DecodedImage, Orientation};

/// Decode source image bytes (JPEG or PNG) into RGB pixels.
///
/// The format is detected from the content, not from any file name. EXIF
/// orientation is applied so the pixels are upright; the JPEG produced later
/// carries no EXIF block, so it has to be baked in here.
///
/// # Errors
///
/// - `DecodeError::EmptyInput` if `bytes` is empty.
/// - `DecodeError::InvalidFormat` if the format is unknown or not compiled in.
/// - `DecodeError::CorruptedFile` if the data is truncated or malformed.
/// - `DecodeError::OutOfMemory` if the decoder's allocation limits are hit.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let img = read_dynamic(bytes)?;
    let oriented = apply_orientation(img, get_orientation(bytes));
    Ok(DecodedImage::from_rgb_image(oriented.into_rgb8()))
}

/// Decode source image bytes without applying EXIF orientation.
pub fn decode_image_no_orientation(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let img = read_dynamic(bytes)?;
    Ok(DecodedImage::from_rgb_image(img.into_rgb8()))
}

/// Extract the EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` when there is no EXIF data or the tag is
/// missing.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    let Ok(exif) = Reader::new().read_from_container(&mut cursor) else {
        return Orientation::Normal;
    };

    exif.get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .map(Orientation::from)
        .unwrap_or_default()
}

fn read_dynamic(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    Ok(reader.decode()?)
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
