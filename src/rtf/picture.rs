//! RTF picture extraction and `<img>` assembly.
//!
//! A `{\pict ...}` group carries the picture format, its size and scaling
//! as control words, followed by the image data as a run of hex digits.
//! Pictures are written out as `<img>` elements with a `data:` URI.

use super::node::{Group, Node};
use crate::common::encoding::decode_hex_data;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Twips per inch.
const TWIPS_PER_INCH: i32 = 1440;

/// Screen resolution used for pixel sizes.
const SCREEN_DPI: i32 = 96;

/// Image type in RTF documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageType {
    /// Enhanced Metafile
    Emf,
    /// Windows Metafile
    Wmf,
    /// PNG image
    Png,
    /// JPEG image
    Jpeg,
    /// DIB (Device Independent Bitmap)
    Dib,
    /// Mac PICT format
    Pict,
    /// Not declared by the picture group
    #[default]
    Unknown,
}

impl ImageType {
    /// Subtype used in the `data:image/<subtype>` URI.
    pub fn mime_subtype(self) -> &'static str {
        match self {
            ImageType::Emf => "emf",
            ImageType::Wmf => "wmf",
            ImageType::Png => "png",
            ImageType::Jpeg => "jpeg",
            ImageType::Pict => "pict",
            ImageType::Dib | ImageType::Unknown => "bmp",
        }
    }
}

/// Picture extracted from a `{\pict ...}` group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Picture {
    /// Image type declared by a blip keyword
    pub image_type: ImageType,
    /// Picture width (`\picw`)
    pub width: Option<i32>,
    /// Picture height (`\pich`)
    pub height: Option<i32>,
    /// Goal width in twips (`\picwgoal`)
    pub goal_width: Option<i32>,
    /// Goal height in twips (`\pichgoal`)
    pub goal_height: Option<i32>,
    /// Horizontal scaling percentage (`\picscalex`)
    pub scale_x: Option<i32>,
    /// Vertical scaling percentage (`\picscaley`)
    pub scale_y: Option<i32>,
    /// Size of raw binary data (`\binN`)
    pub binary_size: Option<i32>,
    /// Image data as written in the document
    pub data: String,
}

impl Picture {
    /// Extract a picture from a `{\pict ...}` group.
    pub fn from_group(group: &Group) -> Self {
        let mut picture = Self::default();

        for child in &group.children {
            match child {
                Node::ControlWord(word) => {
                    let value = Some(word.parameter);
                    match word.word.as_str() {
                        "emfblip" => picture.image_type = ImageType::Emf,
                        "pngblip" => picture.image_type = ImageType::Png,
                        "jpegblip" => picture.image_type = ImageType::Jpeg,
                        "macpict" => picture.image_type = ImageType::Pict,
                        "picw" => picture.width = value,
                        "pich" => picture.height = value,
                        "picwgoal" => picture.goal_width = value,
                        "pichgoal" => picture.goal_height = value,
                        "picscalex" => picture.scale_x = value,
                        "picscaley" => picture.scale_y = value,
                        "bin" => picture.binary_size = value,
                        _ => {},
                    }
                },
                Node::Text(text) => picture.data.push_str(&text.text),
                Node::Group(_) | Node::ControlSymbol(_) => {},
            }
        }

        picture
    }

    /// Get the computed width in twips, considering scaling.
    #[inline]
    pub fn computed_width(&self) -> Option<i32> {
        self.goal_width.map(|w| match self.scale_x {
            Some(scale) => w.saturating_mul(scale) / 100,
            None => w,
        })
    }

    /// Get the computed height in twips, considering scaling.
    #[inline]
    pub fn computed_height(&self) -> Option<i32> {
        self.goal_height.map(|h| match self.scale_y {
            Some(scale) => h.saturating_mul(scale) / 100,
            None => h,
        })
    }

    /// Displayed width in screen pixels.
    #[inline]
    pub fn width_pixels(&self) -> Option<i32> {
        self.computed_width().map(|tw| tw.saturating_mul(SCREEN_DPI) / TWIPS_PER_INCH)
    }

    /// Displayed height in screen pixels.
    #[inline]
    pub fn height_pixels(&self) -> Option<i32> {
        self.computed_height().map(|tw| tw.saturating_mul(SCREEN_DPI) / TWIPS_PER_INCH)
    }

    /// Render the picture as an `<img>` element with a base64 `data:` URI.
    ///
    /// Hex payloads are decoded and re-encoded as base64. Binary (`\bin`)
    /// payloads are not decoded and produce an empty URI body.
    pub fn to_img_tag(&self) -> String {
        let mut image_type = self.image_type;
        let mut encoded = String::new();

        if let Some(size) = self.binary_size {
            log::warn!("Binary picture payload of {} bytes is not supported", size);
        } else {
            match decode_hex_data(&self.data) {
                Some(bytes) => {
                    if image_type == ImageType::Unknown {
                        image_type = detect_image_type(&bytes);
                    }
                    encoded = STANDARD.encode(&bytes);
                },
                None => log::warn!("Picture data is not valid hex, omitting payload"),
            }
        }

        let mut tag = format!(
            "<img src=\"data:image/{};base64,{}\"",
            image_type.mime_subtype(),
            encoded
        );
        if let (Some(width), Some(height)) = (self.width_pixels(), self.height_pixels()) {
            tag.push_str(&format!(" width=\"{width}\" height=\"{height}\""));
        }
        tag.push_str(" />");
        tag
    }
}

/// Detect image type from binary signature.
///
/// # Arguments
///
/// * `data` - Binary image data
///
/// # Returns
///
/// Detected image type or Unknown
pub fn detect_image_type(data: &[u8]) -> ImageType {
    // Check JPEG signature (starts with FFD8)
    if data.starts_with(&[0xFF, 0xD8]) {
        return ImageType::Jpeg;
    }

    // Check PNG signature
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return ImageType::Png;
    }

    // EMF: record type 1, " EMF" marker at offset 40
    if data.len() >= 44 && data[0..4] == [0x01, 0x00, 0x00, 0x00] && data[40..44] == *b" EMF" {
        return ImageType::Emf;
    }

    // Aldus Placeable Metafile
    if data.starts_with(&[0xD7, 0xCD, 0xC6, 0x9A]) {
        return ImageType::Wmf;
    }

    if data.starts_with(b"BM") {
        return ImageType::Dib;
    }

    ImageType::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtf::parse;

    fn pict(input: &str) -> Picture {
        let root = parse(input).unwrap();
        let Some(Node::Group(group)) = root.children.into_iter().next() else {
            panic!("expected a picture group");
        };
        Picture::from_group(&group)
    }

    #[test]
    fn test_detect_png() {
        let png_sig = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(detect_image_type(&png_sig), ImageType::Png);
    }

    #[test]
    fn test_detect_jpeg() {
        let jpeg_sig = vec![0xFF, 0xD8, 0xFF, 0xE0];
        assert_eq!(detect_image_type(&jpeg_sig), ImageType::Jpeg);
        assert_eq!(detect_image_type(&[]), ImageType::Unknown);
    }

    #[test]
    fn test_extract_picture() {
        let picture = pict(r"{{\pict\pngblip\picw10\pich20\picwgoal1440\pichgoal720\picscalex50 0a0b}}");
        assert_eq!(picture.image_type, ImageType::Png);
        assert_eq!(picture.width, Some(10));
        assert_eq!(picture.height, Some(20));
        assert_eq!(picture.scale_x, Some(50));
        assert_eq!(picture.scale_y, None);
        assert_eq!(picture.data, "0a0b");
    }

    #[test]
    fn test_picture_dimensions() {
        let picture = Picture {
            goal_width: Some(1440), // 1 inch
            goal_height: Some(1440),
            scale_x: Some(200),
            scale_y: Some(50),
            ..Picture::default()
        };

        assert_eq!(picture.computed_width(), Some(2880));
        assert_eq!(picture.width_pixels(), Some(192));
        assert_eq!(picture.height_pixels(), Some(48));
    }

    #[test]
    fn test_img_tag_reencodes_hex_as_base64() {
        let picture = pict(r"{{\pict\jpegblip 48656c6c6f}}");
        assert_eq!(
            picture.to_img_tag(),
            r#"<img src="data:image/jpeg;base64,SGVsbG8=" />"#
        );
    }

    #[test]
    fn test_img_tag_with_size() {
        let picture = pict(r"{{\pict\pngblip\picwgoal1440\pichgoal720 00}}");
        assert_eq!(
            picture.to_img_tag(),
            r#"<img src="data:image/png;base64,AA==" width="96" height="48" />"#
        );
    }

    #[test]
    fn test_img_tag_sniffs_undeclared_format() {
        let picture = pict(r"{{\pict\wmetafile8 89504e470d0a1a0a}}");
        assert!(picture.to_img_tag().starts_with("<img src=\"data:image/png;base64,"));

        let picture = pict(r"{{\pict 0102}}");
        assert!(picture.to_img_tag().starts_with("<img src=\"data:image/bmp;base64,AQI=\""));
    }

    #[test]
    fn test_img_tag_binary_payload_is_empty() {
        let picture = Picture {
            image_type: ImageType::Png,
            binary_size: Some(4),
            data: "abcd".to_string(),
            ..Picture::default()
        };
        assert_eq!(picture.to_img_tag(), r#"<img src="data:image/png;base64," />"#);
    }

    #[test]
    fn test_img_tag_invalid_hex() {
        let picture = pict(r"{{\pict\emfblip xyz}}");
        assert_eq!(picture.to_img_tag(), r#"<img src="data:image/emf;base64," />"#);
    }
}
