//! Source image decoding
//!
//! Only three raster formats are accepted. GIF is the only animated one; its canonical
//! size is the bounding box of every frame's placement rectangle, so animations whose
//! frames are smaller than the canvas and drawn at offsets are measured correctly.

use emotia_core::AppError;
use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// Accepted upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    Jpeg,
    Png,
    Gif,
}

impl SourceFormat {
    /// Content types accepted on the `emote` part.
    pub const ACCEPTED_CONTENT_TYPES: [&'static str; 3] = ["image/jpeg", "image/png", "image/gif"];

    /// Map a declared content type (parameters and case ignored) to a format.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "image/jpeg" => Some(SourceFormat::Jpeg),
            "image/png" => Some(SourceFormat::Png),
            "image/gif" => Some(SourceFormat::Gif),
            _ => None,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            SourceFormat::Jpeg => "image/jpeg",
            SourceFormat::Png => "image/png",
            SourceFormat::Gif => "image/gif",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            SourceFormat::Jpeg => "jpg",
            SourceFormat::Png => "png",
            SourceFormat::Gif => "gif",
        }
    }

    pub fn is_animated(self) -> bool {
        self == SourceFormat::Gif
    }

    fn image_format(self) -> ImageFormat {
        match self {
            SourceFormat::Jpeg => ImageFormat::Jpeg,
            SourceFormat::Png => ImageFormat::Png,
            SourceFormat::Gif => ImageFormat::Gif,
        }
    }
}

/// Placement rectangle of one animation frame on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl FrameRect {
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Build from edge coordinates (min corner, max corner).
    pub fn from_edges(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self::new(
            left,
            top,
            right.saturating_sub(left),
            bottom.saturating_sub(top),
        )
    }

    pub fn right(&self) -> u32 {
        self.left.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u32 {
        self.top.saturating_add(self.height)
    }
}

/// Size of the box spanning every rectangle: from the smallest left/top edge to the
/// largest right/bottom edge. `None` for an empty input.
pub fn bounding_box<I>(rects: I) -> Option<(u32, u32)>
where
    I: IntoIterator<Item = FrameRect>,
{
    let mut iter = rects.into_iter();
    let first = iter.next()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) =
        (first.left, first.top, first.right(), first.bottom());

    for rect in iter {
        min_x = min_x.min(rect.left);
        min_y = min_y.min(rect.top);
        max_x = max_x.max(rect.right());
        max_y = max_y.max(rect.bottom());
    }

    Some((max_x - min_x, max_y - min_y))
}

/// Canonical description of a decoded upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceGeometry {
    pub format: SourceFormat,
    pub frame_count: usize,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Could not decode {format:?} image: {message}")]
    Malformed {
        format: SourceFormat,
        message: String,
    },

    #[error("GIF exceeds the maximum amount of frames permitted ({max})")]
    TooManyFrames { max: usize },

    #[error("Image has zero dimensions ({width}x{height})")]
    ZeroDimensions { width: u32, height: u32 },

    #[error("Failed to read source file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode task failed: {0}")]
    Task(String),
}

impl From<DecodeError> for AppError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::Io(e) => AppError::Internal(format!("IO error: {}", e)),
            DecodeError::Task(msg) => AppError::Internal(msg),
            other => AppError::InvalidInput(other.to_string()),
        }
    }
}

/// Decodes uploads and enforces the animation frame ceiling.
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    max_frames: usize,
}

impl Decoder {
    pub fn new(max_frames: usize) -> Self {
        Self { max_frames }
    }

    pub fn max_frames(&self) -> usize {
        self.max_frames
    }

    /// Decode `data` as `format` and return its canonical geometry.
    ///
    /// CPU-bound; async callers should use [`Decoder::decode_file`].
    pub fn decode(&self, data: &[u8], format: SourceFormat) -> Result<SourceGeometry, DecodeError> {
        let geometry = match format {
            SourceFormat::Gif => self.decode_animation(data)?,
            SourceFormat::Jpeg | SourceFormat::Png => {
                let img = ImageReader::with_format(Cursor::new(data), format.image_format())
                    .decode()
                    .map_err(|e| DecodeError::Malformed {
                        format,
                        message: e.to_string(),
                    })?;
                SourceGeometry {
                    format,
                    frame_count: 1,
                    width: img.width(),
                    height: img.height(),
                }
            }
        };

        if geometry.width == 0 || geometry.height == 0 {
            return Err(DecodeError::ZeroDimensions {
                width: geometry.width,
                height: geometry.height,
            });
        }

        Ok(geometry)
    }

    /// Measure a GIF from its frame descriptors without decoding pixel data.
    ///
    /// The logical screen size is ignored; only the frames' placement rectangles count.
    fn decode_animation(&self, data: &[u8]) -> Result<SourceGeometry, DecodeError> {
        let malformed = |e: gif::DecodingError| DecodeError::Malformed {
            format: SourceFormat::Gif,
            message: e.to_string(),
        };

        let mut options = gif::DecodeOptions::new();
        options.set_color_output(gif::ColorOutput::Indexed);
        let mut decoder = options.read_info(Cursor::new(data)).map_err(malformed)?;

        let mut rects = Vec::new();
        while let Some(frame) = decoder.next_frame_info().map_err(malformed)? {
            if rects.len() == self.max_frames {
                return Err(DecodeError::TooManyFrames {
                    max: self.max_frames,
                });
            }
            rects.push(FrameRect::new(
                u32::from(frame.left),
                u32::from(frame.top),
                u32::from(frame.width),
                u32::from(frame.height),
            ));
        }

        let (width, height) = bounding_box(rects.iter().copied()).ok_or_else(|| {
            DecodeError::Malformed {
                format: SourceFormat::Gif,
                message: "GIF contains no frames".to_string(),
            }
        })?;

        Ok(SourceGeometry {
            format: SourceFormat::Gif,
            frame_count: rects.len(),
            width,
            height,
        })
    }

    /// Read and decode a file on the blocking pool.
    pub async fn decode_file(
        &self,
        path: &Path,
        format: SourceFormat,
    ) -> Result<SourceGeometry, DecodeError> {
        let data = tokio::fs::read(path).await?;
        let decoder = *self;
        tokio::task::spawn_blocking(move || decoder.decode(&data, format))
            .await
            .map_err(|e| DecodeError::Task(e.to_string()))?
    }
}
