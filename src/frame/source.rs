use crate::foundation::core::Rgba8;
use crate::foundation::error::{GifError, GifResult};
use image::{DynamicImage, RgbaImage};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// A live drawing surface whose pixels are read when its frame is dispatched.
///
/// Reads return `width * height` straight-alpha RGBA8 pixels starting at the surface origin;
/// areas outside the surface read as transparent black.
pub trait PixelSurface: Send + Sync {
    /// Current surface size in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Read a `width x height` RGBA8 region from the origin.
    fn read_pixels(&self, width: u32, height: u32) -> anyhow::Result<Vec<u8>>;
}

/// Something that can paint itself onto a canvas prefilled with the session background.
pub trait Drawable: Send + Sync {
    /// Natural size in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Paint at the canvas origin.
    fn draw_onto(&self, canvas: &mut RgbaImage);
}

/// A caller-owned canvas that may keep changing after `add_frame`.
impl PixelSurface for Mutex<RgbaImage> {
    fn dimensions(&self) -> (u32, u32) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .dimensions()
    }

    fn read_pixels(&self, width: u32, height: u32) -> anyhow::Result<Vec<u8>> {
        let src = self.lock().unwrap_or_else(PoisonError::into_inner);
        if src.dimensions() == (width, height) {
            return Ok(src.as_raw().clone());
        }
        let mut out = RgbaImage::new(width, height);
        image::imageops::replace(&mut out, &*src, 0, 0);
        Ok(out.into_raw())
    }
}

impl Drawable for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbaImage::dimensions(self)
    }

    fn draw_onto(&self, canvas: &mut RgbaImage) {
        image::imageops::overlay(canvas, self, 0, 0);
    }
}

impl Drawable for DynamicImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn draw_onto(&self, canvas: &mut RgbaImage) {
        image::imageops::overlay(canvas, &self.to_rgba8(), 0, 0);
    }
}

/// Raw straight-alpha RGBA8 pixels with their size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageData {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes, row-major.
    pub data: Vec<u8>,
}

impl ImageData {
    /// Wrap a pixel buffer.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }
}

/// A pixel source handed to [`crate::EncodeSession::add_frame`].
#[derive(Clone)]
pub enum FrameInput {
    /// Pixels already in memory; used as-is.
    Pixels(ImageData),
    /// A live surface read at dispatch time (or at add time when `copy` is set).
    Surface(Arc<dyn PixelSurface>),
    /// An element drawn over the background at dispatch time (or at add time when `copy` is set).
    Drawable(Arc<dyn Drawable>),
    /// A source this encoder cannot read; `add_frame` rejects it.
    Unsupported(String),
}

impl fmt::Debug for FrameInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixels(img) => write!(f, "Pixels({}x{})", img.width, img.height),
            Self::Surface(s) => write!(f, "Surface({:?})", s.dimensions()),
            Self::Drawable(d) => write!(f, "Drawable({:?})", d.dimensions()),
            Self::Unsupported(kind) => write!(f, "Unsupported({kind})"),
        }
    }
}

impl From<ImageData> for FrameInput {
    fn from(img: ImageData) -> Self {
        Self::Pixels(img)
    }
}

impl From<RgbaImage> for FrameInput {
    fn from(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self::Pixels(ImageData::new(width, height, img.into_raw()))
    }
}

/// 8-bit images become pixel buffers; wider color types are not supported.
impl From<DynamicImage> for FrameInput {
    fn from(img: DynamicImage) -> Self {
        match img {
            DynamicImage::ImageRgba8(rgba) => rgba.into(),
            DynamicImage::ImageRgb8(_)
            | DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLumaA8(_) => img.to_rgba8().into(),
            other => Self::Unsupported(format!("{:?} image", other.color())),
        }
    }
}

/// Pixel data held by a queued frame, in exactly one form.
#[derive(Clone)]
pub(crate) enum FramePixels {
    /// Caller buffer, taken as-is.
    Direct(Arc<[u8]>),
    /// Buffer read from a surface or drawable at add time.
    Copied(Arc<[u8]>),
    /// Read when the frame is dispatched.
    Lazy(LazySource),
}

#[derive(Clone)]
pub(crate) enum LazySource {
    Surface(Arc<dyn PixelSurface>),
    Drawable(Arc<dyn Drawable>),
}

impl LazySource {
    fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Surface(s) => s.dimensions(),
            Self::Drawable(d) => d.dimensions(),
        }
    }

    fn rasterize(&self, width: u32, height: u32, background: Rgba8) -> anyhow::Result<Vec<u8>> {
        match self {
            Self::Surface(s) => s.read_pixels(width, height),
            Self::Drawable(d) => {
                let mut canvas = RgbaImage::from_pixel(width, height, background.to_pixel());
                d.draw_onto(&mut canvas);
                Ok(canvas.into_raw())
            }
        }
    }
}

/// Validated input: pixel storage plus the natural size of the source.
pub(crate) struct AcceptedSource {
    pub(crate) pixels: FramePixels,
    pub(crate) dimensions: (u32, u32),
}

impl FramePixels {
    /// Validate `input` and pick its storage form.
    ///
    /// `raster_size` is the canvas size used when `copy` forces an eager read; when the session
    /// has no size yet the source's own size is used.
    pub(crate) fn accept(
        input: FrameInput,
        copy: bool,
        raster_size: (Option<u32>, Option<u32>),
        background: Rgba8,
    ) -> GifResult<AcceptedSource> {
        let lazy = match input {
            FrameInput::Pixels(img) => {
                if img.width == 0 || img.height == 0 {
                    return Err(GifError::invalid_image("image has zero width or height"));
                }
                let expected = (img.width as usize) * (img.height as usize) * 4;
                if img.data.len() != expected {
                    return Err(GifError::invalid_image(format!(
                        "pixel buffer is {} bytes, expected {expected} for {}x{} RGBA8",
                        img.data.len(),
                        img.width,
                        img.height
                    )));
                }
                return Ok(AcceptedSource {
                    pixels: Self::Direct(img.data.into()),
                    dimensions: (img.width, img.height),
                });
            }
            FrameInput::Surface(s) => LazySource::Surface(s),
            FrameInput::Drawable(d) => LazySource::Drawable(d),
            FrameInput::Unsupported(kind) => {
                return Err(GifError::invalid_image(format!(
                    "unsupported pixel source: {kind}"
                )));
            }
        };

        let dimensions = lazy.dimensions();
        if dimensions.0 == 0 || dimensions.1 == 0 {
            return Err(GifError::invalid_image("source has zero width or height"));
        }
        if !copy {
            return Ok(AcceptedSource {
                pixels: Self::Lazy(lazy),
                dimensions,
            });
        }

        let width = raster_size.0.unwrap_or(dimensions.0);
        let height = raster_size.1.unwrap_or(dimensions.1);
        let data = lazy
            .rasterize(width, height, background)
            .map_err(|e| GifError::invalid_image(format!("copy source pixels: {e}")))?;
        Ok(AcceptedSource {
            pixels: Self::Copied(data.into()),
            dimensions,
        })
    }

    /// RGBA8 bytes for a `width x height` task, reading lazy sources now.
    pub(crate) fn acquire(
        &self,
        width: u32,
        height: u32,
        background: Rgba8,
    ) -> anyhow::Result<Arc<[u8]>> {
        match self {
            Self::Direct(data) | Self::Copied(data) => Ok(Arc::clone(data)),
            Self::Lazy(lazy) => Ok(lazy.rasterize(width, height, background)?.into()),
        }
    }

    pub(crate) fn is_lazy(&self) -> bool {
        matches!(self, Self::Lazy(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/source.rs"]
mod tests;
