use crate::bbox::{BBox, Ltwh};
use crate::error::Error;
use image::RgbImage;

/// One decoded video frame together with the raw player candidates found in it.
pub struct Frame {
    pub index: u64,
    pub image: RgbImage,
    pub candidates: Vec<BBox<Ltwh>>,
}

impl Frame {
    #[inline]
    pub fn new(index: u64, image: RgbImage, candidates: Vec<BBox<Ltwh>>) -> Self {
        Self {
            index,
            image,
            candidates,
        }
    }

    /// Wraps a packed RGB buffer, row-major, three bytes per pixel.
    pub fn from_raw(
        index: u64,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        candidates: Vec<BBox<Ltwh>>,
    ) -> Result<Self, Error> {
        let len = pixels.len();
        let image = RgbImage::from_raw(width, height, pixels).ok_or(Error::FrameSize {
            width,
            height,
            len,
        })?;

        Ok(Self::new(index, image, candidates))
    }

    #[inline]
    pub fn dims(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &BBox<Ltwh>> {
        self.candidates.iter()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
