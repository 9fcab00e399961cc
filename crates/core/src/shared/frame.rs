use ndarray::ArrayView3;

use crate::shared::error::{Geometry, MotionError};

/// Interleaved samples per pixel: red, green, blue, alpha.
pub const CHANNELS: usize = 4;

/// A single video frame: contiguous RGBA8 bytes in row-major order.
///
/// Construction never panics on a bad buffer length. The differencer checks
/// the length against the declared dimensions and reports a
/// [`MotionError::DimensionMismatch`] instead.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, index: usize) -> Self {
        Self {
            data,
            width,
            height,
            index,
        }
    }

    /// Takes ownership of a decoded RGBA image without copying its pixels.
    pub fn from_rgba_image(image: image::RgbaImage, index: usize) -> Self {
        let (width, height) = image.dimensions();
        Self::new(image.into_raw(), width, height, index)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * CHANNELS
    }

    pub fn has_valid_len(&self) -> bool {
        self.data.len() == self.expected_len()
    }

    /// Declared geometry paired with the actual buffer length.
    pub fn geometry(&self) -> Geometry {
        Geometry {
            width: self.width,
            height: self.height,
            len: self.data.len(),
        }
    }

    /// Geometry this frame would have if its buffer matched its dimensions.
    pub fn declared_geometry(&self) -> Geometry {
        Geometry {
            len: self.expected_len(),
            ..self.geometry()
        }
    }

    /// `(height, width, channel)` view over the pixel data.
    pub fn as_ndarray(&self) -> Result<ArrayView3<'_, u8>, MotionError> {
        ArrayView3::from_shape(self.shape(), &self.data).map_err(|_| {
            MotionError::DimensionMismatch {
                expected: self.declared_geometry(),
                actual: self.geometry(),
            }
        })
    }

    fn shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, CHANNELS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 16]; // 2x2x4
        let frame = Frame::new(data.clone(), 2, 2, 5);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.index(), 5);
        assert_eq!(frame.data(), &data[..]);
        assert!(frame.has_valid_len());
    }

    #[test]
    fn test_mismatched_length_is_reported_not_panicked() {
        let frame = Frame::new(vec![0u8; 10], 2, 2, 0);
        assert!(!frame.has_valid_len());
        assert_eq!(frame.expected_len(), 16);
        let err = frame.as_ndarray().unwrap_err();
        assert_eq!(
            err,
            MotionError::DimensionMismatch {
                expected: Geometry {
                    width: 2,
                    height: 2,
                    len: 16
                },
                actual: Geometry {
                    width: 2,
                    height: 2,
                    len: 10
                },
            }
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let frame = Frame::new(vec![100u8; 16], 2, 2, 0);
        let mut cloned = frame.clone();
        cloned.data_mut()[0] = 0;
        assert_eq!(frame.data()[0], 100);
        assert_eq!(cloned.data()[0], 0);
    }

    #[test]
    fn test_as_ndarray_shape() {
        let frame = Frame::new(vec![0u8; 32], 4, 2, 0);
        let arr = frame.as_ndarray().unwrap();
        assert_eq!(arr.shape(), &[2, 4, 4]); // (height, width, channels)
    }

    #[test]
    fn test_as_ndarray_pixel_access() {
        // 2x2 RGBA: set pixel (row=1, col=0) to opaque green
        let mut data = vec![0u8; 16];
        data[9] = 255;
        data[11] = 255;
        let frame = Frame::new(data, 2, 2, 0);
        let arr = frame.as_ndarray().unwrap();
        assert_eq!(arr[[1, 0, 0]], 0);
        assert_eq!(arr[[1, 0, 1]], 255);
        assert_eq!(arr[[1, 0, 3]], 255);
    }

    #[test]
    fn test_from_rgba_image_keeps_layout() {
        let mut img = image::RgbaImage::new(3, 2);
        img.put_pixel(2, 1, image::Rgba([1, 2, 3, 4]));
        let frame = Frame::from_rgba_image(img, 7);
        assert_eq!(frame.width(), 3);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.index(), 7);
        let offset = (3 + 2) * CHANNELS; // row 1, col 2
        assert_eq!(&frame.data()[offset..offset + 4], &[1, 2, 3, 4]);
    }
}
