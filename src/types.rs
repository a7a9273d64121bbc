use crate::image::{GrayImageU8, ImageU8, ImageView};
use nalgebra::Vector2;

/// Direction vector `(tx, ty)` in image axes: x grows to the right (column),
/// y grows downwards (row).
pub type FlowVector = Vector2<f32>;

/// Value written where the response reaches the threshold.
pub const MASK_ON: u8 = 255;
/// Value written below the threshold; line pixels of the drawing.
pub const MASK_OFF: u8 = 0;

/// Binary `{0, 255}` result of one FDoG pass, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeMask {
    pub w: usize,
    pub h: usize,
    pub data: Vec<u8>,
}

impl EdgeMask {
    /// All-off mask of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![MASK_OFF; w * h],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.w + x]
    }

    /// Number of pixels below threshold (the drawn lines).
    pub fn off_pixels(&self) -> usize {
        self.data.iter().filter(|&&v| v == MASK_OFF).count()
    }

    /// True when every pixel is off.
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&v| v == MASK_OFF)
    }

    pub fn as_view(&self) -> ImageU8<'_> {
        ImageU8::packed(self.w, self.h, &self.data)
    }

    pub fn to_gray(&self) -> GrayImageU8 {
        GrayImageU8::from_mask(self)
    }
}

impl ImageView for EdgeMask {
    type Pixel = u8;

    fn width(&self) -> usize {
        self.w
    }
    fn height(&self) -> usize {
        self.h
    }
    fn stride(&self) -> usize {
        self.w
    }
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}
