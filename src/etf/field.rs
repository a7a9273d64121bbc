//! Dense field of tangent directions.
//!
//! Vectors are stored row-major as `(tx, ty)` in image axes. After every
//! publication each vector is either exactly zero or unit length.
use crate::error::CldError;
use crate::image::ImageF32;
use crate::types::FlowVector;

/// Vectors shorter than this are treated as "no direction".
pub const MIN_NORM: f32 = 1e-6;

/// Normalize `v` to unit length, or return zero when it has no direction.
#[inline]
pub fn unit_or_zero(v: FlowVector) -> FlowVector {
    let n = v.norm();
    if n.is_finite() && n > MIN_NORM {
        v / n
    } else {
        FlowVector::zeros()
    }
}

/// Tangent for a gradient `(gx, gy)`: the gradient rotated by a quarter turn,
/// `(gx, gy) -> (gy, -gx)`, normalized.
#[inline]
pub fn tangent_from_gradient(gx: f32, gy: f32) -> FlowVector {
    unit_or_zero(FlowVector::new(gy, -gx))
}

/// Direction across the flow at a pixel (the inverse quarter turn of the
/// tangent, i.e. the gradient direction).
#[inline]
pub fn across(t: &FlowVector) -> FlowVector {
    FlowVector::new(-t.y, t.x)
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlowField {
    w: usize,
    h: usize,
    vectors: Vec<FlowVector>,
}

impl FlowField {
    /// All-zero field of size `w × h`.
    pub fn zeros(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            vectors: vec![FlowVector::zeros(); w * h],
        }
    }

    /// Build a field from raw vectors, normalizing each one.
    pub fn from_vectors(w: usize, h: usize, vectors: Vec<FlowVector>) -> Result<Self, CldError> {
        if vectors.len() != w * h {
            return Err(CldError::SizeMismatch {
                expected: w * h,
                actual: vectors.len(),
            });
        }
        Ok(Self {
            w,
            h,
            vectors: vectors.into_iter().map(unit_or_zero).collect(),
        })
    }

    /// Initial field: every gradient rotated onto the edge direction.
    pub fn from_gradients(gx: &ImageF32, gy: &ImageF32) -> Self {
        debug_assert_eq!((gx.w, gx.h), (gy.w, gy.h));
        let vectors = gx
            .data
            .iter()
            .zip(&gy.data)
            .map(|(&x, &y)| tangent_from_gradient(x, y))
            .collect();
        Self {
            w: gx.w,
            h: gx.h,
            vectors,
        }
    }

    /// Publish a buffer that was filled by a refinement pass. Vectors are
    /// normalized by the caller.
    pub(crate) fn from_normalized(w: usize, h: usize, vectors: Vec<FlowVector>) -> Self {
        debug_assert_eq!(vectors.len(), w * h);
        Self { w, h, vectors }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn vectors(&self) -> &[FlowVector] {
        &self.vectors
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> FlowVector {
        self.vectors[y * self.w + x]
    }

    /// True when every vector is zero or unit length within `tol`.
    pub fn is_normalized(&self, tol: f32) -> bool {
        self.vectors.iter().all(|v| {
            let n = v.norm();
            n == 0.0 || (n - 1.0).abs() <= tol
        })
    }

    /// Per-pixel undirected angle (radians, in `[0, π/2]`) between this field
    /// and `other`; zero where either vector is zero.
    pub fn angular_difference_map(&self, other: &FlowField) -> Result<ImageF32, CldError> {
        if (self.w, self.h) != (other.w, other.h) {
            return Err(CldError::SizeMismatch {
                expected: self.vectors.len(),
                actual: other.vectors.len(),
            });
        }
        let mut out = ImageF32::new(self.w, self.h);
        for ((dst, a), b) in out.data.iter_mut().zip(&self.vectors).zip(&other.vectors) {
            if a.norm() == 0.0 || b.norm() == 0.0 {
                continue;
            }
            *dst = a.dot(b).abs().clamp(0.0, 1.0).acos();
        }
        Ok(out)
    }
}
