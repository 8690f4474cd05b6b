use glam::Vec2;
use serde::Serialize;

/// A 2D axis-aligned bounding box represented by minimum and maximum points.
///
/// Image and page coordinates grow downwards, so `min` is the top-left
/// corner and `max` the bottom-right one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Bbox {
    /// The top-left corner.
    pub min: Vec2,
    /// The bottom-right corner.
    pub max: Vec2,
}

impl Bbox {
    /// Creates a new bounding box from minimum and maximum points.
    ///
    /// # Example
    /// ```
    /// use glam::Vec2;
    /// use plancal_core::analysis::bbox::Bbox;
    /// let bbox = Bbox::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 5.0));
    /// assert_eq!(bbox.width(), 10.0);
    /// ```
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Calculates the area of the bounding box.
    ///
    /// # Example
    /// ```
    /// use glam::Vec2;
    /// use plancal_core::analysis::bbox::Bbox;
    /// let bbox = Bbox::new(Vec2::ZERO, Vec2::new(4.0, 3.0));
    /// assert_eq!(bbox.area(), 12.0);
    /// ```
    pub fn area(&self) -> f32 {
        let length = self.max - self.min;

        length.x * length.y
    }

    pub fn perimeter(&self) -> f32 {
        2.0 * (self.width() + self.height())
    }

    /// Scales both corners by the given factor.
    pub fn scale(&self, factor: f32) -> Self {
        Self {
            min: self.min * factor,
            max: self.max * factor,
        }
    }

    /// Grows the box by `distance` on every side.
    pub fn expand(&self, distance: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(distance),
            max: self.max + Vec2::splat(distance),
        }
    }

    /// Clamps the bounding box to lie within the given bounds.
    pub fn clamp(&self, min_bounds: Vec2, max_bounds: Vec2) -> Self {
        Self {
            min: self.min.clamp(min_bounds, max_bounds),
            max: self.max.clamp(min_bounds, max_bounds),
        }
    }

    /// Divides coordinates by the page size, giving values in `[0, 1]`.
    pub fn normalize(&self, size: Vec2) -> Self {
        Self {
            min: self.min / size,
            max: self.max / size,
        }
    }

    /// Splits the box horizontally into consecutive slices whose widths are
    /// proportional to `weights`.
    pub fn split_horizontal(&self, weights: &[usize]) -> Vec<Self> {
        let total = weights.iter().sum::<usize>().max(1) as f32;
        let width = self.width();

        let mut left = self.min.x;
        weights
            .iter()
            .map(|&weight| {
                let right = left + width * weight as f32 / total;
                let slice = Self::new(Vec2::new(left, self.min.y), Vec2::new(right, self.max.y));
                left = right;
                slice
            })
            .collect()
    }
}
