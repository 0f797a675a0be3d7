/// Minimum and maximum extents of a rectangular region.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox<T> {
    /// Minimum extent in the x direction-- the left side of a region.
    pub x_min: T,
    /// Minimum extent in the y direction. In a Y-up coordinate system,
    /// which is used by fonts, this represents the bottom of a region.
    pub y_min: T,
    /// Maximum extent in the x direction-- the right side of a region.
    pub x_max: T,
    /// Maximum extend in the y direction. In a Y-up coordinate system,
    /// which is used by fonts, this represents the top of the
    /// region.
    pub y_max: T,
}

impl<T> BoundingBox<T>
where
    T: PartialOrd + Copy,
{
    /// A degenerate box containing the single point (x, y).
    pub fn from_point(x: T, y: T) -> Self {
        Self {
            x_min: x,
            y_min: y,
            x_max: x,
            y_max: y,
        }
    }

    /// Grow the box so that it contains the point (x, y).
    pub fn add_point(&mut self, x: T, y: T) {
        if x < self.x_min {
            self.x_min = x;
        }
        if x > self.x_max {
            self.x_max = x;
        }
        if y < self.y_min {
            self.y_min = y;
        }
        if y > self.y_max {
            self.y_max = y;
        }
    }

    /// Returns true if the point lies inside or on the edge of the box.
    pub fn contains(&self, x: T, y: T) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grow_from_points() {
        let mut bbox = BoundingBox::from_point(10, 20);
        bbox.add_point(-5, 40);
        bbox.add_point(3, -1);
        assert_eq!(
            bbox,
            BoundingBox {
                x_min: -5,
                y_min: -1,
                x_max: 10,
                y_max: 40
            }
        );
        assert!(bbox.contains(0, 0));
        assert!(!bbox.contains(11, 0));
    }
}
