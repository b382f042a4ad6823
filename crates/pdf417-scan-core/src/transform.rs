//! Projective transform between barcode grid coordinates and image pixels.

use nalgebra::SMatrix;

/// One grid-to-image corner correspondence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridCorner {
    /// Barcode grid column (-1 for the left indicator, `data_columns` for
    /// the right indicator).
    pub column: i32,
    /// Barcode grid row.
    pub row: i32,
    /// Image position of the corner's first scan point.
    pub x: i32,
    pub y: i32,
}

/// Homography mapping grid `(column, row)` to image `(x, y)`:
/// `x = (aX + bY + c) / (gX + hY + 1)`, `y = (dX + eY + f) / (gX + hY + 1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridTransform {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
    g: f64,
    h: f64,
}

impl GridTransform {
    /// Solve the eight homography coefficients from four corner
    /// correspondences ordered top-left, top-right, bottom-left,
    /// bottom-right.
    ///
    /// Gaussian elimination with pivot repair by row addition: a zero
    /// diagonal is fixed by adding the first later row that is non-zero in
    /// that column; if none exists the system is singular.
    pub fn solve(corners: &[GridCorner; 4]) -> Option<Self> {
        let mut m = SMatrix::<f64, 8, 9>::zeros();

        for (i, corner) in corners.iter().enumerate() {
            let col = f64::from(corner.column);
            let row = f64::from(corner.row);
            let x = f64::from(corner.x);
            let y = f64::from(corner.y);

            m[(i, 0)] = col;
            m[(i, 1)] = row;
            m[(i, 2)] = 1.0;
            m[(i, 6)] = -col * x;
            m[(i, 7)] = -row * x;
            m[(i, 8)] = x;

            m[(i + 4, 3)] = col;
            m[(i + 4, 4)] = row;
            m[(i + 4, 5)] = 1.0;
            m[(i + 4, 6)] = -col * y;
            m[(i + 4, 7)] = -row * y;
            m[(i + 4, 8)] = y;
        }

        for row in 0..8 {
            if m[(row, row)] == 0.0 {
                let repair = (row + 1..8).find(|&r| m[(r, row)] != 0.0)?;
                for col in row..9 {
                    m[(row, col)] += m[(repair, col)];
                }
            }

            // Normalize the pivot row (the pivot itself is never read
            // again, so only the trailing columns are divided).
            for col in (row + 1..9).rev() {
                m[(row, col)] /= m[(row, row)];
            }

            for below in row + 1..8 {
                for col in (row + 1..9).rev() {
                    m[(below, col)] -= m[(row, col)] * m[(below, row)];
                }
            }
        }

        // Back-substitute the solved values upward.
        for col in (1..8).rev() {
            for row in (0..col).rev() {
                m[(row, 8)] -= m[(row, col)] * m[(col, 8)];
            }
        }

        Some(Self {
            a: m[(0, 8)],
            b: m[(1, 8)],
            c: m[(2, 8)],
            d: m[(3, 8)],
            e: m[(4, 8)],
            f: m[(5, 8)],
            g: m[(6, 8)],
            h: m[(7, 8)],
        })
    }

    /// Map a grid position to image coordinates.
    #[inline]
    pub fn map(&self, column: i32, row: i32) -> (f64, f64) {
        let col = f64::from(column);
        let r = f64::from(row);
        let w = self.g * col + self.h * r + 1.0;
        (
            (self.a * col + self.b * r + self.c) / w,
            (self.d * col + self.e * r + self.f) / w,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner(column: i32, row: i32, x: i32, y: i32) -> GridCorner {
        GridCorner { column, row, x, y }
    }

    #[test]
    fn axis_aligned_grid_interpolates_linearly() {
        // Columns -1..=4 at 50px each, rows 0..=8 at 10px each.
        let corners = [
            corner(-1, 0, 100, 20),
            corner(4, 0, 350, 20),
            corner(-1, 8, 100, 100),
            corner(4, 8, 350, 100),
        ];
        let t = GridTransform::solve(&corners).expect("solvable");
        for &(col, row, x, y) in &[
            (-1, 0, 100.0, 20.0),
            (4, 8, 350.0, 100.0),
            (0, 4, 150.0, 60.0),
            (2, 2, 250.0, 40.0),
        ] {
            let (mx, my) = t.map(col, row);
            assert!((mx - x).abs() < 1e-6, "col {col} row {row}: x {mx} != {x}");
            assert!((my - y).abs() < 1e-6, "col {col} row {row}: y {my} != {y}");
        }
    }

    #[test]
    fn skewed_quad_reproduces_its_corners() {
        let corners = [
            corner(-1, 0, 80, 31),
            corner(9, 0, 505, 18),
            corner(-1, 26, 72, 260),
            corner(9, 26, 511, 275),
        ];
        let t = GridTransform::solve(&corners).expect("solvable");
        for c in &corners {
            let (x, y) = t.map(c.column, c.row);
            assert!((x - f64::from(c.x)).abs() < 1e-6);
            assert!((y - f64::from(c.y)).abs() < 1e-6);
        }
    }

    #[test]
    fn coincident_corners_are_singular() {
        let corners = [corner(0, 0, 0, 0); 4];
        assert_eq!(GridTransform::solve(&corners), None);
    }
}
