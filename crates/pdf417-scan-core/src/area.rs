//! Pairing start and stop borders into candidate barcode areas.

use crate::BorderPattern;

/// One fitted border line in image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BorderLine {
    pub center_x: i32,
    pub center_y: i32,
    pub delta_x: i32,
    pub delta_y: i32,
}

impl BorderLine {
    fn from_pattern(p: &BorderPattern) -> Self {
        Self {
            center_x: p.center_x,
            center_y: p.center_y,
            delta_x: p.delta_x,
            delta_y: p.delta_y,
        }
    }

    /// The line's x at a given image row.
    #[inline]
    pub fn x_at(&self, y: i32) -> i32 {
        (f64::from(self.center_x)
            + f64::from(self.delta_x) * f64::from(y - self.center_y) / f64::from(self.delta_y))
            as i32
    }
}

/// A matched start/stop pair delimiting one candidate symbol.
///
/// The left line runs along the data side of the start border, the right
/// line along the data side of the stop border.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarcodeArea {
    pub left: BorderLine,
    pub right: BorderLine,
    pub average_symbol_width: f64,
    pub max_symbol_error: f64,
}

impl BarcodeArea {
    /// Tolerated deviation of a scanned codeword length, as a fraction of
    /// the average symbol width.
    pub const MAX_SYMBOL_ERROR: f64 = 0.08;

    /// Pair two fitted borders, enforcing the area invariants: both slopes
    /// under 45 degrees, stop right of start, and both borders roughly
    /// perpendicular (|cos| <= 0.1) to the center connector.
    pub fn match_borders(start: &BorderPattern, stop: &BorderPattern) -> Option<Self> {
        if start.delta_y <= start.delta_x.abs() || stop.delta_y <= stop.delta_x.abs() {
            return None;
        }
        if stop.center_x <= start.center_x {
            return None;
        }

        let center_delta_x = f64::from(stop.center_x - start.center_x);
        let center_delta_y = f64::from(stop.center_y - start.center_y);
        let center_length =
            (center_delta_x * center_delta_x + center_delta_y * center_delta_y).sqrt();

        for border in [start, stop] {
            let cos = (f64::from(border.delta_x) * center_delta_x
                + f64::from(border.delta_y) * center_delta_y)
                / (center_length * border.border_length);
            if cos.abs() > 0.1 {
                return None;
            }
        }

        let average_symbol_width =
            0.5 * (start.average_symbol_width + stop.average_symbol_width);
        Some(Self {
            left: BorderLine::from_pattern(start),
            right: BorderLine::from_pattern(stop),
            average_symbol_width,
            max_symbol_error: Self::MAX_SYMBOL_ERROR * average_symbol_width,
        })
    }

    #[inline]
    pub fn left_x_at(&self, y: i32) -> i32 {
        self.left.x_at(y)
    }

    #[inline]
    pub fn right_x_at(&self, y: i32) -> i32 {
        self.right.x_at(y)
    }
}
