//! Border line fitting.

use crate::numeric::round_away_from_zero;
use crate::BorderSymbol;

/// A border column reduced to a line: anchor center, direction normalized
/// to `delta_y = 1000`, plus the fitted length and average symbol width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BorderPattern {
    pub center_x: i32,
    pub center_y: i32,
    pub delta_x: i32,
    pub delta_y: i32,
    pub border_length: f64,
    pub average_symbol_width: f64,
}

impl BorderPattern {
    /// Fit a line through a border column.
    ///
    /// The anchor is the window's right edge for a start column (the data
    /// side) and the left edge for a stop column. Returns `None` for a
    /// degenerate column whose symbols all share one row.
    pub fn fit(stop_pattern: bool, symbols: &[BorderSymbol]) -> Option<Self> {
        if symbols.is_empty() {
            return None;
        }
        let count = symbols.len() as i64;

        let anchor_x = |s: &BorderSymbol| if stop_pattern { s.x1 } else { s.x2 };

        let mut sum_x: i64 = 0;
        let mut sum_y: i64 = 0;
        let mut total_width: i64 = 0;
        for s in symbols {
            sum_x += i64::from(anchor_x(s));
            sum_y += i64::from(s.y);
            total_width += i64::from(s.x2 - s.x1);
        }
        let mut center_x = (sum_x / count) as i32;
        let mut center_y = (sum_y / count) as i32;

        // Least-squares slope of x as a function of y.
        let mut slope_x = 0.0f64;
        let mut slope_y = 0.0f64;
        for s in symbols {
            let dx = f64::from(anchor_x(s) - center_x);
            let dy = f64::from(s.y - center_y);
            slope_x += dx * dy;
            slope_y += dy * dy;
        }
        if slope_y == 0.0 {
            return None;
        }

        let border_length = (slope_x * slope_x + slope_y * slope_y).sqrt();
        let cos_rotation = slope_y / border_length;
        let sin_rotation = slope_x / border_length;

        let horizontal_width = total_width as f64 / count as f64;
        let average_symbol_width = cos_rotation * horizontal_width;

        // A rotated barcode anchors the center too high or too low; push it
        // back along the fitted line by half the skew offset.
        let center_adjust = 0.5 * sin_rotation * horizontal_width;
        let adjust_x = round_away_from_zero(center_adjust * sin_rotation);
        let adjust_y = round_away_from_zero(center_adjust * cos_rotation);
        if stop_pattern {
            center_x += adjust_x;
            center_y += adjust_y;
        } else {
            center_x -= adjust_x;
            center_y -= adjust_y;
        }

        let delta_y = 1000;
        let delta_x = (f64::from(delta_y) * slope_x / slope_y) as i32;

        Some(Self {
            center_x,
            center_y,
            delta_x,
            delta_y,
            border_length,
            average_symbol_width,
        })
    }
}
