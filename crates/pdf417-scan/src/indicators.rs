//! Row indicator reading.
//!
//! The left indicator of each barcode row encodes (row number, total rows,
//! error correction level); the right indicator encodes (row number, data
//! columns). Walking both border lines and watching for stable codewords
//! yields the symbol geometry and the four grid-to-image corner
//! correspondences the transform is solved from.

use pdf417_scan_core::{BarcodeArea, BitMatrix, GridCorner};

use crate::sampler::CodewordSampler;

/// Consecutive invalid samples tolerated before a walk direction stops.
const MAX_SCAN_ERRORS: u32 = 20;

/// Everything learned from the two row indicator columns.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Indicators {
    /// Corner correspondences ordered TL, TR, BL, BR.
    pub corners: [GridCorner; 4],
    pub data_rows: usize,
    pub data_columns: usize,
    pub error_correction_length: usize,
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// A stable codeword observed at one end of an indicator column.
#[derive(Clone, Copy)]
struct Extreme {
    codeword: u16,
    x: i32,
    y: i32,
}

struct IndicatorReader<'a> {
    sampler: CodewordSampler<'a>,
    image_height: i32,
    ind_control: u8,
    data_rows: i32,
    data_columns: i32,
    error_correction_length: i32,
}

/// Read both indicator columns of a candidate area.
///
/// Succeeds only when all three geometry clusters contributed
/// (`ind_control == 7`) and both sides produced a stable top and bottom
/// codeword.
pub(crate) fn read_indicators(image: &BitMatrix, area: &BarcodeArea) -> Option<Indicators> {
    let mut reader = IndicatorReader {
        sampler: CodewordSampler::new(image, area),
        image_height: image.height() as i32,
        ind_control: 0,
        data_rows: 0,
        data_columns: 0,
        error_correction_length: 0,
    };

    let (left_top, left_bottom) = reader.read_side(area, Side::Left)?;
    let (right_top, right_bottom) = reader.read_side(area, Side::Right)?;

    if reader.ind_control != 7 {
        return None;
    }

    let data_columns = reader.data_columns;
    let corners = [
        grid_corner(left_top, -1),
        grid_corner(right_top, data_columns),
        grid_corner(left_bottom, -1),
        grid_corner(right_bottom, data_columns),
    ];

    Some(Indicators {
        corners,
        data_rows: usize::try_from(reader.data_rows).ok()?,
        data_columns: usize::try_from(reader.data_columns).ok()?,
        error_correction_length: usize::try_from(reader.error_correction_length).ok()?,
    })
}

/// Grid row of an indicator codeword: the value's 30-block gives the row
/// triple, the cluster selects within it.
fn grid_corner(extreme: Extreme, column: i32) -> GridCorner {
    let cluster = i32::from(extreme.codeword >> 10);
    let row = 3 * (i32::from(extreme.codeword & 0x3ff) / 30) + cluster;
    GridCorner {
        column,
        row,
        x: extreme.x,
        y: extreme.y,
    }
}

impl IndicatorReader<'_> {
    /// Walk one indicator column up and down from the border center,
    /// returning the topmost and bottommost stable codewords.
    fn read_side(&mut self, area: &BarcodeArea, side: Side) -> Option<(Extreme, Extreme)> {
        let line = match side {
            Side::Left => &area.left,
            Side::Right => &area.right,
        };
        let center_y = line.center_y;
        let mid = self.sample_side(area, side, line.center_x, center_y);

        // Upward: the right side's reverse sampler starts at the center
        // row itself, the left side one above it.
        let up_from = match side {
            Side::Left => center_y - 1,
            Side::Right => center_y,
        };
        let top = self.walk_range(area, side, mid, up_from, -1);
        let bottom = self.walk_range(area, side, mid, center_y + 1, 1);

        match (top, bottom) {
            (Some(top), Some(bottom)) => Some((top, bottom)),
            _ => None,
        }
    }

    /// Walk y from `start` by `step` until the image edge or too many
    /// consecutive invalid samples, tracking the last stable codeword.
    fn walk_range(
        &mut self,
        area: &BarcodeArea,
        side: Side,
        mid: Option<u16>,
        start: i32,
        step: i32,
    ) -> Option<Extreme> {
        let mut last = mid;
        let mut extreme = None;
        let mut errors = 0u32;
        let mut y = start;
        while y >= 1 && y < self.image_height {
            let x = match side {
                Side::Left => area.left_x_at(y),
                Side::Right => area.right_x_at(y),
            };
            match self.sample_side(area, side, x, y) {
                Some(codeword) => {
                    if last == Some(codeword) {
                        if self.ind_control != 7 {
                            self.record_info(codeword);
                        }
                        let (px, py) = self.sampler.first_point();
                        extreme = Some(Extreme {
                            codeword,
                            x: px,
                            y: py,
                        });
                    } else {
                        last = Some(codeword);
                    }
                    errors = 0;
                }
                None => {
                    errors += 1;
                    if errors > MAX_SCAN_ERRORS {
                        break;
                    }
                }
            }
            y += step;
        }
        extreme
    }

    fn sample_side(&mut self, area: &BarcodeArea, side: Side, x: i32, y: i32) -> Option<u16> {
        match side {
            Side::Left => {
                self.sampler
                    .sample(x, y, area.left.delta_y, -area.left.delta_x)
            }
            Side::Right => {
                self.sampler
                    .sample_reverse(x, y, area.right.delta_y, -area.right.delta_x)
            }
        }
    }

    /// Fold one stable indicator codeword into the symbol geometry; each
    /// cluster contributes exactly once across both sides.
    fn record_info(&mut self, codeword: u16) {
        let cluster = codeword >> 10;
        let info = i32::from((codeword & 0x3ff) % 30);
        match cluster {
            0 => {
                if self.ind_control & 1 == 0 {
                    self.data_rows += info * 3 + 1;
                    self.ind_control |= 1;
                }
            }
            1 => {
                if self.ind_control & 2 == 0 {
                    self.error_correction_length = 1 << (info / 3 + 1);
                    self.data_rows += info % 3;
                    self.ind_control |= 2;
                }
            }
            2 => {
                if self.ind_control & 4 == 0 {
                    self.data_columns = info + 1;
                    self.ind_control |= 4;
                }
            }
            _ => {}
        }
    }
}
