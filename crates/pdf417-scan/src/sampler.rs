//! Codeword sampling along scan lines.

use pdf417_scan_core::{round_away_from_zero, BarcodeArea, BitMatrix, GridTransform};

use crate::symbols;

/// Vertical perturbations tried when a data cell's first sample misses its
/// row cluster.
const Y_STEPS: [i32; 6] = [1, -1, 2, -2, 3, -3];

/// Samples one codeword at a time from the binary image, keeping the eight
/// transition points of the last scan.
pub(crate) struct CodewordSampler<'a> {
    image: &'a BitMatrix,
    average_symbol_width: f64,
    max_symbol_error: f64,
    scan_x: [i32; 9],
    scan_y: [i32; 9],
}

impl<'a> CodewordSampler<'a> {
    pub fn new(image: &'a BitMatrix, area: &BarcodeArea) -> Self {
        Self {
            image,
            average_symbol_width: area.average_symbol_width,
            max_symbol_error: area.max_symbol_error,
            scan_x: [0; 9],
            scan_y: [0; 9],
        }
    }

    /// First transition point of the most recent successful scan; for a
    /// reverse scan this is the leftmost recorded point.
    #[inline]
    pub fn first_point(&self) -> (i32, i32) {
        (self.scan_x[0], self.scan_y[0])
    }

    /// Scan one codeword rightward from `(x, y)` along direction
    /// `(delta_x, delta_y)`. Returns the packed `(cluster << 10) | value`.
    pub fn sample(&mut self, x: i32, y: i32, delta_x: i32, delta_y: i32) -> Option<u16> {
        if delta_x == 0 {
            return None;
        }
        let (left_x, left_y) = self.white_to_black(x, y, delta_x, delta_y)?;
        self.scan_x[0] = left_x;
        self.scan_y[0] = left_y;

        let mut dot_color = true;
        let mut transition = 1;
        let mut x = left_x + 1;
        while transition < 9 {
            let y = left_y + slope_offset(x - left_x, delta_x, delta_y);
            let ink = self.image.ink_at(x, y)?;
            if ink == dot_color {
                x += 1;
                continue;
            }
            dot_color = !dot_color;
            self.scan_x[transition] = x;
            self.scan_y[transition] = y;
            transition += 1;
            x += 1;
        }

        self.classify()
    }

    /// Scan one codeword leftward from `(x, y)`: the anchor becomes the
    /// scan's right end and the transition points fill from index 8 down.
    pub fn sample_reverse(&mut self, x: i32, y: i32, delta_x: i32, delta_y: i32) -> Option<u16> {
        if delta_x == 0 {
            return None;
        }
        let (right_x, right_y) = self.white_to_black(x, y, delta_x, delta_y)?;
        self.scan_x[8] = right_x;
        self.scan_y[8] = right_y;

        let mut dot_color = false;
        let mut transition: i32 = 7;
        let mut x = right_x - 1;
        loop {
            let y = right_y + slope_offset(x - right_x, delta_x, delta_y);
            let ink = self.image.ink_at(x, y)?;
            if ink == dot_color {
                x -= 1;
                continue;
            }
            dot_color = !dot_color;
            self.scan_x[transition as usize] = x;
            self.scan_y[transition as usize] = y;
            transition -= 1;
            x -= 1;
            if transition < 0 {
                break;
            }
        }

        self.classify()
    }

    /// Sample the data cell at grid `(column, row)`, requiring the sampled
    /// cluster to match `row mod 3`; retries vertically perturbed starts
    /// before giving up. Returns the bare codeword value.
    pub fn data_codeword(
        &mut self,
        transform: &GridTransform,
        column: i32,
        row: i32,
    ) -> Option<u16> {
        let (x0, y0) = transform.map(column, row);
        let origin_x = round_away_from_zero(x0);
        let origin_y = round_away_from_zero(y0);

        let (x1, y1) = transform.map(column + 1, row);
        let delta_x = round_away_from_zero(x1) - origin_x;
        let delta_y = round_away_from_zero(y1) - origin_y;

        let wanted_cluster = u16::try_from(row.rem_euclid(3)).ok()?;
        let accepts = |codeword: u16| (codeword >> 10) == wanted_cluster;

        if let Some(codeword) = self.sample(origin_x, origin_y, delta_x, delta_y) {
            if accepts(codeword) {
                return Some(codeword & 0x3ff);
            }
        }
        if delta_x == 0 {
            return None;
        }
        for step in Y_STEPS {
            let y = origin_y + step;
            let x = origin_x - slope_offset(step, delta_x, delta_y);
            if let Some(codeword) = self.sample(x, y, delta_x, delta_y) {
                if accepts(codeword) {
                    return Some(codeword & 0x3ff);
                }
            }
        }
        None
    }

    /// Snap the start point onto a black pixel whose predecessor along the
    /// scan line is white: walk back over ink, or forward over paper.
    fn white_to_black(
        &self,
        start_x: i32,
        start_y: i32,
        delta_x: i32,
        delta_y: i32,
    ) -> Option<(i32, i32)> {
        let mut pos_x = start_x;
        let mut pos_y = start_y;

        if self.image.ink_at(pos_x, pos_y)? {
            if self.image.ink_at(pos_x - 1, pos_y) == Some(false) {
                return Some((pos_x, pos_y));
            }
            let mut x = pos_x - 1;
            loop {
                let y = pos_y + slope_offset(x - pos_x, delta_x, delta_y);
                match self.image.ink_at(x, y)? {
                    false => return Some((pos_x, pos_y)),
                    true => {
                        pos_x = x;
                        pos_y = y;
                        x -= 1;
                    }
                }
            }
        }

        let mut x = pos_x + 1;
        loop {
            let y = pos_y + slope_offset(x - pos_x, delta_x, delta_y);
            match self.image.ink_at(x, y)? {
                false => x += 1,
                true => return Some((x, y)),
            }
        }
    }

    /// Classify the recorded transitions into a packed codeword.
    fn classify(&self) -> Option<u16> {
        let scan_dx = f64::from(self.scan_x[8] - self.scan_x[0]);
        let scan_dy = f64::from(self.scan_y[8] - self.scan_y[0]);
        let length = (scan_dx * scan_dx + scan_dy * scan_dy).sqrt();
        if (length - self.average_symbol_width).abs() > self.max_symbol_error {
            return None;
        }

        let inv_width = f64::from(symbols::MODULES_PER_CODEWORD) / length;
        let mut symbol = 0u32;
        let mut mode = 9i32;
        for pair in 0..6 {
            let dx = f64::from(self.scan_x[pair + 2] - self.scan_x[pair]);
            let dy = f64::from(self.scan_y[pair + 2] - self.scan_y[pair]);
            let two_bars = round_away_from_zero(inv_width * (dx * dx + dy * dy).sqrt());
            if !(2..=9).contains(&two_bars) {
                return None;
            }
            symbol |= ((two_bars - 2) as u32) << (3 * (5 - pair));
            match pair {
                0 | 4 => mode += two_bars,
                1 | 5 => mode -= two_bars,
                _ => {}
            }
        }

        let mode = mode.rem_euclid(9);
        if mode != 0 && mode != 3 && mode != 6 {
            return None;
        }

        symbols::lookup(symbol)
    }
}

/// The y offset a horizontal step makes along a `(delta_x, delta_y)` line,
/// truncated toward zero.
#[inline]
fn slope_offset(step: i32, delta_x: i32, delta_y: i32) -> i32 {
    (f64::from(step) * f64::from(delta_y) / f64::from(delta_x)) as i32
}
