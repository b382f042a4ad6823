//! Start/stop border signature detection.
//!
//! Every PDF417 row begins with the same start pattern and ends with the
//! same stop pattern. Scanning each image row for their 8-bar signatures
//! and stacking vertically aligned matches yields candidate border columns.

use log::debug;

use crate::{scan_row, BitMatrix};

/// Start pattern signature: normalized two-bar width sums of the 8-bar
/// window over run widths (8,1,1,1,1,1,1,3).
pub const START_SIGNATURE: [i32; 6] = [9, 2, 2, 2, 2, 2];

/// Stop pattern signature over the first 8 runs of (7,1,1,3,1,1,1,2,1).
pub const STOP_SIGNATURE: [i32; 6] = [8, 2, 4, 4, 2, 2];

/// A border column qualifies only with at least this many stacked symbols.
pub const MIN_COLUMN_SYMBOLS: usize = 18;

/// One 8-bar signature match on a single image row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BorderSymbol {
    /// Left edge of the window.
    pub x1: i32,
    /// Image row.
    pub y: i32,
    /// Right edge of the window; always `x2 > x1`.
    pub x2: i32,
}

/// Start and stop border columns found in one image, in discovery
/// (top-to-bottom) order, pruned to [`MIN_COLUMN_SYMBOLS`].
#[derive(Clone, Debug, Default)]
pub struct BorderColumns {
    pub start: Vec<Vec<BorderSymbol>>,
    pub stop: Vec<Vec<BorderSymbol>>,
}

/// Scan every row of the image for start and stop signatures.
pub fn find_border_columns(image: &BitMatrix) -> BorderColumns {
    let mut columns = BorderColumns::default();
    for row in 0..image.height() {
        let Some(positions) = scan_row(image, row) else {
            continue;
        };
        collect_signature_matches(&mut columns.start, &positions, &START_SIGNATURE, row as i32);
        collect_signature_matches(&mut columns.stop, &positions, &STOP_SIGNATURE, row as i32);
    }
    columns.start.retain(|c| c.len() >= MIN_COLUMN_SYMBOLS);
    columns.stop.retain(|c| c.len() >= MIN_COLUMN_SYMBOLS);
    debug!(
        "border scan: {} start column(s), {} stop column(s)",
        columns.start.len(),
        columns.stop.len()
    );
    columns
}

/// Slide an 8-bar window over one row's bar positions and append signature
/// matches to the first vertically continuous column, or seed a new one.
fn collect_signature_matches(
    columns: &mut Vec<Vec<BorderSymbol>>,
    positions: &[i32],
    signature: &[i32; 6],
    row: i32,
) {
    let mut window = 0;
    while window + 8 < positions.len() {
        if matches_signature(&positions[window..=window + 8], signature) {
            let symbol = BorderSymbol {
                x1: positions[window],
                y: row,
                x2: positions[window + 8],
            };
            place_symbol(columns, symbol);
        }
        // Advance one bar pair so windows stay aligned on black bars.
        window += 2;
    }
}

fn matches_signature(window: &[i32], signature: &[i32; 6]) -> bool {
    let width = window[8] - window[0];
    (0..6).all(|i| (34 * (window[i + 2] - window[i]) + width) / (2 * width) == signature[i])
}

fn place_symbol(columns: &mut Vec<Vec<BorderSymbol>>, symbol: BorderSymbol) {
    for column in columns.iter_mut() {
        let last = column[column.len() - 1];
        if symbol.y - last.y < 18 && (symbol.x1 - last.x1).abs() < 5 && (symbol.x2 - last.x2).abs() < 5
        {
            column.push(symbol);
            return;
        }
    }
    columns.push(vec![symbol]);
}
