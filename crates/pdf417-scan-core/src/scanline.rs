//! Per-row bar boundary extraction.

use crate::BitMatrix;

/// Scan one image row into an ordered list of bar boundary x positions.
///
/// The sequence starts at the first black pixel after a white run and
/// records every color flip. A black run touching the left image edge is
/// skipped entirely; a row ending inside a black run drops that run's
/// recorded start and records the row width in its place. Rows with fewer
/// than 9 positions (8 bars) are unusable and yield `None`.
pub fn scan_row(image: &BitMatrix, row: usize) -> Option<Vec<i32>> {
    let width = image.width();

    // Skip any ink that touches the left edge.
    let mut col = 0;
    while col < width && image.ink(col, row) {
        col += 1;
    }
    if col == width {
        return None;
    }
    col += 1;

    // First white-to-black transition.
    while col < width && !image.ink(col, row) {
        col += 1;
    }
    if col == width {
        return None;
    }

    let mut positions = vec![col as i32];
    loop {
        // End of the black bar.
        while col < width && image.ink(col, row) {
            col += 1;
        }
        if col == width {
            // Row ends mid-bar: replace the pending black start.
            positions.pop();
        }
        positions.push(col as i32);

        // End of the white bar.
        while col < width && !image.ink(col, row) {
            col += 1;
        }
        if col == width {
            break;
        }
        positions.push(col as i32);
    }

    (positions.len() > 8).then_some(positions)
}
