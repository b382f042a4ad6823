//! Test fixture: a minimal PDF417 encoder and renderer.
//!
//! High-level compaction (text/byte/numeric), real GF(929) parity, row
//! indicator values, and a run-length renderer over the crate's own symbol
//! patterns. Tests round-trip payloads through rendered images.

use pdf417_scan::ecc::{field, Poly};
use pdf417_scan::symbols::{self, START_PATTERN, STOP_PATTERN};
use pdf417_scan::BitMatrix;

pub const MODULE: usize = 3;
pub const ROW_HEIGHT: usize = 8;
pub const MARGIN_X_MODULES: usize = 6;
pub const MARGIN_Y: usize = 10;

const UPPER: &[u8; 27] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ ";
const LOWER: &[u8; 27] = b"abcdefghijklmnopqrstuvwxyz ";
const MIXED: [u8; 27] = [
    b'0', b'1', b'2', b'3', b'4', b'5', b'6', b'7', b'8', b'9', b'&', b'\r', b'\t', b',', b':',
    b'#', b'-', b'.', b'$', b'/', b'+', b'%', b'*', b'=', b'^', 0, b' ',
];
const PUNCT: [u8; 29] = [
    b';', b'<', b'>', b'@', b'[', b'\\', b']', b'_', b'`', b'~', b'!', b'\r', b'\t', b',', b':',
    b'\n', b'-', b'.', b'$', b'/', b'"', b'|', b'*', b'(', b')', b'?', b'{', b'}', b'\'',
];

#[derive(Clone, Copy, PartialEq, Eq)]
enum Submode {
    Upper,
    Lower,
    Mixed,
    Punct,
}

fn code_in(submode: Submode, ch: u8) -> Option<u16> {
    let table: &[u8] = match submode {
        Submode::Upper => UPPER,
        Submode::Lower => LOWER,
        Submode::Mixed => &MIXED,
        Submode::Punct => &PUNCT,
    };
    table
        .iter()
        .position(|&c| c == ch && c != 0)
        .map(|i| i as u16)
}

/// Latch subcode sequences between submodes.
fn latch(from: Submode, to: Submode) -> &'static [u16] {
    use Submode::*;
    match (from, to) {
        (Upper, Lower) => &[27],
        (Upper, Mixed) => &[28],
        (Upper, Punct) => &[28, 25],
        (Lower, Mixed) => &[28],
        (Lower, Punct) => &[28, 25],
        (Lower, Upper) => &[28, 28],
        (Mixed, Lower) => &[27],
        (Mixed, Upper) => &[28],
        (Mixed, Punct) => &[25],
        (Punct, Upper) => &[29],
        (Punct, Lower) => &[29, 27],
        (Punct, Mixed) => &[29, 28],
        _ => &[],
    }
}

/// Text compaction: latches between submodes, single-character shifts when
/// the very next character stays in the current submode.
pub fn text_codewords(text: &str) -> Vec<u16> {
    let chars = text.as_bytes();
    let mut submode = Submode::Upper;
    let mut codes: Vec<u16> = Vec::new();

    for (i, &ch) in chars.iter().enumerate() {
        if let Some(code) = code_in(submode, ch) {
            codes.push(code);
            continue;
        }
        let next_stays = chars
            .get(i + 1)
            .is_some_and(|&n| code_in(submode, n).is_some());
        if next_stays && submode != Submode::Punct {
            if let Some(code) = code_in(Submode::Punct, ch) {
                codes.extend([29, code]);
                continue;
            }
            if submode == Submode::Lower {
                if let Some(code) = code_in(Submode::Upper, ch) {
                    codes.extend([27, code]);
                    continue;
                }
            }
        }
        let target = [Submode::Lower, Submode::Mixed, Submode::Punct, Submode::Upper]
            .into_iter()
            .find(|&t| t != submode && code_in(t, ch).is_some())
            .unwrap_or_else(|| panic!("unencodable character {ch:#x}"));
        codes.extend(latch(submode, target));
        submode = target;
        codes.push(code_in(target, ch).expect("target holds the char"));
    }

    if codes.len() % 2 == 1 {
        codes.push(29);
    }
    codes.chunks(2).map(|pair| pair[0] * 30 + pair[1]).collect()
}

/// Byte compaction: 924 when the length is a multiple of six, else 901;
/// 6-byte blocks become 5 base-900 codewords, the tail one codeword each.
pub fn byte_codewords(data: &[u8]) -> Vec<u16> {
    let mut out = vec![if !data.is_empty() && data.len() % 6 == 0 {
        924
    } else {
        901
    }];
    let mut chunks = data.chunks_exact(6);
    for chunk in &mut chunks {
        let mut value = 0u64;
        for &b in chunk {
            value = (value << 8) | u64::from(b);
        }
        let mut block = [0u16; 5];
        for slot in block.iter_mut().rev() {
            *slot = (value % 900) as u16;
            value /= 900;
        }
        out.extend(block);
    }
    out.extend(chunks.remainder().iter().map(|&b| u16::from(b)));
    out
}

/// Numeric compaction: 44-digit blocks with the '1' sentinel, expanded to
/// base 900.
pub fn numeric_codewords(digits: &str) -> Vec<u16> {
    let mut out = vec![902];
    for chunk in digits.as_bytes().chunks(44) {
        // Base-900 digits of "1" + chunk, via long division on the string.
        let mut decimal: Vec<u32> = std::iter::once(1)
            .chain(chunk.iter().map(|&d| u32::from(d - b'0')))
            .collect();
        let mut block = Vec::new();
        while !decimal.is_empty() {
            let mut quotient = Vec::with_capacity(decimal.len());
            let mut remainder = 0u32;
            for &d in &decimal {
                let v = remainder * 10 + d;
                quotient.push(v / 900);
                remainder = v % 900;
            }
            block.push(remainder as u16);
            while quotient.first() == Some(&0) {
                quotient.remove(0);
            }
            decimal = quotient;
        }
        block.reverse();
        out.extend(block);
    }
    out
}

pub fn left_indicator(row: usize, rows: usize, columns: usize, level: usize) -> u16 {
    let base = (row / 3) * 30;
    (base
        + match row % 3 {
            0 => (rows - 1) / 3,
            1 => level * 3 + (rows - 1) % 3,
            _ => columns - 1,
        }) as u16
}

pub fn right_indicator(row: usize, rows: usize, columns: usize, level: usize) -> u16 {
    let base = (row / 3) * 30;
    (base
        + match row % 3 {
            0 => columns - 1,
            1 => (rows - 1) / 3,
            _ => level * 3 + (rows - 1) % 3,
        }) as u16
}

/// Lay out the full codeword grid: length descriptor, data, padding, and
/// GF(929) parity. Returns (grid, rows, ec_length).
pub fn assemble(data: &[u16], columns: usize, level: usize) -> (Vec<u16>, usize, usize) {
    let ec_length = 1usize << (level + 1);
    let needed = data.len() + 1 + ec_length;
    let rows = needed.div_ceil(columns).max(3);
    assert!(rows <= 90, "payload too large for the column count");

    let data_length = rows * columns - ec_length;
    let mut grid = Vec::with_capacity(rows * columns);
    grid.push(data_length as u16);
    grid.extend_from_slice(data);
    grid.resize(data_length, 900);
    append_parity(&mut grid, ec_length);
    (grid, rows, ec_length)
}

/// Append `ec_length` parity codewords so the grid polynomial vanishes at
/// 3^1..3^R.
fn append_parity(grid: &mut Vec<u16>, ec_length: usize) {
    let mut generator = Poly::one();
    for i in 1..=ec_length {
        generator = generator.multiply(&Poly::new(vec![1, field::negate(field::exp(i))]));
    }

    let mut remainder = Poly::new(grid.clone()).multiply_by_monomial(ec_length, 1);
    let leading_inverse = field::invert(generator.leading_coefficient());
    while remainder.degree() >= generator.degree() && !remainder.is_zero() {
        let scale = field::multiply(remainder.leading_coefficient(), leading_inverse);
        let degree_diff = remainder.degree() - generator.degree();
        remainder = remainder.subtract(&generator.multiply_by_monomial(degree_diff, scale));
    }

    for degree in (0..ec_length).rev() {
        grid.push(field::negate(remainder.coefficient(degree)));
    }
}

/// Render a codeword grid into a binary image: start pattern, left
/// indicator, data cells, right indicator, stop pattern per row.
pub fn render(grid: &[u16], rows: usize, columns: usize, level: usize) -> BitMatrix {
    let width_modules = 2 * MARGIN_X_MODULES + 17 * (columns + 3) + 18;
    let mut image = BitMatrix::new(
        width_modules * MODULE,
        rows * ROW_HEIGHT + 2 * MARGIN_Y,
    );

    let mut ptr = 0;
    for row in 0..rows {
        let cluster = (row % 3) as u8;
        let mut runs: Vec<u8> = Vec::new();
        runs.extend(START_PATTERN);
        runs.extend(pattern(cluster, left_indicator(row, rows, columns, level)));
        for _ in 0..columns {
            runs.extend(pattern(cluster, grid[ptr]));
            ptr += 1;
        }
        runs.extend(pattern(cluster, right_indicator(row, rows, columns, level)));
        runs.extend(STOP_PATTERN);

        let mut x = MARGIN_X_MODULES * MODULE;
        let y0 = MARGIN_Y + row * ROW_HEIGHT;
        for (i, &width) in runs.iter().enumerate() {
            if i % 2 == 0 {
                for xx in x..x + usize::from(width) * MODULE {
                    for yy in y0..y0 + ROW_HEIGHT {
                        image.set(xx, yy, true);
                    }
                }
            }
            x += usize::from(width) * MODULE;
        }
    }
    image
}

fn pattern(cluster: u8, value: u16) -> [u8; 8] {
    symbols::bar_widths(cluster, value)
        .unwrap_or_else(|| panic!("no pattern for cluster {cluster} value {value}"))
}

/// Compact, assemble and render in one step.
pub fn encode_image(data: &[u16], columns: usize, level: usize) -> BitMatrix {
    let (grid, rows, _) = assemble(data, columns, level);
    render(&grid, rows, columns, level)
}

/// Pixel rectangle of the data cell at (row, column).
pub fn cell_rect(row: usize, column: usize) -> (usize, usize, usize, usize) {
    (
        (MARGIN_X_MODULES + 17 * (2 + column)) * MODULE,
        MARGIN_Y + row * ROW_HEIGHT,
        17 * MODULE,
        ROW_HEIGHT,
    )
}

/// Flood one data cell with ink, turning it into an unreadable erasure.
pub fn blacken_cell(image: &mut BitMatrix, row: usize, column: usize) {
    let (x0, y0, w, h) = cell_rect(row, column);
    for x in x0..x0 + w {
        for y in y0..y0 + h {
            image.set(x, y, true);
        }
    }
}

/// Repaint one data cell with a different codeword value of the same
/// cluster, simulating print damage the Reed-Solomon stage must repair.
pub fn repaint_cell(image: &mut BitMatrix, row: usize, column: usize, value: u16) {
    let (x0, y0, w, h) = cell_rect(row, column);
    for x in x0..x0 + w {
        for y in y0..y0 + h {
            image.set(x, y, false);
        }
    }
    let runs = pattern((row % 3) as u8, value);
    let mut x = x0;
    for (i, &width) in runs.iter().enumerate() {
        if i % 2 == 0 {
            for xx in x..x + usize::from(width) * MODULE {
                for yy in y0..y0 + h {
                    image.set(xx, yy, true);
                }
            }
        }
        x += usize::from(width) * MODULE;
    }
}

/// Stack two images vertically with a white gap.
pub fn stack(top: &BitMatrix, bottom: &BitMatrix, gap: usize) -> BitMatrix {
    let width = top.width().max(bottom.width());
    let height = top.height() + gap + bottom.height();
    BitMatrix::from_fn(width, height, |x, y| {
        if y < top.height() {
            x < top.width() && top.ink(x, y)
        } else if y >= top.height() + gap {
            x < bottom.width() && bottom.ink(x, y - top.height() - gap)
        } else {
            false
        }
    })
}
