//! Geometric primitives for PDF417 barcode detection.
//!
//! This crate is intentionally small and purely geometric. It locates
//! start/stop border candidates in a binary image and recovers the
//! projective transform between barcode grid coordinates and image pixels;
//! it does *not* sample codewords or know anything about the PDF417 symbol
//! set.

mod area;
mod bitmap;
mod border;
mod numeric;
mod pattern;
mod scanline;
mod transform;

pub use area::{BarcodeArea, BorderLine};
pub use bitmap::{BitMatrix, BitmapError};
pub use border::{
    find_border_columns, BorderColumns, BorderSymbol, MIN_COLUMN_SYMBOLS, START_SIGNATURE,
    STOP_SIGNATURE,
};
pub use numeric::round_away_from_zero;
pub use pattern::BorderPattern;
pub use scanline::scan_row;
pub use transform::{GridCorner, GridTransform};
