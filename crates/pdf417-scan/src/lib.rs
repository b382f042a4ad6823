//! PDF417 stacked barcode decoder.
//!
//! The pipeline consumes a binarized image (thresholding is the caller's
//! job) and yields the decoded byte payloads: start/stop border columns are
//! located by their 8-bar signatures, the row indicators recover the symbol
//! geometry and the grid-to-image projective transform, every grid cell is
//! classified into one of 929 codeword values, Reed-Solomon over GF(929)
//! repairs sampling damage, and the mode interpreter expands the codeword
//! stream into bytes.
//!
//! ```
//! use pdf417_scan::{decode, BitMatrix};
//!
//! let image = BitMatrix::new(640, 480);
//! // A blank page holds no symbols.
//! assert!(decode(&image).is_empty());
//! ```

mod decoder;
mod indicators;
mod modes;
mod result;
mod sampler;

pub mod symbols;

pub use decoder::{decode, DecodeError};
pub use modes::ModeError;
pub use result::Barcode;

pub use pdf417_scan_core::{BarcodeArea, BitMatrix, BitmapError};
pub use pdf417_scan_ecc as ecc;
