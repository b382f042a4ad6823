//! GF(929) arithmetic and Reed-Solomon error correction for PDF417.
//!
//! PDF417 protects its codeword stream with a Reed-Solomon code over the
//! prime field GF(929), generator element 3. This crate is self-contained
//! math: it knows nothing about images or codeword geometry.

mod correct;
mod poly;

pub mod field;

pub use correct::{correct_errors, CorrectError};
pub use poly::Poly;
