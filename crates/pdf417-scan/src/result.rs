//! Decoded barcode results.

use encoding_rs::Encoding;
use serde::Serialize;

/// One decoded PDF417 symbol.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Barcode {
    /// Raw payload bytes.
    pub data: Vec<u8>,
    /// GLI character set label ("ISO-8859-n"), when the symbol carried one.
    pub character_set: Option<String>,
    /// GLI character set number (codeword 927 operand).
    pub gli_character_set_number: Option<u16>,
    /// GLI general purpose number (codeword 926, 900..=810899).
    pub gli_general_purpose: Option<u32>,
    /// GLI user defined number (codeword 925, 810900..=811799).
    pub gli_user_defined: Option<u32>,
    /// Data columns, excluding the row indicator columns.
    pub data_columns: usize,
    /// Barcode rows.
    pub data_rows: usize,
    /// Parity codewords protecting the grid (a power of two).
    pub error_correction_length: usize,
    /// Codewords the Reed-Solomon stage actually corrected.
    pub error_correction_count: usize,
}

impl Barcode {
    /// Decode the payload with the symbol's GLI character set, defaulting
    /// to ISO-8859-1.
    pub fn text(&self) -> String {
        let part = self
            .character_set
            .as_deref()
            .and_then(|label| label.strip_prefix("ISO-8859-"))
            .and_then(|suffix| suffix.parse::<u8>().ok())
            .unwrap_or(1);
        decode_8859(&self.data, part)
    }
}

/// Decode bytes as ISO-8859-`part`.
///
/// Part 1 maps bytes straight to code points; the other parts resolve
/// through `encoding_rs` labels (part 9 lands on windows-1254, its
/// WHATWG-registered superset).
fn decode_8859(data: &[u8], part: u8) -> String {
    if part == 1 {
        return data.iter().map(|&b| char::from(b)).collect();
    }
    let label = format!("iso-8859-{part}");
    match Encoding::for_label(label.as_bytes()) {
        Some(encoding) => encoding.decode(data).0.into_owned(),
        None => data.iter().map(|&b| char::from(b)).collect(),
    }
}
