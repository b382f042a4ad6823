//! The decode pipeline: locate candidate areas, recover the grid, sample
//! codewords, correct errors, and interpret the stream.

use log::debug;
use pdf417_scan_core::{
    find_border_columns, BarcodeArea, BitMatrix, BorderPattern, GridTransform,
};
use pdf417_scan_ecc::{correct_errors, CorrectError};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::indicators::{read_indicators, Indicators};
use crate::modes::{self, ModeError};
use crate::sampler::CodewordSampler;
use crate::Barcode;

/// Why one candidate area failed to decode. `decode` logs these and moves
/// on to the next candidate.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// No start/stop column reached the minimum symbol count.
    #[error("no border columns found")]
    NoBorders,
    /// Borders existed but no pair satisfied the area invariants.
    #[error("no start/stop pair matched")]
    NoMatchedArea,
    /// Row indicator scanning did not cover all three clusters on both
    /// sides.
    #[error("row indicators incomplete")]
    IndicatorsIncomplete,
    /// The corner correspondences do not determine a transform.
    #[error("projective transform is singular")]
    TransformSingular,
    /// More than `error_correction_length / 2` grid cells were unreadable.
    #[error("too many unreadable cells (budget {budget})")]
    TooManyErasures { budget: usize },
    /// Reed-Solomon could not repair the codeword grid.
    #[error("error correction failed: {0}")]
    RsUnrecoverable(#[from] CorrectError),
    /// The corrected stream violates the mode protocol.
    #[error("mode protocol violation: {0}")]
    ModeProtocol(#[from] ModeError),
}

/// Decode every PDF417 symbol in a binary image.
///
/// Candidates are produced in top-to-bottom border discovery order; a
/// failing candidate is skipped. When a pass decodes nothing the image is
/// rotated 180 degrees and scanned once more, so upside-down symbols cost
/// one extra pass.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip(image), fields(width = image.width(), height = image.height())))]
pub fn decode(image: &BitMatrix) -> Vec<Barcode> {
    let results = decode_pass(image);
    if !results.is_empty() {
        return results;
    }
    debug!("no symbol decoded, retrying rotated 180 degrees");
    decode_pass(&image.rotated_180())
}

fn decode_pass(image: &BitMatrix) -> Vec<Barcode> {
    let mut results = Vec::new();
    for area in match_areas(image) {
        match decode_area(image, &area) {
            Ok(barcode) => results.push(barcode),
            Err(error) => debug!("candidate rejected: {error}"),
        }
    }
    results
}

/// Fit every border column and pair starts with stops.
fn match_areas(image: &BitMatrix) -> Vec<BarcodeArea> {
    let columns = find_border_columns(image);
    if columns.start.is_empty() || columns.stop.is_empty() {
        debug!("candidate scan: {}", DecodeError::NoBorders);
        return Vec::new();
    }

    let stop_patterns: Vec<BorderPattern> = columns
        .stop
        .iter()
        .filter_map(|column| BorderPattern::fit(true, column))
        .collect();

    let mut areas = Vec::new();
    for start_column in &columns.start {
        let Some(start) = BorderPattern::fit(false, start_column) else {
            continue;
        };
        for stop in &stop_patterns {
            if let Some(area) = BarcodeArea::match_borders(&start, stop) {
                areas.push(area);
            }
        }
    }
    if areas.is_empty() {
        debug!("candidate scan: {}", DecodeError::NoMatchedArea);
    }
    areas
}

#[cfg_attr(feature = "tracing", instrument(level = "debug", skip(image, area)))]
fn decode_area(image: &BitMatrix, area: &BarcodeArea) -> Result<Barcode, DecodeError> {
    let indicators =
        read_indicators(image, area).ok_or(DecodeError::IndicatorsIncomplete)?;
    debug!(
        "indicators: {} rows x {} columns, {} parity codewords",
        indicators.data_rows, indicators.data_columns, indicators.error_correction_length
    );

    let transform =
        GridTransform::solve(&indicators.corners).ok_or(DecodeError::TransformSingular)?;

    let mut codewords = sample_grid(image, area, &transform, &indicators)?;

    let error_correction_count =
        correct_errors(&mut codewords, indicators.error_correction_length)?;

    let grid_size = indicators.data_rows * indicators.data_columns;
    if codewords.is_empty()
        || usize::from(codewords[0]) + indicators.error_correction_length != grid_size
    {
        return Err(DecodeError::ModeProtocol(ModeError::LengthMismatch));
    }

    let payload = modes::interpret(&codewords)?;

    Ok(Barcode {
        data: payload.data,
        character_set: payload.character_set,
        gli_character_set_number: payload.gli_character_set_number,
        gli_general_purpose: payload.gli_general_purpose,
        gli_user_defined: payload.gli_user_defined,
        data_columns: indicators.data_columns,
        data_rows: indicators.data_rows,
        error_correction_length: indicators.error_correction_length,
        error_correction_count,
    })
}

/// Sample every grid cell; unreadable cells become zero-valued erasures
/// within a budget of half the parity length.
fn sample_grid(
    image: &BitMatrix,
    area: &BarcodeArea,
    transform: &GridTransform,
    indicators: &Indicators,
) -> Result<Vec<u16>, DecodeError> {
    let budget = indicators.error_correction_length / 2;
    let mut sampler = CodewordSampler::new(image, area);
    let mut codewords = Vec::with_capacity(indicators.data_rows * indicators.data_columns);
    let mut erasures = 0usize;

    for row in 0..indicators.data_rows {
        for column in 0..indicators.data_columns {
            match sampler.data_codeword(transform, column as i32, row as i32) {
                Some(value) => codewords.push(value),
                None => {
                    codewords.push(0);
                    erasures += 1;
                    if erasures > budget {
                        return Err(DecodeError::TooManyErasures { budget });
                    }
                }
            }
        }
    }
    if erasures > 0 {
        debug!("grid sampling: {erasures} erasure(s) within budget {budget}");
    }
    Ok(codewords)
}
