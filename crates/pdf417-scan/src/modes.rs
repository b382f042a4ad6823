//! Codeword stream interpretation: mode commands, text submodes, byte and
//! numeric compaction, and GLI metadata.

/// Mode interpretation failures; any one aborts the candidate.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeError {
    #[error("data length codeword disagrees with the grid size")]
    LengthMismatch,
    #[error("GLI command after payload data")]
    GliAfterData,
    #[error("command operand missing or out of range")]
    BadOperand,
    #[error("unknown command codeword")]
    UnknownCommand,
}

pub(crate) const SWITCH_TO_TEXT: u16 = 900;
pub(crate) const SWITCH_TO_BYTE: u16 = 901;
pub(crate) const SWITCH_TO_NUMERIC: u16 = 902;
pub(crate) const SHIFT_TO_BYTE: u16 = 913;
pub(crate) const SWITCH_TO_BYTE_FOR_SIX: u16 = 924;
pub(crate) const GLI_USER_DEFINED: u16 = 925;
pub(crate) const GLI_GENERAL_PURPOSE: u16 = 926;
pub(crate) const GLI_CHARACTER_SET: u16 = 927;

/// Decoded payload plus GLI metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Payload {
    pub data: Vec<u8>,
    pub character_set: Option<String>,
    pub gli_character_set_number: Option<u16>,
    pub gli_general_purpose: Option<u32>,
    pub gli_user_defined: Option<u32>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum TextSubmode {
    Upper,
    Lower,
    Mixed,
    Punct,
    ShiftUpper,
    ShiftPunct,
}

// Submode tables: a zero entry is a latch or shift handled by the submode
// machine rather than an output byte.
const UPPER_TO_TEXT: [u8; 30] = [
    b'A', b'B', b'C', b'D', b'E', b'F', b'G', b'H', b'I', b'J', b'K', b'L', b'M', b'N', b'O',
    b'P', b'Q', b'R', b'S', b'T', b'U', b'V', b'W', b'X', b'Y', b'Z', b' ', 0, 0, 0,
];
const LOWER_TO_TEXT: [u8; 30] = [
    b'a', b'b', b'c', b'd', b'e', b'f', b'g', b'h', b'i', b'j', b'k', b'l', b'm', b'n', b'o',
    b'p', b'q', b'r', b's', b't', b'u', b'v', b'w', b'x', b'y', b'z', b' ', 0, 0, 0,
];
const MIXED_TO_TEXT: [u8; 30] = [
    b'0', b'1', b'2', b'3', b'4', b'5', b'6', b'7', b'8', b'9', b'&', b'\r', b'\t', b',', b':',
    b'#', b'-', b'.', b'$', b'/', b'+', b'%', b'*', b'=', b'^', 0, b' ', 0, 0, 0,
];
const PUNCT_TO_TEXT: [u8; 30] = [
    b';', b'<', b'>', b'@', b'[', b'\\', b']', b'_', b'`', b'~', b'!', b'\r', b'\t', b',', b':',
    b'\n', b'-', b'.', b'$', b'/', b'"', b'|', b'*', b'(', b')', b'?', b'{', b'}', b'\'', 0,
];

/// Interpret the corrected codeword grid into payload bytes.
///
/// `codewords[0]` is the data length (including itself and padding); the
/// stream is segments of data codewords separated by command codewords,
/// the first segment implicitly TEXT.
pub(crate) fn interpret(codewords: &[u16]) -> Result<Payload, ModeError> {
    let data_end = usize::from(codewords[0]);
    let mut payload = Payload::default();
    let mut ptr = 1usize;

    while ptr < data_end {
        let mut command = codewords[ptr];
        ptr += 1;
        if command < 900 {
            command = SWITCH_TO_TEXT;
            ptr -= 1;
        }

        let mut seg_end = ptr;
        while seg_end < data_end && codewords[seg_end] < 900 {
            seg_end += 1;
        }
        if seg_end == ptr {
            continue;
        }
        let segment = &codewords[ptr..seg_end];

        match command {
            SWITCH_TO_TEXT => {
                text_segment(segment, &mut payload.data);
                ptr = seg_end;
            }
            SWITCH_TO_BYTE => {
                bytes_segment(segment, false, &mut payload.data);
                ptr = seg_end;
            }
            SWITCH_TO_BYTE_FOR_SIX => {
                bytes_segment(segment, true, &mut payload.data);
                ptr = seg_end;
            }
            SWITCH_TO_NUMERIC => {
                numeric_segment(segment, &mut payload.data);
                ptr = seg_end;
            }
            SHIFT_TO_BYTE => {
                let byte = *codewords.get(ptr).ok_or(ModeError::BadOperand)?;
                ptr += 1;
                if byte >= 900 {
                    return Err(ModeError::BadOperand);
                }
                payload.data.push((byte % 256) as u8);
            }
            GLI_CHARACTER_SET => {
                if !payload.data.is_empty() {
                    return Err(ModeError::GliAfterData);
                }
                let g1 = *codewords.get(ptr).ok_or(ModeError::BadOperand)?;
                ptr += 1;
                if g1 >= 900 {
                    return Err(ModeError::BadOperand);
                }
                payload.gli_character_set_number = Some(g1);
                let part = i32::from(g1) - 2;
                let part = if part < 1 || (part > 9 && part != 13 && part != 15) {
                    1
                } else {
                    part
                };
                payload.character_set = Some(format!("ISO-8859-{part}"));
            }
            GLI_GENERAL_PURPOSE => {
                if !payload.data.is_empty() {
                    return Err(ModeError::GliAfterData);
                }
                let g2 = *codewords.get(ptr).ok_or(ModeError::BadOperand)?;
                let g3 = *codewords.get(ptr + 1).ok_or(ModeError::BadOperand)?;
                ptr += 2;
                if g2 >= 900 || g3 >= 900 {
                    return Err(ModeError::BadOperand);
                }
                payload.gli_general_purpose = Some(900 * (u32::from(g2) + 1) + u32::from(g3));
            }
            GLI_USER_DEFINED => {
                if !payload.data.is_empty() {
                    return Err(ModeError::GliAfterData);
                }
                let g4 = *codewords.get(ptr).ok_or(ModeError::BadOperand)?;
                ptr += 1;
                if g4 >= 900 {
                    return Err(ModeError::BadOperand);
                }
                payload.gli_user_defined = Some(810_900 + u32::from(g4));
            }
            _ => return Err(ModeError::UnknownCommand),
        }
    }

    Ok(payload)
}

/// Decode a text segment. Each codeword carries two 0..=29 subcodes; a
/// trailing 29 is padding. Every segment starts in Upper.
fn text_segment(codewords: &[u16], out: &mut Vec<u8>) {
    let text_len = 2 * codewords.len();
    let mut submode = TextSubmode::Upper;
    let mut saved = TextSubmode::Upper;
    let mut next_code = 0u16;

    for i in 0..text_len {
        let code: usize = if i % 2 == 0 {
            let codeword = codewords[i / 2];
            next_code = codeword % 30;
            usize::from(codeword / 30)
        } else {
            if next_code == 29 && i == text_len - 1 {
                break;
            }
            usize::from(next_code)
        };

        match submode {
            TextSubmode::Upper => {
                let ch = UPPER_TO_TEXT[code];
                if ch != 0 {
                    out.push(ch);
                } else if code == 27 {
                    submode = TextSubmode::Lower;
                } else if code == 28 {
                    submode = TextSubmode::Mixed;
                } else {
                    saved = submode;
                    submode = TextSubmode::ShiftPunct;
                }
            }
            TextSubmode::Lower => {
                let ch = LOWER_TO_TEXT[code];
                if ch != 0 {
                    out.push(ch);
                } else if code == 27 {
                    submode = TextSubmode::ShiftUpper;
                } else if code == 28 {
                    submode = TextSubmode::Mixed;
                } else {
                    saved = submode;
                    submode = TextSubmode::ShiftPunct;
                }
            }
            TextSubmode::Mixed => {
                let ch = MIXED_TO_TEXT[code];
                if ch != 0 {
                    out.push(ch);
                } else if code == 25 {
                    submode = TextSubmode::Punct;
                } else if code == 27 {
                    submode = TextSubmode::Lower;
                } else if code == 28 {
                    submode = TextSubmode::Upper;
                } else {
                    saved = submode;
                    submode = TextSubmode::ShiftPunct;
                }
            }
            TextSubmode::Punct => {
                let ch = PUNCT_TO_TEXT[code];
                if ch != 0 {
                    out.push(ch);
                } else {
                    submode = TextSubmode::Upper;
                }
            }
            TextSubmode::ShiftUpper => {
                submode = TextSubmode::Lower;
                let ch = UPPER_TO_TEXT[code];
                if ch != 0 {
                    out.push(ch);
                }
            }
            TextSubmode::ShiftPunct => {
                submode = saved;
                let ch = PUNCT_TO_TEXT[code];
                if ch != 0 {
                    out.push(ch);
                }
            }
        }
    }
}

/// Decode a byte segment: full 5-codeword blocks expand base-900 into 6
/// bytes; without `six_flag` the final full block stays raw; trailing
/// codewords yield one byte each.
fn bytes_segment(codewords: &[u16], six_flag: bool, out: &mut Vec<u8>) {
    let mut blocks = codewords.len() / 5;
    if codewords.len() % 5 == 0 && blocks >= 1 && !six_flag {
        blocks -= 1;
    }

    let mut ptr = 0;
    for _ in 0..blocks {
        let mut value: u64 = 0;
        for _ in 0..5 {
            value = value * 900 + u64::from(codewords[ptr]);
            ptr += 1;
        }
        for shift in (0..6).rev() {
            out.push(((value >> (8 * shift)) & 0xff) as u8);
        }
    }

    while ptr < codewords.len() {
        out.push((codewords[ptr] % 256) as u8);
        ptr += 1;
    }
}

/// Decode a numeric segment: blocks of up to 15 codewords expand base-900
/// into decimal digits, dropping the leading '1' sentinel. The expansion
/// runs in a base-10 digit accumulator; 15 codewords exceed even u128.
fn numeric_segment(codewords: &[u16], out: &mut Vec<u8>) {
    let mut rest = codewords;
    while !rest.is_empty() {
        let block_len = rest.len().min(15);

        // Little-endian decimal digits of sum(cw * 900^k).
        let mut digits = vec![0u8];
        for &codeword in &rest[..block_len] {
            let mut carry = u32::from(codeword);
            for digit in digits.iter_mut() {
                let v = u32::from(*digit) * 900 + carry;
                *digit = (v % 10) as u8;
                carry = v / 10;
            }
            while carry > 0 {
                digits.push((carry % 10) as u8);
                carry /= 10;
            }
        }

        // Most significant first, skipping the '1' sentinel digit.
        for &digit in digits.iter().rev().skip(1) {
            out.push(b'0' + digit);
        }

        rest = &rest[block_len..];
    }
}
