// Text decoding for archive entries

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};
use std::borrow::Cow;
use tracing::debug;

/// Decode raw entry bytes into text.
///
/// Captures are normally UTF-8, but exports from some tools carry a BOM or are
/// written as UTF-16. Order of preference:
/// 1. Byte order mark
/// 2. UTF-16 without BOM (detected from the NUL byte pattern)
/// 3. Strict UTF-8
/// 4. Windows-1252, which never fails
pub fn decode_entry(data: &[u8]) -> Cow<'_, str> {
    let encoding = detect_encoding(data);
    let (text, had_errors) = encoding.decode_with_bom_removal(data);
    if had_errors {
        debug!("Replaced invalid {} sequences while decoding entry", encoding.name());
    }
    text
}

fn detect_encoding(data: &[u8]) -> &'static Encoding {
    if let Some((encoding, _bom_length)) = Encoding::for_bom(data) {
        return encoding;
    }

    // NUL is valid UTF-8, so UTF-16 has to be ruled out first
    if let Some(encoding) = detect_utf16_pattern(data) {
        return encoding;
    }

    if std::str::from_utf8(data).is_ok() {
        return UTF_8;
    }

    WINDOWS_1252
}

/// ASCII-heavy UTF-16 text has a NUL in every other byte. Which half holds
/// the NULs tells the byte order.
fn detect_utf16_pattern(data: &[u8]) -> Option<&'static Encoding> {
    let sample = &data[..data.len().min(1024)];
    if sample.len() < 4 {
        return None;
    }

    let pairs = sample.len() / 2;
    let even_nuls = sample.iter().step_by(2).filter(|b| **b == 0).count();
    let odd_nuls = sample.iter().skip(1).step_by(2).filter(|b| **b == 0).count();

    // At least 80% of one half must be NUL
    if odd_nuls * 10 >= pairs * 8 && even_nuls * 10 < pairs * 2 {
        Some(UTF_16LE)
    } else if even_nuls * 10 >= pairs * 8 && odd_nuls * 10 < pairs * 2 {
        Some(UTF_16BE)
    } else {
        None
    }
}
