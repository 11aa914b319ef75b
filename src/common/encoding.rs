//! Character encoding lookup tables for RTF documents.
//!
//! RTF text is 7-bit by construction; anything outside ASCII reaches the
//! document either as a `\'hh` byte escape or a `\uN` code point. Byte
//! escapes are interpreted through the encoding declared by the active font
//! (`\cpgN` or `\fcharsetN`) or, failing that, the document character set.
//! This module maps those numeric identifiers to `encoding_rs` encodings.

use encoding_rs::Encoding;

/// Document character set declared in the RTF header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharacterSet {
    /// ANSI (Windows-1252 / CP1252)
    #[default]
    Ansi,
    /// Mac (Mac Roman)
    Mac,
    /// PC (DOS / CP437)
    Pc,
    /// PC (DOS / CP850)
    Pca,
}

impl CharacterSet {
    /// Parse a character set control word (`\ansi`, `\mac`, `\pc`, `\pca`).
    pub fn from_control_word(word: &str) -> Option<Self> {
        match word {
            "ansi" => Some(CharacterSet::Ansi),
            "mac" => Some(CharacterSet::Mac),
            "pc" => Some(CharacterSet::Pc),
            "pca" => Some(CharacterSet::Pca),
            _ => None,
        }
    }

    /// Windows codepage of the character set.
    pub fn codepage(self) -> i32 {
        match self {
            CharacterSet::Ansi => 1252,
            CharacterSet::Mac => 10000,
            CharacterSet::Pc => 437,
            CharacterSet::Pca => 850,
        }
    }
}

/// Map a Windows codepage identifier to an `encoding_rs` encoding.
///
/// Returns `None` for codepages that have no `encoding_rs` counterpart
/// (the OEM DOS pages such as 437 and 850, Johab, the ASMO 449+ variants).
///
/// # Examples
/// ```
/// use rtfhtml::common::encoding::codepage_to_encoding;
///
/// let encoding = codepage_to_encoding(1251).unwrap();
/// assert_eq!(encoding.name(), "windows-1251");
/// assert!(codepage_to_encoding(437).is_none());
/// ```
#[inline]
pub fn codepage_to_encoding(codepage: i32) -> Option<&'static Encoding> {
    match codepage {
        // DOS codepages
        866 => Some(encoding_rs::IBM866), // Soviet Union

        // Windows codepages
        708 => Some(encoding_rs::ISO_8859_6),    // Arabic (ASMO-708)
        819 => Some(encoding_rs::WINDOWS_1252),  // Windows 3.1 US and Western Europe
        874 => Some(encoding_rs::WINDOWS_874),   // Thai
        1250 => Some(encoding_rs::WINDOWS_1250), // Eastern European
        1251 => Some(encoding_rs::WINDOWS_1251), // Cyrillic
        1252 => Some(encoding_rs::WINDOWS_1252), // Western European
        1253 => Some(encoding_rs::WINDOWS_1253), // Greek
        1254 => Some(encoding_rs::WINDOWS_1254), // Turkish
        1255 => Some(encoding_rs::WINDOWS_1255), // Hebrew
        1256 => Some(encoding_rs::WINDOWS_1256), // Arabic
        1257 => Some(encoding_rs::WINDOWS_1257), // Baltic
        1258 => Some(encoding_rs::WINDOWS_1258), // Vietnamese

        // East Asian codepages
        932 => Some(encoding_rs::SHIFT_JIS), // Japanese
        936 => Some(encoding_rs::GBK),       // Simplified Chinese
        949 => Some(encoding_rs::EUC_KR),    // Korean
        950 => Some(encoding_rs::BIG5),      // Traditional Chinese
        54936 => Some(encoding_rs::GB18030),

        // Macintosh
        10000 => Some(encoding_rs::MACINTOSH),

        // Unicode
        65001 => Some(encoding_rs::UTF_8),

        _ => None,
    }
}

/// Map an RTF font charset (`\fcharsetN`) to the Windows codepage it implies.
///
/// Returns `None` for charsets with no codepage (3 is reserved) and for
/// identifiers the RTF format does not define.
#[inline]
pub fn charset_to_codepage(charset: i32) -> Option<i32> {
    let codepage = match charset {
        0..=2 => 1252, // ANSI, default, symbol
        77 => 10000,   // Macintosh
        128 => 932,    // Shift_JIS
        129 => 949,    // Hangul
        130 => 1361,   // Johab
        134 => 936,    // GB2312
        136 => 950,    // Big5
        161 => 1253,   // Greek
        162 => 1254,   // Turkish
        163 => 1258,   // Vietnamese
        177 | 181 => 1255, // Hebrew, Hebrew user
        178..=180 => 1256, // Arabic, traditional Arabic, Arabic user
        186 => 1257,   // Baltic
        204 => 1251,   // Russian
        222 => 874,    // Thai
        238 => 1250,   // Eastern European
        254 | 255 => 437, // PC 437, OEM
        _ => return None,
    };
    Some(codepage)
}

/// Map an RTF font charset (`\fcharsetN`) to an `encoding_rs` encoding.
///
/// # Examples
/// ```
/// use rtfhtml::common::encoding::charset_to_encoding;
///
/// assert_eq!(charset_to_encoding(204).unwrap().name(), "windows-1251");
/// assert!(charset_to_encoding(3).is_none());
/// ```
#[inline]
pub fn charset_to_encoding(charset: i32) -> Option<&'static Encoding> {
    charset_to_codepage(charset).and_then(codepage_to_encoding)
}

/// Decode a hex-encoded string to bytes, skipping whitespace.
///
/// Returns `None` if the payload has an odd number of hex digits or
/// contains a character that is not a hex digit.
///
/// # Examples
///
/// ```
/// use rtfhtml::common::encoding::decode_hex_data;
///
/// assert_eq!(decode_hex_data("48 65 6C 6C 6F").unwrap(), b"Hello");
/// assert!(decode_hex_data("4").is_none());
/// ```
pub fn decode_hex_data(hex_str: &str) -> Option<Vec<u8>> {
    let mut result = Vec::with_capacity(hex_str.len() / 2);
    let mut high: Option<u8> = None;

    for c in hex_str.chars().filter(|c| !c.is_ascii_whitespace()) {
        let nibble = c.to_digit(16)? as u8;
        match high.take() {
            Some(hi) => result.push((hi << 4) | nibble),
            None => high = Some(nibble),
        }
    }

    if high.is_some() {
        return None;
    }
    Some(result)
}
