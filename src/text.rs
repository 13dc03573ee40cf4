//! Western Generation III character encoding.

/// Control codes from here up to and including `0xff` end a string.
const FIRST_CONTROL_CODE: u8 = 0xfa;

/// Table entry for code points with no Western glyph.
#[cfg(test)]
const UNKNOWN: &str = "*";

#[rustfmt::skip]
const CHARACTER_TABLE: [&str; 256] = [
    // 0x00
    " ", "À", "Á", "Â", "Ç", "È", "É", "Ê", "Ë", "Ì", "*", "Î", "Ï", "Ò", "Ó", "Ô",
    // 0x10
    "Œ", "Ù", "Ú", "Û", "Ñ", "ß", "à", "á", "*", "ç", "è", "é", "ê", "ë", "ì", "*",
    // 0x20
    "î", "ï", "ò", "ó", "ô", "œ", "ù", "ú", "û", "ñ", "º", "ª", "ᵉʳ", "&", "+", "*",
    // 0x30
    "*", "*", "*", "*", "Lv", "=", ";", "*", "*", "*", "*", "*", "*", "*", "*", "*",
    // 0x40
    "*", "*", "*", "*", "*", "*", "*", "*", "*", "*", "*", "*", "*", "*", "*", "*",
    // 0x50
    "*", "¿", "¡", "PK", "MN", "PO", "Ké", "BL", "OC", "K", "Í", "%", "(", ")", "*", "*",
    // 0x60
    "*", "*", "*", "*", "*", "*", "*", "*", "â", "*", "*", "*", "*", "*", "*", "í",
    // 0x70
    "*", "*", "*", "*", "*", "*", "*", "*", "*", "↑", "↓", "←", "→", "*", "*", "*",
    // 0x80
    "*", "*", "*", "*", "ᵉ", "<", ">", "*", "*", "*", "*", "*", "*", "*", "*", "*",
    // 0x90
    "*", "*", "*", "*", "*", "*", "*", "*", "*", "*", "*", "*", "*", "*", "*", "*",
    // 0xa0
    "ʳᵉ", "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "!", "?", ".", "-", "・",
    // 0xb0
    "…", "“", "”", "‘", "’", "♂", "♀", "$", ",", "×", "/", "A", "B", "C", "D", "E",
    // 0xc0
    "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S", "T", "U",
    // 0xd0
    "V", "W", "X", "Y", "Z", "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k",
    // 0xe0
    "l", "m", "n", "o", "p", "q", "r", "s", "t", "u", "v", "w", "x", "y", "z", "►",
    // 0xf0
    ":", "Ä", "Ö", "Ü", "ä", "ö", "ü", "*", "*", "*", "", "", "", "", "", "",
];

pub fn decode_text(text_data: &[u8]) -> String {
    let mut out_text = String::new();
    for byte in text_data {
        if *byte >= FIRST_CONTROL_CODE {
            break;
        }
        out_text.push_str(CHARACTER_TABLE[*byte as usize]);
    }

    out_text
}

/// Inverse of [`decode_text`] for single-glyph characters, padded with the terminator.
/// Unknown characters are skipped.
#[cfg(test)]
pub(crate) fn encode_text(text: &str, len: usize) -> Vec<u8> {
    let mut out = text
        .chars()
        .filter_map(|c| {
            let mut buf = [0u8; 4];
            let glyph: &str = c.encode_utf8(&mut buf);
            CHARACTER_TABLE[..FIRST_CONTROL_CODE as usize]
                .iter()
                .position(|entry| *entry == glyph && *entry != UNKNOWN)
                .map(|idx| idx as u8)
        })
        .take(len)
        .collect::<Vec<_>>();
    out.resize(len, 0xff);
    out
}
