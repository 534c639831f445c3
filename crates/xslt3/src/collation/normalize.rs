//! Canonical and compatibility decomposition for the Latin range.
//!
//! Covers Latin-1 Supplement and Latin Extended-A, which is what the built-in
//! collators tailor. Characters outside the table pass through unchanged.

use super::properties::Decomposition;

/// Precomposed letter, base letter, combining mark. Sorted by the first column.
const CANONICAL: [(char, char, char); 161] = [
    ('\u{00C0}', 'A', '\u{0300}'), ('\u{00C1}', 'A', '\u{0301}'), ('\u{00C2}', 'A', '\u{0302}'),
    ('\u{00C3}', 'A', '\u{0303}'), ('\u{00C4}', 'A', '\u{0308}'), ('\u{00C5}', 'A', '\u{030A}'),
    ('\u{00C7}', 'C', '\u{0327}'), ('\u{00C8}', 'E', '\u{0300}'), ('\u{00C9}', 'E', '\u{0301}'),
    ('\u{00CA}', 'E', '\u{0302}'), ('\u{00CB}', 'E', '\u{0308}'), ('\u{00CC}', 'I', '\u{0300}'),
    ('\u{00CD}', 'I', '\u{0301}'), ('\u{00CE}', 'I', '\u{0302}'), ('\u{00CF}', 'I', '\u{0308}'),
    ('\u{00D1}', 'N', '\u{0303}'), ('\u{00D2}', 'O', '\u{0300}'), ('\u{00D3}', 'O', '\u{0301}'),
    ('\u{00D4}', 'O', '\u{0302}'), ('\u{00D5}', 'O', '\u{0303}'), ('\u{00D6}', 'O', '\u{0308}'),
    ('\u{00D9}', 'U', '\u{0300}'), ('\u{00DA}', 'U', '\u{0301}'), ('\u{00DB}', 'U', '\u{0302}'),
    ('\u{00DC}', 'U', '\u{0308}'), ('\u{00DD}', 'Y', '\u{0301}'), ('\u{00E0}', 'a', '\u{0300}'),
    ('\u{00E1}', 'a', '\u{0301}'), ('\u{00E2}', 'a', '\u{0302}'), ('\u{00E3}', 'a', '\u{0303}'),
    ('\u{00E4}', 'a', '\u{0308}'), ('\u{00E5}', 'a', '\u{030A}'), ('\u{00E7}', 'c', '\u{0327}'),
    ('\u{00E8}', 'e', '\u{0300}'), ('\u{00E9}', 'e', '\u{0301}'), ('\u{00EA}', 'e', '\u{0302}'),
    ('\u{00EB}', 'e', '\u{0308}'), ('\u{00EC}', 'i', '\u{0300}'), ('\u{00ED}', 'i', '\u{0301}'),
    ('\u{00EE}', 'i', '\u{0302}'), ('\u{00EF}', 'i', '\u{0308}'), ('\u{00F1}', 'n', '\u{0303}'),
    ('\u{00F2}', 'o', '\u{0300}'), ('\u{00F3}', 'o', '\u{0301}'), ('\u{00F4}', 'o', '\u{0302}'),
    ('\u{00F5}', 'o', '\u{0303}'), ('\u{00F6}', 'o', '\u{0308}'), ('\u{00F9}', 'u', '\u{0300}'),
    ('\u{00FA}', 'u', '\u{0301}'), ('\u{00FB}', 'u', '\u{0302}'), ('\u{00FC}', 'u', '\u{0308}'),
    ('\u{00FD}', 'y', '\u{0301}'), ('\u{00FF}', 'y', '\u{0308}'), ('\u{0100}', 'A', '\u{0304}'),
    ('\u{0101}', 'a', '\u{0304}'), ('\u{0102}', 'A', '\u{0306}'), ('\u{0103}', 'a', '\u{0306}'),
    ('\u{0104}', 'A', '\u{0328}'), ('\u{0105}', 'a', '\u{0328}'), ('\u{0106}', 'C', '\u{0301}'),
    ('\u{0107}', 'c', '\u{0301}'), ('\u{0108}', 'C', '\u{0302}'), ('\u{0109}', 'c', '\u{0302}'),
    ('\u{010A}', 'C', '\u{0307}'), ('\u{010B}', 'c', '\u{0307}'), ('\u{010C}', 'C', '\u{030C}'),
    ('\u{010D}', 'c', '\u{030C}'), ('\u{010E}', 'D', '\u{030C}'), ('\u{010F}', 'd', '\u{030C}'),
    ('\u{0112}', 'E', '\u{0304}'), ('\u{0113}', 'e', '\u{0304}'), ('\u{0114}', 'E', '\u{0306}'),
    ('\u{0115}', 'e', '\u{0306}'), ('\u{0116}', 'E', '\u{0307}'), ('\u{0117}', 'e', '\u{0307}'),
    ('\u{0118}', 'E', '\u{0328}'), ('\u{0119}', 'e', '\u{0328}'), ('\u{011A}', 'E', '\u{030C}'),
    ('\u{011B}', 'e', '\u{030C}'), ('\u{011C}', 'G', '\u{0302}'), ('\u{011D}', 'g', '\u{0302}'),
    ('\u{011E}', 'G', '\u{0306}'), ('\u{011F}', 'g', '\u{0306}'), ('\u{0120}', 'G', '\u{0307}'),
    ('\u{0121}', 'g', '\u{0307}'), ('\u{0122}', 'G', '\u{0327}'), ('\u{0123}', 'g', '\u{0327}'),
    ('\u{0124}', 'H', '\u{0302}'), ('\u{0125}', 'h', '\u{0302}'), ('\u{0128}', 'I', '\u{0303}'),
    ('\u{0129}', 'i', '\u{0303}'), ('\u{012A}', 'I', '\u{0304}'), ('\u{012B}', 'i', '\u{0304}'),
    ('\u{012C}', 'I', '\u{0306}'), ('\u{012D}', 'i', '\u{0306}'), ('\u{012E}', 'I', '\u{0328}'),
    ('\u{012F}', 'i', '\u{0328}'), ('\u{0130}', 'I', '\u{0307}'), ('\u{0134}', 'J', '\u{0302}'),
    ('\u{0135}', 'j', '\u{0302}'), ('\u{0136}', 'K', '\u{0327}'), ('\u{0137}', 'k', '\u{0327}'),
    ('\u{0139}', 'L', '\u{0301}'), ('\u{013A}', 'l', '\u{0301}'), ('\u{013B}', 'L', '\u{0327}'),
    ('\u{013C}', 'l', '\u{0327}'), ('\u{013D}', 'L', '\u{030C}'), ('\u{013E}', 'l', '\u{030C}'),
    ('\u{0143}', 'N', '\u{0301}'), ('\u{0144}', 'n', '\u{0301}'), ('\u{0145}', 'N', '\u{0327}'),
    ('\u{0146}', 'n', '\u{0327}'), ('\u{0147}', 'N', '\u{030C}'), ('\u{0148}', 'n', '\u{030C}'),
    ('\u{014C}', 'O', '\u{0304}'), ('\u{014D}', 'o', '\u{0304}'), ('\u{014E}', 'O', '\u{0306}'),
    ('\u{014F}', 'o', '\u{0306}'), ('\u{0150}', 'O', '\u{030B}'), ('\u{0151}', 'o', '\u{030B}'),
    ('\u{0154}', 'R', '\u{0301}'), ('\u{0155}', 'r', '\u{0301}'), ('\u{0156}', 'R', '\u{0327}'),
    ('\u{0157}', 'r', '\u{0327}'), ('\u{0158}', 'R', '\u{030C}'), ('\u{0159}', 'r', '\u{030C}'),
    ('\u{015A}', 'S', '\u{0301}'), ('\u{015B}', 's', '\u{0301}'), ('\u{015C}', 'S', '\u{0302}'),
    ('\u{015D}', 's', '\u{0302}'), ('\u{015E}', 'S', '\u{0327}'), ('\u{015F}', 's', '\u{0327}'),
    ('\u{0160}', 'S', '\u{030C}'), ('\u{0161}', 's', '\u{030C}'), ('\u{0162}', 'T', '\u{0327}'),
    ('\u{0163}', 't', '\u{0327}'), ('\u{0164}', 'T', '\u{030C}'), ('\u{0165}', 't', '\u{030C}'),
    ('\u{0168}', 'U', '\u{0303}'), ('\u{0169}', 'u', '\u{0303}'), ('\u{016A}', 'U', '\u{0304}'),
    ('\u{016B}', 'u', '\u{0304}'), ('\u{016C}', 'U', '\u{0306}'), ('\u{016D}', 'u', '\u{0306}'),
    ('\u{016E}', 'U', '\u{030A}'), ('\u{016F}', 'u', '\u{030A}'), ('\u{0170}', 'U', '\u{030B}'),
    ('\u{0171}', 'u', '\u{030B}'), ('\u{0172}', 'U', '\u{0328}'), ('\u{0173}', 'u', '\u{0328}'),
    ('\u{0174}', 'W', '\u{0302}'), ('\u{0175}', 'w', '\u{0302}'), ('\u{0176}', 'Y', '\u{0302}'),
    ('\u{0177}', 'y', '\u{0302}'), ('\u{0178}', 'Y', '\u{0308}'), ('\u{0179}', 'Z', '\u{0301}'),
    ('\u{017A}', 'z', '\u{0301}'), ('\u{017B}', 'Z', '\u{0307}'), ('\u{017C}', 'z', '\u{0307}'),
    ('\u{017D}', 'Z', '\u{030C}'), ('\u{017E}', 'z', '\u{030C}'),
];

/// Compatibility mappings applied by [`Decomposition::Full`].
const COMPATIBILITY: [(char, &str); 10] = [
    ('\u{00A0}', " "),
    ('\u{0132}', "IJ"),
    ('\u{0133}', "ij"),
    ('\u{017F}', "s"),
    ('\u{3000}', " "),
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
];

pub fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

/// The base letter and combining mark of a precomposed Latin letter.
pub fn canonical_parts(c: char) -> Option<(char, char)> {
    CANONICAL
        .binary_search_by_key(&c, |(composed, _, _)| *composed)
        .ok()
        .map(|i| (CANONICAL[i].1, CANONICAL[i].2))
}

/// Maps a full-width ASCII variant (U+FF01..U+FF5E) to its ASCII form.
pub fn narrow(c: char) -> Option<char> {
    if ('\u{FF01}'..='\u{FF5E}').contains(&c) {
        char::from_u32(c as u32 - 0xFEE0)
    } else {
        None
    }
}

/// Normalizes `s` according to `mode`.
pub fn decompose(s: &str, mode: Decomposition) -> Vec<char> {
    let mut out = Vec::with_capacity(s.len());
    for c in s.chars() {
        if mode == Decomposition::None {
            out.push(c);
            continue;
        }
        if mode == Decomposition::Full {
            if let Some(n) = narrow(c) {
                out.push(n);
                continue;
            }
            if let Ok(i) = COMPATIBILITY.binary_search_by_key(&c, |(from, _)| *from) {
                out.extend(COMPATIBILITY[i].1.chars());
                continue;
            }
        }
        match canonical_parts(c) {
            Some((base, mark)) => {
                out.push(base);
                out.push(mark);
            }
            None => out.push(c),
        }
    }
    out
}
