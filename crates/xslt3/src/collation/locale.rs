//! The default collator family: multi-level comparison over Latin text.
//!
//! Primary weights order whitespace, then punctuation and symbols, then
//! digits, then letters. Accents are secondary differences and case is a
//! tertiary difference (lower case first). Full-width forms compare equal to
//! their ASCII counterparts below identical strength.

use std::cmp::Ordering;

use super::StringCollator;
use super::elements::{Element, compare_identical, compare_levels};
use super::normalize::{canonical_parts, decompose, is_combining_mark, narrow};
use super::properties::{Decomposition, Locale, Strength};

const WHITESPACE: u32 = 1 << 24;
const SYMBOL: u32 = 2 << 24;
const DIGIT: u32 = 3 << 24;
const LETTER: u32 = 4 << 24;
/// Combining marks that were not decomposed sort as symbols of their own.
const BARE_MARK: u32 = 5 << 24;

const STROKE: char = '\u{0335}';

/// Settings shared by the tailorable collators.
pub trait Tailoring {
    fn strength(&self) -> Strength;
    fn set_strength(&mut self, strength: Strength);
    fn decomposition(&self) -> Decomposition;
    fn set_decomposition(&mut self, decomposition: Decomposition);
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocaleCollator {
    locale: Locale,
    strength: Strength,
    decomposition: Decomposition,
}

impl LocaleCollator {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            strength: Strength::Tertiary,
            decomposition: Decomposition::default(),
        }
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn elements(&self, s: &str) -> Vec<Element> {
        let mut out = Vec::with_capacity(s.len());
        for c in decompose(s, self.decomposition) {
            if is_combining_mark(c) {
                if self.decomposition == Decomposition::None {
                    out.push(Element::new(BARE_MARK | c as u32, 0, 0));
                } else {
                    out.push(Element::mark(c));
                }
                continue;
            }
            let c = narrow(c).unwrap_or(c);
            if let Some((base, mark)) = canonical_parts(c) {
                out.push(letter(base));
                out.push(Element::mark(mark));
                continue;
            }
            push_special_or_letter(c, &mut out);
        }
        out
    }
}

fn push_special_or_letter(c: char, out: &mut Vec<Element>) {
    let upper = u8::from(c.is_uppercase());
    let expansion: Option<&str> = match c {
        'ß' => Some("ss"),
        'æ' => Some("ae"),
        'Æ' => Some("AE"),
        'œ' => Some("oe"),
        'Œ' => Some("OE"),
        _ => None,
    };
    if let Some(letters) = expansion {
        out.extend(letters.chars().map(letter));
        return;
    }
    let stroked = match c {
        'ø' | 'Ø' => Some('o'),
        'đ' | 'Đ' => Some('d'),
        'ł' | 'Ł' => Some('l'),
        'ħ' | 'Ħ' => Some('h'),
        'ı' => Some('i'),
        _ => None,
    };
    if let Some(base) = stroked {
        let mut e = letter(base);
        e.tertiary = upper;
        out.push(e);
        out.push(Element::mark(STROKE));
        return;
    }
    out.push(letter(c));
}

fn letter(c: char) -> Element {
    Element::new(primary_weight(c), 0, u8::from(c.is_uppercase()))
}

fn primary_weight(c: char) -> u32 {
    if c.is_whitespace() {
        return WHITESPACE | c as u32;
    }
    if let Some(d) = c.to_digit(10) {
        return DIGIT | d;
    }
    if c.is_alphabetic() {
        let lower = c.to_lowercase().next().unwrap_or(c);
        return match lower {
            'a'..='z' => LETTER | ((lower as u32 - 'a' as u32 + 1) << 8),
            'þ' => LETTER | (27 << 8),
            _ => LETTER | (0x10000 + lower as u32),
        };
    }
    if c.is_numeric() {
        return DIGIT | (0x10000 + c as u32);
    }
    SYMBOL | c as u32
}

impl Tailoring for LocaleCollator {
    fn strength(&self) -> Strength {
        self.strength
    }

    fn set_strength(&mut self, strength: Strength) {
        self.strength = strength;
    }

    fn decomposition(&self) -> Decomposition {
        self.decomposition
    }

    fn set_decomposition(&mut self, decomposition: Decomposition) {
        self.decomposition = decomposition;
    }
}

impl StringCollator for LocaleCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        compare_levels(&self.elements(a), &self.elements(b), self.strength, || {
            compare_identical(a, b, self.decomposition)
        })
    }
}
