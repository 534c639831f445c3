//! Collators that wrap another collator.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use super::StringCollator;
use super::properties::CaseOrder;

/// Orders strings the base collator considers equal by the first character
/// pair that differs only in case. Strings with no such pair fall back to
/// length, then code points.
#[derive(Debug, Clone)]
pub struct CaseOrderCollator {
    base: Arc<dyn StringCollator>,
    order: CaseOrder,
}

impl CaseOrderCollator {
    pub fn new(base: Arc<dyn StringCollator>, order: CaseOrder) -> Self {
        Self { base, order }
    }
}

impl StringCollator for CaseOrderCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        let ord = self.base.compare(a, b);
        if ord != Ordering::Equal {
            return ord;
        }
        for (x, y) in a.chars().zip(b.chars()) {
            if let Some(ord) = self.case_difference(x, y) {
                return ord;
            }
        }
        a.chars()
            .count()
            .cmp(&b.chars().count())
            .then_with(|| a.cmp(b))
    }
}

impl CaseOrderCollator {
    /// Orders `x` against `y` when they are the same letter in different cases.
    fn case_difference(&self, x: char, y: char) -> Option<Ordering> {
        if x == y || x.is_uppercase() == y.is_uppercase() || !x.to_lowercase().eq(y.to_lowercase())
        {
            return None;
        }
        let upper_first = match self.order {
            CaseOrder::UpperFirst => Ordering::Less,
            CaseOrder::LowerFirst => Ordering::Greater,
        };
        Some(if x.is_uppercase() {
            upper_first
        } else {
            upper_first.reverse()
        })
    }
}

/// Compares runs of ASCII digits by numeric value and everything between
/// them with the base collator, so `file9` sorts before `file10`.
#[derive(Debug, Clone)]
pub struct AlphanumericCollator {
    base: Arc<dyn StringCollator>,
}

impl AlphanumericCollator {
    pub fn new(base: Arc<dyn StringCollator>) -> Self {
        Self { base }
    }
}

#[derive(Debug, PartialEq)]
enum Chunk<'a> {
    Text(&'a str),
    Number(&'a str),
}

fn chunks(s: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_number = None;
    for (i, c) in s.char_indices() {
        let digit = c.is_ascii_digit();
        if in_number.is_some_and(|n| n != digit) {
            out.push(chunk(&s[start..i], !digit));
            start = i;
        }
        in_number = Some(digit);
    }
    if let Some(number) = in_number {
        out.push(chunk(&s[start..], number));
    }
    out
}

fn chunk(text: &str, number: bool) -> Chunk<'_> {
    if number {
        Chunk::Number(text)
    } else {
        Chunk::Text(text)
    }
}

/// Compares digit strings by value without parsing, so any length works.
fn compare_numbers(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl StringCollator for AlphanumericCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        let (ca, cb) = (chunks(a), chunks(b));
        for (x, y) in ca.iter().zip(cb.iter()) {
            let ord = match (x, y) {
                (Chunk::Number(x), Chunk::Number(y)) => compare_numbers(x, y),
                (Chunk::Text(x), Chunk::Text(y)) => self.base.compare(x, y),
                (Chunk::Number(x), Chunk::Text(y)) | (Chunk::Text(x), Chunk::Number(y)) => {
                    self.base.compare(x, y)
                }
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        ca.len().cmp(&cb.len())
    }
}

/// Adapts a plain comparison function.
#[derive(Clone)]
pub struct FnCollator {
    name: String,
    compare: Arc<dyn Fn(&str, &str) -> Ordering + Send + Sync>,
}

impl FnCollator {
    pub fn new(
        name: impl Into<String>,
        compare: Arc<dyn Fn(&str, &str) -> Ordering + Send + Sync>,
    ) -> Self {
        Self {
            name: name.into(),
            compare,
        }
    }
}

impl fmt::Debug for FnCollator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCollator").field("name", &self.name).finish()
    }
}

impl StringCollator for FnCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        (self.compare)(a, b)
    }
}
