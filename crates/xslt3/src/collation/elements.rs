//! Collation elements and level-by-level comparison.

use std::cmp::Ordering;

use super::normalize::decompose;
use super::properties::{Decomposition, Strength};

/// Weights of one collation element. A zero primary marks an element that
/// only carries an accent and is skipped at the primary level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element {
    pub primary: u32,
    pub secondary: u16,
    pub tertiary: u8,
}

impl Element {
    pub fn new(primary: u32, secondary: u16, tertiary: u8) -> Self {
        Self {
            primary,
            secondary,
            tertiary,
        }
    }

    /// An accent attached to the preceding element.
    pub fn mark(c: char) -> Self {
        Self::new(0, mark_weight(c), 0)
    }
}

/// Secondary weight of a combining mark.
pub fn mark_weight(c: char) -> u16 {
    (c as u32).saturating_sub(0x02FF) as u16
}

/// Compares element sequences up to `strength`; at identical strength
/// falls back to the normalized code points.
pub fn compare_levels(
    a: &[Element],
    b: &[Element],
    strength: Strength,
    identical: impl FnOnce() -> Ordering,
) -> Ordering {
    let primaries = |e: &[Element]| -> Vec<u32> {
        e.iter().map(|x| x.primary).filter(|p| *p != 0).collect()
    };
    let ord = primaries(a).cmp(&primaries(b));
    if ord != Ordering::Equal || strength == Strength::Primary {
        return ord;
    }

    let ord = a
        .iter()
        .map(|e| e.secondary)
        .cmp(b.iter().map(|e| e.secondary));
    if ord != Ordering::Equal || strength == Strength::Secondary {
        return ord;
    }

    let ord = a.iter().map(|e| e.tertiary).cmp(b.iter().map(|e| e.tertiary));
    if ord != Ordering::Equal || strength == Strength::Tertiary {
        return ord;
    }

    identical()
}

/// Identical-level comparison: code points after normalization.
pub fn compare_identical(a: &str, b: &str, decomposition: Decomposition) -> Ordering {
    decompose(a, decomposition).cmp(&decompose(b, decomposition))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_consulted_in_order() {
        let a = [Element::new(5, 0, 0)];
        let b = [Element::new(5, 0, 1)];
        assert_eq!(
            compare_levels(&a, &b, Strength::Secondary, || Ordering::Less),
            Ordering::Equal
        );
        assert_eq!(
            compare_levels(&a, &b, Strength::Tertiary, || Ordering::Equal),
            Ordering::Less
        );
        assert_eq!(
            compare_levels(&a, &a, Strength::Identical, || Ordering::Greater),
            Ordering::Greater
        );
    }

    #[test]
    fn test_accent_only_elements_are_ignored_at_primary() {
        let plain = [Element::new(7, 0, 0)];
        let accented = [Element::new(7, 0, 0), Element::mark('\u{0301}')];
        assert_eq!(
            compare_levels(&plain, &accented, Strength::Primary, || Ordering::Equal),
            Ordering::Equal
        );
        assert_eq!(
            compare_levels(&plain, &accented, Strength::Secondary, || Ordering::Equal),
            Ordering::Less
        );
    }
}
