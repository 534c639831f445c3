//! Rule-based tailoring.
//!
//! Rules use the familiar relation syntax: `&x` resets the insertion point
//! to `x`, and `<`, `;`, `,` and `=` insert the following text after it with
//! a primary, secondary, tertiary or no difference. Multi-character texts
//! (`< ch`) are contractions. Text may be quoted with `'`; `''` is a literal
//! quote. Characters the rules never mention sort after all tailored ones in
//! code point order.

use std::cmp::Ordering;
use std::collections::HashMap;

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{is_not, tag},
    character::complete::{char, multispace0, none_of},
    combinator::{map, recognize, value},
    multi::{many0, many1},
    sequence::{delimited, preceded},
};

use super::StringCollator;
use super::elements::{Element, compare_identical, compare_levels};
use super::error::CollationError;
use super::locale::Tailoring;
use super::normalize::{decompose, is_combining_mark};
use super::properties::{Decomposition, Strength};

const UNTAILORED: u32 = 1 << 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    Reset,
    Primary,
    Secondary,
    Tertiary,
    Identical,
}

#[derive(Debug, Clone, PartialEq)]
struct Rule {
    relation: Relation,
    text: String,
}

#[derive(Debug, Clone)]
pub struct RuleBasedCollator {
    rules: Vec<Rule>,
    table: HashMap<Vec<char>, Element>,
    longest: usize,
    strength: Strength,
    decomposition: Decomposition,
}

impl RuleBasedCollator {
    pub fn new(rules: &str) -> Result<Self, CollationError> {
        let parsed = parse_rules(rules)?;
        let mut collator = Self {
            rules: parsed,
            table: HashMap::new(),
            longest: 1,
            strength: Strength::Tertiary,
            decomposition: Decomposition::default(),
        };
        collator.build();
        log::debug!(
            "built rule-based collator with {} tailored elements",
            collator.table.len()
        );
        Ok(collator)
    }

    /// Lays out the tailored texts in order, then assigns weights.
    fn build(&mut self) {
        let mut order: Vec<(Vec<char>, Relation)> = Vec::new();
        let mut cursor: Option<usize> = None;

        for rule in &self.rules {
            let text = decompose(&rule.text, self.decomposition);
            let existing = order.iter().position(|(t, _)| *t == text);
            if rule.relation == Relation::Reset {
                cursor = Some(existing.unwrap_or_else(|| {
                    order.push((text, Relation::Primary));
                    order.len() - 1
                }));
                continue;
            }
            if let Some(i) = existing {
                order.remove(i);
                cursor = cursor.map(|c| if i <= c && c > 0 { c - 1 } else { c });
            }
            let at = cursor.map_or(order.len(), |c| (c + 1).min(order.len()));
            order.insert(at, (text, rule.relation));
            cursor = Some(at);
        }

        self.table.clear();
        self.longest = 1;
        let (mut p, mut s, mut t) = (0u32, 0u16, 0u8);
        for (text, relation) in order {
            match relation {
                Relation::Primary | Relation::Reset => {
                    p += 1;
                    s = 0;
                    t = 0;
                }
                Relation::Secondary => {
                    s += 1;
                    t = 0;
                }
                Relation::Tertiary => t = t.saturating_add(1),
                Relation::Identical => {}
            }
            self.longest = self.longest.max(text.len());
            self.table.insert(text, Element::new(p, s, t));
        }
    }

    pub fn elements(&self, s: &str) -> Vec<Element> {
        let chars = decompose(s, self.decomposition);
        let mut out = Vec::with_capacity(chars.len());
        let mut i = 0;
        while i < chars.len() {
            let max = self.longest.min(chars.len() - i);
            let matched = (1..=max)
                .rev()
                .find_map(|len| self.table.get(&chars[i..i + len]).map(|e| (len, *e)));
            match matched {
                Some((len, element)) => {
                    out.push(element);
                    i += len;
                }
                None => {
                    let c = chars[i];
                    if is_combining_mark(c) && self.decomposition != Decomposition::None {
                        out.push(Element::mark(c));
                    } else {
                        out.push(Element::new(UNTAILORED + c as u32, 0, 0));
                    }
                    i += 1;
                }
            }
        }
        out
    }
}

impl Tailoring for RuleBasedCollator {
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
        if self.decomposition != decomposition {
            self.decomposition = decomposition;
            self.build();
        }
    }
}

impl StringCollator for RuleBasedCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        compare_levels(&self.elements(a), &self.elements(b), self.strength, || {
            compare_identical(a, b, self.decomposition)
        })
    }
}

fn ws<'a, F, O>(inner: F) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    F: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

fn relation(input: &str) -> IResult<&str, Relation> {
    alt((
        value(Relation::Reset, char('&')),
        value(Relation::Primary, char('<')),
        value(Relation::Secondary, char(';')),
        value(Relation::Tertiary, char(',')),
        value(Relation::Identical, char('=')),
    ))
    .parse(input)
}

fn quoted(input: &str) -> IResult<&str, String> {
    delimited(
        char('\''),
        map(
            many0(alt((
                value("'", tag("''")),
                recognize(is_not("'")),
            ))),
            |parts| parts.concat(),
        ),
        char('\''),
    )
    .parse(input)
}

fn bare(input: &str) -> IResult<&str, String> {
    map(
        recognize(many1(none_of("&<;,=' \t\r\n"))),
        str::to_string,
    )
    .parse(input)
}

fn text(input: &str) -> IResult<&str, String> {
    map(many1(alt((quoted, bare))), |parts| parts.concat()).parse(input)
}

fn rule(input: &str) -> IResult<&str, Rule> {
    map((ws(relation), ws(text)), |(relation, text)| Rule {
        relation,
        text,
    })
    .parse(input)
}

fn parse_rules(source: &str) -> Result<Vec<Rule>, CollationError> {
    let offset = |rest: &str| source.len() - rest.len();
    let (rest, rules) = preceded(multispace0, many0(rule))
        .parse(source)
        .map_err(|e| match e {
            nom::Err::Error(e) | nom::Err::Failure(e) => {
                CollationError::invalid_rules(offset(e.input), "malformed rule")
            }
            nom::Err::Incomplete(_) => {
                CollationError::invalid_rules(source.len(), "unexpected end of rules")
            }
        })?;
    if !rest.is_empty() {
        let message = match relation(rest) {
            Ok(_) => "relation is missing its text".to_string(),
            Err(_) => format!("unexpected '{}'", rest.chars().next().unwrap_or(' ')),
        };
        return Err(CollationError::invalid_rules(offset(rest), message));
    }
    if rules.is_empty() {
        return Err(CollationError::invalid_rules(0, "no rules given"));
    }
    Ok(rules)
}
