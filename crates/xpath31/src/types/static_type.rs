//! Static item types and cardinalities used for compile-time specialization.

/// The item type hierarchy the compiler reasons about.
///
/// ```text
/// item()
/// ├── node()  ── document-node() | element() | attribute() | text()
/// ├── xs:anyAtomicType
/// │   ├── xs:string
/// │   ├── xs:untypedAtomic
/// │   ├── xs:boolean
/// │   └── numeric ── xs:double | xs:decimal ── xs:integer
/// └── map(*)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    Item,
    AnyNode,
    Document,
    Element,
    Attribute,
    Text,
    AnyAtomic,
    String,
    UntypedAtomic,
    Boolean,
    Numeric,
    Decimal,
    Integer,
    Double,
    Map,
}

impl ItemType {
    pub fn name(&self) -> &'static str {
        match self {
            ItemType::Item => "item()",
            ItemType::AnyNode => "node()",
            ItemType::Document => "document-node()",
            ItemType::Element => "element()",
            ItemType::Attribute => "attribute()",
            ItemType::Text => "text()",
            ItemType::AnyAtomic => "xs:anyAtomicType",
            ItemType::String => "xs:string",
            ItemType::UntypedAtomic => "xs:untypedAtomic",
            ItemType::Boolean => "xs:boolean",
            ItemType::Numeric => "xs:numeric",
            ItemType::Decimal => "xs:decimal",
            ItemType::Integer => "xs:integer",
            ItemType::Double => "xs:double",
            ItemType::Map => "map(*)",
        }
    }

    pub fn parent(&self) -> Option<ItemType> {
        match self {
            ItemType::Item => None,
            ItemType::AnyNode | ItemType::AnyAtomic | ItemType::Map => Some(ItemType::Item),
            ItemType::Document | ItemType::Element | ItemType::Attribute | ItemType::Text => {
                Some(ItemType::AnyNode)
            }
            ItemType::String
            | ItemType::UntypedAtomic
            | ItemType::Boolean
            | ItemType::Numeric => Some(ItemType::AnyAtomic),
            ItemType::Decimal | ItemType::Double => Some(ItemType::Numeric),
            ItemType::Integer => Some(ItemType::Decimal),
        }
    }

    pub fn is_subtype_of(&self, other: ItemType) -> bool {
        let mut current = Some(*self);
        while let Some(t) = current {
            if t == other {
                return true;
            }
            current = t.parent();
        }
        false
    }

    /// The nearest type both `self` and `other` are subtypes of.
    pub fn common_supertype(&self, other: ItemType) -> ItemType {
        let mut current = Some(*self);
        while let Some(t) = current {
            if other.is_subtype_of(t) {
                return t;
            }
            current = t.parent();
        }
        ItemType::Item
    }

    /// The type of the values produced by atomizing items of this type.
    pub fn atomized(&self) -> ItemType {
        if self.is_subtype_of(ItemType::AnyAtomic) {
            *self
        } else if self.is_subtype_of(ItemType::AnyNode) {
            ItemType::UntypedAtomic
        } else {
            ItemType::AnyAtomic
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    Empty,
    ExactlyOne,
    ZeroOrOne,
    OneOrMore,
    ZeroOrMore,
}

impl Cardinality {
    pub fn allows_many(&self) -> bool {
        matches!(self, Cardinality::OneOrMore | Cardinality::ZeroOrMore)
    }

    pub fn allows_empty(&self) -> bool {
        matches!(
            self,
            Cardinality::Empty | Cardinality::ZeroOrOne | Cardinality::ZeroOrMore
        )
    }

    fn from_bounds(allows_empty: bool, allows_one: bool, allows_many: bool) -> Self {
        match (allows_empty, allows_one || allows_many, allows_many) {
            (true, false, _) => Cardinality::Empty,
            (false, _, false) => Cardinality::ExactlyOne,
            (true, _, false) => Cardinality::ZeroOrOne,
            (false, _, true) => Cardinality::OneOrMore,
            (true, _, true) => Cardinality::ZeroOrMore,
        }
    }

    fn allows_one(&self) -> bool {
        !matches!(self, Cardinality::Empty)
    }

    /// Cardinality of a value that is either `self` or `other`.
    pub fn union(&self, other: Cardinality) -> Cardinality {
        Self::from_bounds(
            self.allows_empty() || other.allows_empty(),
            self.allows_one() || other.allows_one(),
            self.allows_many() || other.allows_many(),
        )
    }

    /// Cardinality of the sequence concatenation of `self` and `other`.
    pub fn sum(&self, other: Cardinality) -> Cardinality {
        let empty = self.allows_empty() && other.allows_empty();
        let many = self.allows_many()
            || other.allows_many()
            || (self.allows_one() && other.allows_one());
        Self::from_bounds(empty, true, many).restrict_if_empty(*self, other)
    }

    fn restrict_if_empty(self, a: Cardinality, b: Cardinality) -> Cardinality {
        match (a, b) {
            (Cardinality::Empty, other) | (other, Cardinality::Empty) => other,
            _ => self,
        }
    }

    /// Cardinality after keeping at most the first item.
    pub fn first(&self) -> Cardinality {
        match self {
            Cardinality::Empty => Cardinality::Empty,
            Cardinality::ExactlyOne | Cardinality::OneOrMore => Cardinality::ExactlyOne,
            Cardinality::ZeroOrOne | Cardinality::ZeroOrMore => Cardinality::ZeroOrOne,
        }
    }
}

/// The statically inferred type of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StaticType {
    pub item_type: ItemType,
    pub cardinality: Cardinality,
}

impl StaticType {
    pub fn new(item_type: ItemType, cardinality: Cardinality) -> Self {
        Self {
            item_type,
            cardinality,
        }
    }

    pub fn single(item_type: ItemType) -> Self {
        Self::new(item_type, Cardinality::ExactlyOne)
    }

    pub fn optional(item_type: ItemType) -> Self {
        Self::new(item_type, Cardinality::ZeroOrOne)
    }

    pub fn many(item_type: ItemType) -> Self {
        Self::new(item_type, Cardinality::ZeroOrMore)
    }

    pub fn empty() -> Self {
        Self::new(ItemType::Item, Cardinality::Empty)
    }

    pub fn any() -> Self {
        Self::many(ItemType::Item)
    }

    /// Type of a value that is either of the two.
    pub fn union(&self, other: &StaticType) -> StaticType {
        match (self.cardinality, other.cardinality) {
            (Cardinality::Empty, _) => StaticType::new(
                other.item_type,
                other.cardinality.union(Cardinality::Empty),
            ),
            (_, Cardinality::Empty) => StaticType::new(
                self.item_type,
                self.cardinality.union(Cardinality::Empty),
            ),
            _ => StaticType::new(
                self.item_type.common_supertype(other.item_type),
                self.cardinality.union(other.cardinality),
            ),
        }
    }

    /// Type of the concatenated sequence of the two.
    pub fn sequence(&self, other: &StaticType) -> StaticType {
        let item_type = match (self.cardinality, other.cardinality) {
            (Cardinality::Empty, _) => other.item_type,
            (_, Cardinality::Empty) => self.item_type,
            _ => self.item_type.common_supertype(other.item_type),
        };
        StaticType::new(item_type, self.cardinality.sum(other.cardinality))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtype_chain() {
        assert!(ItemType::Integer.is_subtype_of(ItemType::Decimal));
        assert!(ItemType::Integer.is_subtype_of(ItemType::AnyAtomic));
        assert!(ItemType::Attribute.is_subtype_of(ItemType::Item));
        assert!(!ItemType::Attribute.is_subtype_of(ItemType::AnyAtomic));
        assert!(!ItemType::UntypedAtomic.is_subtype_of(ItemType::String));
    }

    #[test]
    fn test_common_supertype() {
        assert_eq!(ItemType::Integer.common_supertype(ItemType::Double), ItemType::Numeric);
        assert_eq!(ItemType::Element.common_supertype(ItemType::Text), ItemType::AnyNode);
        assert_eq!(ItemType::String.common_supertype(ItemType::Element), ItemType::Item);
    }

    #[test]
    fn test_cardinality_algebra() {
        use Cardinality::*;
        assert_eq!(ExactlyOne.sum(ExactlyOne), OneOrMore);
        assert_eq!(ZeroOrOne.sum(ZeroOrOne), ZeroOrMore);
        assert_eq!(Empty.sum(ExactlyOne), ExactlyOne);
        assert_eq!(ExactlyOne.union(Empty), ZeroOrOne);
        assert_eq!(OneOrMore.first(), ExactlyOne);
        assert!(!ZeroOrOne.allows_many());
    }

    #[test]
    fn test_atomized_types() {
        assert_eq!(ItemType::Attribute.atomized(), ItemType::UntypedAtomic);
        assert_eq!(ItemType::Integer.atomized(), ItemType::Integer);
        assert_eq!(ItemType::Item.atomized(), ItemType::AnyAtomic);
    }
}
