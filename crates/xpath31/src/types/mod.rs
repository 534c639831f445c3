mod atomic;
mod map;
mod node;
mod sequence;
mod static_type;

pub use atomic::AtomicValue;
pub use map::XdmMap;
pub use node::{Node, NodeKind};
pub use sequence::{XdmItem, XdmValue};
pub use static_type::{Cardinality, ItemType, StaticType};
