use core::fmt;

/// Dense body index. Assigned by `World::add` and stable for the lifetime
/// of the world (bodies are never removed).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct BodyId(pub u32);
impl fmt::Display for BodyId { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "BodyId({})", self.0) } }

impl BodyId {
    #[inline] pub fn index(self) -> usize { self.0 as usize }
}
