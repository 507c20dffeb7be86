//! Identifiers for observed page sections.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SectionId(pub u32);

/// Monotonic allocator for SectionId.
/// Dense indices double as positions in the observer's section list.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_section: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_section(&mut self) -> SectionId {
        let id = SectionId(self.next_section);
        self.next_section = self.next_section.wrapping_add(1);
        id
    }
}
