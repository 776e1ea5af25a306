//! In-memory packing source for testing.

use std::cell::RefCell;
use std::rc::Rc;

use crate::{PackingGroup, PackingSource};

/// In-memory [`PackingSource`] for testing.
///
/// Clones share the same group list, so a test can change atlas composition
/// after handing the source to its owner.
#[derive(Clone, Default)]
pub struct MockPacking {
    groups: Rc<RefCell<Vec<PackingGroup>>>,
}
impl MockPacking {
    pub fn with_groups(groups: impl IntoIterator<Item = PackingGroup>) -> Self {
        Self {
            groups: Rc::new(RefCell::new(groups.into_iter().collect())),
        }
    }

    pub fn push(&self, group: PackingGroup) {
        self.groups.borrow_mut().push(group);
    }

    pub fn clear(&self) {
        self.groups.borrow_mut().clear();
    }
}

impl PackingSource for MockPacking {
    fn groups(&self) -> Vec<PackingGroup> {
        self.groups.borrow().clone()
    }
}
