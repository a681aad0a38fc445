use crate::value::Identity;

/// Identities of the containers on the current path from the root.
///
/// Only ancestors are tracked: once a container has been left, the same
/// container reached through a sibling edge renders again in full.
#[derive(Debug, Default)]
pub struct IdentityTracker {
    path: Vec<(Identity, usize)>,
}

impl IdentityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes `identity` with the render label of its opening token.
    ///
    /// Returns false without pushing when `identity` is already an ancestor;
    /// the caller then emits a back-reference instead of descending.
    pub fn enter(&mut self, identity: Identity, label: usize) -> bool {
        if self.contains(identity) {
            return false;
        }
        self.path.push((identity, label));
        true
    }

    /// Pops `identity`, which must be the innermost entered container.
    pub fn leave(&mut self, identity: Identity) {
        let popped = self.path.pop();
        debug_assert_eq!(popped.map(|(id, _)| id), Some(identity));
    }

    pub fn contains(&self, identity: Identity) -> bool {
        self.path.iter().any(|(id, _)| *id == identity)
    }

    /// Label assigned when `identity` was entered, if it is on the path.
    pub fn label_of(&self, identity: Identity) -> Option<usize> {
        self.path
            .iter()
            .find(|(id, _)| *id == identity)
            .map(|(_, label)| *label)
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }
}
