use crate::outline::NodeKey;

/// Registry of the nodes closing every independent boundary cycle.
/// The first entry is the primary hanger, which bounds the scene and is never deregistered.
#[derive(Clone, Debug)]
pub struct HangerRegistry {
    hangers: Vec<NodeKey>,
}

impl HangerRegistry {
    pub fn new(primary: NodeKey) -> Self {
        HangerRegistry {
            hangers: vec![primary],
        }
    }

    pub fn primary(&self) -> NodeKey {
        self.hangers[0]
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.hangers.contains(&key)
    }

    pub fn register(&mut self, key: NodeKey) {
        debug_assert!(!self.contains(key), "hanger {key:?} registered twice");
        self.hangers.push(key);
    }

    /// Returns false if `key` was not registered or is the primary hanger
    pub fn deregister(&mut self, key: NodeKey) -> bool {
        match self.hangers.iter().skip(1).position(|&h| h == key) {
            Some(idx) => {
                self.hangers.remove(idx + 1);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.hangers.iter().copied()
    }

    /// Number of independent cycles, at least one
    pub fn len(&self) -> usize {
        self.hangers.len()
    }

    /// Always false, as the primary hanger cannot be deregistered.
    /// Present because a public `len` comes with an `is_empty`.
    pub fn is_empty(&self) -> bool {
        self.hangers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn primary_hanger_survives_deregistration() {
        let mut keys: SlotMap<NodeKey, ()> = SlotMap::with_key();
        let (primary, inner) = (keys.insert(()), keys.insert(()));

        let mut hangers = HangerRegistry::new(primary);
        hangers.register(inner);
        assert_eq!(hangers.len(), 2);

        assert!(!hangers.deregister(primary));
        assert!(hangers.deregister(inner));
        assert!(!hangers.deregister(inner));
        assert_eq!(hangers.iter().collect::<Vec<_>>(), vec![primary]);
        assert!(!hangers.is_empty());
    }
}
