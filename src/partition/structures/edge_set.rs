/// A set of edge ids over a fixed universe, with O(1) insert/remove/contains
/// and O(1) uniform sampling.
///
/// Representation:
/// - `edges` stores the ids currently in the set
/// - `loc[e] = Some(i)` means edge `e` is stored at `edges[i]`
///
/// Removal is swap-remove, so order is not preserved. Equality compares membership only.
#[derive(Debug, Clone)]
pub struct EdgeSet {
    edges: Vec<usize>,
    loc: Vec<Option<u32>>,
}

impl EdgeSet {
    /// Create an empty set able to hold edge ids in `0..num_edges`.
    pub(crate) fn new(num_edges: usize) -> Self {
        Self { edges: Vec::new(), loc: vec![None; num_edges] }
    }

    /// Build a set from an iterator of edge ids (duplicates are ignored).
    pub(crate) fn from_edges(num_edges: usize, iter: impl IntoIterator<Item = usize>) -> Self {
        let mut set = Self::new(num_edges);
        iter.into_iter().for_each(|edge| set.insert(edge));
        set
    }

    /// Number of edges in the set.
    #[inline] pub fn len(&self) -> usize { self.edges.len() }

    /// True when no edge is in the set.
    #[inline] pub fn is_empty(&self) -> bool { self.edges.is_empty() }

    /// Returns true if `edge` is in the set.
    #[inline]
    pub fn contains(&self, edge: usize) -> bool {
        debug_assert!(edge < self.loc.len(), "edge id out of range");
        self.loc[edge].is_some()
    }

    /// Read-only view of edge ids, in storage order.
    #[inline] pub fn as_slice(&self) -> &[usize] { &self.edges }

    /// Iterator over edge ids, in storage order.
    #[inline] pub fn iter(&self) -> impl Iterator<Item = usize> + '_ { self.edges.iter().copied() }

    /// Edge ids in ascending order.
    pub fn to_sorted_vec(&self) -> Vec<usize> {
        let mut edges = self.edges.clone();
        edges.sort_unstable();
        edges
    }

    /// Choose an edge uniformly at random, or None if empty.
    pub fn choose(&self, rng: &mut impl rand::Rng) -> Option<usize> {
        use rand::seq::IndexedRandom;
        self.edges.choose(rng).copied()
    }

    /// Insert `edge` (no-op if present).
    pub(crate) fn insert(&mut self, edge: usize) {
        debug_assert!(edge < self.loc.len(), "edge id out of range");
        if self.loc[edge].is_some() { return }
        self.loc[edge] = Some(self.edges.len() as u32);
        self.edges.push(edge);
    }

    /// Remove `edge` (no-op if absent).
    pub(crate) fn remove(&mut self, edge: usize) {
        debug_assert!(edge < self.loc.len(), "edge id out of range");
        if let Some(pos) = self.loc[edge] {
            let pos = pos as usize;
            let last = self.edges.pop().expect("loc said present, but set empty");
            if pos < self.edges.len() {
                self.edges[pos] = last;
                self.loc[last] = Some(pos as u32);
            }
            self.loc[edge] = None;
        }
    }

    /// Insert or remove `edge` so that membership equals `present`.
    #[inline]
    pub(crate) fn set(&mut self, edge: usize, present: bool) {
        if present { self.insert(edge) } else { self.remove(edge) }
    }
}

impl PartialEq for EdgeSet {
    fn eq(&self, other: &Self) -> bool {
        self.loc.len() == other.loc.len()
            && self.len() == other.len()
            && self.iter().all(|edge| other.contains(edge))
    }
}

impl Eq for EdgeSet {}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn insert_contains_remove() {
        let mut set = EdgeSet::new(10);
        set.insert(3);
        set.insert(7);
        set.insert(3);
        assert_eq!(set.len(), 2);
        assert!(set.contains(3) && set.contains(7) && !set.contains(0));

        set.remove(3);
        assert!(!set.contains(3));
        assert_eq!(set.as_slice(), &[7]);

        // Removing an absent edge is a no-op.
        set.remove(3);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn swap_remove_maintains_consistency() {
        let mut set = EdgeSet::from_edges(10, [0, 2, 4, 6]);
        set.remove(2);

        assert_eq!(set.len(), 3);
        for edge in set.as_slice().to_vec() {
            assert!(set.contains(edge));
        }
        assert_eq!(set.to_sorted_vec(), vec![0, 4, 6]);
    }

    #[test]
    fn set_toggles_membership() {
        let mut set = EdgeSet::new(4);
        set.set(1, true);
        set.set(2, true);
        set.set(1, false);
        assert_eq!(set.to_sorted_vec(), vec![2]);
    }

    #[test]
    fn equality_ignores_order() {
        let a = EdgeSet::from_edges(8, [1, 5, 3]);
        let b = EdgeSet::from_edges(8, [3, 1, 5]);
        let c = EdgeSet::from_edges(8, [3, 1]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn choose_returns_member() {
        let mut rng = StdRng::seed_from_u64(7);
        let set = EdgeSet::from_edges(8, [2, 4]);
        for _ in 0..20 {
            assert!(set.contains(set.choose(&mut rng).unwrap()));
        }
        assert_eq!(EdgeSet::new(3).choose(&mut rng), None);
    }
}
