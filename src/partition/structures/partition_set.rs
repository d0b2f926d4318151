/// PartitionSet maintains a total assignment of elements to sets, with O(1) move/find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PartitionSet {
    sets: Vec<Vec<usize>>,  // sets[s] = elements currently in set s
    index: Vec<u32>,        // index[e] = s when e is in sets[s]
    position: Vec<usize>,   // position[e] = i when sets[s][i] is e
}

impl PartitionSet {
    /// Build a PartitionSet with `num_sets` sets from a complete slice of assignments.
    pub(crate) fn from_assignments(num_sets: usize, assignments: &[u32]) -> Self {
        assert!(num_sets > 0, "must have at least one set");
        let capacity = assignments.len() / num_sets + 1;
        let mut set = Self {
            sets: (0..num_sets).map(|_| Vec::with_capacity(capacity)).collect(),
            index: vec![0; assignments.len()],
            position: vec![0; assignments.len()],
        };
        set.rebuild(assignments);
        set
    }

    /// Number of sets.
    #[inline] pub(crate) fn num_sets(&self) -> usize { self.sets.len() }

    /// Universe size (number of elements addressable by index).
    #[inline] pub(crate) fn num_elems(&self) -> usize { self.index.len() }

    /// Return the set that `elem` is currently in.
    #[inline]
    pub(crate) fn find(&self, elem: usize) -> u32 {
        debug_assert!(elem < self.index.len(), "element out of range");
        self.index[elem]
    }

    /// Returns a reference to the elements currently in `set`.
    #[inline]
    pub(crate) fn get(&self, set: usize) -> &[usize] {
        debug_assert!(set < self.sets.len(), "set out of range");
        &self.sets[set]
    }

    /// Get a complete slice of assignments for each element.
    #[inline] pub(crate) fn assignments(&self) -> &[u32] { &self.index }

    /// Iterator over each set as a slice.
    #[inline]
    pub(crate) fn iter_sets(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.sets.iter().map(|v| v.as_slice())
    }

    /// Rebuild partition from a complete slice of assignments.
    pub(crate) fn rebuild(&mut self, assignments: &[u32]) {
        assert!(assignments.len() == self.num_elems(), "assignments length mismatch");

        self.sets.iter_mut().for_each(|v| v.clear());
        for (elem, &set) in assignments.iter().enumerate() {
            assert!((set as usize) < self.num_sets(), "set out of range");
            self.index[elem] = set;
            self.position[elem] = self.sets[set as usize].len();
            self.sets[set as usize].push(elem);
        }
    }

    /// Move `elem` to `set`. Panics in debug if out of range.
    pub(crate) fn move_to(&mut self, elem: usize, set: u32) {
        debug_assert!(elem < self.index.len(), "element out of range");
        debug_assert!((set as usize) < self.sets.len(), "set out of range");

        let (prev, pos) = (self.index[elem] as usize, self.position[elem]);
        if prev == set as usize { return }

        // Remove from previous set by swapping with last element.
        let last_elem = self.sets[prev].pop().unwrap();
        if last_elem != elem {
            self.sets[prev][pos] = last_elem;
            self.position[last_elem] = pos;
        }

        // Add to new set.
        self.index[elem] = set;
        self.position[elem] = self.sets[set as usize].len();
        self.sets[set as usize].push(elem);
    }
}
