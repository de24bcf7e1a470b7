/// Disjoint-set forest over the indices `0..len`
///
/// Union by size with path halving, so merging every matching pair costs
/// near-constant time per pair instead of a scan over existing groups.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            size: vec![1; len],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Representative of the set containing `x`
    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merge the sets containing `a` and `b`; false if they were already one set
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (mut root_a, mut root_b) = (self.find(a), self.find(b));
        if root_a == root_b {
            return false;
        }
        if self.size[root_a] < self.size[root_b] {
            std::mem::swap(&mut root_a, &mut root_b);
        }
        self.parent[root_b] = root_a;
        self.size[root_a] += self.size[root_b];
        true
    }

    /// Every set with at least `min_size` elements
    ///
    /// Elements are ascending within a set and sets are ordered by their
    /// smallest element, independent of the order unions were applied in.
    pub fn components(&mut self, min_size: usize) -> Vec<Vec<usize>> {
        let mut slot_of_root = vec![usize::MAX; self.len()];
        let mut components: Vec<Vec<usize>> = Vec::new();

        for x in 0..self.len() {
            let root = self.find(x);
            if slot_of_root[root] == usize::MAX {
                slot_of_root[root] = components.len();
                components.push(Vec::new());
            }
            components[slot_of_root[root]].push(x);
        }

        components.retain(|component| component.len() >= min_size);
        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singletons() {
        let mut set = DisjointSet::new(3);
        assert_eq!(set.components(1), vec![vec![0], vec![1], vec![2]]);
        assert!(set.components(2).is_empty());
    }

    #[test]
    fn test_union_is_transitive() {
        let mut set = DisjointSet::new(5);
        assert!(set.union(0, 3));
        assert!(set.union(3, 4));
        assert!(!set.union(0, 4));

        assert_eq!(set.find(0), set.find(4));
        assert_ne!(set.find(0), set.find(1));
        assert_eq!(set.components(2), vec![vec![0, 3, 4]]);
    }

    #[test]
    fn test_union_order_does_not_matter() {
        let pairs = [(0, 1), (4, 5), (1, 2), (5, 3), (6, 7)];

        let mut forward = DisjointSet::new(8);
        for &(a, b) in &pairs {
            forward.union(a, b);
        }

        let mut backward = DisjointSet::new(8);
        for &(a, b) in pairs.iter().rev() {
            backward.union(b, a);
        }

        let expected = vec![vec![0, 1, 2], vec![3, 4, 5], vec![6, 7]];
        assert_eq!(forward.components(2), expected);
        assert_eq!(backward.components(2), expected);
    }

    #[test]
    fn test_bridge_merges_existing_groups() {
        // Two groups formed first, then linked by a later pair
        let mut set = DisjointSet::new(4);
        set.union(0, 1);
        set.union(2, 3);
        set.union(1, 2);

        assert_eq!(set.components(2), vec![vec![0, 1, 2, 3]]);
    }
}
