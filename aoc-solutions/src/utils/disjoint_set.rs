//! Disjoint-set (union-find) connectivity.
//!
//! [`DisjointSet`] uses path compression in [`find`](DisjointSet::find) and
//! union by rank, and keeps the size of every component at its root. The free
//! functions cover the two ways the puzzles drive it: connect a fixed budget
//! of closest pairs, or keep connecting until everything is one component.
//!
//! ```
//! use aoc_solutions::utils::disjoint_set::{connect_until_single, pairs_by_weight};
//!
//! let xs = [0i64, 10, 3, 4];
//! let pairs = pairs_by_weight(&xs, |a, b| (a - b).abs());
//! // 2-3 (1), 0-2 (3), 0-3 (4), then 1-3 (6) finally joins 10 to the rest
//! assert_eq!(connect_until_single(xs.len(), &pairs), Some((1, 3)));
//! ```

use tracing::debug;

/// Disjoint-set forest over the elements `0..n`
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
    /// Only meaningful at roots
    size: Vec<usize>,
    components: usize,
}

impl DisjointSet {
    /// `n` singleton components
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
            size: vec![1; n],
            components: n,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Number of distinct components
    pub fn component_count(&self) -> usize {
        self.components
    }

    /// Root of `x`'s component, compressing the path walked to reach it.
    ///
    /// # Panics
    /// If `x >= self.len()`.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Merge the components containing `x` and `y`.
    ///
    /// Returns `false` when they were already the same component.
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x == root_y {
            return false;
        }

        let (child, root) = match self.rank[root_x].cmp(&self.rank[root_y]) {
            std::cmp::Ordering::Less => (root_x, root_y),
            std::cmp::Ordering::Greater => (root_y, root_x),
            std::cmp::Ordering::Equal => {
                self.rank[root_x] += 1;
                (root_y, root_x)
            }
        };

        self.parent[child] = root;
        self.size[root] += self.size[child];
        self.components -= 1;
        true
    }

    pub fn connected(&mut self, x: usize, y: usize) -> bool {
        self.find(x) == self.find(y)
    }

    /// Size of the component containing `x`
    pub fn size_of(&mut self, x: usize) -> usize {
        let root = self.find(x);
        self.size[root]
    }

    /// One size per distinct component, in order of each component's root index
    pub fn component_sizes(&self) -> Vec<usize> {
        self.parent
            .iter()
            .enumerate()
            .filter(|&(i, &p)| i == p)
            .map(|(i, _)| self.size[i])
            .collect()
    }
}

/// An unordered pair `i < j` with the weight used to order merges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedPair<W> {
    pub i: usize,
    pub j: usize,
    pub weight: W,
}

/// Every pair `i < j` of `items`, sorted ascending by weight.
///
/// The sort is stable, so equal weights keep enumeration order
/// (`i` increasing, then `j` increasing).
pub fn pairs_by_weight<T, W, F>(items: &[T], weight: F) -> Vec<WeightedPair<W>>
where
    W: Ord,
    F: Fn(&T, &T) -> W,
{
    let n = items.len();
    let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in i + 1..n {
            pairs.push(WeightedPair {
                i,
                j,
                weight: weight(&items[i], &items[j]),
            });
        }
    }
    pairs.sort_by(|a, b| a.weight.cmp(&b.weight));
    pairs
}

/// Apply `union` to the first `k` pairs, whether or not each one merges.
pub fn connect_first<W>(n: usize, pairs: &[WeightedPair<W>], k: usize) -> DisjointSet {
    let mut set = DisjointSet::new(n);
    for pair in pairs.iter().take(k) {
        set.union(pair.i, pair.j);
    }
    set
}

/// Union pairs in order until a single component remains.
///
/// Returns the pair whose union produced the single component, or `None` if
/// the pairs never connect everything (always `None` for `n <= 1`, where no
/// union is needed).
pub fn connect_until_single<W>(n: usize, pairs: &[WeightedPair<W>]) -> Option<(usize, usize)> {
    let mut set = DisjointSet::new(n);
    if set.component_count() <= 1 {
        return None;
    }
    for (examined, pair) in pairs.iter().enumerate() {
        if set.union(pair.i, pair.j) && set.component_count() == 1 {
            debug!(n, examined = examined + 1, "single component reached");
            return Some((pair.i, pair.j));
        }
    }
    debug!(n, components = set.component_count(), "pairs exhausted");
    None
}

/// Squared Euclidean distance between two 3-D points
pub fn squared_distance(a: [i64; 3], b: [i64; 3]) -> i64 {
    a.iter().zip(&b).map(|(p, q)| (p - q) * (p - q)).sum()
}
