//! k-subset enumeration.
//!
//! Subsets are produced in lexicographic order of positions: `k` increasing pointers start at
//! `0..k`, and each step bumps the rightmost pointer that still has room, packing every pointer
//! after it directly behind it. Enumeration stops once the leftmost pointer reaches `n - k`.

/// Lazily enumerates the `k`-element position subsets of `0..n`.
///
/// [`advance`](Self::advance) lends the current subset without allocating; the [`Iterator`]
/// impl hands out owned copies.
#[derive(Debug, Clone)]
pub struct IndexCombinations {
    n: usize,
    ptrs: Vec<usize>,
    state: State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Fresh,
    Running,
    Done,
}

impl IndexCombinations {
    /// `k` is clamped to `n`; `k == 0` yields nothing.
    pub fn new(n: usize, k: usize) -> Self {
        let k = k.min(n);
        Self {
            n,
            ptrs: (0..k).collect(),
            state: if k == 0 { State::Done } else { State::Fresh },
        }
    }

    /// Subset size after clamping.
    pub fn k(&self) -> usize {
        self.ptrs.len()
    }

    pub fn advance(&mut self) -> Option<&[usize]> {
        match self.state {
            State::Done => return None,
            State::Fresh => {
                self.state = State::Running;
                return Some(&self.ptrs);
            }
            State::Running => {}
        }

        let n = self.n;
        let k = self.ptrs.len();
        if self.ptrs[0] >= n - k {
            self.state = State::Done;
            return None;
        }

        // Pointer `i` may advance while it stays below `n - (k - i)`; pointer 0 always can here.
        let Some(i) = (0..k).rev().find(|&i| self.ptrs[i] < n - (k - i)) else {
            self.state = State::Done;
            return None;
        };
        self.ptrs[i] += 1;
        for j in i + 1..k {
            self.ptrs[j] = self.ptrs[i] + j - i;
        }
        Some(&self.ptrs)
    }
}

impl Iterator for IndexCombinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().map(<[usize]>::to_vec)
    }
}

/// Enumerates the `k`-element subsets of `items`, each in the items' original relative order.
#[derive(Debug, Clone)]
pub struct Combinations<'a, T> {
    items: &'a [T],
    positions: IndexCombinations,
}

impl<'a, T> Combinations<'a, T> {
    pub fn new(items: &'a [T], k: usize) -> Self {
        Self {
            items,
            positions: IndexCombinations::new(items.len(), k),
        }
    }
}

impl<'a, T> Iterator for Combinations<'a, T> {
    type Item = Vec<&'a T>;

    fn next(&mut self) -> Option<Self::Item> {
        let items = self.items;
        self.positions
            .advance()
            .map(|ptrs| ptrs.iter().map(|&p| &items[p]).collect())
    }
}

pub fn combinations<T>(items: &[T], k: usize) -> Combinations<'_, T> {
    Combinations::new(items, k)
}

/// `C(n, k)`, saturating at `u64::MAX`.
pub fn binomial(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k) as u64;
    let n = n as u64;
    let mut acc: u128 = 1;
    for i in 0..k {
        // Exact at every step: acc * (n - i) is divisible by (i + 1).
        acc = acc * u128::from(n - i) / u128::from(i + 1);
        if acc > u128::from(u64::MAX) {
            return u64::MAX;
        }
    }
    acc as u64
}
