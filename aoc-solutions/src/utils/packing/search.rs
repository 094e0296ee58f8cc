use ndarray::Array2;

use super::Shape;

/// Backtracking state for one region.
///
/// `remaining[k]` copies of shape `k` are still unplaced and `slack` cells may
/// still be left uncovered. Every step covers the first empty cell, either
/// with a piece or, while slack lasts, by leaving it empty.
pub(super) struct PackingSearch<'a> {
    variants: &'a [Vec<Shape>],
    /// Shape kinds, largest first
    order: Vec<usize>,
    remaining: Vec<usize>,
    pieces_left: usize,
    filled: Array2<bool>,
    slack: usize,
    nodes: u64,
}

impl<'a> PackingSearch<'a> {
    pub(super) fn new(
        variants: &'a [Vec<Shape>],
        remaining: Vec<usize>,
        width: usize,
        height: usize,
        slack: usize,
    ) -> Self {
        let area = |kind: usize| variants[kind].first().map_or(0, Shape::area);
        let mut order: Vec<usize> = (0..variants.len()).collect();
        order.sort_by_key(|&kind| std::cmp::Reverse(area(kind)));

        Self {
            variants,
            order,
            pieces_left: remaining.iter().sum(),
            remaining,
            filled: Array2::from_elem((height, width), false),
            slack,
            nodes: 0,
        }
    }

    pub(super) fn nodes(&self) -> u64 {
        self.nodes
    }

    pub(super) fn run(&mut self) -> bool {
        self.fill_from(0)
    }

    /// Cells before row-major index `from` are all filled.
    fn fill_from(&mut self, from: usize) -> bool {
        self.nodes += 1;
        if self.pieces_left == 0 {
            return true;
        }

        let (height, width) = self.filled.dim();
        let Some(index) = (from..height * width).find(|&i| !self.filled[[i / width, i % width]]) else {
            return false;
        };
        let target = (index / width, index % width);

        let variants = self.variants;
        for slot in 0..self.order.len() {
            let kind = self.order[slot];
            if self.remaining[kind] == 0 {
                continue;
            }
            for variant in &variants[kind] {
                let Some(origin) = self.anchor(variant, target) else {
                    continue;
                };
                self.set(variant, origin, true);
                self.remaining[kind] -= 1;
                self.pieces_left -= 1;

                if self.fill_from(index + 1) {
                    return true;
                }

                self.pieces_left += 1;
                self.remaining[kind] += 1;
                self.set(variant, origin, false);
            }
        }

        if self.slack > 0 {
            self.filled[target] = true;
            self.slack -= 1;
            if self.fill_from(index + 1) {
                return true;
            }
            self.slack += 1;
            self.filled[target] = false;
        }

        false
    }

    /// Origin that puts the variant's first cell on `target`, if every
    /// covered cell is inside the region and empty.
    ///
    /// The first cell of a normalized variant is on row 0, and every cell
    /// before `target` is filled, so no other anchoring can cover it.
    fn anchor(&self, variant: &Shape, target: (usize, usize)) -> Option<(usize, usize)> {
        let (height, width) = self.filled.dim();
        let &(first_row, first_col) = variant.cells().first()?;
        let origin = (target.0.checked_sub(first_row)?, target.1.checked_sub(first_col)?);

        variant
            .cells()
            .iter()
            .all(|&(r, c)| {
                let (row, col) = (origin.0 + r, origin.1 + c);
                row < height && col < width && !self.filled[[row, col]]
            })
            .then_some(origin)
    }

    fn set(&mut self, variant: &Shape, origin: (usize, usize), value: bool) {
        for &(r, c) in variant.cells() {
            self.filled[[origin.0 + r, origin.1 + c]] = value;
        }
    }
}
