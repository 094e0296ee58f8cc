//! Polyomino packing by canonical-cell backtracking.
//!
//! A [`Packer`] owns a list of [`Shape`]s and their symmetry variants. For a
//! [`Region`] it decides whether the requested multiset of pieces fits:
//!
//! - [`Packer::can_tile`]: the pieces cover every cell exactly once.
//! - [`Packer::can_pack`]: the pieces fit without overlapping, gaps allowed.
//!
//! Both searches always fill the first empty cell in row-major order, so two
//! placement sequences that differ only in the order pieces went down are
//! explored once.
//!
//! ```
//! use aoc_solutions::utils::packing::{Packer, Region, Shape};
//!
//! let corner: Shape = "#.\n##".parse().unwrap();
//! let packer = Packer::new(vec![corner]);
//!
//! assert!(packer.can_tile(&Region::new(3, 2, vec![2])).unwrap());
//! assert!(!packer.can_tile(&Region::new(3, 3, vec![3])).unwrap());
//! ```

mod search;

use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use search::PackingSearch;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackingError {
    #[error("a shape needs at least one cell")]
    EmptyShape,
    #[error("unexpected character {0:?} in shape pattern")]
    InvalidCell(char),
    #[error("region asks for shape {index}, but only {available} shapes are known")]
    UnknownShape { index: usize, available: usize },
    #[error("a {width}x{height} region has more cells than fit in usize")]
    RegionTooLarge { width: usize, height: usize },
}

/// A set of cells normalized so the smallest row and column are 0, sorted row-major
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    cells: Vec<(usize, usize)>,
}

impl Shape {
    /// Normalize `cells`; duplicates collapse into one cell.
    pub fn new(cells: impl IntoIterator<Item = (usize, usize)>) -> Result<Self, PackingError> {
        let cells: Vec<(i64, i64)> = cells
            .into_iter()
            .map(|(r, c)| (r as i64, c as i64))
            .collect();
        if cells.is_empty() {
            return Err(PackingError::EmptyShape);
        }
        Ok(Self::normalized(&cells))
    }

    fn normalized(cells: &[(i64, i64)]) -> Self {
        let min_row = cells.iter().map(|&(r, _)| r).min().unwrap_or(0);
        let min_col = cells.iter().map(|&(_, c)| c).min().unwrap_or(0);
        let mut cells: Vec<(usize, usize)> = cells
            .iter()
            .map(|&(r, c)| ((r - min_row) as usize, (c - min_col) as usize))
            .collect();
        cells.sort_unstable();
        cells.dedup();
        Self { cells }
    }

    fn transformed(&self, f: impl Fn(i64, i64) -> (i64, i64)) -> Self {
        let cells: Vec<(i64, i64)> = self
            .cells
            .iter()
            .map(|&(r, c)| f(r as i64, c as i64))
            .collect();
        Self::normalized(&cells)
    }

    /// Quarter turn: `(r, c) -> (c, -r)`
    pub fn rotated(&self) -> Self {
        self.transformed(|r, c| (c, -r))
    }

    /// Mirror across the vertical axis: `(r, c) -> (r, -c)`
    pub fn flipped(&self) -> Self {
        self.transformed(|r, c| (r, -c))
    }

    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }

    pub fn area(&self) -> usize {
        self.cells.len()
    }

    /// Bounding box as `(rows, cols)`
    pub fn bounds(&self) -> (usize, usize) {
        self.cells
            .iter()
            .fold((0, 0), |(rows, cols), &(r, c)| (rows.max(r + 1), cols.max(c + 1)))
    }

    /// Distinct shapes under the 4 rotations and 2 reflections, in the order
    /// they are first reached, starting with `self`.
    pub fn variants(&self) -> Vec<Shape> {
        let mut variants: Vec<Shape> = Vec::with_capacity(8);
        let mut current = self.clone();
        for _ in 0..2 {
            for _ in 0..4 {
                if !variants.contains(&current) {
                    variants.push(current.clone());
                }
                current = current.rotated();
            }
            current = current.flipped();
        }
        variants
    }
}

/// `#` marks a cell, `.` or space is empty; one line per row.
impl FromStr for Shape {
    type Err = PackingError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        let mut cells = Vec::new();
        for (row, line) in pattern.lines().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                match ch {
                    '#' => cells.push((row, col)),
                    '.' | ' ' => {}
                    other => return Err(PackingError::InvalidCell(other)),
                }
            }
        }
        Shape::new(cells)
    }
}

/// A `width` × `height` rectangle and how many of each shape must go in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub width: usize,
    pub height: usize,
    /// `counts[i]` copies of shape `i`
    pub counts: Vec<usize>,
}

impl Region {
    pub fn new(width: usize, height: usize, counts: Vec<usize>) -> Self {
        Self {
            width,
            height,
            counts,
        }
    }

    /// Cell count, `None` if it overflows `usize`
    pub fn area(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }

    fn checked_area(&self) -> Result<usize, PackingError> {
        self.area().ok_or(PackingError::RegionTooLarge {
            width: self.width,
            height: self.height,
        })
    }
}

/// Shapes with their symmetry variants computed once up front
#[derive(Debug, Clone)]
pub struct Packer {
    shapes: Vec<Shape>,
    variants: Vec<Vec<Shape>>,
}

impl Packer {
    pub fn new(shapes: Vec<Shape>) -> Self {
        let variants = shapes.iter().map(Shape::variants).collect();
        Self { shapes, variants }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn variants(&self, shape: usize) -> Option<&[Shape]> {
        self.variants.get(shape).map(Vec::as_slice)
    }

    /// Whether the pieces partition the region exactly
    pub fn can_tile(&self, region: &Region) -> Result<bool, PackingError> {
        let area = region.checked_area()?;
        match self.required_area(region)? {
            Some(required) if required == area => Ok(self.search(region, 0)),
            _ => Ok(false),
        }
    }

    /// Whether the pieces fit in the region without overlapping
    pub fn can_pack(&self, region: &Region) -> Result<bool, PackingError> {
        let area = region.checked_area()?;
        let Some(required) = self.required_area(region)?.filter(|&required| required <= area) else {
            return Ok(false);
        };
        if self.fits_in_slots(region) {
            debug!(
                width = region.width,
                height = region.height,
                "every piece fits in its own bounding-box slot"
            );
            return Ok(true);
        }
        Ok(self.search(region, area - required))
    }

    /// Number of `regions` for which [`can_pack`](Self::can_pack) holds
    pub fn count_packable(&self, regions: &[Region]) -> Result<usize, PackingError> {
        regions.iter().try_fold(0, |count, region| {
            Ok(count + usize::from(self.can_pack(region)?))
        })
    }

    /// Cells the requested pieces cover, `None` if the sum overflows `usize`
    fn required_area(&self, region: &Region) -> Result<Option<usize>, PackingError> {
        region
            .counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .try_fold(Some(0usize), |area, (index, &count)| {
                let shape = self.shapes.get(index).ok_or(PackingError::UnknownShape {
                    index,
                    available: self.shapes.len(),
                })?;
                Ok(area.and_then(|area| area.checked_add(shape.area().checked_mul(count)?)))
            })
    }

    /// Cut the region into equal slots the size of the largest bounding box
    /// and check there is a slot for every piece, in either orientation.
    fn fits_in_slots(&self, region: &Region) -> bool {
        let (pieces, rows, cols) = region
            .counts
            .iter()
            .zip(&self.shapes)
            .filter(|&(&count, _)| count > 0)
            .fold((0, 0, 0), |(pieces, rows, cols), (&count, shape)| {
                let (r, c) = shape.bounds();
                (pieces + count, rows.max(r), cols.max(c))
            });
        if pieces == 0 {
            return true;
        }

        let upright = (region.height / rows) * (region.width / cols);
        let turned = (region.height / cols) * (region.width / rows);
        upright.max(turned) >= pieces
    }

    fn search(&self, region: &Region, slack: usize) -> bool {
        let mut remaining = region.counts.clone();
        remaining.resize(self.shapes.len(), 0);

        let mut search = PackingSearch::new(&self.variants, remaining, region.width, region.height, slack);
        let found = search.run();
        debug!(
            width = region.width,
            height = region.height,
            slack,
            nodes = search.nodes(),
            found,
            "packing search finished"
        );
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EXAMPLE_SHAPES: [&str; 6] = [
        "###\n##.\n##.",
        "###\n##.\n.##",
        ".##\n###\n##.",
        "##.\n###\n##.",
        "###\n#..\n###",
        "###\n.#.\n###",
    ];

    fn shape(pattern: &str) -> Shape {
        pattern.parse().unwrap()
    }

    fn example_packer() -> Packer {
        Packer::new(EXAMPLE_SHAPES.iter().map(|p| shape(p)).collect())
    }

    #[test]
    fn test_normalizes_offsets() {
        let s = Shape::new([(3, 5), (2, 6), (3, 6)]).unwrap();
        assert_eq!(s.cells(), &[(0, 1), (1, 0), (1, 1)]);
        assert_eq!(Shape::new([]), Err(PackingError::EmptyShape));
    }

    #[test]
    fn test_variants_are_distinct_and_normalized() {
        let packer = example_packer();
        let counts: Vec<usize> = (0..6).map(|i| packer.variants(i).unwrap().len()).collect();
        assert_eq!(counts, vec![8, 8, 2, 4, 4, 2]);
        assert!(packer.variants(6).is_none());

        for original in EXAMPLE_SHAPES.iter().map(|p| shape(p)) {
            let variants = original.variants();
            assert_eq!(variants[0], original);
            for (i, v) in variants.iter().enumerate() {
                assert!(v.cells().iter().any(|&(r, _)| r == 0));
                assert!(v.cells().iter().any(|&(_, c)| c == 0));
                assert!(!variants[i + 1..].contains(v));
            }
        }

        assert_eq!(shape("#").variants().len(), 1);
        assert_eq!(shape("##\n##").variants().len(), 1);
        assert_eq!(shape("###").variants().len(), 2);
    }

    #[test]
    fn test_rejects_bad_pattern() {
        assert_eq!("#x".parse::<Shape>(), Err(PackingError::InvalidCell('x')));
        assert_eq!("..\n..".parse::<Shape>(), Err(PackingError::EmptyShape));
    }

    #[test]
    fn test_example_regions() {
        let packer = example_packer();
        let regions = [
            Region::new(4, 4, vec![0, 0, 0, 0, 2, 0]),
            Region::new(12, 5, vec![1, 0, 1, 0, 2, 2]),
            Region::new(12, 5, vec![1, 0, 1, 0, 3, 2]),
        ];
        assert!(packer.can_pack(&regions[0]).unwrap());
        assert!(packer.can_pack(&regions[1]).unwrap());
        assert!(!packer.can_pack(&regions[2]).unwrap());
        assert_eq!(packer.count_packable(&regions), Ok(2));
    }

    #[test]
    fn test_single_piece_fills_region_only_in_matching_orientation() {
        let domino = Packer::new(vec![shape("##")]);
        assert!(domino.can_tile(&Region::new(2, 1, vec![1])).unwrap());
        assert!(domino.can_tile(&Region::new(1, 2, vec![1])).unwrap());

        let corner = Packer::new(vec![shape("#.\n##")]);
        assert!(!corner.can_tile(&Region::new(3, 1, vec![1])).unwrap());
    }

    #[test]
    fn test_one_spare_cell_rejects_exact_tiling() {
        let corner = Packer::new(vec![shape("#.\n##")]);
        assert!(corner.can_tile(&Region::new(3, 2, vec![2])).unwrap());
        assert!(!corner.can_tile(&Region::new(7, 1, vec![2])).unwrap());
        assert!(!corner.can_tile(&Region::new(4, 2, vec![2])).unwrap());
        assert!(corner.can_pack(&Region::new(4, 2, vec![2])).unwrap());
    }

    #[test]
    fn test_known_tilings() {
        let ell = Packer::new(vec![shape("#.\n#.\n##")]);
        assert!(ell.can_tile(&Region::new(4, 4, vec![4])).unwrap());

        let tee = Packer::new(vec![shape("###\n.#.")]);
        assert!(tee.can_tile(&Region::new(4, 4, vec![4])).unwrap());
        assert!(!tee.can_pack(&Region::new(2, 2, vec![1])).unwrap());

        let corner = Packer::new(vec![shape("#.\n##")]);
        assert!(corner.can_pack(&Region::new(3, 3, vec![2])).unwrap());
        assert!(!corner.can_pack(&Region::new(3, 3, vec![3])).unwrap());
    }

    #[test]
    fn test_empty_request_always_fits() {
        let packer = example_packer();
        assert!(packer.can_pack(&Region::new(3, 3, vec![])).unwrap());
        assert!(packer.can_tile(&Region::new(0, 0, vec![0; 6])).unwrap());
        assert!(!packer.can_tile(&Region::new(1, 1, vec![])).unwrap());
    }

    #[test]
    fn test_loose_region_is_accepted_without_searching() {
        let packer = example_packer();
        let region = Region::new(30, 31, vec![20, 20, 20, 20, 10, 10]);
        assert!(packer.fits_in_slots(&region));
        assert!(packer.can_pack(&region).unwrap());

        let tight = Region::new(12, 5, vec![1, 0, 1, 0, 2, 2]);
        assert!(!packer.fits_in_slots(&tight));
    }

    #[test]
    fn test_bounds() {
        assert_eq!(shape("#.\n#.\n##").bounds(), (3, 2));
        assert_eq!(shape("###").rotated().bounds(), (3, 1));
    }

    #[test]
    fn test_oversized_region_is_rejected() {
        let packer = Packer::new(vec![shape("#")]);
        let huge = Region::new(usize::MAX, 2, vec![1]);
        assert_eq!(huge.area(), None);
        let expected = Err(PackingError::RegionTooLarge {
            width: usize::MAX,
            height: 2,
        });
        assert_eq!(packer.can_pack(&huge), expected);
        assert_eq!(packer.can_tile(&huge), expected);
        assert_eq!(packer.count_packable(&[huge]), expected.map(usize::from));
    }

    #[test]
    fn test_overflowing_piece_count_does_not_fit() {
        let packer = Packer::new(vec![shape("##")]);
        let region = Region::new(4, 4, vec![usize::MAX]);
        assert_eq!(packer.can_pack(&region), Ok(false));
        assert_eq!(packer.can_tile(&region), Ok(false));
    }

    #[test]
    fn test_unknown_shape_index() {
        let packer = Packer::new(vec![shape("#")]);
        assert_eq!(
            packer.can_pack(&Region::new(2, 2, vec![1, 1])),
            Err(PackingError::UnknownShape {
                index: 1,
                available: 1
            })
        );
        // Trailing zero counts for missing shapes are harmless
        assert_eq!(packer.can_pack(&Region::new(2, 2, vec![1, 0])), Ok(true));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_result_ignores_shape_listing_order(
            counts in prop::collection::vec(0usize..3, 3),
            width in 2usize..5,
            height in 2usize..5,
            rotation in 0usize..3,
        ) {
            let shapes = vec![shape("##"), shape("#.\n##"), shape("###")];
            let forward = Packer::new(shapes.clone());

            let mut rotated_shapes = shapes;
            rotated_shapes.rotate_left(rotation);
            let mut rotated_counts = counts.clone();
            rotated_counts.rotate_left(rotation);
            let rotated = Packer::new(rotated_shapes);

            let region = Region::new(width, height, counts);
            let rotated_region = Region::new(width, height, rotated_counts);
            prop_assert_eq!(forward.can_tile(&region), rotated.can_tile(&rotated_region));
            prop_assert_eq!(forward.can_pack(&region), rotated.can_pack(&rotated_region));
        }
    }
}
