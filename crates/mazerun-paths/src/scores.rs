use mazerun_core::{Point, Size};

/// Sentinel score for cells the search has not reached.
pub const UNREACHABLE: i32 = i32::MAX;

const NO_PARENT: usize = usize::MAX;

/// Per-cell g/f scores and parent links, stored row-major.
///
/// Every cell starts at [`UNREACHABLE`]. Out-of-bounds queries also report
/// [`UNREACHABLE`].
#[derive(Debug, Clone)]
pub struct ScoreTable {
    size: Size,
    g: Vec<i32>,
    f: Vec<i32>,
    parent: Vec<usize>,
}

impl ScoreTable {
    /// Create a table for a grid of the given size.
    pub fn new(size: Size) -> Self {
        let len = size.len();
        Self {
            size,
            g: vec![UNREACHABLE; len],
            f: vec![UNREACHABLE; len],
            parent: vec![NO_PARENT; len],
        }
    }

    /// Best known cost from the start.
    #[inline]
    pub fn g(&self, p: Point) -> i32 {
        self.size.index(p).map_or(UNREACHABLE, |i| self.g[i])
    }

    /// g-score plus heuristic.
    #[inline]
    pub fn f(&self, p: Point) -> i32 {
        self.size.index(p).map_or(UNREACHABLE, |i| self.f[i])
    }

    /// Whether `p` has been reached.
    #[inline]
    pub fn is_reached(&self, p: Point) -> bool {
        self.g(p) != UNREACHABLE
    }

    /// Predecessor of `p` on its best known route.
    #[inline]
    pub fn parent(&self, p: Point) -> Option<Point> {
        let i = self.size.index(p)?;
        match self.parent[i] {
            NO_PARENT => None,
            pi => Some(self.size.point(pi)),
        }
    }

    /// Record new scores for `p`. Ignored out of bounds.
    pub fn set(&mut self, p: Point, g: i32, f: i32, parent: Option<Point>) {
        let Some(i) = self.size.index(p) else {
            return;
        };
        let pi = parent.and_then(|pp| self.size.index(pp)).unwrap_or(NO_PARENT);
        self.g[i] = g;
        self.f[i] = f;
        self.parent[i] = pi;
    }

    /// Every reached cell with its `(g, f)` scores, row-major.
    pub fn reached(&self) -> impl Iterator<Item = (Point, i32, i32)> + '_ {
        self.g
            .iter()
            .zip(self.f.iter())
            .enumerate()
            .filter(|&(_, (&g, _))| g != UNREACHABLE)
            .map(|(i, (&g, &f))| (self.size.point(i), g, f))
    }
}
