//! Grid tiling.
//!
//! [`GridLayout`] maps `n` items onto a square `size × size` grid, where
//! `size = ceil(sqrt(n))`, filled row-major.  When `n` is not a perfect
//! square the trailing cells of the last row(s) stay empty.

/// An axis-aligned rectangle in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Horizontal centre.
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// The y coordinate at `fraction` of the height from the top.
    pub fn y_at(&self, fraction: f64) -> f64 {
        self.y + self.height * fraction
    }
}

/// Smallest `s` with `s * s >= n`, computed exactly on integers.
pub fn grid_size(n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let mut root = (n as f64).sqrt() as usize;
    // Correct any float rounding in either direction.
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    if root * root == n {
        root
    } else {
        root + 1
    }
}

/// A square grid fitted to a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    /// Cells per row and per column.
    size: usize,
    cell_width: f64,
    cell_height: f64,
}

impl GridLayout {
    /// Lay out `n` items over a `width × height` surface.
    ///
    /// Returns `None` when there is nothing to lay out (`n == 0`).
    pub fn new(n: usize, width: f64, height: f64) -> Option<Self> {
        let size = grid_size(n);
        if size == 0 {
            return None;
        }
        Some(Self {
            size,
            cell_width: width / size as f64,
            cell_height: height / size as f64,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell_width(&self) -> f64 {
        self.cell_width
    }

    pub fn cell_height(&self) -> f64 {
        self.cell_height
    }

    /// Row-major `(row, col)` of the item at `index`.
    pub fn position(&self, index: usize) -> (usize, usize) {
        (index / self.size, index % self.size)
    }

    /// Rectangle covered by the item at `index`.
    pub fn cell(&self, index: usize) -> Rect {
        let (row, col) = self.position(index);
        Rect::new(
            col as f64 * self.cell_width,
            row as f64 * self.cell_height,
            self.cell_width,
            self.cell_height,
        )
    }
}
