//! Grid cell corners and the alternating diagonal split.
//!
//! The vertex builder picks each triangle's flat normal from these corner
//! triples and the index builder emits the same triples, so the first corner
//! of every triangle is the vertex carrying that triangle's normal.

/// A corner of grid cell `(x, z)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    /// `(x, z)`
    TopLeft,
    /// `(x, z + 1)`
    BottomLeft,
    /// `(x + 1, z)`
    TopRight,
    /// `(x + 1, z + 1)`
    BottomRight,
}

impl Corner {
    /// Grid offset `(dx, dz)` from the cell origin.
    pub const fn offset(self) -> (u32, u32) {
        match self {
            Corner::TopLeft => (0, 0),
            Corner::BottomLeft => (0, 1),
            Corner::TopRight => (1, 0),
            Corner::BottomRight => (1, 1),
        }
    }
}

/// Whether cell `(x, z)` is split along the `TopLeft`-`BottomRight` diagonal.
#[inline]
pub const fn is_right_handed(x: u32, z: u32) -> bool {
    x % 2 != z % 2
}

/// The triangle containing `TopLeft` and `BottomLeft`, provoking corner first.
#[inline]
pub const fn left_triangle(right_handed: bool) -> [Corner; 3] {
    [
        Corner::TopLeft,
        Corner::BottomLeft,
        if right_handed {
            Corner::BottomRight
        } else {
            Corner::TopRight
        },
    ]
}

/// The triangle containing `TopRight` and `BottomRight`, provoking corner first.
#[inline]
pub const fn right_triangle(right_handed: bool) -> [Corner; 3] {
    [
        Corner::TopRight,
        if right_handed {
            Corner::TopLeft
        } else {
            Corner::BottomLeft
        },
        Corner::BottomRight,
    ]
}
