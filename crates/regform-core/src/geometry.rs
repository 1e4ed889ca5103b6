#![forbid(unsafe_code)]

//! Screen rectangles and the splits the form layout needs.

/// Cell-addressed area. `(x, y)` is the top-left cell; `right` and `bottom`
/// are one past the last column and row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Area of `width` by `height` anchored at (0, 0).
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// No cells at all.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        matches!((self.width, self.height), (0, _) | (_, 0))
    }

    /// Split off `rows` rows from the top. The second rect is the remainder.
    #[must_use]
    pub fn split_top(&self, rows: u16) -> (Rect, Rect) {
        let rows = rows.min(self.height);
        (
            Rect::new(self.x, self.y, self.width, rows),
            Rect::new(
                self.x,
                self.y.saturating_add(rows),
                self.width,
                self.height - rows,
            ),
        )
    }

    /// Split off `rows` rows from the bottom. The first rect is the remainder.
    #[must_use]
    pub fn split_bottom(&self, rows: u16) -> (Rect, Rect) {
        let rows = rows.min(self.height);
        let rest = self.height - rows;
        (
            Rect::new(self.x, self.y, self.width, rest),
            Rect::new(self.x, self.y.saturating_add(rest), self.width, rows),
        )
    }

    /// Single-row rect at row offset `dy` inside this rect, if it fits.
    #[must_use]
    pub fn row(&self, dy: u16) -> Option<Rect> {
        (dy < self.height).then(|| Rect::new(self.x, self.y + dy, self.width, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_exclusive() {
        let r = Rect::new(2, 3, 10, 4);
        assert_eq!((r.right(), r.bottom()), (12, 7));
        assert_eq!(Rect::new(u16::MAX - 1, 0, 5, 1).right(), u16::MAX);
    }

    #[test]
    fn empty_rect() {
        assert!(Rect::new(0, 0, 0, 5).is_empty());
        assert!(Rect::default().is_empty());
        assert!(!Rect::from_size(1, 1).is_empty());
    }

    #[test]
    fn split_top_and_bottom() {
        let r = Rect::from_size(20, 10);
        let (top, rest) = r.split_top(3);
        assert_eq!(top, Rect::new(0, 0, 20, 3));
        assert_eq!(rest, Rect::new(0, 3, 20, 7));

        let (rest, bottom) = r.split_bottom(2);
        assert_eq!(rest, Rect::new(0, 0, 20, 8));
        assert_eq!(bottom, Rect::new(0, 8, 20, 2));

        let (all, none) = r.split_top(99);
        assert_eq!(all, r);
        assert!(none.is_empty());
    }

    #[test]
    fn row_inside_bounds_only() {
        let r = Rect::new(1, 1, 5, 2);
        assert_eq!(r.row(1), Some(Rect::new(1, 2, 5, 1)));
        assert_eq!(r.row(2), None);
    }
}
