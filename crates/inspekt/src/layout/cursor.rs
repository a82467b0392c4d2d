/// Running position used to place successive content blocks.
///
/// The cursor only moves down within a page. Starting a page resets the
/// vertical offset to the top margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    page: usize,
    y: f32,
    top: f32,
}

impl Cursor {
    /// Creates a cursor on the first page at the top margin.
    pub fn new(top: f32) -> Self {
        Self { page: 0, y: top, top }
    }

    /// Zero-based index of the current page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Vertical offset from the top of the current page, in millimetres.
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Moves the cursor `dy` millimetres down the current page.
    pub fn advance(&mut self, dy: f32) {
        self.y += dy;
    }

    /// Moves the cursor to an absolute offset on the current page.
    pub fn move_to(&mut self, y: f32) {
        self.y = y;
    }

    /// Starts the next page.
    pub fn next_page(&mut self) {
        self.page += 1;
        self.y = self.top;
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_cursor_moves_and_breaks() {
        let mut cursor = Cursor::new(20.0);
        cursor.move_to(120.0);
        cursor.advance(110.0);
        assert_approx_eq!(f32, cursor.y(), 230.0);
        assert_eq!(cursor.page(), 0);

        cursor.next_page();
        assert_eq!(cursor.page(), 1);
        assert_approx_eq!(f32, cursor.y(), 20.0);
    }
}
