//! Tiled layout arithmetic.
//!
//! `arrange` is pure: it maps a window count and a usable screen area to a
//! list of rectangles. The window manager applies them with
//! `XMoveResizeWindow`, so every layout can be tested without a display.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// One master window on the left, the rest stacked on the right.
    MonadTall,
    /// Every window gets the full area; the focused one is on top.
    Max,
    /// Two even columns.
    Stack,
}

impl Layout {
    pub fn name(&self) -> &'static str {
        match self {
            Layout::MonadTall => "monadtall",
            Layout::Max => "max",
            Layout::Stack => "stack",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn shrink(&self, margin: u32) -> Self {
        Self {
            x: self.x + margin as i32,
            y: self.y + margin as i32,
            width: self.width.saturating_sub(margin * 2),
            height: self.height.saturating_sub(margin * 2),
        }
    }
}

/// Compute the geometry of `count` tiled windows inside `area`.
///
/// `border` is subtracted from every rectangle so that the outer edge of the
/// drawn border lands exactly on the computed frame. Returns one rect per
/// window, in window order (index 0 is the master).
pub fn arrange(
    layout: Layout,
    count: usize,
    area: Rect,
    gaps: u32,
    border: u32,
    master_ratio: f32,
) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }

    match layout {
        Layout::Max => vec![frame(area.shrink(gaps), border); count],
        Layout::MonadTall => monad_tall(count, area, gaps, border, master_ratio),
        Layout::Stack => columns(count, area, gaps, border, 2),
    }
}

fn frame(rect: Rect, border: u32) -> Rect {
    Rect {
        x: rect.x,
        y: rect.y,
        width: rect.width.saturating_sub(border * 2),
        height: rect.height.saturating_sub(border * 2),
    }
}

fn monad_tall(count: usize, area: Rect, gaps: u32, border: u32, master_ratio: f32) -> Vec<Rect> {
    if count == 1 {
        return vec![frame(area.shrink(gaps), border)];
    }

    let ratio = master_ratio.clamp(0.1, 0.9);
    let inner = area.shrink(gaps);
    let master_width = (inner.width as f32 * ratio) as u32;
    let stack_width = inner.width - master_width;

    let mut rects = vec![frame(
        Rect::new(
            inner.x,
            inner.y,
            master_width.saturating_sub(gaps / 2),
            inner.height,
        ),
        border,
    )];

    let stack_count = count - 1;
    let stack_x = inner.x + master_width as i32 + (gaps / 2) as i32;
    let gap_total = gaps * (stack_count as u32 - 1);
    let height_per = (inner.height.saturating_sub(gap_total)) / stack_count as u32;

    for i in 0..stack_count {
        rects.push(frame(
            Rect::new(
                stack_x,
                inner.y + (i as u32 * (height_per + gaps)) as i32,
                stack_width.saturating_sub(gaps / 2),
                height_per,
            ),
            border,
        ));
    }

    rects
}

fn columns(count: usize, area: Rect, gaps: u32, border: u32, max_columns: usize) -> Vec<Rect> {
    let inner = area.shrink(gaps);
    let cols = count.min(max_columns);
    let col_gap_total = gaps * (cols as u32 - 1);
    let col_width = (inner.width.saturating_sub(col_gap_total)) / cols as u32;

    // First column takes the extra window when the count is odd.
    let per_col = count / cols;
    let remainder = count % cols;

    let mut rects = Vec::with_capacity(count);
    for col in 0..cols {
        let rows = per_col + usize::from(col < remainder);
        let row_gap_total = gaps * (rows as u32 - 1);
        let row_height = (inner.height.saturating_sub(row_gap_total)) / rows as u32;
        let x = inner.x + (col as u32 * (col_width + gaps)) as i32;

        for row in 0..rows {
            rects.push(frame(
                Rect::new(
                    x,
                    inner.y + (row as u32 * (row_height + gaps)) as i32,
                    col_width,
                    row_height,
                ),
                border,
            ));
        }
    }

    rects
}

#[cfg(test)]
mod tests {
    use super::*;

    const AREA: Rect = Rect {
        x: 0,
        y: 22,
        width: 1920,
        height: 1058,
    };

    #[test]
    fn empty_group_has_no_rects() {
        assert!(arrange(Layout::MonadTall, 0, AREA, 12, 2, 0.5).is_empty());
    }

    #[test]
    fn single_window_fills_the_area_minus_gaps() {
        let rects = arrange(Layout::MonadTall, 1, AREA, 12, 2, 0.5);
        assert_eq!(rects, vec![Rect::new(12, 34, 1920 - 24 - 4, 1058 - 24 - 4)]);
    }

    #[test]
    fn monad_tall_splits_master_and_stack() {
        let rects = arrange(Layout::MonadTall, 3, AREA, 12, 2, 0.5);
        assert_eq!(rects.len(), 3);

        // Master sits on the left; at ratio 0.5 both halves end up equal.
        assert_eq!(rects[0].x, 12);
        assert_eq!(rects[0].width, rects[1].width);

        // Stack windows share the right column without overlapping.
        assert_eq!(rects[1].x, rects[2].x);
        assert!(rects[1].x > rects[0].x + rects[0].width as i32);
        assert!(rects[2].y >= rects[1].y + rects[1].height as i32);

        // Everything stays inside the area.
        for r in &rects {
            assert!(r.x >= AREA.x && r.y >= AREA.y);
            assert!(r.x + (r.width + 4) as i32 <= AREA.x + AREA.width as i32);
            assert!(r.y + (r.height + 4) as i32 <= AREA.y + AREA.height as i32);
        }
    }

    #[test]
    fn monad_tall_respects_master_ratio() {
        let wide = arrange(Layout::MonadTall, 2, AREA, 0, 0, 0.7);
        assert_eq!(wide[0].width, (1920.0_f32 * 0.7) as u32);

        // Out-of-range ratios are clamped rather than honoured.
        let clamped = arrange(Layout::MonadTall, 2, AREA, 0, 0, 1.5);
        assert_eq!(clamped[0].width, (1920.0_f32 * 0.9) as u32);
    }

    #[test]
    fn max_gives_every_window_the_full_area() {
        let rects = arrange(Layout::Max, 3, AREA, 12, 2, 0.5);
        assert_eq!(rects.len(), 3);
        assert!(rects.iter().all(|r| *r == rects[0]));
        assert_eq!(rects[0], Rect::new(12, 34, 1920 - 24 - 4, 1058 - 24 - 4));
    }

    #[test]
    fn stack_distributes_windows_over_two_columns() {
        let rects = arrange(Layout::Stack, 5, AREA, 0, 0, 0.5);
        assert_eq!(rects.len(), 5);

        let left = rects.iter().filter(|r| r.x == 0).count();
        let right = rects.iter().filter(|r| r.x > 0).count();
        assert_eq!((left, right), (3, 2));
    }

    #[test]
    fn stack_with_one_window_uses_one_column() {
        let rects = arrange(Layout::Stack, 1, AREA, 12, 2, 0.5);
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].x, 12);
    }
}
