use crate::core::window::Window;
use crate::layout::Layout;

/// A named, ordered container for windows, shown on at most one screen at a
/// time. Groups are created once at configuration load and keep their order
/// for the lifetime of the manager.
pub struct Group {
    pub name: String,
    pub windows: Vec<Window>,
    pub focused: Option<usize>,
    pub layouts: Vec<Layout>,
    pub layout_index: usize,
    pub master_ratio: f32,
}

impl Group {
    pub fn new(name: &str, layouts: Vec<Layout>, initial: Layout) -> Self {
        let layout_index = layouts.iter().position(|l| *l == initial).unwrap_or(0);
        Self {
            name: name.to_string(),
            windows: Vec::new(),
            focused: None,
            layouts,
            layout_index,
            master_ratio: 0.5,
        }
    }

    pub fn layout(&self) -> Layout {
        self.layouts
            .get(self.layout_index)
            .copied()
            .unwrap_or(Layout::MonadTall)
    }

    /// Advance to the next layout in the cycle.
    pub fn next_layout(&mut self) {
        if !self.layouts.is_empty() {
            self.layout_index = (self.layout_index + 1) % self.layouts.len();
        }
    }

    pub fn add_window(&mut self, window: Window) {
        self.windows.push(window);
        self.focused = Some(self.windows.len() - 1);
    }

    /// Remove `window_id` and return the window, keeping the focus pointer
    /// on a sensible neighbour.
    pub fn take_window(&mut self, window_id: u64) -> Option<Window> {
        let idx = self.windows.iter().position(|w| w.id == window_id)?;
        let window = self.windows.remove(idx);

        self.focused = match self.focused {
            Some(_) if self.windows.is_empty() => None,
            Some(f) if f == idx => Some(idx.min(self.windows.len() - 1)),
            Some(f) if f > idx => Some(f - 1),
            other => other,
        };

        Some(window)
    }

    pub fn remove_window(&mut self, window_id: u64) {
        let _ = self.take_window(window_id);
    }

    pub fn focused_window(&self) -> Option<&Window> {
        self.focused.and_then(|idx| self.windows.get(idx))
    }

    pub fn focused_window_mut(&mut self) -> Option<&mut Window> {
        self.focused.and_then(|idx| self.windows.get_mut(idx))
    }

    pub fn focus_id(&mut self, window_id: u64) {
        if let Some(idx) = self.windows.iter().position(|w| w.id == window_id) {
            self.focused = Some(idx);
        }
    }

    /// Move focus one window forward (or back) in the group's window order,
    /// skipping docks. Returns the newly focused window id.
    pub fn cycle_focus(&mut self, forward: bool) -> Option<u64> {
        let candidates: Vec<usize> = self
            .windows
            .iter()
            .enumerate()
            .filter(|(_, w)| !w.is_dock)
            .map(|(i, _)| i)
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let pos = self
            .focused
            .and_then(|f| candidates.iter().position(|&i| i == f))
            .unwrap_or(0);
        let next = if forward {
            (pos + 1) % candidates.len()
        } else {
            (pos + candidates.len() - 1) % candidates.len()
        };

        self.focused = Some(candidates[next]);
        self.focused_window().map(|w| w.id)
    }

    /// Swap the focused window with its neighbour in the window order.
    pub fn shuffle_focused(&mut self, forward: bool) {
        let Some(focused) = self.focused else {
            return;
        };
        let len = self.windows.len();
        if len < 2 {
            return;
        }

        let other = if forward {
            (focused + 1) % len
        } else {
            (focused + len - 1) % len
        };
        self.windows.swap(focused, other);
        self.focused = Some(other);
    }

    /// Ids of the windows that take part in the tiled layout, in order.
    pub fn tiled_ids(&self) -> Vec<u64> {
        self.windows
            .iter()
            .filter(|w| w.is_tiled())
            .map(|w| w.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> Group {
        Group::new(
            "work",
            vec![Layout::MonadTall, Layout::Max, Layout::Stack],
            Layout::MonadTall,
        )
    }

    fn window(id: u64) -> Window {
        Window::new(id, 0, 0, 100, 100)
    }

    #[test]
    fn add_focuses_newest_window() {
        let mut g = group();
        g.add_window(window(1));
        g.add_window(window(2));
        assert_eq!(g.focused_window().map(|w| w.id), Some(2));
    }

    #[test]
    fn take_keeps_focus_on_a_neighbour() {
        let mut g = group();
        g.add_window(window(1));
        g.add_window(window(2));
        g.add_window(window(3));

        let taken = g.take_window(3).unwrap();
        assert_eq!(taken.id, 3);
        assert_eq!(g.focused_window().map(|w| w.id), Some(2));

        g.remove_window(1);
        assert_eq!(g.focused_window().map(|w| w.id), Some(2));

        g.remove_window(2);
        assert!(g.focused_window().is_none());
    }

    #[test]
    fn layout_cycle_wraps() {
        let mut g = group();
        assert_eq!(g.layout(), Layout::MonadTall);
        g.next_layout();
        assert_eq!(g.layout(), Layout::Max);
        g.next_layout();
        g.next_layout();
        assert_eq!(g.layout(), Layout::MonadTall);
    }

    #[test]
    fn cycle_focus_skips_docks() {
        let mut g = group();
        g.add_window(window(1));
        let mut dock = window(2);
        dock.is_dock = true;
        g.add_window(dock);
        g.add_window(window(3));

        g.focus_id(1);
        assert_eq!(g.cycle_focus(true), Some(3));
        assert_eq!(g.cycle_focus(true), Some(1));
        assert_eq!(g.cycle_focus(false), Some(3));
    }

    #[test]
    fn shuffle_moves_focused_window_in_order() {
        let mut g = group();
        g.add_window(window(1));
        g.add_window(window(2));
        g.add_window(window(3));

        g.focus_id(1);
        g.shuffle_focused(true);
        let order: Vec<u64> = g.windows.iter().map(|w| w.id).collect();
        assert_eq!(order, vec![2, 1, 3]);
        assert_eq!(g.focused_window().map(|w| w.id), Some(1));
    }
}
