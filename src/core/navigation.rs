//! Group and screen navigation helpers.
//!
//! Every helper takes the live window-manager state through the [`NavHandle`]
//! trait and issues at most one mutation back through it. The helpers keep no
//! state of their own, which is what makes them testable against the mock
//! handle below without an X connection.

use thiserror::Error;

/// Errors surfaced by the navigation helpers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavError {
    /// A computed group index fell outside the group list.
    #[error("group index {index} out of range (have {count})")]
    GroupOutOfRange { index: usize, count: usize },
}

/// Window-manager state as seen by the navigation helpers.
///
/// Implemented by [`WindowManager`](crate::core::wm::WindowManager); tests
/// substitute a recording mock.
pub trait NavHandle {
    /// Number of groups, in configuration order.
    fn group_count(&self) -> usize;

    /// Number of screens, in Xinerama order.
    fn screen_count(&self) -> usize;

    /// Index of the group shown on the current screen.
    fn current_group(&self) -> usize;

    /// Index of the screen that currently has focus.
    fn current_screen(&self) -> usize;

    /// Index of the group bound to `screen`.
    fn screen_group(&self, screen: usize) -> usize;

    /// Whether any window currently has input focus.
    fn has_focused_window(&self) -> bool;

    /// Move the focused window to `group`.
    fn move_focused_to_group(&mut self, group: usize);

    /// Bind `group` to `screen`, replacing whatever it was showing.
    fn bind_group(&mut self, screen: usize, group: usize);
}

/// Move the focused window to the group before the current one.
///
/// Wraps from the first group to the last. Does nothing when no window is
/// focused.
pub fn window_to_prev_group<H: NavHandle>(handle: &mut H) -> Result<(), NavError> {
    if !handle.has_focused_window() {
        return Ok(());
    }

    let count = handle.group_count();
    if count == 0 {
        return Ok(());
    }

    // Wraparound from the first group to the last is part of the contract.
    let target = (handle.current_group() + count - 1) % count;
    handle.move_focused_to_group(target);
    Ok(())
}

/// Move the focused window to the group after the current one.
///
/// Unlike [`window_to_prev_group`] this does not wrap: on the last group the
/// move is rejected with [`NavError::GroupOutOfRange`]. The asymmetry is
/// pinned by tests; callers are expected to log the error and carry on.
pub fn window_to_next_group<H: NavHandle>(handle: &mut H) -> Result<(), NavError> {
    if !handle.has_focused_window() {
        return Ok(());
    }

    let count = handle.group_count();
    if count == 0 {
        return Ok(());
    }

    let target = handle.current_group() + 1;
    if target >= count {
        return Err(NavError::GroupOutOfRange {
            index: target,
            count,
        });
    }

    handle.move_focused_to_group(target);
    Ok(())
}

/// Move the focused window to the group shown on the previous screen.
///
/// Does nothing on the first screen or when no window is focused.
pub fn window_to_prev_screen<H: NavHandle>(handle: &mut H) {
    if !handle.has_focused_window() {
        return;
    }

    let screen = handle.current_screen();
    if screen != 0 {
        let group = handle.screen_group(screen - 1);
        handle.move_focused_to_group(group);
    }
}

/// Move the focused window to the group shown on the next screen.
///
/// Does nothing on the last screen or when no window is focused.
pub fn window_to_next_screen<H: NavHandle>(handle: &mut H) {
    if !handle.has_focused_window() {
        return;
    }

    let screen = handle.current_screen();
    if screen + 1 != handle.screen_count() {
        let group = handle.screen_group(screen + 1);
        handle.move_focused_to_group(group);
    }
}

/// Rebind the current screen to the group shown on the previous screen.
///
/// This is a one-directional reassignment: the helper issues a single bind
/// for the current screen and never touches the previous screen's binding.
/// On the first screen "previous" wraps to the last screen. The runtime's
/// bind operation is responsible for resolving the resulting collision (see
/// `WindowManager::set_screen_group`).
pub fn pull_prev_screen_group<H: NavHandle>(handle: &mut H) {
    let count = handle.screen_count();
    if count == 0 {
        return;
    }

    let screen = handle.current_screen();
    let group = handle.screen_group((screen + count - 1) % count);
    handle.bind_group(screen, group);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Record-keeping mock over a fixed set of groups and screens.
    struct MockHandle {
        group_count: usize,
        screen_groups: Vec<usize>,
        current_screen: usize,
        focused: bool,
        moves: Vec<usize>,
        binds: Vec<(usize, usize)>,
    }

    impl MockHandle {
        /// Three screens showing groups 0..3 of `group_count` groups.
        fn new(group_count: usize) -> Self {
            Self {
                group_count,
                screen_groups: vec![0, 1, 2],
                current_screen: 0,
                focused: true,
                moves: Vec::new(),
                binds: Vec::new(),
            }
        }

        fn on_screen(mut self, screen: usize) -> Self {
            self.current_screen = screen;
            self
        }

        fn showing(mut self, screen: usize, group: usize) -> Self {
            self.screen_groups[screen] = group;
            self
        }

        fn unfocused(mut self) -> Self {
            self.focused = false;
            self
        }
    }

    impl NavHandle for MockHandle {
        fn group_count(&self) -> usize {
            self.group_count
        }

        fn screen_count(&self) -> usize {
            self.screen_groups.len()
        }

        fn current_group(&self) -> usize {
            self.screen_groups[self.current_screen]
        }

        fn current_screen(&self) -> usize {
            self.current_screen
        }

        fn screen_group(&self, screen: usize) -> usize {
            self.screen_groups[screen]
        }

        fn has_focused_window(&self) -> bool {
            self.focused
        }

        fn move_focused_to_group(&mut self, group: usize) {
            self.moves.push(group);
        }

        fn bind_group(&mut self, screen: usize, group: usize) {
            self.binds.push((screen, group));
            self.screen_groups[screen] = group;
        }
    }

    #[test]
    fn prev_group_moves_one_group_back() {
        let mut h = MockHandle::new(10).showing(0, 4);
        window_to_prev_group(&mut h).unwrap();
        assert_eq!(h.moves, vec![3]);
    }

    #[test]
    fn prev_group_wraps_from_first_to_last() {
        // Groups work/main/mail: on "work" the window lands on "mail".
        let mut h = MockHandle::new(3);
        window_to_prev_group(&mut h).unwrap();
        assert_eq!(h.moves, vec![2]);
    }

    #[test]
    fn next_group_moves_one_group_forward() {
        let mut h = MockHandle::new(10).showing(0, 4);
        window_to_next_group(&mut h).unwrap();
        assert_eq!(h.moves, vec![5]);
    }

    #[test]
    fn next_group_on_last_group_is_rejected() {
        // Groups work/main/mail: on "mail" the move is an error, not a wrap.
        let mut h = MockHandle::new(3).showing(0, 2);
        let err = window_to_next_group(&mut h).unwrap_err();
        assert_eq!(err, NavError::GroupOutOfRange { index: 3, count: 3 });
        assert!(h.moves.is_empty(), "rejected move must not touch the handle");
    }

    #[test]
    fn next_group_inside_range_never_errors() {
        for start in 0..9 {
            let mut h = MockHandle::new(10).showing(0, start);
            window_to_next_group(&mut h).unwrap();
            assert_eq!(h.moves, vec![start + 1]);
        }
    }

    #[test]
    fn group_moves_without_focus_are_noops() {
        let mut h = MockHandle::new(10).unfocused();
        window_to_prev_group(&mut h).unwrap();
        window_to_next_group(&mut h).unwrap();
        window_to_prev_screen(&mut h);
        window_to_next_screen(&mut h);
        assert!(h.moves.is_empty());
        assert!(h.binds.is_empty());
    }

    #[test]
    fn prev_screen_on_first_screen_is_noop() {
        let mut h = MockHandle::new(10).on_screen(0);
        window_to_prev_screen(&mut h);
        assert!(h.moves.is_empty());
    }

    #[test]
    fn prev_screen_moves_to_prev_screens_group() {
        let mut h = MockHandle::new(10).on_screen(2).showing(1, 7);
        window_to_prev_screen(&mut h);
        assert_eq!(h.moves, vec![7]);
    }

    #[test]
    fn next_screen_on_last_screen_is_noop() {
        let mut h = MockHandle::new(10).on_screen(2);
        window_to_next_screen(&mut h);
        assert!(h.moves.is_empty());
    }

    #[test]
    fn next_screen_moves_to_next_screens_group() {
        let mut h = MockHandle::new(10).on_screen(0).showing(1, 5);
        window_to_next_screen(&mut h);
        assert_eq!(h.moves, vec![5]);
    }

    #[test]
    fn pull_rebinds_only_the_current_screen() {
        // On screen 1 of three: screen 1 takes screen 0's group, screen 0
        // keeps its own binding.
        let mut h = MockHandle::new(10).on_screen(1);
        pull_prev_screen_group(&mut h);
        assert_eq!(h.binds, vec![(1, 0)]);
        assert_eq!(h.screen_groups, vec![0, 0, 2]);
    }

    #[test]
    fn pull_wraps_on_first_screen() {
        let mut h = MockHandle::new(10).on_screen(0);
        pull_prev_screen_group(&mut h);
        assert_eq!(h.binds, vec![(0, 2)]);
    }

    #[test]
    fn pull_does_not_require_a_focused_window() {
        let mut h = MockHandle::new(10).on_screen(1).unfocused();
        pull_prev_screen_group(&mut h);
        assert_eq!(h.binds, vec![(1, 0)]);
    }
}
