use x11::{xinerama, xlib};

/// A physical output and the group it currently shows.
pub struct Screen {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub group: usize,
}

impl Screen {
    /// Query Xinerama for the connected monitors; screen `i` starts out
    /// showing group `i`. Falls back to a single screen spanning the whole
    /// display when Xinerama reports nothing.
    ///
    /// # Safety
    /// The display pointer must be valid and point to an active X display
    /// connection.
    pub unsafe fn detect(display: *mut xlib::Display) -> Vec<Self> {
        let mut count = 0;
        let monitors = xinerama::XineramaQueryScreens(display, &mut count);

        if !monitors.is_null() && count > 0 {
            let slice = std::slice::from_raw_parts(monitors, count as usize);
            let screens = slice
                .iter()
                .enumerate()
                .map(|(i, m)| Self {
                    x: m.x_org as i32,
                    y: m.y_org as i32,
                    width: m.width as u32,
                    height: m.height as u32,
                    group: i,
                })
                .collect();
            xlib::XFree(monitors as *mut _);
            return screens;
        }

        let screen = xlib::XDefaultScreen(display);
        vec![Self {
            x: 0,
            y: 0,
            width: xlib::XDisplayWidth(display, screen) as u32,
            height: xlib::XDisplayHeight(display, screen) as u32,
            group: 0,
        }]
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && x < self.x + self.width as i32
            && y >= self.y
            && y < self.y + self.height as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let s = Screen {
            x: 1920,
            y: 0,
            width: 1920,
            height: 1080,
            group: 1,
        };
        assert!(s.contains(1920, 0));
        assert!(s.contains(3839, 1079));
        assert!(!s.contains(1919, 500));
        assert!(!s.contains(3840, 500));
    }
}
