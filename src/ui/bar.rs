use x11::xlib;

use crate::config::appearance::{parse_color, BarConfig};
use crate::config::widget::Widget;
use crate::ui::status::StatusSampler;

/// Per-draw state handed over by the window manager.
pub struct BarSnapshot {
    pub group_names: Vec<String>,
    pub occupied: Vec<bool>,
    pub current_group: usize,
    pub layout_name: &'static str,
    pub window_title: String,
}

/// One status bar, drawn across the top of a single screen.
pub struct StatusBar {
    display: *mut xlib::Display,
    pub window: xlib::Window,
    width: u32,
    height: u32,
    gc: xlib::GC,
    font: *mut xlib::XFontStruct,
    config: BarConfig,
    widgets: Vec<Widget>,
    sampler: StatusSampler,
    group_cells: Vec<(i32, i32)>,
}

impl StatusBar {
    /// Creates and maps the bar window for one screen.
    ///
    /// # Safety
    /// - The display pointer must be valid and point to an active X display
    ///   connection.
    /// - The root window must be a valid window ID for the given display.
    pub unsafe fn new(
        display: *mut xlib::Display,
        root: xlib::Window,
        x: i32,
        y: i32,
        width: u32,
        config: BarConfig,
        widgets: Vec<Widget>,
    ) -> Self {
        let height = config.height;
        let black = xlib::XBlackPixel(display, xlib::XDefaultScreen(display));

        let window = xlib::XCreateSimpleWindow(
            display,
            root,
            x,
            y,
            width,
            height,
            0,
            black,
            config.background_pixel(),
        );

        let mut wa: xlib::XSetWindowAttributes = std::mem::zeroed();
        wa.override_redirect = 1;
        wa.background_pixel = config.background_pixel();
        wa.event_mask = xlib::ExposureMask | xlib::ButtonPressMask;
        xlib::XChangeWindowAttributes(
            display,
            window,
            xlib::CWOverrideRedirect | xlib::CWBackPixel | xlib::CWEventMask,
            &mut wa,
        );

        let gc = xlib::XCreateGC(display, window, 0, std::ptr::null_mut());
        xlib::XSetForeground(display, gc, config.foreground_pixel());

        let font_name = std::ffi::CString::new(config.font.clone())
            .unwrap_or_else(|_| std::ffi::CString::new("fixed").unwrap());
        let mut font = xlib::XLoadQueryFont(display, font_name.as_ptr());
        if font.is_null() {
            font = xlib::XLoadQueryFont(display, c"fixed".as_ptr());
        }
        if !font.is_null() {
            xlib::XSetFont(display, gc, (*font).fid);
        }

        if config.enabled {
            xlib::XMapWindow(display, window);
            xlib::XRaiseWindow(display, window);
        }

        Self {
            display,
            window,
            width,
            height,
            gc,
            font,
            config,
            widgets,
            sampler: StatusSampler::new(),
            group_cells: Vec::new(),
        }
    }

    /// The group whose cell covers bar-relative `x`, if any.
    pub fn group_at(&self, x: i32) -> Option<usize> {
        self.group_cells
            .iter()
            .position(|&(start, end)| x >= start && x < end)
    }

    pub unsafe fn draw(&mut self, snap: &BarSnapshot) {
        if !self.config.enabled {
            xlib::XUnmapWindow(self.display, self.window);
            return;
        }

        xlib::XMapWindow(self.display, self.window);
        xlib::XRaiseWindow(self.display, self.window);
        xlib::XClearWindow(self.display, self.window);
        self.group_cells.clear();

        // Everything after the stretching window title is right-aligned, so
        // its total width has to be known before drawing starts.
        let stretch_at = self
            .widgets
            .iter()
            .position(|w| matches!(w, Widget::WindowTitle { .. }));

        let widgets = std::mem::take(&mut self.widgets);
        let rendered: Vec<Option<(String, u64)>> = widgets
            .iter()
            .map(|w| self.render_status(w, snap))
            .collect();

        let right_width: i32 = match stretch_at {
            Some(idx) => widgets
                .iter()
                .zip(&rendered)
                .skip(idx + 1)
                .map(|(w, r)| self.widget_width(w, r))
                .sum(),
            None => 0,
        };

        let mut x: i32 = 0;
        for (i, widget) in widgets.iter().enumerate() {
            match widget {
                Widget::Sep { padding } => x += *padding as i32,
                Widget::GroupBox {
                    active,
                    inactive,
                    highlight,
                } => {
                    x = self.draw_groupbox(x, snap, active, inactive, highlight);
                }
                Widget::WindowTitle { foreground } => {
                    let avail = self.width as i32 - right_width - x - 8;
                    let color = self.fg(foreground.as_deref());
                    x += self.draw_clipped(x + 4, avail, color, &snap.window_title) + 8;
                    x = x.max(self.width as i32 - right_width);
                }
                _ => {
                    if let Some((text, color)) = &rendered[i] {
                        x += self.draw_text(x + 2, *color, text) + 4;
                    }
                }
            }
        }

        self.widgets = widgets;
    }

    /// Text and color for the plain status widgets; `None` for widgets with
    /// their own drawing.
    fn render_status(&mut self, widget: &Widget, snap: &BarSnapshot) -> Option<(String, u64)> {
        match widget {
            Widget::Text { text, foreground } => {
                Some((text.clone(), self.fg(foreground.as_deref())))
            }
            Widget::LayoutName { foreground } => Some((
                snap.layout_name.to_string(),
                self.fg(foreground.as_deref()),
            )),
            Widget::Cpu { foreground } => {
                Some((self.sampler.cpu_text(), self.fg(foreground.as_deref())))
            }
            Widget::Memory { foreground } => {
                Some((self.sampler.memory_text(), self.fg(foreground.as_deref())))
            }
            Widget::Net {
                interface,
                foreground,
            } => Some((
                self.sampler.net_text(interface),
                self.fg(foreground.as_deref()),
            )),
            Widget::Volume { foreground } => {
                Some((self.sampler.volume_text(), self.fg(foreground.as_deref())))
            }
            Widget::Clock { format, foreground } => Some((
                self.sampler.clock_text(format),
                self.fg(foreground.as_deref()),
            )),
            Widget::Sep { .. } | Widget::GroupBox { .. } | Widget::WindowTitle { .. } => None,
        }
    }

    fn widget_width(&self, widget: &Widget, rendered: &Option<(String, u64)>) -> i32 {
        match widget {
            Widget::Sep { padding } => *padding as i32,
            _ => match rendered {
                Some((text, _)) => unsafe { self.text_width(text) + 4 },
                None => 0,
            },
        }
    }

    unsafe fn draw_groupbox(
        &mut self,
        mut x: i32,
        snap: &BarSnapshot,
        active: &str,
        inactive: &str,
        highlight: &str,
    ) -> i32 {
        let active = parse_color(active, 0xC678DD);
        let inactive = parse_color(inactive, 0x51AFEF);
        let highlight = parse_color(highlight, 0x1C1F24);

        for (i, name) in snap.group_names.iter().enumerate() {
            let text_width = self.text_width(name);
            let cell_width = text_width + 10;

            if i == snap.current_group {
                xlib::XSetForeground(self.display, self.gc, highlight);
                xlib::XFillRectangle(
                    self.display,
                    self.window,
                    self.gc,
                    x,
                    0,
                    cell_width as u32,
                    self.height,
                );
                // Underline the visible group.
                xlib::XSetForeground(self.display, self.gc, active);
                xlib::XFillRectangle(
                    self.display,
                    self.window,
                    self.gc,
                    x,
                    self.height as i32 - 2,
                    cell_width as u32,
                    2,
                );
            }

            let color = if i == snap.current_group || snap.occupied.get(i).copied().unwrap_or(false)
            {
                active
            } else {
                inactive
            };
            self.draw_text_at(x + 5, color, name);

            self.group_cells.push((x, x + cell_width));
            x += cell_width;
        }

        x
    }

    /// Draw `text` at `x`, returning its width.
    unsafe fn draw_text(&self, x: i32, color: u64, text: &str) -> i32 {
        self.draw_text_at(x, color, text)
    }

    /// Draw `text` clipped to `avail` pixels, returning the drawn width.
    unsafe fn draw_clipped(&self, x: i32, avail: i32, color: u64, text: &str) -> i32 {
        if avail <= 0 {
            return 0;
        }

        let mut clipped: &str = text;
        while !clipped.is_empty() && self.text_width(clipped) > avail {
            let mut end = clipped.len() - 1;
            while end > 0 && !clipped.is_char_boundary(end) {
                end -= 1;
            }
            clipped = &clipped[..end];
        }

        self.draw_text_at(x, color, clipped)
    }

    unsafe fn draw_text_at(&self, x: i32, color: u64, text: &str) -> i32 {
        if text.is_empty() {
            return 0;
        }

        xlib::XSetForeground(self.display, self.gc, color);
        xlib::XDrawString(
            self.display,
            self.window,
            self.gc,
            x,
            self.baseline(),
            text.as_ptr() as *const _,
            text.len() as i32,
        );
        self.text_width(text)
    }

    unsafe fn text_width(&self, text: &str) -> i32 {
        if self.font.is_null() {
            return text.len() as i32 * 6;
        }
        xlib::XTextWidth(self.font, text.as_ptr() as *const _, text.len() as i32)
    }

    fn baseline(&self) -> i32 {
        let ascent = if self.font.is_null() {
            10
        } else {
            unsafe { (*self.font).ascent }
        };
        (self.height as i32 + ascent) / 2
    }

    fn fg(&self, foreground: Option<&str>) -> u64 {
        match foreground {
            Some(color) => parse_color(color, self.config.foreground_pixel()),
            None => self.config.foreground_pixel(),
        }
    }
}

impl Drop for StatusBar {
    fn drop(&mut self) {
        unsafe {
            if !self.font.is_null() {
                xlib::XFreeFont(self.display, self.font);
            }
            xlib::XFreeGC(self.display, self.gc);
            xlib::XDestroyWindow(self.display, self.window);
        }
    }
}
