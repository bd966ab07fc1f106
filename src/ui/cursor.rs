use anyhow::Result;
use x11::xlib;

// Core font cursor shapes (X11/cursorfont.h).
const XC_LEFT_PTR: u32 = 68;
const XC_FLEUR: u32 = 52;
const XC_SIZING: u32 = 120;

pub struct Cursor {
    normal: xlib::Cursor,
    moving: xlib::Cursor,
    resizing: xlib::Cursor,
    display: *mut xlib::Display,
}

impl Cursor {
    /// Creates the cursor set for the given X display.
    ///
    /// # Safety
    /// The display pointer must be valid and point to an active X display
    /// connection which outlives the cursor set.
    pub unsafe fn new(display: *mut xlib::Display) -> Result<Self> {
        Ok(Self {
            normal: xlib::XCreateFontCursor(display, XC_LEFT_PTR),
            moving: xlib::XCreateFontCursor(display, XC_FLEUR),
            resizing: xlib::XCreateFontCursor(display, XC_SIZING),
            display,
        })
    }

    pub fn normal(&self) -> xlib::Cursor {
        self.normal
    }

    pub fn moving(&self) -> xlib::Cursor {
        self.moving
    }

    pub fn resizing(&self) -> xlib::Cursor {
        self.resizing
    }
}

impl Drop for Cursor {
    fn drop(&mut self) {
        unsafe {
            xlib::XFreeCursor(self.display, self.normal);
            xlib::XFreeCursor(self.display, self.moving);
            xlib::XFreeCursor(self.display, self.resizing);
        }
    }
}
