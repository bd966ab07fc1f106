use x11::xlib;

/// A client window and the state the manager tracks for it.
#[derive(Clone)]
pub struct Window {
    pub id: xlib::Window,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub class: Option<String>,
    pub is_floating: bool,
    pub is_dock: bool,
    pub is_fullscreen: bool,
    pub pre_float_x: i32,
    pub pre_float_y: i32,
    pub pre_float_width: u32,
    pub pre_float_height: u32,
    pub pre_fullscreen_x: i32,
    pub pre_fullscreen_y: i32,
    pub pre_fullscreen_width: u32,
    pub pre_fullscreen_height: u32,
}

impl Window {
    pub fn new(id: xlib::Window, x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            id,
            x,
            y,
            width,
            height,
            class: None,
            is_floating: false,
            is_dock: false,
            is_fullscreen: false,
            pre_float_x: 0,
            pre_float_y: 0,
            pre_float_width: 0,
            pre_float_height: 0,
            pre_fullscreen_x: 0,
            pre_fullscreen_y: 0,
            pre_fullscreen_width: 0,
            pre_fullscreen_height: 0,
        }
    }

    /// Whether the window takes part in the tiled layout.
    pub fn is_tiled(&self) -> bool {
        !self.is_floating && !self.is_dock && !self.is_fullscreen
    }
}
