pub mod core {
    pub mod group;
    pub mod navigation;
    pub mod screen;
    pub mod window;
    pub mod wm;
}

pub mod config {
    pub mod appearance;
    pub mod command;
    pub mod groups;
    pub mod keybind;
    pub mod loader;
    pub mod rules;
    pub mod widget;
}

pub mod ui {
    pub mod bar;
    pub mod cursor;
    pub mod status;
}

pub mod utils {
    pub mod spawn;
    pub mod x11;
}

pub mod layout;

pub use config::loader::Config;
pub use self::core::{window::Window, wm::WindowManager};
