use anyhow::{anyhow, Result};
use std::{env, ffi::CString};
use x11::xlib;

pub struct Display {
    raw: *mut xlib::Display,
}

impl Display {
    pub fn new() -> Result<Self> {
        unsafe {
            xlib::XSetErrorHandler(Some(Self::error_handler));
        }

        let display_name = env::var("DISPLAY").unwrap_or_else(|_| String::from(":0"));
        let c_display_name =
            CString::new(display_name).map_err(|_| anyhow!("Invalid DISPLAY variable"))?;
        let raw = unsafe { xlib::XOpenDisplay(c_display_name.as_ptr()) };

        if raw.is_null() {
            return Err(anyhow!("Failed to open X display"));
        }

        Ok(Self { raw })
    }

    pub fn raw(&self) -> *mut xlib::Display {
        self.raw
    }

    /// File descriptor of the X connection, for polling.
    pub fn fd(&self) -> i32 {
        unsafe { xlib::XConnectionNumber(self.raw) }
    }

    unsafe extern "C" fn error_handler(
        display: *mut xlib::Display,
        e: *mut xlib::XErrorEvent,
    ) -> i32 {
        let mut error_text = [0i8; 1024];
        xlib::XGetErrorText(
            display,
            (*e).error_code as i32,
            error_text.as_mut_ptr(),
            error_text.len() as i32,
        );

        let error_msg = std::ffi::CStr::from_ptr(error_text.as_ptr())
            .to_string_lossy()
            .into_owned();

        log::error!(
            "X11 Error: {} (code: {}, resource id: {}, request code: {})",
            error_msg,
            (*e).error_code,
            (*e).resourceid,
            (*e).request_code
        );

        0
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        unsafe {
            xlib::XCloseDisplay(self.raw);
        }
    }
}

/// The atoms the manager interns once at startup.
pub struct Atoms {
    pub net_supported: xlib::Atom,
    pub net_active_window: xlib::Atom,
    pub net_current_desktop: xlib::Atom,
    pub net_number_of_desktops: xlib::Atom,
    pub net_desktop_names: xlib::Atom,
    pub net_wm_window_type: xlib::Atom,
    pub net_wm_window_type_dock: xlib::Atom,
    pub net_wm_window_type_dialog: xlib::Atom,
    pub net_wm_window_type_utility: xlib::Atom,
    pub net_wm_window_type_splash: xlib::Atom,
    pub net_wm_window_type_notification: xlib::Atom,
    pub wm_protocols: xlib::Atom,
    pub wm_delete_window: xlib::Atom,
    pub utf8_string: xlib::Atom,
}

impl Atoms {
    /// # Safety
    /// The display pointer must be valid and point to an active X display
    /// connection.
    pub unsafe fn intern(display: *mut xlib::Display) -> Self {
        let intern = |name: &std::ffi::CStr| xlib::XInternAtom(display, name.as_ptr(), 0);

        Self {
            net_supported: intern(c"_NET_SUPPORTED"),
            net_active_window: intern(c"_NET_ACTIVE_WINDOW"),
            net_current_desktop: intern(c"_NET_CURRENT_DESKTOP"),
            net_number_of_desktops: intern(c"_NET_NUMBER_OF_DESKTOPS"),
            net_desktop_names: intern(c"_NET_DESKTOP_NAMES"),
            net_wm_window_type: intern(c"_NET_WM_WINDOW_TYPE"),
            net_wm_window_type_dock: intern(c"_NET_WM_WINDOW_TYPE_DOCK"),
            net_wm_window_type_dialog: intern(c"_NET_WM_WINDOW_TYPE_DIALOG"),
            net_wm_window_type_utility: intern(c"_NET_WM_WINDOW_TYPE_UTILITY"),
            net_wm_window_type_splash: intern(c"_NET_WM_WINDOW_TYPE_SPLASH"),
            net_wm_window_type_notification: intern(c"_NET_WM_WINDOW_TYPE_NOTIFICATION"),
            wm_protocols: intern(c"WM_PROTOCOLS"),
            wm_delete_window: intern(c"WM_DELETE_WINDOW"),
            utf8_string: intern(c"UTF8_STRING"),
        }
    }
}

/// Read the WM_CLASS class component of a window.
///
/// # Safety
/// The display pointer must be valid; `window` need not exist (the call
/// fails cleanly for destroyed windows).
pub unsafe fn window_class(display: *mut xlib::Display, window: xlib::Window) -> Option<String> {
    let mut hint: xlib::XClassHint = std::mem::zeroed();
    if xlib::XGetClassHint(display, window, &mut hint) == 0 {
        return None;
    }

    let class = if hint.res_class.is_null() {
        None
    } else {
        Some(
            std::ffi::CStr::from_ptr(hint.res_class)
                .to_string_lossy()
                .into_owned(),
        )
    };

    if !hint.res_name.is_null() {
        xlib::XFree(hint.res_name as *mut _);
    }
    if !hint.res_class.is_null() {
        xlib::XFree(hint.res_class as *mut _);
    }

    class
}

/// Read the WM_NAME of a window.
///
/// # Safety
/// The display pointer must be valid.
pub unsafe fn window_title(display: *mut xlib::Display, window: xlib::Window) -> Option<String> {
    let mut name: *mut i8 = std::ptr::null_mut();
    if xlib::XFetchName(display, window, &mut name) == 0 || name.is_null() {
        return None;
    }

    let title = std::ffi::CStr::from_ptr(name).to_string_lossy().into_owned();
    xlib::XFree(name as *mut _);
    Some(title)
}

/// First _NET_WM_WINDOW_TYPE atom of a window, if it has one.
///
/// # Safety
/// The display pointer must be valid.
pub unsafe fn window_type(
    display: *mut xlib::Display,
    window: xlib::Window,
    atoms: &Atoms,
) -> Option<xlib::Atom> {
    let mut actual_type: xlib::Atom = 0;
    let mut actual_format: i32 = 0;
    let mut nitems: u64 = 0;
    let mut bytes_after: u64 = 0;
    let mut prop: *mut u8 = std::ptr::null_mut();

    let status = xlib::XGetWindowProperty(
        display,
        window,
        atoms.net_wm_window_type,
        0,
        1,
        0,
        xlib::XA_ATOM,
        &mut actual_type,
        &mut actual_format,
        &mut nitems,
        &mut bytes_after,
        &mut prop,
    );

    if status == 0 && !prop.is_null() && nitems > 0 {
        let atom = *(prop as *const xlib::Atom);
        xlib::XFree(prop as *mut _);
        Some(atom)
    } else {
        None
    }
}
