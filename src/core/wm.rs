use anyhow::Result;
use log::{debug, error, info, warn};
use std::time::{Duration, Instant};
use x11::xlib;

use crate::{
    config::{command::Command, keybind},
    core::{
        group::Group,
        navigation::{self, NavHandle},
        screen::Screen,
        window::Window,
    },
    layout::{self, Rect},
    ui::{
        bar::{BarSnapshot, StatusBar},
        cursor::Cursor,
    },
    utils::{
        spawn::spawn,
        x11::{self as x, Atoms, Display},
    },
    Config,
};

pub struct WindowManager {
    display: Display,
    root: xlib::Window,
    running: bool,
    config: Config,
    cursor: Cursor,
    atoms: Atoms,
    groups: Vec<Group>,
    screens: Vec<Screen>,
    current_screen: usize,
    bars: Vec<StatusBar>,
    scratchpad_window: Option<xlib::Window>,
    scratchpad_visible: bool,
    dragging: bool,
    drag_start_x: i32,
    drag_start_y: i32,
    drag_origin: (i32, i32),
    dragged_window: Option<xlib::Window>,
    resizing: bool,
    resize_start: (u32, u32),
    resized_window: Option<xlib::Window>,
}

impl WindowManager {
    pub fn new() -> Result<Self> {
        info!("Initializing window manager");

        // Spawned programs are fire-and-forget; never leave zombies behind.
        unsafe {
            libc::signal(libc::SIGCHLD, libc::SIG_IGN);
        }

        let display = Display::new()?;
        let root = unsafe { xlib::XDefaultRootWindow(display.raw()) };
        let cursor = unsafe { Cursor::new(display.raw())? };
        let atoms = unsafe { Atoms::intern(display.raw()) };

        let config = Config::load().unwrap_or_else(|e| {
            warn!("Failed to load config, using default configuration: {}", e);
            Config::default()
        });

        let groups: Vec<Group> = config
            .groups
            .iter()
            .map(|g| Group::new(&g.name, config.layouts.clone(), g.layout))
            .collect();

        let mut screens = unsafe { Screen::detect(display.raw()) };
        for (i, screen) in screens.iter_mut().enumerate() {
            screen.group = i % groups.len().max(1);
        }
        info!("{} screens, {} groups", screens.len(), groups.len());

        let bars = if config.appearance.bar.enabled {
            screens
                .iter()
                .map(|s| unsafe {
                    StatusBar::new(
                        display.raw(),
                        root,
                        s.x,
                        s.y,
                        s.width,
                        config.appearance.bar.clone(),
                        config.widgets.clone(),
                    )
                })
                .collect()
        } else {
            Vec::new()
        };

        let mut wm = Self {
            display,
            root,
            running: true,
            config,
            cursor,
            atoms,
            groups,
            screens,
            current_screen: 0,
            bars,
            scratchpad_window: None,
            scratchpad_visible: false,
            dragging: false,
            drag_start_x: 0,
            drag_start_y: 0,
            drag_origin: (0, 0),
            dragged_window: None,
            resizing: false,
            resize_start: (0, 0),
            resized_window: None,
        };

        unsafe {
            xlib::XDefineCursor(wm.display.raw(), root, wm.cursor.normal());
            wm.setup_ewmh();
            wm.grab_keys();

            xlib::XSelectInput(
                wm.display.raw(),
                root,
                xlib::SubstructureRedirectMask
                    | xlib::SubstructureNotifyMask
                    | xlib::PointerMotionMask,
            );
            xlib::XSync(wm.display.raw(), 0);
        }

        wm.run_autostart();

        Ok(wm)
    }

    pub fn run(&mut self) -> Result<()> {
        let fd = self.display.fd();
        let mut last_tick = Instant::now();
        self.redraw_bars();

        while self.running {
            unsafe {
                while xlib::XPending(self.display.raw()) > 0 {
                    let mut event: xlib::XEvent = std::mem::zeroed();
                    xlib::XNextEvent(self.display.raw(), &mut event);
                    self.handle_event(event);
                    if !self.running {
                        return Ok(());
                    }
                }
            }

            let mut pollfd = libc::pollfd {
                fd,
                events: libc::POLLIN,
                revents: 0,
            };
            unsafe {
                libc::poll(&mut pollfd, 1, 1000);
            }

            if last_tick.elapsed() >= Duration::from_secs(1) {
                self.redraw_bars();
                last_tick = Instant::now();
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: xlib::XEvent) {
        match event.get_type() {
            xlib::KeyPress => self.handle_keypress(event),
            xlib::MapRequest => self.handle_map_request(event),
            xlib::UnmapNotify => self.handle_unmap_notify(event),
            xlib::DestroyNotify => self.handle_destroy_notify(event),
            xlib::MotionNotify => self.handle_motion_notify(event),
            xlib::ButtonPress => {
                let button_event: xlib::XButtonEvent = From::from(event);
                self.handle_button_press(button_event);
            }
            xlib::ButtonRelease => {
                if self.dragging {
                    self.end_window_drag();
                } else if self.resizing {
                    self.end_window_resize();
                }
            }
            xlib::EnterNotify => self.handle_enter_notify(event),
            xlib::Expose => {
                let expose_event: xlib::XExposeEvent = From::from(event);
                if expose_event.count == 0 {
                    self.redraw_bars();
                }
            }
            xlib::ClientMessage => self.handle_client_message(event),
            _ => (),
        }
    }

    //  Keys and commands

    unsafe fn grab_keys(&self) {
        let dpy = self.display.raw();
        xlib::XUngrabKey(dpy, xlib::AnyKey as i32, xlib::AnyModifier, self.root);

        for bind in &self.config.binds {
            let keysym = keybind::keysym_for_key(&bind.key);
            if keysym == 0 {
                warn!("Unknown key {:?} in bind, skipping", bind.key);
                continue;
            }

            let keycode = xlib::XKeysymToKeycode(dpy, keysym);
            let mask = bind.mask(&self.config.modifier);

            // Grab the lock-mask variants too so NumLock does not disable
            // every binding.
            for extra in [0, xlib::LockMask, xlib::Mod2Mask, xlib::LockMask | xlib::Mod2Mask] {
                xlib::XGrabKey(
                    dpy,
                    keycode as i32,
                    mask | extra,
                    self.root,
                    1,
                    xlib::GrabModeAsync,
                    xlib::GrabModeAsync,
                );
            }
        }

        xlib::XSync(dpy, 0);
    }

    fn handle_keypress(&mut self, event: xlib::XEvent) {
        let key_event: xlib::XKeyEvent = From::from(event);
        let dpy = self.display.raw();

        let binds = self.config.binds.clone();
        for bind in &binds {
            let keysym = keybind::keysym_for_key(&bind.key);
            if keysym == 0 {
                continue;
            }
            let keycode = unsafe { xlib::XKeysymToKeycode(dpy, keysym) };

            if key_event.keycode as u8 == keycode
                && keybind::clean_mask(key_event.state) == bind.mask(&self.config.modifier)
            {
                self.dispatch(bind.command.clone());
            }
        }
    }

    fn dispatch(&mut self, command: Command) {
        debug!("dispatch {:?}", command);
        match command {
            Command::Exit => {
                info!("Exit requested");
                self.running = false;
            }
            Command::Reload => self.reload_config(),
            Command::Close => self.close_focused_window(),
            Command::Spawn(cmd) => {
                if let Err(e) = spawn(&cmd) {
                    warn!("{}", e);
                }
            }
            Command::Group(idx) => self.set_screen_group(self.current_screen, idx),
            Command::MoveToGroup(idx) => self.send_focused_to_group(idx),
            Command::NextLayout => self.next_layout(),
            Command::ToggleFloat => self.toggle_float(),
            Command::ToggleFullscreen => self.toggle_fullscreen(),
            Command::FocusScreen(idx) => self.focus_screen(idx),
            Command::NextScreen => {
                self.focus_screen((self.current_screen + 1) % self.screens.len())
            }
            Command::PrevScreen => self.focus_screen(
                (self.current_screen + self.screens.len() - 1) % self.screens.len(),
            ),
            Command::FocusNext => self.cycle_focus(true),
            Command::FocusPrev => self.cycle_focus(false),
            Command::ShuffleNext => self.shuffle_focused(true),
            Command::ShufflePrev => self.shuffle_focused(false),
            Command::GrowMaster => self.adjust_master(0.05),
            Command::ShrinkMaster => self.adjust_master(-0.05),
            Command::ResetMaster => self.adjust_master(0.0),
            Command::MoveToPrevGroup => {
                if let Err(e) = navigation::window_to_prev_group(self) {
                    error!("movetoprevgroup: {}", e);
                }
            }
            Command::MoveToNextGroup => {
                if let Err(e) = navigation::window_to_next_group(self) {
                    error!("movetonextgroup: {}", e);
                }
            }
            Command::MoveToPrevScreen => navigation::window_to_prev_screen(self),
            Command::MoveToNextScreen => navigation::window_to_next_screen(self),
            Command::SwapScreens => navigation::pull_prev_screen_group(self),
            Command::Scratchpad => self.toggle_scratchpad(),
        }
    }

    fn reload_config(&mut self) {
        match Config::load() {
            Ok(new_config) => {
                info!("Reloading configuration");
                self.config = new_config;
                unsafe {
                    self.grab_keys();
                }

                self.bars.clear();
                if self.config.appearance.bar.enabled {
                    let dpy = self.display.raw();
                    for s in &self.screens {
                        self.bars.push(unsafe {
                            StatusBar::new(
                                dpy,
                                self.root,
                                s.x,
                                s.y,
                                s.width,
                                self.config.appearance.bar.clone(),
                                self.config.widgets.clone(),
                            )
                        });
                    }
                }

                for screen in 0..self.screens.len() {
                    self.relayout_screen(screen);
                }
                self.refresh_borders();
                self.redraw_bars();
            }
            Err(e) => error!("Failed to reload config: {}", e),
        }
    }

    //  Groups and screens

    fn current_group_index(&self) -> usize {
        self.screens[self.current_screen].group
    }

    /// Screen showing `group`, if any.
    fn screen_of_group(&self, group: usize) -> Option<usize> {
        self.screens.iter().position(|s| s.group == group)
    }

    fn locate_window(&self, window: xlib::Window) -> Option<(usize, usize)> {
        for (gi, group) in self.groups.iter().enumerate() {
            if let Some(wi) = group.windows.iter().position(|w| w.id == window) {
                return Some((gi, wi));
            }
        }
        None
    }

    /// Bind `group` to `screen`. When the group is already visible on another
    /// screen the two screens trade bindings, so the one-group-per-screen
    /// mapping stays total.
    fn set_screen_group(&mut self, screen: usize, group: usize) {
        if screen >= self.screens.len() || group >= self.groups.len() {
            debug!("Invalid group switch request: screen {} group {}", screen, group);
            return;
        }

        let old = self.screens[screen].group;
        if old == group {
            return;
        }

        info!(
            "Screen {} now shows group {:?}",
            screen, self.groups[group].name
        );

        // Focusing windows while groups shuffle around must not move screen
        // focus; the user stays where they were.
        let focused_screen = self.current_screen;

        if let Some(other) = self.screen_of_group(group) {
            self.screens[other].group = old;
            self.screens[screen].group = group;
            self.apply_screen(other);
        } else {
            self.screens[screen].group = group;
            self.hide_group(old);
        }

        self.apply_screen(screen);
        self.current_screen = focused_screen;
        self.update_current_desktop();
        self.redraw_bars();
    }

    /// Unmap every window of a group that just went off-screen.
    fn hide_group(&mut self, group: usize) {
        let dpy = self.display.raw();
        for window in &self.groups[group].windows {
            if !window.is_dock {
                unsafe {
                    xlib::XUnmapWindow(dpy, window.id);
                }
            }
        }
    }

    /// Map, lay out, and focus the group bound to `screen`.
    fn apply_screen(&mut self, screen: usize) {
        let dpy = self.display.raw();
        let group = self.screens[screen].group;

        let windows: Vec<(xlib::Window, bool, Rect)> = self.groups[group]
            .windows
            .iter()
            .map(|w| (w.id, w.is_floating, Rect::new(w.x, w.y, w.width, w.height)))
            .collect();

        for (id, floating, rect) in &windows {
            unsafe {
                xlib::XMapWindow(dpy, *id);
                if *floating {
                    xlib::XMoveResizeWindow(dpy, *id, rect.x, rect.y, rect.width, rect.height);
                }
            }
            self.grab_buttons(*id);
        }

        self.relayout_screen(screen);

        if let Some(id) = self.groups[group].focused_window().map(|w| w.id) {
            self.focus_window(id);
        }
    }

    fn relayout_screen(&mut self, screen: usize) {
        let Some(s) = self.screens.get(screen) else {
            return;
        };

        let bar_height = if self.config.appearance.bar.enabled {
            self.config.appearance.bar.height
        } else {
            0
        };
        let area = Rect::new(
            s.x,
            s.y + bar_height as i32,
            s.width,
            s.height.saturating_sub(bar_height),
        );
        let monitor = Rect::new(s.x, s.y, s.width, s.height);

        let group = s.group;
        let tiled = self.groups[group].tiled_ids();
        let rects = layout::arrange(
            self.groups[group].layout(),
            tiled.len(),
            area,
            self.config.appearance.gaps,
            self.config.appearance.border_width,
            self.groups[group].master_ratio,
        );

        let dpy = self.display.raw();
        for (id, rect) in tiled.iter().zip(rects) {
            if let Some(window) = self.groups[group].windows.iter_mut().find(|w| w.id == *id) {
                window.x = rect.x;
                window.y = rect.y;
                window.width = rect.width;
                window.height = rect.height;
            }
            unsafe {
                xlib::XMoveResizeWindow(dpy, *id, rect.x, rect.y, rect.width, rect.height);
            }
        }

        // Fullscreen windows cover the whole monitor, above the tiling.
        let fullscreen: Vec<xlib::Window> = self.groups[group]
            .windows
            .iter()
            .filter(|w| w.is_fullscreen)
            .map(|w| w.id)
            .collect();
        for id in fullscreen {
            unsafe {
                xlib::XMoveResizeWindow(dpy, id, monitor.x, monitor.y, monitor.width, monitor.height);
                xlib::XRaiseWindow(dpy, id);
            }
        }

        self.raise_floating_windows(group);
    }

    fn raise_floating_windows(&self, group: usize) {
        let dpy = self.display.raw();
        for window in &self.groups[group].windows {
            if window.is_floating && !window.is_dock {
                unsafe {
                    xlib::XRaiseWindow(dpy, window.id);
                }
            }
        }
        for window in &self.groups[group].windows {
            if window.is_dock {
                unsafe {
                    xlib::XRaiseWindow(dpy, window.id);
                }
            }
        }
    }

    fn focus_screen(&mut self, screen: usize) {
        if screen >= self.screens.len() || screen == self.current_screen {
            return;
        }

        info!("Focusing screen {}", screen);
        self.current_screen = screen;

        let group = self.current_group_index();
        match self.groups[group].focused_window().map(|w| w.id) {
            Some(id) => self.focus_window(id),
            None => self.clear_focus(),
        }

        self.update_current_desktop();
        self.redraw_bars();
    }

    /// Move the focused window of the current group to `target`.
    fn send_focused_to_group(&mut self, target: usize) {
        if target >= self.groups.len() {
            debug!("Invalid move-to-group request: {}", target);
            return;
        }

        let source = self.current_group_index();
        if source == target {
            return;
        }

        let Some(id) = self.groups[source]
            .focused_window()
            .filter(|w| !w.is_dock)
            .map(|w| w.id)
        else {
            return;
        };
        let Some(window) = self.groups[source].take_window(id) else {
            return;
        };

        info!(
            "Moving window {} to group {:?}",
            id, self.groups[target].name
        );
        self.groups[target].add_window(window);

        match self.screen_of_group(target) {
            Some(screen) => {
                self.relayout_screen(screen);
            }
            None => unsafe {
                xlib::XUnmapWindow(self.display.raw(), id);
            },
        }

        self.relayout_screen(self.current_screen);
        match self.groups[source].focused_window().map(|w| w.id) {
            Some(next) => self.focus_window(next),
            None => self.clear_focus(),
        }
        self.redraw_bars();
    }

    //  Focus

    fn focus_window(&mut self, window: xlib::Window) {
        if window == self.root {
            return;
        }

        let Some((group, _)) = self.locate_window(window) else {
            return;
        };

        // Crossing into a window on another screen moves screen focus there.
        if let Some(screen) = self.screen_of_group(group) {
            self.current_screen = screen;
        }

        self.groups[group].focus_id(window);

        let dpy = self.display.raw();
        let is_floating = unsafe {
            let mut floating = false;
            for w in &self.groups[group].windows {
                let border = if w.id == window {
                    self.config.appearance.focused_border_pixel()
                } else {
                    self.config.appearance.border_pixel()
                };
                xlib::XSetWindowBorder(dpy, w.id, border);
                if w.id == window {
                    floating = w.is_floating;
                }
            }

            xlib::XSetInputFocus(dpy, window, xlib::RevertToPointerRoot, xlib::CurrentTime);
            floating
        };

        if is_floating {
            unsafe {
                xlib::XRaiseWindow(dpy, window);
            }
        }

        self.set_active_window(window);
    }

    fn clear_focus(&self) {
        unsafe {
            xlib::XSetInputFocus(
                self.display.raw(),
                self.root,
                xlib::RevertToPointerRoot,
                xlib::CurrentTime,
            );
        }
    }

    fn refresh_borders(&self) {
        let dpy = self.display.raw();
        for group in &self.groups {
            let focused = group.focused_window().map(|w| w.id);
            for window in &group.windows {
                let border = if Some(window.id) == focused {
                    self.config.appearance.focused_border_pixel()
                } else {
                    self.config.appearance.border_pixel()
                };
                unsafe {
                    xlib::XSetWindowBorderWidth(dpy, window.id, self.config.appearance.border_width);
                    xlib::XSetWindowBorder(dpy, window.id, border);
                }
            }
        }
    }

    fn cycle_focus(&mut self, forward: bool) {
        let group = self.current_group_index();
        if let Some(id) = self.groups[group].cycle_focus(forward) {
            self.focus_window(id);
        }
    }

    fn shuffle_focused(&mut self, forward: bool) {
        let group = self.current_group_index();
        self.groups[group].shuffle_focused(forward);
        self.relayout_screen(self.current_screen);
    }

    fn next_layout(&mut self) {
        let group = self.current_group_index();
        self.groups[group].next_layout();
        info!(
            "Group {:?} layout: {}",
            self.groups[group].name,
            self.groups[group].layout().name()
        );
        self.relayout_screen(self.current_screen);
        self.redraw_bars();
    }

    /// `delta == 0.0` resets the master ratio.
    fn adjust_master(&mut self, delta: f32) {
        let group = self.current_group_index();
        let ratio = &mut self.groups[group].master_ratio;
        *ratio = if delta == 0.0 {
            0.5
        } else {
            (*ratio + delta).clamp(0.1, 0.9)
        };
        self.relayout_screen(self.current_screen);
    }

    //  Floating, fullscreen, scratchpad

    fn toggle_float(&mut self) {
        let group = self.current_group_index();
        let screen = &self.screens[self.current_screen];
        let (screen_x, screen_y) = (screen.x, screen.y);
        let (screen_w, screen_h) = (screen.width, screen.height);

        let floating = &self.config.appearance.floating;
        let (float_w, float_h) = (floating.width, floating.height);
        let center = floating.center_on_float;

        let dpy = self.display.raw();
        let Some(window) = self.groups[group].focused_window_mut() else {
            return;
        };
        if window.is_dock {
            return;
        }

        if window.is_floating {
            window.is_floating = false;
            window.x = window.pre_float_x;
            window.y = window.pre_float_y;
            window.width = window.pre_float_width;
            window.height = window.pre_float_height;
        } else {
            window.is_floating = true;
            window.pre_float_x = window.x;
            window.pre_float_y = window.y;
            window.pre_float_width = window.width;
            window.pre_float_height = window.height;

            if center {
                window.width = float_w.min(screen_w);
                window.height = float_h.min(screen_h);
                window.x = screen_x + ((screen_w - window.width) / 2) as i32;
                window.y = screen_y + ((screen_h - window.height) / 2) as i32;
            }

            unsafe {
                xlib::XMoveResizeWindow(
                    dpy,
                    window.id,
                    window.x,
                    window.y,
                    window.width,
                    window.height,
                );
                xlib::XRaiseWindow(dpy, window.id);
            }
        }

        self.relayout_screen(self.current_screen);
    }

    fn toggle_fullscreen(&mut self) {
        let group = self.current_group_index();
        let screen = &self.screens[self.current_screen];
        let monitor = Rect::new(screen.x, screen.y, screen.width, screen.height);
        let border_width = self.config.appearance.border_width;

        let dpy = self.display.raw();
        let Some(window) = self.groups[group].focused_window_mut() else {
            return;
        };
        if window.is_dock {
            return;
        }

        if window.is_fullscreen {
            window.is_fullscreen = false;
            window.x = window.pre_fullscreen_x;
            window.y = window.pre_fullscreen_y;
            window.width = window.pre_fullscreen_width;
            window.height = window.pre_fullscreen_height;
            unsafe {
                xlib::XSetWindowBorderWidth(dpy, window.id, border_width);
                xlib::XMoveResizeWindow(
                    dpy,
                    window.id,
                    window.x,
                    window.y,
                    window.width,
                    window.height,
                );
            }
        } else {
            window.is_fullscreen = true;
            window.pre_fullscreen_x = window.x;
            window.pre_fullscreen_y = window.y;
            window.pre_fullscreen_width = window.width;
            window.pre_fullscreen_height = window.height;
            unsafe {
                xlib::XSetWindowBorderWidth(dpy, window.id, 0);
            }
        }

        self.relayout_screen(self.current_screen);
    }

    fn toggle_scratchpad(&mut self) {
        let dpy = self.display.raw();
        match self.scratchpad_window {
            Some(window) if self.scratchpad_visible => {
                self.scratchpad_visible = false;
                unsafe {
                    xlib::XUnmapWindow(dpy, window);
                }
            }
            Some(window) => {
                self.scratchpad_visible = true;
                self.position_scratchpad(window);
                unsafe {
                    xlib::XMapWindow(dpy, window);
                    xlib::XRaiseWindow(dpy, window);
                    xlib::XSetInputFocus(dpy, window, xlib::RevertToPointerRoot, xlib::CurrentTime);
                }
            }
            None => {
                info!("Spawning scratchpad: {}", self.config.scratchpad.command);
                if let Err(e) = spawn(&self.config.scratchpad.command) {
                    warn!("{}", e);
                }
            }
        }
    }

    /// Drop the scratchpad down from the top of the current screen.
    fn position_scratchpad(&self, window: xlib::Window) {
        let screen = &self.screens[self.current_screen];
        let width = (screen.width as f32 * self.config.scratchpad.width.clamp(0.1, 1.0)) as u32;
        let height = (screen.height as f32 * self.config.scratchpad.height.clamp(0.1, 1.0)) as u32;
        let x = screen.x + ((screen.width - width) / 2) as i32;
        let y = screen.y
            + if self.config.appearance.bar.enabled {
                self.config.appearance.bar.height as i32
            } else {
                0
            };

        unsafe {
            xlib::XMoveResizeWindow(self.display.raw(), window, x, y, width, height);
        }
    }

    //  Client lifecycle

    fn handle_map_request(&mut self, event: xlib::XEvent) {
        let map_event: xlib::XMapRequestEvent = From::from(event);
        let window_id = map_event.window;
        let dpy = self.display.raw();
        debug!("Handling map request for window {}", window_id);

        if self.locate_window(window_id).is_some() || self.scratchpad_window == Some(window_id) {
            unsafe {
                xlib::XMapWindow(dpy, window_id);
            }
            return;
        }

        let mut attrs: xlib::XWindowAttributes = unsafe { std::mem::zeroed() };
        unsafe {
            xlib::XGetWindowAttributes(dpy, window_id, &mut attrs);
        }
        if attrs.override_redirect != 0 {
            unsafe {
                xlib::XMapWindow(dpy, window_id);
            }
            return;
        }

        let class = unsafe { x::window_class(dpy, window_id) };
        let title = unsafe { x::window_title(dpy, window_id) };
        let wtype = unsafe { x::window_type(dpy, window_id, &self.atoms) };

        // The dropdown terminal is managed outside of any group.
        if class.as_deref() == Some(self.config.scratchpad.class.as_str()) {
            debug!("Window {} is the scratchpad", window_id);
            self.scratchpad_window = Some(window_id);
            self.scratchpad_visible = true;
            self.position_scratchpad(window_id);
            unsafe {
                xlib::XSetWindowBorderWidth(dpy, window_id, self.config.appearance.border_width);
                xlib::XSetWindowBorder(dpy, window_id, self.config.appearance.focused_border_pixel());
                xlib::XMapWindow(dpy, window_id);
                xlib::XRaiseWindow(dpy, window_id);
                xlib::XSetInputFocus(dpy, window_id, xlib::RevertToPointerRoot, xlib::CurrentTime);
            }
            return;
        }

        let is_dock = wtype == Some(self.atoms.net_wm_window_type_dock)
            || wtype == Some(self.atoms.net_wm_window_type_notification);
        let type_floats = wtype == Some(self.atoms.net_wm_window_type_dialog)
            || wtype == Some(self.atoms.net_wm_window_type_utility)
            || wtype == Some(self.atoms.net_wm_window_type_splash);
        let rule_floats = self
            .config
            .rules
            .iter()
            .any(|r| r.matches(class.as_deref(), title.as_deref()));

        let mut window = Window::new(
            window_id,
            attrs.x,
            attrs.y,
            attrs.width as u32,
            attrs.height as u32,
        );
        window.class = class;

        let group = self.current_group_index();
        let screen = &self.screens[self.current_screen];

        if is_dock {
            window.is_dock = true;
            window.is_floating = true;
            unsafe {
                xlib::XSetWindowBorderWidth(dpy, window_id, 0);
                xlib::XMapWindow(dpy, window_id);
                xlib::XRaiseWindow(dpy, window_id);
            }
            self.groups[group].add_window(window);
            self.redraw_bars();
            return;
        }

        if type_floats || rule_floats {
            debug!("Window {} floats ({:?})", window_id, window.class);
            window.is_floating = true;
            window.pre_float_x = window.x;
            window.pre_float_y = window.y;
            window.pre_float_width = window.width;
            window.pre_float_height = window.height;

            if self.config.appearance.floating.center_on_float {
                window.width = window.width.min(screen.width).max(1);
                window.height = window.height.min(screen.height).max(1);
                window.x = screen.x + ((screen.width - window.width) / 2) as i32;
                window.y = screen.y + ((screen.height - window.height) / 2) as i32;
            }
        }

        unsafe {
            xlib::XSetWindowBorderWidth(dpy, window_id, self.config.appearance.border_width);
            xlib::XSetWindowBorder(dpy, window_id, self.config.appearance.border_pixel());
            xlib::XSelectInput(dpy, window_id, xlib::EnterWindowMask | xlib::FocusChangeMask);
            xlib::XMapWindow(dpy, window_id);
            if window.is_floating {
                xlib::XMoveResizeWindow(
                    dpy,
                    window_id,
                    window.x,
                    window.y,
                    window.width,
                    window.height,
                );
            }
        }

        self.groups[group].add_window(window);
        self.grab_buttons(window_id);
        self.relayout_screen(self.current_screen);
        self.focus_window(window_id);
        unsafe {
            xlib::XSync(dpy, 0);
        }
        self.redraw_bars();
    }

    fn handle_unmap_notify(&mut self, event: xlib::XEvent) {
        let unmap_event: xlib::XUnmapEvent = From::from(event);

        if self.scratchpad_window == Some(unmap_event.window) {
            self.scratchpad_visible = false;
            return;
        }

        // Unmaps of hidden groups' windows are our own doing; a window of a
        // visible group unmapping itself is a withdraw.
        if let Some((group, _)) = self.locate_window(unmap_event.window) {
            if self.screen_of_group(group).is_none() {
                return;
            }
            self.forget_window(unmap_event.window);
        }
    }

    fn handle_destroy_notify(&mut self, event: xlib::XEvent) {
        let destroy_event: xlib::XDestroyWindowEvent = From::from(event);

        if self.scratchpad_window == Some(destroy_event.window) {
            self.scratchpad_window = None;
            self.scratchpad_visible = false;
            return;
        }

        self.forget_window(destroy_event.window);
    }

    fn forget_window(&mut self, window: xlib::Window) {
        let Some((group, _)) = self.locate_window(window) else {
            return;
        };

        debug!("Forgetting window {}", window);
        self.groups[group].remove_window(window);

        if let Some(screen) = self.screen_of_group(group) {
            self.relayout_screen(screen);
            if group == self.current_group_index() {
                match self.groups[group].focused_window().map(|w| w.id) {
                    Some(next) => self.focus_window(next),
                    None => self.clear_focus(),
                }
            }
        }
        self.redraw_bars();
    }

    fn close_focused_window(&mut self) {
        let group = self.current_group_index();
        let Some(window) = self.groups[group]
            .focused_window()
            .filter(|w| !w.is_dock)
            .map(|w| w.id)
        else {
            debug!("No focused window to close");
            return;
        };

        debug!("Closing window {}", window);
        let dpy = self.display.raw();
        unsafe {
            let mut protocols: *mut xlib::Atom = std::ptr::null_mut();
            let mut num_protocols: i32 = 0;

            let supports_delete =
                xlib::XGetWMProtocols(dpy, window, &mut protocols, &mut num_protocols) != 0 && {
                    let slice = std::slice::from_raw_parts(protocols, num_protocols as usize);
                    let found = slice.contains(&self.atoms.wm_delete_window);
                    xlib::XFree(protocols as *mut _);
                    found
                };

            if supports_delete {
                let mut data: xlib::ClientMessageData = std::mem::zeroed();
                data.set_long(0, self.atoms.wm_delete_window as i64);

                let mut event = xlib::XEvent {
                    client_message: xlib::XClientMessageEvent {
                        type_: xlib::ClientMessage,
                        serial: 0,
                        send_event: 1,
                        display: dpy,
                        window,
                        message_type: self.atoms.wm_protocols,
                        format: 32,
                        data,
                    },
                };
                xlib::XSendEvent(dpy, window, 0, 0, &mut event);
            } else {
                xlib::XDestroyWindow(dpy, window);
            }

            xlib::XSync(dpy, 0);
        }
    }

    //  Pointer

    fn grab_buttons(&self, window: xlib::Window) {
        let dpy = self.display.raw();
        let modifier = self.config.modifier_mask();

        unsafe {
            for button in [1, 2, 3] {
                xlib::XGrabButton(
                    dpy,
                    button,
                    modifier,
                    window,
                    1,
                    (xlib::ButtonPressMask | xlib::ButtonReleaseMask | xlib::PointerMotionMask)
                        as u32,
                    xlib::GrabModeAsync,
                    xlib::GrabModeAsync,
                    0,
                    0,
                );
            }

            if !self.config.appearance.focus_follows_mouse {
                xlib::XGrabButton(
                    dpy,
                    xlib::AnyButton as u32,
                    0,
                    window,
                    1,
                    (xlib::ButtonPressMask | xlib::ButtonReleaseMask) as u32,
                    xlib::GrabModeSync,
                    xlib::GrabModeAsync,
                    0,
                    0,
                );
            }
        }
    }

    fn handle_button_press(&mut self, event: xlib::XButtonEvent) {
        debug!(
            "Button press: window={}, button={}, state={}",
            event.window, event.button, event.state
        );

        // Bar clicks switch groups.
        if let Some(bar_index) = self.bars.iter().position(|b| b.window == event.window) {
            if let Some(group) = self.bars[bar_index].group_at(event.x) {
                self.current_screen = bar_index;
                self.set_screen_group(bar_index, group);
            }
            return;
        }

        let modifier = self.config.modifier_mask();
        if keybind::clean_mask(event.state) & modifier != 0 {
            match event.button {
                1 => self.start_window_drag(event),
                2 => unsafe {
                    xlib::XRaiseWindow(self.display.raw(), event.window);
                },
                3 => self.start_window_resize(event),
                _ => (),
            }
            return;
        }

        if !self.config.appearance.focus_follows_mouse
            && event.window != 0
            && event.window != self.root
        {
            self.focus_window(event.window);
            unsafe {
                xlib::XAllowEvents(self.display.raw(), xlib::ReplayPointer, 0);
                xlib::XSync(self.display.raw(), 0);
            }
        }
    }

    fn start_window_drag(&mut self, event: xlib::XButtonEvent) {
        let Some((group, wi)) = self.locate_window(event.window) else {
            return;
        };
        let window = &self.groups[group].windows[wi];
        if !window.is_floating || window.is_dock {
            return;
        }

        debug!("Starting window drag for window {}", event.window);
        self.dragging = true;
        self.drag_start_x = event.x_root;
        self.drag_start_y = event.y_root;
        self.drag_origin = (window.x, window.y);
        self.dragged_window = Some(event.window);

        unsafe {
            xlib::XDefineCursor(self.display.raw(), event.window, self.cursor.moving());
        }
        self.focus_window(event.window);
    }

    fn start_window_resize(&mut self, event: xlib::XButtonEvent) {
        let Some((group, wi)) = self.locate_window(event.window) else {
            return;
        };
        let window = &self.groups[group].windows[wi];
        if !window.is_floating || window.is_dock {
            return;
        }

        debug!("Starting window resize for window {}", event.window);
        self.resizing = true;
        self.drag_start_x = event.x_root;
        self.drag_start_y = event.y_root;
        self.resize_start = (window.width, window.height);
        self.resized_window = Some(event.window);

        unsafe {
            xlib::XDefineCursor(self.display.raw(), event.window, self.cursor.resizing());
        }
        self.focus_window(event.window);
    }

    fn handle_motion_notify(&mut self, event: xlib::XEvent) {
        let motion: xlib::XMotionEvent = From::from(event);

        if self.dragging {
            if let Some(window) = self.dragged_window {
                let dx = motion.x_root - self.drag_start_x;
                let dy = motion.y_root - self.drag_start_y;
                let (ox, oy) = self.drag_origin;

                if let Some((group, wi)) = self.locate_window(window) {
                    let w = &mut self.groups[group].windows[wi];
                    w.x = ox + dx;
                    w.y = oy + dy;
                    let (x, y) = (w.x, w.y);
                    unsafe {
                        xlib::XMoveWindow(self.display.raw(), window, x, y);
                        xlib::XRaiseWindow(self.display.raw(), window);
                    }
                }
            }
            return;
        }

        if self.resizing {
            if let Some(window) = self.resized_window {
                let dx = motion.x_root - self.drag_start_x;
                let dy = motion.y_root - self.drag_start_y;
                let (sw, sh) = self.resize_start;

                if let Some((group, wi)) = self.locate_window(window) {
                    let w = &mut self.groups[group].windows[wi];
                    w.width = ((sw as i32 + dx).max(100)) as u32;
                    w.height = ((sh as i32 + dy).max(100)) as u32;
                    let (width, height) = (w.width, w.height);
                    unsafe {
                        xlib::XResizeWindow(self.display.raw(), window, width, height);
                    }
                }
            }
            return;
        }

        // Pointer crossings between monitors move screen focus even over
        // empty desktops.
        if let Some(screen) = self
            .screens
            .iter()
            .position(|s| s.contains(motion.x_root, motion.y_root))
        {
            if screen != self.current_screen {
                self.current_screen = screen;
                self.update_current_desktop();
                self.redraw_bars();
            }
        }
    }

    fn end_window_drag(&mut self) {
        if let Some(window) = self.dragged_window {
            debug!("Ending window drag for window {}", window);
            unsafe {
                xlib::XDefineCursor(self.display.raw(), window, self.cursor.normal());
            }
            if let Some((group, wi)) = self.locate_window(window) {
                let w = &mut self.groups[group].windows[wi];
                w.pre_float_x = w.x;
                w.pre_float_y = w.y;
            }
        }
        self.dragging = false;
        self.dragged_window = None;
    }

    fn end_window_resize(&mut self) {
        if let Some(window) = self.resized_window {
            debug!("Ending window resize for window {}", window);
            unsafe {
                xlib::XDefineCursor(self.display.raw(), window, self.cursor.normal());
            }
            if let Some((group, wi)) = self.locate_window(window) {
                let w = &mut self.groups[group].windows[wi];
                w.pre_float_width = w.width;
                w.pre_float_height = w.height;
            }
        }
        self.resizing = false;
        self.resized_window = None;
    }

    fn handle_enter_notify(&mut self, event: xlib::XEvent) {
        let enter_event: xlib::XCrossingEvent = From::from(event);
        if self.dragging
            || self.resizing
            || enter_event.window == 0
            || enter_event.window == self.root
            || !self.config.appearance.focus_follows_mouse
        {
            return;
        }

        self.focus_window(enter_event.window);
    }

    //  EWMH

    unsafe fn setup_ewmh(&self) {
        let dpy = self.display.raw();

        let supported = [
            self.atoms.net_active_window,
            self.atoms.net_current_desktop,
            self.atoms.net_number_of_desktops,
            self.atoms.net_desktop_names,
        ];
        xlib::XChangeProperty(
            dpy,
            self.root,
            self.atoms.net_supported,
            xlib::XA_ATOM,
            32,
            xlib::PropModeReplace,
            supported.as_ptr() as *const u8,
            supported.len() as i32,
        );

        let num_desktops = self.groups.len() as u32;
        xlib::XChangeProperty(
            dpy,
            self.root,
            self.atoms.net_number_of_desktops,
            xlib::XA_CARDINAL,
            32,
            xlib::PropModeReplace,
            &num_desktops as *const u32 as *const u8,
            1,
        );

        let names = self
            .groups
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join("\0")
            + "\0";
        xlib::XChangeProperty(
            dpy,
            self.root,
            self.atoms.net_desktop_names,
            self.atoms.utf8_string,
            8,
            xlib::PropModeReplace,
            names.as_bytes().as_ptr(),
            names.len() as i32,
        );

        let current = self.screens[self.current_screen].group as u32;
        xlib::XChangeProperty(
            dpy,
            self.root,
            self.atoms.net_current_desktop,
            xlib::XA_CARDINAL,
            32,
            xlib::PropModeReplace,
            &current as *const u32 as *const u8,
            1,
        );
    }

    fn update_current_desktop(&self) {
        let current = self.current_group_index() as u32;
        unsafe {
            xlib::XChangeProperty(
                self.display.raw(),
                self.root,
                self.atoms.net_current_desktop,
                xlib::XA_CARDINAL,
                32,
                xlib::PropModeReplace,
                &current as *const u32 as *const u8,
                1,
            );
        }
    }

    fn set_active_window(&self, window: xlib::Window) {
        unsafe {
            xlib::XChangeProperty(
                self.display.raw(),
                self.root,
                self.atoms.net_active_window,
                xlib::XA_WINDOW,
                32,
                xlib::PropModeReplace,
                &window as *const xlib::Window as *const u8,
                1,
            );
        }
    }

    fn handle_client_message(&mut self, event: xlib::XEvent) {
        let client_event: xlib::XClientMessageEvent = From::from(event);
        if client_event.message_type == self.atoms.net_current_desktop {
            let group = client_event.data.get_long(0) as usize;
            self.set_screen_group(self.current_screen, group);
        }
    }

    //  Bars and autostart

    fn redraw_bars(&mut self) {
        if self.bars.is_empty() {
            return;
        }

        let dpy = self.display.raw();
        for screen in 0..self.screens.len().min(self.bars.len()) {
            let group = self.screens[screen].group;
            let title = self.groups[group]
                .focused_window()
                .filter(|w| !w.is_dock)
                .and_then(|w| unsafe { x::window_title(dpy, w.id) })
                .unwrap_or_default();

            let snapshot = BarSnapshot {
                group_names: self.groups.iter().map(|g| g.name.clone()).collect(),
                occupied: self.groups.iter().map(|g| !g.windows.is_empty()).collect(),
                current_group: group,
                layout_name: self.groups[group].layout().name(),
                window_title: title,
            };

            unsafe {
                self.bars[screen].draw(&snapshot);
            }
        }
    }

    fn run_autostart(&self) {
        let Ok(path) = Config::autostart_path() else {
            return;
        };
        if !path.exists() {
            debug!("No autostart script at {:?}", path);
            return;
        }

        info!("Running autostart script {:?}", path);
        if let Err(e) = spawn(&path.to_string_lossy()) {
            warn!("{}", e);
        }
    }
}

/// The navigation helpers see the manager through this handle.
impl NavHandle for WindowManager {
    fn group_count(&self) -> usize {
        self.groups.len()
    }

    fn screen_count(&self) -> usize {
        self.screens.len()
    }

    fn current_group(&self) -> usize {
        self.current_group_index()
    }

    fn current_screen(&self) -> usize {
        self.current_screen
    }

    fn screen_group(&self, screen: usize) -> usize {
        self.screens[screen].group
    }

    fn has_focused_window(&self) -> bool {
        self.groups[self.current_group_index()]
            .focused_window()
            .is_some_and(|w| !w.is_dock)
    }

    fn move_focused_to_group(&mut self, group: usize) {
        self.send_focused_to_group(group);
    }

    fn bind_group(&mut self, screen: usize, group: usize) {
        self.set_screen_group(screen, group);
    }
}
