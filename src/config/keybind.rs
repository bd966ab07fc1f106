use serde::Deserialize;
use x11::keysym;

use super::command::Command;

/// One key binding. `mods` overrides the global modifier for this bind only,
/// e.g. `mods = "super+shift"`.
#[derive(Clone, Deserialize)]
pub struct Bind {
    #[serde(default)]
    pub mods: Option<String>,
    pub key: String,
    pub command: Command,
}

impl Bind {
    pub fn new(mods: Option<&str>, key: &str, command: Command) -> Self {
        Self {
            mods: mods.map(str::to_string),
            key: key.to_string(),
            command,
        }
    }

    /// Modifier mask for this bind, falling back to the global modifier.
    pub fn mask(&self, global_modifier: &str) -> u32 {
        modifier_mask(self.mods.as_deref().unwrap_or(global_modifier))
    }
}

/// Resolve a config key name to an X keysym. Returns 0 for names we do not
/// know, which the grab path reports and skips.
pub fn keysym_for_key(key: &str) -> u64 {
    let sym: u32 = match key.to_lowercase().as_str() {
        "a" => keysym::XK_a,
        "b" => keysym::XK_b,
        "c" => keysym::XK_c,
        "d" => keysym::XK_d,
        "e" => keysym::XK_e,
        "f" => keysym::XK_f,
        "g" => keysym::XK_g,
        "h" => keysym::XK_h,
        "i" => keysym::XK_i,
        "j" => keysym::XK_j,
        "k" => keysym::XK_k,
        "l" => keysym::XK_l,
        "m" => keysym::XK_m,
        "n" => keysym::XK_n,
        "o" => keysym::XK_o,
        "p" => keysym::XK_p,
        "q" => keysym::XK_q,
        "r" => keysym::XK_r,
        "s" => keysym::XK_s,
        "t" => keysym::XK_t,
        "u" => keysym::XK_u,
        "v" => keysym::XK_v,
        "w" => keysym::XK_w,
        "x" => keysym::XK_x,
        "y" => keysym::XK_y,
        "z" => keysym::XK_z,
        "0" => keysym::XK_0,
        "1" => keysym::XK_1,
        "2" => keysym::XK_2,
        "3" => keysym::XK_3,
        "4" => keysym::XK_4,
        "5" => keysym::XK_5,
        "6" => keysym::XK_6,
        "7" => keysym::XK_7,
        "8" => keysym::XK_8,
        "9" => keysym::XK_9,
        "return" | "enter" => keysym::XK_Return,
        "space" => keysym::XK_space,
        "tab" => keysym::XK_Tab,
        "escape" => keysym::XK_Escape,
        "comma" => keysym::XK_comma,
        "period" => keysym::XK_period,
        "bracketleft" => keysym::XK_bracketleft,
        "bracketright" => keysym::XK_bracketright,
        "f1" => keysym::XK_F1,
        "f2" => keysym::XK_F2,
        "f3" => keysym::XK_F3,
        "f4" => keysym::XK_F4,
        "f5" => keysym::XK_F5,
        "f6" => keysym::XK_F6,
        "f7" => keysym::XK_F7,
        "f8" => keysym::XK_F8,
        "f9" => keysym::XK_F9,
        "f10" => keysym::XK_F10,
        "f11" => keysym::XK_F11,
        "f12" => keysym::XK_F12,
        _ => 0,
    };
    sym.into()
}

/// Combine a `+`-separated modifier spec into an X modifier mask.
/// Available modifiers: alt, ctrl, shift, super (or win).
pub fn modifier_mask(spec: &str) -> u32 {
    spec.split('+')
        .map(|m| match m.trim().to_lowercase().as_str() {
            "alt" => x11::xlib::Mod1Mask,
            "ctrl" => x11::xlib::ControlMask,
            "shift" => x11::xlib::ShiftMask,
            "super" | "win" => x11::xlib::Mod4Mask,
            _ => 0,
        })
        .fold(0, |acc, mask| acc | mask)
}

/// Strip lock masks so NumLock and CapsLock do not break bind matching.
pub fn clean_mask(state: u32) -> u32 {
    state
        & (x11::xlib::Mod1Mask
            | x11::xlib::Mod4Mask
            | x11::xlib::ControlMask
            | x11::xlib::ShiftMask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_keys_resolve() {
        assert_eq!(keysym_for_key("Return"), keysym::XK_Return as u64);
        assert_eq!(keysym_for_key("bracketleft"), keysym::XK_bracketleft as u64);
        assert_eq!(keysym_for_key("F12"), keysym::XK_F12 as u64);
        assert_eq!(keysym_for_key("period"), keysym::XK_period as u64);
        assert_eq!(keysym_for_key("definitely-not-a-key"), 0);
    }

    #[test]
    fn modifier_specs_combine() {
        assert_eq!(modifier_mask("super"), x11::xlib::Mod4Mask);
        assert_eq!(
            modifier_mask("super+shift"),
            x11::xlib::Mod4Mask | x11::xlib::ShiftMask
        );
        assert_eq!(modifier_mask("Win + Ctrl"), x11::xlib::Mod4Mask | x11::xlib::ControlMask);
    }

    #[test]
    fn bind_mask_prefers_its_own_mods() {
        let own = Bind::new(Some("super+shift"), "q", Command::Close);
        assert_eq!(own.mask("super"), x11::xlib::Mod4Mask | x11::xlib::ShiftMask);

        let global = Bind::new(None, "j", Command::FocusNext);
        assert_eq!(global.mask("super"), x11::xlib::Mod4Mask);
    }

    #[test]
    fn clean_mask_drops_lock_bits() {
        let state = x11::xlib::Mod4Mask | x11::xlib::LockMask | x11::xlib::Mod2Mask;
        assert_eq!(clean_mask(state), x11::xlib::Mod4Mask);
    }
}
