use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::PathBuf};

use super::appearance::Appearance;
use super::command::Command;
use super::groups::{self, GroupConfig};
use super::keybind::{self, Bind};
use super::rules::{self, FloatRule};
use super::widget::{self, Widget};
use crate::layout::Layout;

/// The dropdown terminal toggled from a key. The window is matched by its
/// WM_CLASS, so the spawn command must set one.
#[derive(Clone, Deserialize)]
pub struct Scratchpad {
    #[serde(default = "default_scratchpad_command")]
    pub command: String,
    #[serde(default = "default_scratchpad_class")]
    pub class: String,
    /// Width as a fraction of the screen.
    #[serde(default = "default_scratchpad_width")]
    pub width: f32,
    /// Height as a fraction of the screen.
    #[serde(default = "default_scratchpad_height")]
    pub height: f32,
}

impl Default for Scratchpad {
    fn default() -> Self {
        Self {
            command: default_scratchpad_command(),
            class: default_scratchpad_class(),
            width: default_scratchpad_width(),
            height: default_scratchpad_height(),
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_modifier")]
    pub modifier: String,
    #[serde(default = "default_groups")]
    pub groups: Vec<GroupConfig>,
    #[serde(default = "default_layout_cycle")]
    pub layouts: Vec<Layout>,
    #[serde(default = "default_binds")]
    pub binds: Vec<Bind>,
    #[serde(default = "default_rules")]
    pub rules: Vec<FloatRule>,
    #[serde(default)]
    pub appearance: Appearance,
    #[serde(default = "default_widgets")]
    pub widgets: Vec<Widget>,
    #[serde(default)]
    pub scratchpad: Scratchpad,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            modifier: default_modifier(),
            groups: default_groups(),
            layouts: default_layout_cycle(),
            binds: default_binds(),
            rules: default_rules(),
            appearance: Appearance::default(),
            widgets: default_widgets(),
            scratchpad: Scratchpad::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        let content = fs::read_to_string(&config_path).context("Failed to read config file")?;

        toml::from_str(&content).context("Failed to parse config file")
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").context("Failed to get HOME directory")?;

        Ok(PathBuf::from(home).join(".config/stratawm/config.toml"))
    }

    /// Script run once at startup, if present.
    pub fn autostart_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").context("Failed to get HOME directory")?;

        Ok(PathBuf::from(home).join(".config/stratawm/autostart.sh"))
    }

    /// Modifier mask of the global modifier key.
    pub fn modifier_mask(&self) -> u32 {
        keybind::modifier_mask(&self.modifier)
    }

    fn create_default_config(path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        fs::write(path, DEFAULT_CONFIG).context("Failed to write default config")
    }
}

fn default_modifier() -> String {
    String::from("super")
}
fn default_groups() -> Vec<GroupConfig> {
    groups::default_groups()
}
fn default_layout_cycle() -> Vec<Layout> {
    groups::default_layout_cycle()
}
fn default_rules() -> Vec<FloatRule> {
    rules::default_rules()
}
fn default_widgets() -> Vec<Widget> {
    widget::default_widgets()
}
fn default_scratchpad_command() -> String {
    String::from("alacritty --class scratchpad")
}
fn default_scratchpad_class() -> String {
    String::from("scratchpad")
}
fn default_scratchpad_width() -> f32 {
    0.6
}
fn default_scratchpad_height() -> f32 {
    0.5
}

/// Fallback bind table for when the config file cannot be parsed at all;
/// just enough to open a terminal and leave.
fn default_binds() -> Vec<Bind> {
    vec![
        Bind::new(None, "return", Command::Spawn(String::from("alacritty"))),
        Bind::new(Some("super+shift"), "q", Command::Close),
        Bind::new(Some("super+shift"), "e", Command::Exit),
    ]
}

const DEFAULT_CONFIG: &str = r##"# stratawm configuration
#
# Global modifier key for all shortcuts. Per-bind "mods" overrides it;
# available modifiers: alt, ctrl, shift, super (or win), combined with +.
modifier = "super"

# Groups, in order. Each starts in the named layout; "nextlayout" cycles
# through the `layouts` list below.
groups = [
    { name = "work", layout = "monadtall" },
    { name = "main", layout = "monadtall" },
    { name = "mail", layout = "monadtall" },
    { name = "view", layout = "monadtall" },
    { name = "virt", layout = "monadtall" },
    { name = "mus", layout = "monadtall" },
    { name = "chat", layout = "monadtall" },
    { name = "vid", layout = "monadtall" },
    { name = "code", layout = "monadtall" },
    { name = "xtra", layout = "monadtall" },
]

layouts = ["monadtall", "max", "stack"]

# Floating rules. A window floats when any rule matches its WM_CLASS/title.
rules = [
    { title = "Confirmation" },
    { title = "Qalculate!" },
    { class = "kdenlive" },
    { class = "pinentry-gtk-2" },
]

# Status bar widgets, rendered left to right. "windowtitle" stretches.
widgets = [
    { type = "sep", padding = 6 },
    { type = "groupbox", active = "#c678dd", inactive = "#51afef", highlight = "#1c1f24" },
    { type = "text", text = "|", foreground = "#474747" },
    { type = "layoutname", foreground = "#dfdfdf" },
    { type = "text", text = "|", foreground = "#474747" },
    { type = "windowtitle", foreground = "#51afef" },
    { type = "cpu", foreground = "#dfdfdf" },
    { type = "text", text = "|", foreground = "#474747" },
    { type = "net", interface = "enp44s0", foreground = "#51afef" },
    { type = "text", text = "|", foreground = "#474747" },
    { type = "memory", foreground = "#a9a1e1" },
    { type = "text", text = "|", foreground = "#474747" },
    { type = "volume", foreground = "#98be65" },
    { type = "text", text = "|", foreground = "#474747" },
    { type = "clock", format = "%B %d - %H:%M", foreground = "#da8548" },
]

# Key bindings. Commands:
#   exit | reload | close | spawn <cmd> | nextlayout
#   group <n> | movetogroup <n> | screen <n> | nextscreen | prevscreen
#   focusnext | focusprev | shufflenext | shuffleprev
#   growmaster | shrinkmaster | resetmaster
#   togglefloat | togglefullscreen | scratchpad
#   movetoprevgroup | movetonextgroup | movetoprevscreen | movetonextscreen
#   swapscreens
binds = [
    # The essentials
    { key = "return", command = "spawn alacritty" },
    { mods = "super+shift", key = "return", command = "spawn rofi -show drun" },
    { key = "b", command = "spawn firefox" },
    { key = "f1", command = "spawn pcmanfm" },
    { key = "f2", command = "spawn firefox" },
    { key = "f3", command = "spawn mailspring" },
    { key = "f4", command = "spawn veyon-master" },
    { key = "f5", command = "spawn virtualbox" },
    { key = "f6", command = "spawn spotify" },
    { key = "f7", command = "spawn discord" },
    { mods = "", key = "f12", command = "scratchpad" },
    { key = "tab", command = "nextlayout" },
    { mods = "super+shift", key = "q", command = "close" },
    { mods = "super+shift", key = "r", command = "reload" },
    { mods = "super+shift", key = "e", command = "exit" },
    { mods = "super+shift", key = "escape", command = "exit" },

    # Screen focus (out of three)
    { key = "w", command = "screen 1" },
    { key = "e", command = "screen 2" },
    { key = "r", command = "screen 3" },
    { key = "period", command = "nextscreen" },
    { key = "comma", command = "prevscreen" },

    # Window controls
    { key = "j", command = "focusnext" },
    { key = "k", command = "focusprev" },
    { mods = "super+shift", key = "j", command = "shufflenext" },
    { mods = "super+shift", key = "k", command = "shuffleprev" },
    { key = "h", command = "shrinkmaster" },
    { key = "l", command = "growmaster" },
    { key = "n", command = "resetmaster" },
    { mods = "super+shift", key = "f", command = "togglefloat" },
    { key = "space", command = "togglefullscreen" },

    # Groups
    { key = "1", command = "group 1" },
    { key = "2", command = "group 2" },
    { key = "3", command = "group 3" },
    { key = "4", command = "group 4" },
    { key = "5", command = "group 5" },
    { key = "6", command = "group 6" },
    { key = "7", command = "group 7" },
    { key = "8", command = "group 8" },
    { key = "9", command = "group 9" },
    { key = "0", command = "group 10" },
    { mods = "super+shift", key = "1", command = "movetogroup 1" },
    { mods = "super+shift", key = "2", command = "movetogroup 2" },
    { mods = "super+shift", key = "3", command = "movetogroup 3" },
    { mods = "super+shift", key = "4", command = "movetogroup 4" },
    { mods = "super+shift", key = "5", command = "movetogroup 5" },
    { mods = "super+shift", key = "6", command = "movetogroup 6" },
    { mods = "super+shift", key = "7", command = "movetogroup 7" },
    { mods = "super+shift", key = "8", command = "movetogroup 8" },
    { mods = "super+shift", key = "9", command = "movetogroup 9" },
    { mods = "super+shift", key = "0", command = "movetogroup 10" },

    # Window-to-group / window-to-screen navigation
    { mods = "super+shift", key = "bracketleft", command = "movetoprevgroup" },
    { mods = "super+shift", key = "bracketright", command = "movetonextgroup" },
    { mods = "super+shift", key = "comma", command = "movetoprevscreen" },
    { mods = "super+shift", key = "period", command = "movetonextscreen" },
    { mods = "super+shift", key = "s", command = "swapscreens" },
]

[appearance]
border_width = 2
border_color = "#282c34"
focused_border_color = "#46d9ff"
gaps = 12
focus_follows_mouse = true

[appearance.floating]
center_on_float = true
width = 800
height = 600

[appearance.bar]
enabled = true
height = 22
background = "#282c34"
foreground = "#dfdfdf"
font = "fixed"

# Dropdown terminal, toggled with the "scratchpad" command.
[scratchpad]
command = "alacritty --class scratchpad"
class = "scratchpad"
width = 0.6
height = 0.5
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.modifier, "super");
        assert_eq!(config.groups.len(), 10);
        assert_eq!(config.groups[2].name, "mail");
        assert_eq!(config.layouts, vec![Layout::MonadTall, Layout::Max, Layout::Stack]);
        assert_eq!(config.rules.len(), 4);
        assert_eq!(config.widgets.len(), 15);
        assert_eq!(config.appearance.gaps, 12);
    }

    #[test]
    fn default_config_binds_every_navigation_helper() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        for cmd in [
            Command::MoveToPrevGroup,
            Command::MoveToNextGroup,
            Command::MoveToPrevScreen,
            Command::MoveToNextScreen,
            Command::SwapScreens,
        ] {
            assert!(
                config.binds.iter().any(|b| b.command == cmd),
                "missing bind for {:?}",
                cmd
            );
        }
    }

    #[test]
    fn default_config_covers_all_ten_groups() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        for n in 0..10 {
            assert!(config.binds.iter().any(|b| b.command == Command::Group(n)));
            assert!(config
                .binds
                .iter()
                .any(|b| b.command == Command::MoveToGroup(n)));
        }
    }

    #[test]
    fn scratchpad_bind_uses_no_modifier() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        let bind = config
            .binds
            .iter()
            .find(|b| b.command == Command::Scratchpad)
            .unwrap();
        assert_eq!(bind.mask("super"), 0);
    }

    #[test]
    fn empty_file_falls_back_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.groups.len(), 10);
        assert!(!config.binds.is_empty());
        assert_eq!(config.scratchpad.class, "scratchpad");
    }
}
