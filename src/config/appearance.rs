use serde::Deserialize;

/// Parse a `#rrggbb` color into an X pixel value.
pub fn parse_color(color: &str, fallback: u64) -> u64 {
    u64::from_str_radix(color.trim_start_matches('#'), 16).unwrap_or(fallback)
}

#[derive(Deserialize, Clone)]
pub struct FloatingDefaults {
    #[serde(default = "default_center_on_float")]
    pub center_on_float: bool,
    #[serde(default = "default_float_width")]
    pub width: u32,
    #[serde(default = "default_float_height")]
    pub height: u32,
}

impl Default for FloatingDefaults {
    fn default() -> Self {
        Self {
            center_on_float: default_center_on_float(),
            width: default_float_width(),
            height: default_float_height(),
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct BarConfig {
    #[serde(default = "default_bar_enabled")]
    pub enabled: bool,
    #[serde(default = "default_bar_height")]
    pub height: u32,
    #[serde(default = "default_bar_background")]
    pub background: String,
    #[serde(default = "default_bar_foreground")]
    pub foreground: String,
    #[serde(default = "default_bar_font")]
    pub font: String,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            enabled: default_bar_enabled(),
            height: default_bar_height(),
            background: default_bar_background(),
            foreground: default_bar_foreground(),
            font: default_bar_font(),
        }
    }
}

impl BarConfig {
    pub fn background_pixel(&self) -> u64 {
        parse_color(&self.background, 0x282C34)
    }

    pub fn foreground_pixel(&self) -> u64 {
        parse_color(&self.foreground, 0xDFDFDF)
    }
}

#[derive(Deserialize, Clone)]
pub struct Appearance {
    #[serde(default = "default_border_width")]
    pub border_width: u32,
    #[serde(default = "default_border_color")]
    pub border_color: String,
    #[serde(default = "default_focused_border_color")]
    pub focused_border_color: String,
    #[serde(default = "default_gaps")]
    pub gaps: u32,
    #[serde(default = "default_focus_follows_mouse")]
    pub focus_follows_mouse: bool,
    #[serde(default)]
    pub floating: FloatingDefaults,
    #[serde(default)]
    pub bar: BarConfig,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            border_width: default_border_width(),
            border_color: default_border_color(),
            focused_border_color: default_focused_border_color(),
            gaps: default_gaps(),
            focus_follows_mouse: default_focus_follows_mouse(),
            floating: FloatingDefaults::default(),
            bar: BarConfig::default(),
        }
    }
}

impl Appearance {
    pub fn border_pixel(&self) -> u64 {
        parse_color(&self.border_color, 0x282C34)
    }

    pub fn focused_border_pixel(&self) -> u64 {
        parse_color(&self.focused_border_color, 0x46D9FF)
    }
}

fn default_border_width() -> u32 {
    2
}
fn default_border_color() -> String {
    String::from("#282c34")
}
fn default_focused_border_color() -> String {
    String::from("#46d9ff")
}
fn default_gaps() -> u32 {
    12
}
fn default_focus_follows_mouse() -> bool {
    true
}
fn default_center_on_float() -> bool {
    true
}
fn default_float_width() -> u32 {
    800
}
fn default_float_height() -> u32 {
    600
}
fn default_bar_enabled() -> bool {
    true
}
fn default_bar_height() -> u32 {
    22
}
fn default_bar_background() -> String {
    String::from("#282c34")
}
fn default_bar_foreground() -> String {
    String::from("#dfdfdf")
}
fn default_bar_font() -> String {
    String::from("fixed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_color_accepts_hex_with_and_without_hash() {
        assert_eq!(parse_color("#46d9ff", 0), 0x46D9FF);
        assert_eq!(parse_color("282c34", 0), 0x282C34);
        assert_eq!(parse_color("not-a-color", 0xABCDEF), 0xABCDEF);
    }

    #[test]
    fn defaults_carry_the_theme() {
        let a = Appearance::default();
        assert_eq!(a.focused_border_pixel(), 0x46D9FF);
        assert_eq!(a.border_pixel(), 0x282C34);
        assert_eq!(a.gaps, 12);
        assert_eq!(a.bar.height, 22);
    }
}
