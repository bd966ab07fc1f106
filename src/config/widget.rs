use serde::Deserialize;

/// One status-bar widget. Widgets render left to right in config order;
/// [`Widget::WindowTitle`] stretches to absorb the slack before the widgets
/// that follow it.
///
/// Every widget takes an optional `foreground` color overriding the bar
/// foreground.
#[derive(Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Widget {
    /// Blank spacing.
    Sep {
        #[serde(default = "default_sep_padding")]
        padding: u32,
    },
    /// A fixed string, e.g. the `|` dividers.
    Text {
        text: String,
        #[serde(default)]
        foreground: Option<String>,
    },
    /// One cell per group; the current group is highlighted and clicking a
    /// cell switches to it.
    GroupBox {
        #[serde(default = "default_groupbox_active")]
        active: String,
        #[serde(default = "default_groupbox_inactive")]
        inactive: String,
        #[serde(default = "default_groupbox_highlight")]
        highlight: String,
    },
    /// Name of the current group's layout.
    LayoutName {
        #[serde(default)]
        foreground: Option<String>,
    },
    /// Title of the focused window; stretches.
    WindowTitle {
        #[serde(default)]
        foreground: Option<String>,
    },
    /// CPU frequency and load, sampled from /proc.
    Cpu {
        #[serde(default)]
        foreground: Option<String>,
    },
    /// Used memory in MiB, sampled from /proc/meminfo.
    Memory {
        #[serde(default)]
        foreground: Option<String>,
    },
    /// Receive/transmit rate of `interface`, sampled from /proc/net/dev.
    Net {
        interface: String,
        #[serde(default)]
        foreground: Option<String>,
    },
    /// Master volume, queried from amixer.
    Volume {
        #[serde(default)]
        foreground: Option<String>,
    },
    /// Local time.
    Clock {
        #[serde(default = "default_clock_format")]
        format: String,
        #[serde(default)]
        foreground: Option<String>,
    },
}

fn default_sep_padding() -> u32 {
    6
}
fn default_clock_format() -> String {
    String::from("%B %d - %H:%M")
}
fn default_groupbox_active() -> String {
    String::from("#c678dd")
}
fn default_groupbox_inactive() -> String {
    String::from("#51afef")
}
fn default_groupbox_highlight() -> String {
    String::from("#1c1f24")
}

fn divider() -> Widget {
    Widget::Text {
        text: String::from("|"),
        foreground: Some(String::from("#474747")),
    }
}

/// The default widget line-up: groups, layout, window title, then the status
/// block (cpu, net, memory, volume, clock) separated by dividers.
pub fn default_widgets() -> Vec<Widget> {
    vec![
        Widget::Sep { padding: 6 },
        Widget::GroupBox {
            active: default_groupbox_active(),
            inactive: default_groupbox_inactive(),
            highlight: default_groupbox_highlight(),
        },
        divider(),
        Widget::LayoutName {
            foreground: Some(String::from("#dfdfdf")),
        },
        divider(),
        Widget::WindowTitle {
            foreground: Some(String::from("#51afef")),
        },
        Widget::Cpu {
            foreground: Some(String::from("#dfdfdf")),
        },
        divider(),
        Widget::Net {
            interface: String::from("enp44s0"),
            foreground: Some(String::from("#51afef")),
        },
        divider(),
        Widget::Memory {
            foreground: Some(String::from("#a9a1e1")),
        },
        divider(),
        Widget::Volume {
            foreground: Some(String::from("#98be65")),
        },
        divider(),
        Widget::Clock {
            format: default_clock_format(),
            foreground: Some(String::from("#da8548")),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widgets_deserialize_from_tagged_tables() {
        let widget: Widget = toml::from_str(
            r##"
            type = "net"
            interface = "wlan0"
            foreground = "#51afef"
            "##,
        )
        .unwrap();
        match widget {
            Widget::Net { interface, .. } => assert_eq!(interface, "wlan0"),
            _ => panic!("expected a net widget"),
        }
    }

    #[test]
    fn clock_format_defaults() {
        let widget: Widget = toml::from_str(r#"type = "clock""#).unwrap();
        match widget {
            Widget::Clock { format, .. } => assert_eq!(format, "%B %d - %H:%M"),
            _ => panic!("expected a clock widget"),
        }
    }

    #[test]
    fn default_line_up_starts_with_groups_and_stretches_once() {
        let widgets = default_widgets();
        assert!(matches!(widgets[1], Widget::GroupBox { .. }));
        let stretchers = widgets
            .iter()
            .filter(|w| matches!(w, Widget::WindowTitle { .. }))
            .count();
        assert_eq!(stretchers, 1);
    }
}
