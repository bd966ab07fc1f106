use serde::Deserialize;

/// A floating-window match rule. A rule matches when every criterion it
/// names matches; a rule with no criteria matches nothing.
#[derive(Clone, Default, Deserialize)]
pub struct FloatRule {
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl FloatRule {
    pub fn class(class: &str) -> Self {
        Self {
            class: Some(class.to_string()),
            title: None,
        }
    }

    pub fn title(title: &str) -> Self {
        Self {
            class: None,
            title: Some(title.to_string()),
        }
    }

    pub fn matches(&self, class: Option<&str>, title: Option<&str>) -> bool {
        if self.class.is_none() && self.title.is_none() {
            return false;
        }

        let class_ok = match &self.class {
            Some(want) => class == Some(want.as_str()),
            None => true,
        };
        let title_ok = match &self.title {
            Some(want) => title == Some(want.as_str()),
            None => true,
        };

        class_ok && title_ok
    }
}

/// The stock float rules: dialogs the tiled layouts would mangle.
pub fn default_rules() -> Vec<FloatRule> {
    vec![
        FloatRule::title("Confirmation"),
        FloatRule::title("Qalculate!"),
        FloatRule::class("kdenlive"),
        FloatRule::class("pinentry-gtk-2"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_rule_matches_class_only() {
        let rule = FloatRule::class("kdenlive");
        assert!(rule.matches(Some("kdenlive"), None));
        assert!(rule.matches(Some("kdenlive"), Some("Rendering")));
        assert!(!rule.matches(Some("mpv"), None));
        assert!(!rule.matches(None, Some("kdenlive")));
    }

    #[test]
    fn title_rule_matches_title_only() {
        let rule = FloatRule::title("Confirmation");
        assert!(rule.matches(None, Some("Confirmation")));
        assert!(!rule.matches(Some("Confirmation"), None));
    }

    #[test]
    fn combined_rule_needs_both() {
        let rule = FloatRule {
            class: Some(String::from("Qalculate-gtk")),
            title: Some(String::from("Qalculate!")),
        };
        assert!(rule.matches(Some("Qalculate-gtk"), Some("Qalculate!")));
        assert!(!rule.matches(Some("Qalculate-gtk"), Some("Preferences")));
    }

    #[test]
    fn empty_rule_matches_nothing() {
        let rule = FloatRule::default();
        assert!(!rule.matches(Some("anything"), Some("anything")));
        assert!(!rule.matches(None, None));
    }
}
