use serde::Deserialize;

use crate::layout::Layout;

/// A group (workspace) declaration: a name and the layout it starts in.
#[derive(Clone, Deserialize)]
pub struct GroupConfig {
    pub name: String,
    #[serde(default = "default_group_layout")]
    pub layout: Layout,
}

impl GroupConfig {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            layout: default_group_layout(),
        }
    }
}

fn default_group_layout() -> Layout {
    Layout::MonadTall
}

/// The ten default groups.
pub fn default_groups() -> Vec<GroupConfig> {
    [
        "work", "main", "mail", "view", "virt", "mus", "chat", "vid", "code", "xtra",
    ]
    .iter()
    .map(|name| GroupConfig::named(name))
    .collect()
}

/// Default layout cycle for every group.
pub fn default_layout_cycle() -> Vec<Layout> {
    vec![Layout::MonadTall, Layout::Max, Layout::Stack]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_default_groups_in_order() {
        let groups = default_groups();
        assert_eq!(groups.len(), 10);
        assert_eq!(groups[0].name, "work");
        assert_eq!(groups[9].name, "xtra");
        assert!(groups.iter().all(|g| g.layout == Layout::MonadTall));
    }
}
