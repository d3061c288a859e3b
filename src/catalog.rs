//! A browsable table of named colors.

use std::collections::BTreeMap;

use crate::color::Rgba;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    pub key: String,
    pub color: Rgba,
}

/// Entries sharing one exact color, in the order they were first seen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorGroup {
    pub color: Rgba,
    pub entries: Vec<CatalogEntry>,
}

/// Named colors, always sorted by key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorCatalog {
    colors: BTreeMap<String, Rgba>,
}

impl ColorCatalog {
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Rgba)>,
        K: Into<String>,
    {
        Self {
            colors: entries
                .into_iter()
                .map(|(key, color)| (key.into(), color))
                .collect(),
        }
    }

    /// A stock widget palette to browse when nothing else is loaded.
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN.iter().map(|&(key, color)| (key, color)))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<Rgba> {
        self.colors.get(key).copied()
    }

    /// Inserts or replaces; returns the previous color.
    pub fn set(&mut self, key: impl Into<String>, color: Rgba) -> Option<Rgba> {
        self.colors.insert(key.into(), color)
    }

    /// Keys containing `query` (case-insensitive); with `only_alpha`, only
    /// translucent colors.
    pub fn filter(&self, query: &str, only_alpha: bool) -> Vec<CatalogEntry> {
        let query = query.to_lowercase();
        self.colors
            .iter()
            .filter(|(key, color)| {
                key.to_lowercase().contains(&query) && (!only_alpha || color.alpha < 255)
            })
            .map(|(key, &color)| CatalogEntry {
                key: key.clone(),
                color,
            })
            .collect()
    }
}

pub fn group_by_color(entries: &[CatalogEntry]) -> Vec<ColorGroup> {
    let mut groups: Vec<ColorGroup> = Vec::new();
    for entry in entries {
        match groups.iter_mut().find(|group| group.color == entry.color) {
            Some(group) => group.entries.push(entry.clone()),
            None => groups.push(ColorGroup {
                color: entry.color,
                entries: vec![entry.clone()],
            }),
        }
    }
    groups
}

/// Rows needed to show grouped entries: one header per group plus its entries.
pub fn row_count(groups: &[ColorGroup]) -> usize {
    groups.len() + groups.iter().map(|group| group.entries.len()).sum::<usize>()
}

const BUILTIN: &[(&str, Rgba)] = &[
    ("Button.background", Rgba::rgb(60, 63, 65)),
    ("Button.foreground", Rgba::rgb(187, 187, 187)),
    ("Button.focus", Rgba::rgb(53, 116, 240)),
    ("CheckBox.background", Rgba::rgb(60, 63, 65)),
    ("CheckBox.foreground", Rgba::rgb(187, 187, 187)),
    ("ComboBox.selectionBackground", Rgba::rgb(47, 101, 202)),
    ("Component.borderColor", Rgba::rgb(100, 100, 100)),
    ("Component.errorFocusColor", Rgba::rgb(139, 56, 56)),
    ("Component.focusColor", Rgba::rgb(53, 116, 240)),
    ("Label.foreground", Rgba::rgb(187, 187, 187)),
    ("Label.disabledForeground", Rgba::new(187, 187, 187, 128)),
    ("Link.activeForeground", Rgba::rgb(88, 157, 246)),
    ("List.background", Rgba::rgb(60, 63, 65)),
    ("List.selectionBackground", Rgba::rgb(47, 101, 202)),
    ("Panel.background", Rgba::rgb(60, 63, 65)),
    ("Panel.foreground", Rgba::rgb(187, 187, 187)),
    ("Popup.borderColor", Rgba::new(0, 0, 0, 64)),
    ("ScrollBar.thumbColor", Rgba::new(166, 166, 166, 71)),
    ("ScrollBar.trackColor", Rgba::new(0, 0, 0, 0)),
    ("Separator.foreground", Rgba::rgb(81, 81, 81)),
    ("TextField.background", Rgba::rgb(69, 73, 74)),
    ("TextField.caretForeground", Rgba::rgb(187, 187, 187)),
    ("TextField.selectionBackground", Rgba::rgb(33, 66, 131)),
    ("ToolTip.background", Rgba::rgb(75, 77, 77)),
    ("ToolWindow.header.background", Rgba::new(255, 255, 255, 13)),
    ("Tree.selectionBackground", Rgba::rgb(47, 101, 202)),
];
