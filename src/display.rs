//! Display items for paginated name lists
//!
//! A working list holds real entries plus at most one transient sentinel
//! (`Loading` or `Error`) at its tail. Equality is structural: two
//! `NamedEntry` values with the same id and name are the same item.

use serde::Serialize;

/// One row of a name list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisplayItem {
    NamedEntry { id: u32, name: String },
    Loading,
    Error,
}

impl DisplayItem {
    pub fn named(id: u32, name: impl Into<String>) -> Self {
        DisplayItem::NamedEntry {
            id,
            name: name.into(),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        !matches!(self, DisplayItem::NamedEntry { .. })
    }

    /// Id of a named entry
    pub fn entry_id(&self) -> Option<u32> {
        match self {
            DisplayItem::NamedEntry { id, .. } => Some(*id),
            _ => None,
        }
    }
}

/// Ordered working list with sentinel bookkeeping
///
/// Every mutation leaves at most one sentinel in the list, always last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkingList {
    items: Vec<DisplayItem>,
}

impl WorkingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[DisplayItem] {
        &self.items
    }

    /// Named entries only, in order
    pub fn entries(&self) -> impl Iterator<Item = &DisplayItem> {
        self.items.iter().filter(|item| !item.is_sentinel())
    }

    pub fn entry_count(&self) -> usize {
        self.entries().count()
    }

    pub fn is_loading(&self) -> bool {
        self.items.contains(&DisplayItem::Loading)
    }

    pub fn has_error(&self) -> bool {
        self.items.contains(&DisplayItem::Error)
    }

    /// Drop any sentinel and append a `Loading` one
    pub fn begin_loading(&mut self) {
        self.clear_sentinels();
        self.items.push(DisplayItem::Loading);
    }

    /// Drop the `Loading` sentinel and append `entries` in order
    pub fn complete(&mut self, entries: impl IntoIterator<Item = DisplayItem>) {
        self.clear_sentinels();
        self.items
            .extend(entries.into_iter().filter(|item| !item.is_sentinel()));
    }

    /// Drop the `Loading` sentinel and append an `Error` one
    pub fn fail(&mut self) {
        self.clear_sentinels();
        self.items.push(DisplayItem::Error);
    }

    fn clear_sentinels(&mut self) {
        self.items.retain(|item| !item.is_sentinel());
    }
}

/// A display item decorated with presentation-only highlight state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoratedItem<'a> {
    pub item: &'a DisplayItem,
    pub highlighted: bool,
}

/// Selection highlight for two-pane layouts
///
/// Highlighting only makes sense when the list and the detail pane are shown
/// side by side; a narrow layout clears it. This state never feeds back into
/// the working list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighter {
    min_two_pane_width: u32,
    two_pane: bool,
    highlighted: Option<u32>,
}

impl Highlighter {
    pub fn new(min_two_pane_width: u32) -> Self {
        Self {
            min_two_pane_width,
            two_pane: false,
            highlighted: None,
        }
    }

    pub fn highlighted(&self) -> Option<u32> {
        self.highlighted
    }

    pub fn is_two_pane(&self) -> bool {
        self.two_pane
    }

    /// React to a layout width change; narrow layouts drop the highlight
    pub fn on_layout_width(&mut self, width: u32) {
        self.two_pane = width >= self.min_two_pane_width;
        if !self.two_pane {
            self.highlighted = None;
        }
    }

    /// Toggle the highlight on entry `id`
    ///
    /// Ignored in single-pane layouts.
    pub fn select(&mut self, id: u32) {
        if !self.two_pane {
            return;
        }
        self.highlighted = if self.highlighted == Some(id) {
            None
        } else {
            Some(id)
        };
    }

    pub fn decorate<'a>(&self, items: &'a [DisplayItem]) -> Vec<DecoratedItem<'a>> {
        items
            .iter()
            .map(|item| DecoratedItem {
                item,
                highlighted: self.highlighted.is_some() && item.entry_id() == self.highlighted,
            })
            .collect()
    }
}
