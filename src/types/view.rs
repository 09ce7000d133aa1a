use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::bookmark::Bookmark;

/// Allowed page sizes for the grouped view.
pub const PAGE_SIZES: [usize; 4] = [5, 10, 20, 30];

/// Default number of subject groups per page.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Ordering of subject groups, applied by `addedAt` over the filtered set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupSortOrder {
    NewestFirst,
    OldestFirst,
}

impl GroupSortOrder {
    pub fn toggled(self) -> Self {
        match self {
            GroupSortOrder::NewestFirst => GroupSortOrder::OldestFirst,
            GroupSortOrder::OldestFirst => GroupSortOrder::NewestFirst,
        }
    }
}

/// Field a subject group's member records are sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    AddedAt,
    Time,
    Note,
}

impl SortKey {
    /// Direction applied when this key is freshly selected: descending for
    /// `addedAt`, ascending otherwise.
    pub fn default_direction(self) -> SortDirection {
        match self {
            SortKey::AddedAt => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Per-subject sort state, retained independently for each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectSort {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SubjectSort {
    fn default() -> Self {
        Self {
            key: SortKey::AddedAt,
            direction: SortDirection::Desc,
        }
    }
}

/// The full set of filter/sort/pagination parameters controlling one derived
/// projection. Owned by the caller and passed into the view engine — the engine
/// itself holds no state across calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewState {
    /// Case-insensitive substring query. Empty matches everything.
    pub search_query: String,
    /// Single-tag filter, case-insensitive exact match. Mutually exclusive with
    /// an active search query at the presentation level.
    pub tag_filter: Option<String>,
    pub group_sort_order: GroupSortOrder,
    /// Independent sort state per subject id.
    pub subject_sort: HashMap<String, SubjectSort>,
    /// 1-based page over subject groups.
    pub page: usize,
    pub page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            tag_filter: None,
            group_sort_order: GroupSortOrder::NewestFirst,
            subject_sort: HashMap::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ViewState {
    /// Sets the search query, clearing any active tag filter and resetting to
    /// the first page.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.tag_filter = None;
        self.page = 1;
    }

    /// Activates a tag filter, or clears it when the same tag is toggled again.
    /// An active search query is cleared either way.
    pub fn toggle_tag_filter(&mut self, tag: &str) {
        if self.tag_filter.as_deref() == Some(tag) {
            self.tag_filter = None;
        } else {
            self.tag_filter = Some(tag.to_string());
        }
        self.search_query.clear();
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.tag_filter = None;
        self.search_query.clear();
        self.page = 1;
    }

    pub fn toggle_group_sort_order(&mut self) {
        self.group_sort_order = self.group_sort_order.toggled();
        self.page = 1;
    }

    /// Sort state for one subject, defaulting to `addedAt` descending.
    pub fn subject_sort(&self, subject_id: &str) -> SubjectSort {
        self.subject_sort
            .get(subject_id)
            .copied()
            .unwrap_or_default()
    }

    /// Selects a sort key for one subject group. Re-selecting the active key
    /// flips its direction; a new key starts at its default direction.
    pub fn toggle_subject_sort(&mut self, subject_id: &str, key: SortKey) {
        let entry = self
            .subject_sort
            .entry(subject_id.to_string())
            .or_default();
        if entry.key == key {
            entry.direction = entry.direction.toggled();
        } else {
            entry.key = key;
            entry.direction = key.default_direction();
        }
    }

    /// Switches the page size if it is one of [`PAGE_SIZES`], resetting to the
    /// first page. Returns whether the size was accepted.
    pub fn set_page_size(&mut self, size: usize) -> bool {
        if !PAGE_SIZES.contains(&size) {
            return false;
        }
        self.page_size = size;
        self.page = 1;
        true
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }
}

/// One subject group in the projection: display title, the tag set shown for
/// the group, and its locally-sorted member records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkGroup {
    pub subject_id: String,
    pub title: String,
    pub tags: Vec<String>,
    pub bookmarks: Vec<Bookmark>,
}

/// The renderable projection: ordered groups for the current page plus
/// pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedView {
    pub groups: Vec<BookmarkGroup>,
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
}
