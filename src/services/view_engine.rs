//! Query/view engine for timemark.
//!
//! Stateless pure functions that turn the flat record set plus a caller-owned
//! [`ViewState`] into a filtered, tag-matched, grouped-by-subject, per-group
//! sorted, globally-paginated projection. Holds no state across calls and never
//! touches the database.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::types::bookmark::Bookmark;
use crate::types::view::{
    BookmarkGroup, GroupSortOrder, GroupedView, SortDirection, SortKey, ViewState,
};

/// Builds the renderable projection for one page of subject groups.
///
/// Algorithm: filter by search/tag, order the filtered set by `addedAt`, group
/// by subject id in first-encounter order, paginate the groups, then sort each
/// on-page group's members by that subject's independent sort state.
pub fn build_view(records: &[Bookmark], state: &ViewState) -> GroupedView {
    let filtered: Vec<&Bookmark> = records
        .iter()
        .filter(|bm| matches_filters(bm, &state.search_query, state.tag_filter.as_deref()))
        .collect();

    // Stable sort: equal timestamps keep their relative order.
    let mut ordered = filtered;
    ordered.sort_by(|a, b| match state.group_sort_order {
        GroupSortOrder::NewestFirst => b.added_at.cmp(&a.added_at),
        GroupSortOrder::OldestFirst => a.added_at.cmp(&b.added_at),
    });

    let mut groups: Vec<BookmarkGroup> = Vec::new();
    let mut group_index: HashMap<&str, usize> = HashMap::new();
    for bm in &ordered {
        let idx = match group_index.get(bm.subject_id.as_str()) {
            Some(idx) => *idx,
            None => {
                // Title and tag set come from the first-encountered record of
                // the subject, not a union across its records.
                groups.push(BookmarkGroup {
                    subject_id: bm.subject_id.clone(),
                    title: group_title(bm),
                    tags: bm.tags.clone(),
                    bookmarks: Vec::new(),
                });
                group_index.insert(bm.subject_id.as_str(), groups.len() - 1);
                groups.len() - 1
            }
        };
        groups[idx].bookmarks.push((*bm).clone());
    }

    // Paginate groups, not individual records. Out-of-range pages yield an
    // empty slice rather than failing.
    let page_size = state.page_size.max(1);
    let total_pages = groups.len().div_ceil(page_size);
    let start = state.page.saturating_sub(1).saturating_mul(page_size);
    let mut page_groups: Vec<BookmarkGroup> = groups
        .into_iter()
        .skip(start)
        .take(page_size)
        .collect();

    for group in &mut page_groups {
        let sort = state.subject_sort(&group.subject_id);
        group.bookmarks.sort_by(|a, b| {
            let ordering = compare_by_key(a, b, sort.key);
            match sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    GroupedView {
        groups: page_groups,
        page: state.page,
        total_pages,
        page_size,
    }
}

/// The filter predicate: a record survives iff the search query is empty or
/// case-insensitively contained in its title, note or subtitle, or equals one
/// of its tags — and the tag filter, when set, equals one of its tags.
pub fn matches_filters(bm: &Bookmark, search_query: &str, tag_filter: Option<&str>) -> bool {
    let query = search_query.to_lowercase();
    let tags: Vec<String> = bm.tags.iter().map(|t| t.to_lowercase()).collect();

    let matches_query = query.is_empty()
        || lower_contains(bm.subject_title.as_deref(), &query)
        || lower_contains(bm.note.as_deref(), &query)
        || lower_contains(bm.subtitle.as_deref(), &query)
        || tags.iter().any(|t| *t == query);

    let matches_tag = match tag_filter {
        None => true,
        Some(tag) => {
            let tag = tag.to_lowercase();
            tags.iter().any(|t| *t == tag)
        }
    };

    matches_query && matches_tag
}

/// All distinct tags across the record set, trimmed, sorted and deduplicated.
/// Feeds the tag filter bar.
pub fn collect_tags(records: &[Bookmark]) -> Vec<String> {
    let mut tags: Vec<String> = records
        .iter()
        .flat_map(|bm| bm.tags.iter())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

fn lower_contains(field: Option<&str>, query: &str) -> bool {
    field
        .map(|s| s.to_lowercase().contains(query))
        .unwrap_or(false)
}

fn group_title(bm: &Bookmark) -> String {
    match &bm.subject_title {
        Some(title) => title.clone(),
        None => format!("Video {}", bm.subject_id),
    }
}

/// Compares two records by one sort key. String values compare
/// lexicographically; a missing string coerces both sides to numbers, with
/// non-numeric values counting as 0.
fn compare_by_key(a: &Bookmark, b: &Bookmark, key: SortKey) -> Ordering {
    match key {
        SortKey::AddedAt => a.added_at.cmp(&b.added_at),
        SortKey::Time => a.time.cmp(&b.time),
        SortKey::Note => match (a.note.as_deref(), b.note.as_deref()) {
            (Some(x), Some(y)) => x.cmp(y),
            (x, y) => numeric_value(x)
                .partial_cmp(&numeric_value(y))
                .unwrap_or(Ordering::Equal),
        },
    }
}

fn numeric_value(field: Option<&str>) -> f64 {
    field
        .and_then(|s| s.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}
