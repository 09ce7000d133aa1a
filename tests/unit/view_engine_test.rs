//! Unit tests for the pure view engine and the caller-owned view state.

use rstest::rstest;

use timemark::services::view_engine::{build_view, collect_tags, matches_filters};
use timemark::types::bookmark::{format_time, Bookmark};
use timemark::types::view::{GroupSortOrder, SortDirection, SortKey, ViewState, DEFAULT_PAGE_SIZE};

fn bm(id: i64, subject_id: &str, added_at: i64) -> Bookmark {
    Bookmark {
        id,
        subject_id: subject_id.to_string(),
        subject_title: Some(format!("Title {}", subject_id)),
        time: 0,
        time_label: None,
        note: None,
        subtitle: None,
        tags: Vec::new(),
        color: None,
        added_at,
        image_data: None,
    }
}

// ─── Filtering ───

#[test]
fn test_empty_search_query_matches_everything() {
    let records = vec![bm(1, "a", 1), bm(2, "b", 2)];
    let view = build_view(&records, &ViewState::default());
    assert_eq!(view.groups.len(), 2);
}

#[test]
fn test_search_matches_title_note_subtitle_case_insensitively() {
    let mut with_note = bm(1, "a", 1);
    with_note.note = Some("Remember THIS part".to_string());
    let mut with_subtitle = bm(2, "b", 2);
    with_subtitle.subtitle = Some("never gonna give you up".to_string());
    let unrelated = bm(3, "c", 3);

    let records = vec![with_note, with_subtitle, unrelated];

    let mut state = ViewState::default();
    state.set_search_query("this");
    assert_eq!(build_view(&records, &state).groups.len(), 1);

    state.set_search_query("GONNA");
    let view = build_view(&records, &state);
    assert_eq!(view.groups.len(), 1);
    assert_eq!(view.groups[0].subject_id, "b");

    state.set_search_query("Title c");
    assert_eq!(build_view(&records, &state).groups.len(), 1);
}

#[test]
fn test_search_matches_tags_by_equality_not_substring() {
    let mut tagged = bm(1, "a", 1);
    tagged.tags = vec!["music".to_string()];
    let records = vec![tagged];

    let mut state = ViewState::default();
    state.set_search_query("music");
    assert_eq!(build_view(&records, &state).groups.len(), 1);

    // A tag only matches the query exactly, not as a substring.
    state.set_search_query("mus");
    assert_eq!(build_view(&records, &state).groups.len(), 0);
}

#[test]
fn test_tag_filter_exact_case_insensitive() {
    let mut music = bm(1, "a", 1);
    music.tags = vec!["Music".to_string()];
    let mut history = bm(2, "b", 2);
    history.tags = vec!["history".to_string()];
    let records = vec![music, history];

    let mut state = ViewState::default();
    state.toggle_tag_filter("music");
    let view = build_view(&records, &state);
    assert_eq!(view.groups.len(), 1);
    assert_eq!(view.groups[0].subject_id, "a");
}

#[test]
fn test_record_without_tags_is_treated_as_having_none() {
    let records = vec![bm(1, "a", 1)];
    assert!(!matches_filters(&records[0], "", Some("music")));
    assert!(matches_filters(&records[0], "", None));
}

// ─── View state transitions ───

#[test]
fn test_toggling_same_tag_filter_clears_it() {
    let mut state = ViewState::default();
    state.toggle_tag_filter("music");
    assert_eq!(state.tag_filter.as_deref(), Some("music"));
    state.toggle_tag_filter("music");
    assert_eq!(state.tag_filter, None);
}

#[test]
fn test_search_and_tag_filter_are_mutually_exclusive() {
    let mut state = ViewState::default();
    state.toggle_tag_filter("music");
    state.set_search_query("query");
    assert_eq!(state.tag_filter, None);
    assert_eq!(state.search_query, "query");

    state.toggle_tag_filter("history");
    assert!(state.search_query.is_empty());
    assert_eq!(state.tag_filter.as_deref(), Some("history"));
}

#[test]
fn test_toggle_subject_sort_flips_direction_on_same_key() {
    let mut state = ViewState::default();

    // Fresh selection of a non-addedAt key starts ascending.
    state.toggle_subject_sort("vid1", SortKey::Time);
    let sort = state.subject_sort("vid1");
    assert_eq!(sort.key, SortKey::Time);
    assert_eq!(sort.direction, SortDirection::Asc);

    state.toggle_subject_sort("vid1", SortKey::Time);
    assert_eq!(state.subject_sort("vid1").direction, SortDirection::Desc);

    // Selecting addedAt afresh starts descending.
    state.toggle_subject_sort("vid1", SortKey::AddedAt);
    let sort = state.subject_sort("vid1");
    assert_eq!(sort.key, SortKey::AddedAt);
    assert_eq!(sort.direction, SortDirection::Desc);

    // Other subjects keep their independent default.
    assert_eq!(state.subject_sort("vid2").key, SortKey::AddedAt);
}

#[rstest]
#[case(5)]
#[case(10)]
#[case(20)]
#[case(30)]
fn test_allowed_page_sizes_accepted(#[case] size: usize) {
    let mut state = ViewState::default();
    state.set_page(3);
    assert!(state.set_page_size(size));
    assert_eq!(state.page_size, size);
    assert_eq!(state.page, 1, "changing page size resets to the first page");
}

#[rstest]
#[case(0)]
#[case(7)]
#[case(100)]
fn test_disallowed_page_sizes_rejected(#[case] size: usize) {
    let mut state = ViewState::default();
    assert!(!state.set_page_size(size));
    assert_eq!(state.page_size, DEFAULT_PAGE_SIZE);
}

// ─── Grouping and pagination ───

/// 12 records across 4 subjects with page size 2: two pages of groups, and the
/// second page holds exactly the groups missing from the first.
#[test]
fn test_group_pagination_splits_groups_not_records() {
    let mut records = Vec::new();
    for (i, subject) in ["s1", "s2", "s3", "s4"].iter().enumerate() {
        for j in 0..3 {
            records.push(bm((i * 3 + j) as i64, subject, (i as i64) * 100 + j as i64));
        }
    }
    assert_eq!(records.len(), 12);

    let mut state = ViewState::default();
    state.page_size = 2;

    let page1 = build_view(&records, &state);
    assert_eq!(page1.total_pages, 2);
    assert_eq!(page1.groups.len(), 2);

    state.set_page(2);
    let page2 = build_view(&records, &state);
    assert_eq!(page2.groups.len(), 2);

    let mut seen: Vec<String> = page1
        .groups
        .iter()
        .chain(page2.groups.iter())
        .map(|g| g.subject_id.clone())
        .collect();
    seen.sort();
    assert_eq!(seen, vec!["s1", "s2", "s3", "s4"]);

    // Newest-first: s4 has the largest addedAt values, so it leads page 1.
    assert_eq!(page1.groups[0].subject_id, "s4");
    assert_eq!(page1.groups[1].subject_id, "s3");
}

#[test]
fn test_group_order_follows_group_sort_order() {
    let records = vec![bm(1, "old", 100), bm(2, "new", 200)];

    let mut state = ViewState::default();
    let view = build_view(&records, &state);
    assert_eq!(view.groups[0].subject_id, "new");

    state.toggle_group_sort_order();
    assert_eq!(state.group_sort_order, GroupSortOrder::OldestFirst);
    let view = build_view(&records, &state);
    assert_eq!(view.groups[0].subject_id, "old");
}

#[test]
fn test_out_of_range_page_yields_empty_slice() {
    let records = vec![bm(1, "a", 1)];
    let mut state = ViewState::default();
    state.set_page(99);
    let view = build_view(&records, &state);
    assert!(view.groups.is_empty());
    assert_eq!(view.total_pages, 1);
    assert_eq!(view.page, 99);
}

#[test]
fn test_empty_record_set_has_zero_pages() {
    let view = build_view(&[], &ViewState::default());
    assert!(view.groups.is_empty());
    assert_eq!(view.total_pages, 0);
}

#[test]
fn test_group_title_falls_back_to_placeholder() {
    let mut untitled = bm(1, "abc123", 1);
    untitled.subject_title = None;
    let view = build_view(&[untitled], &ViewState::default());
    assert_eq!(view.groups[0].title, "Video abc123");
}

#[test]
fn test_group_tags_come_from_first_encountered_record() {
    let mut newer = bm(1, "a", 200);
    newer.tags = vec!["newer".to_string()];
    let mut older = bm(2, "a", 100);
    older.tags = vec!["older".to_string()];

    // Newest-first: the newer record is encountered first and donates the
    // group's displayed tags.
    let view = build_view(&[older.clone(), newer.clone()], &ViewState::default());
    assert_eq!(view.groups[0].tags, vec!["newer".to_string()]);

    let mut state = ViewState::default();
    state.toggle_group_sort_order();
    let view = build_view(&[older, newer], &state);
    assert_eq!(view.groups[0].tags, vec!["older".to_string()]);
}

// ─── Per-subject member sort ───

#[test]
fn test_member_sort_by_time_asc_then_desc_reverses_exactly() {
    let mut records = Vec::new();
    for (i, time) in [240u32, 43, 120, 60].iter().enumerate() {
        let mut record = bm(i as i64, "vid1", i as i64);
        record.time = *time;
        records.push(record);
    }

    let mut state = ViewState::default();
    state.toggle_subject_sort("vid1", SortKey::Time);
    let asc = build_view(&records, &state);
    let times_asc: Vec<u32> = asc.groups[0].bookmarks.iter().map(|b| b.time).collect();
    assert_eq!(times_asc, vec![43, 60, 120, 240]);

    state.toggle_subject_sort("vid1", SortKey::Time);
    let desc = build_view(&records, &state);
    let times_desc: Vec<u32> = desc.groups[0].bookmarks.iter().map(|b| b.time).collect();
    assert_eq!(times_desc, vec![240, 120, 60, 43]);
}

#[test]
fn test_default_member_sort_is_added_at_desc() {
    let records = vec![bm(1, "vid1", 100), bm(2, "vid1", 300), bm(3, "vid1", 200)];
    let view = build_view(&records, &ViewState::default());
    let added: Vec<i64> = view.groups[0].bookmarks.iter().map(|b| b.added_at).collect();
    assert_eq!(added, vec![300, 200, 100]);
}

#[test]
fn test_note_sort_is_lexicographic_between_strings() {
    let mut a = bm(1, "vid1", 1);
    a.note = Some("banana".to_string());
    let mut b = bm(2, "vid1", 2);
    b.note = Some("apple".to_string());
    // Two numeric-looking strings still compare lexicographically.
    let mut c = bm(3, "vid1", 3);
    c.note = Some("10".to_string());

    let mut state = ViewState::default();
    state.toggle_subject_sort("vid1", SortKey::Note);

    let view = build_view(&[a, b, c], &state);
    let notes: Vec<Option<String>> = view.groups[0]
        .bookmarks
        .iter()
        .map(|bm| bm.note.clone())
        .collect();
    assert_eq!(notes[0].as_deref(), Some("10"));
    assert_eq!(notes[1].as_deref(), Some("apple"));
    assert_eq!(notes[2].as_deref(), Some("banana"));
}

#[test]
fn test_note_sort_missing_value_coerces_to_zero() {
    let mut present = bm(1, "vid1", 1);
    present.note = Some("5".to_string());
    let mut missing = bm(2, "vid1", 2);
    missing.note = None;

    let mut state = ViewState::default();
    state.toggle_subject_sort("vid1", SortKey::Note);

    // Ascending: the missing note counts as 0 and sorts before "5".
    let view = build_view(&[present, missing], &state);
    assert_eq!(view.groups[0].bookmarks[0].note, None);
    assert_eq!(view.groups[0].bookmarks[1].note.as_deref(), Some("5"));
}

// ─── Helpers ───

#[test]
fn test_collect_tags_sorted_and_deduplicated() {
    let mut a = bm(1, "a", 1);
    a.tags = vec!["music".to_string(), " rickroll ".to_string()];
    let mut b = bm(2, "b", 2);
    b.tags = vec!["history".to_string(), "music".to_string(), "".to_string()];

    let tags = collect_tags(&[a, b]);
    assert_eq!(tags, vec!["history", "music", "rickroll"]);
}

#[test]
fn test_format_time_renders_minutes_and_padded_seconds() {
    assert_eq!(format_time(0), "0:00");
    assert_eq!(format_time(43), "0:43");
    assert_eq!(format_time(125), "2:05");
    assert_eq!(format_time(3600), "60:00");
}

#[test]
fn test_clear_filters_resets_query_tag_and_page() {
    let mut state = ViewState::default();
    state.set_search_query("query");
    state.set_page(4);
    state.clear_filters();
    assert!(state.search_query.is_empty());
    assert_eq!(state.tag_filter, None);
    assert_eq!(state.page, 1);
}

#[test]
fn test_display_helpers_fall_back_when_fields_missing() {
    let mut record = bm(1, "a", 1);
    record.time = 125;
    assert_eq!(record.display_time_label(), "2:05");
    assert_eq!(record.display_color(), "#ffd54f");

    record.time_label = Some("2:05 (drop)".to_string());
    record.color = Some("#2196f3".to_string());
    assert_eq!(record.display_time_label(), "2:05 (drop)");
    assert_eq!(record.display_color(), "#2196f3");
}
