use serde::{Deserialize, Serialize};

use crate::types::errors::StoreError;

/// Color token applied by consumers when a bookmark carries none.
pub const DEFAULT_COLOR: &str = "#ffd54f";

/// A single timestamped annotation attached to a subject (video).
///
/// Serialized with camelCase keys so the JSON interchange format matches the
/// records produced by the viewer surfaces (`subjectId`, `addedAt`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    /// Store-assigned identifier, unique and immutable for the record's lifetime.
    pub id: i64,
    /// Identifier of the parent video/content. Required, non-empty.
    pub subject_id: String,
    #[serde(default)]
    pub subject_title: Option<String>,
    /// Position within the subject, in seconds.
    #[serde(default)]
    pub time: u32,
    /// Precomputed "minutes:seconds" rendering; recomputed from `time` when absent.
    #[serde(default)]
    pub time_label: Option<String>,
    /// Free-text note; may contain simple rich-text markup.
    #[serde(default)]
    pub note: Option<String>,
    /// Captured context text (transcript snippet).
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub color: Option<String>,
    /// Epoch milliseconds, set once at creation and never mutated.
    pub added_at: i64,
    /// Optional data-URI screenshot, immutable after creation.
    #[serde(default)]
    pub image_data: Option<String>,
}

impl Bookmark {
    /// The "minutes:seconds" label, recomputed from `time` when none was stored.
    pub fn display_time_label(&self) -> String {
        match &self.time_label {
            Some(label) => label.clone(),
            None => format_time(self.time),
        }
    }

    /// The color token, falling back to [`DEFAULT_COLOR`].
    pub fn display_color(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_COLOR)
    }
}

/// A bookmark record as supplied by callers on create or import — no `id`.
///
/// Unknown fields (including a supplied `id`) are silently dropped during
/// deserialization, so imported records never collide with store-assigned ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBookmark {
    pub subject_id: String,
    #[serde(default)]
    pub subject_title: Option<String>,
    #[serde(default)]
    pub time: u32,
    #[serde(default)]
    pub time_label: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub color: Option<String>,
    /// Stamped by the creating caller; preserved verbatim on import.
    #[serde(default)]
    pub added_at: i64,
    #[serde(default)]
    pub image_data: Option<String>,
}

impl NewBookmark {
    /// Creates a record for the given subject and position, stamped with the
    /// current wall-clock time.
    pub fn at(subject_id: impl Into<String>, time: u32) -> Self {
        Self {
            subject_id: subject_id.into(),
            time,
            time_label: Some(format_time(time)),
            added_at: now_millis(),
            ..Self::default()
        }
    }

    /// Schema validation: `subject_id` must be non-empty. Nothing else is
    /// mandatory, and no defaults are invented here.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.subject_id.trim().is_empty() {
            return Err(StoreError::Validation(
                "subjectId must be a non-empty string".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<Bookmark> for NewBookmark {
    fn from(bm: Bookmark) -> Self {
        Self {
            subject_id: bm.subject_id,
            subject_title: bm.subject_title,
            time: bm.time,
            time_label: bm.time_label,
            note: bm.note,
            subtitle: bm.subtitle,
            tags: bm.tags,
            color: bm.color,
            added_at: bm.added_at,
            image_data: bm.image_data,
        }
    }
}

/// Partial-field patch with merge semantics: only provided fields change.
///
/// `id`, `subject_id`, `added_at` and `image_data` are immutable and therefore
/// not representable here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkPatch {
    #[serde(default)]
    pub subject_title: Option<String>,
    #[serde(default)]
    pub time: Option<u32>,
    #[serde(default)]
    pub time_label: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub color: Option<String>,
}

impl BookmarkPatch {
    /// Merges the provided fields over `target`, leaving all others untouched.
    pub fn apply(&self, target: &mut Bookmark) {
        if let Some(title) = &self.subject_title {
            target.subject_title = Some(title.clone());
        }
        if let Some(time) = self.time {
            target.time = time;
        }
        if let Some(label) = &self.time_label {
            target.time_label = Some(label.clone());
        }
        if let Some(note) = &self.note {
            target.note = Some(note.clone());
        }
        if let Some(subtitle) = &self.subtitle {
            target.subtitle = Some(subtitle.clone());
        }
        if let Some(tags) = &self.tags {
            target.tags = tags.clone();
        }
        if let Some(color) = &self.color {
            target.color = Some(color.clone());
        }
    }
}

/// Renders a position in seconds as "minutes:seconds", e.g. `125` -> `"2:05"`.
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Current UNIX timestamp in milliseconds.
pub fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
