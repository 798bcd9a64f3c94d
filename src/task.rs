//! Task records and the helpers tied to them: id generation and the
//! background-color contrast rule used when rendering cards.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// The fixed set of task categories offered by the form.
pub const TASK_KINDS: &[&str] = &["Work", "Personal", "Errand", "Shopping", "Other"];

/// A single to-do record. `kind` is stored as `type` in the persisted JSON.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub color: String,
}

/// Unvalidated field values from the form, before they become a `Task`.
#[derive(Debug, Default, Clone)]
pub struct TaskDraft {
    pub name: String,
    pub kind: String,
    pub description: String,
    pub color: String,
}

impl TaskDraft {
    /// The first required field that is empty, if any. Only presence is
    /// checked; `kind` membership and `color` format stay unvalidated.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("name")
        } else if self.kind.trim().is_empty() {
            Some("type")
        } else {
            None
        }
    }

    pub fn into_task(self, id: String) -> Task {
        Task {
            id,
            name: self.name.trim().to_string(),
            kind: self.kind,
            description: self.description.trim().to_string(),
            color: self.color,
        }
    }
}

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a fresh task id from the creation timestamp plus a process-wide
/// counter, so rapid successive creates never collide.
pub fn next_task_id() -> String {
    let millis = chrono::Local::now().timestamp_millis();
    let n = ID_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{millis}-{n}")
}

/// Decode a `#rrggbb` string into channel values.
pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Perceived brightness on the 0-255 scale: (299R + 587G + 114B) / 1000.
pub fn luminance(r: u8, g: u8, b: u8) -> u32 {
    (299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b)) / 1000
}

/// Whether a card with this background needs white text to stay readable.
/// Unparseable colors get the default dark text.
pub fn needs_light_text(color: &str) -> bool {
    match parse_hex_color(color) {
        Some((r, g, b)) => luminance(r, g, b) < 128,
        None => false,
    }
}
