//! Output filename generation.

use std::sync::{Mutex, PoisonError};

use chrono::Local;
use tracing::debug;

/// Extension of every file the transformer produces.
pub const OUTPUT_EXTENSION: &str = ".png";

/// Prefix for generated filenames.
pub const GENERATED_PREFIX: &str = "processed_image_";

/// Second-precision timestamp layout used in generated names.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Process-wide sequence shared by every generated name.
static PROCESS_SEQUENCE: NameSequence = NameSequence::new();

/// Returns the filename to save the result under.
///
/// A non-blank `custom` name is used as given, with `.png` appended unless it
/// already ends with it. Otherwise the name is
/// `processed_image_<yyyyMMdd_HHmmss>.png`; repeated calls within the same
/// second get `_2`, `_3`, ... so names never collide within one process.
///
/// # Examples
///
/// ```
/// use noir_core::output::generate_output_filename;
///
/// assert_eq!(generate_output_filename(Some("cat")), "cat.png");
/// assert_eq!(generate_output_filename(Some("cat.png")), "cat.png");
/// assert!(generate_output_filename(None).starts_with("processed_image_"));
/// ```
#[must_use]
pub fn generate_output_filename(custom: Option<&str>) -> String {
    if let Some(name) = custom.map(str::trim).filter(|name| !name.is_empty()) {
        let name = if has_output_extension(name) {
            name.to_string()
        } else {
            format!("{name}{OUTPUT_EXTENSION}")
        };
        debug!(filename = %name, "using custom output filename");
        return name;
    }

    let filename =
        PROCESS_SEQUENCE.next_name(|| Local::now().format(TIMESTAMP_FORMAT).to_string());
    debug!(filename = %filename, "generated output filename");
    filename
}

fn has_output_extension(name: &str) -> bool {
    name.len() >= OUTPUT_EXTENSION.len()
        && name.is_char_boundary(name.len() - OUTPUT_EXTENSION.len())
        && name[name.len() - OUTPUT_EXTENSION.len()..].eq_ignore_ascii_case(OUTPUT_EXTENSION)
}

/// Remembers the last timestamp handed out and how many names used it.
struct NameSequence {
    last: Mutex<Option<(String, u32)>>,
}

impl NameSequence {
    const fn new() -> Self {
        Self {
            last: Mutex::new(None),
        }
    }

    /// Reads the clock while holding the lock so concurrent callers are ordered.
    fn next_name(&self, now: impl FnOnce() -> String) -> String {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let timestamp = now();

        let sequence = match last.as_mut() {
            Some((previous, count)) if *previous == timestamp => {
                *count += 1;
                *count
            }
            _ => {
                *last = Some((timestamp.clone(), 1));
                1
            }
        };

        if sequence == 1 {
            format!("{GENERATED_PREFIX}{timestamp}{OUTPUT_EXTENSION}")
        } else {
            format!("{GENERATED_PREFIX}{timestamp}_{sequence}{OUTPUT_EXTENSION}")
        }
    }
}
