//! Markers recognised inside user command text

/// Marks an entity as negatable; also prefixes the name of a negative entity
pub const NEGATIVE: &str = "~";

/// Marks an entity as a bucket (holds multiple values)
pub const BUCKET: &str = "#";

/// Separates entity content from its associated task name
pub const TASK_DELIMITER: &str = "//";

/// Switches entity listings to the compact debug text block
pub const DEBUG: &str = "!";

/// Name of the negative counterpart of `name`
pub fn negative_name(name: &str) -> String {
    format!("{NEGATIVE}{name}")
}

/// Whether `name` is the name of a negative entity
pub fn is_negative_name(name: &str) -> bool {
    name.starts_with(NEGATIVE)
}

/// Flags and fields parsed out of entity command text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityInput {
    pub content: String,
    pub task: Option<String>,
    pub bucket: bool,
    pub negatable: bool,
}

impl EntityInput {
    /// Split `text` into content and task, and read the marker flags.
    ///
    /// Markers are detected anywhere in the text and stripped from the content.
    pub fn parse(text: &str) -> Self {
        let bucket = text.contains(BUCKET);
        let negatable = text.contains(NEGATIVE);

        let mut segments = text.split(TASK_DELIMITER);
        let content = segments.next().unwrap_or_default();
        let task = segments.next();

        let content = content.replace(BUCKET, "").replace(NEGATIVE, "");
        let task = task
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        Self {
            content: content.trim().to_string(),
            task,
            bucket,
            negatable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_content() {
        let input = EntityInput::parse("city");
        assert_eq!(input.content, "city");
        assert_eq!(input.task, None);
        assert!(!input.bucket);
        assert!(!input.negatable);
    }

    #[test]
    fn test_parse_markers_and_task() {
        let input = EntityInput::parse("~#toppings // order");
        assert_eq!(input.content, "toppings");
        assert_eq!(input.task.as_deref(), Some("order"));
        assert!(input.bucket);
        assert!(input.negatable);
    }

    #[test]
    fn test_markers_in_task_still_count() {
        let input = EntityInput::parse("size//~drink");
        assert!(input.negatable);
        assert_eq!(input.content, "size");
    }

    #[test]
    fn test_task_stops_at_next_delimiter() {
        let input = EntityInput::parse("city // order // extra");
        assert_eq!(input.content, "city");
        assert_eq!(input.task.as_deref(), Some("order"));
    }

    #[test]
    fn test_negative_name() {
        assert_eq!(negative_name("city"), "~city");
        assert!(is_negative_name("~city"));
        assert!(!is_negative_name("city"));
    }
}
