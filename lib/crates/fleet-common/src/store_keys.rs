/// Entity collection names.
pub mod collections {
    pub const AGENTS: &str = "agents";
    pub const TASKS: &str = "tasks";
    pub const CONFIGURATIONS: &str = "configurations";
}

/// Default namespace for store keys.
pub const DEFAULT_PREFIX: &str = "fleet";

/// Current-state hash of a collection.
/// Format: {prefix}:doc:{collection}
/// Field: entity UUID
/// Value: JSON-serialized entity
pub fn document_key(prefix: &str, collection: &str) -> String {
    format!("{prefix}:doc:{collection}")
}

/// Append-only history list of a collection.
/// Format: {prefix}:history:{collection}
/// Value: JSON-serialized HistoryRecord, oldest first
pub fn history_key(prefix: &str, collection: &str) -> String {
    format!("{prefix}:history:{collection}")
}

/// Snapshot file holding a whole collection as one JSON array.
pub fn snapshot_file_name(collection: &str) -> String {
    format!("{collection}.json")
}

/// Validate a key prefix: non-empty, `[a-z0-9_-]` segments separated by `:`.
pub fn validate_prefix(prefix: &str) -> Result<(), &'static str> {
    if prefix.is_empty() {
        return Err("prefix must not be empty");
    }
    if prefix.split(':').any(str::is_empty) {
        return Err("prefix must not contain empty segments");
    }
    if !prefix
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '-' | ':'))
    {
        return Err("prefix must match [a-z0-9_-] segments separated by ':'");
    }
    Ok(())
}
