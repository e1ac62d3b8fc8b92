use uuid::Uuid;

/// Fresh opaque identifier for a new record (random UUID v4, hyphenated).
pub fn generate() -> String {
    Uuid::new_v4().to_string()
}
