pub mod comment;
pub mod session;

/// How long records live before the store's TTL sweep may purge them.
pub const RETENTION_SECS: i64 = 30 * 24 * 60 * 60;

/// Parses an id only in the lowercase hyphenated form ids are stored in.
/// Other spellings of the same UUID (simple, braced, URN, uppercase) are
/// rejected, since the stored string would not match them.
pub fn parse_record_id(raw: &str) -> Option<uuid::Uuid> {
    uuid::Uuid::parse_str(raw)
        .ok()
        .filter(|id| id.hyphenated().to_string() == raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_id_accepts_stored_form_only() {
        let id = uuid::Uuid::new_v4();
        let stored = id.to_string();

        assert_eq!(parse_record_id(&stored), Some(id));
        assert_eq!(parse_record_id(&id.simple().to_string()), None);
        assert_eq!(parse_record_id(&id.braced().to_string()), None);
        assert_eq!(parse_record_id(&id.urn().to_string()), None);
        assert_eq!(parse_record_id(&stored.to_uppercase()), None);
        assert_eq!(parse_record_id("not-a-uuid"), None);
    }
}
