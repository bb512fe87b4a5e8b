/// Current UTC timestamp in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for ephemeral draft IDs.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms, collision-free at
///     data-entry scale)
pub fn draft_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Generate a record ID for rows constructed before the store echoes
/// a server-assigned one.
pub fn record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Today's date in the ledger display format (day/month/year).
pub fn today() -> String {
    chrono::Local::now().format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_ids_are_positive_and_distinct() {
        let a = draft_id();
        let b = draft_id();
        assert!(a > 0);
        assert!(b > 0);
        // Same millisecond is possible; the random tail makes a
        // collision vanishingly unlikely.
        assert_ne!(a, b);
    }

    #[test]
    fn test_today_is_day_month_year() {
        let s = today();
        let parts: Vec<&str> = s.split('/').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 2);
        assert_eq!(parts[2].len(), 4);
    }
}
