/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER so web
/// dashboards can hold IDs in a plain Number):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms, collision-free at enrollment scale)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Generate a learner-facing reference number for an enrollment record.
///
/// Format: `MSR-<course id>-<5 random digits>`. Shown on the confirmation
/// screen and used as a fallback transfer reference when no phone is given.
pub fn enrollment_reference(course_id: i64) -> String {
    use rand::Rng;
    let digits: u32 = rand::thread_rng().gen_range(10_000..100_000);
    format!("MSR-{}-{}", course_id, digits)
}
