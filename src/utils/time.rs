use chrono::Utc;

/// Current UTC date as `yyyy-MM-dd`.
pub fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}
