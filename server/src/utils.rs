use rand::Rng;
use shared::MAX_NAME_LEN;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

// Get current timestamp in milliseconds
pub fn get_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_millis() as u64
}

// Random "#RRGGBB" color for a new bird
pub fn random_color() -> String {
    let value: u32 = rand::thread_rng().gen_range(0..=0xFF_FFFF);
    format!("#{:06X}", value)
}

// Trimmed player name cut to MAX_NAME_LEN characters, or a generated one
// when nothing usable was sent
pub fn player_name_or_default(name: &str, client_id: u32) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        format!("Player {}", client_id)
    } else {
        trimmed.chars().take(MAX_NAME_LEN).collect::<String>().trim_end().to_string()
    }
}
