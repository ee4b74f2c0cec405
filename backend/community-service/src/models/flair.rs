use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_BACKGROUND_COLOR: &str = "#edeff1";
pub const DEFAULT_TEXT_COLOR: &str = "#1c1c1c";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Flair {
    pub id: Uuid,
    pub subreddit_id: Uuid,
    pub text: String,
    pub background_color: String,
    pub text_color: String,
    pub flair_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFlairRequest {
    #[validate(length(min = 1, max = 64))]
    pub text: String,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateFlairRequest {
    #[validate(length(min = 1, max = 64))]
    pub text: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReorderFlairsRequest {
    pub flair_ids: Vec<Uuid>,
}

/// `#rrggbb` colour check
pub fn is_hex_color(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 7 && bytes[0] == b'#' && bytes[1..].iter().all(u8::is_ascii_hexdigit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert!(is_hex_color("#A0b1C2"));
        assert!(is_hex_color(DEFAULT_BACKGROUND_COLOR));
        assert!(!is_hex_color("A0b1C2"));
        assert!(!is_hex_color("#abc"));
        assert!(!is_hex_color("#gggggg"));
    }
}
