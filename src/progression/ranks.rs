//! Learner ranks

/// Get a title/rank based on level
pub fn level_title(level: u32) -> &'static str {
    match level {
        1..=2 => "Novice",
        3..=4 => "Apprentice",
        5..=7 => "Scholar",
        8..=10 => "Adept",
        11..=14 => "Expert",
        15..=18 => "Master",
        19..=24 => "Sage",
        _ => "Luminary",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_title() {
        assert_eq!(level_title(1), "Novice");
        assert_eq!(level_title(2), "Novice");
        assert_eq!(level_title(3), "Apprentice");
        assert_eq!(level_title(5), "Scholar");
        assert_eq!(level_title(18), "Master");
        assert_eq!(level_title(25), "Luminary");
    }
}
