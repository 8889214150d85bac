//! Display formatting helpers

/// Render whole seconds as `MM:SS`. Minutes are not capped at 99.
pub fn format_mm_ss(total_seconds: u64) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_both_fields() {
        assert_eq!(format_mm_ss(0), "00:00");
        assert_eq!(format_mm_ss(9), "00:09");
        assert_eq!(format_mm_ss(65), "01:05");
        assert_eq!(format_mm_ss(600), "10:00");
    }

    #[test]
    fn minutes_grow_past_two_digits() {
        assert_eq!(format_mm_ss(6000), "100:00");
    }
}
