use chrono::Duration;

/// Compact token count: `420`, `1.2k`, `3.4M`.
pub fn format_count(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}k", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

pub fn format_percent(pct: f64) -> String {
    format!("{:.1}%", pct)
}

/// Elapsed time: `45m` under an hour, `2h05m` above.
pub fn format_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes().max(0);
    if minutes >= 60 {
        format!("{}h{:02}m", minutes / 60, minutes % 60)
    } else {
        format!("{}m", minutes)
    }
}

pub fn format_cost(usd: f64) -> String {
    format!("${:.2}", usd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_below_a_thousand_stay_exact() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
    }

    #[test]
    fn counts_scale_to_k_and_m() {
        assert_eq!(format_count(1_000), "1.0k");
        assert_eq!(format_count(161_300), "161.3k");
        assert_eq!(format_count(2_500_000), "2.5M");
    }

    #[test]
    fn percent_keeps_one_decimal() {
        assert_eq!(format_percent(4.2), "4.2%");
        assert_eq!(format_percent(100.0), "100.0%");
    }

    #[test]
    fn durations_split_at_one_hour() {
        assert_eq!(format_duration(Duration::minutes(45)), "45m");
        assert_eq!(format_duration(Duration::minutes(125)), "2h05m");
        assert_eq!(format_duration(Duration::minutes(-3)), "0m");
    }

    #[test]
    fn cost_renders_as_dollars() {
        assert_eq!(format_cost(0.4192), "$0.42");
        assert_eq!(format_cost(12.0), "$12.00");
    }
}
