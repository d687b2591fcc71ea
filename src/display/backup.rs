//! Backup display formatting

use chrono::Utc;

use crate::backup::BackupInfo;

/// Format the backup list, newest first, with ages
pub fn format_backup_list(backups: &[BackupInfo]) -> String {
    if backups.is_empty() {
        return "No backups found.\nCreate one with: journal backup create\n".to_string();
    }

    let mut output = String::new();
    output.push_str("Available Backups\n");
    output.push_str("=================\n\n");

    for (i, backup) in backups.iter().enumerate() {
        let age = match backup.created_at {
            Some(at) => format!("{} ago", format_duration(Utc::now() - at.as_datetime())),
            None => "unknown age".to_string(),
        };
        output.push_str(&format!("  {}. {} ({})\n", i + 1, backup.key, age));
    }

    output.push_str(&format!("\nTotal: {} backup(s)\n", backups.len()));
    output
}

/// Format a duration in human-readable form
pub fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    let months = days / 30;
    format!("{}mo", months)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Timestamp;
    use chrono::Duration;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::seconds(42)), "42s");
        assert_eq!(format_duration(Duration::minutes(5)), "5m");
        assert_eq!(format_duration(Duration::hours(3)), "3h");
        assert_eq!(format_duration(Duration::days(2)), "2d");
        assert_eq!(format_duration(Duration::days(65)), "2mo");
        assert_eq!(format_duration(Duration::seconds(-5)), "0s");
    }

    #[test]
    fn test_format_backup_list() {
        let at = Timestamp::parse("2025-01-15T10:30:00.000Z").unwrap();
        let backups = vec![
            BackupInfo {
                key: "promptJournal.backup.2025-01-15T10:30:00.000Z".into(),
                timestamp: "2025-01-15T10:30:00.000Z".into(),
                created_at: Some(at),
            },
            BackupInfo {
                key: "promptJournal.backup.legacy".into(),
                timestamp: "legacy".into(),
                created_at: None,
            },
        ];

        let output = format_backup_list(&backups);
        assert!(output.contains("1. promptJournal.backup.2025-01-15T10:30:00.000Z ("));
        assert!(output.contains("2. promptJournal.backup.legacy (unknown age)"));
        assert!(output.contains("Total: 2 backup(s)"));
    }

    #[test]
    fn test_format_empty_backup_list() {
        assert!(format_backup_list(&[]).starts_with("No backups found."));
    }
}
