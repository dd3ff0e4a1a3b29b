use deck_inventory::AppEntry;

/// Version line for an app row, e.g. "Version: 128.0 (4021)".
#[inline]
pub fn version_line(app: &AppEntry) -> String {
    format!("Version: {} ({})", app.version_name, app.version_code)
}

/// One list row: index, name, work badge, package id.
pub fn app_row(index: usize, app: &AppEntry) -> String {
    let badge = if app.is_work_profile { " [Work]" } else { "" };
    format!("{:>3}. {}{}  {}", index, app.display_name, badge, app.package_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slack(work: bool) -> AppEntry {
        AppEntry {
            display_name: "Slack".into(),
            package_id: "com.slack".into(),
            version_name: "24.01".into(),
            version_code: "310".into(),
            is_work_profile: work,
        }
    }

    #[test]
    fn test_version_line() {
        assert_eq!(version_line(&slack(false)), "Version: 24.01 (310)");
    }

    #[test]
    fn test_work_badge() {
        assert_eq!(app_row(1, &slack(true)), "  1. Slack [Work]  com.slack");
        assert_eq!(app_row(12, &slack(false)), " 12. Slack  com.slack");
    }
}
