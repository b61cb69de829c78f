//! Fixed-width text rendering of summaries.

use leasebot_core::storage::SummaryData;

use crate::engine::SummaryReport;

/// Width of the label column, colon included.
const LABEL_WIDTH: usize = 30;
/// Tildes on each side of the header title.
const HEADER_SIDE: usize = 18;

/// Render a freshly computed report.
pub fn render(report: &SummaryReport) -> String {
    render_data(&report.to_data())
}

/// Render summary data, e.g. a summary loaded back from the store.
pub fn render_data(data: &SummaryData) -> String {
    let side = "~".repeat(HEADER_SIDE);
    let header = format!("{side} SUMMARY {side}");
    let footer = "~".repeat(header.chars().count());

    let mut out = String::with_capacity(header.len() * (data.len() + 2));
    out.push_str(&header);
    out.push('\n');
    for (label, value) in data.iter() {
        let label = format!("{label}:");
        out.push_str(&format!("{label:<width$}{value}\n", width = LABEL_WIDTH));
    }
    out.push_str(&footer);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn header_and_footer_have_equal_width() {
        let text = render_data(&SummaryData::new());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "~~~~~~~~~~~~~~~~~~ SUMMARY ~~~~~~~~~~~~~~~~~~");
        assert_eq!(lines[1].len(), lines[0].len());
        assert!(lines[1].chars().all(|c| c == '~'));
    }

    #[test]
    fn labels_are_padded_to_thirty_columns() {
        let mut data = SummaryData::new();
        data.push("driven", "2714 km");
        let text = render_data(&data);
        let line = text.lines().nth(1).unwrap();
        assert_eq!(line, format!("{:<30}2714 km", "driven:"));
        assert_eq!(line.find("2714"), Some(30));
    }

    #[test]
    fn renders_full_report_in_order() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let report = crate::compute(start, 9, 8000, 2714, today).unwrap();
        let text = render(&report);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 13);
        assert!(lines[1].starts_with("contract:"));
        assert!(lines[1].ends_with("8000 km over 9 months"));
        assert!(lines[11].starts_with("daily average from now:"));
        assert!(text.contains("122 of 274 days"));
    }
}
