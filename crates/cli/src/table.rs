//! Terminal rendering of status reports and job listings.

use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};

use casebook_core::catalog::AssetStatus;
use casebook_core::external::RecognitionJob;
use casebook_core::StatusReport;

/// Titles longer than this are cut to keep rows on one line.
const MAX_TITLE_CHARS: usize = 48;

fn status_color(status: AssetStatus) -> Color {
    match status {
        AssetStatus::Complete => Color::Green,
        AssetStatus::Pending => Color::Yellow,
        AssetStatus::InProcess => Color::Cyan,
        AssetStatus::Missing => Color::Red,
        AssetStatus::Any => Color::Reset,
    }
}

/// Shortens `title` to at most [`MAX_TITLE_CHARS`] characters.
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() <= MAX_TITLE_CHARS {
        return title.to_string();
    }
    let kept: String = title.chars().take(MAX_TITLE_CHARS - 3).collect();
    format!("{}...", kept.trim_end())
}

/// Season, Episode, Title, Status rows with a Total footer. Status cells
/// are coloured when printed to a terminal.
pub fn status_table(report: &StatusReport) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Season", "Episode", "Title", "Status"]);

    for row in &report.rows {
        table.add_row(vec![
            Cell::new(row.season),
            Cell::new(row.episode),
            Cell::new(truncate_title(&row.title)),
            Cell::new(row.status.label()).fg(status_color(row.status)),
        ]);
    }

    table.add_row(vec![
        Cell::new(""),
        Cell::new(""),
        Cell::new("Total"),
        Cell::new(report.total),
    ]);
    table
}

pub fn jobs_table(jobs: &[RecognitionJob]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Job", "Status", "Episode", "Created"]);

    for job in jobs {
        table.add_row(vec![
            job.id.clone(),
            format!("{:?}", job.status).to_lowercase(),
            job.user_token.clone().unwrap_or_default(),
            job.created
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use casebook_core::catalog::AssetType;
    use casebook_core::external::JobStatus;
    use casebook_core::StatusRow;

    fn report() -> StatusReport {
        StatusReport {
            asset_type: AssetType::Video,
            filter: AssetStatus::Any,
            rows: vec![
                StatusRow {
                    season: 1,
                    episode: 1,
                    title: "Green River".to_string(),
                    status: AssetStatus::Complete,
                },
                StatusRow {
                    season: 1,
                    episode: 2,
                    title: "Night Stalker".to_string(),
                    status: AssetStatus::Missing,
                },
            ],
            total: 2,
        }
    }

    #[test]
    fn test_status_table_has_rows_and_total() {
        let rendered = status_table(&report()).to_string();
        assert!(rendered.contains("Green River"));
        assert!(rendered.contains("Missing"));
        assert!(rendered.contains("Total"));
        assert!(rendered.contains("Season"));
    }

    #[test]
    fn test_truncate_title() {
        assert_eq!(truncate_title("Short"), "Short");
        let long = "A".repeat(60);
        let cut = truncate_title(&long);
        assert_eq!(cut.chars().count(), MAX_TITLE_CHARS);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_jobs_table() {
        let jobs = vec![RecognitionJob {
            id: "4bd734c0".to_string(),
            status: JobStatus::Processing,
            user_token: Some("01-01-green-river".to_string()),
            created: None,
            updated: None,
            results: vec![],
        }];
        let rendered = jobs_table(&jobs).to_string();
        assert!(rendered.contains("processing"));
        assert!(rendered.contains("01-01-green-river"));
    }
}
