use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

use encounter_engine::{DistributionReport, GenerateReport, LocateReport, QueryWarning};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Console,
    Json,
}

impl ReportFormat {
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Console
        }
    }
}

pub fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    let json_output = serde_json::to_string_pretty(value)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

fn write_warnings(out: &mut dyn Write, warnings: &[QueryWarning]) -> Result<()> {
    for warning in warnings {
        writeln!(out, "{} {warning}", "⚠️".yellow())?;
    }
    Ok(())
}

pub fn write_generate_console(out: &mut dyn Write, reports: &[GenerateReport]) -> Result<()> {
    let Some(first) = reports.first() else {
        writeln!(out, "No encounters generated.")?;
        return Ok(());
    };
    writeln!(
        out,
        "{}",
        format!("🌿 {} at {}", first.location, first.slot)
            .bright_cyan()
            .bold()
    )?;
    write_warnings(out, &first.warnings)?;
    for (idx, report) in reports.iter().enumerate() {
        let power = if report.power_active {
            " (power)".magenta().to_string()
        } else {
            String::new()
        };
        let name = if report.name == encounter_engine::constants::NONE_OUTCOME {
            report.name.dimmed()
        } else {
            report.name.green().bold()
        };
        writeln!(out, "{:>4}. {name}{power}", idx + 1)?;
    }
    Ok(())
}

pub fn write_distribution_console(out: &mut dyn Write, report: &DistributionReport) -> Result<()> {
    writeln!(
        out,
        "{}",
        format!("📊 {} at {}", report.location, report.slot)
            .bright_cyan()
            .bold()
    )?;
    writeln!(out, "{}", "-".repeat(40).cyan())?;
    write_warnings(out, &report.warnings)?;
    if report.entries.is_empty() {
        writeln!(out, "Nothing can be encountered.")?;
        return Ok(());
    }
    for row in &report.entries {
        writeln!(out, "{:<28} {:>9.4}%", row.name, row.percentage)?;
    }
    writeln!(out, "{:<28} {:>9.4}%", "Total".bold(), report.total_percentage())?;
    Ok(())
}

pub fn write_locate_console(out: &mut dyn Write, report: &LocateReport) -> Result<()> {
    writeln!(out, "{}", format!("🔎 {}", report.name).bright_cyan().bold())?;
    if report.locations.is_empty() {
        writeln!(out, "{}", "Not found in any location.".yellow())?;
    }
    for location in &report.locations {
        writeln!(out, "  - {location}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use encounter_engine::{DistributionRow, TimeSlot};

    fn render(write: impl FnOnce(&mut dyn Write) -> Result<()>) -> String {
        colored::control::set_override(false);
        let mut buffer: Vec<u8> = Vec::new();
        let out: &mut dyn Write = &mut buffer;
        write(out).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn report_format_defaults_to_console() {
        assert_eq!(ReportFormat::parse("JSON"), ReportFormat::Json);
        assert_eq!(ReportFormat::parse("markdown"), ReportFormat::Console);
    }

    #[test]
    fn distribution_console_lists_rows_and_total() {
        let report = DistributionReport {
            location: "Poco Path".to_string(),
            slot: TimeSlot::Day,
            entries: vec![
                DistributionRow {
                    name: "Lechonk".to_string(),
                    percentage: 66.6666,
                },
                DistributionRow {
                    name: "Pawmi".to_string(),
                    percentage: 33.3333,
                },
            ],
            warnings: vec![QueryWarning::PowerOutOfRange { level: 9 }],
        };
        let text = render(|out| write_distribution_console(out, &report));
        assert!(text.contains("Poco Path at Day"));
        assert!(text.contains("66.6666%"));
        assert!(text.contains("99.9999%"));
        assert!(text.contains("power level 9"));
    }

    #[test]
    fn generate_console_handles_empty_and_none() {
        assert!(render(|out| write_generate_console(out, &[])).contains("No encounters"));
        let report = GenerateReport {
            location: "Inlet Grotto".to_string(),
            slot: TimeSlot::Night,
            name: "None".to_string(),
            power_active: true,
            warnings: Vec::new(),
        };
        let text = render(|out| write_generate_console(out, &[report]));
        assert!(text.contains("1. None (power)"));
    }

    #[test]
    fn locate_console_reports_missing() {
        let report = LocateReport {
            name: "Mew".to_string(),
            locations: Vec::new(),
        };
        assert!(render(|out| write_locate_console(out, &report)).contains("Not found"));
    }

    #[test]
    fn json_is_pretty_printed() {
        let report = LocateReport {
            name: "Pawmi".to_string(),
            locations: vec!["Poco Path".to_string()],
        };
        let text = render(|out| write_json(out, &report));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["locations"][0], "Poco Path");
    }
}
