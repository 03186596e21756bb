//! Pure text formatting for dashboard widgets.
//!
//! No ratatui styles live here; widgets decide how to color the pieces.

use chrono::{DateTime, TimeZone};

use crate::provider::weather::WeatherReport;

/// Date line, e.g. `"October 17, 2026"`.
pub fn format_date<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%B %-d, %Y").to_string()
}

/// 12-hour clock with two-digit hour, e.g. `"02:05 PM"`.
pub fn format_clock<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%I:%M %p").to_string()
}

/// Fields extracted from a weather payload, already unit-suffixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherSummary {
    /// `"72°F"`
    pub temperature: String,
    /// `"Sunny"`
    pub conditions: String,
    /// Next forecast period's `(low, high)`, if the payload has one.
    pub range: Option<(String, String)>,
}

impl WeatherSummary {
    /// Extracts the summary from the first record of `report`.
    ///
    /// Returns `None` for an empty payload.
    pub fn from_report(report: &WeatherReport) -> Option<Self> {
        let record = report.first()?;
        let unit = record.location.degreetype.trim();
        let degrees = |v: &dyn std::fmt::Display| format!("{}°{}", v, unit);

        Some(Self {
            temperature: degrees(&record.current.temperature),
            conditions: record.current.skytext.clone(),
            range: record
                .forecast
                .get(1)
                .map(|f| (degrees(&f.low), degrees(&f.high))),
        })
    }
}

impl std::fmt::Display for WeatherSummary {
    /// `"72°F and Sunny (60°F -> 80°F)"`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} and {}", self.temperature, self.conditions)?;
        if let Some((low, high)) = &self.range {
            write!(f, " ({} -> {})", low, high)?;
        }
        Ok(())
    }
}
