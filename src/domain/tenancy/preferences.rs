//! Organization display preferences.
//!
//! Only the fields billing needs to format invoices are modelled; the rest
//! of the preference record is carried through untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::OrganizationId;

/// Date layouts an organization can pick for its documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DateFormat {
    #[serde(rename = "MM/DD/YYYY")]
    MonthDayYearSlash,
    #[serde(rename = "DD/MM/YYYY")]
    DayMonthYearSlash,
    #[serde(rename = "YYYY/MM/DD")]
    YearMonthDaySlash,
    #[default]
    #[serde(rename = "YYYY-MM-DD")]
    YearMonthDayDash,
    #[serde(rename = "MM-DD-YYYY")]
    MonthDayYearDash,
    #[serde(rename = "DD-MM-YYYY")]
    DayMonthYearDash,
    #[serde(rename = "YYYY.MM.DD")]
    YearMonthDayDot,
    #[serde(rename = "DD.MM.YYYY")]
    DayMonthYearDot,
}

impl DateFormat {
    /// Parses a stored pattern; unknown patterns fall back to `YYYY-MM-DD`.
    pub fn parse_or_default(pattern: &str) -> Self {
        match pattern.trim() {
            "MM/DD/YYYY" => DateFormat::MonthDayYearSlash,
            "DD/MM/YYYY" => DateFormat::DayMonthYearSlash,
            "YYYY/MM/DD" => DateFormat::YearMonthDaySlash,
            "YYYY-MM-DD" => DateFormat::YearMonthDayDash,
            "MM-DD-YYYY" => DateFormat::MonthDayYearDash,
            "DD-MM-YYYY" => DateFormat::DayMonthYearDash,
            "YYYY.MM.DD" => DateFormat::YearMonthDayDot,
            "DD.MM.YYYY" => DateFormat::DayMonthYearDot,
            _ => DateFormat::default(),
        }
    }

    /// The pattern as stored in preferences.
    pub fn pattern(&self) -> &'static str {
        match self {
            DateFormat::MonthDayYearSlash => "MM/DD/YYYY",
            DateFormat::DayMonthYearSlash => "DD/MM/YYYY",
            DateFormat::YearMonthDaySlash => "YYYY/MM/DD",
            DateFormat::YearMonthDayDash => "YYYY-MM-DD",
            DateFormat::MonthDayYearDash => "MM-DD-YYYY",
            DateFormat::DayMonthYearDash => "DD-MM-YYYY",
            DateFormat::YearMonthDayDot => "YYYY.MM.DD",
            DateFormat::DayMonthYearDot => "DD.MM.YYYY",
        }
    }

    fn strftime(&self) -> &'static str {
        match self {
            DateFormat::MonthDayYearSlash => "%m/%d/%Y",
            DateFormat::DayMonthYearSlash => "%d/%m/%Y",
            DateFormat::YearMonthDaySlash => "%Y/%m/%d",
            DateFormat::YearMonthDayDash => "%Y-%m-%d",
            DateFormat::MonthDayYearDash => "%m-%d-%Y",
            DateFormat::DayMonthYearDash => "%d-%m-%Y",
            DateFormat::YearMonthDayDot => "%Y.%m.%d",
            DateFormat::DayMonthYearDot => "%d.%m.%Y",
        }
    }

    /// Formats the calendar date (UTC) of `at`.
    pub fn format(&self, at: &DateTime<Utc>) -> String {
        at.format(self.strftime()).to_string()
    }
}

/// Per-organization preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemPreference {
    pub organization_id: OrganizationId,
    pub language: String,
    pub date_format: DateFormat,
    pub time_zone: String,
    /// ISO 4217 code used when displaying amounts.
    pub currency: String,
    pub theme: String,
    pub is_setup_complete: bool,
}

impl SystemPreference {
    /// Preferences an organization gets before it has saved any.
    pub fn defaults_for(organization_id: OrganizationId) -> Self {
        Self {
            organization_id,
            language: "en".to_string(),
            date_format: DateFormat::default(),
            time_zone: "UTC".to_string(),
            currency: "USD".to_string(),
            theme: "light".to_string(),
            is_setup_complete: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 7, 18, 30, 0).unwrap()
    }

    #[test]
    fn every_pattern_formats_as_named() {
        let cases = [
            ("MM/DD/YYYY", "03/07/2024"),
            ("DD/MM/YYYY", "07/03/2024"),
            ("YYYY/MM/DD", "2024/03/07"),
            ("YYYY-MM-DD", "2024-03-07"),
            ("MM-DD-YYYY", "03-07-2024"),
            ("DD-MM-YYYY", "07-03-2024"),
            ("YYYY.MM.DD", "2024.03.07"),
            ("DD.MM.YYYY", "07.03.2024"),
        ];

        for (pattern, expected) in cases {
            let format = DateFormat::parse_or_default(pattern);
            assert_eq!(format.pattern(), pattern);
            assert_eq!(format.format(&sample()), expected, "pattern {}", pattern);
        }
    }

    #[test]
    fn unknown_pattern_falls_back_to_iso() {
        assert_eq!(DateFormat::parse_or_default("D MMM YY"), DateFormat::YearMonthDayDash);
        assert_eq!(DateFormat::parse_or_default(""), DateFormat::YearMonthDayDash);
    }

    #[test]
    fn date_format_serializes_as_pattern() {
        let json = serde_json::to_string(&DateFormat::DayMonthYearDot).unwrap();
        assert_eq!(json, "\"DD.MM.YYYY\"");
    }

    #[test]
    fn defaults_match_new_organization_settings() {
        let prefs = SystemPreference::defaults_for(OrganizationId::new());
        assert_eq!(prefs.language, "en");
        assert_eq!(prefs.date_format, DateFormat::YearMonthDayDash);
        assert_eq!(prefs.time_zone, "UTC");
        assert_eq!(prefs.currency, "USD");
        assert_eq!(prefs.theme, "light");
        assert!(!prefs.is_setup_complete);
    }
}
