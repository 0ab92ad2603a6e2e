//! The fixed set of read-only analytical reports.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{error::UnknownReport, record::RecordSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Report {
  MonthlyInspections,
  TopViolations,
  TopInspectors,
  TopFines,
  RiskLevels,
}

impl Report {
  pub const ALL: [Report; 5] = [
    Report::MonthlyInspections,
    Report::TopViolations,
    Report::TopInspectors,
    Report::TopFines,
    Report::RiskLevels,
  ];

  pub fn slug(self) -> &'static str {
    match self {
      Report::MonthlyInspections => "monthly-inspections",
      Report::TopViolations => "top-violations",
      Report::TopInspectors => "top-inspectors",
      Report::TopFines => "top-fines",
      Report::RiskLevels => "risk-levels",
    }
  }

  pub fn title(self) -> &'static str {
    match self {
      Report::MonthlyInspections => "Monthly Inspection Volume",
      Report::TopViolations => "Top 10 Violation Types",
      Report::TopInspectors => "Top 10 Active Inspectors",
      Report::TopFines => "Top 10 Establishments by Total Fines",
      Report::RiskLevels => "Risk Level Distribution",
    }
  }
}

impl fmt::Display for Report {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.slug()) }
}

impl FromStr for Report {
  type Err = UnknownReport;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Report::ALL
      .into_iter()
      .find(|r| r.slug() == s)
      .ok_or_else(|| UnknownReport(s.to_owned()))
  }
}

/// The rows behind one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportOutput {
  pub report: Report,
  pub title:  String,
  pub rows:   RecordSet,
}
