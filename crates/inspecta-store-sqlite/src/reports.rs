//! The five fixed aggregate queries behind the dashboard charts.

use inspecta_core::{
  report::{Report, ReportOutput},
  store::ReportStore,
};

use crate::{Result, SqliteStore, encode::collect_record_set};

fn report_sql(report: Report) -> &'static str {
  match report {
    // Every month between the first and last inspection, zero-filled.
    Report::MonthlyInspections => {
      "WITH RECURSIVE
         counts(month, cnt) AS (
           SELECT strftime('%Y-%m', inspection_date), COUNT(*)
           FROM inspection
           WHERE strftime('%Y-%m', inspection_date) IS NOT NULL
           GROUP BY 1
         ),
         months(month) AS (
           SELECT MIN(month) FROM counts
           UNION ALL
           SELECT strftime('%Y-%m', month || '-01', '+1 month')
           FROM months
           WHERE month < (SELECT MAX(month) FROM counts)
         )
       SELECT months.month AS month, COALESCE(counts.cnt, 0) AS cnt
       FROM months
       LEFT JOIN counts ON counts.month = months.month
       WHERE months.month IS NOT NULL
       ORDER BY months.month"
    }
    Report::TopViolations => {
      "SELECT point_id, COUNT(*) AS cnt
       FROM violation
       GROUP BY point_id
       ORDER BY cnt DESC
       LIMIT 10"
    }
    Report::TopInspectors => {
      "SELECT employee_id, COUNT(*) AS cnt
       FROM inspection
       GROUP BY employee_id
       ORDER BY cnt DESC
       LIMIT 10"
    }
    Report::TopFines => {
      "SELECT license_no, SUM(fine) AS total
       FROM violation
       JOIN inspection USING (inspection_id)
       GROUP BY license_no
       ORDER BY total DESC
       LIMIT 10"
    }
    Report::RiskLevels => {
      "SELECT CAST(risk_level AS TEXT) AS risk_level, COUNT(*) AS cnt
       FROM establishment
       GROUP BY risk_level"
    }
  }
}

impl ReportStore for SqliteStore {
  type Error = crate::Error;

  async fn run_report(&self, report: Report) -> Result<ReportOutput> {
    let sql = report_sql(report);

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        Ok(collect_record_set(&mut stmt, [])?)
      })
      .await?;

    tracing::debug!(%report, rows = rows.len(), "report computed");
    Ok(ReportOutput { report, title: report.title().to_owned(), rows })
  }
}
