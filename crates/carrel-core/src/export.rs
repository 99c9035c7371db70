//! CSV export of the back-office lists.
//!
//! Each exporter renders the rows the way the list views show them, with a
//! header row, ready to hand to a spreadsheet. Optional fields come out as
//! empty cells rather than a placeholder.

use crate::{
  consultation::Consultation,
  error::{Error, Result},
  franchise::FranchiseInquiry,
  payment::Payment,
};

const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M";

pub fn consultations_csv(rows: &[Consultation]) -> Result<String> {
  let mut wtr = csv::Writer::from_writer(Vec::new());
  wtr.write_record([
    "created", "student", "phone", "grade", "preferred date", "status",
    "message", "memo",
  ])?;
  for c in rows {
    wtr.write_record([
      c.created_at.format(TIMESTAMP_FMT).to_string(),
      c.student_name.clone(),
      c.phone.clone(),
      c.grade.clone().unwrap_or_default(),
      c.preferred_date.map(|d| d.to_string()).unwrap_or_default(),
      c.status.label().to_owned(),
      c.message.clone().unwrap_or_default(),
      c.memo.clone().unwrap_or_default(),
    ])?;
  }
  finish(wtr)
}

pub fn franchise_csv(rows: &[FranchiseInquiry]) -> Result<String> {
  let mut wtr = csv::Writer::from_writer(Vec::new());
  wtr.write_record([
    "created", "applicant", "phone", "email", "region", "budget", "status",
    "message", "memo",
  ])?;
  for i in rows {
    wtr.write_record([
      i.created_at.format(TIMESTAMP_FMT).to_string(),
      i.applicant_name.clone(),
      i.phone.clone(),
      i.email.clone().unwrap_or_default(),
      i.region.clone(),
      i.budget.clone().unwrap_or_default(),
      i.status.label().to_owned(),
      i.message.clone().unwrap_or_default(),
      i.memo.clone().unwrap_or_default(),
    ])?;
  }
  finish(wtr)
}

pub fn payments_csv(rows: &[Payment]) -> Result<String> {
  let mut wtr = csv::Writer::from_writer(Vec::new());
  wtr.write_record([
    "requested", "order id", "customer", "plan", "amount", "status",
    "approved",
  ])?;
  for p in rows {
    wtr.write_record([
      p.requested_at.format(TIMESTAMP_FMT).to_string(),
      p.order_id.clone(),
      p.customer_name.clone(),
      p.plan.clone(),
      p.amount.to_string(),
      p.status.label().to_owned(),
      p.approved_at
        .map(|t| t.format(TIMESTAMP_FMT).to_string())
        .unwrap_or_default(),
    ])?;
  }
  finish(wtr)
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
  let bytes = wtr.into_inner().map_err(|e| Error::Export(e.to_string()))?;
  String::from_utf8(bytes).map_err(|e| Error::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::consultation::ConsultationStatus;

  fn consultation(name: &str, memo: Option<&str>) -> Consultation {
    Consultation {
      id: Uuid::new_v4(),
      student_name: name.into(),
      phone: "010-1234-5678".into(),
      grade: Some("high 1".into()),
      preferred_date: None,
      message: None,
      status: ConsultationStatus::Pending,
      memo: memo.map(Into::into),
      created_at: Utc.with_ymd_and_hms(2026, 3, 9, 5, 0, 0).unwrap(),
    }
  }

  #[test]
  fn header_row_comes_first() {
    let csv = consultations_csv(&[]).unwrap();
    let first = csv.lines().next().unwrap();
    assert!(first.starts_with("created,student,phone"));
    assert_eq!(csv.lines().count(), 1);
  }

  #[test]
  fn one_line_per_row_after_the_header() {
    let rows =
      vec![consultation("Avery Lee", None), consultation("Jules Moreno", None)];
    let csv = consultations_csv(&rows).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.contains("Avery Lee"));
    assert!(csv.contains("010-1234-5678"));
  }

  #[test]
  fn memo_with_comma_is_quoted() {
    let rows = vec![consultation("Avery Lee", Some("call mom, then dad"))];
    let csv = consultations_csv(&rows).unwrap();
    assert!(csv.contains("\"call mom, then dad\""));
  }

  #[test]
  fn absent_optionals_are_empty_cells() {
    let mut c = consultation("Avery Lee", None);
    c.grade = None;
    let csv = consultations_csv(&[c]).unwrap();
    let row = csv.lines().nth(1).unwrap();
    assert!(row.contains(",,"));
  }
}
