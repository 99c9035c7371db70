//! Canned rows for offline operation.
//!
//! When a list fetch fails the console can fall back to these instead of an
//! empty screen, so layout and keybindings stay exercisable without a
//! backend. The fallback is always explicit: the app marks the view as
//! offline sample data, never passing these off as live records.

use carrel_core::{
  consultation::{Consultation, ConsultationStatus},
  franchise::{FranchiseInquiry, InquiryStatus},
  payment::{Payment, PaymentStatus},
};
use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

pub fn consultations() -> Vec<Consultation> {
  let now = Utc::now();
  vec![
    Consultation {
      id:             Uuid::new_v4(),
      student_name:   "Avery Lee".into(),
      phone:          "010-2000-0001".into(),
      grade:          Some("high 2".into()),
      preferred_date: NaiveDate::from_ymd_opt(2026, 9, 2),
      message:        Some("Evening seat, weekdays only".into()),
      status:         ConsultationStatus::Pending,
      memo:           None,
      created_at:     now - Duration::hours(3),
    },
    Consultation {
      id:             Uuid::new_v4(),
      student_name:   "Jules Moreno".into(),
      phone:          "010-2000-0002".into(),
      grade:          Some("middle 3".into()),
      preferred_date: None,
      message:        None,
      status:         ConsultationStatus::Contacted,
      memo:           Some("Parent answered, call back Friday".into()),
      created_at:     now - Duration::days(1),
    },
    Consultation {
      id:             Uuid::new_v4(),
      student_name:   "Kiara Patel".into(),
      phone:          "010-2000-0003".into(),
      grade:          None,
      preferred_date: NaiveDate::from_ymd_opt(2026, 8, 30),
      message:        Some("Asking about the focus tracking".into()),
      status:         ConsultationStatus::Scheduled,
      memo:           None,
      created_at:     now - Duration::days(2),
    },
  ]
}

pub fn franchise_inquiries() -> Vec<FranchiseInquiry> {
  let now = Utc::now();
  vec![
    FranchiseInquiry {
      id:             Uuid::new_v4(),
      applicant_name: "Sam Okafor".into(),
      phone:          "010-3000-0001".into(),
      email:          Some("sam.okafor@example.com".into()),
      region:         "Mapo-gu".into(),
      budget:         Some("200-300M".into()),
      message:        Some("Own a building near a high school".into()),
      status:         InquiryStatus::New,
      memo:           None,
      created_at:     now - Duration::hours(8),
    },
    FranchiseInquiry {
      id:             Uuid::new_v4(),
      applicant_name: "Dana Whitfield".into(),
      phone:          "010-3000-0002".into(),
      email:          None,
      region:         "Bundang".into(),
      budget:         None,
      message:        None,
      status:         InquiryStatus::Meeting,
      memo:           Some("Meeting set for next Tuesday".into()),
      created_at:     now - Duration::days(4),
    },
  ]
}

pub fn payments() -> Vec<Payment> {
  let now = Utc::now();
  vec![
    Payment {
      id:            Uuid::new_v4(),
      order_id:      "order-2026-0041".into(),
      payment_key:   Some("pk_sample_41".into()),
      customer_name: "Avery Lee".into(),
      plan:          "monthly".into(),
      amount:        390_000,
      status:        PaymentStatus::Done,
      requested_at:  now - Duration::days(2),
      approved_at:   Some(now - Duration::days(2) + Duration::minutes(1)),
    },
    Payment {
      id:            Uuid::new_v4(),
      order_id:      "order-2026-0042".into(),
      payment_key:   None,
      customer_name: "Jules Moreno".into(),
      plan:          "monthly".into(),
      amount:        390_000,
      status:        PaymentStatus::Ready,
      requested_at:  now - Duration::hours(1),
      approved_at:   None,
    },
    Payment {
      id:            Uuid::new_v4(),
      order_id:      "order-2026-0039".into(),
      payment_key:   Some("pk_sample_39".into()),
      customer_name: "Kiara Patel".into(),
      plan:          "quarterly".into(),
      amount:        990_000,
      status:        PaymentStatus::Canceled,
      requested_at:  now - Duration::days(9),
      approved_at:   None,
    },
  ]
}
