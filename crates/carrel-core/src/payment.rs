//! Payments and the confirmation handshake.
//!
//! The payment provider redirects the customer to a success URL carrying
//! `paymentKey`, `orderId` and `amount` as query parameters. The operator
//! pastes that URL (or just its query string) into the console, which parses
//! it into a [`PaymentConfirmation`] and posts it to the backend to finalize
//! the charge.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Provider-side lifecycle of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
  Ready,
  InProgress,
  Done,
  Canceled,
  Aborted,
  Expired,
}

impl PaymentStatus {
  pub fn label(&self) -> &'static str {
    match self {
      Self::Ready => "ready",
      Self::InProgress => "in progress",
      Self::Done => "done",
      Self::Canceled => "canceled",
      Self::Aborted => "aborted",
      Self::Expired => "expired",
    }
  }

  /// Whether the charge has settled and the plan is active.
  pub fn is_settled(&self) -> bool {
    matches!(self, Self::Done)
  }
}

impl fmt::Display for PaymentStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// One payment as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
  pub id:            Uuid,
  /// Merchant-side order id, generated when the checkout opens.
  pub order_id:      String,
  /// Provider-side key, present once the customer reaches the success URL.
  pub payment_key:   Option<String>,
  pub customer_name: String,
  pub plan:          String,
  /// Amount in the smallest currency unit.
  pub amount:        i64,
  pub status:        PaymentStatus,
  pub requested_at:  DateTime<Utc>,
  pub approved_at:   Option<DateTime<Utc>>,
}

/// The triple the backend needs to confirm a charge with the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
  pub payment_key: String,
  pub order_id:    String,
  pub amount:      i64,
}

impl PaymentConfirmation {
  /// Parse a pasted success URL or bare query string.
  ///
  /// Accepts `https://…/success?paymentKey=…&orderId=…&amount=…`, the same
  /// with a `#fragment`, or just the query part. Unknown parameters are
  /// ignored; a missing or unparsable required one is an error.
  pub fn from_callback(input: &str) -> Result<Self> {
    let input = input.trim();
    let query = match input.split_once('?') {
      Some((_, q)) => q,
      None => input,
    };
    let query = match query.split_once('#') {
      Some((q, _)) => q,
      None => query,
    };

    let mut payment_key = None;
    let mut order_id = None;
    let mut amount = None;

    for pair in query.split('&').filter(|p| !p.is_empty()) {
      let Some((key, value)) = pair.split_once('=') else {
        return Err(Error::InvalidCallback(format!(
          "malformed parameter `{pair}`"
        )));
      };
      match key {
        "paymentKey" => payment_key = Some(value.to_owned()),
        "orderId" => order_id = Some(value.to_owned()),
        "amount" => {
          let parsed = value.parse::<i64>().map_err(|_| {
            Error::InvalidCallback(format!("amount `{value}` is not a number"))
          })?;
          amount = Some(parsed);
        }
        _ => {}
      }
    }

    let payment_key = payment_key
      .ok_or_else(|| Error::InvalidCallback("paymentKey is missing".into()))?;
    let order_id = order_id
      .ok_or_else(|| Error::InvalidCallback("orderId is missing".into()))?;
    let amount = amount
      .ok_or_else(|| Error::InvalidCallback("amount is missing".into()))?;

    Ok(Self { payment_key, order_id, amount })
  }
}
