use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// VAT rate applied when the form leaves the percentage empty.
pub const DEFAULT_VAT_PERCENT: i32 = 20;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    #[default]
    Pending,
    Accepted,
    Refused,
}

impl BillStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BillStatus::Pending => "En attente",
            BillStatus::Accepted => "Accepté",
            BillStatus::Refused => "Refused",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BillRecord {
    pub email: String,
    pub expense_type: String,
    pub expense_name: String,
    pub amount: f64,
    pub date: String,
    pub vat_amount: String,
    pub vat_percent: i32,
    pub commentary: String,
    pub file_url: String,
    pub file_name: String,
    pub status: BillStatus,
}

/// A file picked in the attachment input.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl AttachedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum UserType {
    Employee,
    Admin,
    #[serde(other)]
    Other,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionUser {
    #[serde(rename = "type")]
    pub kind: UserType,
    #[serde(default)]
    pub email: String,
}

impl SessionUser {
    pub fn employee(email: impl Into<String>) -> Self {
        Self {
            kind: UserType::Employee,
            email: email.into(),
        }
    }

    pub fn is_employee(&self) -> bool {
        self.kind == UserType::Employee
    }
}

/// Raw control values, exactly as typed into the form.
#[derive(Debug, Clone, Default)]
pub struct RawBillFields {
    pub expense_type: String,
    pub expense_name: String,
    pub amount: String,
    pub date: String,
    pub vat_amount: String,
    pub vat_percent: String,
    pub commentary: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBillInput {
    pub expense_type: String,
    pub expense_name: String,
    pub amount: f64,
    pub date: String,
    pub vat_amount: String,
    pub vat_percent: i32,
    pub commentary: String,
}

/// Optional sign then digits, ignoring whatever follows (`"20.5"` is 20).
fn leading_int(s: &str) -> Option<i32> {
    let s = s.trim_start();
    let digits_start = usize::from(s.starts_with(|c| c == '-' || c == '+'));
    let digits_end = s[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(s.len(), |i| i + digits_start);
    if digits_end == digits_start {
        return None;
    }
    s[..digits_end].parse().ok()
}

impl NewBillInput {
    pub fn parse(raw: RawBillFields) -> Result<Self, FieldError> {
        let amount_str = raw.amount.trim();
        if amount_str.is_empty() {
            return Err(FieldError::Missing("amount"));
        }
        let amount = amount_str
            .parse::<f64>()
            .ok()
            .filter(|a| a.is_finite())
            .ok_or_else(|| FieldError::InvalidAmount(raw.amount.clone()))?;

        let vat_percent = match leading_int(&raw.vat_percent) {
            Some(0) | None => DEFAULT_VAT_PERCENT,
            Some(pct) => pct,
        };

        Ok(Self {
            expense_type: raw.expense_type,
            expense_name: raw.expense_name,
            amount,
            date: raw.date,
            vat_amount: raw.vat_amount,
            vat_percent,
            commentary: raw.commentary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(amount: &str, pct: &str) -> RawBillFields {
        RawBillFields {
            expense_type: "Transports".into(),
            expense_name: "nn".into(),
            amount: amount.into(),
            date: "2022-10-23".into(),
            vat_amount: "857".into(),
            vat_percent: pct.into(),
            commentary: "nn".into(),
        }
    }

    #[test]
    fn parses_numeric_fields() {
        let input = NewBillInput::parse(raw("857", "857")).unwrap();
        assert_eq!(input.amount, 857.0);
        assert_eq!(input.vat_percent, 857);
        assert_eq!(input.date, "2022-10-23");
    }

    #[test]
    fn vat_percent_falls_back_to_default() {
        assert_eq!(NewBillInput::parse(raw("10", "")).unwrap().vat_percent, 20);
        assert_eq!(NewBillInput::parse(raw("10", "abc")).unwrap().vat_percent, 20);
        assert_eq!(NewBillInput::parse(raw("10", "0")).unwrap().vat_percent, 20);
        assert_eq!(NewBillInput::parse(raw("10", "-")).unwrap().vat_percent, 20);
    }

    #[test]
    fn vat_percent_keeps_leading_integer() {
        assert_eq!(NewBillInput::parse(raw("10", "20.5")).unwrap().vat_percent, 20);
        assert_eq!(NewBillInput::parse(raw("10", "-5")).unwrap().vat_percent, -5);
        assert_eq!(NewBillInput::parse(raw("10", " 7%")).unwrap().vat_percent, 7);
    }

    #[test]
    fn rejects_bad_amount() {
        assert_eq!(
            NewBillInput::parse(raw("dix", "20")),
            Err(FieldError::InvalidAmount("dix".into()))
        );
        assert_eq!(NewBillInput::parse(raw("  ", "20")), Err(FieldError::Missing("amount")));
        for amount in ["NaN", "inf", "-inf", "1e400"] {
            assert_eq!(
                NewBillInput::parse(raw(amount, "20")),
                Err(FieldError::InvalidAmount(amount.into())),
                "{amount} should be rejected"
            );
        }
    }

    #[test]
    fn session_user_without_email() {
        let user: SessionUser = serde_json::from_str(r#"{"type":"Employee"}"#).unwrap();
        assert!(user.is_employee());
        assert_eq!(user.email, "");

        let other: SessionUser =
            serde_json::from_str(r#"{"type":"Auditor","email":"x@y"}"#).unwrap();
        assert_eq!(other.kind, UserType::Other);
    }

    #[test]
    fn record_uses_camel_case_fields() {
        let record = BillRecord {
            email: "a@a".into(),
            expense_type: "Transports".into(),
            expense_name: "nn".into(),
            amount: 857.0,
            date: "2022-10-23".into(),
            vat_amount: "857".into(),
            vat_percent: 857,
            commentary: "nn".into(),
            file_url: "https://images.com/hello.png".into(),
            file_name: "hello.png".into(),
            status: BillStatus::Pending,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["expenseType"], "Transports");
        assert_eq!(json["fileUrl"], "https://images.com/hello.png");
        assert_eq!(json["status"], "pending");
    }
}
