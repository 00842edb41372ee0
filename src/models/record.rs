use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A currency amount exactly as the record source delivered it.
///
/// Stored data is not guaranteed to be numeric, so the raw shape is
/// kept and only interpreted at aggregation time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

/// Why an [`Amount`] could not be read as a non-negative number.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AmountError {
    #[error("value is missing")]
    Missing,
    #[error("value {0:?} is not a number")]
    NotNumeric(String),
    #[error("value {0} is negative or not finite")]
    OutOfRange(f64),
}

impl Amount {
    pub fn value(&self) -> Result<f64, AmountError> {
        let n = match self {
            Self::Number(n) => *n,
            Self::Text(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| AmountError::NotNumeric(raw.clone()))?,
            Self::Missing => return Err(AmountError::Missing),
        };
        if n.is_finite() && n >= 0.0 {
            Ok(n)
        } else {
            Err(AmountError::OutOfRange(n))
        }
    }
}

impl From<f64> for Amount {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Amount {
    fn from(raw: &str) -> Self {
        Self::Text(raw.to_string())
    }
}

impl From<String> for Amount {
    fn from(raw: String) -> Self {
        Self::Text(raw)
    }
}

impl From<Option<f64>> for Amount {
    fn from(n: Option<f64>) -> Self {
        n.map(Self::Number).unwrap_or(Self::Missing)
    }
}

/// Which amount column of a record a malformed value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountField {
    Fees,
    Medicines,
}

impl std::fmt::Display for AmountField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Fees => "fees",
            Self::Medicines => "medicines",
        })
    }
}

/// A record amount that aggregation replaced with zero.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Malformed {field} on record {record_id}: {source}")]
pub struct MalformedRecordField {
    pub record_id: String,
    pub field: AmountField,
    pub source: AmountError,
}

/// One medical encounter. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: String,
    pub patient_id: String,
    pub issue: String,
    #[serde(default)]
    pub fees: Amount,
    #[serde(default)]
    pub medicines: Amount,
    pub occurred_at: DateTime<Utc>,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub city: String,
}

impl MedicalRecord {
    pub fn new(
        patient_id: impl Into<String>,
        issue: impl Into<String>,
        fees: impl Into<Amount>,
        medicines: impl Into<Amount>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            patient_id: patient_id.into(),
            issue: issue.into(),
            fees: fees.into(),
            medicines: medicines.into(),
            occurred_at,
            state: String::new(),
            city: String::new(),
        }
    }

    pub fn with_location(mut self, state: impl Into<String>, city: impl Into<String>) -> Self {
        self.state = state.into();
        self.city = city.into();
        self
    }

    fn amount(&self, field: AmountField) -> &Amount {
        match field {
            AmountField::Fees => &self.fees,
            AmountField::Medicines => &self.medicines,
        }
    }

    /// Numeric value of one amount column, or the reason it was unreadable.
    pub fn checked_amount(&self, field: AmountField) -> Result<f64, MalformedRecordField> {
        self.amount(field)
            .value()
            .map_err(|source| MalformedRecordField {
                record_id: self.id.clone(),
                field,
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn when() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn numeric_amounts_read_directly() {
        assert_eq!(Amount::Number(450.5).value(), Ok(450.5));
        assert_eq!(Amount::Number(0.0).value(), Ok(0.0));
    }

    #[test]
    fn text_amounts_parse_when_numeric() {
        assert_eq!(Amount::from(" 1200 ").value(), Ok(1200.0));
        assert_eq!(Amount::from("99.75").value(), Ok(99.75));
    }

    #[test]
    fn malformed_amounts_report_reason() {
        assert_eq!(
            Amount::from("twelve").value(),
            Err(AmountError::NotNumeric("twelve".into()))
        );
        assert_eq!(Amount::Missing.value(), Err(AmountError::Missing));
        assert_eq!(Amount::Number(-5.0).value(), Err(AmountError::OutOfRange(-5.0)));
        assert!(Amount::from("NaN").value().is_err());
        assert!(Amount::from("inf").value().is_err());
    }

    #[test]
    fn amount_deserializes_from_any_json_shape() {
        let n: Amount = serde_json::from_str("300").unwrap();
        let t: Amount = serde_json::from_str("\"300\"").unwrap();
        let m: Amount = serde_json::from_str("null").unwrap();
        assert_eq!(n, Amount::Number(300.0));
        assert_eq!(t, Amount::Text("300".into()));
        assert_eq!(m, Amount::Missing);
    }

    #[test]
    fn record_deserializes_with_absent_amounts() {
        let json = r#"{
            "id": "rec-1",
            "patient_id": "p-1",
            "issue": "Fever",
            "fees": "500",
            "occurred_at": "2026-09-01T09:30:00Z"
        }"#;
        let record: MedicalRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.fees, Amount::Text("500".into()));
        assert_eq!(record.medicines, Amount::Missing);
        assert!(record.city.is_empty());
    }

    #[test]
    fn checked_amount_names_record_and_field() {
        let record = MedicalRecord::new("p-1", "Cough", "abc", 20.0, when());
        let err = record.checked_amount(AmountField::Fees).unwrap_err();
        assert_eq!(err.record_id, record.id);
        assert_eq!(err.field, AmountField::Fees);
        assert_eq!(record.checked_amount(AmountField::Medicines), Ok(20.0));
    }

    #[test]
    fn new_records_get_unique_ids() {
        let a = MedicalRecord::new("p-1", "Flu", 1.0, 1.0, when());
        let b = MedicalRecord::new("p-1", "Flu", 1.0, 1.0, when());
        assert_ne!(a.id, b.id);
        let located = a.with_location("Kerala", "Kochi");
        assert_eq!(located.state, "Kerala");
        assert_eq!(located.city, "Kochi");
    }
}
