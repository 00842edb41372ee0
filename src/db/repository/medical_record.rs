use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::{Amount, MedicalRecord};

/// Stored timestamps are fixed-width RFC 3339 UTC strings, so textual
/// comparison in SQL matches chronological order.
fn encode_instant(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn amount_to_sql(amount: &Amount) -> Value {
    match amount {
        Amount::Number(n) => Value::Real(*n),
        Amount::Text(raw) => Value::Text(raw.clone()),
        Amount::Missing => Value::Null,
    }
}

fn amount_from_sql(value: Value) -> Amount {
    match value {
        Value::Integer(n) => Amount::Number(n as f64),
        Value::Real(n) => Amount::Number(n),
        Value::Text(raw) => Amount::Text(raw),
        Value::Blob(bytes) => Amount::Text(String::from_utf8_lossy(&bytes).into_owned()),
        Value::Null => Amount::Missing,
    }
}

/// Insert one medical record.
pub fn insert_medical_record(
    conn: &Connection,
    record: &MedicalRecord,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO medical_records (id, patient_id, issue, fees, medicines, occurred_at, state, city)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            record.id,
            record.patient_id,
            record.issue,
            amount_to_sql(&record.fees),
            amount_to_sql(&record.medicines),
            encode_instant(&record.occurred_at),
            record.state,
            record.city,
        ],
    )?;
    Ok(())
}

/// Records of one patient that occurred at or after `cutoff` (all of them
/// when `cutoff` is `None`), most recent first.
pub fn fetch_records_since(
    conn: &Connection,
    patient_id: &str,
    cutoff: Option<DateTime<Utc>>,
) -> Result<Vec<MedicalRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, issue, fees, medicines, occurred_at, state, city
         FROM medical_records
         WHERE patient_id = ?1 AND (?2 IS NULL OR occurred_at >= ?2)
         ORDER BY occurred_at DESC, id ASC",
    )?;
    let rows = stmt.query_map(
        params![patient_id, cutoff.as_ref().map(encode_instant)],
        row_to_medical_record,
    )?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Number of records stored for a patient, regardless of date.
pub fn count_medical_records(conn: &Connection, patient_id: &str) -> Result<u32, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM medical_records WHERE patient_id = ?1",
        params![patient_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn row_to_medical_record(row: &rusqlite::Row) -> Result<MedicalRecord, rusqlite::Error> {
    let occurred_str: String = row.get(5)?;
    let occurred_at = DateTime::parse_from_rfc3339(&occurred_str)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(MedicalRecord {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        issue: row.get(2)?,
        fees: amount_from_sql(row.get(3)?),
        medicines: amount_from_sql(row.get(4)?),
        occurred_at,
        state: row.get(6)?,
        city: row.get(7)?,
    })
}
