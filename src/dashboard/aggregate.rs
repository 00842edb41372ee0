use crate::models::{AmountField, MedicalRecord};

use super::colors::ColorAssigner;
use super::types::{AggregateResult, ChartSeries, SERIES_CAPTION};

/// Aggregates with the default palette.
pub fn aggregate(records: &[MedicalRecord]) -> (ChartSeries, AggregateResult) {
    aggregate_with(records, &ColorAssigner::default())
}

/// Builds the per-record chart series and the spending totals.
///
/// Series entries follow input order. Amounts that are missing, not
/// numeric, negative or not finite count as zero; each substitution is
/// logged and otherwise swallowed, so this never fails.
pub fn aggregate_with(
    records: &[MedicalRecord],
    colors: &ColorAssigner,
) -> (ChartSeries, AggregateResult) {
    let mut labels = Vec::with_capacity(records.len());
    let mut values = Vec::with_capacity(records.len());
    let mut total_fees = 0.0;
    let mut total_medicines = 0.0;

    for record in records {
        let fees = amount_or_zero(record, AmountField::Fees);
        let medicines = amount_or_zero(record, AmountField::Medicines);
        labels.push(record.issue.clone());
        values.push(fees + medicines);
        total_fees += fees;
        total_medicines += medicines;
    }

    let series = ChartSeries {
        caption: SERIES_CAPTION,
        colors: colors.assign_for_labels(&labels),
        labels,
        values,
    };
    let totals = AggregateResult {
        total_fees,
        total_medicines,
        grand_total: total_fees + total_medicines,
    };
    (series, totals)
}

fn amount_or_zero(record: &MedicalRecord, field: AmountField) -> f64 {
    match record.checked_amount(field) {
        Ok(n) => n,
        Err(malformed) => {
            tracing::debug!(
                record_id = %malformed.record_id,
                field = %malformed.field,
                error = %malformed.source,
                "Treating malformed amount as zero"
            );
            0.0
        }
    }
}
