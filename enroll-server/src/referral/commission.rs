//! Commission calculation
//!
//! All arithmetic is done with `Decimal` and rounded to whole local
//! currency units at the end; nothing here accumulates floats.

use rust_decimal::prelude::*;
use shared::models::{
    AssignmentEarnings, CommissionSummary, EnrollmentRecord, EnrollmentStatus, MarketerAssignment,
};

/// Convert an f64 amount into Decimal for calculation
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in commission calculation, defaulting to zero");
        Decimal::ZERO
    })
}

fn round_whole(value: Decimal) -> i64 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

/// Commission owed for one record, in whole local currency units:
/// `amount × currency_factor × rate / 100`, rounded to the nearest unit.
pub fn commission_for(amount: f64, currency_factor: i64, commission_rate: i64) -> i64 {
    let value = to_decimal(amount) * Decimal::from(currency_factor) * Decimal::from(commission_rate)
        / Decimal::ONE_HUNDRED;
    round_whole(value)
}

/// A base-currency amount converted to whole local currency units.
/// Used for the payable amount shown in payment instructions.
pub fn local_amount(amount: f64, currency_factor: i64) -> i64 {
    round_whole(to_decimal(amount) * Decimal::from(currency_factor))
}

/// Aggregate a marketer's commissions over their referred records.
///
/// Settled sums `accepted` records only; estimated sums `reserved` and
/// `pending`. A record whose course has no surviving assignment contributes
/// zero to both (the assignment may have been revoked after the referral).
pub fn summarize(
    marketer_id: &str,
    assignments: &[MarketerAssignment],
    records: &[EnrollmentRecord],
    currency_factor: i64,
) -> CommissionSummary {
    let mut settled = 0i64;
    let mut estimated = 0i64;

    let referred: Vec<&EnrollmentRecord> = records
        .iter()
        .filter(|r| r.marketer_id.as_deref() == Some(marketer_id))
        .collect();

    for record in &referred {
        let Some(assignment) = assignments.iter().find(|a| a.course_id == record.course_id)
        else {
            continue;
        };
        let value = commission_for(record.amount, currency_factor, assignment.commission_rate);
        match record.status {
            EnrollmentStatus::Accepted => settled += value,
            EnrollmentStatus::Pending | EnrollmentStatus::Reserved => estimated += value,
            EnrollmentStatus::Rejected => {}
        }
    }

    let breakdown = assignments
        .iter()
        .map(|assignment| {
            let accepted: Vec<&&EnrollmentRecord> = referred
                .iter()
                .filter(|r| {
                    r.course_id == assignment.course_id && r.status == EnrollmentStatus::Accepted
                })
                .collect();
            AssignmentEarnings {
                assignment_id: assignment.id,
                course_id: assignment.course_id,
                course_title: assignment.course_title.clone(),
                commission_rate: assignment.commission_rate,
                accepted_count: accepted.len(),
                earned: accepted
                    .iter()
                    .map(|r| {
                        commission_for(r.amount, currency_factor, assignment.commission_rate)
                    })
                    .sum(),
            }
        })
        .collect();

    CommissionSummary {
        marketer_id: marketer_id.to_string(),
        settled,
        estimated,
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn make_assignment(id: i64, course_id: i64, rate: i64) -> MarketerAssignment {
        MarketerAssignment {
            id,
            course_id,
            instructor_id: "i1".into(),
            marketer_id: "M1".into(),
            marketer_name: "Mona".into(),
            marketer_email: "mona@example.com".into(),
            course_title: format!("course_{course_id}"),
            commission_rate: rate,
            created_at: 0,
        }
    }

    fn make_record(
        id: i64,
        course_id: i64,
        amount: f64,
        status: EnrollmentStatus,
        marketer_id: Option<&str>,
    ) -> EnrollmentRecord {
        EnrollmentRecord {
            id,
            course_id,
            instructor_id: "i1".into(),
            name: "Learner".into(),
            phone: "0912345678".into(),
            email: None,
            payment: shared::models::PaymentMethod::Bank,
            amount,
            status,
            reference: format!("MSR-{course_id}-{id}"),
            note: None,
            fields: HashMap::new(),
            marketer_id: marketer_id.map(String::from),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_single_record_commission() {
        // 150 × 350 × 10 / 100 = 5250
        assert_eq!(commission_for(150.0, 350, 10), 5250);
    }

    #[test]
    fn test_commission_rounds_to_nearest_unit() {
        // 0.99 × 350 × 13 / 100 = 45.045 → 45
        assert_eq!(commission_for(0.99, 350, 13), 45);
        // 0.33 × 350 × 13 / 100 = 15.015 → 15
        assert_eq!(commission_for(0.33, 350, 13), 15);
        // half rounds away from zero: 0.30 × 350 × 5 / 100 = 5.25 → 5; 0.1 × 350 × 10 / 100 = 3.5 → 4
        assert_eq!(commission_for(0.1, 350, 10), 4);
    }

    #[test]
    fn test_local_amount() {
        assert_eq!(local_amount(300.0, 350), 105_000);
    }

    #[test]
    fn test_settled_counts_accepted_only() {
        let assignments = vec![make_assignment(1, 7, 10)];
        let records = vec![
            make_record(1, 7, 150.0, EnrollmentStatus::Accepted, Some("M1")),
            make_record(2, 7, 150.0, EnrollmentStatus::Pending, Some("M1")),
            make_record(3, 7, 150.0, EnrollmentStatus::Reserved, Some("M1")),
            make_record(4, 7, 150.0, EnrollmentStatus::Rejected, Some("M1")),
        ];
        let summary = summarize("M1", &assignments, &records, 350);
        assert_eq!(summary.settled, 5250);
        assert_eq!(summary.estimated, 10_500); // pending + reserved
    }

    #[test]
    fn test_missing_assignment_contributes_zero() {
        // Assignment was revoked: record references course 8 with no match
        let assignments = vec![make_assignment(1, 7, 10)];
        let records = vec![make_record(1, 8, 150.0, EnrollmentStatus::Accepted, Some("M1"))];
        let summary = summarize("M1", &assignments, &records, 350);
        assert_eq!(summary.settled, 0);
        assert_eq!(summary.estimated, 0);
    }

    #[test]
    fn test_other_marketers_records_excluded() {
        let assignments = vec![make_assignment(1, 7, 10)];
        let records = vec![
            make_record(1, 7, 150.0, EnrollmentStatus::Accepted, Some("M1")),
            make_record(2, 7, 150.0, EnrollmentStatus::Accepted, Some("M2")),
            make_record(3, 7, 150.0, EnrollmentStatus::Accepted, None),
        ];
        let summary = summarize("M1", &assignments, &records, 350);
        assert_eq!(summary.settled, 5250);
    }

    #[test]
    fn test_breakdown_per_assignment() {
        let assignments = vec![make_assignment(1, 7, 10), make_assignment(2, 9, 25)];
        let records = vec![
            make_record(1, 7, 150.0, EnrollmentStatus::Accepted, Some("M1")),
            make_record(2, 7, 150.0, EnrollmentStatus::Accepted, Some("M1")),
            make_record(3, 9, 100.0, EnrollmentStatus::Accepted, Some("M1")),
            make_record(4, 9, 100.0, EnrollmentStatus::Pending, Some("M1")),
        ];
        let summary = summarize("M1", &assignments, &records, 350);

        let course7 = summary.breakdown.iter().find(|b| b.course_id == 7).unwrap();
        assert_eq!(course7.accepted_count, 2);
        assert_eq!(course7.earned, 10_500);

        let course9 = summary.breakdown.iter().find(|b| b.course_id == 9).unwrap();
        assert_eq!(course9.accepted_count, 1);
        assert_eq!(course9.earned, 8750); // 100 × 350 × 25 / 100

        assert_eq!(summary.settled, 10_500 + 8750);
        assert_eq!(summary.estimated, 8750);
    }
}
