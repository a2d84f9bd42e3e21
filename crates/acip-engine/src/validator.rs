//! Dose validation: partitioning a sorted dose list into counted and
//! excluded doses.
//!
//! The CDC schedules tolerate doses given up to 4 days before a minimum
//! age or minimum interval; anything earlier does not count toward the
//! series. Exclusion never shifts later interval math: the comparison for
//! the next dose always runs from the last dose that counted. Excluded
//! doses are surfaced as notes so a caller can always see why an
//! apparently complete history still needs doses.

use chrono::NaiveDate;

use acip_schedule::{CatchUpBucket, CdcRule, Gap, Intervals, ProductVariant};

use crate::context::Dose;
use crate::datemath;

/// Days a dose may precede its minimum date and still count.
pub const GRACE_PERIOD_DAYS: u64 = 4;

/// One dose rejected as administered too early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedDose {
    /// 1-based position in the submitted (sorted) history.
    pub ordinal: usize,
    pub dose: Dose,
    /// Earliest date at which this dose would have counted, grace
    /// included.
    pub earliest_valid: NaiveDate,
}

/// Result of walking one vaccine's history against its rule.
#[derive(Debug, Clone, Default)]
pub struct ValidatedDoses {
    pub counted: Vec<Dose>,
    pub excluded: Vec<ExcludedDose>,
}

impl ValidatedDoses {
    /// Human-readable exclusion notes, in dose order.
    pub fn notes(&self) -> Vec<String> {
        self.excluded
            .iter()
            .map(|ex| {
                format!(
                    "Dose {} on {} excluded: given too early (earliest acceptable date {})",
                    ex.ordinal,
                    datemath::format_iso(ex.dose.date),
                    datemath::format_iso(ex.earliest_valid),
                )
            })
            .collect()
    }
}

/// Effective schedule shape once product variants and catch-up buckets
/// are resolved: a product variant overrides everything, otherwise the
/// bucket for the age at the first counted dose, otherwise the base rule.
#[derive(Debug, Clone, Copy)]
pub struct EffectiveSchedule {
    pub doses: usize,
    pub intervals: Intervals,
    pub final_dose_min_age: Option<Gap>,
    pub note: Option<&'static str>,
}

/// A single product variant shared by every dose that names a recognized
/// product. Mixed recognized products fall back to the base rule.
pub fn resolve_variant(rule: &CdcRule, doses: &[Dose]) -> Option<&'static ProductVariant> {
    let mut found: Option<&'static ProductVariant> = None;
    for dose in doses {
        let Some(product) = &dose.product else {
            continue;
        };
        let Some(variant) = rule.product_variant(product) else {
            continue;
        };
        match found {
            None => found = Some(variant),
            // Equivalent tokens (pfizer/comirnaty) share a note string.
            Some(prev) if prev.note == variant.note => {}
            Some(_) => return None,
        }
    }
    found
}

/// Resolves the effective schedule for a history whose first counted dose
/// was at `start_age_months`. `age_years` resolves any age-dependent dose
/// count in the base rule.
pub fn effective_schedule(
    rule: &CdcRule,
    doses: &[Dose],
    start_age_months: Option<i64>,
    age_years: i64,
) -> EffectiveSchedule {
    if let Some(variant) = resolve_variant(rule, doses) {
        return EffectiveSchedule {
            doses: variant.doses,
            intervals: Intervals::Fixed(variant.intervals),
            final_dose_min_age: rule.final_dose_min_age,
            note: Some(variant.note),
        };
    }
    if let Some(bucket) = pick_bucket(rule, start_age_months) {
        return EffectiveSchedule {
            doses: bucket.doses,
            intervals: Intervals::Fixed(bucket.intervals),
            final_dose_min_age: bucket.final_dose_min_age.or(rule.final_dose_min_age),
            note: Some(bucket.note),
        };
    }
    EffectiveSchedule {
        doses: rule.doses.resolve(age_years),
        intervals: rule.intervals,
        final_dose_min_age: rule.final_dose_min_age,
        note: None,
    }
}

fn pick_bucket(rule: &CdcRule, start_age_months: Option<i64>) -> Option<&'static CatchUpBucket> {
    rule.bucket_for_start_age(start_age_months?)
}

/// Walks sorted doses and applies the grace period.
///
/// For counted dose `k`, the minimum permissible date is the rule's
/// minimum age (k = 1) or the minimum interval after the last counted
/// dose (k > 1), plus any final-dose age floor when `k` completes the
/// series. A dose earlier than that date minus [`GRACE_PERIOD_DAYS`] is
/// excluded and noted; the next dose is still measured from the last
/// counted one.
pub fn validate_doses(rule: &CdcRule, birth_date: NaiveDate, doses: &[Dose]) -> ValidatedDoses {
    let mut result = ValidatedDoses::default();

    for (index, dose) in doses.iter().enumerate() {
        let k = result.counted.len() + 1;
        let age_years_at_dose = datemath::years_between(birth_date, dose.date);
        let start_age_months = result
            .counted
            .first()
            .map(|first| datemath::months_between(birth_date, first.date));
        let schedule = effective_schedule(rule, doses, start_age_months, age_years_at_dose);

        let mut min_date = if k == 1 {
            rule.minimum_age.after(birth_date)
        } else {
            let last = result
                .counted
                .last()
                .map(|d| d.date)
                .unwrap_or(birth_date);
            match schedule.intervals.before_dose(k, age_years_at_dose) {
                Some(gap) => gap.after(last),
                None => last,
            }
        };
        if k == schedule.doses
            && let Some(floor) = schedule.final_dose_min_age
        {
            min_date = min_date.max(floor.after(birth_date));
        }

        let earliest_valid = datemath::sub_days(min_date, GRACE_PERIOD_DAYS);
        if dose.date < earliest_valid {
            tracing::warn!(
                vaccine = %rule.id,
                dose = index + 1,
                date = %dose.date,
                earliest = %earliest_valid,
                "dose excluded as administered too early"
            );
            result.excluded.push(ExcludedDose {
                ordinal: index + 1,
                dose: dose.clone(),
                earliest_valid,
            });
        } else {
            result.counted.push(dose.clone());
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use acip_model::VaccineId;
    use acip_schedule::registry;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn doses(dates: &[NaiveDate]) -> Vec<Dose> {
        dates.iter().map(|d| Dose::new(*d)).collect()
    }

    #[test]
    fn grace_period_boundary_is_exactly_four_days() {
        let rule = registry().rule(&VaccineId::Mmr).expect("mmr rule");
        let birth = date(2023, 1, 1);
        // Minimum age 12 calendar months puts dose 1 at 2024-01-01.
        let four_early = validate_doses(rule, birth, &doses(&[date(2023, 12, 28)]));
        assert_eq!(four_early.counted.len(), 1);
        assert!(four_early.excluded.is_empty());

        let five_early = validate_doses(rule, birth, &doses(&[date(2023, 12, 27)]));
        assert!(five_early.counted.is_empty());
        assert_eq!(five_early.excluded.len(), 1);
        assert_eq!(five_early.excluded[0].ordinal, 1);
        assert_eq!(five_early.excluded[0].earliest_valid, date(2023, 12, 28));
    }

    #[test]
    fn excluded_dose_does_not_shift_interval_math() {
        let rule = registry().rule(&VaccineId::Mmr).expect("mmr rule");
        let birth = date(2020, 1, 1);
        // Dose 1 valid; dose 2 ten days later is too early even with
        // grace; dose 3 measures from dose 1, not from the excluded dose.
        let result = validate_doses(
            rule,
            birth,
            &doses(&[date(2021, 2, 1), date(2021, 2, 11), date(2021, 3, 1)]),
        );
        assert_eq!(result.counted.len(), 2);
        assert_eq!(result.excluded.len(), 1);
        assert_eq!(result.excluded[0].ordinal, 2);
        assert_eq!(result.counted[1].date, date(2021, 3, 1));
    }

    #[test]
    fn final_dose_floor_applies_to_series_end() {
        let rule = registry().rule(&VaccineId::Ipv).expect("ipv rule");
        let birth = date(2020, 1, 1);
        // First three doses on a valid cadence; dose 4 before the 4th
        // birthday (minus grace) must not count.
        let result = validate_doses(
            rule,
            birth,
            &doses(&[
                date(2020, 2, 15),
                date(2020, 3, 20),
                date(2020, 4, 24),
                date(2023, 6, 1),
            ]),
        );
        assert_eq!(result.counted.len(), 3);
        assert_eq!(result.excluded.len(), 1);
        assert_eq!(result.excluded[0].ordinal, 4);

        let on_time = validate_doses(
            rule,
            birth,
            &doses(&[
                date(2020, 2, 15),
                date(2020, 3, 20),
                date(2020, 4, 24),
                date(2024, 1, 1),
            ]),
        );
        assert_eq!(on_time.counted.len(), 4);
    }

    #[test]
    fn rotarix_two_dose_variant_drives_intervals() {
        let rule = registry().rule(&VaccineId::Rotavirus).expect("rotavirus rule");
        let birth = date(2024, 1, 1);
        let history = vec![
            Dose {
                date: date(2024, 2, 15),
                product: Some("Rotarix".to_string()),
            },
            Dose {
                date: date(2024, 3, 14),
                product: Some("Rotarix".to_string()),
            },
        ];
        let result = validate_doses(rule, birth, &history);
        assert_eq!(result.counted.len(), 2);

        let schedule = effective_schedule(rule, &history, Some(1), 0);
        assert_eq!(schedule.doses, 2);
    }

    #[test]
    fn mixed_products_fall_back_to_base_rule() {
        let rule = registry().rule(&VaccineId::Rotavirus).expect("rotavirus rule");
        let history = vec![
            Dose {
                date: date(2024, 2, 15),
                product: Some("Rotarix".to_string()),
            },
            Dose {
                date: date(2024, 3, 14),
                product: Some("RotaTeq".to_string()),
            },
        ];
        assert!(resolve_variant(rule, &history).is_none());
        let schedule = effective_schedule(rule, &history, Some(1), 0);
        assert_eq!(schedule.doses, 3);
    }

    #[test]
    fn hib_bucket_is_fixed_by_first_counted_dose() {
        let rule = registry().rule(&VaccineId::Hib).expect("hib rule");
        let birth = date(2023, 1, 1);
        // First dose at ~8 ratio months selects the 3-dose bucket.
        let result = validate_doses(
            rule,
            birth,
            &doses(&[date(2023, 9, 10), date(2023, 10, 10), date(2024, 1, 10)]),
        );
        assert_eq!(result.counted.len(), 3);

        let start = datemath::months_between(birth, date(2023, 9, 10));
        let schedule = effective_schedule(rule, &[], Some(start), 0);
        assert_eq!(schedule.doses, 3);
    }
}
