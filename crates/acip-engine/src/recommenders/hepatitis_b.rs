//! Hepatitis B: 3-dose series with a compound floor on the final dose.
//!
//! Dose 3 must fall at or after all of: 8 weeks after dose 2, 16 weeks
//! after dose 1, and 24 weeks of age. The interval walk in the validator
//! only sees adjacent spacing, so the compound floor is re-checked here
//! and a final dose that misses it is repeated.

use chrono::NaiveDate;

use acip_model::Recommendation;
use acip_schedule::Gap;

use crate::context::VaccineContext;
use crate::datemath;
use crate::recommenders::{give_dose, series_complete};
use crate::validator::GRACE_PERIOD_DAYS;

pub fn recommend(ctx: &VaccineContext<'_>) -> Option<Recommendation> {
    match ctx.dose_count() {
        0 => Some(give_dose(ctx, 1, ctx.rule.minimum_age.after(ctx.birth_date))),
        1 => {
            let first = ctx.counted[0].date;
            Some(give_dose(ctx, 2, Gap::Weeks(4).after(first)))
        }
        _ => {
            let floor = final_dose_floor(ctx.birth_date, ctx.counted[0].date, ctx.counted[1].date);
            let earliest = datemath::sub_days(floor, GRACE_PERIOD_DAYS);
            if ctx.counted[2..].iter().any(|d| d.date >= earliest) {
                return Some(series_complete(ctx, "Series complete (3 doses)"));
            }
            let mut rec = give_dose(ctx, 3, floor);
            if ctx.dose_count() >= 3 {
                rec.note(
                    "The recorded final dose was given before 24 weeks of age or too close to the earlier doses; repeat it",
                );
            }
            Some(rec)
        }
    }
}

fn final_dose_floor(birth: NaiveDate, dose1: NaiveDate, dose2: NaiveDate) -> NaiveDate {
    Gap::Weeks(8)
        .after(dose2)
        .max(Gap::Weeks(16).after(dose1))
        .max(Gap::Weeks(24).after(birth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use acip_model::{DecisionType, SpecialConditions, VaccineId};

    use crate::recommenders::harness::{context, date, doses};

    #[test]
    fn newborn_starts_at_birth() {
        let none = SpecialConditions::default();
        let all = doses(&[]);
        let ctx = context(VaccineId::HepatitisB, "2025-08-01", "2025-08-25", &all, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert_eq!(rec.recommendation_text, "Give dose 1 now");
        assert_eq!(rec.next_dose_date, Some(date("2025-08-25")));
        assert!(!rec.series_complete);
        assert_eq!(rec.decision_type, DecisionType::CatchUp);
    }

    #[test]
    fn third_dose_waits_for_the_latest_floor() {
        // Doses at birth and 4 weeks: 8w after dose 2 and 16w after dose 1
        // are both earlier than 24 weeks of age.
        let none = SpecialConditions::default();
        let all = doses(&["2025-01-01", "2025-01-29"]);
        let ctx = context(VaccineId::HepatitisB, "2025-01-01", "2025-03-01", &all, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert_eq!(rec.next_dose_date, Some(date("2025-06-18")));
        assert_eq!(
            rec.recommendation_text,
            "Give dose 3 on or after 2025-06-18"
        );
        assert_eq!(rec.decision_type, DecisionType::Routine);
    }

    #[test]
    fn early_final_dose_is_repeated() {
        // Dose 3 at 18 weeks of age misses the 24-week floor by more than
        // the grace period.
        let none = SpecialConditions::default();
        let all = doses(&["2025-01-01", "2025-02-01", "2025-05-06"]);
        let ctx = context(VaccineId::HepatitisB, "2025-01-01", "2025-07-01", &all, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert!(!rec.series_complete);
        assert_eq!(rec.recommendation_text, "Give dose 3 now");
        assert!(rec.notes.iter().any(|n| n.contains("repeat")));
    }

    #[test]
    fn valid_three_dose_history_is_complete() {
        let none = SpecialConditions::default();
        let all = doses(&["2024-01-01", "2024-02-15", "2024-07-01"]);
        let ctx = context(VaccineId::HepatitisB, "2024-01-01", "2025-01-01", &all, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert!(rec.series_complete);
        assert!(rec.next_dose_date.is_none());
    }
}
