//! Inactivated poliovirus: 4 doses, final dose at age 4 or later and at
//! least 6 months after dose 3. Both floors sit in the schedule entry, so
//! the validator already rejects a too-early dose 4; this module only
//! projects the next dose and closes out adults.

use acip_model::{DecisionType, Recommendation};

use crate::context::VaccineContext;
use crate::recommenders::{give_dose, series_complete};

pub fn recommend(ctx: &VaccineContext<'_>) -> Option<Recommendation> {
    let count = ctx.dose_count();
    if count >= 4 {
        return Some(series_complete(ctx, "Series complete (4 doses)"));
    }

    if ctx.age_years() >= 18 {
        if count == 0 && ctx.all_doses.is_empty() {
            return None;
        }
        let mut rec = Recommendation::new(
            ctx.display_name(),
            DecisionType::AgedOut,
            "Routine poliovirus catch-up applies through 17 years of age",
        );
        rec.note("Adult vaccination is indicated only for specific risk exposures");
        return Some(rec);
    }

    let next = count + 1;
    let mut min_date = match ctx.last_counted() {
        None => ctx.rule.minimum_age.after(ctx.birth_date),
        Some(last) => match ctx.rule.intervals.before_dose(next, ctx.age_years()) {
            Some(gap) => gap.after(last.date),
            None => last.date,
        },
    };
    if next == 4
        && let Some(floor) = ctx.rule.final_dose_min_age
    {
        min_date = min_date.max(floor.after(ctx.birth_date));
    }
    Some(give_dose(ctx, next, min_date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use acip_model::{SpecialConditions, VaccineId};

    use crate::recommenders::harness::{context, date, doses};

    #[test]
    fn final_dose_waits_for_the_fourth_birthday() {
        let none = SpecialConditions::default();
        let all = doses(&["2021-03-01", "2021-04-01", "2021-11-01"]);
        let ctx = context(VaccineId::Ipv, "2021-01-01", "2024-06-01", &all, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert_eq!(
            rec.recommendation_text,
            "Give dose 4 on or after 2025-01-01"
        );
        assert_eq!(rec.next_dose_date, Some(date("2025-01-01")));
    }

    #[test]
    fn early_final_dose_leaves_the_series_open() {
        // The fourth dose at 17 months misses the age-4 floor; the
        // validator drops it and a repeat is scheduled.
        let none = SpecialConditions::default();
        let all = doses(&["2021-03-01", "2021-04-01", "2021-11-01", "2022-06-01"]);
        let ctx = context(VaccineId::Ipv, "2021-01-01", "2025-06-01", &all, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert!(!rec.series_complete);
        assert_eq!(rec.recommendation_text, "Give dose 4 now");
    }

    #[test]
    fn adults_are_excluded_or_aged_out() {
        let none = SpecialConditions::default();
        let empty = doses(&[]);
        let ctx = context(VaccineId::Ipv, "2000-01-01", "2025-01-01", &empty, &none);
        assert!(recommend(&ctx).is_none());

        let partial = doses(&["2005-01-01"]);
        let ctx = context(VaccineId::Ipv, "2000-01-01", "2025-01-01", &partial, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert_eq!(rec.decision_type, DecisionType::AgedOut);
    }

    #[test]
    fn valid_four_dose_history_is_complete() {
        let none = SpecialConditions::default();
        let all = doses(&["2018-03-01", "2018-04-01", "2018-11-01", "2022-06-01"]);
        let ctx = context(VaccineId::Ipv, "2018-01-01", "2025-01-01", &all, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert!(rec.series_complete);
    }
}
