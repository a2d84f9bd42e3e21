//! DTaP under 7 years, Tdap/Td from 7 up. One merged timeline covers
//! both: childhood DTaP doses count toward the adolescent primary
//! series.
//!
//! Childhood rule of note: dose 5 is waived when dose 4 was given at
//! 4 years or older and at least 6 months after dose 3. From age 7 the
//! series shortens to a 3-dose primary plus a one-time adolescent
//! booster, satisfied by any counted dose given at age 10 or later.

use chrono::NaiveDate;

use acip_model::Recommendation;
use acip_schedule::Gap;

use crate::context::VaccineContext;
use crate::datemath;
use crate::recommenders::{give_dose, give_labeled, series_complete};
use crate::validator::GRACE_PERIOD_DAYS;

const CATCH_UP_PRODUCT_NOTE: &str = "Use Tdap for the first catch-up dose, then Td or Tdap";

pub fn recommend(ctx: &VaccineContext<'_>) -> Option<Recommendation> {
    if ctx.age_years() < 7 {
        childhood(ctx)
    } else {
        adolescent(ctx)
    }
}

fn childhood(ctx: &VaccineContext<'_>) -> Option<Recommendation> {
    let count = ctx.dose_count();
    if count >= 5 {
        return Some(series_complete(ctx, "Series complete (5 doses)"));
    }
    if count == 4 {
        let dose3 = ctx.counted[2].date;
        let dose4 = ctx.counted[3].date;
        if dose_five_waived(ctx.birth_date, dose3, dose4) {
            let mut rec = series_complete(ctx, "Series complete (4 doses)");
            rec.note(
                "Dose 5 is not necessary: dose 4 was given at 4 years or older and at least 6 months after dose 3",
            );
            return Some(rec);
        }
        return Some(give_dose(ctx, 5, Gap::Months(6).after(dose4)));
    }
    if count == 0 {
        return Some(give_dose(ctx, 1, ctx.rule.minimum_age.after(ctx.birth_date)));
    }
    let next = count + 1;
    let last = ctx.counted[count - 1].date;
    let min_date = match ctx.rule.intervals.before_dose(next, ctx.age_years()) {
        Some(gap) => gap.after(last),
        None => last,
    };
    Some(give_dose(ctx, next, min_date))
}

fn dose_five_waived(birth: NaiveDate, dose3: NaiveDate, dose4: NaiveDate) -> bool {
    let fourth_birthday = Gap::Months(48).after(birth);
    let spacing_floor = Gap::Months(6).after(dose3);
    dose4 >= datemath::sub_days(fourth_birthday, GRACE_PERIOD_DAYS)
        && dose4 >= datemath::sub_days(spacing_floor, GRACE_PERIOD_DAYS)
}

fn adolescent(ctx: &VaccineContext<'_>) -> Option<Recommendation> {
    let count = ctx.dose_count();
    if count < 3 {
        let next = count + 1;
        let min_date = match ctx.counted.last() {
            None => ctx.rule.minimum_age.after(ctx.birth_date),
            Some(last) => match ctx.rule.intervals.before_dose(next, ctx.age_years()) {
                Some(gap) => gap.after(last.date),
                None => last.date,
            },
        };
        let mut rec = give_dose(ctx, next, min_date);
        rec.note(CATCH_UP_PRODUCT_NOTE);
        return Some(rec);
    }

    if ctx.age_years() >= 19 {
        let mut rec = series_complete(ctx, "Series complete");
        rec.note("Maintain protection with a Td or Tdap booster every 10 years");
        return Some(rec);
    }
    let booster_done = ctx
        .counted
        .iter()
        .any(|d| ctx.age_years_at(d.date) >= 10);
    if booster_done {
        return Some(series_complete(
            ctx,
            "Primary series and adolescent booster complete",
        ));
    }
    let eleventh_birthday = Gap::Months(132).after(ctx.birth_date);
    Some(give_labeled(ctx, "adolescent Tdap booster", eleventh_birthday))
}

#[cfg(test)]
mod tests {
    use super::*;
    use acip_model::{DecisionType, SpecialConditions, VaccineId};

    use crate::recommenders::harness::{context, date, doses};

    #[test]
    fn dose_four_at_four_years_waives_dose_five() {
        let none = SpecialConditions::default();
        let all = doses(&["2011-01-19", "2011-02-17", "2011-04-07", "2014-11-19"]);
        let ctx = context(VaccineId::DtapTdap, "2010-09-21", "2015-02-01", &all, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert!(rec.series_complete);
        assert_eq!(rec.vaccine_name, "DTaP");
        assert!(rec.notes.iter().any(|n| n.contains("Dose 5 is not necessary")));
    }

    #[test]
    fn early_dose_four_still_needs_dose_five() {
        // Dose 4 at 21 months: the waiver needs age 4.
        let none = SpecialConditions::default();
        let all = doses(&["2021-03-01", "2021-04-01", "2021-05-01", "2022-11-05"]);
        let ctx = context(VaccineId::DtapTdap, "2021-01-15", "2025-07-01", &all, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert!(!rec.series_complete);
        assert_eq!(rec.recommendation_text, "Give dose 5 now");
        assert_eq!(rec.decision_type, DecisionType::CatchUp);
    }

    #[test]
    fn unvaccinated_seven_year_old_starts_tdap_catch_up() {
        let none = SpecialConditions::default();
        let all = doses(&[]);
        let ctx = context(VaccineId::DtapTdap, "2017-06-01", "2025-07-01", &all, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert_eq!(rec.vaccine_name, "Tdap");
        assert_eq!(rec.recommendation_text, "Give dose 1 now");
        assert!(rec.notes.iter().any(|n| n.contains("Tdap")));
    }

    #[test]
    fn childhood_primary_without_teen_dose_needs_booster() {
        let none = SpecialConditions::default();
        let all = doses(&["2012-03-01", "2012-04-01", "2012-11-01"]);
        let ctx = context(VaccineId::DtapTdap, "2012-01-01", "2025-01-01", &all, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert_eq!(
            rec.recommendation_text,
            "Give adolescent Tdap booster now"
        );
        assert_eq!(rec.next_dose_date, Some(date("2025-01-01")));
    }

    #[test]
    fn booster_waits_for_the_eleventh_birthday() {
        let none = SpecialConditions::default();
        let all = doses(&["2016-03-01", "2016-04-01", "2016-11-01"]);
        let ctx = context(VaccineId::DtapTdap, "2016-01-01", "2024-06-01", &all, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert_eq!(
            rec.recommendation_text,
            "Give adolescent Tdap booster on or after 2027-01-01"
        );
        assert_eq!(rec.decision_type, DecisionType::Routine);
    }

    #[test]
    fn adults_with_complete_primary_get_the_decennial_note() {
        let none = SpecialConditions::default();
        let all = doses(&["2012-02-01", "2012-03-01", "2012-10-01"]);
        let ctx = context(VaccineId::DtapTdap, "2005-01-01", "2024-06-01", &all, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert!(rec.series_complete);
        assert!(rec.notes.iter().any(|n| n.contains("every 10 years")));
    }
}
