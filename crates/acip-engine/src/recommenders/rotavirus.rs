//! Rotavirus: the only series with hard upper age limits.
//!
//! The first dose must be given before 15 weeks 0 days of age and the
//! last by 8 months 0 days; neither limit gets the grace period. Product
//! determines length (Rotarix 2 doses, RotaTeq 3, unknown or mixed 3).
//!
//! A patient past 8 months with no submitted doses gets no entry at all.
//! Submitted-but-excluded doses keep the vaccine visible so the
//! exclusion notes reach the caller.

use acip_model::{DecisionType, Recommendation};

use crate::context::VaccineContext;
use crate::datemath;
use crate::recommenders::{give_dose, series_complete};
use crate::validator;

pub fn recommend(ctx: &VaccineContext<'_>) -> Option<Recommendation> {
    let rule = ctx.rule;
    let final_deadline = rule
        .maximum_age
        .map(|gap| gap.after(ctx.birth_date))
        .unwrap_or(chrono::NaiveDate::MAX);
    let start_deadline = rule
        .start_deadline
        .map(|gap| gap.after(ctx.birth_date))
        .unwrap_or(chrono::NaiveDate::MAX);

    let start_age = ctx
        .first_counted()
        .map(|d| ctx.age_months_at(d.date));
    let schedule = validator::effective_schedule(rule, ctx.all_doses, start_age, ctx.age_years());

    if ctx.dose_count() == 0 {
        if ctx.current_date > final_deadline {
            if ctx.all_doses.is_empty() {
                return None;
            }
            let mut rec = Recommendation::new(
                ctx.display_name(),
                DecisionType::AgedOut,
                "Series cannot be given: the maximum age for the final dose is 8 months 0 days",
            );
            rec.note("No submitted dose counted toward the series");
            return Some(rec);
        }
        if ctx.current_date >= start_deadline {
            let mut rec = Recommendation::new(
                ctx.display_name(),
                DecisionType::NotRecommended,
                "Do not start the series: the first dose must be given before 15 weeks 0 days of age",
            );
            rec.series_complete = true;
            rec.note("The maximum age for the final dose is 8 months 0 days");
            return Some(rec);
        }
        let mut rec = give_dose(ctx, 1, rule.minimum_age.after(ctx.birth_date));
        rec.note(format!(
            "Start before {} and finish the series by {}",
            datemath::format_iso(start_deadline),
            datemath::format_iso(final_deadline)
        ));
        return Some(rec);
    }

    if ctx.dose_count() >= schedule.doses {
        let mut rec = series_complete(
            ctx,
            &format!("Series complete ({} doses)", schedule.doses),
        );
        if let Some(note) = schedule.note {
            rec.note(note);
        }
        return Some(rec);
    }

    // A dose given on the deadline day itself is still valid.
    if ctx.current_date > final_deadline {
        let mut rec = Recommendation::new(
            ctx.display_name(),
            DecisionType::AgedOut,
            "Series cannot be completed: the maximum age for the final dose is 8 months 0 days",
        );
        rec.note(format!(
            "{} of {} doses received before aging out",
            ctx.dose_count(),
            schedule.doses
        ));
        return Some(rec);
    }

    let next = ctx.dose_count() + 1;
    let last = ctx.last_counted().map(|d| d.date).unwrap_or(ctx.birth_date);
    let min_date = match schedule.intervals.before_dose(next, ctx.age_years()) {
        Some(gap) => gap.after(last),
        None => last,
    };
    if min_date > final_deadline {
        let mut rec = Recommendation::new(
            ctx.display_name(),
            DecisionType::AgedOut,
            "Series cannot be completed: the next dose would fall past 8 months 0 days of age",
        );
        rec.note(format!(
            "{} of {} doses received",
            ctx.dose_count(),
            schedule.doses
        ));
        return Some(rec);
    }
    let mut rec = give_dose(ctx, next, min_date);
    rec.note(format!(
        "Final dose must be given by {}",
        datemath::format_iso(final_deadline)
    ));
    if let Some(note) = schedule.note {
        rec.note(note);
    }
    Some(rec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use acip_model::{SpecialConditions, VaccineId};

    use crate::recommenders::harness::{context, date, doses, doses_of};

    #[test]
    fn too_old_with_no_history_is_excluded_entirely() {
        let none = SpecialConditions::default();
        let all = doses(&[]);
        let ctx = context(VaccineId::Rotavirus, "2023-01-01", "2025-07-02", &all, &none);
        assert!(recommend(&ctx).is_none());
    }

    #[test]
    fn too_old_to_start_but_under_final_limit() {
        // 20 weeks old: past the 15-week start limit, under 8 months.
        let none = SpecialConditions::default();
        let all = doses(&[]);
        let ctx = context(VaccineId::Rotavirus, "2025-01-01", "2025-05-21", &all, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert_eq!(rec.decision_type, DecisionType::NotRecommended);
        assert!(rec.series_complete);
        assert!(rec.recommendation_text.contains("15 weeks"));
    }

    #[test]
    fn started_but_aged_out_before_finishing() {
        let none = SpecialConditions::default();
        let all = doses(&["2024-11-01"]);
        let ctx = context(VaccineId::Rotavirus, "2024-09-01", "2025-06-01", &all, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert_eq!(rec.decision_type, DecisionType::AgedOut);
        assert!(!rec.series_complete);
        assert!(rec.next_dose_date.is_none());
    }

    #[test]
    fn final_dose_on_the_deadline_day_still_counts() {
        let none = SpecialConditions::default();
        let all = doses(&["2025-02-15", "2025-08-04"]);
        let ctx = context(VaccineId::Rotavirus, "2025-01-01", "2025-09-01", &all, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert_eq!(rec.recommendation_text, "Give dose 3 now");
        assert_eq!(rec.next_dose_date, Some(date("2025-09-01")));
        assert!(!rec.series_complete);

        let ctx = context(VaccineId::Rotavirus, "2025-01-01", "2025-09-02", &all, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert_eq!(rec.decision_type, DecisionType::AgedOut);
    }

    #[test]
    fn rotarix_completes_at_two_doses() {
        let none = SpecialConditions::default();
        let all = doses_of("Rotarix", &["2025-03-01", "2025-04-01"]);
        let ctx = context(VaccineId::Rotavirus, "2025-01-01", "2025-05-01", &all, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert!(rec.series_complete);
        assert!(rec.recommendation_text.contains("2 doses"));
    }

    #[test]
    fn infant_on_schedule_gets_next_dose_with_deadline_note() {
        let none = SpecialConditions::default();
        let all = doses(&["2025-03-01"]);
        let ctx = context(VaccineId::Rotavirus, "2025-01-15", "2025-04-15", &all, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert_eq!(rec.recommendation_text, "Give dose 2 now");
        assert!(rec.notes.iter().any(|n| n.contains("2025-09-15")));
    }
}
