//! Meningococcal ACWY. Everything turns on whether a counted dose was
//! given at 16 years or older: one such dose closes the series, and any
//! earlier adolescent dose leaves a 16-year booster outstanding. Doses
//! before age 10 never count (the schedule entry's minimum age enforces
//! that in the validator).

use acip_model::{DecisionType, Recommendation};
use acip_schedule::Gap;

use crate::context::VaccineContext;
use crate::recommenders::{give_dose, give_labeled};

pub fn recommend(ctx: &VaccineContext<'_>) -> Option<Recommendation> {
    let age = ctx.age_years();
    let count = ctx.dose_count();

    if count > 0 {
        let has_16_plus = ctx
            .counted
            .iter()
            .any(|d| ctx.age_years_at(d.date) >= 16);
        if has_16_plus {
            let mut rec = Recommendation::new(
                ctx.display_name(),
                DecisionType::Routine,
                "Series complete: a dose at 16 years or older closes the series",
            );
            rec.series_complete = true;
            return Some(rec);
        }
        if age > 21 {
            let mut rec = Recommendation::new(
                ctx.display_name(),
                DecisionType::AgedOut,
                "Catch-up is not routinely recommended beyond 21 years of age",
            );
            rec.note("No dose at 16 years or older on record");
            return Some(rec);
        }
        let last = ctx.counted[count - 1].date;
        let min_date = Gap::Months(192)
            .after(ctx.birth_date)
            .max(Gap::Weeks(8).after(last));
        let label = if age >= 19 {
            "1 catch-up dose"
        } else {
            "the 16-year booster dose"
        };
        return Some(give_labeled(ctx, label, min_date));
    }

    if age < 11 {
        if ctx.conditions.high_risk_meningococcal() {
            let mut rec = Recommendation::new(
                ctx.display_name(),
                DecisionType::RiskBased,
                "Begin the risk-based meningococcal ACWY schedule",
            );
            rec.note("High-risk children are vaccinated earlier than the routine age of 11; consult the risk-based schedule for their condition");
            return Some(rec);
        }
        if ctx.all_doses.is_empty() {
            return None;
        }
        return Some(Recommendation::new(
            ctx.display_name(),
            DecisionType::NotRecommended,
            "Not routinely recommended before 11 years of age",
        ));
    }
    if age <= 21 {
        let mut rec = give_dose(ctx, 1, ctx.rule.minimum_age.after(ctx.birth_date));
        if age <= 12 {
            rec.decision_type = DecisionType::Routine;
        }
        if age >= 16 {
            rec.note("A single dose completes the series at 16 years or older");
        } else {
            rec.note("A booster at 16 years will complete the series");
        }
        return Some(rec);
    }
    if ctx.all_doses.is_empty() {
        return None;
    }
    let mut rec = Recommendation::new(
        ctx.display_name(),
        DecisionType::AgedOut,
        "Catch-up is not routinely recommended beyond 21 years of age",
    );
    rec.note("No submitted dose counted toward the series");
    Some(rec)
}
