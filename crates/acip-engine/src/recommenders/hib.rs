//! Hib: bucketed catch-up where later starts need fewer doses.
//!
//! The bucket is fixed by age at the first counted dose (current age when
//! nothing counted) and sticks for the rest of the series. Infant buckets
//! bind the booster dose to 12 months of age or later. Not routine from
//! age 5; high-risk conditions keep a single risk-based dose available.

use acip_model::{DecisionType, Recommendation};

use crate::context::VaccineContext;
use crate::recommenders::{dose_word, give_dose, series_complete};
use crate::validator;

pub fn recommend(ctx: &VaccineContext<'_>) -> Option<Recommendation> {
    let count = ctx.dose_count();
    let start_months = ctx
        .first_counted()
        .map(|d| ctx.age_months_at(d.date))
        .unwrap_or_else(|| ctx.age_months());
    let schedule = validator::effective_schedule(
        ctx.rule,
        ctx.all_doses,
        Some(start_months),
        ctx.age_years(),
    );

    if count > 0 && count >= schedule.doses {
        let mut rec = series_complete(
            ctx,
            &format!(
                "Series complete ({} {})",
                schedule.doses,
                dose_word(schedule.doses)
            ),
        );
        if let Some(note) = schedule.note {
            rec.note(note);
        }
        return Some(rec);
    }

    if ctx.age_months() >= 60 {
        if ctx.conditions.high_risk_hib_pneumococcal() {
            // One dose at 5 years or older satisfies the indication;
            // infant doses do not.
            if ctx
                .counted
                .iter()
                .any(|d| ctx.age_months_at(d.date) >= 60)
            {
                let mut rec = series_complete(ctx, "Series complete (1 dose)");
                rec.decision_type = DecisionType::RiskBased;
                rec.note("High-risk single dose received at 5 years or older");
                return Some(rec);
            }
            let mut rec = Recommendation::new(
                ctx.display_name(),
                DecisionType::RiskBased,
                "Give 1 dose now",
            );
            rec.next_dose_date = Some(ctx.current_date);
            rec.note("Single dose indicated for high-risk conditions at 5 years and older");
            return Some(rec);
        }
        if count == 0 && ctx.all_doses.is_empty() {
            return None;
        }
        let mut rec = Recommendation::new(
            ctx.display_name(),
            DecisionType::AgedOut,
            "Not routinely recommended at 5 years of age or older",
        );
        rec.note("Series was not completed before age 5");
        return Some(rec);
    }

    let next = count + 1;
    let mut min_date = match ctx.last_counted() {
        None => ctx.rule.minimum_age.after(ctx.birth_date),
        Some(last) => match schedule.intervals.before_dose(next, ctx.age_years()) {
            Some(gap) => gap.after(last.date),
            None => last.date,
        },
    };
    if next == schedule.doses
        && let Some(floor) = schedule.final_dose_min_age
    {
        min_date = min_date.max(floor.after(ctx.birth_date));
    }
    let mut rec = give_dose(ctx, next, min_date);
    if let Some(note) = schedule.note {
        rec.note(note);
    }
    Some(rec)
}
