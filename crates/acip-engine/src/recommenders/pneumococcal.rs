//! Pneumococcal conjugate: Hib-style buckets plus the 24-through-59-month
//! shortcut, where one dose (two for high-risk conditions) finishes any
//! incomplete series regardless of what came before.

use acip_model::{DecisionType, Recommendation};
use acip_schedule::Gap;

use crate::context::VaccineContext;
use crate::recommenders::{dose_word, give_dose, give_labeled, series_complete};
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

    let high_risk = ctx.conditions.high_risk_hib_pneumococcal();
    if ctx.age_months() >= 60 {
        if high_risk {
            // One dose at 5 years or older satisfies the indication;
            // earlier doses do not.
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

    if ctx.age_months() >= 24 {
        // From 24 months the series is finished by doses given in this
        // window, not by the original bucket count.
        let window_count = ctx
            .counted
            .iter()
            .filter(|d| ctx.age_months_at(d.date) >= 24)
            .count();
        let needed = if high_risk { 2 } else { 1 };
        if window_count >= needed {
            let mut rec = series_complete(ctx, "Series complete");
            rec.note("A single dose at 24 through 59 months completes catch-up");
            return Some(rec);
        }
        let min_date = match ctx.last_counted() {
            Some(last) => Gap::Weeks(8).after(last.date),
            None => ctx.rule.minimum_age.after(ctx.birth_date),
        };
        let mut rec = give_labeled(ctx, "1 dose", min_date);
        rec.recommendation_text
            .push_str(" (PCV20 preferred, PCV15 acceptable)");
        if high_risk {
            rec.decision_type = DecisionType::RiskBased;
        }
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
