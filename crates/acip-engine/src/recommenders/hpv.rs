//! HPV: track depends on age at the first dose. Before the 15th birthday
//! the series is 2 doses 5 months apart; from 15 (or whenever the
//! patient is immunocompromised) it is 3 doses, with the final dose at
//! the later of 5 months after dose 1 and 12 weeks after dose 2. Routine
//! through 26; shared clinical decision-making through 45; nothing
//! after.

use acip_model::{DecisionType, Recommendation};
use acip_schedule::Gap;

use crate::context::VaccineContext;
use crate::recommenders::{give_dose, series_complete};
use crate::validator;

pub fn recommend(ctx: &VaccineContext<'_>) -> Option<Recommendation> {
    let age = ctx.age_years();
    let count = ctx.dose_count();

    if age < 9 {
        if count == 0 && ctx.all_doses.is_empty() {
            return None;
        }
        return Some(Recommendation::new(
            ctx.display_name(),
            DecisionType::NotRecommended,
            "HPV vaccination begins at 9 years of age",
        ));
    }

    let immunocompromised = ctx.conditions.immunocompromised;
    let start_months = ctx
        .first_counted()
        .map(|d| ctx.age_months_at(d.date))
        .unwrap_or_else(|| ctx.age_months());
    let schedule = validator::effective_schedule(
        ctx.rule,
        ctx.all_doses,
        Some(start_months),
        age,
    );
    let required = if immunocompromised { 3 } else { schedule.doses };
    let track_note = if immunocompromised { None } else { schedule.note };

    if count >= required {
        let mut rec = series_complete(ctx, &format!("Series complete ({required} doses)"));
        if let Some(note) = track_note {
            rec.note(note);
        }
        return Some(rec);
    }

    if age > 45 {
        if count == 0 && ctx.all_doses.is_empty() {
            return None;
        }
        let mut rec = Recommendation::new(
            ctx.display_name(),
            DecisionType::NotRecommended,
            "Not recommended beyond 45 years of age",
        );
        rec.note(format!("{count} of {required} doses received"));
        return Some(rec);
    }
    if age >= 27 {
        let mut rec = Recommendation::new(
            ctx.display_name(),
            DecisionType::SharedClinicalDecision,
            "May be given through 45 years of age based on shared clinical decision-making",
        );
        if count > 0 {
            rec.note(format!("{count} of {required} doses received"));
        }
        return Some(rec);
    }

    let next = count + 1;
    let min_date = match next {
        1 => ctx.rule.minimum_age.after(ctx.birth_date),
        2 => {
            let first = ctx.counted[0].date;
            if required == 2 {
                Gap::Months(5).after(first)
            } else {
                Gap::Weeks(4).after(first)
            }
        }
        _ => Gap::Months(5)
            .after(ctx.counted[0].date)
            .max(Gap::Weeks(12).after(ctx.counted[1].date)),
    };
    let mut rec = give_dose(ctx, next, min_date);
    if age <= 12 {
        rec.decision_type = DecisionType::Routine;
    }
    if let Some(note) = track_note {
        rec.note(note);
    }
    Some(rec)
}
