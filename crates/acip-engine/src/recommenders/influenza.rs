//! Seasonal influenza. A season runs July 1 through June 30; one dose in
//! the current season completes it, except that children under 9 with
//! fewer than 2 lifetime doses before the season need 2 doses at least
//! 4 weeks apart.

use chrono::{Datelike, NaiveDate};

use acip_model::{DecisionType, Recommendation};
use acip_schedule::Gap;

use crate::context::VaccineContext;
use crate::recommenders::{give_labeled, series_complete};

const TWO_DOSE_NOTE: &str =
    "Children under 9 years with fewer than 2 prior doses need 2 doses at least 4 weeks apart this season";

fn season_start(current: NaiveDate) -> NaiveDate {
    let year = if current.month() >= 7 {
        current.year()
    } else {
        current.year() - 1
    };
    NaiveDate::from_ymd_opt(year, 7, 1).unwrap_or(NaiveDate::MIN)
}

pub fn recommend(ctx: &VaccineContext<'_>) -> Option<Recommendation> {
    let minimum = ctx.rule.minimum_age.after(ctx.birth_date);
    if ctx.current_date < minimum {
        let mut rec = give_labeled(ctx, "the first annual dose", minimum);
        rec.note("Annual vaccination every season from 6 months of age");
        return Some(rec);
    }

    let season = season_start(ctx.current_date);
    let season_doses = ctx.counted.iter().filter(|d| d.date >= season).count();
    let prior_lifetime = ctx.dose_count() - season_doses;
    let needs_two = ctx.age_years() < 9 && prior_lifetime < 2;

    if season_doses == 0 {
        let mut rec = give_labeled(ctx, "the annual dose", minimum);
        rec.decision_type = DecisionType::Routine;
        if needs_two {
            rec.note(TWO_DOSE_NOTE);
        }
        return Some(rec);
    }
    if needs_two && season_doses < 2 {
        let last = ctx
            .last_counted()
            .map(|d| d.date)
            .unwrap_or(ctx.current_date);
        let mut rec = give_labeled(ctx, "dose 2 of this season", Gap::Weeks(4).after(last));
        rec.decision_type = DecisionType::Routine;
        rec.note(TWO_DOSE_NOTE);
        return Some(rec);
    }
    Some(series_complete(
        ctx,
        "Vaccinated for the current influenza season",
    ))
}
