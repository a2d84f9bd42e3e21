//! Varicella: 2 doses from 12 months. The minimum interval is the
//! age-dependent part: 3 months before the 13th birthday, 4 weeks from
//! it. Live; blocked by the dispatch gate under pregnancy or
//! immunocompromise.

use acip_model::Recommendation;

use crate::context::VaccineContext;
use crate::recommenders::simple_series;

pub fn recommend(ctx: &VaccineContext<'_>) -> Option<Recommendation> {
    Some(simple_series(ctx))
}
