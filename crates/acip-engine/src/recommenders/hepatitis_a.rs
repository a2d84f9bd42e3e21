//! Hepatitis A: 2 doses from 12 months, 6 calendar months apart.

use acip_model::Recommendation;

use crate::context::VaccineContext;
use crate::recommenders::simple_series;

pub fn recommend(ctx: &VaccineContext<'_>) -> Option<Recommendation> {
    Some(simple_series(ctx))
}
