pub mod rule;
pub mod table;

pub use rule::{CatchUpBucket, CdcRule, DoseCount, Gap, Intervals, ProductVariant};
pub use table::{CDC_GUIDELINE_VERSION, STANDARD_PANEL, ScheduleRegistry, registry};
