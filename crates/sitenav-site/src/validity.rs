//! Effective-date filtering for site preview.
//!
//! Content items may carry `startdate` and `enddate` attributes. When a build
//! runs with an effective date, only items valid on that date are placed in
//! the tree.

use chrono::NaiveDateTime;
use sitenav_store::AttributeSet;

/// Attribute holding the first moment an item is valid.
pub const START_DATE: &str = "startdate";

/// Attribute holding the moment an item stops being valid.
pub const END_DATE: &str = "enddate";

/// Check `start < effective < end`, treating a missing bound as open.
///
/// Both bounds missing means the item is always valid.
#[must_use]
pub fn is_date_within_range(
    start: Option<NaiveDateTime>,
    effective: NaiveDateTime,
    end: Option<NaiveDateTime>,
) -> bool {
    start.is_none_or(|start| start < effective) && end.is_none_or(|end| effective < end)
}

/// Check whether a content item is valid on `effective`.
pub(crate) fn is_valid_on(attributes: &AttributeSet, effective: NaiveDateTime) -> bool {
    is_date_within_range(
        attributes.as_date(START_DATE),
        effective,
        attributes.as_date(END_DATE),
    )
}
