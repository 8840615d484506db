//! Section Visibility Filter: decides whether a section renders and which of
//! its records are passed on.

use crate::models::resume::{Displayable, MilitaryServiceRecord};

pub fn any_shown<T: Displayable>(records: &[T]) -> bool {
    records.iter().any(Displayable::is_shown)
}

/// Visible records in their original order.
pub fn shown<T: Displayable>(records: &[T]) -> Vec<&T> {
    records.iter().filter(|r| r.is_shown()).collect()
}

/// `None` when the section must not render at all.
pub fn section<T: Displayable>(records: &[T]) -> Option<Vec<&T>> {
    any_shown(records).then(|| shown(records))
}

/// The military-service singleton renders only with a non-blank title.
pub fn military_service(record: Option<&MilitaryServiceRecord>) -> Option<&MilitaryServiceRecord> {
    record.filter(|r| !r.title.trim().is_empty())
}

/// The closing PDF call-to-action needs a static export and a hosted PDF URL.
pub fn pdf_call_to_action(static_export: bool, pdf_url: Option<&str>) -> Option<&str> {
    if !static_export {
        return None;
    }
    pdf_url.filter(|url| !url.trim().is_empty())
}
