//! Joins cleaned enrolments with enriched contacts on student ID.
//!
//! The key comparison is exact and case-sensitive. Duplicate IDs on either
//! side multiply out like a relational join; deduplicate beforehand if one
//! row per student is required.

use std::collections::HashMap;

use tracing::debug;

use crate::insightly::tags::model::{
    EnrichedContact, Enrolment, InclusionMode, MergedRow, NOT_APPLICABLE,
};

/// Joins both sides under the given inclusion mode.
///
/// `Inner` rows follow enrolment order, each enrolment paired with its
/// matching contacts in contact order. `RightOuter` rows follow contact order;
/// a contact with no enrolment yields one row whose enrolment code is `N/A`.
pub fn reconcile(
    enrolments: &[Enrolment],
    enriched: &[EnrichedContact],
    mode: InclusionMode,
) -> Vec<MergedRow> {
    let rows = match mode {
        InclusionMode::Inner => inner_join(enrolments, enriched),
        InclusionMode::RightOuter => right_join(enrolments, enriched),
    };
    debug!(
        ?mode,
        enrolment_count = enrolments.len(),
        contact_count = enriched.len(),
        row_count = rows.len(),
        "reconciled records"
    );
    rows
}

fn inner_join(enrolments: &[Enrolment], enriched: &[EnrichedContact]) -> Vec<MergedRow> {
    let mut by_student: HashMap<&str, Vec<&EnrichedContact>> = HashMap::new();
    for contact in enriched {
        by_student
            .entry(contact.contact.student_id.as_str())
            .or_default()
            .push(contact);
    }

    let mut rows = Vec::new();
    for enrolment in enrolments {
        if let Some(matches) = by_student.get(enrolment.student_id.as_str()) {
            for contact in matches {
                rows.push(merge(&enrolment.enrolment_code, contact));
            }
        }
    }
    rows
}

fn right_join(enrolments: &[Enrolment], enriched: &[EnrichedContact]) -> Vec<MergedRow> {
    let mut by_student: HashMap<&str, Vec<&Enrolment>> = HashMap::new();
    for enrolment in enrolments {
        by_student
            .entry(enrolment.student_id.as_str())
            .or_default()
            .push(enrolment);
    }

    let mut rows = Vec::with_capacity(enriched.len());
    for contact in enriched {
        match by_student.get(contact.contact.student_id.as_str()) {
            Some(matches) => {
                for enrolment in matches {
                    rows.push(merge(&enrolment.enrolment_code, contact));
                }
            }
            None => rows.push(merge(NOT_APPLICABLE, contact)),
        }
    }
    rows
}

fn merge(enrolment_code: &str, enriched: &EnrichedContact) -> MergedRow {
    MergedRow {
        enrolment_code: enrolment_code.to_string(),
        student_id: enriched.contact.student_id.clone(),
        first_name: enriched.contact.first_name.clone(),
        last_name: enriched.contact.last_name.clone(),
        course: enriched.course.clone(),
        tutor: enriched.tutor.clone(),
        status: enriched.status,
    }
}
