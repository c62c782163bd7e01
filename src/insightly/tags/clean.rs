//! Projection and whitespace trimming of loaded records.

use crate::insightly::tags::model::{ContactRecord, Enrolment, EnrolmentRecord};

/// Types that can be reduced to their cleaned form. Cleaning a cleaned value
/// yields the same value.
pub trait Clean {
    type Output;

    fn clean(&self) -> Self::Output;
}

impl Clean for EnrolmentRecord {
    type Output = Enrolment;

    fn clean(&self) -> Enrolment {
        Enrolment {
            enrolment_code: self.enrolment_code.trim().to_string(),
            student_id: self.student_id.trim().to_string(),
            tag: self.tag.trim().to_string(),
        }
    }
}

impl Clean for Enrolment {
    type Output = Enrolment;

    fn clean(&self) -> Enrolment {
        Enrolment {
            enrolment_code: self.enrolment_code.trim().to_string(),
            student_id: self.student_id.trim().to_string(),
            tag: self.tag.trim().to_string(),
        }
    }
}

impl Clean for ContactRecord {
    type Output = ContactRecord;

    fn clean(&self) -> ContactRecord {
        ContactRecord {
            student_id: self.student_id.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            tags: self.tags.trim().to_string(),
        }
    }
}

/// Cleans every record in order.
pub fn clean_records<T: Clean>(records: &[T]) -> Vec<T::Output> {
    records.iter().map(Clean::clean).collect()
}
