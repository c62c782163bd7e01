use tracing::debug;

use crate::insightly::tags::extract::is_inactive_tag;
use crate::insightly::tags::model::ContactRecord;

/// Removes contacts whose tags mark them as withdrawn, expired, graduated or
/// transferred. Order of the remaining contacts is preserved.
pub fn filter_active(records: Vec<ContactRecord>) -> Vec<ContactRecord> {
    let before = records.len();
    let active: Vec<ContactRecord> = records
        .into_iter()
        .filter(|record| !is_inactive_tag(&record.tags))
        .collect();
    debug!(
        kept = active.len(),
        dropped = before - active.len(),
        "filtered inactive contacts"
    );
    active
}
