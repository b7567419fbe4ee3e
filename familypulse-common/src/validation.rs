//! Caller-side validation of member records
//!
//! The collection store assumes validated input; HTTP handlers and other
//! callers run these checks before adding a member.

use thiserror::Error;

use crate::models::{MemberRecord, MAX_AGE};

/// Field constraint broken by a member record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationViolation {
    #[error("Name is required")]
    EmptyName,

    #[error("Age {0} is outside 0..=120")]
    AgeOutOfRange(u32),
}

/// Check a record before it is added to a collection
pub fn validate_member(record: &MemberRecord) -> Result<(), ValidationViolation> {
    if record.name.trim().is_empty() {
        return Err(ValidationViolation::EmptyName);
    }
    validate_age(u32::from(record.age))
}

/// Check an age value from any source
pub fn validate_age(age: u32) -> Result<(), ValidationViolation> {
    if age > u32::from(MAX_AGE) {
        return Err(ValidationViolation::AgeOutOfRange(age));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::create_draft_record;

    #[test]
    fn test_blank_name_rejected() {
        let mut record = create_draft_record(1);
        record.name = "   ".to_string();
        assert_eq!(validate_member(&record), Err(ValidationViolation::EmptyName));
    }

    #[test]
    fn test_age_bounds() {
        assert!(validate_age(0).is_ok());
        assert!(validate_age(120).is_ok());
        assert_eq!(validate_age(121), Err(ValidationViolation::AgeOutOfRange(121)));
    }

    #[test]
    fn test_valid_record_accepted() {
        let mut record = create_draft_record(1);
        record.name = "John".to_string();
        record.age = 45;
        assert!(validate_member(&record).is_ok());
    }

    #[test]
    fn test_out_of_range_age_on_record() {
        let mut record = create_draft_record(1);
        record.name = "Old Timer".to_string();
        record.age = 130;
        assert_eq!(
            validate_member(&record),
            Err(ValidationViolation::AgeOutOfRange(130))
        );
    }
}
