//! Entity drafts and field validation.
//!
//! A draft is the shell-side form state handed over on save. Validation
//! runs before any request is dispatched; an invalid draft surfaces a
//! message and never reaches the wire.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::location::SelectionState;
use crate::{Franchise, MetaInfo, Technician};

pub const PHONE_DIGITS: usize = 10;
pub const PINCODE_DIGITS: usize = 6;
pub const META_DESCRIPTION_MAX: usize = 500;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },
    #[error("{field} must be a valid email address")]
    InvalidEmail { field: &'static str },
    #[error("{field} must be a {PHONE_DIGITS}-digit phone number")]
    InvalidPhone { field: &'static str },
    #[error("{field} must be a {PINCODE_DIGITS}-digit pincode")]
    InvalidPincode { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(())
}

fn require_email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    require(field, value)?;
    let Some((local, domain)) = value.split_once('@') else {
        return Err(ValidationError::InvalidEmail { field });
    };
    if local.is_empty() || domain.len() < 3 || !domain.contains('.') || domain.contains('@') {
        return Err(ValidationError::InvalidEmail { field });
    }
    Ok(())
}

fn require_phone(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.len() != PHONE_DIGITS || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidPhone { field });
    }
    Ok(())
}

fn require_pincode(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.len() != PINCODE_DIGITS || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidPincode { field });
    }
    Ok(())
}

fn max_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

/// Franchise form. `id` is `None` for a create, `Some` for an update.
/// Location fields live on the shared [`SelectionState`], not the draft.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FranchiseDraft {
    pub id: Option<String>,
    pub name: String,
    pub owner: String,
    pub email: String,
    pub phone: String,
    pub active: bool,
}

impl FranchiseDraft {
    #[must_use]
    pub fn from_record(record: &Franchise) -> Self {
        Self {
            id: Some(record.id.clone()),
            name: record.name.clone(),
            owner: record.owner.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            active: record.active,
        }
    }

    pub fn validate(&self, selection: &SelectionState) -> Result<(), ValidationError> {
        require("franchise name", &self.name)?;
        require("owner name", &self.owner)?;
        require_email("email", &self.email)?;
        require_phone("phone", &self.phone)?;
        require_pincode("pincode", &selection.pincode)?;
        require("area", &selection.area)?;
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicianDraft {
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub active: bool,
}

impl TechnicianDraft {
    #[must_use]
    pub fn from_record(record: &Technician) -> Self {
        Self {
            id: Some(record.id.clone()),
            name: record.name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            service: record.service.clone(),
            active: record.active,
        }
    }

    pub fn validate(&self, selection: &SelectionState) -> Result<(), ValidationError> {
        require("technician name", &self.name)?;
        require_email("email", &self.email)?;
        require_phone("phone", &self.phone)?;
        require("service", &self.service)?;
        require_pincode("pincode", &selection.pincode)?;
        require("area", &selection.area)?;
        Ok(())
    }
}

/// SEO meta-info form. Location targeting is optional: a page may be
/// site-wide or pinned to a locality.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaInfoDraft {
    pub id: Option<String>,
    pub page: String,
    pub title: String,
    pub description: String,
    pub keywords: String,
}

impl MetaInfoDraft {
    #[must_use]
    pub fn from_record(record: &MetaInfo) -> Self {
        Self {
            id: Some(record.id.clone()),
            page: record.page.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            keywords: record.keywords.join(", "),
        }
    }

    pub fn validate(&self, selection: &SelectionState) -> Result<(), ValidationError> {
        require("page", &self.page)?;
        require("title", &self.title)?;
        max_len("description", &self.description, META_DESCRIPTION_MAX)?;
        if !selection.pincode.is_empty() {
            require_pincode("pincode", &selection.pincode)?;
        }
        Ok(())
    }

    /// Comma-separated keyword input, trimmed and de-blanked.
    #[must_use]
    pub fn keyword_list(&self) -> Vec<String> {
        self.keywords
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{Area, PincodeRecord};

    fn located_selection() -> SelectionState {
        let records = vec![PincodeRecord {
            code: "500001".into(),
            city: "Hyderabad".into(),
            state: "Telangana".into(),
            areas: vec![Area {
                id: "a1".into(),
                name: "Abids".into(),
                sub_areas: vec![],
            }],
        }];
        SelectionState::default()
            .with_pincode(&records, "500001")
            .with_area("Abids")
    }

    fn valid_franchise() -> FranchiseDraft {
        FranchiseDraft {
            id: None,
            name: "QuickFix Services".into(),
            owner: "R. Sharma".into(),
            email: "owner@quickfix.in".into(),
            phone: "9876543210".into(),
            active: true,
        }
    }

    mod field_rules {
        use super::*;

        #[test]
        fn blank_required_field_is_rejected() {
            let mut draft = valid_franchise();
            draft.name = "   ".into();
            assert_eq!(
                draft.validate(&located_selection()),
                Err(ValidationError::Required {
                    field: "franchise name"
                })
            );
        }

        #[test]
        fn email_needs_local_part_and_dotted_domain() {
            for bad in ["", "owner", "@quickfix.in", "owner@", "owner@in", "a@b@c.in"] {
                let mut draft = valid_franchise();
                draft.email = bad.into();
                assert!(draft.validate(&located_selection()).is_err(), "{bad:?}");
            }
        }

        #[test]
        fn phone_must_be_ten_digits() {
            for bad in ["98765", "98765432101", "98765abcde", ""] {
                let mut draft = valid_franchise();
                draft.phone = bad.into();
                assert_eq!(
                    draft.validate(&located_selection()),
                    Err(ValidationError::InvalidPhone { field: "phone" }),
                    "{bad:?}"
                );
            }
        }

        #[test]
        fn location_must_be_selected() {
            let draft = valid_franchise();
            assert_eq!(
                draft.validate(&SelectionState::default()),
                Err(ValidationError::InvalidPincode { field: "pincode" })
            );

            let records = Vec::new();
            let pincode_only = SelectionState::default().with_pincode(&records, "500001");
            assert_eq!(
                draft.validate(&pincode_only),
                Err(ValidationError::Required { field: "area" })
            );
        }

        #[test]
        fn valid_draft_passes() {
            assert_eq!(valid_franchise().validate(&located_selection()), Ok(()));
        }
    }

    mod meta_info_rules {
        use super::*;

        #[test]
        fn location_is_optional_but_checked_when_present() {
            let draft = MetaInfoDraft {
                page: "plumbing-hyderabad".into(),
                title: "Plumbing Services".into(),
                ..MetaInfoDraft::default()
            };
            assert_eq!(draft.validate(&SelectionState::default()), Ok(()));

            let records = Vec::new();
            let partial = SelectionState::default().with_pincode(&records, "5000");
            assert_eq!(
                draft.validate(&partial),
                Err(ValidationError::InvalidPincode { field: "pincode" })
            );
        }

        #[test]
        fn overlong_description_is_rejected() {
            let draft = MetaInfoDraft {
                page: "home".into(),
                title: "Home".into(),
                description: "x".repeat(META_DESCRIPTION_MAX + 1),
                ..MetaInfoDraft::default()
            };
            assert!(matches!(
                draft.validate(&SelectionState::default()),
                Err(ValidationError::TooLong { .. })
            ));
        }

        #[test]
        fn keywords_split_and_trim() {
            let draft = MetaInfoDraft {
                keywords: " plumber, , electrician ,ac repair".into(),
                ..MetaInfoDraft::default()
            };
            assert_eq!(
                draft.keyword_list(),
                vec!["plumber", "electrician", "ac repair"]
            );
        }
    }
}
