//! Lead categories.

use super::fields::required_text;
use super::{CategoryId, FieldError, OrganisationId};

/// Maximum category name length.
pub const CATEGORY_NAME_MAX: usize = 30;

/// Category label, 1..=30 characters after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryName(String);

impl CategoryName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, FieldError> {
        required_text("name", raw.as_ref(), CATEGORY_NAME_MAX).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A category belonging to one organisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    id: CategoryId,
    organisation_id: OrganisationId,
    name: CategoryName,
}

impl Category {
    pub fn new(id: CategoryId, organisation_id: OrganisationId, name: CategoryName) -> Self {
        Self {
            id,
            organisation_id,
            name,
        }
    }

    pub fn id(&self) -> CategoryId {
        self.id
    }

    pub fn organisation_id(&self) -> OrganisationId {
        self.organisation_id
    }

    pub fn name(&self) -> &CategoryName {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_limited_to_thirty_characters() {
        assert!(CategoryName::new("x".repeat(CATEGORY_NAME_MAX)).is_ok());
        let err = CategoryName::new("x".repeat(CATEGORY_NAME_MAX + 1)).expect_err("too long");
        assert_eq!(err.code(), "too_long");
    }
}
