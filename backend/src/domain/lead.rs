//! Leads: prospective customers owned by an organisation.

use chrono::{DateTime, Utc};

use super::fields::{optional_text, required_text};
use super::{AgentId, CategoryId, EmailAddress, FieldError, LeadId, OrganisationId};

/// Maximum length of a lead's first or last name.
pub const LEAD_NAME_MAX: usize = 20;
/// Maximum accepted age.
pub const LEAD_AGE_MAX: i32 = 150;
/// Maximum phone number length.
pub const PHONE_NUMBER_MAX: usize = 20;
/// Maximum description length.
pub const DESCRIPTION_MAX: usize = 2000;

/// Unvalidated lead fields as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadFieldsDraft {
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub description: String,
    pub phone_number: String,
    pub email: String,
}

/// Validated, editable lead fields.
///
/// ## Invariants
/// - First and last names are trimmed, 1..=20 characters.
/// - `age` is within `0..=150`.
/// - `phone_number` is non-empty and at most 20 characters.
/// - `description` is at most 2000 characters and may be blank.
/// - `email` is a valid [`EmailAddress`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadFields {
    first_name: String,
    last_name: String,
    age: i32,
    description: String,
    phone_number: String,
    email: EmailAddress,
}

impl LeadFields {
    /// Validate a draft, reporting the first offending field.
    ///
    /// # Examples
    /// ```
    /// use crm::domain::{LeadFields, LeadFieldsDraft};
    ///
    /// let err = LeadFields::try_new(LeadFieldsDraft {
    ///     first_name: "Joe".into(),
    ///     last_name: "Bloggs".into(),
    ///     age: 200,
    ///     phone_number: "0123".into(),
    ///     email: "joe@example.com".into(),
    ///     ..LeadFieldsDraft::default()
    /// })
    /// .unwrap_err();
    /// assert_eq!(err.field(), "age");
    /// ```
    pub fn try_new(draft: LeadFieldsDraft) -> Result<Self, FieldError> {
        let LeadFieldsDraft {
            first_name,
            last_name,
            age,
            description,
            phone_number,
            email,
        } = draft;
        if !(0..=LEAD_AGE_MAX).contains(&age) {
            return Err(FieldError::new(
                "age",
                "out_of_range",
                format!("age must be between 0 and {LEAD_AGE_MAX}"),
            ));
        }
        Ok(Self {
            first_name: required_text("firstName", &first_name, LEAD_NAME_MAX)?,
            last_name: required_text("lastName", &last_name, LEAD_NAME_MAX)?,
            age,
            description: optional_text("description", &description, DESCRIPTION_MAX)?,
            phone_number: required_text("phoneNumber", &phone_number, PHONE_NUMBER_MAX)?,
            email: EmailAddress::parse("email", &email)?,
        })
    }

    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    pub fn phone_number(&self) -> &str {
        self.phone_number.as_str()
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }
}

/// A persisted lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lead {
    id: LeadId,
    organisation_id: OrganisationId,
    agent_id: Option<AgentId>,
    category_id: Option<CategoryId>,
    fields: LeadFields,
    date_added: DateTime<Utc>,
}

impl Lead {
    pub fn new(id: LeadId, new_lead: NewLead) -> Self {
        let NewLead {
            organisation_id,
            agent_id,
            fields,
            date_added,
        } = new_lead;
        Self {
            id,
            organisation_id,
            agent_id,
            category_id: None,
            fields,
            date_added,
        }
    }

    pub fn id(&self) -> LeadId {
        self.id
    }

    pub fn organisation_id(&self) -> OrganisationId {
        self.organisation_id
    }

    pub fn agent_id(&self) -> Option<AgentId> {
        self.agent_id
    }

    pub fn category_id(&self) -> Option<CategoryId> {
        self.category_id
    }

    pub fn fields(&self) -> &LeadFields {
        &self.fields
    }

    pub fn date_added(&self) -> DateTime<Utc> {
        self.date_added
    }

    #[must_use]
    pub fn with_agent(mut self, agent_id: Option<AgentId>) -> Self {
        self.agent_id = agent_id;
        self
    }

    #[must_use]
    pub fn with_category(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: LeadFields) -> Self {
        self.fields = fields;
        self
    }
}

/// A lead ready to be inserted; new leads start uncategorised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLead {
    pub organisation_id: OrganisationId,
    pub agent_id: Option<AgentId>,
    pub fields: LeadFields,
    pub date_added: DateTime<Utc>,
}
