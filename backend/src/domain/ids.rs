//! Typed primary keys for the CRM entities.
//!
//! Every table uses a `BIGSERIAL` key; wrapping them keeps a lead id from being
//! passed where an agent id is expected.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw database key.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Raw database key.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of an authentication identity.
    UserId
);
define_id!(
    /// Identifier of an organisation (the organisor's user profile).
    OrganisationId
);
define_id!(
    /// Identifier of an agent record.
    AgentId
);
define_id!(
    /// Identifier of a lead.
    LeadId
);
define_id!(
    /// Identifier of a lead category.
    CategoryId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialises_as_bare_integer() {
        let json = serde_json::to_string(&LeadId::new(42)).expect("serialise id");
        assert_eq!(json, "42");
        let parsed: AgentId = serde_json::from_str("7").expect("parse id");
        assert_eq!(parsed.get(), 7);
    }
}
