//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. When a migration
//! changes the schema, regenerate with `diesel print-schema` or update by
//! hand.

diesel::table! {
    /// User accounts for organisors and agents.
    users (id) {
        id -> Int8,
        /// Unique login name (max 150 characters).
        username -> Varchar,
        /// Optional contact address; required for agents at the domain layer.
        email -> Nullable<Varchar>,
        first_name -> Varchar,
        last_name -> Varchar,
        /// PHC-format Argon2 hash.
        password_hash -> Text,
        is_organisor -> Bool,
        is_agent -> Bool,
        date_joined -> Timestamptz,
    }
}

diesel::table! {
    /// One organisation per organisor account.
    organisations (id) {
        id -> Int8,
        user_id -> Int8,
    }
}

diesel::table! {
    /// Agent profiles linking a user account to an organisation.
    agents (id) {
        id -> Int8,
        user_id -> Int8,
        organisation_id -> Int8,
    }
}

diesel::table! {
    /// Organisation-wide lead categories.
    categories (id) {
        id -> Int8,
        /// Display name (max 30 characters).
        name -> Varchar,
        organisation_id -> Int8,
    }
}

diesel::table! {
    /// Sales leads.
    ///
    /// `agent_id` and `category_id` are set to NULL when the referenced row
    /// is deleted.
    leads (id) {
        id -> Int8,
        first_name -> Varchar,
        last_name -> Varchar,
        age -> Int4,
        description -> Text,
        phone_number -> Varchar,
        email -> Varchar,
        date_added -> Timestamptz,
        organisation_id -> Int8,
        agent_id -> Nullable<Int8>,
        category_id -> Nullable<Int8>,
    }
}

diesel::joinable!(organisations -> users (user_id));
diesel::joinable!(agents -> users (user_id));
diesel::joinable!(agents -> organisations (organisation_id));
diesel::joinable!(categories -> organisations (organisation_id));
diesel::joinable!(leads -> organisations (organisation_id));
diesel::joinable!(leads -> agents (agent_id));
diesel::joinable!(leads -> categories (category_id));

diesel::allow_tables_to_appear_in_same_query!(agents, categories, leads, organisations, users,);
