//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the embedded migrations exactly.

diesel::table! {
    /// Registered accounts.
    ///
    /// `username` and `email` carry unique constraints named
    /// `users_username_key` and `users_email_key`.
    users (id) {
        id -> Uuid,
        /// Trimmed, lower-cased login handle.
        username -> Varchar,
        /// Trimmed, lower-cased address.
        email -> Varchar,
        display_name -> Varchar,
        /// One of `user`, `engineer`, `admin`.
        role -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Submitted complaints; rows are never updated.
    complaints (id) {
        id -> Uuid,
        submitted_by -> Uuid,
        /// Username of the submitter at submission time.
        submitter_username -> Varchar,
        contact -> Varchar,
        description -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Complaint-to-engineer links; duplicates are allowed.
    assignments (id) {
        id -> Uuid,
        complaint_id -> Uuid,
        engineer_username -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(complaints -> users (submitted_by));
diesel::joinable!(assignments -> complaints (complaint_id));

diesel::allow_tables_to_appear_in_same_query!(assignments, complaints, users);
