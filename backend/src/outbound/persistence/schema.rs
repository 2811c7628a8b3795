//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations` exactly.

diesel::table! {
    /// Registered users. `email` and `secret_code` carry unique constraints.
    users (id) {
        id -> Text,
        secret_code -> Text,
        name -> Text,
        email -> Text,
        /// Owned complaint ids in submission order.
        complaint_ids -> Array<Text>,
        /// Set by the database; orders scans.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Submitted complaints.
    complaints (id) {
        id -> Text,
        title -> Text,
        summary -> Text,
        severity -> Int4,
        resolved -> Bool,
        user_id -> Text,
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, complaints);
