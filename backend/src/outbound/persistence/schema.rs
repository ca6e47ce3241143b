//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts keyed by username.
    users (username) {
        /// Case-sensitive account name.
        username -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        /// Six-digit family code; shared values form a family.
        family_code -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Posted tasks. Rows are never updated or deleted.
    tasks (id) {
        id -> Int8,
        owner -> Varchar,
        title -> Text,
        description -> Text,
        price -> Text,
        /// Base64 of the stored JPEG.
        image -> Text,
        image_width -> Int4,
        image_height -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(tasks -> users (owner));
diesel::allow_tables_to_appear_in_same_query!(tasks, users);
