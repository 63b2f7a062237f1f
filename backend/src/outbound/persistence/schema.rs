//! Diesel table definitions for the SQLite schema.
//!
//! These definitions must match `migrations/` exactly. Identifiers are stored
//! as hyphenated UUID text and timestamps as UTC `TIMESTAMP` values.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Text,
        /// Lower-cased, unique.
        email -> Text,
        /// Argon2id PHC string.
        password_hash -> Text,
        first_name -> Text,
        last_name -> Text,
        is_admin -> Bool,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    /// Children tracked by an owning account.
    children (id) {
        id -> Text,
        name -> Text,
        grade -> Text,
        /// Owning user; rows cascade when the owner is deleted.
        owner_id -> Text,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    /// Reading log entries.
    books (id) {
        id -> Text,
        title -> Text,
        author -> Text,
        date_read -> Date,
        child_id -> Text,
        isbn -> Nullable<Text>,
        lexile_level -> Nullable<Text>,
        is_partial -> Bool,
        partial_comment -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    /// Grants giving a non-owner access to a child. One row per user and child.
    permissions (id) {
        id -> Text,
        user_id -> Text,
        child_id -> Text,
        /// `VIEW` or `EDIT`.
        permission_type -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    /// Invitations for addresses without an account. One row per email and
    /// child; rows issued together share a token fingerprint.
    pending_invitations (id) {
        id -> Text,
        email -> Text,
        child_id -> Text,
        permission_type -> Text,
        invited_by -> Text,
        /// SHA-256 hex digest of the invitation token.
        token_hash -> Text,
        expires_at -> Timestamp,
        created_at -> Timestamp,
    }
}

diesel::joinable!(children -> users (owner_id));
diesel::joinable!(books -> children (child_id));
diesel::joinable!(permissions -> children (child_id));
diesel::joinable!(permissions -> users (user_id));
diesel::joinable!(pending_invitations -> children (child_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    children,
    books,
    permissions,
    pending_invitations,
);
