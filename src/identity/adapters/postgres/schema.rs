//! Diesel schema for user accounts.

diesel::table! {
    /// User accounts with their global role.
    users (id) {
        /// Account identifier.
        id -> Uuid,
        /// Normalized, unique email address.
        #[max_length = 320]
        email -> Varchar,
        /// PHC-formatted password hash.
        password_hash -> Text,
        /// Display name.
        #[max_length = 255]
        full_name -> Varchar,
        /// Global role.
        #[max_length = 50]
        role -> Varchar,
        /// Account status.
        #[max_length = 50]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
