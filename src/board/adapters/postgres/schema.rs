//! Diesel schema for boards and memberships.

diesel::table! {
    /// Boards.
    boards (id) {
        /// Board identifier.
        id -> Uuid,
        /// Unique four-character code.
        #[max_length = 4]
        code -> Varchar,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Free-form description.
        description -> Text,
        /// Creating user.
        created_by -> Uuid,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-board memberships, unique per board and user.
    board_memberships (id) {
        /// Membership identifier.
        id -> Uuid,
        /// Board the membership belongs to.
        board_id -> Uuid,
        /// Member.
        user_id -> Uuid,
        /// Membership role.
        #[max_length = 50]
        role -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(board_memberships -> boards (board_id));
diesel::allow_tables_to_appear_in_same_query!(boards, board_memberships);
