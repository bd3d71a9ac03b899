//! Diesel schema for tickets, comments and history.

diesel::table! {
    /// Tickets, numbered per board.
    tickets (id) {
        /// Ticket identifier.
        id -> Uuid,
        /// Owning board.
        board_id -> Uuid,
        /// Per-board sequence number.
        number -> Int8,
        /// Title.
        #[max_length = 255]
        title -> Varchar,
        /// Free-form description.
        description -> Text,
        /// Reporting user.
        reporter_id -> Uuid,
        /// Creating user.
        created_by -> Uuid,
        /// Assigned user.
        assignee_id -> Nullable<Uuid>,
        /// Workflow status.
        #[max_length = 50]
        status -> Varchar,
        /// Priority.
        #[max_length = 50]
        priority -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Comments on tickets.
    ticket_comments (id) {
        /// Comment identifier.
        id -> Uuid,
        /// Ticket the comment belongs to.
        ticket_id -> Uuid,
        /// Author.
        user_id -> Uuid,
        /// Comment text.
        text -> Text,
        /// Whether the text was edited after posting.
        edited -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only ticket change log.
    ticket_history (id) {
        /// Entry identifier.
        id -> Uuid,
        /// Ticket that changed.
        ticket_id -> Uuid,
        /// User who made the change.
        user_id -> Uuid,
        /// Kind of change.
        #[max_length = 50]
        action -> Varchar,
        /// Value before the change.
        old_value -> Nullable<Text>,
        /// Value after the change.
        new_value -> Nullable<Text>,
        /// Timestamp of the change.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(ticket_comments -> tickets (ticket_id));
diesel::joinable!(ticket_history -> tickets (ticket_id));
diesel::allow_tables_to_appear_in_same_query!(tickets, ticket_comments, ticket_history);
