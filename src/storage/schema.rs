//! Diesel schema for users, tasks, and task history.

diesel::table! {
    /// Registered users.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Unique display name.
        #[max_length = 100]
        user_name -> Varchar,
    }
}

diesel::table! {
    /// Kanban tasks.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 200]
        title -> Varchar,
        /// Optional free-text description.
        #[max_length = 1000]
        description -> Nullable<Varchar>,
        /// Lifecycle status token.
        #[max_length = 20]
        status -> Varchar,
        /// Current assignee, if any.
        assigned_to_user_id -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last mutation timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only audit trail of task mutations.
    task_history (id) {
        /// History entry identifier.
        id -> Uuid,
        /// Owning task.
        task_id -> Uuid,
        /// User who made the change.
        changed_by_user_id -> Uuid,
        /// Change type token.
        #[max_length = 20]
        change_type -> Varchar,
        /// Value before the change.
        #[max_length = 500]
        old_value -> Nullable<Varchar>,
        /// Value after the change.
        #[max_length = 500]
        new_value -> Nullable<Varchar>,
        /// When the change happened.
        change_date -> Timestamptz,
        /// Insertion order, used to break ties between equal change dates.
        entry_seq -> Int8,
    }
}

diesel::joinable!(tasks -> users (assigned_to_user_id));
diesel::joinable!(task_history -> tasks (task_id));
diesel::joinable!(task_history -> users (changed_by_user_id));

diesel::allow_tables_to_appear_in_same_query!(users, tasks, task_history);
