//! Diesel table definitions for the habit schema.
//!
//! Kept in sync with `backend/migrations` by hand.

diesel::table! {
    habits (id) {
        id -> Uuid,
        user_id -> Uuid,
        #[max_length = 100]
        name -> Varchar,
        description -> Nullable<Text>,
        frequency_goal -> Int2,
        current_streak -> Int4,
        longest_streak -> Int4,
        last_check_in -> Nullable<Date>,
        is_active -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    check_ins (id) {
        id -> Uuid,
        habit_id -> Uuid,
        user_id -> Uuid,
        check_in_date -> Date,
        note -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(check_ins -> habits (habit_id));

diesel::allow_tables_to_appear_in_same_query!(check_ins, habits);
