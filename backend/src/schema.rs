diesel::table! {
    users (id) {
        id -> Uuid,
        full_name -> Text,
        #[max_length = 255]
        email -> Varchar,
        password_hash -> Text,
        #[max_length = 20]
        role -> Varchar,
        phone -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    properties (id) {
        id -> Uuid,
        agent_id -> Uuid,
        title -> Text,
        description -> Nullable<Text>,
        address -> Text,
        city -> Text,
        country -> Text,
        price -> Int8,
        bedrooms -> Int2,
        bathrooms -> Int2,
        area -> Nullable<Int8>,
        #[sql_name = "type"]
        #[max_length = 20]
        kind -> Varchar,
        image_urls -> Array<Text>,
        #[max_length = 20]
        status -> Varchar,
        buyer_name -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    favorites (id) {
        id -> Uuid,
        user_id -> Uuid,
        property_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    property_logs (id) {
        id -> Uuid,
        property_id -> Uuid,
        property_title -> Text,
        user_id -> Uuid,
        user_email -> Text,
        #[max_length = 20]
        action_type -> Varchar,
        details -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(properties -> users (agent_id));
diesel::joinable!(favorites -> properties (property_id));
diesel::joinable!(favorites -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, properties, favorites, property_logs);
