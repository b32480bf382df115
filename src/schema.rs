diesel::table! {
    channels (id) {
        id -> Integer,
        name -> Text,
        rating -> Integer,
        subscribed -> Text,
        subscriber_id -> Integer,
    }
}

diesel::table! {
    names (id) {
        id -> Integer,
        name -> Text,
    }
}

diesel::table! {
    subscribers (id) {
        id -> Integer,
        username -> Text,
        age -> Integer,
    }
}

diesel::table! {
    videos (id) {
        id -> Integer,
        title -> Text,
        searched_at -> Timestamp,
    }
}

diesel::joinable!(channels -> subscribers (subscriber_id));

diesel::allow_tables_to_appear_in_same_query!(channels, names, subscribers, videos,);
