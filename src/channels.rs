use std::collections::HashMap;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use crate::error::AppError;
use crate::forms::ValidChannel;
use crate::subs_and_channels::{Channel, NewChannel, NewSubscriber, Subscriber};

#[derive(Debug)]
pub enum SubmitOutcome {
    Created { subscriber: Subscriber, channel: Channel },
    /// This subscriber already rated a channel by that name. Nothing was written.
    AlreadySubmitted,
}

#[derive(Debug, Serialize)]
pub struct ChannelRow {
    pub channel: Channel,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct ChannelListing {
    pub channels: Vec<ChannelRow>,
    pub subscribers: Vec<Subscriber>,
}

/// Finds or creates the subscriber, then records the channel for them.
///
/// The first submission under a username fixes that subscriber's age, later
/// ones never change it. Uniqueness of usernames and of (channel, subscriber)
/// is left to the schema, so two racing requests cannot both win.
pub fn submit_channel(conn: &mut SqliteConnection, form: &ValidChannel) -> Result<SubmitOutcome, AppError> {
    use crate::schema::{channels, subscribers};

    conn.immediate_transaction(|conn| {
        let created = diesel::insert_or_ignore_into(subscribers::table)
            .values(&NewSubscriber { username: &form.username, age: form.age })
            .execute(conn)?;
        let subscriber = subscribers::table
            .filter(subscribers::username.eq(&form.username))
            .first::<Subscriber>(conn)?;
        if created > 0 {
            info!("New subscriber {}", subscriber);
        }

        let inserted = diesel::insert_into(channels::table)
            .values(&NewChannel {
                name: &form.channel,
                rating: form.rating,
                subscribed: form.subscribed.as_str(),
                subscriber_id: subscriber.id,
            })
            .get_result::<Channel>(conn);

        match inserted {
            Ok(channel) => {
                info!("{} rated channel {} with {}", subscriber.username, channel.name, channel.rating);
                Ok(SubmitOutcome::Created { subscriber, channel })
            }
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                info!("{} already submitted channel {}", subscriber.username, form.channel);
                Ok(SubmitOutcome::AlreadySubmitted)
            }
            Err(e) => Err(e.into()),
        }
    })
}

/// Every channel paired with the username of its subscriber, plus all subscribers.
pub fn list_channels(conn: &mut SqliteConnection) -> Result<ChannelListing, AppError> {
    use crate::schema::{channels, subscribers};

    let subs = subscribers::table
        .order(subscribers::id.asc())
        .load::<Subscriber>(conn)?;
    let all = channels::table
        .order(channels::id.asc())
        .load::<Channel>(conn)?;

    let usernames: HashMap<i32, &str> = subs.iter().map(|s| (s.id, s.username.as_str())).collect();
    let rows = all.into_iter()
        .map(|c| match usernames.get(&c.subscriber_id) {
            Some(u) => Ok(ChannelRow { username: u.to_string(), channel: c }),
            None => Err(AppError::MissingSubscriber { channel: c.id, subscriber: c.subscriber_id }),
        })
        .collect::<Result<Vec<ChannelRow>, AppError>>()?;

    Ok(ChannelListing { channels: rows, subscribers: subs })
}

pub fn count_channels(conn: &mut SqliteConnection) -> Result<i64, AppError> {
    use crate::schema::channels::dsl::*;

    Ok(channels.count().get_result(conn)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory_pool;
    use crate::forms::Subscribed;

    fn valid(username: &str, age: i32, channel: &str, rating: i32) -> ValidChannel {
        ValidChannel {
            username: username.to_string(),
            age,
            channel: channel.to_string(),
            rating,
            subscribed: Subscribed::Yes,
        }
    }

    #[test]
    fn first_submission_creates_subscriber_and_channel() {
        let pool = memory_pool();
        let mut conn = pool.get().unwrap();
        match submit_channel(&mut conn, &valid("bob", 22, "Bar", 5)).unwrap() {
            SubmitOutcome::Created { subscriber, channel } => {
                assert_eq!(subscriber.username, "bob");
                assert_eq!(subscriber.age, 22);
                assert_eq!(channel.name, "Bar");
                assert_eq!(channel.rating, 5);
                assert_eq!(channel.subscribed, "yes");
                assert_eq!(channel.subscriber_id, subscriber.id);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(count_channels(&mut conn).unwrap(), 1);
    }

    #[test]
    fn resubmitting_the_same_channel_writes_nothing() {
        let pool = memory_pool();
        let mut conn = pool.get().unwrap();
        submit_channel(&mut conn, &valid("alice", 30, "Foo", 4)).unwrap();
        let again = submit_channel(&mut conn, &valid("alice", 30, "Foo", 1)).unwrap();
        assert!(matches!(again, SubmitOutcome::AlreadySubmitted));
        assert_eq!(count_channels(&mut conn).unwrap(), 1);
    }

    #[test]
    fn later_submissions_keep_the_first_age() {
        let pool = memory_pool();
        let mut conn = pool.get().unwrap();
        submit_channel(&mut conn, &valid("alice", 30, "Foo", 4)).unwrap();
        submit_channel(&mut conn, &valid("alice", 99, "Baz", 2)).unwrap();

        let listing = list_channels(&mut conn).unwrap();
        assert_eq!(listing.subscribers.len(), 1);
        assert_eq!(listing.subscribers[0].age, 30);
        assert_eq!(listing.channels.len(), 2);
        assert!(listing.channels.iter().all(|r| r.username == "alice"));
    }

    #[test]
    fn same_channel_name_for_different_subscribers_is_fine() {
        let pool = memory_pool();
        let mut conn = pool.get().unwrap();
        submit_channel(&mut conn, &valid("alice", 30, "Foo", 4)).unwrap();
        let r = submit_channel(&mut conn, &valid("bob", 22, "Foo", 3)).unwrap();
        assert!(matches!(r, SubmitOutcome::Created { .. }));

        let listing = list_channels(&mut conn).unwrap();
        let owners: Vec<&str> = listing.channels.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(owners, vec!["alice", "bob"]);
    }

    #[test]
    fn orphaned_channel_fails_the_listing() {
        let pool = memory_pool();
        let mut conn = pool.get().unwrap();
        diesel::sql_query("PRAGMA foreign_keys = OFF").execute(&mut conn).unwrap();
        diesel::sql_query("INSERT INTO channels (name, rating, subscribed, subscriber_id) VALUES ('Lost', 3, 'no', 42)")
            .execute(&mut conn)
            .unwrap();
        match list_channels(&mut conn) {
            Err(AppError::MissingSubscriber { subscriber, .. }) => assert_eq!(subscriber, 42),
            other => panic!("unexpected {:?}", other),
        }
    }
}
