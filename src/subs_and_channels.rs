use std::fmt;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use crate::schema::{channels, names, subscribers, videos};

#[derive(Debug, Serialize, Queryable)]
#[diesel(table_name = names)]
pub struct Name {
    pub id: i32,
    pub name: String,
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (ID: {})", self.name, self.id)
    }
}

#[derive(Insertable)]
#[diesel(table_name = names)]
pub struct NewName<'a> {
    pub name: &'a str,
}

/// A logged search term. Every search is kept, duplicates included.
#[derive(Debug, Serialize, Queryable)]
#[diesel(table_name = videos)]
pub struct Video {
    pub id: i32,
    pub title: String,
    pub searched_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = videos)]
pub struct NewVideo<'a> {
    pub title: &'a str,
}

#[derive(Debug, Clone, Serialize, Queryable)]
#[diesel(table_name = subscribers)]
pub struct Subscriber {
    pub id: i32,
    pub username: String,
    pub age: i32,
}

impl fmt::Display for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Username: {} | Age: {}", self.username, self.age)
    }
}

#[derive(Insertable)]
#[diesel(table_name = subscribers)]
pub struct NewSubscriber<'a> {
    pub username: &'a str,
    pub age: i32,
}

#[derive(Debug, Serialize, Queryable)]
#[diesel(table_name = channels)]
pub struct Channel {
    pub id: i32,
    pub name: String,
    pub rating: i32,
    pub subscribed: String,
    pub subscriber_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = channels)]
pub struct NewChannel<'a> {
    pub name: &'a str,
    pub rating: i32,
    pub subscribed: &'a str,
    pub subscriber_id: i32,
}

pub fn make_youtube_url(vid: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", vid)
}
