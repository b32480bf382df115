use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use crate::error::AppError;
use crate::subs_and_channels::{NewVideo, Video};

/// Logs a search term and hands back the row that was written.
pub fn record_search(conn: &mut SqliteConnection, title: &str) -> Result<Video, AppError> {
    use crate::schema::videos;

    let v = diesel::insert_into(videos::table)
        .values(&NewVideo { title })
        .get_result::<Video>(conn)?;
    debug!("Logged search {} as video {}", v.title, v.id);
    Ok(v)
}

pub fn list_search_history(conn: &mut SqliteConnection) -> Result<Vec<Video>, AppError> {
    use crate::schema::videos::dsl::*;

    Ok(videos.order(id.asc()).load(conn)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory_pool;

    #[test]
    fn recorded_search_is_the_row_just_written() {
        let pool = memory_pool();
        let mut conn = pool.get().unwrap();
        record_search(&mut conn, "older").unwrap();
        let v = record_search(&mut conn, "lofi").unwrap();
        assert_eq!(v.title, "lofi");

        let history = list_search_history(&mut conn).unwrap();
        let titles: Vec<&str> = history.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, vec!["older", "lofi"]);
    }

    #[test]
    fn repeated_searches_are_all_logged() {
        let pool = memory_pool();
        let mut conn = pool.get().unwrap();
        record_search(&mut conn, "lofi").unwrap();
        record_search(&mut conn, "lofi").unwrap();
        assert_eq!(list_search_history(&mut conn).unwrap().len(), 2);
    }
}
