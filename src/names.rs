use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use crate::error::AppError;
use crate::subs_and_channels::{Name, NewName};

/// Stores the name as given. The same text may be stored any number of times.
pub fn submit_name(conn: &mut SqliteConnection, name: &str) -> Result<Name, AppError> {
    use crate::schema::names;

    let n = diesel::insert_into(names::table)
        .values(&NewName { name })
        .get_result::<Name>(conn)?;
    info!("Stored name {}", n);
    Ok(n)
}

pub fn list_names(conn: &mut SqliteConnection) -> Result<Vec<Name>, AppError> {
    use crate::schema::names::dsl::*;

    Ok(names.order(id.asc()).load(conn)?)
}
