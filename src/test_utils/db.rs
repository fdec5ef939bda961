use rusqlite::Connection;

use crate::{
    db::initialize,
    user::{User, create_user},
};

#[track_caller]
pub(crate) fn must_create_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");
    connection
}

#[track_caller]
pub(crate) fn must_create_test_user(name: &str, connection: &Connection) -> User {
    create_user(name, connection).expect("Could not create test user")
}
