#![allow(missing_docs)]

pub(crate) mod db;
pub(crate) mod http;
pub(crate) mod timezone;

pub(crate) use db::{must_create_test_connection, must_create_test_user};
pub(crate) use http::{assert_content_type, assert_status, must_parse_json};
pub(crate) use timezone::must_get_timezone;
