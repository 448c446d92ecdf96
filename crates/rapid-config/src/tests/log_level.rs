use crate::LogLevel;

use std::str::FromStr;

use googletest::assert_that;
use googletest::prelude::eq;
use log::LevelFilter;

#[test]
fn given_known_level_strings_when_parse_then_matching_filter() {
    assert_that!(LogLevel::from_str("off").unwrap().0, eq(LevelFilter::Off));
    assert_that!(LogLevel::from_str("error").unwrap().0, eq(LevelFilter::Error));
    assert_that!(LogLevel::from_str("WARN").unwrap().0, eq(LevelFilter::Warn));
    assert_that!(LogLevel::from_str("Info").unwrap().0, eq(LevelFilter::Info));
    assert_that!(LogLevel::from_str("debug").unwrap().0, eq(LevelFilter::Debug));
    assert_that!(LogLevel::from_str("trace").unwrap().0, eq(LevelFilter::Trace));
}

#[test]
fn given_unknown_level_string_when_parse_then_defaults_to_info() {
    assert_that!(LogLevel::from_str("verbose").unwrap().0, eq(LevelFilter::Info));
    assert_that!(LogLevel::from_str("").unwrap().0, eq(LevelFilter::Info));
}
