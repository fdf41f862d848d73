//! Test fixtures for request data and credentials

use callfire_rest::api::Params;

pub const TEST_LOGIN: &str = "SECRET_LOGIN";
pub const TEST_SECRET: &str = "BIG_SECRET";

pub const CALLS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<r:ResourceList xmlns:r="http://api.callfire.com/resource" totalResults="1">
  <Call id="1">
    <FromNumber>2092084589</FromNumber>
    <ToNumber>2092084589</ToNumber>
    <State>FINISHED</State>
  </Call>
</r:ResourceList>"#;

/// Query used throughout the call-listing examples
pub fn broadcast_query() -> Params {
    Params::new()
        .with("MaxResults", 10)
        .with("FromNumber", "2092084589")
        .with("ToNumber", "2092084589")
        .with("LabelName", "TestBroadcast")
        .with("State", "FINISHED")
}

/// Body for creating a text broadcast
pub fn text_broadcast() -> Params {
    Params::new()
        .with("Name", "Spring sale")
        .with("Message", "Save 20% today & tomorrow")
        .with("To", vec!["12135551100", "12135551101"])
}

pub const BROADCAST_QUERY_STRING: &str =
    "MaxResults=10&FromNumber=2092084589&ToNumber=2092084589&LabelName=TestBroadcast&State=FINISHED";
