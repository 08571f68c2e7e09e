extern crate dpapi_sign;

use dpapi_sign::{Client, QueryOptions};
use serde_json::json;

fn main() {
    // Replace with your own developer API key and password.
    let client = Client::new(
        "d051bf1ddf82f79c6af34f7f4e59707f081296ad",
        "d69d14f8d65acbfdfc03220d243fce04").expect("Failed to build client");
    let mut query = client.query("12244", "data_table", QueryOptions::default())
        .expect("Failed to build query");
    query.set_filters_json(&json!({"index.name": "Recels"}));
    let url = client.url_for(&query).expect("Failed to render signed URL");
    println!("{}", url);
}
