use jat::prelude::*;
use serde_json::json;

fn run() -> Result<()> {
    jat::logging::init();

    let rq = Rq::post("/api/users/:id/courses", json!({ "name": "cs50" }))?
        .set_param("id", 1)?
        .add_query("notify", true)
        .add_query("tag", "intro")
        .add_query("tag", "cs")
        .set_bearer_auth("6eTUFP4HNhvvIwz5nNiL")?
        .add_header(b"x-request-id", "demo")?
        .with_json()
        .into_request();

    println!("{} {}", rq.method(), rq.request_uri());
    for (name, value) in rq.headers() {
        println!("{name}: {value:?}");
    }
    println!("{}", String::from_utf8_lossy(rq.body_bytes()));
    Ok(())
}

fn main() {
    run().unwrap();
}
