//! An HTTP-aware failure path end to end: named constructors, class
//! default codes, and the boundary projection.
//!
//! Run with: cargo run --example http_boundary

use faultkit::{Classifier, Failure, HttpFault, project};

fn find_user(name: &str) -> Result<u64, HttpFault> {
    // Named constructors come from the status catalog; 4xx records default
    // to CLIENT_ERROR unless a code is set explicitly.
    Err(HttpFault::not_found()
        .message(format!("no user named {name}"))
        .context("user", name)
        .build())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let classifier = Classifier::new();

    match find_user("mallory") {
        Ok(id) => println!("found user {id}"),
        Err(fault) => {
            println!("handler saw: {fault}");
            let (projection, status) = project(&classifier, &Failure::from(&fault));
            println!("respond {status} with body:");
            println!("{}", serde_json::to_string_pretty(&projection)?);
        }
    }

    // A 5xx record keeps its diagnostics internal; the cause is visible to
    // operators but never serialized.
    let fault = HttpFault::service_unavailable()
        .code("MAINTENANCE")
        .message("scheduled maintenance until 04:00 UTC")
        .cause(std::io::Error::other("primary db unreachable"))
        .build();

    println!();
    println!("operator view: {fault}");
    if let Some(cause) = fault.cause() {
        println!("caused by:     {cause}");
    }

    let (projection, status) = project(&classifier, &Failure::from(&fault));
    println!("respond {status} with body:");
    println!("{}", serde_json::to_string_pretty(&projection)?);

    Ok(())
}
