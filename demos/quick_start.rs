//! Build a record, attach context, and project it for the wire.
//!
//! Run with: cargo run --example quick_start

use faultkit::{Classifier, Failure, Fault, fmt_args, project};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A plain record: no transport knowledge, immutable once built.
    let fault = Fault::builder()
        .code("LEDGER_STALE")
        .message_fmt("ledger lags the commit log by %s entries", fmt_args![42])?
        .context("partition", 7)
        .context("lag", 42)
        .build();

    println!("record:    {fault}");
    println!("id:        {}", fault.id());
    println!("timestamp: {}", fault.timestamp());

    // The classifier resolves statusless records to 500; the record's own
    // code still travels in the body.
    let classifier = Classifier::new();
    let (projection, status) = project(&classifier, &Failure::from(&fault));

    println!("status:    {status}");
    println!("wire body: {}", serde_json::to_string_pretty(&projection)?);

    Ok(())
}
