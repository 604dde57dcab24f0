//! Carrying errors from other crates across the boundary.
//!
//! Run with: cargo run --example foreign_errors

use faultkit::{Classifier, Failure, FaultCategory, log_failure, project};

fn main() {
    let classifier = Classifier::new();

    // Untagged: the classifier has no reason to blame the client.
    let io_err = std::io::Error::other("connection reset by peer");
    let (projection, status) = project(&classifier, &Failure::foreign(&io_err));
    println!("untagged io error    {status}  code={}", projection.code);

    // Tagged with a registered category: client fault, message passed through.
    let parse_err = "forty-two".parse::<u64>().unwrap_err();
    let failure = Failure::foreign_tagged(FaultCategory::MalformedInput, &parse_err);
    let (projection, status) = project(&classifier, &failure);
    println!("tagged parse error   {status}  code={}", projection.code);
    println!("message passthrough  {}", projection.message);

    // Tagged with an unregistered category: still a server fault until
    // someone registers it.
    let timeout = std::io::Error::new(std::io::ErrorKind::TimedOut, "upstream deadline blown");
    let failure = Failure::foreign_tagged(FaultCategory::Timeout, &timeout);
    let (_, status) = project(&classifier, &failure);
    println!("tagged timeout       {status}  (Timeout not registered)");

    let lenient = Classifier::new().with_category(FaultCategory::Timeout);
    let (_, status) = project(&lenient, &failure);
    println!("after registration   {status}");

    // Boundary logging goes through tracing. Without a subscriber this is
    // a no-op; with one it emits a structured error event per failure.
    log_failure(&failure);
}
