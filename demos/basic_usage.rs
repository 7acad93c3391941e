//! Basic logger usage example
//!
//! Demonstrates scoped thresholds with a text channel on stdout and a JSON
//! channel collected in memory.
//!
//! Run with: cargo run --example basic_usage

use scoped_logger::prelude::*;
use scoped_logger::{debug, info, log_extras};

fn level2(parent: &Logger) {
    let logger = parent.child(Threshold::Inherit);
    debug!(logger, "Level 2 inherits DEBUG from level 1");
}

fn level1(parent: &Logger) {
    let logger = parent.child(LogLevel::Debug);
    debug!(logger, "Level 1 lowers the threshold to DEBUG");
    level2(&logger);
}

fn main() -> Result<()> {
    println!("=== Scoped Logger - Basic Usage Example ===\n");

    let json = SharedBuffer::new();
    let context = LoggingContext::builder()
        .text_destination(Destination::stdout())
        .structured_destination(json.destination("memory"))
        .build()?;

    let logger = context.scope(Threshold::Inherit);

    println!("1. Default threshold ({}):", context.default_level());
    debug!(logger, "Hello debug users (hidden unless DEBUG is the default)");
    info!(logger, "Hello info users");
    logger.error("Hello all users");

    println!("\n2. Nested scopes:");
    level1(&logger);
    debug!(logger, "Back at the root: hidden again");

    println!("\n3. Extras:");
    log_extras!(logger, LogLevel::Warn, ["disk=/var", "free=3%"], "Low disk space");

    context.disable_structured()?;
    println!("\n4. Structured output:\n{}", json.contents());

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
