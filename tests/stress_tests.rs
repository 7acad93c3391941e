//! Stress tests for shared contexts
//!
//! These tests verify:
//! - Concurrent logging from many threads loses no accepted records
//! - Structured output stays a valid array under contention
//! - Deep scope nesting unwinds back to an empty registry

use scoped_logger::prelude::*;
use std::sync::Arc;
use std::thread;

const THREADS: usize = 8;
const MESSAGES_PER_THREAD: usize = 200;

#[test]
fn test_concurrent_logging_keeps_every_line() {
    let text = SharedBuffer::new();
    let json = SharedBuffer::new();
    let context = LoggingContext::builder()
        .default_level(LogLevel::Info)
        .text_destination(text.destination("text"))
        .structured_destination(json.destination("json"))
        .build()
        .expect("Failed to build context");
    let context = Arc::new(context);

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let context = Arc::clone(&context);
            thread::spawn(move || {
                let logger = context.scope(Threshold::Inherit);
                for i in 0..MESSAGES_PER_THREAD {
                    logger.info(format!("thread {} message {}", t, i));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Logging thread panicked");
    }

    context.disable_structured().expect("Failed to disable");

    let expected = THREADS * MESSAGES_PER_THREAD;
    assert_eq!(text.contents().lines().count(), expected);
    assert_eq!(context.metrics().accepted(), expected as u64);

    let events: serde_json::Value =
        serde_json::from_str(&json.contents()).expect("valid JSON array");
    assert_eq!(events.as_array().unwrap().len(), expected);
    assert_eq!(context.scope_depth(), 0);
}

#[test]
fn test_deep_nesting_unwinds() {
    fn descend(parent: &Logger, remaining: usize) {
        if remaining == 0 {
            return;
        }
        let threshold = if remaining % 10 == 0 {
            Threshold::Level(LogLevel::Debug)
        } else {
            Threshold::Inherit
        };
        let logger = parent.child(threshold);
        descend(&logger, remaining - 1);
    }

    let context = LoggingContext::new();
    context.reserve_scopes(1024).expect("Failed to reserve");
    let root = context.scope(LogLevel::Error);

    descend(&root, 1000);

    assert_eq!(context.scope_depth(), 1);
    assert_eq!(root.effective_level(), LogLevel::Error);
}

#[test]
fn test_scope_released_when_thread_panics() {
    let context = Arc::new(LoggingContext::new());
    let worker_context = Arc::clone(&context);

    let result = thread::spawn(move || {
        let _scope = worker_context.scope(LogLevel::Debug);
        panic!("worker failed");
    })
    .join();

    assert!(result.is_err());
    assert_eq!(context.scope_depth(), 0);
}
