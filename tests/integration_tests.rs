//! Integration tests for the logger dispatch core
//!
//! These tests verify:
//! - Registration order and idempotent registration
//! - Level filtering and custom level sets
//! - Hooks running on every call
//! - The JSON logger/handler pairing end to end
//! - Exit-on ordering and sink failure propagation
//! - Call-site and stack-walk caller resolution

use ploggy::core::{Caller, CallerResolver, ExitAction, LoggerError, UNKNOWN_FILE};
use ploggy::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn json_handler(sink: &MemorySink) -> Arc<Handler> {
    Arc::new(Handler::json_builder().sink(sink.clone()).build())
}

fn parse_lines(sink: &MemorySink) -> Vec<serde_json::Value> {
    sink.lines()
        .iter()
        .map(|line| serde_json::from_str(line).expect("valid JSON line"))
        .collect()
}

struct EventSink {
    label: &'static str,
    events: Arc<parking_lot::Mutex<Vec<String>>>,
}

impl Sink for EventSink {
    fn write(&mut self, rendered: &str) -> Result<()> {
        self.events.lock().push(format!("{}:{}", self.label, rendered));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        self.label
    }
}

struct BrokenSink;

impl Sink for BrokenSink {
    fn write(&mut self, _rendered: &str) -> Result<()> {
        Err(LoggerError::writer("sink unavailable"))
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "broken"
    }
}

#[test]
fn test_json_logger_end_to_end() {
    let sink = MemorySink::new();
    let logger = Logger::json("svc");
    logger.register(json_handler(&sink));

    logger.warn_with("disk low", fields! { "pct" => 91 }).unwrap();
    logger.info("fyi").unwrap();

    let lines = parse_lines(&sink);
    assert_eq!(lines.len(), 1);
    let line = &lines[0];
    assert_eq!(line["lvl"], "warn");
    assert_eq!(line["msg"], "disk low");
    assert_eq!(line["sc"], "svc");
    assert_eq!(line["p"], serde_json::json!({ "pct": "91" }));
    assert!(!line["line"].as_str().unwrap().is_empty());
    assert!(!line["ts"].as_str().unwrap().is_empty());
}

#[test]
fn test_json_line_points_at_caller() {
    let sink = MemorySink::new();
    let logger = Logger::json("svc");
    logger.register(json_handler(&sink));

    let expected = format!("{}:{}", file!(), line!() + 1);
    logger.error("located").unwrap();

    let lines = parse_lines(&sink);
    assert_eq!(lines[0]["line"], expected.as_str());
}

#[test]
fn test_macro_call_site_is_macro_invocation() {
    let sink = MemorySink::new();
    let logger = Logger::json("svc");
    logger.register(json_handler(&sink));

    let expected = format!("{}:{}", file!(), line!() + 1);
    ploggy::error!(logger, "code {}", 7).unwrap();

    let lines = parse_lines(&sink);
    assert_eq!(lines[0]["msg"], "code 7");
    assert_eq!(lines[0]["line"], expected.as_str());
}

#[test]
fn test_stack_walk_hook_finds_test_frame() {
    let seen = Arc::new(parking_lot::Mutex::new(None));
    let logger = Logger::builder()
        .hook("caller", hooks::resolved_line())
        .exit_on(Level::WARN)
        .exit_action({
            let seen = Arc::clone(&seen);
            Arc::new(move |entry: &Entry| {
                *seen.lock() = entry.field("caller").cloned();
            })
        })
        .build();

    let line = line!() + 1;
    logger.warn("where am I").unwrap();

    let caller = seen.lock().clone().expect("exit action ran");
    let caller = caller.as_str().expect("string field").to_string();
    assert!(
        caller.ends_with(&format!("integration_tests.rs:{}", line)),
        "resolved {}",
        caller
    );
}

#[inline(never)]
fn resolve_from_helper(depth: usize) -> Caller {
    CallerResolver::resolve(false, depth)
}

#[test]
fn test_resolver_depth_one_is_direct_caller() {
    let caller = resolve_from_helper(1);
    assert!(
        caller.function.ends_with("resolve_from_helper"),
        "resolved {}",
        caller.function
    );
    assert!(caller.file.ends_with("integration_tests.rs"));

    let outer = resolve_from_helper(2);
    assert!(
        outer.function.ends_with("test_resolver_depth_one_is_direct_caller"),
        "resolved {}",
        outer.function
    );
}

#[test]
fn test_resolver_past_stack_end_is_sentinel() {
    let caller = CallerResolver::resolve(false, 1_000_000);
    assert!(caller.is_unknown());
    assert_eq!(caller.to_string(), format!("{}:0", UNKNOWN_FILE));
}

#[test]
fn test_handlers_dispatched_in_registration_order() {
    let events = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let logger = Logger::new();
    for label in ["a", "b", "c"] {
        let handler = Handler::builder(PlainFormatter)
            .sink(EventSink {
                label,
                events: Arc::clone(&events),
            })
            .build();
        logger.register(Arc::new(handler));
    }

    logger.info("m").unwrap();
    assert_eq!(*events.lock(), vec!["a:m", "b:m", "c:m"]);
}

#[test]
fn test_duplicate_registration_dispatches_once() {
    let sink = MemorySink::new();
    let handler = Arc::new(
        Handler::builder(PlainFormatter)
            .sink(sink.clone())
            .build(),
    );
    let logger = Logger::new();

    assert!(logger.register(Arc::clone(&handler)));
    assert!(!logger.register(Arc::clone(&handler)));
    logger.error("once").unwrap();

    assert_eq!(logger.handlers().len(), 1);
    assert_eq!(sink.lines(), vec!["once"]);
}

#[test]
fn test_custom_level_set() {
    let sink = MemorySink::new();
    let logger = Logger::builder()
        .level_names(["TRACE", "DEBUG", "NOTICE"])
        .handler(
            Handler::builder(PlainFormatter)
                .min_level(Level::new("DEBUG", 1))
                .sink(sink.clone())
                .build(),
        )
        .build();

    for name in ["trace", "DEBUG", "Notice"] {
        assert!(logger.dispatcher(name).is_ok(), "{} should resolve", name);
    }
    let err = logger.log_named("warn", "rejected", Fields::new()).unwrap_err();
    assert!(matches!(err, LoggerError::UnknownLevel { ref name } if name == "warn"));
    assert!(logger.warn("rejected").is_err());

    logger.log_named("trace", "filtered", Fields::new()).unwrap();
    logger.log_named("notice", "kept", Fields::new()).unwrap();
    assert_eq!(sink.lines(), vec!["kept"]);
}

#[test]
fn test_hooks_rerun_per_call() {
    let sink = MemorySink::new();
    let logger = Logger::json("svc");
    logger.register(Arc::new(
        Handler::json_builder()
            .min_level(Level::DEBUG)
            .sink(sink.clone())
            .build(),
    ));

    logger.info("first").unwrap();
    std::thread::sleep(Duration::from_millis(5));
    logger.info("second").unwrap();

    let lines = parse_lines(&sink);
    assert_eq!(lines.len(), 2);
    assert_ne!(lines[0]["ts"], lines[1]["ts"]);
}

#[test]
fn test_exit_action_runs_after_every_handler() {
    let events = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let exit: ExitAction = {
        let events = Arc::clone(&events);
        Arc::new(move |entry: &Entry| {
            events.lock().push(format!("exit:{}", entry.message()));
        })
    };
    let logger = Logger::builder()
        .exit_on(Level::FATAL)
        .exit_action(exit)
        .handler(
            Handler::builder(PlainFormatter)
                .sink(EventSink {
                    label: "first",
                    events: Arc::clone(&events),
                })
                .build(),
        )
        .handler(
            Handler::builder(PlainFormatter)
                .sink(EventSink {
                    label: "second",
                    events: Arc::clone(&events),
                })
                .build(),
        )
        .build();

    logger.error("not terminal").unwrap();
    logger.fatal("boom").unwrap();

    assert_eq!(
        *events.lock(),
        vec![
            "first:not terminal",
            "second:not terminal",
            "first:boom",
            "second:boom",
            "exit:boom"
        ]
    );
}

#[test]
fn test_sink_failure_propagates_after_full_dispatch() {
    let sink = MemorySink::new();
    let exits = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = Arc::clone(&exits);
    let logger = Logger::builder()
        .exit_on(Level::FATAL)
        .exit_action(Arc::new(move |_: &Entry| {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        }))
        .handler(Handler::builder(PlainFormatter).sink(BrokenSink).build())
        .handler(Handler::builder(PlainFormatter).sink(sink.clone()).build())
        .build();

    let err = logger.fatal("still delivered").unwrap_err();
    assert!(matches!(err, LoggerError::WriterError(_)));
    assert_eq!(sink.lines(), vec!["still delivered"]);
    assert_eq!(exits.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(logger.metrics().write_failures(), 1);
}

#[test]
fn test_loggers_own_their_state() {
    let sink = MemorySink::new();
    let a = Logger::new();
    let b = Logger::new();
    a.register(Arc::new(Handler::builder(PlainFormatter).sink(sink.clone()).build()));
    a.set_hook("x", hooks::constant(1));

    b.info("not seen").unwrap();
    assert!(sink.is_empty());
    assert!(b.handlers().is_empty());
    assert!(b.hook_names().is_empty());
}

#[test]
fn test_file_sink_with_text_formatter() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("app.log");

    let logger = Logger::new();
    logger.register(Arc::new(
        Handler::builder(TextFormatter::new())
            .min_level(Level::WARN)
            .sink(FileSink::new(&log_file).expect("Failed to open log file"))
            .build(),
    ));

    logger.info("skipped").unwrap();
    logger.warn_with("disk low", fields! { "pct" => 91 }).unwrap();
    logger.error("failed").unwrap();
    drop(logger);

    let contents = std::fs::read_to_string(&log_file).expect("Failed to read log file");
    assert_eq!(contents, "[WARN ] disk low pct=91\n[ERROR] failed\n");
}

#[test]
fn test_pretty_json_rendering() {
    let sink = MemorySink::new();
    let logger = Logger::json("svc");
    logger.register(Arc::new(
        Handler::json_builder().pretty(true).sink(sink.clone()).build(),
    ));

    logger.error("pretty").unwrap();
    let contents = sink.contents();
    assert!(contents.contains("\n  \"lvl\": \"error\""));
    let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(value["msg"], "pretty");
}

#[test]
fn test_writer_sink_collects_output() {
    let handler = Handler::builder(PlainFormatter)
        .sink(WriterSink::new(Vec::<u8>::new()))
        .build();
    let logger = Logger::new();
    logger.register(Arc::new(handler));
    logger.info("to a writer").unwrap();
    assert_eq!(logger.metrics().handler_emits(), 1);
}

#[test]
fn test_resolved_caller_hook_reports_frame_map() {
    let seen = Arc::new(parking_lot::Mutex::new(None));
    let logger = Logger::builder()
        .hook("caller", hooks::resolved_caller(true))
        .exit_on(Level::ERROR)
        .exit_action({
            let seen = Arc::clone(&seen);
            Arc::new(move |entry: &Entry| {
                *seen.lock() = entry.field("caller").cloned();
            })
        })
        .build();

    logger.error("with stack").unwrap();

    let caller = seen.lock().clone().expect("exit action ran");
    let map = caller.as_map().expect("map field");
    for key in ["file", "line", "function", "stack"] {
        assert!(map.contains_key(key), "missing {}", key);
    }
    let file = map["file"].as_str().unwrap();
    assert!(file.ends_with("integration_tests.rs"), "resolved {}", file);
    let function = map["function"].as_str().unwrap();
    assert!(
        function.ends_with("test_resolved_caller_hook_reports_frame_map"),
        "resolved {}",
        function
    );
    let stack = map["stack"].as_str().expect("stack text requested");
    assert!(stack.starts_with(function));
}
