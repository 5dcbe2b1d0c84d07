//! Integration tests for the console logger
//!
//! These tests verify:
//! - Namespace identity and duplicate warnings
//! - Enable/disable precedence and environment selection
//! - Silent buffering, automatic flushing and flush ordering
//! - Timer behaviour for marks and suppressed calls
//! - Thread safety of the shared buffer

use rust_console_logger::appenders::{ChannelAppender, MemoryAppender};
use rust_console_logger::core::{
    Appender, BufferCapacity, FlushOptions, FlushOrder, LevelConfig, LogLevel, LogValue, Logger,
    LoggerBuilder, LoggerContext, LoggerError, ManualClock, Result, StyleSpec,
};
use std::sync::Arc;
use std::thread;

fn plain() -> StyleSpec {
    StyleSpec::custom(|text| text.to_string())
}

/// Builder whose levels render `layout` without escape codes
fn plain_builder(namespace: &str, context: &Arc<LoggerContext>, layout: &str) -> LoggerBuilder {
    let mut builder = Logger::builder(namespace)
        .context(Arc::clone(context))
        .env("RUST_CONSOLE_LOGGER_IT_UNSET");
    for level in LogLevel::ALL {
        let config = ["name", "level", "label", "msg", "duration", "elapsed"]
            .iter()
            .fold(LevelConfig::new().layout(layout), |config, token| {
                config.style(*token, plain())
            });
        builder = builder.level(level, config);
    }
    builder
}

fn manual_context() -> (Arc<LoggerContext>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(0.0));
    let context = LoggerContext::new()
        .with_clock(Arc::clone(&clock))
        .with_sink(MemoryAppender::new())
        .shared();
    (context, clock)
}

#[test]
fn test_namespace_identity() {
    let context = LoggerContext::new().shared();

    let first = Logger::builder("app:identity")
        .context(Arc::clone(&context))
        .appender(MemoryAppender::new())
        .build()
        .expect("first build");
    let second = Logger::builder("app:identity")
        .context(Arc::clone(&context))
        .silent(true)
        .build()
        .expect("second build");

    assert!(Arc::ptr_eq(&first, &second));
    assert!(!second.is_silent(), "options of a duplicate are ignored");
    assert_eq!(context.metrics().duplicate_namespaces(), 1);

    let _third = Logger::builder("app:identity")
        .context(Arc::clone(&context))
        .build()
        .expect("third build");
    assert_eq!(context.metrics().duplicate_namespaces(), 2);
    assert_eq!(context.namespaces(), vec!["app:identity".to_string()]);
}

#[test]
fn test_separate_contexts_do_not_share_namespaces() {
    let a = LoggerContext::new().shared();
    let b = LoggerContext::new().shared();

    let first = Logger::builder("shared:name").context(a).build().expect("build");
    let second = Logger::builder("shared:name").context(b).build().expect("build");
    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn test_disable_wildcard_beats_instance_flag() {
    let (context, _clock) = manual_context();
    let logger = plain_builder("svc", &context, "{msg}")
        .enabled(true)
        .appender(MemoryAppender::new())
        .build()
        .expect("build");

    context.disable("*");
    assert!(!logger.is_enabled());
    assert_eq!(logger.info("hidden", &[]), None);

    context.enable("*");
    assert!(logger.is_enabled());
    assert_eq!(logger.info("shown", &[]).as_deref(), Some("shown"));
}

#[test]
fn test_prefix_patterns() {
    let (context, _clock) = manual_context();
    let pool = plain_builder("db:pool", &context, "{msg}")
        .appender(MemoryAppender::new())
        .build()
        .expect("build");
    let http = plain_builder("http", &context, "{msg}")
        .appender(MemoryAppender::new())
        .build()
        .expect("build");

    context.disable("db:*");
    assert_eq!(pool.log("query", &[]), None);
    assert_eq!(http.log("request", &[]).as_deref(), Some("request"));

    context.enable("db:*");
    assert_eq!(pool.log("query", &[]).as_deref(), Some("query"));
}

#[test]
fn test_pattern_overrides_instance_flag() {
    let (context, _clock) = manual_context();
    let logger = plain_builder("worker", &context, "{msg}")
        .enabled(false)
        .appender(MemoryAppender::new())
        .build()
        .expect("build");

    assert_eq!(logger.log("off", &[]), None);
    context.enable("worker");
    assert_eq!(logger.log("on", &[]).as_deref(), Some("on"));
}

#[test]
fn test_environment_selection() {
    let var = "RUST_CONSOLE_LOGGER_IT_ENV_SELECTION";
    std::env::set_var(var, "svc:*, -svc:noisy");

    let (context, _clock) = manual_context();
    let build = |name: &str| {
        plain_builder(name, &context, "{msg}")
            .env(var)
            .appender(MemoryAppender::new())
    };

    let api = build("svc:api").build().expect("build");
    let noisy = build("svc:noisy").build().expect("build");
    let other = build("other").build().expect("build");
    let forced = build("forced").enabled(true).build().expect("build");

    assert!(api.is_enabled());
    assert!(!noisy.is_enabled());
    assert!(!other.is_enabled());
    assert!(forced.is_enabled());

    std::env::remove_var(var);
}

#[test]
fn test_suppressed_call_does_not_advance_timer() {
    let (context, clock) = manual_context();
    let logger = plain_builder("timer", &context, "{msg} +{duration}")
        .appender(MemoryAppender::new())
        .build()
        .expect("build");

    clock.advance(20.0);
    assert_eq!(logger.log("first", &[]).as_deref(), Some("first +20ms"));

    context.disable("timer");
    clock.advance(30.0);
    assert_eq!(logger.log("ignored", &[]), None);

    context.enable("timer");
    clock.advance(50.0);
    assert_eq!(logger.log("second", &[]).as_deref(), Some("second +80ms"));
}

#[test]
fn test_falsy_messages_mark_the_timer() {
    let (context, clock) = manual_context();
    let sink = MemoryAppender::new();
    let logger = plain_builder("marks", &context, "{msg} +{duration}")
        .appender(sink.clone())
        .build()
        .expect("build");

    for falsy in [
        LogValue::Undefined,
        LogValue::Null,
        LogValue::from(""),
        LogValue::from(false),
        LogValue::from(0),
        LogValue::from(f64::NAN),
    ] {
        clock.advance(7.0);
        assert_eq!(logger.log(falsy, &[]), None);
    }

    clock.advance(2.0);
    assert_eq!(logger.log("after", &[]).as_deref(), Some("after +2ms"));
    assert_eq!(sink.len(), 1);
    assert_eq!(context.metrics().marks(), 6);
}

#[test]
fn test_error_values_use_error_level() {
    let (context, _clock) = manual_context();
    let sink = MemoryAppender::new();
    let logger = plain_builder("errors", &context, "{level}: {msg}")
        .appender(sink.clone())
        .build()
        .expect("build");

    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "config missing");
    let out = logger.info(LogValue::from_error(&io), &[]);
    assert_eq!(out.as_deref(), Some("error: config missing"));
    assert_eq!(sink.entries()[0].0, LogLevel::Error);
}

#[test]
fn test_level_render_overrides_logger_render() {
    let (context, _clock) = manual_context();
    let logger = plain_builder("render", &context, "{msg}")
        .render(|ctx| format!("common {}", ctx.value("msg")))
        .level(
            LogLevel::Warn,
            LevelConfig::new().render(|ctx| format!("warn-only {}", ctx.value("name"))),
        )
        .appender(MemoryAppender::new())
        .build()
        .expect("build");

    assert_eq!(logger.info("a", &[]).as_deref(), Some("common a"));
    assert_eq!(logger.warn("b", &[]).as_deref(), Some("warn-only render"));
}

#[test]
fn test_literal_and_function_tokens() {
    let (context, _clock) = manual_context();
    let logger = plain_builder("tokens", &context, "{version} {host} {msg}")
        .token("version", "v2")
        .token("host", rust_console_logger::TokenSource::dynamic(|_| "node-1".to_string()))
        .appender(MemoryAppender::new())
        .build()
        .expect("build");

    assert_eq!(logger.log("up", &[]).as_deref(), Some("v2 node-1 up"));
}

#[test]
fn test_buffer_auto_flush() {
    let clock = Arc::new(ManualClock::new(0.0));
    let flushed = MemoryAppender::new();
    let context = LoggerContext::new()
        .with_clock(Arc::clone(&clock))
        .with_sink(flushed.clone())
        .shared();

    let logger = plain_builder("buffered", &context, "{msg}")
        .silent(true)
        .max_buffer(3)
        .build()
        .expect("build");

    for i in 0..3 {
        logger.log("line %d", &[i.into()]);
    }
    assert!(flushed.is_empty());
    assert_eq!(context.buffered_len(), 3);

    logger.log("line %d", &[3.into()]);
    assert_eq!(flushed.lines(), vec!["line 0\nline 1\nline 2"]);
    assert_eq!(context.buffered_len(), 1);
    assert_eq!(logger.peek(), "line 3");
    assert_eq!(context.metrics().auto_flushes(), 1);
}

#[test]
fn test_smaller_capacity_from_new_logger_flushes_buffer() {
    let clock = Arc::new(ManualClock::new(0.0));
    let flushed = MemoryAppender::new();
    let context = LoggerContext::new()
        .with_clock(Arc::clone(&clock))
        .with_sink(flushed.clone())
        .shared();

    let first = plain_builder("shrink:a", &context, "{msg}")
        .silent(true)
        .build()
        .expect("build a");
    for i in 0..5 {
        first.log("line %d", &[i.into()]);
    }
    assert_eq!(context.buffered_len(), 5);

    let _second = plain_builder("shrink:b", &context, "{msg}")
        .silent(true)
        .max_buffer(2)
        .build()
        .expect("build b");

    assert_eq!(context.buffer_capacity(), BufferCapacity::Limited(2));
    assert!(context.buffered_len() <= 2);
    assert_eq!(
        flushed.lines(),
        vec!["line 0\nline 1\nline 2\nline 3\nline 4"]
    );
    assert_eq!(context.metrics().auto_flushes(), 1);
}

#[test]
fn test_unlimited_buffer_never_auto_flushes() {
    let flushed = MemoryAppender::new();
    let context = LoggerContext::new().with_sink(flushed.clone()).shared();
    let logger = plain_builder("unlimited", &context, "{msg}")
        .silent(true)
        .max_buffer_unlimited()
        .build()
        .expect("build");

    for _ in 0..50 {
        logger.log("x", &[]);
    }
    assert!(flushed.is_empty());
    assert_eq!(context.buffer_capacity(), BufferCapacity::Unlimited);
    assert_eq!(context.buffered_len(), 50);
}

#[test]
fn test_flush_ordering() {
    let (context, clock) = manual_context();
    let b = plain_builder("b", &context, "{name}{msg}")
        .silent(true)
        .build()
        .expect("build");
    let a = plain_builder("a", &context, "{name}{msg}")
        .silent(true)
        .build()
        .expect("build");

    clock.set(1.0);
    b.log("1", &[]);
    clock.set(2.0);
    a.log("2", &[]);
    clock.set(3.0);
    b.log("3", &[]);

    let by_name = context
        .flush(FlushOptions::new().order_by(FlushOrder::Name).return_output(true))
        .expect("output");
    assert_eq!(by_name, "a2\nb1\nb3");

    clock.set(4.0);
    b.log("4", &[]);
    clock.set(4.0);
    a.log("5", &[]);
    let by_time = context
        .flush(FlushOptions::new().return_output(true))
        .expect("output");
    // equal timestamps fall back to sequence order
    assert_eq!(by_time, "b4\na5");
}

#[test]
fn test_configured_flush_order() {
    let (context, clock) = manual_context();
    let z = plain_builder("z", &context, "{name}")
        .silent(true)
        .flush_order_by(FlushOrder::Name)
        .build()
        .expect("build");
    let y = plain_builder("y", &context, "{name}")
        .silent(true)
        .build()
        .expect("build");

    clock.set(1.0);
    z.log("m", &[]);
    clock.set(2.0);
    y.log("m", &[]);

    let output = context.flush(FlushOptions::new().return_output(true));
    assert_eq!(output.as_deref(), Some("y\nz"));
}

#[test]
fn test_uncolored_flush_strips_escape_codes() {
    let context = LoggerContext::new().with_sink(MemoryAppender::new()).shared();
    let logger = Logger::builder("colors")
        .context(Arc::clone(&context))
        .env("RUST_CONSOLE_LOGGER_IT_UNSET")
        .level(
            LogLevel::Log,
            LevelConfig::new()
                .layout("{msg}")
                .style("msg", StyleSpec::custom(|t| format!("\x1b[31m{}\x1b[0m", t))),
        )
        .silent(true)
        .build()
        .expect("build");

    logger.log("red", &[]);
    assert_eq!(logger.peek(), "\x1b[31mred\x1b[0m");

    let output = context.flush(FlushOptions::new().colored(false).return_output(true));
    assert_eq!(output.as_deref(), Some("red"));
}

#[test]
fn test_flush_writes_to_context_sink() {
    let flushed = MemoryAppender::new();
    let context = LoggerContext::new().with_sink(flushed.clone()).shared();
    let logger = plain_builder("sink", &context, "{msg}")
        .silent(true)
        .build()
        .expect("build");

    logger.log("one", &[]);
    logger.log("two", &[]);
    assert_eq!(context.flush(FlushOptions::new()), None);
    assert_eq!(flushed.lines(), vec!["one\ntwo"]);
    assert!(logger.peek().is_empty());
}

#[test]
fn test_invalid_capacity_is_a_config_error() {
    let context = LoggerContext::new().shared();
    let result = Logger::builder("bad:capacity")
        .context(Arc::clone(&context))
        .max_buffer(0)
        .build();

    assert!(matches!(
        result,
        Err(LoggerError::InvalidConfiguration { .. })
    ));
    assert!(context.logger("bad:capacity").is_none());
}

#[test]
fn test_channel_appender_receives_lines() {
    let (context, _clock) = manual_context();
    let (appender, receiver) = ChannelAppender::new();
    let logger = plain_builder("channel", &context, "{msg}")
        .appender(appender)
        .build()
        .expect("build");

    logger.warn("over the wire", &[]);
    assert_eq!(
        receiver.try_recv().expect("line"),
        (LogLevel::Warn, "over the wire".to_string())
    );
}

struct FailingAppender;

impl Appender for FailingAppender {
    fn write(&mut self, _level: LogLevel, _output: &str) -> Result<()> {
        Err(LoggerError::writer("sink unavailable"))
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "failing"
    }
}

#[test]
fn test_sink_failure_is_counted_not_raised() {
    let (context, _clock) = manual_context();
    let logger = plain_builder("failing", &context, "{msg}")
        .appender(FailingAppender)
        .build()
        .expect("build");

    assert_eq!(logger.log("lost", &[]).as_deref(), Some("lost"));
    assert_eq!(context.metrics().sink_errors(), 1);
    assert_eq!(context.metrics().emitted(), 0);
}

#[test]
fn test_concurrent_silent_logging() {
    let context = LoggerContext::new()
        .with_sink(MemoryAppender::new())
        .shared();
    let threads = 4;
    let per_thread = 250;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let context = Arc::clone(&context);
            thread::spawn(move || {
                let logger = plain_builder(&format!("thread:{}", t), &context, "{msg}")
                    .silent(true)
                    .max_buffer_unlimited()
                    .build()
                    .expect("build");
                for i in 0..per_thread {
                    logger.log("%d", &[i.into()]);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread panicked");
    }

    assert_eq!(context.buffered_len(), threads * per_thread);
    let output = context
        .flush(FlushOptions::new().order_by(FlushOrder::Name).return_output(true))
        .expect("output");
    assert_eq!(output.lines().count(), threads * per_thread);
    assert_eq!(context.peek("thread:0"), "");
}
