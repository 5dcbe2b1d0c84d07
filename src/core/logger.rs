//! Main logger implementation
//!
//! A [`Logger`] is a named emitter. Every level it knows has a layout
//! compiled once into a render plan; each call measures the time since the
//! previous call, resolves token values, renders the plan and either writes
//! the line to the logger's sink or hands it to the context buffer.

use super::appender::Appender;
use super::buffer::{BufferCapacity, FlushOrder};
use super::compiler::{compile_layout, CompileInput, CompiledLayout, RenderContext, RenderFn};
use super::context::LoggerContext;
use super::date_format::format_date;
use super::duration_format::format_duration;
use super::error::Result;
use super::layout::UnterminatedBrace;
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::log_value::LogValue;
use super::message::format_string;
use super::pattern::EnvPatterns;
use super::style::StyleSpec;
use super::token::{CallSite, CallSiteFn, TokenFn, TokenSource};
use crate::appenders::ConsoleAppender;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::fmt;
use std::panic::Location;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Layout used by levels that do not configure their own
pub const DEFAULT_LAYOUT: &str = "{name} {label} {msg} +{duration}";

/// Environment variable consulted for namespace selection
pub const DEFAULT_ENV_VAR: &str = "DEBUG";

/// Frames between the public logging method and the call-site lookup
const LOGGER_FRAMES: usize = 2;

/// Replaces the printf-style message formatter
pub type FormatFn = Arc<dyn Fn(&LogValue, &[LogValue]) -> String + Send + Sync>;

/// Per-level layout, label, styles and optional render function
#[derive(Clone, Default)]
pub struct LevelConfig {
    label: Option<String>,
    layout: Option<String>,
    styles: HashMap<String, StyleSpec>,
    render: Option<RenderFn>,
}

impl LevelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    /// Style one token; replaces the built-in default for that token
    #[must_use = "builder methods return a new value"]
    pub fn style(mut self, token: impl Into<String>, spec: impl Into<StyleSpec>) -> Self {
        self.styles.insert(token.into(), spec.into());
        self
    }

    /// Bypass the compiled layout and build the line by hand.
    ///
    /// Runs under the logger's timing lock; logging through the same logger
    /// from inside `render` deadlocks. Reconfiguring it is allowed.
    #[must_use = "builder methods return a new value"]
    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&RenderContext<'_>) -> String + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }
}

impl fmt::Debug for LevelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelConfig")
            .field("label", &self.label)
            .field("layout", &self.layout)
            .field("styles", &self.styles)
            .field("render", &self.render.is_some())
            .finish()
    }
}

/// Compiled state of one level
struct LevelPlan {
    config: LevelConfig,
    label: String,
    compiled: CompiledLayout,
    render: Option<RenderFn>,
}

impl LevelPlan {
    fn needs_call_site(&self) -> bool {
        self.render.is_some() || self.compiled.uses_caller_info()
    }
}

/// Settings shared by every level plan of a logger
struct PlanDefaults {
    layout: String,
    render: Option<RenderFn>,
    tokens: HashMap<String, TokenSource>,
    policy: UnterminatedBrace,
}

impl PlanDefaults {
    fn compile(&self, level: LogLevel, config: LevelConfig) -> LevelPlan {
        let layout = config
            .layout
            .as_deref()
            .filter(|layout| !layout.is_empty())
            .unwrap_or(self.layout.as_str());
        let compiled = compile_layout(
            layout,
            &CompileInput {
                level,
                styles: &config.styles,
                tokens: &self.tokens,
                policy: self.policy,
            },
        );
        LevelPlan {
            label: config.label.clone().unwrap_or_default(),
            render: config.render.clone().or_else(|| self.render.clone()),
            compiled,
            config,
        }
    }
}

struct Timer {
    created: f64,
    last_call: f64,
}

pub struct Logger {
    namespace: String,
    context: Arc<LoggerContext>,
    defaults: PlanDefaults,
    levels: RwLock<HashMap<LogLevel, Arc<LevelPlan>>>,
    dynamic_tokens: Vec<(String, TokenFn)>,
    formatter: Option<FormatFn>,
    sink: Mutex<Box<dyn Appender>>,
    call_site: Option<CallSiteFn>,
    silent: AtomicBool,
    enabled: RwLock<Option<bool>>,
    env_enabled: Option<bool>,
    min_level: RwLock<LogLevel>,
    timer: Mutex<Timer>,
}

impl Logger {
    /// Logger with default settings in the global context
    ///
    /// Returns the existing instance when `namespace` is already registered.
    pub fn new(namespace: impl Into<String>) -> Arc<Logger> {
        Self::builder(namespace).install()
    }

    #[must_use]
    pub fn builder(namespace: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(namespace)
    }

    fn from_builder(builder: LoggerBuilder, context: Arc<LoggerContext>) -> Self {
        let mut dynamic_tokens: Vec<(String, TokenFn)> = builder
            .tokens
            .iter()
            .filter_map(|(name, source)| match source {
                TokenSource::Dynamic(f) => Some((name.clone(), Arc::clone(f))),
                TokenSource::Literal(_) => None,
            })
            .collect();
        dynamic_tokens.sort_by(|a, b| a.0.cmp(&b.0));

        let defaults = PlanDefaults {
            layout: builder
                .layout
                .filter(|layout| !layout.is_empty())
                .unwrap_or_else(|| DEFAULT_LAYOUT.to_string()),
            render: builder.render,
            tokens: builder.tokens,
            policy: builder.policy,
        };

        let mut configs = builder.levels;
        let levels = LogLevel::ALL
            .iter()
            .map(|&level| {
                let config = configs.remove(&level).unwrap_or_default();
                (level, Arc::new(defaults.compile(level, config)))
            })
            .collect();

        let env_enabled = EnvPatterns::from_env(&builder.env_var)
            .map(|patterns| patterns.enables(&builder.namespace));

        let now = context.clock().now_ms();
        Logger {
            namespace: builder.namespace,
            defaults,
            levels: RwLock::new(levels),
            dynamic_tokens,
            formatter: builder.formatter,
            sink: Mutex::new(
                builder
                    .sink
                    .unwrap_or_else(|| Box::new(ConsoleAppender::new())),
            ),
            call_site: builder.call_site,
            silent: AtomicBool::new(builder.silent),
            enabled: RwLock::new(builder.enabled),
            env_enabled,
            min_level: RwLock::new(builder.min_level),
            timer: Mutex::new(Timer {
                created: now,
                last_call: now,
            }),
            context,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn context(&self) -> &Arc<LoggerContext> {
        &self.context
    }

    /// Whether calls on this namespace currently produce output
    pub fn is_enabled(&self) -> bool {
        match self.context.namespace_rule(&self.namespace) {
            Some(verdict) => verdict,
            None => self.enabled.read().or(self.env_enabled).unwrap_or(true),
        }
    }

    /// Override the environment selection for this logger
    pub fn set_enabled(&self, enabled: bool) {
        *self.enabled.write() = Some(enabled);
    }

    pub fn is_silent(&self) -> bool {
        self.silent.load(Ordering::Relaxed)
    }

    pub fn set_silent(&self, silent: bool) {
        self.silent.store(silent, Ordering::Relaxed);
    }

    pub fn min_level(&self) -> LogLevel {
        *self.min_level.read()
    }

    pub fn set_min_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    /// Restyle one token of `level` and recompile its plan
    pub fn set_style(&self, level: LogLevel, token: impl Into<String>, spec: impl Into<StyleSpec>) {
        let mut levels = self.levels.write();
        let mut config = levels
            .remove(&level)
            .map(|plan| plan.config.clone())
            .unwrap_or_default();
        config.styles.insert(token.into(), spec.into());
        levels.insert(level, Arc::new(self.defaults.compile(level, config)));
    }

    /// Replace the whole configuration of `level`
    pub fn set_level_config(&self, level: LogLevel, config: LevelConfig) {
        let plan = Arc::new(self.defaults.compile(level, config));
        self.levels.write().insert(level, plan);
    }

    /// Buffered, not yet flushed output of this namespace
    pub fn peek(&self) -> String {
        self.context.peek(&self.namespace)
    }

    /// Log at the default level
    #[track_caller]
    pub fn log(&self, message: impl Into<LogValue>, args: &[LogValue]) -> Option<String> {
        self.emit(LogLevel::Log, Some(message.into()), args, Location::caller())
    }

    #[track_caller]
    pub fn log_at(
        &self,
        level: LogLevel,
        message: impl Into<LogValue>,
        args: &[LogValue],
    ) -> Option<String> {
        self.emit(level, Some(message.into()), args, Location::caller())
    }

    #[track_caller]
    pub fn trace(&self, message: impl Into<LogValue>, args: &[LogValue]) -> Option<String> {
        self.emit(LogLevel::Trace, Some(message.into()), args, Location::caller())
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<LogValue>, args: &[LogValue]) -> Option<String> {
        self.emit(LogLevel::Debug, Some(message.into()), args, Location::caller())
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<LogValue>, args: &[LogValue]) -> Option<String> {
        self.emit(LogLevel::Info, Some(message.into()), args, Location::caller())
    }

    #[track_caller]
    pub fn warn(&self, message: impl Into<LogValue>, args: &[LogValue]) -> Option<String> {
        self.emit(LogLevel::Warn, Some(message.into()), args, Location::caller())
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<LogValue>, args: &[LogValue]) -> Option<String> {
        self.emit(LogLevel::Error, Some(message.into()), args, Location::caller())
    }

    #[track_caller]
    pub fn fatal(&self, message: impl Into<LogValue>, args: &[LogValue]) -> Option<String> {
        self.emit(LogLevel::Fatal, Some(message.into()), args, Location::caller())
    }

    /// Reset the duration timer without writing anything
    #[track_caller]
    pub fn mark(&self) {
        self.emit(LogLevel::Log, None, &[], Location::caller());
    }

    fn emit(
        &self,
        level: LogLevel,
        message: Option<LogValue>,
        args: &[LogValue],
        location: &'static Location<'static>,
    ) -> Option<String> {
        let context = &self.context;
        let metrics = context.metrics();
        let silent = self.is_silent();

        let mut timer = self.timer.lock();
        let now = context.clock().now_ms();
        let sequence = silent.then(|| context.next_sequence());
        let elapsed = now - timer.created;
        let duration = now - timer.last_call;

        let level = match &message {
            Some(value) if value.is_error() => LogLevel::Error,
            _ => level,
        };
        if !self.is_enabled() || level < self.min_level() {
            metrics.record_suppressed();
            return None;
        }

        let message = match message {
            Some(value) if !value.is_falsy() => value,
            _ => {
                timer.last_call = now;
                metrics.record_mark();
                return None;
            }
        };

        let text = match message.error_text() {
            Some(stack) => stack.to_string(),
            None => match &self.formatter {
                Some(formatter) => formatter(&message, args),
                None => format_string(&message, args),
            },
        };

        let plan = self.levels.read().get(&level).cloned()?;
        let date = context.clock().date();

        let mut values: HashMap<String, String> = HashMap::with_capacity(16);
        values.insert("name".to_string(), self.namespace.clone());
        values.insert("level".to_string(), level.to_str().to_string());
        values.insert("label".to_string(), plan.label.clone());
        values.insert("msg".to_string(), text);
        values.insert("duration".to_string(), format_duration(duration));
        values.insert("elapsed".to_string(), format_duration(elapsed));
        values.insert("date".to_string(), format_date("%d", &date));
        if plan.needs_call_site() {
            if let Some(site) = self.lookup_call_site(location) {
                values.insert("file".to_string(), site.file);
                values.insert("line".to_string(), site.line.to_string());
                values.insert("column".to_string(), site.column.to_string());
            }
        }
        for (name, source) in &self.defaults.tokens {
            if let TokenSource::Literal(value) = source {
                values.insert(name.clone(), value.clone());
            }
        }
        for (name, token) in &self.dynamic_tokens {
            let previous = values.get(name).cloned().unwrap_or_default();
            values.insert(name.clone(), token(&previous));
        }

        let output = match &plan.render {
            Some(render) => {
                let mut call_args = Vec::with_capacity(args.len() + 1);
                call_args.push(message);
                call_args.extend_from_slice(args);
                render(&RenderContext {
                    level,
                    values: &values,
                    args: &call_args,
                    stylers: plan.compiled.stylers(),
                })
            }
            None => plan.compiled.render(&values, &date),
        };

        match sequence {
            Some(sequence) => context.append(LogEntry::new(
                sequence,
                now,
                self.namespace.as_str(),
                level,
                output.as_str(),
            )),
            None => {
                let mut sink = self.sink.lock();
                match sink.write(level, &output) {
                    Ok(()) => {
                        metrics.record_emitted();
                    }
                    Err(e) => context.report_sink_error(sink.name(), &e),
                }
            }
        }

        timer.last_call = context.clock().now_ms();
        Some(output)
    }

    fn lookup_call_site(&self, location: &'static Location<'static>) -> Option<CallSite> {
        match &self.call_site {
            Some(lookup) => lookup(LOGGER_FRAMES),
            None => Some(CallSite::from(location)),
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("namespace", &self.namespace)
            .field("silent", &self.is_silent())
            .field("enabled", &self.is_enabled())
            .field("min_level", &self.min_level())
            .finish()
    }
}

/// Builder for constructing a [`Logger`] with a fluent API
///
/// # Example
/// ```
/// use rust_console_logger::prelude::*;
///
/// let logger = Logger::builder("docs:builder")
///     .context(LoggerContext::new().shared())
///     .level(LogLevel::Warn, LevelConfig::new().label("WARN"))
///     .token("version", "1.4.0")
///     .appender(MemoryAppender::new())
///     .build()
///     .unwrap();
///
/// assert_eq!(logger.namespace(), "docs:builder");
/// ```
pub struct LoggerBuilder {
    namespace: String,
    levels: HashMap<LogLevel, LevelConfig>,
    layout: Option<String>,
    render: Option<RenderFn>,
    tokens: HashMap<String, TokenSource>,
    formatter: Option<FormatFn>,
    sink: Option<Box<dyn Appender>>,
    env_var: String,
    enabled: Option<bool>,
    silent: bool,
    min_level: LogLevel,
    max_buffer: Option<BufferCapacity>,
    flush_order: Option<FlushOrder>,
    context: Option<Arc<LoggerContext>>,
    call_site: Option<CallSiteFn>,
    policy: UnterminatedBrace,
}

impl LoggerBuilder {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            levels: HashMap::new(),
            layout: None,
            render: None,
            tokens: HashMap::new(),
            formatter: None,
            sink: None,
            env_var: DEFAULT_ENV_VAR.to_string(),
            enabled: None,
            silent: false,
            min_level: LogLevel::Trace,
            max_buffer: None,
            flush_order: None,
            context: None,
            call_site: None,
            policy: UnterminatedBrace::default(),
        }
    }

    /// Configure one level
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel, config: LevelConfig) -> Self {
        self.levels.insert(level, config);
        self
    }

    /// Layout for levels that do not set their own
    #[must_use = "builder methods return a new value"]
    pub fn layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    /// Custom token; a literal is baked into every plan, a function runs per call.
    ///
    /// See [`TokenSource::dynamic`] for what a token function may do.
    #[must_use = "builder methods return a new value"]
    pub fn token(mut self, name: impl Into<String>, source: impl Into<TokenSource>) -> Self {
        self.tokens.insert(name.into(), source.into());
        self
    }

    /// Replace the printf-style message formatter.
    ///
    /// Like token and render functions it runs under the logger's timing
    /// lock and must not log through the same logger.
    #[must_use = "builder methods return a new value"]
    pub fn format<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&LogValue, &[LogValue]) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    /// Render function for levels that do not set their own
    #[must_use = "builder methods return a new value"]
    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&RenderContext<'_>) -> String + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    /// Sink for immediate output; the console by default
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.sink = Some(Box::new(appender));
        self
    }

    /// Environment variable holding namespace patterns
    #[must_use = "builder methods return a new value"]
    pub fn env(mut self, var: impl Into<String>) -> Self {
        self.env_var = var.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Buffer output until flushed instead of writing it
    #[must_use = "builder methods return a new value"]
    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Capacity of the shared buffer; validated by [`build`](Self::build)
    #[must_use = "builder methods return a new value"]
    pub fn max_buffer(mut self, max: usize) -> Self {
        self.max_buffer = Some(BufferCapacity::Limited(max));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_buffer_unlimited(mut self) -> Self {
        self.max_buffer = Some(BufferCapacity::Unlimited);
        self
    }

    /// Default ordering of the shared buffer
    #[must_use = "builder methods return a new value"]
    pub fn flush_order_by(mut self, order: FlushOrder) -> Self {
        self.flush_order = Some(order);
        self
    }

    /// Register in `context` instead of the global one
    #[must_use = "builder methods return a new value"]
    pub fn context(mut self, context: Arc<LoggerContext>) -> Self {
        self.context = Some(context);
        self
    }

    /// Replace the `#[track_caller]` location used for `{file}`, `{line}` and `{column}`
    #[must_use = "builder methods return a new value"]
    pub fn call_site<F>(mut self, lookup: F) -> Self
    where
        F: Fn(usize) -> Option<CallSite> + Send + Sync + 'static,
    {
        self.call_site = Some(Arc::new(lookup));
        self
    }

    /// How layouts treat a `{` with no matching `}`
    #[must_use = "builder methods return a new value"]
    pub fn unterminated_brace(mut self, policy: UnterminatedBrace) -> Self {
        self.policy = policy;
        self
    }

    /// Build the Logger, or return the one already registered under this namespace
    pub fn build(self) -> Result<Arc<Logger>> {
        if let Some(BufferCapacity::Limited(max)) = self.max_buffer {
            BufferCapacity::limited(max)?;
        }
        Ok(self.install())
    }

    fn install(mut self) -> Arc<Logger> {
        let context = self.context.take().unwrap_or_else(LoggerContext::global);
        let namespace = self.namespace.clone();

        let (logger, existed) = context.register(&namespace, || {
            if let Some(capacity) = self.max_buffer {
                context.set_buffer_capacity(capacity);
            }
            if let Some(order) = self.flush_order {
                context.set_flush_order(order);
            }
            Logger::from_builder(self, Arc::clone(&context))
        });

        if existed {
            context.warn_duplicate(&namespace);
        }
        logger
    }
}
