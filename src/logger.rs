use arc_swap::ArcSwap;
use chrono::{Local, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::config::Options;
use crate::date_format::DateFormat;
use crate::helpers::format_message;
use crate::middleware::layer::AccessLogLayer;
use crate::sink::{self, Sink};
use crate::theme::{Category, Theme};
use crate::timing::{Elapsed, RequestTiming};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Severity::Debug => Category::Debug,
            Severity::Info => Category::Info,
            Severity::Warn => Category::Warn,
            Severity::Error => Category::Error,
        }
    }

    // Pads the tag so messages start in the same column for every severity.
    fn padding(&self) -> &'static str {
        match self {
            Severity::Debug | Severity::Error => " ",
            Severity::Info | Severity::Warn => "  ",
        }
    }
}

/// Everything a log call reads. Replaced wholesale on every change.
#[derive(Clone)]
pub struct LoggerState {
    pub theme: Theme,
    pub date_format: DateFormat,
    pub local_time: bool,
    pub colors: bool,
    pub sink: Sink,
}

impl Default for LoggerState {
    fn default() -> Self {
        Self {
            theme: Theme::builtin(),
            date_format: DateFormat::default(),
            local_time: false,
            colors: true,
            sink: sink::stdout(),
        }
    }
}

impl fmt::Debug for LoggerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerState")
            .field("theme", &self.theme)
            .field("date_format", &self.date_format.as_str())
            .field("local_time", &self.local_time)
            .field("colors", &self.colors)
            .finish_non_exhaustive()
    }
}

impl LoggerState {
    pub fn timestamp(&self) -> String {
        if self.local_time {
            self.date_format.render(&Local::now())
        } else {
            self.date_format.render(&Utc::now())
        }
    }

    pub fn wrap(&self, text: &str, category: Category) -> String {
        if !self.colors {
            return text.to_string();
        }
        self.theme.paint(text, category)
    }

    pub fn wrap_date(&self, tag: &str, category: Category) -> String {
        self.wrap(&format!("[{}] {}", self.timestamp(), tag), category)
    }

    fn emit(&self, line: &str) {
        (self.sink)(line)
    }
}

/// Formats timestamped, optionally colorized lines and hands them to a sink.
///
/// Configuration can change at any time from any thread; each log call works
/// on the snapshot that was current when it started. No method returns an
/// error or panics on bad input.
pub struct Logger {
    state: ArcSwap<LoggerState>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("state", &self.snapshot())
            .finish()
    }
}

impl Logger {
    pub fn new() -> Self {
        Self {
            state: ArcSwap::from_pointee(LoggerState::default()),
        }
    }

    pub fn snapshot(&self) -> Arc<LoggerState> {
        self.state.load_full()
    }

    fn update<F: FnMut(&mut LoggerState)>(&self, mut change: F) {
        self.state.rcu(|current| {
            let mut next = LoggerState::clone(current);
            change(&mut next);
            next
        });
    }

    pub fn configure(&self, options: Options) {
        self.update(|state| {
            state.theme = options.theme.clone().unwrap_or_else(Theme::builtin);

            if let Some(format) = &options.date_format {
                state.date_format = DateFormat::new(format);
            }
            if let Some(local_time) = options.local_time {
                state.local_time = local_time;
            }
            if let Some(colors) = options.colors {
                state.colors = colors;
            }

            state.sink = options.log.clone().unwrap_or_else(sink::stdout);
        });
    }

    pub fn reset(&self) {
        self.state.store(Arc::new(LoggerState::default()));
    }

    pub fn set_date_format(&self, format: &str) {
        let format = DateFormat::new(format);
        self.update(|state| state.date_format = format.clone());
    }

    pub fn set_logger<F>(&self, write: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.set_sink(Some(Arc::new(write)));
    }

    /// Replaces the sink; `None` restores stdout.
    pub fn set_sink(&self, sink: Option<Sink>) {
        let sink = sink.unwrap_or_else(sink::stdout);
        self.update(|state| state.sink = Arc::clone(&sink));
    }

    /// Replaces the theme. Categories missing from `theme` become unstyled.
    pub fn set_theme(&self, theme: Theme) {
        self.update(|state| state.theme = theme.clone());
    }

    /// Merges `theme` over the current one, keeping categories it omits.
    pub fn update_theme(&self, theme: Theme) {
        self.update(|state| {
            let mut merged = theme.clone();
            merged.fill_from(&state.theme);
            state.theme = merged;
        });
    }

    pub fn use_colors(&self, enabled: bool) {
        self.update(|state| state.colors = enabled);
    }

    /// `true` renders timestamps in the local zone, `false` in UTC.
    pub fn use_local_time(&self, enabled: bool) {
        self.update(|state| state.local_time = enabled);
    }

    pub fn current_theme(&self) -> Theme {
        self.state.load().theme.clone()
    }

    pub fn default_theme(&self) -> Theme {
        Theme::builtin()
    }

    pub fn date_format(&self) -> String {
        self.state.load().date_format.as_str().to_string()
    }

    pub fn local_time(&self) -> bool {
        self.state.load().local_time
    }

    pub fn colors_enabled(&self) -> bool {
        self.state.load().colors
    }

    /// Unstyled pass-through to the sink. See [`log_raw!`](crate::log_raw).
    pub fn log(&self, args: fmt::Arguments<'_>) {
        self.state.load().emit(&args.to_string());
    }

    pub fn write<M: Serialize + ?Sized>(&self, severity: Severity, message: &M) {
        let state = self.state.load();
        let tag = format!("[{}]", severity.label());

        let line = format!(
            "{}{}{}",
            state.wrap_date(&tag, severity.category()),
            severity.padding(),
            state.wrap(&format_message(message), Category::Message)
        );
        state.emit(&line);
    }

    pub fn debug<M: Serialize + ?Sized>(&self, message: &M) {
        self.write(Severity::Debug, message);
    }

    pub fn info<M: Serialize + ?Sized>(&self, message: &M) {
        self.write(Severity::Info, message);
    }

    pub fn warn<M: Serialize + ?Sized>(&self, message: &M) {
        self.write(Severity::Warn, message);
    }

    pub fn error<M: Serialize + ?Sized>(&self, message: &M) {
        self.write(Severity::Error, message);
    }

    pub fn access(&self, verb: &str, path: &str, elapsed: impl Into<Elapsed>) {
        let state = self.state.load();
        let elapsed = elapsed.into();

        let line = format!(
            "{}  {} {} {}",
            state.wrap_date("[INFO]", Category::Info),
            state.wrap(verb, Category::Verb),
            state.wrap(path, Category::Path),
            state.wrap(&elapsed.display_millis(), Category::Duration)
        );
        state.emit(&line);
    }

    pub fn access_timed(&self, timing: &RequestTiming) {
        self.access(&timing.method, &timing.path, timing.elapsed());
    }

    /// A tower layer that writes one access line per completed request.
    pub fn middleware(self: &Arc<Self>) -> AccessLogLayer {
        AccessLogLayer::new(Arc::clone(self))
    }
}
