use serde_json::Value;
use std::fmt;

use crate::helpers::{env_flag, env_value, is_truthy};
use crate::sink::Sink;
use crate::theme::{Category, Theme};

pub const ENV_DATE_FORMAT: &str = "LORI_DATE_FORMAT";
pub const ENV_LOCAL_TIME: &str = "LORI_LOCAL_TIME";
pub const ENV_COLORS: &str = "LORI_COLORS";
pub const ENV_THEME: &str = "LORI_THEME";
pub const ENV_NO_COLOR: &str = "NO_COLOR";

/// Settings accepted by [`Logger::configure`](crate::Logger::configure).
///
/// `theme` and `log` fall back to the built-in theme and stdout when left
/// empty; the other fields keep the logger's current value.
#[derive(Clone, Default)]
pub struct Options {
    pub theme: Option<Theme>,
    pub date_format: Option<String>,
    pub local_time: Option<bool>,
    pub colors: Option<bool>,
    pub log: Option<Sink>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn date_format(mut self, format: &str) -> Self {
        self.date_format = Some(format.to_string());
        self
    }

    pub fn local_time(mut self, enabled: bool) -> Self {
        self.local_time = Some(enabled);
        self
    }

    pub fn colors(mut self, enabled: bool) -> Self {
        self.colors = Some(enabled);
        self
    }

    pub fn log(mut self, sink: Sink) -> Self {
        self.log = Some(sink);
        self
    }

    /// Builds options from a loosely typed object such as parsed JSON.
    ///
    /// Never fails: unknown keys, a non-string `dateFormat` and a non-object
    /// `theme` are ignored, and `localTime`/`colors` are read by truthiness.
    pub fn from_value(value: &Value) -> Self {
        let mut options = Options::new();

        let Some(object) = value.as_object() else {
            return options;
        };

        if let Some(Value::String(format)) = object.get("dateFormat") {
            options.date_format = Some(format.clone());
        }

        if let Some(theme) = object.get("theme").and_then(theme_from_value) {
            options.theme = Some(theme);
        }

        options.local_time = object.get("localTime").map(is_truthy);
        options.colors = object.get("colors").map(is_truthy);

        options
    }

    /// Reads `LORI_*` variables, honouring `NO_COLOR`.
    pub fn from_env() -> Self {
        let mut options = Options::new();

        options.date_format = env_value(ENV_DATE_FORMAT);
        options.local_time = env_value(ENV_LOCAL_TIME).map(|value| env_flag(&value));
        options.colors = env_value(ENV_COLORS).map(|value| env_flag(&value));

        if env_value(ENV_NO_COLOR).is_some() {
            options.colors = Some(false);
        }

        options.theme = env_value(ENV_THEME)
            .and_then(|raw| serde_json::from_str::<Value>(&raw).ok())
            .and_then(|value| theme_from_value(&value));

        options
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("theme", &self.theme)
            .field("date_format", &self.date_format)
            .field("local_time", &self.local_time)
            .field("colors", &self.colors)
            .field("log", &self.log.as_ref().map(|_| "<sink>"))
            .finish()
    }
}

/// Objects become themes; string values name a style, `null` marks a
/// category as unstyled, anything else is skipped.
pub fn theme_from_value(value: &Value) -> Option<Theme> {
    let object = value.as_object()?;
    let mut theme = Theme::new();

    for (name, style) in object {
        let Some(category) = Category::from_name(name) else {
            continue;
        };

        match style {
            Value::String(style) => theme.set(category, Some(style)),
            Value::Null => theme.set(category, None),
            _ => {}
        }
    }

    Some(theme)
}
