use colored::Color;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// The fixed slots of a log line that can be styled independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Debug,
    Error,
    Info,
    Warn,
    Verb,
    Path,
    Message,
    Duration,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Debug,
        Category::Error,
        Category::Info,
        Category::Warn,
        Category::Verb,
        Category::Path,
        Category::Message,
        Category::Duration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Debug => "debug",
            Category::Error => "error",
            Category::Info => "info",
            Category::Warn => "warn",
            Category::Verb => "verb",
            Category::Path => "path",
            Category::Message => "message",
            Category::Duration => "duration",
        }
    }

    pub fn from_name(name: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StyleError {
    #[error("category `{0}` has no style")]
    Unstyled(Category),
    #[error("unknown style `{0}`")]
    UnknownStyle(String),
}

/// Maps categories to style names. A category may be present with no style
/// (`None`), which is distinct from being absent when themes are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Theme {
    styles: BTreeMap<Category, Option<String>>,
}

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in palette every logger starts with.
    pub fn builtin() -> Self {
        Theme::new()
            .with(Category::Debug, Some("yellow"))
            .with(Category::Error, Some("red"))
            .with(Category::Info, Some("green"))
            .with(Category::Warn, Some("yellow"))
            .with(Category::Verb, Some("white"))
            .with(Category::Path, Some("cyan"))
            .with(Category::Message, Some("white"))
            .with(Category::Duration, None)
    }

    pub fn with(mut self, category: Category, style: Option<&str>) -> Self {
        self.set(category, style);
        self
    }

    pub fn set(&mut self, category: Category, style: Option<&str>) {
        self.styles.insert(category, style.map(str::to_string));
    }

    pub fn contains(&self, category: Category) -> bool {
        self.styles.contains_key(&category)
    }

    pub fn get(&self, category: Category) -> Option<&str> {
        self.styles.get(&category).and_then(|style| style.as_deref())
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, Option<&str>)> {
        self.styles
            .iter()
            .map(|(category, style)| (*category, style.as_deref()))
    }

    /// Copies every category of `base` that `self` does not mention.
    pub fn fill_from(&mut self, base: &Theme) {
        for (category, style) in &base.styles {
            self.styles
                .entry(*category)
                .or_insert_with(|| style.clone());
        }
    }

    pub fn style(&self, category: Category) -> Result<Color, StyleError> {
        let name = self.get(category).ok_or(StyleError::Unstyled(category))?;
        resolve_style(name)
    }

    /// Applies the category's style to `text`, or hands `text` back untouched
    /// when the category cannot be styled.
    pub fn paint(&self, text: &str, category: Category) -> String {
        match self.style(category) {
            Ok(color) => paint(text, color),
            Err(_) => text.to_string(),
        }
    }
}

pub fn resolve_style(name: &str) -> Result<Color, StyleError> {
    let normalized = name.trim().to_lowercase().replace(['_', '-'], " ");
    let normalized = match normalized.as_str() {
        "grey" | "gray" => "bright black".to_string(),
        _ => normalized,
    };

    normalized
        .parse::<Color>()
        .map_err(|_| StyleError::UnknownStyle(name.to_string()))
}

// Written directly instead of through `Colorize` so output does not depend on
// whether stdout happens to be a terminal; the sink may be anything.
fn paint(text: &str, color: Color) -> String {
    format!("\x1b[{}m{}\x1b[0m", color.to_fg_str(), text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_theme_covers_every_category() {
        let theme = Theme::builtin();

        assert_eq!(theme.len(), Category::ALL.len());
        assert_eq!(theme.get(Category::Info), Some("green"));
        assert_eq!(theme.get(Category::Path), Some("cyan"));
        assert!(theme.contains(Category::Duration));
        assert_eq!(theme.get(Category::Duration), None);
    }

    #[test]
    fn category_names_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_name(category.as_str()), Some(category));
        }
        assert_eq!(Category::from_name("verbose"), None);
    }

    #[test]
    fn fill_from_keeps_own_entries() {
        let mut theme = Theme::new().with(Category::Duration, Some("blue"));
        theme.fill_from(&Theme::builtin());

        let mut expected = Theme::builtin();
        expected.set(Category::Duration, Some("blue"));
        assert_eq!(theme, expected);
    }

    #[test]
    fn resolves_color_names() {
        assert_eq!(resolve_style("red"), Ok(Color::Red));
        assert_eq!(resolve_style("Bright_Blue"), Ok(Color::BrightBlue));
        assert_eq!(resolve_style("grey"), Ok(Color::BrightBlack));
        assert_eq!(
            resolve_style("sparkly"),
            Err(StyleError::UnknownStyle("sparkly".to_string()))
        );
    }

    #[test]
    fn paint_falls_back_to_plain_text() {
        let theme = Theme::new()
            .with(Category::Verb, Some("not-a-color"))
            .with(Category::Duration, None);

        assert_eq!(theme.paint("GET", Category::Verb), "GET");
        assert_eq!(theme.paint("1ms", Category::Duration), "1ms");
        assert_eq!(theme.paint("/", Category::Path), "/");
    }

    #[test]
    fn paint_wraps_with_ansi_codes() {
        let theme = Theme::builtin();

        assert_eq!(theme.paint("/", Category::Path), "\x1b[36m/\x1b[0m");
        assert_eq!(theme.paint("GET", Category::Verb), "\x1b[37mGET\x1b[0m");
    }
}
