//! Theme records and loading.
//!
//! A theme is a named CSS source applied at publish time. Built-in themes
//! ship with the crate; custom themes are plain `.css` files in a
//! user-chosen directory, keyed by file stem. Built-in CSS is written
//! against `#write` the way desktop-editor themes are, so it goes through
//! the same root-selector remapping as imported stylesheets.

use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("failed to read theme directory {}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read theme file {}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeKind {
    Builtin,
    Custom,
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub id: String,
    pub name: String,
    pub css: String,
    pub kind: ThemeKind,
    /// Source file for custom themes.
    pub path: Option<PathBuf>,
}

/// Holds all known themes, built-in first, in load order. A custom theme
/// with the same id as a built-in one replaces it.
#[derive(Debug, Default)]
pub struct ThemeManager {
    themes: IndexMap<String, Theme>,
}

impl ThemeManager {
    pub fn with_builtin_themes() -> Self {
        let mut manager = Self::default();
        for theme in builtin_themes() {
            manager.themes.insert(theme.id.clone(), theme);
        }
        manager
    }

    /// Load every `*.css` file in `dir` as a custom theme. Returns how many
    /// were loaded. Non-CSS files are ignored.
    pub fn load_custom_dir(&mut self, dir: &Path) -> Result<usize, ThemeError> {
        let entries = fs::read_dir(dir).map_err(|source| ThemeError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut loaded = 0;
        for entry in entries {
            let entry = entry.map_err(|source| ThemeError::ReadDir {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("css") {
                continue;
            }
            let css = fs::read_to_string(&path).map_err(|source| ThemeError::ReadFile {
                path: path.clone(),
                source,
            })?;
            let id = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("custom")
                .to_string();
            log::debug!("loaded custom theme {} from {}", id, path.display());
            self.themes.insert(
                id.clone(),
                Theme {
                    name: id.clone(),
                    id,
                    css,
                    kind: ThemeKind::Custom,
                    path: Some(path),
                },
            );
            loaded += 1;
        }
        Ok(loaded)
    }

    pub fn get(&self, id: &str) -> Option<&Theme> {
        self.themes.get(id)
    }

    pub fn all(&self) -> impl Iterator<Item = &Theme> {
        self.themes.values()
    }
}

// Pseudo-elements are deliberately absent: the target editor drops
// ::before/::after content, so decorations must come from real properties.

const MINIMALIST_CSS: &str = "\
#write { max-width: 677px; font-family: -apple-system, 'PingFang SC', 'Helvetica Neue', sans-serif; font-size: 16px; color: rgb(51, 51, 51); }
#write h1 { font-size: 22px; font-weight: bold; margin: 32px 0 16px 0; }
#write h2 { font-size: 19px; font-weight: bold; margin: 28px 0 14px 0; }
#write h3 { font-size: 17px; font-weight: bold; margin: 24px 0 12px 0; }
p { margin: 0 0 16px 0; }
a { color: rgb(0, 122, 255); text-decoration: none; }
blockquote { margin: 16px 0; padding: 8px 16px; border-left: 3px solid rgb(220, 220, 220); color: rgb(119, 119, 119); }
code { font-family: 'SF Mono', Menlo, monospace; font-size: 14px; background-color: rgb(246, 246, 246); padding: 2px 4px; border-radius: 3px; }
pre { background-color: rgb(246, 246, 246); padding: 12px 16px; border-radius: 5px; font-size: 14px; }
hr { border: none; border-top: 1px solid rgb(232, 232, 232); margin: 24px 0; }
";

const TECHNICAL_CSS: &str = "\
#write { max-width: 677px; font-family: 'JetBrains Mono', 'SF Mono', Menlo, monospace; font-size: 15px; color: rgb(36, 41, 46); }
#write h1 { font-size: 21px; border-bottom: 2px solid rgb(3, 102, 214); padding-bottom: 8px; margin: 32px 0 16px 0; }
#write h2 { font-size: 18px; border-bottom: 1px solid rgb(225, 228, 232); padding-bottom: 6px; margin: 28px 0 14px 0; }
#write h3 { font-size: 16px; margin: 24px 0 12px 0; }
a { color: rgb(3, 102, 214); }
blockquote { margin: 16px 0; padding: 0 16px; border-left: 4px solid rgb(223, 226, 229); color: rgb(106, 115, 125); }
code { background-color: rgb(243, 244, 246); padding: 2px 5px; border-radius: 3px; font-size: 13px; }
pre { background-color: rgb(40, 44, 52); color: rgb(171, 178, 191); padding: 14px 16px; border-radius: 6px; font-size: 13px; }
pre code { background-color: transparent; color: rgb(171, 178, 191); }
table { border-collapse: collapse; }
th, td { border: 1px solid rgb(223, 226, 229); padding: 6px 13px; }
";

const MODERN_MAGAZINE_CSS: &str = "\
#write { max-width: 677px; font-family: Georgia, 'Songti SC', serif; font-size: 17px; color: rgb(34, 34, 34); line-height: 1.9; }
#write h1 { font-size: 26px; font-weight: bold; text-align: center; margin: 36px 0 20px 0; letter-spacing: 1px; }
#write h2 { font-size: 21px; font-weight: bold; margin: 30px 0 16px 0; color: rgb(184, 62, 59); }
#write h3 { font-size: 18px; font-weight: bold; margin: 26px 0 14px 0; }
p { margin: 0 0 20px 0; text-align: justify; }
a { color: rgb(184, 62, 59); text-decoration: underline; }
strong { color: rgb(184, 62, 59); }
blockquote { margin: 20px 0; padding: 12px 20px; background-color: rgb(249, 246, 241); border-left: 4px solid rgb(184, 62, 59); font-style: italic; }
img { border-radius: 4px; }
hr { border: none; text-align: center; margin: 28px 0; border-top: 1px dashed rgb(200, 200, 200); }
";

fn builtin_themes() -> Vec<Theme> {
    let builtin = |id: &str, name: &str, css: &str| Theme {
        id: id.to_string(),
        name: name.to_string(),
        css: css.to_string(),
        kind: ThemeKind::Builtin,
        path: None,
    };
    vec![
        builtin("minimalist", "Minimalist", MINIMALIST_CSS),
        builtin("technical", "Technical", TECHNICAL_CSS),
        builtin("modern-magazine", "Modern Magazine", MODERN_MAGAZINE_CSS),
    ]
}
