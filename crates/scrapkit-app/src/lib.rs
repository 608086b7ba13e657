//! Scrapkit Application
//!
//! A thin shell around the core engine: loads configuration and a
//! scrapbook, builds an editor and reports what it opened.

use kurbo::Size;
use scrapkit_core::{Editor, EditorConfig, EditorError, Scrapbook, ShortcutRegistry, paint_list};
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the shell.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Usage(String),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Editor(#[from] EditorError),
}

/// Window-independent application settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Scrapkit".to_string(),
            width: 1280,
            height: 800,
        }
    }
}

/// Command-line arguments: `scrapkit [--config <file>] [scrapbook.json]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppArgs {
    pub config: Option<PathBuf>,
    pub scrapbook: Option<PathBuf>,
}

impl AppArgs {
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, AppError> {
        let mut parsed = AppArgs::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    let path = args
                        .next()
                        .ok_or_else(|| AppError::Usage("--config needs a path".to_string()))?;
                    parsed.config = Some(PathBuf::from(path));
                }
                flag if flag.starts_with('-') => {
                    return Err(AppError::Usage(format!("Unknown option '{}'", flag)));
                }
                _ if parsed.scrapbook.is_some() => {
                    return Err(AppError::Usage("Only one scrapbook can be opened".to_string()));
                }
                path => parsed.scrapbook = Some(PathBuf::from(path)),
            }
        }
        Ok(parsed)
    }
}

/// The running application.
pub struct App {
    pub config: AppConfig,
    pub editor: Editor,
}

impl App {
    /// Build an editor from the arguments, opening the scrapbook if one was given.
    pub fn open(args: &AppArgs) -> Result<Self, AppError> {
        let editor_config = match &args.config {
            Some(path) => EditorConfig::load(path)?,
            None => EditorConfig::default(),
        };
        let mut editor = Editor::new(editor_config);

        match &args.scrapbook {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| AppError::Read {
                    path: path.clone(),
                    source,
                })?;
                editor.load(Scrapbook::from_json(&json)?);
            }
            None => editor.new_scrapbook("Untitled Scrapbook"),
        }

        let config = AppConfig::default();
        editor.fit_page(Size::new(f64::from(config.width), f64::from(config.height)));
        Ok(Self { config, editor })
    }

    /// Print a summary of the open scrapbook and the shortcut table.
    pub fn report(&self) {
        let Some(scrapbook) = self.editor.scrapbook() else {
            return;
        };
        println!("{}: {}", self.config.title, scrapbook.title);
        for page in &scrapbook.pages {
            let visible = paint_list(page).len();
            println!(
                "  {:3}. {:24} {}x{}  {} element(s), {} visible",
                page.order + 1,
                page.name,
                page.width,
                page.height,
                page.len(),
                visible
            );
        }
        log::info!("Initial zoom {:.2}", self.editor.viewport.zoom());
        ShortcutRegistry::print_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrapkit_core::PageSize;

    fn args(list: &[&str]) -> Result<AppArgs, AppError> {
        AppArgs::parse(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(args(&[]).unwrap(), AppArgs::default());
        let parsed = args(&["-c", "cfg.json", "book.json"]).unwrap();
        assert_eq!(parsed.config, Some(PathBuf::from("cfg.json")));
        assert_eq!(parsed.scrapbook, Some(PathBuf::from("book.json")));
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(matches!(args(&["--config"]), Err(AppError::Usage(_))));
        assert!(matches!(args(&["--verbose"]), Err(AppError::Usage(_))));
        assert!(matches!(args(&["a.json", "b.json"]), Err(AppError::Usage(_))));
    }

    #[test]
    fn test_open_without_scrapbook() {
        let app = App::open(&AppArgs::default()).unwrap();
        assert_eq!(app.editor.scrapbook().unwrap().page_count(), 1);
    }

    #[test]
    fn test_open_scrapbook_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.json");
        let scrapbook = Scrapbook::new("Holiday", PageSize::default());
        std::fs::write(&path, scrapbook.to_json().unwrap()).unwrap();

        let app = App::open(&AppArgs { config: None, scrapbook: Some(path) }).unwrap();
        assert_eq!(app.editor.scrapbook().unwrap().title, "Holiday");
    }

    #[test]
    fn test_open_missing_file() {
        let result = App::open(&AppArgs {
            config: None,
            scrapbook: Some(PathBuf::from("/nonexistent/book.json")),
        });
        assert!(matches!(result, Err(AppError::Read { .. })));
    }
}
