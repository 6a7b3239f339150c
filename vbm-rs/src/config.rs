//! `.vbmrc` configuration file parser.
//!
//! | Directive | Action |
//! |-----------|--------|
//! | `/set <name>=<value>` or `/set <name> <value>` | set an option |
//! | Lines starting with `;` | comment, ignored |
//! | Any other `/command` | silently skipped |
//!
//! Options:
//!
//! | Name | Value | Default |
//! |------|-------|---------|
//! | `depth` | nesting depth shown by `print` | `2` |
//! | `headers` | `0`/`1`: print a header before each lesson | `1` |
//! | `log` | default log filter when `VBM_LOG` is unset | `warn` |

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::display::RenderOptions;

// ── Public API ────────────────────────────────────────────────────────────────

/// A non-fatal error encountered while loading a config file.
#[derive(Debug, PartialEq)]
pub struct ConfigError {
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Settings read from rc files.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub depth: usize,
    pub headers: bool,
    pub log: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config { depth: RenderOptions::default().depth, headers: true, log: None }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config string on top of the defaults.
    pub fn load_str(s: &str) -> (Self, Vec<ConfigError>) {
        let mut config = Config::new();
        let errors = config.apply_str(s);
        (config, errors)
    }

    /// Apply the directives in `s` to this config.  Later settings win, so
    /// several files can be layered.  Returns the errors on recognised lines.
    pub fn apply_str(&mut self, s: &str) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        for (i, raw) in s.lines().enumerate() {
            let lineno = i + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with(';') {
                continue;
            }

            let Some(rest) = line.strip_prefix('/') else { continue };

            let (cmd, args_str) = rest
                .split_once(|c: char| c.is_ascii_whitespace())
                .unwrap_or((rest, ""));

            if cmd == "set" {
                let tokens = split_args(args_str.trim());
                if let Err(message) = self.parse_set(&tokens) {
                    errors.push(ConfigError { line: lineno, message });
                }
            }
        }

        errors
    }

    /// Read a config file from disk and apply it.
    pub fn apply_file(&mut self, path: &Path) -> std::io::Result<Vec<ConfigError>> {
        let s = std::fs::read_to_string(path)?;
        log::debug!("loading config {}", path.display());
        Ok(self.apply_str(&s))
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions { depth: self.depth }
    }

    /// Parse `/set <name>=<value>` or `/set <name> <value>`.
    fn parse_set(&mut self, tokens: &[String]) -> Result<(), String> {
        let Some(first) = tokens.first() else {
            return Err("/set: requires an argument".into());
        };

        let (name, value) = if let Some((name, value)) = first.split_once('=') {
            (name.to_owned(), value.to_owned())
        } else if tokens.len() >= 2 {
            (first.clone(), tokens[1..].join(" "))
        } else {
            return Err(format!("/set: missing value for '{first}'"));
        };

        match name.as_str() {
            "" => Err("/set: option name cannot be empty".into()),
            "depth" => {
                self.depth = value
                    .parse()
                    .map_err(|_| format!("/set depth: expected a non-negative integer, got '{value}'"))?;
                Ok(())
            }
            "headers" => {
                self.headers = match value.as_str() {
                    "1" | "on" => true,
                    "0" | "off" => false,
                    _ => return Err(format!("/set headers: expected 0 or 1, got '{value}'")),
                };
                Ok(())
            }
            "log" => {
                self.log = Some(value);
                Ok(())
            }
            other => Err(format!("/set: unknown option '{other}'")),
        }
    }
}

// ── Search path ───────────────────────────────────────────────────────────────

/// Existing rc files in load order: `$HOME/.vbmrc`, then `./.vbmrc`.
pub fn find_user_configs() -> Vec<PathBuf> {
    let home = BaseDirs::new().map(|dirs| dirs.home_dir().join(".vbmrc"));
    home.into_iter()
        .chain(std::iter::once(PathBuf::from(".vbmrc")))
        .filter(|p| p.is_file())
        .collect()
}

// ── Argument tokenizer ────────────────────────────────────────────────────────

/// Split `s` into whitespace-delimited tokens, honouring double-quoted strings
/// and `\"` escapes within them.
fn split_args(s: &str) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut chars = s.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '\\' if in_quotes => {
                if let Some(escaped) = chars.next() {
                    cur.push(escaped);
                }
            }
            c if c.is_ascii_whitespace() && !in_quotes => {
                if !cur.is_empty() {
                    args.push(std::mem::take(&mut cur));
                }
            }
            c => cur.push(c),
        }
    }
    if !cur.is_empty() {
        args.push(cur);
    }
    args
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn split_quoted_spaces() {
        assert_eq!(split_args(r#"log "vbm=debug, warn""#), ["log", "vbm=debug, warn"]);
    }

    #[test]
    fn split_escaped_quote_inside_quotes() {
        assert_eq!(split_args(r#""say \"hi\"""#), [r#"say "hi""#]);
    }

    #[test]
    fn defaults() {
        let (cfg, errs) = Config::load_str("");
        assert!(errs.is_empty());
        assert_eq!(cfg, Config { depth: 2, headers: true, log: None });
    }

    #[test]
    fn set_equals_syntax() {
        let (cfg, errs) = Config::load_str("/set depth=4");
        assert!(errs.is_empty(), "{errs:?}");
        assert_eq!(cfg.depth, 4);
        assert_eq!(cfg.render_options().depth, 4);
    }

    #[test]
    fn set_space_syntax() {
        let (cfg, errs) = Config::load_str("/set headers 0\n/set log vbm=trace");
        assert!(errs.is_empty(), "{errs:?}");
        assert!(!cfg.headers);
        assert_eq!(cfg.log.as_deref(), Some("vbm=trace"));
    }

    #[test]
    fn bad_values_are_reported_with_line_numbers() {
        let (cfg, errs) = Config::load_str("; header\n/set depth=deep\n/set headers=maybe\n/set colour=1");
        assert_eq!(errs.len(), 3);
        assert_eq!(errs[0].line, 2);
        assert!(errs[0].to_string().starts_with("line 2: /set depth"));
        assert_eq!(errs[2].message, "/set: unknown option 'colour'");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn missing_value_is_error() {
        let (_, errs) = Config::load_str("/set depth");
        assert_eq!(errs[0].message, "/set: missing value for 'depth'");
    }

    #[test]
    fn comments_and_unknown_commands_skipped() {
        let (cfg, errs) = Config::load_str(
            ";; rc file\n\
             \n\
             /echo hello\n\
             not a command\n\
             /set depth=0",
        );
        assert!(errs.is_empty(), "{errs:?}");
        assert_eq!(cfg.depth, 0);
    }

    #[test]
    fn files_layer_in_order() {
        let mut first = tempfile::NamedTempFile::new().unwrap();
        writeln!(first, "/set depth=5\n/set headers=0").unwrap();
        let mut second = tempfile::NamedTempFile::new().unwrap();
        writeln!(second, "/set depth=1").unwrap();

        let mut cfg = Config::new();
        assert!(cfg.apply_file(first.path()).unwrap().is_empty());
        assert!(cfg.apply_file(second.path()).unwrap().is_empty());
        assert_eq!(cfg.depth, 1);
        assert!(!cfg.headers);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::new();
        assert!(cfg.apply_file(&dir.path().join("absent.vbmrc")).is_err());
    }
}
