//! Precompiled template cache.
//!
//! Templates live in one directory with a fixed layout:
//!
//! ```text
//! html/
//!   base.tmpl          shared layout
//!   partials/*.tmpl    shared fragments, registered as `partials/<file>`
//!   pages/*.tmpl       one entry per page, keyed by file name
//! ```
//!
//! Each page gets its own minijinja [`Environment`] holding the base layout,
//! every partial and the page itself, with the function table registered
//! before anything is parsed. The cache is built once at startup and only
//! read afterwards, so it is shared across requests without locking.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use minijinja::{AutoEscape, Environment, ErrorKind, Template};

/// File name of the shared layout, relative to the html directory.
pub const BASE_TEMPLATE: &str = "base.tmpl";

/// Extension of template files picked up from `partials/` and `pages/`.
const TEMPLATE_EXTENSION: &str = "tmpl";

/// Errors raised while building the cache. All of them abort startup.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// A template file or directory could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// The file or directory that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The pages directory has no templates in it.
    #[error("no page templates found in {}", .0.display())]
    NoPages(PathBuf),

    /// A template in a page's set failed to parse.
    #[error("failed to compose page {page}: {source}")]
    Compose {
        /// Cache key of the page being composed.
        page: String,
        /// Parse error from minijinja.
        #[source]
        source: minijinja::Error,
    },
}

/// Immutable map from page name to its composed template set.
pub struct TemplateCache {
    pages: HashMap<String, Environment<'static>>,
}

impl TemplateCache {
    /// Build the cache from an html directory (see the module docs for the layout).
    pub fn new(html_dir: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let html_dir = html_dir.as_ref();

        let base_path = html_dir.join(BASE_TEMPLATE);
        let base = std::fs::read_to_string(&base_path).map_err(|source| TemplateError::Io {
            path: base_path,
            source,
        })?;
        let partials = read_templates(&html_dir.join("partials"))?;

        let pages_dir = html_dir.join("pages");
        let pages = read_templates(&pages_dir)?;
        if pages.is_empty() {
            return Err(TemplateError::NoPages(pages_dir));
        }

        let mut cache = HashMap::with_capacity(pages.len());
        for (name, source) in pages {
            let env = compose(&base, &partials, &name, source).map_err(|source| {
                TemplateError::Compose {
                    page: name.clone(),
                    source,
                }
            })?;
            cache.insert(name, env);
        }

        tracing::info!(
            dir = %html_dir.display(),
            pages = cache.len(),
            partials = partials.len(),
            "template cache built"
        );

        Ok(Self { pages: cache })
    }

    /// Look up the entry template of `page`; `Ok(None)` if no such page is cached.
    pub fn get(&self, page: &str) -> Result<Option<Template<'_, '_>>, minijinja::Error> {
        self.pages
            .get(page)
            .map(|env| env.get_template(page))
            .transpose()
    }

    /// True if the cache holds an entry for `page`.
    pub fn contains(&self, page: &str) -> bool {
        self.pages.contains_key(page)
    }

    /// Names of all cached pages, in no particular order.
    pub fn pages(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    /// Number of cached pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// True if no pages are cached.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Build one page's template set: functions, then base, partials, page.
fn compose(
    base: &str,
    partials: &[(String, String)],
    page: &str,
    source: String,
) -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    // .tmpl isn't an extension minijinja escapes by default
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    register_functions(&mut env);

    env.add_template_owned(BASE_TEMPLATE, base.to_string())?;
    for (name, partial) in partials {
        env.add_template_owned(format!("partials/{name}"), partial.clone())?;
    }
    env.add_template_owned(page.to_string(), source)?;

    // extends/include targets are only resolved at render time; check them now
    let names = std::iter::once(BASE_TEMPLATE.to_string())
        .chain(partials.iter().map(|(name, _)| format!("partials/{name}")))
        .chain(std::iter::once(page.to_string()));
    for name in names {
        let template = env.get_template(&name)?;
        check_references(&env, &name, template.source())?;
    }

    Ok(env)
}

/// Fail if `source` extends, includes or imports a template `env` doesn't hold.
fn check_references(
    env: &Environment<'static>,
    name: &str,
    source: &str,
) -> Result<(), minijinja::Error> {
    for target in referenced_templates(source) {
        if env.get_template(target).is_err() {
            return Err(minijinja::Error::new(
                ErrorKind::TemplateNotFound,
                format!("{name} references missing template {target:?}"),
            ));
        }
    }
    Ok(())
}

/// Names of templates pulled in by `extends`, `include`, `import` or `from` tags.
///
/// Only string literal targets are found. `include ... ignore missing` is skipped.
fn referenced_templates(source: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = source;

    while let Some(start) = rest.find("{%") {
        rest = &rest[start + 2..];
        let Some(end) = rest.find("%}") else {
            break;
        };
        let tag = rest[..end].trim_matches(|c: char| c == '-' || c == '+' || c.is_whitespace());
        rest = &rest[end + 2..];

        let Some((keyword, args)) = tag.split_once(char::is_whitespace) else {
            continue;
        };
        if !matches!(keyword, "extends" | "include" | "import" | "from")
            || args.contains("ignore missing")
        {
            continue;
        }
        if let Some(target) = string_literal(args.trim_start()) {
            names.push(target);
        }
    }

    names
}

/// The contents of a leading `"..."` or `'...'` literal.
fn string_literal(s: &str) -> Option<&str> {
    let quote = s.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let inner = &s[1..];
    inner.find(quote).map(|end| &inner[..end])
}

/// Function table available to every template.
fn register_functions(env: &mut Environment<'static>) {
    env.add_function("human_date", human_date);
}

/// Read every `*.tmpl` file in `dir` as `(file name, source)`, sorted by name.
fn read_templates(dir: &Path) -> Result<Vec<(String, String)>, TemplateError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| TemplateError::Io { path, source }
    };

    let mut templates = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err(dir))? {
        let path = entry.map_err(io_err(dir))?.path();
        if !path.is_file() || path.extension().is_none_or(|ext| ext != TEMPLATE_EXTENSION) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let source = std::fs::read_to_string(&path).map_err(io_err(&path))?;
        templates.push((name.to_string(), source));
    }

    templates.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(templates)
}

/// Format an RFC 3339 timestamp as e.g. `17 Oct 2026 at 09:30` (UTC).
///
/// An empty value renders as an empty string.
pub fn human_date(value: &str) -> Result<String, minijinja::Error> {
    if value.is_empty() {
        return Ok(String::new());
    }

    let ts = DateTime::parse_from_rfc3339(value).map_err(|e| {
        minijinja::Error::new(
            ErrorKind::InvalidOperation,
            format!("human_date: not a timestamp: {value:?}"),
        )
        .with_source(e)
    })?;

    Ok(ts
        .with_timezone(&Utc)
        .format("%d %b %Y at %H:%M")
        .to_string())
}
