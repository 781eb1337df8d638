//! Result rendering
//!
//! jsonl and json are the machine formats. md is a report for humans with a
//! per-file summary table and one row per anchor. raw prints reference names,
//! followed by the target URL when there is one.

use serde_json::Value;

use crate::core::model::{Kind, ResultItem, ResultSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
    Raw,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jsonl" => Ok(Self::Jsonl),
            "json" => Ok(Self::Json),
            "md" | "markdown" => Ok(Self::Markdown),
            "raw" => Ok(Self::Raw),
            other => Err(format!("Unknown format: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn render(&self, result_set: &ResultSet) -> String {
        let items = &result_set.items;
        match self.config.format {
            OutputFormat::Jsonl => self.jsonl(items),
            OutputFormat::Json => self.json(items),
            OutputFormat::Markdown => markdown(items),
            OutputFormat::Raw => raw(items),
        }
    }

    fn to_json<T: serde::Serialize + ?Sized>(&self, value: &T) -> Option<String> {
        if self.config.pretty {
            serde_json::to_string_pretty(value).ok()
        } else {
            serde_json::to_string(value).ok()
        }
    }

    fn jsonl(&self, items: &[ResultItem]) -> String {
        let separator = if self.config.pretty { "\n\n" } else { "\n" };
        items
            .iter()
            .filter_map(|item| self.to_json(item))
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn json(&self, items: &[ResultItem]) -> String {
        self.to_json(items).unwrap_or_else(|| "[]".to_string())
    }
}

fn markdown(items: &[ResultItem]) -> String {
    let mut out = String::new();

    let errors: Vec<_> = items.iter().filter(|i| i.kind == Kind::Error).collect();
    if !errors.is_empty() {
        out.push_str("## Errors\n\n");
        for item in errors {
            for error in &item.errors {
                out.push_str(&format!("- **{}**: {}\n", error.code, error.message));
            }
        }
        out.push('\n');
    }

    let files: Vec<_> = items.iter().filter(|i| i.kind == Kind::File).collect();
    if !files.is_empty() {
        out.push_str("## Files\n\n");
        out.push_str("| File | Status | Resolved | Unresolved | Skipped |\n");
        out.push_str("|------|--------|----------|------------|---------|\n");
        for item in files {
            out.push_str(&format!(
                "| `{}` | {} | {} | {} | {} |\n",
                item.path.as_deref().unwrap_or_default(),
                status_label(item),
                count(item, "resolved"),
                count(item, "unresolved"),
                count(item, "skipped"),
            ));
        }
        out.push('\n');
    }

    let anchors: Vec<_> = items.iter().filter(|i| i.kind == Kind::Anchor).collect();
    if !anchors.is_empty() {
        out.push_str("## Anchors\n\n");
        out.push_str("| Location | Name | Status | Target |\n");
        out.push_str("|----------|------|--------|--------|\n");
        for item in anchors {
            let line = item.range.map(|r| r.start).unwrap_or_default();
            out.push_str(&format!(
                "| `{}:{}` | {} | {} | {} |\n",
                item.path.as_deref().unwrap_or_default(),
                line,
                item.excerpt.as_deref().map(code_span).unwrap_or_default(),
                status_label(item),
                target_cell(item),
            ));
        }
    }

    out
}

fn raw(items: &[ResultItem]) -> String {
    items
        .iter()
        .filter_map(|item| {
            let name = item.excerpt.as_deref()?;
            Some(match data_str(item, "url") {
                Some(url) => format!("{}\t{}", name, url),
                None => name.to_string(),
            })
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Inline code for a table cell.
///
/// The fence is one backtick longer than the longest run inside `text`, and
/// padded with spaces when `text` starts or ends with a backtick. Pipes are
/// escaped so they do not split the cell.
fn code_span(text: &str) -> String {
    let longest_run = text
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run + 1);
    let pad = if text.starts_with('`') || text.ends_with('`') {
        " "
    } else {
        ""
    };
    format!(
        "{fence}{pad}{}{pad}{fence}",
        text.replace('|', "\\|")
    )
}

/// URL for resolved anchors, the skip reason otherwise
fn target_cell(item: &ResultItem) -> String {
    if let Some(url) = data_str(item, "url") {
        format!("`{}`", url)
    } else {
        data_str(item, "reason").unwrap_or_default().to_string()
    }
}

fn data_str<'a>(item: &'a ResultItem, key: &str) -> Option<&'a str> {
    item.data.as_ref()?.get(key)?.as_str()
}

fn count(item: &ResultItem, key: &str) -> u64 {
    item.data
        .as_ref()
        .and_then(|d| d.get(key))
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

fn status_label(item: &ResultItem) -> String {
    serde_json::to_value(item.status)
        .ok()
        .and_then(|v| v.as_str().map(String::from))
        .unwrap_or_default()
}
