pub mod api_call;
pub mod branches;
pub mod description;
pub mod dividers;
pub mod fields;
pub mod imports;
pub mod node;
pub mod package_json;

use minijinja::{AutoEscape, Environment, ErrorKind};
use nodegen_core::GeneratorError;

use crate::helper::quote;

/// Render one of the bundled templates.
pub(crate) fn render(
    name: &str,
    source: &str,
    ctx: minijinja::Value,
) -> Result<String, GeneratorError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.add_filter("ts_string", ts_string);
    env.add_filter("json_string", json_string);
    env.add_template(name, source).map_err(template_error)?;
    let tmpl = env.get_template(name).map_err(template_error)?;
    tmpl.render(ctx).map_err(template_error)
}

/// A single-quoted TypeScript string literal.
fn ts_string(value: String) -> String {
    quote(&value)
}

/// A double-quoted JSON string literal.
fn json_string(value: String) -> Result<String, minijinja::Error> {
    serde_json::to_string(&value)
        .map_err(|e| minijinja::Error::new(ErrorKind::InvalidOperation, e.to_string()))
}

fn template_error(err: minijinja::Error) -> GeneratorError {
    GeneratorError::Template(err.to_string())
}

/// Tab-indented TypeScript lines.
#[derive(Debug, Default)]
pub struct Lines {
    lines: Vec<String>,
    depth: usize,
}

impl Lines {
    pub fn new(depth: usize) -> Self {
        Self {
            lines: Vec::new(),
            depth,
        }
    }

    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines.push(format!("{}{text}", "\t".repeat(self.depth)));
        }
    }

    /// Push a line and indent what follows.
    pub fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.depth += 1;
    }

    /// Dedent and push a closing line.
    pub fn close(&mut self, text: impl AsRef<str>) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }

    /// Dedent for one line, as in `} else {`.
    pub fn reopen(&mut self, text: impl AsRef<str>) {
        self.close(text);
        self.depth += 1;
    }

    /// Push pre-rendered text, indenting every line to the current depth.
    pub fn block(&mut self, text: &str) {
        for line in text.lines() {
            self.line(line);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn finish(self) -> String {
        self.lines.join("\n")
    }
}
