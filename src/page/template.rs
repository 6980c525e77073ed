// src/page/template.rs
use minijinja::value::Value;
use minijinja::{escape_formatter, AutoEscape, Environment, Error, Output, State, UndefinedBehavior};
use serde::Serialize;

// The `.html` suffix turns on HTML auto-escaping.
const TEMPLATE_NAME: &str = "status.html";

pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>{{ title }}</title>
    <style>
        body { font-family: sans-serif; margin: 2rem auto; max-width: 48rem; color: #222; }
        .status-item { border-left: 6px solid #999; padding: 0.5rem 1rem; margin: 0.75rem 0; background: #f7f7f7; }
        .status-item.ok { border-color: #2e7d32; }
        .status-item.warning { border-color: #f9a825; }
        .status-item.fail { border-color: #c62828; }
        .status-item h3 { margin: 0 0 0.25rem; }
        .build-info, .checked-at { color: #666; font-size: 0.9rem; }
    </style>
</head>
<body>
    <h1>{{ title }}</h1>
    {%- if checks %}
    <div class="status-list">
        {%- for check in checks %}
        <div class="status-item {{ check.severity }}">
            <h3>{{ check.name }}</h3>
            <p>Importance: {{ check.importance }}</p>
            <p>Status: <strong>{{ check.status }}</strong></p>
            {%- if check.error %}
            <p>{% if check.severity == "warning" %}Warning{% else %}Error{% endif %}: {{ check.error }}</p>
            {%- endif %}
            <p>Duration: {{ check.duration }}</p>
        </div>
        {%- endfor %}
    </div>
    {%- endif %}
    {%- if version %}
    <div class="build-info">
        <p>Version: {{ version.version }}</p>
        <p>Revision: {{ version.revision }}</p>
        <p>Commit date: {{ version.commit_date }}</p>
    </div>
    {%- endif %}
    {%- if links %}
    <nav>
        <ul>
            {%- for link in links %}
            <li><a href="{{ link.url }}">{{ link.name }}</a></li>
            {%- endfor %}
        </ul>
    </nav>
    {%- endif %}
    <p class="checked-at">Checked at {{ checked_at }}</p>
</body>
</html>
"#;

/// Compiled status page template.
///
/// Undefined values are errors, so a template that refers to a field the
/// render model does not have fails at render time instead of printing
/// nothing.
#[derive(Debug)]
pub struct PageTemplate {
    env: Environment<'static>,
}

impl PageTemplate {
    pub fn new(source: Option<String>) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_formatter(html_formatter);
        match source {
            Some(source) => env.add_template_owned(TEMPLATE_NAME, source)?,
            None => env.add_template(TEMPLATE_NAME, DEFAULT_TEMPLATE)?,
        }
        Ok(Self { env })
    }

    /// Render the whole document into memory before anything is sent.
    pub fn render<S: Serialize>(&self, model: S) -> Result<String, minijinja::Error> {
        self.env.get_template(TEMPLATE_NAME)?.render(model)
    }
}

/// HTML escaping that leaves `/` alone, so link targets stay readable.
fn html_formatter(out: &mut Output, state: &State, value: &Value) -> Result<(), Error> {
    match value.as_str() {
        Some(text) if !value.is_safe() && matches!(state.auto_escape(), AutoEscape::Html) => {
            out.write_str(&escape_html(text))?;
            Ok(())
        }
        _ => escape_formatter(out, state, value),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
