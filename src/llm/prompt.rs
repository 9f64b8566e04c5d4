//! Prompt templates with `{{name}}` placeholders.
//!
//! A [`PromptTemplate`] keeps the raw text and fills the placeholders at render time:
//!
//! ```ignore
//! let template = PromptTemplate::new("Explique le concept suivant : {{topic}}");
//! let prompt = template.render_one("topic", "les lifetimes")?;
//! assert_eq!(prompt, "Explique le concept suivant : les lifetimes");
//! ```
//!
//! Whitespace inside the braces is ignored, so `{{ topic }}` and `{{topic}}` are the same
//! placeholder. An opening `{{` without a matching `}}` is left in the output as-is.

use crate::error::{ProjkilmatError, Result};
use std::collections::HashMap;

/// A piece of parsed template text.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Variable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl PromptTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let segments = parse_segments(&source);
        Self { source, segments }
    }

    /// Distinct placeholder names, in order of first appearance.
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Variable(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Fill every placeholder from `values`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjkilmatError::PromptError`] naming the first placeholder that has no
    /// value. Values for names the template does not use are ignored.
    pub fn render(&self, values: &HashMap<&str, &str>) -> Result<String> {
        let mut out = String::with_capacity(self.source.len());

        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Variable(name) => {
                    let value = values.get(name.as_str()).ok_or_else(|| {
                        ProjkilmatError::PromptError(format!(
                            "no value provided for template variable '{}'",
                            name
                        ))
                    })?;
                    out.push_str(value);
                }
            }
        }

        Ok(out)
    }

    /// Render a template that uses a single variable.
    pub fn render_one(&self, name: &str, value: &str) -> Result<String> {
        let mut values = HashMap::new();
        values.insert(name, value);
        self.render(&values)
    }
}

fn parse_segments(source: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut rest = source;

    while let Some(start) = rest.find("{{") {
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            break;
        };

        let name = after_open[..end].trim();
        if name.is_empty() {
            // `{{}}` is not a placeholder; keep it verbatim
            text.push_str(&rest[..start + 2 + end + 2]);
        } else {
            text.push_str(&rest[..start]);
            if !text.is_empty() {
                segments.push(Segment::Text(std::mem::take(&mut text)));
            }
            segments.push(Segment::Variable(name.to_string()));
        }
        rest = &after_open[end + 2..];
    }

    text.push_str(rest);
    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }

    segments
}
