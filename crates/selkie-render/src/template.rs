//! Slot-based template for the embed markup.
//!
//! A template is literal text with `{{slot}}` markers. Slots are a closed set and each one
//! carries its own escaping, so values can only land in the context they were written for.

use crate::{Error, Result};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

const EMBED_HTML: &str = include_str!("../assets/embed.html");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Element id, used in attributes and JS string literals.
    FigureId,
    ContainerId,
    /// Script `src`; HTML-attribute escaped.
    LibraryUrl,
    /// JSON snapshot of the site defaults, escaped for an inline script.
    Defaults,
    /// Author-supplied JavaScript, inserted verbatim.
    ChartDefinition,
}

impl Slot {
    pub fn name(self) -> &'static str {
        match self {
            Slot::FigureId => "figure_id",
            Slot::ContainerId => "container_id",
            Slot::LibraryUrl => "library_url",
            Slot::Defaults => "defaults",
            Slot::ChartDefinition => "chart_definition",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "figure_id" => Slot::FigureId,
            "container_id" => Slot::ContainerId,
            "library_url" => Slot::LibraryUrl,
            "defaults" => Slot::Defaults,
            "chart_definition" => Slot::ChartDefinition,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(Slot),
}

/// Values for one render of a [`Template`].
#[derive(Debug, Clone, Copy)]
pub struct SlotValues<'a> {
    pub figure_id: &'a str,
    pub container_id: &'a str,
    pub library_url: &'a str,
    pub defaults: &'a Value,
    pub chart_definition: &'a str,
}

#[derive(Debug, Clone)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut rest = source;
        while let Some(open) = rest.find("{{") {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let after_open = &rest[open + 2..];
            let Some(close) = after_open.find("}}") else {
                return Err(Error::Template {
                    message: "unterminated `{{` in template".to_string(),
                });
            };
            let name = after_open[..close].trim();
            let slot = Slot::from_name(name).ok_or_else(|| Error::Template {
                message: format!("unknown template slot `{name}`"),
            })?;
            segments.push(Segment::Slot(slot));
            rest = &after_open[close + 2..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }
        Ok(Self { segments })
    }

    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Slot(slot) => Some(*slot),
            Segment::Literal(_) => None,
        })
    }

    pub fn render(&self, values: &SlotValues<'_>) -> Result<String> {
        let defaults = script_json(values.defaults)?;
        let figure_id = checked_element_id(values.figure_id)?;
        let container_id = checked_element_id(values.container_id)?;
        let chart_definition = checked_chart_definition(values.chart_definition)?;
        let library_url = htmlize::escape_attribute(values.library_url);

        let mut out = String::with_capacity(
            self.segments
                .iter()
                .map(|s| match s {
                    Segment::Literal(text) => text.len(),
                    Segment::Slot(_) => 0,
                })
                .sum::<usize>()
                + defaults.len()
                + chart_definition.len()
                + 128,
        );
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(Slot::FigureId) => out.push_str(figure_id),
                Segment::Slot(Slot::ContainerId) => out.push_str(container_id),
                Segment::Slot(Slot::LibraryUrl) => out.push_str(&library_url),
                Segment::Slot(Slot::Defaults) => out.push_str(&defaults),
                Segment::Slot(Slot::ChartDefinition) => out.push_str(chart_definition),
            }
        }
        Ok(out)
    }
}

/// The built-in `<figure>` embed, parsed once.
pub fn embed_template() -> &'static Template {
    static TEMPLATE: OnceLock<Template> = OnceLock::new();
    TEMPLATE.get_or_init(|| Template::parse(EMBED_HTML).expect("valid embed template"))
}

fn element_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("valid regex"))
}

fn script_close_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)</script").expect("valid regex"))
}

fn checked_element_id(id: &str) -> Result<&str> {
    if element_id_regex().is_match(id) {
        Ok(id)
    } else {
        Err(Error::Template {
            message: format!("invalid element id {id:?}"),
        })
    }
}

/// The author's snippet is trusted code; the only thing it may not do is end the script element.
fn checked_chart_definition(definition: &str) -> Result<&str> {
    if script_close_regex().is_match(definition) {
        return Err(Error::ScriptBreakout);
    }
    Ok(definition)
}

/// Serializes `value` as JSON that is also safe inside `<script>`: `<`, `>`, `&` and the JS line
/// terminators U+2028/U+2029 are written as `\u` escapes, which JSON and JS both decode back.
pub fn script_json(value: &Value) -> Result<String> {
    let json = serde_json::to_string(value)?;
    let mut out = String::with_capacity(json.len());
    for ch in json.chars() {
        match ch {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(ch),
        }
    }
    Ok(out)
}
