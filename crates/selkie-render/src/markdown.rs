//! A small Markdown pipeline with an overridable fenced-code-block rule.
//!
//! [`register`] installs the ECharts fence on a [`Pipeline`]. It wraps whatever fence renderer was
//! installed before, so other fence-language handlers keep working:
//!
//! ```no_run
//! use selkie_render::markdown::{Pipeline, register};
//! use selkie_render::Options;
//!
//! let mut pipeline = Pipeline::new();
//! register(&mut pipeline, Options::default())?;
//! let html = pipeline.render("# Sales\n\n```echarts\nconst config = { series: [] };\n```\n")?;
//! # Ok::<(), selkie_render::Error>(())
//! ```

use crate::embed::EmbedGenerator;
use crate::settings::{Options, Settings};
use crate::{Result, verbose_log};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Parser, Tag, TagEnd};
use std::sync::Arc;

/// Fence info string routed to the embed generator (compared case-insensitively).
pub const ECHARTS_LANGUAGE: &str = "echarts";

/// A fenced code block as seen by a [`FenceRenderer`].
#[derive(Debug, Clone, Copy)]
pub struct Fence<'a> {
    /// Full info string after the opening fence.
    pub info: &'a str,
    /// Raw block content, including the trailing newline.
    pub content: &'a str,
}

impl Fence<'_> {
    /// First word of the info string.
    pub fn language(&self) -> &str {
        self.info.split_whitespace().next().unwrap_or("")
    }
}

/// Renders fenced code blocks to HTML.
pub trait FenceRenderer: Send + Sync {
    fn render(&self, fence: &Fence<'_>) -> Result<String>;
}

pub type BoxedFenceRenderer = Arc<dyn FenceRenderer>;

/// Default rendering: `<pre><code class="language-…">` with escaped content.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeFence;

impl FenceRenderer for CodeFence {
    fn render(&self, fence: &Fence<'_>) -> Result<String> {
        let language = fence.language();
        let class_attr = if language.is_empty() {
            String::new()
        } else {
            format!(
                " class=\"language-{}\"",
                htmlize::escape_attribute(language)
            )
        };
        Ok(format!(
            "<pre><code{}>{}</code></pre>\n",
            class_attr,
            htmlize::escape_text(fence.content)
        ))
    }
}

/// Routes `echarts` fences to the embed generator and everything else to `next`.
pub struct EchartsFence {
    generator: EmbedGenerator,
    next: BoxedFenceRenderer,
}

impl EchartsFence {
    pub fn new(generator: EmbedGenerator, next: BoxedFenceRenderer) -> Self {
        Self { generator, next }
    }

    pub fn generator(&self) -> &EmbedGenerator {
        &self.generator
    }

    pub fn handles(fence: &Fence<'_>) -> bool {
        fence.info.trim().eq_ignore_ascii_case(ECHARTS_LANGUAGE)
    }
}

impl FenceRenderer for EchartsFence {
    fn render(&self, fence: &Fence<'_>) -> Result<String> {
        if Self::handles(fence) {
            return self.generator.generate(fence.content.trim());
        }
        self.next.render(fence)
    }
}

pub struct Pipeline {
    options: pulldown_cmark::Options,
    fence: BoxedFenceRenderer,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            options: pulldown_cmark::Options::ENABLE_TABLES
                | pulldown_cmark::Options::ENABLE_FOOTNOTES
                | pulldown_cmark::Options::ENABLE_STRIKETHROUGH
                | pulldown_cmark::Options::ENABLE_TASKLISTS,
            fence: Arc::new(CodeFence),
        }
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parser_options(mut self, options: pulldown_cmark::Options) -> Self {
        self.options = options;
        self
    }

    /// The fence renderer currently installed.
    pub fn fence_renderer(&self) -> BoxedFenceRenderer {
        Arc::clone(&self.fence)
    }

    pub fn set_fence_renderer(&mut self, renderer: impl FenceRenderer + 'static) {
        self.fence = Arc::new(renderer);
    }

    /// Renders `markdown` to HTML, sending every fenced code block through the fence renderer.
    /// Indented code blocks keep the default rendering.
    pub fn render(&self, markdown: &str) -> Result<String> {
        let parser = Parser::new_ext(markdown, self.options);

        let mut events: Vec<Event<'_>> = Vec::new();
        let mut open_fence: Option<(CowStr<'_>, String)> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                    open_fence = Some((info, String::new()));
                }
                Event::Text(text) if open_fence.is_some() => {
                    if let Some((_, content)) = open_fence.as_mut() {
                        content.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) if open_fence.is_some() => {
                    if let Some((info, content)) = open_fence.take() {
                        let rendered = self.fence.render(&Fence {
                            info: &info,
                            content: &content,
                        })?;
                        events.push(Event::Html(rendered.into()));
                    }
                }
                other => events.push(other),
            }
        }

        let mut html = String::with_capacity(markdown.len() * 3 / 2);
        pulldown_cmark::html::push_html(&mut html, events.into_iter());
        Ok(html)
    }
}

/// Installs the ECharts fence on `pipeline`.
///
/// Settings are resolved from `options` once; the previously installed fence renderer handles
/// every other fence language.
pub fn register(pipeline: &mut Pipeline, options: Options) -> Result<()> {
    let settings = Settings::from_options(options)?;
    let dump = settings.to_pretty_json()?;
    verbose_log!(settings.verbose, settings = %dump, "registered echarts fence");
    install(pipeline, EmbedGenerator::new(Arc::new(settings)));
    Ok(())
}

/// Installs an already configured generator (e.g. with a deterministic id source).
pub fn install(pipeline: &mut Pipeline, generator: EmbedGenerator) {
    let next = pipeline.fence_renderer();
    pipeline.set_fence_renderer(EchartsFence::new(generator, next));
}

/// Renders one document with a freshly registered pipeline.
pub fn render_markdown(markdown: &str, options: Options) -> Result<String> {
    let mut pipeline = Pipeline::new();
    register(&mut pipeline, options)?;
    pipeline.render(markdown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_is_first_word_of_info() {
        let fence = Fence {
            info: "rust ignore",
            content: "",
        };
        assert_eq!(fence.language(), "rust");
    }

    #[test]
    fn code_fence_escapes_content() {
        let html = CodeFence
            .render(&Fence {
                info: "html",
                content: "<div>&</div>\n",
            })
            .unwrap();
        assert_eq!(
            html,
            "<pre><code class=\"language-html\">&lt;div&gt;&amp;&lt;/div&gt;\n</code></pre>\n"
        );
    }

    #[test]
    fn echarts_match_is_case_insensitive_and_exact() {
        let matches = |info: &str| EchartsFence::handles(&Fence { info, content: "" });
        assert!(matches("echarts"));
        assert!(matches("ECharts"));
        assert!(matches("  echarts "));
        assert!(!matches("echarts-gl"));
        assert!(!matches("python"));
        assert!(!matches(""));
    }
}
