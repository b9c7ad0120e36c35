#![forbid(unsafe_code)]

//! `selkie` renders ```` ```echarts ```` fences in Markdown as self-contained chart embeds.
//!
//! The headless option model and reconciliation live in `selkie-core` and are re-exported at the
//! crate root.
//!
//! # Features
//!
//! - `render` (default): Markdown pipeline and embed generation (`selkie::render`)

pub use selkie_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use selkie_render::ids::{IdSource, RandomIds, SequentialIds};
    pub use selkie_render::markdown::{
        BoxedFenceRenderer, CodeFence, EchartsFence, Fence, FenceRenderer, Pipeline, install,
        register,
    };
    pub use selkie_render::{
        DEFAULT_CHART_LIBRARY_URL, EmbedGenerator, Options, Settings, fallback_markup,
        normalize_markup,
    };

    #[derive(Debug, thiserror::Error)]
    pub enum RenderError {
        #[error(transparent)]
        Render(#[from] selkie_render::Error),
    }

    pub type Result<T> = std::result::Result<T, RenderError>;

    /// Renders one Markdown document with the ECharts fence registered.
    pub fn render_markdown(markdown: &str, options: Options) -> Result<String> {
        Ok(selkie_render::render_markdown(markdown, options)?)
    }

    /// Generates the embed for a single chart snippet.
    pub fn render_chart(chart_definition: &str, settings: &Settings) -> Result<String> {
        Ok(selkie_render::generate(chart_definition, settings)?)
    }

    /// A registered pipeline bundled with its settings, for callers that render many documents.
    #[derive(Clone)]
    pub struct MarkdownRenderer {
        pipeline: std::sync::Arc<Pipeline>,
        settings: std::sync::Arc<Settings>,
    }

    impl MarkdownRenderer {
        pub fn new(options: Options) -> Result<Self> {
            let settings = std::sync::Arc::new(Settings::from_options(options)?);
            Ok(Self::with_generator(EmbedGenerator::new(settings)))
        }

        /// Builds a renderer around an existing generator (e.g. one with deterministic ids).
        pub fn with_generator(generator: EmbedGenerator) -> Self {
            let settings = std::sync::Arc::new(generator.settings().clone());
            let mut pipeline = Pipeline::new();
            install(&mut pipeline, generator);
            Self {
                pipeline: std::sync::Arc::new(pipeline),
                settings,
            }
        }

        pub fn settings(&self) -> &Settings {
            &self.settings
        }

        pub fn render(&self, markdown: &str) -> Result<String> {
            Ok(self.pipeline.render(markdown)?)
        }
    }

    impl Default for MarkdownRenderer {
        fn default() -> Self {
            Self::with_generator(EmbedGenerator::new(std::sync::Arc::new(Settings::default())))
        }
    }
}
