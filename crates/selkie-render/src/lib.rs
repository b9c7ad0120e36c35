#![forbid(unsafe_code)]

//! Turns ```` ```echarts ```` fences into self-contained chart embeds.
//!
//! Each embed is a `<figure>` holding the chart container, a script tag for the ECharts runtime
//! and an inline module script. The inline script re-runs the author's snippet on every paint and
//! reconciles its `config` with the site defaults (see `selkie_core::reconcile` for the same
//! algorithm in Rust).
//!
//! ```no_run
//! use selkie_render::{Options, markdown::{Pipeline, register}};
//! use serde_json::json;
//!
//! let mut pipeline = Pipeline::new();
//! register(
//!     &mut pipeline,
//!     Options::default().with_defaults(json!({ "font": { "fontFamily": "system-ui" } }).into()),
//! )?;
//! let html = pipeline.render("```echarts\nconst config = { series: [] };\n```\n")?;
//! # Ok::<(), selkie_render::Error>(())
//! ```

pub(crate) const LOG_TARGET: &str = "selkie";

/// Logs at `info` when the settings ask for verbose output, at `debug` otherwise.
macro_rules! verbose_log {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!(target: $crate::LOG_TARGET, $($arg)+);
        } else {
            tracing::debug!(target: $crate::LOG_TARGET, $($arg)+);
        }
    };
}
pub(crate) use verbose_log;

pub mod embed;
pub mod ids;
pub mod markdown;
pub mod settings;
pub mod template;

pub use embed::{EmbedGenerator, fallback_markup, generate, normalize_markup};
pub use ids::{IdSource, RandomIds, SequentialIds};
pub use markdown::{
    BoxedFenceRenderer, CodeFence, EchartsFence, Fence, FenceRenderer, Pipeline, install, register,
    render_markdown,
};
pub use settings::{DEFAULT_CHART_LIBRARY_URL, Options, Settings};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("chart definition contains `</script`, which would close the embedding script")]
    ScriptBreakout,

    #[error("embed template error: {message}")]
    Template { message: String },

    #[error("invalid chart library URL {url:?}: {message}")]
    InvalidLibraryUrl { url: String, message: String },

    #[error("invalid defaults: {message}")]
    InvalidDefaults { message: String },

    #[error("options JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("options YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failure rendering chart: {source}")]
    Generation {
        definition: String,
        #[source]
        source: Box<Error>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
