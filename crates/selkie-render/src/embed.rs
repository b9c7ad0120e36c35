//! The embed generator: chart snippet in, `<figure>` markup out.

use crate::ids::{IdSource, RandomIds};
use crate::settings::Settings;
use crate::template::{SlotValues, embed_template};
use crate::{Error, LOG_TARGET, Result, verbose_log};
use regex::Regex;
use std::sync::{Arc, OnceLock};

/// Generates embeds for one registration.
///
/// Holds the settings snapshot taken at registration and the id source; both are shared, so a
/// generator can be cloned into as many fence renderers as needed.
#[derive(Clone)]
pub struct EmbedGenerator {
    settings: Arc<Settings>,
    ids: Arc<dyn IdSource>,
}

impl std::fmt::Debug for EmbedGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbedGenerator")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl EmbedGenerator {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self {
            settings,
            ids: Arc::new(RandomIds),
        }
    }

    pub fn with_id_source(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Builds the embed markup, returning any failure as-is.
    pub fn prepare(&self, chart_definition: &str) -> Result<String> {
        let container_id = self.ids.next_id();
        let figure_id = self.ids.next_id();
        verbose_log!(
            self.settings.verbose,
            figure_id = %figure_id,
            container_id = %container_id,
            "transforming chart"
        );

        let markup = embed_template().render(&SlotValues {
            figure_id: &figure_id,
            container_id: &container_id,
            library_url: &self.settings.chart_library_url,
            defaults: self.settings.defaults.as_value(),
            chart_definition,
        })?;
        Ok(normalize_markup(&markup))
    }

    /// Builds the embed markup, applying the configured failure policy.
    ///
    /// With `throw_on_failure` the error is logged and returned; otherwise it is logged and the
    /// snippet comes back as escaped preformatted text so the document keeps its content.
    pub fn generate(&self, chart_definition: &str) -> Result<String> {
        match self.prepare(chart_definition) {
            Ok(markup) => Ok(markup),
            Err(err) if self.settings.throw_on_failure => {
                tracing::error!(
                    target: LOG_TARGET,
                    definition = %chart_definition,
                    error = %err,
                    "failure rendering chart"
                );
                Err(Error::Generation {
                    definition: chart_definition.to_string(),
                    source: Box::new(err),
                })
            }
            Err(err) => {
                tracing::error!(
                    target: LOG_TARGET,
                    definition = %chart_definition,
                    error = %err,
                    "failure rendering chart; falling back to preformatted text"
                );
                Ok(fallback_markup(chart_definition))
            }
        }
    }
}

/// One-shot generation with random ids.
pub fn generate(chart_definition: &str, settings: &Settings) -> Result<String> {
    EmbedGenerator::new(Arc::new(settings.clone())).generate(chart_definition)
}

pub fn fallback_markup(chart_definition: &str) -> String {
    normalize_markup(&format!(
        "<pre>{}</pre>",
        htmlize::escape_text(chart_definition)
    ))
}

fn blank_lines_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n\s*\n").expect("valid regex"))
}

/// Drops carriage returns and collapses blank-line runs to a single newline.
pub fn normalize_markup(markup: &str) -> String {
    let without_cr = markup.replace('\r', "");
    blank_lines_regex()
        .replace_all(&without_cr, "\n")
        .into_owned()
}
