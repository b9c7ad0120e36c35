//! Lifecycle of one embedded chart, modelled without a browser.
//!
//! An [`EmbedInstance`] starts out [`MountState::Initializing`], creates its runtime during the
//! first pass that gets as far as submitting an option, and then stays [`MountState::Mounted`]
//! until it is disposed. Each pass re-runs the author's definition against the current
//! [`Ambient`] values.

use crate::config::ChartConfig;
use crate::reconcile::apply_defaults;
use crate::{Error, Result};

/// Values the author's definition may read on every pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Ambient {
    pub width: f64,
    pub height: f64,
    pub dark_mode: bool,
}

/// Author logic producing the per-pass `config`.
pub trait ChartDefinition {
    fn evaluate(&self, ambient: &Ambient) -> Result<ChartConfig>;
}

impl<F> ChartDefinition for F
where
    F: Fn(&Ambient) -> Result<ChartConfig>,
{
    fn evaluate(&self, ambient: &Ambient) -> Result<ChartConfig> {
        self(ambient)
    }
}

/// A live chart created by [`Host::init_runtime`].
pub trait ChartRuntime {
    fn set_option(&mut self, option: &ChartConfig) -> Result<()>;

    fn resize(&mut self) {}

    fn dispose(&mut self) {}
}

/// The document side of an embed: container element, figure wrapper and runtime factory.
pub trait Host {
    type Runtime: ChartRuntime;

    fn ambient(&self) -> Ambient;

    /// Whether the figure is still attached to the document.
    fn is_connected(&self) -> bool {
        true
    }

    /// Creates the runtime; `renderer` is fixed for the runtime's lifetime.
    fn init_runtime(&mut self, renderer: Option<&str>) -> Result<Self::Runtime>;

    fn has_class(&self, class: &str) -> bool;

    fn add_class(&mut self, class: &str);

    fn remove_class(&mut self, class: &str);

    /// Sets the figure caption, creating the caption element on first use.
    fn set_caption(&mut self, caption: &str);
}

#[derive(Debug)]
pub enum MountState<R> {
    Initializing,
    Mounted(R),
    Disposed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Resize,
    ThemeChange,
}

pub struct EmbedInstance<H: Host, D> {
    host: H,
    definition: D,
    defaults: ChartConfig,
    state: MountState<H::Runtime>,
    // Series classes this instance added to the container.
    tagged: Vec<String>,
    last_applied: Option<ChartConfig>,
}

impl<H: Host, D: ChartDefinition> EmbedInstance<H, D> {
    /// Creates the instance and runs the initial pass.
    ///
    /// A failing first pass leaves the instance initializing; the next trigger tries again.
    pub fn mount(host: H, definition: D, defaults: ChartConfig) -> Self {
        let mut instance = Self {
            host,
            definition,
            defaults,
            state: MountState::Initializing,
            tagged: Vec::new(),
            last_applied: None,
        };
        instance.pass();
        instance
    }

    pub fn state(&self) -> &MountState<H::Runtime> {
        &self.state
    }

    pub fn defaults(&self) -> &ChartConfig {
        &self.defaults
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn runtime(&self) -> Option<&H::Runtime> {
        match &self.state {
            MountState::Mounted(runtime) => Some(runtime),
            _ => None,
        }
    }

    /// The option most recently accepted by the runtime.
    pub fn last_applied(&self) -> Option<&ChartConfig> {
        self.last_applied.as_ref()
    }

    /// One reconciliation pass. Errors leave the previously applied state in place.
    pub fn reconcile(&mut self) -> Result<&ChartConfig> {
        if matches!(self.state, MountState::Disposed) {
            return Err(Error::Disposed);
        }

        let ambient = self.host.ambient();
        let config = self.definition.evaluate(&ambient)?;
        if !config.is_object() {
            return Err(Error::InvalidConfig {
                message: format!("expected an object, got {}", config.as_value()),
            });
        }
        let merged = apply_defaults(&config, &self.defaults, ambient.dark_mode);

        self.tag_series(&merged);
        if let Some(caption) = merged.figcaption() {
            self.host.set_caption(&caption);
        }

        if matches!(self.state, MountState::Initializing) {
            let runtime = self.host.init_runtime(merged.renderer())?;
            self.state = MountState::Mounted(runtime);
        }
        if let MountState::Mounted(runtime) = &mut self.state {
            runtime.set_option(&merged)?;
        }

        let applied = self.last_applied.insert(merged);
        Ok(&*applied)
    }

    /// Runs [`EmbedInstance::reconcile`], logging and swallowing failures.
    pub fn pass(&mut self) -> bool {
        match self.reconcile() {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(target: "selkie", error = %err, "chart reconciliation failed");
                false
            }
        }
    }

    /// Handles a resize or theme-change notification.
    ///
    /// Returns `false` when the pass failed or the instance is (or just became) disposed.
    pub fn on_trigger(&mut self, trigger: Trigger) -> bool {
        if matches!(self.state, MountState::Disposed) {
            return false;
        }
        if !self.host.is_connected() {
            self.dispose();
            return false;
        }
        if trigger == Trigger::Resize {
            if let MountState::Mounted(runtime) = &mut self.state {
                runtime.resize();
            }
        }
        self.pass()
    }

    pub fn dispose(&mut self) {
        if let MountState::Mounted(runtime) = &mut self.state {
            runtime.dispose();
        }
        self.state = MountState::Disposed;
    }

    fn tag_series(&mut self, merged: &ChartConfig) {
        let types = merged.series_types();
        for ty in &types {
            if !self.host.has_class(ty) {
                self.host.add_class(ty);
                self.tagged.push((*ty).to_string());
            }
        }
        let host = &mut self.host;
        self.tagged.retain(|class| {
            let keep = types.contains(&class.as_str());
            if !keep {
                host.remove_class(class);
            }
            keep
        });
    }
}
