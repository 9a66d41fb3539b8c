//! Lint context and host triggers.
//!
//! A [`LintContext`] owns everything the linter keeps between passes: the
//! configuration, separator styles, the diagnostics collection, and the
//! decorations applied to each document. Hosts drive it by dispatching
//! [`TriggerEvent`]s; each trigger runs the handlers registered for it.
//!
//! ```text
//!   host event ──► dispatch() ──► handlers for the trigger ──► LintState
//!                                                               ├─ diagnostics
//!                                                               └─ decorations
//! ```
//!
//! State exists only between [`LintContext::initialize`] and
//! [`LintContext::dispose`]; dispatching outside that window fails with
//! [`LintError::NotInitialized`].

use std::collections::HashMap;
use std::fmt;

use crate::config::RetConfig;
use crate::decorations::{DecorationSet, DecorationStyles};
use crate::diagnostics::{DiagnosticCollection, get_diagnostics};
use crate::document::Document;
use crate::error::{LintError, Result};
use crate::types::Diagnostic;

/// Host events the linter reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    InitialLoad,
    ActiveEditorChanged,
    DocumentChanged,
    ConfigurationChanged,
    DocumentClosed,
}

/// A trigger together with its payload.
#[derive(Debug, Clone)]
pub enum TriggerEvent<'a> {
    /// The host finished starting up; `active` is the focused document, if any.
    InitialLoad { active: Option<&'a Document> },
    ActiveEditorChanged(&'a Document),
    DocumentChanged(&'a Document),
    ConfigurationChanged {
        config: RetConfig,
        visible: Vec<&'a Document>,
    },
    DocumentClosed { uri: &'a str },
}

impl TriggerEvent<'_> {
    pub fn trigger(&self) -> Trigger {
        match self {
            TriggerEvent::InitialLoad { .. } => Trigger::InitialLoad,
            TriggerEvent::ActiveEditorChanged(_) => Trigger::ActiveEditorChanged,
            TriggerEvent::DocumentChanged(_) => Trigger::DocumentChanged,
            TriggerEvent::ConfigurationChanged { .. } => Trigger::ConfigurationChanged,
            TriggerEvent::DocumentClosed { .. } => Trigger::DocumentClosed,
        }
    }

    /// The single document this event is about, if any.
    pub fn document(&self) -> Option<&Document> {
        match self {
            TriggerEvent::InitialLoad { active } => *active,
            TriggerEvent::ActiveEditorChanged(doc) | TriggerEvent::DocumentChanged(doc) => {
                Some(*doc)
            }
            _ => None,
        }
    }
}

/// A function run when its trigger is dispatched.
pub type TriggerHandler = fn(&mut LintState, &TriggerEvent<'_>);

/// State owned by an initialized context.
pub struct LintState {
    config: RetConfig,
    styles: DecorationStyles,
    diagnostics: DiagnosticCollection,
    decorations: HashMap<String, DecorationSet>,
    handlers: Vec<(Trigger, TriggerHandler)>,
}

impl LintState {
    fn new(config: RetConfig) -> Self {
        Self {
            styles: DecorationStyles::from_config(&config),
            config,
            diagnostics: DiagnosticCollection::new(),
            decorations: HashMap::new(),
            handlers: Vec::new(),
        }
    }

    pub fn config(&self) -> &RetConfig {
        &self.config
    }

    pub fn styles(&self) -> &DecorationStyles {
        &self.styles
    }

    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    pub fn decorations(&self, uri: &str) -> Option<&DecorationSet> {
        self.decorations.get(uri)
    }

    /// Replace the diagnostics for `doc` with a fresh analysis.
    pub fn update_diagnostics(&mut self, doc: &Document) {
        if doc.is_ret() {
            self.diagnostics.set(doc.uri(), get_diagnostics(doc));
        } else {
            self.diagnostics.delete(doc.uri());
        }
    }

    /// Recompute the separator decorations for `doc`.
    pub fn apply_decorations(&mut self, doc: &Document) {
        if doc.is_ret() {
            let set = DecorationSet::for_document(doc, &self.styles);
            self.decorations.insert(doc.uri().to_string(), set);
        } else {
            self.decorations.remove(doc.uri());
        }
    }

    /// Adopt `config`. Returns true when the separator styles changed.
    pub fn update_config(&mut self, config: RetConfig) -> bool {
        let restyle = self.config.affects_separators(&config);
        if restyle {
            self.styles = DecorationStyles::from_config(&config);
        }
        self.config = config;
        restyle
    }

    /// Drop everything held for `uri`.
    pub fn forget(&mut self, uri: &str) {
        self.diagnostics.delete(uri);
        self.decorations.remove(uri);
    }
}

impl fmt::Debug for LintState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LintState")
            .field("config", &self.config)
            .field("diagnostics", &self.diagnostics.len())
            .field("decorations", &self.decorations.len())
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// The linter's lifetime-scoped state and trigger registry.
#[derive(Debug, Default)]
pub struct LintContext {
    /// Configuration adopted at the next `initialize()`.
    config: RetConfig,
    state: Option<LintState>,
}

impl LintContext {
    pub fn new(config: RetConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create state and register the default handlers. Initializing an
    /// initialized context starts over from a clean state.
    pub fn initialize(&mut self) {
        let mut state = LintState::new(self.config.clone());
        register_default_handlers(&mut state);
        tracing::debug!(handlers = state.handlers.len(), "lint context initialized");
        self.state = Some(state);
    }

    /// Drop styles, diagnostics, decorations and handlers. The current
    /// configuration is kept for the next `initialize()`.
    pub fn dispose(&mut self) {
        if let Some(state) = self.state.take() {
            self.config = state.config;
            tracing::debug!("lint context disposed");
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Result<&LintState> {
        self.state.as_ref().ok_or(LintError::NotInitialized)
    }

    /// Add a handler for `trigger`, run after those already registered.
    pub fn register(&mut self, trigger: Trigger, handler: TriggerHandler) -> Result<()> {
        let state = self.state.as_mut().ok_or(LintError::NotInitialized)?;
        state.handlers.push((trigger, handler));
        Ok(())
    }

    /// Run every handler registered for the event's trigger, in
    /// registration order.
    pub fn dispatch(&mut self, event: &TriggerEvent<'_>) -> Result<()> {
        let state = self.state.as_mut().ok_or(LintError::NotInitialized)?;
        let trigger = event.trigger();
        let handlers: Vec<TriggerHandler> = state
            .handlers
            .iter()
            .filter(|(registered, _)| *registered == trigger)
            .map(|(_, handler)| *handler)
            .collect();

        tracing::trace!(?trigger, handlers = handlers.len(), "dispatching trigger");
        for handler in handlers {
            handler(state, event);
        }
        Ok(())
    }

    /// The configuration currently in effect.
    pub fn config(&self) -> &RetConfig {
        self.state
            .as_ref()
            .map(|state| &state.config)
            .unwrap_or(&self.config)
    }

    pub fn diagnostics(&self, uri: &str) -> Option<&[Diagnostic]> {
        self.state.as_ref()?.diagnostics.get(uri)
    }

    pub fn decorations(&self, uri: &str) -> Option<&DecorationSet> {
        self.state.as_ref()?.decorations(uri)
    }
}

fn register_default_handlers(state: &mut LintState) {
    for trigger in [
        Trigger::InitialLoad,
        Trigger::ActiveEditorChanged,
        Trigger::DocumentChanged,
    ] {
        state.handlers.push((trigger, refresh_document));
    }
    state
        .handlers
        .push((Trigger::ConfigurationChanged, reload_configuration));
    state.handlers.push((Trigger::DocumentClosed, forget_document));
}

fn refresh_document(state: &mut LintState, event: &TriggerEvent<'_>) {
    if let Some(doc) = event.document() {
        state.apply_decorations(doc);
        state.update_diagnostics(doc);
    }
}

fn reload_configuration(state: &mut LintState, event: &TriggerEvent<'_>) {
    let TriggerEvent::ConfigurationChanged { config, visible } = event else {
        return;
    };
    if state.update_config(config.clone()) {
        tracing::debug!(documents = visible.len(), "separator colours changed");
        for doc in visible {
            state.apply_decorations(doc);
        }
    }
}

fn forget_document(state: &mut LintState, event: &TriggerEvent<'_>) {
    if let TriggerEvent::DocumentClosed { uri } = event {
        state.forget(uri);
    }
}
