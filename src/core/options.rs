//! Engine options.
//!
//! Every field of [`Options`] is required. [`OptionsBuilder::build`] fails
//! with [`ExtractError::MissingOption`] before any file is touched when one
//! is absent.

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use super::{dictionary::Dictionary, error::ExtractError, text::TextClassifier};

/// Renders the replacement call's source from the key argument list (the
/// quoted key plus an optional parameter object) and the default-text
/// source, e.g. `getLangMsg('k', {arg0: a}).d(`${a}个`)`.
pub type RenderCall = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

pub const DEFAULT_DISABLE_MARKER: &str = "i18n-disable";

/// How the lookup binding is imported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportKind {
    /// `import { getLangMsg } from "..."`
    #[default]
    Named,
    /// `import getLangMsg from "..."`
    Default,
}

/// Callbacks fired while files are transformed. Shared across workers.
pub trait ExtractionObserver: Send + Sync {
    /// Called once per successfully transformed file with its folded entries.
    fn entries_extracted(&self, file_path: &str, dictionary: &Dictionary);

    /// Called every time a node is rewritten.
    fn rewrite_occurred(&self, file_path: &str);
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ExtractionObserver for NoopObserver {
    fn entries_extracted(&self, _file_path: &str, _dictionary: &Dictionary) {}

    fn rewrite_occurred(&self, _file_path: &str) {}
}

#[derive(Clone)]
pub struct Options {
    pub import_source: String,
    pub binding_name: String,
    pub import_kind: ImportKind,
    pub render_call: RenderCall,
    pub observer: Arc<dyn ExtractionObserver>,
    pub disable_marker: String,
    pub classifier: TextClassifier,
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("import_source", &self.import_source)
            .field("binding_name", &self.binding_name)
            .field("import_kind", &self.import_kind)
            .field("disable_marker", &self.disable_marker)
            .field("classifier", &self.classifier.pattern())
            .finish_non_exhaustive()
    }
}

impl Options {
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }
}

#[derive(Default)]
pub struct OptionsBuilder {
    import_source: Option<String>,
    binding_name: Option<String>,
    import_kind: ImportKind,
    render_call: Option<RenderCall>,
    observer: Option<Arc<dyn ExtractionObserver>>,
    disable_marker: Option<String>,
    classifier: Option<TextClassifier>,
}

impl OptionsBuilder {
    pub fn import_source(mut self, source: impl Into<String>) -> Self {
        self.import_source = Some(source.into());
        self
    }

    pub fn binding_name(mut self, name: impl Into<String>) -> Self {
        self.binding_name = Some(name.into());
        self
    }

    pub fn import_kind(mut self, kind: ImportKind) -> Self {
        self.import_kind = kind;
        self
    }

    pub fn render_call<F>(mut self, render: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        self.render_call = Some(Arc::new(render));
        self
    }

    /// Render with a template holding `{args}` and `{source}` placeholders.
    pub fn call_template(self, template: impl Into<String>) -> Self {
        let template = template.into();
        self.render_call(move |args, source| {
            template
                .replace("{args}", args)
                .replace("{source}", source)
        })
    }

    pub fn observer(mut self, observer: Arc<dyn ExtractionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn disable_marker(mut self, marker: impl Into<String>) -> Self {
        self.disable_marker = Some(marker.into());
        self
    }

    pub fn classifier(mut self, classifier: TextClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn build(self) -> Result<Options, ExtractError> {
        let import_source = self
            .import_source
            .filter(|s| !s.is_empty())
            .ok_or(ExtractError::MissingOption("importSource"))?;
        let binding_name = self
            .binding_name
            .filter(|s| !s.is_empty())
            .ok_or(ExtractError::MissingOption("bindingName"))?;
        let render_call = self
            .render_call
            .ok_or(ExtractError::MissingOption("callTemplate"))?;
        let observer = self
            .observer
            .ok_or(ExtractError::MissingOption("observer"))?;

        Ok(Options {
            import_source,
            binding_name,
            import_kind: self.import_kind,
            render_call,
            observer,
            disable_marker: self
                .disable_marker
                .unwrap_or_else(|| DEFAULT_DISABLE_MARKER.to_string()),
            classifier: self.classifier.unwrap_or_default(),
        })
    }
}
