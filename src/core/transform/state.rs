use std::collections::HashSet;

use swc_common::Span;
use swc_ecma_ast::{ImportDecl, Module};

use super::import::insert_import;
use crate::core::{dictionary::TranslationEntry, error::ExtractError};

/// Deferred import insertion, decided before the rewrite pass.
#[derive(Debug, Default)]
pub enum ImportAction {
    #[default]
    Noop,
    Insert(Box<ImportDecl>),
}

/// Everything the rewrite pass accumulates for one file.
#[derive(Debug, Default)]
pub struct FileState {
    pub entries: Vec<TranslationEntry>,
    pub rewritten: bool,
    pub import_action: ImportAction,
    pub skipped: HashSet<Span>,
    pub errors: Vec<ExtractError>,
}

impl FileState {
    pub fn is_skipped(&self, span: Span) -> bool {
        self.skipped.contains(&span)
    }

    /// Run the deferred import action if anything was rewritten.
    /// The action is consumed either way.
    pub fn finalize_import(&mut self, module: &mut Module) {
        let action = std::mem::take(&mut self.import_action);
        if let ImportAction::Insert(decl) = action
            && self.rewritten
        {
            insert_import(module, *decl);
        }
    }
}
