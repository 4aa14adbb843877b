//! The rewrite pass.
//!
//! One [`Transformer`] is built per run from [`Options`] and shared by every
//! worker. For each file it:
//!
//! 1. scans the module for an existing import of the lookup binding and for
//!    literals that must be left alone (disable marker, import sources),
//! 2. walks the tree once, rewriting localizable text into lookup calls and
//!    re-deriving keys of calls emitted by earlier runs,
//! 3. inserts the import if anything was rewritten and reports the file's
//!    entries through the observer.

mod concat;
mod import;
pub mod path;
mod prescan;
pub mod replace;
mod state;


use std::sync::Arc;

use swc_common::{SourceMap, Span};
use swc_ecma_ast::{
    BinExpr, BinaryOp, CallExpr, ComputedPropName, Expr, ImportDecl, JSXAttr, JSXAttrValue,
    JSXElement, JSXElementChild, JSXExprContainer, JSXFragment, JSXOpeningElement, JSXText,
    KeyValueProp, Lit, PropName, Str, Tpl, TsEnumMember, TsEnumMemberId, TsInterfaceDecl, TsType,
};
use swc_ecma_codegen::to_code_default;
use swc_ecma_visit::{VisitMut, VisitMutWith};

pub use self::{
    concat::{build_template, flatten_concat},
    path::{Ancestry, NodeKind},
    replace::{CallPattern, Placement, placement},
    state::{FileState, ImportAction},
};
use self::{
    concat::as_string_literal,
    import::{build_import, is_imported},
    prescan::collect_skipped,
    replace::{
        DefaultText, ExistingCall, expression_container, interpolation_params, template_value,
    },
};
use super::{
    dictionary::{Dictionary, EntryStatus, KeyCollision, SourcePosition, TranslationEntry},
    error::ExtractError,
    key::{derive_key, literal_source},
    options::Options,
    parsers::jsx::ParsedSource,
};
use crate::utils::normalize_text;

/// Compiled options, shared across files.
pub struct Transformer {
    options: Options,
    pattern: CallPattern,
}

/// Result of transforming one file.
#[derive(Debug, Clone, Default)]
pub struct TransformOutcome {
    pub entries: Vec<TranslationEntry>,
    pub rewritten: bool,
}

impl TransformOutcome {
    pub fn dictionary(&self) -> Dictionary {
        Dictionary::from_entries(&self.entries)
    }

    pub fn collisions(&self) -> Vec<KeyCollision> {
        Dictionary::fold(&self.entries).1
    }
}

impl Transformer {
    pub fn new(options: Options) -> Result<Self, ExtractError> {
        let pattern = CallPattern::compile(&options.render_call)?;
        Ok(Self { options, pattern })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn pattern(&self) -> &CallPattern {
        &self.pattern
    }

    /// Rewrite `parsed.module` in place.
    ///
    /// On error the module may be partially rewritten and must not be
    /// printed.
    pub fn transform(
        &self,
        file_path: &str,
        parsed: &mut ParsedSource,
    ) -> Result<TransformOutcome, ExtractError> {
        let mut state = FileState {
            skipped: collect_skipped(&parsed.module, &parsed.comments, &self.options.disable_marker),
            ..Default::default()
        };
        if !is_imported(&parsed.module, &self.options) {
            state.import_action = ImportAction::Insert(Box::new(build_import(&self.options)));
        }

        let mut rewriter = Rewriter {
            transformer: self,
            file_path,
            source_map: &parsed.source_map,
            ancestry: Ancestry::default(),
            state,
        };
        parsed.module.visit_mut_with(&mut rewriter);
        let mut state = rewriter.state;

        if !state.errors.is_empty() {
            return Err(state.errors.swap_remove(0));
        }

        state.finalize_import(&mut parsed.module);
        self.options
            .observer
            .entries_extracted(file_path, &Dictionary::from_entries(&state.entries));

        Ok(TransformOutcome {
            entries: state.entries,
            rewritten: state.rewritten,
        })
    }
}

struct Rewriter<'a> {
    transformer: &'a Transformer,
    file_path: &'a str,
    source_map: &'a Arc<SourceMap>,
    ancestry: Ancestry,
    state: FileState,
}

impl Rewriter<'_> {
    fn descend<N>(&mut self, kind: NodeKind, node: &mut N)
    where
        N: VisitMutWith<Self>,
    {
        self.ancestry.push(kind);
        node.visit_mut_children_with(self);
        self.ancestry.pop();
    }

    fn mark_rewritten(&mut self) {
        self.state.rewritten = true;
        self.transformer
            .options
            .observer
            .rewrite_occurred(self.file_path);
    }

    fn may_rewrite(&self, span: Span, text: &str) -> bool {
        !self.state.is_skipped(span)
            && !self.ancestry.any(NodeKind::ImportDecl)
            && self.transformer.options.classifier.is_localizable(text)
    }

    fn position(&self, span: Span) -> Option<SourcePosition> {
        if span.is_dummy() {
            return None;
        }
        let loc = self.source_map.lookup_char_pos(span.lo);
        let source_line = loc
            .file
            .get_line(loc.line - 1)
            .map(|cow| cow.to_string())
            .unwrap_or_default();
        Some(SourcePosition {
            line: loc.line,
            col: loc.col_display + 1,
            source_line,
        })
    }

    fn record(&mut self, key: &str, value: &str, span: Span, status: EntryStatus) {
        let entry = TranslationEntry {
            key: key.to_string(),
            value: normalize_text(value),
            status,
            position: self.position(span),
        };
        self.state.entries.push(entry);
    }

    /// Regenerated source of a template, the canonical form its key hashes.
    fn template_source(&self, tpl: &Tpl) -> String {
        to_code_default(self.source_map.clone(), None, tpl)
    }

    // ============================================================
    // Rewrites
    // ============================================================

    fn rewrite_literal(&mut self, s: &Str) -> Option<Expr> {
        let value = s.value.as_str()?;
        if !self.may_rewrite(s.span, value) {
            return None;
        }

        let key = derive_key(&literal_source(value));
        self.record(&key, value, s.span, EntryStatus::New);
        let call = self.transformer.pattern.instantiate(
            &key,
            None,
            Expr::Lit(Lit::Str(s.clone())),
            s.span,
        );
        self.mark_rewritten();
        Some(call)
    }

    fn rewrite_template(&mut self, tpl: &Tpl) -> Option<Expr> {
        let value = template_value(tpl);
        if !self.may_rewrite(tpl.span, &value) {
            return None;
        }

        let key = derive_key(&self.template_source(tpl));
        self.record(&key, &value, tpl.span, EntryStatus::New);
        let call = self.transformer.pattern.instantiate(
            &key,
            interpolation_params(&tpl.exprs),
            Expr::Tpl(tpl.clone()),
            tpl.span,
        );
        self.mark_rewritten();
        Some(call)
    }

    /// Attribute strings are re-emitted as JS strings, so the JSX raw form
    /// is dropped.
    fn rewrite_attr_string(&mut self, s: &Str) -> Option<JSXAttrValue> {
        let value = s.value.as_str()?;
        if !self.may_rewrite(s.span, value) || placement(&self.ancestry) != Placement::Wrapped {
            return None;
        }

        let key = derive_key(&literal_source(value));
        self.record(&key, value, s.span, EntryStatus::New);
        let call = self.transformer.pattern.instantiate(
            &key,
            None,
            Expr::Lit(Lit::Str(Str::from(value))),
            s.span,
        );
        self.mark_rewritten();

        Some(JSXAttrValue::JSXExprContainer(expression_container(
            call, s.span,
        )))
    }

    fn rewrite_markup_text(&mut self, text: &JSXText) -> Option<JSXElementChild> {
        let value = normalize_text(&text.value);
        if value.is_empty()
            || !self.may_rewrite(text.span, &value)
            || placement(&self.ancestry) != Placement::Wrapped
        {
            return None;
        }

        let key = derive_key(&literal_source(&value));
        self.record(&key, &value, text.span, EntryStatus::New);
        let call = self.transformer.pattern.instantiate(
            &key,
            None,
            Expr::Lit(Lit::Str(Str::from(value.as_str()))),
            text.span,
        );
        self.mark_rewritten();

        Some(JSXElementChild::JSXExprContainer(expression_container(
            call, text.span,
        )))
    }

    /// `{ "中文": v }` becomes `{ ["中文"]: v }` so the key is visited as an
    /// ordinary literal afterwards.
    fn rewrite_property_key(&mut self, key: &mut PropName) {
        let literal = match key {
            PropName::Str(s)
                if s
                    .value
                    .as_str()
                    .is_some_and(|value| self.may_rewrite(s.span, value)) =>
            {
                Some(s.clone())
            }
            _ => None,
        };

        if let Some(s) = literal {
            *key = PropName::Computed(ComputedPropName {
                span: s.span,
                expr: Box::new(Expr::Lit(Lit::Str(s))),
            });
            self.mark_rewritten();
        }
    }

    /// Normalize a `+` chain into a template when one of its string
    /// operands is localizable and none of them is skip-flagged.
    fn normalize_concat(&self, bin: &BinExpr) -> Option<Tpl> {
        if bin.op != BinaryOp::Add || self.ancestry.any(NodeKind::ImportDecl) {
            return None;
        }

        let operands = flatten_concat(bin);
        let mut localizable = false;
        for s in operands.iter().filter_map(|operand| as_string_literal(operand)) {
            if self.state.is_skipped(s.span) {
                return None;
            }
            localizable |= s
                .value
                .as_str()
                .is_some_and(|value| self.transformer.options.classifier.is_localizable(value));
        }

        localizable.then(|| build_template(&operands, bin.span))
    }

    // ============================================================
    // Re-processing of earlier output
    // ============================================================

    fn reprocess(&mut self, call: &mut CallExpr, existing: ExistingCall) {
        let (key, params, value, span) = match &existing.text {
            DefaultText::Literal(s) => {
                let Some(value) = s.value.as_str() else {
                    return;
                };
                (
                    derive_key(&literal_source(value)),
                    None,
                    value.to_string(),
                    s.span,
                )
            }
            DefaultText::Template(tpl) => (
                derive_key(&self.template_source(tpl)),
                interpolation_params(&tpl.exprs),
                template_value(tpl),
                tpl.span,
            ),
            DefaultText::Other => return,
        };

        if existing.key.as_deref() == Some(key.as_str()) {
            self.record(&key, &value, span, EntryStatus::Unchanged);
            return;
        }

        self.record(&key, &value, span, EntryStatus::Updated);
        if self.transformer.pattern.rebind(call, &key, params) {
            self.mark_rewritten();
        }
    }
}

impl VisitMut for Rewriter<'_> {
    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        if let Expr::Call(call) = expr
            && let Some(existing) = self.transformer.pattern.match_call(call)
        {
            self.reprocess(call, existing);
            return;
        }

        let normalized = match expr {
            Expr::Bin(bin) => self.normalize_concat(bin),
            _ => None,
        };
        if let Some(tpl) = normalized {
            *expr = Expr::Tpl(tpl);
            self.mark_rewritten();
        }

        let replacement = match expr {
            Expr::Lit(Lit::Str(s)) => self.rewrite_literal(s),
            Expr::Tpl(tpl) => self.rewrite_template(tpl),
            _ => None,
        };
        if let Some(call) = replacement {
            *expr = call;
            return;
        }

        match expr {
            // Markup pushes its own kind
            Expr::Paren(_) | Expr::JSXElement(_) | Expr::JSXFragment(_) => {
                expr.visit_mut_children_with(self)
            }
            _ => self.descend(NodeKind::Other, expr),
        }
    }

    fn visit_mut_import_decl(&mut self, decl: &mut ImportDecl) {
        self.descend(NodeKind::ImportDecl, decl);
    }

    fn visit_mut_key_value_prop(&mut self, prop: &mut KeyValueProp) {
        self.rewrite_property_key(&mut prop.key);
        prop.visit_mut_children_with(self);
    }

    // Types carry no runtime text.
    fn visit_mut_ts_type(&mut self, _: &mut TsType) {}

    fn visit_mut_ts_interface_decl(&mut self, _: &mut TsInterfaceDecl) {}

    fn visit_mut_ts_enum_member(&mut self, member: &mut TsEnumMember) {
        if let TsEnumMemberId::Str(s) = &member.id
            && let Some(key) = s.value.as_str()
            && !self.state.is_skipped(s.span)
            && self.transformer.options.classifier.is_localizable(key)
        {
            let line = self.position(s.span).map_or(0, |position| position.line);
            self.state.errors.push(ExtractError::UnsupportedEnumKey {
                file: self.file_path.to_string(),
                key: key.to_string(),
                line,
            });
        }

        member.visit_mut_children_with(self);
    }

    // ============================================================
    // JSX
    // ============================================================

    fn visit_mut_jsx_element(&mut self, element: &mut JSXElement) {
        self.descend(NodeKind::JsxElement, element);
    }

    fn visit_mut_jsx_fragment(&mut self, fragment: &mut JSXFragment) {
        self.descend(NodeKind::JsxElement, fragment);
    }

    fn visit_mut_jsx_opening_element(&mut self, opening: &mut JSXOpeningElement) {
        self.descend(NodeKind::Other, opening);
    }

    fn visit_mut_jsx_attr(&mut self, attr: &mut JSXAttr) {
        self.descend(NodeKind::JsxAttr, attr);
    }

    fn visit_mut_jsx_expr_container(&mut self, container: &mut JSXExprContainer) {
        self.descend(NodeKind::Other, container);
    }

    fn visit_mut_jsx_attr_value(&mut self, value: &mut JSXAttrValue) {
        let replacement = match value {
            JSXAttrValue::Str(s) => self.rewrite_attr_string(s),
            _ => None,
        };
        match replacement {
            Some(replacement) => *value = replacement,
            None => value.visit_mut_children_with(self),
        }
    }

    fn visit_mut_jsx_element_child(&mut self, child: &mut JSXElementChild) {
        let replacement = match child {
            JSXElementChild::JSXText(text) => self.rewrite_markup_text(text),
            _ => None,
        };
        match replacement {
            Some(replacement) => *child = replacement,
            None => child.visit_mut_children_with(self),
        }
    }
}
