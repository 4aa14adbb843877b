//! Marks literals and templates that must never be rewritten.

use std::collections::HashSet;

use swc_common::Span;
use swc_ecma_ast::{ImportDecl, Module, Str, Tpl};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::parsers::jsx::ExtractedComments;

/// Spans of every string literal or template that carries a leading
/// comment containing `marker`, or that sits inside an import declaration.
pub fn collect_skipped(module: &Module, comments: &ExtractedComments, marker: &str) -> HashSet<Span> {
    let mut scanner = SkipScanner {
        comments,
        marker,
        import_depth: 0,
        skipped: HashSet::new(),
    };
    module.visit_with(&mut scanner);
    scanner.skipped
}

struct SkipScanner<'a> {
    comments: &'a ExtractedComments,
    marker: &'a str,
    import_depth: usize,
    skipped: HashSet<Span>,
}

impl SkipScanner<'_> {
    fn mark(&mut self, span: Span) {
        if self.import_depth > 0 || self.comments.has_leading_marker(span.lo, self.marker) {
            self.skipped.insert(span);
        }
    }
}

impl Visit for SkipScanner<'_> {
    fn visit_import_decl(&mut self, node: &ImportDecl) {
        self.import_depth += 1;
        node.visit_children_with(self);
        self.import_depth -= 1;
    }

    fn visit_str(&mut self, node: &Str) {
        self.mark(node.span);
    }

    fn visit_tpl(&mut self, node: &Tpl) {
        self.mark(node.span);
        node.visit_children_with(self);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use swc_common::SourceMap;

    use super::*;
    use crate::core::parsers::jsx::parse_source;

    fn skipped(code: &str) -> usize {
        let parsed = parse_source(code.to_string(), "a.tsx", Arc::new(SourceMap::default())).unwrap();
        collect_skipped(&parsed.module, &parsed.comments, "i18n-disable").len()
    }

    #[test]
    fn test_marker_comment() {
        assert_eq!(skipped("const a = /* i18n-disable */ '你好';"), 1);
        assert_eq!(skipped("const a = /* i18n-disable */ `你好${b}`;"), 1);
        assert_eq!(skipped("const a = /* other */ '你好';"), 0);
        assert_eq!(skipped("const a = '你好';"), 0);
    }

    #[test]
    fn test_comment_must_lead_the_literal() {
        assert_eq!(skipped("// i18n-disable\nconst a = '你好';"), 0);
    }

    #[test]
    fn test_import_strings() {
        assert_eq!(skipped("import a from './中文';"), 1);
        assert_eq!(skipped("import { a } from './a';\nconst b = '中';"), 1);
    }
}
