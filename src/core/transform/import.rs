//! Ensuring the lookup binding is imported.

use swc_common::DUMMY_SP;
use swc_ecma_ast::{
    Expr, ExprStmt, Ident, ImportDecl, ImportDefaultSpecifier, ImportNamedSpecifier, ImportPhase,
    ImportSpecifier, Lit, Module, ModuleDecl, ModuleItem, Stmt, Str,
};

use crate::core::options::{ImportKind, Options};

/// True if `module` already imports the binding from the configured source,
/// in either default or named form. Matches on the local name.
pub fn is_imported(module: &Module, options: &Options) -> bool {
    module
        .body
        .iter()
        .filter_map(|item| match item {
            ModuleItem::ModuleDecl(ModuleDecl::Import(decl)) => Some(decl),
            _ => None,
        })
        .filter(|decl| !decl.type_only && decl.src.value.as_str() == Some(options.import_source.as_str()))
        .flat_map(|decl| decl.specifiers.iter())
        .any(|specifier| match specifier {
            ImportSpecifier::Named(named) => {
                !named.is_type_only && &*named.local.sym == options.binding_name
            }
            ImportSpecifier::Default(default) => &*default.local.sym == options.binding_name,
            ImportSpecifier::Namespace(_) => false,
        })
}

pub fn build_import(options: &Options) -> ImportDecl {
    let local = Ident::new_no_ctxt(options.binding_name.as_str().into(), DUMMY_SP);
    let specifier = match options.import_kind {
        ImportKind::Named => ImportSpecifier::Named(ImportNamedSpecifier {
            span: DUMMY_SP,
            local,
            imported: None,
            is_type_only: false,
        }),
        ImportKind::Default => ImportSpecifier::Default(ImportDefaultSpecifier {
            span: DUMMY_SP,
            local,
        }),
    };

    ImportDecl {
        span: DUMMY_SP,
        specifiers: vec![specifier],
        src: Box::new(Str::from(options.import_source.as_str())),
        type_only: false,
        with: None,
        phase: ImportPhase::Evaluation,
    }
}

fn is_directive(item: &ModuleItem) -> bool {
    matches!(
        item,
        ModuleItem::Stmt(Stmt::Expr(ExprStmt { expr, .. })) if matches!(&**expr, Expr::Lit(Lit::Str(_)))
    )
}

/// Insert `decl` as the first statement, after any directive prologue
/// such as `"use client"`.
pub fn insert_import(module: &mut Module, decl: ImportDecl) {
    let index = module.body.iter().take_while(|item| is_directive(item)).count();
    module
        .body
        .insert(index, ModuleItem::ModuleDecl(ModuleDecl::Import(decl)));
}
