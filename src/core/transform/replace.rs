//! Building lookup calls and recognizing ones built earlier.
//!
//! The configured call template is rendered once with placeholder
//! identifiers and parsed into a [`CallPattern`]: the name of the key holder
//! function and the accessor that takes the default text. Every replacement
//! is instantiated from it and every existing call is matched against it,
//! so the template string is never parsed again during traversal.

use swc_atoms::Atom;
use swc_common::{DUMMY_SP, Span, SyntaxContext};
use swc_ecma_ast::{
    CallExpr, Callee, Expr, ExprOrSpread, Ident, IdentName, JSXExpr, JSXExprContainer,
    KeyValueProp, Lit, MemberExpr, MemberProp, ObjectLit, Prop, PropName, PropOrSpread, Str, Tpl,
};

use super::path::{Ancestry, NodeKind};
use crate::core::{error::ExtractError, options::RenderCall, parsers::jsx::parse_expression};

const ARGS_PLACEHOLDER: &str = "__autointl_args__";
const SOURCE_PLACEHOLDER: &str = "__autointl_source__";

/// `holder(key, params).accessor(defaultText)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallPattern {
    holder: Atom,
    accessor: Atom,
}

/// Default text carried by an existing lookup call.
#[derive(Debug, Clone)]
pub enum DefaultText {
    Literal(Str),
    Template(Tpl),
    Other,
}

/// A previously emitted lookup call, deconstructed.
#[derive(Debug, Clone)]
pub struct ExistingCall {
    /// `None` when the first holder argument is not a string literal.
    pub key: Option<String>,
    pub text: DefaultText,
}

fn is_ident(expr: &Expr, name: &str) -> bool {
    matches!(expr, Expr::Ident(ident) if &*ident.sym == name)
}

fn unwrap_parens(mut expr: &Expr) -> &Expr {
    while let Expr::Paren(paren) = expr {
        expr = &paren.expr;
    }
    expr
}

fn arg(expr: Expr) -> ExprOrSpread {
    ExprOrSpread {
        spread: None,
        expr: Box::new(expr),
    }
}

impl CallPattern {
    pub fn compile(render_call: &RenderCall) -> Result<Self, ExtractError> {
        let rendered = render_call(ARGS_PLACEHOLDER, SOURCE_PLACEHOLDER);
        let invalid = |reason: &str| ExtractError::InvalidCallTemplate {
            template: render_call("{args}", "{source}"),
            reason: reason.to_string(),
        };

        let expr = parse_expression(&rendered).map_err(|e| invalid(&e.to_string()))?;
        let Expr::Call(outer) = unwrap_parens(&expr) else {
            return Err(invalid("expected a call expression"));
        };

        match outer.args.as_slice() {
            [source] if source.spread.is_none() && is_ident(&source.expr, SOURCE_PLACEHOLDER) => {}
            _ => return Err(invalid("the accessor must take `{source}` as its only argument")),
        }

        let Callee::Expr(callee) = &outer.callee else {
            return Err(invalid("expected `holder({args}).accessor({source})`"));
        };
        let Expr::Member(member) = &**callee else {
            return Err(invalid("expected `holder({args}).accessor({source})`"));
        };
        let MemberProp::Ident(accessor) = &member.prop else {
            return Err(invalid("the accessor must be a plain property name"));
        };

        let Expr::Call(inner) = &*member.obj else {
            return Err(invalid("expected `holder({args}).accessor({source})`"));
        };
        let Callee::Expr(holder) = &inner.callee else {
            return Err(invalid("expected `holder({args}).accessor({source})`"));
        };
        let Expr::Ident(holder) = &**holder else {
            return Err(invalid("the key holder must be a plain identifier"));
        };

        match inner.args.as_slice() {
            [args] if args.spread.is_none() && is_ident(&args.expr, ARGS_PLACEHOLDER) => {}
            _ => return Err(invalid("the key holder must take `{args}` as its only argument")),
        }

        Ok(Self {
            holder: holder.sym.clone(),
            accessor: accessor.sym.clone(),
        })
    }

    pub fn holder(&self) -> &str {
        &self.holder
    }

    pub fn accessor(&self) -> &str {
        &self.accessor
    }

    fn holder_call<'a>(&self, call: &'a CallExpr) -> Option<&'a CallExpr> {
        let Callee::Expr(callee) = &call.callee else {
            return None;
        };
        let Expr::Member(member) = &**callee else {
            return None;
        };
        if !matches!(&member.prop, MemberProp::Ident(prop) if prop.sym == self.accessor) {
            return None;
        }
        let Expr::Call(inner) = &*member.obj else {
            return None;
        };
        match &inner.callee {
            Callee::Expr(holder) if is_ident(holder, &self.holder) => Some(inner),
            _ => None,
        }
    }

    fn holder_call_mut<'a>(&self, call: &'a mut CallExpr) -> Option<&'a mut CallExpr> {
        self.holder_call(call)?;
        let Callee::Expr(callee) = &mut call.callee else {
            return None;
        };
        let Expr::Member(member) = &mut **callee else {
            return None;
        };
        match &mut *member.obj {
            Expr::Call(inner) => Some(inner),
            _ => None,
        }
    }

    /// Deconstruct `call` if it has the lookup shape.
    pub fn match_call(&self, call: &CallExpr) -> Option<ExistingCall> {
        let holder_call = self.holder_call(call)?;

        let key = holder_call.args.first().and_then(|arg| match &*arg.expr {
            Expr::Lit(Lit::Str(s)) if arg.spread.is_none() => s.value.as_str().map(str::to_string),
            _ => None,
        });

        let text = match call.args.first() {
            Some(arg) if arg.spread.is_none() => match unwrap_parens(&arg.expr) {
                Expr::Lit(Lit::Str(s)) => DefaultText::Literal(s.clone()),
                Expr::Tpl(tpl) => DefaultText::Template(tpl.clone()),
                _ => DefaultText::Other,
            },
            _ => DefaultText::Other,
        };

        Some(ExistingCall { key, text })
    }

    /// `holder("key"[, params]).accessor(source)`
    pub fn instantiate(&self, key: &str, params: Option<ObjectLit>, source: Expr, span: Span) -> Expr {
        let holder_call = CallExpr {
            span: DUMMY_SP,
            ctxt: SyntaxContext::empty(),
            callee: Callee::Expr(Box::new(Expr::Ident(Ident::new_no_ctxt(
                self.holder.clone(),
                DUMMY_SP,
            )))),
            args: key_args(key, params),
            type_args: None,
        };

        let member = MemberExpr {
            span: DUMMY_SP,
            obj: Box::new(Expr::Call(holder_call)),
            prop: MemberProp::Ident(IdentName::new(self.accessor.clone(), DUMMY_SP)),
        };

        Expr::Call(CallExpr {
            span,
            ctxt: SyntaxContext::empty(),
            callee: Callee::Expr(Box::new(Expr::Member(member))),
            args: vec![arg(source)],
            type_args: None,
        })
    }

    /// Replace the key holder's arguments of an existing lookup call in place.
    pub fn rebind(&self, call: &mut CallExpr, key: &str, params: Option<ObjectLit>) -> bool {
        match self.holder_call_mut(call) {
            Some(holder_call) => {
                holder_call.args = key_args(key, params);
                true
            }
            None => false,
        }
    }
}

fn key_args(key: &str, params: Option<ObjectLit>) -> Vec<ExprOrSpread> {
    let mut args = vec![arg(Expr::Lit(Lit::Str(Str::from(key))))];
    if let Some(params) = params {
        args.push(arg(Expr::Object(params)));
    }
    args
}

/// `{ arg0: h0, arg1: h1, ... }` in hole order, or `None` without holes.
pub fn interpolation_params(holes: &[Box<Expr>]) -> Option<ObjectLit> {
    if holes.is_empty() {
        return None;
    }

    let props = holes
        .iter()
        .enumerate()
        .map(|(i, hole)| {
            PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp {
                key: PropName::Ident(IdentName::new(Atom::from(format!("arg{}", i)), DUMMY_SP)),
                value: hole.clone(),
            })))
        })
        .collect();

    Some(ObjectLit {
        span: DUMMY_SP,
        props,
    })
}

/// Display value of a template: literal segments joined by `{argN}`.
pub fn template_value(tpl: &Tpl) -> String {
    let mut value = String::new();
    for (i, quasi) in tpl.quasis.iter().enumerate() {
        if i > 0 {
            value.push_str(&format!("{{arg{}}}", i - 1));
        }
        match quasi.cooked.as_ref().and_then(|c| c.as_str()) {
            Some(cooked) => value.push_str(cooked),
            None => value.push_str(&quasi.raw),
        }
    }
    value
}

// ============================================================
// Placement
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The call can stand where the text stood.
    Bare,
    /// The call needs a `{...}` expression container.
    Wrapped,
}

/// Decide whether a replacement needs an expression container.
///
/// Text sitting directly in a markup slot (an attribute's string value or a
/// child of an element) does. Code text is always inside an expression
/// already, however deep in an attribute it sits, so its call stays bare.
pub fn placement(ancestry: &Ancestry) -> Placement {
    match ancestry.parent() {
        Some(NodeKind::JsxAttr | NodeKind::JsxElement) => Placement::Wrapped,
        _ => Placement::Bare,
    }
}

pub fn expression_container(expr: Expr, span: Span) -> JSXExprContainer {
    JSXExprContainer {
        span,
        expr: JSXExpr::Expr(Box::new(expr)),
    }
}
