//! `+` chain normalization.
//!
//! `"你好" + name + "再见"` becomes `` `你好${name}再见` ``: the chain is
//! flattened into its operands, adjacent string literals are folded into one
//! literal segment and every other operand becomes a hole.

use std::mem;

use swc_atoms::{Atom, Wtf8Atom};
use swc_common::{DUMMY_SP, Span};
use swc_ecma_ast::{BinExpr, BinaryOp, Expr, Lit, Str, Tpl, TplElement};

use crate::utils::escape_template_raw;

fn unwrap_parens(mut expr: &Expr) -> &Expr {
    while let Expr::Paren(paren) = expr {
        expr = &paren.expr;
    }
    expr
}

/// Operands of a `+` chain in source order.
///
/// Nested `+` operations on either side are flattened too, including
/// parenthesized ones.
pub fn flatten_concat(bin: &BinExpr) -> Vec<&Expr> {
    let mut operands = Vec::new();
    let mut pending: Vec<&Expr> = vec![&*bin.right, &*bin.left];

    while let Some(expr) = pending.pop() {
        match unwrap_parens(expr) {
            Expr::Bin(inner) if inner.op == BinaryOp::Add => {
                pending.push(&inner.right);
                pending.push(&inner.left);
            }
            operand => operands.push(operand),
        }
    }

    operands
}

/// The string literal an operand is, if any.
pub fn as_string_literal(expr: &Expr) -> Option<&Str> {
    match expr {
        Expr::Lit(Lit::Str(s)) if s.value.as_str().is_some() => Some(s),
        _ => None,
    }
}

/// Build one template from flattened operands.
///
/// The result always has exactly one more literal segment than holes, and
/// only the last segment is marked as the closing one.
pub fn build_template(operands: &[&Expr], span: Span) -> Tpl {
    let mut segments = Vec::new();
    let mut exprs = Vec::new();
    let mut current = String::new();

    for operand in operands {
        match as_string_literal(operand).and_then(|s| s.value.as_str()) {
            Some(text) => current.push_str(text),
            None => {
                segments.push(mem::take(&mut current));
                exprs.push(Box::new((*operand).clone()));
            }
        }
    }
    segments.push(current);

    let last = segments.len() - 1;
    let quasis = segments
        .into_iter()
        .enumerate()
        .map(|(i, cooked)| TplElement {
            span: DUMMY_SP,
            tail: i == last,
            raw: Atom::from(escape_template_raw(&cooked)),
            cooked: Some(Wtf8Atom::from(Atom::from(cooked))),
        })
        .collect();

    Tpl {
        span,
        exprs,
        quasis,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::parsers::jsx::parse_expression;

    fn parse_bin(code: &str) -> BinExpr {
        match *parse_expression(code).unwrap() {
            Expr::Bin(bin) => bin,
            other => panic!("expected binary expression, got {:?}", other),
        }
    }

    fn segments(tpl: &Tpl) -> Vec<String> {
        tpl.quasis.iter().map(|q| q.raw.to_string()).collect()
    }

    #[test]
    fn test_flatten_order() {
        let bin = parse_bin(r#""a" + b + ("c" + d) + "e""#);
        let operands = flatten_concat(&bin);
        assert_eq!(operands.len(), 5);
        assert!(as_string_literal(operands[0]).is_some());
        assert!(matches!(operands[1], Expr::Ident(i) if &*i.sym == "b"));
        assert!(as_string_literal(operands[2]).is_some());
        assert!(matches!(operands[3], Expr::Ident(i) if &*i.sym == "d"));
        assert!(as_string_literal(operands[4]).is_some());
    }

    #[test]
    fn test_flatten_stops_at_other_operators() {
        let bin = parse_bin(r#""共" + (a - b) + "个""#);
        let operands = flatten_concat(&bin);
        assert_eq!(operands.len(), 3);
        assert!(matches!(operands[1], Expr::Bin(b) if b.op == BinaryOp::Sub));
    }

    #[test]
    fn test_mixed_chain() {
        let bin = parse_bin(r#""你好" + name + "再见""#);
        let tpl = build_template(&flatten_concat(&bin), bin.span);

        assert_eq!(segments(&tpl), vec!["你好", "再见"]);
        assert_eq!(tpl.exprs.len(), 1);
        assert!(matches!(&*tpl.exprs[0], Expr::Ident(i) if &*i.sym == "name"));
    }

    #[test]
    fn test_adjacent_literals_fold() {
        let bin = parse_bin(r#""你" + "好" + n"#);
        let tpl = build_template(&flatten_concat(&bin), bin.span);

        assert_eq!(segments(&tpl), vec!["你好", ""]);
        assert_eq!(tpl.exprs.len(), 1);
    }

    #[test]
    fn test_leading_hole_gets_empty_segment() {
        let bin = parse_bin(r#"count + "个" + unit"#);
        let tpl = build_template(&flatten_concat(&bin), bin.span);

        assert_eq!(segments(&tpl), vec!["", "个", ""]);
        assert_eq!(tpl.quasis.len(), tpl.exprs.len() + 1);
    }

    #[test]
    fn test_only_last_segment_is_tail() {
        let bin = parse_bin(r#""第" + n + "页，共" + total + "页""#);
        let tpl = build_template(&flatten_concat(&bin), bin.span);

        let tails: Vec<bool> = tpl.quasis.iter().map(|q| q.tail).collect();
        assert_eq!(tails, vec![false, false, true]);
    }

    #[test]
    fn test_raw_is_escaped() {
        let bin = parse_bin(r#""价格`" + p"#);
        let tpl = build_template(&flatten_concat(&bin), bin.span);

        assert_eq!(tpl.quasis[0].raw.to_string(), "价格\\`");
        assert_eq!(
            tpl.quasis[0].cooked.as_ref().and_then(|c| c.as_str()),
            Some("价格`")
        );
    }
}
