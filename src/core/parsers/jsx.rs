use anyhow::{Context, Result, anyhow};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use swc_common::{
    BytePos, FileName, Globals, SourceMap, Spanned,
    comments::{Comment, Comments, SingleThreadedComments},
};
use swc_ecma_ast::{Expr, Module};
use swc_ecma_codegen::{Config, Emitter, text_writer::JsWriter};
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

/// Map of byte positions to comments.
pub type CommentMap = HashMap<BytePos, Vec<Comment>>;

/// Thread-safe extracted comments from SingleThreadedComments.
/// Extracted during parsing and stored independently of swc types.
#[derive(Debug, Clone, Default)]
pub struct ExtractedComments {
    pub leading: CommentMap,
    pub trailing: CommentMap,
}

impl ExtractedComments {
    /// Extract comments from SingleThreadedComments.
    /// This must be called before SingleThreadedComments is dropped.
    pub fn from_swc(comments: &SingleThreadedComments) -> Self {
        let (leading, trailing) = comments.borrow_all();
        Self {
            leading: leading.iter().map(|(k, v)| (*k, v.clone())).collect(),
            trailing: trailing.iter().map(|(k, v)| (*k, v.clone())).collect(),
        }
    }

    /// Rebuild a comment store the code generator can consume.
    pub fn to_swc(&self) -> SingleThreadedComments {
        let comments = SingleThreadedComments::default();
        for (pos, list) in &self.leading {
            comments.add_leading_comments(*pos, list.clone());
        }
        for (pos, list) in &self.trailing {
            comments.add_trailing_comments(*pos, list.clone());
        }
        comments
    }

    /// True if any leading comment at `pos` contains `marker`.
    pub fn has_leading_marker(&self, pos: BytePos, marker: &str) -> bool {
        self.leading
            .get(&pos)
            .is_some_and(|list| list.iter().any(|c| c.text.contains(marker)))
    }
}

pub struct ParsedSource {
    pub module: Module,
    pub source_map: Arc<SourceMap>,
    pub comments: ExtractedComments,
    /// Errors the parser recovered from; the tree is still usable.
    pub recovered: Vec<String>,
}

/// `.ts` files are parsed without JSX so `<T>(x: T) => x` stays a generic arrow.
fn syntax_for(file_path: &str) -> Syntax {
    let is_plain_ts = Path::new(file_path)
        .extension()
        .is_some_and(|ext| ext == "ts" || ext == "mts" || ext == "cts");

    Syntax::Typescript(TsSyntax {
        tsx: !is_plain_ts,
        decorators: true,
        ..Default::default()
    })
}

/// Parse a JS/TS/JSX/TSX source string into an AST.
///
/// Accepts a shared SourceMap for thread-safe parallel parsing.
pub fn parse_source(code: String, file_path: &str, source_map: Arc<SourceMap>) -> Result<ParsedSource> {
    use swc_common::GLOBALS;

    // Wrap in GLOBALS.set() for thread safety
    GLOBALS.set(&Globals::new(), || {
        let source_file = source_map.new_source_file(FileName::Real(file_path.into()).into(), code);

        let comments = SingleThreadedComments::default();
        let mut parser = Parser::new(
            syntax_for(file_path),
            StringInput::from(&*source_file),
            Some(&comments),
        );

        let module = parser
            .parse_module()
            .map_err(|e| anyhow!("Failed to parse {}: {:?}", file_path, e.kind()))?;

        let recovered = parser
            .take_errors()
            .into_iter()
            .map(|e| {
                let line = source_map.lookup_char_pos(e.span().lo).line;
                format!("line {}: {:?}", line, e.kind())
            })
            .collect();

        // Extract comments immediately (before SingleThreadedComments drops)
        let extracted_comments = ExtractedComments::from_swc(&comments);

        Ok(ParsedSource {
            module,
            source_map,
            comments: extracted_comments,
            recovered,
        })
    })
}

/// Parse a single expression, e.g. a rendered call template.
pub fn parse_expression(code: &str) -> Result<Box<Expr>> {
    use swc_common::GLOBALS;

    GLOBALS.set(&Globals::new(), || {
        let source_map = SourceMap::default();
        let source_file = source_map.new_source_file(FileName::Anon.into(), code.to_string());
        let mut parser = Parser::new(
            syntax_for("expression.tsx"),
            StringInput::from(&*source_file),
            None,
        );
        parser
            .parse_expr()
            .map_err(|e| anyhow!("Failed to parse expression: {:?}", e.kind()))
    })
}

/// Print a (possibly rewritten) module back to source, comments included.
pub fn print_module(parsed: &ParsedSource) -> Result<String> {
    let comments = parsed.comments.to_swc();
    let mut buf = Vec::new();
    {
        let mut emitter = Emitter {
            cfg: Config::default(),
            cm: parsed.source_map.clone(),
            comments: Some(&comments),
            wr: JsWriter::new(parsed.source_map.clone(), "\n", &mut buf, None),
        };
        emitter
            .emit_module(&parsed.module)
            .context("Failed to print module")?;
    }
    String::from_utf8(buf).context("Printed module is not valid UTF-8")
}
