//! Diagram source compiler
//!
//! Parses seqdiag-style source with chumsky and builds the intermediate
//! [`CompiledDiagram`]. Any grammar violation yields a typed
//! [`DiagramError::Parse`]; no partial diagram is ever produced.

use chumsky::prelude::*;
use tracing::debug;

use super::model::{Actor, CompiledDiagram, Exchange, LineStyle};
use crate::core::DiagramError;

/// Direction an arrow operator points in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrowDir {
    Forward,
    Back,
}

/// One parsed statement of the diagram body
#[derive(Debug, Clone)]
enum Stmt {
    Actor {
        id: String,
        attrs: Vec<(String, String)>,
    },
    Chain {
        first: String,
        rest: Vec<((ArrowDir, LineStyle), String)>,
        attrs: Vec<(String, String)>,
    },
}

/// Whitespace and `//` / `#` line comments
fn ws<'src>() -> impl Parser<'src, &'src str, (), extra::Err<Rich<'src, char>>> + Clone {
    let line_comment = just("//")
        .or(just("#"))
        .then(none_of('\n').repeated())
        .ignored();
    one_of(" \t\r\n")
        .ignored()
        .or(line_comment)
        .repeated()
        .ignored()
}

fn identifier<'src>() -> impl Parser<'src, &'src str, String, extra::Err<Rich<'src, char>>> + Clone
{
    text::ident().map(|s: &str| s.to_string())
}

/// Quoted string with backslash escapes
fn quoted<'src>() -> impl Parser<'src, &'src str, String, extra::Err<Rich<'src, char>>> + Clone {
    let escape = just('\\').ignore_then(any());
    just('"')
        .ignore_then(escape.or(none_of("\\\"")).repeated().collect::<String>())
        .then_ignore(just('"'))
}

/// Attribute list: `[label = "GET /index.html", color = red]`
fn attr_list<'src>(
) -> impl Parser<'src, &'src str, Vec<(String, String)>, extra::Err<Rich<'src, char>>> + Clone {
    let value = quoted().or(identifier());
    let attr = identifier()
        .then_ignore(just('=').padded_by(ws()))
        .then(value);
    attr.separated_by(just(',').padded_by(ws()))
        .at_least(1)
        .collect()
        .delimited_by(just('[').then(ws()), ws().then(just(']')))
}

/// Arrow operators, longest first so `-->` is not read as `--` `>`
fn arrow<'src>(
) -> impl Parser<'src, &'src str, (ArrowDir, LineStyle), extra::Err<Rich<'src, char>>> + Clone {
    choice((
        just("-->").to((ArrowDir::Forward, LineStyle::Dotted)),
        just("<--").to((ArrowDir::Back, LineStyle::Dotted)),
        just("->").to((ArrowDir::Forward, LineStyle::Solid)),
        just("<-").to((ArrowDir::Back, LineStyle::Solid)),
    ))
}

/// A statement: actor declaration or exchange chain, then `;`
fn statement<'src>() -> impl Parser<'src, &'src str, Stmt, extra::Err<Rich<'src, char>>> + Clone {
    identifier()
        .then(
            arrow()
                .padded_by(ws())
                .then(identifier())
                .repeated()
                .collect::<Vec<_>>(),
        )
        .then(attr_list().padded_by(ws()).or_not())
        .map(|((first, rest), attrs)| {
            let attrs = attrs.unwrap_or_default();
            if rest.is_empty() {
                Stmt::Actor { id: first, attrs }
            } else {
                Stmt::Chain { first, rest, attrs }
            }
        })
}

/// The whole document: `diagram { ... }` or `seqdiag { ... }`
fn document<'src>() -> impl Parser<'src, &'src str, Vec<Stmt>, extra::Err<Rich<'src, char>>> + Clone
{
    let body = statement()
        .padded_by(ws())
        .then_ignore(just(';'))
        .repeated()
        .collect::<Vec<_>>();

    ws().ignore_then(just("seqdiag").or(just("diagram")))
        .ignore_then(ws())
        .ignore_then(just('{'))
        .ignore_then(body)
        .then_ignore(ws())
        .then_ignore(just('}'))
        .then_ignore(ws())
        .then_ignore(end())
}

/// Byte offset to 1-based (line, column)
fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

fn label_of(attrs: &[(String, String)]) -> Option<String> {
    // Only `label` is interpreted; other keys are accepted and ignored,
    // matching seqdiag's tolerance for styling attributes.
    attrs
        .iter()
        .find(|(key, _)| key == "label")
        .map(|(_, value)| value.clone())
}

fn build(statements: Vec<Stmt>) -> CompiledDiagram {
    let mut diagram = CompiledDiagram::new();

    for stmt in statements {
        match stmt {
            Stmt::Actor { id, attrs } => {
                let actor = match label_of(&attrs) {
                    Some(label) => Actor::with_label(id, label),
                    None => Actor::new(id),
                };
                diagram.add_actor(actor);
            }
            Stmt::Chain { first, rest, attrs } => {
                let label = label_of(&attrs);
                let mut left = first;
                for ((dir, line), right) in rest {
                    let (from, to) = match dir {
                        ArrowDir::Forward => (left.clone(), right.clone()),
                        ArrowDir::Back => (right.clone(), left.clone()),
                    };
                    let mut exchange = Exchange::new(from, to).with_line(line);
                    if let Some(label) = &label {
                        exchange = exchange.with_label(label.clone());
                    }
                    diagram.add_exchange(exchange);
                    left = right;
                }
            }
        }
    }

    diagram
}

/// Compile diagram source into its intermediate representation
///
/// Pure transformation: no side effects, and on failure the previous state
/// of the caller is untouched.
pub fn compile(source: &str) -> Result<CompiledDiagram, DiagramError> {
    let statements = document()
        .parse(source)
        .into_result()
        .map_err(|errors| match errors.into_iter().next() {
            Some(error) => {
                let (line, column) = line_col(source, error.span().start);
                DiagramError::parse(error.to_string(), line, column)
            }
            None => DiagramError::parse("invalid diagram source", 1, 1),
        })?;

    let diagram = build(statements);
    debug!(
        actors = diagram.actor_count(),
        exchanges = diagram.exchange_count(),
        "compiled diagram source"
    );
    Ok(diagram)
}
