use winnow::ascii::till_line_ending;
use winnow::combinator::{alt, cut_err, delimited, opt, peek, preceded, repeat, separated};
use winnow::error::{AddContext, ContextError, ErrMode, ModalResult, ParserError, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::stream::{LocatingSlice, Stateful, Stream};
use winnow::token::{any, take_while};

use super::error::LineIndex;
use crate::tree::{NodeKind, SyntaxNode};

/// The grammar's input: a span-tracking slice plus the line index used to
/// turn byte offsets into line/column locations on leaf nodes.
pub(super) type Input<'i> = Stateful<LocatingSlice<&'i str>, LineIndex>;

fn ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

// -- Whitespace & comments --------------------------------------------------

fn ws(input: &mut Input<'_>) -> ModalResult<()> {
    let _: () = repeat(
        0..,
        alt((
            take_while(1.., |c: char| c.is_ascii_whitespace()).void(),
            ('%', till_line_ending).void(),
            ("//", till_line_ending).void(),
        )),
    )
    .parse_next(input)?;
    Ok(())
}

// -- Tokens -----------------------------------------------------------------

fn ident(input: &mut Input<'_>) -> ModalResult<SyntaxNode> {
    let (text, span) = (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., ident_char),
    )
        .take()
        .with_span()
        .parse_next(input)?;
    let loc = input.state.locate(span.start);
    Ok(SyntaxNode::leaf(NodeKind::Token, text, Some(loc)))
}

// -- Terms ------------------------------------------------------------------

fn string_obj(input: &mut Input<'_>) -> ModalResult<SyntaxNode> {
    // The quotes stay in the token text; the tree-to-AST builder strips them.
    let (text, span) = ('"', cut_err((take_while(0.., |c: char| c != '"'), '"')))
        .take()
        .with_span()
        .context(StrContext::Expected(StrContextValue::Description(
            "string constant",
        )))
        .parse_next(input)?;
    let loc = input.state.locate(span.start);
    Ok(SyntaxNode::wrap(
        NodeKind::StringObj,
        SyntaxNode::leaf(NodeKind::Token, text, Some(loc)),
    ))
}

fn float_obj(input: &mut Input<'_>) -> ModalResult<SyntaxNode> {
    // Only matches literals containing a decimal point.
    let (text, span) = (
        opt('-'),
        take_while(1.., |c: char| c.is_ascii_digit()),
        '.',
        take_while(1.., |c: char| c.is_ascii_digit()),
    )
        .take()
        .with_span()
        .parse_next(input)?;
    let loc = input.state.locate(span.start);
    Ok(SyntaxNode::wrap(
        NodeKind::FloatObj,
        SyntaxNode::leaf(NodeKind::Token, text, Some(loc)),
    ))
}

fn integer_obj(input: &mut Input<'_>) -> ModalResult<SyntaxNode> {
    let start = input.checkpoint();
    let (text, span) = (opt('-'), take_while(1.., |c: char| c.is_ascii_digit()))
        .take()
        .with_span()
        .parse_next(input)?;
    // Digits are committed at this point; no other term production can
    // match them, so an unrepresentable value is rejected here instead of
    // reaching the tree builder as a leaf it cannot convert.
    if text.parse::<i64>().is_err() {
        input.reset(&start);
        return Err(ErrMode::Cut(ContextError::from_input(input).add_context(
            input,
            &start,
            StrContext::Expected(StrContextValue::Description(
                "integer representable in 64 bits",
            )),
        )));
    }
    let loc = input.state.locate(span.start);
    Ok(SyntaxNode::wrap(
        NodeKind::IntegerObj,
        SyntaxNode::leaf(NodeKind::Token, text, Some(loc)),
    ))
}

fn variable(input: &mut Input<'_>) -> ModalResult<SyntaxNode> {
    let token = ident.parse_next(input)?;
    Ok(SyntaxNode::wrap(NodeKind::Variable, token))
}

fn term(input: &mut Input<'_>) -> ModalResult<SyntaxNode> {
    ws.parse_next(input)?;
    alt((string_obj, float_obj, integer_obj, variable))
        .context(StrContext::Expected(StrContextValue::Description("term")))
        .parse_next(input)
}

// -- Atoms & literals -------------------------------------------------------

fn structured_name(input: &mut Input<'_>) -> ModalResult<SyntaxNode> {
    let first = ident.parse_next(input)?;
    let rest: Vec<SyntaxNode> = repeat(0.., preceded(':', ident)).parse_next(input)?;
    let mut children = vec![first];
    children.extend(rest);
    Ok(SyntaxNode::interior(NodeKind::StructuredName, children))
}

fn atom(input: &mut Input<'_>) -> ModalResult<SyntaxNode> {
    ws.parse_next(input)?;
    let name = structured_name
        .context(StrContext::Expected(StrContextValue::Description(
            "predicate name",
        )))
        .parse_next(input)?;
    let args: Option<Vec<SyntaxNode>> = opt(delimited(
        '(',
        separated(0.., term, (ws, ',')),
        (ws, cut_err(')')),
    ))
    .parse_next(input)?;
    let mut children = vec![name];
    children.extend(args.unwrap_or_default());
    Ok(SyntaxNode::interior(NodeKind::Atom, children))
}

fn not_kw(input: &mut Input<'_>) -> ModalResult<()> {
    // "not" is only a keyword when followed by whitespace; "notify(x)" is
    // an ordinary atom.
    ("not", peek(any.verify(|c: &char| c.is_ascii_whitespace())))
        .void()
        .parse_next(input)
}

fn literal(input: &mut Input<'_>) -> ModalResult<SyntaxNode> {
    ws.parse_next(input)?;
    if opt(not_kw).parse_next(input)?.is_some() {
        let inner = cut_err(atom).parse_next(input)?;
        Ok(SyntaxNode::wrap(NodeKind::Not, inner))
    } else {
        atom(input)
    }
}

// -- Statements -------------------------------------------------------------

fn statement(input: &mut Input<'_>) -> ModalResult<SyntaxNode> {
    let head = atom(input)?;
    let body: Option<Vec<SyntaxNode>> = opt(preceded(
        (ws, ":-"),
        cut_err(separated(1.., literal, (ws, ','))),
    ))
    .parse_next(input)?;
    (
        ws,
        cut_err('.').context(StrContext::Expected(StrContextValue::CharLiteral('.'))),
    )
        .void()
        .parse_next(input)?;

    // A fact surfaces as a bare ATOM child of THEORY; only bodied
    // statements get a RULE node.
    match body {
        None => Ok(head),
        Some(literals) => {
            let mut children = vec![head];
            children.extend(literals);
            Ok(SyntaxNode::interior(NodeKind::Rule, children))
        }
    }
}

/// Top-level production: a sequence of statements. An empty program yields
/// the end-of-input marker alone.
pub(super) fn theory(input: &mut Input<'_>) -> ModalResult<SyntaxNode> {
    ws.parse_next(input)?;
    let statements: Vec<SyntaxNode> = repeat(0.., preceded(ws, statement)).parse_next(input)?;
    ws.parse_next(input)?;
    if statements.is_empty() {
        Ok(SyntaxNode::leaf(NodeKind::Eof, "<EOF>", None))
    } else {
        Ok(SyntaxNode::interior(NodeKind::Theory, statements))
    }
}
