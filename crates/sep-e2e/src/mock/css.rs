//! CSS selector engine for the mock DOM.
//!
//! Supports the subset page objects use: type, `#id`, `.class`, attribute
//! conditions (`[a]`, `=`, `*=`, `^=`, `$=`, `~=`), `:nth-child(n)`,
//! `:first-child`, `:last-child`, `:checked`, `:disabled`, `:not(...)`,
//! descendant and child combinators, and selector groups.

use super::dom::{MockDom, NodeId};
use crate::result::{E2eError, E2eResult};
use regex::Regex;
use std::sync::OnceLock;

fn ident_pattern() -> &'static Regex {
    static IDENT: OnceLock<Regex> = OnceLock::new();
    IDENT.get_or_init(|| Regex::new(r"^-?[_a-zA-Z][_a-zA-Z0-9-]*").expect("valid identifier regex"))
}

/// Parsed selector group list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssSelector {
    source: String,
    groups: Vec<Complex>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    /// Compounds from left to right; the combinator joins a compound to the
    /// one on its left.
    parts: Vec<(Combinator, Compound)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrCond>,
    pseudos: Vec<Pseudo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrCond {
    name: String,
    op: AttrOp,
    value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals,
    Contains,
    Prefix,
    Suffix,
    Word,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pseudo {
    NthChild(usize),
    FirstChild,
    LastChild,
    Checked,
    Disabled,
    Not(Box<Compound>),
}

impl CssSelector {
    /// Parse a selector
    pub fn parse(source: &str) -> E2eResult<Self> {
        let groups = split_top_level(source, ',')
            .iter()
            .map(|group| parse_complex(source, group.trim()))
            .collect::<E2eResult<Vec<_>>>()?;
        Ok(Self {
            source: source.to_string(),
            groups,
        })
    }

    /// Original selector text
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether `node` matches any group
    #[must_use]
    pub fn matches(&self, dom: &MockDom, node: NodeId) -> bool {
        self.groups
            .iter()
            .any(|complex| match_from(dom, node, &complex.parts))
    }
}

fn invalid(source: &str, message: impl Into<String>) -> E2eError {
    E2eError::InvalidSelector {
        selector: source.to_string(),
        message: message.into(),
    }
}

/// Split on `sep` outside brackets, parentheses and quotes
fn split_top_level(input: &str, sep: char) -> Vec<String> {
    let mut out = Vec::new();
    let mut depth = 0_i32;
    let mut quote: Option<char> = None;
    let mut current = String::new();
    for c in input.chars() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[' | '(') => depth += 1,
            (None, ']' | ')') => depth -= 1,
            (None, _) if c == sep && depth == 0 => {
                out.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    out.push(current);
    out
}

fn parse_complex(source: &str, group: &str) -> E2eResult<Complex> {
    if group.is_empty() {
        return Err(invalid(source, "empty selector"));
    }
    let mut parts = Vec::new();
    let mut rest = group;
    let mut combinator = Combinator::Descendant;
    loop {
        let trimmed = rest.trim_start();
        let had_space = trimmed.len() != rest.len();
        rest = trimmed;
        if rest.is_empty() {
            break;
        }
        if let Some(after) = rest.strip_prefix('>') {
            combinator = Combinator::Child;
            rest = after;
            continue;
        }
        if had_space && parts.is_empty() {
            combinator = Combinator::Descendant;
        }
        let (compound, remaining) = parse_compound(source, rest)?;
        parts.push((combinator, compound));
        combinator = Combinator::Descendant;
        rest = remaining;
    }
    if parts.is_empty() {
        return Err(invalid(source, "no compound selector"));
    }
    Ok(Complex { parts })
}

fn take_ident<'a>(source: &str, input: &'a str) -> E2eResult<(String, &'a str)> {
    let found = ident_pattern()
        .find(input)
        .ok_or_else(|| invalid(source, format!("expected identifier at {input:?}")))?;
    Ok((found.as_str().to_string(), &input[found.end()..]))
}

fn parse_compound<'a>(source: &str, input: &'a str) -> E2eResult<(Compound, &'a str)> {
    let mut compound = Compound::default();
    let mut rest = input;

    if let Some(after) = rest.strip_prefix('*') {
        rest = after;
    } else if ident_pattern().is_match(rest) {
        let (tag, after) = take_ident(source, rest)?;
        compound.tag = Some(tag.to_ascii_lowercase());
        rest = after;
    }

    loop {
        match rest.chars().next() {
            Some('#') => {
                let (id, after) = take_ident(source, &rest[1..])?;
                compound.id = Some(id);
                rest = after;
            }
            Some('.') => {
                let (class, after) = take_ident(source, &rest[1..])?;
                compound.classes.push(class);
                rest = after;
            }
            Some('[') => {
                let end = rest
                    .find(']')
                    .ok_or_else(|| invalid(source, "unterminated attribute selector"))?;
                compound.attrs.push(parse_attr(source, &rest[1..end])?);
                rest = &rest[end + 1..];
            }
            Some(':') => {
                let (pseudo, after) = parse_pseudo(source, &rest[1..])?;
                compound.pseudos.push(pseudo);
                rest = after;
            }
            _ => break,
        }
    }

    if rest.len() == input.len() {
        return Err(invalid(source, format!("unexpected input at {input:?}")));
    }
    Ok((compound, rest))
}

fn parse_attr(source: &str, body: &str) -> E2eResult<AttrCond> {
    let ops = [
        ("*=", AttrOp::Contains),
        ("^=", AttrOp::Prefix),
        ("$=", AttrOp::Suffix),
        ("~=", AttrOp::Word),
        ("=", AttrOp::Equals),
    ];
    for (token, op) in ops {
        if let Some((name, value)) = body.split_once(token) {
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            return Ok(AttrCond {
                name: name.trim().to_string(),
                op,
                value: value.to_string(),
            });
        }
    }
    let name = body.trim();
    if name.is_empty() {
        return Err(invalid(source, "empty attribute selector"));
    }
    Ok(AttrCond {
        name: name.to_string(),
        op: AttrOp::Exists,
        value: String::new(),
    })
}

fn parse_pseudo<'a>(source: &str, input: &'a str) -> E2eResult<(Pseudo, &'a str)> {
    let (name, rest) = take_ident(source, input)?;
    let (arg, rest) = if let Some(after) = rest.strip_prefix('(') {
        let end = matching_paren(after).ok_or_else(|| invalid(source, "unterminated pseudo"))?;
        (Some(after[..end].trim()), &after[end + 1..])
    } else {
        (None, rest)
    };
    let pseudo = match (name.as_str(), arg) {
        ("nth-child", Some(n)) => Pseudo::NthChild(
            n.parse()
                .map_err(|_| invalid(source, format!("unsupported nth-child argument {n:?}")))?,
        ),
        ("first-child", None) => Pseudo::FirstChild,
        ("last-child", None) => Pseudo::LastChild,
        ("checked", None) => Pseudo::Checked,
        ("disabled", None) => Pseudo::Disabled,
        ("not", Some(inner)) => {
            let (compound, remaining) = parse_compound(source, inner)?;
            if !remaining.trim().is_empty() {
                return Err(invalid(source, ":not() accepts a single compound"));
            }
            Pseudo::Not(Box::new(compound))
        }
        (other, _) => return Err(invalid(source, format!("unsupported pseudo-class :{other}"))),
    };
    Ok((pseudo, rest))
}

fn matching_paren(input: &str) -> Option<usize> {
    let mut depth = 0_i32;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return Some(i),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}

fn match_from(dom: &MockDom, node: NodeId, parts: &[(Combinator, Compound)]) -> bool {
    let Some(((combinator, compound), left)) = parts.split_last() else {
        return true;
    };
    if !compound_matches(dom, node, compound) {
        return false;
    }
    if left.is_empty() {
        return true;
    }
    match combinator {
        Combinator::Child => dom
            .parent(node)
            .is_some_and(|parent| match_from(dom, parent, left)),
        Combinator::Descendant => {
            let mut current = dom.parent(node);
            while let Some(ancestor) = current {
                if match_from(dom, ancestor, left) {
                    return true;
                }
                current = dom.parent(ancestor);
            }
            false
        }
    }
}

fn compound_matches(dom: &MockDom, node: NodeId, compound: &Compound) -> bool {
    if let Some(tag) = &compound.tag {
        if dom.tag(node) != Some(tag.as_str()) {
            return false;
        }
    }
    if let Some(id) = &compound.id {
        if dom.attr(node, "id") != Some(id.as_str()) {
            return false;
        }
    }
    if !compound.classes.iter().all(|c| dom.has_class(node, c)) {
        return false;
    }
    if !compound.attrs.iter().all(|cond| attr_matches(dom, node, cond)) {
        return false;
    }
    compound.pseudos.iter().all(|pseudo| match pseudo {
        Pseudo::NthChild(n) => dom.child_position(node) == Some(*n),
        Pseudo::FirstChild => dom.child_position(node) == Some(1),
        Pseudo::LastChild => dom
            .parent(node)
            .is_some_and(|p| dom.children(p).last() == Some(&node)),
        Pseudo::Checked => dom.is_selected(node),
        Pseudo::Disabled => !dom.is_enabled(node),
        Pseudo::Not(inner) => !compound_matches(dom, node, inner),
    })
}

fn attr_matches(dom: &MockDom, node: NodeId, cond: &AttrCond) -> bool {
    let Some(actual) = dom.attr(node, &cond.name) else {
        return false;
    };
    match cond.op {
        AttrOp::Exists => true,
        AttrOp::Equals => actual == cond.value,
        AttrOp::Contains => actual.contains(cond.value.as_str()),
        AttrOp::Prefix => actual.starts_with(cond.value.as_str()),
        AttrOp::Suffix => actual.ends_with(cond.value.as_str()),
        AttrOp::Word => actual.split_whitespace().any(|w| w == cond.value),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mock::dom::MockNode;

    fn dom() -> MockDom {
        let mut dom = MockDom::new();
        let root = dom.root();
        dom.append(
            root,
            MockNode::new("div")
                .class("select2-results")
                .child(
                    MockNode::new("ul")
                        .class("select2-results__options")
                        .child(
                            MockNode::new("li")
                                .class("select2-results__option")
                                .child(MockNode::new("span").attr("data-value", "anyObject").text("Any Object")),
                        )
                        .child(
                            MockNode::new("li")
                                .class("select2-results__option")
                                .attr("aria-disabled", "true")
                                .child(MockNode::new("span").attr("data-value", "emf:Case").text("Case")),
                        ),
                ),
        );
        dom.append(
            root,
            MockNode::new("input")
                .attr("type", "radio")
                .attr("value", "COL1")
                .checked(),
        );
        dom
    }

    fn count(dom: &MockDom, css: &str) -> usize {
        dom.select(css).unwrap().len()
    }

    mod parse_tests {
        use super::*;

        #[test]
        fn test_parse_groups() {
            let sel = CssSelector::parse("a, .b > c").unwrap();
            assert_eq!(sel.groups.len(), 2);
            assert_eq!(sel.groups[1].parts.len(), 2);
            assert_eq!(sel.groups[1].parts[1].0, Combinator::Child);
        }

        #[test]
        fn test_parse_errors() {
            assert!(CssSelector::parse("").is_err());
            assert!(CssSelector::parse("div[").is_err());
            assert!(CssSelector::parse("li:hover").is_err());
            assert!(CssSelector::parse("li:nth-child(2n+1)").is_err());
        }

        #[test]
        fn test_attribute_with_quotes_and_commas() {
            let sel = CssSelector::parse("[title=\"a, b\"]").unwrap();
            assert_eq!(sel.groups.len(), 1);
        }
    }

    mod match_tests {
        use super::*;

        #[test]
        fn test_descendant_and_child() {
            let dom = dom();
            assert_eq!(count(&dom, ".select2-results li"), 2);
            assert_eq!(count(&dom, ".select2-results > li"), 0);
            assert_eq!(count(&dom, "ul > li > span"), 2);
        }

        #[test]
        fn test_attribute_operators() {
            let dom = dom();
            assert_eq!(count(&dom, "span[data-value='emf:Case']"), 1);
            assert_eq!(count(&dom, "span[data-value^=emf]"), 1);
            assert_eq!(count(&dom, "span[data-value*=Object]"), 1);
            assert_eq!(count(&dom, "li[aria-disabled]"), 1);
        }

        #[test]
        fn test_pseudo_classes() {
            let dom = dom();
            assert_eq!(count(&dom, "li:nth-child(2) span"), 1);
            assert_eq!(count(&dom, "li:first-child"), 1);
            assert_eq!(count(&dom, "li:last-child[aria-disabled]"), 1);
            assert_eq!(count(&dom, "[type=radio]:checked"), 1);
            assert_eq!(count(&dom, "li:not([aria-disabled])"), 1);
        }

        #[test]
        fn test_groups_in_document_order() {
            let dom = dom();
            let ids = dom.select("input, span").unwrap();
            assert_eq!(ids.len(), 3);
            assert_eq!(dom.tag(ids[2]), Some("input"));
        }
    }
}
