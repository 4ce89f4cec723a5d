//! Reader for blocks-world problems in PDDL (AIPS-2000 layout).
//!
//! ```text
//! (define (problem BLOCKS-4-0)
//! (:domain BLOCKS)
//! (:objects D B A C)
//! (:INIT (CLEAR C) (CLEAR A) (CLEAR B) (CLEAR D) (ONTABLE C) (ONTABLE A)
//!  (ONTABLE B) (ONTABLE D) (HANDEMPTY))
//! (:goal (AND (ON D C) (ON C B) (ON B A)))
//! )
//! ```
//!
//! Keywords and block names are case-insensitive; blocks keep the spelling
//! used in `:objects`. `;` starts a comment running to the end of the line.

use std::path::Path;

use rustc_hash::FxHashMap;

use crate::blocks::Block;
use crate::error::{ParseError, Result};
use crate::problem::{Problem, Relations};

/// A parsed s-expression with the byte offset where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
    Atom(String, usize),
    List(Vec<Expr>, usize),
}

impl Expr {
    fn offset(&self) -> usize {
        match self {
            Expr::Atom(_, offset) | Expr::List(_, offset) => *offset,
        }
    }

    fn as_atom(&self) -> Option<&str> {
        match self {
            Expr::Atom(atom, _) => Some(atom),
            Expr::List(..) => None,
        }
    }

    /// Upper-cased head atom of a list.
    fn head(&self) -> Option<String> {
        match self {
            Expr::List(items, _) => items.first()?.as_atom().map(str::to_ascii_uppercase),
            Expr::Atom(..) => None,
        }
    }

    fn unexpected(&self) -> ParseError {
        let found = match self {
            Expr::Atom(atom, _) => atom.clone(),
            Expr::List(..) => "(".to_string(),
        };
        ParseError::UnexpectedToken {
            found,
            offset: self.offset(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Open,
    Close,
    Atom(&'a str),
}

fn tokenize(input: &str) -> Vec<(Token<'_>, usize)> {
    let mut tokens = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'(' => {
                tokens.push((Token::Open, i));
                i += 1;
            }
            b')' => {
                tokens.push((Token::Close, i));
                i += 1;
            }
            b';' => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b if b.is_ascii_whitespace() => i += 1,
            _ => {
                let start = i;
                while i < bytes.len()
                    && !bytes[i].is_ascii_whitespace()
                    && !matches!(bytes[i], b'(' | b')' | b';')
                {
                    i += 1;
                }
                tokens.push((Token::Atom(&input[start..i]), start));
            }
        }
    }

    tokens
}

/// Parses one expression starting at `tokens[*position]`.
fn parse_expr(
    tokens: &[(Token<'_>, usize)],
    position: &mut usize,
) -> std::result::Result<Expr, ParseError> {
    let &(token, offset) = tokens.get(*position).ok_or(ParseError::UnexpectedEnd)?;
    *position += 1;

    match token {
        Token::Atom(atom) => Ok(Expr::Atom(atom.to_string(), offset)),
        Token::Close => Err(ParseError::UnexpectedToken {
            found: ")".to_string(),
            offset,
        }),
        Token::Open => {
            let mut items = Vec::new();
            loop {
                match tokens.get(*position) {
                    None => return Err(ParseError::UnexpectedEnd),
                    Some((Token::Close, _)) => {
                        *position += 1;
                        return Ok(Expr::List(items, offset));
                    }
                    Some(_) => items.push(parse_expr(tokens, position)?),
                }
            }
        }
    }
}

/// Block catalogue keyed by upper-cased name.
struct Catalogue {
    blocks: Vec<Block>,
    by_name: FxHashMap<String, Block>,
}

impl Catalogue {
    fn from_objects(items: &[Expr]) -> std::result::Result<Self, ParseError> {
        let mut blocks = Vec::new();
        let mut by_name = FxHashMap::default();
        let mut items = items.iter();

        while let Some(item) = items.next() {
            let name = item.as_atom().ok_or_else(|| item.unexpected())?;
            if name == "-" {
                // typed object list: skip the type name
                items.next();
                continue;
            }
            let block = Block::new(name);
            if by_name.insert(name.to_ascii_uppercase(), block.clone()).is_some() {
                return Err(ParseError::DuplicateObject(name.to_string()));
            }
            blocks.push(block);
        }

        Ok(Self { blocks, by_name })
    }

    fn lookup(&self, expr: &Expr) -> std::result::Result<Block, ParseError> {
        let name = expr.as_atom().ok_or_else(|| expr.unexpected())?;
        self.by_name
            .get(&name.to_ascii_uppercase())
            .cloned()
            .ok_or_else(|| ParseError::UnknownBlock(name.to_string()))
    }
}

/// Collects predicate facts, descending through `AND`.
fn collect_relations(
    facts: &[Expr],
    catalogue: &Catalogue,
    relations: &mut Relations,
) -> std::result::Result<(), ParseError> {
    for fact in facts {
        let Expr::List(items, _) = fact else {
            return Err(fact.unexpected());
        };
        let name = fact.head().ok_or_else(|| fact.unexpected())?;
        let arguments = &items[1..];

        let expect = |expected: usize| {
            if arguments.len() == expected {
                Ok(())
            } else {
                Err(ParseError::Arity {
                    name: name.clone(),
                    expected,
                    found: arguments.len(),
                })
            }
        };

        match name.as_str() {
            "AND" => collect_relations(arguments, catalogue, relations)?,
            "ON" => {
                expect(2)?;
                relations
                    .on
                    .push((catalogue.lookup(&arguments[0])?, catalogue.lookup(&arguments[1])?));
            }
            "ONTABLE" => {
                expect(1)?;
                relations.on_table.push(catalogue.lookup(&arguments[0])?);
            }
            "CLEAR" => {
                expect(1)?;
                relations.clear.push(catalogue.lookup(&arguments[0])?);
            }
            "HANDEMPTY" => expect(0)?,
            _ => return Err(ParseError::UnknownPredicate(name.clone())),
        }
    }
    Ok(())
}

/// Parses a PDDL problem definition into a validated [`Problem`].
pub fn parse_problem(input: &str) -> Result<Problem> {
    let tokens = tokenize(input);
    let mut position = 0;
    let root = parse_expr(&tokens, &mut position)?;
    if let Some(&(_, offset)) = tokens.get(position) {
        return Err(ParseError::UnexpectedToken {
            found: input[offset..].chars().take(16).collect(),
            offset,
        }
        .into());
    }

    if root.head().as_deref() != Some("DEFINE") {
        return Err(root.unexpected().into());
    }
    let Expr::List(sections, _) = &root else {
        return Err(root.unexpected().into());
    };

    let section = |name: &'static str| {
        sections
            .iter()
            .find(|expr| expr.head().as_deref() == Some(name))
            .and_then(|expr| match expr {
                Expr::List(items, _) => Some(&items[1..]),
                Expr::Atom(..) => None,
            })
            .ok_or(ParseError::MissingSection(name))
    };

    let catalogue = Catalogue::from_objects(section(":OBJECTS")?)?;

    let mut initial = Relations::default();
    collect_relations(section(":INIT")?, &catalogue, &mut initial)?;

    let mut goal = Relations::default();
    collect_relations(section(":GOAL")?, &catalogue, &mut goal)?;

    Ok(Problem::from_relations(&catalogue.blocks, &initial, &goal)?)
}

/// Reads and parses a problem file.
pub fn read_problem(path: &Path) -> Result<Problem> {
    let input = std::fs::read_to_string(path)?;
    parse_problem(&input)
}
