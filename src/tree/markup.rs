//! Reads rendered equations back into trees.
//!
//! Accepts the subset of LaTeX that [`Node::to_latex_with`] emits: decimal
//! numbers, `+`, `-`, `\times`, parentheses, `\frac{..}{..}`, `\sin(..)` and
//! `\cos(..)`. Tokenizing is done with `nom`, the grammar itself is recursive
//! descent.

use log::debug;
use nom::{
    IResult,
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, digit1},
    combinator::{map, opt, recognize},
    error::{Error, ErrorKind},
    sequence::pair,
};

use crate::tree::ast::{Node, NodeKind};
use crate::tree::errors::TreeError;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(String),
    Plus,
    Minus,
    Times,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Frac,
    Sin,
    Cos,
}

fn command(input: &str) -> IResult<&str, Token> {
    let (rest, _) = char('\\')(input)?;
    let (rest, name) = take_while1(|c: char| c.is_ascii_alphabetic())(rest)?;
    let token = match name {
        "times" => Token::Times,
        "frac" => Token::Frac,
        "sin" => Token::Sin,
        "cos" => Token::Cos,
        _ => return Err(nom::Err::Error(Error::new(input, ErrorKind::Tag))),
    };
    Ok((rest, token))
}

fn number(input: &str) -> IResult<&str, Token> {
    map(recognize(pair(digit1, opt(pair(char('.'), digit1)))), |s: &str| {
        Token::Number(s.to_string())
    })(input)
}

fn symbol(input: &str) -> IResult<&str, Token> {
    alt((
        map(char('+'), |_| Token::Plus),
        map(char('-'), |_| Token::Minus),
        map(char('('), |_| Token::LParen),
        map(char(')'), |_| Token::RParen),
        map(char('{'), |_| Token::LBrace),
        map(char('}'), |_| Token::RBrace),
    ))(input)
}

fn tokenize(input: &str) -> Result<Vec<Token>, TreeError> {
    let mut tokens = Vec::new();
    let mut remaining = input.trim_start();

    while !remaining.is_empty() {
        match alt((command, number, symbol))(remaining) {
            Ok((rest, token)) => {
                tokens.push(token);
                remaining = rest.trim_start();
            }
            Err(_) => {
                return Err(TreeError::Tokenize(remaining.chars().take(20).collect()));
            }
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: &Token) -> Result<(), TreeError> {
        match self.advance() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(TreeError::UnexpectedToken(format!(
                "expected {:?}, got {:?}",
                expected, token
            ))),
            None => Err(TreeError::UnexpectedEnd),
        }
    }

    /// Sums and differences, left associative
    fn parse_expr(&mut self) -> Result<Node, TreeError> {
        let mut left = self.parse_term()?;

        loop {
            let make: fn(Box<Node>, Box<Node>) -> NodeKind = match self.peek() {
                Some(Token::Plus) => NodeKind::Add,
                Some(Token::Minus) => NodeKind::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = node(make(Box::new(left), Box::new(right)));
        }

        Ok(left)
    }

    /// Products, left associative
    fn parse_term(&mut self) -> Result<Node, TreeError> {
        let mut left = self.parse_atom()?;

        while let Some(Token::Times) = self.peek() {
            self.advance();
            let right = self.parse_atom()?;
            left = node(NodeKind::Mul(Box::new(left), Box::new(right)));
        }

        Ok(left)
    }

    fn parse_atom(&mut self) -> Result<Node, TreeError> {
        match self.advance().cloned() {
            Some(Token::Number(s)) => {
                let value = s
                    .parse::<f64>()
                    .map_err(|_| TreeError::InvalidNumber(s.clone()))?;
                Ok(node(NodeKind::Constant(Some(value))))
            }
            Some(Token::LParen) => {
                let inner = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Frac) => {
                let top = self.parse_braced()?;
                let bottom = self.parse_braced()?;
                Ok(node(NodeKind::Div(Box::new(top), Box::new(bottom))))
            }
            Some(Token::Sin) => {
                let arg = self.parse_call_argument()?;
                Ok(node(NodeKind::Sin(Box::new(arg))))
            }
            Some(Token::Cos) => {
                let arg = self.parse_call_argument()?;
                Ok(node(NodeKind::Cos(Box::new(arg))))
            }
            Some(token) => Err(TreeError::UnexpectedToken(format!("{:?}", token))),
            None => Err(TreeError::UnexpectedEnd),
        }
    }

    fn parse_braced(&mut self) -> Result<Node, TreeError> {
        self.expect(&Token::LBrace)?;
        let inner = self.parse_expr()?;
        self.expect(&Token::RBrace)?;
        Ok(inner)
    }

    fn parse_call_argument(&mut self) -> Result<Node, TreeError> {
        self.expect(&Token::LParen)?;
        let inner = self.parse_expr()?;
        self.expect(&Token::RParen)?;
        Ok(inner)
    }
}

fn node(kind: NodeKind) -> Node {
    Node { depth: 0, kind }
}

/// Parse rendered markup into a tree rooted at depth 1.
///
/// Sums and products are read left associative, so the resulting tree may be
/// shaped differently from the one that was rendered while evaluating to the
/// same value.
///
/// # Errors
///
/// Returns an error if the markup contains anything outside the rendered
/// grammar or is not a single complete expression.
pub fn parse(markup: &str) -> Result<Node, TreeError> {
    let tokens = tokenize(markup)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
    };

    let mut root = parser.parse_expr()?;
    if let Some(token) = parser.peek() {
        return Err(TreeError::UnexpectedToken(format!("{:?}", token)));
    }

    root.set_depths(1);
    debug!("Parsed '{}' into {} nodes", markup, root.node_count());
    Ok(root)
}
