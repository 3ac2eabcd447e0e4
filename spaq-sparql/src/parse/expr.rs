//! Expression parsing by precedence climbing.
//!
//! Precedence, loosest first: `||`, `&&`, comparisons (including IN),
//! additive, multiplicative, unary, primary.

use crate::ast::{BinaryOp, Expression, UnaryOp};
use crate::diag::DiagCode;
use crate::lex::TokenKind;
use crate::parse::query::Parser;
use crate::span::SourceSpan;

impl Parser {
    pub(crate) fn parse_expression(&mut self) -> Option<Expression> {
        self.parse_or()
    }

    /// FILTER / HAVING constraint: a parenthesized expression, a built-in
    /// call, EXISTS, or a custom function call.
    pub(crate) fn parse_constraint(&mut self) -> Option<Expression> {
        match self.stream.peek_kind() {
            TokenKind::LParen => self.parse_bracketed(),
            TokenKind::Builtin(_) => self.parse_builtin_call(),
            TokenKind::KwExists | TokenKind::KwNot => self.parse_exists(),
            TokenKind::Iri(_) | TokenKind::PrefixedName { .. } => {
                let name = self.stream.consume_iri()?;
                if !self.stream.check(&TokenKind::LParen) {
                    self.stream
                        .error_expected("`(` to start the function call");
                    return None;
                }
                let (args, close) = self.parse_arg_list()?;
                let span = name.span.union(close);
                Some(Expression::FunctionCall { name, args, span })
            }
            _ => {
                self.stream.error_expected(
                    "a constraint: `(...)`, a built-in call, or EXISTS",
                );
                None
            }
        }
    }

    pub(crate) fn is_constraint_start(&self) -> bool {
        matches!(
            self.stream.peek_kind(),
            TokenKind::LParen
                | TokenKind::Builtin(_)
                | TokenKind::KwExists
                | TokenKind::KwNot
                | TokenKind::Iri(_)
                | TokenKind::PrefixedName { .. }
        )
    }

    fn parse_or(&mut self) -> Option<Expression> {
        let mut left = self.parse_and()?;
        while self.stream.match_token(&TokenKind::OrOr) {
            let right = self.parse_and()?;
            left = binary(BinaryOp::Or, left, right);
        }
        Some(left)
    }

    fn parse_and(&mut self) -> Option<Expression> {
        let mut left = self.parse_relational()?;
        while self.stream.match_token(&TokenKind::AndAnd) {
            let right = self.parse_relational()?;
            left = binary(BinaryOp::And, left, right);
        }
        Some(left)
    }

    fn parse_relational(&mut self) -> Option<Expression> {
        let left = self.parse_additive()?;
        let op = match self.stream.peek_kind() {
            TokenKind::Eq => BinaryOp::Eq,
            TokenKind::Ne => BinaryOp::Ne,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::Le => BinaryOp::Le,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::Ge => BinaryOp::Ge,
            TokenKind::KwIn => {
                self.stream.advance();
                return self.parse_in_list(left, false);
            }
            TokenKind::KwNot if matches!(self.stream.peek_n(1).kind, TokenKind::KwIn) => {
                self.stream.advance();
                self.stream.advance();
                return self.parse_in_list(left, true);
            }
            _ => return Some(left),
        };
        self.stream.advance();
        let right = self.parse_additive()?;
        Some(binary(op, left, right))
    }

    fn parse_in_list(&mut self, expr: Expression, negated: bool) -> Option<Expression> {
        if !self.stream.check(&TokenKind::LParen) {
            self.stream.error_expected("`(` after IN");
            return None;
        }
        let (list, close) = self.parse_arg_list()?;
        let span = expr.span().union(close);
        Some(Expression::In {
            expr: Box::new(expr),
            list,
            negated,
            span,
        })
    }

    fn parse_additive(&mut self) -> Option<Expression> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.stream.peek_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.stream.advance();
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }
        Some(left)
    }

    fn parse_multiplicative(&mut self) -> Option<Expression> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.stream.peek_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.stream.advance();
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }
        Some(left)
    }

    fn parse_unary(&mut self) -> Option<Expression> {
        let op = match self.stream.peek_kind() {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Pos,
            _ => return self.parse_primary(),
        };
        let token = self.stream.advance();
        let operand = self.parse_unary()?;
        let span = token.span.union(operand.span());
        Some(Expression::Unary {
            op,
            operand: Box::new(operand),
            span,
        })
    }

    fn parse_primary(&mut self) -> Option<Expression> {
        match self.stream.peek_kind() {
            TokenKind::LParen => self.parse_bracketed(),
            TokenKind::Builtin(_) => self.parse_builtin_call(),
            TokenKind::Aggregate(_) => self.parse_aggregate(),
            TokenKind::KwExists | TokenKind::KwNot => self.parse_exists(),
            TokenKind::Var(_) => Some(Expression::Var(self.stream.consume_var()?)),
            TokenKind::String(_)
            | TokenKind::Integer(_)
            | TokenKind::Decimal(_)
            | TokenKind::Double(_)
            | TokenKind::KwTrue
            | TokenKind::KwFalse => self.parse_literal().map(Expression::Literal),
            TokenKind::Iri(_) | TokenKind::PrefixedName { .. } => {
                let name = self.stream.consume_iri()?;
                if self.stream.check(&TokenKind::LParen) {
                    let (args, close) = self.parse_arg_list()?;
                    let span = name.span.union(close);
                    Some(Expression::FunctionCall { name, args, span })
                } else {
                    Some(Expression::Iri(name))
                }
            }
            _ => {
                self.stream.error_expected("an expression");
                None
            }
        }
    }

    fn parse_bracketed(&mut self) -> Option<Expression> {
        let open = self.stream.advance();
        let inner = self.parse_expression()?;
        let close = self
            .stream
            .expect(&TokenKind::RParen, "`)` to close the expression")?;
        Some(Expression::Bracketed {
            inner: Box::new(inner),
            span: open.span.union(close.span),
        })
    }

    pub(crate) fn parse_builtin_call(&mut self) -> Option<Expression> {
        let func = match self.stream.peek_kind() {
            TokenKind::Builtin(f) => *f,
            _ => {
                self.stream.error_expected("a built-in function");
                return None;
            }
        };
        let name = self.stream.advance();
        if !self.stream.check(&TokenKind::LParen) {
            self.stream
                .error_expected(&format!("`(` after {}", func.as_str()));
            return None;
        }
        let (args, close) = self.parse_arg_list()?;
        Some(Expression::Builtin {
            func,
            args,
            span: name.span.union(close),
        })
    }

    fn parse_aggregate(&mut self) -> Option<Expression> {
        let func = match self.stream.peek_kind() {
            TokenKind::Aggregate(f) => *f,
            _ => {
                self.stream.error_expected("an aggregate");
                return None;
            }
        };
        let name = self.stream.advance();
        self.stream
            .expect(&TokenKind::LParen, "`(` after the aggregate name")?;
        let distinct = self.stream.match_token(&TokenKind::KwDistinct);
        let expr = if self.stream.check(&TokenKind::Star) {
            let star = self.stream.advance();
            if func != crate::lex::AggregateFn::Count {
                self.stream.error_at(
                    star.span,
                    DiagCode::UnexpectedToken,
                    "only COUNT accepts `*`",
                );
            }
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        let separator = if self.stream.match_token(&TokenKind::Semicolon) {
            self.stream
                .expect(&TokenKind::KwSeparator, "`SEPARATOR` after `;`")?;
            self.stream.expect(&TokenKind::Eq, "`=`")?;
            let (value, _) = self.stream.consume_string()?;
            Some(value)
        } else {
            None
        };
        let close = self
            .stream
            .expect(&TokenKind::RParen, "`)` to close the aggregate")?;
        Some(Expression::Aggregate {
            func,
            expr,
            distinct,
            separator,
            span: name.span.union(close.span),
        })
    }

    /// `EXISTS { ... }` or `NOT EXISTS { ... }`.
    fn parse_exists(&mut self) -> Option<Expression> {
        let start = self.stream.current_span();
        let negated = self.stream.match_token(&TokenKind::KwNot);
        self.stream
            .expect(&TokenKind::KwExists, "`EXISTS`")?;
        let pattern = self.parse_group_graph_pattern()?;
        let span = start.union(pattern.span());
        Some(Expression::Exists {
            pattern: Box::new(pattern),
            negated,
            span,
        })
    }

    /// `( expr, expr, ... )`, possibly empty. Returns the arguments and
    /// the span of the closing paren.
    fn parse_arg_list(&mut self) -> Option<(Vec<Expression>, SourceSpan)> {
        self.stream.expect(&TokenKind::LParen, "`(`")?;
        let mut args = Vec::new();
        if !self.stream.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.stream.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let close = self
            .stream
            .expect(&TokenKind::RParen, "`)` to close the argument list")?;
        Some((args, close.span))
    }
}

// Free helper so the binary-node construction stays in one place.
fn binary(op: BinaryOp, left: Expression, right: Expression) -> Expression {
    let span = left.span().union(right.span());
    Expression::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        span,
    }
}
