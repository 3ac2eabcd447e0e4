//! Solution modifiers: GROUP BY, HAVING, ORDER BY, LIMIT, OFFSET.

use crate::ast::{
    GroupByClause, GroupCondition, HavingClause, LimitClause, OffsetClause, OrderByClause,
    OrderCondition, OrderDirection, SolutionModifiers,
};
use crate::diag::DiagCode;
use crate::lex::TokenKind;
use crate::parse::query::Parser;

impl Parser {
    pub(crate) fn parse_solution_modifiers(&mut self) -> SolutionModifiers {
        let mut modifiers = SolutionModifiers::default();

        if self.stream.check(&TokenKind::KwGroup) {
            modifiers.group_by = self.parse_group_by();
        }
        if self.stream.check(&TokenKind::KwHaving) {
            modifiers.having = self.parse_having();
        }
        if self.stream.check(&TokenKind::KwOrder) {
            modifiers.order_by = self.parse_order_by();
        }
        // LIMIT and OFFSET may come in either order
        loop {
            if self.stream.check(&TokenKind::KwLimit) && modifiers.limit.is_none() {
                modifiers.limit = self.parse_limit();
            } else if self.stream.check(&TokenKind::KwOffset) && modifiers.offset.is_none() {
                modifiers.offset = self.parse_offset();
            } else {
                break;
            }
        }

        modifiers
    }

    fn parse_group_by(&mut self) -> Option<GroupByClause> {
        let kw = self.stream.advance();
        self.stream.expect(&TokenKind::KwBy, "`BY` after GROUP")?;
        let mut conditions = Vec::new();
        loop {
            match self.stream.peek_kind() {
                TokenKind::Var(_) => {
                    conditions.push(GroupCondition::Var(self.stream.consume_var()?));
                }
                TokenKind::LParen => {
                    let open = self.stream.advance();
                    let expr = self.parse_expression()?;
                    let alias = if self.stream.match_token(&TokenKind::KwAs) {
                        Some(self.stream.consume_var()?)
                    } else {
                        None
                    };
                    let close = self
                        .stream
                        .expect(&TokenKind::RParen, "`)` to close the group condition")?;
                    conditions.push(GroupCondition::Expr {
                        expr,
                        alias,
                        span: open.span.union(close.span),
                    });
                }
                TokenKind::Builtin(_) => {
                    let expr = self.parse_builtin_call()?;
                    let span = expr.span();
                    conditions.push(GroupCondition::Expr {
                        expr,
                        alias: None,
                        span,
                    });
                }
                _ => break,
            }
        }
        if conditions.is_empty() {
            self.stream
                .error_expected("at least one grouping condition");
            return None;
        }
        let span = kw.span.union(self.stream.previous_span());
        Some(GroupByClause { conditions, span })
    }

    fn parse_having(&mut self) -> Option<HavingClause> {
        let kw = self.stream.advance();
        let mut constraints = Vec::new();
        while self.is_constraint_start() {
            constraints.push(self.parse_constraint()?);
        }
        if constraints.is_empty() {
            self.stream.error_expected("a HAVING constraint");
            return None;
        }
        let span = kw.span.union(self.stream.previous_span());
        Some(HavingClause { constraints, span })
    }

    fn parse_order_by(&mut self) -> Option<OrderByClause> {
        let kw = self.stream.advance();
        self.stream.expect(&TokenKind::KwBy, "`BY` after ORDER")?;
        let mut conditions = Vec::new();
        loop {
            let start = self.stream.current_span();
            match self.stream.peek_kind() {
                TokenKind::KwAsc | TokenKind::KwDesc => {
                    let direction = if self.stream.check(&TokenKind::KwAsc) {
                        OrderDirection::Asc
                    } else {
                        OrderDirection::Desc
                    };
                    self.stream.advance();
                    self.stream
                        .expect(&TokenKind::LParen, "`(` after the sort direction")?;
                    let expr = self.parse_expression()?;
                    self.stream
                        .expect(&TokenKind::RParen, "`)` to close the sort condition")?;
                    conditions.push(OrderCondition {
                        direction: Some(direction),
                        expr,
                        span: start.union(self.stream.previous_span()),
                    });
                }
                TokenKind::Var(_) => {
                    let var = self.stream.consume_var()?;
                    let span = var.span;
                    conditions.push(OrderCondition {
                        direction: None,
                        expr: crate::ast::Expression::Var(var),
                        span,
                    });
                }
                TokenKind::LParen | TokenKind::Builtin(_) => {
                    let expr = self.parse_constraint()?;
                    let span = expr.span();
                    conditions.push(OrderCondition {
                        direction: None,
                        expr,
                        span,
                    });
                }
                _ => break,
            }
        }
        if conditions.is_empty() {
            self.stream.error_expected("an ORDER BY condition");
            return None;
        }
        let span = kw.span.union(self.stream.previous_span());
        Some(OrderByClause { conditions, span })
    }

    fn parse_limit(&mut self) -> Option<LimitClause> {
        let kw = self.stream.advance();
        if self.stream.check(&TokenKind::Minus) {
            let minus = self.stream.advance();
            let value_span = self.stream.current_span();
            self.stream.advance();
            self.stream.error_at(
                minus.span.union(value_span),
                DiagCode::NegativeLimit,
                "LIMIT must be a non-negative integer",
            );
            return None;
        }
        let (value, value_span) = self.stream.consume_integer()?;
        Some(LimitClause {
            value: value as u64,
            span: kw.span.union(value_span),
        })
    }

    fn parse_offset(&mut self) -> Option<OffsetClause> {
        let kw = self.stream.advance();
        if self.stream.check(&TokenKind::Minus) {
            let minus = self.stream.advance();
            let value_span = self.stream.current_span();
            self.stream.advance();
            self.stream.error_at(
                minus.span.union(value_span),
                DiagCode::NegativeLimit,
                "OFFSET must be a non-negative integer",
            );
            return None;
        }
        let (value, value_span) = self.stream.consume_integer()?;
        Some(OffsetClause {
            value: value as u64,
            span: kw.span.union(value_span),
        })
    }
}
