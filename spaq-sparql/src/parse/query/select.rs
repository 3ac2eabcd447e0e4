//! SELECT queries and projection clauses.

use crate::ast::{
    SelectClause, SelectModifier, SelectQuery, SelectVariable, SelectVariables,
};
use crate::lex::TokenKind;
use crate::parse::query::Parser;

impl Parser {
    pub(crate) fn parse_select_query(&mut self) -> Option<SelectQuery> {
        let select = self.parse_select_clause()?;
        let datasets = self.parse_dataset_clauses();
        let where_clause = self.parse_where_clause()?;
        let modifiers = self.parse_solution_modifiers();
        let span = select.span.union(self.stream.previous_span());
        Some(SelectQuery {
            select,
            datasets,
            where_clause,
            modifiers,
            span,
        })
    }

    fn parse_select_clause(&mut self) -> Option<SelectClause> {
        let kw = self.stream.advance();
        let modifier = if self.stream.match_token(&TokenKind::KwDistinct) {
            Some(SelectModifier::Distinct)
        } else if self.stream.match_token(&TokenKind::KwReduced) {
            Some(SelectModifier::Reduced)
        } else {
            None
        };

        let variables = if self.stream.match_token(&TokenKind::Star) {
            SelectVariables::Star
        } else {
            let mut items = Vec::new();
            loop {
                match self.stream.peek_kind() {
                    TokenKind::Var(_) => {
                        items.push(SelectVariable::Var(self.stream.consume_var()?));
                    }
                    TokenKind::LParen => {
                        items.push(self.parse_projection_expr()?);
                    }
                    _ => break,
                }
            }
            if items.is_empty() {
                self.stream
                    .error_expected("`*`, a variable, or `(expression AS ?var)`");
                return None;
            }
            SelectVariables::Explicit(items)
        };

        let span = kw.span.union(self.stream.previous_span());
        Some(SelectClause {
            modifier,
            variables,
            span,
        })
    }

    /// `(expr AS ?alias)` in a projection list.
    fn parse_projection_expr(&mut self) -> Option<SelectVariable> {
        let open = self.stream.advance();
        let expr = self.parse_expression()?;
        self.stream
            .expect(&TokenKind::KwAs, "`AS` after the projected expression")?;
        let alias = self.stream.consume_var()?;
        let close = self
            .stream
            .expect(&TokenKind::RParen, "`)` to close the projection")?;
        Some(SelectVariable::Expr {
            expr,
            alias,
            span: open.span.union(close.span),
        })
    }
}
