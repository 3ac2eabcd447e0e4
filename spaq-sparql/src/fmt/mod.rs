//! Canonical pretty-printing of parsed queries.
//!
//! The printer is deterministic: formatting the output of a format pass
//! reproduces it byte for byte. One triple per line, keywords uppercase,
//! groups braced and indented, LIMIT before OFFSET.

use crate::ast::{
    AskQuery, ConstructQuery, DatasetClause, DescribeQuery, DescribeTargets, Expression,
    GraphPattern, GroupCondition, Iri, IriValue, Literal, LiteralValue, OrderDirection,
    PredicateTerm, Prologue, Query, QueryBody, SelectModifier, SelectQuery, SelectVariable,
    SelectVariables, SolutionModifiers, Term, TriplePattern, VarOrIri,
};
use crate::ast::term::{BlankNode, BlankNodeValue};

/// Formatting knobs. Only the indent width is configurable.
#[derive(Clone, Copy, Debug)]
pub struct FormatOptions {
    pub indent: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

impl FormatOptions {
    /// Negative widths clamp to zero.
    pub fn new(indent: i64) -> Self {
        Self {
            indent: indent.max(0) as usize,
        }
    }
}

/// Render a parsed query as canonical text, ending in a newline.
pub fn format_query(query: &Query, options: &FormatOptions) -> String {
    let mut p = Printer {
        out: String::new(),
        unit: " ".repeat(options.indent),
        level: 0,
    };
    p.prologue(&query.prologue);
    match &query.body {
        QueryBody::Select(q) => p.select_query(q),
        QueryBody::Construct(q) => p.construct_query(q),
        QueryBody::Ask(q) => p.ask_query(q),
        QueryBody::Describe(q) => p.describe_query(q),
    }
    p.out
}

struct Printer {
    out: String,
    unit: String,
    level: usize,
}

impl Printer {
    fn line(&mut self, text: &str) {
        for _ in 0..self.level {
            self.out.push_str(&self.unit);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn prologue(&mut self, prologue: &Prologue) {
        if let Some(base) = &prologue.base {
            self.line(&format!("BASE <{}>", base.iri));
        }
        for decl in &prologue.prefixes {
            self.line(&format!("PREFIX {}: <{}>", decl.prefix, decl.iri));
        }
    }

    fn select_query(&mut self, query: &SelectQuery) {
        let head = select_head_str(query);
        self.line(&head);
        self.datasets(&query.datasets);
        self.where_block(&query.where_clause.pattern);
        self.modifiers(&query.modifiers);
    }

    fn construct_query(&mut self, query: &ConstructQuery) {
        self.line("CONSTRUCT {");
        self.level += 1;
        for triple in &query.template {
            let text = triple_str(triple);
            self.line(&text);
        }
        self.level -= 1;
        self.line("}");
        self.datasets(&query.datasets);
        self.where_block(&query.where_clause.pattern);
        self.modifiers(&query.modifiers);
    }

    fn ask_query(&mut self, query: &AskQuery) {
        self.line("ASK");
        self.datasets(&query.datasets);
        self.where_block(&query.where_clause.pattern);
        self.modifiers(&query.modifiers);
    }

    fn describe_query(&mut self, query: &DescribeQuery) {
        let mut head = String::from("DESCRIBE");
        match &query.targets {
            DescribeTargets::Star => head.push_str(" *"),
            DescribeTargets::Resources(resources) => {
                for r in resources {
                    head.push(' ');
                    head.push_str(&var_or_iri_str(r));
                }
            }
        }
        self.line(&head);
        self.datasets(&query.datasets);
        if let Some(where_clause) = &query.where_clause {
            self.where_block(&where_clause.pattern);
        }
        self.modifiers(&query.modifiers);
    }

    fn datasets(&mut self, datasets: &[DatasetClause]) {
        for ds in datasets {
            let text = if ds.named {
                format!("FROM NAMED {}", iri_str(&ds.iri))
            } else {
                format!("FROM {}", iri_str(&ds.iri))
            };
            self.line(&text);
        }
    }

    fn where_block(&mut self, pattern: &GraphPattern) {
        self.line("WHERE {");
        self.level += 1;
        self.group_contents(pattern);
        self.level -= 1;
        self.line("}");
    }

    /// Write the elements of a group without the surrounding braces.
    fn group_contents(&mut self, pattern: &GraphPattern) {
        match pattern {
            GraphPattern::Group { patterns, .. } => {
                for p in patterns {
                    self.element(p);
                }
            }
            other => self.element(other),
        }
    }

    /// Write one group element at the current level.
    fn element(&mut self, pattern: &GraphPattern) {
        match pattern {
            GraphPattern::Bgp { triples, .. } => {
                for triple in triples {
                    let text = triple_str(triple);
                    self.line(&text);
                }
            }
            GraphPattern::Group { .. } => {
                self.line("{");
                self.level += 1;
                self.group_contents(pattern);
                self.level -= 1;
                self.line("}");
            }
            GraphPattern::Optional { pattern, .. } => self.keyword_block("OPTIONAL", pattern),
            GraphPattern::Minus { pattern, .. } => self.keyword_block("MINUS", pattern),
            GraphPattern::Graph { graph, pattern, .. } => {
                let kw = format!("GRAPH {}", var_or_iri_str(graph));
                self.keyword_block(&kw, pattern);
            }
            GraphPattern::Union { left, right, .. } => {
                self.union_chain(left);
                self.line("UNION");
                self.brace_block(right);
            }
            GraphPattern::Filter { expr, .. } => {
                let text = format!("FILTER {}", expr_str(expr));
                self.line(&text);
            }
            GraphPattern::Bind { expr, var, .. } => {
                let text = format!("BIND ({} AS ?{})", expr_str(expr), var.name);
                self.line(&text);
            }
            GraphPattern::SubSelect { query, .. } => {
                self.line("{");
                self.level += 1;
                self.select_query(query);
                self.level -= 1;
                self.line("}");
            }
        }
    }

    /// Left operands of a UNION chain, flattened so `A UNION B UNION C`
    /// does not grow extra braces.
    fn union_chain(&mut self, pattern: &GraphPattern) {
        if let GraphPattern::Union { left, right, .. } = pattern {
            self.union_chain(left);
            self.line("UNION");
            self.brace_block(right);
        } else {
            self.brace_block(pattern);
        }
    }

    fn keyword_block(&mut self, keyword: &str, inner: &GraphPattern) {
        self.line(&format!("{keyword} {{"));
        self.level += 1;
        self.group_contents(inner);
        self.level -= 1;
        self.line("}");
    }

    fn brace_block(&mut self, inner: &GraphPattern) {
        self.line("{");
        self.level += 1;
        self.group_contents(inner);
        self.level -= 1;
        self.line("}");
    }

    fn modifiers(&mut self, modifiers: &SolutionModifiers) {
        for text in modifier_strs(modifiers) {
            self.line(&text);
        }
    }
}

/// SELECT head with its modifier and projection, no trailing newline.
fn select_head_str(query: &SelectQuery) -> String {
    let mut head = String::from("SELECT");
    match query.select.modifier {
        Some(SelectModifier::Distinct) => head.push_str(" DISTINCT"),
        Some(SelectModifier::Reduced) => head.push_str(" REDUCED"),
        None => {}
    }
    match &query.select.variables {
        SelectVariables::Star => head.push_str(" *"),
        SelectVariables::Explicit(items) => {
            for item in items {
                head.push(' ');
                head.push_str(&projection_str(item));
            }
        }
    }
    head
}

fn modifier_strs(modifiers: &SolutionModifiers) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(group_by) = &modifiers.group_by {
        let conds: Vec<String> = group_by
            .conditions
            .iter()
            .map(group_condition_str)
            .collect();
        out.push(format!("GROUP BY {}", conds.join(" ")));
    }
    if let Some(having) = &modifiers.having {
        let constraints: Vec<String> = having.constraints.iter().map(expr_str).collect();
        out.push(format!("HAVING {}", constraints.join(" ")));
    }
    if let Some(order_by) = &modifiers.order_by {
        let conds: Vec<String> = order_by
            .conditions
            .iter()
            .map(|cond| match cond.direction {
                Some(OrderDirection::Asc) => format!("ASC({})", order_expr_str(&cond.expr)),
                Some(OrderDirection::Desc) => format!("DESC({})", order_expr_str(&cond.expr)),
                None => expr_str(&cond.expr),
            })
            .collect();
        out.push(format!("ORDER BY {}", conds.join(" ")));
    }
    if let Some(limit) = &modifiers.limit {
        out.push(format!("LIMIT {}", limit.value));
    }
    if let Some(offset) = &modifiers.offset {
        out.push(format!("OFFSET {}", offset.value));
    }
    out
}

fn projection_str(item: &SelectVariable) -> String {
    match item {
        SelectVariable::Var(v) => format!("?{}", v.name),
        SelectVariable::Expr { expr, alias, .. } => {
            format!("({} AS ?{})", expr_str(expr), alias.name)
        }
    }
}

fn group_condition_str(cond: &GroupCondition) -> String {
    match cond {
        GroupCondition::Var(v) => format!("?{}", v.name),
        GroupCondition::Expr {
            expr,
            alias: Some(alias),
            ..
        } => format!("({} AS ?{})", expr_str(expr), alias.name),
        GroupCondition::Expr { expr, alias: None, .. } => format!("({})", inner_expr_str(expr)),
    }
}

/// ASC(...)/DESC(...) already parenthesize; drop a redundant bracket level.
fn order_expr_str(expr: &Expression) -> String {
    inner_expr_str(expr)
}

/// Like `expr_str` but unwraps a single outer `Bracketed` node, for
/// positions whose syntax supplies the parentheses.
fn inner_expr_str(expr: &Expression) -> String {
    match expr {
        Expression::Bracketed { inner, .. } => expr_str(inner),
        other => expr_str(other),
    }
}

fn expr_str(expr: &Expression) -> String {
    match expr {
        Expression::Var(v) => format!("?{}", v.name),
        Expression::Literal(l) => literal_str(l),
        Expression::Iri(i) => iri_str(i),
        Expression::Binary {
            op, left, right, ..
        } => format!("{} {} {}", expr_str(left), op.as_str(), expr_str(right)),
        Expression::Unary { op, operand, .. } => format!("{}{}", op.as_str(), expr_str(operand)),
        Expression::Builtin { func, args, .. } => {
            let args: Vec<String> = args.iter().map(expr_str).collect();
            format!("{}({})", func.as_str(), args.join(", "))
        }
        Expression::FunctionCall { name, args, .. } => {
            let args: Vec<String> = args.iter().map(expr_str).collect();
            format!("{}({})", iri_str(name), args.join(", "))
        }
        Expression::Exists {
            pattern, negated, ..
        } => {
            let keyword = if *negated { "NOT EXISTS" } else { "EXISTS" };
            format!("{keyword} {}", inline_pattern_str(pattern))
        }
        Expression::In {
            expr,
            list,
            negated,
            ..
        } => {
            let keyword = if *negated { "NOT IN" } else { "IN" };
            let list: Vec<String> = list.iter().map(expr_str).collect();
            format!("{} {keyword} ({})", expr_str(expr), list.join(", "))
        }
        Expression::Aggregate {
            func,
            expr,
            distinct,
            separator,
            ..
        } => {
            let mut inner = String::new();
            if *distinct {
                inner.push_str("DISTINCT ");
            }
            match expr {
                Some(e) => inner.push_str(&expr_str(e)),
                None => inner.push('*'),
            }
            if let Some(sep) = separator {
                inner.push_str(&format!("; SEPARATOR = \"{}\"", escape_string(sep)));
            }
            format!("{}({})", func.as_str(), inner)
        }
        Expression::Bracketed { inner, .. } => format!("({})", expr_str(inner)),
    }
}

/// A group pattern on one line, for EXISTS in expressions.
fn inline_pattern_str(pattern: &GraphPattern) -> String {
    // a sub-select owns its enclosing braces
    if let GraphPattern::SubSelect { query, .. } = pattern {
        return format!("{{ {} }}", inline_select_str(query));
    }
    let mut parts = Vec::new();
    inline_elements(pattern, &mut parts);
    if parts.is_empty() {
        "{ }".to_string()
    } else {
        format!("{{ {} }}", parts.join(" "))
    }
}

/// A whole sub-select on one line, without the enclosing braces.
fn inline_select_str(query: &SelectQuery) -> String {
    let mut out = select_head_str(query);
    for ds in &query.datasets {
        if ds.named {
            out.push_str(&format!(" FROM NAMED {}", iri_str(&ds.iri)));
        } else {
            out.push_str(&format!(" FROM {}", iri_str(&ds.iri)));
        }
    }
    out.push_str(" WHERE ");
    out.push_str(&inline_pattern_str(&query.where_clause.pattern));
    for text in modifier_strs(&query.modifiers) {
        out.push(' ');
        out.push_str(&text);
    }
    out
}

fn inline_elements(pattern: &GraphPattern, parts: &mut Vec<String>) {
    match pattern {
        GraphPattern::Group { patterns, .. } => {
            for p in patterns {
                inline_element(p, parts);
            }
        }
        other => inline_element(other, parts),
    }
}

fn inline_element(pattern: &GraphPattern, parts: &mut Vec<String>) {
    match pattern {
        GraphPattern::Bgp { triples, .. } => {
            for t in triples {
                parts.push(triple_str(t));
            }
        }
        GraphPattern::Optional { pattern, .. } => {
            parts.push(format!("OPTIONAL {}", inline_pattern_str(pattern)));
        }
        GraphPattern::Minus { pattern, .. } => {
            parts.push(format!("MINUS {}", inline_pattern_str(pattern)));
        }
        GraphPattern::Graph { graph, pattern, .. } => {
            parts.push(format!(
                "GRAPH {} {}",
                var_or_iri_str(graph),
                inline_pattern_str(pattern)
            ));
        }
        GraphPattern::Union { left, right, .. } => {
            parts.push(format!(
                "{} UNION {}",
                inline_pattern_str(left),
                inline_pattern_str(right)
            ));
        }
        GraphPattern::Filter { expr, .. } => parts.push(format!("FILTER {}", expr_str(expr))),
        GraphPattern::Bind { expr, var, .. } => {
            parts.push(format!("BIND ({} AS ?{})", expr_str(expr), var.name));
        }
        GraphPattern::Group { .. } => {
            parts.push(inline_pattern_str(pattern));
        }
        GraphPattern::SubSelect { query, .. } => {
            parts.push(format!("{{ {} }}", inline_select_str(query)));
        }
    }
}

fn triple_str(triple: &TriplePattern) -> String {
    format!(
        "{} {} {} .",
        term_str(&triple.subject),
        predicate_str(&triple.predicate),
        term_str(&triple.object)
    )
}

fn term_str(term: &Term) -> String {
    match term {
        Term::Var(v) => format!("?{}", v.name),
        Term::Iri(i) => iri_str(i),
        Term::Literal(l) => literal_str(l),
        Term::BlankNode(b) => blank_node_str(b),
    }
}

fn predicate_str(predicate: &PredicateTerm) -> String {
    match predicate {
        PredicateTerm::Iri(i) if i.is_rdf_type() => "a".to_string(),
        PredicateTerm::Iri(i) => iri_str(i),
        PredicateTerm::Var(v) => format!("?{}", v.name),
        PredicateTerm::Path(p) => p.text.to_string(),
    }
}

fn iri_str(iri: &Iri) -> String {
    match &iri.value {
        IriValue::Full(v) => format!("<{v}>"),
        IriValue::Prefixed { prefix, local } => format!("{prefix}:{local}"),
    }
}

fn blank_node_str(node: &BlankNode) -> String {
    match &node.value {
        BlankNodeValue::Label(label) => format!("_:{label}"),
        BlankNodeValue::Anon => "[]".to_string(),
    }
}

fn var_or_iri_str(value: &VarOrIri) -> String {
    match value {
        VarOrIri::Var(v) => format!("?{}", v.name),
        VarOrIri::Iri(i) => iri_str(i),
    }
}

fn literal_str(literal: &Literal) -> String {
    match &literal.value {
        LiteralValue::Simple(v) => format!("\"{}\"", escape_string(v)),
        LiteralValue::LangTagged { value, lang } => {
            format!("\"{}\"@{lang}", escape_string(value))
        }
        LiteralValue::Typed { value, datatype } => {
            format!("\"{}\"^^{}", escape_string(value), iri_str(datatype))
        }
        LiteralValue::Integer(v) => v.to_string(),
        LiteralValue::Decimal(text) | LiteralValue::Double(text) => text.to_string(),
        LiteralValue::Boolean(true) => "true".to_string(),
        LiteralValue::Boolean(false) => "false".to_string(),
    }
}

fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_query;

    fn fmt(source: &str) -> String {
        let out = parse_query(source);
        assert!(
            !out.has_errors(),
            "parse failed: {:?}",
            out.diagnostics
        );
        format_query(&out.ast.unwrap(), &FormatOptions::default())
    }

    fn fmt_width(source: &str, indent: i64) -> String {
        let out = parse_query(source);
        format_query(&out.ast.unwrap(), &FormatOptions::new(indent))
    }

    #[test]
    fn formats_basic_select() {
        let formatted = fmt("select ?s where{?s ?p ?o}");
        assert_eq!(formatted, "SELECT ?s\nWHERE {\n  ?s ?p ?o .\n}\n");
    }

    #[test]
    fn formats_prologue_and_type_shorthand() {
        let formatted = fmt(
            "PREFIX foaf: <http://xmlns.com/foaf/0.1/>\n\
             SELECT ?p WHERE { ?p a foaf:Person }",
        );
        assert_eq!(
            formatted,
            "PREFIX foaf: <http://xmlns.com/foaf/0.1/>\n\
             SELECT ?p\n\
             WHERE {\n  ?p a foaf:Person .\n}\n"
        );
    }

    #[test]
    fn formats_optional_and_filter() {
        let formatted = fmt(
            "SELECT ?name WHERE { ?p foaf:name ?name . \
             OPTIONAL { ?p foaf:age ?age } FILTER(?age > 20) }",
        );
        assert_eq!(
            formatted,
            "SELECT ?name\n\
             WHERE {\n\
             \x20 ?p foaf:name ?name .\n\
             \x20 OPTIONAL {\n\
             \x20   ?p foaf:age ?age .\n\
             \x20 }\n\
             \x20 FILTER (?age > 20)\n\
             }\n"
        );
    }

    #[test]
    fn formats_union_chain_flat() {
        let formatted = fmt(
            "SELECT * WHERE { { ?a ex:p ?b } UNION { ?a ex:q ?b } UNION { ?a ex:r ?b } }",
        );
        let unions = formatted.matches("UNION").count();
        assert_eq!(unions, 2);
        assert!(formatted.contains("  }\n  UNION\n  {"));
    }

    #[test]
    fn formats_modifiers_in_canonical_order() {
        let formatted = fmt(
            "SELECT ?s WHERE { ?s ?p ?o } OFFSET 5 LIMIT 10",
        );
        let limit_pos = formatted.find("LIMIT 10").unwrap();
        let offset_pos = formatted.find("OFFSET 5").unwrap();
        assert!(limit_pos < offset_pos);
    }

    #[test]
    fn preserves_property_path_text() {
        let formatted = fmt("SELECT ?x WHERE { ?x ^ex:p/foaf:knows+ ?y }");
        assert!(formatted.contains("?x ^ex:p/foaf:knows+ ?y ."));
    }

    #[test]
    fn indent_width_is_configurable_and_clamped() {
        let four = fmt_width("SELECT ?s WHERE { ?s ?p ?o }", 4);
        assert!(four.contains("\n    ?s ?p ?o ."));
        let zero = fmt_width("SELECT ?s WHERE { ?s ?p ?o }", -3);
        assert!(zero.contains("\n?s ?p ?o ."));
    }

    #[test]
    fn formats_exists_over_subselect() {
        let formatted = fmt(
            "SELECT * WHERE { ?x ?p ?o FILTER EXISTS { SELECT ?y WHERE { ?y ?p ?z } } }",
        );
        assert!(
            formatted.contains("FILTER EXISTS { SELECT ?y WHERE { ?y ?p ?z . } }"),
            "got: {formatted}"
        );
        assert_eq!(formatted, fmt(&formatted));
    }

    #[test]
    fn formats_subselect_with_modifiers_inside_not_exists() {
        let formatted = fmt(
            "SELECT ?x WHERE { ?x ?p ?o FILTER NOT EXISTS { SELECT DISTINCT ?y WHERE { ?y a ex:Thing } LIMIT 5 } }",
        );
        assert!(
            formatted
                .contains("NOT EXISTS { SELECT DISTINCT ?y WHERE { ?y a ex:Thing . } LIMIT 5 }"),
            "got: {formatted}"
        );
        assert_eq!(formatted, fmt(&formatted));
    }

    #[test]
    fn formatting_is_idempotent() {
        let sources = [
            "select distinct ?s ?o where { ?s ex:p ?o ; ex:q ?q , ?r . FILTER(?o != 3) } order by desc(?o) limit 10",
            "PREFIX ex: <http://ex/> ASK { ?s ex:p \"v\"@en }",
            "CONSTRUCT { ?s ex:p ?o } WHERE { ?s ex:q ?o . OPTIONAL { ?o ex:r ?x } }",
            "SELECT (COUNT(DISTINCT ?s) AS ?n) WHERE { GRAPH ?g { ?s ?p ?o } } GROUP BY ?g HAVING (COUNT(?s) > 2)",
            "SELECT ?x WHERE { { ?x ex:a ?y } UNION { ?x ex:b ?y } MINUS { ?x ex:c ?y } }",
            "SELECT ?x WHERE { ?x ex:p ?v . FILTER NOT EXISTS { ?x ex:hidden true } BIND (?v * 2 AS ?w) }",
            "DESCRIBE ?x <http://ex/thing> WHERE { ?x ?p ?o } OFFSET 2",
        ];
        for source in sources {
            let first = fmt(source);
            let second = fmt(&first);
            assert_eq!(first, second, "not idempotent for: {source}");
        }
    }
}
