//! Query Options
//!
//! Caller-supplied filters, field projection and pagination parameters,
//! and their translation into query-string pairs.

use super::descriptor::QueryStyle;
use std::fmt;
use std::str::FromStr;

/// Comparison operator of a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Lt => "lt",
            Operator::Le => "le",
            Operator::Gt => "gt",
            Operator::Ge => "ge",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(Operator::Eq),
            "ne" => Ok(Operator::Ne),
            "lt" => Ok(Operator::Lt),
            "le" => Ok(Operator::Le),
            "gt" => Ok(Operator::Gt),
            "ge" => Ok(Operator::Ge),
            other => Err(format!("unknown operator '{}'", other)),
        }
    }
}

/// One `(field, operator, value)` filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub op: Operator,
    pub value: String,
}

impl Filter {
    pub fn new(field: &str, op: Operator, value: &str) -> Self {
        Self {
            field: field.to_string(),
            op,
            value: value.to_string(),
        }
    }
}

/// Operator spellings accepted by [`parse_filter`], longest first so `<=`
/// wins over `<`
const FILTER_SYNTAX: &[(&str, Operator)] = &[
    ("!=", Operator::Ne),
    ("<=", Operator::Le),
    (">=", Operator::Ge),
    ("=", Operator::Eq),
    ("<", Operator::Lt),
    (">", Operator::Gt),
];

/// Parse a filter expression such as `status=ACTIVE` or `counter_volume>=10`
pub fn parse_filter(expr: &str) -> Option<Filter> {
    let (pos, token, op) = FILTER_SYNTAX
        .iter()
        .filter_map(|(token, op)| expr.find(*token).map(|pos| (pos, *token, *op)))
        .min_by_key(|(pos, token, _)| (*pos, std::cmp::Reverse(token.len())))?;

    let field = expr[..pos].trim();
    let value = expr[pos + token.len()..].trim();
    if field.is_empty() {
        return None;
    }

    Some(Filter::new(field, op, value))
}

/// Optional filters, projection and pagination for a list call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Emitted in insertion order; Ceilometer aligns its triplets positionally
    pub filters: Vec<Filter>,
    pub fields: Vec<String>,
    /// `None` means the server's default page size. `Some(0)` is sent as-is.
    pub limit: Option<u32>,
    pub marker: Option<String>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality filter
    pub fn filter(self, field: &str, value: &str) -> Self {
        self.filter_op(field, Operator::Eq, value)
    }

    pub fn filter_op(mut self, field: &str, op: Operator, value: &str) -> Self {
        self.filters.push(Filter::new(field, op, value));
        self
    }

    /// Project the response onto a field
    pub fn field(mut self, name: &str) -> Self {
        if !self.fields.iter().any(|f| f == name) {
            self.fields.push(name.to_string());
        }
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn marker(mut self, marker: &str) -> Self {
        self.marker = Some(marker.to_string());
        self
    }

    /// Same filters and limit, continuing after `marker`
    pub fn with_marker(&self, marker: &str) -> Self {
        self.clone().marker(marker)
    }

    /// Translate into ordered query-string pairs: filters, projection,
    /// `limit`, then `marker`.
    pub fn encode(&self, style: QueryStyle) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.filters.len() * 3 + self.fields.len() + 2);

        for filter in &self.filters {
            match style {
                QueryStyle::Triplets => {
                    params.push(("q.field".to_string(), filter.field.clone()));
                    params.push(("q.op".to_string(), filter.op.to_string()));
                    params.push(("q.value".to_string(), filter.value.clone()));
                }
                QueryStyle::Flat => {
                    let value = match filter.op {
                        Operator::Eq => filter.value.clone(),
                        op => format!("{}:{}", op, filter.value),
                    };
                    params.push((filter.field.clone(), value));
                }
            }
        }

        match style {
            QueryStyle::Flat => {
                params.extend(self.fields.iter().map(|f| ("fields".to_string(), f.clone())));
            }
            QueryStyle::Triplets if !self.fields.is_empty() => {
                tracing::debug!("Dropping field projection {:?}: unsupported by backend", self.fields);
            }
            QueryStyle::Triplets => {}
        }

        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(marker) = &self.marker {
            params.push(("marker".to_string(), marker.clone()));
        }

        params
    }
}
