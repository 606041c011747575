//! Declarative read queries and their wire serialization.
//!
//! A `Query` captures the whole read-side vocabulary the store supports:
//! field projection, AND'ed equality filters, one order-by and a row limit.
//! Nothing else (ranges, OR, joins) is expressible on purpose.

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    select: Option<String>,
    filter: BTreeMap<String, String>,
    order_by: Option<Order>,
    limit: Option<u32>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field projection; defaults to all fields when never called.
    pub fn select(mut self, fields: &str) -> Self {
        self.select = Some(fields.to_string());
        self
    }

    /// Add one equality predicate. Multiple calls AND together.
    pub fn eq(mut self, field: &str, value: impl ToString) -> Self {
        self.filter.insert(field.to_string(), value.to_string());
        self
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order_by = Some(Order {
            column: column.to_string(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, rows: u32) -> Self {
        self.limit = Some(rows);
        self
    }

    /// Serialize to the store's query-string pairs. Deterministic: filters
    /// come out in field order regardless of insertion order.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![(
            "select".to_string(),
            self.select.clone().unwrap_or_else(|| "*".to_string()),
        )];
        for (field, value) in &self.filter {
            params.push((field.clone(), format!("eq.{value}")));
        }
        if let Some(order) = &self.order_by {
            let direction = if order.ascending { "asc" } else { "desc" };
            params.push(("order".to_string(), format!("{}.{direction}", order.column)));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_select_all_with_no_predicates() {
        let params = Query::new().to_params();
        assert_eq!(params, vec![("select".to_string(), "*".to_string())]);
    }

    #[test]
    fn test_empty_filter_adds_no_predicate() {
        let params = Query::new().limit(5).to_params();
        assert_eq!(
            params,
            vec![
                ("select".to_string(), "*".to_string()),
                ("limit".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn test_equality_filters_and_together_in_field_order() {
        let params = Query::new()
            .eq("type", "project")
            .eq("is_featured", true)
            .to_params();
        assert_eq!(
            params,
            vec![
                ("select".to_string(), "*".to_string()),
                ("is_featured".to_string(), "eq.true".to_string()),
                ("type".to_string(), "eq.project".to_string()),
            ]
        );
    }

    #[test]
    fn test_order_defaults_ascending() {
        let params = Query::new().order_by("display_order", true).to_params();
        assert!(params.contains(&("order".to_string(), "display_order.asc".to_string())));

        let params = Query::new().order_by("created_at", false).to_params();
        assert!(params.contains(&("order".to_string(), "created_at.desc".to_string())));
    }

    #[test]
    fn test_field_projection_passes_through() {
        let params = Query::new().select("id,name").to_params();
        assert_eq!(params[0], ("select".to_string(), "id,name".to_string()));
    }

    #[test]
    fn test_identical_queries_serialize_identically() {
        let a = Query::new().eq("type", "skill").order_by("display_order", true);
        let b = Query::new().eq("type", "skill").order_by("display_order", true);
        assert_eq!(a.to_params(), b.to_params());
    }
}
