use super::error::FilterError;
use super::types::{SortDirection, SortField, SortKey};

pub struct FilterOrder;

impl FilterOrder {
    /// Parse a sort key such as `-createdAt`, `title` or `updated_at`.
    /// A leading `-` means descending; an empty key yields the default order.
    pub fn parse(raw: Option<&str>) -> Result<SortKey, FilterError> {
        let raw = match raw.map(str::trim) {
            Some(s) if !s.is_empty() => s,
            _ => return Ok(SortKey::default()),
        };

        let (direction, name) = match raw.strip_prefix('-') {
            Some(rest) => (SortDirection::Desc, rest),
            None => (SortDirection::Asc, raw.strip_prefix('+').unwrap_or(raw)),
        };

        let field = match name {
            "createdAt" | "created_at" => SortField::CreatedAt,
            "updatedAt" | "updated_at" => SortField::UpdatedAt,
            "title" => SortField::Title,
            other => return Err(FilterError::InvalidSortField(other.to_string())),
        };

        Ok(SortKey { field, direction })
    }

    /// ORDER BY clause for the posts table aliased as `p`. The id tiebreaker keeps pages stable.
    pub fn generate(key: &SortKey) -> String {
        format!(
            "ORDER BY p.\"{}\" {}, p.\"id\" {}",
            key.field.column(),
            key.direction.to_sql(),
            key.direction.to_sql()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sort_defaults_to_newest_first() {
        assert_eq!(FilterOrder::parse(None).unwrap(), SortKey::default());
        assert_eq!(FilterOrder::parse(Some("  ")).unwrap(), SortKey::default());
        assert_eq!(SortKey::default().direction, SortDirection::Desc);
    }

    #[test]
    fn leading_dash_means_descending() {
        let key = FilterOrder::parse(Some("-title")).unwrap();
        assert_eq!(key.field, SortField::Title);
        assert_eq!(key.direction, SortDirection::Desc);

        let key = FilterOrder::parse(Some("updatedAt")).unwrap();
        assert_eq!(key.field, SortField::UpdatedAt);
        assert_eq!(key.direction, SortDirection::Asc);
    }

    #[test]
    fn snake_case_is_accepted() {
        let key = FilterOrder::parse(Some("-created_at")).unwrap();
        assert_eq!(key.field, SortField::CreatedAt);
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert_eq!(
            FilterOrder::parse(Some("-password")),
            Err(FilterError::InvalidSortField("password".to_string()))
        );
    }

    #[test]
    fn generates_whitelisted_order_clause() {
        let key = FilterOrder::parse(Some("-createdAt")).unwrap();
        assert_eq!(
            FilterOrder::generate(&key),
            "ORDER BY p.\"created_at\" DESC, p.\"id\" DESC"
        );
    }
}
