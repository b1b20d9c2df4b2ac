use serde::Serialize;
use utoipa::ToSchema;

use crate::config::ApiConfig;

/// Resolved `page`/`limit` pair. Query values that are missing, non-numeric or
/// non-positive fall back to defaults; `limit` is capped by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

/// Metadata returned alongside a page of posts.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
pub struct PageInfo {
    pub total: i64,
    pub page: u32,
    pub pages: i64,
}

impl Pagination {
    pub fn from_query(page: Option<&str>, limit: Option<&str>, api: &ApiConfig) -> Self {
        let page = parse_positive(page).unwrap_or(1);
        let limit = parse_positive(limit)
            .unwrap_or(api.default_page_size)
            .min(api.max_page_size)
            .max(1);

        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }

    pub fn page_info(&self, total: i64) -> PageInfo {
        let limit = i64::from(self.limit.max(1));
        PageInfo {
            total,
            page: self.page,
            pages: (total + limit - 1) / limit,
        }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.trim().parse::<u32>().ok()).filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn api() -> ApiConfig {
        AppConfig::development().api
    }

    #[test]
    fn defaults_apply_to_missing_or_bad_values() {
        let p = Pagination::from_query(None, None, &api());
        assert_eq!(p, Pagination { page: 1, limit: 10 });

        let p = Pagination::from_query(Some("abc"), Some("0"), &api());
        assert_eq!(p, Pagination { page: 1, limit: 10 });

        let p = Pagination::from_query(Some("-2"), Some("-5"), &api());
        assert_eq!(p, Pagination { page: 1, limit: 10 });
    }

    #[test]
    fn limit_is_capped() {
        let p = Pagination::from_query(Some("2"), Some("100000"), &api());
        assert_eq!(p.limit, api().max_page_size);
        assert_eq!(p.page, 2);
    }

    #[test]
    fn zero_sized_config_still_yields_a_usable_limit() {
        let mut api = api();
        api.default_page_size = 0;
        let p = Pagination::from_query(None, None, &api);
        assert_eq!(p.limit, 1);
        assert_eq!(p.page_info(5).pages, 5);

        api.max_page_size = 0;
        let p = Pagination::from_query(None, Some("20"), &api);
        assert_eq!(p.limit, 1);
    }

    #[test]
    fn page_info_tolerates_a_zero_limit() {
        let p = Pagination { page: 1, limit: 0 };
        assert_eq!(p.page_info(3).pages, 3);
    }

    #[test]
    fn offset_skips_previous_pages() {
        let p = Pagination::from_query(Some("3"), Some("4"), &api());
        assert_eq!(p.offset(), 8);
    }

    #[test]
    fn pages_is_ceiling_of_total_over_limit() {
        let p = Pagination { page: 1, limit: 4 };
        assert_eq!(p.page_info(0).pages, 0);
        assert_eq!(p.page_info(4).pages, 1);
        assert_eq!(p.page_info(5).pages, 2);
        assert_eq!(p.page_info(9).pages, 3);
    }
}
