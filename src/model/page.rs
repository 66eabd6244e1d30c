use serde::{Deserialize, Serialize};

/// One page of results plus pagination metadata.
///
/// `total` is the count reported by the page when the site exposes one;
/// endpoints without a counter report the current page's length instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination<T> {
    pub results: Vec<T>,
    pub total: u32,
    pub page: u32,
    pub limit: u32,
    pub has_next_page: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() -> Result<(), serde_json::Error> {
        let page = Pagination {
            results: vec![1u32, 2, 3],
            total: 90,
            page: 1,
            limit: 30,
            has_next_page: true,
        };
        let json = serde_json::to_string(&page)?;
        let back: Pagination<u32> = serde_json::from_str(&json)?;
        assert_eq!(back.results, vec![1, 2, 3]);
        assert_eq!(back.total, 90);
        assert!(back.has_next_page);
        Ok(())
    }
}
