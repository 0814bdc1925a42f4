pub mod types;
pub mod utils;
pub mod pagination;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn page_serializes_with_metadata() {
        let page = types::Page { items: vec![1, 2], total: 7, page: 2, per_page: 2 };
        let v = serde_json::to_value(&page).unwrap();
        assert_eq!(v["total"], 7);
        assert_eq!(v["items"].as_array().unwrap().len(), 2);
    }
}
