use crate::domain::{Category, Language};
use crate::error::ServiceResult;
use crate::repository::CategoryStore;
use std::sync::Arc;
use tracing::debug;

/// Category picker source for the feed filter and the proposal form
#[derive(Clone)]
pub struct CategoryService {
    store: Arc<dyn CategoryStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self { store }
    }

    /// Categories in `language`, in store order
    pub async fn list(&self, language: Language) -> ServiceResult<Vec<Category>> {
        let categories: Vec<Category> = self
            .store
            .list_categories()
            .await?
            .into_iter()
            .filter(|category| category.language == language.as_str())
            .collect();
        debug!(language = %language, count = categories.len(), "Categories listed");
        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryStore, Operation};

    fn category(id: &str, language: &str) -> Category {
        Category {
            id: id.to_string(),
            label: id.to_uppercase(),
            icon: "book".to_string(),
            language: language.to_string(),
            created_by: None,
        }
    }

    #[tokio::test]
    async fn test_list_filters_by_language() {
        let store = Arc::new(InMemoryStore::new());
        store.insert_category(category("histoire", "fr"));
        store.insert_category(category("history", "en"));
        store.insert_category(category("sciences", "fr"));
        let service = CategoryService::new(store);

        let ids: Vec<String> = service
            .list(Language::Fr)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();

        assert_eq!(ids, vec!["histoire", "sciences"]);
    }

    #[tokio::test]
    async fn test_list_failure_surfaces() {
        let store = Arc::new(InMemoryStore::new());
        store.set_failing(Operation::ListCategories, true);
        let service = CategoryService::new(store);

        assert!(service.list(Language::En).await.is_err());
    }
}
