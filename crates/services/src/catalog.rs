//! Read-only source of quiz content.
//!
//! Tests ship with the application bundle rather than living in the user
//! database, so the catalog is a separate seam from `storage`.

use async_trait::async_trait;
use std::collections::HashMap;

use exam_core::model::{TestData, TestId, TestMetadata};

/// Supplies test content and the listing shown on the test picker.
#[async_trait]
pub trait ContentCatalog: Send + Sync {
    /// Load the full question set for a test, `None` if unknown.
    async fn load_test(&self, test_id: &TestId) -> Option<TestData>;

    /// Listing entries for every known test.
    async fn list_metadata(&self) -> Vec<TestMetadata>;
}

/// Catalog backed by a plain map, used in tests and for bundled content
/// that is deserialized up front.
#[derive(Default)]
pub struct InMemoryCatalog {
    tests: HashMap<TestId, TestData>,
    metadata: Vec<TestMetadata>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a test, deriving its listing entry.
    pub fn add_test(&mut self, test: TestData, category: impl Into<String>, is_premium: bool) {
        self.metadata.push(TestMetadata {
            id: test.id().clone(),
            file_name: test.id().to_string(),
            title: test.title().to_string(),
            total_questions: u32::try_from(test.question_count()).unwrap_or(u32::MAX),
            category: category.into(),
            is_premium,
        });
        self.tests.insert(test.id().clone(), test);
    }
}

#[async_trait]
impl ContentCatalog for InMemoryCatalog {
    async fn load_test(&self, test_id: &TestId) -> Option<TestData> {
        self.tests.get(test_id).cloned()
    }

    async fn list_metadata(&self) -> Vec<TestMetadata> {
        self.metadata.clone()
    }
}
