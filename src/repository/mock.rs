//! Mock collaborators for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::record::ComplianceRecord;
use crate::domain::types::QueryKey;
use crate::pagination::Page;
use crate::repository::errors::RemoteResult;
use crate::repository::{CollectionReader, ListQuery, Notifier, QueryCache};

mock! {
    pub RecordReader {}

    #[async_trait]
    impl CollectionReader for RecordReader {
        type Item = ComplianceRecord;

        async fn fetch_page(
            &self,
            key: &QueryKey,
            query: &ListQuery,
        ) -> RemoteResult<Page<ComplianceRecord>>;
    }
}

mock! {
    pub QueryCache {}

    impl QueryCache for QueryCache {
        fn invalidate(&self, key: &QueryKey);
        fn generation(&self, key: &QueryKey) -> u64;
    }
}

mock! {
    pub Notifier {}

    impl Notifier for Notifier {
        fn notify_success(&self, message: &str);
        fn notify_failure(&self, message: &str);
    }
}
