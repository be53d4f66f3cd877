//! In-memory record source

use std::sync::Arc;

use tokio::sync::RwLock;

use super::traits::{RecordSource, RecordStore, SourceResult};
use crate::query::{FilterSet, Pagination, SortSpec};

/// A record source backed by a shared vector
///
/// Clones share the same records. The lock is held only while matching
/// records are copied out.
#[derive(Debug)]
pub struct MemorySource<T> {
    records: Arc<RwLock<Vec<T>>>,
}

impl<T> Clone for MemorySource<T> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<T> Default for MemorySource<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> MemorySource<T> {
    /// Create a source holding the given records, in order
    pub fn new(records: Vec<T>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Append a record
    pub async fn insert(&self, record: T) {
        self.records.write().await.push(record);
    }

    /// Append many records
    pub async fn extend<I: IntoIterator<Item = T>>(&self, records: I) {
        self.records.write().await.extend(records);
    }

    /// Total number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Check whether the source holds no records
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl<T> RecordSource<T> for MemorySource<T>
where
    T: Clone + Send + Sync,
{
    async fn count(&self, filter: &FilterSet<T>) -> SourceResult<u64> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|record| filter.matches(record)).count() as u64)
    }

    async fn fetch(
        &self,
        filter: &FilterSet<T>,
        sort: &SortSpec<T>,
        window: Pagination,
    ) -> SourceResult<Vec<T>> {
        let matching: Vec<T> = {
            let records = self.records.read().await;
            records
                .iter()
                .filter(|record| filter.matches(record))
                .cloned()
                .collect()
        };

        Ok(window.slice(sort.sort(matching)).collect())
    }

    async fn find_one(&self, filter: &FilterSet<T>) -> SourceResult<Option<T>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|record| filter.matches(record)).cloned())
    }
}

impl<T> RecordStore<T> for MemorySource<T>
where
    T: Clone + Send + Sync,
{
    async fn create(&self, record: T) -> SourceResult<()> {
        self.insert(record).await;
        Ok(())
    }

    async fn create_many(&self, records: Vec<T>) -> SourceResult<()> {
        self.extend(records).await;
        Ok(())
    }

    async fn update<F>(&self, filter: &FilterSet<T>, apply: F) -> SourceResult<Option<T>>
    where
        F: FnOnce(&mut T) + Send,
    {
        let mut records = self.records.write().await;
        Ok(records
            .iter_mut()
            .find(|record| filter.matches(record))
            .map(|record| {
                apply(record);
                record.clone()
            }))
    }

    async fn delete(&self, filter: &FilterSet<T>) -> SourceResult<u64> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|record| !filter.matches(record));
        Ok((before - records.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::fields::tests::Person;
    use crate::query::FilterCondition;

    fn source() -> MemorySource<Person> {
        MemorySource::new(vec![
            Person::new(1, "Sam", 26),
            Person::new(2, "Jana", 30),
            Person::new(3, "Kane", 35),
            Person::new(4, "Martha", 19),
        ])
    }

    #[tokio::test]
    async fn test_count_respects_filter() {
        let source = source();
        let adults = FilterSet::<Person>::compile(&[FilterCondition::gte("age", 21_u32)]);
        assert_eq!(source.count(&FilterSet::all()).await.unwrap(), 4);
        assert_eq!(source.count(&adults).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_fetch_filters_sorts_and_slices() {
        let source = source();
        let adults = FilterSet::<Person>::compile(&[FilterCondition::gte("age", 21_u32)]);
        let sort = SortSpec::<Person>::parse("age desc");

        let first = source.fetch(&adults, &sort, Pagination::page(1, 2)).await.unwrap();
        let second = source.fetch(&adults, &sort, Pagination::page(2, 2)).await.unwrap();

        assert_eq!(first.iter().map(|p| p.id).collect::<Vec<_>>(), vec![3, 2]);
        assert_eq!(second.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1]);
    }

    #[tokio::test]
    async fn test_find_one() {
        let source = source();
        let by_id = FilterSet::<Person>::compile(&[FilterCondition::eq("id", 2_i64)]);
        let missing = FilterSet::<Person>::compile(&[FilterCondition::eq("id", 99_i64)]);

        assert_eq!(source.find_one(&by_id).await.unwrap().map(|p| p.id), Some(2));
        assert!(source.find_one(&missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_is_shared_between_clones() {
        let source = source();
        let clone = source.clone();
        clone.insert(Person::new(5, "Zoe", 41)).await;
        assert_eq!(source.len().await, 5);
        assert!(!source.is_empty().await);
    }

    #[tokio::test]
    async fn test_create_many_appends_in_order() {
        let source = source();
        source
            .create_many(vec![Person::new(5, "Lena", 29), Person::new(6, "Tom", 52)])
            .await
            .unwrap();
        source.create(Person::new(7, "Priya", 38)).await.unwrap();

        let all = source
            .fetch(&FilterSet::all(), &SortSpec::<Person>::parse("id"), Pagination::page(1, 10))
            .await
            .unwrap();
        assert_eq!(all.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[tokio::test]
    async fn test_update_changes_first_match_only() {
        let source = source();
        let jana = FilterSet::<Person>::compile(&[FilterCondition::eq("id", 2_i64)]);

        let updated = source.update(&jana, |p| p.age = 31).await.unwrap();
        assert_eq!(updated.map(|p| p.age), Some(31));
        assert_eq!(source.find_one(&jana).await.unwrap().unwrap().age, 31);

        let nobody = FilterSet::<Person>::compile(&[FilterCondition::eq("id", 99_i64)]);
        assert_eq!(source.update(&nobody, |p| p.age = 0).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_removes_all_matches() {
        let source = source();
        let over_25 = FilterSet::<Person>::compile(&[FilterCondition::gte("age", 26_u32)]);

        assert_eq!(source.delete(&over_25).await.unwrap(), 3);
        assert_eq!(source.len().await, 1);
        assert_eq!(source.delete(&over_25).await.unwrap(), 0);
    }
}
