//! The list/filter/project loop
//!
//! [`list_filter_project`] pages through a [`BackendLister`] sequentially,
//! keeps items accepted by a [`FilterSpec`], and projects each kept item
//! into a caller-defined record. Any error aborts the whole listing; no
//! partial outcome is ever returned.

use crate::error::Result;
use crate::filter::FilterSpec;
use crate::hash::result_id_hash;
use crate::lister::{BackendLister, Listed};

/// One item that passed filtering
#[derive(Debug, Clone, PartialEq)]
struct Matched<R> {
    id: String,
    name: Option<String>,
    record: R,
}

/// Everything a listing read produced, in backend order
#[derive(Debug, Clone, PartialEq)]
pub struct ListOutcome<R> {
    matched: Vec<Matched<R>>,
    pages_fetched: u32,
}

impl<R> Default for ListOutcome<R> {
    fn default() -> Self {
        Self {
            matched: Vec::new(),
            pages_fetched: 0,
        }
    }
}

impl<R> ListOutcome<R> {
    pub fn ids(&self) -> Vec<String> {
        self.matched.iter().map(|m| m.id.clone()).collect()
    }

    /// Names of matched items, for resource kinds that have one
    pub fn names(&self) -> Vec<String> {
        self.matched
            .iter()
            .filter_map(|m| m.name.clone())
            .collect()
    }

    pub fn into_records(self) -> Vec<R> {
        self.matched.into_iter().map(|m| m.record).collect()
    }

    pub fn len(&self) -> usize {
        self.matched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }

    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Deterministic identifier over the ordered matched ids
    pub fn result_id(&self) -> String {
        result_id_hash(self.matched.iter().map(|m| m.id.as_str()))
    }

    /// Stable sort of matches by a key of their records. ids and names follow.
    pub fn sort_by_key<K, F>(&mut self, mut key: F)
    where
        K: Ord,
        F: FnMut(&R) -> K,
    {
        self.matched.sort_by_key(|m| key(&m.record));
    }

    /// Keep only the first `len` matches
    pub fn retain_first(&mut self, len: usize) {
        self.matched.truncate(len);
    }

    fn push(&mut self, matched: Matched<R>) {
        self.matched.push(matched);
    }
}

/// Page through `lister`, filter each item and project the survivors.
///
/// Pagination is validated before the first call. Filtering never affects
/// cursor advancement: the loop stops only when the lister's pagination
/// policy says the last page was reached.
pub async fn list_filter_project<L, R, F>(
    lister: &L,
    filter: &FilterSpec,
    mut project: F,
) -> Result<ListOutcome<R>>
where
    L: BackendLister + ?Sized,
    F: FnMut(&L::Item) -> R,
{
    let pagination = lister.pagination();
    pagination.validate()?;

    let action = lister.action();
    let mut cursor = pagination.first_cursor();
    let mut outcome = ListOutcome::default();

    loop {
        let page = match lister.fetch_page(&cursor).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("{} failed at {}: {}", action, cursor, e);
                return Err(e);
            }
        };
        outcome.pages_fetched += 1;

        let before = outcome.len();
        for item in &page.items {
            let id = item.id();
            let name = item.name();
            if !filter.matches(&id, name) {
                continue;
            }
            outcome.push(Matched {
                name: name.map(str::to_string),
                record: project(item),
                id,
            });
        }

        tracing::debug!(
            "{} {}: fetched {} items, kept {}",
            action,
            cursor,
            page.items.len(),
            outcome.len() - before
        );

        match pagination.next_cursor(&cursor, &page) {
            Some(next) => cursor = next,
            None => break,
        }
    }

    tracing::info!(
        "{} listed {} matching items over {} pages",
        action,
        outcome.len(),
        outcome.pages_fetched
    );

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ListError;
    use crate::pagination::{Page, PageCursor, Pagination};
    use async_trait::async_trait;
    use std::cmp::Reverse;
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    struct Item {
        id: String,
        name: String,
    }

    impl Listed for Item {
        fn id(&self) -> String {
            self.id.clone()
        }

        fn name(&self) -> Option<&str> {
            Some(&self.name)
        }
    }

    fn item(id: &str, name: &str) -> Item {
        Item {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("ServiceUnavailable: the request has failed due to a temporary failure")]
    struct Unavailable;

    /// Serves a fixed collection in page-number pages, optionally failing on one page
    struct PagedSource {
        items: Vec<Item>,
        page_size: u32,
        fail_on_page: Option<u32>,
        calls: Mutex<Vec<PageCursor>>,
    }

    impl PagedSource {
        fn new(items: Vec<Item>, page_size: u32) -> Self {
            Self {
                items,
                page_size,
                fail_on_page: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<PageCursor> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BackendLister for PagedSource {
        type Item = Item;

        fn action(&self) -> &str {
            "DescribeThings"
        }

        fn pagination(&self) -> Pagination {
            Pagination::page_number(self.page_size)
        }

        async fn fetch_page(&self, cursor: &PageCursor) -> Result<Page<Item>> {
            self.calls.lock().unwrap().push(cursor.clone());
            let number = cursor.page_number().unwrap_or(1);
            if self.fail_on_page == Some(number) {
                return Err(ListError::backend(self.action(), Unavailable));
            }
            let size = self.page_size as usize;
            let start = (number as usize - 1) * size;
            let items = self.items.iter().skip(start).take(size).cloned().collect();
            Ok(Page::new(items))
        }
    }

    /// Serves pre-built token pages in order
    struct TokenSource {
        pages: Vec<(Vec<Item>, Option<&'static str>)>,
        calls: Mutex<Vec<PageCursor>>,
    }

    #[async_trait]
    impl BackendLister for TokenSource {
        type Item = Item;

        fn action(&self) -> &str {
            "ListThings"
        }

        fn pagination(&self) -> Pagination {
            Pagination::next_token(2)
        }

        async fn fetch_page(&self, cursor: &PageCursor) -> Result<Page<Item>> {
            let index = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(cursor.clone());
                calls.len() - 1
            };
            let (items, token) = self.pages[index].clone();
            Ok(Page::new(items).with_next_token(token.map(str::to_string)))
        }
    }

    #[tokio::test]
    async fn example_scenario_filters_by_regex_over_two_pages() {
        let source = PagedSource::new(
            vec![item("a", "foo"), item("b", "bar"), item("c", "foobar")],
            2,
        );
        let filter = FilterSpec::new(Some("^foo"), None::<Vec<String>>).unwrap();

        let outcome = list_filter_project(&source, &filter, |i| i.name.clone())
            .await
            .unwrap();

        assert_eq!(outcome.ids(), vec!["a", "c"]);
        assert_eq!(outcome.names(), vec!["foo", "foobar"]);
        assert_eq!(outcome.pages_fetched(), 2);
        assert_eq!(
            source.calls(),
            vec![PageCursor::Number(1), PageCursor::Number(2)]
        );
    }

    #[tokio::test]
    async fn full_pages_then_short_page_takes_four_fetches() {
        let items: Vec<Item> = (0..10)
            .map(|i| item(&format!("id-{i}"), &format!("n-{i}")))
            .collect();
        let source = PagedSource::new(items, 3);

        let outcome = list_filter_project(&source, &FilterSpec::none(), |i| i.id.clone())
            .await
            .unwrap();

        assert_eq!(outcome.len(), 10);
        assert_eq!(source.calls().len(), 4);
    }

    #[tokio::test]
    async fn exact_multiple_fetches_one_empty_page() {
        let items = vec![item("a", "a"), item("b", "b")];
        let source = PagedSource::new(items, 2);

        let outcome = list_filter_project(&source, &FilterSpec::none(), |_| ())
            .await
            .unwrap();

        assert_eq!(outcome.len(), 2);
        assert_eq!(source.calls().len(), 2);
    }

    #[tokio::test]
    async fn empty_collection_is_empty_outcome() {
        let source = PagedSource::new(vec![], 50);
        let outcome = list_filter_project(&source, &FilterSpec::none(), |_| ())
            .await
            .unwrap();

        assert!(outcome.is_empty());
        assert!(outcome.names().is_empty());
        assert_eq!(outcome.result_id(), "0");
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test]
    async fn filtering_does_not_affect_pagination() {
        let items: Vec<Item> = (0..5).map(|i| item(&format!("{i}"), "skip")).collect();
        let source = PagedSource::new(items, 2);
        let filter = FilterSpec::new(Some("^keep$"), None::<Vec<String>>).unwrap();

        let outcome = list_filter_project(&source, &filter, |_| ()).await.unwrap();

        assert!(outcome.is_empty());
        assert_eq!(source.calls().len(), 3);
    }

    #[tokio::test]
    async fn error_on_second_page_aborts_everything() {
        let items: Vec<Item> = (0..5).map(|i| item(&format!("{i}"), "n")).collect();
        let mut source = PagedSource::new(items, 2);
        source.fail_on_page = Some(2);

        let err = list_filter_project(&source, &FilterSpec::none(), |i| i.id.clone())
            .await
            .unwrap_err();

        match err {
            ListError::Backend { action, .. } => assert_eq!(action, "DescribeThings"),
            other => panic!("expected backend error, got {other:?}"),
        }
        assert_eq!(source.calls().len(), 2);
    }

    #[tokio::test]
    async fn zero_page_size_fails_before_any_fetch() {
        let source = PagedSource::new(vec![item("a", "a")], 0);
        let err = list_filter_project(&source, &FilterSpec::none(), |_| ())
            .await
            .unwrap_err();

        assert!(matches!(err, ListError::InvalidPageSize));
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn token_pagination_follows_tokens_through_empty_pages() {
        let source = TokenSource {
            pages: vec![
                (vec![item("a", "a"), item("b", "b")], Some("t1")),
                (vec![], Some("t2")),
                (vec![item("c", "c")], None),
            ],
            calls: Mutex::new(Vec::new()),
        };

        let outcome = list_filter_project(&source, &FilterSpec::none(), |_| ())
            .await
            .unwrap();

        assert_eq!(outcome.ids(), vec!["a", "b", "c"]);
        assert_eq!(
            source.calls.lock().unwrap().clone(),
            vec![
                PageCursor::Token(None),
                PageCursor::Token(Some("t1".into())),
                PageCursor::Token(Some("t2".into())),
            ]
        );
    }

    #[tokio::test]
    async fn repeated_reads_are_identical() {
        let items = vec![item("x", "one"), item("y", "two"), item("z", "three")];
        let source = PagedSource::new(items, 2);
        let filter = FilterSpec::new(None, Some(vec!["x", "z"])).unwrap();

        let first = list_filter_project(&source, &filter, |i| i.name.clone())
            .await
            .unwrap();
        let second = list_filter_project(&source, &filter, |i| i.name.clone())
            .await
            .unwrap();

        assert_eq!(first.ids(), second.ids());
        assert_eq!(first.result_id(), second.result_id());
        assert_eq!(first.into_records(), vec!["one", "three"]);
    }

    #[tokio::test]
    async fn sort_and_retain_keep_ids_aligned() {
        let items = vec![item("a", "2021"), item("b", "2023"), item("c", "2022")];
        let source = PagedSource::new(items, 50);

        let mut outcome = list_filter_project(&source, &FilterSpec::none(), |i| i.name.clone())
            .await
            .unwrap();
        outcome.sort_by_key(|name| Reverse(name.clone()));

        assert_eq!(outcome.ids(), vec!["b", "c", "a"]);
        assert_eq!(outcome.names(), vec!["2023", "2022", "2021"]);

        outcome.retain_first(1);
        assert_eq!(outcome.ids(), vec!["b"]);
        assert_eq!(outcome.result_id(), result_id_hash(["b"]));
    }
}
