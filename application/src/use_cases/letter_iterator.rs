//! Paginated letter iterator
//!
//! The letter listing endpoint only supports "give me N letters after letter C,
//! sorted ASC/DESC". There is no page index and no random access. The
//! [`LetterIterator`] turns that cursor-only capability into a forward-only
//! sequence and hides the page refetches from the consumer.
//!
//! # State machine
//!
//! ```text
//!  Unstarted ──advance──▶ InPage ──advance (seen > total)──▶ Exhausted
//!      │                   │  ▲
//!      │ total == 0        │  └── advance (next letter, refetch when buffer is drained)
//!      └──────────────────────────────────────────────────────▶ Exhausted
//!
//!  any fetch/protocol failure ──▶ Errored (terminal)
//! ```
//!
//! The cursor sent with a refetch is always the id of the *last* letter of the
//! previous page, whatever the sort order.
//!
//! The total count is taken from each page as it arrives and is not
//! re-validated against the letters already seen. A mailbox that changes
//! between fetches may therefore end early or late; this is accepted as best
//! effort.

use crate::error::{ClientError, ProtocolError, Result};
use crate::use_cases::portal_client::{CampClient, LetterPage};
use futures::Stream;
use thecamp_domain::{Group, Letter, SortOrder};
use tracing::{debug, warn};

/// Position inside the current page.
#[derive(Debug)]
struct PageCursor {
    /// Total reported by the most recent page
    total: usize,
    /// Letters handed out so far, including the current one
    seen: usize,
    /// Id of the last letter of the buffered page; the next fetch continues after it
    last_letter_id: String,
    letters: Vec<Letter>,
    index: usize,
}

impl PageCursor {
    fn first(page: LetterPage) -> std::result::Result<Self, ProtocolError> {
        let mut cursor = Self {
            total: page.total,
            seen: 1,
            last_letter_id: String::new(),
            letters: Vec::new(),
            index: 0,
        };
        cursor.load(page)?;
        Ok(cursor)
    }

    fn load(&mut self, page: LetterPage) -> std::result::Result<(), ProtocolError> {
        let last = page.letters.last().ok_or(ProtocolError::EmptyPage {
            total: self.total,
            seen: self.seen - 1,
        })?;
        self.last_letter_id = last.id.clone();
        self.total = page.total;
        self.letters = page.letters;
        self.index = 0;
        Ok(())
    }

    fn has_buffered_next(&self) -> bool {
        self.index + 1 < self.letters.len()
    }
}

#[derive(Debug)]
enum CursorState {
    Unstarted,
    InPage(PageCursor),
    Exhausted,
    Errored,
}

/// Forward-only iterator over the letters of one group.
///
/// Created by [`CampClient::letter_iterator`]. Call [`advance`](Self::advance)
/// until it returns `false`, reading each letter with
/// [`current`](Self::current). After an error the iterator is unusable;
/// create a new one to start over.
pub struct LetterIterator<'c> {
    client: &'c CampClient,
    group: &'c Group,
    order: SortOrder,
    page_size: usize,
    state: CursorState,
}

impl<'c> LetterIterator<'c> {
    pub(crate) fn new(
        client: &'c CampClient,
        group: &'c Group,
        order: SortOrder,
        page_size: usize,
    ) -> Self {
        Self {
            client,
            group,
            order,
            page_size: page_size.max(1),
            state: CursorState::Unstarted,
        }
    }

    pub fn group(&self) -> &Group {
        self.group
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Total reported by the portal, once the first page has been fetched.
    pub fn total_count(&self) -> Option<usize> {
        match &self.state {
            CursorState::InPage(cursor) => Some(cursor.total),
            _ => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.state, CursorState::Exhausted)
    }

    /// Move to the next letter.
    ///
    /// Returns `Ok(true)` when a letter is available through
    /// [`current`](Self::current), `Ok(false)` once every letter has been
    /// seen. May perform one network request when the buffered page is
    /// drained. Advancing an exhausted or failed iterator is an
    /// [`ClientError::InvalidState`].
    pub async fn advance(&mut self) -> Result<bool> {
        // Errored until a branch below stores a healthy state; every `?` leaves it so.
        match std::mem::replace(&mut self.state, CursorState::Errored) {
            CursorState::Unstarted => {
                let page = self.fetch(None).await?;
                if page.total == 0 {
                    debug!(group_id = %self.group.id, "No letters");
                    self.state = CursorState::Exhausted;
                    return Ok(false);
                }
                let cursor = PageCursor::first(page).inspect_err(|e| warn!("{}", e))?;
                self.state = CursorState::InPage(cursor);
                Ok(true)
            }
            CursorState::InPage(mut cursor) => {
                cursor.seen += 1;
                if cursor.seen > cursor.total {
                    debug!(group_id = %self.group.id, seen = cursor.total, "Letters exhausted");
                    self.state = CursorState::Exhausted;
                    return Ok(false);
                }
                if cursor.has_buffered_next() {
                    cursor.index += 1;
                } else {
                    let page = self.fetch(Some(cursor.last_letter_id.as_str())).await?;
                    cursor.load(page).inspect_err(|e| warn!("{}", e))?;
                }
                self.state = CursorState::InPage(cursor);
                Ok(true)
            }
            CursorState::Exhausted => {
                self.state = CursorState::Exhausted;
                Err(ClientError::InvalidState(
                    "letter iterator is already exhausted".to_string(),
                ))
            }
            CursorState::Errored => Err(ClientError::InvalidState(
                "letter iterator failed earlier and cannot be resumed".to_string(),
            )),
        }
    }

    /// The letter the last successful [`advance`](Self::advance) moved to.
    pub fn current(&self) -> Result<&Letter> {
        match &self.state {
            CursorState::InPage(cursor) => cursor.letters.get(cursor.index).ok_or_else(|| {
                ClientError::InvalidState("letter cursor is out of bounds".to_string())
            }),
            CursorState::Unstarted => Err(ClientError::InvalidState(
                "advance must be called before reading a letter".to_string(),
            )),
            CursorState::Exhausted => Err(ClientError::InvalidState(
                "letter iterator is exhausted".to_string(),
            )),
            CursorState::Errored => Err(ClientError::InvalidState(
                "letter iterator failed earlier".to_string(),
            )),
        }
    }

    /// Consume the iterator as a stream of owned letters.
    ///
    /// The stream ends after the last letter, or after yielding the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<Letter>> + 'c {
        futures::stream::try_unfold(self, Self::next_owned)
    }

    async fn next_owned(mut self) -> Result<Option<(Letter, Self)>> {
        if self.advance().await? {
            let letter = self.current()?.clone();
            Ok(Some((letter, self)))
        } else {
            Ok(None)
        }
    }

    async fn fetch(&self, cursor: Option<&str>) -> Result<LetterPage> {
        debug!(
            group_id = %self.group.id,
            ?cursor,
            order = %self.order,
            page_size = self.page_size,
            "Fetching letter page"
        );
        self.client
            .fetch_letters(self.group, cursor, self.page_size, self.order)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientSettings;
    use crate::ports::session_transport::TransportError;
    use crate::test_support::{MockTransport, double_encoded, ids, letter_page, sample_group};
    use futures::{StreamExt, TryStreamExt};
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn client_with_page_size(page_size: usize) -> (Arc<MockTransport>, CampClient) {
        let transport = Arc::new(MockTransport::new());
        let client = CampClient::new(transport.clone())
            .with_settings(ClientSettings::default().with_page_size(page_size));
        (transport, client)
    }

    fn cursor_of(body: &Value) -> Option<&str> {
        body.get("letter_id").and_then(Value::as_str)
    }

    #[tokio::test]
    async fn test_current_before_advance_is_invalid_state() {
        let (transport, client) = client_with_page_size(30);
        let group = sample_group();
        let iter = client.letter_iterator(&group, SortOrder::Ascending);

        assert!(iter.current().unwrap_err().is_invalid_state());
        assert_eq!(iter.total_count(), None);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_zero_letters() {
        let (transport, client) = client_with_page_size(30);
        transport.push_json(letter_page(0, Vec::<String>::new()));
        let group = sample_group();
        let mut iter = client.letter_iterator(&group, SortOrder::Ascending);

        assert!(!iter.advance().await.unwrap());
        assert!(iter.is_exhausted());
        assert!(iter.current().unwrap_err().is_invalid_state());
        assert!(iter.advance().await.unwrap_err().is_invalid_state());
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_thirty_five_letters_ascending() {
        let (transport, client) = client_with_page_size(30);
        transport.push_json(letter_page(35, ids(1, 30)));
        transport.push_json(letter_page(35, ids(31, 35)));
        let group = sample_group();
        let mut iter = client.letter_iterator(&group, SortOrder::Ascending);

        let mut seen = Vec::new();
        for n in 1..=30 {
            assert!(iter.advance().await.unwrap(), "advance {}", n);
            seen.push(iter.current().unwrap().id.clone());
        }
        assert_eq!(transport.call_count(), 1);

        assert!(iter.advance().await.unwrap());
        assert_eq!(transport.call_count(), 2);
        seen.push(iter.current().unwrap().id.clone());

        for _ in 32..=35 {
            assert!(iter.advance().await.unwrap());
            seen.push(iter.current().unwrap().id.clone());
        }
        assert!(!iter.advance().await.unwrap());
        assert_eq!(transport.call_count(), 2);

        assert_eq!(seen, ids(1, 35));

        let requests = transport.requests();
        assert_eq!(
            requests[0].body,
            json!({"unit_code": "U1", "group_id": "G1", "order": "ASC", "cnt": 30})
        );
        assert_eq!(cursor_of(&requests[1].body), Some("L30"));
        assert_eq!(requests[1].body["order"], "ASC");
    }

    #[tokio::test]
    async fn test_cursor_is_last_id_when_descending() {
        let (transport, client) = client_with_page_size(30);
        transport.push_json(letter_page(35, ids(35, 6)));
        transport.push_json(letter_page(35, ids(5, 1)));
        let group = sample_group();
        let mut iter = client.letter_iterator(&group, SortOrder::Descending);

        let mut seen = Vec::new();
        while iter.advance().await.unwrap() {
            seen.push(iter.current().unwrap().id.clone());
        }

        assert_eq!(seen, ids(35, 1));
        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(cursor_of(&requests[0].body), None);
        assert_eq!(cursor_of(&requests[1].body), Some("L6"));
        assert_eq!(requests[1].body["order"], "DESC");
    }

    #[tokio::test]
    async fn test_one_fetch_per_page() {
        let (transport, client) = client_with_page_size(2);
        transport.push_json(letter_page(5, ids(1, 2)));
        transport.push_json(letter_page(5, ids(3, 4)));
        transport.push_json(letter_page(5, ids(5, 5)));
        let group = sample_group();
        let mut iter = client.letter_iterator(&group, SortOrder::Ascending);

        let mut calls_after_advance = Vec::new();
        while iter.advance().await.unwrap() {
            calls_after_advance.push(transport.call_count());
        }

        assert_eq!(calls_after_advance, vec![1, 1, 2, 2, 3]);
        let cursors: Vec<_> = transport
            .requests()
            .iter()
            .map(|r| cursor_of(&r.body).map(str::to_string))
            .collect();
        assert_eq!(
            cursors,
            vec![None, Some("L2".to_string()), Some("L4".to_string())]
        );
        assert!(transport.requests().iter().all(|r| r.body["cnt"] == 2));
    }

    #[tokio::test]
    async fn test_empty_page_while_letters_remain() {
        let (transport, client) = client_with_page_size(2);
        transport.push_json(letter_page(4, ids(1, 2)));
        transport.push_json(letter_page(4, Vec::<String>::new()));
        let group = sample_group();
        let mut iter = client.letter_iterator(&group, SortOrder::Ascending);

        assert!(iter.advance().await.unwrap());
        assert!(iter.advance().await.unwrap());
        let err = iter.advance().await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Protocol(ProtocolError::EmptyPage { total: 4, seen: 2 })
        ));
        assert!(iter.current().unwrap_err().is_invalid_state());
    }

    #[tokio::test]
    async fn test_empty_first_page_with_nonzero_total() {
        let (transport, client) = client_with_page_size(30);
        transport.push_json(letter_page(3, Vec::<String>::new()));
        let group = sample_group();
        let mut iter = client.letter_iterator(&group, SortOrder::Ascending);

        let err = iter.advance().await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Protocol(ProtocolError::EmptyPage { total: 3, seen: 0 })
        ));
    }

    #[tokio::test]
    async fn test_error_is_terminal() {
        let (transport, client) = client_with_page_size(1);
        transport.push_json(letter_page(3, ids(1, 1)));
        transport.push_error(TransportError::Request("connection reset".to_string()));
        transport.push_json(letter_page(3, ids(2, 2)));
        let group = sample_group();
        let mut iter = client.letter_iterator(&group, SortOrder::Ascending);

        assert!(iter.advance().await.unwrap());
        let err = iter.advance().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));

        assert!(iter.current().unwrap_err().is_invalid_state());
        assert!(iter.advance().await.unwrap_err().is_invalid_state());
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_null_letter_fields_do_not_stop_iteration() {
        let (transport, client) = client_with_page_size(30);
        transport.push_json(double_encoded(
            "list",
            json!({
                "result_code": 200,
                "letter_cnt": 2,
                "letter_list": [
                    {"letter_id": "L1", "title": "Hi", "content": null, "status": 1,
                     "trainee_id": "T1", "create_date": 1_562_000_000_000_i64},
                    {"letter_id": "L2", "title": null, "content": "Still here", "status": null,
                     "trainee_id": null, "create_date": null}
                ]
            }),
        ));
        let group = sample_group();
        let mut iter = client.letter_iterator(&group, SortOrder::Ascending);

        assert!(iter.advance().await.unwrap());
        assert_eq!(iter.current().unwrap().content, "");
        assert!(iter.advance().await.unwrap());
        let second = iter.current().unwrap();
        assert_eq!(second.title, "");
        assert_eq!(second.content, "Still here");
        assert!(!second.is_sent());
        assert!(!iter.advance().await.unwrap());
    }

    #[tokio::test]
    async fn test_nested_failure_on_first_page() {
        let (transport, client) = client_with_page_size(30);
        transport.push_json(double_encoded(
            "list",
            json!({"result_code": 401, "letter_cnt": 0, "letter_list": []}),
        ));
        let group = sample_group();
        let mut iter = client.letter_iterator(&group, SortOrder::Ascending);

        assert!(iter.advance().await.unwrap_err().is_protocol());
        assert!(iter.advance().await.unwrap_err().is_invalid_state());
    }

    #[tokio::test]
    async fn test_total_is_refreshed_per_page() {
        // The mailbox shrank between fetches; the newer total wins.
        let (transport, client) = client_with_page_size(2);
        transport.push_json(letter_page(10, ids(1, 2)));
        transport.push_json(letter_page(3, ids(3, 4)));
        let group = sample_group();
        let mut iter = client.letter_iterator(&group, SortOrder::Ascending);

        assert!(iter.advance().await.unwrap());
        assert_eq!(iter.total_count(), Some(10));
        assert!(iter.advance().await.unwrap());
        assert!(iter.advance().await.unwrap());
        assert_eq!(iter.total_count(), Some(3));
        assert!(!iter.advance().await.unwrap());
    }

    #[tokio::test]
    async fn test_default_order_from_settings() {
        let transport = Arc::new(MockTransport::new());
        let client = CampClient::new(transport.clone()).with_settings(
            ClientSettings::default().with_default_order(SortOrder::Descending),
        );
        transport.push_json(letter_page(0, Vec::<String>::new()));
        let group = sample_group();
        let mut iter = client.default_letter_iterator(&group);

        assert_eq!(iter.order(), SortOrder::Descending);
        assert_eq!(iter.page_size(), 30);
        assert!(!iter.advance().await.unwrap());
        assert_eq!(transport.requests()[0].body["order"], "DESC");
    }

    #[tokio::test]
    async fn test_into_stream_takes_first_letters() {
        let (transport, client) = client_with_page_size(2);
        transport.push_json(letter_page(5, ids(1, 2)));
        transport.push_json(letter_page(5, ids(3, 4)));
        let group = sample_group();

        let letters: Vec<Letter> = client
            .letter_iterator(&group, SortOrder::Ascending)
            .into_stream()
            .take(3)
            .try_collect()
            .await
            .unwrap();

        let titles: Vec<_> = letters.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["title L1", "title L2", "title L3"]);
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_into_stream_ends_after_last_letter() {
        let (transport, client) = client_with_page_size(30);
        transport.push_json(letter_page(2, ids(1, 2)));
        let group = sample_group();

        let letters: Vec<Letter> = client
            .letter_iterator(&group, SortOrder::Ascending)
            .into_stream()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(letters.len(), 2);
        assert_eq!(transport.call_count(), 1);
    }
}
