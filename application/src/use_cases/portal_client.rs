//! Portal client — login, groups, trainee detail, letters.
//!
//! Each operation is one request/decode/validate cycle: build the JSON body,
//! post it through the [`SessionTransport`], decode the [`Envelope`] and, where
//! the endpoint double-encodes its payload, hand the named field to
//! [`Envelope::nested`].

use crate::config::ClientSettings;
use crate::envelope::Envelope;
use crate::error::{ProtocolError, Result};
use crate::ports::session_transport::SessionTransport;
use crate::use_cases::letter_iterator::LetterIterator;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use thecamp_domain::core::serde_helpers::number_or_string;
use thecamp_domain::{Group, Letter, SortOrder, TraineeInfo, TraineeProfile};
use tracing::{debug, info, warn};

/// Endpoint paths, relative to the portal host.
pub mod endpoints {
    pub const LOGIN: &str = "/pcws/common/login.do";
    pub const MY_GROUP_LIST: &str = "/pcws/troop/group/getMyGroupList.do";
    // The portal's own web client calls this one without a leading slash.
    pub const GROUP_DETAIL: &str = "pcws/troop/group/getGroupDetail.do";
    pub const LETTER_LIST: &str = "/pcws/message/letter/getList.do";
    pub const LETTER_INSERT: &str = "/pcws/message/letter/insert.do";
}

/// One page of the letter listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterPage {
    /// Total number of letters the portal reports for the group
    pub total: usize,
    /// Letters in this page, in the requested order
    pub letters: Vec<Letter>,
}

#[derive(Deserialize)]
struct GroupListPayload {
    #[serde(default)]
    my_group: Option<Vec<Group>>,
}

#[derive(Deserialize)]
struct GroupDetailPayload {
    trainee_info: TraineeProfile,
}

#[derive(Deserialize)]
struct LetterListPayload {
    #[serde(deserialize_with = "number_or_string")]
    letter_cnt: i64,
    #[serde(default)]
    letter_list: Option<Vec<Letter>>,
}

/// Client for the portal's private JSON API.
///
/// The session lives in the transport's cookie store, so a client must be
/// logged in before any other call succeeds. Operations are strictly
/// sequential; there are no retries.
pub struct CampClient {
    transport: Arc<dyn SessionTransport>,
    settings: ClientSettings,
}

impl CampClient {
    pub fn new(transport: Arc<dyn SessionTransport>) -> Self {
        Self {
            transport,
            settings: ClientSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ClientSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    async fn call(&self, path: &str, body: Value) -> Result<Envelope> {
        debug!(path, "Posting portal request");
        let raw = self.transport.post(path, &body).await?;
        let envelope = Envelope::decode(&raw)?;
        debug!(path, code = envelope.code, "Portal responded");
        Ok(envelope)
    }

    /// Sign in. The session token is kept by the transport, never returned.
    ///
    /// Returns `false` when the portal answers with a non-200 code.
    pub async fn login(&self, id: &str, password: &str) -> Result<bool> {
        let body = json!({
            "subsType": "1",
            "user-id": id,
            "user-pwd": password,
        });
        let envelope = self.call(endpoints::LOGIN, body).await?;
        let success = envelope.is_success();
        if success {
            info!(user = id, "Logged in");
        } else {
            warn!(user = id, code = envelope.code, "Login rejected");
        }
        Ok(success)
    }

    /// Groups the signed-in account belongs to, with padded names trimmed.
    pub async fn list_groups(&self) -> Result<Vec<Group>> {
        let envelope = self.call(endpoints::MY_GROUP_LIST, json!({})).await?;
        let payload: GroupListPayload = envelope.nested("list2")?;
        let groups: Vec<Group> = payload
            .my_group
            .unwrap_or_default()
            .into_iter()
            .map(Group::trimmed)
            .collect();
        info!(count = groups.len(), "Fetched groups");
        Ok(groups)
    }

    /// Trainee of `group`; the returned info borrows the group.
    pub async fn trainee_detail<'g>(&self, group: &'g Group) -> Result<TraineeInfo<'g>> {
        let body = json!({ "group_id": group.id });
        let envelope = self.call(endpoints::GROUP_DETAIL, body).await?;
        let payload: GroupDetailPayload = envelope.nested("group")?;
        Ok(TraineeInfo::new(group, payload.trainee_info))
    }

    /// Send a letter to the trainee. Attachments are not supported.
    ///
    /// Returns `false` when the portal answers with a non-200 code.
    pub async fn send_letter(
        &self,
        trainee: &TraineeInfo<'_>,
        title: &str,
        content: &str,
    ) -> Result<bool> {
        // "relationsip" is the portal's spelling.
        let body = json!({
            "unit_code": trainee.group.unit_code,
            "group_id": trainee.group.id,
            "trainee_name": trainee.name,
            "birth": trainee.birthday,
            "relationsip": trainee.relationship,
            "title": title,
            "content": content,
            "fileInfo": [],
        });
        let envelope = self.call(endpoints::LETTER_INSERT, body).await?;
        let success = envelope.is_success();
        if success {
            info!(group_id = %trainee.group.id, "Letter sent");
        } else {
            warn!(group_id = %trainee.group.id, code = envelope.code, "Letter rejected");
        }
        Ok(success)
    }

    /// Fetch up to `count` letters of `group` that follow `cursor`.
    ///
    /// Without a cursor the listing starts from the beginning in `order`.
    pub async fn fetch_letters(
        &self,
        group: &Group,
        cursor: Option<&str>,
        count: usize,
        order: SortOrder,
    ) -> Result<LetterPage> {
        let mut body = json!({
            "unit_code": group.unit_code,
            "group_id": group.id,
            "order": order.as_str(),
            "cnt": count,
        });
        if let Some(letter_id) = cursor {
            body["letter_id"] = Value::from(letter_id);
        }

        let envelope = self.call(endpoints::LETTER_LIST, body).await?;
        let payload: LetterListPayload = envelope.nested("list")?;
        let total = usize::try_from(payload.letter_cnt).map_err(|_| {
            ProtocolError::UnexpectedShape {
                field: "list.letter_cnt".to_string(),
                detail: format!("expected a non-negative count, found {}", payload.letter_cnt),
            }
        })?;
        let letters = payload.letter_list.unwrap_or_default();
        debug!(total, fetched = letters.len(), ?cursor, "Fetched letter page");
        Ok(LetterPage { total, letters })
    }

    /// Forward-only iterator over the letters of `group`.
    ///
    /// No request is made until the first [`LetterIterator::advance`].
    pub fn letter_iterator<'c>(&'c self, group: &'c Group, order: SortOrder) -> LetterIterator<'c> {
        LetterIterator::new(self, group, order, self.settings.page_size)
    }

    /// Like [`letter_iterator`](Self::letter_iterator) with the configured default order.
    pub fn default_letter_iterator<'c>(&'c self, group: &'c Group) -> LetterIterator<'c> {
        self.letter_iterator(group, self.settings.default_order)
    }
}
