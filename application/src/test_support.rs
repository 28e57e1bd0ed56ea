//! Test doubles shared by the use case tests.

use crate::ports::session_transport::{SessionTransport, TransportError};
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;
use thecamp_domain::Group;

/// A request the mock transport received.
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub path: String,
    pub body: Value,
}

/// Transport that replays scripted responses and records every request.
pub(crate) struct MockTransport {
    responses: Mutex<VecDeque<Result<Vec<u8>, TransportError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn push_json(&self, value: Value) {
        self.push_raw(serde_json::to_vec(&value).unwrap());
    }

    pub fn push_raw(&self, body: impl Into<Vec<u8>>) {
        self.responses.lock().unwrap().push_back(Ok(body.into()));
    }

    pub fn push_error(&self, error: TransportError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl SessionTransport for MockTransport {
    async fn post(&self, path: &str, body: &Value) -> Result<Vec<u8>, TransportError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            path: path.to_string(),
            body: body.clone(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Request("No scripted response".to_string())))
    }
}

// ==================== Response builders ====================

/// Outer envelope with the given code and `resultData`.
pub(crate) fn envelope(code: i64, data: Value) -> Value {
    json!({
        "resultCode": code,
        "resultMessage": if code == 200 { "OK" } else { "FAIL" },
        "resultData": data,
    })
}

/// Successful outer envelope whose `field` carries `inner` as a JSON string.
pub(crate) fn double_encoded(field: &str, inner: Value) -> Value {
    let mut data = Map::new();
    data.insert(field.to_string(), Value::String(inner.to_string()));
    envelope(200, Value::Object(data))
}

/// Letter listing page reporting `total` letters and containing `ids`.
pub(crate) fn letter_page<I, S>(total: usize, ids: I) -> Value
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let letters: Vec<Value> = ids
        .into_iter()
        .map(|id| {
            let id = id.into();
            json!({
                "letter_id": id,
                "title": format!("title {}", id),
                "content": format!("content {}", id),
                "status": 1,
                "trainee_id": "T1",
                "create_date": 1_562_000_000_000_i64,
            })
        })
        .collect();
    double_encoded(
        "list",
        json!({"result_code": 200, "letter_cnt": total, "letter_list": letters}),
    )
}

/// Ids `L{from}..=L{to}`, or descending when `from > to`.
pub(crate) fn ids(from: usize, to: usize) -> Vec<String> {
    if from <= to {
        (from..=to).map(|n| format!("L{}", n)).collect()
    } else {
        (to..=from).rev().map(|n| format!("L{}", n)).collect()
    }
}

pub(crate) fn sample_group() -> Group {
    Group {
        id: "G1".to_string(),
        name: "Recruit Class 3".to_string(),
        unit_name: "Training Center".to_string(),
        unit_code: "U1".to_string(),
        full_name: "Training Center Recruit Class 3".to_string(),
        entered_date: "2019-07-01".to_string(),
    }
}
