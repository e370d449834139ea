//! Recording transport for service tests

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;

use super::client::{ApiClient, ApiRequest, ApiResponse, Transport};
use super::error::ApiError;

#[derive(Clone, Default)]
pub struct MockTransport {
    requests: Rc<RefCell<Vec<ApiRequest>>>,
    replies: Rc<RefCell<VecDeque<Result<ApiResponse, ApiError>>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, status: u16, body: Value) {
        self.reply_raw(status, body.to_string().into_bytes());
    }

    pub fn reply_raw(&self, status: u16, body: Vec<u8>) {
        self.replies
            .borrow_mut()
            .push_back(Ok(ApiResponse { status, body }));
    }

    pub fn fail(&self, err: ApiError) {
        self.replies.borrow_mut().push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests
            .borrow()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.requests.borrow_mut().push(request);
        self.replies.borrow_mut().pop_front().unwrap_or(Ok(ApiResponse {
            status: 200,
            body: b"null".to_vec(),
        }))
    }
}

/// Client over a fresh mock, plus a handle to inspect it
pub fn mock_client() -> (ApiClient<MockTransport>, MockTransport) {
    let mock = MockTransport::new();
    (ApiClient::new(mock.clone()), mock)
}
