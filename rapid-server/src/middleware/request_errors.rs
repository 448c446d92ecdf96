use std::sync::{Arc, Mutex};

/// Error messages accumulated while one request is handled. Inserted into
/// the request extensions by the request logger; handlers and middleware
/// push into it, and the final log entry joins whatever landed here.
#[derive(Clone, Default)]
pub struct RequestErrors {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RequestErrors {
    pub fn push<M: Into<String>>(&self, message: M) {
        self.messages.lock().unwrap().push(message.into());
    }

    pub fn joined(&self) -> String {
        self.messages.lock().unwrap().join("; ")
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().unwrap().is_empty()
    }
}
