//! Scripted in-process model for tests and offline runs.

use crate::model::{GenerateRequest, GenerateResponse, GenerativeModel};
use deckgen_core::Result;
use std::cell::RefCell;

type Responder = Box<dyn FnMut(&GenerateRequest) -> Result<GenerateResponse>>;

/// A [`GenerativeModel`] answering every request through a closure.
///
/// Every request is recorded and can be inspected afterwards.
pub struct MockModel {
    responder: RefCell<Responder>,
    requests: RefCell<Vec<GenerateRequest>>,
}

impl MockModel {
    pub fn new<F>(responder: F) -> Self
    where
        F: FnMut(&GenerateRequest) -> Result<GenerateResponse> + 'static,
    {
        Self {
            responder: RefCell::new(Box::new(responder)),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl GenerativeModel for MockModel {
    fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        self.requests.borrow_mut().push(request.clone());
        let mut responder = self.responder.borrow_mut();
        (*responder)(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_requests() {
        let mut counter = 0;
        let model = MockModel::new(move |_| {
            counter += 1;
            Ok(GenerateResponse::from_text(counter.to_string()))
        });

        let first = model.generate(&GenerateRequest::text("m", "a")).unwrap();
        let second = model.generate(&GenerateRequest::text("m", "b")).unwrap();

        assert_eq!(first.first_text(), Some("1"));
        assert_eq!(second.first_text(), Some("2"));
        assert_eq!(model.call_count(), 2);
        assert_eq!(model.requests()[1].prompt, "b");
    }
}
