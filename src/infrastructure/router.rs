//! History-stack router, the in-process stand-in for the browser router

use std::sync::Mutex;

use crate::application::ports::outbound::Router;

#[derive(Debug)]
pub struct HistoryRouter {
    history: Mutex<Vec<String>>,
}

impl HistoryRouter {
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            history: Mutex::new(vec![start.into()]),
        }
    }

    /// The path currently shown
    pub fn current(&self) -> String {
        self.history
            .lock()
            .map(|h| h.last().cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    pub fn history(&self) -> Vec<String> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }
}

impl Router for HistoryRouter {
    fn navigate(&self, path: &str) {
        if let Ok(mut history) = self.history.lock() {
            tracing::debug!(from = ?history.last(), to = path, "Navigating");
            history.push(path.to_string());
        }
    }

    /// The first entry is never popped
    fn back(&self) {
        if let Ok(mut history) = self.history.lock() {
            if history.len() > 1 {
                history.pop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigate_and_back() {
        let router = HistoryRouter::new("/");
        router.navigate("/create");
        router.navigate("/create/genre");
        assert_eq!(router.current(), "/create/genre");

        router.back();
        router.back();
        router.back();
        assert_eq!(router.current(), "/");
        assert_eq!(router.history(), vec!["/".to_string()]);
    }
}
