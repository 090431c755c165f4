//! Transient user-facing notices (info, success, error).

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// One message shown to the user until its time-to-live runs out.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub posted_at: Instant,
    pub ttl: Duration,
}

impl Notice {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.posted_at) >= self.ttl
    }
}

/// Anything that can display notices.
pub trait NoticeSink: Send + Sync {
    fn post(&self, kind: NoticeKind, message: String);

    fn info(&self, message: String) {
        self.post(NoticeKind::Info, message);
    }

    fn success(&self, message: String) {
        self.post(NoticeKind::Success, message);
    }

    fn error(&self, message: String) {
        self.post(NoticeKind::Error, message);
    }
}

/// In-memory notice stack that dismisses notices once their TTL elapses.
#[derive(Debug)]
pub struct NoticeBoard {
    ttl: Duration,
    notices: Mutex<Vec<Notice>>,
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            notices: Mutex::new(Vec::new()),
        }
    }

    /// Notices still visible at `now`, oldest first. Expired ones are dropped.
    pub fn active(&self, now: Instant) -> Vec<Notice> {
        let mut notices = self
            .notices
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        notices.retain(|n| !n.is_expired(now));
        notices.clone()
    }

    /// Notices held right now, expired or not.
    pub fn len(&self) -> usize {
        self.notices
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Messages currently visible, for quick assertions and status lines.
    pub fn messages(&self) -> Vec<(NoticeKind, String)> {
        self.active(Instant::now())
            .into_iter()
            .map(|n| (n.kind, n.message))
            .collect()
    }
}

impl NoticeSink for NoticeBoard {
    fn post(&self, kind: NoticeKind, message: String) {
        let now = Instant::now();
        let notice = Notice {
            kind,
            message,
            posted_at: now,
            ttl: self.ttl,
        };
        let mut notices = self
            .notices
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        notices.retain(|n| !n.is_expired(now));
        notices.push(notice);
    }
}

/// Prints notices to stderr as they are posted and keeps them on a board.
#[derive(Debug)]
pub struct ConsoleNotices {
    board: NoticeBoard,
}

impl ConsoleNotices {
    pub fn new(ttl: Duration) -> Self {
        Self {
            board: NoticeBoard::new(ttl),
        }
    }

    /// Notices that have not been dismissed yet.
    pub fn active(&self) -> Vec<Notice> {
        self.board.active(Instant::now())
    }
}

impl NoticeSink for ConsoleNotices {
    fn post(&self, kind: NoticeKind, message: String) {
        let marker = match kind {
            NoticeKind::Info => "i",
            NoticeKind::Success => "\u{2713}",
            NoticeKind::Error => "\u{2717}",
        };
        match kind {
            NoticeKind::Error => tracing::warn!(%message, "Notice"),
            _ => tracing::debug!(%message, "Notice"),
        }
        eprintln!("  {marker} {message}");
        self.board.post(kind, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_keeps_posted_notices() {
        let board = NoticeBoard::new(Duration::from_secs(5));
        board.info("one".into());
        board.error("two".into());
        assert_eq!(
            board.messages(),
            vec![
                (NoticeKind::Info, "one".to_string()),
                (NoticeKind::Error, "two".to_string())
            ]
        );
    }

    #[test]
    fn test_post_drops_expired_notices() {
        let board = NoticeBoard::new(Duration::ZERO);
        for i in 0..50 {
            board.info(format!("notice {i}"));
        }
        // A zero TTL expires each notice before the next post.
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_board_dismisses_after_ttl() {
        let board = NoticeBoard::new(Duration::from_secs(5));
        board.success("sent".into());
        let later = Instant::now() + Duration::from_secs(6);
        assert!(board.active(later).is_empty());
        // Expired notices are gone for good.
        assert!(board.messages().is_empty());
    }
}
