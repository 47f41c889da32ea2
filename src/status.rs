//! Process-wide entity counters behind the status endpoint.
//!
//! These are diagnostics, not ledger data: they are bumped with relaxed
//! atomics after the owning transaction commits, so racing writers or a
//! crash between commit and bump can leave them slightly off. Nothing
//! correctness-critical may read them.

use std::sync::atomic::{AtomicI64, Ordering};

use crate::models::Status;

#[derive(Debug)]
pub struct Counters {
    users: AtomicI64,
    forums: AtomicI64,
    threads: AtomicI64,
    posts: AtomicI64,
}

pub static COUNTERS: Counters = Counters {
    users: AtomicI64::new(0),
    forums: AtomicI64::new(0),
    threads: AtomicI64::new(0),
    posts: AtomicI64::new(0),
};

impl Counters {
    pub fn add_user(&self) {
        self.users.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_forum(&self) {
        self.forums.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_thread(&self) {
        self.threads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_posts(&self, count: i64) {
        self.posts.fetch_add(count, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.users.store(0, Ordering::Relaxed);
        self.forums.store(0, Ordering::Relaxed);
        self.threads.store(0, Ordering::Relaxed);
        self.posts.store(0, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> Status {
        Status {
            user: self.users.load(Ordering::Relaxed),
            forum: self.forums.load(Ordering::Relaxed),
            thread: self.threads.load(Ordering::Relaxed),
            post: self.posts.load(Ordering::Relaxed),
        }
    }
}
