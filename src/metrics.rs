// Copyright (c) Microblog Team
// SPDX-License-Identifier: Apache-2.0

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

fn counter(name: &str, help: &str) -> IntCounter {
    let counter = IntCounter::new(name, help).expect("valid counter definition");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("counter registered once");
    counter
}

pub static TWEETS_CREATED: Lazy<IntCounter> =
    Lazy::new(|| counter("tweets_created_total", "Tweets created"));
pub static TWEETS_DELETED: Lazy<IntCounter> =
    Lazy::new(|| counter("tweets_deleted_total", "Tweets deleted"));
pub static LIKES_ADDED: Lazy<IntCounter> =
    Lazy::new(|| counter("likes_added_total", "Likes recorded"));
pub static LIKES_REMOVED: Lazy<IntCounter> =
    Lazy::new(|| counter("likes_removed_total", "Likes removed"));
pub static FOLLOWS_ADDED: Lazy<IntCounter> =
    Lazy::new(|| counter("follows_added_total", "Follow edges created"));
pub static FOLLOWS_REMOVED: Lazy<IntCounter> =
    Lazy::new(|| counter("follows_removed_total", "Follow edges removed"));
pub static MEDIA_UPLOADED: Lazy<IntCounter> =
    Lazy::new(|| counter("media_uploaded_total", "Media blobs uploaded"));

/// Render the registry in the prometheus text exposition format.
pub fn gather() -> Vec<u8> {
    let mut buffer = Vec::new();
    let _ = TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer);
    buffer
}
