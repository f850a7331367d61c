// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! News-feed article snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Publisher of an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsSource {
    pub title: String,
    pub domain: String,
}

/// Currency an article is tagged with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyTag {
    pub code: String,
    pub title: String,
}

/// Community reactions to an article.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsVotes {
    pub negative: u32,
    pub positive: u32,
    pub important: u32,
    pub liked: u32,
}

/// One news article, immutable once cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    pub url: String,
    pub source: NewsSource,
    pub published_at: DateTime<Utc>,
    pub slug: String,
    #[serde(default)]
    pub currencies: Vec<CurrencyTag>,
    pub kind: String,
    #[serde(default)]
    pub votes: NewsVotes,
}

/// One page of articles with an opaque has-more marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsPage {
    pub articles: Vec<NewsArticle>,
    pub has_next: bool,
}
