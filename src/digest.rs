use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single summarized article within a category.
///
/// Immutable once received; the reader never rewrites digest content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub subject: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<String>>,
}

/// One entry of the digest payload: an ordered mapping from category code
/// (e.g. "ID", "US", "XAUUSD") to its articles.
///
/// JSON object key order survives deserialization because the first-seen
/// order of category codes drives tab ordering; a hash map would scramble
/// it. The same code may appear in more than one bucket, so consumers merge
/// via [`Digest::articles_for`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryBucket {
    entries: Vec<(String, Vec<Article>)>,
}

impl CategoryBucket {
    pub fn from_entries(entries: Vec<(String, Vec<Article>)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(String, Vec<Article>)] {
        &self.entries
    }
}

impl Serialize for CategoryBucket {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (code, articles) in &self.entries {
            map.serialize_entry(code, articles)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryBucket {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct BucketVisitor;

        impl<'de> Visitor<'de> for BucketVisitor {
            type Value = CategoryBucket;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of category code to articles")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((code, articles)) = access.next_entry::<String, Vec<Article>>()? {
                    entries.push((code, articles));
                }
                Ok(CategoryBucket { entries })
            }
        }

        deserializer.deserialize_map(BucketVisitor)
    }
}

/// The date-scoped digest payload.
///
/// The upstream wraps the bucket sequence in a single-element outer array,
/// `[ CategoryBucket[] ]`. That wrapping is part of the wire contract and
/// round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Digest(Vec<Vec<CategoryBucket>>);

impl Digest {
    pub fn new(buckets: Vec<CategoryBucket>) -> Self {
        Self(vec![buckets])
    }

    /// The bucket sequence inside the single-element wrapper.
    pub fn buckets(&self) -> &[CategoryBucket] {
        self.0.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Unique category codes in first-seen order across the bucket sequence.
    pub fn category_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = Vec::new();
        for bucket in self.buckets() {
            for (code, _) in bucket.entries() {
                if !codes.iter().any(|c| c == code) {
                    codes.push(code.clone());
                }
            }
        }
        codes
    }

    /// All articles filed under `code`, merged across buckets in order.
    pub fn articles_for(&self, code: &str) -> Vec<&Article> {
        let mut articles = Vec::new();
        for bucket in self.buckets() {
            for (bucket_code, bucket_articles) in bucket.entries() {
                if bucket_code == code {
                    articles.extend(bucket_articles.iter());
                }
            }
        }
        articles
    }

    pub fn is_empty(&self) -> bool {
        self.buckets().iter().all(|b| b.entries().is_empty())
    }
}

/// Static display label for a category code; unknown codes render verbatim.
pub fn category_label(code: &str) -> &str {
    match code {
        "ID" => "Indonesia",
        "US" => "US Markets",
        "XAUUSD" => "Gold",
        "DXY" => "US Dollar Index",
        "Crypto" => "Cryptocurrency",
        other => other,
    }
}
