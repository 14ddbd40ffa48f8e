//! Bundle pages and accumulated collections.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Relation name of the continuation link.
const NEXT: &str = "next";

/// One page of a search or `$everything` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    /// Entries in server order. Absent when the page is empty.
    #[serde(default)]
    pub entry: Vec<BundleEntry>,

    /// Navigation links. Absent on single-page responses from some servers.
    #[serde(default)]
    pub link: Vec<BundleLink>,
}

/// A single bundle entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,
}

/// A bundle navigation link. Missing fields decode as empty strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleLink {
    #[serde(default)]
    pub relation: String,
    #[serde(default)]
    pub url: String,
}

impl Page {
    /// Returns the URL of the next page, if the server offered one.
    ///
    /// `next` links with an empty URL are ignored.
    pub fn next_link(&self) -> Option<&str> {
        self.link
            .iter()
            .filter(|l| l.relation == NEXT)
            .map(|l| l.url.trim())
            .find(|url| !url.is_empty())
    }

    /// Number of entries on this page.
    pub fn len(&self) -> usize {
        self.entry.len()
    }

    /// Returns true if the page has no entries.
    pub fn is_empty(&self) -> bool {
        self.entry.is_empty()
    }

    /// Consume the page, returning its resources in entry order.
    ///
    /// Entries without a `resource` are skipped.
    pub fn into_resources(self) -> impl Iterator<Item = Value> {
        self.entry.into_iter().filter_map(|e| e.resource)
    }
}

/// Resources accumulated across every page of one fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceCollection {
    resources: Vec<Value>,
    pages: usize,
}

impl ResourceCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page's resources after everything collected so far.
    ///
    /// Returns the number of entries on the page that carried no resource.
    pub fn extend_from_page(&mut self, page: Page) -> usize {
        let total = page.len();
        let before = self.resources.len();
        self.resources.extend(page.into_resources());
        self.pages += 1;
        total - (self.resources.len() - before)
    }

    /// The collected resources, in page-then-entry order.
    pub fn resources(&self) -> &[Value] {
        &self.resources
    }

    /// Number of pages fetched.
    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.resources.iter()
    }

    pub fn into_resources(self) -> Vec<Value> {
        self.resources
    }

    /// Render as a FHIR `Bundle` of type `collection`.
    pub fn to_bundle(&self) -> Value {
        let entry: Vec<Value> = self
            .resources
            .iter()
            .map(|resource| json!({ "resource": resource }))
            .collect();

        json!({
            "resourceType": "Bundle",
            "type": "collection",
            "total": self.resources.len(),
            "entry": entry,
        })
    }
}

impl<'a> IntoIterator for &'a ResourceCollection {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}
