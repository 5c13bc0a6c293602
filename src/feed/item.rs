/// Author placeholder used when a record carries no usable contributor tag.
pub const AUTHOR_NOT_AVAILABLE: &str = "Not Available!";

/// One news entry as returned by the content API.
///
/// All fields are owned strings; an empty string is the failure-safe value,
/// never an absent one. Items are built once by the parser and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub section: String,
    pub author_name: String,
    /// Raw `webPublicationDate` text, e.g. `2019-01-20T10:30:00Z`.
    pub publication_timestamp: String,
    pub url: String,
}
