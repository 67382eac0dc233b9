/// Entity identifiers are opaque strings assigned upstream.
pub type EntityId = String;

/// Layout identifiers are opaque strings assigned upstream.
pub type LayoutId = String;

/// The last URL segment of the page, used as a persistence key
/// alongside the layout id.
pub type PageSegment = String;
