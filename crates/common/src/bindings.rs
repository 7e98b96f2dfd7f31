//! Variable names projected by the event queries.
//!
//! The query templates select these variables and the aggregate builder
//! reads them back from each [`Row`](crate::Row), so both sides share one
//! definition.

/// Event URI; the identity key in listing queries.
pub const ITEM: &str = "item";
/// Event name.
pub const ITEM_LABEL: &str = "itemlabel";
/// Start instant, an `xsd:dateTime` literal.
pub const TIME_START: &str = "timeStart";
/// End instant, an `xsd:dateTime` literal.
pub const TIME_END: &str = "timeEnd";
/// Full address of the event site.
pub const ADDRESS: &str = "address";
/// Site URI.
pub const SITE: &str = "site";
pub const LOGO: &str = "logo";
pub const DESCRIPTION: &str = "description";
pub const HOMEPAGE: &str = "homepage";
/// Label of the event site.
pub const EVENT_PLACE: &str = "eventPlace";
/// Participant URI.
pub const AGENT: &str = "agent";
/// Participant name.
pub const PARTICIPANT_NAME: &str = "partname";
pub const POST: &str = "post";
pub const POST_TITLE: &str = "ptitle";
pub const POST_LABEL: &str = "plabel";
/// Name of the post's creator.
pub const POST_CREATOR: &str = "pcreat";
/// Photo URI.
pub const DEPICTION: &str = "depiction";
