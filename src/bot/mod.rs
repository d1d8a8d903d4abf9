/// Delivery pipeline for fetched media
pub mod delivery;
/// Command and message handlers
pub mod handlers;
/// Outbound messaging abstraction
pub mod messenger;
