use geoview_core::error::Result;
use geoview_core::ports::{LayerSource, LayerTarget};
use geoview_map::{LoadTicket, MapSession};
use serde_json::Value;

/// Run the fetch for a ticket without holding the session, so several loads
/// can be in flight. Hand the pair to `MapSession::complete_load`; only the
/// most recent ticket will be applied.
pub async fn fetch_for_ticket(
    source: &dyn LayerSource,
    ticket: LoadTicket,
) -> (LoadTicket, Result<Value>) {
    tracing::info!(source = source.source_name(), scope = %ticket.target(), "Requesting layers");
    let result = source.fetch_layers(ticket.target()).await;
    (ticket, result)
}

/// Fetch layers for `target` and apply them to `session`.
///
/// Returns whether the response was applied. Fetch failures are reported
/// through the session's status events rather than as an error.
pub async fn load_layers(
    session: &mut MapSession,
    source: &dyn LayerSource,
    target: LayerTarget,
) -> bool {
    let ticket = session.begin_load(target);
    let (ticket, result) = fetch_for_ticket(source, ticket).await;
    session.complete_load(ticket, result)
}
