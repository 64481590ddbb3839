use async_trait::async_trait;
use hermes_core::SignalFrame;

/// Port to the strategy engine
///
/// One frame per rebalancing cycle. `None` means the source is exhausted
/// and the signal loop should stop; a live strategy engine never returns
/// `None`.
#[async_trait]
pub trait SignalSource: Send {
    async fn next_frame(&mut self) -> Option<SignalFrame>;
}
