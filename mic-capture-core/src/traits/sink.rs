use crate::models::config::Encoding;

/// Downstream consumer of finished frames.
///
/// Called from the sampling worker as fast as the peripheral produces data.
/// Backpressure, if any, is the sink's responsibility.
pub trait RingSink: Send + Sync + 'static {
    fn push(&self, encoding: Encoding, frame: &[u8]);
}
