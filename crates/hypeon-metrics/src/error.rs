use thiserror::Error;

use hypeon_core::Platform;

/// The scoring pipeline is total almost everywhere: missing data and
/// malformed rows degrade to empty mappings and skipped rows. The variants
/// here cover the few operations with a genuine precondition.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("product-level growth requires a niche filter")]
    MissingNicheFilter,

    #[error("platform {0} has no product-level growth variant")]
    UnsupportedPlatform(Platform),
}
