use std::sync::Arc;

use crate::audit::{NegotiationAudit, NullAudit};
use crate::layout::SlackRounding;
use crate::logging::Logger;

/// Configuration knobs for a gridbox container.
#[derive(Clone)]
pub struct GridboxConfig {
    /// Default child margin. Also sets the minimum weighted track size,
    /// `2 * default_spacing + 1`.
    pub default_spacing: u16,
    /// Rounding applied when slack is shared between weighted tracks.
    pub slack_rounding: SlackRounding,
    /// Optional structured logger.
    pub logger: Option<Logger>,
    /// Observer for negotiation state transitions.
    pub audit: Arc<dyn NegotiationAudit>,
}

impl Default for GridboxConfig {
    fn default() -> Self {
        Self {
            default_spacing: 4,
            slack_rounding: SlackRounding::default(),
            logger: None,
            audit: Arc::new(NullAudit),
        }
    }
}

impl GridboxConfig {
    pub fn with_default_spacing(mut self, spacing: u16) -> Self {
        self.default_spacing = spacing;
        self
    }

    pub fn with_slack_rounding(mut self, rounding: SlackRounding) -> Self {
        self.slack_rounding = rounding;
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_audit<A>(mut self, audit: Arc<A>) -> Self
    where
        A: NegotiationAudit + 'static,
    {
        self.audit = audit;
        self
    }

    /// Floor applied to weighted tracks when slack is negative.
    pub fn min_track(&self) -> u16 {
        self.default_spacing.saturating_mul(2).saturating_add(1)
    }
}
