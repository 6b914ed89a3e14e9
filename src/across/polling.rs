/// How the client waits for a relayer to fill a deposit.
///
/// Fills are observed by querying the destination spoke pool for a
/// `FilledV3Relay` log, once per interval, until one shows up or the attempts
/// run out.
///
/// # Examples
///
/// ```rust
/// use across_actions::PollingConfig;
///
/// // 60 attempts, 5 seconds apart
/// let config = PollingConfig::default();
///
/// // A forked network where the fill is replayed in-process
/// let config = PollingConfig::forked_network();
///
/// let config = PollingConfig::default()
///     .with_max_attempts(10)
///     .with_poll_interval_secs(2);
/// assert_eq!(config.total_timeout_secs(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    pub max_attempts: u32,
    pub poll_interval_secs: u64,
}

impl Default for PollingConfig {
    /// Five minutes of polling, which covers typical Across fill times of a
    /// few seconds with room for congested routes.
    fn default() -> Self {
        Self {
            max_attempts: 60,
            poll_interval_secs: 5,
        }
    }
}

impl PollingConfig {
    /// Short polling for virtual testnets, where the fill is sent by the
    /// simulation itself before polling starts.
    pub fn forked_network() -> Self {
        Self {
            max_attempts: 10,
            poll_interval_secs: 1,
        }
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_poll_interval_secs(mut self, secs: u64) -> Self {
        self.poll_interval_secs = secs;
        self
    }

    /// `max_attempts * poll_interval_secs`
    pub fn total_timeout_secs(&self) -> u64 {
        self.max_attempts as u64 * self.poll_interval_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PollingConfig::default();
        assert_eq!(config.max_attempts, 60);
        assert_eq!(config.poll_interval_secs, 5);
        assert_eq!(config.total_timeout_secs(), 300);
    }

    #[test]
    fn test_forked_network_config() {
        let config = PollingConfig::forked_network();
        assert_eq!(config.total_timeout_secs(), 10);
    }

    #[test]
    fn test_builder_methods() {
        let config = PollingConfig::forked_network()
            .with_max_attempts(3)
            .with_poll_interval_secs(7);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.total_timeout_secs(), 21);
    }
}
