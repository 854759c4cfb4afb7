use std::{io::Read, time::Duration};
use serde::{Deserialize, Serialize};
use super::*;

pub const DEFAULT_TICK_PERIOD_MS: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    pub tick_period_ms: u64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
        }
    }
}

impl CounterConfig {
    pub fn tick_period(&self) -> Duration { Duration::from_millis(self.tick_period_ms) }

    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period_ms = u64::try_from(period.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_period_ms == 0 {
            return Err(Error::Config(format!(
                "tick_period_ms must be positive, got {}", self.tick_period_ms,
            )));
        }
        Ok(())
    }

    pub fn from_cbor<R: Read>(reader: R) -> Result<Self> {
        let config: Self = ciborium::from_reader(reader)
        .map_err(|err| Error::Config(format!("read CBOR -> Err({err})")))?;

        config.validate()?;
        Ok(config)
    }

    pub fn to_payload(&self) -> Result<Payload> {
        Payload::from_state(self)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use super::*;

    #[test]
    fn default_ticks_once_per_second() {
        assert_eq!(CounterConfig::default().tick_period(), Duration::from_secs(1));
    }

    #[test]
    fn zero_period_is_rejected() {
        let config = CounterConfig::default().with_tick_period(Duration::ZERO);
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let payload = config.to_payload().unwrap();
        assert!(matches!(
            CounterConfig::from_cbor(Cursor::new(payload.as_bytes())),
            Err(Error::Config(_)),
        ));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let payload = Payload::from_state(&std::collections::BTreeMap::<String, u64>::new()).unwrap();
        let config = CounterConfig::from_cbor(Cursor::new(payload.as_bytes())).unwrap();

        assert_eq!(config, CounterConfig::default());
    }
}
