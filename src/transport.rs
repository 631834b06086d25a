use std::fmt;

use crate::forms::SubmissionRecord;

pub(crate) const SIMULATED_DELAY_MS: i64 = 2000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError(pub String);

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for TransportError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub delay_ms: i64,
    pub outcome: std::result::Result<(), TransportError>,
}

impl Delivery {
    pub fn accepted_after(delay_ms: i64) -> Self {
        Self {
            delay_ms,
            outcome: Ok(()),
        }
    }

    pub fn failed_after(delay_ms: i64, reason: &str) -> Self {
        Self {
            delay_ms,
            outcome: Err(TransportError(reason.to_string())),
        }
    }
}

// The page hands every validated record to a transport and schedules the
// completion on the page clock after the reported delay.
pub trait SubmissionTransport {
    fn submit(&mut self, record: &SubmissionRecord) -> Delivery;
}

// Stand-in for the real endpoint: accepts everything after a fixed delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedTransport;

impl SubmissionTransport for SimulatedTransport {
    fn submit(&mut self, _record: &SubmissionRecord) -> Delivery {
        Delivery::accepted_after(SIMULATED_DELAY_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_transport_accepts_after_fixed_delay() {
        let record = SubmissionRecord {
            name: "Max".into(),
            email: "max@example.de".into(),
            phone: String::new(),
            service: "umzug".into(),
            message: "Zehn Zeichen sind hier locker erreicht.".into(),
            privacy: true,
        };
        let delivery = SimulatedTransport.submit(&record);
        assert_eq!(delivery.delay_ms, 2000);
        assert_eq!(delivery.outcome, Ok(()));
    }
}
