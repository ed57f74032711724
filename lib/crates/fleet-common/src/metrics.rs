use std::fmt;

use serde::{Deserialize, Serialize};

use crate::validate::ValidationError;

/// Resource snapshot reported by an agent's host.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct HostMetrics {
    /// CPU usage in percent.
    pub cpu_usage: f32,
    /// Available memory in bytes.
    pub ram_available: u64,
    /// Total memory in bytes.
    pub ram_total: u64,
}

impl HostMetrics {
    pub fn check(&self) -> Result<(), ValidationError> {
        if !self.cpu_usage.is_finite() || self.cpu_usage < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "metrics.cpu_usage",
                reason: format!("{} is not a usage percentage", self.cpu_usage),
            });
        }
        if self.ram_available > self.ram_total {
            return Err(ValidationError::InvalidValue {
                field: "metrics.ram_available",
                reason: format!(
                    "{} exceeds ram_total {}",
                    self.ram_available, self.ram_total
                ),
            });
        }
        Ok(())
    }
}

impl fmt::Display for HostMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1}%, {} / {}",
            self.cpu_usage, self.ram_available, self.ram_total
        )
    }
}
