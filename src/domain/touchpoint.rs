//! Touchpoint data model: raw research records, normalized touchpoints,
//! and classification results

use crate::domain::error::{AssessmentError, Location, Result};
use crate::domain::types::{Axis, Channel, Quadrant, Scale, Stage, TouchpointId};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Generate a new UUIDv7 (time-sortable)
pub fn new_uuid_v7() -> String {
    Uuid::now_v7().to_string()
}

/// Get current epoch milliseconds
#[inline]
pub fn epoch_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64
}

/// A raw rating together with the scale it was collected on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawScore {
    pub value: f64,
    pub scale: Scale,
}

impl RawScore {
    pub fn new(value: f64, scale: Scale) -> Self {
        Self { value, scale }
    }
}

/// Touchpoint as exported from research data, before normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTouchpoint {
    pub id: TouchpointId,
    pub name: String,
    pub stage: Stage,
    pub channel: Channel,
    pub importance: RawScore,
    pub performance: RawScore,
    #[serde(default)]
    pub owner: String,
}

/// One customer-interaction point with normalized scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Touchpoint {
    pub id: TouchpointId,
    pub name: String,
    pub stage: Stage,
    pub channel: Channel,
    /// Normalized [0,1]; higher = more important to the customer
    #[serde(rename = "importance")]
    pub customer_importance: f64,
    /// Normalized [0,1]; higher = performing better today
    #[serde(rename = "performance")]
    pub current_performance: f64,
    /// Informational only, never used in classification
    #[serde(default)]
    pub owner: String,
}

impl Touchpoint {
    /// Create a touchpoint with empty name and owner, mostly useful in tests and
    /// for callers that already hold normalized scores.
    ///
    /// # Example
    ///
    /// ```
    /// use touchpoint_prioritizer::domain::touchpoint::Touchpoint;
    /// use touchpoint_prioritizer::domain::types::Channel;
    ///
    /// let tp = Touchpoint::new("TC-001", "Onboarding", Channel::Digital, 0.9, 0.2);
    /// assert!(tp.validate().is_ok());
    /// ```
    pub fn new(
        id: &str,
        stage: &str,
        channel: Channel,
        importance: f64,
        performance: f64,
    ) -> Self {
        Self {
            id: TouchpointId::from(id),
            name: String::new(),
            stage: Stage::from(stage),
            channel,
            customer_importance: importance,
            current_performance: performance,
            owner: String::new(),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Check that both scores are finite and within [0,1]
    pub fn validate(&self) -> Result<()> {
        check_unit(self.customer_importance).map_err(|e| e.at(&self.id, Axis::Importance))?;
        check_unit(self.current_performance).map_err(|e| e.at(&self.id, Axis::Performance))?;
        Ok(())
    }

    /// Importance/performance gap
    #[inline]
    pub fn gap(&self) -> f64 {
        self.customer_importance - self.current_performance
    }
}

fn check_unit(value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(AssessmentError::OutOfRange {
            at: Location::default(),
            value,
            min: 0.0,
            max: 1.0,
            tolerance: 0.0,
        })
    }
}

/// Touchpoint with its assigned quadrant; derived per classification run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedTouchpoint {
    #[serde(flatten)]
    pub touchpoint: Touchpoint,
    pub quadrant: Quadrant,
    /// importance - performance; orders the FixFirst group
    #[serde(rename = "priority")]
    pub priority_score: f64,
}

impl ClassifiedTouchpoint {
    #[inline]
    pub fn id(&self) -> &TouchpointId {
        &self.touchpoint.id
    }

    #[inline]
    pub fn importance(&self) -> f64 {
        self.touchpoint.customer_importance
    }

    #[inline]
    pub fn performance(&self) -> f64 {
        self.touchpoint.current_performance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_bounds() {
        let tp = Touchpoint::new("A", "Support", Channel::Human, 0.0, 1.0);
        assert!(tp.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_importance() {
        let tp = Touchpoint::new("TC-009", "Support", Channel::Human, 1.2, 0.4);
        let err = tp.validate().unwrap_err();
        match err {
            AssessmentError::OutOfRange { at, value, .. } => {
                assert_eq!(at.touchpoint, Some(TouchpointId::from("TC-009")));
                assert_eq!(at.axis, Some(Axis::Importance));
                assert_eq!(value, 1.2);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_nan_performance() {
        let tp = Touchpoint::new("A", "Support", Channel::Human, 0.5, f64::NAN);
        assert!(matches!(
            tp.validate(),
            Err(AssessmentError::OutOfRange { at: Location { axis: Some(Axis::Performance), .. }, .. })
        ));
    }

    #[test]
    fn test_raw_touchpoint_from_json() {
        let json = r#"{
            "id": "TC-010",
            "name": "Password reset email",
            "stage": "Support",
            "channel": "Communication",
            "importance": {"value": 4, "scale": "likert5"},
            "performance": {"value": 35, "scale": {"min": 0, "max": 100}}
        }"#;
        let raw: RawTouchpoint = serde_json::from_str(json).unwrap();
        assert_eq!(raw.id.as_str(), "TC-010");
        assert_eq!(raw.channel, Channel::Communication);
        assert_eq!(raw.importance.scale, Scale::likert5());
        assert_eq!(raw.performance.scale, Scale::percent());
        assert!(raw.owner.is_empty());
    }

    #[test]
    fn test_classified_serializes_flat() {
        let classified = ClassifiedTouchpoint {
            touchpoint: Touchpoint::new("A", "Decision", Channel::Digital, 0.8, 0.3)
                .with_name("Pricing page"),
            quadrant: Quadrant::FixFirst,
            priority_score: 0.5,
        };
        let value = serde_json::to_value(&classified).unwrap();
        assert_eq!(value["id"], "A");
        assert_eq!(value["channel"], "digital");
        assert_eq!(value["quadrant"], "fix_first");
        assert_eq!(value["importance"], 0.8);
        assert_eq!(value["priority"], 0.5);
    }

    #[test]
    fn test_uuid_v7_generation() {
        let uuid1 = new_uuid_v7();
        let uuid2 = new_uuid_v7();
        assert_ne!(uuid1, uuid2);
        assert_eq!(uuid1.len(), 36);
    }
}
