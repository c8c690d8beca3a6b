//! Shared types for touchpoint assessment

use serde::{Deserialize, Serialize};

/// Newtype wrapper for touchpoint IDs to provide type safety
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TouchpointId(pub String);

impl TouchpointId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TouchpointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TouchpointId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Journey stage name. Stages are an open sequence supplied by configuration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stage(pub String);

impl Stage {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Stage {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Interaction channel of a touchpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    #[serde(alias = "Digital")]
    Digital,
    #[serde(alias = "Human")]
    Human,
    #[serde(alias = "Physical")]
    Physical,
    #[serde(alias = "Communication")]
    Communication,
}

impl Channel {
    pub const ALL: [Channel; 4] =
        [Channel::Digital, Channel::Human, Channel::Physical, Channel::Communication];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Digital => "digital",
            Channel::Human => "human",
            Channel::Physical => "physical",
            Channel::Communication => "communication",
        }
    }

    /// Position in `Channel::ALL`, used for fixed-size count arrays
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            Channel::Digital => 0,
            Channel::Human => 1,
            Channel::Physical => 2,
            Channel::Communication => 3,
        }
    }
}

/// Assessment axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Importance,
    Performance,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Importance => "importance",
            Axis::Performance => "performance",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Improvement-priority quadrant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    FixFirst,           // high importance, low performance
    MaintainExcellence, // high importance, high performance
    OverInvestment,     // low importance, high performance
    Deprioritize,       // low importance, low performance
}

impl Quadrant {
    /// Quadrants in roadmap order
    pub const ALL: [Quadrant; 4] = [
        Quadrant::FixFirst,
        Quadrant::MaintainExcellence,
        Quadrant::OverInvestment,
        Quadrant::Deprioritize,
    ];

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Quadrant::FixFirst => "fix_first",
            Quadrant::MaintainExcellence => "maintain_excellence",
            Quadrant::OverInvestment => "over_investment",
            Quadrant::Deprioritize => "deprioritize",
        }
    }

    /// Roadmap group position (0 comes first)
    #[inline]
    pub fn rank(&self) -> usize {
        match self {
            Quadrant::FixFirst => 0,
            Quadrant::MaintainExcellence => 1,
            Quadrant::OverInvestment => 2,
            Quadrant::Deprioritize => 3,
        }
    }
}

impl std::fmt::Display for Quadrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared range of a raw assessment input
///
/// Deserializes from either an explicit range (`{ min = 1, max = 5 }`) or a
/// named preset (`"likert5"`, `"likert7"`, `"percent"`, `"binary"`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ScaleRepr")]
pub struct Scale {
    pub min: f64,
    pub max: f64,
}

impl Scale {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// 1..=5 Likert rating
    pub const fn likert5() -> Self {
        Self::new(1.0, 5.0)
    }

    /// 1..=7 Likert rating
    pub const fn likert7() -> Self {
        Self::new(1.0, 7.0)
    }

    /// 0..=100 survey percentage
    pub const fn percent() -> Self {
        Self::new(0.0, 100.0)
    }

    /// 0/1 flag
    pub const fn binary() -> Self {
        Self::new(0.0, 1.0)
    }

    /// Width of the scale; only meaningful for a valid scale
    #[inline]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScaleRepr {
    Preset(ScalePreset),
    Range { min: f64, max: f64 },
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum ScalePreset {
    Likert5,
    Likert7,
    Percent,
    Binary,
}

impl From<ScaleRepr> for Scale {
    fn from(repr: ScaleRepr) -> Self {
        match repr {
            ScaleRepr::Preset(ScalePreset::Likert5) => Scale::likert5(),
            ScaleRepr::Preset(ScalePreset::Likert7) => Scale::likert7(),
            ScaleRepr::Preset(ScalePreset::Percent) => Scale::percent(),
            ScaleRepr::Preset(ScalePreset::Binary) => Scale::binary(),
            ScaleRepr::Range { min, max } => Scale::new(min, max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_index_matches_all() {
        for (i, channel) in Channel::ALL.iter().enumerate() {
            assert_eq!(channel.index(), i);
        }
    }

    #[test]
    fn test_quadrant_rank_matches_all() {
        for (i, quadrant) in Quadrant::ALL.iter().enumerate() {
            assert_eq!(quadrant.rank(), i);
        }
    }

    #[test]
    fn test_quadrant_serializes_snake_case() {
        let json = serde_json::to_string(&Quadrant::MaintainExcellence).unwrap();
        assert_eq!(json, "\"maintain_excellence\"");
    }

    #[test]
    fn test_scale_deserializes_preset_and_range() {
        let preset: Scale = serde_json::from_str("\"likert5\"").unwrap();
        assert_eq!(preset, Scale::likert5());

        let range: Scale = serde_json::from_str(r#"{"min": 0, "max": 10}"#).unwrap();
        assert_eq!(range, Scale::new(0.0, 10.0));

        assert!(serde_json::from_str::<Scale>("\"stars\"").is_err());
    }
}
