use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationKind {
    Cardio,
    LowIntensity,
    HighIntensity,
    MindBody,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub reason: &'static str,
    pub suggestions: [&'static str; 4],
}

/// GET /exercise/recommendations query string. Absent levels match no rule.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationInput {
    pub mood_level: Option<f64>,
    pub energy_level: Option<f64>,
    pub stress_level: Option<f64>,
}

impl RecommendationKind {
    fn recommendation(self) -> Recommendation {
        let (reason, suggestions) = match self {
            RecommendationKind::Cardio => (
                "Cardio exercises release endorphins that can improve mood",
                ["Walking", "Running", "Cycling", "Dancing"],
            ),
            RecommendationKind::LowIntensity => (
                "Low-intensity exercises can help build energy gradually",
                ["Walking", "Gentle yoga", "Stretching", "Tai chi"],
            ),
            RecommendationKind::HighIntensity => (
                "High energy levels are perfect for intense workouts",
                ["Running", "HIIT", "Strength training", "Swimming"],
            ),
            RecommendationKind::MindBody => (
                "Mind-body exercises can help reduce stress",
                ["Yoga", "Meditation", "Pilates", "Deep breathing exercises"],
            ),
        };
        Recommendation {
            kind: self,
            reason,
            suggestions,
        }
    }
}

/// Evaluate the mood, energy and stress rules, in that order.
pub fn recommend(input: &RecommendationInput) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if input.mood_level.map_or(false, |m| m <= 3.0) {
        out.push(RecommendationKind::Cardio.recommendation());
    }

    match input.energy_level {
        Some(e) if e <= 3.0 => out.push(RecommendationKind::LowIntensity.recommendation()),
        Some(e) if e >= 8.0 => out.push(RecommendationKind::HighIntensity.recommendation()),
        _ => {}
    }

    if input.stress_level.map_or(false, |s| s >= 7.0) {
        out.push(RecommendationKind::MindBody.recommendation());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: RecommendationInput) -> Vec<RecommendationKind> {
        recommend(&input).into_iter().map(|r| r.kind).collect()
    }

    #[test]
    fn test_all_three_rules_in_order() {
        let found = kinds(RecommendationInput {
            mood_level: Some(2.0),
            energy_level: Some(9.0),
            stress_level: Some(8.0),
        });
        assert_eq!(
            found,
            vec![
                RecommendationKind::Cardio,
                RecommendationKind::HighIntensity,
                RecommendationKind::MindBody,
            ]
        );
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(recommend(&RecommendationInput::default()).is_empty());
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        assert_eq!(
            kinds(RecommendationInput {
                mood_level: Some(3.0),
                energy_level: Some(3.0),
                stress_level: Some(7.0),
            }),
            vec![
                RecommendationKind::Cardio,
                RecommendationKind::LowIntensity,
                RecommendationKind::MindBody,
            ]
        );
        assert!(kinds(RecommendationInput {
            mood_level: Some(4.0),
            energy_level: Some(5.0),
            stress_level: Some(6.0),
        })
        .is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let body = serde_json::to_value(recommend(&RecommendationInput {
            stress_level: Some(10.0),
            ..Default::default()
        }))
        .unwrap();
        assert_eq!(body[0]["type"], "mind-body");
        assert_eq!(body[0]["suggestions"].as_array().unwrap().len(), 4);
    }
}
