//! Audience segments derived from category matches.

use super::matching::CategoryMatch;
use serde::{Deserialize, Serialize};

/// Subcategories scoring above this get their own "Seekers" segment
const SEEKER_THRESHOLD: u32 = 3;
const MIN_SEGMENTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKind {
    Interest,
    Behavior,
    Demographic,
    LifeEvent,
}

/// One targeting rule of a segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetingCriterion {
    #[serde(rename = "type")]
    pub kind: CriterionKind,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl TargetingCriterion {
    fn new(kind: CriterionKind, category: &str) -> Self {
        Self {
            kind,
            category: category.to_string(),
            subcategory: None,
            value: None,
        }
    }

    fn subcategory(mut self, subcategory: &str) -> Self {
        self.subcategory = Some(subcategory.to_string());
        self
    }

    fn value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudienceSegment {
    pub name: String,
    pub description: String,
    pub targeting_criteria: Vec<TargetingCriterion>,
}

/// Build segments for matched categories, topping up with general
/// shopper segments when fewer than three were produced.
pub fn generate_segments(categories: &[CategoryMatch]) -> Vec<AudienceSegment> {
    let mut segments: Vec<AudienceSegment> = Vec::new();

    for category in categories {
        let name = category.name.as_str();
        let mut primary = AudienceSegment {
            name: format!("{} Enthusiasts", name),
            description: format!(
                "People interested in {} products and services",
                name.to_lowercase()
            ),
            targeting_criteria: vec![TargetingCriterion::new(CriterionKind::Interest, name)],
        };

        for sub in &category.subcategories {
            primary.targeting_criteria.push(
                TargetingCriterion::new(CriterionKind::Interest, name).subcategory(&sub.name),
            );
            for value in &sub.matched_values {
                primary.targeting_criteria.push(
                    TargetingCriterion::new(CriterionKind::Interest, name)
                        .subcategory(&sub.name)
                        .value(value),
                );
            }

            if sub.score > SEEKER_THRESHOLD {
                push_unique(
                    &mut segments,
                    AudienceSegment {
                        name: format!("{} Seekers", sub.name),
                        description: format!(
                            "Consumers specifically looking for {} in the {} category",
                            sub.name.to_lowercase(),
                            name.to_lowercase()
                        ),
                        targeting_criteria: vec![
                            TargetingCriterion::new(CriterionKind::Interest, name)
                                .subcategory(&sub.name),
                            TargetingCriterion::new(CriterionKind::Behavior, "Shopping Behavior")
                                .value("Product Research"),
                        ],
                    },
                );
            }
        }

        push_unique(&mut segments, primary);

        for segment in themed_segments(name) {
            push_unique(&mut segments, segment);
        }
    }

    if segments.len() < MIN_SEGMENTS {
        for segment in general_segments() {
            push_unique(&mut segments, segment);
        }
    }

    segments
}

fn themed_segments(category: &str) -> Vec<AudienceSegment> {
    let has = |needles: &[&str]| needles.iter().any(|n| category.contains(n));
    let mut out = Vec::new();

    if has(&["Technology", "Electronics"]) {
        out.push(AudienceSegment {
            name: "Tech Early Adopters".to_string(),
            description: "People who seek out the latest technology products and innovations"
                .to_string(),
            targeting_criteria: vec![
                TargetingCriterion::new(CriterionKind::Interest, category),
                TargetingCriterion::new(CriterionKind::Behavior, "Technology")
                    .value("Early Adopter"),
            ],
        });
    }
    if has(&["Fashion", "Clothing", "Apparel"]) {
        out.push(AudienceSegment {
            name: "Fashion-Forward Consumers".to_string(),
            description: "Style-conscious consumers who follow trends and fashion innovations"
                .to_string(),
            targeting_criteria: vec![
                TargetingCriterion::new(CriterionKind::Interest, category),
                TargetingCriterion::new(CriterionKind::Demographic, "Shopping Behavior")
                    .value("Trend-Driven"),
            ],
        });
    }
    if has(&["Home", "Furniture", "Decor"]) {
        out.push(AudienceSegment {
            name: "Home Improvement Enthusiasts".to_string(),
            description: "People actively enhancing or renovating their living spaces".to_string(),
            targeting_criteria: vec![
                TargetingCriterion::new(CriterionKind::Interest, category),
                TargetingCriterion::new(CriterionKind::LifeEvent, "Home")
                    .value("Moving/Renovating"),
            ],
        });
    }

    out
}

fn general_segments() -> Vec<AudienceSegment> {
    let shopping = |value: &str| {
        TargetingCriterion::new(CriterionKind::Behavior, "Shopping Behavior").value(value)
    };
    vec![
        AudienceSegment {
            name: "Value-Conscious Shoppers".to_string(),
            description: "Price-sensitive consumers who compare options before purchasing"
                .to_string(),
            targeting_criteria: vec![shopping("Price Comparison"), shopping("Coupon User")],
        },
        AudienceSegment {
            name: "Convenience Shoppers".to_string(),
            description: "Consumers who prioritize ease of purchase and quick delivery"
                .to_string(),
            targeting_criteria: vec![shopping("Online Shopper"), shopping("Fast Delivery")],
        },
        AudienceSegment {
            name: "Quality-Focused Consumers".to_string(),
            description: "Buyers who value durability and craftsmanship over price".to_string(),
            targeting_criteria: vec![shopping("Premium Brands"), shopping("Reads Reviews")],
        },
    ]
}

fn push_unique(segments: &mut Vec<AudienceSegment>, segment: AudienceSegment) {
    if !segments.iter().any(|s| s.name == segment.name) {
        segments.push(segment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::matching::SubcategoryMatch;

    fn category(name: &str, subs: Vec<SubcategoryMatch>) -> CategoryMatch {
        CategoryMatch {
            name: name.to_string(),
            description: String::new(),
            score: 10,
            subcategories: subs,
        }
    }

    fn sub(name: &str, score: u32, values: &[&str]) -> SubcategoryMatch {
        SubcategoryMatch {
            name: name.to_string(),
            description: String::new(),
            score,
            matched_values: values.iter().map(|v| v.to_string()).collect(),
            subcategories: Vec::new(),
        }
    }

    #[test]
    fn test_segments_for_technology() {
        let segments = generate_segments(&[category(
            "Technology",
            vec![sub("Consumer Electronics", 7, &["Headphones"]), sub("Software", 2, &[])],
        )]);

        let names: Vec<_> = segments.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Consumer Electronics Seekers",
                "Technology Enthusiasts",
                "Tech Early Adopters"
            ]
        );

        let primary = &segments[1];
        // category + 2 subcategories + 1 matched value
        assert_eq!(primary.targeting_criteria.len(), 4);
        assert_eq!(primary.targeting_criteria[2].value.as_deref(), Some("Headphones"));
    }

    #[test]
    fn test_general_segments_fill_up() {
        let segments = generate_segments(&[category("Pets", vec![])]);
        let names: Vec<_> = segments.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Pets Enthusiasts",
                "Value-Conscious Shoppers",
                "Convenience Shoppers",
                "Quality-Focused Consumers"
            ]
        );
    }

    #[test]
    fn test_themed_segments_not_duplicated() {
        let segments = generate_segments(&[
            category("Technology", vec![]),
            category("Consumer Electronics", vec![]),
        ]);
        let early_adopters = segments
            .iter()
            .filter(|s| s.name == "Tech Early Adopters")
            .count();
        assert_eq!(early_adopters, 1);
    }

    #[test]
    fn test_criterion_serializes_type_field() {
        let value =
            serde_json::to_value(TargetingCriterion::new(CriterionKind::LifeEvent, "Home")).unwrap();
        assert_eq!(value["type"], "life_event");
        assert!(value.get("subcategory").is_none());
    }
}
