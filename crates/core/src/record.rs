//! Knowledge records: the immutable campus facts the assistant answers from.
//!
//! A [`KnowledgeRecord`] is a tagged union with one variant per [`Category`],
//! each carrying a typed payload. Records serialize with a `"category"` tag:
//!
//! ```json
//! {"category": "dining", "name": "The Lair", "popular_items": ["pizza"]}
//! ```
//!
//! The grouped dataset layout (`{"professors": [...], "dining": [...]}`) is
//! modelled by [`KnowledgeBase`].

use serde::{Deserialize, Serialize};

/// The kind of fact a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Professor,
    Course,
    Dining,
    Housing,
    Event,
    Organization,
    Facility,
    News,
}

impl Category {
    /// Every category, in dataset order.
    pub const ALL: [Category; 8] = [
        Category::Professor,
        Category::Course,
        Category::Dining,
        Category::Housing,
        Category::Event,
        Category::Organization,
        Category::Facility,
        Category::News,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Professor => "professor",
            Self::Course => "course",
            Self::Dining => "dining",
            Self::Housing => "housing",
            Self::Event => "event",
            Self::Organization => "organization",
            Self::Facility => "facility",
            Self::News => "news",
        }
    }

    /// Human-facing topic label, used in menus of supported questions.
    pub fn topic(self) -> &'static str {
        match self {
            Self::Professor => "professors",
            Self::Course => "courses",
            Self::Dining => "food spots",
            Self::Housing => "housing",
            Self::Event => "events",
            Self::Organization => "clubs and organizations",
            Self::Facility => "campus facilities",
            Self::News => "campus news",
        }
    }

    /// Whether a repeated question in this category should be answered with
    /// an alternative framing or venue.
    pub fn supports_variation(self) -> bool {
        matches!(
            self,
            Self::Dining | Self::Housing | Self::Event | Self::Organization | Self::Facility
        )
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Professor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub courses: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Course {
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub professor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dining {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub popular_items: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Housing {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pros: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cons: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Organization {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Facility {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub popular_spots: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct News {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Section of the news feed. Grouped datasets call this `category`.
    #[serde(alias = "category", skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// One fact-bearing campus entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum KnowledgeRecord {
    Professor(Professor),
    Course(Course),
    Dining(Dining),
    Housing(Housing),
    Event(Event),
    Organization(Organization),
    Facility(Facility),
    News(News),
}

impl KnowledgeRecord {
    pub fn category(&self) -> Category {
        match self {
            Self::Professor(_) => Category::Professor,
            Self::Course(_) => Category::Course,
            Self::Dining(_) => Category::Dining,
            Self::Housing(_) => Category::Housing,
            Self::Event(_) => Category::Event,
            Self::Organization(_) => Category::Organization,
            Self::Facility(_) => Category::Facility,
            Self::News(_) => Category::News,
        }
    }

    /// The record's display name (a news item's headline).
    pub fn title(&self) -> &str {
        match self {
            Self::Professor(p) => &p.name,
            Self::Course(c) => &c.name,
            Self::Dining(d) => &d.name,
            Self::Housing(h) => &h.name,
            Self::Event(e) => &e.name,
            Self::Organization(o) => &o.name,
            Self::Facility(f) => &f.name,
            Self::News(n) => &n.title,
        }
    }

    /// Concatenation of the record's salient fields, fed to the embedder.
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        match self {
            Self::Professor(p) => {
                parts.push(&p.name);
                push_opt(&mut parts, &p.department);
                push_all(&mut parts, &p.tags);
                push_all(&mut parts, &p.courses);
            }
            Self::Course(c) => {
                parts.push(&c.code);
                parts.push(&c.name);
                push_opt(&mut parts, &c.department);
                push_opt(&mut parts, &c.description);
                push_opt(&mut parts, &c.professor);
            }
            Self::Dining(d) => {
                parts.push(&d.name);
                push_opt(&mut parts, &d.kind);
                push_all(&mut parts, &d.features);
                push_all(&mut parts, &d.popular_items);
                push_opt(&mut parts, &d.description);
            }
            Self::Housing(h) => {
                parts.push(&h.name);
                push_opt(&mut parts, &h.kind);
                push_all(&mut parts, &h.features);
                push_all(&mut parts, &h.pros);
            }
            Self::Event(e) => {
                parts.push(&e.name);
                push_opt(&mut parts, &e.kind);
                push_opt(&mut parts, &e.description);
                push_opt(&mut parts, &e.location);
            }
            Self::Organization(o) => {
                parts.push(&o.name);
                push_opt(&mut parts, &o.kind);
                push_opt(&mut parts, &o.description);
                push_all(&mut parts, &o.events);
            }
            Self::Facility(f) => {
                parts.push(&f.name);
                push_opt(&mut parts, &f.kind);
                push_all(&mut parts, &f.features);
                push_all(&mut parts, &f.popular_spots);
            }
            Self::News(n) => {
                parts.push(&n.title);
                push_opt(&mut parts, &n.topic);
                push_opt(&mut parts, &n.summary);
            }
        }
        parts
            .into_iter()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn push_opt<'a>(parts: &mut Vec<&'a str>, value: &'a Option<String>) {
    if let Some(v) = value {
        parts.push(v);
    }
}

fn push_all<'a>(parts: &mut Vec<&'a str>, values: &'a [String]) {
    parts.extend(values.iter().map(String::as_str));
}

/// The grouped dataset layout: one array per category, any of which may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeBase {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub professors: Vec<Professor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub courses: Vec<Course>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dining: Vec<Dining>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub housing: Vec<Housing>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<Event>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub organizations: Vec<Organization>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub facilities: Vec<Facility>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub news: Vec<News>,
}

impl KnowledgeBase {
    pub fn len(&self) -> usize {
        self.professors.len()
            + self.courses.len()
            + self.dining.len()
            + self.housing.len()
            + self.events.len()
            + self.organizations.len()
            + self.facilities.len()
            + self.news.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten into tagged records, group by group in [`Category::ALL`] order.
    pub fn into_records(self) -> Vec<KnowledgeRecord> {
        let mut records = Vec::with_capacity(self.len());
        records.extend(self.professors.into_iter().map(KnowledgeRecord::Professor));
        records.extend(self.courses.into_iter().map(KnowledgeRecord::Course));
        records.extend(self.dining.into_iter().map(KnowledgeRecord::Dining));
        records.extend(self.housing.into_iter().map(KnowledgeRecord::Housing));
        records.extend(self.events.into_iter().map(KnowledgeRecord::Event));
        records.extend(self.organizations.into_iter().map(KnowledgeRecord::Organization));
        records.extend(self.facilities.into_iter().map(KnowledgeRecord::Facility));
        records.extend(self.news.into_iter().map(KnowledgeRecord::News));
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_record_parses_with_missing_fields() {
        let json = r#"{"category": "dining", "name": "The Lair", "popular_items": ["pizza"]}"#;
        let record: KnowledgeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.category(), Category::Dining);
        assert_eq!(record.title(), "The Lair");
        match record {
            KnowledgeRecord::Dining(d) => {
                assert_eq!(d.popular_items, vec!["pizza".to_string()]);
                assert!(d.hours.is_none());
            }
            other => panic!("expected dining, got {other:?}"),
        }
    }

    #[test]
    fn type_field_maps_to_kind() {
        let json = r#"{"category": "housing", "name": "Del Rey North", "type": "Residence Hall", "capacity": 220}"#;
        let record: KnowledgeRecord = serde_json::from_str(json).unwrap();
        let KnowledgeRecord::Housing(h) = record else {
            panic!("expected housing");
        };
        assert_eq!(h.kind.as_deref(), Some("Residence Hall"));
        assert_eq!(h.capacity, Some(220));
    }

    #[test]
    fn searchable_text_joins_salient_fields() {
        let record = KnowledgeRecord::Dining(Dining {
            name: "The Lair".into(),
            kind: Some("Marketplace".into()),
            popular_items: vec!["pizza".into(), "garlic knots".into()],
            hours: Some("7am-9pm".into()),
            ..Dining::default()
        });
        assert_eq!(record.searchable_text(), "The Lair Marketplace pizza garlic knots");
    }

    #[test]
    fn searchable_text_skips_blank_parts() {
        let record = KnowledgeRecord::Professor(Professor {
            name: "Dr. Lee".into(),
            department: Some("   ".into()),
            ..Professor::default()
        });
        assert_eq!(record.searchable_text(), "Dr. Lee");
    }

    #[test]
    fn grouped_dataset_flattens_in_category_order() {
        let json = r#"{
            "news": [{"title": "New Library Hours", "category": "Campus"}],
            "dining": [{"name": "The Lair"}],
            "professors": [{"name": "Dr. Lee", "department": "Physics"}]
        }"#;
        let kb: KnowledgeBase = serde_json::from_str(json).unwrap();
        assert_eq!(kb.len(), 3);
        let records = kb.into_records();
        let categories: Vec<_> = records.iter().map(KnowledgeRecord::category).collect();
        assert_eq!(
            categories,
            vec![Category::Professor, Category::Dining, Category::News]
        );
        let KnowledgeRecord::News(news) = &records[2] else {
            panic!("expected news");
        };
        assert_eq!(news.topic.as_deref(), Some("Campus"));
    }

    #[test]
    fn variation_capable_categories() {
        assert!(Category::Dining.supports_variation());
        assert!(Category::Facility.supports_variation());
        assert!(!Category::Professor.supports_variation());
        assert!(!Category::News.supports_variation());
    }

    #[test]
    fn category_serializes_snake_case() {
        let json = serde_json::to_string(&Category::Organization).unwrap();
        assert_eq!(json, "\"organization\"");
        assert_eq!(Category::Dining.to_string(), "dining");
    }
}
