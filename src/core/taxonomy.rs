//! Relation taxonomy and deterministic edge identity.
//!
//! The taxonomy is the single source of truth for mapping an edge's relation
//! string to its visual/semantic category. Relations outside the table bucket
//! to `other`.

/// Fallback relation when no override rule matches an edge.
///
/// Deliberately absent from the taxonomy table so it buckets to `other`.
pub const DEFAULT_RELATION: &str = "related_to";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Hierarchical,
    Legislative,
    Appointment,
    Financial,
    Review,
    Judicial,
    Electoral,
    Civic,
    Communication,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Hierarchical => "hierarchical",
            Category::Legislative => "legislative",
            Category::Appointment => "appointment",
            Category::Financial => "financial",
            Category::Review => "review",
            Category::Judicial => "judicial",
            Category::Electoral => "electoral",
            Category::Civic => "civic",
            Category::Communication => "communication",
            Category::Other => "other",
        }
    }
}

const RELATION_CATEGORIES: &[(&str, Category)] = &[
    ("contains", Category::Hierarchical),
    ("oversees", Category::Hierarchical),
    ("administers", Category::Hierarchical),
    ("manages", Category::Hierarchical),
    ("part_of", Category::Hierarchical),
    ("heads", Category::Hierarchical),
    ("passes_bills", Category::Legislative),
    ("proposes_legislation", Category::Legislative),
    ("enacts", Category::Legislative),
    ("vetoes", Category::Legislative),
    ("overrides_veto", Category::Legislative),
    ("ratifies", Category::Legislative),
    ("signs_into_law", Category::Legislative),
    ("appoints", Category::Appointment),
    ("nominates", Category::Appointment),
    ("confirms", Category::Appointment),
    ("removes", Category::Appointment),
    ("proposes_budget", Category::Financial),
    ("approves_budget", Category::Financial),
    ("modifies_budget", Category::Financial),
    ("allocates_funds", Category::Financial),
    ("collects_revenue", Category::Financial),
    ("funds", Category::Financial),
    ("reviews", Category::Review),
    ("audits", Category::Review),
    ("investigates", Category::Review),
    ("holds_hearings", Category::Review),
    ("adjudicates", Category::Judicial),
    ("judicial_review", Category::Judicial),
    ("interprets_law", Category::Judicial),
    ("prosecutes", Category::Judicial),
    ("elects", Category::Electoral),
    ("recalls", Category::Electoral),
    ("redistricts", Category::Electoral),
    ("serves", Category::Civic),
    ("represents", Category::Civic),
    ("petitions", Category::Civic),
    ("advocates_for", Category::Civic),
    ("reports_to", Category::Communication),
    ("advises", Category::Communication),
    ("coordinates_with", Category::Communication),
    ("testifies_before", Category::Communication),
];

/// Maps a relation to exactly one category, or `Other` when unmapped.
pub fn category_for(relation: &str) -> Category {
    RELATION_CATEGORIES
        .iter()
        .find(|(name, _)| *name == relation)
        .map(|(_, category)| *category)
        .unwrap_or(Category::Other)
}

/// Lookup key for the per-process override tables: `{source}→{target}`.
pub fn endpoint_key(source: &str, target: &str) -> String {
    format!("{}→{}", source, target)
}

/// Deterministic edge id: `{source}→{target}:{relation}`.
///
/// Identical triples always produce identical ids.
pub fn edge_id(source: &str, target: &str, relation: &str) -> String {
    format!("{}→{}:{}", source, target, relation)
}
