//! UMLS relation label codes

/// Code → description, in the order the Metathesaurus documents them
pub const RELATION_LABELS: &[(&str, &str)] = &[
    ("AQ", "Allowed qualifier"),
    ("CHD", "Has child relationship in a Metathesaurus source vocabulary"),
    ("DEL", "Deleted concept"),
    ("PAR", "Has parent relationship in a Metathesaurus source vocabulary"),
    ("QB", "Can be qualified by"),
    ("RB", "Has a broader relationship"),
    (
        "RL",
        "The relationship is similar or 'alike'. Concepts linked by this relationship may be synonymous, i.e., self-referential: CUI1 = CUI2.",
    ),
    ("RN", "Has a narrower relationship"),
    ("RO", "Has a relationship other than synonymous, narrower, or broader"),
    ("RQ", "Related and possibly synonymous"),
    ("RU", "Related, unspecified"),
    ("SY", "Source asserted synonymy"),
    ("XR", "Not related, no mapping"),
    ("NULL", "Empty relationship"),
];

/// Description of a relation label, case-insensitive
pub fn describe_relation_label(code: &str) -> Option<&'static str> {
    RELATION_LABELS
        .iter()
        .find(|(label, _)| label.eq_ignore_ascii_case(code))
        .map(|(_, description)| *description)
}
