//! Spatial relation strings of the form `(subject, predicate, object)`

/// A parsed relation, each part trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

/// How a relation string is shown in the relations view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationEntry {
    Parsed(Relation),
    /// Anything that does not look like a triple is shown verbatim
    Raw(String),
}

impl RelationEntry {
    pub fn from_text(text: &str) -> Self {
        match parse_relation(text) {
            Some(relation) => RelationEntry::Parsed(relation),
            None => RelationEntry::Raw(text.to_string()),
        }
    }
}

/// Finds the first `(a, b, c)` triple anywhere in `text`.
///
/// Subject and predicate stop at the next comma, the object stops at the
/// next closing parenthesis, and every part must be non-empty.
pub fn parse_relation(text: &str) -> Option<Relation> {
    text.match_indices('(')
        .find_map(|(start, _)| parse_triple(&text[start + 1..]))
}

fn parse_triple(rest: &str) -> Option<Relation> {
    let subject_end = rest.find(',')?;
    if subject_end == 0 {
        return None;
    }
    let subject = &rest[..subject_end];

    let after_subject = &rest[subject_end + 1..];
    let predicate_end = after_subject.find(',')?;
    if predicate_end == 0 {
        return None;
    }
    let predicate = &after_subject[..predicate_end];

    let after_predicate = &after_subject[predicate_end + 1..];
    let object_end = after_predicate.find(')')?;
    if object_end == 0 {
        return None;
    }
    let object = &after_predicate[..object_end];

    Some(Relation {
        subject: subject.trim().to_string(),
        predicate: predicate.trim().to_string(),
        object: object.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_triple() {
        let relation = parse_relation("(lamp_0, on, desk_0)").unwrap();
        assert_eq!(relation.subject, "lamp_0");
        assert_eq!(relation.predicate, "on");
        assert_eq!(relation.object, "desk_0");
    }

    #[test]
    fn test_multi_word_predicate() {
        let relation = parse_relation("(chair_0,   in front of, desk_0)").unwrap();
        assert_eq!(relation.predicate, "in front of");
    }

    #[test]
    fn test_malformed_is_raw() {
        let entry = RelationEntry::from_text("lamp_0 near desk_0");
        assert_eq!(entry, RelationEntry::Raw("lamp_0 near desk_0".to_string()));
        assert!(parse_relation("(lamp_0, on)").is_none());
        assert!(parse_relation("(, on, desk_0)").is_none());
        assert!(parse_relation("(lamp_0, on, desk_0").is_none());
        assert!(parse_relation("").is_none());
    }

    #[test]
    fn test_triple_embedded_in_text() {
        let relation = parse_relation("note: (cup_0, in, box_1) extra").unwrap();
        assert_eq!(relation.object, "box_1");
    }

    #[test]
    fn test_subject_spans_to_first_comma() {
        let relation = parse_relation("(x) then (a, b, c)").unwrap();
        assert_eq!(relation.subject, "x) then (a");
        assert_eq!(relation.predicate, "b");
        assert_eq!(relation.object, "c");
    }

    #[test]
    fn test_later_parenthesis_is_tried() {
        let relation = parse_relation("(,) (a, b, c)").unwrap();
        assert_eq!(relation.subject, "a");
        assert_eq!(relation.object, "c");
    }

    #[test]
    fn test_object_may_contain_comma() {
        let relation = parse_relation("(a, b, c, d)").unwrap();
        assert_eq!(relation.object, "c, d");
    }
}
