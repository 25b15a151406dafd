use serde_json::Value;

use crate::models::{AttributeField, AttributeItem, AttributeValue, ListEntry};

/// Canonical column -> accepted raw labels. Earlier labels take precedence.
pub static ATTRIBUTE_MAP: &[(AttributeField, &[&str])] = &[
    (
        AttributeField::SizeM2,
        &["Užitná ploch", "Užitná plocha", "Celková plocha", "Plocha", "Obytná plocha"],
    ),
    (AttributeField::Floor, &["Podlaží"]),
    (AttributeField::BuildingType, &["Stavba", "Typ budovy"]),
    (AttributeField::Condition, &["Stav objektu", "Stav"]),
    (AttributeField::Furnished, &["Vybavení", "Vybaveno"]),
    (AttributeField::Elevator, &["Výtah"]),
    (AttributeField::Balcony, &["Balkón", "Balkon"]),
    (AttributeField::Terrace, &["Terasa"]),
    (AttributeField::EnergyRating, &["Energetická náročnost budovy", "PENB"]),
    (AttributeField::Ownership, &["Vlastnictví"]),
    (AttributeField::Parking, &["Parkování"]),
    (AttributeField::Cellar, &["Sklep"]),
    (AttributeField::Loggia, &["Lodžie", "Lodžia"]),
    (AttributeField::Heating, &["Topení"]),
    (AttributeField::ApartmentType, &["Typ bytu"]),
    (AttributeField::NoteAboutPrice, &["Poznámka k ceně"]),
];

/// Value of the first item whose label equals one of `candidates`.
///
/// Candidates are tried in order and, for each one, items in their original order.
/// List values are joined with ", ". Returns an empty string when nothing matches.
pub fn extract_attribute(items: &[AttributeItem], candidates: &[&str]) -> String {
    for candidate in candidates {
        if let Some(item) = items.iter().find(|item| item.name == *candidate) {
            return item.value.as_ref().map(render_value).unwrap_or_default();
        }
    }

    String::new()
}

/// Resolve every synonym map entry against one detail response
pub fn normalize_attributes(items: &[AttributeItem]) -> Vec<(AttributeField, String)> {
    ATTRIBUTE_MAP
        .iter()
        .map(|(field, candidates)| (*field, extract_attribute(items, candidates)))
        .collect()
}

/// Canonical column a raw label feeds, if any
pub fn field_for_label(label: &str) -> Option<AttributeField> {
    ATTRIBUTE_MAP
        .iter()
        .find(|(_, candidates)| candidates.contains(&label))
        .map(|(field, _)| *field)
}

pub fn render_value(value: &AttributeValue) -> String {
    match value {
        AttributeValue::Text(text) => text.clone(),
        AttributeValue::Number(number) => number.to_string(),
        AttributeValue::Flag(flag) => render_flag(*flag),
        AttributeValue::List(entries) => entries
            .iter()
            .map(|entry| match entry {
                ListEntry::Labeled { value } => render_json(value),
                ListEntry::Plain(value) => render_json(value),
            })
            .collect::<Vec<_>>()
            .join(", "),
        AttributeValue::Other(value) => render_json(value),
    }
}

fn render_json(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => render_flag(*flag),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}

// Capitalized to stay consistent with files collected by earlier runs
fn render_flag(flag: bool) -> String {
    if flag { "True" } else { "False" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn items(value: Value) -> Vec<AttributeItem> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn list_values_join_coerced_elements_in_order() {
        let items = items(json!([
            {"name": "Vybavení", "value": [
                {"name": "a", "value": "Lednice"},
                "Pračka",
                {"name": "b", "value": 2},
                true
            ]}
        ]));

        assert_eq!(
            extract_attribute(&items, &["Vybavení"]),
            "Lednice, Pračka, 2, True"
        );
    }

    #[test]
    fn earlier_candidate_wins_over_earlier_item() {
        let items = items(json!([
            {"name": "Celková plocha", "value": 80},
            {"name": "Užitná plocha", "value": 55}
        ]));

        assert_eq!(
            extract_attribute(&items, &["Užitná plocha", "Celková plocha"]),
            "55"
        );
    }

    #[test]
    fn first_matching_item_wins_for_same_label() {
        let items = items(json!([
            {"name": "Stav", "value": "Dobrý"},
            {"name": "Stav", "value": "Novostavba"}
        ]));

        assert_eq!(extract_attribute(&items, &["Stav"]), "Dobrý");
    }

    #[test]
    fn no_match_yields_empty_string() {
        let items = items(json!([{"name": "Plocha pozemku", "value": 300}]));

        assert_eq!(extract_attribute(&items, &["Plocha"]), "");
        assert_eq!(extract_attribute(&[], &["Plocha"]), "");
        assert_eq!(extract_attribute(&items, &[]), "");
    }

    #[test]
    fn labels_match_exactly() {
        let items = items(json!([{"name": "výtah", "value": true}]));

        assert_eq!(extract_attribute(&items, &["Výtah"]), "");
    }

    #[test]
    fn null_value_renders_empty() {
        let items = items(json!([{"name": "Sklep", "value": null}]));

        assert_eq!(extract_attribute(&items, &["Sklep"]), "");
    }

    #[test]
    fn normalize_covers_every_mapped_field() {
        let items = items(json!([
            {"name": "Užitná ploch", "value": 48},
            {"name": "Výtah", "value": false},
            {"name": "Energetická náročnost budovy", "value": "Třída C"}
        ]));

        let normalized = normalize_attributes(&items);

        assert_eq!(normalized.len(), ATTRIBUTE_MAP.len());
        assert_eq!(normalized[0], (AttributeField::SizeM2, "48".to_string()));
        assert!(normalized.contains(&(AttributeField::Elevator, "False".to_string())));
        assert!(normalized.contains(&(AttributeField::EnergyRating, "Třída C".to_string())));
        assert!(normalized.contains(&(AttributeField::Heating, String::new())));
    }

    #[test]
    fn labels_resolve_to_their_column() {
        assert_eq!(field_for_label("Lodžia"), Some(AttributeField::Loggia));
        assert_eq!(field_for_label("PENB"), Some(AttributeField::EnergyRating));
        assert_eq!(field_for_label("Aktualizace"), None);
    }
}
