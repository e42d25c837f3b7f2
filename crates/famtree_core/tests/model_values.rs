use famtree_core::model::{CoordinateError, FamilyNameError, Month};
use famtree_core::{FamilyDynamic, FamilyName, FamilyTreeDate, HierarchicalCoordinate, Person};
use serde_json::json;

fn coordinate(text: &str) -> HierarchicalCoordinate {
    text.parse().unwrap()
}

fn date(text: &str) -> FamilyTreeDate {
    text.parse().unwrap()
}

#[test]
fn child_adds_one_level_and_sibling_chain_keeps_the_prefix() {
    let start = coordinate("1.3.2");
    let child = start.child();
    assert_eq!(child.depth(), start.depth() + 1);
    assert_eq!(child.labels(), &[1, 3, 2, 1]);

    let second = child.sibling().unwrap();
    assert_eq!(&second.labels()[..3], start.labels());
    assert_eq!(second.position(), 2);
}

#[test]
fn two_siblings_advance_last_label_by_two() {
    let start = coordinate("2.4");
    let advanced = start.sibling().and_then(|c| c.sibling()).unwrap();
    assert_eq!(advanced, coordinate("2.6"));
    assert_eq!(advanced.parent(), Some(coordinate("2")));
    assert!(advanced.is_descendant_of(&coordinate("2")));
    assert!(!advanced.is_descendant_of(&advanced));
}

#[test]
fn coordinates_reject_empty_and_zero_labels() {
    assert_eq!(HierarchicalCoordinate::new(vec![]), Err(CoordinateError::Empty));
    assert_eq!(
        HierarchicalCoordinate::new(vec![1, 0]),
        Err(CoordinateError::ZeroLabel { position: 1 })
    );
    assert!("1..2".parse::<HierarchicalCoordinate>().is_err());
    assert_eq!(coordinate("1.10").to_string(), "1.10");
}

#[test]
fn dates_parse_every_supported_shape() {
    let full = date("12 Jun 1925");
    assert_eq!(full.day(), Some(12));
    assert_eq!(full.month(), Some(Month::Jun));
    assert_eq!(full.year(), 1925);

    assert_eq!(date("Jun 1925").day(), None);
    assert_eq!(date("1900-1910").until_year(), Some(1910));
    assert!("1910-1900".parse::<FamilyTreeDate>().is_err());
    assert!("32 Jan 1900".parse::<FamilyTreeDate>().is_err());
    assert!(date("1900") < date("Jan 1901"));
}

#[test]
fn person_identity_ignores_generated_id() {
    let first = Person::new("Ann Smith", Some(date("1900")), None);
    let second = Person::new("Ann Smith", Some(date("1900")), None);
    assert_ne!(first.id, second.id);
    assert_eq!(first, second);
    assert_ne!(first, Person::new("Ann Smith", Some(date("1901")), None));
}

#[test]
fn person_serializes_dates_as_text() {
    let person = Person::new("Ann Smith", Some(date("8 Oct 1931")), None);
    let value = serde_json::to_value(&person).unwrap();
    assert_eq!(value["birth_name"], json!("Ann Smith"));
    assert_eq!(value["birth_date"], json!("8 Oct 1931"));
    assert_eq!(value["deceased_date"], json!(null));

    let decoded: Person = serde_json::from_value(value).unwrap();
    assert_eq!(decoded.id, person.id);
}

#[test]
fn extended_attributes_reject_core_field_names() {
    let mut person = Person::new("Ann Smith", None, None);
    person.set_attribute("nickname", json!("Annie")).unwrap();
    assert!(person.set_attribute("birth_name", json!("x")).is_err());
    assert_eq!(person.attribute("nickname"), Some(&json!("Annie")));

    let mut dynamic = FamilyDynamic::for_union(&person, None, None);
    assert!(dynamic.set_attribute("pageTitle", json!("x")).is_err());
    assert_eq!(dynamic.page_title, "This is the family of Ann Smith.");
}

#[test]
fn family_names_parse_from_text_and_container_paths() {
    let parsed: FamilyName = "Smith-1754729228".parse().unwrap();
    assert_eq!(parsed.name(), "Smith");
    assert_eq!(parsed.id(), 1_754_729_228);

    let from_path =
        FamilyName::from_container_path("templates/Smith-1754729228/20250419.pdf").unwrap();
    assert_eq!(from_path, parsed);
    assert!(matches!(
        "Smith".parse::<FamilyName>(),
        Err(FamilyNameError::MissingId(_))
    ));
}
