//! Key path resolution against typed and JSON data models

mod utils;

use layout_runtime::model::{
    DataModelAccessor, DataModelError, IndexContext, JsonDataModel, KeyPath, ModelValue,
    ResolutionMode, TypedDataModel,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use rust_decimal::Decimal;
use serde_json::json;
use utils::{
    Friend, Model, Name, nested_friends, nested_friends_json, two_friends, two_friends_json,
};

fn path(text: &str) -> KeyPath {
    KeyPath::parse(text).unwrap()
}

fn accessors(typed: Model, json: serde_json::Value) -> Vec<Box<dyn DataModelAccessor>> {
    vec![
        Box::new(TypedDataModel::new(typed)),
        Box::new(JsonDataModel::from(json)),
    ]
}

#[test]
fn test_simple_get() {
    let model = TypedDataModel::new(Model {
        name: Some(Name::new("myValue")),
        ..Default::default()
    });

    assert_eq!(model.value_at("does.not.exist", &[]).unwrap(), None);
    assert_eq!(
        model.value_at("name.value", &[]).unwrap(),
        Some(ModelValue::from("myValue"))
    );
    assert_eq!(
        model.value_at("name.value", &[1, 2, 3]).unwrap(),
        Some(ModelValue::from("myValue"))
    );
}

#[rstest]
#[case("NoAttribute", Some("asdfsf559"))]
#[case("noAttribute", None)]
#[case("NOATTRIBUTE", None)]
fn test_field_names_are_case_sensitive(#[case] key: &str, #[case] expected: Option<&str>) {
    let model = TypedDataModel::new(Model {
        no_attribute: Some("asdfsf559".to_string()),
        ..Default::default()
    });
    assert_eq!(model.value_at(key, &[]).unwrap(), expected.map(ModelValue::from));
}

#[rstest]
#[case("onlyNewtonsoft", Some("legacy"))]
#[case("OnlyNewtonsoft", None)]
#[case("ONlyNewtonsoft", None)]
#[case("onlySystemTextJson", Some("renamed"))]
#[case("OnlySystemTextJson", None)]
#[case("onlysystemtextjson", None)]
#[case("newtonsoftWrongName", Some("different"))]
#[case("DifferentName", None)]
fn test_wire_name_overrides_win(#[case] key: &str, #[case] expected: Option<&str>) {
    let model = TypedDataModel::new(Model {
        only_legacy: Some("legacy".to_string()),
        only_renamed: Some("renamed".to_string()),
        different_name: Some("different".to_string()),
        ..Default::default()
    });
    assert_eq!(model.value_at(key, &[]).unwrap(), expected.map(ModelValue::from));
}

#[rstest]
#[case("friends.name.value", &[], None)]
#[case("friends[0].name.value", &[], Some("Donald Duck"))]
#[case("friends.name.value", &[0], Some("Donald Duck"))]
#[case("friends[1].name.value", &[], Some("Dolly Duck"))]
#[case("friends.name.value", &[1], Some("Dolly Duck"))]
#[case("friends.name.value", &[2], None)]
fn test_recursive_lookup(
    #[case] key: &str,
    #[case] indices: &[usize],
    #[case] expected: Option<&str>,
) {
    for model in accessors(two_friends(), two_friends_json()) {
        assert_eq!(
            model.value_at(key, indices).unwrap(),
            expected.map(ModelValue::from),
            "{key} {indices:?}"
        );
    }
}

#[rstest]
#[case("friends[0].age", &[])]
#[case("friends.age", &[0])]
fn test_numbers_compare_across_representations(#[case] key: &str, #[case] indices: &[usize]) {
    for model in accessors(two_friends(), two_friends_json()) {
        let age = model.value_at(key, indices).unwrap().unwrap();
        assert_eq!(age, ModelValue::from(123));
        assert_eq!(age.as_decimal(), Some(Decimal::from(123)));
    }
}

#[rstest]
#[case("friends[1].friends[0].name.value", &[], Some("Onkel Skrue"))]
#[case("friends[1].friends.name.value", &[0, 0], None)]
#[case("friends[1].friends.name.value", &[1, 0], None)]
#[case("friends[1].friends.name.value", &[1], None)]
#[case("friends.friends[0].name.value", &[1, 4, 5, 7], Some("Onkel Skrue"))]
#[case("friends.friends.friends.name.value", &[1, 0, 1], Some("Madam mim"))]
fn test_double_recursive_lookup(
    #[case] key: &str,
    #[case] indices: &[usize],
    #[case] expected: Option<&str>,
) {
    for model in accessors(nested_friends(), nested_friends_json()) {
        assert_eq!(
            model.value_at(key, indices).unwrap(),
            expected.map(ModelValue::from),
            "{key} {indices:?}"
        );
    }
}

#[rstest]
#[case("friends[1].friends", &[], Some(1))]
#[case("friends.friends", &[1], Some(1))]
#[case("friends[1].friends.friends", &[1, 0, 0], None)]
#[case("friends[1].friends[0].friends", &[1, 0, 0], Some(2))]
#[case("friends.friends.friends", &[1, 0, 0], Some(2))]
#[case("friends", &[], Some(2))]
#[case("friends[0].name", &[], None)]
#[case("friends[0].age", &[], None)]
#[case("enemies", &[], None)]
fn test_count(#[case] key: &str, #[case] indices: &[usize], #[case] expected: Option<usize>) {
    for model in accessors(nested_friends(), nested_friends_json()) {
        assert_eq!(model.count_at(key, indices).unwrap(), expected, "{key} {indices:?}");
    }
}

#[test]
fn test_literal_index_discards_remaining_ambient_indices() {
    // `a[1].b.c` with ambient [9]: the 9 is never used
    for model in accessors(nested_friends(), nested_friends_json()) {
        let indices = IndexContext::new(&[9]);
        let result = model.get_model_data(
            &path("friends[1].friends.name.value"),
            &indices,
            ResolutionMode::Strict,
        );
        assert!(matches!(result, Err(DataModelError::MissingIndex { .. })));

        // Index 0 is consumed for the first segment, then the literal fires
        // and 5 and 7 are dropped
        let result = model
            .get_model_data(
                &path("friends.friends[0].friends.name.value"),
                &IndexContext::new(&[1, 5, 7]),
                ResolutionMode::Strict,
            )
            .unwrap_err();
        assert!(result.is_unresolved());
    }
}

#[test]
fn test_reads_are_repeatable() {
    let model = TypedDataModel::new(nested_friends());
    let key = path("friends.friends.name.value");
    let indices = IndexContext::new(&[1, 0]);
    let first = model
        .get_model_data(&key, &indices, ResolutionMode::Lenient)
        .unwrap();
    let second = model
        .get_model_data(&key, &indices, ResolutionMode::Lenient)
        .unwrap();
    assert_eq!(first, Some(ModelValue::from("Onkel Skrue")));
    assert_eq!(first, second);
    assert_eq!(indices.as_slice(), &[1, 0]);
}

#[test]
fn test_structured_nodes_are_not_values() {
    for model in accessors(two_friends(), two_friends_json()) {
        assert_eq!(model.value_at("friends[0].name", &[]).unwrap(), None);
        assert_eq!(model.value_at("friends", &[]).unwrap(), None);
    }
}

#[test]
fn test_strict_mode_reports_unresolved_paths() {
    for model in accessors(two_friends(), two_friends_json()) {
        let unknown = model.get_model_data(
            &path("does.not.exist"),
            &IndexContext::empty(),
            ResolutionMode::Strict,
        );
        assert!(matches!(unknown, Err(DataModelError::UnknownField { .. })));

        let missing = model.get_model_data(
            &path("friends.name.value"),
            &IndexContext::empty(),
            ResolutionMode::Strict,
        );
        assert!(matches!(missing, Err(DataModelError::MissingIndex { .. })));

        let out_of_range = model.get_model_data(
            &path("friends[5].name.value"),
            &IndexContext::empty(),
            ResolutionMode::Strict,
        );
        assert!(matches!(
            out_of_range,
            Err(DataModelError::IndexOutOfRange { index: 5, len: 2, .. })
        ));

        // Dolly has no age yet; unset is not an error
        let unset = model.get_model_data(
            &path("friends[1].age"),
            &IndexContext::empty(),
            ResolutionMode::Strict,
        );
        assert_eq!(unset, Ok(None));
    }
}

#[test]
fn test_remove_fields() {
    let mut model = TypedDataModel::new(Model {
        id: 2,
        name: Some(Name::new("Ivar")),
        friends: Some(vec![
            Friend::new("Første venn")
                .aged(1235)
                .with_friends(vec![Friend::new("Første venn sin venn").aged(233)]),
        ]),
        ..Default::default()
    });
    let strict = ResolutionMode::Strict;

    model.remove_field(&path("id"), strict).unwrap();
    assert_eq!(model.model().id, 0);

    model.remove_field(&path("name"), strict).unwrap();
    assert_eq!(model.model().name, None);

    model
        .remove_field(&path("friends[0].name.value"), strict)
        .unwrap();
    let first = &model.model().friends.as_ref().unwrap()[0];
    assert_eq!(first.name, Some(Name::default()));

    model.remove_field(&path("friends[0].name"), strict).unwrap();
    let first = &model.model().friends.as_ref().unwrap()[0];
    assert_eq!(first.name, None);
    assert_eq!(first.age, Some(Decimal::from(1235)));
    assert_eq!(
        model.value_at("friends[0].friends[0].age", &[]).unwrap(),
        Some(ModelValue::from(233))
    );

    model.remove_field(&path("friends[0].friends"), strict).unwrap();
    assert_eq!(model.model().friends.as_ref().unwrap()[0].friends, None);
}

#[test]
fn test_removed_value_reads_as_null() {
    let mut model = TypedDataModel::new(two_friends());
    model
        .remove_field(&path("friends[0].name.value"), ResolutionMode::Strict)
        .unwrap();
    assert_eq!(model.value_at("friends[0].name.value", &[]).unwrap(), None);
    assert_eq!(
        model.value_at("friends[0].age", &[]).unwrap(),
        Some(ModelValue::from(123))
    );
}

#[test]
fn test_remove_field_failures() {
    let mut model = TypedDataModel::new(two_friends());

    // Removing one element of a collection is not implemented
    for mode in [ResolutionMode::Lenient, ResolutionMode::Strict] {
        let err = model.remove_field(&path("friends[0]"), mode).unwrap_err();
        assert!(matches!(err, DataModelError::Unsupported { .. }));
    }

    // Container is a collection
    let err = model
        .remove_field(&path("friends.name"), ResolutionMode::Lenient)
        .unwrap_err();
    assert!(matches!(err, DataModelError::Unsupported { .. }));

    // Container is already empty
    model
        .remove_field(&path("name.value"), ResolutionMode::Strict)
        .unwrap();

    // Unknown leaf
    model
        .remove_field(&path("friends[0].nickname"), ResolutionMode::Lenient)
        .unwrap();
    let err = model
        .remove_field(&path("friends[0].nickname"), ResolutionMode::Strict)
        .unwrap_err();
    assert!(matches!(err, DataModelError::UnknownField { .. }));

    // Unknown container
    model
        .remove_field(&path("enemies[0].name"), ResolutionMode::Lenient)
        .unwrap();
    assert!(
        model
            .remove_field(&path("enemies[0].name"), ResolutionMode::Strict)
            .is_err()
    );

    assert_eq!(model.into_inner(), two_friends());
}

#[test]
fn test_remove_field_below_a_scalar() {
    let mut model = TypedDataModel::new(two_friends());
    model
        .remove_field(&path("id.x"), ResolutionMode::Lenient)
        .unwrap();
    let err = model
        .remove_field(&path("id.x"), ResolutionMode::Strict)
        .unwrap_err();
    assert!(matches!(err, DataModelError::UnknownField { ref field, .. } if field == "x"));
    assert_eq!(model.into_inner(), two_friends());
}

#[rstest]
#[case("friends.name.value", &[1], "friends[1].name.value")]
#[case("friends.friends.age", &[1, 0], "friends[1].friends[0].age")]
#[case("friends.friends.age", &[1], "friends[1].friends.age")]
#[case("friends.friends.friends", &[0, 2, 4], "friends[0].friends[2].friends[4]")]
#[case("name.value", &[3], "name.value")]
#[case("id", &[], "id")]
fn test_add_indices(#[case] key: &str, #[case] indices: &[usize], #[case] expected: &str) {
    let model = TypedDataModel::new(Model::default());
    let indexed = model
        .add_indices(&path(key), &IndexContext::new(indices))
        .unwrap();
    assert_eq!(indexed.to_string(), expected);
}

#[test]
fn test_add_indices_unknown_field() {
    let model = TypedDataModel::new(Model::default());
    let err = model
        .add_indices(&path("friends.nickname"), &IndexContext::new(&[0]))
        .unwrap_err();
    assert!(matches!(err, DataModelError::UnknownField { .. }));
}

#[test]
fn test_json_model_is_read_only() {
    let mut model = JsonDataModel::from(two_friends_json());
    assert!(matches!(
        model.add_indices(&path("friends.name"), &IndexContext::new(&[0])),
        Err(DataModelError::Unsupported { .. })
    ));
    assert!(matches!(
        model.remove_field(&path("friends[0].name"), ResolutionMode::Lenient),
        Err(DataModelError::Unsupported { .. })
    ));
    assert_eq!(model.root(), Some(&two_friends_json()));
}

#[test]
fn test_json_model_edge_cases() {
    let empty = JsonDataModel::new(None);
    assert_eq!(empty.value_at("anything", &[]).unwrap(), None);

    let model = JsonDataModel::from(json!({
        "text": "abc",
        "flag": true,
        "ratio": 0.25,
        "list": [1, 2, 3]
    }));
    assert_eq!(model.value_at("flag", &[]).unwrap(), Some(ModelValue::from(true)));
    assert_eq!(
        model.value_at("ratio", &[]).unwrap(),
        Some(ModelValue::from(Decimal::new(25, 2)))
    );
    assert_eq!(model.value_at("list[2]", &[]).unwrap(), Some(ModelValue::from(3)));
    // Text is never a collection
    assert_eq!(model.count_at("text", &[]).unwrap(), None);
    assert_eq!(model.value_at("text[0]", &[]).unwrap(), Some(ModelValue::from("abc")));
}

#[test]
fn test_index_on_single_value_is_ignored() {
    let typed = TypedDataModel::new(Model {
        name: Some(Name::new("myValue")),
        ..Default::default()
    });
    let strict = ResolutionMode::Strict;
    assert_eq!(
        typed
            .get_model_data(&path("name[0].value"), &IndexContext::empty(), strict)
            .unwrap(),
        Some(ModelValue::from("myValue"))
    );
    assert_eq!(
        typed
            .get_model_data(&path("name[3].value[1]"), &IndexContext::empty(), strict)
            .unwrap(),
        Some(ModelValue::from("myValue"))
    );

    // The ambient indices survive for the collections further down
    let json = JsonDataModel::from(json!({
        "group": { "items": [{ "n": "first" }, { "n": "second" }] }
    }));
    assert_eq!(
        json.get_model_data(&path("group[5].items.n"), &IndexContext::new(&[1]), strict)
            .unwrap(),
        Some(ModelValue::from("second"))
    );
    assert_eq!(json.count_at("group[0].items", &[]).unwrap(), Some(2));
}

#[test]
fn test_invalid_paths_always_fail() {
    let model = TypedDataModel::new(Model::default());
    assert!(matches!(
        model.value_at("friends[x].name", &[]),
        Err(DataModelError::InvalidPath { .. })
    ));
    assert!(matches!(
        model.count_at("friends..name", &[]),
        Err(DataModelError::InvalidPath { .. })
    ));
}
