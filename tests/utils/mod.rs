//! Shared fixtures for integration tests

#![allow(dead_code)]

use layout_runtime::model::{DataModel, Lazy, ModelShape};
use rust_decimal::Decimal;
use serde_json::{Value as JsonValue, json};

/// Root of the typed test model
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub id: i32,
    pub name: Option<Name>,
    pub no_attribute: Option<String>,
    pub only_legacy: Option<String>,
    pub only_renamed: Option<String>,
    pub different_name: Option<String>,
    pub friends: Option<Vec<Friend>>,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            id: 123,
            name: None,
            no_attribute: None,
            only_legacy: None,
            only_renamed: None,
            different_name: None,
            friends: None,
        }
    }
}

impl DataModel for Model {
    fn model_shape() -> &'static ModelShape<Self> {
        static SHAPE: Lazy<ModelShape<Model>> = Lazy::new(|| {
            ModelShape::<Model>::builder("Model")
                .scalar("Id", |m| &m.id, |m| &mut m.id)
                .rename("id")
                .legacy_rename("id")
                .object("Name", |m| &m.name, |m| &mut m.name)
                .rename("name")
                .legacy_rename("name")
                .scalar("NoAttribute", |m| &m.no_attribute, |m| &mut m.no_attribute)
                .scalar("OnlyNewtonsoft", |m| &m.only_legacy, |m| &mut m.only_legacy)
                .legacy_rename("onlyNewtonsoft")
                .scalar("OnlySystemTextJson", |m| &m.only_renamed, |m| &mut m.only_renamed)
                .rename("onlySystemTextJson")
                .scalar("DifferentName", |m| &m.different_name, |m| &mut m.different_name)
                .legacy_rename("newtonsoftWrongName")
                .collection("Friends", |m| &m.friends, |m| &mut m.friends)
                .rename("friends")
                .legacy_rename("friends")
                .build()
        });
        &SHAPE
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Name {
    pub value: Option<String>,
}

impl Name {
    pub fn new(value: &str) -> Self {
        Self {
            value: Some(value.to_string()),
        }
    }
}

impl DataModel for Name {
    fn model_shape() -> &'static ModelShape<Self> {
        static SHAPE: Lazy<ModelShape<Name>> = Lazy::new(|| {
            ModelShape::<Name>::builder("Name")
                .scalar("Value", |n| &n.value, |n| &mut n.value)
                .rename("value")
                .build()
        });
        &SHAPE
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Friend {
    pub name: Option<Name>,
    pub age: Option<Decimal>,
    pub friends: Option<Vec<Friend>>,
}

impl Friend {
    pub fn new(name: &str) -> Self {
        Self {
            name: Some(Name::new(name)),
            ..Default::default()
        }
    }

    pub fn aged(mut self, age: i64) -> Self {
        self.age = Some(Decimal::from(age));
        self
    }

    pub fn with_friends(mut self, friends: Vec<Friend>) -> Self {
        self.friends = Some(friends);
        self
    }
}

impl DataModel for Friend {
    fn model_shape() -> &'static ModelShape<Self> {
        static SHAPE: Lazy<ModelShape<Friend>> = Lazy::new(|| {
            ModelShape::<Friend>::builder("Friend")
                .object("Name", |f| &f.name, |f| &mut f.name)
                .rename("name")
                .scalar("Age", |f| &f.age, |f| &mut f.age)
                .rename("age")
                .collection("Friends", |f| &f.friends, |f| &mut f.friends)
                .rename("friends")
                .build()
        });
        &SHAPE
    }
}

/// Two friends; Donald is 123, Dolly has no age
pub fn two_friends() -> Model {
    Model {
        friends: Some(vec![
            Friend::new("Donald Duck").aged(123),
            Friend::new("Dolly Duck"),
        ]),
        ..Default::default()
    }
}

/// Friends three levels deep
pub fn nested_friends() -> Model {
    Model {
        friends: Some(vec![
            Friend::new("Donald Duck").aged(123),
            Friend::new("Dolly Duck").with_friends(vec![
                Friend::new("Onkel Skrue").aged(2022).with_friends(vec![
                    Friend::new("LykkeTiøringen").aged(23),
                    Friend::new("Madam mim").aged(23),
                ]),
            ]),
        ]),
        ..Default::default()
    }
}

/// JSON form of [`two_friends`], using the wire names
pub fn two_friends_json() -> JsonValue {
    json!({
        "id": 123,
        "name": null,
        "friends": [
            { "name": { "value": "Donald Duck" }, "age": 123, "friends": null },
            { "name": { "value": "Dolly Duck" }, "age": null, "friends": null }
        ]
    })
}

/// JSON form of [`nested_friends`], using the wire names
pub fn nested_friends_json() -> JsonValue {
    json!({
        "id": 123,
        "friends": [
            { "name": { "value": "Donald Duck" }, "age": 123 },
            {
                "name": { "value": "Dolly Duck" },
                "friends": [
                    {
                        "name": { "value": "Onkel Skrue" },
                        "age": 2022,
                        "friends": [
                            { "name": { "value": "LykkeTiøringen" }, "age": 23 },
                            { "name": { "value": "Madam mim" }, "age": 23 }
                        ]
                    }
                ]
            }
        ]
    })
}

/// Layout with a repeating group over `friends`, nested over each friend's friends
pub fn friends_layout() -> JsonValue {
    json!({
        "overview": { "data": { "layout": [
            { "id": "title", "type": "Header", "size": "L" },
            { "id": "friends", "type": "Group", "children": ["friend-name", "friend-age", "inner"],
              "maxCount": 10, "dataModelBindings": { "group": "friends" } },
            { "id": "friend-name", "type": "Input",
              "dataModelBindings": { "simpleBinding": "friends.name.value" } },
            { "id": "friend-age", "type": "Input",
              "dataModelBindings": { "simpleBinding": "friends.age" } },
            { "id": "inner", "type": "Group", "children": ["inner-name"], "maxCount": 5,
              "dataModelBindings": { "group": "friends.friends" } },
            { "id": "inner-name", "type": "Input",
              "dataModelBindings": { "simpleBinding": "friends.friends.name.value" } }
        ] } },
        "summary": { "data": { "layout": [
            { "id": "summary-title", "type": "Summary", "componentRef": "title", "pageRef": "overview" },
            { "id": "favourite", "type": "Dropdown", "optionId": "friends",
              "dataModelBindings": { "simpleBinding": "name.value" } }
        ] } }
    })
}
