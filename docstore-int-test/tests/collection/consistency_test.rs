use docstore::collection::{skip_index, Collection, Document, FindOptions};
use docstore::common::Value;
use docstore::doc;
use docstore::index::{non_unique_index, unique_index, KeySpec};
use proptest::prelude::*;
use std::collections::BTreeMap;

const NAMES: [&str; 3] = ["Amy", "Bob", "Dean"];
const TAGS: [&str; 6] = ["a", "b", "c", "d", "e", "f"];
const VALS: [i64; 4] = [1, 2, 3, 5];

#[derive(Clone, Debug)]
enum Op {
    Insert { id: u8, name: u8, tags: Vec<u8>, vals: Vec<u8> },
    Remove { id: u8 },
    Update { id: u8, name: u8, tags: Vec<u8> },
}

#[derive(Clone, Debug)]
struct Stored {
    name: String,
    tags: Vec<String>,
    vals: Vec<i64>,
}

type Model = BTreeMap<String, Stored>;

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..8u8, 0..3u8, prop::collection::vec(0..6u8, 0..3), prop::collection::vec(0..4u8, 0..3))
            .prop_map(|(id, name, tags, vals)| Op::Insert { id, name, tags, vals }),
        1 => (0..8u8).prop_map(|id| Op::Remove { id }),
        1 => (0..8u8, 0..3u8, prop::collection::vec(0..6u8, 0..3))
            .prop_map(|(id, name, tags)| Op::Update { id, name, tags }),
    ]
}

fn users() -> Collection {
    let users = Collection::new("users");
    assert!(users.ensure_index(&doc! { name: 1 }, &non_unique_index().name("byName")).is_ok());
    assert!(users.ensure_index(&doc! { tags: 1 }, &unique_index().name("uniqueTag")).is_ok());
    let compound = KeySpec::builder().asc("name").asc("arr.val").name("byNameAndVal").build().unwrap();
    assert!(users.ensure_index_spec(compound).is_ok());
    users
}

fn tags_of(codes: &[u8]) -> Vec<String> {
    codes.iter().map(|c| TAGS[*c as usize].to_string()).collect()
}

fn user(id: &str, stored: &Stored) -> Document {
    let arr: Vec<Value> = stored.vals.iter().map(|v| Value::from(doc! { val: (*v) })).collect();
    doc! {
        "_id": id,
        name: (stored.name.as_str()),
        tags: (stored.tags.clone()),
        arr: arr,
    }
}

/// Whether any document other than `id` already holds one of `tags`.
fn tag_taken(model: &Model, id: &str, tags: &[String]) -> bool {
    model
        .iter()
        .filter(|(other, _)| other.as_str() != id)
        .any(|(_, stored)| stored.tags.iter().any(|t| tags.contains(t)))
}

fn sorted(mut ids: Vec<String>) -> Vec<String> {
    ids.sort();
    ids
}

fn expected(model: &Model, keep: impl Fn(&Stored) -> bool) -> Vec<String> {
    model.iter().filter(|(_, s)| keep(s)).map(|(id, _)| id.clone()).collect()
}

fn apply(users: &Collection, model: &mut Model, op: &Op) -> Result<(), TestCaseError> {
    match op {
        Op::Insert { id, name, tags, vals } => {
            let id = id.to_string();
            let stored = Stored {
                name: NAMES[*name as usize].to_string(),
                tags: tags_of(tags),
                vals: vals.iter().map(|v| VALS[*v as usize]).collect(),
            };
            let accepted = !model.contains_key(&id) && !tag_taken(model, &id, &stored.tags);

            let result = users.insert(user(&id, &stored)).unwrap();
            prop_assert_eq!(result.inserted().len() == 1, accepted);
            prop_assert_eq!(result.errors().len() == 1, !accepted);
            if accepted {
                model.insert(id, stored);
            }
        }
        Op::Remove { id } => {
            let id = id.to_string();
            let result = users.remove(&doc! { "_id": (id.as_str()) }).unwrap();
            let existed = model.remove(&id).is_some();
            prop_assert_eq!(result.removed().len() == 1, existed);
        }
        Op::Update { id, name, tags } => {
            let id = id.to_string();
            let name = NAMES[*name as usize].to_string();
            let tags = tags_of(tags);
            let accepted = model.contains_key(&id) && !tag_taken(model, &id, &tags);

            let changes = doc! { name: (name.as_str()), tags: (tags.clone()) };
            let result = users.update(&doc! { "_id": (id.as_str()) }, &changes).unwrap();
            prop_assert_eq!(result.updated().len() == 1, accepted);
            if let Some(stored) = model.get_mut(&id).filter(|_| accepted) {
                stored.name = name;
                stored.tags = tags;
            }
        }
    }
    Ok(())
}

fn check_consistency(users: &Collection, model: &Model) -> Result<(), TestCaseError> {
    prop_assert_eq!(users.count(), model.len());

    let by_name = users.index("byName").unwrap();
    let unique_tag = users.index("uniqueTag").unwrap();
    let compound = users.index("byNameAndVal").unwrap();

    prop_assert_eq!(by_name.size(), model.len());
    prop_assert_eq!(compound.size(), model.len());
    prop_assert_eq!(unique_tag.size(), model.values().filter(|s| !s.tags.is_empty()).count());

    for name in NAMES {
        let filter = doc! { name: name };
        let want = expected(model, |s| s.name == name);
        prop_assert_eq!(sorted(by_name.lookup(&filter)), want.clone());
        prop_assert_eq!(sorted(users.find(&filter, &skip_index()).unwrap().ids()), want);

        for val in VALS {
            let filter = doc! { name: name, arr: { val: val } };
            let want = expected(model, |s| s.name == name && s.vals.contains(&val));
            prop_assert_eq!(sorted(compound.lookup(&filter)), want.clone());
            prop_assert_eq!(sorted(users.find(&filter, &FindOptions::default()).unwrap().ids()), want.clone());
            prop_assert_eq!(sorted(users.find(&filter, &skip_index()).unwrap().ids()), want);
        }
    }

    for tag in TAGS {
        let want = expected(model, |s| s.tags.iter().any(|t| t == tag));
        prop_assert!(want.len() <= 1);
        prop_assert_eq!(unique_tag.lookup(&doc! { tags: tag }), want);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn indexes_agree_with_full_scan(ops in prop::collection::vec(arb_op(), 1..40)) {
        let users = users();
        let mut model = Model::new();
        for op in &ops {
            apply(&users, &mut model, op)?;
            check_consistency(&users, &model)?;
        }
    }
}
