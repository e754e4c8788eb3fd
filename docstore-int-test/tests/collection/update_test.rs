use docstore::collection::FindOptions;
use docstore::common::Value;
use docstore::doc;
use docstore::errors::ErrorKind;
use docstore::filter::field;
use docstore::index::{non_unique_index, unique_index};
use docstore_int_test::test_util::{cleanup, create_test_context, run_test};

#[test]
fn test_update_reindexes_matches() {
    run_test(
        || create_test_context(),
        |ctx| {
            let users = ctx.users()?;
            users.ensure_index(&doc! { orgId: 1 }, &non_unique_index().name("byOrg"));

            let result = users.update(&field("orgId").eq("1"), &doc! { orgId: "7" })?;
            assert_eq!(result.updated(), &["1".to_string(), "2".to_string()]);

            let index = users.index("byOrg").unwrap();
            assert!(index.lookup(&doc! { orgId: "1" }).is_empty());
            assert_eq!(index.lookup(&doc! { orgId: "7" }), vec!["1", "2"]);
            assert_eq!(users.find(&doc! { orgId: "7" }, &FindOptions::default())?.len(), 2);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_replaces_array_keys() {
    run_test(
        || create_test_context(),
        |ctx| {
            let users = ctx.users()?;
            users.ensure_index(&doc! { arr: { val: 1 } }, &non_unique_index().name("byVal"));

            users.update(&doc! { "_id": "3" }, &doc! { arr: [{ val: 9 }] })?;

            assert_eq!(users.index("byVal").unwrap().lookup(&doc! { arr: { val: 9 } }), vec!["3"]);
            assert_eq!(users.find(&doc! { arr: { val: 5 } }, &FindOptions::default())?.ids(), vec!["2", "4", "5"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_violating_unique_index_is_skipped() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.collection();
            coll.ensure_index(&doc! { email: 1 }, &unique_index().name("uniqueEmail"));
            coll.insert_many(vec![
                doc! { "_id": "1", email: "a@x", team: "red" },
                doc! { "_id": "2", email: "b@x", team: "red" },
            ])?;

            let result = coll.update(&doc! { team: "red" }, &doc! { email: "b@x" })?;
            assert_eq!(result.errors().len(), 1);
            assert_eq!(result.errors()[0].id(), Some("1"));
            assert_eq!(result.errors()[0].error().kind(), &ErrorKind::DuplicateKey);
            assert_eq!(result.updated(), &["2".to_string()]);

            assert_eq!(coll.find_by_id("1").unwrap().get("email")?, Value::from("a@x"));
            let index = coll.index("uniqueEmail").unwrap();
            assert_eq!(index.lookup(&doc! { email: "a@x" }), vec!["1"]);
            assert_eq!(index.lookup(&doc! { email: "b@x" }), vec!["2"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_cannot_change_id() {
    run_test(
        || create_test_context(),
        |ctx| {
            let users = ctx.users()?;
            let err = users.update(&doc! { "_id": "1" }, &doc! { "_id": "100" }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
            assert!(users.find_by_id("1").is_some());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_nested_update_keeps_sibling_fields() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.collection();
            coll.ensure_index(&doc! { address: { city: 1 } }, &non_unique_index().name("byCity"));
            coll.insert(doc! { "_id": "1", address: { city: "A", zip: "111" } })?;

            let result = coll.update(&doc! { "_id": "1" }, &doc! { "address.city": "Leeds" })?;
            assert_eq!(result.updated(), &["1".to_string()]);

            let stored = coll.find_by_id("1").unwrap();
            assert_eq!(stored.get("address.city")?, Value::from("Leeds"));
            assert_eq!(stored.get("address.zip")?, Value::from("111"));

            let index = coll.index("byCity").unwrap();
            assert!(index.lookup(&doc! { address: { city: "A" } }).is_empty());
            assert_eq!(index.lookup(&doc! { address: { city: "Leeds" } }), vec!["1"]);
            Ok(())
        },
        cleanup,
    )
}
