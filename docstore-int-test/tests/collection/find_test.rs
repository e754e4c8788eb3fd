use docstore::collection::{FindOptions, SetDataOptions};
use docstore::common::{ReadExecutor, Value, WriteExecutor};
use docstore::doc;
use docstore::docstore::DocStore;
use docstore::filter::{all, by_id, field};
use docstore::index::non_unique_index;
use docstore_int_test::test_util::{cleanup, create_test_context, people, run_test};
use std::time::Duration;

#[test]
fn test_bulk_loaded_data_found_with_and_without_index() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.collection();
            let loaded = coll.set_data(people(10_000), &SetDataOptions::new().ensure_keys(false).violation_check(false))?;
            assert_eq!(loaded.loaded().len(), 10_000);
            assert!(loaded.errors().is_empty());

            let result = coll.ensure_index(&doc! { name: 1 }, &non_unique_index().name("index_name"));
            assert!(result.is_ok());

            let a = coll.find(&doc! { name: "Sally" }, &FindOptions::new().decouple(false).skip_index(false))?;
            let b = coll.find(&doc! { name: "Sally" }, &FindOptions::new().decouple(false).skip_index(true))?;
            let c = coll.find(&doc! { name: "Sally", age: 7 }, &FindOptions::new().decouple(false))?;

            assert_eq!(a.info().index_used().unwrap().name(), "index_name");
            assert!(b.info().index_used().is_none());
            assert_eq!(c.info().index_used().unwrap().name(), "index_name");

            assert_eq!(a.len(), 1250);
            let mut indexed = a.ids();
            let mut scanned = b.ids();
            indexed.sort();
            scanned.sort();
            assert_eq!(indexed, scanned);
            assert_eq!(a.info().scanned(), 1250);
            assert_eq!(b.info().scanned(), 10_000);
            assert!(b.info().elapsed() > Duration::ZERO);

            // ages cycle 1..=100 and names cycle every 8, so Sally (6 mod 8) aged 7 (6 mod 100) is every 200th
            assert_eq!(c.len(), 50);
            assert_eq!(c.info().scanned(), 1250);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_set_data_replaces_previous_content() {
    run_test(
        || create_test_context(),
        |ctx| {
            let users = ctx.users()?;
            users.ensure_index(&doc! { name: 1 }, &non_unique_index().name("byName"));

            users.set_data(people(16), &SetDataOptions::default())?;
            assert_eq!(users.count(), 16);
            assert!(users.find(&doc! { name: "Kat" }, &FindOptions::default())?.is_empty());
            assert_eq!(users.index("byName").unwrap().size(), 16);
            assert_eq!(users.find(&doc! { name: "Jim" }, &FindOptions::default())?.ids(), vec!["0", "8"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_coupled_results_are_live() {
    run_test(
        || create_test_context(),
        |ctx| {
            let users = ctx.users()?;
            let live = users.find(&by_id("2"), &FindOptions::new().decouple(false))?;
            live.handles()[0].write_with(|doc| doc.put("age", 26))?;
            assert_eq!(users.find_by_id("2").unwrap().get("age")?, Value::I64(26));

            let copy = users.find(&by_id("2"), &FindOptions::default())?;
            copy.handles()[0].write_with(|doc| doc.put("age", 99))?;
            assert_eq!(users.find_by_id("2").unwrap().get("age")?, Value::I64(26));
            assert_eq!(copy.handles()[0].read_with(|doc| doc.get("age"))?, Value::I64(99));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_store_wide_coupled_default() {
    let store = DocStore::builder().decouple_results(false).open().unwrap();
    let users = store.collection("users");
    users.insert(doc! { "_id": "1", name: "Bob" }).unwrap();

    let found = users.find(&all(), &FindOptions::default()).unwrap();
    found.handles()[0].write_with(|doc| doc.put("name", "Robert")).unwrap();
    assert_eq!(users.find_by_id("1").unwrap().get("name").unwrap(), Value::from("Robert"));

    let copied = users.find(&all(), &FindOptions::new().decouple(true)).unwrap();
    copied.handles()[0].write_with(|doc| doc.put("name", "Bobby")).unwrap();
    assert_eq!(users.find_by_id("1").unwrap().get("name").unwrap(), Value::from("Robert"));
}

#[test]
fn test_fluent_filters() {
    run_test(
        || create_test_context(),
        |ctx| {
            let users = ctx.users()?;
            let opts = FindOptions::default();

            assert_eq!(users.find(&field("name").eq("Dean"), &opts)?.ids(), vec!["4", "5"]);
            assert_eq!(users.find(&field("orgId").ne("1"), &opts)?.ids(), vec!["3", "4", "5"]);
            assert_eq!(users.find(&field("name").is_in(vec!["Amy", "Bob"]), &opts)?.ids(), vec!["2", "3"]);
            assert_eq!(users.find(&field("arr.val").eq(3), &opts)?.ids(), vec!["1"]);
            assert_eq!(users.find(&field("email").exists(false), &opts)?.len(), 5);
            assert_eq!(users.find(&all(), &opts)?.len(), 5);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_one_by_id_and_count() {
    run_test(
        || create_test_context(),
        |ctx| {
            let users = ctx.users()?;
            assert_eq!(users.count(), 5);

            let bob = users.find_one(&doc! { name: "Bob" })?.unwrap();
            assert_eq!(bob.id(), Some("3"));
            assert!(users.find_one(&doc! { name: "Nobody" })?.is_none());

            let dean = users.find_by_id("4").unwrap();
            assert_eq!(dean.get("orgId")?, Value::from("3"));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_invalid_filter_is_an_error() {
    run_test(
        || create_test_context(),
        |ctx| {
            let users = ctx.users()?;
            let err = users
                .find(&doc! { name: { "$regex": "^D" } }, &FindOptions::default())
                .unwrap_err();
            assert_eq!(err.kind(), &docstore::errors::ErrorKind::FilterError);
            Ok(())
        },
        cleanup,
    )
}
