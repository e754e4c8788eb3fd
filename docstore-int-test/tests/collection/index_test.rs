use docstore::collection::FindOptions;
use docstore::common::Value;
use docstore::doc;
use docstore::errors::ErrorKind;
use docstore::index::{non_unique_index, unique_index, KeySpec};
use docstore_int_test::test_util::{cleanup, create_test_context, run_test};

#[test]
fn test_ensure_index_reports_state() {
    run_test(
        || create_test_context(),
        |ctx| {
            let users = ctx.users()?;
            let result = users.ensure_index(&doc! { arr: { val: 1 }, orgId: 1 }, &non_unique_index().name("testIndex"));
            assert!(result.err.is_none());
            assert!(result.state.ok);
            assert_eq!(result.state.name, "testIndex");

            let index = users.index("testIndex").unwrap();
            assert_eq!(index.name(), "testIndex");
            assert_eq!(index.key_spec().field_names(), vec!["arr.val", "orgId"]);
            assert!(users.index("unknown").is_none());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_explain_picks_most_specific_index() {
    run_test(
        || create_test_context(),
        |ctx| {
            let users = ctx.users()?;
            users.ensure_index(&doc! { name: 1 }, &non_unique_index().name("testName"));
            users.ensure_index(&doc! { arr: { val: 1 } }, &non_unique_index().name("testArr"));
            users.ensure_index(&doc! { orgId: 1 }, &non_unique_index().name("testOrgId"));
            let compound = KeySpec::builder()
                .asc("orgId")
                .asc("arr.val")
                .name("testArrValAndOrgId")
                .build()?;
            assert!(users.ensure_index_spec(compound).is_ok());

            let plan = users.explain(&doc! { arr: { val: 5 }, orgId: "3" })?;
            assert_eq!(plan.potential().len(), 3);
            assert_eq!(plan.used().unwrap().name(), "testArrValAndOrgId");

            let skipped = users.explain_with(&doc! { arr: { val: 5 }, orgId: "3" }, &FindOptions::new().skip_index(true))?;
            assert_eq!(skipped.potential().len(), 3);
            assert!(skipped.used().is_none());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_lookup_and_find_through_compound_index() {
    run_test(
        || create_test_context(),
        |ctx| {
            let users = ctx.users()?;
            let result = users.ensure_index(&doc! { arr: { val: 1 }, name: 1 }, &non_unique_index().name("testIndex"));
            assert!(result.is_ok());

            let index = users.index("testIndex").unwrap();
            let lookup = index.lookup(&doc! { arr: { val: 5 }, name: "Dean" });
            assert_eq!(lookup, vec!["4", "5"]);

            let found = users.find(&doc! { arr: { val: 5 }, name: "Dean" }, &FindOptions::default())?;
            assert_eq!(found.ids(), vec!["4", "5"]);
            for document in found.documents() {
                assert_eq!(document.get("arr.1.val")?, Value::I64(5));
            }
            assert_eq!(found.info().index_used().unwrap().name(), "testIndex");
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_unique_index_over_conflicting_data_is_not_built() {
    run_test(
        || create_test_context(),
        |ctx| {
            let users = ctx.users()?;
            let result = users.ensure_index(&doc! { arr: { val: 1 }, name: 1 }, &unique_index().name("testIndex"));
            assert!(!result.state.ok);
            let err = result.err.unwrap();
            assert_eq!(err.kind(), &ErrorKind::IndexBuildFailed);
            assert_eq!(err.cause().unwrap().kind(), &ErrorKind::DuplicateKey);
            assert!(!users.has_index("testIndex"));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_ensure_index_is_idempotent() {
    run_test(
        || create_test_context(),
        |ctx| {
            let users = ctx.users()?;
            assert!(users.ensure_index(&doc! { orgId: 1 }, &non_unique_index().name("byOrg")).is_ok());
            let first = users.index("byOrg").unwrap();

            assert!(users.ensure_index(&doc! { orgId: 1 }, &non_unique_index().name("byOrg")).is_ok());
            assert_eq!(users.index("byOrg").unwrap(), first);
            assert_eq!(users.indexes().len(), 1);

            let conflict = users.ensure_index(&doc! { name: 1 }, &non_unique_index().name("byOrg"));
            assert_eq!(conflict.err.unwrap().kind(), &ErrorKind::IndexAlreadyExists);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_index_size_follows_crud() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.collection();
            coll.ensure_index(&doc! { name: 1 }, &unique_index().name("uniqueName"));
            coll.insert(doc! { name: "Bob" })?;
            coll.insert(doc! { name: "Jill" })?;

            assert_eq!(coll.find(&doc! {}, &FindOptions::default())?.len(), 2);
            assert_eq!(coll.index("uniqueName").unwrap().size(), 2);

            coll.remove(&doc! { name: "Bob" })?;
            assert_eq!(coll.find(&doc! {}, &FindOptions::default())?.len(), 1);
            assert_eq!(coll.index("uniqueName").unwrap().size(), 1);
            assert!(coll.index("uniqueName").unwrap().lookup(&doc! { name: "Bob" }).is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_multikey_entries_per_array_element() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.collection();
            coll.ensure_index(&doc! { tags: 1 }, &non_unique_index().name("byTag"));
            coll.insert(doc! { "_id": "1", tags: ["red", "green", "red"] })?;
            coll.insert(doc! { "_id": "2", tags: ["green"] })?;

            let index = coll.index("byTag").unwrap();
            assert_eq!(index.size(), 2);
            assert_eq!(index.entry_count(), 2);
            assert_eq!(index.lookup(&doc! { tags: "green" }), vec!["1", "2"]);
            assert_eq!(index.lookup(&doc! { tags: "red" }), vec!["1"]);

            coll.remove(&doc! { "_id": "1" })?;
            assert_eq!(index.size(), 1);
            assert_eq!(index.entry_count(), 1);
            assert!(index.lookup(&doc! { tags: "red" }).is_empty());
            assert!(coll.find(&doc! { tags: "red" }, &FindOptions::default())?.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_documents_without_key_fields_are_not_indexed() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.collection();
            coll.ensure_index(&doc! { email: 1 }, &unique_index().name("uniqueEmail"));
            let result = coll.insert_many(vec![doc! { name: "A" }, doc! { name: "B" }, doc! { email: "c@x" }])?;
            assert_eq!(result.inserted().len(), 3);
            assert_eq!(coll.index("uniqueEmail").unwrap().size(), 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_drop_and_rebuild_index() {
    run_test(
        || create_test_context(),
        |ctx| {
            let users = ctx.users()?;
            users.ensure_index(&doc! { orgId: 1 }, &non_unique_index().name("byOrg"));
            users.ensure_index(&doc! { name: 1 }, &non_unique_index().name("byName"));

            users.rebuild_index("byOrg")?;
            assert_eq!(users.index("byOrg").unwrap().size(), 5);

            users.drop_index("byOrg")?;
            assert!(!users.has_index("byOrg"));
            let plan = users.explain(&doc! { orgId: "3" })?;
            assert!(plan.used().is_none());

            let err = users.rebuild_index("byOrg").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::IndexNotFound);

            users.drop_all_indexes();
            assert!(users.indexes().is_empty());
            Ok(())
        },
        cleanup,
    )
}
