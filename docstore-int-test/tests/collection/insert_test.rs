use docstore::common::Value;
use docstore::doc;
use docstore::errors::ErrorKind;
use docstore::index::{non_unique_index, unique_index};
use docstore_int_test::test_util::{cleanup, create_test_context, run_test};

#[test]
fn test_unique_index_rejects_second_insert() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.collection();
            let result = coll.ensure_index(&doc! { name: 1 }, &unique_index());
            assert!(result.err.is_none());

            let insert1 = coll.insert(doc! { name: "Bob" })?;
            let insert2 = coll.insert(doc! { name: "Bob" })?;
            assert_eq!(insert1.inserted().len(), 1);
            assert_eq!(insert2.inserted().len(), 0);
            assert_eq!(insert2.errors()[0].error().kind(), &ErrorKind::DuplicateKey);
            assert_eq!(coll.count(), 1);
            assert_eq!(coll.index("name:1").unwrap().size(), 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_many_keeps_input_order() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.collection();
            let result = coll.insert_many(vec![
                doc! { "_id": "c", name: "C" },
                doc! { "_id": "a", name: "A" },
                doc! { "_id": "b", name: "B" },
            ])?;
            assert_eq!(result.inserted(), &["c".to_string(), "a".to_string(), "b".to_string()]);

            let all = coll.find(&doc! {}, &Default::default())?;
            assert_eq!(all.ids(), vec!["c", "a", "b"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_generated_ids_are_unique() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.collection();
            let result = coll.insert_many((0..50).map(|i| doc! { seq: i }).collect())?;
            let mut ids = result.inserted().to_vec();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), 50);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_invalid_and_duplicate_ids_are_reported() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.users()?;
            let result = coll.insert_many(vec![
                doc! { "_id": 7, name: "Numeric" },
                doc! { "_id": "1", name: "Again" },
                doc! { "_id": "6", name: "Fresh" },
            ])?;
            assert_eq!(result.inserted(), &["6".to_string()]);
            assert_eq!(result.errors()[0].error().kind(), &ErrorKind::InvalidId);
            assert_eq!(result.errors()[1].error().kind(), &ErrorKind::DuplicateKey);
            assert_eq!(result.errors()[1].id(), Some("1"));

            let kat = coll.find_by_id("1").unwrap();
            assert_eq!(kat.get("name")?, Value::from("Kat"));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_rejected_document_leaves_no_index_entries() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.collection();
            coll.ensure_index(&doc! { orgId: 1 }, &non_unique_index().name("byOrg"));
            coll.ensure_index(&doc! { name: 1 }, &unique_index().name("uniqueName"));
            coll.insert(doc! { "_id": "1", name: "Kat", orgId: "1" })?;

            let result = coll.insert(doc! { "_id": "9", name: "Kat", orgId: "9" })?;
            assert!(result.inserted().is_empty());

            let by_org = coll.index("byOrg").unwrap();
            assert!(!by_org.contains("9"));
            assert!(by_org.lookup(&doc! { orgId: "9" }).is_empty());
            assert!(coll.find_by_id("9").is_none());
            Ok(())
        },
        cleanup,
    )
}
