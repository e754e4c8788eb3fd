use docstore::collection::FindOptions;
use docstore::doc;
use docstore::filter::field;
use docstore::index::{non_unique_index, KeySpec};
use docstore_int_test::test_util::{cleanup, create_test_context, run_test};

#[test]
fn test_remove_clears_every_index() {
    run_test(
        || create_test_context(),
        |ctx| {
            let users = ctx.users()?;
            users.ensure_index(&doc! { orgId: 1 }, &non_unique_index().name("byOrg"));
            users.ensure_index_spec(KeySpec::builder().asc("orgId").asc("arr.val").name("byOrgAndVal").build()?);

            let removed = users.remove(&doc! { orgId: "3" })?;
            assert_eq!(removed.removed(), &["4".to_string(), "5".to_string()]);
            assert_eq!(users.count(), 3);

            for index in users.indexes() {
                assert!(!index.contains("4"));
                assert!(!index.contains("5"));
                assert_eq!(index.size(), 3);
            }
            assert!(users.find(&doc! { orgId: "3", arr: { val: 5 } }, &FindOptions::default())?.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_remove_document_uses_its_id() {
    run_test(
        || create_test_context(),
        |ctx| {
            let users = ctx.users()?;
            let dean = users.find_by_id("5").unwrap();
            let removed = users.remove_document(&dean)?;
            assert_eq!(removed.removed(), &["5".to_string()]);
            assert_eq!(users.find(&field("name").eq("Dean"), &FindOptions::default())?.ids(), vec!["4"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_remove_without_match_removes_nothing() {
    run_test(
        || create_test_context(),
        |ctx| {
            let users = ctx.users()?;
            let removed = users.remove(&doc! { name: "Nobody" })?;
            assert!(removed.removed().is_empty());
            assert_eq!(users.count(), 5);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_truncate_keeps_indexes_empty() {
    run_test(
        || create_test_context(),
        |ctx| {
            let users = ctx.users()?;
            users.ensure_index(&doc! { name: 1 }, &non_unique_index().name("byName"));
            users.truncate();

            assert_eq!(users.count(), 0);
            assert!(users.has_index("byName"));
            assert_eq!(users.index("byName").unwrap().size(), 0);

            users.insert(doc! { name: "Bob" })?;
            assert_eq!(users.index("byName").unwrap().size(), 1);
            Ok(())
        },
        cleanup,
    )
}
