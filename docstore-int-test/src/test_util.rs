use docstore::collection::{Collection, Document};
use docstore::doc;
use docstore::docstore::DocStore;
use docstore::errors::DocStoreResult;
use std::time::Instant;

/// Runs `test` between `before` and `after`. `after` runs even when the test
/// fails; the first failure panics with its message.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> DocStoreResult<()>,
    B: Fn() -> DocStoreResult<TestContext>,
    A: Fn(TestContext) -> DocStoreResult<()>,
{
    let start_time = Instant::now();
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let test_result = test(ctx.clone());
    let after_result = after(ctx);
    log::debug!("Test finished in {:?}", start_time.elapsed());

    if let Err(e) = test_result {
        panic!("Test failed: {:?}", e);
    }
    if let Err(e) = after_result {
        panic!("After run failed: {:?}", e);
    }
}

#[derive(Clone)]
pub struct TestContext {
    store: DocStore,
    collection_name: String,
}

impl TestContext {
    pub fn new(store: DocStore) -> Self {
        Self {
            store,
            collection_name: format!("test-{}", uuid::Uuid::new_v4()),
        }
    }

    pub fn store(&self) -> DocStore {
        self.store.clone()
    }

    /// A collection private to this test.
    pub fn collection(&self) -> Collection {
        self.store.collection(&self.collection_name)
    }

    /// The private collection, loaded with [user_documents].
    pub fn users(&self) -> DocStoreResult<Collection> {
        let users = self.collection();
        users.insert_many(user_documents())?;
        Ok(users)
    }
}

pub fn create_test_context() -> DocStoreResult<TestContext> {
    let store = DocStore::builder().open()?;
    Ok(TestContext::new(store))
}

pub fn cleanup(ctx: TestContext) -> DocStoreResult<()> {
    for name in ctx.store().collection_names() {
        ctx.store().drop_collection(&name)?;
    }
    Ok(())
}

/// Five users across three organisations, each with an `arr` of `{ val }`
/// entries. Users 4 and 5 are both "Dean" in org "3" with `5` as their second
/// value.
pub fn user_documents() -> Vec<Document> {
    vec![
        doc! { "_id": "1", name: "Kat", orgId: "1", age: 31, arr: [{ val: 1 }, { val: 3 }] },
        doc! { "_id": "2", name: "Amy", orgId: "1", age: 25, arr: [{ val: 5 }] },
        doc! { "_id": "3", name: "Bob", orgId: "2", age: 40, arr: [{ val: 5 }] },
        doc! { "_id": "4", name: "Dean", orgId: "3", age: 29, arr: [{ val: 2 }, { val: 5 }] },
        doc! { "_id": "5", name: "Dean", orgId: "3", age: 52, arr: [{ val: 4 }, { val: 5 }] },
    ]
}

/// `count` people named round-robin from a fixed list, ids `"0"`, `"1"`, ...
pub fn people(count: usize) -> Vec<Document> {
    const NAMES: [&str; 8] = ["Jim", "Bob", "Bill", "Max", "Jane", "Kim", "Sally", "Sam"];
    (0..count)
        .map(|i| {
            doc! {
                "_id": (i.to_string()),
                name: (NAMES[i % NAMES.len()]),
                age: ((i % 100 + 1) as i64),
            }
        })
        .collect()
}
