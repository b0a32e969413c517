//! Store driven through the real gateway client against a mocked gateway.
#![allow(clippy::unwrap_used)]

use cinegate_store::{
    Category, CatalogStore, GatewayClient, KeyValueStore, LoadMoreOutcome, SqliteStorage,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DETAIL_BEGINS: &str = include_str!("../../../fixtures/omdb/detail_tt0372784.json");
const DETAIL_BATMAN: &str = include_str!("../../../fixtures/omdb/detail_tt1877830.json");

fn client_for(server: &MockServer) -> GatewayClient {
    GatewayClient::builder()
        .base_url(server.uri().parse().unwrap())
        .user_agent("cinegate-test/0.0.0")
        .build()
        .unwrap()
}

async fn mount_page(server: &MockServer, category: &str, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/api/{category}")))
        .and(query_param("page", page))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_browse_session_persists_and_resumes() {
    // Arrange
    let gateway = MockServer::start().await;
    let one = format!("[{DETAIL_BEGINS}]");
    let two = format!("[{DETAIL_BEGINS},{DETAIL_BATMAN}]");
    mount_page(&gateway, "movies", "1", two.clone()).await;
    mount_page(&gateway, "series", "1", one.clone()).await;
    mount_page(&gateway, "premieres", "1", one.clone()).await;
    mount_page(&gateway, "series", "2", one).await;
    mount_page(&gateway, "series", "3", two).await;

    let dir = tempfile::tempdir().unwrap();
    let store = CatalogStore::new(
        client_for(&gateway),
        SqliteStorage::open(&dir.path().join("cinegate.db")).unwrap(),
    );

    // Act
    store.initialize().await;
    let first = store.load_more(Category::Series).await;
    let len_after_first = store.len(Category::Series);
    let second = store.load_more(Category::Series).await;

    // Assert
    assert_eq!(store.len(Category::Movies), 2);
    assert_eq!(first, LoadMoreOutcome::Appended { added: 1 });
    assert_eq!(second, LoadMoreOutcome::Appended { added: 2 });
    assert_eq!(len_after_first, 2);
    assert_eq!(store.len(Category::Series), 4);
    assert_eq!(store.cursor(Category::Series), 3);
    assert!(store.error().is_none());

    // Resume from the same database with a gateway that must not be called.
    let silent = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&silent)
        .await;
    let resumed = CatalogStore::new(
        client_for(&silent),
        SqliteStorage::open(&dir.path().join("cinegate.db")).unwrap(),
    );
    resumed.initialize().await;

    for category in Category::ALL {
        assert_eq!(resumed.items(category), store.items(category));
    }
}

#[tokio::test]
async fn test_gateway_failure_is_recorded_not_raised() {
    // Arrange
    let gateway = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string(r#"{"message":"Invalid API key!"}"#),
        )
        .mount(&gateway)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let storage = SqliteStorage::open(&dir.path().join("cinegate.db")).unwrap();
    let store = CatalogStore::new(client_for(&gateway), storage);

    // Act
    store.initialize().await;

    // Assert
    assert_eq!(store.error().as_deref(), Some("Error loading data"));
    assert!(!store.is_loading());
    for category in Category::ALL {
        assert!(!store.has_items(category));
    }
}

#[tokio::test]
async fn test_clear_cache_removes_durable_entries() {
    // Arrange
    let gateway = MockServer::start().await;
    let one = format!("[{DETAIL_BEGINS}]");
    for category in ["movies", "series", "premieres"] {
        mount_page(&gateway, category, "1", one.clone()).await;
    }
    let dir = tempfile::tempdir().unwrap();
    let store = CatalogStore::new(
        client_for(&gateway),
        SqliteStorage::open(&dir.path().join("cinegate.db")).unwrap(),
    );
    store.initialize().await;

    // Act
    store.clear_cache();

    // Assert
    let storage = SqliteStorage::open(&dir.path().join("cinegate.db")).unwrap();
    for category in Category::ALL {
        assert!(!store.has_items(category));
        assert!(storage.get(category.storage_key()).unwrap().is_none());
    }
}
