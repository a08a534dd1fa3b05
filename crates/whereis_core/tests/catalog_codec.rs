use whereis_core::codec::{decode, encode};
use whereis_core::{
    FileStore, Item, ItemDraft, ItemId, ItemRepository, KeyValueStore, Location, MemoryStore,
    SqliteStore, DEFAULT_CATALOG_KEY,
};

fn catalog() -> Vec<Item> {
    vec![
        Item {
            id: ItemId::from("1717171717171"),
            name: "Christmas Tree Carpet".to_string(),
            description: "Top shelf of walk-in closet".to_string(),
            photo_uri: None,
            location: None,
        },
        Item {
            id: ItemId::generate(),
            name: "Tent \"Ultralight\"".to_string(),
            description: "Garage loft, left side\nbehind the skis".to_string(),
            photo_uri: Some("file:///data/user/0/photos/IMG_0001.jpg".to_string()),
            location: Some(Location::new(-33.868820, 151.209296)),
        },
        Item {
            id: ItemId::generate(),
            name: "Schlüssel 🔑".to_string(),
            description: "Kommode".to_string(),
            photo_uri: None,
            location: Some(Location::new(0.1 + 0.2, -179.999_999_9)),
        },
    ]
}

#[test]
fn decode_of_encode_is_identity() {
    let items = catalog();
    assert_eq!(decode(&encode(&items).unwrap()), items);
    assert!(decode(&encode(&[]).unwrap()).is_empty());
}

#[test]
fn malformed_blobs_never_fail() {
    let valid = encode(&catalog()[..2]).unwrap();
    let truncated = &valid[..valid.len() / 2];

    for blob in ["not json", "[", "{\"items\":[]}", "42", "\u{0}", truncated] {
        assert!(decode(blob).is_empty(), "blob `{blob}` should decode empty");
    }
}

#[tokio::test]
async fn literal_not_json_reads_as_empty_catalog() {
    let store = MemoryStore::with_entry(DEFAULT_CATALOG_KEY, "not json");
    let repo = ItemRepository::new(store);

    assert!(repo.list().await.is_empty());
    assert!(repo.search("anything").await.is_empty());
}

#[tokio::test]
async fn corrupt_catalog_is_replaced_on_next_create() {
    let store = MemoryStore::with_entry(DEFAULT_CATALOG_KEY, "{broken");
    let repo = ItemRepository::new(store.clone());

    let item = repo.create(ItemDraft::new("Lamp", "Attic")).await.unwrap();
    assert_eq!(repo.list().await, vec![item]);
    assert_eq!(decode(&store.raw(DEFAULT_CATALOG_KEY).unwrap()).len(), 1);
}

#[tokio::test]
async fn catalog_written_by_mobile_app_loads() {
    let blob = r#"[{"id":"1717171717171","name":"Red Box","description":"Garage","photoUri":null,"location":{"latitude":1.5,"longitude":2.5}}]"#;
    let repo = ItemRepository::new(MemoryStore::with_entry(DEFAULT_CATALOG_KEY, blob));

    let items = repo.list().await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id.as_str(), "1717171717171");
    assert_eq!(items[0].location, Some(Location::new(1.5, 2.5)));
}

#[tokio::test]
async fn every_backend_roundtrips_the_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let backends: Vec<Box<dyn KeyValueStore>> = vec![
        Box::new(MemoryStore::new()),
        Box::new(SqliteStore::open(dir.path().join("catalog.sqlite3")).unwrap()),
        Box::new(FileStore::open(dir.path().join("files")).unwrap()),
    ];

    for store in backends {
        let backend = store.backend_name();
        let repo = ItemRepository::new(store);
        let mut expected = Vec::new();
        for item in catalog() {
            let draft = ItemDraft {
                name: item.name,
                description: item.description,
                photo_uri: item.photo_uri,
                location: item.location,
            };
            expected.push(repo.create(draft).await.unwrap());
        }
        assert_eq!(repo.list().await, expected, "backend {backend}");
    }
}

#[tokio::test]
async fn legacy_entry_with_blank_name_does_not_erase_its_neighbours() {
    let blob = r#"[
        {"id":"1717171717171","name":"Passport","description":"Desk drawer","photoUri":null,"location":null},
        {"id":"1717171718000","name":"","description":"edited to empty","photoUri":null,"location":null},
        {"id":"1717171719999","name":"Tent","description":"Garage","photoUri":null,"location":null}
    ]"#;
    let store = MemoryStore::with_entry(DEFAULT_CATALOG_KEY, blob);
    let repo = ItemRepository::new(store.clone());

    let names = |items: &[Item]| -> Vec<String> {
        items.iter().map(|item| item.name.clone()).collect()
    };
    assert_eq!(names(&repo.list().await), vec!["Passport", "Tent"]);

    repo.create(ItemDraft::new("Lamp", "Attic")).await.unwrap();
    assert_eq!(names(&repo.list().await), vec!["Passport", "Tent", "Lamp"]);

    let persisted = decode(&store.raw(DEFAULT_CATALOG_KEY).unwrap());
    assert_eq!(names(&persisted), vec!["Passport", "Tent", "Lamp"]);
}
