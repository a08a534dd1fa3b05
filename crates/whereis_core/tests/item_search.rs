use whereis_core::{CatalogView, ItemDraft, ItemPatch, ItemRepository, MemoryStore};

async fn seeded_repo(names: &[&str]) -> ItemRepository<MemoryStore> {
    let repo = ItemRepository::new(MemoryStore::new());
    for name in names {
        repo.create(ItemDraft::new(*name, "somewhere")).await.unwrap();
    }
    repo
}

fn names(items: &[whereis_core::Item]) -> Vec<&str> {
    items.iter().map(|item| item.name.as_str()).collect()
}

#[tokio::test]
async fn search_box_returns_both_in_creation_order() {
    let repo = seeded_repo(&["Red Box", "Blue Box"]).await;

    assert_eq!(names(&repo.search("box").await), vec!["Red Box", "Blue Box"]);
    assert_eq!(names(&repo.search("red").await), vec!["Red Box"]);
}

#[tokio::test]
async fn blank_query_returns_list_unchanged() {
    let repo = seeded_repo(&["Red Box", "Lamp", "Blue Box"]).await;
    let all = repo.list().await;

    assert_eq!(repo.search("").await, all);
    assert_eq!(repo.search("   ").await, all);
}

#[tokio::test]
async fn search_matches_exactly_the_lowercased_substring_subset() {
    let repo = seeded_repo(&[
        "Winter Coat",
        "coat hanger",
        "Boat Cover",
        "COATS (spare)",
        "Tent",
    ])
    .await;
    let all = repo.list().await;

    for query in ["coat", " COAT ", "oat", "t", "tent", "zzz", "(spare)", "at c"] {
        let needle = query.trim().to_lowercase();
        let expected: Vec<_> = all
            .iter()
            .filter(|item| item.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        assert_eq!(repo.search(query).await, expected, "query `{query}`");
    }
}

#[tokio::test]
async fn search_ignores_descriptions() {
    let repo = ItemRepository::new(MemoryStore::new());
    repo.create(ItemDraft::new("Suitcase", "under the bed"))
        .await
        .unwrap();

    assert!(repo.search("bed").await.is_empty());
}

#[tokio::test]
async fn search_reflects_updates_and_removals() {
    let repo = seeded_repo(&["Red Box", "Blue Box"]).await;
    let items = repo.list().await;

    repo.update(
        &items[1].id,
        ItemPatch {
            name: Some("Blue Crate".to_string()),
            ..ItemPatch::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(names(&repo.search("box").await), vec!["Red Box"]);
    assert_eq!(names(&repo.search("CRATE").await), vec!["Blue Crate"]);

    repo.remove(&items[0].id).await.unwrap();
    assert!(repo.search("box").await.is_empty());
    assert_eq!(names(&repo.search("").await), vec!["Blue Crate"]);
}

#[tokio::test]
async fn catalog_view_follows_reloads() {
    let repo = seeded_repo(&["Red Box", "Lamp"]).await;
    let mut view = CatalogView::new(repo.reload().await);
    view.set_query("box");
    assert_eq!(names(view.visible()), vec!["Red Box"]);

    repo.create(ItemDraft::new("Shoe Box", "closet")).await.unwrap();
    view.set_items(repo.reload().await);
    assert_eq!(names(view.visible()), vec!["Red Box", "Shoe Box"]);
}
