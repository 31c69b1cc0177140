//! End-to-end hierarchy flows against an in-memory database: category and
//! subcategory writes, impact preview, cascade deletion with media cleanup,
//! the slot matcher and page associations.

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use surrealdb::sql::Thing;
use tempfile::TempDir;

use catalog_server::db::models::{
    CategoryCreate, CategoryTargetType, PageCategoryCreate, PageKind, ProductCreate,
    SubCategoryCreate, SubCategoryUpdate,
};
use catalog_server::db::repository::{
    CategoryRepository, PageCategoryRepository, ProductRepository, RepoError,
    SubCategoryRepository,
};
use catalog_server::hierarchy::{CascadeEngine, CascadeOutcome, build_tree};
use catalog_server::media::MediaStore;

async fn setup() -> (Surreal<Db>, MediaStore, TempDir) {
    let db = Surreal::new::<Mem>(()).await.expect("in-memory db");
    db.use_ns("test").use_db("test").await.expect("namespace");
    let dir = tempfile::tempdir().expect("tempdir");
    let media = MediaStore::new(dir.path().to_path_buf());
    (db, media, dir)
}

fn category_create(name: &str, image: Option<&str>) -> CategoryCreate {
    CategoryCreate {
        name: name.to_string(),
        slug: None,
        image: image.map(str::to_string),
        show_in_slider: None,
        is_active: None,
    }
}

fn sub_create(name: &str, category: &str, parent: Option<&str>) -> SubCategoryCreate {
    SubCategoryCreate {
        name: name.to_string(),
        slug: None,
        image: None,
        category: category.to_string(),
        parent_subcategory: parent.map(str::to_string),
        is_active: None,
    }
}

fn id_str(id: &Option<Thing>) -> String {
    id.as_ref().expect("persisted id").to_string()
}

/// Electronics -> Laptops -> Gaming Laptops, one product on the leaf.
async fn electronics_fixture(
    db: &Surreal<Db>,
) -> (String, String, String, String) {
    let categories = CategoryRepository::new(db.clone());
    let subcategories = SubCategoryRepository::new(db.clone());
    let products = ProductRepository::new(db.clone());

    let root = categories
        .create(category_create("Electronics", Some("rootimg")))
        .await
        .expect("create category");
    let root_id = id_str(&root.id);

    let s1 = subcategories
        .create(sub_create("Laptops", &root_id, None))
        .await
        .expect("create level-1");
    let s1_id = id_str(&s1.id);
    assert_eq!(s1.level, 1);

    let s2 = subcategories
        .create(sub_create("Gaming Laptops", &root_id, Some(&s1_id)))
        .await
        .expect("create level-2");
    let s2_id = id_str(&s2.id);
    assert_eq!(s2.level, 2);

    let p1 = products
        .create(ProductCreate {
            name: "Raider 18".to_string(),
            slug: None,
            images: vec!["p1img".to_string()],
            parent_category: Some(root_id.clone()),
            category: Some(s2_id.clone()),
            sub_category2: None,
            sub_category3: None,
            sub_category4: None,
        })
        .await
        .expect("create product");
    let p1_id = id_str(&p1.id);

    (root_id, s1_id, s2_id, p1_id)
}

#[tokio::test]
async fn impact_counts_distinct_descendants() {
    let (db, media, _dir) = setup().await;
    let (root_id, _s1, _s2, _p1) = electronics_fixture(&db).await;

    let engine = CascadeEngine::new(db.clone(), media);
    let impact = engine.impact(&root_id).await.expect("impact");

    // Both subcategories carry the root link, so the level-1 hop already
    // sees them both; the distinct child count must still be 2.
    assert_eq!(impact.level1_count, 2);
    assert_eq!(impact.level2_count, 1);
    assert_eq!(impact.level3_count, 0);
    assert_eq!(impact.child_count, 2);
    assert_eq!(impact.product_count, 1);

    // Read-only and idempotent
    let again = engine.impact(&root_id).await.expect("impact again");
    assert_eq!(again.child_count, 2);
    assert_eq!(again.product_count, 1);
}

#[tokio::test]
async fn cascade_with_move_flag_deletes_nothing() {
    let (db, media, _dir) = setup().await;
    let (root_id, s1_id, _s2, p1_id) = electronics_fixture(&db).await;

    let engine = CascadeEngine::new(db.clone(), media);
    let outcome = engine.cascade_delete(&root_id, true).await.expect("cascade");

    match outcome {
        CascadeOutcome::MoveRequired { descendant_ids } => {
            assert_eq!(descendant_ids.len(), 2);
            assert!(descendant_ids.contains(&s1_id));
        }
        CascadeOutcome::Deleted(_) => panic!("move_products_first must not delete"),
    }

    // Everything still present
    let categories = CategoryRepository::new(db.clone());
    let products = ProductRepository::new(db.clone());
    assert!(categories.find_by_id(&root_id).await.unwrap().is_some());
    assert!(products.find_by_id(&p1_id).await.unwrap().is_some());
}

#[tokio::test]
async fn cascade_removes_subtree_products_and_media() {
    let (db, media, dir) = setup().await;
    let (root_id, _s1, _s2, p1_id) = electronics_fixture(&db).await;

    // Back the media hashes with real files
    std::fs::write(dir.path().join("rootimg.jpg"), b"jpeg").unwrap();
    std::fs::write(dir.path().join("p1img.jpg"), b"jpeg").unwrap();

    let engine = CascadeEngine::new(db.clone(), media.clone());
    let outcome = engine.cascade_delete(&root_id, false).await.expect("cascade");

    match outcome {
        CascadeOutcome::Deleted(report) => {
            assert_eq!(report.deleted_subcategories, 2);
            assert_eq!(report.deleted_products, 1);
        }
        CascadeOutcome::MoveRequired { .. } => panic!("expected the permanent path"),
    }

    let categories = CategoryRepository::new(db.clone());
    let subcategories = SubCategoryRepository::new(db.clone());
    let products = ProductRepository::new(db.clone());
    assert!(categories.find_by_id(&root_id).await.unwrap().is_none());
    assert!(products.find_by_id(&p1_id).await.unwrap().is_none());
    assert!(subcategories.find_all_raw().await.unwrap().is_empty());

    assert!(!media.image_exists("rootimg"));
    assert!(!media.image_exists("p1img"));

    // A second impact on the gone category is a NotFound, not a panic
    assert!(matches!(
        engine.impact(&root_id).await,
        Err(RepoError::NotFound(_))
    ));
}

#[tokio::test]
async fn tree_excludes_soft_deleted_roots() {
    let (db, _media, _dir) = setup().await;
    let (root_id, _s1, _s2, _p1) = electronics_fixture(&db).await;

    let categories = CategoryRepository::new(db.clone());
    let subcategories = SubCategoryRepository::new(db.clone());

    let forest = build_tree(
        &categories.find_all_active().await.unwrap(),
        &subcategories.find_all_active().await.unwrap(),
    );
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].name, "Electronics");
    assert_eq!(forest[0].children.len(), 1); // Laptops, nesting Gaming Laptops
    assert_eq!(forest[0].children[0].children.len(), 1);

    categories.soft_delete(&root_id).await.expect("soft delete");
    let forest = build_tree(
        &categories.find_all_active().await.unwrap(),
        &subcategories.find_all_active().await.unwrap(),
    );
    assert!(forest.is_empty());

    // Restore brings it back
    categories.restore(&root_id).await.expect("restore");
    let forest = build_tree(
        &categories.find_all_active().await.unwrap(),
        &subcategories.find_all_active().await.unwrap(),
    );
    assert_eq!(forest.len(), 1);
}

#[tokio::test]
async fn matcher_hits_any_slot_and_only_given_nodes() {
    let (db, _media, _dir) = setup().await;
    let (root_id, s1_id, s2_id, _p1) = electronics_fixture(&db).await;

    let products = ProductRepository::new(db.clone());

    // Second product attached only through the third slot
    let p2 = products
        .create(ProductCreate {
            name: "Stealth 14".to_string(),
            slug: None,
            images: Vec::new(),
            parent_category: Some(root_id.clone()),
            category: None,
            sub_category2: None,
            sub_category3: Some(s1_id.clone()),
            sub_category4: None,
        })
        .await
        .expect("create product");

    let s1_thing: Thing = p2.sub_category3.clone().unwrap();
    let hits = products
        .find_by_hierarchy_nodes(vec![s1_thing], 1, 20)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Stealth 14");

    // A sibling node that nothing points at matches nothing
    let s2 = SubCategoryRepository::new(db.clone())
        .find_by_id(&s2_id)
        .await
        .unwrap()
        .unwrap();
    let hits = products
        .find_by_hierarchy_nodes(vec![s2.id.clone().unwrap()], 1, 20)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1); // only the fixture product on s2
    assert_eq!(hits[0].name, "Raider 18");

    let count = products
        .count_by_hierarchy_nodes(vec![s2.id.unwrap()])
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn matcher_tolerates_extreme_page_numbers() {
    let (db, _media, _dir) = setup().await;
    let (_root, _s1, s2_id, _p1) = electronics_fixture(&db).await;

    let products = ProductRepository::new(db.clone());
    let s2 = SubCategoryRepository::new(db.clone())
        .find_by_id(&s2_id)
        .await
        .unwrap()
        .unwrap();
    let node = s2.id.unwrap();

    // Page far past the table is an empty page, not a panic
    let hits = products
        .find_by_hierarchy_nodes(vec![node.clone()], u32::MAX, u32::MAX)
        .await
        .unwrap();
    assert!(hits.is_empty());

    // Ordinary pagination is unaffected
    let hits = products
        .find_by_hierarchy_nodes(vec![node], 1, 20)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
}

#[tokio::test]
async fn nesting_depth_is_capped_at_four_levels() {
    let (db, _media, _dir) = setup().await;
    let categories = CategoryRepository::new(db.clone());
    let subcategories = SubCategoryRepository::new(db.clone());

    let root = categories
        .create(category_create("Components", None))
        .await
        .unwrap();
    let root_id = id_str(&root.id);

    let mut parent: Option<String> = None;
    for (i, name) in ["CPUs", "Desktop CPUs", "Gaming CPUs", "Overclockable"]
        .iter()
        .enumerate()
    {
        let sub = subcategories
            .create(sub_create(name, &root_id, parent.as_deref()))
            .await
            .expect("within depth cap");
        assert_eq!(sub.level, i as i32 + 1);
        parent = Some(id_str(&sub.id));
    }

    let too_deep = subcategories
        .create(sub_create("Level Five", &root_id, parent.as_deref()))
        .await;
    assert!(matches!(too_deep, Err(RepoError::Validation(_))));

    // A rejected update must not half-apply: combining a rename with a
    // re-parent past the cap leaves the row exactly as it was.
    let victim = subcategories
        .create(sub_create("Victim", &root_id, None))
        .await
        .unwrap();
    let victim_id = id_str(&victim.id);

    let rejected = subcategories
        .update(
            &victim_id,
            SubCategoryUpdate {
                name: Some("Renamed".to_string()),
                slug: None,
                image: None,
                parent_subcategory: parent.clone(),
                is_active: None,
            },
        )
        .await;
    assert!(matches!(rejected, Err(RepoError::Validation(_))));

    let after = subcategories
        .find_by_id(&victim_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.name, "Victim");
    assert!(after.parent_subcategory.is_none());
    assert_eq!(after.level, 1);
}

#[tokio::test]
async fn page_feed_surfaces_descendant_products() {
    let (db, media, _dir) = setup().await;
    let (root_id, _s1, s2_id, _p1) = electronics_fixture(&db).await;

    let products = ProductRepository::new(db.clone());
    // Assigned only through a level-2 slot: the root node alone would
    // never match this without descendant expansion
    products
        .create(ProductCreate {
            name: "Vector 16".to_string(),
            slug: None,
            images: Vec::new(),
            parent_category: None,
            category: None,
            sub_category2: Some(s2_id.clone()),
            sub_category3: None,
            sub_category4: None,
        })
        .await
        .expect("create deep product");

    let pages = PageCategoryRepository::new(db.clone());
    pages
        .create(
            PageKind::Offer,
            "deep-deals",
            PageCategoryCreate {
                category: root_id.clone(),
                category_type: CategoryTargetType::Category,
                sort_order: None,
            },
        )
        .await
        .expect("attach root category");

    let engine = CascadeEngine::new(db.clone(), media);
    let assocs = pages
        .list_by_page(PageKind::Offer, "deep-deals", true)
        .await
        .unwrap();
    let nodes = engine.expand_associations(&assocs).await.unwrap();
    // root + both descendants, each once
    assert_eq!(nodes.len(), 3);

    let feed = products
        .find_by_hierarchy_nodes(nodes, 1, 20)
        .await
        .unwrap();
    let names: Vec<_> = feed.iter().map(|p| p.name.as_str()).collect();
    assert!(names.contains(&"Vector 16"));
    assert!(names.contains(&"Raider 18"));

    // An unrelated category's page does not pick any of it up
    let other = CategoryRepository::new(db.clone())
        .create(category_create("Furniture", None))
        .await
        .unwrap();
    pages
        .create(
            PageKind::Offer,
            "furniture-fair",
            PageCategoryCreate {
                category: id_str(&other.id),
                category_type: CategoryTargetType::Category,
                sort_order: None,
            },
        )
        .await
        .expect("attach unrelated category");

    let assocs = pages
        .list_by_page(PageKind::Offer, "furniture-fair", true)
        .await
        .unwrap();
    let nodes = engine.expand_associations(&assocs).await.unwrap();
    let feed = products
        .find_by_hierarchy_nodes(nodes, 1, 20)
        .await
        .unwrap();
    assert!(feed.is_empty());
}

#[tokio::test]
async fn page_association_pair_is_unique() {
    let (db, _media, _dir) = setup().await;
    let (root_id, s1_id, _s2, _p1) = electronics_fixture(&db).await;

    let pages = PageCategoryRepository::new(db.clone());

    let first = pages
        .create(
            PageKind::Offer,
            "summer-sale",
            PageCategoryCreate {
                category: root_id.clone(),
                category_type: CategoryTargetType::Category,
                sort_order: Some(1),
            },
        )
        .await
        .expect("first attach");
    assert!(first.is_active);

    let dup = pages
        .create(
            PageKind::Offer,
            "summer-sale",
            PageCategoryCreate {
                category: root_id.clone(),
                category_type: CategoryTargetType::Category,
                sort_order: Some(2),
            },
        )
        .await;
    assert!(matches!(dup, Err(RepoError::Duplicate(_))));

    // Same node on a different page is fine
    pages
        .create(
            PageKind::GamingZone,
            "rgb-corner",
            PageCategoryCreate {
                category: s1_id.clone(),
                category_type: CategoryTargetType::Subcategory,
                sort_order: None,
            },
        )
        .await
        .expect("different page");

    let listed = pages
        .list_by_page(PageKind::Offer, "summer-sale", true)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);

    // A target resolved against the wrong table is rejected
    let wrong_type = pages
        .create(
            PageKind::Offer,
            "summer-sale",
            PageCategoryCreate {
                category: s1_id,
                category_type: CategoryTargetType::Category,
                sort_order: None,
            },
        )
        .await;
    assert!(matches!(wrong_type, Err(RepoError::NotFound(_))));
}
