use farmland::content::ContentStore;
use farmland::data_models::{BlogPost, ContentItem, Farm};
use farmland::related::*;

fn load_store() -> ContentStore {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("content");
    ContentStore::load(dir).expect("fixture content should load")
}

fn ids<T: ContentItem>(items: &[&T]) -> Vec<String> {
    items.iter().map(|i| i.id().to_string()).collect()
}

fn post(id: &str, category: &str, tags: &[&str]) -> BlogPost {
    BlogPost {
        id: id.to_string(),
        title: format!("Post {id}"),
        excerpt: String::new(),
        content: String::new(),
        author: "Staff".to_string(),
        date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        category: category.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        image: None,
        read_time_minutes: 1,
    }
}

#[test]
fn test_category_match_outranks_unrelated() {
    let store = load_store();
    let posts = store.blog().find_all();
    let focal = store.blog().find_by_id("1").unwrap();

    let related = rank_related(focal, posts, 3);
    let got = ids(&related);

    let pos5 = got.iter().position(|id| id == "5");
    let pos2 = got.iter().position(|id| id == "2");
    assert!(pos5.is_some());
    // "2" scores zero and falls outside the top three.
    assert!(pos2.is_none() || pos5 < pos2);
}

#[test]
fn test_fixture_ranking_order() {
    let store = load_store();
    let posts = store.blog().find_all();
    let focal = store.blog().find_by_id("1").unwrap();

    // 6: category + crops + profitability = 4, 5: category = 2,
    // 3 and 4: one shared tag each, 3 comes first in the input.
    assert_eq!(ids(&rank_related(focal, posts, 3)), vec!["6", "5", "3"]);
    assert_eq!(
        ids(&rank_related(focal, posts, 10)),
        vec!["6", "5", "3", "4", "2"]
    );
}

#[test]
fn test_spec_scores() {
    let focal = post("1", "farming-tips", &["crops", "profitability"]);
    assert_eq!(
        relevance_score(&focal, &post("2", "success-stories", &["investment", "retirement"])),
        0
    );
    assert_eq!(
        relevance_score(&focal, &post("5", "farming-tips", &["maintenance", "seasonal"])),
        2
    );
    assert_eq!(
        relevance_score(&focal, &post("6", "farming-tips", &["crops", "profitability"])),
        4
    );
}

#[test]
fn test_duplicate_tags_count_once() {
    let focal = post("1", "a", &["crops", "crops"]);
    let candidate = post("2", "b", &["crops", "crops", "crops"]);
    assert_eq!(relevance_score(&focal, &candidate), 1);
}

#[test]
fn test_never_includes_focal() {
    let store = load_store();
    let farms = store.farms().find_all();
    for focal in farms {
        let related = rank_related(focal, farms, farms.len());
        assert!(related.iter().all(|f| f.id != focal.id));
        assert_eq!(related.len(), farms.len() - 1);
    }
}

#[test]
fn test_missing_focal_excludes_nothing() {
    let store = load_store();
    let posts = store.blog().find_all();
    let outsider = post("99", "farming-tips", &["crops"]);

    let related = rank_related(&outsider, posts, 100);
    assert_eq!(related.len(), posts.len());
    // Post 1 and post 6 tie on 3; input order wins.
    assert_eq!(related[0].id, "1");
    assert_eq!(related[1].id, "6");
}

#[test]
fn test_scores_non_increasing_and_limit_respected() {
    let store = load_store();
    let farms = store.farms().find_all();
    for limit in 0..8 {
        for focal in farms {
            let related: Vec<&Farm> = rank_related(focal, farms, limit);
            assert!(related.len() <= limit);
            assert!(related.len() <= farms.len() - 1);
            for pair in related.windows(2) {
                assert!(relevance_score(focal, pair[0]) >= relevance_score(focal, pair[1]));
            }
        }
    }
}

#[test]
fn test_empty_candidates() {
    let focal = post("1", "a", &[]);
    let empty: Vec<BlogPost> = Vec::new();
    assert!(rank_related(&focal, &empty, DEFAULT_RELATED_LIMIT).is_empty());
}

#[test]
fn test_farm_related_by_crop() {
    let store = load_store();
    let farms = store.farms().find_all();
    let focal = store.farms().find_by_id("2").unwrap();
    // Golden Fields shares the mango category and two tags.
    assert_eq!(ids(&rank_related(focal, farms, 1)), vec!["6"]);
}
