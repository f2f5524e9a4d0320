use chrono::{Duration, TimeZone, Utc};
use hotsheet::db::Database;
use hotsheet::models::*;
use hotsheet::widget::{ContentSource, WidgetSettingsStore};
use speculate2::speculate;
use uuid::Uuid;

fn create_test_post(db: &Database, title: &str, categories: Vec<CategoryId>) -> Post {
    db.create_post(CreatePostInput {
        title: title.to_string(),
        url: format!("https://blog.example/{}", title.to_lowercase()),
        categories,
    })
    .expect("Failed to create post")
}

fn create_test_category(db: &Database, name: &str) -> Category {
    db.create_category(CreateCategoryInput {
        name: name.to_string(),
    })
    .expect("Failed to create category")
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
    }

    describe "posts" {
        describe "create_post" {
            it "creates a post without a feature date" {
                let post = create_test_post(&db, "Bake Sale", vec![]);

                assert_eq!(post.title, "Bake Sale");
                assert_eq!(post.url, "https://blog.example/bake sale");
                assert!(post.feature_until.is_none());
                assert!(post.categories.is_empty());
            }

            it "stores category membership once per category" {
                let events = create_test_category(&db, "Events");
                let news = create_test_category(&db, "News");

                let post = create_test_post(&db, "Fair", vec![news.id, events.id, news.id]);

                let mut expected = vec![events.id, news.id];
                expected.sort();
                assert_eq!(post.categories, expected);
                assert_eq!(db.get_post(post.id).unwrap().unwrap().categories, expected);
            }

            it "rejects unknown categories" {
                let result = db.create_post(CreatePostInput {
                    title: "Lost".to_string(),
                    url: "/lost".to_string(),
                    categories: vec![42],
                });

                let err = result.expect_err("unknown category should fail");
                assert!(err.to_string().contains("not found"));
                assert!(db.get_all_posts().unwrap().is_empty());
            }
        }

        describe "get_post" {
            it "returns None for non-existent post" {
                assert!(db.get_post(Uuid::new_v4()).expect("Query failed").is_none());
            }
        }

        describe "get_all_posts" {
            it "returns posts ordered by title" {
                create_test_post(&db, "Zebra", vec![]);
                create_test_post(&db, "Alpha", vec![]);

                let posts = db.get_all_posts().expect("Query failed");
                assert_eq!(posts.len(), 2);
                assert_eq!(posts[0].title, "Alpha");
                assert_eq!(posts[1].title, "Zebra");
            }
        }

        describe "update_post" {
            it "updates only the given fields" {
                let events = create_test_category(&db, "Events");
                let post = create_test_post(&db, "Old", vec![events.id]);

                let updated = db
                    .update_post(post.id, UpdatePostInput {
                        title: Some("New".to_string()),
                        ..Default::default()
                    })
                    .expect("Update failed")
                    .expect("Post missing");

                assert_eq!(updated.title, "New");
                assert_eq!(updated.url, post.url);
                assert_eq!(updated.categories, vec![events.id]);
            }

            it "replaces the category set" {
                let events = create_test_category(&db, "Events");
                let news = create_test_category(&db, "News");
                let post = create_test_post(&db, "Moving", vec![events.id]);

                db.update_post(post.id, UpdatePostInput {
                    categories: Some(vec![news.id]),
                    ..Default::default()
                })
                .expect("Update failed");

                assert_eq!(db.get_post(post.id).unwrap().unwrap().categories, vec![news.id]);
            }

            it "keeps the feature date" {
                let post = create_test_post(&db, "Dated", vec![]);
                let until = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
                db.set_feature_until(post.id, until).unwrap();

                let updated = db
                    .update_post(post.id, UpdatePostInput {
                        url: Some("/dated".to_string()),
                        ..Default::default()
                    })
                    .unwrap()
                    .unwrap();

                assert_eq!(updated.feature_until, Some(until));
            }

            it "returns None for non-existent post" {
                let result = db.update_post(Uuid::new_v4(), UpdatePostInput::default()).unwrap();
                assert!(result.is_none());
            }
        }

        describe "delete_post" {
            it "removes the post and its feature date" {
                let post = create_test_post(&db, "Gone", vec![]);
                db.set_feature_until(post.id, Utc::now()).unwrap();

                assert!(db.delete_post(post.id).unwrap());
                assert!(db.get_post(post.id).unwrap().is_none());
                assert!(db.get_feature_until(post.id).unwrap().is_none());
                assert!(!db.delete_post(post.id).unwrap());
            }
        }
    }

    describe "categories" {
        it "lists categories by name" {
            create_test_category(&db, "Sports");
            create_test_category(&db, "Arts");

            let names: Vec<String> = db
                .get_all_categories()
                .unwrap()
                .into_iter()
                .map(|c| c.name)
                .collect();
            assert_eq!(names, vec!["Arts", "Sports"]);
        }

        it "assigns positive ids" {
            let category = create_test_category(&db, "Events");
            assert!(category.id > 0);
            assert_eq!(db.get_category(category.id).unwrap(), Some(category));
        }

        it "deleting a category keeps its posts" {
            let events = create_test_category(&db, "Events");
            let post = create_test_post(&db, "Fair", vec![events.id]);

            assert!(db.delete_category(events.id).unwrap());

            let post = db.get_post(post.id).unwrap().expect("post should remain");
            assert!(post.categories.is_empty());
            assert!(!db.delete_category(events.id).unwrap());
        }
    }

    describe "feature dates" {
        it "sets, reads and clears the date" {
            let post = create_test_post(&db, "Fair", vec![]);
            let until = Utc.with_ymd_and_hms(2031, 7, 9, 0, 0, 0).unwrap();

            assert!(db.set_feature_until(post.id, until).unwrap());
            assert_eq!(db.get_feature_until(post.id).unwrap(), Some(until));
            assert_eq!(db.get_post(post.id).unwrap().unwrap().feature_until, Some(until));

            assert!(db.clear_feature_until(post.id).unwrap());
            assert_eq!(db.get_feature_until(post.id).unwrap(), None);
        }

        it "overwrites an earlier date" {
            let post = create_test_post(&db, "Fair", vec![]);
            let first = Utc.with_ymd_and_hms(2031, 7, 9, 0, 0, 0).unwrap();
            let second = Utc.with_ymd_and_hms(2032, 1, 2, 0, 0, 0).unwrap();

            db.set_feature_until(post.id, first).unwrap();
            db.set_feature_until(post.id, second).unwrap();

            assert_eq!(db.get_feature_until(post.id).unwrap(), Some(second));
        }

        it "stores whole seconds" {
            let post = create_test_post(&db, "Fair", vec![]);
            let until = Utc.with_ymd_and_hms(2031, 7, 9, 10, 0, 0).unwrap();

            db.set_feature_until(post.id, until + Duration::milliseconds(750)).unwrap();

            assert_eq!(db.get_feature_until(post.id).unwrap(), Some(until));
        }

        it "reports missing posts" {
            assert!(!db.set_feature_until(Uuid::new_v4(), Utc::now()).unwrap());
            assert!(!db.clear_feature_until(Uuid::new_v4()).unwrap());
        }
    }

    describe "get_featured_candidates" {
        before {
            let now = Utc.with_ymd_and_hms(2024, 9, 15, 0, 0, 0).unwrap();
            let events = create_test_category(&db, "Events");
            let news = create_test_category(&db, "News");

            let later = create_test_post(&db, "Later", vec![events.id]);
            let past = create_test_post(&db, "Past", vec![events.id]);
            let soon = create_test_post(&db, "Soon", vec![news.id]);
            create_test_post(&db, "Undated", vec![events.id]);

            db.set_feature_until(later.id, now + Duration::days(10)).unwrap();
            db.set_feature_until(past.id, now - Duration::days(5)).unwrap();
            db.set_feature_until(soon.id, now + Duration::days(3)).unwrap();
        }

        it "returns dated posts ordered by date" {
            let titles: Vec<String> = db
                .get_featured_candidates(CategoryFilter::ALL)
                .unwrap()
                .into_iter()
                .map(|p| p.title)
                .collect();

            assert_eq!(titles, vec!["Past", "Soon", "Later"]);
        }

        it "restricts to one category" {
            let titles: Vec<String> = db
                .featured_candidates(CategoryFilter::from_id(events.id))
                .unwrap()
                .into_iter()
                .map(|p| p.title)
                .collect();

            assert_eq!(titles, vec!["Past", "Later"]);
        }

        it "returns nothing for an empty category" {
            let empty = create_test_category(&db, "Empty");
            assert!(db
                .get_featured_candidates(CategoryFilter::from_id(empty.id))
                .unwrap()
                .is_empty());
        }
    }

    describe "featured candidate ties" {
        it "orders equal dates by creation" {
            let until = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
            for title in ["Zulu", "Alpha", "Mike"] {
                let post = create_test_post(&db, title, vec![]);
                db.set_feature_until(post.id, until).unwrap();
            }

            let titles: Vec<String> = db
                .get_featured_candidates(CategoryFilter::ALL)
                .unwrap()
                .into_iter()
                .map(|p| p.title)
                .collect();

            assert_eq!(titles, vec!["Zulu", "Alpha", "Mike"]);
        }
    }

    describe "widget settings" {
        it "returns None for an unconfigured widget" {
            assert!(db.load_widget_config("sidebar-1").unwrap().is_none());
        }

        it "saves and overwrites settings" {
            let first = WidgetConfig { title: "Events".to_string(), category_id: 2 };
            let second = WidgetConfig { title: "Everything".to_string(), category_id: 0 };

            db.save_config("sidebar-1", &first).unwrap();
            assert_eq!(db.load_config("sidebar-1").unwrap(), Some(first));

            db.save_widget_config("sidebar-1", &second).unwrap();
            assert_eq!(db.load_widget_config("sidebar-1").unwrap(), Some(second));
        }

        it "keeps instances separate" {
            db.save_widget_config("a", &WidgetConfig { title: "A".to_string(), category_id: 0 }).unwrap();
            db.save_widget_config("b", &WidgetConfig { title: "B".to_string(), category_id: 0 }).unwrap();

            assert_eq!(db.load_widget_config("a").unwrap().unwrap().title, "A");
            assert_eq!(db.load_widget_config("b").unwrap().unwrap().title, "B");
        }
    }
}

#[test]
fn persists_to_disk() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("hotsheet.db");

    let post_id = {
        let db = Database::open(path.clone()).expect("Failed to open database");
        db.migrate().expect("Failed to migrate");
        let post = create_test_post(&db, "Durable", vec![]);
        db.set_feature_until(post.id, Utc.with_ymd_and_hms(2030, 5, 5, 0, 0, 0).unwrap())
            .unwrap();
        post.id
    };

    let db = Database::open(path).expect("Failed to reopen database");
    db.migrate().expect("Failed to migrate");
    let post = db.get_post(post_id).unwrap().expect("post should persist");
    assert_eq!(
        post.feature_until,
        Some(Utc.with_ymd_and_hms(2030, 5, 5, 0, 0, 0).unwrap())
    );
}
