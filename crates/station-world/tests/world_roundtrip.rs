use rand::SeedableRng;
use rand::rngs::StdRng;
use station_db::{Database, KvStore};
use station_types::{Channel, Fluency, LanguageSkill, UserDraft};
use station_world::{
    ExportKind, ImportFormat, ImportPayload, Repository, USERS_KEY, parse_import,
};

fn seeded_repo(db: &Database) -> Repository<&Database> {
    let mut repo = Repository::load(db);

    let mut neo = UserDraft::new("neo");
    neo.personality = "Sees the code, says little.".into();
    neo.language_skills.push(LanguageSkill {
        language: "Japanese".into(),
        fluency: Fluency::Intermediate,
        accent: "Tokyo".into(),
    });
    let neo = repo.create_user(neo).unwrap();
    let trinity = repo.create_user(UserDraft::new("trinity")).unwrap();

    repo.create_channel("#matrix", "red pill", vec![neo.id.clone(), trinity.id.clone()])
        .unwrap();
    repo.create_channel("#zion", "", vec![trinity.id]).unwrap();
    repo
}

#[test]
fn world_export_restores_into_an_empty_store() {
    let source_db = Database::open_in_memory().unwrap();
    let source = seeded_repo(&source_db);
    let mut rng = StdRng::seed_from_u64(3);
    let text = ExportKind::World
        .render(source.users(), source.channels(), &mut rng)
        .unwrap();

    let target_db = Database::open_in_memory().unwrap();
    let mut target = Repository::load(&target_db);
    let payload = parse_import(&text, ImportFormat::Json).unwrap();
    target.apply_import(payload).unwrap();

    assert_eq!(target.users(), source.users());
    assert_eq!(target.channels(), source.channels());

    let reloaded = Repository::load(&target_db);
    assert_eq!(reloaded.world(), source.world());
}

#[test]
fn csv_import_merges_users_and_keeps_channels() {
    let db = Database::open_in_memory().unwrap();
    let mut repo = seeded_repo(&db);
    let mut rng = StdRng::seed_from_u64(3);
    let csv = ExportKind::Csv
        .render(repo.users(), repo.channels(), &mut rng)
        .unwrap();

    let payload = parse_import(&csv, ImportFormat::Csv).unwrap();
    let ImportPayload::Users(users) = &payload else {
        panic!("csv import must yield users");
    };
    assert_eq!(users.as_slice(), repo.users());

    let before = repo.world();
    let summary = repo.apply_import(payload).unwrap();
    assert_eq!(summary.users, 2);
    assert_eq!(summary.channels, 0);
    assert_eq!(repo.world(), before);
}

#[test]
fn importing_the_same_file_twice_changes_nothing() {
    let db = Database::open_in_memory().unwrap();
    let mut repo = seeded_repo(&db);
    let text = r##"{
        "users": [
            {"id": "u-9", "nickname": "neo", "personality": "Reloaded."},
            {"id": "u-10", "nickname": "morpheus"}
        ],
        "channels": [{"id": "c-9", "name": "#matrix", "users": ["u-9", "u-10"]}]
    }"##;

    repo.apply_import(parse_import(text, ImportFormat::Json).unwrap())
        .unwrap();
    let once = repo.world();
    repo.apply_import(parse_import(text, ImportFormat::Json).unwrap())
        .unwrap();
    assert_eq!(repo.world(), once);

    let nicknames = repo.nicknames();
    assert_eq!(nicknames, vec!["neo", "trinity", "morpheus"]);
    assert_eq!(repo.users()[0].personality, "Reloaded.");
    let names: Vec<&str> = repo.channels().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["#matrix", "#zion"]);
}

#[test]
fn rejected_files_leave_the_store_untouched() {
    let db = Database::open_in_memory().unwrap();
    let repo = seeded_repo(&db);
    let saved = db.get(USERS_KEY).unwrap();

    assert!(parse_import(r#"{"users": []}"#, ImportFormat::Json).is_err());
    assert!(parse_import("id,nickname\n", ImportFormat::Csv).is_err());

    assert_eq!(db.get(USERS_KEY).unwrap(), saved);
    assert_eq!(repo.users().len(), 2);
}

#[test]
fn deleting_a_user_persists_the_cascade() {
    let db = Database::open_in_memory().unwrap();
    let mut repo = seeded_repo(&db);
    let trinity = repo.users()[1].id.clone();

    repo.remove_user(&trinity).unwrap();

    let reloaded = Repository::load(&db);
    assert_eq!(reloaded.users().len(), 1);
    assert!(reloaded.channels().iter().all(|c: &Channel| !c.has_member(&trinity)));
    assert!(reloaded.channel(&reloaded.channels()[1].id).unwrap().users.is_empty());
}
