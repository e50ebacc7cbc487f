// ABOUTME: SQLite backend tests against a temporary database file
// ABOUTME: Schema migration, row round-trips, and prune ordering
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::{Duration, Utc};
use tempfile::TempDir;
use uuid::Uuid;

use tutorhub::database_plugins::sqlite::SqliteDatabase;
use tutorhub::database_plugins::DatabaseProvider;
use tutorhub::models::{AbilitySet, Lesson, Question, SessionToken, User, UserRole};

async fn test_db(dir: &TempDir) -> SqliteDatabase {
    let path = dir.path().join("test.db");
    let db = SqliteDatabase::new(&format!("sqlite:{}", path.display()))
        .await
        .expect("connect should succeed");
    db.migrate().await.expect("migrate should succeed");
    db
}

fn sample_user(email: &str) -> User {
    User::new("Test".into(), email.into(), "$2b$04$hash".into(), UserRole::Student)
}

fn sample_token(user_id: Uuid, suffix: u32, age_hours: i64) -> SessionToken {
    SessionToken {
        id: format!("token-{suffix}"),
        user_id,
        token_hash: format!("{suffix:064}"),
        token_prefix: format!("tut_{suffix:08}"),
        abilities: AbilitySet::from(vec!["lesson:read"]),
        created_at: Utc::now() - Duration::hours(age_hours),
        last_used_at: None,
    }
}

#[tokio::test]
async fn test_user_round_trip() {
    let dir = TempDir::new().unwrap();
    let db = test_db(&dir).await;

    let user = sample_user("round@example.com");
    db.create_user(&user).await.unwrap();

    let by_id = db.get_user(user.id).await.unwrap().unwrap();
    assert_eq!(by_id.email, "round@example.com");
    assert_eq!(by_id.role, UserRole::Student);

    let by_email = db.get_user_by_email("round@example.com").await.unwrap().unwrap();
    assert_eq!(by_email.id, user.id);

    assert!(db.get_user_by_email("ghost@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let dir = TempDir::new().unwrap();
    let db = test_db(&dir).await;

    db.create_user(&sample_user("dup@example.com")).await.unwrap();
    assert!(db.create_user(&sample_user("dup@example.com")).await.is_err());
}

#[tokio::test]
async fn test_token_round_trip_and_lookup() {
    let dir = TempDir::new().unwrap();
    let db = test_db(&dir).await;

    let user = sample_user("tok@example.com");
    db.create_user(&user).await.unwrap();

    let token = sample_token(user.id, 1, 0);
    db.insert_session_token(&token).await.unwrap();

    let found = db
        .get_session_token(&token.token_prefix, &token.token_hash)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, token.id);
    assert_eq!(found.abilities, token.abilities);
    assert!(found.last_used_at.is_none());

    // Prefix alone is not enough
    assert!(db
        .get_session_token(&token.token_prefix, "wrong-hash")
        .await
        .unwrap()
        .is_none());

    let touched = Utc::now();
    db.update_session_token_last_used(&token.id, touched)
        .await
        .unwrap();
    let found = db
        .get_session_token(&token.token_prefix, &token.token_hash)
        .await
        .unwrap()
        .unwrap();
    assert!(found.last_used_at.is_some());
}

#[tokio::test]
async fn test_prune_deletes_oldest_first() {
    let dir = TempDir::new().unwrap();
    let db = test_db(&dir).await;

    let user = sample_user("prune@example.com");
    db.create_user(&user).await.unwrap();

    // Ages 5..1 hours; suffix 5 is oldest
    for (suffix, age) in [(1_u32, 1_i64), (2, 2), (3, 3), (4, 4), (5, 5)] {
        db.insert_session_token(&sample_token(user.id, suffix, age))
            .await
            .unwrap();
    }
    assert_eq!(db.count_session_tokens(user.id).await.unwrap(), 5);

    let pruned = db.prune_session_tokens(user.id, 4).await.unwrap();
    assert_eq!(pruned, 1);
    assert_eq!(db.count_session_tokens(user.id).await.unwrap(), 4);

    // The oldest token is the one that went
    assert!(db
        .get_session_token("tut_00000005", &format!("{:064}", 5))
        .await
        .unwrap()
        .is_none());
    assert!(db
        .get_session_token("tut_00000001", &format!("{:064}", 1))
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_delete_user_tokens_is_scoped() {
    let dir = TempDir::new().unwrap();
    let db = test_db(&dir).await;

    let alice = sample_user("alice@example.com");
    let bob = sample_user("bob@example.com");
    db.create_user(&alice).await.unwrap();
    db.create_user(&bob).await.unwrap();

    db.insert_session_token(&sample_token(alice.id, 1, 0)).await.unwrap();
    db.insert_session_token(&sample_token(alice.id, 2, 0)).await.unwrap();
    db.insert_session_token(&sample_token(bob.id, 3, 0)).await.unwrap();

    assert_eq!(db.delete_user_session_tokens(alice.id).await.unwrap(), 2);
    assert_eq!(db.count_session_tokens(alice.id).await.unwrap(), 0);
    assert_eq!(db.count_session_tokens(bob.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_lesson_and_question_round_trip() {
    let dir = TempDir::new().unwrap();
    let db = test_db(&dir).await;

    let user = sample_user("qa@example.com");
    db.create_user(&user).await.unwrap();

    let lesson = Lesson::new("Borrowing".into(), "References let you use a value without taking ownership of it.".into());
    db.create_lesson(&lesson).await.unwrap();

    assert!(db.get_lesson(&lesson.id).await.unwrap().is_some());
    assert!(db.get_lesson_by_title("Borrowing").await.unwrap().is_some());
    assert!(db.create_lesson(&Lesson::new("Borrowing".into(), "dup".into())).await.is_err());

    let question = Question::new(lesson.id.clone(), user.id, "Why borrow?".into(), "To avoid moves.".into());
    db.create_question(&question).await.unwrap();

    let listed = db.list_questions(&lesson.id, 5).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].answer, "To avoid moves.");

    let searched = db.list_lessons(Some("Borrow"), 10, 0).await.unwrap();
    assert_eq!(searched.len(), 1);
    let missed = db.list_lessons(Some("zzz"), 10, 0).await.unwrap();
    assert!(missed.is_empty());
}
