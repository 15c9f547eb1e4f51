//! End-to-end action tests against a real database.
//!
//! `#[sqlx::test]` creates a fresh database per test from `DATABASE_URL`
//! and applies the migrations.

mod common;

use agora_core::groups::{ROLE_ADMIN, ROLE_MEMBER};
use agora_core::lock::LockState;
use agora_db::models::board::{Board, CreateBoard};
use agora_db::models::member::{CreateMember, Member};
use agora_db::models::topic::{CreateTopic, Topic};
use agora_db::repositories::{
    AttachmentRepo, BoardRepo, MailQueueRepo, MemberRepo, ModerationLogRepo, NotifyRepo,
    PermissionRepo, SettingsRepo, TopicRepo,
};
use axum::http::StatusCode;
use common::{
    body_json, body_text, build_test_app, get_auth, location, login, post_form, BASE_URL,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn member(pool: &PgPool, name: &str) -> Member {
    MemberRepo::create(
        pool,
        &CreateMember {
            member_name: name.to_string(),
            email: format!("{name}@example.com"),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

async fn board(pool: &PgPool) -> Board {
    let cat = BoardRepo::create_category(pool, "General").await.unwrap();
    BoardRepo::create(
        pool,
        &CreateBoard {
            id_cat: cat,
            id_parent: None,
            id_profile: None,
            name: "Chat".to_string(),
        },
    )
    .await
    .unwrap()
}

async fn topic(pool: &PgPool, board_id: i64, starter: i64) -> Topic {
    TopicRepo::create(
        pool,
        &CreateTopic {
            id_board: board_id,
            id_member: starter,
            subject: "Hello".to_string(),
            body: "First post".to_string(),
            approved: None,
        },
    )
    .await
    .unwrap()
}

async fn readers(pool: &PgPool, count: usize) {
    for i in 0..count {
        member(pool, &format!("reader{i}")).await;
    }
}

async fn mod_log_actions(pool: &PgPool, topic_id: i64) -> Vec<String> {
    ModerationLogRepo::for_topic(pool, topic_id)
        .await
        .unwrap()
        .into_iter()
        .map(|entry| entry.action)
        .collect()
}

async fn lock_state(pool: &PgPool, topic_id: i64) -> LockState {
    TopicRepo::find_by_id(pool, topic_id)
        .await
        .unwrap()
        .unwrap()
        .lock_state()
        .unwrap()
}

// ---------------------------------------------------------------------------
// Lock
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn starter_locks_and_unlocks_own_topic(pool: PgPool) {
    let owner = member(&pool, "owner").await;
    let b = board(&pool).await;
    let t = topic(&pool, b.id, owner.id).await;
    let (token, sesc) = login(owner.id, ROLE_MEMBER);
    let uri = format!("/index.php?action=lock;topic={}.0;sesc={sesc}", t.id);

    let (app, _) = build_test_app(pool.clone());
    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), format!("{BASE_URL}?topic={}.0", t.id));
    assert_eq!(lock_state(&pool, t.id).await, LockState::OwnerLocked);

    let (app, _) = build_test_app(pool.clone());
    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(lock_state(&pool, t.id).await, LockState::Unlocked);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn starter_cannot_lift_a_moderator_lock(pool: PgPool) {
    let owner = member(&pool, "owner").await;
    let moderator = member(&pool, "moderator").await;
    let b = board(&pool).await;
    PermissionRepo::add_moderator(&pool, b.id, moderator.id).await.unwrap();
    let t = topic(&pool, b.id, owner.id).await;

    let (token, sesc) = login(moderator.id, ROLE_MEMBER);
    let (app, _) = build_test_app(pool.clone());
    let uri = format!("/index.php?action=lock;topic={}.0;sesc={sesc}", t.id);
    assert_eq!(get_auth(app, &uri, &token).await.status(), StatusCode::FOUND);
    assert_eq!(lock_state(&pool, t.id).await, LockState::ModLocked);

    let (token, sesc) = login(owner.id, ROLE_MEMBER);
    let (app, _) = build_test_app(pool.clone());
    let uri = format!("/index.php?action=lock;topic={}.0;sesc={sesc}", t.id);
    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(lock_state(&pool, t.id).await, LockState::ModLocked);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn other_members_cannot_lock(pool: PgPool) {
    let owner = member(&pool, "owner").await;
    let stranger = member(&pool, "stranger").await;
    let b = board(&pool).await;
    let t = topic(&pool, b.id, owner.id).await;

    let (token, sesc) = login(stranger.id, ROLE_MEMBER);
    let (app, _) = build_test_app(pool.clone());
    let uri = format!("/index.php?action=lock;topic={}.0;sesc={sesc}", t.id);
    let response = get_auth(app, &uri, &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(lock_state(&pool, t.id).await, LockState::Unlocked);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn xml_clients_get_redirect_document(pool: PgPool) {
    let admin = member(&pool, "admin").await;
    let b = board(&pool).await;
    let t = topic(&pool, b.id, admin.id).await;

    let (token, sesc) = login(admin.id, ROLE_ADMIN);
    let (app, _) = build_test_app(pool.clone());
    let uri = format!("/index.php?action=sticky;topic={}.0;sesc={sesc};xml", t.id);
    let response = get_auth(app, &uri, &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains(&format!("<redirect url=\"{BASE_URL}?topic={}.0\"/>", t.id)));
    assert!(TopicRepo::find_by_id(&pool, t.id).await.unwrap().unwrap().is_sticky);
}

// ---------------------------------------------------------------------------
// Karma
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn karma_is_refused_while_disabled(pool: PgPool) {
    let voter = member(&pool, "voter").await;
    let target = member(&pool, "target").await;

    let (token, sesc) = login(voter.id, ROLE_MEMBER);
    let (app, _) = build_test_app(pool.clone());
    let uri = format!("/index.php?action=karma;sa=applaud;uid={};sesc={sesc}", target.id);
    let response = get_auth(app, &uri, &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FEATURE_DISABLED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn karma_repeat_waits_but_reversal_moves_the_point(pool: PgPool) {
    SettingsRepo::set(&pool, "karma_mode", "1").await.unwrap();
    let voter = member(&pool, "voter").await;
    let target = member(&pool, "target").await;
    let (token, sesc) = login(voter.id, ROLE_MEMBER);
    let karma_uri = |sa: &str| {
        format!(
            "/index.php?action=karma;sa={sa};uid={};sesc={sesc};xml",
            target.id
        )
    };

    let (app, _) = build_test_app(pool.clone());
    let response = get_auth(app, &karma_uri("applaud"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains(&format!("<karma id=\"{}\" good=\"1\" bad=\"0\"/>", target.id)));

    let (app, _) = build_test_app(pool.clone());
    let response = get_auth(app, &karma_uri("applaud"), &token).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let (app, _) = build_test_app(pool.clone());
    let response = get_auth(app, &karma_uri("smite"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("good=\"0\" bad=\"1\""));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn karma_on_yourself_is_rejected(pool: PgPool) {
    SettingsRepo::set(&pool, "karma_mode", "1").await.unwrap();
    let voter = member(&pool, "voter").await;
    let (token, sesc) = login(voter.id, ROLE_MEMBER);

    let (app, _) = build_test_app(pool.clone());
    let uri = format!("/index.php?action=karma;sa=applaud;uid={};sesc={sesc}", voter.id);
    let response = get_auth(app, &uri, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Buddies and read marks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn buddy_toggle_adds_then_removes(pool: PgPool) {
    let me = member(&pool, "me").await;
    let friend = member(&pool, "friend").await;
    let (token, sesc) = login(me.id, ROLE_MEMBER);
    let uri = format!("/index.php?action=buddy;u={};sesc={sesc}", friend.id);

    let (app, _) = build_test_app(pool.clone());
    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        location(&response),
        format!("{BASE_URL}?action=profile;u={}", friend.id)
    );
    let reloaded = MemberRepo::find_by_id(&pool, me.id).await.unwrap().unwrap();
    assert_eq!(reloaded.buddy_list, vec![friend.id]);

    let (app, _) = build_test_app(pool.clone());
    get_auth(app, &uri, &token).await;
    let reloaded = MemberRepo::find_by_id(&pool, me.id).await.unwrap().unwrap();
    assert!(reloaded.buddy_list.is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn board_index_shows_unread_until_marked(pool: PgPool) {
    let me = member(&pool, "reader").await;
    let b = board(&pool).await;
    topic(&pool, b.id, me.id).await;
    let (token, sesc) = login(me.id, ROLE_MEMBER);

    let (app, _) = build_test_app(pool.clone());
    let json = body_json(get_auth(app, "/index.php", &token).await).await;
    assert_eq!(json["template"], "board_index");
    assert_eq!(json["context"]["boards"][0]["unread"], true);

    let (app, _) = build_test_app(pool.clone());
    let uri = format!("/index.php?action=markasread;sa=all;sesc={sesc}");
    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), BASE_URL);

    let (app, _) = build_test_app(pool.clone());
    let json = body_json(get_auth(app, "/index.php", &token).await).await;
    assert_eq!(json["context"]["boards"][0]["unread"], false);
}

// ---------------------------------------------------------------------------
// Sticky
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn moderator_toggles_sticky_and_watchers_hear_about_it(pool: PgPool) {
    let starter = member(&pool, "starter").await;
    let moderator = member(&pool, "moderator").await;
    let watcher = member(&pool, "watcher").await;
    let b = board(&pool).await;
    PermissionRepo::add_moderator(&pool, b.id, moderator.id).await.unwrap();
    let t = topic(&pool, b.id, starter.id).await;
    NotifyRepo::subscribe_topic(&pool, watcher.id, t.id).await.unwrap();

    let (token, sesc) = login(moderator.id, ROLE_MEMBER);
    let uri = format!("/index.php?action=sticky;topic={}.0;sesc={sesc}", t.id);

    let (app, transport) = build_test_app(pool.clone());
    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), format!("{BASE_URL}?topic={}.0", t.id));
    assert!(TopicRepo::find_by_id(&pool, t.id).await.unwrap().unwrap().is_sticky);
    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "watcher@example.com");

    let (app, transport) = build_test_app(pool.clone());
    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(!TopicRepo::find_by_id(&pool, t.id).await.unwrap().unwrap().is_sticky);
    assert!(transport.sent().is_empty());

    assert_eq!(mod_log_actions(&pool, t.id).await, vec!["unsticky", "sticky"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn regular_members_cannot_make_topics_sticky(pool: PgPool) {
    let starter = member(&pool, "starter").await;
    let b = board(&pool).await;
    let t = topic(&pool, b.id, starter.id).await;

    let (token, sesc) = login(starter.id, ROLE_MEMBER);
    let (app, _) = build_test_app(pool.clone());
    let uri = format!("/index.php?action=sticky;topic={}.0;sesc={sesc}", t.id);
    let response = get_auth(app, &uri, &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");
    assert!(!TopicRepo::find_by_id(&pool, t.id).await.unwrap().unwrap().is_sticky);
    assert!(mod_log_actions(&pool, t.id).await.is_empty());
}

// ---------------------------------------------------------------------------
// Remove
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn removal_moves_topic_to_the_recycle_board(pool: PgPool) {
    let owner = member(&pool, "owner").await;
    let b = board(&pool).await;
    let recycle = board(&pool).await;
    SettingsRepo::set(&pool, "recycle_enable", "1").await.unwrap();
    SettingsRepo::set(&pool, "recycle_board", &recycle.id.to_string())
        .await
        .unwrap();
    let t = topic(&pool, b.id, owner.id).await;

    let (token, sesc) = login(owner.id, ROLE_MEMBER);
    let (app, _) = build_test_app(pool.clone());
    let uri = format!(
        "/index.php?action=removetopic;topic={}.0;board={}.0;sesc={sesc}",
        t.id, b.id
    );
    let response = get_auth(app, &uri, &token).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), format!("{BASE_URL}?board={}.0", b.id));
    let moved = TopicRepo::find_by_id(&pool, t.id).await.unwrap().unwrap();
    assert_eq!(moved.id_board, recycle.id);
    assert_eq!(moved.id_previous_board, Some(b.id));

    let log = ModerationLogRepo::for_topic(&pool, t.id).await.unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].action, "remove");
    assert_eq!(log[0].extra["recycled_to"], recycle.id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn removal_without_recycling_deletes_and_notifies_board_watchers(pool: PgPool) {
    let owner = member(&pool, "owner").await;
    let watcher = member(&pool, "watcher").await;
    let b = board(&pool).await;
    NotifyRepo::subscribe_board(&pool, watcher.id, b.id).await.unwrap();
    let t = topic(&pool, b.id, owner.id).await;

    let (token, sesc) = login(owner.id, ROLE_MEMBER);
    let (app, transport) = build_test_app(pool.clone());
    let uri = format!("/index.php?action=removetopic;topic={}.0;sesc={sesc}", t.id);
    let response = get_auth(app, &uri, &token).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), format!("{BASE_URL}?board={}.0", b.id));
    assert!(TopicRepo::find_by_id(&pool, t.id).await.unwrap().is_none());
    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "watcher@example.com");
    assert_eq!(mod_log_actions(&pool, t.id).await, vec!["remove"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn removal_conflicts_when_topic_is_on_another_board(pool: PgPool) {
    let owner = member(&pool, "owner").await;
    let b = board(&pool).await;
    let elsewhere = board(&pool).await;
    let t = topic(&pool, b.id, owner.id).await;

    let (token, sesc) = login(owner.id, ROLE_MEMBER);
    let (app, _) = build_test_app(pool.clone());
    let uri = format!(
        "/index.php?action=removetopic;topic={}.0;board={}.0;sesc={sesc}",
        t.id, elsewhere.id
    );
    let response = get_auth(app, &uri, &token).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
    let kept = TopicRepo::find_by_id(&pool, t.id).await.unwrap().unwrap();
    assert_eq!(kept.id_board, b.id);
    assert!(mod_log_actions(&pool, t.id).await.is_empty());
}

// ---------------------------------------------------------------------------
// Announcements
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn announcement_walks_members_a_page_at_a_time(pool: PgPool) {
    let admin = member(&pool, "admin").await;
    readers(&pool, 29).await;
    let b = board(&pool).await;
    let t = topic(&pool, b.id, admin.id).await;
    let latest = SettingsRepo::load(&pool).await.unwrap().latest_member;
    let first_page = MemberRepo::announce_recipients(&pool, &[0], 0, 25).await.unwrap();

    let (token, sesc) = login(admin.id, ROLE_ADMIN);
    let uri = format!("/index.php?action=announce;sa=send;topic={}.0;sesc={sesc}", t.id);

    let (app, transport) = build_test_app(pool.clone());
    let response = post_form(app, &uri, Some(&token), "who[]=0&start=0").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["template"], "announce_send");
    assert_eq!(transport.sent().len(), 25);
    let start = json["context"]["progress"]["start"].as_i64().unwrap();
    assert_eq!(Some(start), first_page.last().map(|r| r.id));

    let (app, transport) = build_test_app(pool.clone());
    let form = format!("who[]=0&start={start}");
    let json = body_json(post_form(app, &uri, Some(&token), &form).await).await;
    assert_eq!(transport.sent().len(), 5);
    assert_eq!(json["context"]["progress"]["start"], latest);
    assert_eq!(json["context"]["progress"]["percentage"], 100.0);

    let (app, transport) = build_test_app(pool.clone());
    let form = format!("who[]=0&start={latest}");
    let response = post_form(app, &uri, Some(&token), &form).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), format!("{BASE_URL}?topic={}.0", t.id));
    assert!(transport.sent().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn queued_announcement_takes_larger_pages(pool: PgPool) {
    SettingsRepo::set(&pool, "mail_queue", "1").await.unwrap();
    let admin = member(&pool, "admin").await;
    readers(&pool, 29).await;
    let b = board(&pool).await;
    let t = topic(&pool, b.id, admin.id).await;
    let latest = SettingsRepo::load(&pool).await.unwrap().latest_member;

    let (token, sesc) = login(admin.id, ROLE_ADMIN);
    let (app, transport) = build_test_app(pool.clone());
    let uri = format!("/index.php?action=announce;sa=send;topic={}.0;sesc={sesc}", t.id);
    let response = post_form(app, &uri, Some(&token), "who[]=0&start=0").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["context"]["progress"]["start"], latest);
    assert!(transport.sent().is_empty());
    assert_eq!(MailQueueRepo::count(&pool).await.unwrap(), 30);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn announcement_needs_at_least_one_group(pool: PgPool) {
    let admin = member(&pool, "admin").await;
    let b = board(&pool).await;
    let t = topic(&pool, b.id, admin.id).await;

    let (token, sesc) = login(admin.id, ROLE_ADMIN);
    let (app, transport) = build_test_app(pool.clone());
    let uri = format!("/index.php?action=announce;sa=send;topic={}.0;sesc={sesc}", t.id);
    let response = post_form(app, &uri, Some(&token), "start=0").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    assert!(transport.sent().is_empty());
}

// ---------------------------------------------------------------------------
// Attachment approval
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn moderator_approves_one_attachment_and_rejects_another(pool: PgPool) {
    let poster = member(&pool, "poster").await;
    let moderator = member(&pool, "moderator").await;
    let b = board(&pool).await;
    PermissionRepo::add_moderator(&pool, b.id, moderator.id).await.unwrap();
    let t = topic(&pool, b.id, poster.id).await;
    let msg = t.id_first_msg;
    let keep = AttachmentRepo::create(&pool, msg, "keep.png", false).await.unwrap();
    let rejected = AttachmentRepo::create(&pool, msg, "drop.png", false).await.unwrap();

    let (token, sesc) = login(moderator.id, ROLE_MEMBER);
    let (app, _) = build_test_app(pool.clone());
    let uri = format!("/index.php?action=attachapprove;sa=approve;aid={keep};sesc={sesc}");
    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        location(&response),
        format!("{BASE_URL}?topic={}.msg{msg}#msg{msg}", t.id)
    );
    assert!(AttachmentRepo::find_context(&pool, keep).await.unwrap().unwrap().approved);

    let (app, _) = build_test_app(pool.clone());
    let uri = format!("/index.php?action=attachapprove;sa=reject;aid={rejected};sesc={sesc}");
    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(AttachmentRepo::find_context(&pool, rejected).await.unwrap().is_none());

    let log = ModerationLogRepo::for_topic(&pool, t.id).await.unwrap();
    let actions: Vec<&str> = log.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(actions, vec!["remove_attach", "approve_attach"]);
    assert!(log.iter().all(|e| e.id_msg == msg));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn approve_all_covers_every_attachment_of_the_message(pool: PgPool) {
    let poster = member(&pool, "poster").await;
    let admin = member(&pool, "admin").await;
    let b = board(&pool).await;
    let t = topic(&pool, b.id, poster.id).await;
    let msg = t.id_first_msg;
    AttachmentRepo::create(&pool, msg, "a.png", false).await.unwrap();
    AttachmentRepo::create(&pool, msg, "b.png", false).await.unwrap();

    let (token, sesc) = login(admin.id, ROLE_ADMIN);
    let (app, _) = build_test_app(pool.clone());
    let uri = format!("/index.php?action=attachapprove;sa=all;mid={msg};sesc={sesc}");
    let response = get_auth(app, &uri, &token).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    let attachments = AttachmentRepo::for_message(&pool, msg).await.unwrap();
    assert_eq!(attachments.len(), 2);
    assert!(attachments.iter().all(|a| a.approved));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn attachment_approval_needs_approve_posts(pool: PgPool) {
    let poster = member(&pool, "poster").await;
    let b = board(&pool).await;
    let t = topic(&pool, b.id, poster.id).await;
    let pending = AttachmentRepo::create(&pool, t.id_first_msg, "x.png", false)
        .await
        .unwrap();

    let (token, sesc) = login(poster.id, ROLE_MEMBER);
    let (app, _) = build_test_app(pool.clone());
    let uri = format!("/index.php?action=attachapprove;sa=approve;aid={pending};sesc={sesc}");
    let response = get_auth(app, &uri, &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(!AttachmentRepo::find_context(&pool, pending).await.unwrap().unwrap().approved);
}
