//! Postgres integration tests for the world-state store.
//!
//! These run against a disposable database: set `TEST_DATABASE_URL` (or
//! `DATABASE_URL`) to point at it. When neither is set every test skips.
//! Tests create their own uniquely-named rows so they can run in parallel
//! against a shared database without a reset step.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use noverna_core::{
    Account, Character, CharacterGender, CurrencyType, IdentifierType, InventoryOwner,
    InventoryType, PhoneCallStatus, VehicleOwner, WhitelistStatus,
};
use noverna_store::queries::economy::{LedgerParty, Posting};
use noverna_store::queries::{
    accounts, audit, businesses, characters, configs, economy, inventory, jobs, phone, rbac,
    sessions, vehicles,
};
use noverna_store::{fetch_related, fetch_related_one, run_migrations, Error as StoreError};

async fn test_pool() -> Result<Option<PgPool>> {
    // One subscriber per process; later calls fail harmlessly.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let Ok(url) = env::var("TEST_DATABASE_URL").or_else(|_| env::var("DATABASE_URL")) else {
        eprintln!("skipping: set TEST_DATABASE_URL or DATABASE_URL to run Postgres tests");
        return Ok(None);
    };
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&url)
        .await
        .context("connecting to Postgres")?;
    run_migrations(&pool).await.context("applying migrations")?;
    Ok(Some(pool))
}

fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

async fn new_account(pool: &PgPool) -> Result<Account> {
    let email = format!("{}@noverna.test", unique("acct"));
    let account = accounts::create_account(
        pool,
        Some(&unique("user")),
        Some("Test Account"),
        Some(&email),
    )
    .await?;
    Ok(account)
}

async fn new_character(pool: &PgPool, account_id: Uuid) -> Result<Character> {
    let character = characters::create_character(
        pool,
        account_id,
        &unique("cid"),
        "Avery",
        "Stone",
        CharacterGender::Other,
        Some("1990-04-12"),
    )
    .await?;
    Ok(character)
}

#[tokio::test]
async fn account_identifier_flow() -> Result<()> {
    let Some(pool) = test_pool().await? else { return Ok(()) };

    let account = new_account(&pool).await?;
    let value = unique("license");

    let first = accounts::record_identifier(&pool, account.id, IdentifierType::License, &value).await?;
    let second = accounts::record_identifier(&pool, account.id, IdentifierType::License, &value).await?;
    assert_eq!(first.id, second.id);
    assert!(second.last_seen_at >= first.last_seen_at);

    let resolved = accounts::fetch_account_by_identifier(&pool, IdentifierType::License, &value)
        .await?
        .context("identifier should resolve")?;
    assert_eq!(resolved.id, account.id);

    // The same identifier cannot be rebound to another account.
    let other = new_account(&pool).await?;
    let err = accounts::record_identifier(&pool, other.id, IdentifierType::License, &value)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Constraint { .. }), "got {err:?}");

    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_a_constraint_conflict() -> Result<()> {
    let Some(pool) = test_pool().await? else { return Ok(()) };

    let email = format!("{}@noverna.test", unique("dup"));
    accounts::create_account(&pool, None, None, Some(&email)).await?;
    let err = accounts::create_account(&pool, None, None, Some(&email))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Constraint { .. }), "got {err:?}");

    Ok(())
}

#[tokio::test]
async fn soft_deleted_character_keeps_its_cid() -> Result<()> {
    let Some(pool) = test_pool().await? else { return Ok(()) };

    let account = new_account(&pool).await?;
    let character = new_character(&pool, account.id).await?;

    assert!(characters::soft_delete_character(&pool, character.id).await?);
    assert!(characters::fetch_active_character(&pool, character.id).await?.is_none());
    assert!(
        characters::fetch_active_character_by_cid(&pool, &character.cid)
            .await?
            .is_none()
    );

    // The cid stays reserved by the deleted row.
    let err = characters::create_character(
        &pool,
        account.id,
        &character.cid,
        "New",
        "Holder",
        CharacterGender::Female,
        None,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, StoreError::Constraint { .. }), "got {err:?}");

    Ok(())
}

#[tokio::test]
async fn account_delete_cascades_to_dependents() -> Result<()> {
    let Some(pool) = test_pool().await? else { return Ok(()) };

    let account = new_account(&pool).await?;
    let character = new_character(&pool, account.id).await?;
    accounts::record_identifier(&pool, account.id, IdentifierType::Discord, &unique("disc")).await?;
    let session = sessions::open_session(&pool, account.id, Some("203.0.113.7"), &json!({})).await?;

    assert!(accounts::delete_account(&pool, account.id).await?);

    let remaining: i64 =
        sqlx::query_scalar("select count(*) from characters where id = $1")
            .bind(character.id)
            .fetch_one(&pool)
            .await?;
    assert_eq!(remaining, 0);

    let identifiers: i64 =
        sqlx::query_scalar("select count(*) from account_identifiers where account_id = $1")
            .bind(account.id)
            .fetch_one(&pool)
            .await?;
    assert_eq!(identifiers, 0);

    let sessions_left: i64 =
        sqlx::query_scalar("select count(*) from play_sessions where id = $1")
            .bind(session.id)
            .fetch_one(&pool)
            .await?;
    assert_eq!(sessions_left, 0);

    Ok(())
}

#[tokio::test]
async fn vehicles_and_bans_survive_account_delete() -> Result<()> {
    let Some(pool) = test_pool().await? else { return Ok(()) };

    let account = new_account(&pool).await?;
    let plate = unique("PLT");
    let vehicle = vehicles::register_vehicle(
        &pool,
        &plate,
        "sultan",
        VehicleOwner::Account(account.id),
        None,
    )
    .await?;
    let ban = accounts::issue_account_ban(&pool, account.id, None, Some("test"), None).await?;

    assert!(accounts::delete_account(&pool, account.id).await?);

    let vehicle = vehicles::fetch_vehicle_by_plate(&pool, &plate)
        .await?
        .context("vehicle should survive its owner")?;
    assert!(vehicle.owner()?.is_none());

    let (account_id,): (Option<Uuid>,) =
        sqlx::query_as("select account_id from bans where id = $1")
            .bind(ban.id)
            .fetch_one(&pool)
            .await?;
    assert!(account_id.is_none(), "ban should survive with its reference cleared");

    Ok(())
}

#[tokio::test]
async fn job_with_employees_cannot_be_deleted() -> Result<()> {
    let Some(pool) = test_pool().await? else { return Ok(()) };

    let account = new_account(&pool).await?;
    let character = new_character(&pool, account.id).await?;
    let job = jobs::create_job(&pool, &unique("job"), "Test Job", false).await?;
    let grade = jobs::create_job_grade(&pool, job.id, "rookie", "Rookie", 0, 500).await?;
    jobs::assign_job(&pool, character.id, job.id, grade.id, true).await?;

    let err = sqlx::query("delete from jobs where id = $1")
        .bind(job.id)
        .execute(&pool)
        .await
        .unwrap_err();
    let err = StoreError::from(err);
    assert!(matches!(err, StoreError::Constraint { .. }), "got {err:?}");

    assert!(jobs::remove_job(&pool, character.id, job.id).await?);
    sqlx::query("delete from jobs where id = $1")
        .bind(job.id)
        .execute(&pool)
        .await?;

    Ok(())
}

#[tokio::test]
async fn job_grade_must_belong_to_the_job() -> Result<()> {
    let Some(pool) = test_pool().await? else { return Ok(()) };

    let account = new_account(&pool).await?;
    let character = new_character(&pool, account.id).await?;
    let police = jobs::create_job(&pool, &unique("police"), "Police", true).await?;
    let medic = jobs::create_job(&pool, &unique("medic"), "Medic", true).await?;
    let medic_grade = jobs::create_job_grade(&pool, medic.id, "intern", "Intern", 0, 400).await?;

    let err = jobs::assign_job(&pool, character.id, police.id, medic_grade.id, true)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Invalid(_)), "got {err:?}");

    // The composite foreign key catches writers that bypass the facade.
    let err = sqlx::query(
        "insert into character_jobs (character_id, job_id, job_grade_id) values ($1, $2, $3)",
    )
    .bind(character.id)
    .bind(police.id)
    .bind(medic_grade.id)
    .execute(&pool)
    .await
    .unwrap_err();
    let err = StoreError::from(err);
    assert!(matches!(err, StoreError::Constraint { .. }), "got {err:?}");

    Ok(())
}

#[tokio::test]
async fn business_role_must_belong_to_the_business() -> Result<()> {
    let Some(pool) = test_pool().await? else { return Ok(()) };

    let account = new_account(&pool).await?;
    let shop = businesses::create_business(&pool, &unique("shop"), "Shop").await?;
    let garage = businesses::create_business(&pool, &unique("garage"), "Garage").await?;
    let garage_role =
        businesses::create_business_role(&pool, garage.id, "mechanic", "Mechanic", 1, &json!([]))
            .await?;

    let err = businesses::hire_member(&pool, shop.id, account.id, garage_role.id, false)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Invalid(_)), "got {err:?}");

    Ok(())
}

#[tokio::test]
async fn ledger_transfer_updates_caches_and_is_append_only() -> Result<()> {
    let Some(pool) = test_pool().await? else { return Ok(()) };

    let account = new_account(&pool).await?;
    let alice = new_character(&pool, account.id).await?;
    let bob = new_character(&pool, account.id).await?;

    // Seed alice with cash from nowhere (a mint posting), then transfer.
    economy::post_entry(
        &pool,
        Posting {
            currency: CurrencyType::Cash,
            amount: 1_000,
            reason: Some("starting funds".into()),
            actor_account_id: None,
            source: None,
            target: Some(LedgerParty::Character(alice.id)),
            meta: json!({}),
        },
    )
    .await?;
    let entry = economy::post_entry(
        &pool,
        Posting {
            currency: CurrencyType::Cash,
            amount: 250,
            reason: Some("street deal".into()),
            actor_account_id: Some(account.id),
            source: Some(LedgerParty::Character(alice.id)),
            target: Some(LedgerParty::Character(bob.id)),
            meta: json!({}),
        },
    )
    .await?;

    let alice_row = characters::fetch_active_character(&pool, alice.id)
        .await?
        .context("alice")?;
    let bob_row = characters::fetch_active_character(&pool, bob.id)
        .await?
        .context("bob")?;
    assert_eq!(alice_row.cash, 750);
    assert_eq!(bob_row.cash, 250);

    // The caches agree with the balances derived from the ledger alone.
    assert_eq!(economy::derived_balance(&pool, alice.id, CurrencyType::Cash).await?, 750);
    assert_eq!(economy::derived_balance(&pool, bob.id, CurrencyType::Cash).await?, 250);
    assert_eq!(economy::derived_balance(&pool, alice.id, CurrencyType::Bank).await?, 0);

    let recent = economy::recent_entries_for_character(&pool, alice.id, 10).await?;
    assert_eq!(recent.len(), 2);

    // Rows never leave the ledger, and never change once written.
    let delete = sqlx::query("delete from economy_ledger where id = $1")
        .bind(entry.id)
        .execute(&pool)
        .await;
    assert!(delete.is_err(), "ledger deletes must be rejected");

    let update = sqlx::query("update economy_ledger set amount = amount + 1 where id = $1")
        .bind(entry.id)
        .execute(&pool)
        .await;
    assert!(update.is_err(), "ledger rewrites must be rejected");

    Ok(())
}

#[tokio::test]
async fn ledger_reference_clearing_passes_the_append_only_guard() -> Result<()> {
    let Some(pool) = test_pool().await? else { return Ok(()) };

    let account = new_account(&pool).await?;
    let character = new_character(&pool, account.id).await?;
    let entry = economy::post_entry(
        &pool,
        Posting {
            currency: CurrencyType::Bank,
            amount: 500,
            reason: Some("paycheck".into()),
            actor_account_id: Some(account.id),
            source: None,
            target: Some(LedgerParty::Character(character.id)),
            meta: json!({}),
        },
    )
    .await?;

    // Deleting the account clears the ledger references via set-null; the
    // guard must let those updates through while the row itself is intact.
    assert!(accounts::delete_account(&pool, account.id).await?);

    let (actor, target, amount): (Option<Uuid>, Option<Uuid>, i64) = sqlx::query_as(
        "select actor_account_id, target_character_id, amount from economy_ledger where id = $1",
    )
    .bind(entry.id)
    .fetch_one(&pool)
    .await?;
    assert!(actor.is_none());
    assert!(target.is_none());
    assert_eq!(amount, 500);

    Ok(())
}

#[tokio::test]
async fn audit_trail_is_append_only() -> Result<()> {
    let Some(pool) = test_pool().await? else { return Ok(()) };

    let account = new_account(&pool).await?;
    let target_id = account.id.to_string();
    let log = audit::record_audit(
        &pool,
        Some(account.id),
        "ban.create",
        Some("account"),
        Some(&target_id),
        &json!({"reason": "test"}),
    )
    .await?;

    let trail = audit::audit_trail_for_target(&pool, "account", &target_id, 10).await?;
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].id, log.id);

    let delete = sqlx::query("delete from audit_logs where id = $1")
        .bind(log.id)
        .execute(&pool)
        .await;
    assert!(delete.is_err(), "audit deletes must be rejected");

    let update = sqlx::query("update audit_logs set action = 'tampered' where id = $1")
        .bind(log.id)
        .execute(&pool)
        .await;
    assert!(update.is_err(), "audit rewrites must be rejected");

    Ok(())
}

#[tokio::test]
async fn one_open_session_per_account() -> Result<()> {
    let Some(pool) = test_pool().await? else { return Ok(()) };

    let account = new_account(&pool).await?;
    let first = sessions::open_session(&pool, account.id, None, &json!({})).await?;

    // A raw second open session trips the partial unique index.
    let err = sqlx::query("insert into play_sessions (account_id) values ($1)")
        .bind(account.id)
        .execute(&pool)
        .await
        .unwrap_err();
    let err = StoreError::from(err);
    assert!(matches!(err, StoreError::Constraint { .. }), "got {err:?}");

    // The facade supersedes the stale session instead.
    let second = sessions::open_session(&pool, account.id, None, &json!({})).await?;
    assert_ne!(first.id, second.id);

    let open = sessions::open_session_for(&pool, account.id)
        .await?
        .context("one session should be open")?;
    assert_eq!(open.id, second.id);

    let history = sessions::session_history(&pool, account.id, 10).await?;
    assert_eq!(history.len(), 2);
    let superseded = history
        .iter()
        .find(|s| s.id == first.id)
        .context("superseded session in history")?;
    assert_eq!(superseded.ended_reason.as_deref(), Some("superseded"));

    assert!(sessions::heartbeat(&pool, second.id).await?);
    let closed = sessions::close_session(&pool, second.id, Some("quit"))
        .await?
        .context("session should close")?;
    assert!(closed.ended_at.is_some());
    assert!(!sessions::heartbeat(&pool, second.id).await?);

    Ok(())
}

#[tokio::test]
async fn phone_messages_flow_between_lines() -> Result<()> {
    let Some(pool) = test_pool().await? else { return Ok(()) };

    let account = new_account(&pool).await?;
    let alice = new_character(&pool, account.id).await?;
    let bob = new_character(&pool, account.id).await?;
    let alice_line = phone::claim_number(&pool, &unique("555"), alice.id, true).await?;
    let bob_line = phone::claim_number(&pool, &unique("555"), bob.id, true).await?;

    phone::upsert_contact(&pool, alice_line.id, "Bob", &bob_line.number).await?;
    phone::upsert_contact(&pool, alice_line.id, "Bobby", &bob_line.number).await?;
    let (name,): (String,) = sqlx::query_as(
        "select name from phone_contacts where owner_number_id = $1 and number = $2",
    )
    .bind(alice_line.id)
    .bind(&bob_line.number)
    .fetch_one(&pool)
    .await?;
    assert_eq!(name, "Bobby");

    phone::send_message(&pool, alice_line.id, bob_line.id, "you up?", &json!({})).await?;
    phone::send_message(&pool, bob_line.id, alice_line.id, "yeah", &json!({})).await?;

    let convo = phone::conversation(&pool, alice_line.id, bob_line.id, 50).await?;
    assert_eq!(convo.len(), 2);
    assert_eq!(convo[0].content, "you up?");
    assert_eq!(convo[1].content, "yeah");

    let marked = phone::mark_conversation_read(&pool, alice_line.id, bob_line.id).await?;
    assert_eq!(marked, 1);

    let call = phone::record_call(
        &pool,
        alice_line.id,
        bob_line.id,
        PhoneCallStatus::Completed,
        42,
        &json!({}),
    )
    .await?;
    assert!(call.ended_at.is_some());
    assert_eq!(call.duration_sec, 42);

    Ok(())
}

#[tokio::test]
async fn inventory_slots_are_exclusive() -> Result<()> {
    let Some(pool) = test_pool().await? else { return Ok(()) };

    let account = new_account(&pool).await?;
    let character = new_character(&pool, account.id).await?;
    let owner = InventoryOwner::Character(character.id);
    let inv = inventory::create_inventory(&pool, owner, InventoryType::Player, 40, 50_000).await?;

    let found = inventory::fetch_inventory_for_owner(&pool, owner, InventoryType::Player)
        .await?
        .context("inventory should be findable by owner")?;
    assert_eq!(found.id, inv.id);

    let bread =
        inventory::create_item_template(&pool, &unique("bread"), "Bread", 100, true, 10, true)
            .await?;
    let water =
        inventory::create_item_template(&pool, &unique("water"), "Water", 150, true, 10, true)
            .await?;

    inventory::add_item(&pool, inv.id, bread.id, 3, 1, &json!({})).await?;
    let err = inventory::add_item(&pool, inv.id, water.id, 1, 1, &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Constraint { .. }), "got {err:?}");

    inventory::add_item(&pool, inv.id, water.id, 1, 2, &json!({})).await?;
    let items = inventory::list_items(&pool, inv.id).await?;
    assert_eq!(items.len(), 2);

    Ok(())
}

#[tokio::test]
async fn item_template_with_instances_cannot_be_deleted() -> Result<()> {
    let Some(pool) = test_pool().await? else { return Ok(()) };

    let account = new_account(&pool).await?;
    let character = new_character(&pool, account.id).await?;
    let inv = inventory::create_inventory(
        &pool,
        InventoryOwner::Character(character.id),
        InventoryType::Player,
        40,
        50_000,
    )
    .await?;
    let template =
        inventory::create_item_template(&pool, &unique("rope"), "Rope", 300, true, 5, false)
            .await?;
    let item = inventory::add_item(&pool, inv.id, template.id, 1, 1, &json!({})).await?;

    let err = sqlx::query("delete from item_templates where id = $1")
        .bind(template.id)
        .execute(&pool)
        .await
        .unwrap_err();
    let err = StoreError::from(err);
    assert!(matches!(err, StoreError::Constraint { .. }), "got {err:?}");

    assert!(inventory::remove_item(&pool, item.id).await?);
    sqlx::query("delete from item_templates where id = $1")
        .bind(template.id)
        .execute(&pool)
        .await?;

    Ok(())
}

#[tokio::test]
async fn character_delete_cascades_to_dependents() -> Result<()> {
    let Some(pool) = test_pool().await? else { return Ok(()) };

    let account = new_account(&pool).await?;
    let character = new_character(&pool, account.id).await?;
    characters::upsert_appearance(&pool, character.id, "mp_m_freemode_01", &json!({}), &json!({}), &json!({}))
        .await?;
    characters::set_character_flag(&pool, character.id, "wanted", &json!(true), None).await?;
    let job = jobs::create_job(&pool, &unique("courier"), "Courier", false).await?;
    let grade = jobs::create_job_grade(&pool, job.id, "driver", "Driver", 0, 300).await?;
    jobs::assign_job(&pool, character.id, job.id, grade.id, true).await?;

    sqlx::query("delete from characters where id = $1")
        .bind(character.id)
        .execute(&pool)
        .await?;

    for table in ["character_appearances", "character_flags", "character_jobs"] {
        let remaining: i64 =
            sqlx::query_scalar(&format!("select count(*) from {table} where character_id = $1"))
                .bind(character.id)
                .fetch_one(&pool)
                .await?;
        assert_eq!(remaining, 0, "{table} rows should cascade away");
    }

    Ok(())
}

#[tokio::test]
async fn relations_resolve_from_the_registry() -> Result<()> {
    let Some(pool) = test_pool().await? else { return Ok(()) };

    let account = new_account(&pool).await?;
    let character = new_character(&pool, account.id).await?;

    let related: Vec<Character> = fetch_related(&pool, "account.characters", account.id).await?;
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].id, character.id);

    let owner: Option<Account> = fetch_related_one(&pool, "character.account", account.id).await?;
    assert_eq!(owner.context("character has an account")?.id, account.id);

    let err = fetch_related_one::<Account, _>(&pool, "no.such.relation", account.id)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Invalid(_)), "got {err:?}");

    Ok(())
}

#[tokio::test]
async fn rbac_effective_permissions() -> Result<()> {
    let Some(pool) = test_pool().await? else { return Ok(()) };

    let account = new_account(&pool).await?;
    let role = rbac::create_role(&pool, &unique("moderator"), Some("test role")).await?;
    let kick = unique("player.kick");
    let ban = unique("player.ban");
    rbac::define_permission(&pool, &kick, None).await?;
    rbac::define_permission(&pool, &ban, None).await?;
    rbac::grant_permission(&pool, role.id, &kick).await?;
    rbac::grant_permission(&pool, role.id, &ban).await?;
    rbac::assign_role(&pool, account.id, role.id, None).await?;

    let mut expected = vec![kick.clone(), ban.clone()];
    expected.sort();
    assert_eq!(rbac::effective_permissions(&pool, account.id).await?, expected);

    rbac::unassign_role(&pool, account.id, role.id).await?;
    assert!(rbac::effective_permissions(&pool, account.id).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn whitelist_review_roundtrip() -> Result<()> {
    let Some(pool) = test_pool().await? else { return Ok(()) };

    let applicant = new_account(&pool).await?;
    let reviewer = new_account(&pool).await?;

    let entry = accounts::upsert_whitelist(&pool, applicant.id).await?;
    assert_eq!(entry.status, WhitelistStatus::Pending);

    let reviewed = accounts::review_whitelist(
        &pool,
        applicant.id,
        WhitelistStatus::Approved,
        reviewer.id,
        Some("looks fine"),
    )
    .await?
    .context("entry should exist")?;
    assert_eq!(reviewed.status, WhitelistStatus::Approved);
    assert_eq!(reviewed.reviewer_account_id, Some(reviewer.id));

    Ok(())
}

#[tokio::test]
async fn configs_are_namespaced() -> Result<()> {
    let Some(pool) = test_pool().await? else { return Ok(()) };

    let namespace = unique("ns");
    configs::set_config(&pool, &namespace, "max_players", &json!(48)).await?;
    configs::set_config(&pool, &namespace, "max_players", &json!(64)).await?;
    configs::set_config(&pool, &namespace, "motd", &json!("welcome")).await?;

    let entry = configs::get_config(&pool, &namespace, "max_players")
        .await?
        .context("config should exist")?;
    assert_eq!(entry.value, json!(64));

    let all = configs::list_namespace(&pool, &namespace).await?;
    assert_eq!(all.len(), 2);

    assert!(configs::delete_config(&pool, &namespace, "motd").await?);
    assert!(!configs::delete_config(&pool, &namespace, "motd").await?);

    Ok(())
}
