//! Integration tests for `DieselUserRepository` against embedded PostgreSQL.
//!
//! Username uniqueness rides on `ON CONFLICT DO NOTHING` and the tree binding
//! on a conditional `UPDATE`; both are checked here, including when the
//! competing writes arrive at the same time.

use futures::future::join_all;
use rstest::{fixture, rstest};

use linktree::domain::ports::{
    LinktreeRepository, NewUser, UserPersistenceError, UserRepository,
};
use linktree::domain::{EmailAddress, Linktree, LinktreeId, ProfileText, UserId, Username};
use linktree::outbound::persistence::{DieselLinktreeRepository, DieselUserRepository};

mod support;

use support::{MigratedDatabase, handle_cluster_setup_failure, migrated_database};

struct TestContext {
    db: MigratedDatabase,
    users: DieselUserRepository,
    trees: DieselLinktreeRepository,
}

impl TestContext {
    fn sign_up(&self, username: &str) -> NewUser {
        let user = new_user(username);
        self.db
            .block_on(self.users.create(&user))
            .expect("create user");
        user
    }

    fn seed_tree(&self) -> LinktreeId {
        let empty = ProfileText::new("bio", "").expect("empty text");
        let tree = Linktree::create(&empty, &empty, Vec::new());
        self.db
            .block_on(self.trees.create(&tree))
            .expect("create tree")
            .id()
    }
}

fn new_user(username: &str) -> NewUser {
    NewUser {
        id: UserId::random(),
        username: Username::new(username).expect("valid username"),
        email: EmailAddress::new(format!("{username}@example.com")).expect("valid email"),
        password_hash: format!("$argon2id$v=19$stub-for-{username}"),
    }
}

#[fixture]
fn context() -> Option<TestContext> {
    match migrated_database() {
        Ok(db) => {
            let users = DieselUserRepository::new(db.pool.clone());
            let trees = DieselLinktreeRepository::new(db.pool.clone());
            Some(TestContext { db, users, trees })
        }
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[rstest]
fn created_user_is_found_by_name_and_id(context: Option<TestContext>) {
    let Some(ctx) = context else { return };
    let user = ctx.sign_up("ada");

    let stored = ctx
        .db
        .block_on(ctx.users.find_by_username(&user.username))
        .expect("lookup")
        .expect("user exists");
    assert_eq!(stored.user.id(), user.id);
    assert_eq!(stored.user.email(), &user.email);
    assert_eq!(stored.user.linktree_id(), None);
    assert_eq!(stored.password_hash, user.password_hash);

    let by_id = ctx
        .db
        .block_on(ctx.users.find_by_id(&user.id))
        .expect("lookup")
        .expect("user exists");
    assert_eq!(by_id.username(), &user.username);
}

#[rstest]
fn unknown_users_read_as_none(context: Option<TestContext>) {
    let Some(ctx) = context else { return };
    let name = Username::new("ghost").expect("username");
    assert!(
        ctx.db
            .block_on(ctx.users.find_by_username(&name))
            .expect("lookup")
            .is_none()
    );
    assert!(
        ctx.db
            .block_on(ctx.users.find_by_id(&UserId::random()))
            .expect("lookup")
            .is_none()
    );
}

#[rstest]
fn duplicate_username_is_rejected_and_first_account_survives(context: Option<TestContext>) {
    let Some(ctx) = context else { return };
    let first = ctx.sign_up("ada");

    let err = ctx
        .db
        .block_on(ctx.users.create(&new_user("ada")))
        .expect_err("duplicate username");
    assert_eq!(err, UserPersistenceError::already_exists("ada"));

    let stored = ctx
        .db
        .block_on(ctx.users.find_by_username(&first.username))
        .expect("lookup")
        .expect("first user still present");
    assert_eq!(stored.user.id(), first.id);
    assert_eq!(stored.password_hash, first.password_hash);
}

#[rstest]
fn usernames_differing_in_case_are_distinct(context: Option<TestContext>) {
    let Some(ctx) = context else { return };
    ctx.sign_up("ada");
    ctx.db
        .block_on(ctx.users.create(&new_user("Ada")))
        .expect("case-distinct username");
}

#[rstest]
fn concurrent_signups_for_one_name_admit_exactly_one(context: Option<TestContext>) {
    let Some(ctx) = context else { return };
    let attempts: Vec<NewUser> = (0..8).map(|_| new_user("race")).collect();

    let results = ctx
        .db
        .block_on(join_all(attempts.iter().map(|user| ctx.users.create(user))));

    let created = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(created, 1);
    for result in results.into_iter().filter(Result::is_err) {
        assert_eq!(result, Err(UserPersistenceError::already_exists("race")));
    }
}

#[rstest]
fn binding_is_one_shot(context: Option<TestContext>) {
    let Some(ctx) = context else { return };
    let user = ctx.sign_up("ada");
    let first = ctx.seed_tree();
    let second = ctx.seed_tree();

    let bound = ctx
        .db
        .block_on(ctx.users.bind_linktree(&user.id, &first))
        .expect("first bind");
    assert_eq!(bound.linktree_id(), Some(first));

    let err = ctx
        .db
        .block_on(ctx.users.bind_linktree(&user.id, &second))
        .expect_err("second bind");
    assert_eq!(err, UserPersistenceError::already_bound(user.id));

    let stored = ctx
        .db
        .block_on(ctx.users.find_by_username(&user.username))
        .expect("lookup")
        .expect("user exists");
    assert_eq!(stored.user.linktree_id(), Some(first));
}

#[rstest]
fn binding_unknown_user_is_not_found(context: Option<TestContext>) {
    let Some(ctx) = context else { return };
    let tree = ctx.seed_tree();
    let ghost = UserId::random();
    let err = ctx
        .db
        .block_on(ctx.users.bind_linktree(&ghost, &tree))
        .expect_err("unknown user");
    assert_eq!(err, UserPersistenceError::not_found(ghost));
}

#[rstest]
fn concurrent_binds_for_one_user_admit_exactly_one(context: Option<TestContext>) {
    let Some(ctx) = context else { return };
    let user = ctx.sign_up("ada");
    let trees: Vec<LinktreeId> = (0..8).map(|_| ctx.seed_tree()).collect();

    let results = ctx.db.block_on(join_all(
        trees
            .iter()
            .map(|tree| ctx.users.bind_linktree(&user.id, tree)),
    ));

    let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1);
    for result in results.iter().filter(|r| r.is_err()) {
        assert_eq!(result, &Err(UserPersistenceError::already_bound(user.id)));
    }
}
