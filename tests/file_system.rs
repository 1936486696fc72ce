//! Engine behavior: sequencing, authentication, isolation, and tree
//! mutations driven through signed updates.

mod common;

use common::{
    fake_content_hash, new_engine, new_engine_with_scheme, register, signed_update, TestWallet,
    PROJECT_NAME,
};
use ledgerfs::error::{ErrorClass, FsError};
use ledgerfs::fs::SnapshotOptions;
use ledgerfs::update::{Action, UpdateLog};
use ledgerfs::update::log::SignedUpdate;

#[test]
fn register_three_users_and_add_a_file() {
    let mut fs = new_engine();
    let wallets: Vec<TestWallet> = (1..=3).map(TestWallet::new).collect();

    for wallet in &wallets {
        assert_eq!(fs.current_sequence(&wallet.address), 0);
        assert!(!fs.is_user_registered(&wallet.address));
        register(&mut fs, wallet);
        assert_eq!(fs.current_sequence(&wallet.address), 1);
        assert!(fs.is_user_registered(&wallet.address));
    }

    let author = &wallets[0];
    let content_hash = fake_content_hash(1);
    let update = signed_update(
        author,
        2,
        vec![Action::add_file("/file", content_hash.as_str(), "text/plain", 1)],
    );
    fs.apply_update(&update).unwrap();
    assert_eq!(fs.current_sequence(&author.address), 2);

    // replaying the same update is a sequence error
    let err = fs.apply_update(&update).unwrap_err();
    assert!(matches!(err, FsError::DuplicateUpdate { id: 2 }));
    assert_eq!(err.class(), ErrorClass::Sequence);
    assert_eq!(fs.current_sequence(&author.address), 2);

    let entry = fs.resolve(&format!("/{}/file", author.address)).unwrap();
    let file = entry.as_file().unwrap();
    assert_eq!(file.name, "file");
    assert_eq!(file.content_hash, content_hash);
    assert_eq!(file.mime_type, "text/plain");
    assert_eq!(file.size, 1);
    assert_eq!(file.created_at_update_id, 2);

    let meta = fs.snapshot(&SnapshotOptions::default());
    assert_eq!(meta.users.as_ref().unwrap().len(), 3);
    assert_eq!(meta.tree.directory.subdirectories.len(), 3);
    assert!(meta.tree.directory.files.is_empty());
}

#[test]
fn sequence_gap_is_rejected() {
    let mut fs = new_engine();
    let wallet = TestWallet::new(1);
    register(&mut fs, &wallet);

    let update = signed_update(&wallet, 3, vec![Action::add_directory("/skip")]);
    let err = fs.apply_update(&update).unwrap_err();
    assert!(matches!(err, FsError::SequenceGap { expected: 2, got: 3 }));
    assert_eq!(fs.current_sequence(&wallet.address), 1);
}

#[test]
fn update_id_zero_is_rejected() {
    let mut fs = new_engine();
    let wallet = TestWallet::new(1);

    // id 0 never signs, so craft the wire form directly; the id check fires
    // before the signature check
    let update = SignedUpdate {
        id: 0,
        project_name: PROJECT_NAME.to_string(),
        actions: vec![Action::add_user(wallet.address.as_str())],
        actor_address: wallet.address.clone(),
        signature: "00".to_string(),
    };
    let err = fs.apply_update(&update).unwrap_err();
    assert!(matches!(err, FsError::InvalidUpdateId));
}

#[test]
fn project_name_must_match() {
    let mut fs = new_engine();
    let wallet = TestWallet::new(1);

    let mut log = UpdateLog::new("OtherProject", &wallet.address, 1);
    log.add_action(Action::add_user(wallet.address.as_str()));
    log.sign_with_key(wallet.secret_key(), &common::KeyedHashVerifier)
        .unwrap();
    let err = fs.apply_update(&log.into_signed().unwrap()).unwrap_err();
    assert!(matches!(err, FsError::ProjectMismatch { .. }));
    assert_eq!(err.class(), ErrorClass::Auth);
}

#[test]
fn unsupported_scheme_is_rejected_up_front() {
    let mut fs = new_engine_with_scheme("hmac-v0");
    let wallet = TestWallet::new(1);
    let update = signed_update(&wallet, 1, vec![Action::add_user(wallet.address.as_str())]);
    let err = fs.apply_update(&update).unwrap_err();
    assert!(matches!(err, FsError::UnsupportedScheme(s) if s == "hmac-v0"));
}

#[test]
fn action_count_bounds() {
    let mut fs = new_engine();
    let wallet = TestWallet::new(1);

    let empty = SignedUpdate {
        id: 1,
        project_name: PROJECT_NAME.to_string(),
        actions: Vec::new(),
        actor_address: wallet.address.clone(),
        signature: "00".to_string(),
    };
    let err = fs.apply_update(&empty).unwrap_err();
    assert!(matches!(err, FsError::ActionCountInvalid(0)));

    let actions: Vec<Action> = (0..101)
        .map(|i| Action::add_directory(format!("/dir-{i}")))
        .collect();
    let oversized = signed_update(&wallet, 1, actions);
    let err = fs.apply_update(&oversized).unwrap_err();
    assert!(matches!(err, FsError::ActionCountInvalid(101)));

    // exactly 100 actions passes the count check (and then registers + works)
    let mut actions = vec![Action::add_user(wallet.address.as_str())];
    actions.extend((1..100).map(|i| Action::add_directory(format!("/dir-{i}"))));
    let full = signed_update(&wallet, 1, actions);
    fs.apply_update(&full).unwrap();
    assert_eq!(fs.current_sequence(&wallet.address), 1);
}

#[test]
fn tampered_update_fails_signature_check() {
    let mut fs = new_engine();
    let wallet = TestWallet::new(1);
    register(&mut fs, &wallet);

    let mut update = signed_update(&wallet, 2, vec![Action::add_directory("/docs")]);
    update.actions = vec![Action::add_directory("/evil")];
    let err = fs.apply_update(&update).unwrap_err();
    assert!(matches!(err, FsError::BadSignature));

    let mut update = signed_update(&wallet, 2, vec![Action::add_directory("/docs")]);
    update.signature = String::new();
    let err = fs.apply_update(&update).unwrap_err();
    assert!(matches!(err, FsError::MissingSignature));

    // signature of a different wallet over the same payload
    let other = TestWallet::new(2);
    let mut update = signed_update(&wallet, 2, vec![Action::add_directory("/docs")]);
    let digest = UpdateLog::from_signed(&update).signable_digest().unwrap();
    update.signature = other.sign(&digest);
    let err = fs.apply_update(&update).unwrap_err();
    assert!(matches!(err, FsError::BadSignature));
}

#[test]
fn self_registration_only() {
    let mut fs = new_engine();
    let actor = TestWallet::new(1);
    let target = TestWallet::new(2);

    let update = signed_update(&actor, 1, vec![Action::add_user(target.address.as_str())]);
    let err = fs.apply_update(&update).unwrap_err();
    assert!(matches!(err, FsError::ActorMismatch { .. }));
    assert_eq!(err.class(), ErrorClass::Auth);
    assert!(!fs.is_user_registered(&target.address));
}

#[test]
fn duplicate_registration_conflicts() {
    let mut fs = new_engine();
    let wallet = TestWallet::new(1);
    register(&mut fs, &wallet);

    let update = signed_update(&wallet, 2, vec![Action::add_user(wallet.address.as_str())]);
    let err = fs.apply_update(&update).unwrap_err();
    assert!(matches!(err, FsError::UserExists(_)));
    assert_eq!(err.class(), ErrorClass::Conflict);
}

#[test]
fn invalid_address_cannot_register() {
    let mut fs = new_engine();
    // a syntactically valid actor whose AddUser target is malformed can only
    // be produced by signing for a malformed address
    let mut log = UpdateLog::new(PROJECT_NAME, "nothex", 1);
    log.add_action(Action::add_user("nothex"));
    log.sign_with_key(b"nothex", &common::KeyedHashVerifier)
        .unwrap();
    let err = fs.apply_update(&log.into_signed().unwrap()).unwrap_err();
    assert!(matches!(err, FsError::InvalidAddress(_)));
}

#[test]
fn unregistered_actor_cannot_mutate() {
    let mut fs = new_engine();
    let wallet = TestWallet::new(1);

    let update = signed_update(&wallet, 1, vec![Action::add_directory("/docs")]);
    let err = fs.apply_update(&update).unwrap_err();
    assert!(matches!(err, FsError::UnregisteredActor(_)));
    assert_eq!(err.class(), ErrorClass::Auth);
}

#[test]
fn add_user_is_visible_to_later_actions_in_the_same_update() {
    let mut fs = new_engine();
    let wallet = TestWallet::new(1);

    let update = signed_update(
        &wallet,
        1,
        vec![
            Action::add_user(wallet.address.as_str()),
            Action::add_directory("/docs"),
            Action::add_file("/docs/readme", fake_content_hash(7).as_str(), "text/plain", 3),
        ],
    );
    fs.apply_update(&update).unwrap();

    let entry = fs
        .resolve(&format!("/{}/docs/readme", wallet.address))
        .unwrap();
    assert_eq!(entry.as_file().unwrap().created_at_update_id, 1);
}

#[test]
fn users_are_isolated_to_their_own_subtree() {
    let mut fs = new_engine();
    let alice = TestWallet::new(1);
    let bob = TestWallet::new(2);
    register(&mut fs, &alice);
    register(&mut fs, &bob);

    let update = signed_update(&alice, 2, vec![Action::add_directory("/shared")]);
    fs.apply_update(&update).unwrap();

    // the directory exists under alice only
    assert!(fs.resolve(&format!("/{}/shared", alice.address)).is_ok());
    let err = fs
        .resolve(&format!("/{}/shared", bob.address))
        .unwrap_err();
    assert!(matches!(err, FsError::NotFound(_)));
    assert_eq!(err.class(), ErrorClass::NotFound);

    // bob's remove resolves against bob's subtree, where nothing exists
    let update = signed_update(&bob, 2, vec![Action::remove_directory("/shared")]);
    let err = fs.apply_update(&update).unwrap_err();
    assert!(matches!(err, FsError::DoesNotExist { .. }));
    assert!(fs.resolve(&format!("/{}/shared", alice.address)).is_ok());
}

#[test]
fn removing_a_non_empty_directory_discards_the_subtree() {
    let mut fs = new_engine();
    let wallet = TestWallet::new(1);
    register(&mut fs, &wallet);

    fs.apply_update(&signed_update(
        &wallet,
        2,
        vec![Action::add_directory("/myDirectory")],
    ))
    .unwrap();
    fs.apply_update(&signed_update(
        &wallet,
        3,
        vec![Action::add_file(
            "/myDirectory/file",
            fake_content_hash(3).as_str(),
            "text/plain",
            1,
        )],
    ))
    .unwrap();

    let base = format!("/{}/myDirectory", wallet.address);
    assert!(fs.resolve(&base).is_ok());
    assert!(fs.resolve(&format!("{base}/file")).is_ok());

    fs.apply_update(&signed_update(
        &wallet,
        4,
        vec![Action::remove_directory("/myDirectory")],
    ))
    .unwrap();

    assert!(matches!(fs.resolve(&base), Err(FsError::NotFound(_))));
    assert!(matches!(
        fs.resolve(&format!("{base}/file")),
        Err(FsError::NotFound(_))
    ));
}

#[test]
fn removing_an_empty_directory_right_after_creating_it() {
    let mut fs = new_engine();
    let wallet = TestWallet::new(1);
    register(&mut fs, &wallet);

    fs.apply_update(&signed_update(
        &wallet,
        2,
        vec![Action::add_directory("/emptyDirectory")],
    ))
    .unwrap();
    fs.apply_update(&signed_update(
        &wallet,
        3,
        vec![Action::remove_directory("/emptyDirectory")],
    ))
    .unwrap();

    let err = fs
        .resolve(&format!("/{}/emptyDirectory", wallet.address))
        .unwrap_err();
    assert!(matches!(err, FsError::NotFound(_)));
    assert_eq!(fs.current_sequence(&wallet.address), 3);
}

#[test]
fn root_cannot_be_removed() {
    let mut fs = new_engine();
    let wallet = TestWallet::new(1);
    register(&mut fs, &wallet);

    let update = signed_update(&wallet, 2, vec![Action::remove_directory("/")]);
    let err = fs.apply_update(&update).unwrap_err();
    assert!(matches!(err, FsError::PathWithoutComponents));
    assert_eq!(err.class(), ErrorClass::Validation);
    assert_eq!(
        err.to_string(),
        "path must contain at least one component"
    );
}

#[test]
fn removing_a_file_leaves_siblings_alone() {
    let mut fs = new_engine();
    let wallet = TestWallet::new(1);
    register(&mut fs, &wallet);

    fs.apply_update(&signed_update(
        &wallet,
        2,
        vec![
            Action::add_file("/a", fake_content_hash(1).as_str(), "text/plain", 1),
            Action::add_file("/b", fake_content_hash(2).as_str(), "text/plain", 2),
        ],
    ))
    .unwrap();
    fs.apply_update(&signed_update(&wallet, 3, vec![Action::remove_file("/a")]))
        .unwrap();

    assert!(matches!(
        fs.resolve(&format!("/{}/a", wallet.address)),
        Err(FsError::NotFound(_))
    ));
    assert!(fs.resolve(&format!("/{}/b", wallet.address)).is_ok());
}

#[test]
fn missing_parent_is_not_auto_created() {
    let mut fs = new_engine();
    let wallet = TestWallet::new(1);
    register(&mut fs, &wallet);

    let update = signed_update(
        &wallet,
        2,
        vec![Action::add_file(
            "/missing/file",
            fake_content_hash(1).as_str(),
            "text/plain",
            1,
        )],
    );
    let err = fs.apply_update(&update).unwrap_err();
    assert!(matches!(err, FsError::ParentNotFound(segment) if segment == "missing"));
}

#[test]
fn malformed_paths_and_names_are_validation_errors() {
    let mut fs = new_engine();
    let wallet = TestWallet::new(1);
    register(&mut fs, &wallet);

    let err = fs
        .apply_update(&signed_update(
            &wallet,
            2,
            vec![Action::add_directory("/with space")],
        ))
        .unwrap_err();
    assert!(matches!(err, FsError::InvalidPath(_)));

    let err = fs
        .apply_update(&signed_update(
            &wallet,
            2,
            vec![Action::add_directory("/a//b")],
        ))
        .unwrap_err();
    assert!(matches!(err, FsError::InvalidPath(_)));

    let err = fs
        .apply_update(&signed_update(
            &wallet,
            2,
            vec![Action::add_directory(format!("/{}", "a".repeat(256)))],
        ))
        .unwrap_err();
    assert!(matches!(err, FsError::InvalidName(_)));
}

#[test]
fn reserved_action_kinds_are_not_implemented() {
    use ledgerfs::update::action::{MoveFileAction, RemoveUserAction};

    let mut fs = new_engine();
    let wallet = TestWallet::new(1);
    register(&mut fs, &wallet);

    let update = signed_update(
        &wallet,
        2,
        vec![ledgerfs::update::Action::MoveFile(MoveFileAction {
            path: "/a".to_string(),
            new_path: "/b".to_string(),
        })],
    );
    let err = fs.apply_update(&update).unwrap_err();
    assert!(matches!(err, FsError::ActionNotImplemented("MOVE_FILE")));

    let update = signed_update(
        &wallet,
        2,
        vec![ledgerfs::update::Action::RemoveUser(RemoveUserAction {
            user_address: wallet.address.clone(),
        })],
    );
    let err = fs.apply_update(&update).unwrap_err();
    assert!(matches!(err, FsError::ActionNotImplemented("REMOVE_USER")));
    assert_eq!(fs.current_sequence(&wallet.address), 1);
}

#[test]
fn a_failed_action_abandons_the_update() {
    let mut fs = new_engine();
    let wallet = TestWallet::new(1);
    register(&mut fs, &wallet);

    let update = signed_update(
        &wallet,
        2,
        vec![
            Action::add_directory("/x"),
            Action::add_directory("/x"),
            Action::add_directory("/never"),
        ],
    );
    let err = fs.apply_update(&update).unwrap_err();
    assert!(matches!(err, FsError::AlreadyExists { .. }));

    // the update is not recorded and later actions never ran
    assert_eq!(fs.current_sequence(&wallet.address), 1);
    assert!(matches!(
        fs.resolve(&format!("/{}/never", wallet.address)),
        Err(FsError::NotFound(_))
    ));
}

#[test]
fn mixed_case_actor_addresses_normalize() {
    let mut fs = new_engine();
    let wallet = TestWallet::new(1);
    register(&mut fs, &wallet);

    assert!(fs.is_user_registered(&wallet.address.to_uppercase()));
    assert_eq!(fs.current_sequence(&wallet.address.to_uppercase()), 1);
}

#[test]
fn resolve_root_lists_user_directories() {
    let mut fs = new_engine();
    let alice = TestWallet::new(1);
    let bob = TestWallet::new(2);
    register(&mut fs, &alice);
    register(&mut fs, &bob);

    let entry = fs.resolve("/").unwrap();
    let root = entry.as_directory().unwrap();
    assert_eq!(root.name, "/");
    assert_eq!(root.subdirectories.len(), 2);
    assert!(root.subdirectory(&alice.address).is_some());
}
