//! Behaviour tests for the file-backed angler profile.

use std::cell::RefCell;
use std::sync::Arc;

use camino::Utf8PathBuf;
use fishing_diary::domain::{ProfileStore, ProfileStoreError, UserProfile};
use fishing_diary::outbound::storage::DiskKeyValueStore;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;
use tokio::runtime::{Builder, Runtime};

struct ProfileWorld {
    runtime: Runtime,
    dir: TempDir,
    store: RefCell<Option<ProfileStore<DiskKeyValueStore>>>,
    loaded: RefCell<Option<UserProfile>>,
    outcome: RefCell<Option<Result<(), ProfileStoreError>>>,
}

impl ProfileWorld {
    fn new() -> Self {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("create runtime");
        Self {
            runtime,
            dir: TempDir::new().expect("temp dir"),
            store: RefCell::new(None),
            loaded: RefCell::new(None),
            outcome: RefCell::new(None),
        }
    }

    fn open(&self) {
        let root = Utf8PathBuf::from_path_buf(self.dir.path().join("diary"))
            .expect("temp path is UTF-8");
        let storage = DiskKeyValueStore::open(&root).expect("open data directory");
        let store = ProfileStore::new(Arc::new(storage));
        *self.loaded.borrow_mut() = self.runtime.block_on(store.load());
        *self.store.borrow_mut() = Some(store);
    }

    fn save(&self, name: &str) {
        let store = self.store.borrow();
        let store = store.as_ref().expect("store opened");
        let profile = UserProfile {
            name: name.to_owned(),
            image: None,
        };
        *self.outcome.borrow_mut() = Some(self.runtime.block_on(store.save(&profile)));
    }
}

#[fixture]
fn world() -> ProfileWorld {
    ProfileWorld::new()
}

#[given("a fresh data directory")]
fn a_fresh_data_directory(world: &ProfileWorld) {
    world.open();
}

#[when("the angler saves the profile name {name}")]
fn the_angler_saves_the_profile_name(world: &ProfileWorld, name: String) {
    world.save(&name);
}

#[when("the angler saves a blank profile name")]
fn the_angler_saves_a_blank_profile_name(world: &ProfileWorld) {
    world.save(" ");
}

#[when("the angler deletes the profile")]
fn the_angler_deletes_the_profile(world: &ProfileWorld) {
    let store = world.store.borrow();
    let store = store.as_ref().expect("store opened");
    world
        .runtime
        .block_on(store.delete())
        .expect("delete should succeed");
}

#[when("the app restarts")]
fn the_app_restarts(world: &ProfileWorld) {
    world.open();
}

#[then("the stored profile name is {name}")]
fn the_stored_profile_name_is(world: &ProfileWorld, name: String) {
    let loaded = world.loaded.borrow();
    let profile = loaded.as_ref().expect("profile loaded");
    assert_eq!(profile.name, name);
    assert_eq!(profile.image, None);
}

#[then("the profile is rejected for a blank name")]
fn the_profile_is_rejected_for_a_blank_name(world: &ProfileWorld) {
    let outcome = world.outcome.borrow();
    assert_eq!(
        outcome.as_ref().expect("save attempted"),
        &Err(ProfileStoreError::EmptyName)
    );
}

#[then("no profile is stored")]
fn no_profile_is_stored(world: &ProfileWorld) {
    let store = world.store.borrow();
    let store = store.as_ref().expect("store opened");
    assert_eq!(world.runtime.block_on(store.load()), None);
}

#[scenario(
    path = "tests/features/profile.feature",
    name = "A saved profile is available after a restart"
)]
fn a_saved_profile_is_available_after_a_restart(world: ProfileWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/profile.feature",
    name = "A blank name is refused"
)]
fn a_blank_name_is_refused(world: ProfileWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/profile.feature",
    name = "Deleting the profile forgets it"
)]
fn deleting_the_profile_forgets_it(world: ProfileWorld) {
    drop(world);
}
