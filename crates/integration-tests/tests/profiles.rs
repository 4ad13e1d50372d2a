//! Integration tests for the profile registry on disk.
//!
//! Run with: cargo test -p snowdex-integration-tests --test profiles

#![allow(clippy::unwrap_used)]

use snowdex::services::{ProfileError, ProfileManager};
use snowdex::store::{FileStore, LocalStore, PROFILES_KEY};
use snowdex_core::AvatarColor;

fn open(dir: &std::path::Path) -> ProfileManager {
    ProfileManager::load(LocalStore::new(FileStore::open(dir).unwrap()))
}

#[test]
fn test_first_profile_from_empty_registry() {
    let dir = tempfile::tempdir().unwrap();
    let mut manager = open(dir.path());
    assert!(manager.list_profiles().is_empty());

    manager.create_profile("Rookie").unwrap();

    let profiles = manager.list_profiles();
    assert_eq!(profiles.len(), 1);
    let profile = profiles.first().unwrap();
    assert_eq!(profile.name, "Rookie");
    assert!(!profile.id.as_str().is_empty());
    assert_eq!(profile.email.as_str(), format!("{}@snowdex.com", profile.id));
    assert_eq!(profile.avatar_color(), AvatarColor::from_seed("Rookie"));
}

#[test]
fn test_registry_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let created = {
        let mut manager = open(dir.path());
        vec![
            manager.create_profile("First").unwrap(),
            manager.create_profile("  Second  ").unwrap(),
        ]
    };

    let reopened = open(dir.path());
    assert_eq!(reopened.profiles(), created.as_slice());
    assert_eq!(reopened.select_profile(&created.last().unwrap().id).unwrap().name, "Second");
    assert!(
        dir.path()
            .join(format!("{PROFILES_KEY}.json"))
            .is_file()
    );
}

#[test]
fn test_blank_name_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut manager = open(dir.path());

    assert!(matches!(
        manager.create_profile(" \n "),
        Err(ProfileError::EmptyName)
    ));
    assert!(!dir.path().join(format!("{PROFILES_KEY}.json")).exists());
}

#[test]
fn test_registry_json_is_camel_case() {
    let dir = tempfile::tempdir().unwrap();
    open(dir.path()).create_profile("눈사람 마스터").unwrap();

    let raw = std::fs::read_to_string(dir.path().join(format!("{PROFILES_KEY}.json"))).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let record = &json[0];
    assert_eq!(record["name"], "눈사람 마스터");
    assert_eq!(record["avatarSeed"], "눈사람 마스터");
    assert!(record["email"].as_str().unwrap().ends_with("@snowdex.com"));
}
