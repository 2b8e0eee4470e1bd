use eventdesk::directory::UserDirectory;
use eventdesk::model::Role;

#[test]
fn builtin_roster_has_one_user_per_role() {
    let directory = UserDirectory::builtin();
    let users = directory.users();

    assert_eq!(users.len(), Role::ALL.len());
    for (user, role) in users.iter().zip(Role::ALL) {
        assert_eq!(user.role, role);
        assert_eq!(user.username, role.code());
    }
    assert_eq!(users[0].name, "Customer Service");
}

#[test]
fn builtin_roster_has_no_test_account() {
    let directory = UserDirectory::builtin();
    assert!(directory.authenticate("TestMan", "Test").is_none());
    assert!(directory.get_by_id(100).is_none());
}

#[test]
fn authenticate_checks_password() {
    let directory = UserDirectory::builtin();

    let user = directory.authenticate("FM", "FMPass").unwrap();
    assert_eq!(user.role, Role::Fm);
    assert_eq!(user.name, "Financial Manager");

    assert!(directory.authenticate("FM", "fmpass").is_none());
    assert!(directory.authenticate("CEO", "CEOPass").is_none());
}

#[test]
fn get_by_id_finds_user() {
    let directory = UserDirectory::builtin();
    assert_eq!(directory.get_by_id(1).unwrap().username, "CS");
    assert!(directory.get_by_id(99).is_none());
}

#[test]
fn serialized_user_has_no_password() {
    let user = UserDirectory::builtin().authenticate("AM", "AMPass").unwrap();
    let json = serde_json::to_value(&user).unwrap();

    assert_eq!(json["role"], "AM");
    assert!(json.get("password").is_none());
}

#[test]
fn roster_loads_from_toml() {
    let toml = r#"
[[user]]
id = 10
username = "alice"
password = "wonderland"
name = "Alice Planner"
role = "PM"

[[user]]
id = 11
username = "bob"
password = "builder"
name = "Bob Finance"
role = "FM"
"#;
    let directory = UserDirectory::from_toml_str(toml).unwrap();

    assert_eq!(directory.users().len(), 2);
    let alice = directory.authenticate("alice", "wonderland").unwrap();
    assert_eq!(alice.role, Role::Pm);
    assert_eq!(alice.id, 10);
    assert!(directory.authenticate("PM", "PMPass").is_none());
}

#[test]
fn roster_rejects_unknown_role_and_duplicates() {
    let unknown_role = r#"
[[user]]
id = 1
username = "x"
password = "y"
name = "X"
role = "CEO"
"#;
    assert!(UserDirectory::from_toml_str(unknown_role).is_err());

    let duplicate = r#"
[[user]]
id = 1
username = "x"
password = "y"
name = "X"
role = "CS"

[[user]]
id = 2
username = "x"
password = "z"
name = "X again"
role = "SCS"
"#;
    assert!(UserDirectory::from_toml_str(duplicate).is_err());
}

#[test]
fn load_falls_back_to_builtin() {
    let directory = UserDirectory::load(None).unwrap();
    assert!(directory.authenticate("HR", "HRPass").is_some());

    let missing = std::path::Path::new("/nonexistent/eventdesk-users.toml");
    assert!(UserDirectory::load(Some(missing)).is_err());
}
