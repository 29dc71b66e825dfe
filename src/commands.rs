//! High-level command orchestration for the CLI.
//!
//! Turns the parsed flags into an [`Action`] and runs it against a
//! [`ProfileStore`], reporting through [`Ui`]. The pieces it coordinates:
//! - `crate::profiles` for the store and its files.
//! - `crate::resolve` for partial name matching.
//! - `crate::switch` for activation.
//! - `crate::registry` for the registry rewrite.

use anyhow::Result;
use tracing::debug;

use crate::error::NpmrcError;
use crate::profiles::{DEFAULT_PROFILE, ProfileStore, StoreInit};
use crate::registry::{self, REGISTRIES, current_registry};
use crate::resolve::resolve;
use crate::switch::{Activation, activate, active_profile_name};
use crate::ui::Ui;

/// What a single invocation was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No arguments: show the profiles
    List,
    /// `<name>`: resolve and activate
    Activate(String),
    /// `-c <name>`: create, then activate
    Create(String),
    /// `-r <alias>`: rewrite the active profile's registry
    SetRegistry(String),
}

impl Action {
    pub fn from_args(create: bool, registry: bool, name: Option<String>) -> Result<Self> {
        let usage = |msg: String| -> Result<Self> { Err(NpmrcError::Usage(msg).into()) };
        let name = name.filter(|n| !n.is_empty());

        match (create, registry, name) {
            (true, true, _) => usage("-c and -r cannot be used together".to_string()),
            (true, false, None) => {
                usage("What do you want to call your new npm configuration?".to_string())
            }
            (true, false, Some(name)) => Ok(Self::Create(name)),
            (false, true, None) => {
                let aliases: Vec<&str> = REGISTRIES.iter().map(|(alias, _)| *alias).collect();
                usage(format!(
                    "Which registry do you want to use? ({})",
                    aliases.join(", ")
                ))
            }
            (false, true, Some(alias)) => Ok(Self::SetRegistry(alias)),
            (false, false, None) => Ok(Self::List),
            (false, false, Some(name)) => Ok(Self::Activate(name)),
        }
    }
}

/// Bootstrap the store on first run.
///
/// Returns true when the store was just created; the invocation ends there.
pub fn init(store: &ProfileStore, ui: &Ui) -> Result<bool> {
    let StoreInit::Bootstrapped { seeded } = store.ensure_store()? else {
        return Ok(false);
    };

    let paths = store.paths();
    ui.println("Initialising npmrc...");
    ui.println(format!("Creating {}", paths.store_dir.display()));
    if seeded {
        ui.info(format!(
            "Making {} the default npmrc file",
            paths.active_link.display()
        ));
    }

    report(store, &activate(store, DEFAULT_PROFILE)?, ui);
    Ok(true)
}

/// Run one action against an initialised store
pub fn run(store: &ProfileStore, action: Action, ui: &Ui) -> Result<()> {
    match action {
        Action::List => list(store, ui),
        Action::Activate(query) => use_profile(store, &query, ui),
        Action::Create(name) => {
            create(store, &name, ui)?;
            use_profile(store, &name, ui)
        }
        Action::SetRegistry(alias) => set_registry(store, &alias, ui),
    }
}

/// List profiles, marking the active one
pub fn list(store: &ProfileStore, ui: &Ui) -> Result<()> {
    let table = render_list(store, ui)?;

    ui.section("Available npmrcs:");
    ui.println("");
    ui.println(table);
    Ok(())
}

/// Profile table: active marker, name, registry (or `-`)
pub fn render_list(store: &ProfileStore, ui: &Ui) -> Result<String> {
    let active = active_profile_name(store);

    let mut table = ui.simple_table();
    for name in store.list()? {
        let is_active = active.as_deref() == Some(name.as_str());
        let registry = store
            .read(&name)
            .ok()
            .and_then(|content| current_registry(&content).map(str::to_string));

        table.add_row(vec![
            ui.cell(ui.marker(is_active)),
            if is_active {
                ui.colored_cell(&name, comfy_table::Color::Green)
            } else {
                ui.cell(&name)
            },
            ui.cell(registry.unwrap_or_else(|| ui.dim("-"))),
        ]);
    }

    Ok(table.to_string())
}

/// Create a new empty profile
pub fn create(store: &ProfileStore, name: &str, ui: &Ui) -> Result<()> {
    let path = store.create(name)?;
    ui.ok(format!("Created npmrc file \"{}\" ({})", name, path.display()));
    Ok(())
}

/// Resolve a partial name and activate the profile it names
pub fn use_profile(store: &ProfileStore, query: &str, ui: &Ui) -> Result<()> {
    let candidates = store.entries()?;
    let name = match resolve(query, &candidates) {
        Some(hit) => {
            debug!(query, name = %hit.name, tier = ?hit.tier, "resolved profile");
            hit.name
        }
        None => query.to_string(),
    };

    let outcome = activate(store, &name)?;
    report(store, &outcome, ui);
    Ok(())
}

/// Rewrite the registry directive of the active profile
pub fn set_registry(store: &ProfileStore, alias: &str, ui: &Ui) -> Result<()> {
    let url = registry::set_registry(store, alias)?;
    let profile = active_profile_name(store).unwrap_or_else(|| DEFAULT_PROFILE.to_string());
    ui.ok(format!("Set registry of \"{}\" to {}", profile, url));
    Ok(())
}

fn report(store: &ProfileStore, outcome: &Activation, ui: &Ui) {
    match outcome {
        Activation::AlreadyActive { name, path } => ui.info(format!(
            "Current .npmrc ({}) is already \"{}\" ({})",
            store.paths().active_link.display(),
            name,
            path.display()
        )),
        Activation::Switched { previous, name, .. } => {
            if let Some(previous) = previous {
                ui.info(format!("Removing old .npmrc ({})", previous));
            }
            ui.ok(format!("Activating .npmrc \"{}\"", name));
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::test_utils::{setup_test_paths, setup_test_store};
    use crate::ui::ColorMode;
    use std::fs;
    use tempfile::TempDir;

    fn test_ui() -> Ui {
        Ui::new(ColorMode::Never, false)
    }

    fn link_target(store: &ProfileStore) -> std::path::PathBuf {
        fs::read_link(&store.paths().active_link).unwrap()
    }

    #[test]
    fn test_action_from_args() {
        assert_eq!(Action::from_args(false, false, None).unwrap(), Action::List);
        assert_eq!(
            Action::from_args(false, false, Some("work".into())).unwrap(),
            Action::Activate("work".into())
        );
        assert_eq!(
            Action::from_args(true, false, Some("work".into())).unwrap(),
            Action::Create("work".into())
        );
        assert_eq!(
            Action::from_args(false, true, Some("au".into())).unwrap(),
            Action::SetRegistry("au".into())
        );
    }

    #[test]
    fn test_empty_name_counts_as_absent() {
        assert_eq!(
            Action::from_args(false, false, Some(String::new())).unwrap(),
            Action::List
        );
        let err = Action::from_args(true, false, Some(String::new())).unwrap_err();
        assert!(err.to_string().contains("What do you want to call"));
    }

    #[test]
    fn test_missing_names_are_usage_errors() {
        for (create, registry) in [(true, false), (false, true), (true, true)] {
            let err = Action::from_args(create, registry, None).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<NpmrcError>(),
                Some(NpmrcError::Usage(_))
            ));
            assert!(err.to_string().contains("Usage"));
        }
    }

    #[test]
    fn test_init_bootstraps_and_activates_default() {
        let temp_dir = TempDir::new().unwrap();
        let store = ProfileStore::new(setup_test_paths(&temp_dir));
        let ui = test_ui();

        assert!(init(&store, &ui).unwrap());
        assert_eq!(link_target(&store), store.profile_path(DEFAULT_PROFILE));

        assert!(!init(&store, &ui).unwrap());
    }

    #[test]
    fn test_init_preserves_existing_config() {
        let temp_dir = TempDir::new().unwrap();
        let store = ProfileStore::new(setup_test_paths(&temp_dir));
        fs::write(&store.paths().active_link, "foobar").unwrap();

        init(&store, &test_ui()).unwrap();

        assert_eq!(fs::read_to_string(&store.paths().active_link).unwrap(), "foobar");
        assert_eq!(store.read(DEFAULT_PROFILE).unwrap(), "foobar");
    }

    #[test]
    fn test_create_activates_new_profile() {
        let temp_dir = TempDir::new().unwrap();
        let store = ProfileStore::new(setup_test_paths(&temp_dir));
        let ui = test_ui();
        init(&store, &ui).unwrap();

        run(&store, Action::Create("foobar".into()), &ui).unwrap();

        assert_eq!(link_target(&store), store.profile_path("foobar"));
        assert_eq!(store.read("foobar").unwrap(), "");
    }

    #[test]
    fn test_create_duplicate_fails() {
        let temp_dir = TempDir::new().unwrap();
        let store = ProfileStore::new(setup_test_paths(&temp_dir));
        let ui = test_ui();
        init(&store, &ui).unwrap();

        assert!(run(&store, Action::Create(DEFAULT_PROFILE.into()), &ui).is_err());
    }

    #[test]
    fn test_partial_name_activation() {
        let temp_dir = TempDir::new().unwrap();
        let store = setup_test_store(&temp_dir);
        let ui = test_ui();
        for name in ["bar", "car", "foobar"] {
            store.create(name).unwrap();
        }

        use_profile(&store, "ar", &ui).unwrap();
        assert_eq!(link_target(&store), store.profile_path("bar"));

        use_profile(&store, "foo", &ui).unwrap();
        assert_eq!(link_target(&store), store.profile_path("foobar"));
    }

    #[test]
    fn test_use_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let store = setup_test_store(&temp_dir);
        store.create("default").unwrap();

        let err = use_profile(&store, "doobar", &test_ui()).unwrap_err();
        assert!(err.to_string().contains("doobar"));
        assert!(fs::symlink_metadata(&store.paths().active_link).is_err());
    }

    #[test]
    fn test_list() {
        let temp_dir = TempDir::new().unwrap();
        let store = ProfileStore::new(setup_test_paths(&temp_dir));
        let ui = test_ui();
        init(&store, &ui).unwrap();
        store.create("work").unwrap();
        store.write("work", "registry = https://example.test/\n").unwrap();

        let rendered = render_list(&store, &ui).unwrap();
        let row = |name: &str| {
            rendered
                .lines()
                .find(|line| line.split_whitespace().any(|cell| cell == name))
                .unwrap_or_else(|| panic!("no row for {name} in:\n{rendered}"))
                .split_whitespace()
                .collect::<Vec<_>>()
        };

        assert_eq!(row("default"), vec!["*", "default", "-"]);
        assert_eq!(row("work"), vec!["work", "https://example.test/"]);
        assert!(list(&store, &ui).is_ok());
    }

    #[test]
    fn test_list_skips_hidden_entries() {
        let temp_dir = TempDir::new().unwrap();
        let store = setup_test_store(&temp_dir);
        store.create("work").unwrap();
        fs::write(store.profile_path(".DS_Store"), "").unwrap();

        let rendered = render_list(&store, &test_ui()).unwrap();

        assert!(rendered.contains("work"));
        assert!(!rendered.contains(".DS_Store"));
        assert!(!rendered.contains('*'));
    }

    #[test]
    fn test_set_registry_on_active_profile() {
        let temp_dir = TempDir::new().unwrap();
        let store = ProfileStore::new(setup_test_paths(&temp_dir));
        let ui = test_ui();
        init(&store, &ui).unwrap();

        run(&store, Action::SetRegistry("au".into()), &ui).unwrap();

        assert_eq!(
            store.read(DEFAULT_PROFILE).unwrap(),
            "registry = http://registry.npmjs.org.au/\n"
        );
    }
}
