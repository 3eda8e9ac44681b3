//! Command helper methods for Test.

use super::{assert_success, created_id, Test};
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a hangar command with an isolated environment.
    ///
    /// Returns a Command configured with:
    /// - HANGAR_CONFIG pointing into the test directory
    /// - HANGAR_ENCRYPTION_KEY set to the test key
    /// - NO_COLOR so output can be matched
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("hangar").expect("failed to find hangar binary");
        cmd.env("HANGAR_CONFIG", self.config_path());
        cmd.env("HANGAR_ENCRYPTION_KEY", &self.key);
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("ENCRYPTION_KEY");
        cmd.env_remove("HANGAR_OWNER");
        cmd.env_remove("HANGAR_LOG");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Run hangar with arguments.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd().args(args).output().expect("failed to run hangar")
    }

    /// Add a password identity, returning its id.
    pub fn identity(&self, label: &str, secret: &str) -> u64 {
        let output = self.run(&["identity", "add", label, "--username", "root", "--secret", secret]);
        assert_success(&output);
        created_id(&output)
    }

    /// Add a folder, returning its id.
    pub fn folder(&self, name: &str, parent: Option<u64>) -> u64 {
        let parent = parent.map(|p| p.to_string());
        let mut args = vec!["folder", "add", name];
        if let Some(parent) = parent.as_deref() {
            args.extend(["--parent", parent]);
        }
        let output = self.run(&args);
        assert_success(&output);
        created_id(&output)
    }

    /// Add an ssh server with identities, returning its id.
    pub fn server(&self, name: &str, folder: Option<u64>, identities: &[u64]) -> u64 {
        let folder = folder.map(|f| f.to_string());
        let identities: Vec<String> = identities.iter().map(ToString::to_string).collect();

        let mut args = vec!["server", "add", name, "10.0.0.1"];
        if let Some(folder) = folder.as_deref() {
            args.extend(["--folder", folder]);
        }
        for identity in &identities {
            args.extend(["--identity", identity.as_str()]);
        }
        let output = self.run(&args);
        assert_success(&output);
        created_id(&output)
    }

    /// Shortcut for `hangar tree --json`.
    pub fn tree_json(&self) -> serde_json::Value {
        let output = self.run(&["tree", "--json"]);
        assert_success(&output);
        serde_json::from_slice(&output.stdout).expect("tree output is json")
    }

    /// Shortcut for `hangar identity list --json`.
    pub fn identities_json(&self) -> Vec<serde_json::Value> {
        let output = self.run(&["identity", "list", "--json"]);
        assert_success(&output);
        serde_json::from_slice(&output.stdout).expect("identity list is json")
    }
}
