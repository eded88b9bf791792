use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

static BIN_NAME: &str = "cantrip-install";

/// A scratch filesystem layout for one test: a bundle directory plus fake
/// per-format plugin directories, wired up through the environment so the
/// binary never touches the real home directory.
pub struct TestEnv {
    root: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let env = TestEnv {
            root: tempfile::tempdir().unwrap(),
        };
        fs::create_dir_all(env.bundle_dir()).unwrap();
        fs::create_dir_all(env.clap_dir()).unwrap();
        fs::create_dir_all(env.vst3_dir()).unwrap();
        env
    }

    pub fn root(&self) -> &std::path::Path {
        self.root.path()
    }

    pub fn bundle_dir(&self) -> PathBuf {
        self.root.path().join("bundled")
    }

    pub fn clap_dir(&self) -> PathBuf {
        self.root.path().join("clap")
    }

    pub fn vst3_dir(&self) -> PathBuf {
        self.root.path().join("vst3")
    }

    /// Fakes a bundler output: a bundle directory with a module inside.
    pub fn add_bundle(&self, name: &str, ext: &str) -> PathBuf {
        let bundle = self.bundle_dir().join(format!("{}.{}", name, ext));
        fs::create_dir_all(&bundle).unwrap();
        fs::write(bundle.join("module"), b"\x7fELF").unwrap();
        bundle
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin(BIN_NAME).unwrap();
        cmd.current_dir(self.root.path())
            .env_remove("RUST_LOG")
            .env("CANTRIP_BUNDLE_DIR", self.bundle_dir())
            .env("CLAP_PATH", self.clap_dir())
            .env("VST3_PATH", self.vst3_dir())
            .env("CANTRIP_CONFIG", self.root.path().join("no-config.toml"));
        cmd
    }
}
