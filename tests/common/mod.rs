use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

pub const TRANSCRIPT: &str = "WEBVTT\n\
\n\
1\n\
00:00:00.000 --> 00:00:03.000\n\
<v Dana>Morning all, quick sync on the launch.\n\
\n\
2\n\
00:00:03.500 --> 00:00:06.000\n\
<v Lee>Docs are done.\n\
\n\
3\n\
00:00:06.500 --> 00:00:09.000\n\
<v Dana>Great, we ship Friday.\n";

pub fn run_recap(args: &[&str]) -> Output {
    TestEnv::new().run(args)
}

pub struct TestEnv {
    home: TempDir,
    config: TempDir,
    data: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temporary HOME dir"),
            config: tempfile::tempdir().expect("create temporary XDG config dir"),
            data: tempfile::tempdir().expect("create temporary XDG data dir"),
        }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_recap"))
            .args(args)
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.config.path())
            .env("XDG_DATA_HOME", self.data.path())
            .env_remove("RECAP_GEMINI_API_KEY")
            .env_remove("RECAP_TOKENIZER")
            .env_remove("RECAP_HOST")
            .env_remove("RECAP_PORT")
            .env_remove("RUST_LOG")
            .output()
            .expect("failed to execute recap binary")
    }

    /// Write a transcript into the temporary home and return its path.
    #[allow(dead_code)]
    pub fn write_transcript(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.home.path().join(name);
        std::fs::write(&path, contents).expect("write transcript file");
        path
    }

    #[allow(dead_code)]
    pub fn config_path(&self) -> PathBuf {
        let output = self.run(&["config", "path"]);
        assert!(
            output.status.success(),
            "config path should succeed\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );

        let path = String::from_utf8_lossy(&output.stdout);
        PathBuf::from(path.trim())
    }

    #[allow(dead_code)]
    pub fn write_config(&self, contents: &str) {
        let config_path = self.config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).expect("create config parent directory");
        }
        std::fs::write(&config_path, contents).expect("write config file");
    }
}
