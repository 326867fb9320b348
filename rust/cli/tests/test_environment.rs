use serial_test::serial;
use tarot_cli::run;
use tempfile::TempDir;

struct TempEnvVar {
    key: &'static str,
    previous: Option<String>,
}

impl TempEnvVar {
    fn set(key: &'static str, value: &str) -> Self {
        let previous = std::env::var(key).ok();
        // SAFETY: tests touching the environment are serialized.
        unsafe { std::env::set_var(key, value) };
        Self { key, previous }
    }

    fn unset(key: &'static str) -> Self {
        let previous = std::env::var(key).ok();
        // SAFETY: tests touching the environment are serialized.
        unsafe { std::env::remove_var(key) };
        Self { key, previous }
    }
}

impl Drop for TempEnvVar {
    fn drop(&mut self) {
        // SAFETY: tests touching the environment are serialized.
        unsafe {
            match &self.previous {
                Some(prev) => std::env::set_var(self.key, prev),
                None => std::env::remove_var(self.key),
            }
        }
    }
}

fn run_captured(args: &[&str]) -> (i32, String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run(args.iter().copied(), &mut out, &mut err);
    (
        code,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[test]
#[serial]
fn database_url_comes_from_environment() {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}", dir.path().join("env.db").display());
    let _db = TempEnvVar::set("DATABASE_URL", &url);
    let _drop = TempEnvVar::unset("SEED_DROP");

    let (code, stdout, _) = run_captured(&["tarot", "seed"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "Seed complete. Added 78 new cards. Total now 78.");

    let (code, stdout, _) = run_captured(&["tarot", "card", "1"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("The Fool"));
}

#[test]
#[serial]
fn seed_drop_env_selects_reset() {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}", dir.path().join("reset.db").display());
    let _db = TempEnvVar::set("DATABASE_URL", &url);

    let (code, _, _) = run_captured(&["tarot", "seed"]);
    assert_eq!(code, 0);

    let _drop = TempEnvVar::set("SEED_DROP", "true");
    let (code, stdout, _) = run_captured(&["tarot", "seed"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "Seeded ALL 78 cards (after drop).");
}

#[test]
#[serial]
fn missing_database_url_fails() {
    let _db = TempEnvVar::unset("DATABASE_URL");

    let (code, stdout, stderr) = run_captured(&["tarot", "daily"]);
    assert_eq!(code, 2);
    assert!(stdout.is_empty());
    assert_eq!(
        stderr.trim(),
        "Error: Configuration error: DATABASE_URL is required (or pass --database)"
    );
}
