#[cfg(test)]
pub mod test {
    use std::fs;

    use tempfile::TempDir;

    use crate::native::NativeEnv;
    use crate::store::EnvStore;

    /// A temp directory holding the given `(file name, contents)` pairs.
    pub fn env_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, contents) in files {
            fs::write(dir.path().join(name), contents).unwrap();
        }
        dir
    }

    /// A store whose native environment is exactly `vars`, so tests never
    /// touch the real process environment.
    pub fn isolated_store<const N: usize>(vars: [(&str, &str); N]) -> EnvStore {
        EnvStore::with_native(NativeEnv::from_pairs(vars))
    }

    #[test]
    fn env_dir_writes_files() {
        let dir = env_dir(&[(".env", "A=1\n"), (".env.prod", "A=2\n")]);
        assert_eq!(
            fs::read_to_string(dir.path().join(".env.prod")).unwrap(),
            "A=2\n"
        );
    }

    #[test]
    fn isolated_store_ignores_process_env() {
        let store = isolated_store([]);
        assert_eq!(store.get("PATH"), None);
    }
}
