use std::{
    fs,
    path::{Path, PathBuf},
};

const SKIP_CLEANUP_ENV_VAR: &str = "SKIP_TEMP_DIR_CLEANUP_ON_FAIL";

// Tests run in parallel threads, so the directory is claimed by creating it,
// rather than by checking that the path does not exist.
fn create_test_temp_dir() -> PathBuf {
    let tmpdir = std::env::temp_dir();
    let pid = std::process::id();

    for val in 1..1000000 {
        let path = tmpdir.join(format!("brokerage-qif-test-{pid}-{val}"));
        if fs::create_dir(&path).is_ok() {
            return path;
        }
    }
    panic!("Could not create a temp directory that does not already exist");
}

/// A scratch directory, removed when dropped.
pub struct TestDir {
    pub path: PathBuf,
}

impl TestDir {
    pub fn new() -> TestDir {
        TestDir { path: create_test_temp_dir() }
    }

    /// Copies a file from tests/data into the directory, under a new name.
    pub fn add_data_file(&self, data_fname: &str, dest_fname: &str) -> PathBuf {
        let src = Path::new("./tests/data").join(data_fname);
        let dest = self.path.join(dest_fname);
        fs::copy(&src, &dest).unwrap();
        dest
    }

    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(&self.path)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}

fn cleanup_test_dir(path: &Path) {
    if !path.exists() {
        println!("cleanup_test_dir: {} did not exist", path.display());
        return;
    }
    let skip_del_on_fail = std::env::var(SKIP_CLEANUP_ENV_VAR)
        .map(|v| !v.is_empty())
        .unwrap_or(false);

    if std::thread::panicking() && skip_del_on_fail {
        println!("cleanup_test_dir: panicking. Skipping remove of {}",
                 path.display());
    } else {
        println!("cleanup_test_dir: removing {}. To skip cleanup, set {}",
                 path.display(), SKIP_CLEANUP_ENV_VAR);
        let _ = fs::remove_dir_all(path);
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        cleanup_test_dir(&self.path);
    }
}
