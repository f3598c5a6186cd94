//! Test helpers for laying out JSON artefacts in a temporary directory.

use camino::Utf8PathBuf;
use serde_json::{Value, json};
use tempfile::TempDir;

/// Temporary directory holding the artefacts of one test.
pub(super) struct Artefacts {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Artefacts {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn write(&self, name: &str, value: &Value) -> Utf8PathBuf {
        let path = self.path(name);
        let payload = serde_json::to_vec_pretty(value).expect("encode fixture");
        std::fs::write(path.as_std_path(), payload).expect("write fixture");
        path
    }

    /// `named` located schools plus `unnamed` schools without a name.
    pub(super) fn schools(&self, named: usize, unnamed: usize) -> Utf8PathBuf {
        let records: Vec<Value> = (0..named)
            .map(|index| {
                json!({
                    "category": "school",
                    "name": format!("School {index}"),
                    "location": {"x": 30.5, "y": 50.4},
                })
            })
            .chain((0..unnamed).map(|_| json!({"category": "school"})))
            .collect();
        self.write("inventory.json", &Value::Array(records))
    }

    pub(super) fn city(&self, population: i64) -> Utf8PathBuf {
        self.write(
            "city.json",
            &json!({"identifier": "Kyiv, Ukraine", "population": population, "area_km2": 839.0}),
        )
    }

    pub(super) fn feedback(&self, category: &str, rejects: usize, accepts: usize) -> Utf8PathBuf {
        let signals: Vec<Value> = std::iter::repeat_n("decline", rejects)
            .chain(std::iter::repeat_n("accept", accepts))
            .map(|value| json!({"category": category, "value": value}))
            .collect();
        self.write("feedback.json", &Value::Array(signals))
    }
}

/// Decode the JSON a command wrote to its output buffer.
pub(super) fn decode(buffer: &[u8]) -> Value {
    serde_json::from_slice(buffer).expect("command output is JSON")
}
