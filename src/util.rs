use rand::distributions::Alphanumeric;
use rand::Rng;

/// Prefix shared by every in-flight object write.
pub const TMP_OBJECT_PREFIX: &str = "tmp_obj_";

/// A fresh name for a temporary object file, e.g. `tmp_obj_Xa81Qz`.
pub fn tmp_file_name() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();
    format!("{TMP_OBJECT_PREFIX}{suffix}")
}
