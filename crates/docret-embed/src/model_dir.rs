use std::path::{Path, PathBuf};

/// Locate the directory holding `config.json`, `tokenizer.json` and weights
/// for `model_name`. Candidates, in order: the name itself as a path,
/// `$APP_MODEL_DIR`, `<models_dir>/<name>`, `<models_dir>/<last segment of name>`.
pub fn resolve_model_dir(model_name: &str, models_dir: &Path) -> Option<PathBuf> {
    let mut candidates = vec![PathBuf::from(model_name)];
    if let Ok(dir) = std::env::var("APP_MODEL_DIR") { candidates.push(PathBuf::from(dir)); }
    candidates.push(models_dir.join(model_name));
    if let Some(last) = model_name.rsplit('/').next() { candidates.push(models_dir.join(last)); }

    let found = candidates.into_iter().find(|p| p.join("config.json").is_file());
    if let Some(p) = &found { tracing::debug!(model = model_name, dir = %p.display(), "resolved model dir"); }
    found
}
