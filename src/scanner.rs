use super::*;
use crate::entries::is_implicit_entry;
use std::path::Component;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Walks `config.root` in file-name order and partitions recognised files into the
/// corpus and its candidate subset.
///
/// Entries that cannot be read are logged and skipped, so the corpus may be partial.
pub fn collect_corpus(config: &Config) -> Corpus {
    let mut corpus = Corpus::default();

    for entry in WalkDir::new(&config.root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_excluded_dir(e, config))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(path = ?err.path(), error = %err, "skipping unreadable entry");
                continue;
            }
        };

        if !is_file_like(&entry) {
            continue;
        }

        let Some(file) = source_file(entry.into_path(), config) else {
            continue;
        };

        if is_implicit_entry(&file, config) {
            debug!(file = %file.path.display(), "implicit entry point, not checked");
        } else {
            debug!(file = %file.path.display(), extension = file.extension(), "candidate");
            corpus.candidates.push(corpus.files.len());
        }
        corpus.files.push(file);
    }

    corpus
}

pub(crate) fn source_file(path: PathBuf, config: &Config) -> Option<SourceFile> {
    let extension = path.extension()?.to_str()?;
    if !config.extensions.contains(extension) {
        return None;
    }

    // Names that are not UTF-8 still belong to the corpus under a lossy key.
    let file_name = path.file_name()?.to_string_lossy().into_owned();
    let name_key = path.file_stem()?.to_string_lossy().into_owned();

    Some(SourceFile {
        file_name,
        extension: extension.to_string(),
        name_key,
        path_key: path_key(&path, config),
        path,
    })
}

fn path_key(path: &Path, config: &Config) -> String {
    let rel = path
        .strip_prefix(&config.source_root)
        .or_else(|_| path.strip_prefix(&config.root))
        .unwrap_or(path)
        .with_extension("");

    rel.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Regular files and symlinks that do not lead to a directory. Dangling links stay in,
/// they are reported like any other file that cannot be read.
fn is_file_like(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && !entry.path().is_dir())
}

fn is_excluded_dir(entry: &DirEntry, config: &Config) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| config.exclude_dirs.contains(name))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project(files: &[&str]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for rel in files {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "export {};\n").unwrap();
        }
        dir
    }

    fn rel_paths(root: &Path, files: impl Iterator<Item = impl AsRef<Path>>) -> Vec<String> {
        files
            .map(|p| {
                p.as_ref()
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn collects_recognised_extensions_in_stable_order() {
        let dir = project(&[
            "b.ts",
            "a.tsx",
            "styles/globals.css",
            "README.md",
            "lib/z.js",
            "lib/m.jsx",
            "types/env.d.ts",
            ".js",
        ]);
        let corpus = collect_corpus(&Config::new(dir.path()));

        let files = rel_paths(dir.path(), corpus.files().iter().map(|f| f.path()));
        assert_eq!(
            files,
            vec!["a.tsx", "b.ts", "lib/m.jsx", "lib/z.js", "types/env.d.ts"]
        );
    }

    #[test]
    fn implicit_entries_stay_in_corpus_but_are_not_candidates() {
        let dir = project(&["app/page.tsx", "app/layout.tsx", "components/nav.tsx"]);
        let corpus = collect_corpus(&Config::new(dir.path()));

        assert_eq!(corpus.len(), 3);
        let candidates = rel_paths(dir.path(), corpus.candidates().map(|f| f.path()));
        assert_eq!(candidates, vec!["components/nav.tsx"]);
    }

    #[test]
    fn derives_name_and_path_keys_relative_to_source_root() {
        let dir = project(&["src/components/ui/button.tsx", "scripts/seed.ts"]);
        let config = Config::new(dir.path()).with_source_root(dir.path().join("src"));
        let corpus = collect_corpus(&config);

        let button = &corpus.files()[1];
        assert_eq!(button.file_name(), "button.tsx");
        assert_eq!(button.extension(), "tsx");
        assert_eq!(button.name_key(), "button");
        assert_eq!(button.path_key(), "components/ui/button");

        // Outside the source root the key falls back to the project root.
        let seed = &corpus.files()[0];
        assert_eq!(seed.path_key(), "scripts/seed");
    }

    #[test]
    fn keeps_inner_dots_in_keys() {
        let dir = project(&["lib/date.utils.test.ts"]);
        let corpus = collect_corpus(&Config::new(dir.path()));

        let file = &corpus.files()[0];
        assert_eq!(file.name_key(), "date.utils.test");
        assert_eq!(file.path_key(), "lib/date.utils.test");
    }

    #[test]
    fn prunes_excluded_directories() {
        let dir = project(&["node_modules/pkg/index.js", "src/app.ts", ".next/chunk.js"]);
        let config = Config::new(dir.path()).with_exclude_dirs(["node_modules", ".next"]);
        let corpus = collect_corpus(&config);

        let files = rel_paths(dir.path(), corpus.files().iter().map(|f| f.path()));
        assert_eq!(files, vec!["src/app.ts"]);
    }

    #[test]
    fn missing_root_yields_empty_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = collect_corpus(&Config::new(dir.path().join("gone")));

        assert!(corpus.is_empty());
        assert_eq!(corpus.candidate_count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn keeps_files_with_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = project(&["a.ts"]);
        let odd = dir.path().join(OsStr::from_bytes(b"caf\xe9.ts"));
        fs::write(&odd, "export {};\n").unwrap();
        let corpus = collect_corpus(&Config::new(dir.path()));

        assert_eq!(corpus.len(), 2);
        let file = corpus.files().iter().find(|f| f.path() == odd).unwrap();
        assert_eq!(file.name_key(), "caf\u{FFFD}");
        assert_eq!(file.file_name(), "caf\u{FFFD}.ts");
        assert_eq!(file.extension(), "ts");
        assert_eq!(corpus.candidate_count(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlinks_are_candidates() {
        let dir = project(&["a.ts", "lib/real.ts"]);
        std::os::unix::fs::symlink(dir.path().join("gone.ts"), dir.path().join("dangling.ts"))
            .unwrap();
        std::os::unix::fs::symlink(dir.path().join("lib/real.ts"), dir.path().join("alias.ts"))
            .unwrap();
        std::os::unix::fs::symlink(dir.path().join("lib"), dir.path().join("linked.ts")).unwrap();
        let corpus = collect_corpus(&Config::new(dir.path()));

        let files = rel_paths(dir.path(), corpus.files().iter().map(|f| f.path()));
        assert_eq!(files, vec!["a.ts", "alias.ts", "dangling.ts", "lib/real.ts"]);
    }
}
