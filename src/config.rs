use super::*;
use crate::entries::DEFAULT_IMPLICIT_FILES;

/// Run configuration shared by the corpus collector and the reference matcher.
///
/// `root` should be absolute: reported paths are built by joining onto it.
#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    /// Directory that path keys are computed relative to.
    pub source_root: PathBuf,
    /// Recognised extensions, without the leading dot.
    pub extensions: BTreeSet<String>,
    /// File names (with extension) that are always considered used.
    pub implicit_files: BTreeSet<String>,
    /// Directory names pruned from the walk.
    pub exclude_dirs: BTreeSet<String>,
    pub strategy: MatchStrategy,
}

impl Config {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            source_root: root.clone(),
            root,
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            implicit_files: DEFAULT_IMPLICIT_FILES
                .iter()
                .map(|name| name.to_string())
                .collect(),
            exclude_dirs: BTreeSet::new(),
            strategy: MatchStrategy::default(),
        }
    }

    pub fn with_source_root(mut self, source_root: impl Into<PathBuf>) -> Self {
        self.source_root = source_root.into();
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| normalize_extension(ext.as_ref()))
            .filter(|ext| !ext.is_empty())
            .collect();
        self
    }

    pub fn with_implicit_files<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.implicit_files = clean_names(names);
        self
    }

    pub fn with_exclude_dirs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude_dirs = clean_names(names);
        self
    }

    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub(crate) fn from_cli(cli: &Cli) -> Result<Self> {
        let root = fs::canonicalize(&cli.root)
            .with_context(|| format!("Failed to access root: {}", cli.root.display()))?;

        let mut config = Config::new(&root)
            .with_exclude_dirs(&cli.exclude_dirs)
            .with_strategy(cli.strategy);

        if let Some(source_root) = &cli.source_root {
            let joined = root.join(source_root);
            let source_root = fs::canonicalize(&joined)
                .with_context(|| format!("Failed to access source root: {}", joined.display()))?;
            config = config.with_source_root(source_root);
        }

        if !cli.extensions.is_empty() {
            config = config.with_extensions(&cli.extensions);
        }

        if cli.no_default_implicit {
            config.implicit_files.clear();
        }
        config.implicit_files.extend(clean_names(&cli.implicit_files));

        Ok(config)
    }
}

fn normalize_extension(value: &str) -> String {
    value.trim().trim_start_matches('.').to_string()
}

fn clean_names<I, S>(names: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| name.as_ref().trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_next_js_conventions() {
        let config = Config::new("/project/src");

        assert_eq!(config.source_root, PathBuf::from("/project/src"));
        for ext in ["ts", "tsx", "js", "jsx"] {
            assert!(config.extensions.contains(ext), "missing {ext}");
        }
        assert!(config.implicit_files.contains("page.tsx"));
        assert!(config.implicit_files.contains("globals.css"));
        assert!(config.exclude_dirs.is_empty());
        assert_eq!(config.strategy, MatchStrategy::Index);
    }

    #[test]
    fn extensions_accept_leading_dot() {
        let config = Config::new("/p").with_extensions([".vue", "svelte", " ", "."]);

        let exts: Vec<&str> = config.extensions.iter().map(String::as_str).collect();
        assert_eq!(exts, vec!["svelte", "vue"]);
    }

    #[test]
    fn cli_relative_source_root_is_resolved_against_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();

        let cli = Cli::parse_from([
            "strayfiles",
            dir.path().to_str().unwrap(),
            "--source-root",
            "src",
            "--implicit",
            "template.tsx,head.tsx",
            "--ext",
            ".ts",
        ]);
        let config = Config::from_cli(&cli).unwrap();

        let root = fs::canonicalize(dir.path()).unwrap();
        assert_eq!(config.root, root);
        assert_eq!(config.source_root, root.join("src"));
        assert!(config.implicit_files.contains("page.tsx"));
        assert!(config.implicit_files.contains("template.tsx"));
        assert!(config.implicit_files.contains("head.tsx"));
        assert_eq!(config.extensions.len(), 1);
    }

    #[test]
    fn cli_can_drop_default_implicit_files() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from([
            "strayfiles",
            dir.path().to_str().unwrap(),
            "--no-default-implicit",
            "--implicit",
            "main.ts",
        ]);
        let config = Config::from_cli(&cli).unwrap();

        let names: Vec<&str> = config.implicit_files.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["main.ts"]);
    }

    #[test]
    fn missing_root_is_reported_with_context() {
        let cli = Cli::parse_from(["strayfiles", "/definitely/not/here/strayfiles"]);
        let err = Config::from_cli(&cli).unwrap_err();

        assert!(err.to_string().contains("Failed to access root"));
    }
}
