use super::*;

/// Next.js app-router conventions and global stylesheets: loaded by the framework,
/// never imported by name.
pub(crate) const DEFAULT_IMPLICIT_FILES: &[&str] = &[
    "page.tsx",
    "layout.tsx",
    "loading.tsx",
    "error.tsx",
    "not-found.tsx",
    "route.ts",
    "middleware.ts",
    "globals.css",
];

pub(crate) fn is_implicit_entry(file: &SourceFile, config: &Config) -> bool {
    config.implicit_files.contains(file.file_name())
}
