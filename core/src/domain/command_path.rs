//! Heuristics for picking the interesting file out of a command line.

use std::path::is_separator;

/// Extensions of source files run through an interpreter or toolchain.
pub const SCRIPT_EXTENSIONS: &[&str] = &[
    ".js", ".ts", ".jsx", ".tsx", ".mjs", ".cjs", ".py", ".go", ".rb", ".sh", ".pl", ".php",
    ".rs", ".java", ".kt", ".swift",
];

/// Longest extension (dot included) still treated as a file extension.
const MAX_EXTENSION_LEN: usize = 6;

/// Characters that never appear in a path we are willing to join onto a cwd.
const NON_PATH_CHARS: &[char] = &[' ', '\'', '"', '(', ')'];

/// Pick the script or binary a command line runs.
///
/// For `node --inspect /app/server.js` this is `/app/server.js`, not `node`.
/// First match wins:
/// 1. a single-token command line is its own path
/// 2. the first non-flag argument containing a path separator
/// 3. the first non-flag argument with a known script extension
/// 4. the command itself
///
/// Tokens are whitespace-delimited; quoting is not interpreted.
pub fn extract_path(cmdline: &str) -> &str {
    let mut tokens = cmdline.split_whitespace();
    let Some(command) = tokens.next() else {
        return cmdline.trim();
    };

    let args: Vec<&str> = tokens.filter(|arg| !arg.starts_with('-')).collect();

    if let Some(path) = args.iter().find(|arg| arg.chars().any(is_separator)) {
        return *path;
    }

    if let Some(script) = args
        .iter()
        .find(|arg| SCRIPT_EXTENSIONS.contains(&file_extension(arg)))
    {
        return *script;
    }

    command
}

/// Extension of the last path component, dot included.
///
/// Unlike [`std::path::Path::extension`], a leading dot counts: `.env` has
/// the extension `.env`. Returns `""` when there is none.
pub fn file_extension(path: &str) -> &str {
    for (i, c) in path.char_indices().rev() {
        if is_separator(c) {
            break;
        }
        if c == '.' {
            return &path[i..];
        }
    }
    ""
}

/// Whether `s` reads like a plain file name that can be joined onto a
/// working directory.
pub fn looks_like_file(s: &str) -> bool {
    if s.contains(NON_PATH_CHARS) {
        return false;
    }
    let ext = file_extension(s);
    !ext.is_empty() && ext.len() <= MAX_EXTENSION_LEN
}
